use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials for the administrator account seeded at startup. The password
/// comes from the environment, not from source.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutritrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutritrack-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let admin = AdminConfig {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@nutritrack.com".into()),
            password: std::env::var("ADMIN_PASSWORD")?,
        };
        Ok(Self { jwt, admin })
    }
}

impl AdminConfig {
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            username: "admin".into(),
            email: "admin@nutritrack.com".into(),
            password: "admin123".into(),
        }
    }
}
