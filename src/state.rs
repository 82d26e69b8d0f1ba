use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::DataStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(DataStore::seeded(&config.admin)?);
        Ok(Self { store, config })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{AdminConfig, JwtConfig};

        let admin = AdminConfig::for_tests();
        let store = Arc::new(DataStore::seeded(&admin).expect("seed should succeed"));
        let config = Arc::new(AppConfig {
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            admin,
        });
        Self { store, config }
    }
}
