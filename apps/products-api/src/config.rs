//! Configuration for the Products API

use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub postgres: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            postgres: PostgresConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://u:p@localhost/catalog")),
                ("APP_ENV", None),
                ("PORT", None),
                ("RUN_MIGRATIONS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "products_api");
                assert_eq!(config.server.port, 8080);
                assert!(config.environment.is_development());
                assert!(config.run_migrations);
            },
        );
    }

    #[test]
    fn test_from_env_requires_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_run_migrations_can_be_disabled() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/catalog")),
                ("RUN_MIGRATIONS", Some("false")),
            ],
            || {
                assert!(!Config::from_env().unwrap().run_migrations);
            },
        );
    }
}
