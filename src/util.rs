use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub dbname: String,
    #[serde_as(as = "DisplayFromStr")]
    pub sslmode: PgSslMode,
    #[serde(default = "max_connections_default")]
    pub max_connections: u32,
}

impl PgConfig {
    /// Create a connection pool for the configured database.
    pub async fn connect(self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.into())
            .await
    }
}

impl From<PgConfig> for PgConnectOptions {
    fn from(config: PgConfig) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(config.password.expose_secret())
            .database(&config.dbname)
            .port(config.port)
            .ssl_mode(config.sslmode)
    }
}

fn max_connections_default() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use crate::util::PgConfig;
    use secrecy::ExposeSecret;
    use serde_json::json;
    use sqlx::postgres::PgSslMode;

    #[test]
    fn test_deserialize_pg_config() -> Result<(), serde_json::Error> {
        let config = serde_json::from_value::<PgConfig>(json!({
            "host": "localhost",
            "port": 5432,
            "user": "postgres",
            "password": "secret",
            "dbname": "ebanking",
            "sslmode": "disable"
        }))?;

        assert_eq!(config.host, "localhost");
        assert_eq!(config.password.expose_secret(), "secret");
        assert!(matches!(config.sslmode, PgSslMode::Disable));
        assert_eq!(config.max_connections, 10);

        Ok(())
    }
}
