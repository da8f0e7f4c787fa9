use std::env;
use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. Without it the service keeps logs in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
            db_acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_skips_blanks() {
        assert_eq!(
            split_origins("http://a.local, ,http://b.local:3000,"),
            vec!["http://a.local".to_string(), "http://b.local:3000".to_string()]
        );
    }

    #[test]
    fn test_parse_var_default_and_error() {
        assert_eq!(parse_var::<u16>("LIFELOG_TEST_UNSET_VAR", 8080).unwrap(), 8080);

        env::set_var("LIFELOG_TEST_BAD_PORT", "eighty");
        let err = parse_var::<u16>("LIFELOG_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("LIFELOG_TEST_BAD_PORT"));
        env::remove_var("LIFELOG_TEST_BAD_PORT");
    }

    #[test]
    fn test_listen_addr() {
        let config = Config {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 9000,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: vec![],
            db_max_connections: 5,
            db_acquire_timeout_secs: 1,
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
    }
}
