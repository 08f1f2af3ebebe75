use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Loads the demo data set when the sentinel user is missing. Destructive.
    pub seed_on_start: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("GS_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid GS_LISTEN_ADDR")?;
        let db_path = std::env::var("GS_DB_PATH").unwrap_or_else(|_| "./db/goalsaver.db".into());
        let cors_allow = std::env::var("GS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout =
            parse_timeout_ms(std::env::var("GS_REQUEST_TIMEOUT_MS").ok().as_deref())?;
        let seed_on_start = std::env::var("GS_SEED_ON_START")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        let log_format = match std::env::var("GS_LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout,
            seed_on_start,
            log_format,
        })
    }
}

fn parse_timeout_ms(value: Option<&str>) -> anyhow::Result<Duration> {
    let millis: u64 = value
        .unwrap_or("30000")
        .trim()
        .parse()
        .context("Invalid GS_REQUEST_TIMEOUT_MS")?;
    Ok(Duration::from_millis(millis))
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_on() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert_eq!(parse_timeout_ms(None).unwrap(), Duration::from_secs(30));
        assert_eq!(
            parse_timeout_ms(Some(" 1500 ")).unwrap(),
            Duration::from_millis(1500)
        );
        let err = parse_timeout_ms(Some("soon")).unwrap_err();
        assert!(err.to_string().contains("GS_REQUEST_TIMEOUT_MS"));
    }
}
