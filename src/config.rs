use std::path::PathBuf;

use anyhow::{bail, Context};
use jsonwebtoken::Algorithm;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_ttl_minutes: i64,
    pub reset_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
}

/// Email delivery backend, selected by `MAIL_DRIVER`.
#[derive(Debug, Clone)]
pub enum MailDriver {
    Smtp(SmtpConfig),
    Log,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Base URL the emailed reset link points at.
    pub public_base_url: String,
    /// Landing page the reset link redirects the browser to.
    pub reset_page_url: String,
    pub photo_dir: PathBuf,
    pub mail: MailDriver,
}

impl AppConfig {
    /// Load the whole configuration from the environment once, at startup.
    /// Missing or malformed required values abort the process.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            algorithm: parse_algorithm(
                &std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".into()),
            )?,
            access_ttl_minutes: env_i64("ACCESS_TOKEN_TTL_MINUTES", 1440)?,
            reset_ttl_minutes: env_i64("RESET_TOKEN_TTL_MINUTES", 60)?,
        };

        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        let reset_page_url =
            std::env::var("RESET_PAGE_URL").context("RESET_PAGE_URL is required")?;

        let photo_dir =
            PathBuf::from(std::env::var("PHOTO_DIR").unwrap_or_else(|_| "./photo".into()));

        let mail = match std::env::var("MAIL_DRIVER")
            .unwrap_or_else(|_| "smtp".into())
            .as_str()
        {
            "log" => MailDriver::Log,
            "smtp" => MailDriver::Smtp(smtp_from_env()?),
            other => bail!("unsupported MAIL_DRIVER '{other}', expected 'smtp' or 'log'"),
        };

        Ok(Self {
            database_url,
            jwt,
            public_base_url,
            reset_page_url,
            photo_dir,
            mail,
        })
    }
}

/// Tokens are signed with a shared secret, so only the HMAC family is valid.
pub(crate) fn parse_algorithm(name: &str) -> anyhow::Result<Algorithm> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("unsupported JWT_ALGORITHM '{other}', expected HS256, HS384 or HS512"),
    }
}

/// The deployment profile (`EMAIL_PROFILE`, `local` or `work`) selects which
/// SMTP credential set is read.
fn smtp_from_env() -> anyhow::Result<SmtpConfig> {
    let profile = std::env::var("EMAIL_PROFILE").unwrap_or_else(|_| "local".into());
    let prefix = match profile.as_str() {
        "local" => "LOCAL",
        "work" => "WORK",
        other => bail!("unsupported EMAIL_PROFILE '{other}', expected 'local' or 'work'"),
    };
    let var = |name: &str| {
        let key = format!("{prefix}_SMTP_{name}");
        std::env::var(&key).with_context(|| format!("{key} is required"))
    };
    Ok(SmtpConfig {
        host: var("HOST")?,
        port: var("PORT")?
            .parse::<u16>()
            .with_context(|| format!("{prefix}_SMTP_PORT must be a port number"))?,
        username: var("USERNAME")?,
        password: var("PASSWORD")?,
        sender: var("SENDER")?,
    })
}

fn env_i64(key: &str, default: i64) -> anyhow::Result<i64> {
    match std::env::var(key) {
        Ok(v) => v
            .parse::<i64>()
            .with_context(|| format!("{key} must be an integer number of minutes")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_algorithms_accepted() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("HS384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
    }

    #[test]
    fn asymmetric_algorithms_rejected() {
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("ES256").is_err());
        assert!(parse_algorithm("none").is_err());
    }
}
