use std::str::FromStr;

use anyhow::{bail, Context, Result};
use jsonwebtoken::Algorithm;

const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_PDF_SERVER_URL: &str = "http://localhost:3000/generate-pdf";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_api_url: String,
    pub tavily_api_key: String,
    pub secret_key: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub pdf_server_url: String,
    pub templates_dir: String,
    /// `None` means any origin is allowed.
    pub cors_origins: Option<Vec<String>>,
    pub job_cache_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            groq_api_url: env_or("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            tavily_api_key: require_env("TAVILY_API_KEY")?,
            secret_key: env_or("SECRET_KEY", "dev_change_me"),
            jwt_algorithm: parse_hmac_algorithm(&env_or("ALGORITHM", "HS256"))?,
            access_token_expire_minutes: env_or("ACCESS_TOKEN_EXPIRE_MINUTES", "60")
                .parse::<i64>()
                .context("ACCESS_TOKEN_EXPIRE_MINUTES must be an integer")?,
            pdf_server_url: env_or("PDF_SERVER_URL", DEFAULT_PDF_SERVER_URL),
            templates_dir: env_or("TEMPLATES_DIR", "templates"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .ok()
                .and_then(|raw| parse_origins(&raw)),
            job_cache_ttl_secs: env_or("JOB_CACHE_TTL_SECS", "86400")
                .parse::<u64>()
                .context("JOB_CACHE_TTL_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Tokens are signed with a shared secret, so only the HMAC family is usable.
fn parse_hmac_algorithm(raw: &str) -> Result<Algorithm> {
    let algorithm = Algorithm::from_str(raw.trim())
        .with_context(|| format!("ALGORITHM '{raw}' is not a known JWT algorithm"))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => bail!("ALGORITHM {other:?} is not supported; use HS256, HS384 or HS512"),
    }
}

fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hmac_algorithm_accepts_hs_family() {
        assert_eq!(parse_hmac_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_hmac_algorithm(" HS512 ").unwrap(), Algorithm::HS512);
    }

    #[test]
    fn test_parse_hmac_algorithm_rejects_asymmetric() {
        assert!(parse_hmac_algorithm("RS256").is_err());
        assert!(parse_hmac_algorithm("nonsense").is_err());
    }

    #[test]
    fn test_parse_origins_wildcard_is_permissive() {
        assert!(parse_origins("*").is_none());
        assert!(parse_origins(" , ").is_none());
    }

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins("http://localhost:5173, https://app.example.com").unwrap();
        assert_eq!(
            origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }
}
