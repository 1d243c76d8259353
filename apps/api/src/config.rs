use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::LlmSettings;
use crate::search::client::SearchSettings;
use crate::search::collection::{CollectionCatalog, CollectionTag};
use crate::storage::archive::ArchiveKeys;
use crate::storage::roster::RosterKeys;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing. Search project and
/// engine are optional here; the search operations report them when missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchSettings,
    pub llm: LlmSettings,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub archive_keys: ArchiveKeys,
    pub roster_keys: RosterKeys,
    pub request_timeout: Duration,
    pub frontend_dist: String,
    pub cors_allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut catalog = CollectionCatalog::default();
        for tag in CollectionTag::STORES {
            if let Some(store_id) = optional_env(tag.env_key()) {
                catalog = catalog.with_store(tag, store_id);
            }
        }

        let archive_defaults = ArchiveKeys::default();
        let roster_defaults = RosterKeys::default();

        Ok(Config {
            search: SearchSettings {
                project_id: optional_env("SEARCH_PROJECT_ID"),
                location: env_or("SEARCH_LOCATION", "global"),
                engine_id: optional_env(CollectionTag::All.env_key()),
                api_key: optional_env("SEARCH_API_KEY"),
                language_code: env_or("SEARCH_LANGUAGE_CODE", "ja"),
                time_zone: env_or("SEARCH_TIME_ZONE", "Asia/Tokyo"),
                catalog,
            },
            llm: LlmSettings {
                endpoint: require_env("AOAI_ENDPOINT")?,
                api_key: require_env("AOAI_API_KEY")?,
                deployment: env_or("AOAI_DEPLOYMENT", "gpt-4o"),
                api_version: env_or("AOAI_API_VERSION", "2024-10-21"),
                backoff_base: Duration::from_millis(
                    env_or("AOAI_RETRY_BACKOFF_MS", "1000")
                        .parse::<u64>()
                        .context("AOAI_RETRY_BACKOFF_MS must be a whole number of milliseconds")?,
                ),
            },
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_region: env_or("AWS_REGION", "us-east-1"),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            archive_keys: ArchiveKeys {
                half_year: optional_env("REVIEW_HALF_YEAR_KEY").unwrap_or(archive_defaults.half_year),
                monthly: optional_env("REVIEW_MONTHLY_KEY").unwrap_or(archive_defaults.monthly),
            },
            roster_keys: RosterKeys {
                employees: optional_env("EMPLOYEE_ROSTER_KEY").unwrap_or(roster_defaults.employees),
                personas: optional_env("PERSONA_DUMP_KEY").unwrap_or(roster_defaults.personas),
            },
            request_timeout: Duration::from_secs(
                env_or("REQUEST_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            frontend_dist: env_or("FRONTEND_DIST", "../frontend/dist"),
            cors_allowed_origins: parse_origins(&env_or("CORS_ALLOWED_ORIGINS", "")),
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

/// Unset and blank variables are both `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
