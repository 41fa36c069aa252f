use anyhow::{Context, Result};

const DEFAULT_GENERATION_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_DOCUMENT_URL_ROOT: &str = "https://storage.googleapis.com/";

/// Application configuration loaded from environment variables.
/// Built once in `main` and handed to each client; nothing reads the
/// environment after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub generation: GenerationSettings,
    /// PostgreSQL document store. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub object_store: ObjectStoreSettings,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub api_key: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ObjectStoreSettings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Prefix stripped from resume references before `container/object-path`.
    pub document_url_root: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            generation: GenerationSettings {
                api_key: require("GEMINI_API_KEY")?,
                endpoint: or_default("GENERATION_ENDPOINT", DEFAULT_GENERATION_ENDPOINT),
                timeout_secs: or_default("GENERATION_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            },
            database_url: var("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            object_store: ObjectStoreSettings {
                endpoint: require("S3_ENDPOINT")?,
                region: or_default("S3_REGION", "us-east-1"),
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                document_url_root: or_default("DOCUMENT_URL_ROOT", DEFAULT_DOCUMENT_URL_ROOT),
            },
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("GEMINI_API_KEY", "key"),
        ("S3_ENDPOINT", "http://localhost:9000"),
        ("AWS_ACCESS_KEY_ID", "minio"),
        ("AWS_SECRET_ACCESS_KEY", "minio123"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_vars(vars(&REQUIRED)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.generation.timeout_secs, 120);
        assert_eq!(config.generation.endpoint, DEFAULT_GENERATION_ENDPOINT);
        assert_eq!(config.object_store.region, "us-east-1");
        assert_eq!(config.object_store.document_url_root, DEFAULT_DOCUMENT_URL_ROOT);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_missing_required_variable_is_named() {
        let err = Config::from_vars(vars(&REQUIRED[1..])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(Config::from_vars(vars(&pairs)).is_err());
    }

    #[test]
    fn test_blank_database_url_means_memory_store() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_URL", " "));
        assert!(Config::from_vars(vars(&pairs)).unwrap().database_url.is_none());
    }
}
