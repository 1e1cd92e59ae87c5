//! Application configuration read from the environment
use photocast_core::{CompressionSpec, ExecutionContext, PhotocastError, MAX_BATCH_SIZE};
use photocast_immich::ImmichConfig;
use photocast_telegram::TelegramConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub immich_api_url: String,
    pub immich_api_key: String,
    /// Web UI root used for per-photo links
    pub immich_public_url: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub temp_dir: PathBuf,
    pub batch_size: usize,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub transform_concurrency: usize,
    pub http_timeout: Duration,
    pub test_image: PathBuf,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, PhotocastError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, PhotocastError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| PhotocastError::ConfigurationMissing(key.into()));

        let immich_api_url = required("IMMICH_API_URL")?;
        let immich_public_url = get("IMMICH_PUBLIC_URL")
            .unwrap_or_else(|| default_public_url(&immich_api_url));

        let batch_size: usize = parse_or(&get, "PHOTOCAST_BATCH_SIZE", MAX_BATCH_SIZE)?;
        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(invalid(
                "PHOTOCAST_BATCH_SIZE",
                format!("must be between 1 and {}", MAX_BATCH_SIZE),
            ));
        }
        let jpeg_quality: u8 = parse_or(&get, "PHOTOCAST_JPEG_QUALITY", 90)?;
        if jpeg_quality == 0 || jpeg_quality > 100 {
            return Err(invalid("PHOTOCAST_JPEG_QUALITY", "must be between 1 and 100".into()));
        }
        let max_dimension: u32 = parse_or(&get, "PHOTOCAST_MAX_DIMENSION", 1920)?;
        if max_dimension == 0 {
            return Err(invalid("PHOTOCAST_MAX_DIMENSION", "must be positive".into()));
        }
        let transform_concurrency: usize = parse_or(&get, "PHOTOCAST_TRANSFORM_CONCURRENCY", 4)?;
        if transform_concurrency == 0 {
            return Err(invalid("PHOTOCAST_TRANSFORM_CONCURRENCY", "must be at least 1".into()));
        }

        Ok(Self {
            port: parse_or(&get, "PORT", 3000)?,
            immich_api_url,
            immich_api_key: required("IMMICH_API_KEY")?,
            immich_public_url,
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            temp_dir: get("PHOTOCAST_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./temp")),
            batch_size,
            max_dimension,
            jpeg_quality,
            transform_concurrency,
            http_timeout: Duration::from_secs(parse_or(&get, "PHOTOCAST_HTTP_TIMEOUT_SECS", 60)?),
            test_image: get("PHOTOCAST_TEST_IMAGE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("test/images/test-image.jpg")),
        })
    }

    /// Fresh per-run context with a new trace id
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new(&self.temp_dir, &self.immich_public_url)
            .with_compression(CompressionSpec::new(self.max_dimension, self.jpeg_quality))
            .with_transform_concurrency(self.transform_concurrency)
    }

    pub fn immich(&self) -> ImmichConfig {
        ImmichConfig {
            api_url: self.immich_api_url.clone(),
            api_key: self.immich_api_key.clone(),
            timeout: self.http_timeout,
        }
    }

    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: self.telegram_bot_token.clone(),
            chat_id: self.telegram_chat_id.clone(),
            api_url: None,
        }
    }
}

fn default_public_url(api_url: &str) -> String {
    let trimmed = api_url.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
}

fn invalid(key: &str, reason: String) -> PhotocastError {
    PhotocastError::InvalidConfiguration {
        key: key.into(),
        reason,
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, PhotocastError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| invalid(key, format!("{:?}: {}", raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut env: HashMap<String, String> = [
            ("IMMICH_API_URL", "https://photos.example.org/api"),
            ("IMMICH_API_KEY", "key"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-100123"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            env.insert(k.to_string(), v.to_string());
        }
        move |key| env.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.immich_public_url, "https://photos.example.org");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_dimension, 1920);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.transform_concurrency, 4);
        assert_eq!(config.http_timeout, Duration::from_secs(60));
        assert_eq!(config.temp_dir, PathBuf::from("./temp"));
    }

    #[test]
    fn test_missing_required_value() {
        let err = AppConfig::from_lookup(lookup(&[("TELEGRAM_CHAT_ID", "  ")])).unwrap_err();
        assert!(matches!(err, PhotocastError::ConfigurationMissing(key) if key == "TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn test_out_of_range_values() {
        for (key, value) in [
            ("PHOTOCAST_BATCH_SIZE", "11"),
            ("PHOTOCAST_BATCH_SIZE", "0"),
            ("PHOTOCAST_JPEG_QUALITY", "101"),
            ("PHOTOCAST_TRANSFORM_CONCURRENCY", "0"),
            ("PORT", "http"),
        ] {
            let err = AppConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(
                matches!(&err, PhotocastError::InvalidConfiguration { key: k, .. } if k == key),
                "{} = {} gave {}",
                key,
                value,
                err
            );
        }
    }

    #[test]
    fn test_explicit_public_url_and_context() {
        let config = AppConfig::from_lookup(lookup(&[
            ("IMMICH_PUBLIC_URL", "https://gallery.example.org/"),
            ("PHOTOCAST_MAX_DIMENSION", "1280"),
        ]))
        .unwrap();
        let ctx = config.execution_context();
        assert_eq!(ctx.asset_url("a1"), "https://gallery.example.org/photos/a1");
        assert_eq!(ctx.compression.max_dimension_px, 1280);
        assert_ne!(config.execution_context().trace_id, ctx.trace_id);
    }
}
