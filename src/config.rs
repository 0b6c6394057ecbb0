//! Config handling

use std::path::PathBuf;
use std::time::Duration;

use tracing::log::LevelFilter;

use crate::cli::CliOptions;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Settings for the outbound API calls and the exporter, built once at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Gemini API key, `None` when `GOOGLE_API_KEY` is unset.
    pub google_api_key: Option<String>,
    /// Unsplash access key, `None` when `UNSPLASH_ACCESS_KEY` is unset.
    pub unsplash_access_key: Option<String>,
    /// Gemini model identifier.
    pub model: String,
    /// Gemini API base URL, no trailing slash.
    pub gemini_base_url: String,
    /// Unsplash API base URL, no trailing slash.
    pub unsplash_base_url: String,
    /// Timeout applied to every outbound call.
    pub request_timeout: Duration,
    /// Directory the export artifacts are written to.
    pub export_dir: PathBuf,
}

// Keys stay out of debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "***"))
            .field(
                "unsplash_access_key",
                &self.unsplash_access_key.as_ref().map(|_| "***"),
            )
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("unsplash_base_url", &self.unsplash_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}

impl From<&CliOptions> for AppConfig {
    fn from(cli: &CliOptions) -> Self {
        Self {
            google_api_key: non_empty(cli.google_api_key.as_deref()),
            unsplash_access_key: non_empty(cli.unsplash_access_key.as_deref()),
            model: cli.model.clone(),
            gemini_base_url: cli.gemini_base_url.trim_end_matches('/').to_string(),
            unsplash_base_url: cli.unsplash_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            export_dir: cli.export_dir.clone(),
        }
    }
}

impl AppConfig {
    /// Builds the shared HTTP client with the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
