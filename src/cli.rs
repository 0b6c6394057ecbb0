//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_UNSPLASH_BASE_URL,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "HOMEDESIGN_DEBUG")]
    /// Enable debug logging. Env: HOMEDESIGN_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8501", env = "HOMEDESIGN_PORT")]
    /// http listener, defaults to `8501`.
    /// Env: HOMEDESIGN_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "HOMEDESIGN_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: HOMEDESIGN_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    /// Credential for the Gemini text generation API.
    /// Env: GOOGLE_API_KEY
    pub google_api_key: Option<String>,
    #[clap(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    /// Credential for the Unsplash image search API.
    /// Env: UNSPLASH_ACCESS_KEY
    pub unsplash_access_key: Option<String>,

    #[clap(long, default_value = DEFAULT_GEMINI_MODEL, env = "HOMEDESIGN_MODEL")]
    /// Gemini model used to write design plans.
    /// Env: HOMEDESIGN_MODEL
    pub model: String,
    #[clap(long, default_value = DEFAULT_GEMINI_BASE_URL, env = "HOMEDESIGN_GEMINI_BASE_URL")]
    /// Base URL of the Gemini API.
    pub gemini_base_url: String,
    #[clap(long, default_value = DEFAULT_UNSPLASH_BASE_URL, env = "HOMEDESIGN_UNSPLASH_BASE_URL")]
    /// Base URL of the Unsplash API.
    pub unsplash_base_url: String,

    #[clap(long, default_value = "30", env = "HOMEDESIGN_REQUEST_TIMEOUT_SECS")]
    /// Upper bound for each outbound API call, in seconds. Calls are never retried.
    pub request_timeout_secs: u64,

    #[clap(long, default_value = ".", env = "HOMEDESIGN_EXPORT_DIR")]
    /// Where `design_plan.{pdf,txt,json}` are written, eg `/data/exports`.
    /// Env: HOMEDESIGN_EXPORT_DIR
    pub export_dir: PathBuf,
}
