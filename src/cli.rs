//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_INSTRUCTION, DEFAULT_MODEL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "REIMAGINE_DEBUG")]
    /// Enable debug logging. Env: REIMAGINE_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "REIMAGINE_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: REIMAGINE_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "REIMAGINE_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: REIMAGINE_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// API key for the image model. Without it every generation fails.
    /// Env: GEMINI_API_KEY
    pub api_key: Option<String>,

    #[clap(long, short, default_value = DEFAULT_MODEL, env = "REIMAGINE_MODEL")]
    /// Image model identifier.
    /// Env: REIMAGINE_MODEL
    pub model: String,

    #[clap(long, default_value = DEFAULT_API_BASE_URL, env = "REIMAGINE_API_BASE_URL")]
    /// Base URL of the generative language API.
    /// Env: REIMAGINE_API_BASE_URL
    pub api_base_url: url::Url,

    #[clap(long, default_value = DEFAULT_INSTRUCTION, env = "REIMAGINE_DEFAULT_INSTRUCTION")]
    /// Instruction new sessions start with, and that a reset restores.
    /// Env: REIMAGINE_DEFAULT_INSTRUCTION
    pub default_instruction: String,
}
