use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::QrFormError;
use crate::form::{FormState, DEFAULT_DARK, DEFAULT_LIGHT, DEFAULT_TEXT};
use crate::generate::{Generator, HttpGenerator, MockGenerator};

/// Path the backend serves generation from, relative to the base URL.
pub const GENERATE_PATH: &str = "/api/generate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// POST to the configured backend
    Http,
    /// Answer locally with a placeholder image
    Mock,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "qrform", version, about = "Request styled QR codes from a generation service")]
pub struct Config {
    /// Base URL of the generation service
    #[arg(long, env = "QRFORM_API_BASE", default_value = "http://127.0.0.1:8080")]
    pub api_base: String,

    #[arg(long, value_enum, env = "QRFORM_TRANSPORT", default_value_t = Transport::Http)]
    pub transport: Transport,

    /// Simulated latency of the mock transport
    #[arg(long, default_value_t = 800)]
    pub mock_delay_ms: u64,

    #[arg(long, default_value = DEFAULT_TEXT)]
    pub text: String,

    #[arg(long, default_value = DEFAULT_DARK)]
    pub dark: String,

    #[arg(long, default_value = DEFAULT_LIGHT)]
    pub light: String,

    /// Where a downloaded image is written
    #[arg(short, long, default_value = "qrcode.png")]
    pub output: PathBuf,

    #[arg(long, env = "QRFORM_LOG_FILE", default_value = "qrform.log")]
    pub log_file: PathBuf,

    /// Submit once without the interactive form, save the image and exit
    #[arg(long)]
    pub once: bool,
}

impl Config {
    pub fn endpoint(&self) -> Result<reqwest::Url, QrFormError> {
        let base = self.api_base.trim_end_matches('/');
        let raw = format!("{base}{GENERATE_PATH}");
        reqwest::Url::parse(&raw)
            .map_err(|err| QrFormError::ConfigError(format!("invalid API base {base:?}: {err}")))
    }

    pub fn generator(&self) -> Result<Arc<dyn Generator>, QrFormError> {
        Ok(match self.transport {
            Transport::Http => Arc::new(HttpGenerator::new(self.endpoint()?)),
            Transport::Mock => Arc::new(MockGenerator::new(Duration::from_millis(
                self.mock_delay_ms,
            ))),
        })
    }

    pub fn initial_form(&self) -> FormState {
        FormState::new(&self.text, &self.dark, &self.light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["qrform"]);
        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.output, PathBuf::from("qrcode.png"));
        assert!(config.initial_form().can_submit());
    }

    #[test]
    fn endpoint_appends_generate_path() {
        let config = Config::parse_from(["qrform", "--api-base", "https://qr.example.com/"]);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://qr.example.com/api/generate"
        );
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        let config = Config::parse_from(["qrform", "--api-base", "not a url"]);
        assert!(matches!(
            config.endpoint(),
            Err(QrFormError::ConfigError(_))
        ));
    }

    #[test]
    fn mock_transport_skips_endpoint_validation() {
        let config = Config::parse_from([
            "qrform",
            "--transport",
            "mock",
            "--api-base",
            "not a url",
        ]);
        assert!(config.generator().is_ok());
    }
}
