use serde::{Deserialize, Serialize};

static BIN_NAME: &str = std::env!("CARGO_PKG_NAME");

/// The placeholder written to a freshly created config file
const PLACEHOLDER_TOKEN: &str = "ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub access_token: String,

    /// Default request timeout, in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// The stored token, unless it is still the placeholder
    pub fn access_token(&self) -> Option<&str> {
        Some(self.access_token.as_str())
            .filter(|token| !token.is_empty() && *token != PLACEHOLDER_TOKEN)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: PLACEHOLDER_TOKEN.to_string(),
            timeout_secs: Some(30),
        }
    }
}

pub fn load() -> Result<Config, confy::ConfyError> {
    confy::load(BIN_NAME, "config")
}

pub fn store(config: &Config) -> Result<(), confy::ConfyError> {
    confy::store(BIN_NAME, "config", config)
}
