use clap::Parser;

use crate::{config, config::Config, Error};

#[derive(Debug, Parser)]
pub struct Auth {
    /// The access token to store
    access_token: String,

    /// Default request timeout, in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Auth {
    pub fn run(self, config: &mut Config) -> Result<(), Error> {
        config.access_token = self.access_token;
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }

        config::store(config)?;
        tracing::info!("access token stored");
        Ok(())
    }
}
