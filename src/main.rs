#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]

mod app;
use confy::ConfyError;
mod config;
mod logging;
mod state;

use app::App;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config")]
    Config(#[from] ConfyError),

    #[error(transparent)]
    Monzo(#[from] monzo_api::Error),

    #[error("no access token configured. Run `monzo auth <ACCESS_TOKEN>` or pass --access-token")]
    MissingToken,
}

#[tokio::main]
async fn main() {
    let app = App::from_cli();

    if let Err(e) = app.run().await {
        eprintln!("{}", report(&e));
        std::process::exit(1);
    }
}

/// The error followed by each of its causes
fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
