use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use monzo_api::{ActionKind, Client, Currency};

use crate::{config, logging, Error};

mod auth;
mod feed;
mod show;
mod transactions;
mod transfer;
mod webhooks;

/// Command line access to the Monzo API
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct App {
    /// The access token to authenticate with. Overrides the stored token
    #[arg(
        long,
        short = 't',
        global = true,
        env = "MONZO_ACCESS_TOKEN",
        hide_env_values = true
    )]
    access_token: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store an access token for later use
    Auth(auth::Auth),

    #[command(flatten)]
    Api(ApiCommand),
}

/// Commands which talk to the API
#[derive(Debug, Subcommand)]
enum ApiCommand {
    /// Check which user the access token belongs to
    Whoami,

    /// List accounts
    Accounts,

    /// Show the balance of an account
    Balance(show::Balance),

    /// List the pots of an account
    Pots(show::Pots),

    /// Show every account with its balance and pots
    Summary,

    /// List the transactions on an account
    Transactions(transactions::List),

    /// Attach a note to a transaction
    Note(transactions::Note),

    /// Move money from an account into a pot
    Deposit(transfer::Transfer),

    /// Move money from a pot back into an account
    Withdraw(transfer::Transfer),

    /// Post an item to an account's feed
    Feed(feed::Feed),

    /// Manage webhooks
    #[command(subcommand)]
    Webhooks(webhooks::Webhooks),
}

impl App {
    pub fn from_cli() -> Self {
        Self::parse()
    }

    pub async fn run(self) -> Result<(), Error> {
        logging::set_up(self.verbose);

        let mut config = config::load()?;
        tracing::debug!(timeout_secs = ?config.timeout_secs, "loaded config");

        match self.command {
            Command::Auth(auth) => auth.run(&mut config),
            Command::Api(command) => {
                let client = connect(self.access_token.as_deref(), &config)?;
                command.run(&client).await
            }
        }
    }
}

impl ApiCommand {
    async fn run(self, client: &Client) -> Result<(), Error> {
        match self {
            Self::Whoami => show::whoami(client).await?,
            Self::Accounts => show::accounts(client).await?,
            Self::Balance(balance) => balance.run(client).await?,
            Self::Pots(pots) => pots.run(client).await?,
            Self::Summary => show::summary(client).await?,
            Self::Transactions(list) => list.run(client).await?,
            Self::Note(note) => note.run(client).await?,
            Self::Deposit(transfer) => transfer.run(client, ActionKind::Deposit).await?,
            Self::Withdraw(transfer) => transfer.run(client, ActionKind::Withdrawal).await?,
            Self::Feed(feed) => feed.run(client).await?,
            Self::Webhooks(webhooks) => webhooks.run(client).await?,
        }

        Ok(())
    }
}

fn connect(access_token: Option<&str>, config: &config::Config) -> Result<Client, Error> {
    let access_token = access_token
        .or_else(|| config.access_token())
        .ok_or(Error::MissingToken)?;

    let mut builder = Client::builder(access_token);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build())
}

/// Format an amount in minor units, eg. `-350` GBP as "-£3.50"
pub fn format_money(amount: i64, currency: &Currency) -> String {
    match rusty_money::iso::find(currency.code()) {
        Some(iso) => rusty_money::Money::from_minor(amount, iso).to_string(),
        None => format!("{amount} {currency}"),
    }
}
