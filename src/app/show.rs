use clap::Parser;
use monzo_api::Client;

use super::format_money;
use crate::state;

pub async fn whoami(client: &Client) -> monzo_api::Result<()> {
    let whoami = client.whoami().await?;
    println!(
        "user: {}\nclient: {}\nauthenticated: {}",
        whoami.user_id, whoami.client_id, whoami.authenticated
    );
    Ok(())
}

pub async fn accounts(client: &Client) -> monzo_api::Result<()> {
    for account in client.accounts().await? {
        let status = if account.closed { " (closed)" } else { "" };
        println!("{}  {}{}", account.id, account.description, status);
    }
    Ok(())
}

#[derive(Debug, Parser)]
pub struct Balance {
    /// The account to query
    account_id: String,
}

impl Balance {
    pub async fn run(self, client: &Client) -> monzo_api::Result<()> {
        let balance = client.balance(&self.account_id).await?;
        println!(
            "balance: {}\ntotal (including pots): {}\nspent today: {}",
            format_money(balance.balance, &balance.currency),
            format_money(balance.total_balance, &balance.currency),
            format_money(balance.spend_today, &balance.currency),
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Pots {
    /// The current account the pots belong to
    account_id: String,

    /// Include deleted pots
    #[arg(long)]
    all: bool,
}

impl Pots {
    pub async fn run(self, client: &Client) -> monzo_api::Result<()> {
        let pots = if self.all {
            client.all_pots(&self.account_id).await?
        } else {
            client.pots(&self.account_id).await?
        };

        for pot in pots {
            let deleted = if pot.deleted { " (deleted)" } else { "" };
            println!(
                "{}  {}: {}{}",
                pot.id,
                pot.name,
                format_money(pot.balance, &pot.currency),
                deleted
            );
        }
        Ok(())
    }
}

pub async fn summary(client: &Client) -> monzo_api::Result<()> {
    for state in state::get(client).await? {
        let currency = &state.balance.currency;
        println!(
            "{} ({}): {}",
            state.account.description,
            state.account.id,
            format_money(state.balance.balance, currency)
        );
        for pot in &state.pots {
            println!("  {}: {}", pot.name, format_money(pot.balance, &pot.currency));
        }
    }
    Ok(())
}
