use chrono::{DateTime, Utc};
use clap::Parser;
use monzo_api::{Client, Pagination};

use super::format_money;

#[derive(Debug, Parser)]
pub struct List {
    /// The account to list transactions for
    account_id: String,

    /// Only transactions created after this time (RFC 3339)
    #[arg(long)]
    since: Option<DateTime<Utc>>,

    /// Only transactions created before this time (RFC 3339)
    #[arg(long)]
    before: Option<DateTime<Utc>>,

    /// The maximum number of transactions to list
    #[arg(long)]
    limit: Option<u32>,
}

impl List {
    fn pagination(&self) -> Pagination {
        Pagination {
            since: self.since,
            before: self.before,
            limit: self.limit,
        }
    }

    pub async fn run(self, client: &Client) -> monzo_api::Result<()> {
        let transactions = client
            .transactions(&self.account_id, self.pagination())
            .await?;

        for transaction in transactions {
            let pending = if transaction.settled.is_none() { " (pending)" } else { "" };
            println!(
                "{}  {}  {}: {}{}",
                transaction.created.format("%Y-%m-%d %H:%M"),
                transaction.id,
                transaction.description,
                format_money(transaction.amount, &transaction.currency),
                pending,
            );
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Note {
    /// The transaction to annotate
    transaction_id: String,

    /// The note to attach
    text: String,
}

impl Note {
    pub async fn run(self, client: &Client) -> monzo_api::Result<()> {
        client.note(&self.transaction_id, &self.text).await
    }
}
