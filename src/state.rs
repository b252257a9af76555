use std::future::IntoFuture;

use futures_util::future::{try_join, try_join_all};
use monzo_api::{Account, Balance, Client, Pot};
use tracing::instrument;

/// A snapshot of one account
#[derive(Debug)]
pub struct AccountState {
    pub account: Account,
    pub balance: Balance,
    pub pots: Vec<Pot>,
}

/// Fetch every account, along with its balance and pots.
///
/// The per-account requests are made concurrently.
#[instrument(skip(client))]
pub async fn get(client: &Client) -> monzo_api::Result<Vec<AccountState>> {
    let accounts = client.accounts().await?;
    tracing::debug!(accounts = accounts.len(), "fetched accounts");

    try_join_all(accounts.into_iter().map(|account| async move {
        let (balance, pots) = try_join(
            client.balance(&account.id).into_future(),
            client.pots(&account.id).into_future(),
        )
        .await?;

        Ok::<_, monzo_api::Error>(AccountState {
            account,
            balance,
            pots,
        })
    }))
    .await
}
