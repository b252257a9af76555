use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{envelope, Call, Client, Currency, Error};

/// A Monzo account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The unique ID of the account
    pub id: String,

    /// Whether the account has been closed
    #[serde(default)]
    pub closed: bool,

    /// When the account was opened
    pub created: DateTime<Utc>,

    /// A human-readable description of the account
    pub description: String,

    /// The kind of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// The currency the account is held in
    pub currency: Currency,

    /// The country the account is held in, eg. "GB"
    #[serde(default)]
    pub country_code: String,

    /// UK account number, if the account has one
    #[serde(default)]
    pub account_number: Option<String>,

    /// UK sort code, if the account has one
    #[serde(default)]
    pub sort_code: Option<String>,
}

/// The kinds of account the API knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// A legacy prepaid account. These can't be actioned meaningfully
    UkPrepaid,

    /// A current account
    UkRetail,

    /// A current account shared by two users
    UkRetailJoint,

    /// Anything this crate doesn't know about yet
    #[serde(other)]
    Unknown,
}

/// The balance of an account. All values are in minor units (eg. pence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The available balance
    pub balance: i64,

    /// The balance including money in pots
    #[serde(default)]
    pub total_balance: i64,

    /// The balance including flexible savings pots
    #[serde(default)]
    pub balance_including_flexible_savings: i64,

    /// The currency of the balance
    pub currency: Currency,

    /// The amount spent today, negative for outgoings
    #[serde(default)]
    pub spend_today: i64,
}

impl<R> Client<R> {
    /// List the accounts associated with the access token.
    ///
    /// Prepaid accounts are left out.
    pub fn accounts(&self) -> Call<'_, Vec<Account>, R> {
        let request = self.request(Method::GET, &["accounts"]).build();
        Call::new(self, request, |response| {
            let accounts = envelope::decode(response.body(), "accounts")?;
            Ok(without_prepaid(accounts))
        })
    }

    /// Retrieve a single account by id.
    ///
    /// The API can't fetch accounts individually, so this fetches the full
    /// listing and searches it. Fails with [`Error::NotFound`] if the account
    /// isn't there.
    pub fn account(&self, account_id: &str) -> Call<'_, Account, R> {
        let request = self.request(Method::GET, &["accounts"]).build();
        let account_id = account_id.to_string();
        Call::new(self, request, move |response| {
            let accounts = envelope::decode(response.body(), "accounts")?;
            without_prepaid(accounts)
                .into_iter()
                .find(|account| account.id == account_id)
                .ok_or(Error::NotFound {
                    kind: "account",
                    id: account_id,
                })
        })
    }

    /// Retrieve the balance of an account
    pub fn balance(&self, account_id: &str) -> Call<'_, Balance, R> {
        let request = self
            .request(Method::GET, &["balance"])
            .query([("account_id", account_id)])
            .build();
        Call::new(self, request, |response| {
            Ok(envelope::decode_unwrapped(response.body())?)
        })
    }
}

fn without_prepaid(accounts: Vec<Account>) -> Vec<Account> {
    accounts
        .into_iter()
        .filter(|account| account.account_type != AccountType::UkPrepaid)
        .collect()
}
