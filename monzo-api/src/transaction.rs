use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{receipt::Receipt, Call, Client, Currency};

/// A single entry on an account's feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The unique ID of the transaction
    pub id: String,

    /// The account the transaction belongs to
    #[serde(default)]
    pub account_id: String,

    /// The amount, in minor units. Negative for outgoings
    pub amount: i64,

    /// The currency of the transaction
    pub currency: Currency,

    /// The description, as shown by the merchant
    #[serde(default)]
    pub description: String,

    /// Free-form notes attached by the user
    #[serde(default)]
    pub notes: String,

    /// When the transaction was created
    pub created: DateTime<Utc>,

    /// Why the transaction was declined, if it was
    #[serde(default)]
    pub decline_reason: Option<String>,

    /// Whether the transaction is a top-up
    #[serde(default)]
    pub is_load: bool,

    /// When the transaction settled, if it has
    #[serde(default, deserialize_with = "empty_as_none")]
    pub settled: Option<DateTime<Utc>>,

    /// The spending category, eg. `eating_out`
    #[serde(default)]
    pub category: String,

    /// Arbitrary key-value annotations
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// The itemised receipt attached to the transaction, if there is one
    #[serde(default, skip_serializing)]
    pub receipt: Option<Receipt>,
}

/// The API reports unsettled transactions with an empty string
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(timestamp) => DateTime::parse_from_rfc3339(timestamp)
            .map(|settled| Some(settled.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// Which slice of an account's transactions to list.
///
/// The default asks for whatever the API returns by default. The window is
/// forwarded as given; an inverted one (`since` after `before`) is left to
/// the API to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Only transactions created after this time
    pub since: Option<DateTime<Utc>>,

    /// Only transactions created before this time
    pub before: Option<DateTime<Utc>>,

    /// The maximum number of transactions to return
    pub limit: Option<u32>,
}

impl Pagination {
    fn query(self) -> Vec<(&'static str, String)> {
        let timestamp = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut query = Vec::new();
        if let Some(since) = self.since {
            query.push(("since", timestamp(since)));
        }
        if let Some(before) = self.before {
            query.push(("before", timestamp(before)));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

impl<R> Client<R> {
    /// List the transactions on an account
    pub fn transactions(
        &self,
        account_id: &str,
        pagination: Pagination,
    ) -> Call<'_, Vec<Transaction>, R> {
        let request = self
            .request(Method::GET, &["transactions"])
            .query([("account_id", account_id)])
            .query(pagination.query())
            .build();
        self.call_enveloped(request, "transactions")
    }

    /// Retrieve a single transaction
    pub fn transaction(&self, transaction_id: &str) -> Call<'_, Transaction, R> {
        let request = self
            .request(Method::GET, &["transactions", transaction_id])
            .build();
        self.call_enveloped(request, "transaction")
    }

    /// Store key-value annotations against a transaction.
    ///
    /// The pairs are sent in the order given.
    pub fn annotate_transaction<K, V>(
        &self,
        transaction_id: &str,
        metadata: impl IntoIterator<Item = (K, V)>,
    ) -> Call<'_, (), R>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let form = metadata
            .into_iter()
            .map(|(key, value)| (format!("metadata[{}]", key.as_ref()), value));

        let request = self
            .request(Method::PATCH, &["transactions", transaction_id])
            .form(form)
            .build();
        self.call_empty(request)
    }

    /// Attach a note to a transaction
    pub fn note(&self, transaction_id: &str, note: &str) -> Call<'_, (), R> {
        self.annotate_transaction(transaction_id, [("notes", note)])
    }

    /// Attach a receipt to a transaction.
    ///
    /// The receipt's transaction id is overwritten. A receipt without items
    /// fails with [`Error::Validation`](crate::Error::Validation) when the
    /// call is awaited, without sending anything.
    pub fn add_receipt(&self, transaction_id: &str, receipt: &mut Receipt) -> Call<'_, (), R> {
        receipt.set_transaction_id(transaction_id);

        let request = receipt.to_json().and_then(|document| {
            self.request(Method::PUT, &["transaction-receipts"])
                .json(document)
                .build()
        });
        self.call_empty(request)
    }
}
