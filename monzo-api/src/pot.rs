use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{envelope, Call, Client, Currency, Error};

/// A Monzo pot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pot {
    /// The unique ID associated with the pot
    pub id: String,

    /// The name of the pot
    pub name: String,

    /// The balance of the pot, in minor units
    pub balance: i64,

    /// The currency code for this pot
    pub currency: Currency,

    /// The savings goal, in minor units, if one is set
    #[serde(default)]
    pub goal_amount: Option<i64>,

    /// The id of the current account the pot belongs to
    #[serde(default)]
    pub current_account_id: Option<String>,

    /// When the pot was created
    pub created: DateTime<Utc>,

    /// When the pot was last updated
    pub updated: DateTime<Utc>,

    /// Whether the pot has been deleted
    #[serde(default)]
    pub deleted: bool,
}

impl<R> Client<R> {
    /// List the pots belonging to a current account.
    ///
    /// Deleted pots are left out; see [`Client::all_pots`].
    pub fn pots(&self, current_account_id: &str) -> Call<'_, Vec<Pot>, R> {
        let request = self.pots_request(current_account_id);
        Call::new(self, request, |response| {
            let pots: Vec<Pot> = envelope::decode(response.body(), "pots")?;
            Ok(pots.into_iter().filter(|pot| !pot.deleted).collect())
        })
    }

    /// List the pots belonging to a current account, including deleted ones
    pub fn all_pots(&self, current_account_id: &str) -> Call<'_, Vec<Pot>, R> {
        let request = self.pots_request(current_account_id);
        self.call_enveloped(request, "pots")
    }

    /// Retrieve a single pot by id.
    ///
    /// The API can't fetch pots individually, so this searches the full
    /// listing (deleted pots included). Fails with [`Error::NotFound`] if the
    /// pot isn't there.
    pub fn pot(&self, current_account_id: &str, pot_id: &str) -> Call<'_, Pot, R> {
        let request = self.pots_request(current_account_id);
        let pot_id = pot_id.to_string();
        Call::new(self, request, move |response| {
            let pots: Vec<Pot> = envelope::decode(response.body(), "pots")?;
            pots.into_iter()
                .find(|pot| pot.id == pot_id)
                .ok_or(Error::NotFound {
                    kind: "pot",
                    id: pot_id,
                })
        })
    }

    fn pots_request(&self, current_account_id: &str) -> crate::Result<reqwest::Request> {
        self.request(Method::GET, &["pots"])
            .query([("current_account_id", current_account_id)])
            .build()
    }
}
