//! Deposits into and withdrawals from pots.
//!
//! Moving money is split in two steps. Constructing a [`PendingAction`]
//! builds the request and assigns it a [`DedupeId`]; executing it sends the
//! request. The API ignores repeated submissions carrying the same key, so a
//! failed execution can be retried, or the key persisted and reused by a
//! later process, without moving the money twice.

use std::{convert::Infallible, fmt, str::FromStr};

use reqwest::{Method, Request};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{CallOptions, Client, Error, Result, Transport};

/// An idempotency key for a pot transfer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupeId(String);

impl DedupeId {
    /// Generate a fresh, random key
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The key as sent to the API
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DedupeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for DedupeId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl FromStr for DedupeId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for DedupeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The direction money moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// From a current account into a pot
    Deposit,

    /// From a pot back into a current account
    Withdrawal,
}

impl ActionKind {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdraw",
        }
    }

    fn account_field(self) -> &'static str {
        match self {
            Self::Deposit => "source_account_id",
            Self::Withdrawal => "destination_account_id",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("deposit"),
            Self::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

#[derive(Debug)]
enum State {
    Constructed(Box<Request>),
    Executed,
}

/// A pot transfer which has been prepared but not necessarily sent.
///
/// Create one with [`Client::deposit`] or [`Client::withdraw`], then call
/// [`PendingAction::execute`].
#[derive(Debug)]
pub struct PendingAction {
    kind: ActionKind,
    pot_id: String,
    account_id: String,
    amount: u32,
    dedupe_id: DedupeId,
    state: State,
}

impl PendingAction {
    /// Whether money is moving into or out of the pot
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// The pot being deposited into or withdrawn from
    #[must_use]
    pub fn pot_id(&self) -> &str {
        &self.pot_id
    }

    /// The current account on the other side of the transfer
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The amount to move, in minor units
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// The idempotency key attached to the request
    #[must_use]
    pub fn dedupe_id(&self) -> &DedupeId {
        &self.dedupe_id
    }

    /// Whether the action has already been executed successfully
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self.state, State::Executed)
    }

    /// The request that will be sent, or `None` once executed
    #[must_use]
    pub fn request(&self) -> Option<&Request> {
        match &self.state {
            State::Constructed(request) => Some(request.as_ref()),
            State::Executed => None,
        }
    }

    /// Send the transfer.
    ///
    /// The request was built when the action was created, so it carries the
    /// access token and base URL of the constructing client. `client` only
    /// supplies the transport and its default timeout.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Logic`] if the action has already been executed,
    /// in which case nothing is sent. Transport, status and cancellation
    /// errors leave the action unexecuted with the same key, so it may be
    /// retried.
    pub async fn execute<R>(&mut self, client: &Client<R>) -> Result<()>
    where
        R: Transport + Sync,
    {
        self.execute_with(client, CallOptions::default()).await
    }

    /// Send the transfer with a deadline and/or cancellation token.
    ///
    /// # Errors
    ///
    /// As for [`PendingAction::execute`].
    #[instrument(
        skip(self, client, options),
        fields(
            kind = %self.kind,
            pot_id = %self.pot_id,
            amount = self.amount,
            dedupe_id = %self.dedupe_id,
        )
    )]
    pub async fn execute_with<R>(&mut self, client: &Client<R>, options: CallOptions) -> Result<()>
    where
        R: Transport + Sync,
    {
        let State::Constructed(request) = &self.state else {
            return Err(Error::Logic(format!(
                "{} {} has already been executed",
                self.kind, self.dedupe_id
            )));
        };

        let request = request
            .try_clone()
            .ok_or_else(|| Error::Construction("request body cannot be resent".to_string()))?;

        client.dispatch(request, &options).await?;

        tracing::info!("transfer complete");
        self.state = State::Executed;
        Ok(())
    }
}

impl<R> Client<R> {
    /// Prepare a deposit of `amount` minor units from a current account into
    /// a pot, with a freshly generated key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the request cannot be built.
    pub fn deposit(
        &self,
        source_account_id: &str,
        pot_id: &str,
        amount: u32,
    ) -> Result<PendingAction> {
        self.deposit_with_id(source_account_id, pot_id, amount, DedupeId::new())
    }

    /// Prepare a deposit reusing an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the request cannot be built.
    pub fn deposit_with_id(
        &self,
        source_account_id: &str,
        pot_id: &str,
        amount: u32,
        dedupe_id: DedupeId,
    ) -> Result<PendingAction> {
        self.pending_action(ActionKind::Deposit, source_account_id, pot_id, amount, dedupe_id)
    }

    /// Prepare a withdrawal of `amount` minor units from a pot into a
    /// current account, with a freshly generated key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the request cannot be built.
    pub fn withdraw(
        &self,
        destination_account_id: &str,
        pot_id: &str,
        amount: u32,
    ) -> Result<PendingAction> {
        self.withdraw_with_id(destination_account_id, pot_id, amount, DedupeId::new())
    }

    /// Prepare a withdrawal reusing an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the request cannot be built.
    pub fn withdraw_with_id(
        &self,
        destination_account_id: &str,
        pot_id: &str,
        amount: u32,
        dedupe_id: DedupeId,
    ) -> Result<PendingAction> {
        self.pending_action(
            ActionKind::Withdrawal,
            destination_account_id,
            pot_id,
            amount,
            dedupe_id,
        )
    }

    fn pending_action(
        &self,
        kind: ActionKind,
        account_id: &str,
        pot_id: &str,
        amount: u32,
        dedupe_id: DedupeId,
    ) -> Result<PendingAction> {
        if account_id.is_empty() {
            return Err(Error::Construction(format!(
                "{kind} requires a current account id"
            )));
        }

        let amount_field = amount.to_string();
        let request = self
            .request(Method::PUT, &["pots", pot_id, kind.endpoint()])
            .form([
                (kind.account_field(), account_id),
                ("amount", amount_field.as_str()),
                ("dedupe_id", dedupe_id.as_str()),
            ])
            .build()?;

        Ok(PendingAction {
            kind,
            pot_id: pot_id.to_string(),
            account_id: account_id.to_string(),
            amount,
            dedupe_id,
            state: State::Constructed(Box::new(request)),
        })
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::test_support::FakeTransport;

    const POT: &str = r#"{
        "id": "pot_1",
        "name": "Savings",
        "balance": 1500,
        "currency": "GBP",
        "created": "2018-01-01T00:00:00Z",
        "updated": "2018-01-02T00:00:00Z",
        "deleted": false
    }"#;

    fn client(transport: FakeTransport) -> Client<FakeTransport> {
        Client::builder("TOKEN").transport(transport).build()
    }

    #[test]
    fn identical_arguments_get_distinct_keys() {
        let client = Client::new("TOKEN");

        let first = client.deposit("acc_1", "pot_1", 100).unwrap();
        let second = client.deposit("acc_1", "pot_1", 100).unwrap();

        assert_ne!(first.dedupe_id(), second.dedupe_id());
    }

    #[test_case(ActionKind::Deposit, "https://api.monzo.com/pots/pot_1/deposit", "source_account_id" ; "deposit")]
    #[test_case(ActionKind::Withdrawal, "https://api.monzo.com/pots/pot_1/withdraw", "destination_account_id" ; "withdrawal")]
    fn builds_form_request(kind: ActionKind, url: &str, account_field: &str) {
        let client = Client::new("TOKEN");
        let dedupe_id = DedupeId::from("key-1".to_string());

        let action = match kind {
            ActionKind::Deposit => client.deposit_with_id("acc_1", "pot_1", 250, dedupe_id),
            ActionKind::Withdrawal => client.withdraw_with_id("acc_1", "pot_1", 250, dedupe_id),
        }
        .unwrap();

        let request = action.request().unwrap();
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.url().as_str(), url);
        assert_eq!(
            crate::test_support::body_text(request),
            format!("{account_field}=acc_1&amount=250&dedupe_id=key-1")
        );
        assert_eq!(action.kind(), kind);
        assert!(!action.is_executed());
    }

    #[test_case("", "pot_1" ; "empty account")]
    #[test_case("acc_1", "" ; "empty pot")]
    fn construction_errors(account_id: &str, pot_id: &str) {
        let client = Client::new("TOKEN");

        let err = client.withdraw(account_id, pot_id, 1).unwrap_err();

        assert!(matches!(err, Error::Construction(_)));
    }

    #[tokio::test]
    async fn second_execute_is_rejected_without_a_request() {
        let client = client(FakeTransport::default().respond(200, POT));
        let mut action = client.deposit("acc_1", "pot_1", 100).unwrap();

        action.execute(&client).await.unwrap();
        assert!(action.is_executed());
        assert!(action.request().is_none());

        let err = action.execute(&client).await.unwrap_err();

        assert!(matches!(err, Error::Logic(_)));
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn failed_execute_can_be_retried_with_the_same_key() {
        let client = client(
            FakeTransport::default()
                .respond(500, "internal error")
                .respond(200, POT),
        );
        let mut action = client.withdraw("acc_1", "pot_1", 100).unwrap();

        let err = action.execute(&client).await.unwrap_err();
        assert!(matches!(err, Error::Status { .. }));
        assert!(!action.is_executed());

        action.execute(&client).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, requests[1].body);
        assert!(requests[0]
            .body
            .ends_with(&format!("dedupe_id={}", action.dedupe_id())));
    }

    #[tokio::test]
    async fn transport_failure_leaves_the_action_retryable() {
        let unreachable = client(FakeTransport::default().fail());
        let mut action = unreachable.deposit("acc_1", "pot_1", 100).unwrap();
        let dedupe_id = action.dedupe_id().clone();

        let err = action.execute(&unreachable).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!action.is_executed());
        assert!(action.request().is_some());

        let reachable = client(FakeTransport::default().respond(200, POT));
        action.execute(&reachable).await.unwrap();

        assert!(action.is_executed());
        assert_eq!(action.dedupe_id(), &dedupe_id);
        assert_eq!(
            unreachable.transport().requests()[0].body,
            reachable.transport().requests()[0].body
        );
    }

    #[tokio::test]
    async fn execute_keeps_the_constructing_clients_credentials() {
        let constructing = Client::builder("FIRST")
            .base_url("http://first.example/")
            .transport(FakeTransport::default())
            .build();
        let mut action = constructing.withdraw("acc_1", "pot_1", 100).unwrap();

        let executing = Client::builder("SECOND")
            .transport(FakeTransport::default().respond(200, POT))
            .build();
        action.execute(&executing).await.unwrap();

        let request = &executing.transport().requests()[0];
        assert_eq!(request.authorization.as_deref(), Some("Bearer FIRST"));
        assert_eq!(request.url, "http://first.example/pots/pot_1/withdraw");
        assert!(constructing.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn cancelled_execute_stays_pending() {
        let client = client(FakeTransport::default().hang());
        let mut action = client.deposit("acc_1", "pot_1", 100).unwrap();

        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let err = action
            .execute_with(&client, CallOptions::default().cancel_on(token))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert!(!action.is_executed());
    }

    #[test]
    fn persisted_key_is_reused() {
        let client = Client::new("TOKEN");
        let original = client.deposit("acc_1", "pot_1", 100).unwrap();

        let persisted = original.dedupe_id().to_string();
        let restored: DedupeId = persisted.parse().unwrap();
        let replayed = client.deposit_with_id("acc_1", "pot_1", 100, restored).unwrap();

        assert_eq!(replayed.dedupe_id(), original.dedupe_id());
        assert_eq!(
            crate::test_support::body_text(replayed.request().unwrap()),
            crate::test_support::body_text(original.request().unwrap()),
        );
    }

    #[test]
    fn generated_keys_are_uuids() {
        let key = DedupeId::new();
        assert!(Uuid::parse_str(key.as_str()).is_ok());
    }
}
