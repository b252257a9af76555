//! An async client for the Monzo banking API.
//!
//! Every operation is a method on [`Client`] which returns a [`Call`]. The
//! request is built straight away, but nothing is sent until the call is
//! awaited.
//!
//! ```no_run
//! # async fn run() -> monzo_api::Result<()> {
//! let client = monzo_api::Client::new("ACCESS_TOKEN");
//!
//! for account in client.accounts().await? {
//!     let balance = client.balance(&account.id).await?;
//!     println!("{}: {}", account.description, balance.balance);
//!
//!     for pot in client.pots(&account.id).await? {
//!         println!("  {}: {}", pot.name, pot.balance);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Moving money between a current account and a pot goes through a
//! [`PendingAction`], which carries an idempotency key so that it can be
//! safely retried.

#![deny(clippy::all, missing_debug_implementations, missing_docs)]
#![warn(missing_copy_implementations, clippy::pedantic)]

mod account;
pub use account::{Account, AccountType, Balance};
mod action;
pub use action::{ActionKind, DedupeId, PendingAction};
mod client;
pub use client::{
    Call, CallOptions, Client, ClientBuilder, RequestBuilder, Response, Transport, WhoAmI,
    API_BASE,
};
mod currency;
pub use currency::Currency;
pub mod envelope;
mod error;
pub use error::{DecodeError, Error, Result};
mod feed;
pub use feed::FeedItem;
mod pot;
pub use pot::Pot;
pub mod receipt;
mod transaction;
pub use transaction::{Pagination, Transaction};
mod webhook;
pub use webhook::Webhook;

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod test_support;
