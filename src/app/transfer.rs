use clap::Parser;
use monzo_api::{ActionKind, Client, DedupeId};
use tracing::instrument;

#[derive(Debug, Parser)]
pub struct Transfer {
    /// The current account money moves from or to
    account_id: String,

    /// The pot money moves into or out of
    pot_id: String,

    /// The amount, in minor units (eg. pence)
    amount: u32,

    /// Reuse the key of an earlier attempt, so that retrying can't move the
    /// money twice
    #[arg(long)]
    dedupe_id: Option<DedupeId>,
}

impl Transfer {
    #[instrument(skip(self, client), fields(pot_id = %self.pot_id, amount = self.amount))]
    pub async fn run(self, client: &Client, kind: ActionKind) -> monzo_api::Result<()> {
        let dedupe_id = self.dedupe_id.unwrap_or_default();

        let mut action = match kind {
            ActionKind::Deposit => {
                client.deposit_with_id(&self.account_id, &self.pot_id, self.amount, dedupe_id)
            }
            ActionKind::Withdrawal => {
                client.withdraw_with_id(&self.account_id, &self.pot_id, self.amount, dedupe_id)
            }
        }?;

        // printed up front so a failed attempt can be retried with the same key
        println!("dedupe id: {}", action.dedupe_id());

        action.execute(client).await?;
        println!("{kind} of {} complete", self.amount);
        Ok(())
    }
}
