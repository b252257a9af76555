use clap::Subcommand;
use monzo_api::Client;

#[derive(Debug, Subcommand)]
pub enum Webhooks {
    /// List the webhooks registered against an account
    List {
        /// The account to list webhooks for
        account_id: String,
    },

    /// Deliver an account's events to a URL
    Register {
        /// The account to register the webhook against
        account_id: String,

        /// Where events are delivered
        url: String,
    },
}

impl Webhooks {
    pub async fn run(self, client: &Client) -> monzo_api::Result<()> {
        match self {
            Self::List { account_id } => {
                for webhook in client.webhooks(&account_id).await? {
                    println!("{}  {}", webhook.id, webhook.url);
                }
            }
            Self::Register { account_id, url } => {
                let webhook = client.register_webhook(&account_id, &url).await?;
                println!("registered {}", webhook.id);
            }
        }
        Ok(())
    }
}
