use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{Call, Client};

/// An endpoint that the API sends account events to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// The unique ID of the webhook
    pub id: String,

    /// The account whose events are delivered
    pub account_id: String,

    /// Where the events are delivered
    pub url: String,
}

impl<R> Client<R> {
    /// List the webhooks registered against an account
    pub fn webhooks(&self, account_id: &str) -> Call<'_, Vec<Webhook>, R> {
        let request = self
            .request(Method::GET, &["webhooks"])
            .query([("account_id", account_id)])
            .build();
        self.call_enveloped(request, "webhooks")
    }

    /// Ask the API to deliver an account's events to `url`
    pub fn register_webhook(&self, account_id: &str, url: &str) -> Call<'_, Webhook, R> {
        let request = self
            .request(Method::POST, &["webhooks"])
            .form([("account_id", account_id), ("url", url)])
            .build();
        self.call_enveloped(request, "webhook")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeTransport;

    #[tokio::test]
    async fn register_and_list() {
        let transport = FakeTransport::default()
            .respond(
                200,
                r#"{"webhook": {"id": "webhook_1", "account_id": "acc_1", "url": "https://example.com/hook"}}"#,
            )
            .respond(
                200,
                r#"{"webhooks": [{"id": "webhook_1", "account_id": "acc_1", "url": "https://example.com/hook"}]}"#,
            );
        let client = Client::builder("TOKEN").transport(transport).build();

        let created = client
            .register_webhook("acc_1", "https://example.com/hook")
            .await
            .unwrap();
        let listed = client.webhooks("acc_1").await.unwrap();

        assert_eq!(listed, [created]);

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(
            requests[0].body,
            "account_id=acc_1&url=https%3A%2F%2Fexample.com%2Fhook"
        );
        assert_eq!(
            requests[1].url,
            "https://api.monzo.com/webhooks?account_id=acc_1"
        );
    }
}
