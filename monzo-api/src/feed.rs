use reqwest::Method;

use crate::{Call, Client};

/// The API refuses feed items without an image URL. An image that can't be
/// loaded is simply not displayed.
const DEFAULT_IMAGE_URL: &str = "https://www.monzo.com/static/images/favicon.png";

/// A basic item to display in an account's feed.
///
/// Feed items created through the API can be dismissed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct FeedItem {
    title: String,
    body: String,
    image_url: String,
    background_color: Option<String>,
    title_color: Option<String>,
    body_color: Option<String>,
}

impl FeedItem {
    /// Create a feed item with a title and body text
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            background_color: None,
            title_color: None,
            body_color: None,
        }
    }

    /// Set the image shown alongside the item
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Set the background colour, as a hex string eg. "#FCF1EE"
    pub fn background_color(mut self, hex: impl Into<String>) -> Self {
        self.background_color = Some(hex.into());
        self
    }

    /// Set the colour of the title text
    pub fn title_color(mut self, hex: impl Into<String>) -> Self {
        self.title_color = Some(hex.into());
        self
    }

    /// Set the colour of the body text
    pub fn body_color(mut self, hex: impl Into<String>) -> Self {
        self.body_color = Some(hex.into());
        self
    }

    fn form<'a>(&'a self, account_id: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("account_id", account_id),
            ("type", "basic"),
            ("params[title]", self.title.as_str()),
            ("params[body]", self.body.as_str()),
            ("params[image_url]", self.image_url.as_str()),
        ];

        let colors = [
            ("params[background_color]", &self.background_color),
            ("params[title_color]", &self.title_color),
            ("params[body_color]", &self.body_color),
        ];
        form.extend(
            colors
                .into_iter()
                .filter_map(|(key, value)| value.as_deref().map(|value| (key, value))),
        );

        form
    }
}

impl<R> Client<R> {
    /// Post an item to an account's feed
    pub fn add_feed_item(&self, account_id: &str, item: &FeedItem) -> Call<'_, (), R> {
        let request = self
            .request(Method::POST, &["feed"])
            .form(item.form(account_id))
            .build();
        self.call_empty(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeTransport;

    #[test]
    fn defaults_the_image_and_skips_unset_colors() {
        let item = FeedItem::new("Hello", "World");

        assert_eq!(
            item.form("acc_1"),
            [
                ("account_id", "acc_1"),
                ("type", "basic"),
                ("params[title]", "Hello"),
                ("params[body]", "World"),
                ("params[image_url]", DEFAULT_IMAGE_URL),
            ]
        );
    }

    #[test]
    fn only_set_colors_are_sent() {
        let item = FeedItem::new("Hello", "World")
            .image("https://example.com/icon.png")
            .title_color("#333333");

        let form = item.form("acc_1");

        assert!(form.contains(&("params[image_url]", "https://example.com/icon.png")));
        assert!(form.contains(&("params[title_color]", "#333333")));
        assert!(!form.iter().any(|(key, _)| *key == "params[background_color]"));
        assert!(!form.iter().any(|(key, _)| *key == "params[body_color]"));
    }

    #[tokio::test]
    async fn posts_to_the_feed() {
        let client = Client::builder("TOKEN")
            .transport(FakeTransport::default().respond(200, "{}"))
            .build();
        let item = FeedItem::new("Saved!", "You saved £5 today").background_color("#FCF1EE");

        client.add_feed_item("acc_1", &item).await.unwrap();

        let request = &client.transport().requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://api.monzo.com/feed");
        assert!(request.body.starts_with("account_id=acc_1&type=basic&params%5Btitle%5D=Saved%21"));
        assert!(request
            .body
            .ends_with("&params%5Bbackground_color%5D=%23FCF1EE"));
    }
}
