use clap::Parser;
use monzo_api::{Client, FeedItem};

#[derive(Debug, Parser)]
pub struct Feed {
    /// The account whose feed the item is posted to
    account_id: String,

    /// The title of the item
    title: String,

    /// The body text of the item
    body: String,

    /// URL of an image to show alongside the item
    #[arg(long)]
    image: Option<String>,

    /// Background colour, as a hex string
    #[arg(long)]
    background_color: Option<String>,

    /// Title text colour, as a hex string
    #[arg(long)]
    title_color: Option<String>,

    /// Body text colour, as a hex string
    #[arg(long)]
    body_color: Option<String>,
}

impl Feed {
    fn item(&self) -> FeedItem {
        let mut item = FeedItem::new(&self.title, &self.body);
        if let Some(image) = &self.image {
            item = item.image(image);
        }
        if let Some(color) = &self.background_color {
            item = item.background_color(color);
        }
        if let Some(color) = &self.title_color {
            item = item.title_color(color);
        }
        if let Some(color) = &self.body_color {
            item = item.body_color(color);
        }
        item
    }

    pub async fn run(self, client: &Client) -> monzo_api::Result<()> {
        client.add_feed_item(&self.account_id, &self.item()).await
    }
}
