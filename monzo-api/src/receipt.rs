//! Itemised receipts attached to transactions.
//!
//! ```
//! use monzo_api::{receipt::{Item, Receipt}, Currency};
//!
//! let mut coffee = Item::new("Coffee", 350, Currency::Gbp);
//! coffee.add_sub_item(monzo_api::receipt::SubItem::new("Oat milk", 0, Currency::Gbp));
//!
//! let mut receipt = Receipt::new("till-0042");
//! receipt.add_items([coffee]);
//! assert_eq!(receipt.total(), Some(350));
//! ```

use serde::{Deserialize, Serialize};

use crate::{Currency, Error, Result};

/// A line on a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    description: String,
    #[serde(default = "one")]
    quantity: u32,
    #[serde(default = "unit")]
    unit: String,
    amount: i64,
    currency: Currency,
    #[serde(default)]
    sub_items: Vec<SubItem>,
}

fn one() -> u32 {
    1
}

fn unit() -> String {
    "unit".to_string()
}

impl Item {
    /// A single unit of something costing `amount` minor units
    pub fn new(description: impl Into<String>, amount: i64, currency: Currency) -> Self {
        Self {
            description: description.into(),
            quantity: one(),
            unit: unit(),
            amount,
            currency,
            sub_items: Vec::new(),
        }
    }

    /// How many units were bought
    pub fn set_quantity(&mut self, quantity: u32) -> &mut Self {
        self.quantity = quantity;
        self
    }

    /// What the quantity is measured in, eg. "kg"
    pub fn set_unit(&mut self, unit: impl Into<String>) -> &mut Self {
        self.unit = unit.into();
        self
    }

    /// Attach a breakdown line. Sub-items are informational and do not
    /// count towards the receipt total.
    pub fn add_sub_item(&mut self, sub_item: SubItem) -> &mut Self {
        self.sub_items.push(sub_item);
        self
    }

    /// The cost of the line, in minor units
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// The currency the line is priced in
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// The breakdown lines attached to this item
    #[must_use]
    pub fn sub_items(&self) -> &[SubItem] {
        &self.sub_items
    }
}

/// A breakdown line nested under an [`Item`]. Sub-items can't be nested
/// any further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    description: String,
    #[serde(default = "one")]
    quantity: u32,
    #[serde(default = "unit")]
    unit: String,
    amount: i64,
    currency: Currency,
}

impl SubItem {
    /// A single unit of something costing `amount` minor units
    pub fn new(description: impl Into<String>, amount: i64, currency: Currency) -> Self {
        Self {
            description: description.into(),
            quantity: one(),
            unit: unit(),
            amount,
            currency,
        }
    }

    /// How many units were bought
    pub fn set_quantity(&mut self, quantity: u32) -> &mut Self {
        self.quantity = quantity;
        self
    }

    /// What the quantity is measured in
    pub fn set_unit(&mut self, unit: impl Into<String>) -> &mut Self {
        self.unit = unit.into();
        self
    }
}

/// A summary of spending against a transaction.
///
/// The total and currency are derived from the items, so they are ignored
/// when a receipt is read back from the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    transaction_id: String,
    #[serde(default)]
    external_id: String,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Serialize)]
struct Document<'a> {
    transaction_id: &'a str,
    external_id: &'a str,
    total: i64,
    currency: &'a Currency,
    items: &'a [Item],
}

impl Receipt {
    /// An empty receipt. `external_id` is the caller's own reference for it,
    /// and identifies the receipt if it is sent again.
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            ..Self::default()
        }
    }

    /// Append items, keeping their order
    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) -> &mut Self {
        self.items.extend(items);
        self
    }

    /// Attach the receipt to a transaction. [`Client::add_receipt`](crate::Client::add_receipt)
    /// does this for you.
    pub fn set_transaction_id(&mut self, transaction_id: impl Into<String>) -> &mut Self {
        self.transaction_id = transaction_id.into();
        self
    }

    /// The transaction the receipt is attached to, empty if not yet set
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// The caller's reference for the receipt
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// The items on the receipt
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The sum of the item amounts. Sub-items are not included.
    ///
    /// `None` if the sum doesn't fit in an `i64`.
    #[must_use]
    pub fn total(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0_i64, |total, item| total.checked_add(item.amount))
    }

    /// The receipt is priced in the currency of its first item
    #[must_use]
    pub fn currency(&self) -> Option<&Currency> {
        self.items.first().map(Item::currency)
    }

    /// Serialise the receipt into the JSON document the API expects.
    ///
    /// Items are not required to share a currency; the first one wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the receipt has no items, or if the
    /// item amounts overflow when totalled.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let currency = self
            .currency()
            .ok_or_else(|| Error::Validation("a receipt must contain at least one item".to_string()))?;

        let total = self
            .total()
            .ok_or_else(|| Error::Validation("receipt total overflows".to_string()))?;

        let document = Document {
            transaction_id: &self.transaction_id,
            external_id: &self.external_id,
            total,
            currency,
            items: &self.items,
        };

        serde_json::to_vec(&document).map_err(|e| Error::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn document(receipt: &Receipt) -> Value {
        serde_json::from_slice(&receipt.to_json().unwrap()).unwrap()
    }

    #[test]
    fn empty_receipt_is_rejected() {
        let receipt = Receipt::new("abc");

        let err = receipt.to_json().unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let mut receipt = Receipt::new("abc");
        receipt.add_items([
            Item::new("Yacht", i64::MAX, Currency::Gbp),
            Item::new("Coffee", 1, Currency::Gbp),
        ]);

        assert_eq!(receipt.total(), None);
        assert!(matches!(receipt.to_json(), Err(Error::Validation(_))));
    }

    #[test]
    fn single_item() {
        let mut receipt = Receipt::new("abc");
        receipt.add_items([Item::new("Coffee", 350, Currency::Gbp)]);

        assert_eq!(
            document(&receipt),
            json!({
                "transaction_id": "",
                "external_id": "abc",
                "total": 350,
                "currency": "GBP",
                "items": [{
                    "description": "Coffee",
                    "quantity": 1,
                    "unit": "unit",
                    "amount": 350,
                    "currency": "GBP",
                    "sub_items": [],
                }],
            })
        );
    }

    #[test]
    fn first_currency_wins() {
        let mut receipt = Receipt::new("abc");
        receipt.add_items([
            Item::new("Croissant", 250, Currency::Eur),
            Item::new("Coffee", 350, Currency::Gbp),
        ]);

        let document = document(&receipt);

        assert_eq!(document["currency"], "EUR");
        assert_eq!(document["total"], 600);
        assert_eq!(document["items"][1]["description"], "Coffee");
    }

    #[test]
    fn sub_items_do_not_count_towards_the_total() {
        let mut bananas = Item::new("Bananas", 120, Currency::Gbp);
        bananas.set_quantity(6).set_unit("piece");

        let mut meal_deal = Item::new("Meal deal", 300, Currency::Gbp);
        let mut crisps = SubItem::new("Crisps", 80, Currency::Gbp);
        crisps.set_unit("bag");
        meal_deal
            .add_sub_item(SubItem::new("Sandwich", 180, Currency::Gbp))
            .add_sub_item(crisps);

        let mut receipt = Receipt::new("shop-1");
        receipt.add_items([bananas, meal_deal]);

        assert_eq!(receipt.total(), Some(420));

        let document = document(&receipt);
        assert_eq!(document["items"][0]["quantity"], 6);
        assert_eq!(document["items"][0]["unit"], "piece");
        assert_eq!(
            document["items"][1]["sub_items"],
            json!([
                {"description": "Sandwich", "quantity": 1, "unit": "unit", "amount": 180, "currency": "GBP"},
                {"description": "Crisps", "quantity": 1, "unit": "bag", "amount": 80, "currency": "GBP"},
            ])
        );
    }
}
