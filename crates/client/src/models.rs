//! Domain models for backend payloads.
//!
//! These mirror the JSON the bridge sends inside its `{success, ...}`
//! envelopes. The backend's CSV heritage shows in places: numbers sometimes
//! arrive as strings and order lines may arrive JSON-encoded, so a few
//! fields use tolerant deserializers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use shoppro_core::{OrderId, OrderStatus, Price, ProductId, Role, UserId};

/// An authenticated user, as returned by `login` / `get_current_user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    /// Empty string on the wire for accounts that never signed in.
    #[serde(default, deserialize_with = "de::optional_naive_datetime")]
    pub last_login: Option<NaiveDateTime>,
}

impl User {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Registration data for a new account.
///
/// Not serializable as a whole; the password is passed to the bridge
/// separately and never logged.
pub struct NewUser {
    pub email: String,
    pub password: SecretString,
    pub firstname: String,
    pub lastname: String,
    pub role: Role,
}

/// Partial user update for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// The slice of a product the catalog and cart need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(deserialize_with = "de::u32_from_string_or_number")]
    pub stock: u32,
}

impl ProductSummary {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A full product record, as returned by `get_product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(deserialize_with = "de::u32_from_string_or_number")]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub seller_id: Option<UserId>,
}

impl Product {
    /// Project down to the catalog/cart slice.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            stock: self.stock,
        }
    }
}

/// A new product listing for the seller dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub category: String,
    pub image_url: String,
}

/// Partial product update for the seller dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One line of the cart, with the product details the panel renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: ProductSummary,
}

impl CartItem {
    /// Line total (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// Local snapshot of the server-authoritative cart.
///
/// Invariant: `count == Σ items[].quantity`. The snapshot is a cache; it is
/// replaced wholesale on every refresh and never edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub count: u32,
}

impl CartSnapshot {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }

    /// Build a snapshot from items, deriving the count.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let count = items.iter().map(|item| item.quantity).sum();
        Self { items, count }
    }

    /// Whether the cached count matches the items.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.count == self.items.iter().map(|item| item.quantity).sum::<u32>()
    }

    /// Total of the snapshot (`Σ price × quantity`).
    ///
    /// Recomputed on every call; the backend's `total` field is ignored.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

/// A placed order, as returned by `get_my_orders` / `get_all_orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Order lines; the legacy store serializes these as a JSON string.
    #[serde(deserialize_with = "de::order_items")]
    pub products: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub created_at: NaiveDateTime,
    /// Present only on `get_all_orders`, enriched by the backend.
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

mod de {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, de};

    use super::OrderItem;

    pub fn optional_naive_datetime<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
        }
    }

    pub fn u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }

    pub fn order_items<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Parsed(Vec<OrderItem>),
            Encoded(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Parsed(items) => Ok(items),
            Raw::Encoded(s) => serde_json::from_str(&s).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn summary(id: &str, price: Decimal, stock: u32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(price),
            image_url: String::new(),
            stock,
        }
    }

    #[test]
    fn test_user_empty_last_login() {
        let json = r#"{
            "id": "u-1",
            "email": "a@b.fr",
            "firstname": "Ada",
            "lastname": "Lovelace",
            "role": "client",
            "created_at": "2024-03-01T10:00:00",
            "last_login": ""
        }"#;
        let user: User = serde_json::from_str(json).expect("deserialize");
        assert!(user.last_login.is_none());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_product_stock_as_string() {
        let json = r#"{
            "id": "p-1",
            "name": "Lamp",
            "price": "24.90",
            "image_url": "http://img",
            "stock": "3"
        }"#;
        let product: ProductSummary = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.stock, 3);
        assert!(product.in_stock());
    }

    #[test]
    fn test_cart_snapshot_consistency() {
        let items = vec![
            CartItem {
                product_id: ProductId::new("p-1"),
                quantity: 2,
                product: summary("p-1", Decimal::from(10), 5),
            },
            CartItem {
                product_id: ProductId::new("p-2"),
                quantity: 1,
                product: summary("p-2", Decimal::from(4), 9),
            },
        ];
        let snapshot = CartSnapshot::from_items(items);
        assert_eq!(snapshot.count, 3);
        assert!(snapshot.is_consistent());

        let drifted = CartSnapshot {
            count: 7,
            ..snapshot
        };
        assert!(!drifted.is_consistent());
    }

    #[test]
    fn test_order_items_json_encoded() {
        let json = r#"{
            "id": "o-1",
            "user_id": "u-1",
            "products": "[{\"id\": \"p-1\", \"name\": \"Lamp\", \"price\": \"24.90\", \"quantity\": 2}]",
            "total": "49.80",
            "status": "pending",
            "shipping_address": "12 Rue Example, 75001 Paris",
            "created_at": "2024-03-02T09:30:00"
        }"#;
        let order: Order = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.products.len(), 1);
        assert_eq!(
            order.products.first().map(|item| item.quantity),
            Some(2)
        );
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = ProductPatch {
            stock: Some(12),
            ..ProductPatch::default()
        };
        let json = serde_json::to_value(&patch).expect("serialize");
        assert_eq!(json, serde_json::json!({"stock": 12}));
    }
}
