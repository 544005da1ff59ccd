//! Wire types for the store REST API.
//!
//! Field names follow the API's JSON (`_id`, `createdAt`, `StreetAddress`,
//! Stripe-style `line_items`). Decoding is lenient where the API is: text
//! fields may arrive as numbers, strings, or null, lists may be null, and a
//! product's category may be an id, a populated document, an empty string,
//! or null.

use backoffice_core::{AdminId, CategoryId, Email, OrderId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Lenient decoders
// =============================================================================

/// Decode a JSON string or number into text; `null` and absent become "".
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        match Option::<TextOrNumber>::deserialize(deserializer)? {
            Some(TextOrNumber::Text(text)) => text,
            Some(TextOrNumber::Number(number)) => number.to_string(),
            None => String::new(),
        },
    )
}

/// Decode `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a timestamp, keeping `None` for anything that is not RFC 3339.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|ts| ts.with_timezone(&Utc)))
}

/// Decode a quantity given as a number, numeric text, or null.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_or_number(deserializer)?.trim().parse().unwrap_or_default())
}

/// Decode a category reference that may be an id, a populated document, an
/// empty string, or null.
fn category_ref<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CategoryRef {
        Id(String),
        Document {
            #[serde(rename = "_id")]
            id: String,
        },
    }

    let raw = Option::<CategoryRef>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| {
        let id = match r {
            CategoryRef::Id(id) | CategoryRef::Document { id } => id,
        };
        CategoryId::parse(&id).ok()
    }))
}

// =============================================================================
// Documents
// =============================================================================

/// A product category (read-only here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: String,
}

/// A product as returned by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "text_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: String,
    /// Price text exactly as stored; may not be numeric.
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "category_ref")]
    pub category: Option<CategoryId>,
}

/// An order line item: a snapshot of the product name and the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawLineItem")]
pub struct LineItem {
    pub product_name: String,
    pub quantity: u32,
}

/// Stripe-style line item as stored with the order.
#[derive(Deserialize)]
struct RawLineItem {
    #[serde(default, deserialize_with = "lenient_quantity")]
    quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    price_data: RawPriceData,
}

#[derive(Default, Deserialize)]
struct RawPriceData {
    #[serde(default, deserialize_with = "null_as_default")]
    product_data: RawProductData,
}

#[derive(Default, Deserialize)]
struct RawProductData {
    #[serde(default, deserialize_with = "text_or_number")]
    name: String,
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        Self {
            product_name: raw.price_data.product_data.name,
            quantity: raw.quantity,
        }
    }
}

/// A customer order (display only).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub city: String,
    #[serde(rename = "StreetAddress", default, deserialize_with = "text_or_number")]
    pub street_address: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub total_amount: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
}

/// An administrator account.
///
/// The email is kept as stored; a malformed address must not hide the row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Administrator {
    #[serde(rename = "_id")]
    pub id: AdminId,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email: String,
}

// =============================================================================
// Requests and responses
// =============================================================================

/// Body of `POST /api/products` and `PUT /api/products`.
///
/// `id` is present only for updates; `category` serializes as `null` when no
/// category is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub price: String,
    pub images: Vec<String>,
    pub category: Option<CategoryId>,
}

/// Body of `POST /api/admins`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAdministrator {
    pub name: String,
    pub email: Email,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub links: Vec<String>,
}

/// One selected file, forwarded as a `file` part of the upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
