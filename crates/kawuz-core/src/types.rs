//! # Domain Types
//!
//! Records exchanged with the storefront backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Session      │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  username       │   │  productId      │       │
//! │  │  name, price    │   │  isAdmin        │   │  quantity (=1)  │       │
//! │  │  stockQuantity  │   └─────────────────┘   └─────────────────┘       │
//! │  │  map? lat/lon?  │                                                   │
//! │  │  sales?         │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │  Credentials    │   │  ProductDraft   │       │
//! │                        │  Registration   │   │  (admin form)   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records use the backend's camelCase field names on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Backend product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ProductId)
            .map_err(|_| CoreError::InvalidProductId(s.to_string()))
    }
}

// =============================================================================
// Product
// =============================================================================

/// Read-only projection of a backend product.
///
/// Never mutated locally; a server write is always followed by a re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,

    pub name: String,

    pub price: Money,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub stock_quantity: i64,

    /// Free-form place query for the origin map.
    #[serde(default)]
    pub map: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Units sold; only the top-10 endpoint fills this in.
    #[serde(default)]
    pub sales: Option<i64>,
}

impl Product {
    /// Minimal product, mostly useful in tests and examples.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            description: None,
            stock_quantity: 0,
            map: None,
            latitude: None,
            longitude: None,
            sales: None,
        }
    }

    /// True when at least one unit is in stock.
    pub fn in_stock(&self) -> bool {
        self.stock_quantity >= 1
    }

    /// Coordinates, when both halves are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Query string for a maps link: the explicit place query wins over
    /// coordinates.
    pub fn map_query(&self) -> Option<String> {
        match (&self.map, self.coordinates()) {
            (Some(query), _) if !query.trim().is_empty() => Some(query.trim().to_string()),
            (_, Some((lat, lon))) => Some(format!("{},{}", lat, lon)),
            _ => None,
        }
    }

    /// Case-insensitive substring match on the product name.
    pub fn name_matches(&self, filter: &str) -> bool {
        self.name.to_lowercase().contains(&filter.trim().to_lowercase())
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated user as reported by `/auth/me` or `/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,

    #[serde(default)]
    pub is_admin: bool,
}

/// Who is using the storefront right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Identity check not answered yet.
    #[default]
    Unknown,
    /// No authenticated user.
    Guest,
    /// Authenticated user.
    Authenticated(Session),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, SessionState::Authenticated(s) if s.is_admin)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(s) => Some(s),
            _ => None,
        }
    }
}

// =============================================================================
// Auth Payloads
// =============================================================================

/// Login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// `{"message": "..."}` bodies returned by auth endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an `/order/create` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Admin Product Form
// =============================================================================

/// Body of admin create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub stock_quantity: i64,
}

impl ProductDraft {
    /// Pre-fills the edit form from a loaded product.
    pub fn from_product(product: &Product) -> Self {
        ProductDraft {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price,
            stock_quantity: product.stock_quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
