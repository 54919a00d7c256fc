//! # kawuz-core: Pure Storefront Logic for KawUZ
//!
//! This crate is the **heart** of the KawUZ storefront client. It contains the
//! session/view/cart state machine as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KawUZ Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/storefront (terminal UI)                   │   │
//! │  │    Product List ──► Details ──► Cart ──► Checkout ──► Login    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed operations                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               kawuz-client (Storefront orchestrator)            │   │
//! │  │    rehydrate, login, checkout, search, toggle_theme, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ dispatch(Action) → Vec<Effect>         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kawuz-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   cart    │  │   view    │  │   state   │  │   │
//! │  │   │   Money   │  │   Cart    │  │ ViewState │  │ AppState  │  │   │
//! │  │   │           │  │ CartLine  │  │   Route   │  │  reduce   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire records (Product, Session, OrderLine, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Ordered cart of product snapshots
//! - [`view`] - Route enum, view state and routing guards
//! - [`state`] - Application state, actions and the reducer
//! - [`theme`] - Light/dark flag
//! - [`validation`] - CAPTCHA and form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kawuz_core::cart::Cart;
//! use kawuz_core::money::Money;
//! use kawuz_core::types::{Product, ProductId};
//!
//! let mut cart = Cart::new();
//! cart.add(&Product::new(ProductId(1), "Espresso", Money::from_minor(1050)));
//! cart.add(&Product::new(ProductId(2), "Latte", Money::from_minor(500)));
//!
//! assert_eq!(cart.total().to_string(), "15.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod state;
pub mod theme;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use state::{reduce, Action, AppState, CatalogState, Effect, Notice, NoticeKind, ProductQuery};
pub use theme::Theme;
pub use types::*;
pub use view::{Route, ViewRequest, ViewState};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency suffix used when rendering prices ("15.50 zł").
pub const CURRENCY_SUFFIX: &str = "zł";

/// Largest value accepted for either CAPTCHA operand.
pub const CAPTCHA_MAX_OPERAND: u8 = 9;

/// Maximum product name length accepted by the admin form.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
