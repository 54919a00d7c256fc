//! # kawuz-client: Backend Client for the KawUZ Storefront
//!
//! Everything in the storefront that performs I/O: REST calls with the
//! session cookie, the theme file, the configuration file, and the
//! orchestrator that runs the core reducer's effects.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Client                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  Storefront (Main Orchestrator)                  │  │
//! │  │                                                                  │  │
//! │  │  Owns AppState behind an RwLock, runs reduce() + effects         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │     ┌──────────────┬──────────┼───────────┬──────────────┐             │
//! │     ▼              ▼          ▼           ▼              ▼              │
//! │  ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌──────────┐ ┌────────────┐      │
//! │  │ Session │ │ Catalog  │ │Checkout │ │ThemeStore│ │ClientConfig│      │
//! │  │ Manager │ │+Debouncer│ │  Flow   │ │ + Sink   │ │ TOML + env │      │
//! │  └────┬────┘ └────┬─────┘ └────┬────┘ └──────────┘ └────────────┘      │
//! │       └───────────┼────────────┘                                        │
//! │                   ▼                                                     │
//! │        dyn StoreApi ──► HttpStoreApi (reqwest, cookie jar)              │
//! │                                                                         │
//! │  BACKEND: http://localhost:8080/api (auth_token cookie)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`app`] - `Storefront` orchestrator and every user operation
//! - [`api`] - `StoreApi` trait (the seam tests replace)
//! - [`http`] - reqwest implementation of `StoreApi`
//! - [`session`] - identity check, login, logout, registration
//! - [`catalog`] - product reads, search debounce, map links
//! - [`checkout`] - order submission
//! - [`theme_store`] - theme persistence and the presentation hook
//! - [`config`] - client configuration
//! - [`error`] - client error type

pub mod api;
pub mod app;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod theme_store;

pub use api::StoreApi;
pub use app::Storefront;
pub use catalog::{map_url, Catalog, Debouncer};
pub use checkout::CheckoutFlow;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpStoreApi;
pub use session::SessionManager;
pub use theme_store::{NoOpThemeSink, ThemeSink, ThemeStore};
