//! # Store API
//!
//! The seam between orchestration and transport.
//!
//! ```text
//!   Storefront ──► Arc<dyn StoreApi> ──┬──► HttpStoreApi (reqwest + cookie jar)
//!                                      └──► FakeStoreApi (tests, records calls)
//! ```
//!
//! Every method maps to exactly one backend call. Implementations must send
//! the ambient credential (the session cookie) on every request.

use async_trait::async_trait;
use url::Url;

use kawuz_core::types::{
    Credentials, OrderLine, Product, ProductDraft, ProductId, Registration, Session,
};

use crate::error::ClientResult;

/// One method per REST endpoint of the storefront backend.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// `GET /auth/me`. `Err(Unauthorized)` for a guest.
    async fn me(&self) -> ClientResult<Session>;

    /// `POST /auth/login`. The response sets the session cookie.
    async fn login(&self, credentials: &Credentials) -> ClientResult<Session>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> ClientResult<()>;

    /// `POST /auth/register`. Returns the server's message.
    async fn register(&self, registration: &Registration) -> ClientResult<String>;

    /// `GET /products`.
    async fn list_products(&self) -> ClientResult<Vec<Product>>;

    /// `GET /product/search?keyword=`.
    async fn search_products(&self, keyword: &str) -> ClientResult<Vec<Product>>;

    /// `GET /products/top10`, with `sales` filled in.
    async fn top_products(&self) -> ClientResult<Vec<Product>>;

    /// `GET /product/{id}`. `Err(NotFound)` on 404.
    async fn product(&self, id: ProductId) -> ClientResult<Product>;

    /// `POST /product`.
    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product>;

    /// `PUT /product/{id}`. Returns the server's text.
    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ClientResult<String>;

    /// `DELETE /product/{id}`. Returns the server's text.
    async fn delete_product(&self, id: ProductId) -> ClientResult<String>;

    /// `POST /order/create`. Returns the server's text.
    async fn create_order(&self, lines: &[OrderLine]) -> ClientResult<String>;

    /// URL of the product document; never fetched by the client.
    fn pdf_url(&self, id: ProductId) -> ClientResult<Url>;
}

// =============================================================================
// Test Double
// =============================================================================
