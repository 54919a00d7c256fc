//! # Catalog Loader
//!
//! Product reads plus the search debouncer.
//!
//! ## Search Debounce
//! ```text
//!   keystroke "k"      ──► ticket 1 ──► sleep 300ms ──► ticket != latest ──► drop
//!   keystroke "ke"     ──► ticket 2 ──► sleep 300ms ──► ticket != latest ──► drop
//!   keystroke "kenya"  ──► ticket 3 ──► sleep 300ms ──► ticket == latest ──► fetch
//! ```
//!
//! Debouncing limits how many searches are sent. Ordering of whatever is sent
//! is handled separately by the reducer's list generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use kawuz_core::state::ProductQuery;
use kawuz_core::types::{Product, ProductId};
use kawuz_core::validation::validate_search_query;

use crate::api::StoreApi;
use crate::error::ClientResult;

const MAPS_BASE: &str = "https://maps.google.com/maps";

/// Read-side product calls.
#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn StoreApi>,
}

impl Catalog {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Catalog { api }
    }

    /// Loads the list for `query`.
    pub async fn fetch(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        match query {
            ProductQuery::All => self.api.list_products().await,
            ProductQuery::Search(keyword) => {
                let keyword = validate_search_query(keyword)?;
                if keyword.is_empty() {
                    self.api.list_products().await
                } else {
                    self.api.search_products(&keyword).await
                }
            }
        }
    }

    pub async fn product(&self, id: ProductId) -> ClientResult<Product> {
        self.api.product(id).await
    }

    pub async fn top_sellers(&self) -> ClientResult<Vec<Product>> {
        self.api.top_products().await
    }

    pub fn pdf_url(&self, id: ProductId) -> ClientResult<Url> {
        self.api.pdf_url(id)
    }
}

/// Maps link for a product with a place query or coordinates.
pub fn map_url(product: &Product) -> Option<Url> {
    let query = product.map_query()?;
    Url::parse_with_params(MAPS_BASE, &[("q", query.as_str()), ("z", "15")]).ok()
}

// =============================================================================
// Debouncer
// =============================================================================

/// Lets only the last of a burst of calls through.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Debouncer {
            window,
            latest: AtomicU64::new(0),
        }
    }

    /// Waits out the window. Returns `true` when no newer call arrived
    /// meanwhile.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.window.is_zero() {
            tokio::time::sleep(self.window).await;
        }
        let current = self.latest.load(Ordering::SeqCst);
        if current != ticket {
            debug!(ticket, current, "Debounced call superseded");
            return false;
        }
        true
    }
}
