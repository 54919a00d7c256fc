//! # Application State and Reducer
//!
//! Every mutation of the storefront goes through [`reduce`].
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Reducer Loop                                     │
//! │                                                                         │
//! │   Storefront (kawuz-client)                                             │
//! │   ┌──────────────────────────┐                                          │
//! │   │ dispatch(Action) ────────┼──► reduce(&mut AppState, Action)        │
//! │   │                          │            │                             │
//! │   │                          │            ▼                             │
//! │   │ execute(Effect) ◄────────┼─── Vec<Effect>  (plain data, no I/O)    │
//! │   │   │                      │                                          │
//! │   │   └── HTTP / storage ────┼──► result Action ──► dispatch again     │
//! │   └──────────────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Responses
//! Each list or detail load is stamped with a generation number taken when the
//! load is requested. A result whose generation is no longer the latest is
//! ignored, so a slow response can never overwrite a fresher one.
//!
//! Orders work the same way with `checkout_epoch`: logout moves the epoch on,
//! so an order result arriving afterwards touches neither the route nor the
//! next user's cart. The cart is frozen while an order is in flight, so a
//! successful order clears exactly the lines it submitted.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;
use crate::theme::Theme;
use crate::types::{OrderLine, Product, ProductId, Session, SessionState};
use crate::view::{Route, ViewRequest, ViewState};

// =============================================================================
// Notices
// =============================================================================

/// Severity of an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// The single user-visible feedback channel: one inline message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

// =============================================================================
// Catalog State
// =============================================================================

/// What the product list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductQuery {
    #[default]
    All,
    Search(String),
}

impl ProductQuery {
    /// Empty keywords mean "all products".
    pub fn from_keyword(keyword: &str) -> Self {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            ProductQuery::All
        } else {
            ProductQuery::Search(keyword.to_string())
        }
    }
}

/// Product list, details and best sellers, with their load generations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub query: ProductQuery,
    /// Local name filter applied on top of `products`.
    pub filter: String,
    pub list_generation: u64,
    pub list_loading: bool,

    pub detail: Option<Product>,
    pub detail_generation: u64,
    pub detail_loading: bool,

    pub top_sellers: Vec<Product>,
}

impl CatalogState {
    /// Products matching the local filter, in server order.
    pub fn visible(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| self.filter.trim().is_empty() || p.name_matches(&self.filter))
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

// =============================================================================
// Application State
// =============================================================================

/// Everything the front end renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: SessionState,
    pub view: ViewState,
    pub cart: Cart,
    pub theme: Theme,
    pub catalog: CatalogState,
    pub notice: Option<Notice>,
    pub checkout_in_flight: bool,
    /// Stamp of the latest submitted order; logout moves it on.
    pub checkout_epoch: u64,
}

impl AppState {
    pub fn new() -> Self {
        AppState::default()
    }

    pub fn cart_total(&self) -> Money {
        self.cart.total()
    }

    /// True when a list result with this generation would be applied.
    pub fn is_current_list(&self, generation: u64) -> bool {
        generation == self.catalog.list_generation
    }

    /// True when a detail result with this generation would be applied.
    pub fn is_current_detail(&self, generation: u64) -> bool {
        generation == self.catalog.detail_generation
    }

    /// True when an order result with this epoch is still awaited.
    pub fn is_current_checkout(&self, epoch: u64) -> bool {
        self.checkout_in_flight && epoch == self.checkout_epoch
    }

    fn request_list(&mut self, query: ProductQuery) -> Effect {
        self.catalog.list_generation += 1;
        self.catalog.list_loading = true;
        self.catalog.query = query.clone();
        Effect::FetchProducts {
            generation: self.catalog.list_generation,
            query,
        }
    }

    fn request_detail(&mut self, id: ProductId) -> Effect {
        self.catalog.detail_generation += 1;
        self.catalog.detail_loading = true;
        if self.catalog.detail.as_ref().map(|p| p.id) != Some(id) {
            self.catalog.detail = None;
        }
        Effect::FetchProduct {
            generation: self.catalog.detail_generation,
            id,
        }
    }

    fn refresh_list(&mut self) -> Effect {
        let query = self.catalog.query.clone();
        self.request_list(query)
    }
}

// =============================================================================
// Actions and Effects
// =============================================================================

/// Typed state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // --- session ---
    /// Answer of the startup identity check.
    SessionResolved(SessionState),
    LoggedIn(Session),
    LoggedOut,
    /// Account created; show the login form.
    Registered,

    // --- routing ---
    Navigate(ViewRequest),
    SelectProduct(ProductId),
    Back,

    // --- catalog ---
    LoadProducts(ProductQuery),
    ProductsLoaded {
        generation: u64,
        products: Vec<Product>,
    },
    ProductsFailed {
        generation: u64,
        message: String,
    },
    ProductLoaded {
        generation: u64,
        product: Product,
    },
    ProductFailed {
        generation: u64,
        message: String,
    },
    TopSellersLoaded(Vec<Product>),
    SetFilter(String),

    // --- admin ---
    ProductSaved(Product),
    ProductDeleted(ProductId),

    // --- cart and checkout ---
    AddToCart(Product),
    RemoveFromCart(usize),
    CheckoutRequested,
    CheckoutSucceeded {
        epoch: u64,
        message: String,
    },
    CheckoutFailed {
        epoch: u64,
        message: String,
    },

    // --- theme ---
    ThemeLoaded(Theme),
    ToggleTheme,

    // --- notices ---
    Notify(Notice),
    DismissNotice,
}

/// Side effects requested by the reducer, executed by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchProducts { generation: u64, query: ProductQuery },
    FetchProduct { generation: u64, id: ProductId },
    SubmitOrder { epoch: u64, lines: Vec<OrderLine> },
    ApplyTheme(Theme),
    PersistTheme(Theme),
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies `action` to `state` and returns the effects to run.
///
/// ## Example
/// ```rust
/// use kawuz_core::state::{reduce, Action, AppState, Effect};
///
/// let mut state = AppState::new();
/// let effects = reduce(&mut state, Action::CheckoutRequested);
///
/// // Empty cart: a notice, no order
/// assert!(effects.is_empty());
/// assert!(state.notice.is_some());
/// ```
pub fn reduce(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        // ---------------------------------------------------------------------
        // Session
        // ---------------------------------------------------------------------
        Action::SessionResolved(session) => {
            let session = match session {
                SessionState::Unknown => SessionState::Guest,
                other => other,
            };
            state.session = session;
            state.view.session_changed(&state.session);
            Vec::new()
        }

        Action::LoggedIn(session) => {
            state.session = SessionState::Authenticated(session);
            state.view.session_changed(&state.session);
            Vec::new()
        }

        Action::LoggedOut => {
            state.session = SessionState::Guest;
            state.view.logged_out();
            state.cart.clear();
            state.catalog.detail = None;
            state.catalog.detail_generation += 1;
            state.checkout_in_flight = false;
            state.checkout_epoch += 1;
            state.notice = Some(Notice::info("Logged out"));
            Vec::new()
        }

        Action::Registered => {
            state.view.navigate(Route::GuestLogin, &state.session);
            Vec::new()
        }

        // ---------------------------------------------------------------------
        // Routing
        // ---------------------------------------------------------------------
        Action::Navigate(request) => {
            let previous = state.view.selected_product;
            let shown = state.view.open(request, &state.session);
            match state.view.selected_product {
                Some(id) if shown.needs_selection() && previous != Some(id) => {
                    vec![state.request_detail(id)]
                }
                Some(id) if shown.needs_selection() && state.catalog.detail.is_none() => {
                    vec![state.request_detail(id)]
                }
                _ => Vec::new(),
            }
        }

        Action::SelectProduct(id) => {
            state.view.select(id);
            vec![state.request_detail(id)]
        }

        Action::Back => {
            state.view.back();
            state.catalog.detail = None;
            state.catalog.detail_loading = false;
            state.catalog.detail_generation += 1;
            Vec::new()
        }

        // ---------------------------------------------------------------------
        // Catalog
        // ---------------------------------------------------------------------
        Action::LoadProducts(query) => vec![state.request_list(query)],

        Action::ProductsLoaded {
            generation,
            products,
        } => {
            if state.is_current_list(generation) {
                state.catalog.products = products;
                state.catalog.list_loading = false;
            }
            Vec::new()
        }

        Action::ProductsFailed {
            generation,
            message,
        } => {
            if state.is_current_list(generation) {
                state.catalog.list_loading = false;
                state.notice = Some(Notice::error(message));
            }
            Vec::new()
        }

        Action::ProductLoaded {
            generation,
            product,
        } => {
            if state.is_current_detail(generation) {
                state.catalog.detail_loading = false;
                if state.view.selected_product == Some(product.id) {
                    state.catalog.detail = Some(product);
                }
            }
            Vec::new()
        }

        Action::ProductFailed {
            generation,
            message,
        } => {
            if state.is_current_detail(generation) {
                state.catalog.detail = None;
                state.catalog.detail_loading = false;
                state.notice = Some(Notice::error(message));
            }
            Vec::new()
        }

        Action::TopSellersLoaded(products) => {
            state.catalog.top_sellers = products;
            Vec::new()
        }

        Action::SetFilter(filter) => {
            state.catalog.filter = filter;
            Vec::new()
        }

        // ---------------------------------------------------------------------
        // Admin
        // ---------------------------------------------------------------------
        // Carries the server's copy (create response or re-fetch after update).
        Action::ProductSaved(product) => {
            state.notice = Some(Notice::success(format!("Saved \"{}\"", product.name)));
            state.view.select(product.id);
            state.catalog.detail_generation += 1;
            state.catalog.detail_loading = false;
            state.catalog.detail = Some(product);
            vec![state.refresh_list()]
        }

        Action::ProductDeleted(id) => {
            state.notice = Some(Notice::success(format!("Product {} deleted", id)));
            state.view.back();
            state.catalog.detail = None;
            state.catalog.detail_generation += 1;
            vec![state.refresh_list()]
        }

        // ---------------------------------------------------------------------
        // Cart and checkout
        // ---------------------------------------------------------------------
        // The cart is frozen while its order is being submitted.
        Action::AddToCart(_) | Action::RemoveFromCart(_) if state.checkout_in_flight => {
            state.notice = Some(Notice::info("Wait until the order is placed"));
            Vec::new()
        }

        Action::AddToCart(product) => {
            state.notice = Some(Notice::info(format!("Added \"{}\" to cart", product.name)));
            state.cart.add(&product);
            Vec::new()
        }

        Action::RemoveFromCart(index) => {
            state.cart.remove(index);
            Vec::new()
        }

        Action::CheckoutRequested => {
            if state.checkout_in_flight {
                state.notice = Some(Notice::info("Order is already being submitted"));
                return Vec::new();
            }
            if state.cart.is_empty() {
                state.notice = Some(Notice::error("Cart is empty"));
                return Vec::new();
            }
            if !state.session.is_authenticated() {
                state.notice = Some(Notice::info("Log in to place an order"));
                state.view.navigate(Route::GuestLogin, &state.session);
                return Vec::new();
            }

            state.checkout_in_flight = true;
            state.checkout_epoch += 1;
            vec![Effect::SubmitOrder {
                epoch: state.checkout_epoch,
                lines: state.cart.order_lines(),
            }]
        }

        Action::CheckoutSucceeded { epoch, .. } | Action::CheckoutFailed { epoch, .. }
            if !state.is_current_checkout(epoch) =>
        {
            Vec::new()
        }

        Action::CheckoutSucceeded { message, .. } => {
            state.checkout_in_flight = false;
            state.cart.clear();
            state.notice = Some(Notice::success(message));
            state.view.back();
            vec![state.refresh_list()]
        }

        Action::CheckoutFailed { message, .. } => {
            state.checkout_in_flight = false;
            state.notice = Some(Notice::error(message));
            Vec::new()
        }

        // ---------------------------------------------------------------------
        // Theme
        // ---------------------------------------------------------------------
        Action::ThemeLoaded(theme) => {
            state.theme = theme;
            vec![Effect::ApplyTheme(theme)]
        }

        Action::ToggleTheme => {
            state.theme = state.theme.toggled();
            vec![
                Effect::ApplyTheme(state.theme),
                Effect::PersistTheme(state.theme),
            ]
        }

        // ---------------------------------------------------------------------
        // Notices
        // ---------------------------------------------------------------------
        Action::Notify(notice) => {
            state.notice = Some(notice);
            Vec::new()
        }

        Action::DismissNotice => {
            state.notice = None;
            Vec::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
