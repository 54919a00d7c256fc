//! # Storefront Orchestrator
//!
//! Owns the application state and runs the reducer's effects.
//!
//! ## Orchestrator Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront                                       │
//! │                                                                         │
//! │   front end ──► login / select / add_to_cart / checkout / search ...    │
//! │                               │                                         │
//! │                               ▼                                         │
//! │   ┌────────────────────────────────────────────────────────────────┐   │
//! │   │ dispatch(action)                                               │   │
//! │   │   1. write-lock AppState, reduce(), unlock                     │   │
//! │   │   2. execute effects WITHOUT the lock (network, theme file)    │   │
//! │   │   3. feed result actions back into step 1                      │   │
//! │   └────────────────────────────────────────────────────────────────┘   │
//! │                               │                                         │
//! │         ┌──────────────┬──────┴───────┬───────────────┐                 │
//! │         ▼              ▼              ▼               ▼                 │
//! │   SessionManager    Catalog      CheckoutFlow     ThemeStore/Sink       │
//! │                                                                         │
//! │   Every failure ends as Notice in AppState; nothing panics the UI.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `dispatch` is the only writer of [`AppState`]. Operations may run
//! concurrently; stale list/detail results are discarded by generation.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use kawuz_core::state::{reduce, Action, AppState, Effect, Notice, ProductQuery};
use kawuz_core::types::{Credentials, Product, ProductDraft, ProductId, Registration, Session};
use kawuz_core::validation::{validate_product_draft, ArithmeticCaptcha};
use kawuz_core::view::{Route, ViewRequest};

use crate::api::StoreApi;
use crate::catalog::{Catalog, Debouncer};
use crate::checkout::CheckoutFlow;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpStoreApi;
use crate::session::SessionManager;
use crate::theme_store::{ThemeSink, ThemeStore};

/// The storefront client: state, reducer loop and every user operation.
pub struct Storefront {
    config: ClientConfig,
    state: RwLock<AppState>,
    api: Arc<dyn StoreApi>,
    session: SessionManager,
    catalog: Catalog,
    checkout: CheckoutFlow,
    themes: ThemeStore,
    sink: Arc<dyn ThemeSink>,
    search: Debouncer,
    captcha: Mutex<ArithmeticCaptcha>,
}

impl Storefront {
    /// Creates a storefront over any [`StoreApi`].
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn StoreApi>,
        themes: ThemeStore,
        sink: Arc<dyn ThemeSink>,
    ) -> Self {
        let search = Debouncer::new(config.search_debounce());
        Storefront {
            session: SessionManager::new(api.clone()),
            catalog: Catalog::new(api.clone()),
            checkout: CheckoutFlow::new(api.clone()),
            state: RwLock::new(AppState::new()),
            captcha: Mutex::new(ArithmeticCaptcha::random(&mut rand::thread_rng())),
            api,
            themes,
            sink,
            search,
            config,
        }
    }

    /// Creates a storefront talking HTTP to `config.api.base_url`.
    pub fn connect(config: ClientConfig, sink: Arc<dyn ThemeSink>) -> ClientResult<Self> {
        let api = Arc::new(HttpStoreApi::new(&config)?);
        let themes = ThemeStore::new(config.theme_path());
        info!(base_url = %config.api.base_url, "Storefront client ready");
        Ok(Self::new(config, api, themes, sink))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    // =========================================================================
    // Reducer Loop
    // =========================================================================

    /// Applies `action` and runs every effect it (transitively) produces.
    pub async fn dispatch(&self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let effects = self.apply(action).await;
            for effect in effects {
                if let Some(next) = self.execute(effect).await {
                    queue.push_back(next);
                }
            }
        }
    }

    async fn apply(&self, action: Action) -> Vec<Effect> {
        let mut state = self.state.write().await;
        match &action {
            Action::ProductsLoaded { generation, .. } | Action::ProductsFailed { generation, .. }
                if !state.is_current_list(*generation) =>
            {
                debug!(
                    generation,
                    latest = state.catalog.list_generation,
                    "Dropping stale product list"
                );
            }
            Action::ProductLoaded { generation, .. } | Action::ProductFailed { generation, .. }
                if !state.is_current_detail(*generation) =>
            {
                debug!(
                    generation,
                    latest = state.catalog.detail_generation,
                    "Dropping stale product details"
                );
            }
            Action::CheckoutSucceeded { epoch, .. } | Action::CheckoutFailed { epoch, .. }
                if !state.is_current_checkout(*epoch) =>
            {
                debug!(
                    epoch,
                    latest = state.checkout_epoch,
                    "Dropping order result from an earlier session"
                );
            }
            _ => {}
        }
        reduce(&mut state, action)
    }

    async fn execute(&self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::FetchProducts { generation, query } => {
                Some(match self.catalog.fetch(&query).await {
                    Ok(products) => Action::ProductsLoaded {
                        generation,
                        products,
                    },
                    Err(e) => {
                        warn!(error = %e, ?query, "Product list failed");
                        Action::ProductsFailed {
                            generation,
                            message: e.user_message(),
                        }
                    }
                })
            }

            Effect::FetchProduct { generation, id } => Some(match self.catalog.product(id).await {
                Ok(product) => Action::ProductLoaded {
                    generation,
                    product,
                },
                Err(e) => {
                    warn!(error = %e, %id, "Product details failed");
                    Action::ProductFailed {
                        generation,
                        message: e.user_message(),
                    }
                }
            }),

            Effect::SubmitOrder { epoch, lines } => Some(self.checkout.submit(epoch, &lines).await),

            Effect::ApplyTheme(theme) => {
                self.sink.apply(theme);
                None
            }

            Effect::PersistTheme(theme) => match self.themes.save(theme) {
                Ok(()) => None,
                Err(e) => {
                    warn!(error = %e, "Could not persist theme");
                    Some(Action::Notify(Notice::error(e.user_message())))
                }
            },
        }
    }

    async fn notify(&self, notice: Notice) {
        self.dispatch(Action::Notify(notice)).await;
    }

    /// Shows `err` as the notice and hands it back.
    async fn fail<T>(&self, err: ClientError) -> ClientResult<T> {
        self.notify(Notice::error(err.user_message())).await;
        Err(err)
    }

    /// Cosmetic pause between a success notice and the route change.
    async fn pause(&self) {
        let delay = self.config.login_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Restores the theme and the session, then loads the catalog.
    pub async fn start(&self) {
        debug!("Starting storefront");
        self.dispatch(Action::ThemeLoaded(self.themes.load())).await;

        let session = self.session.rehydrate().await;
        self.dispatch(Action::SessionResolved(session)).await;

        self.dispatch(Action::LoadProducts(ProductQuery::All)).await;
        self.load_top_sellers().await;
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs in. On success the notice shows first, the route follows after
    /// the configured delay.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        debug!(username, "Login requested");
        let credentials = Credentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        match self.session.login(&credentials).await {
            Ok(session) => {
                self.notify(Notice::success(format!("Welcome, {}!", session.username)))
                    .await;
                self.pause().await;
                self.dispatch(Action::LoggedIn(session.clone())).await;
                Ok(session)
            }
            Err(e) => self.fail(e).await,
        }
    }

    /// Logs out. Local state is cleared even if the server is unreachable.
    pub async fn logout(&self) {
        debug!("Logout requested");
        self.session.logout().await;
        self.dispatch(Action::LoggedOut).await;
    }

    /// Current CAPTCHA question for the registration form.
    pub async fn captcha_question(&self) -> String {
        self.captcha.lock().await.question()
    }

    /// Draws a new CAPTCHA.
    pub async fn new_captcha(&self) -> String {
        let captcha = ArithmeticCaptcha::random(&mut rand::thread_rng());
        *self.captcha.lock().await = captcha;
        captcha.question()
    }

    /// Registers an account after checking the CAPTCHA answer.
    pub async fn register(&self, registration: Registration, answer: &str) -> ClientResult<String> {
        debug!(username = %registration.username, "Registration requested");
        let captcha = *self.captcha.lock().await;

        match self.session.register(&registration, &captcha, answer).await {
            Ok(message) => {
                self.notify(Notice::success(message.clone())).await;
                self.pause().await;
                self.dispatch(Action::Registered).await;
                Ok(message)
            }
            Err(e) => self.fail(e).await,
        }
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Follows a deep link such as `/product/7-kenya-aa`.
    pub async fn open(&self, path: &str) -> Route {
        debug!(path, "Opening path");
        self.go(ViewRequest::from_path(path)).await
    }

    /// Requests a route; guards may redirect.
    pub async fn navigate(&self, route: Route) -> Route {
        debug!(%route, "Navigate requested");
        self.go(ViewRequest::to(route)).await
    }

    async fn go(&self, request: ViewRequest) -> Route {
        self.dispatch(Action::Navigate(request)).await;
        let shown = self.state.read().await.view.route;
        if shown != request.route {
            debug!(requested = %request.route, %shown, "Route redirected");
        }
        if shown == Route::GuestRegister {
            self.new_captcha().await;
        }
        shown
    }

    /// Shows a product's details.
    pub async fn select(&self, id: ProductId) {
        debug!(%id, "Product selected");
        self.dispatch(Action::SelectProduct(id)).await;
    }

    /// Opens the admin edit view for a product.
    pub async fn edit(&self, id: ProductId) -> Route {
        self.go(ViewRequest::edit(id)).await
    }

    pub async fn back(&self) {
        self.dispatch(Action::Back).await;
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Debounced keyword search; only the last call in a burst is sent.
    pub async fn search(&self, keyword: &str) {
        debug!(keyword, "Search typed");
        if !self.search.settle().await {
            return;
        }
        self.dispatch(Action::LoadProducts(ProductQuery::from_keyword(keyword)))
            .await;
    }

    /// Re-fetches the list with the current query.
    pub async fn refresh(&self) {
        let query = self.state.read().await.catalog.query.clone();
        self.dispatch(Action::LoadProducts(query)).await;
    }

    /// Local case-insensitive name filter; no network.
    pub async fn set_filter(&self, filter: &str) {
        self.dispatch(Action::SetFilter(filter.to_string())).await;
    }

    pub async fn load_top_sellers(&self) {
        match self.catalog.top_sellers().await {
            Ok(products) => self.dispatch(Action::TopSellersLoaded(products)).await,
            Err(e) => {
                warn!(error = %e, "Top sellers failed");
                self.notify(Notice::error(e.user_message())).await;
            }
        }
    }

    /// Link to the product document (not fetched).
    pub fn pdf_url(&self, id: ProductId) -> ClientResult<Url> {
        self.catalog.pdf_url(id)
    }

    // =========================================================================
    // Cart and Checkout
    // =========================================================================

    /// Adds a product by id, using already-loaded data when possible.
    pub async fn add_to_cart(&self, id: ProductId) -> ClientResult<()> {
        debug!(%id, "Add to cart requested");
        let known = {
            let state = self.state.read().await;
            find_loaded(&state, id)
        };

        let product = match known {
            Some(product) => product,
            None => match self.catalog.product(id).await {
                Ok(product) => product,
                Err(e) => return self.fail(e).await,
            },
        };

        self.dispatch(Action::AddToCart(product)).await;
        Ok(())
    }

    /// Removes the cart line at `index`; out-of-range is ignored.
    pub async fn remove_from_cart(&self, index: usize) {
        self.dispatch(Action::RemoveFromCart(index)).await;
    }

    /// Places the order for the whole cart.
    pub async fn checkout(&self) {
        debug!("Checkout requested");
        self.dispatch(Action::CheckoutRequested).await;
    }

    // =========================================================================
    // Theme and Notices
    // =========================================================================

    pub async fn toggle_theme(&self) {
        self.dispatch(Action::ToggleTheme).await;
    }

    pub async fn dismiss_notice(&self) {
        self.dispatch(Action::DismissNotice).await;
    }

    // =========================================================================
    // Admin
    // =========================================================================

    async fn require_admin(&self) -> ClientResult<()> {
        if self.state.read().await.session.is_admin() {
            Ok(())
        } else {
            warn!("Admin operation refused for non-admin session");
            self.fail(ClientError::Forbidden("Administrator rights required".into()))
                .await
        }
    }

    async fn validate_draft(&self, draft: &ProductDraft) -> ClientResult<()> {
        match validate_product_draft(draft) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e.into()).await,
        }
    }

    pub async fn create_product(&self, draft: ProductDraft) -> ClientResult<Product> {
        debug!(name = %draft.name, "Create product requested");
        self.require_admin().await?;
        self.validate_draft(&draft).await?;

        match self.api.create_product(&draft).await {
            Ok(product) => {
                info!(id = %product.id, "Product created");
                self.dispatch(Action::ProductSaved(product.clone())).await;
                Ok(product)
            }
            Err(e) => self.fail(e).await,
        }
    }

    /// Updates a product, then re-fetches it so the view shows server data.
    pub async fn update_product(&self, id: ProductId, draft: ProductDraft) -> ClientResult<Product> {
        debug!(%id, "Update product requested");
        self.require_admin().await?;
        self.validate_draft(&draft).await?;

        let result = match self.api.update_product(id, &draft).await {
            Ok(_) => self.catalog.product(id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(product) => {
                info!(%id, "Product updated");
                self.dispatch(Action::ProductSaved(product.clone())).await;
                Ok(product)
            }
            Err(e) => self.fail(e).await,
        }
    }

    /// Deletes a product; the view returns to the list.
    pub async fn delete_product(&self, id: ProductId) -> ClientResult<()> {
        debug!(%id, "Delete product requested");
        self.require_admin().await?;

        match self.api.delete_product(id).await {
            Ok(_) => {
                info!(%id, "Product deleted");
                self.dispatch(Action::ProductDeleted(id)).await;
                Ok(())
            }
            Err(e) => self.fail(e).await,
        }
    }
}

fn find_loaded(state: &AppState, id: ProductId) -> Option<Product> {
    state
        .catalog
        .detail
        .iter()
        .chain(state.catalog.products.iter())
        .chain(state.catalog.top_sellers.iter())
        .find(|p| p.id == id)
        .cloned()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeStoreApi};
    use crate::theme_store::NoOpThemeSink;
    use kawuz_core::money::Money;
    use kawuz_core::state::NoticeKind;
    use kawuz_core::theme::Theme;
    use kawuz_core::types::SessionState;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    fn product(id: i64, minor: i64) -> Product {
        let mut p = Product::new(ProductId(id), format!("Coffee {}", id), Money::from_minor(minor));
        p.stock_quantity = 3;
        p
    }

    fn quick_config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.ui.login_transition_delay_ms = 0;
        config.ui.search_debounce_ms = 0;
        config
    }

    fn storefront(fake: Arc<FakeStoreApi>) -> Storefront {
        Storefront::new(
            quick_config(),
            fake,
            ThemeStore::new(None),
            Arc::new(NoOpThemeSink),
        )
    }

    fn catalog() -> Vec<Product> {
        vec![product(1, 1050), product(2, 500), product(7, 2400)]
    }

    async fn logged_in(fake: &Arc<FakeStoreApi>, admin: bool) -> Storefront {
        *fake.login.lock().unwrap() = Some(Ok(Session {
            username: "ola".into(),
            is_admin: admin,
        }));
        let store = storefront(fake.clone());
        store.start().await;
        store.login("ola", "secret").await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_start_as_guest() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = storefront(fake.clone());

        store.start().await;

        let state = store.snapshot().await;
        assert_eq!(state.session, SessionState::Guest);
        assert!(state.notice.is_none());
        assert_eq!(state.catalog.products.len(), 3);
        assert_eq!(state.catalog.top_sellers.len(), 3);
        assert_eq!(fake.calls()[0], Call::Me);
    }

    #[tokio::test]
    async fn test_cart_scenario() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = storefront(fake.clone());
        store.start().await;

        store.add_to_cart(ProductId(1)).await.unwrap();
        store.add_to_cart(ProductId(2)).await.unwrap();
        assert_eq!(store.snapshot().await.cart_total().to_string(), "15.50");

        store.remove_from_cart(0).await;
        assert_eq!(store.snapshot().await.cart_total().to_string(), "5.00");

        store.remove_from_cart(5).await;
        assert_eq!(store.snapshot().await.cart.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_sends_nothing() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, false).await;

        store.checkout().await;

        assert_eq!(fake.order_calls(), 0);
        let notice = store.snapshot().await.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_guest_checkout_routes_to_login() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = storefront(fake.clone());
        store.start().await;
        store.add_to_cart(ProductId(1)).await.unwrap();

        store.checkout().await;

        let state = store.snapshot().await;
        assert_eq!(fake.order_calls(), 0);
        assert_eq!(state.view.route, Route::GuestLogin);
        assert_eq!(state.cart.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_success() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, false).await;
        store.add_to_cart(ProductId(7)).await.unwrap();
        store.add_to_cart(ProductId(7)).await.unwrap();

        store.checkout().await;

        let state = store.snapshot().await;
        assert!(state.cart.is_empty());
        assert_eq!(state.view.route, Route::StoreList);
        assert_eq!(
            state.notice,
            Some(Notice::success("Zamówienie zostało złożone!"))
        );

        let calls = fake.calls();
        let order = calls
            .iter()
            .find_map(|c| match c {
                Call::Order(lines) => Some(lines.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(order.len(), 2);
        assert!(order.iter().all(|l| l.product_id == ProductId(7) && l.quantity == 1));
        // list refreshed after the order
        assert_eq!(calls.last(), Some(&Call::List));
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, false).await;
        store.add_to_cart(ProductId(1)).await.unwrap();
        store.navigate(Route::StoreCart).await;
        *fake.order.lock().unwrap() = Some(Err(ClientError::from_status(
            400,
            "Nie ma wystarczającej liczby produktu: Coffee 1",
        )));

        store.checkout().await;

        let state = store.snapshot().await;
        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.view.route, Route::StoreCart);
        assert_eq!(
            state.notice.unwrap().text,
            "Nie ma wystarczającej liczby produktu: Coffee 1"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_checkout_sends_one_order() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        *fake.order_delay.lock().unwrap() = Some(Duration::from_millis(200));
        let store = logged_in(&fake, false).await;
        store.add_to_cart(ProductId(1)).await.unwrap();

        tokio::join!(store.checkout(), store.checkout());

        assert_eq!(fake.order_calls(), 1);
        assert!(store.snapshot().await.cart.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_checkout_stays_on_guest_login() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        *fake.order_delay.lock().unwrap() = Some(Duration::from_millis(200));
        let store = Arc::new(logged_in(&fake, false).await);
        store.add_to_cart(ProductId(1)).await.unwrap();

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.checkout().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.logout().await;
        pending.await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(fake.order_calls(), 1);
        assert_eq!(state.session, SessionState::Guest);
        assert_eq!(state.view.route, Route::GuestLogin);
        assert!(!state.checkout_in_flight);
        assert_ne!(state.notice.map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_during_checkout_is_refused() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        *fake.order_delay.lock().unwrap() = Some(Duration::from_millis(200));
        let store = Arc::new(logged_in(&fake, false).await);
        store.add_to_cart(ProductId(1)).await.unwrap();

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.checkout().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.add_to_cart(ProductId(2)).await.unwrap();

        let during = store.snapshot().await;
        assert_eq!(during.cart.len(), 1);
        assert_eq!(during.notice.map(|n| n.kind), Some(NoticeKind::Info));

        pending.await.unwrap();
        let ordered: Vec<_> = fake
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Order(lines) => Some(lines),
                _ => None,
            })
            .collect();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].len(), 1);
        assert_eq!(ordered[0][0].product_id, ProductId(1));
        assert!(store.snapshot().await.cart.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_details_do_not_overwrite() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        fake.product_delays
            .lock()
            .unwrap()
            .push_back(Duration::from_millis(100));
        let store = storefront(fake.clone());

        tokio::join!(store.select(ProductId(1)), store.select(ProductId(2)));

        let state = store.snapshot().await;
        assert_eq!(state.view.selected_product, Some(ProductId(2)));
        assert_eq!(state.catalog.detail.map(|p| p.id), Some(ProductId(2)));
    }

    #[tokio::test]
    async fn test_missing_product_shows_notice() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = storefront(fake.clone());

        store.select(ProductId(404)).await;

        let state = store.snapshot().await;
        assert!(state.catalog.detail.is_none());
        assert_eq!(state.notice.unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let mut config = quick_config();
        config.ui.search_debounce_ms = 300;
        let store = Storefront::new(config, fake.clone(), ThemeStore::new(None), Arc::new(NoOpThemeSink));

        tokio::join!(
            store.search("c"),
            store.search("co"),
            store.search("coffee 7")
        );

        assert_eq!(fake.calls(), vec![Call::Search("coffee 7".into())]);
        let state = store.snapshot().await;
        assert_eq!(state.catalog.products.len(), 1);
        assert_eq!(state.catalog.query, ProductQuery::Search("coffee 7".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_notice_precedes_route_change() {
        let fake = Arc::new(FakeStoreApi::new());
        let store = Arc::new(Storefront::new(
            ClientConfig::default(),
            fake.clone(),
            ThemeStore::new(None),
            Arc::new(NoOpThemeSink),
        ));
        store.start().await;
        store.navigate(Route::GuestLogin).await;

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.login("ola", "pw").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let during = store.snapshot().await;
        assert_eq!(during.notice.map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(during.view.route, Route::GuestLogin);

        task.await.unwrap().unwrap();
        let after = store.snapshot().await;
        assert_eq!(after.view.route, Route::StoreList);
        assert!(after.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_stays_guest() {
        let fake = Arc::new(FakeStoreApi::new());
        *fake.login.lock().unwrap() = Some(Err(ClientError::from_status(
            401,
            "Błąd: Zły login lub hasło",
        )));
        let store = storefront(fake.clone());
        store.start().await;

        assert!(store.login("ola", "bad").await.is_err());

        let state = store.snapshot().await;
        assert_eq!(state.session, SessionState::Guest);
        assert_eq!(state.notice.unwrap().text, "Błąd: Zły login lub hasło");
    }

    #[tokio::test]
    async fn test_logout_clears_even_if_server_fails() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, true).await;
        store.add_to_cart(ProductId(1)).await.unwrap();
        store.select(ProductId(1)).await;
        *fake.logout_fails.lock().unwrap() = true;

        store.logout().await;

        let state = store.snapshot().await;
        assert_eq!(state.session, SessionState::Guest);
        assert_eq!(state.view.route, Route::GuestLogin);
        assert!(state.cart.is_empty());
        assert_eq!(state.view.selected_product, None);
    }

    #[tokio::test]
    async fn test_register_with_wrong_captcha() {
        let fake = Arc::new(FakeStoreApi::new());
        let store = storefront(fake.clone());
        store.start().await;
        store.navigate(Route::GuestRegister).await;

        let registration = Registration {
            username: "ewa".into(),
            password: "pw".into(),
            email: "ewa@example.com".into(),
        };
        // operands are at most 9 each
        let err = store.register(registration.clone(), "19").await.unwrap_err();
        assert!(err.is_validation());
        assert!(!fake.calls().iter().any(|c| matches!(c, Call::Register(_))));

        let question = store.captcha_question().await;
        let (a, b) = question.split_once(" + ").unwrap();
        let answer = a.parse::<u32>().unwrap() + b.parse::<u32>().unwrap();
        store.register(registration, &answer.to_string()).await.unwrap();
        assert_eq!(store.snapshot().await.view.route, Route::GuestLogin);
    }

    #[tokio::test]
    async fn test_admin_edit_by_id() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let admin = logged_in(&fake, true).await;
        admin.select(ProductId(7)).await;
        assert_eq!(admin.navigate(Route::AdminEdit).await, Route::AdminEdit);

        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let customer = logged_in(&fake, false).await;
        customer.select(ProductId(7)).await;
        assert_eq!(customer.navigate(Route::AdminEdit).await, Route::StoreList);
    }

    #[tokio::test]
    async fn test_admin_crud() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, true).await;

        let draft = ProductDraft {
            name: "Ethiopia Sidamo".into(),
            description: String::new(),
            price: Money::from_minor(3900),
            stock_quantity: 10,
        };
        let created = store.create_product(draft.clone()).await.unwrap();
        assert_eq!(created.id, ProductId(8));
        assert_eq!(store.snapshot().await.view.selected_product, Some(ProductId(8)));

        let updated = store
            .update_product(
                created.id,
                ProductDraft {
                    price: Money::from_minor(4100),
                    ..draft
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price.minor(), 4100);

        store.delete_product(created.id).await.unwrap();
        let state = store.snapshot().await;
        assert_eq!(state.view.route, Route::StoreList);
        assert!(state.catalog.find(created.id).is_none());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_write() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, false).await;

        let err = store.delete_product(ProductId(1)).await.unwrap_err();

        assert!(matches!(err, ClientError::Forbidden(_)));
        assert!(!fake.calls().iter().any(|c| matches!(c, Call::Delete(_))));
    }

    #[tokio::test]
    async fn test_invalid_draft_sends_nothing() {
        let fake = Arc::new(FakeStoreApi::with_products(catalog()));
        let store = logged_in(&fake, true).await;

        let draft = ProductDraft {
            name: "  ".into(),
            description: String::new(),
            price: Money::from_minor(100),
            stock_quantity: 1,
        };
        assert!(store.create_product(draft).await.unwrap_err().is_validation());
        assert!(!fake.calls().iter().any(|c| matches!(c, Call::Create(_))));
    }

    struct RecordingSink(StdMutex<Vec<Theme>>);

    impl ThemeSink for RecordingSink {
        fn apply(&self, theme: Theme) {
            self.0.lock().unwrap().push(theme);
        }
    }

    #[tokio::test]
    async fn test_theme_restored_and_toggled() {
        let dir = tempfile::tempdir().unwrap();
        let themes = ThemeStore::new(Some(dir.path().join("theme.toml")));
        themes.save(Theme::Dark).unwrap();

        let sink = Arc::new(RecordingSink(StdMutex::new(Vec::new())));
        let store = Storefront::new(
            quick_config(),
            Arc::new(FakeStoreApi::new()),
            themes.clone(),
            sink.clone(),
        );

        store.start().await;
        store.toggle_theme().await;

        assert_eq!(*sink.0.lock().unwrap(), vec![Theme::Dark, Theme::Light]);
        assert_eq!(themes.load(), Theme::Light);
        assert_eq!(store.snapshot().await.theme, Theme::Light);
    }
}
