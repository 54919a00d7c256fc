//! # View Router
//!
//! Decides which view is rendered and keeps the product selection.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Routes                                        │
//! │                                                                         │
//! │  Guest only            Everyone                 Admin only              │
//! │  ──────────            ────────                 ──────────              │
//! │  guest-login    ──►    store-list  ◄──┐         admin-list              │
//! │  guest-register        │    ▲         │         admin-edit              │
//! │                 select │    │ back    │         (needs a selection)     │
//! │                        ▼    │         │                                 │
//! │                    store-details      │                                 │
//! │                                       │                                 │
//! │                    store-cart ────────┘ (checkout success)              │
//! │                                                                         │
//! │  Any guard failure lands on store-list.                                 │
//! │  Logout from anywhere lands on guest-login.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deep Links
//! ```text
//! /                       → store-list
//! /login, /register       → guest-login, guest-register
//! /cart                   → store-cart
//! /admin                  → admin-list
//! /admin/edit/7           → select 7, admin-edit
//! /product/7-kenya-aa     → select 7, store-details
//! anything else           → store-list
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::{ProductId, SessionState};

// =============================================================================
// Route
// =============================================================================

/// One of the enumerated views. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    GuestLogin,
    GuestRegister,
    #[default]
    StoreList,
    StoreDetails,
    StoreCart,
    AdminList,
    AdminEdit,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::GuestLogin,
        Route::GuestRegister,
        Route::StoreList,
        Route::StoreDetails,
        Route::StoreCart,
        Route::AdminList,
        Route::AdminEdit,
    ];

    /// Routes reachable only without an authenticated user.
    pub fn is_guest_only(self) -> bool {
        matches!(self, Route::GuestLogin | Route::GuestRegister)
    }

    /// Routes reachable only by an authenticated admin.
    pub fn is_admin_only(self) -> bool {
        matches!(self, Route::AdminList | Route::AdminEdit)
    }

    /// Routes that render the selected product.
    pub fn needs_selection(self) -> bool {
        matches!(self, Route::StoreDetails | Route::AdminEdit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Route::GuestLogin => "guest-login",
            Route::GuestRegister => "guest-register",
            Route::StoreList => "store-list",
            Route::StoreDetails => "store-details",
            Route::StoreCart => "store-cart",
            Route::AdminList => "admin-list",
            Route::AdminEdit => "admin-edit",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a requested route against the session and selection.
///
/// Pure function: returns the route that will actually be shown.
pub fn guard(requested: Route, session: &SessionState, selected: Option<ProductId>) -> Route {
    if requested.is_guest_only() && session.is_authenticated() {
        return Route::StoreList;
    }
    if requested.is_admin_only() && !session.is_admin() {
        return Route::StoreList;
    }
    if requested.needs_selection() && selected.is_none() {
        return Route::StoreList;
    }
    requested
}

// =============================================================================
// View State
// =============================================================================

/// Current route plus the product selection and editing flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub route: Route,
    pub selected_product: Option<ProductId>,
    pub is_editing: bool,
}

impl ViewState {
    /// Initial view for a not-yet-resolved session.
    pub fn new() -> Self {
        ViewState::default()
    }

    /// Moves to `requested` if the guards allow it, otherwise to
    /// `store-list`. Returns the route actually shown.
    pub fn navigate(&mut self, requested: Route, session: &SessionState) -> Route {
        let route = guard(requested, session, self.selected_product);
        self.route = route;
        self.is_editing = route == Route::AdminEdit;
        if route == Route::StoreList {
            self.selected_product = None;
        }
        route
    }

    /// Selects a product and shows its details.
    pub fn select(&mut self, id: ProductId) {
        self.selected_product = Some(id);
        self.is_editing = false;
        self.route = Route::StoreDetails;
    }

    /// Back to the list; clears the selection.
    pub fn back(&mut self) {
        self.route = Route::StoreList;
        self.selected_product = None;
        self.is_editing = false;
    }

    /// Re-applies the guards after the session changed.
    ///
    /// A user who just logged in on a guest route moves to `store-list`; a
    /// session that lost admin rights leaves `admin-*`.
    pub fn session_changed(&mut self, session: &SessionState) {
        let route = guard(self.route, session, self.selected_product);
        if route != self.route {
            self.route = route;
            self.is_editing = route == Route::AdminEdit;
            if route == Route::StoreList {
                self.selected_product = None;
            }
        }
    }

    /// State after logout: `guest-login`, no selection, not editing.
    pub fn logged_out(&mut self) {
        self.route = Route::GuestLogin;
        self.selected_product = None;
        self.is_editing = false;
    }

    /// Applies a deep-link request.
    pub fn open(&mut self, request: ViewRequest, session: &SessionState) -> Route {
        if let Some(id) = request.product {
            self.select(id);
        }
        self.navigate(request.route, session)
    }
}

// =============================================================================
// View Requests (deep links)
// =============================================================================

/// A route request, optionally carrying a product to select first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRequest {
    pub route: Route,
    pub product: Option<ProductId>,
}

impl ViewRequest {
    pub fn to(route: Route) -> Self {
        ViewRequest {
            route,
            product: None,
        }
    }

    pub fn details(id: ProductId) -> Self {
        ViewRequest {
            route: Route::StoreDetails,
            product: Some(id),
        }
    }

    pub fn edit(id: ProductId) -> Self {
        ViewRequest {
            route: Route::AdminEdit,
            product: Some(id),
        }
    }

    /// Parses a history path. Unknown or malformed paths map to the list.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => ViewRequest::to(Route::GuestLogin),
            ["register"] => ViewRequest::to(Route::GuestRegister),
            ["cart"] => ViewRequest::to(Route::StoreCart),
            ["admin"] => ViewRequest::to(Route::AdminList),
            ["admin", "edit", id] => match id.parse::<ProductId>() {
                Ok(id) => ViewRequest::edit(id),
                Err(_) => ViewRequest::to(Route::StoreList),
            },
            ["product", slug] => match parse_product_slug(slug) {
                Ok(id) => ViewRequest::details(id),
                Err(_) => ViewRequest::to(Route::StoreList),
            },
            _ => ViewRequest::to(Route::StoreList),
        }
    }
}

/// Extracts the id from `"{id}-{slug}"` (or a bare `"{id}"`).
pub fn parse_product_slug(segment: &str) -> Result<ProductId, CoreError> {
    let id = segment.split('-').next().unwrap_or_default();
    id.parse::<ProductId>()
        .map_err(|_| CoreError::InvalidProductId(segment.to_string()))
}

/// URL-friendly form of a product name: lowercase ASCII letters and digits
/// separated by single dashes.
///
/// ```rust
/// use kawuz_core::view::slugify;
///
/// assert_eq!(slugify("Kenya AA  Top!"), "kenya-aa-top");
/// assert_eq!(slugify("Café Łódź"), "cafe-lodz");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let c = fold_diacritic(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn fold_diacritic(c: char) -> char {
    match c {
        'ą' | 'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'ć' | 'ç' | 'č' => 'c',
        'ę' | 'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ł' => 'l',
        'ń' | 'ñ' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ś' | 'š' => 's',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Deep-link path for a product, e.g. `/product/7-kenya-aa`.
pub fn product_path(id: ProductId, name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("/product/{}", id)
    } else {
        format!("/product/{}-{}", id, slug)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Session;

    fn admin() -> SessionState {
        SessionState::Authenticated(Session {
            username: "boss".to_string(),
            is_admin: true,
        })
    }

    fn customer() -> SessionState {
        SessionState::Authenticated(Session {
            username: "ola".to_string(),
            is_admin: false,
        })
    }

    #[test]
    fn test_admin_edit_with_selection() {
        let mut view = ViewState::new();
        view.select(ProductId(7));
        assert_eq!(view.navigate(Route::AdminEdit, &admin()), Route::AdminEdit);
        assert!(view.is_editing);
        assert_eq!(view.selected_product, Some(ProductId(7)));
    }

    #[test]
    fn test_non_admin_cannot_edit() {
        let mut view = ViewState::new();
        view.select(ProductId(7));
        assert_eq!(view.navigate(Route::AdminEdit, &customer()), Route::StoreList);
        assert!(!view.is_editing);
        assert_eq!(view.selected_product, None);
    }

    #[test]
    fn test_admin_edit_without_selection() {
        let mut view = ViewState::new();
        assert_eq!(view.navigate(Route::AdminEdit, &admin()), Route::StoreList);
    }

    #[test]
    fn test_no_admin_route_for_non_admins() {
        for session in [SessionState::Unknown, SessionState::Guest, customer()] {
            for route in Route::ALL {
                let mut view = ViewState::new();
                view.select(ProductId(1));
                let shown = view.navigate(route, &session);
                assert!(!shown.is_admin_only(), "{} reached {}", route, shown);
            }
        }
    }

    #[test]
    fn test_guest_routes_redirect_when_authenticated() {
        let mut view = ViewState::new();
        assert_eq!(view.navigate(Route::GuestLogin, &customer()), Route::StoreList);
        assert_eq!(
            view.navigate(Route::GuestRegister, &SessionState::Guest),
            Route::GuestRegister
        );
    }

    #[test]
    fn test_login_moves_off_guest_route() {
        let mut view = ViewState::new();
        view.navigate(Route::GuestLogin, &SessionState::Guest);
        view.session_changed(&customer());
        assert_eq!(view.route, Route::StoreList);
    }

    #[test]
    fn test_select_and_back() {
        let mut view = ViewState::new();
        view.is_editing = true;
        view.select(ProductId(3));
        assert_eq!(view.route, Route::StoreDetails);
        assert!(!view.is_editing);

        view.back();
        assert_eq!(view.route, Route::StoreList);
        assert_eq!(view.selected_product, None);
    }

    #[test]
    fn test_logged_out_resets() {
        let mut view = ViewState::new();
        view.select(ProductId(3));
        view.navigate(Route::AdminEdit, &admin());
        view.logged_out();
        assert_eq!(view, ViewState {
            route: Route::GuestLogin,
            selected_product: None,
            is_editing: false,
        });
    }

    #[test]
    fn test_from_path() {
        assert_eq!(ViewRequest::from_path("/"), ViewRequest::to(Route::StoreList));
        assert_eq!(ViewRequest::from_path("/login"), ViewRequest::to(Route::GuestLogin));
        assert_eq!(ViewRequest::from_path("/cart?x=1"), ViewRequest::to(Route::StoreCart));
        assert_eq!(
            ViewRequest::from_path("/product/12-kenya-aa"),
            ViewRequest::details(ProductId(12))
        );
        assert_eq!(
            ViewRequest::from_path("/admin/edit/7"),
            ViewRequest::edit(ProductId(7))
        );
        assert_eq!(
            ViewRequest::from_path("/product/abc-def"),
            ViewRequest::to(Route::StoreList)
        );
        assert_eq!(ViewRequest::from_path("/nowhere"), ViewRequest::to(Route::StoreList));
    }

    #[test]
    fn test_deep_link_admin_edit_for_customer() {
        let mut view = ViewState::new();
        let shown = view.open(ViewRequest::from_path("/admin/edit/7"), &customer());
        assert_eq!(shown, Route::StoreList);
        assert_eq!(view.selected_product, None);
    }

    #[test]
    fn test_slug_round_trip() {
        let path = product_path(ProductId(5), "Brazil Santos");
        assert_eq!(path, "/product/5-brazil-santos");
        assert_eq!(ViewRequest::from_path(&path), ViewRequest::details(ProductId(5)));
        assert_eq!(product_path(ProductId(5), "!!!"), "/product/5");
    }
}
