//! # View Rendering
//!
//! Turns an [`AppState`] snapshot into the text of the current view.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KawUZ · store-list · ola (admin) · dark · cart 2 · 15.50 zł           │ ◄─ header
//! │  ✔ Saved "Kenya AA"                                                     │ ◄─ notice
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │   #1  Kenya AA                      32.00 zł   available               │ ◄─ route body
//! │   #7  Ethiopia Sidamo               39.00 zł   unavailable             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write;
use std::io::Write as _;

use kawuz_client::{map_url, ThemeSink};
use kawuz_core::money::Money;
use kawuz_core::state::{AppState, NoticeKind};
use kawuz_core::theme::Theme;
use kawuz_core::types::{Product, SessionState};
use kawuz_core::view::{product_path, Route};

const RULE: &str = "──────────────────────────────────────────────────────────────";

/// Formats prices with the configured suffix.
#[derive(Debug, Clone)]
pub struct Renderer {
    currency_suffix: String,
    colors: bool,
}

impl Renderer {
    pub fn new(currency_suffix: impl Into<String>) -> Self {
        Renderer {
            currency_suffix: currency_suffix.into(),
            colors: false,
        }
    }

    /// Enables ANSI styling of the header for the current theme.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn price(&self, money: Money) -> String {
        money.display_with(&self.currency_suffix)
    }

    /// Full view: header, notice, route body. `captcha` is the current
    /// registration question.
    pub fn render(&self, state: &AppState, captcha: &str) -> String {
        let mut out = String::new();
        self.header(&mut out, state);

        if let Some(notice) = &state.notice {
            let mark = match notice.kind {
                NoticeKind::Info => "ℹ",
                NoticeKind::Success => "✔",
                NoticeKind::Error => "✖",
            };
            let _ = writeln!(out, "{} {}", mark, notice.text);
        }
        let _ = writeln!(out, "{}", RULE);

        match state.view.route {
            Route::GuestLogin => {
                let _ = writeln!(out, "Log in:    login <username> <password>");
                let _ = writeln!(out, "No account? open /register");
            }
            Route::GuestRegister => {
                let _ = writeln!(out, "Register:  register <username> <password> <email> <answer>");
                let _ = writeln!(out, "CAPTCHA:   {} = ?   (captcha for a new one)", captcha);
            }
            Route::StoreList => self.list(&mut out, state, false),
            Route::AdminList => self.list(&mut out, state, true),
            Route::StoreDetails => self.details(&mut out, state),
            Route::StoreCart => self.cart(&mut out, state),
            Route::AdminEdit => self.edit_form(&mut out, state),
        }
        out
    }

    fn header(&self, out: &mut String, state: &AppState) {
        let user = match &state.session {
            SessionState::Unknown => "…".to_string(),
            SessionState::Guest => "guest".to_string(),
            SessionState::Authenticated(s) if s.is_admin => format!("{} (admin)", s.username),
            SessionState::Authenticated(s) => s.username.clone(),
        };
        let line = format!(
            "KawUZ · {} · {} · {} · cart {} · {}",
            state.view.route,
            user,
            state.theme,
            state.cart.len(),
            self.price(state.cart_total())
        );
        if self.colors {
            let _ = writeln!(out, "{}{}\x1b[0m", header_style(state.theme), line);
        } else {
            let _ = writeln!(out, "{}", line);
        }
    }

    fn product_row(&self, out: &mut String, product: &Product) {
        let stock = if product.in_stock() { "available" } else { "unavailable" };
        let _ = writeln!(
            out,
            " #{:<4} {:<30} {:>12}   {}",
            product.id,
            product.name,
            self.price(product.price),
            stock
        );
    }

    fn list(&self, out: &mut String, state: &AppState, admin: bool) {
        let catalog = &state.catalog;
        if catalog.list_loading {
            let _ = writeln!(out, "Loading products…");
        }
        if !catalog.filter.is_empty() {
            let _ = writeln!(out, "Filter: \"{}\"", catalog.filter);
        }

        let mut shown = 0;
        for product in catalog.visible() {
            self.product_row(out, product);
            shown += 1;
        }
        if shown == 0 && !catalog.list_loading {
            let _ = writeln!(out, "No products.");
        }

        if admin {
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(
                out,
                "edit <id> | create --name .. --price .. [--stock ..] | delete <id>"
            );
        } else if !catalog.top_sellers.is_empty() {
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(out, "Best sellers:");
            for product in &catalog.top_sellers {
                let _ = writeln!(
                    out,
                    " #{:<4} {:<30} sold {}",
                    product.id,
                    product.name,
                    product.sales.unwrap_or(0)
                );
            }
        }
    }

    fn details(&self, out: &mut String, state: &AppState) {
        let Some(product) = &state.catalog.detail else {
            if state.catalog.detail_loading {
                let _ = writeln!(out, "Loading product…");
            } else {
                let _ = writeln!(out, "No product selected.");
            }
            return;
        };

        let _ = writeln!(out, "{}  ({})", product.name, product_path(product.id, &product.name));
        let _ = writeln!(out, "Price:  {}", self.price(product.price));
        let _ = writeln!(
            out,
            "Stock:  {}",
            if product.in_stock() {
                format!("available ({})", product.stock_quantity)
            } else {
                "unavailable".to_string()
            }
        );
        if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "\n{}\n", description);
        }
        if let Some(url) = map_url(product) {
            let _ = writeln!(out, "Origin: {}", url);
        }
        let _ = writeln!(out, "add {} | pdf {} | back", product.id, product.id);
    }

    fn cart(&self, out: &mut String, state: &AppState) {
        if state.cart.is_empty() {
            let _ = writeln!(out, "Your cart is empty.");
            return;
        }
        for (index, line) in state.cart.lines().iter().enumerate() {
            let _ = writeln!(
                out,
                " {:>3}. {:<30} {:>12}",
                index + 1,
                line.name,
                self.price(line.unit_price)
            );
        }
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, " Total: {}", self.price(state.cart.total()));
        if state.checkout_in_flight {
            let _ = writeln!(out, " Placing order…");
        } else {
            let _ = writeln!(out, " remove <n> | checkout");
        }
    }

    fn edit_form(&self, out: &mut String, state: &AppState) {
        let Some(product) = &state.catalog.detail else {
            let _ = writeln!(out, "Loading product…");
            return;
        };
        let _ = writeln!(out, "Editing #{}", product.id);
        let _ = writeln!(out, "  name:        {}", product.name);
        let _ = writeln!(out, "  price:       {}", product.price);
        let _ = writeln!(out, "  stock:       {}", product.stock_quantity);
        let _ = writeln!(
            out,
            "  description: {}",
            product.description.as_deref().unwrap_or("")
        );
        let _ = writeln!(
            out,
            "update {} [--name ..] [--price ..] [--stock ..] [--description ..] | delete {}",
            product.id, product.id
        );
    }
}

fn header_style(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\x1b[30;47m",
        Theme::Dark => "\x1b[97;40m",
    }
}

// =============================================================================
// Terminal Theme Sink
// =============================================================================

/// Applies the theme to the terminal by switching its default colors.
pub struct TerminalThemeSink {
    enabled: bool,
}

impl TerminalThemeSink {
    pub fn new(enabled: bool) -> Self {
        TerminalThemeSink { enabled }
    }
}

impl ThemeSink for TerminalThemeSink {
    fn apply(&self, theme: Theme) {
        tracing::debug!(%theme, "Applying theme");
        if !self.enabled {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", header_style(theme));
        let _ = write!(stdout, "\x1b[0m");
        let _ = stdout.flush();
    }
}
