//! # Shell Commands
//!
//! One typed command per shell line, parsed with clap (no binary name).
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Browsing      list | search <kw> | filter [text] | show <id> | back    │
//! │                top | pdf <id> | map <id> | open <path>                  │
//! │  Cart          add <id> | remove <n> | cart | checkout                  │
//! │  Account       login <user> <pw> | logout | captcha                     │
//! │                register <user> <pw> <email> <answer>                    │
//! │  Admin         admin | edit <id> | create ... | update <id> ...         │
//! │                delete <id>                                              │
//! │  Misc          theme | dismiss | quit                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `execute` maps a command onto one or two `Storefront` operations. Errors
//! are already shown as the state's notice, so they are only logged here.

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use kawuz_client::{map_url, ClientError, Storefront};
use kawuz_core::money::Money;
use kawuz_core::state::{Action, Notice};
use kawuz_core::types::{ProductDraft, ProductId, Registration};
use kawuz_core::view::Route;

/// A parsed shell line.
#[derive(Debug, Parser, PartialEq)]
#[command(
    name = "storefront",
    no_binary_name = true,
    disable_version_flag = true,
    about = "KawUZ storefront commands"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ShellCommand {
    /// Show all products
    List,
    /// Search products by keyword
    Search { keyword: Vec<String> },
    /// Filter the shown list by name (no argument clears)
    Filter { text: Vec<String> },
    /// Show product details
    Show { id: ProductId },
    /// Back to the product list
    Back,
    /// Add a product to the cart
    Add { id: ProductId },
    /// Remove cart line number N (as listed)
    Remove { line: usize },
    /// Show the cart
    Cart,
    /// Place the order
    Checkout,
    Login { username: String, password: String },
    Logout,
    /// New CAPTCHA question
    Captcha,
    Register {
        username: String,
        password: String,
        email: String,
        /// Answer to the CAPTCHA question
        answer: String,
    },
    /// Follow a path like /product/7-kenya-aa
    Open { path: String },
    /// Admin product list
    Admin,
    /// Open the admin edit form
    Edit { id: ProductId },
    Create(DraftArgs),
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: DraftFields,
    },
    Delete { id: ProductId },
    /// Best sellers
    Top,
    /// Toggle light/dark
    Theme,
    /// Document link for a product
    Pdf { id: ProductId },
    /// Map link for a product's origin
    Map { id: ProductId },
    /// Hide the current notice
    Dismiss,
    #[command(alias = "exit")]
    Quit,
}

/// Fields of a new product.
#[derive(Debug, Args, PartialEq)]
pub struct DraftArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: Money,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<DraftArgs> for ProductDraft {
    fn from(args: DraftArgs) -> Self {
        ProductDraft {
            name: args.name,
            description: args.description,
            price: args.price,
            stock_quantity: args.stock,
        }
    }
}

/// Changed fields of an existing product; the rest keep their values.
#[derive(Debug, Args, PartialEq, Default)]
pub struct DraftFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<Money>,
    #[arg(long)]
    pub stock: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
}

impl DraftFields {
    pub fn apply(self, mut draft: ProductDraft) -> ProductDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(stock) = self.stock {
            draft.stock_quantity = stock;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        draft
    }
}

/// Parses one shell line. Double quotes group words: `--name "Kenya AA"`.
pub fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    ShellLine::try_parse_from(split_words(line)).map(|l| l.command)
}

fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    words.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        words.push(current);
    }
    words
}

/// What the shell loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Re-render the view.
    Render,
    /// Print this line, then re-render.
    Print(String),
    Quit,
}

/// Runs a command against the storefront.
pub async fn execute(store: &Storefront, command: ShellCommand) -> Outcome {
    debug!(?command, "Shell command");
    match command {
        ShellCommand::List => {
            store.set_filter("").await;
            store.search("").await;
        }
        ShellCommand::Search { keyword } => store.search(&keyword.join(" ")).await,
        ShellCommand::Filter { text } => store.set_filter(&text.join(" ")).await,
        ShellCommand::Show { id } => store.select(id).await,
        ShellCommand::Back => store.back().await,

        ShellCommand::Add { id } => {
            if let Err(e) = store.add_to_cart(id).await {
                debug!(error = %e, %id, "Add to cart failed");
            }
        }
        // Lines are listed from 1; 0 maps past the end and is ignored.
        ShellCommand::Remove { line } => {
            store
                .remove_from_cart(line.checked_sub(1).unwrap_or(usize::MAX))
                .await
        }
        ShellCommand::Cart => {
            store.navigate(Route::StoreCart).await;
        }
        ShellCommand::Checkout => store.checkout().await,

        ShellCommand::Login { username, password } => {
            if let Err(e) = store.login(&username, &password).await {
                debug!(error = %e, "Login failed");
            }
        }
        ShellCommand::Logout => store.logout().await,
        ShellCommand::Captcha => {
            return Outcome::Print(format!("CAPTCHA: {} = ?", store.new_captcha().await))
        }
        ShellCommand::Register {
            username,
            password,
            email,
            answer,
        } => {
            let registration = Registration {
                username,
                password,
                email,
            };
            if let Err(e) = store.register(registration, &answer).await {
                debug!(error = %e, "Registration failed");
            }
        }

        ShellCommand::Open { path } => {
            store.open(&path).await;
        }
        ShellCommand::Admin => {
            store.navigate(Route::AdminList).await;
        }
        ShellCommand::Edit { id } => {
            store.edit(id).await;
        }
        ShellCommand::Create(args) => {
            if let Err(e) = store.create_product(args.into()).await {
                debug!(error = %e, "Create product failed");
            }
        }
        ShellCommand::Update { id, fields } => match current_draft(store, id).await {
            Some(draft) => {
                if let Err(e) = store.update_product(id, fields.apply(draft)).await {
                    debug!(error = %e, %id, "Update product failed");
                }
            }
            None => {
                store
                    .dispatch(Action::Notify(Notice::error(format!(
                        "Product {} is not loaded; run `show {}` first",
                        id, id
                    ))))
                    .await
            }
        },
        ShellCommand::Delete { id } => {
            if let Err(e) = store.delete_product(id).await {
                debug!(error = %e, %id, "Delete product failed");
            }
        }

        ShellCommand::Top => store.load_top_sellers().await,
        ShellCommand::Theme => store.toggle_theme().await,
        ShellCommand::Pdf { id } => {
            return match store.pdf_url(id) {
                Ok(url) => Outcome::Print(url.to_string()),
                Err(e) => Outcome::Print(e.user_message()),
            }
        }
        ShellCommand::Map { id } => return Outcome::Print(map_link(store, id).await),
        ShellCommand::Dismiss => store.dismiss_notice().await,
        ShellCommand::Quit => return Outcome::Quit,
    }
    Outcome::Render
}

async fn current_draft(store: &Storefront, id: ProductId) -> Option<ProductDraft> {
    let state = store.snapshot().await;
    state
        .catalog
        .detail
        .as_ref()
        .filter(|p| p.id == id)
        .or_else(|| state.catalog.find(id))
        .map(ProductDraft::from_product)
}

async fn map_link(store: &Storefront, id: ProductId) -> String {
    let state = store.snapshot().await;
    let product = state
        .catalog
        .detail
        .as_ref()
        .filter(|p| p.id == id)
        .or_else(|| state.catalog.find(id));

    match product {
        Some(product) => match map_url(product) {
            Some(url) => url.to_string(),
            None => format!("\"{}\" has no origin on the map", product.name),
        },
        None => ClientError::NotFound(format!("Product {} is not loaded", id)).user_message(),
    }
}
