//! # Command-Line Front End
//!
//! Maps `stockbook <resource> <action>` invocations onto the boundary
//! commands and renders their results as JSON.
//!
//! ## Usage
//! ```text
//! stockbook [--config PATH] [--db PATH] <COMMAND>
//!
//!   users         list | add | update | delete | login
//!   stores        list | get | add | update | delete
//!   units         list | add | update | delete
//!   products      list [--as-of] | get | add | update | delete
//!   transactions  list [--product] [--as-of] | get | add | update | delete
//!   balance       <PRODUCT_ID> [--as-of]
//!   earliest      [--product]
//! ```
//!
//! Dates accept `yyyy-MM-dd`, a full RFC 3339 date-time, `yyyy-MM` or `yyyy`.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use stockbook_core::dates::normalize_day;
use stockbook_core::{NewProduct, NewStore, NewTransaction, NewUnit, NewUser};

use crate::commands::{ledger, product, store, transaction, unit, user};
use crate::error::ApiError;
use crate::state::DbState;

#[derive(Debug, Parser)]
#[command(name = "stockbook")]
#[command(about = "Inventory stock ledger: products, stores, units and stock movements")]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir / stockbook.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding config and environment
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage stores
    Stores {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Manage units of measure
    Units {
        #[command(subcommand)]
        action: UnitAction,
    },

    /// Manage products and list stock balances
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Record and list stock movements
    Transactions {
        #[command(subcommand)]
        action: TransactionAction,
    },

    /// Show one product's totals and balance
    Balance {
        product_id: i64,

        /// Count movements up to and including this day
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show the first day with any stock movement
    Earliest {
        #[arg(long)]
        product: Option<i64>,
    },
}

// =============================================================================
// Resource Actions
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum UserAction {
    List,
    Add(UserArgs),
    Update {
        id: i64,
        #[command(flatten)]
        user: UserArgs,
    },
    Delete {
        id: i64,
    },
    /// Check a username/password pair
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Debug, Args)]
pub struct UserArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long, default_value = "clerk")]
    pub role: String,
}

/// Name/description pair shared by stores and units.
#[derive(Debug, Args)]
pub struct NamedArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Subcommand)]
pub enum StoreAction {
    List,
    Get {
        id: i64,
    },
    Add(NamedArgs),
    Update {
        id: i64,
        #[command(flatten)]
        store: NamedArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum UnitAction {
    List,
    Add(NamedArgs),
    Update {
        id: i64,
        #[command(flatten)]
        unit: NamedArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// List products with their balances
    List {
        #[arg(long)]
        as_of: Option<String>,
    },
    Get {
        id: i64,
    },
    Add(ProductArgs),
    /// Replace every field of a product
    Update {
        id: i64,
        #[command(flatten)]
        product: ProductArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub store: Option<i64>,
    #[arg(long)]
    pub unit: Option<i64>,
    #[arg(long)]
    pub created: Option<String>,
    #[arg(long)]
    pub expiry: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl ProductArgs {
    fn into_input(self) -> Result<NewProduct, ApiError> {
        Ok(NewProduct {
            name: self.name,
            store_id: self.store,
            unit_id: self.unit,
            created_date: parse_day(self.created.as_deref())?,
            expiry_date: parse_day(self.expiry.as_deref())?,
            description: self.description,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum TransactionAction {
    /// List movements, newest first
    List {
        #[arg(long)]
        product: Option<i64>,
        #[arg(long)]
        as_of: Option<String>,
    },
    Get {
        id: i64,
    },
    Add(TransactionArgs),
    /// Replace a movement; without --date the stored day is kept
    Update {
        id: i64,
        #[command(flatten)]
        transaction: TransactionArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct TransactionArgs {
    #[arg(long)]
    pub product: i64,
    #[arg(long, default_value_t = 0)]
    pub increase: i64,
    #[arg(long, default_value_t = 0)]
    pub decrease: i64,
    /// Day of the movement (add: default today; update: default unchanged)
    #[arg(long)]
    pub date: Option<String>,
}

impl TransactionArgs {
    fn into_input(self) -> Result<NewTransaction, ApiError> {
        Ok(NewTransaction {
            product_id: self.product,
            increase: self.increase,
            decrease: self.decrease,
            created_at: parse_day(self.date.as_deref())?,
        })
    }
}

fn parse_day(input: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match input {
        Some(day) => Ok(Some(normalize_day(day)?)),
        None => Ok(None),
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Could not render output: {}", e)))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one parsed command and returns its JSON result.
pub async fn execute(db: &DbState, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Users { action } => match action {
            UserAction::List => to_json(user::list_users(db).await?),
            UserAction::Add(args) => to_json(user::create_user(db, args.into()).await?),
            UserAction::Update { id, user: args } => to_json(user::update_user(db, id, args.into()).await?),
            UserAction::Delete { id } => to_json(user::delete_user(db, id).await?),
            UserAction::Login { username, password } => to_json(user::login(db, username, password).await?),
        },

        Command::Stores { action } => match action {
            StoreAction::List => to_json(store::list_stores(db).await?),
            StoreAction::Get { id } => to_json(store::get_store(db, id).await?),
            StoreAction::Add(args) => to_json(store::create_store(db, args.into()).await?),
            StoreAction::Update { id, store: args } => to_json(store::update_store(db, id, args.into()).await?),
            StoreAction::Delete { id } => to_json(store::delete_store(db, id).await?),
        },

        Command::Units { action } => match action {
            UnitAction::List => to_json(unit::list_units(db).await?),
            UnitAction::Add(args) => to_json(unit::create_unit(db, args.into()).await?),
            UnitAction::Update { id, unit: args } => to_json(unit::update_unit(db, id, args.into()).await?),
            UnitAction::Delete { id } => to_json(unit::delete_unit(db, id).await?),
        },

        Command::Products { action } => match action {
            ProductAction::List { as_of } => to_json(product::list_products(db, as_of).await?),
            ProductAction::Get { id } => to_json(product::get_product(db, id).await?),
            ProductAction::Add(args) => to_json(product::create_product(db, args.into_input()?).await?),
            ProductAction::Update { id, product: args } => {
                to_json(product::update_product(db, id, args.into_input()?).await?)
            }
            ProductAction::Delete { id } => to_json(product::delete_product(db, id).await?),
        },

        Command::Transactions { action } => match action {
            TransactionAction::List { product, as_of } => {
                to_json(transaction::list_transactions(db, product, as_of).await?)
            }
            TransactionAction::Get { id } => to_json(transaction::get_transaction(db, id).await?),
            TransactionAction::Add(args) => {
                to_json(transaction::create_transaction(db, args.into_input()?).await?)
            }
            TransactionAction::Update { id, transaction: args } => {
                to_json(transaction::update_transaction(db, id, args.into_input()?).await?)
            }
            TransactionAction::Delete { id } => to_json(transaction::delete_transaction(db, id).await?),
        },

        Command::Balance { product_id, as_of } => to_json(ledger::product_balance(db, product_id, as_of).await?),

        Command::Earliest { product } => to_json(ledger::earliest_activity(db, product).await?),
    }
}

impl From<UserArgs> for NewUser {
    fn from(args: UserArgs) -> Self {
        NewUser {
            username: args.username,
            password: args.password,
            role: args.role,
        }
    }
}

impl From<NamedArgs> for NewStore {
    fn from(args: NamedArgs) -> Self {
        NewStore {
            name: args.name,
            description: args.description,
        }
    }
}

impl From<NamedArgs> for NewUnit {
    fn from(args: NamedArgs) -> Self {
        NewUnit {
            name: args.name,
            description: args.description,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
