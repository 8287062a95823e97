//! # Restock
//!
//! `restock` turns recent per-product sales into restocking advice for a
//! small store.
//!
//! Each product is classified into one of four actions:
//!
//! - **Add stock**: the product sells fast and stock is running low
//! - **Maintain stock**: the product sells well and stock is sufficient
//! - **Promote**: the product barely sold in the review window
//! - **Evaluate**: moderate sales, worth a closer look
//!
//! ## Usage Example
//!
//! ```
//! use restock::{ProductSales, RestockAction, RestockPolicy, RestockRules};
//!
//! let rules = RestockRules::default();
//! let product = ProductSales::new(7, "Keripik Singkong", 12, 64);
//!
//! let recommendation = rules.recommend(&product).unwrap();
//! assert_eq!(recommendation.action, RestockAction::AddStock);
//! println!("{}: {}", recommendation.product_name, recommendation.reason());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

mod rules;
pub mod utils;

pub use rules::RestockRules;

/// Errors that can occur while producing recommendations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RestockError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}

pub type Result<T> = std::result::Result<T, RestockError>;

/// Stock level and recent sales of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: u64,
    pub name: String,
    /// Units currently on hand
    pub stock: u64,
    /// Units sold over the last 30 days
    pub units_sold_last_30_days: u64,
}

impl ProductSales {
    pub fn new(product_id: u64, name: impl Into<String>, stock: u64, units_sold: u64) -> Self {
        Self {
            product_id,
            name: name.into(),
            stock,
            units_sold_last_30_days: units_sold,
        }
    }
}

/// What the store should do about a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockAction {
    /// Order more units
    AddStock,
    /// Keep the current stock level
    MaintainStock,
    /// Push the product with a promotion
    PromoteProduct,
    /// Review pricing, placement or assortment
    EvaluateProduct,
}

impl RestockAction {
    /// Short label shown to store owners
    pub fn label(&self) -> &'static str {
        match self {
            RestockAction::AddStock => "Tambah Stok",
            RestockAction::MaintainStock => "Pertahankan Stok",
            RestockAction::PromoteProduct => "Promosikan Produk",
            RestockAction::EvaluateProduct => "Evaluasi Produk",
        }
    }

    /// Explanation shown next to the label
    pub fn reason(&self) -> &'static str {
        match self {
            RestockAction::AddStock => "Produk sangat laku dan stok mulai menipis",
            RestockAction::MaintainStock => "Produk laris dan stabil",
            RestockAction::PromoteProduct => "Penjualan rendah dalam 30 hari terakhir",
            RestockAction::EvaluateProduct => "Performa penjualan sedang",
        }
    }
}

impl fmt::Display for RestockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Advice for a single product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: u64,
    pub product_name: String,
    pub stock: u64,
    pub units_sold_last_30_days: u64,
    pub action: RestockAction,
}

impl Recommendation {
    pub fn reason(&self) -> &'static str {
        self.action.reason()
    }
}

/// Trait defining a restocking policy
pub trait RestockPolicy {
    /// Classify one product
    fn recommend(&self, product: &ProductSales) -> Result<Recommendation>;

    /// Classify every product, keeping input order
    fn recommend_all(&self, products: &[ProductSales]) -> Result<Vec<Recommendation>> {
        products.iter().map(|p| self.recommend(p)).collect()
    }
}
