//! Threshold rules over 30-day sales and current stock
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. sold >= `high_sales` and stock < `low_stock` → add stock
//! 2. sold >= `high_sales` → maintain stock
//! 3. sold < `low_sales` → promote
//! 4. anything else → evaluate

use crate::utils::{validate_ordering, validate_threshold};
use crate::{ProductSales, Recommendation, RestockAction, RestockPolicy, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sales and stock thresholds for restocking advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockRules {
    /// Units sold in 30 days at which a product counts as a fast seller
    high_sales: u64,
    /// Stock below which a fast seller needs restocking
    low_stock: u64,
    /// Units sold in 30 days below which a product needs promotion
    low_sales: u64,
}

impl RestockRules {
    /// Create rules with custom thresholds
    ///
    /// # Arguments
    ///
    /// * `high_sales` - Fast-seller threshold (minimum 1)
    /// * `low_stock` - Stock level below which fast sellers are restocked
    /// * `low_sales` - Slow-seller threshold, strictly below `high_sales`
    pub fn new(high_sales: u64, low_stock: u64, low_sales: u64) -> Result<Self> {
        validate_threshold(high_sales, 1, "high_sales")?;
        validate_ordering(low_sales, high_sales, "low_sales", "high_sales")?;

        Ok(Self {
            high_sales,
            low_stock,
            low_sales,
        })
    }

    pub fn high_sales(&self) -> u64 {
        self.high_sales
    }

    pub fn low_stock(&self) -> u64 {
        self.low_stock
    }

    pub fn low_sales(&self) -> u64 {
        self.low_sales
    }

    /// Classify a product from its sales and stock alone
    pub fn classify(&self, units_sold: u64, stock: u64) -> RestockAction {
        if units_sold >= self.high_sales && stock < self.low_stock {
            RestockAction::AddStock
        } else if units_sold >= self.high_sales {
            RestockAction::MaintainStock
        } else if units_sold < self.low_sales {
            RestockAction::PromoteProduct
        } else {
            RestockAction::EvaluateProduct
        }
    }
}

impl Default for RestockRules {
    fn default() -> Self {
        Self {
            high_sales: 50,
            low_stock: 20,
            low_sales: 10,
        }
    }
}

impl RestockPolicy for RestockRules {
    fn recommend(&self, product: &ProductSales) -> Result<Recommendation> {
        let action = self.classify(product.units_sold_last_30_days, product.stock);
        debug!(
            product_id = product.product_id,
            units_sold = product.units_sold_last_30_days,
            stock = product.stock,
            action = action.label(),
            "restock rule applied"
        );

        Ok(Recommendation {
            product_id: product.product_id,
            product_name: product.name.clone(),
            stock: product.stock,
            units_sold_last_30_days: product.units_sold_last_30_days,
            action,
        })
    }
}
