//! # UMKM Smart
//!
//! `umkm_smart` bundles the tools a small store needs to plan stock:
//!
//! - [`sales_forecast`]: next-day sales forecast from the daily sales history
//! - [`restock`]: restocking advice from 30-day sales and current stock
//! - [`sales_math`]: scaling, windowing and error metrics shared by both
//!
//! ## Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use umkm_smart::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = SalesSeries::from_quantities(start, &[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);
//! let result = Forecaster::new(ForecastConfig::default())?.forecast(&series)?;
//!
//! let product = ProductSales::new(1, "Kopi Bubuk", 12, 64);
//! let advice = RestockRules::default().recommend(&product).unwrap();
//!
//! println!("tomorrow: {:.0} units, {}", result.predicted_quantity(), advice.action);
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub use restock;
pub use sales_forecast;
pub use sales_math;

/// Commonly used types from every member crate
pub mod prelude {
    pub use restock::{
        ProductSales, Recommendation, RestockAction, RestockError, RestockPolicy, RestockRules,
    };
    pub use sales_forecast::{
        forecast, CancelFlag, DataLoader, EmptyTestPolicy, ForecastConfig, ForecastError,
        ForecastRecord, ForecastResult, ForecastService, ForecastSink, Forecaster, InMemorySink,
        JsonLinesSink, SalesSeries,
    };
    pub use sales_math::{MathError, MinMaxScaler};
}
