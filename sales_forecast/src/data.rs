//! Sales history handling for forecasting
//!
//! Raw sales arrive as line items (one row per product sold on a date). The
//! forecaster consumes a [`SalesSeries`]: one aggregate quantity per distinct
//! date, ascending by date. Missing dates are not imputed; once aggregated the
//! series is treated positionally.

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One recorded sale of a product on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineItem {
    /// Day the sale was recorded
    pub date: NaiveDate,
    /// Product that was sold
    pub product_id: u64,
    /// Units sold; negative values are rejected during aggregation
    pub quantity: i64,
}

/// Aggregate units sold on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    /// Day of the aggregate
    pub date: NaiveDate,
    /// Total units sold that day
    pub quantity: u64,
}

/// Ordered daily sales history for one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSeries {
    points: Vec<DailySales>,
}

impl SalesSeries {
    /// Create a series from already aggregated daily points
    ///
    /// Points must be strictly ascending by date, which also rules out
    /// duplicate dates.
    pub fn new(points: Vec<DailySales>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|pair| pair[1].date <= pair[0].date) {
            return Err(ForecastError::DataError(format!(
                "Sales series must be strictly ascending by date: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { points })
    }

    /// Sum line items per date and order the result ascending
    pub fn aggregate(items: &[SaleLineItem]) -> Result<Self> {
        let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();

        for item in items {
            let quantity = u64::try_from(item.quantity).map_err(|_| {
                ForecastError::DataError(format!(
                    "Negative quantity {} for product {} on {}",
                    item.quantity, item.product_id, item.date
                ))
            })?;

            let total = totals.entry(item.date).or_insert(0);
            *total = total.checked_add(quantity).ok_or_else(|| {
                ForecastError::DataError(format!("Quantity overflow on {}", item.date))
            })?;
        }

        Ok(Self {
            points: totals
                .into_iter()
                .map(|(date, quantity)| DailySales { date, quantity })
                .collect(),
        })
    }

    /// Create a series of consecutive days starting at `start` (for testing)
    pub fn from_quantities(start: NaiveDate, quantities: &[u64]) -> Self {
        let points = quantities
            .iter()
            .enumerate()
            .map(|(i, &quantity)| DailySales {
                date: start + Duration::days(i as i64),
                quantity,
            })
            .collect();

        Self { points }
    }

    /// Daily points, ascending by date
    pub fn points(&self) -> &[DailySales] {
        &self.points
    }

    /// Quantities as floating point values in date order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity as f64).collect()
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Data loader for sales line items
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load line items from a CSV file with `date,product_id,quantity` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SaleLineItem>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load line items from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<SaleLineItem>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut items = Vec::new();
        for record in csv_reader.deserialize() {
            items.push(record?);
        }

        if items.is_empty() {
            return Err(ForecastError::DataError(
                "No sales rows found in data".to_string(),
            ));
        }

        Ok(items)
    }

    /// Load a CSV file and aggregate it into a daily series
    ///
    /// When `product_id` is given only that product's rows are counted.
    pub fn daily_series<P: AsRef<Path>>(path: P, product_id: Option<u64>) -> Result<SalesSeries> {
        let items = Self::from_csv(path)?;
        let selected: Vec<SaleLineItem> = match product_id {
            Some(id) => items.into_iter().filter(|i| i.product_id == id).collect(),
            None => items,
        };

        SalesSeries::aggregate(&selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_aggregate_sums_and_orders() {
        let items = vec![
            SaleLineItem { date: date("2024-03-03"), product_id: 1, quantity: 4 },
            SaleLineItem { date: date("2024-03-01"), product_id: 1, quantity: 2 },
            SaleLineItem { date: date("2024-03-03"), product_id: 2, quantity: 5 },
            SaleLineItem { date: date("2024-03-01"), product_id: 2, quantity: 1 },
        ];

        let series = SalesSeries::aggregate(&items).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0], DailySales { date: date("2024-03-01"), quantity: 3 });
        assert_eq!(series.points()[1], DailySales { date: date("2024-03-03"), quantity: 9 });
        // Gap on 2024-03-02 is kept as-is
        assert_eq!(series.values(), vec![3.0, 9.0]);
        assert_eq!(series.last_date(), Some(date("2024-03-03")));
    }

    #[test]
    fn test_aggregate_rejects_negative_quantity() {
        let items = vec![SaleLineItem { date: date("2024-03-01"), product_id: 7, quantity: -2 }];
        assert!(matches!(
            SalesSeries::aggregate(&items),
            Err(ForecastError::DataError(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicates_and_disorder() {
        let dup = vec![
            DailySales { date: date("2024-01-01"), quantity: 1 },
            DailySales { date: date("2024-01-01"), quantity: 2 },
        ];
        assert!(SalesSeries::new(dup).is_err());

        let disordered = vec![
            DailySales { date: date("2024-01-02"), quantity: 1 },
            DailySales { date: date("2024-01-01"), quantity: 2 },
        ];
        assert!(SalesSeries::new(disordered).is_err());

        let ok = vec![
            DailySales { date: date("2024-01-01"), quantity: 1 },
            DailySales { date: date("2024-01-05"), quantity: 2 },
        ];
        assert_eq!(SalesSeries::new(ok).unwrap().len(), 2);
    }

    #[test]
    fn test_from_quantities_consecutive_days() {
        let series = SalesSeries::from_quantities(date("2024-02-27"), &[1, 2, 3, 4]);
        assert_eq!(series.len(), 4);
        assert_eq!(series.last_date(), Some(date("2024-03-01")));
        assert!(!series.is_empty());
    }

    #[test]
    fn test_from_reader() {
        let csv = "date,product_id,quantity\n2024-01-01,1,3\n2024-01-01,2,4\n2024-01-02,1,5\n";
        let items = DataLoader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(items.len(), 3);

        let series = SalesSeries::aggregate(&items).unwrap();
        assert_eq!(series.values(), vec![7.0, 5.0]);
    }

    #[test]
    fn test_from_reader_errors() {
        let header_only = "date,product_id,quantity\n";
        assert!(matches!(
            DataLoader::from_reader(header_only.as_bytes()),
            Err(ForecastError::DataError(_))
        ));

        let malformed = "date,product_id,quantity\nnot-a-date,1,3\n";
        assert!(matches!(
            DataLoader::from_reader(malformed.as_bytes()),
            Err(ForecastError::CsvError(_))
        ));
    }
}
