use chrono::NaiveDate;
use rstest::rstest;
use sales_forecast::{
    forecast, EmptyTestPolicy, ForecastConfig, ForecastError, Forecaster, SalesSeries,
    SequencePreparer,
};

fn series(quantities: &[u64]) -> SalesSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    SalesSeries::from_quantities(start, quantities)
}

fn weekly_pattern(days: usize) -> Vec<u64> {
    let week = [12, 15, 14, 18, 25, 30, 22];
    (0..days).map(|d| week[d % 7] + (d / 7) as u64).collect()
}

#[test]
fn test_reference_scenario() {
    let s = series(&[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);
    let result = forecast(&s, 7, 50).unwrap();

    assert_eq!(result.train_windows(), 3);
    assert_eq!(result.test_windows(), 1);

    let predicted = result.predicted_quantity();
    let mae = result.mae().unwrap();
    let rmse = result.rmse().unwrap();
    assert!(predicted.is_finite());
    assert!(mae.is_finite() && mae >= 0.0);
    assert!(rmse.is_finite() && rmse >= 0.0);
    // Plausible range for a series between 5 and 15
    assert!(predicted > -50.0 && predicted < 100.0);
}

#[test]
fn test_deterministic_with_fixed_seed() {
    let s = series(&weekly_pattern(35));
    let config = ForecastConfig::default().with_seed(2024);

    let first = Forecaster::new(config.clone()).unwrap().forecast(&s).unwrap();
    let second = Forecaster::new(config).unwrap().forecast(&s).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_seed_changes_initialisation() {
    let s = series(&weekly_pattern(35));
    let a = Forecaster::new(ForecastConfig::default().with_seed(1))
        .unwrap()
        .forecast(&s)
        .unwrap();
    let b = Forecaster::new(ForecastConfig::default().with_seed(2))
        .unwrap()
        .forecast(&s)
        .unwrap();

    assert_ne!(a.predicted_quantity(), b.predicted_quantity());
}

#[rstest]
#[case(0, 7)]
#[case(5, 7)]
#[case(7, 7)]
#[case(3, 3)]
fn test_insufficient_data(#[case] len: usize, #[case] n_steps: usize) {
    let s = series(&weekly_pattern(len));
    let err = forecast(&s, n_steps, 5).unwrap_err();

    match err {
        ForecastError::InsufficientData { required, available } => {
            assert_eq!(required, n_steps + 1);
            assert_eq!(available, len);
        }
        other => panic!("Expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn test_degenerate_series() {
    let s = series(&[10, 10, 10, 10, 10, 10, 10, 10, 10, 10]);
    let err = forecast(&s, 7, 50).unwrap_err();

    assert!(matches!(err, ForecastError::DegenerateSeries(v) if v == 10.0));
    assert!(err.is_data_limitation());
}

#[rstest]
#[case(11, 7)]
#[case(20, 7)]
#[case(30, 5)]
#[case(60, 7)]
fn test_window_and_split_counts(#[case] len: usize, #[case] n_steps: usize) {
    let s = series(&weekly_pattern(len));
    let prepared = SequencePreparer::new(n_steps).unwrap().prepare(&s).unwrap();
    let windows = len - n_steps;
    assert_eq!(prepared.windows().len(), windows);

    let config = ForecastConfig::default().with_n_steps(n_steps).with_epochs(3);
    let result = Forecaster::new(config).unwrap().forecast(&s).unwrap();
    let expected_train = (0.8 * windows as f64).floor() as usize;

    assert_eq!(result.train_windows(), expected_train);
    assert_eq!(result.train_windows() + result.test_windows(), windows);
}

#[test]
fn test_metrics_non_negative_on_longer_history() {
    let s = series(&weekly_pattern(60));
    let result = Forecaster::new(ForecastConfig::default())
        .unwrap()
        .forecast(&s)
        .unwrap();

    let mae = result.mae().unwrap();
    let rmse = result.rmse().unwrap();
    assert!(mae >= 0.0);
    assert!(rmse >= mae);
    assert!(result.predicted_quantity().is_finite());
}

#[test]
fn test_gaps_are_positional() {
    // Dates with gaps produce the same forecast as consecutive dates
    let quantities = weekly_pattern(14);
    let consecutive = series(&quantities);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let gapped_points = quantities
        .iter()
        .enumerate()
        .map(|(i, &quantity)| sales_forecast::DailySales {
            date: start + chrono::Duration::days(3 * i as i64),
            quantity,
        })
        .collect();
    let gapped = SalesSeries::new(gapped_points).unwrap();

    let config = ForecastConfig::default().with_epochs(5);
    let a = Forecaster::new(config.clone()).unwrap().forecast(&consecutive).unwrap();
    let b = Forecaster::new(config).unwrap().forecast(&gapped).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_omit_metrics_policy() {
    let s = series(&weekly_pattern(20));
    let config = ForecastConfig::default()
        .with_train_fraction(1.0)
        .with_empty_test_policy(EmptyTestPolicy::OmitMetrics);

    let result = Forecaster::new(config).unwrap().forecast(&s).unwrap();
    assert_eq!(result.test_windows(), 0);
    assert!(result.mae().is_none());
    assert!(result.rmse().is_none());
}
