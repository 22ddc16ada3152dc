//! Integration tests for the indicator engines

use lgns_signals::services::signals::indicators::bollinger::{BandZone, Volatility};
use lgns_signals::services::signals::indicators::smoothing::wilder_smooth;
use lgns_signals::{Adx, BollingerBands, Cci, Crossover, Ichimoku, PricePoint, Signal};

const EPS: f64 = 1e-9;

fn points_from(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| PricePoint::new(format!("day {}", i + 1), *p))
        .collect()
}

fn sine_points(count: usize) -> Vec<PricePoint> {
    (0..count)
        .map(|i| {
            let price = 10.0 + (i as f64 * 0.3).sin() * 1.5 + i as f64 * 0.02;
            PricePoint::with_range(format!("day {}", i + 1), price, price + 0.2, price - 0.25)
        })
        .collect()
}

#[test]
fn test_wilder_smooth_exact_values() {
    let smoothed = wilder_smooth(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
    assert!((smoothed[2] - 6.0).abs() < EPS);
    assert!((smoothed[3] - 8.0).abs() < EPS);
    assert!((smoothed[4] - 31.0 / 3.0).abs() < EPS);
}

#[test]
fn test_engines_are_deterministic() {
    let points = sine_points(90);

    let adx = Adx::default();
    assert_eq!(adx.series(&points), adx.series(&points));

    let bands = BollingerBands::default();
    assert_eq!(bands.series(&points), bands.series(&points));

    let cci = Cci::default();
    assert_eq!(cci.series(&points), cci.series(&points));

    let ichimoku = Ichimoku::default();
    assert_eq!(ichimoku.series(&points), ichimoku.series(&points));
}

#[test]
fn test_inputs_are_not_mutated() {
    let points = sine_points(60);
    let before = points.clone();
    let _ = Adx::default().analyze(&points);
    let _ = Ichimoku::default().analyze(&points);
    assert_eq!(points, before);
}

#[test]
fn test_series_lengths_match_input() {
    let points = sine_points(70);
    assert_eq!(Adx::default().series(&points).len(), 70);
    assert_eq!(BollingerBands::default().series(&points).len(), 70);
    assert_eq!(Cci::default().series(&points).len(), 70);
    assert_eq!(Ichimoku::default().series(&points).len(), 70 + 26);
}

#[test]
fn test_adx_first_valid_index() {
    for period in [5usize, 14] {
        let adx = Adx::new(period, 0.01).unwrap();
        let series = adx.series(&sine_points(60));
        let first = series.iter().position(|p| p.adx.is_some()).unwrap();
        assert_eq!(first, 2 * period - 2);
    }
}

#[test]
fn test_synthesized_range_matches_explicit_one() {
    let prices: Vec<f64> = (0..40).map(|i| 5.0 + (i as f64 * 0.7).cos()).collect();
    let synthetic = points_from(&prices);
    let explicit: Vec<PricePoint> = prices
        .iter()
        .enumerate()
        .map(|(i, p)| PricePoint::with_range(format!("day {}", i + 1), *p, p * 1.01, p * 0.99))
        .collect();

    let adx = Adx::default();
    let a = adx.analyze(&synthetic).unwrap();
    let b = adx.analyze(&explicit).unwrap();
    assert!((a.adx - b.adx).abs() < EPS);

    let cci = Cci::default();
    let a = cci.analyze(&synthetic).unwrap();
    let b = cci.analyze(&explicit).unwrap();
    assert!((a.cci - b.cci).abs() < EPS);
}

#[test]
fn test_cci_flat_series_zero_not_nan() {
    let points: Vec<PricePoint> = (0..40)
        .map(|i| PricePoint::with_range(format!("day {}", i + 1), 12.34, 12.34, 12.34))
        .collect();
    let series = Cci::default().series(&points);
    for point in &series[19..] {
        let cci = point.cci.unwrap();
        assert!(cci.is_finite());
        assert_eq!(cci, 0.0);
    }
}

#[test]
fn test_cci_can_exceed_200() {
    let mut prices = vec![100.0; 25];
    prices.push(150.0);
    let points = points_from(&prices);
    let analysis = Cci::default().analyze(&points).unwrap();
    assert!(analysis.cci > 200.0, "spike should be extreme, got {}", analysis.cci);
}

#[test]
fn test_ichimoku_span_a_displacement() {
    // Unit conversion/base periods make Span A defined from the first bar
    let ichimoku = Ichimoku::new(1, 1, 1, 26, 0.01).unwrap();
    let points = sine_points(40);
    let chart = ichimoku.series(&points);

    assert_eq!(chart.len(), 66);
    assert!(chart[..26].iter().all(|slot| slot.senkou_a.is_none()));

    let first = &points[0];
    let high = first.high.unwrap();
    let low = first.low.unwrap();
    let expected = (high + low) / 2.0;
    assert!((chart[26].senkou_a.unwrap() - expected).abs() < EPS);
}

#[test]
fn test_ichimoku_chikou_backward_shift() {
    let ichimoku = Ichimoku::default();
    let points = sine_points(60);
    let chart = ichimoku.series(&points);
    for i in 26..60 {
        assert_eq!(chart[i - 26].chikou, Some(points[i].price));
    }
    assert!(chart[34..].iter().all(|slot| slot.chikou.is_none()));
}

#[test]
fn test_bollinger_squeeze_before_spike() {
    // Volatile stretch, then a tight range, then a breakout
    let mut prices: Vec<f64> = (0..30)
        .map(|i| if i % 2 == 0 { 90.0 } else { 110.0 })
        .collect();
    prices.extend((0..20).map(|i| if i % 2 == 0 { 100.0 } else { 100.01 }));

    let bands = BollingerBands::default();
    let before = bands.analyze(&points_from(&prices)).unwrap();
    assert!(before.bandwidth < 0.1, "bandwidth should be near 0, got {}", before.bandwidth);
    assert!(before.squeeze);
    assert_eq!(before.volatility, Volatility::Low);

    prices.push(130.0);
    let after = bands.analyze(&points_from(&prices)).unwrap();
    assert!(after.bandwidth > before.bandwidth * 100.0);
    assert_eq!(after.zone, BandZone::Overbought);
}

#[test]
fn test_signal_outputs_in_range() {
    let points = sine_points(120);
    let indicators: Vec<Box<dyn Signal>> = vec![
        Box::new(Adx::default()),
        Box::new(BollingerBands::default()),
        Box::new(Cci::default()),
        Box::new(Ichimoku::default()),
    ];
    for indicator in &indicators {
        let output = indicator
            .calculate(&points)
            .unwrap_or_else(|| panic!("{} should have enough data", indicator.id()));
        assert!(output.score >= -100 && output.score <= 100);
        assert!(output.value.is_finite());
    }
}

#[test]
fn test_adx_signal_none_without_cross() {
    let points: Vec<PricePoint> = (0..50)
        .map(|i| {
            let base = 50.0 + i as f64;
            PricePoint::with_range(format!("day {}", i + 1), base, base + 1.0, base - 0.5)
        })
        .collect();
    let analysis = Adx::default().analyze(&points).unwrap();
    assert_eq!(analysis.signal, Crossover::None);
}
