//! Look-ahead contamination tests for every indicator.
//!
//! Invariant: no indicator value at bar t may depend on price data from bar
//! t+1 or later. The one exception is the Ichimoku lagging line, which by
//! definition reads the close `displacement` bars ahead; it is checked
//! separately below.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use horizonlab_core::data::{SeriesProvider, SyntheticProvider};
use horizonlab_core::indicators::{compute_indicator, IndicatorKind, IndicatorOutput};
use horizonlab_core::PriceSeries;

const FULL: usize = 200;
const TRUNCATED: usize = 100;

fn full_series() -> PriceSeries {
    SyntheticProvider::new(FULL).fetch_all("LOOKAHEAD").unwrap()
}

fn assert_no_lookahead(kind: &IndicatorKind, full: &PriceSeries) {
    let truncated = full.slice(0..TRUNCATED);
    let base = kind.name();
    let full_values = compute_indicator(kind, full).unwrap().named_series(&base);
    let truncated_values = compute_indicator(kind, &truncated)
        .unwrap()
        .named_series(&base);

    for (name, t_series) in truncated_values.iter() {
        if name.ends_with("_lagging") {
            continue;
        }
        let f_series = full_values.get_series(name).unwrap();
        assert_eq!(t_series.len(), TRUNCATED, "{name}: truncated length");
        assert_eq!(f_series.len(), FULL, "{name}: full length");

        for i in 0..TRUNCATED {
            let (t, f) = (t_series[i], f_series[i]);
            if t.is_nan() && f.is_nan() {
                continue;
            }
            assert!(
                !t.is_nan() && !f.is_nan(),
                "{name}: NaN mismatch at bar {i} (truncated={t}, full={f})"
            );
            assert!(
                (t - f).abs() < 1e-10,
                "{name}: value mismatch at bar {i} (truncated={t}, full={f})"
            );
        }
    }
}

#[test]
fn no_lookahead_with_standard_parameters() {
    let full = full_series();
    for name in IndicatorKind::NAMES {
        let kind: IndicatorKind = name.parse().unwrap();
        assert_no_lookahead(&kind, &full);
    }
}

#[test]
fn no_lookahead_with_short_periods() {
    let full = full_series();
    let kinds = [
        IndicatorKind::Sma { period: 3 },
        IndicatorKind::Ema { period: 3 },
        IndicatorKind::StdDev { period: 2 },
        IndicatorKind::Bollinger {
            period: 5,
            multiplier: 1.5,
        },
        IndicatorKind::Rsi { period: 2 },
        IndicatorKind::Macd {
            fast: 3,
            slow: 6,
            signal: 2,
        },
        IndicatorKind::Stochastic {
            period: 5,
            smooth_k: 1,
            smooth_d: 2,
        },
        IndicatorKind::Ichimoku {
            conversion: 3,
            base: 5,
            span_b: 8,
            displacement: 4,
        },
        IndicatorKind::Adx { period: 3 },
    ];
    for kind in &kinds {
        assert_no_lookahead(kind, &full);
    }
}

#[test]
fn lagging_line_reads_exactly_displacement_ahead() {
    let full = full_series();
    let kind: IndicatorKind = "ichimoku".parse().unwrap();
    let IndicatorOutput::Ichimoku(out) = compute_indicator(&kind, &full).unwrap() else {
        panic!("ichimoku must produce ichimoku output");
    };
    let closes = full.closes();
    for i in 0..FULL - 26 {
        assert_eq!(out.lagging[i], closes[i + 26]);
    }
    assert!(out.lagging[FULL - 26..].iter().all(|v| v.is_nan()));
}
