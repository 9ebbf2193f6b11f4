use serde::Serialize;

use super::{Color, Point, to_f64};
use crate::models::{Regime, TaxComparison};

const BAR_WIDTH: f64 = 60.0;
const BAR_GAP: f64 = 40.0;
/// Space reserved above and below the bars for value and category labels.
const VERTICAL_MARGIN: f64 = 80.0;
const BASELINE_INSET: f64 = 40.0;
const CORNER_RADIUS: f64 = 8.0;
const LABEL_INSET: f64 = 16.0;
const VALUE_GAP: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    /// The raw input, for the value label.
    pub value: f64,
    pub x: f64,
    /// Top edge; the bar extends down to the baseline.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Radius of the two top corners.
    pub corner_radius: f64,
    pub label_anchor: Point,
    pub value_anchor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarLayout {
    pub bar_a: Bar,
    pub bar_b: Bar,
    pub max_value: f64,
    pub baseline: f64,
}

/// Two side-by-side bars scaled against the larger value.
///
/// The scale never drops below 1, so two zeros give two empty bars.
/// Negative or non-finite values draw as empty bars but keep their raw value.
pub fn comparative_bars(
    a: f64,
    b: f64,
    width: f64,
    height: f64,
) -> BarLayout {
    let a_scaled = clamp_value(a);
    let b_scaled = clamp_value(b);
    let max_value = a_scaled.max(b_scaled).max(1.0);
    let available = (height - VERTICAL_MARGIN).max(0.0);
    let baseline = height - BASELINE_INSET;
    let start_x = (width - (BAR_WIDTH * 2.0 + BAR_GAP)) / 2.0;

    let bar = |value: f64, scaled: f64, x: f64| {
        let bar_height = scaled / max_value * available;
        let top = baseline - bar_height;
        let mid = x + BAR_WIDTH / 2.0;
        Bar {
            value,
            x,
            y: top,
            width: BAR_WIDTH,
            height: bar_height,
            corner_radius: CORNER_RADIUS.min(bar_height),
            label_anchor: Point::new(mid, height - LABEL_INSET),
            value_anchor: Point::new(mid, top - VALUE_GAP),
        }
    };

    BarLayout {
        bar_a: bar(a, a_scaled, start_x),
        bar_b: bar(b, b_scaled, start_x + BAR_WIDTH + BAR_GAP),
        max_value,
        baseline,
    }
}

fn clamp_value(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Category label and vertical gradient of one bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarStyle {
    pub label: &'static str,
    pub fill_top: Color,
    pub fill_bottom: Color,
}

impl BarStyle {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Old => BarStyle {
                label: regime.label(),
                fill_top: Color::from_static("#6366f1"),
                fill_bottom: Color::from_static("#4f46e5"),
            },
            Regime::New => BarStyle {
                label: regime.label(),
                fill_top: Color::from_static("#10b981"),
                fill_bottom: Color::from_static("#059669"),
            },
        }
    }
}

/// Old-versus-new total tax, old regime on the left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeChart {
    pub layout: BarLayout,
    pub old_style: BarStyle,
    pub new_style: BarStyle,
    pub recommended: Regime,
}

pub fn regime_bars(
    comparison: &TaxComparison,
    width: f64,
    height: f64,
) -> RegimeChart {
    RegimeChart {
        layout: comparative_bars(
            to_f64(comparison.old_regime.total_tax),
            to_f64(comparison.new_regime.total_tax),
            width,
            height,
        ),
        old_style: BarStyle::for_regime(Regime::Old),
        new_style: BarStyle::for_regime(Regime::New),
        recommended: comparison.recommended,
    }
}
