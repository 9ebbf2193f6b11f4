use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;

use super::{Category, Color, Point, drawable, to_f64};
use crate::models::{DeductionData, STANDARD_DEDUCTION};

/// First segment starts at 12 o'clock.
const START_ANGLE: f64 = -FRAC_PI_2;
const CENTER_X_RATIO: f64 = 0.35;
const RADIUS_INSET: f64 = 20.0;
const INNER_RADIUS_RATIO: f64 = 0.55;
const LEGEND_X_RATIO: f64 = 0.72;
const LEGEND_TOP: f64 = 20.0;
const LEGEND_ROW_PITCH: f64 = 24.0;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_TEXT_OFFSET: Point = Point::new(18.0, 10.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub label: String,
    pub value: f64,
    pub color: Color,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Segment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub value: f64,
    pub color: Color,
    /// Top-left corner of the square swatch.
    pub swatch: Point,
    pub swatch_size: f64,
    /// Baseline start of the `label: value` text.
    pub text: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutLayout {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub segments: Vec<Segment>,
    pub center_total: f64,
    pub total_anchor: Point,
    pub caption_anchor: Point,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProportionalLayout {
    /// Nothing to draw; show a placeholder instead.
    Empty,
    Donut(DonutLayout),
}

impl ProportionalLayout {
    pub fn donut(&self) -> Option<&DonutLayout> {
        match self {
            ProportionalLayout::Donut(layout) => Some(layout),
            ProportionalLayout::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ProportionalLayout::Empty)
    }
}

/// Lays `categories` out as a donut with a legend to its right.
///
/// Non-positive values are dropped; the rest keep their input order. The
/// last segment closes exactly at the start angle plus a full turn.
pub fn proportional_segments(
    categories: &[Category],
    width: f64,
    height: f64,
) -> ProportionalLayout {
    let kept: Vec<&Category> = categories.iter().filter(|c| drawable(c.value)).collect();
    if kept.is_empty() {
        return ProportionalLayout::Empty;
    }

    let total: f64 = kept.iter().map(|c| c.value).sum();
    let center = Point::new(width * CENTER_X_RATIO, height / 2.0);
    let outer_radius = (center.x.min(center.y) - RADIUS_INSET).max(0.0);

    let mut segments = Vec::with_capacity(kept.len());
    let mut start = START_ANGLE;
    for (i, cat) in kept.iter().enumerate() {
        let end = if i + 1 == kept.len() {
            (START_ANGLE + TAU).max(start)
        } else {
            start + cat.value / total * TAU
        };
        segments.push(Segment {
            label: cat.label.clone(),
            value: cat.value,
            color: cat.color.clone(),
            start_angle: start,
            end_angle: end,
        });
        start = end;
    }

    let legend_x = width * LEGEND_X_RATIO;
    let legend = kept
        .iter()
        .enumerate()
        .map(|(row, cat)| {
            let y = LEGEND_TOP + row as f64 * LEGEND_ROW_PITCH;
            LegendEntry {
                label: cat.label.clone(),
                value: cat.value,
                color: cat.color.clone(),
                swatch: Point::new(legend_x, y),
                swatch_size: LEGEND_SWATCH,
                text: Point::new(legend_x + LEGEND_TEXT_OFFSET.x, y + LEGEND_TEXT_OFFSET.y),
            }
        })
        .collect();

    ProportionalLayout::Donut(DonutLayout {
        center,
        outer_radius,
        inner_radius: outer_radius * INNER_RADIUS_RATIO,
        segments,
        center_total: total,
        total_anchor: Point::new(center.x, center.y - 4.0),
        caption_anchor: Point::new(center.x, center.y + 16.0),
        legend,
    })
}

/// The deduction breakdown shown on the dashboard, in display order.
///
/// A zero standard deduction is shown at its statutory amount.
pub fn deduction_categories(deductions: &DeductionData) -> Vec<Category> {
    let standard = if deductions.standard_deduction.is_zero() {
        STANDARD_DEDUCTION
    } else {
        deductions.standard_deduction
    };
    vec![
        Category::new("80C", to_f64(deductions.section_80c), Color::from_static("#6366f1")),
        Category::new("80CCD", to_f64(deductions.section_80ccd_1b), Color::from_static("#8b5cf6")),
        Category::new("80D", to_f64(deductions.section_80d), Color::from_static("#10b981")),
        Category::new("80G", to_f64(deductions.section_80g), Color::from_static("#3b82f6")),
        Category::new("HRA", to_f64(deductions.hra_exemption), Color::from_static("#f59e0b")),
        Category::new(
            "Home Loan",
            to_f64(deductions.home_loan_interest),
            Color::from_static("#ef4444"),
        ),
        Category::new("Std Ded", to_f64(standard), Color::from_static("#64748b")),
    ]
}
