//! Chart geometry, independent of any drawing surface.
//!
//! Every function here is pure: given the same values and canvas size it
//! returns the same primitives. Angles are radians with 0 at 3 o'clock and
//! increasing clockwise in screen coordinates; y grows downwards.

use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

mod bars;
mod donut;

pub use bars::{Bar, BarLayout, BarStyle, RegimeChart, comparative_bars, regime_bars};
pub use donut::{
    DonutLayout, LegendEntry, ProportionalLayout, Segment, deduction_categories,
    proportional_segments,
};

/// Canvas height the dashboard charts are drawn at.
pub const DEFAULT_HEIGHT: f64 = 250.0;

/// A CSS-style hex colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(Cow<'static, str>);

impl Color {
    pub const fn from_static(hex: &'static str) -> Self {
        Color(Cow::Borrowed(hex))
    }

    pub fn new(hex: impl Into<String>) -> Self {
        Color(Cow::Owned(hex.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Point { x, y }
    }
}

/// One labelled value to encode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

impl Category {
    pub fn new(
        label: impl Into<String>,
        value: f64,
        color: Color,
    ) -> Self {
        Category {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Only finite, strictly positive values are drawn.
pub(crate) fn drawable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
