//! ページの幾何: 要素の矩形、スクロール中のビューポート、両者の交差率
//!
//! 座標はすべてドキュメント空間の CSS ピクセル (y は下向き、0 がページ先頭)。

use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// An axis-aligned box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two boxes, if they share any point (edges included).
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        (right >= left && bottom >= top).then(|| Self::new(left, top, right - left, bottom - top))
    }

    /// Grows (positive) or shrinks (negative) each side by `margin`.
    #[must_use]
    pub fn expand(&self, margin: &RootMargin) -> Self {
        Self::new(
            self.x - margin.left,
            self.y - margin.top,
            self.width + margin.left + margin.right,
            self.height + margin.top + margin.bottom,
        )
    }
}

/// Error parsing a [`RootMargin`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RootMarginError {
    #[error("Root margin must have 1 to 4 values, got {0}")]
    Arity(usize),
    #[error("Invalid root margin length '{0}': expected a pixel value such as '-50px'")]
    Length(String),
}

/// Offsets applied to the viewport box before computing intersections.
///
/// Negative values shrink the box, so an element must travel further into
/// view before it counts as intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const ZERO: Self = Self { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
}

impl FromStr for RootMargin {
    type Err = RootMarginError;

    /// Parses CSS margin shorthand made of `px` lengths
    /// (`"10px"`, `"10px 20px"`, `"0px 0px -50px 0px"`, …).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s.split_whitespace().map(parse_px).collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            other => Err(RootMarginError::Arity(other.len())),
        }
    }
}

/// Parses one `px` length. A bare `0` is accepted as in CSS.
fn parse_px(token: &str) -> Result<f64, RootMarginError> {
    let number = if token == "0" { token } else { token.strip_suffix("px").unwrap_or("") };

    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RootMarginError::Length(token.to_string()))
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Vertical scroll offset
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
    /// Full scrollable height of the document
    pub document_height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(scroll_y: f64, width: f64, height: f64, document_height: f64) -> Self {
        Self { scroll_y, width, height, document_height }
    }

    /// The viewport box in document coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }

    /// Largest reachable scroll offset; zero when nothing overflows.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }

    /// Same viewport scrolled to `scroll_y`.
    #[must_use]
    pub const fn scrolled_to(self, scroll_y: f64) -> Self {
        Self { scroll_y, ..self }
    }
}

/// Fraction of `target` inside the viewport box grown by `margin`, in
/// `[0, 1]`.
///
/// A zero-area target counts as fully visible when it lies inside the box.
#[must_use]
pub fn intersection_ratio(target: &Rect, viewport: &Viewport, margin: &RootMargin) -> f64 {
    let root = viewport.bounds().expand(margin);
    let Some(overlap) = target.intersection(&root) else {
        return 0.0;
    };

    let area = target.area();
    if area <= 0.0 {
        return 1.0;
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const VIEWPORT: Viewport = Viewport::new(0.0, 1000.0, 800.0, 4000.0);

    #[rstest]
    #[case::fully_inside(Rect::new(0.0, 100.0, 500.0, 200.0), 1.0)]
    #[case::below_fold(Rect::new(0.0, 900.0, 500.0, 200.0), 0.0)]
    #[case::half_visible(Rect::new(0.0, 700.0, 500.0, 200.0), 0.5)]
    #[case::quarter_visible(Rect::new(0.0, 750.0, 500.0, 200.0), 0.25)]
    fn ratio_without_margin(#[case] target: Rect, #[case] expected: f64) {
        let ratio = intersection_ratio(&target, &VIEWPORT, &RootMargin::ZERO);

        assert_that!(ratio, approx_eq(expected));
    }

    #[rstest]
    fn negative_bottom_margin_delays_intersection() {
        let target = Rect::new(0.0, 700.0, 500.0, 200.0);
        let margin: RootMargin = "0px 0px -50px 0px".parse().unwrap();

        let ratio = intersection_ratio(&target, &VIEWPORT, &margin);

        assert_that!(ratio, approx_eq(0.25));
    }

    #[rstest]
    fn scrolling_brings_target_into_view() {
        let target = Rect::new(0.0, 1200.0, 500.0, 200.0);

        let before = intersection_ratio(&target, &VIEWPORT, &RootMargin::ZERO);
        let after = intersection_ratio(&target, &VIEWPORT.scrolled_to(600.0), &RootMargin::ZERO);

        assert_that!(before, approx_eq(0.0));
        assert_that!(after, approx_eq(1.0));
    }

    #[rstest]
    fn zero_area_target_inside_is_fully_visible() {
        let target = Rect::new(10.0, 10.0, 0.0, 0.0);

        assert_that!(intersection_ratio(&target, &VIEWPORT, &RootMargin::ZERO), approx_eq(1.0));
    }

    #[rstest]
    #[case("10px", RootMargin::new(10.0, 10.0, 10.0, 10.0))]
    #[case("0", RootMargin::ZERO)]
    #[case("5px -5px", RootMargin::new(5.0, -5.0, 5.0, -5.0))]
    #[case("1px 2px 3px", RootMargin::new(1.0, 2.0, 3.0, 2.0))]
    #[case("0px 0px -50px 0px", RootMargin::new(0.0, 0.0, -50.0, 0.0))]
    fn parse_root_margin(#[case] input: &str, #[case] expected: RootMargin) {
        assert_eq!(input.parse::<RootMargin>(), Ok(expected));
    }

    #[rstest]
    #[case("", RootMarginError::Arity(0))]
    #[case("1px 2px 3px 4px 5px", RootMarginError::Arity(5))]
    #[case("10%", RootMarginError::Length("10%".to_string()))]
    #[case("px", RootMarginError::Length("px".to_string()))]
    fn parse_root_margin_errors(#[case] input: &str, #[case] expected: RootMarginError) {
        assert_eq!(input.parse::<RootMargin>(), Err(expected));
    }

    #[rstest]
    #[case(Viewport::new(0.0, 1000.0, 800.0, 4000.0), 3200.0)]
    #[case(Viewport::new(0.0, 1000.0, 800.0, 800.0), 0.0)]
    #[case(Viewport::new(0.0, 1000.0, 800.0, 500.0), 0.0)]
    fn max_scroll(#[case] viewport: Viewport, #[case] expected: f64) {
        assert_that!(viewport.max_scroll(), approx_eq(expected));
    }
}
