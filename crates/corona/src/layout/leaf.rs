//! Leaf placement: from an assigned sector to the boxes a renderer draws.
//!
//! A leaf shows an icon near the inner radius and a text block further out.
//! The text runs along the bisector of the sector; in the left half of the
//! circle it is flipped by 180° so it never reads upside down.
//!
//! ```text
//!   center ─── inner ─┬─ icon ─┬─ text ──────────────┬─ outer
//!                     padding  padding               │
//!                                          badges ◄──┘ (trailing edge)
//! ```

use std::f64::consts::SQRT_2;

use log::trace;
use serde::Serialize;

use corona_core::{
    geometry::{Bounds, Placement, Point, RadialRange, Size, normalize_degrees, subtended_angle},
    model::BadgeKind,
    text::{TextMeasure, fit_to_width},
};

use super::LeafContent;
use crate::config::{LayoutConfig, TextConfig};

/// Box of a single badge along the trailing edge of a sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeGeometry {
    kind: BadgeKind,
    bounds: Bounds,
}

impl BadgeGeometry {
    pub fn kind(&self) -> BadgeKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Execution counter label placed just inside the inner radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterGeometry {
    text: String,
    bounds: Bounds,
}

impl CounterGeometry {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Concrete drawing geometry of one leaf for one layout pass.
///
/// All boxes are axis-aligned and live in the same coordinate space as the
/// placement center. The text box is given unrotated; a renderer rotates it
/// by [`text_rotation`](Self::text_rotation) degrees around its center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafGeometry {
    icon: Bounds,
    text: Bounds,
    text_rotation: f64,
    reversed: bool,
    minimum_view: bool,
    selected: bool,
    header: String,
    details: Vec<String>,
    badges: Vec<BadgeGeometry>,
    counter: Option<CounterGeometry>,
}

impl LeafGeometry {
    pub fn icon(&self) -> Bounds {
        self.icon
    }

    pub fn text(&self) -> Bounds {
        self.text
    }

    /// Rotation of the text box in degrees, normalized into `[0, 360)`.
    pub fn text_rotation(&self) -> f64 {
        self.text_rotation
    }

    /// Whether the text was flipped by 180° to stay upright.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Whether the leaf shows only its header with a small icon.
    pub fn is_minimum_view(&self) -> bool {
        self.minimum_view
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Header, truncated to the text box width.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Detail lines, truncated to the text box width; empty in minimum view.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Badges in presentation order.
    pub fn badges(&self) -> &[BadgeGeometry] {
        &self.badges
    }

    pub fn counter(&self) -> Option<&CounterGeometry> {
        self.counter.as_ref()
    }
}

/// Returns true when a text running along `bisector` would be upside down.
pub(super) fn needs_flip(bisector: f64) -> bool {
    bisector > 90.0 && bisector < 270.0
}

/// Everything leaf sizing needs from the tree.
pub(super) struct LeafMetrics<'a> {
    layout: &'a LayoutConfig,
    text: &'a TextConfig,
    measure: &'a dyn TextMeasure,
}

impl<'a> LeafMetrics<'a> {
    pub(super) fn new(
        layout: &'a LayoutConfig,
        text: &'a TextConfig,
        measure: &'a dyn TextMeasure,
    ) -> Self {
        Self {
            layout,
            text,
            measure,
        }
    }

    fn icon_side(&self, minimum_view: bool) -> f64 {
        if minimum_view {
            self.layout.small_icon_side()
        } else {
            self.layout.icon_side()
        }
    }

    /// Height of the text block: header line and its bottom space, then the
    /// detail lines plus one detail ascent outside minimum view.
    fn text_height(&self, content: &LeafContent, minimum_view: bool) -> f64 {
        let header = self.text.header().line_height() + self.layout.header_bottom_space();
        if minimum_view {
            return header;
        }
        let detail = self.text.detail();
        header + content.details().len() as f64 * detail.line_height() + detail.ascent()
    }

    fn text_max_width(&self, radial: RadialRange, icon_diagonal: f64) -> f64 {
        (radial.width() - 2.0 * self.layout.padding() - icon_diagonal).max(0.0)
    }

    /// Angular extent the leaf needs inside `radial`.
    ///
    /// The icon diagonal is measured at the inner radius, the text height
    /// just beyond the icon. An unset band or one touching the center
    /// yields `0`.
    pub(super) fn angular_extent(
        &self,
        content: &LeafContent,
        radial: RadialRange,
        minimum_view: bool,
    ) -> f64 {
        if radial.is_unset() || radial.inner() == 0.0 {
            return 0.0;
        }
        let padding = self.layout.padding();
        let icon_side = self.icon_side(minimum_view);

        let icon_angle = subtended_angle(icon_side * SQRT_2, radial.inner());
        let text_angle = subtended_angle(
            self.text_height(content, minimum_view),
            radial.inner() + 2.0 * padding + icon_side,
        );
        icon_angle.max(text_angle)
    }

    /// Derives the drawing geometry of a leaf placed at `placement`.
    pub(super) fn geometry(
        &self,
        content: &LeafContent,
        placement: &Placement,
        selected: bool,
    ) -> LeafGeometry {
        let radial = placement.radial();
        let angular = placement.angular();
        let padding = self.layout.padding();

        let preferred = self.angular_extent(content, radial, false);
        let minimum_view = angular.extent() < preferred;

        let icon_side = self.icon_side(minimum_view);
        let icon_diagonal = icon_side * SQRT_2;
        let icon_center = placement.point_on_bisector(radial.inner() + padding + icon_side / 2.0);
        let icon = Bounds::new_from_center(icon_center, Size::square(icon_side));

        let max_width = self.text_max_width(radial, icon_diagonal);
        let text_center =
            placement.point_on_bisector(radial.inner() + icon_diagonal + padding + max_width / 2.0);
        let text = Bounds::new_from_center(
            text_center,
            Size::new(max_width, self.text_height(content, minimum_view)),
        );

        let bisector = angular.bisector();
        let reversed = needs_flip(bisector);
        let text_rotation = if reversed {
            normalize_degrees(bisector + 180.0)
        } else {
            bisector
        };

        let header = fit_to_width(content.header(), max_width, self.text.header(), self.measure);
        let details = if minimum_view {
            Vec::new()
        } else {
            content
                .details()
                .iter()
                .map(|line| fit_to_width(line, max_width, self.text.detail(), self.measure))
                .collect()
        };

        trace!(
            bisector,
            minimum_view,
            reversed;
            "Computed leaf geometry"
        );

        LeafGeometry {
            icon,
            text,
            text_rotation,
            reversed,
            minimum_view,
            selected,
            header,
            details,
            badges: self.badges(content.badges(), placement),
            counter: self.counter(content.execution_count(), placement),
        }
    }

    /// Packs badges from the outer radius inwards along the trailing edge.
    ///
    /// The last badge sits outermost; the result is in presentation order.
    fn badges(&self, kinds: &[BadgeKind], placement: &Placement) -> Vec<BadgeGeometry> {
        let center = placement.center();
        let gap = self.layout.badge_gap();
        let side = self.layout.badge_side();
        let diagonal = side * SQRT_2;
        let trailing_edge = placement.angular().end();

        let mut radius = placement.radial().outer();
        let mut badges: Vec<BadgeGeometry> = kinds
            .iter()
            .rev()
            .map(|&kind| {
                // Laid out along +X, just on the leading side of the edge, then rotated.
                let unrotated = Point::new(
                    center.x() + radius - diagonal / 2.0 - gap,
                    center.y() - gap - diagonal / 2.0,
                );
                let location = unrotated.rotate_around(center, trailing_edge);
                radius -= diagonal + gap;
                BadgeGeometry {
                    kind,
                    bounds: Bounds::new_from_center(location, Size::square(side)),
                }
            })
            .collect();
        badges.reverse();
        badges
    }

    fn counter(&self, count: Option<u64>, placement: &Placement) -> Option<CounterGeometry> {
        let text = count?.to_string();
        let size = self.measure.measure(&text, self.text.detail());
        let radius =
            (placement.radial().inner() - self.layout.padding() - size.diagonal() / 2.0).max(0.0);
        let bounds = Bounds::new_from_center(placement.point_on_bisector(radius), size);
        Some(CounterGeometry { text, bounds })
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use corona_core::{geometry::AngularRange, text::MonospaceMeasure};

    use super::*;

    fn placement(start: f64, extent: f64, inner: f64, outer: f64) -> Placement {
        Placement::new(
            Point::new(400.0, 400.0),
            AngularRange::new(start, extent).unwrap(),
            RadialRange::new(inner, outer).unwrap(),
        )
    }

    fn with_metrics<R>(f: impl FnOnce(&LeafMetrics<'_>) -> R) -> R {
        let layout = LayoutConfig::default();
        let text = TextConfig::default();
        let measure = MonospaceMeasure::default();
        f(&LeafMetrics::new(&layout, &text, &measure))
    }

    fn content() -> LeafContent {
        LeafContent::new("HttpSender")
            .with_detail("target: localhost")
            .with_detail("method: POST")
    }

    #[test]
    fn test_needs_flip_on_open_interval() {
        assert!(!needs_flip(45.0));
        assert!(needs_flip(135.0));
        assert!(needs_flip(225.0));
        assert!(!needs_flip(315.0));
        assert!(!needs_flip(90.0));
        assert!(!needs_flip(270.0));
    }

    #[test]
    fn test_text_rotation_for_quadrant_bisectors() {
        with_metrics(|metrics| {
            for (bisector, rotation, reversed) in [
                (45.0, 45.0, false),
                (135.0, 315.0, true),
                (225.0, 45.0, true),
                (315.0, 315.0, false),
            ] {
                let placement = placement(bisector - 20.0, 40.0, 100.0, 300.0);
                let geometry = metrics.geometry(&content(), &placement, false);
                assert_eq!(geometry.is_reversed(), reversed, "bisector {bisector}");
                assert_approx_eq!(f64, geometry.text_rotation(), rotation, epsilon = 1e-9);
            }
        });
    }

    #[test]
    fn test_angular_extent_zero_when_unset_or_at_center() {
        with_metrics(|metrics| {
            assert_eq!(metrics.angular_extent(&content(), RadialRange::unset(), false), 0.0);
            let at_center = RadialRange::new(0.0, 200.0).unwrap();
            assert_eq!(metrics.angular_extent(&content(), at_center, false), 0.0);
        });
    }

    #[test]
    fn test_angular_extent_is_max_of_icon_and_text() {
        with_metrics(|metrics| {
            let radial = RadialRange::new(100.0, 300.0).unwrap();
            // icon: 48 side, diagonal at inner radius 100
            let icon_angle = subtended_angle(48.0 * SQRT_2, 100.0);
            // text: 14.4 header + 5 spacing + 2 * 12 details + 8 ascent at 100 + 20 + 48
            let text_angle = subtended_angle(14.4 + 5.0 + 24.0 + 8.0, 168.0);
            assert!(icon_angle > text_angle);
            assert_approx_eq!(
                f64,
                metrics.angular_extent(&content(), radial, false),
                icon_angle
            );

            let minimum = metrics.angular_extent(&content(), radial, true);
            assert_approx_eq!(f64, minimum, subtended_angle(24.0 * SQRT_2, 100.0));
            assert!(minimum < icon_angle);
        });
    }

    #[test]
    fn test_minimum_view_when_extent_below_preferred() {
        with_metrics(|metrics| {
            let roomy = metrics.geometry(&content(), &placement(0.0, 90.0, 100.0, 300.0), false);
            assert!(!roomy.is_minimum_view());
            assert_approx_eq!(f64, roomy.icon().width(), 48.0);
            assert_eq!(roomy.details().len(), 2);

            let cramped = metrics.geometry(&content(), &placement(0.0, 5.0, 100.0, 300.0), false);
            assert!(cramped.is_minimum_view());
            assert_approx_eq!(f64, cramped.icon().width(), 24.0);
            assert!(cramped.details().is_empty());
        });
    }

    #[test]
    fn test_icon_and_text_positions_on_bisector() {
        with_metrics(|metrics| {
            // Bisector at 0 degrees: everything lies on the +X axis.
            let geometry = metrics.geometry(&content(), &placement(-30.0, 60.0, 100.0, 300.0), false);

            let icon = geometry.icon().center();
            assert_approx_eq!(f64, icon.x(), 400.0 + 100.0 + 10.0 + 24.0, epsilon = 1e-9);
            assert_approx_eq!(f64, icon.y(), 400.0, epsilon = 1e-9);

            let diagonal = 48.0 * SQRT_2;
            let max_width = 200.0 - 20.0 - diagonal;
            let text = geometry.text();
            assert_approx_eq!(f64, text.width(), max_width, epsilon = 1e-9);
            assert_approx_eq!(
                f64,
                text.center().x(),
                400.0 + 100.0 + diagonal + 10.0 + max_width / 2.0,
                epsilon = 1e-9
            );
            // one padding short of the outer arc
            assert_approx_eq!(f64, text.max_x(), 690.0, epsilon = 1e-9);
        });
    }

    #[test]
    fn test_text_height_keeps_header_spacing() {
        with_metrics(|metrics| {
            let placement = placement(-30.0, 60.0, 100.0, 300.0);

            let full = metrics.geometry(&content(), &placement, false);
            assert!(!full.is_minimum_view());
            // 14.4 header + 5 spacing + 2 * 12 details + 8 detail ascent
            assert_approx_eq!(f64, full.text().height(), 51.4, epsilon = 1e-9);

            let bare = metrics.geometry(&LeafContent::new("Sender"), &placement, false);
            assert_approx_eq!(f64, bare.text().height(), 14.4 + 5.0 + 8.0, epsilon = 1e-9);

            assert_approx_eq!(
                f64,
                metrics.text_height(&content(), true),
                14.4 + 5.0,
                epsilon = 1e-9
            );
        });
    }

    #[test]
    fn test_header_truncated_to_text_width() {
        with_metrics(|metrics| {
            let long = LeafContent::new("AVeryLongComponentNameThatCannotFitAnywhere");
            let geometry = metrics.geometry(&long, &placement(0.0, 90.0, 100.0, 300.0), false);
            assert!(geometry.header().ends_with("..."));
            assert!(geometry.header().len() < long.header().len());
        });
    }

    #[test]
    fn test_badges_packed_inwards_in_presentation_order() {
        with_metrics(|metrics| {
            let content = LeafContent::new("Reporter")
                .with_badge(BadgeKind::Add)
                .with_badge(BadgeKind::Remove);
            // Trailing edge at 0 degrees: badges sit just above the +X axis.
            let geometry = metrics.geometry(&content, &placement(-60.0, 60.0, 100.0, 300.0), false);
            let badges = geometry.badges();
            assert_eq!(badges.len(), 2);
            assert_eq!(badges[0].kind(), BadgeKind::Add);
            assert_eq!(badges[1].kind(), BadgeKind::Remove);

            let diagonal = 16.0 * SQRT_2;
            let outer = badges[1].bounds().center();
            assert_approx_eq!(f64, outer.x(), 400.0 + 300.0 - diagonal / 2.0 - 5.0, epsilon = 1e-9);
            assert_approx_eq!(f64, outer.y(), 400.0 - 5.0 - diagonal / 2.0, epsilon = 1e-9);

            let inner = badges[0].bounds().center();
            assert_approx_eq!(f64, outer.x() - inner.x(), diagonal + 5.0, epsilon = 1e-9);
        });
    }

    #[test]
    fn test_counter_inside_inner_radius() {
        with_metrics(|metrics| {
            let content = LeafContent::new("Sender").with_execution_count(1234);
            let geometry = metrics.geometry(&content, &placement(-30.0, 60.0, 100.0, 300.0), false);
            let counter = geometry.counter().unwrap();
            assert_eq!(counter.text(), "1234");

            // "1234" at font size 10: 24 x 12
            let diagonal = Size::new(24.0, 12.0).diagonal();
            assert_approx_eq!(
                f64,
                counter.bounds().center().x(),
                400.0 + 100.0 - 10.0 - diagonal / 2.0,
                epsilon = 1e-9
            );

            let without = metrics.geometry(&LeafContent::new("Sender"), &placement(0.0, 60.0, 100.0, 300.0), false);
            assert!(without.counter().is_none());
        });
    }
}
