//! Configuration types for Corona radial layouts.
//!
//! This module provides configuration structures that control how diagrams
//! are sized and laid out. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources, and every field falls back to a
//! default when missing.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout, text and canvas settings.
//! - [`LayoutConfig`] - Split ratio, paddings and icon sizes used by the allocators.
//! - [`TextConfig`] - Text styles of leaf headers and detail lines.
//! - [`CanvasConfig`] - Size of the drawing surface the root sector is fitted into.
//!
//! # Example
//!
//! ```
//! # use corona::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.layout().split_ratio(), 0.55);
//! ```

use serde::Deserialize;

use corona_core::{
    geometry::{AngularRange, GeometryError, Placement, Point, RadialRange},
    text::TextStyle,
};

use crate::CoronaError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Text configuration section.
    #[serde(default)]
    text: TextConfig,

    /// Canvas configuration section.
    #[serde(default)]
    canvas: CanvasConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, text: TextConfig, canvas: CanvasConfig) -> Self {
        Self {
            layout,
            text,
            canvas,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the text configuration.
    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Checks that the configuration describes a drawable layout.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::Config`] when the split ratio is outside
    /// `(0, 1)`, a size or font size is negative or not finite, or the hub
    /// radius leaves no room for the rings.
    pub fn validate(&self) -> Result<(), CoronaError> {
        self.layout.validate()?;
        self.text.validate()?;
        self.canvas.validate()?;

        let outer = self.canvas.available_radius();
        if self.layout.hub_radius >= outer {
            return Err(CoronaError::Config(format!(
                "hub radius {} must be smaller than the available radius {outer}",
                self.layout.hub_radius
            )));
        }
        Ok(())
    }

    /// Root descriptor: a full circle centred on the canvas, spanning from
    /// the hub radius to the canvas edge minus the margin.
    ///
    /// # Errors
    ///
    /// Returns an error if the radii do not form a valid band.
    pub fn root_placement(&self) -> Result<Placement, GeometryError> {
        let radial = RadialRange::new(self.layout.hub_radius, self.canvas.available_radius())?;
        Ok(Placement::new(
            self.canvas.center(),
            AngularRange::full_circle(self.layout.start_angle),
            radial,
        ))
    }
}

fn ensure_non_negative(value: f64, name: &str) -> Result<(), CoronaError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoronaError::Config(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

/// Rejects split ratios outside the open interval `(0, 1)`, NaN included.
pub(crate) fn validate_split_ratio(split_ratio: f64) -> Result<(), CoronaError> {
    if split_ratio > 0.0 && split_ratio < 1.0 {
        Ok(())
    } else {
        Err(CoronaError::Config(format!(
            "split ratio must lie strictly between 0 and 1, got {split_ratio}"
        )))
    }
}

/// Sizes and ratios used by the allocators and by leaf placement.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Split ratio | `0.55` |
/// | Padding | `10` |
/// | Header bottom space | `5` |
/// | Badge gap | `5` |
/// | Badge side | `16` |
/// | Icon side | `48` |
/// | Small icon side | `24` |
/// | Hub radius | `80` |
/// | Start angle | `0` |
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    split_ratio: f64,
    padding: f64,
    header_bottom_space: f64,
    badge_gap: f64,
    badge_side: f64,
    icon_side: f64,
    small_icon_side: f64,
    hub_radius: f64,
    start_angle: f64,
}

impl LayoutConfig {
    /// Fraction of a dual-layer band given to the inner layer.
    pub fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    /// Gap between the inner radius, the icon and the text.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Space between the header line and the first detail line.
    pub fn header_bottom_space(&self) -> f64 {
        self.header_bottom_space
    }

    pub fn badge_gap(&self) -> f64 {
        self.badge_gap
    }

    pub fn badge_side(&self) -> f64 {
        self.badge_side
    }

    pub fn icon_side(&self) -> f64 {
        self.icon_side
    }

    /// Icon side used in minimum view.
    pub fn small_icon_side(&self) -> f64 {
        self.small_icon_side
    }

    /// Inner radius of the innermost ring.
    pub fn hub_radius(&self) -> f64 {
        self.hub_radius
    }

    /// Angle at which the first root sector starts.
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Sets the split ratio (builder style).
    pub fn with_split_ratio(mut self, split_ratio: f64) -> Self {
        self.split_ratio = split_ratio;
        self
    }

    /// Sets the padding (builder style).
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the normal and minimum-view icon sides (builder style).
    pub fn with_icon_sides(mut self, icon_side: f64, small_icon_side: f64) -> Self {
        self.icon_side = icon_side;
        self.small_icon_side = small_icon_side;
        self
    }

    /// Sets the hub radius (builder style).
    pub fn with_hub_radius(mut self, hub_radius: f64) -> Self {
        self.hub_radius = hub_radius;
        self
    }

    /// Sets the start angle (builder style).
    pub fn with_start_angle(mut self, start_angle: f64) -> Self {
        self.start_angle = start_angle;
        self
    }

    /// Checks the layout section on its own.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::Config`] when the split ratio is outside
    /// `(0, 1)`, a size is negative or not finite, or the start angle is not
    /// finite.
    pub fn validate(&self) -> Result<(), CoronaError> {
        validate_split_ratio(self.split_ratio)?;
        ensure_non_negative(self.padding, "padding")?;
        ensure_non_negative(self.header_bottom_space, "header bottom space")?;
        ensure_non_negative(self.badge_gap, "badge gap")?;
        ensure_non_negative(self.badge_side, "badge side")?;
        ensure_non_negative(self.icon_side, "icon side")?;
        ensure_non_negative(self.small_icon_side, "small icon side")?;
        ensure_non_negative(self.hub_radius, "hub radius")?;
        if !self.start_angle.is_finite() {
            return Err(CoronaError::Config(
                "start angle must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            split_ratio: 0.55,
            padding: 10.0,
            header_bottom_space: 5.0,
            badge_gap: 5.0,
            badge_side: 16.0,
            icon_side: 48.0,
            small_icon_side: 24.0,
            hub_radius: 80.0,
            start_angle: 0.0,
        }
    }
}

/// Text styles of leaf labels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    header: TextStyle,
    detail: TextStyle,
}

impl TextConfig {
    pub fn new(header: TextStyle, detail: TextStyle) -> Self {
        Self { header, detail }
    }

    /// Style of a leaf's header line.
    pub fn header(&self) -> &TextStyle {
        &self.header
    }

    /// Style of detail lines and the execution counter.
    pub fn detail(&self) -> &TextStyle {
        &self.detail
    }

    /// Checks that both font sizes are non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::Config`] for a negative or non-finite font size.
    pub fn validate(&self) -> Result<(), CoronaError> {
        ensure_non_negative(self.header.font_size(), "header font size")?;
        ensure_non_negative(self.detail.font_size(), "detail font size")
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            header: TextStyle::default(),
            detail: TextStyle::new("sans-serif", 10.0),
        }
    }
}

/// Drawing surface the root sector is fitted into.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Width | `800` |
/// | Height | `800` |
/// | Margin | `20` |
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: f64,
    height: f64,
    margin: f64,
}

impl CanvasConfig {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Center of the canvas.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest outer radius that keeps the diagram inside the margins.
    pub fn available_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 - self.margin
    }

    fn validate(&self) -> Result<(), CoronaError> {
        ensure_non_negative(self.width, "canvas width")?;
        ensure_non_negative(self.height, "canvas height")?;
        ensure_non_negative(self.margin, "canvas margin")
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            margin: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        let layout = config.layout();
        assert_approx_eq!(f64, layout.split_ratio(), 0.55);
        assert_approx_eq!(f64, layout.padding(), 10.0);
        assert_approx_eq!(f64, layout.icon_side(), 48.0);
        assert_approx_eq!(f64, layout.small_icon_side(), 24.0);
        assert_approx_eq!(f64, config.text().header().font_size(), 12.0);
        assert_approx_eq!(f64, config.text().detail().font_size(), 10.0);
        assert_approx_eq!(f64, config.canvas().available_radius(), 380.0);
    }

    #[test]
    fn test_root_placement() {
        let placement = AppConfig::default().root_placement().unwrap();
        assert_eq!(placement.center(), Point::new(400.0, 400.0));
        assert_approx_eq!(f64, placement.angular().extent(), 360.0);
        assert_approx_eq!(f64, placement.radial().inner(), 80.0);
        assert_approx_eq!(f64, placement.radial().outer(), 380.0);
    }

    #[test]
    fn test_validate_rejects_split_ratio() {
        for ratio in [0.0, 1.0, -0.5, f64::NAN] {
            let config = AppConfig::new(
                LayoutConfig::default().with_split_ratio(ratio),
                TextConfig::default(),
                CanvasConfig::default(),
            );
            assert!(
                matches!(config.validate(), Err(CoronaError::Config(_))),
                "ratio {ratio}"
            );
        }
    }

    #[test]
    fn test_validate_rejects_negative_padding() {
        let config = AppConfig::new(
            LayoutConfig::default().with_padding(-1.0),
            TextConfig::default(),
            CanvasConfig::default(),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_hub_beyond_canvas() {
        let config = AppConfig::new(
            LayoutConfig::default().with_hub_radius(400.0),
            TextConfig::default(),
            CanvasConfig::default(),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "layout": { "split_ratio": 0.4 }, "canvas": { "width": 600 } }"#,
        )
        .unwrap();
        assert_approx_eq!(f64, config.layout().split_ratio(), 0.4);
        assert_approx_eq!(f64, config.layout().padding(), 10.0);
        assert_approx_eq!(f64, config.canvas().width(), 600.0);
        assert_approx_eq!(f64, config.canvas().height(), 800.0);
    }
}
