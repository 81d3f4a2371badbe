//! Geometric primitives for radial diagram layout.
//!
//! This module provides the value types the layout engine works with:
//! Cartesian points, sizes and boxes for the geometry handed to a renderer,
//! and the polar ranges that describe a sector of an annulus.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//! - [`AngularRange`] - Start angle and angular extent of a sector, in degrees
//! - [`RadialRange`] - Inner and outer radius of a sector
//! - [`Placement`] - A center point plus both ranges; the descriptor assigned
//!   to every item by a layout pass
//!
//! # Coordinate System
//!
//! Corona uses a coordinate system consistent with SVG and screen space:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Angles are measured in degrees from the +X axis towards the +Y axis, so on
//! screen they grow clockwise. Angles are interpreted modulo 360; ranges keep
//! the raw start angle and [`AngularRange::bisector`] normalizes to `[0, 360)`.

use std::f64::consts::SQRT_2;

use serde::Serialize;
use thiserror::Error;

/// Errors raised when constructing geometric values from invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("angular extent must be non-negative, got {0}")]
    NegativeExtent(f64),

    #[error("radius must be non-negative, got {0}")]
    NegativeRadius(f64),

    #[error("inner radius {inner} exceeds outer radius {outer}")]
    InvertedRadii { inner: f64, outer: f64 },

    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

fn ensure_finite(value: f64, what: &'static str) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite(what))
    }
}

/// Normalizes an angle in degrees into `[0, 360)`.
///
/// # Examples
///
/// ```
/// # use corona_core::geometry::normalize_degrees;
/// assert_eq!(normalize_degrees(370.0), 10.0);
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(360.0), 0.0);
/// ```
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Angular extent, in degrees, that an object of `size` spans when its
/// center sits at `distance` from the circle center.
///
/// Returns `0` when `distance` is not positive, since no meaningful angle
/// exists at the center itself.
pub fn subtended_angle(size: f64, distance: f64) -> f64 {
    if distance <= 0.0 || size <= 0.0 {
        return 0.0;
    }
    2.0 * (size / 2.0 / distance).atan().to_degrees()
}

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use corona_core::geometry::Point;
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the point lying `radius` away from this point in the
    /// direction of `angle` degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corona_core::geometry::Point;
    /// let center = Point::new(100.0, 100.0);
    /// let p = center.polar_offset(50.0, 90.0);
    /// assert!((p.x() - 100.0).abs() < 1e-9);
    /// assert!((p.y() - 150.0).abs() < 1e-9);
    /// ```
    pub fn polar_offset(self, radius: f64, angle: f64) -> Self {
        let theta = angle.to_radians();
        Self {
            x: self.x + radius * theta.cos(),
            y: self.y + radius * theta.sin(),
        }
    }

    /// Rotates this point by `angle` degrees around `pivot`.
    pub fn rotate_around(self, pivot: Point, angle: f64) -> Self {
        let theta = angle.to_radians();
        let (sin, cos) = theta.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Creates a square size with both sides equal to `side`
    pub fn square(side: f64) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Length of the rectangle's diagonal
    pub fn diagonal(self) -> f64 {
        if self.width == self.height {
            return self.width * SQRT_2;
        }
        self.width.hypot(self.height)
    }
}

/// Represents an axis-aligned box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }
}

/// The angular part of a sector: where it starts and how far it sweeps.
///
/// The extent is never negative. The start angle is kept as given, so a run
/// of contiguous sectors may carry start angles beyond 360.
///
/// # Examples
///
/// ```
/// # use corona_core::geometry::AngularRange;
/// let range = AngularRange::new(30.0, 60.0).unwrap();
/// assert_eq!(range.end(), 90.0);
/// assert_eq!(range.bisector(), 60.0);
///
/// assert!(AngularRange::new(0.0, -1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AngularRange {
    start_angle: f64,
    angle_extent: f64,
}

impl AngularRange {
    /// Creates a new angular range.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NegativeExtent`] for a negative extent and
    /// [`GeometryError::NonFinite`] for NaN or infinite inputs.
    pub fn new(start_angle: f64, angle_extent: f64) -> Result<Self, GeometryError> {
        let start_angle = ensure_finite(start_angle, "start angle")?;
        let angle_extent = ensure_finite(angle_extent, "angle extent")?;
        if angle_extent < 0.0 {
            return Err(GeometryError::NegativeExtent(angle_extent));
        }
        Ok(Self {
            start_angle,
            angle_extent,
        })
    }

    /// A full circle starting at `start_angle`.
    pub fn full_circle(start_angle: f64) -> Self {
        Self {
            start_angle,
            angle_extent: 360.0,
        }
    }

    pub fn start(self) -> f64 {
        self.start_angle
    }

    pub fn extent(self) -> f64 {
        self.angle_extent
    }

    /// Angle at which the range ends (the trailing edge).
    pub fn end(self) -> f64 {
        self.start_angle + self.angle_extent
    }

    /// Middle angle of the range, normalized into `[0, 360)`.
    pub fn bisector(self) -> f64 {
        normalize_degrees(self.start_angle + self.angle_extent / 2.0)
    }
}

/// The radial part of a sector: the band between two radii.
///
/// `RadialRange::unset()` (both radii zero) is the sentinel for "no layout
/// computed yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RadialRange {
    inner_radius: f64,
    outer_radius: f64,
}

impl RadialRange {
    /// Creates a new radial range.
    ///
    /// # Errors
    ///
    /// Returns an error when a radius is negative or not finite, or when the
    /// inner radius exceeds the outer radius.
    pub fn new(inner_radius: f64, outer_radius: f64) -> Result<Self, GeometryError> {
        let inner_radius = ensure_finite(inner_radius, "inner radius")?;
        let outer_radius = ensure_finite(outer_radius, "outer radius")?;
        if inner_radius < 0.0 {
            return Err(GeometryError::NegativeRadius(inner_radius));
        }
        if outer_radius < 0.0 {
            return Err(GeometryError::NegativeRadius(outer_radius));
        }
        if inner_radius > outer_radius {
            return Err(GeometryError::InvertedRadii {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        Ok(Self {
            inner_radius,
            outer_radius,
        })
    }

    /// The zero-width sentinel range.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Returns true for the `[0, 0]` sentinel.
    pub fn is_unset(self) -> bool {
        self.inner_radius == 0.0 && self.outer_radius == 0.0
    }

    pub fn inner(self) -> f64 {
        self.inner_radius
    }

    pub fn outer(self) -> f64 {
        self.outer_radius
    }

    /// Radial thickness of the band.
    pub fn width(self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Radius lying `ratio` of the way from the inner to the outer radius.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corona_core::geometry::RadialRange;
    /// let band = RadialRange::new(100.0, 300.0).unwrap();
    /// assert!((band.radius_at(0.55) - 210.0).abs() < 1e-9);
    /// ```
    pub fn radius_at(self, ratio: f64) -> f64 {
        self.inner_radius + self.width() * ratio
    }

    /// Splits the band at `ratio` into an inner and an outer band.
    pub fn split(self, ratio: f64) -> (Self, Self) {
        let split = self.radius_at(ratio.clamp(0.0, 1.0));
        (
            Self {
                inner_radius: self.inner_radius,
                outer_radius: split,
            },
            Self {
                inner_radius: split,
                outer_radius: self.outer_radius,
            },
        )
    }
}

/// Where an item lives: a center point plus the angular and radial ranges of
/// its sector.
///
/// Placements are immutable values. Deriving a sub-range for a child always
/// produces a new descriptor through [`Placement::with_angular`] or
/// [`Placement::with_radial`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Placement {
    center: Point,
    angular: AngularRange,
    radial: RadialRange,
}

impl Placement {
    pub fn new(center: Point, angular: AngularRange, radial: RadialRange) -> Self {
        Self {
            center,
            angular,
            radial,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn angular(&self) -> AngularRange {
        self.angular
    }

    pub fn radial(&self) -> RadialRange {
        self.radial
    }

    /// Returns a copy of this descriptor with a different angular range.
    pub fn with_angular(&self, angular: AngularRange) -> Self {
        Self { angular, ..*self }
    }

    /// Returns a copy of this descriptor with a different radial range.
    pub fn with_radial(&self, radial: RadialRange) -> Self {
        Self { radial, ..*self }
    }

    /// Point at `radius` from the center along the sector's bisector.
    pub fn point_on_bisector(&self, radius: f64) -> Point {
        self.center.polar_offset(radius, self.angular.bisector())
    }
}
