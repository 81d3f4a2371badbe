//! Single-ring sector allocation.
//!
//! Siblings in one ring share the same radial band and sit side by side, so
//! their angular requirements add up. When the available extent is too small
//! for every preferred extent, the shortfall is spread proportionally to the
//! preferred extents without pushing any sibling below its minimum.

use log::{debug, trace, warn};

use corona_core::geometry::{AngularRange, GeometryError, Placement, RadialRange};

use super::{Extents, ItemId, LayoutTree};

/// Splits `available` degrees among items with the given extents.
///
/// - If every preferred extent fits, each item gets its preferred extent and
///   the remainder stays unused.
/// - If even the minimum extents do not fit, each item gets its minimum and
///   the total overflows `available`.
/// - Otherwise the allocations lie between minimum and preferred and sum to
///   exactly `available`.
///
/// # Examples
///
/// ```
/// # use corona::layout::{allocate_extents, Extents};
/// let items = [Extents::new(0.0, 30.0), Extents::new(0.0, 60.0), Extents::new(0.0, 90.0)];
/// assert_eq!(allocate_extents(&items, 180.0), vec![30.0, 60.0, 90.0]);
/// assert_eq!(allocate_extents(&items, 90.0), vec![15.0, 30.0, 45.0]);
/// ```
pub fn allocate_extents(extents: &[Extents], available: f64) -> Vec<f64> {
    let total = extents
        .iter()
        .fold(Extents::default(), |acc, extents| acc.sum(*extents));

    if available >= total.preferred() {
        return extents.iter().map(|e| e.preferred()).collect();
    }
    if total.minimum() >= available {
        if total.minimum() > available {
            warn!(
                required = total.minimum(),
                available;
                "Minimum extents exceed available extent, allowing overflow"
            );
        }
        return extents.iter().map(|e| e.minimum()).collect();
    }

    // Items pinned to their minimum drop out of the proportional share and
    // the scale is recomputed for the rest. The scale only ever decreases,
    // so at most one round per item is needed.
    let mut pinned = vec![false; extents.len()];
    loop {
        let pinned_total: f64 = extents
            .iter()
            .zip(&pinned)
            .filter(|(_, pinned)| **pinned)
            .map(|(e, _)| e.minimum())
            .sum();
        let free_preferred: f64 = extents
            .iter()
            .zip(&pinned)
            .filter(|(_, pinned)| !**pinned)
            .map(|(e, _)| e.preferred())
            .sum();
        let scale = if free_preferred > 0.0 {
            (available - pinned_total) / free_preferred
        } else {
            0.0
        };

        let mut changed = false;
        for (e, pinned) in extents.iter().zip(pinned.iter_mut()) {
            if !*pinned && e.preferred() * scale < e.minimum() {
                *pinned = true;
                changed = true;
            }
        }

        if !changed {
            trace!(scale; "Scaled ring extents");
            return extents
                .iter()
                .zip(&pinned)
                .map(|(e, pinned)| {
                    if *pinned {
                        e.minimum()
                    } else {
                        e.preferred() * scale
                    }
                })
                .collect();
        }
    }
}

/// Lays out consecutive angular ranges starting at `start`.
///
/// # Errors
///
/// Returns an error if an extent is negative or not finite.
pub fn contiguous_ranges(start: f64, extents: &[f64]) -> Result<Vec<AngularRange>, GeometryError> {
    let mut cursor = start;
    extents
        .iter()
        .map(|&extent| {
            let range = AngularRange::new(cursor, extent)?;
            cursor += extent;
            Ok(range)
        })
        .collect()
}

/// Allocator for siblings that share one radial band.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingAllocator;

impl RingAllocator {
    /// Sum of the children's minimum and preferred extents within `radial`.
    pub fn extents(self, tree: &LayoutTree, children: &[ItemId], radial: RadialRange) -> Extents {
        children
            .iter()
            .map(|&child| tree.item_extents(child, radial))
            .fold(Extents::default(), Extents::sum)
    }

    pub fn minimum_extent(self, tree: &LayoutTree, children: &[ItemId], radial: RadialRange) -> f64 {
        self.extents(tree, children, radial).minimum()
    }

    pub fn preferred_extent(
        self,
        tree: &LayoutTree,
        children: &[ItemId],
        radial: RadialRange,
    ) -> f64 {
        self.extents(tree, children, radial).preferred()
    }

    /// Assigns every child a contiguous slice of `constraint`.
    ///
    /// Every child keeps the constraint's center and radial range.
    ///
    /// # Errors
    ///
    /// Returns an error if an allocated extent is not a valid angular extent.
    pub fn distribute(
        self,
        tree: &LayoutTree,
        children: &[ItemId],
        constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError> {
        if children.is_empty() {
            return Ok(Vec::new());
        }

        let radial = constraint.radial();
        let available = constraint.angular().extent();
        let child_extents: Vec<Extents> = children
            .iter()
            .map(|&child| tree.item_extents(child, radial))
            .collect();

        debug!(children = children.len(), available; "Distributing ring");

        let allocated = allocate_extents(&child_extents, available);
        let ranges = contiguous_ranges(constraint.angular().start(), &allocated)?;

        Ok(children
            .iter()
            .zip(ranges)
            .map(|(&child, angular)| (child, constraint.with_angular(angular)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn total(values: &[f64]) -> f64 {
        values.iter().sum()
    }

    #[test]
    fn test_allocate_preferred_when_everything_fits() {
        let extents = [
            Extents::new(10.0, 30.0),
            Extents::new(10.0, 60.0),
            Extents::new(10.0, 90.0),
        ];
        assert_eq!(allocate_extents(&extents, 180.0), vec![30.0, 60.0, 90.0]);
        assert_eq!(allocate_extents(&extents, 360.0), vec![30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_allocate_minimums_overflow() {
        let extents = [Extents::new(50.0, 80.0), Extents::new(70.0, 90.0)];
        let allocated = allocate_extents(&extents, 100.0);
        assert_eq!(allocated, vec![50.0, 70.0]);
        assert!(total(&allocated) > 100.0);
    }

    #[test]
    fn test_allocate_proportional_scaling() {
        let extents = [Extents::new(0.0, 100.0), Extents::new(0.0, 300.0)];
        let allocated = allocate_extents(&extents, 200.0);
        assert_approx_eq!(f64, allocated[0], 50.0);
        assert_approx_eq!(f64, allocated[1], 150.0);
    }

    #[test]
    fn test_allocate_pins_minimum_and_rescales_rest() {
        // Plain scaling by 0.5 would give the first item 10, below its minimum 18.
        let extents = [Extents::new(18.0, 20.0), Extents::new(0.0, 180.0)];
        let allocated = allocate_extents(&extents, 100.0);
        assert_approx_eq!(f64, allocated[0], 18.0);
        assert_approx_eq!(f64, allocated[1], 82.0);
        assert_approx_eq!(f64, total(&allocated), 100.0);
    }

    #[test]
    fn test_allocate_cascading_pins() {
        let extents = [
            Extents::new(9.0, 10.0),
            Extents::new(25.0, 40.0),
            Extents::new(0.0, 100.0),
        ];
        let allocated = allocate_extents(&extents, 60.0);
        assert_approx_eq!(f64, allocated[0], 9.0);
        assert_approx_eq!(f64, allocated[1], 25.0);
        assert_approx_eq!(f64, allocated[2], 26.0);
    }

    #[test]
    fn test_allocate_zero_available() {
        let extents = [Extents::new(0.0, 10.0), Extents::new(0.0, 20.0)];
        assert_eq!(allocate_extents(&extents, 0.0), vec![0.0, 0.0]);
    }

    #[test]
    fn test_allocate_empty() {
        assert!(allocate_extents(&[], 90.0).is_empty());
    }

    #[test]
    fn test_contiguous_ranges() {
        let ranges = contiguous_ranges(45.0, &[30.0, 60.0, 90.0]).unwrap();
        let starts: Vec<f64> = ranges.iter().map(|r| r.start()).collect();
        let extents: Vec<f64> = ranges.iter().map(|r| r.extent()).collect();
        assert_eq!(starts, vec![45.0, 75.0, 135.0]);
        assert_eq!(extents, vec![30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_contiguous_ranges_rejects_negative() {
        assert!(contiguous_ranges(0.0, &[10.0, -1.0]).is_err());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    const EPSILON: f64 = 1e-6;

    fn extents_strategy() -> impl Strategy<Value = Vec<Extents>> {
        prop::collection::vec((0.0f64..50.0, 0.0f64..100.0), 1..12).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(minimum, extra)| Extents::new(minimum, minimum + extra))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn preferred_fit_is_exact(extents in extents_strategy(), slack in 0.0f64..100.0) {
            let preferred: f64 = extents.iter().map(|e| e.preferred()).sum();
            let allocated = allocate_extents(&extents, preferred + slack);
            for (e, a) in extents.iter().zip(&allocated) {
                prop_assert_eq!(*a, e.preferred());
            }
        }

        #[test]
        fn scaled_allocations_stay_within_bounds(
            extents in extents_strategy(),
            fraction in 0.0f64..1.0,
        ) {
            let minimum: f64 = extents.iter().map(|e| e.minimum()).sum();
            let preferred: f64 = extents.iter().map(|e| e.preferred()).sum();
            prop_assume!(preferred - minimum > EPSILON);

            let available = minimum + (preferred - minimum) * fraction;
            let allocated = allocate_extents(&extents, available);

            for (e, a) in extents.iter().zip(&allocated) {
                prop_assert!(*a >= e.minimum() - EPSILON);
                prop_assert!(*a <= e.preferred() + EPSILON);
            }
            let sum: f64 = allocated.iter().sum();
            prop_assert!((sum - available).abs() < EPSILON);
        }

        #[test]
        fn ranges_are_contiguous(
            start in -360.0f64..360.0,
            extents in prop::collection::vec(0.0f64..90.0, 0..10),
        ) {
            let ranges = contiguous_ranges(start, &extents).unwrap();
            let mut cursor = start;
            for range in &ranges {
                prop_assert!((range.start() - cursor).abs() < EPSILON);
                cursor = range.end();
            }
        }
    }
}
