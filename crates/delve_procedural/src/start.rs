//! Start poses for walks.
//!
//! Walks begin on whole cells facing a cardinal direction. This module turns
//! a persisted player location into such a pose; the walker itself never
//! snaps anything.

use crate::error::CarveResult;
use crate::grid::{Coord, Spawn};
use crate::view::AffineView;
use crate::volume::Shape;

/// Snaps a yaw in degrees to the nearest multiple of 90 and returns radians.
#[must_use]
pub fn snap_yaw(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(360.0);
    (90.0 * (reduced / 90.0).round()).to_radians()
}

/// Where and which way a walk starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartPose {
    /// Anchor of the view's origin corner.
    pub origin: Coord,
    /// Yaw in radians, a multiple of a quarter turn.
    pub yaw: f64,
}

impl StartPose {
    /// Creates a pose, snapping `yaw_degrees`.
    #[must_use]
    pub fn new(origin: Coord, yaw_degrees: f64) -> Self {
        Self {
            origin,
            yaw: snap_yaw(yaw_degrees),
        }
    }

    /// Pose at a player's rounded position and snapped heading.
    #[must_use]
    pub fn from_spawn(spawn: &Spawn) -> Self {
        Self::new(Coord::round(spawn.position), f64::from(spawn.yaw_degrees))
    }

    /// View at this pose.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CarveError::InvalidShape`] for a degenerate shape.
    pub fn view(&self, shape: Shape) -> CarveResult<AffineView> {
        AffineView::new(shape, self.origin, self.yaw)
    }

    /// View shifted so a pattern of `shape` starts centred one pattern depth
    /// in front of the pose and sunk half its height.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CarveError::InvalidShape`] for a degenerate shape.
    #[allow(clippy::cast_precision_loss)]
    pub fn view_ahead(&self, shape: Shape) -> CarveResult<AffineView> {
        let mut view = self.view(shape)?;
        view.translate_relative(
            (shape.width / 2) as f64,
            -((shape.height / 2) as f64),
            shape.depth as f64,
        );
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_degrees(radians: f64, degrees: f64) {
        assert!((radians.to_degrees() - degrees).abs() < 1e-9, "{radians} rad");
    }

    #[test]
    fn test_snap_yaw() {
        assert_degrees(snap_yaw(0.0), 0.0);
        assert_degrees(snap_yaw(44.0), 0.0);
        assert_degrees(snap_yaw(46.0), 90.0);
        assert_degrees(snap_yaw(-91.0), 270.0);
        assert_degrees(snap_yaw(725.0), 0.0);
        assert_degrees(snap_yaw(350.0), 360.0);
    }

    #[test]
    fn test_from_spawn_rounds_position() {
        let spawn = Spawn {
            position: [10.4, 64.6, -3.5],
            yaw_degrees: 181.0,
        };
        let pose = StartPose::from_spawn(&spawn);
        assert_eq!(pose.origin, Coord::new(10, 65, -4));
        assert_degrees(pose.yaw, 180.0);
    }

    #[test]
    fn test_view_ahead_at_zero_yaw() {
        let pose = StartPose::new(Coord::new(10, 20, 30), 0.0);
        let view = pose.view_ahead(Shape::new(3, 5, 5).unwrap()).unwrap();
        assert_eq!(view.origin_position(), Coord::new(12, 18, 33));
    }
}
