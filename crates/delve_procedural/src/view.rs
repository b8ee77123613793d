//! # Affine View
//!
//! A movable, rotatable window of grid cells. The view stores one absolute
//! position per logical cell and moves them all together through
//! homogeneous transforms, so pattern space and grid space stay decoupled.
//!
//! ## Orientation
//!
//! Logical indices are `(z, y, x)`. At yaw zero the origin corner
//! `(0, height - 1, width - 1)` sits at the anchor position, world `x` and
//! `y` grow as the `x` and `y` indices shrink, and world `z` grows with the
//! `z` index. Printed slices therefore read like a wall seen head-on, which
//! matches how pattern literals are authored.
//!
//! ## Numerics
//!
//! Transform math is done in `f64`. Every grid access rounds to the nearest
//! cell. Drift across many turns is bounded by the walk length and is not
//! corrected.

use crate::error::{CarveError, CarveResult};
use crate::grid::{Block, Coord, Grid};
use crate::pattern::Pattern;
use crate::transform::Transform;
use crate::volume::{Shape, Volume};

/// Rigid window of absolute grid positions.
///
/// Cloning yields an independent view; mutating the clone never touches the
/// original.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineView {
    /// Absolute `[x, y, z]` position for each logical cell.
    cells: Volume<[f64; 3]>,
    /// Accumulated rotation in radians, never normalised.
    yaw: f64,
}

impl AffineView {
    /// Creates a view of `shape` anchored at `origin`, then turned by `yaw`.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::InvalidShape`] if an axis is zero.
    pub fn new(shape: Shape, origin: Coord, yaw: f64) -> CarveResult<Self> {
        Shape::new(shape.depth, shape.height, shape.width)?;
        let mut view = Self {
            cells: Self::anchored(shape, origin),
            yaw: 0.0,
        };
        view.rotate_y(yaw);
        Ok(view)
    }

    /// Lays out cell positions at yaw zero with the origin corner on `origin`.
    #[allow(clippy::cast_precision_loss)]
    fn anchored(shape: Shape, origin: Coord) -> Volume<[f64; 3]> {
        let top = shape.height - 1;
        let right = shape.width - 1;
        Volume::from_fn(shape, |z, y, x| {
            [
                f64::from(origin.x) + (right - x) as f64,
                f64::from(origin.y) + (top - y) as f64,
                f64::from(origin.z) + z as f64,
            ]
        })
    }

    /// The view's shape.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.cells.shape()
    }

    /// Accumulated yaw in radians.
    #[inline]
    #[must_use]
    pub const fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Accumulated yaw in degrees, reduced to `[0, 360)`.
    #[must_use]
    pub fn heading_degrees(&self) -> f64 {
        self.yaw.to_degrees().rem_euclid(360.0)
    }

    /// Exact position of the cell at `(z, y, x)`.
    #[inline]
    #[must_use]
    pub fn position_of(&self, z: usize, y: usize, x: usize) -> Option<[f64; 3]> {
        self.cells.get(z, y, x).copied()
    }

    /// Grid cell of the origin corner `(0, height - 1, width - 1)`.
    #[must_use]
    pub fn origin_position(&self) -> Coord {
        let shape = self.shape();
        Coord::round(self.cells_at(0, shape.height - 1, shape.width - 1))
    }

    /// Grid cell nearest the window's geometric centre.
    #[must_use]
    pub fn center_position(&self) -> Coord {
        Coord::round(self.center())
    }

    fn center(&self) -> [f64; 3] {
        let (z, y, x) = self.shape().center();
        self.cells_at(z, y, x)
    }

    #[inline]
    fn cells_at(&self, z: usize, y: usize, x: usize) -> [f64; 3] {
        // Indices come from the shape itself.
        self.cells.get(z, y, x).copied().unwrap_or_default()
    }

    fn apply(&mut self, transform: &Transform) {
        for p in self.cells.iter_mut() {
            *p = transform.apply(*p);
        }
    }

    /// Moves every cell by `(dx, dy, dz)` in grid space.
    pub fn translate_absolute(&mut self, dx: f64, dy: f64, dz: f64) {
        self.apply(&Transform::translation([dx, dy, dz]));
    }

    /// Moves in the view's own frame: `dz` forward along the current yaw,
    /// `dx` lateral, `dy` vertical.
    ///
    /// The displacement is turned by the inverse of the current yaw before
    /// being applied in grid space.
    pub fn translate_relative(&mut self, dx: f64, dy: f64, dz: f64) {
        let [x, y, z] = Transform::rotation_y(-self.yaw).apply_vector([dx, dy, dz]);
        self.translate_absolute(x, y, z);
    }

    /// Turns the view about the vertical line through its centre cell.
    pub fn rotate_y(&mut self, angle: f64) {
        let pivot = self.center();
        self.yaw += angle;
        self.apply(&Transform::rotation_y_about(angle, pivot));
    }

    /// Grid cell covered by each logical cell.
    #[must_use]
    pub fn coords(&self) -> Volume<Coord> {
        self.cells.map(|p| Coord::round(*p))
    }

    /// Reads the blocks currently under the view.
    #[must_use]
    pub fn read_cells<G: Grid + ?Sized>(&self, grid: &G) -> Volume<Block> {
        self.cells.map(|p| grid.material_at(Coord::round(*p)))
    }

    /// Writes `values` under the view and returns the blocks read back.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::ShapeMismatch`] if `values` is shaped
    /// differently from the view.
    pub fn write_cells<G: Grid + ?Sized>(
        &self,
        grid: &mut G,
        values: &Volume<Block>,
    ) -> CarveResult<Volume<Block>> {
        for (p, block) in self.cells.zip(values)? {
            grid.set_material_at(Coord::round(*p), *block);
        }
        Ok(self.read_cells(&*grid))
    }

    /// Presses `pattern` into the grid: read, overwrite non-keep cells,
    /// write back. Returns the post-write contents.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::ShapeMismatch`] if the pattern does not match
    /// the view's shape.
    pub fn stamp<G: Grid + ?Sized>(
        &self,
        grid: &mut G,
        pattern: &Pattern,
    ) -> CarveResult<Volume<Block>> {
        if pattern.shape() != self.shape() {
            return Err(CarveError::ShapeMismatch {
                expected: self.shape(),
                found: pattern.shape(),
            });
        }
        let mut slice = self.read_cells(&*grid);
        pattern.apply(&mut slice)?;
        self.write_cells(grid, &slice)
    }

    /// True iff every cell lies inside the grid's bounds.
    #[must_use]
    pub fn is_in_bounds<G: Grid + ?Sized>(&self, grid: &G) -> bool {
        let bounds = grid.bounds();
        self.cells.iter().all(|p| bounds.contains(Coord::round(*p)))
    }
}
