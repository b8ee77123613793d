//! # Dense 3D Volumes
//!
//! Views, patterns and read-backs all share one layout: a box of
//! `depth x height x width` cells indexed as `(z, y, x)`, where `z` runs
//! along the direction of travel.

use std::fmt;

use crate::error::{CarveError, CarveResult};

/// Extent of a volume along its three logical axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Cross-sections stacked along the direction of travel.
    pub depth: usize,
    /// Rows per cross-section.
    pub height: usize,
    /// Columns per cross-section.
    pub width: usize,
}

impl Shape {
    /// Creates a shape, rejecting any zero-sized axis.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::InvalidShape`] if an axis is zero.
    pub fn new(depth: usize, height: usize, width: usize) -> CarveResult<Self> {
        if depth == 0 || height == 0 || width == 0 {
            return Err(CarveError::InvalidShape { depth, height, width });
        }
        Ok(Self { depth, height, width })
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.depth * self.height * self.width
    }

    /// Always false, shapes have positive axes.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Index of the cell closest to the geometric centre.
    #[inline]
    #[must_use]
    pub const fn center(self) -> (usize, usize, usize) {
        (self.depth / 2, self.height / 2, self.width / 2)
    }

    #[inline]
    const fn offset(self, z: usize, y: usize, x: usize) -> usize {
        (z * self.height + y) * self.width + x
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.depth, self.height, self.width)
    }
}

/// Dense 3D array with a fixed [`Shape`].
#[derive(Clone, Debug, PartialEq)]
pub struct Volume<T> {
    shape: Shape,
    cells: Vec<T>,
}

impl<T: Clone> Volume<T> {
    /// Creates a volume with every cell set to `value`.
    #[must_use]
    pub fn filled(shape: Shape, value: T) -> Self {
        Self {
            shape,
            cells: vec![value; shape.len()],
        }
    }
}

impl<T> Volume<T> {
    /// Builds a volume by calling `f(z, y, x)` for every cell.
    #[must_use]
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(shape.len());
        for z in 0..shape.depth {
            for y in 0..shape.height {
                for x in 0..shape.width {
                    cells.push(f(z, y, x));
                }
            }
        }
        Self { shape, cells }
    }

    /// The volume's shape.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the cell at `(z, y, x)`, or `None` outside the shape.
    #[inline]
    #[must_use]
    pub fn get(&self, z: usize, y: usize, x: usize) -> Option<&T> {
        if z < self.shape.depth && y < self.shape.height && x < self.shape.width {
            self.cells.get(self.shape.offset(z, y, x))
        } else {
            None
        }
    }

    /// Cells in `(z, y, x)` order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Mutable cells in `(z, y, x)` order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.cells.iter_mut()
    }

    /// Applies `f` to every cell, keeping the shape.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Volume<U> {
        Volume {
            shape: self.shape,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Pairs cells of two equally shaped volumes.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::ShapeMismatch`] if the shapes differ.
    pub fn zip<'a, U>(
        &'a self,
        other: &'a Volume<U>,
    ) -> CarveResult<impl Iterator<Item = (&'a T, &'a U)>> {
        if self.shape != other.shape {
            return Err(CarveError::ShapeMismatch {
                expected: self.shape,
                found: other.shape,
            });
        }
        Ok(self.cells.iter().zip(other.cells.iter()))
    }
}

impl<'a, T> IntoIterator for &'a Volume<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rejects_zero_axis() {
        assert!(Shape::new(3, 5, 5).is_ok());
        assert_eq!(
            Shape::new(3, 0, 5),
            Err(CarveError::InvalidShape { depth: 3, height: 0, width: 5 })
        );
    }

    #[test]
    fn test_shape_center() {
        let shape = Shape::new(3, 5, 5).unwrap();
        assert_eq!(shape.center(), (1, 2, 2));
        assert_eq!(shape.len(), 75);
        assert_eq!(shape.to_string(), "3x5x5");
    }

    #[test]
    fn test_volume_indexing_order() {
        let shape = Shape::new(2, 3, 4).unwrap();
        let volume = Volume::from_fn(shape, |z, y, x| (z, y, x));

        assert_eq!(volume.get(1, 2, 3), Some(&(1, 2, 3)));
        assert_eq!(volume.get(2, 0, 0), None);
        assert_eq!(volume.iter().next(), Some(&(0, 0, 0)));
        assert_eq!(volume.iter().nth(4), Some(&(0, 1, 0)));
    }

    #[test]
    fn test_zip_requires_same_shape() {
        let a = Volume::filled(Shape::new(1, 1, 2).unwrap(), 0u8);
        let b = Volume::filled(Shape::new(1, 2, 1).unwrap(), 0u8);
        assert!(a.zip(&b).is_err());
        assert_eq!(a.zip(&a).unwrap().count(), 2);
    }
}
