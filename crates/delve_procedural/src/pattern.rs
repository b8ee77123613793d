//! # Stamp Patterns
//!
//! A pattern is the stencil a walk presses into the grid at every step. It
//! has the same shape as the view carrying it: `depth` cross-sections stacked
//! along the direction of travel, each written top row first and with
//! increasing lateral position left to right, so a literal reads like a wall
//! seen head-on.
//!
//! Cells hold either a block to write or "keep" (`-1` in a literal), which
//! leaves the existing block alone.
//!
//! Cross-sections should be odd in height and width so a quarter turn about
//! the centre maps the stencil onto itself.

use crate::error::{CarveError, CarveResult};
use crate::grid::Block;
use crate::volume::{Shape, Volume};

/// Literal value meaning "leave this cell unchanged".
pub const KEEP: i32 = -1;

/// Stock tunnel cross-section: an arched air void over a stone floor with
/// mossy accents that shift from slice to slice.
const TUNNEL: [[[i32; 5]; 5]; 3] = [
    [
        [-1, -1, -1, -1, -1],
        [-1, 0, 0, 0, -1],
        [-1, 0, 0, 0, -1],
        [0, 0, 0, 0, 0],
        [48, 1, 1, 1, 48],
    ],
    [
        [-1, -1, -1, -1, -1],
        [-1, 0, 0, 0, -1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [1, 48, 1, 48, 1],
    ],
    [
        [-1, -1, -1, -1, -1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [1, 1, 48, 1, 1],
    ],
];

/// Immutable stencil of blocks to write.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    cells: Volume<Option<Block>>,
}

impl Pattern {
    /// Builds a pattern from a nested literal `[depth][height][width]`.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::InvalidShape`] for an empty literal and
    /// [`CarveError::InvalidConfig`] for codes that are neither [`KEEP`] nor
    /// a valid block id.
    pub fn from_codes<const D: usize, const H: usize, const W: usize>(
        codes: &[[[i32; W]; H]; D],
    ) -> CarveResult<Self> {
        let shape = Shape::new(D, H, W)?;
        let mut bad = None;
        let cells = Volume::from_fn(shape, |z, y, x| {
            let code = codes[z][y][x];
            if code == KEEP {
                return None;
            }
            match u16::try_from(code) {
                Ok(id) => Some(Block::new(id)),
                Err(_) => {
                    bad.get_or_insert(code);
                    None
                }
            }
        });
        if let Some(code) = bad {
            return Err(CarveError::InvalidConfig(format!(
                "pattern code {code} is not a block id"
            )));
        }
        Ok(Self { cells })
    }

    /// The stock branching tunnel, three slices of 5x5.
    #[must_use]
    pub fn tunnel() -> Self {
        let cells = Volume::from_fn(Shape { depth: 3, height: 5, width: 5 }, |z, y, x| {
            u16::try_from(TUNNEL[z][y][x]).ok().map(Block::new)
        });
        Self { cells }
    }

    /// Single-cell filler that writes `block`.
    #[must_use]
    pub fn tube(block: Block) -> Self {
        Self {
            cells: Volume::filled(Shape { depth: 1, height: 1, width: 1 }, Some(block)),
        }
    }

    /// The pattern's shape.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.cells.shape()
    }

    /// Distance a walk advances per step: the number of stacked slices.
    #[inline]
    #[must_use]
    pub const fn forward_step(&self) -> usize {
        self.cells.shape().depth
    }

    /// Cell at `(z, y, x)`; `None` inside means keep.
    #[inline]
    #[must_use]
    pub fn cell(&self, z: usize, y: usize, x: usize) -> Option<Option<Block>> {
        self.cells.get(z, y, x).copied()
    }

    /// True if no cell writes anything.
    #[must_use]
    pub fn is_all_keep(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Overwrites `target` wherever this pattern has a block.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::ShapeMismatch`] if `target` is shaped differently.
    pub fn apply(&self, target: &mut Volume<Block>) -> CarveResult<()> {
        if target.shape() != self.shape() {
            return Err(CarveError::ShapeMismatch {
                expected: self.shape(),
                found: target.shape(),
            });
        }
        for (dst, src) in target.iter_mut().zip(self.cells.iter()) {
            if let Some(block) = src {
                *dst = *block;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tunnel_shape() {
        let tunnel = Pattern::tunnel();
        assert_eq!(tunnel.shape(), Shape::new(3, 5, 5).unwrap());
        assert_eq!(tunnel.forward_step(), 3);
        assert_eq!(tunnel.cell(0, 0, 0), Some(None));
        assert_eq!(tunnel.cell(0, 4, 0), Some(Some(Block::MOSSY_COBBLESTONE)));
        assert_eq!(tunnel.cell(2, 1, 0), Some(Some(Block::AIR)));
        assert_eq!(tunnel, Pattern::from_codes(&TUNNEL).unwrap());
    }

    #[test]
    fn test_from_codes_rejects_negative_material() {
        let err = Pattern::from_codes(&[[[0, -2]]]).unwrap_err();
        assert!(matches!(err, CarveError::InvalidConfig(_)));
    }

    #[test]
    fn test_apply_respects_keep() {
        let pattern = Pattern::from_codes(&[[[-1, 0], [48, -1]]]).unwrap();
        let mut target = Volume::filled(pattern.shape(), Block::STONE);
        pattern.apply(&mut target).unwrap();
        let got: Vec<Block> = target.iter().copied().collect();
        assert_eq!(
            got,
            vec![Block::STONE, Block::AIR, Block::MOSSY_COBBLESTONE, Block::STONE]
        );
    }

    #[test]
    fn test_all_keep_is_noop() {
        let pattern = Pattern::from_codes(&[[[-1; 3]; 3]; 2]).unwrap();
        assert!(pattern.is_all_keep());
        let mut target = Volume::filled(pattern.shape(), Block::DIRT);
        let before = target.clone();
        pattern.apply(&mut target).unwrap();
        assert_eq!(target, before);
    }

    #[test]
    fn test_apply_shape_mismatch() {
        let mut target = Volume::filled(Shape::new(1, 1, 2).unwrap(), Block::STONE);
        assert!(Pattern::tube(Block::AIR).apply(&mut target).is_err());
    }
}
