//! # Voxel Grid
//!
//! The carving core only needs three things from a world: read a block,
//! write a block, and know where the world ends. [`Grid`] captures that
//! contract; [`VoxelWorld`] is the dense in-memory implementation used by
//! the command line tool and the tests.
//!
//! ## Layout
//!
//! Blocks are stored as `[y][z][x]` inside a half-open [`GridBounds`] box.
//! Each block is a `u16` id plus `u16` metadata.

use bytemuck::{Pod, Zeroable};

/// Integer coordinate in absolute grid space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl Coord {
    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Rounds a floating point position to the nearest grid cell.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn round(position: [f64; 3]) -> Self {
        Self {
            x: position[0].round() as i32,
            y: position[1].round() as i32,
            z: position[2].round() as i32,
        }
    }
}

/// Axis-aligned world box, inclusive on `min` and exclusive on `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBounds {
    /// Lowest cell inside the box.
    pub min: Coord,
    /// One past the highest cell on every axis.
    pub max: Coord,
}

impl GridBounds {
    /// Creates bounds from corners.
    #[inline]
    #[must_use]
    pub const fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// Bounds starting at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32, depth: i32) -> Self {
        Self {
            min: Coord::new(0, 0, 0),
            max: Coord::new(width, height, depth),
        }
    }

    /// Returns true if `coord` lies inside the box.
    #[inline]
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        self.min.x <= coord.x
            && coord.x < self.max.x
            && self.min.y <= coord.y
            && coord.y < self.max.y
            && self.min.z <= coord.z
            && coord.z < self.max.z
    }

    /// Size along x, y, z. Inverted boxes report zero.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (usize, usize, usize) {
        (
            span(self.min.x, self.max.x),
            span(self.min.y, self.max.y),
            span(self.min.z, self.max.z),
        )
    }

    /// Number of cells in the box, saturating at `usize::MAX`.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> usize {
        let (w, h, d) = self.size();
        w.saturating_mul(h).saturating_mul(d)
    }

    /// Number of cells in the box, or `None` if it does not fit in `usize`.
    #[must_use]
    pub fn checked_volume(&self) -> Option<usize> {
        let (w, h, d) = self.size();
        w.checked_mul(h)?.checked_mul(d)
    }

    /// True if `min <= max` on every axis.
    #[inline]
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

/// Distance from `min` to `max`, zero when inverted. Widened so extreme
/// bounds cannot overflow.
#[inline]
fn span(min: i32, max: i32) -> usize {
    usize::try_from(i64::from(max) - i64::from(min)).unwrap_or(0)
}

/// A single block in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Block {
    /// Block type ID.
    pub id: u16,
    /// Block metadata (orientation, variant, etc.).
    pub meta: u16,
}

impl Block {
    /// Air block (empty).
    pub const AIR: Self = Self::new(0);
    /// Stone block.
    pub const STONE: Self = Self::new(1);
    /// Grass block.
    pub const GRASS: Self = Self::new(2);
    /// Dirt block.
    pub const DIRT: Self = Self::new(3);
    /// Bedrock block, never carved.
    pub const BEDROCK: Self = Self::new(7);
    /// Mossy cobblestone, used for tunnel floor accents.
    pub const MOSSY_COBBLESTONE: Self = Self::new(48);

    /// Creates a new block with given ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self { id, meta: 0 }
    }

    /// Creates a block with ID and metadata.
    #[inline]
    #[must_use]
    pub const fn with_meta(id: u16, meta: u16) -> Self {
        Self { id, meta }
    }

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }
}

/// Read/write access to a bounded block grid.
///
/// Material comparisons in the carving core go through
/// [`Grid::empty_material`] and [`Grid::impassable_material`] so a provider
/// can remap ids.
pub trait Grid {
    /// Block at `coord`.
    fn material_at(&self, coord: Coord) -> Block;

    /// Replaces the block at `coord`.
    fn set_material_at(&mut self, coord: Coord, block: Block);

    /// Half-open bounding box of addressable cells.
    fn bounds(&self) -> GridBounds;

    /// Material that counts as open space.
    fn empty_material(&self) -> Block {
        Block::AIR
    }

    /// Material a walk must never touch.
    fn impassable_material(&self) -> Block {
        Block::BEDROCK
    }
}

/// Persisted player location.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spawn {
    /// Player position in world units.
    pub position: [f64; 3],
    /// Player yaw in degrees, unnormalised.
    pub yaw_degrees: f32,
}

/// Dense block grid backed by a flat vector.
#[derive(Clone, Debug)]
pub struct VoxelWorld {
    bounds: GridBounds,
    /// Block data indexed as `[y][z][x]` relative to `bounds.min`.
    blocks: Vec<Block>,
    /// Player location, if the world has one.
    pub spawn: Option<Spawn>,
}

impl VoxelWorld {
    /// Number of dirt layers below a grass surface.
    const DIRT_LAYERS: i32 = 3;

    /// Creates a world with every cell set to `block`.
    #[must_use]
    pub fn filled(bounds: GridBounds, block: Block) -> Self {
        Self {
            bounds,
            blocks: vec![block; bounds.volume()],
            spawn: None,
        }
    }

    /// Creates a world from raw block data in `[y][z][x]` order.
    ///
    /// Returns `None` if the block count does not match the bounds.
    #[must_use]
    pub fn from_blocks(bounds: GridBounds, blocks: Vec<Block>) -> Option<Self> {
        (blocks.len() == bounds.volume()).then_some(Self {
            bounds,
            blocks,
            spawn: None,
        })
    }

    /// Creates simple layered terrain: bedrock floor, stone body, a few
    /// dirt layers, grass at `surface_y`, and air above.
    #[must_use]
    pub fn layered(bounds: GridBounds, surface_y: i32) -> Self {
        let mut world = Self::filled(bounds, Block::AIR);
        let (_, height, _) = bounds.size();
        for layer in 0..height {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let y = bounds.min.y + layer as i32;
            let block = if y == bounds.min.y {
                Block::BEDROCK
            } else if y < surface_y - Self::DIRT_LAYERS {
                Block::STONE
            } else if y < surface_y {
                Block::DIRT
            } else if y == surface_y {
                Block::GRASS
            } else {
                Block::AIR
            };
            world.fill_layer(y, block);
        }
        world
    }

    /// Sets the spawn point.
    #[must_use]
    pub const fn with_spawn(mut self, spawn: Spawn) -> Self {
        self.spawn = Some(spawn);
        self
    }

    /// Raw block data in `[y][z][x]` order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Counts blocks matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(Block) -> bool) -> usize {
        self.blocks.iter().filter(|b| predicate(**b)).count()
    }

    fn fill_layer(&mut self, y: i32, block: Block) {
        let (width, _, depth) = self.bounds.size();
        if let Some(start) = self.index(Coord::new(self.bounds.min.x, y, self.bounds.min.z)) {
            self.blocks[start..start + width * depth].fill(block);
        }
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.bounds.contains(coord) {
            return None;
        }
        let (width, _, depth) = self.bounds.size();
        let x = span(self.bounds.min.x, coord.x);
        let y = span(self.bounds.min.y, coord.y);
        let z = span(self.bounds.min.z, coord.z);
        Some((y * depth + z) * width + x)
    }
}

impl Grid for VoxelWorld {
    #[inline]
    fn material_at(&self, coord: Coord) -> Block {
        self.index(coord).map_or(Block::AIR, |i| self.blocks[i])
    }

    #[inline]
    fn set_material_at(&mut self, coord: Coord, block: Block) {
        if let Some(i) = self.index(coord) {
            self.blocks[i] = block;
        }
    }

    #[inline]
    fn bounds(&self) -> GridBounds {
        self.bounds
    }
}
