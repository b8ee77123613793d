//! # World Files
//!
//! Worlds are saved as a small little-endian header followed by the
//! LZ4-compressed block array.
//!
//! ## Format
//!
//! | Field    | Size | Notes                                  |
//! |----------|------|----------------------------------------|
//! | magic    | 4    | `DLVW`                                 |
//! | version  | 1    | `1`                                    |
//! | bounds   | 24   | min x, y, z then max x, y, z as `i32`  |
//! | spawn    | 1    | `1` if a spawn follows                 |
//! | position | 24   | three `f64`, present with spawn        |
//! | yaw      | 4    | `f32` degrees, present with spawn      |
//! | blocks   | rest | `compress_prepend_size` of `[y][z][x]` |
//!
//! Terrain compresses well, typically better than 10:1.

use std::io::{self, Read, Write};
use std::path::Path;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};

use crate::grid::{Block, Coord, Grid, GridBounds, Spawn, VoxelWorld};

/// File signature.
pub const MAGIC: [u8; 4] = *b"DLVW";

/// Current format version.
pub const VERSION: u8 = 1;

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_owned())
}

/// Sequential little-endian reader over a byte slice.
struct Cursor<'a> {
    data: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn take<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        if self.data.len() < N {
            return Err(invalid("truncated world header"));
        }
        let (head, rest) = self.data.split_at(N);
        self.data = rest;
        let mut out = [0u8; N];
        out.copy_from_slice(head);
        Ok(out)
    }

    fn i32(&mut self) -> io::Result<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    fn f64(&mut self) -> io::Result<f64> {
        Ok(f64::from_le_bytes(self.take()?))
    }

    fn coord(&mut self) -> io::Result<Coord> {
        Ok(Coord::new(self.i32()?, self.i32()?, self.i32()?))
    }

    fn rest(self) -> &'a [u8] {
        self.data
    }
}

impl VoxelWorld {
    /// Serializes the world to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let bounds = self.bounds();
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&MAGIC);
        buf.push(VERSION);
        for c in [bounds.min, bounds.max] {
            buf.extend_from_slice(&c.x.to_le_bytes());
            buf.extend_from_slice(&c.y.to_le_bytes());
            buf.extend_from_slice(&c.z.to_le_bytes());
        }
        match self.spawn {
            Some(spawn) => {
                buf.push(1);
                for p in spawn.position {
                    buf.extend_from_slice(&p.to_le_bytes());
                }
                buf.extend_from_slice(&spawn.yaw_degrees.to_le_bytes());
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&compress_prepend_size(bytemuck::cast_slice::<Block, u8>(
            self.blocks(),
        )));
        buf
    }

    /// Parses a world from bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` for a bad signature, unknown version, truncated
    /// header, inverted or oversized bounds, or a block payload that does not
    /// match the bounds.
    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        let mut cursor = Cursor { data };
        if cursor.take::<4>()? != MAGIC {
            return Err(invalid("not a world file"));
        }
        let [version] = cursor.take::<1>()?;
        if version != VERSION {
            return Err(invalid("unsupported world file version"));
        }
        let bounds = GridBounds::new(cursor.coord()?, cursor.coord()?);
        if !bounds.is_ordered() {
            return Err(invalid("world bounds are inverted"));
        }
        let expected = bounds
            .checked_volume()
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<Block>()))
            .ok_or_else(|| invalid("world bounds are too large"))?;
        let spawn = match cursor.take::<1>()? {
            [0] => None,
            [1] => Some(Spawn {
                position: [cursor.f64()?, cursor.f64()?, cursor.f64()?],
                yaw_degrees: f32::from_le_bytes(cursor.take()?),
            }),
            _ => return Err(invalid("bad spawn flag")),
        };

        // Check the declared size before decompressing allocates it.
        let payload = cursor.rest();
        let declared = payload
            .get(..4)
            .and_then(|b| <[u8; 4]>::try_from(b).ok())
            .map(u32::from_le_bytes)
            .ok_or_else(|| invalid("truncated block data"))?;
        if usize::try_from(declared).ok() != Some(expected) {
            return Err(invalid("block data does not match world bounds"));
        }
        let decompressed = decompress_size_prepended(payload)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if decompressed.len() != expected {
            return Err(invalid("block data does not match world bounds"));
        }
        // The byte buffer may not be aligned for `Block`.
        let blocks: Vec<Block> = decompressed
            .chunks_exact(std::mem::size_of::<Block>())
            .map(bytemuck::pod_read_unaligned)
            .collect();

        let world = Self::from_blocks(bounds, blocks)
            .ok_or_else(|| invalid("block data does not match world bounds"))?;
        Ok(match spawn {
            Some(spawn) => world.with_spawn(spawn),
            None => world,
        })
    }

    /// Saves the world to a compressed file.
    ///
    /// # Errors
    ///
    /// Returns error if file operations fail.
    pub fn save(&self, path: &Path) -> io::Result<usize> {
        let bytes = self.to_bytes();
        let mut file = std::fs::File::create(path)?;
        file.write_all(&bytes)?;
        tracing::info!("Saved world file: {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len())
    }

    /// Loads a world from a compressed file.
    ///
    /// # Errors
    ///
    /// Returns error if file operations or decoding fail.
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        let world = Self::from_bytes(&data)?;
        tracing::info!("Loaded world file: {}", path.display());
        tracing::debug!("World bounds: {:?}, spawn: {:?}", world.bounds(), world.spawn);
        Ok(world)
    }
}
