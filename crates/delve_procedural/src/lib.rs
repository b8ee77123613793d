//! # Delve Procedural Carving
//!
//! Carves tunnel networks into voxel worlds by walking a rigid window
//! through the grid and stamping a cross-section at every step.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Every random draw comes from a caller supplied RNG
//! 2. **Rigid**: Views move only by translation and rotation, never per cell
//! 3. **Quiet**: The core reports through observers and never configures logging
//! 4. **Single writer**: Branches recurse depth-first on one grid
//!
//! ## Core Components
//!
//! - `AffineView`: Movable, rotatable window of grid coordinates
//! - `Pattern`: Stencil of blocks to stamp, with keep cells
//! - `CaveWalker`: Stochastic traversal with turns and branches
//! - `Excavation`: Batches of player, tunnel and tube walks
//! - `VoxelWorld`: Dense grid with compressed world files
//!
//! ## Example
//!
//! ```rust,ignore
//! use delve_procedural::{AffineView, CaveWalker, Coord, Pattern, TracingObserver, WalkConfig};
//! use rand::SeedableRng;
//!
//! let mut world = VoxelWorld::layered(GridBounds::from_size(128, 64, 128), 48);
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(12345);
//! let pattern = Pattern::tunnel();
//! let view = AffineView::new(pattern.shape(), Coord::new(64, 30, 4), 0.0)?;
//!
//! let outcome = CaveWalker::new(&mut world, &mut rng, &mut TracingObserver)
//!     .walk(view, &pattern, &WalkConfig::default())?;
//! println!("{} blocks, stopped: {}", outcome.length, outcome.reason);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod excavation;
pub mod grid;
pub mod ground;
pub mod pattern;
pub mod start;
pub mod transform;
pub mod view;
pub mod volume;
pub mod walker;
pub mod world_file;

pub use config::{CarveConfig, ConfigError};
pub use error::{CarveError, CarveResult};
pub use excavation::{Excavation, ExcavationReport, WalkKind, WalkRecord};
pub use grid::{Block, Coord, Grid, GridBounds, Spawn, VoxelWorld};
pub use ground::find_ground_level;
pub use pattern::{Pattern, KEEP};
pub use start::{snap_yaw, StartPose};
pub use transform::Transform;
pub use view::AffineView;
pub use volume::{Shape, Volume};
pub use walker::{
    CaveWalker, LateralRange, NullObserver, StopReason, TracingObserver, WalkConfig,
    WalkObserver, WalkOutcome,
};
