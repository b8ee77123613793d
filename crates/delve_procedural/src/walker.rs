//! # Cave Walker
//!
//! Drives an [`AffineView`] through the grid, stamping a [`Pattern`] at
//! every step and deciding at random whether to turn, branch, or advance.
//!
//! ## Step
//!
//! 1. Stop if the view leaves the grid, sits entirely in open space, or
//!    touches impassable material (checked in that order, before stamping).
//! 2. Stamp the pattern.
//! 3. Pick a turn direction, then either turn, launch a branch, or advance
//!    by the pattern depth with a random lateral and vertical jitter.
//!
//! Branches are plain recursion on a cloned view. A branch runs to
//! completion before its parent resumes, is half as long, and never
//! branches itself.
//!
//! ## Determinism
//!
//! Every draw comes from the caller's RNG, so a seeded generator replays
//! the same tunnels.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CarveError, CarveResult};
use crate::grid::{Block, Coord, Grid};
use crate::pattern::Pattern;
use crate::view::AffineView;
use crate::volume::Volume;

/// Inclusive range of sideways offsets drawn per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateralRange {
    /// Smallest offset.
    pub min: i32,
    /// Largest offset.
    pub max: i32,
}

impl Default for LateralRange {
    fn default() -> Self {
        Self { min: -1, max: 1 }
    }
}

/// Parameters for one walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Forward travel after which the walk ends.
    pub max_length: u32,
    /// Chance that a chosen turn is +90 degrees rather than -90.
    pub turn_bias: f64,
    /// Chance of turning once a turn is allowed.
    pub turn_probability: f64,
    /// Advancing steps required since the last turn before another.
    pub steps_between_turns: u32,
    /// Sideways jitter per advancing step.
    pub lateral_range: LateralRange,
    /// Per-trial probability of the two-trial vertical jitter.
    pub vertical_up_probability: f64,
    /// Chance of launching a branch once one is allowed.
    pub branch_probability: f64,
    /// Advancing steps required since the last branch before another.
    pub steps_between_branches: u32,
    /// Nesting level, reported to observers only.
    pub branch_depth: u32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_length: 250,
            turn_bias: 0.5,
            turn_probability: 0.5,
            steps_between_turns: 10,
            lateral_range: LateralRange::default(),
            vertical_up_probability: 0.4,
            branch_probability: 0.3,
            steps_between_branches: 20,
            branch_depth: 0,
        }
    }
}

impl WalkConfig {
    /// Checks ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::InvalidConfig`] for a zero `max_length`, a
    /// probability outside `[0, 1]`, or an inverted lateral range.
    pub fn validate(&self) -> CarveResult<()> {
        if self.max_length == 0 {
            return Err(CarveError::InvalidConfig("max_length must be positive".into()));
        }
        for (name, p) in [
            ("turn_bias", self.turn_bias),
            ("turn_probability", self.turn_probability),
            ("vertical_up_probability", self.vertical_up_probability),
            ("branch_probability", self.branch_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CarveError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.lateral_range.min > self.lateral_range.max {
            return Err(CarveError::InvalidConfig(format!(
                "lateral_range min {} exceeds max {}",
                self.lateral_range.min, self.lateral_range.max
            )));
        }
        Ok(())
    }

    /// Settings for a branch launched from a walk using `self`: half the
    /// length cap, rounded up, and no further branching.
    #[must_use]
    pub fn for_branch(&self) -> Self {
        Self {
            max_length: self.max_length.div_ceil(2),
            branch_probability: 0.0,
            branch_depth: self.branch_depth + 1,
            ..self.clone()
        }
    }
}

/// Why a walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Part of the view left the grid.
    OutOfBounds,
    /// The view covered nothing but open space.
    AirPocket,
    /// The view touched impassable material.
    Bedrock,
    /// The length cap was reached.
    MaxLength,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutOfBounds => "out of bounds",
            Self::AirPocket => "hit air pocket",
            Self::Bedrock => "hit bedrock",
            Self::MaxLength => "hit max length",
        })
    }
}

/// Summary of one walk and the branches it launched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Accumulated forward travel.
    pub length: u32,
    /// Termination cause.
    pub reason: StopReason,
    /// Number of pattern stamps applied.
    pub stamps: u32,
    /// Number of reorientations.
    pub turns: u32,
    /// Nesting level of this walk.
    pub depth: u32,
    /// Branches launched from this walk, in launch order.
    pub branches: Vec<WalkOutcome>,
}

impl WalkOutcome {
    /// Length of this walk plus all of its branches.
    #[must_use]
    pub fn total_length(&self) -> u64 {
        u64::from(self.length) + self.branches.iter().map(Self::total_length).sum::<u64>()
    }

    /// Stamps applied by this walk and all of its branches.
    #[must_use]
    pub fn total_stamps(&self) -> u64 {
        u64::from(self.stamps) + self.branches.iter().map(Self::total_stamps).sum::<u64>()
    }

    /// Number of branches launched anywhere below this walk.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.branches.len() + self.branches.iter().map(Self::branch_count).sum::<usize>()
    }
}

/// Receives walk diagnostics. All methods default to doing nothing.
pub trait WalkObserver {
    /// A pattern was stamped; `slice` is the post-write grid content.
    fn on_stamp(&mut self, depth: u32, origin: Coord, heading_degrees: f64, slice: &Volume<Block>) {
        let _ = (depth, origin, heading_degrees, slice);
    }

    /// The walk turned by `degrees` at `length`.
    fn on_turn(&mut self, depth: u32, degrees: f64, length: u32) {
        let _ = (depth, degrees, length);
    }

    /// A branch turned by `degrees` is about to start at `length`.
    fn on_branch(&mut self, depth: u32, degrees: f64, length: u32) {
        let _ = (depth, degrees, length);
    }

    /// The walk ended.
    fn on_stop(&mut self, depth: u32, reason: StopReason, length: u32) {
        let _ = (depth, reason, length);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl WalkObserver for NullObserver {}

/// Forwards events to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl WalkObserver for TracingObserver {
    fn on_stamp(&mut self, depth: u32, origin: Coord, heading_degrees: f64, _slice: &Volume<Block>) {
        tracing::debug!(
            "B: {} P: ({}, {}, {}) @ {:.1} deg",
            depth,
            origin.x,
            origin.y,
            origin.z,
            heading_degrees
        );
    }

    fn on_turn(&mut self, depth: u32, degrees: f64, length: u32) {
        tracing::debug!("B: {} changing orientation by {} deg at length {}", depth, degrees, length);
    }

    fn on_branch(&mut self, depth: u32, degrees: f64, length: u32) {
        tracing::debug!("B: {} launching branch by {} deg at length {}", depth, degrees, length);
    }

    fn on_stop(&mut self, depth: u32, reason: StopReason, length: u32) {
        tracing::debug!("B: {} cave {} after {} blocks", depth, reason, length);
    }
}

/// Per-walk counters.
#[derive(Default)]
struct WalkState {
    length: u32,
    since_turn: u32,
    since_branch: u32,
    stamps: u32,
    turns: u32,
}

/// Tunnel carving engine bound to one grid, RNG and observer.
pub struct CaveWalker<'a, G: ?Sized, R, O> {
    grid: &'a mut G,
    rng: &'a mut R,
    observer: &'a mut O,
}

impl<'a, G, R, O> CaveWalker<'a, G, R, O>
where
    G: Grid + ?Sized,
    R: Rng,
    O: WalkObserver,
{
    /// Creates a walker.
    pub fn new(grid: &'a mut G, rng: &'a mut R, observer: &'a mut O) -> Self {
        Self { grid, rng, observer }
    }

    /// Walks `view` until a stop condition fires or `max_length` is reached.
    ///
    /// Stamps applied before the stop remain in the grid.
    ///
    /// # Errors
    ///
    /// Fails before touching the grid if `config` is invalid, the pattern
    /// and view shapes differ, or the pattern has nothing to write.
    pub fn walk(
        &mut self,
        mut view: AffineView,
        pattern: &Pattern,
        config: &WalkConfig,
    ) -> CarveResult<WalkOutcome> {
        config.validate()?;
        if pattern.shape() != view.shape() {
            return Err(CarveError::ShapeMismatch {
                expected: view.shape(),
                found: pattern.shape(),
            });
        }
        if pattern.is_all_keep() {
            return Err(CarveError::EmptyPattern);
        }
        let forward = u32::try_from(pattern.forward_step())
            .map_err(|_| CarveError::InvalidConfig("pattern is too deep".into()))?;

        let depth = config.branch_depth;
        let empty = self.grid.empty_material();
        let impassable = self.grid.impassable_material();
        let mut state = WalkState::default();
        let mut branches = Vec::new();

        let reason = loop {
            if state.length >= config.max_length {
                break StopReason::MaxLength;
            }
            if !view.is_in_bounds(&*self.grid) {
                break StopReason::OutOfBounds;
            }
            let covered = view.read_cells(&*self.grid);
            if covered.iter().all(|b| *b == empty) {
                break StopReason::AirPocket;
            }
            if covered.iter().any(|b| *b == impassable) {
                break StopReason::Bedrock;
            }

            let slice = view.stamp(&mut *self.grid, pattern)?;
            state.stamps += 1;
            self.observer
                .on_stamp(depth, view.origin_position(), view.heading_degrees(), &slice);

            let turn = if self.rng.gen::<f64>() < config.turn_bias {
                FRAC_PI_2
            } else {
                -FRAC_PI_2
            };

            if self.rng.gen::<f64>() < config.turn_probability
                && state.since_turn > config.steps_between_turns
            {
                self.observer.on_turn(depth, turn.to_degrees(), state.length);
                view.rotate_y(turn);
                state.since_turn = 0;
                state.turns += 1;
            } else if self.rng.gen::<f64>() < config.branch_probability
                && state.since_branch > config.steps_between_branches
            {
                self.observer.on_branch(depth, turn.to_degrees(), state.length);
                let mut branch_view = view.clone();
                branch_view.rotate_y(turn);
                branches.push(self.walk(branch_view, pattern, &config.for_branch())?);
                state.since_branch = 0;
            } else {
                let lateral = self
                    .rng
                    .gen_range(config.lateral_range.min..=config.lateral_range.max);
                let vertical = self.vertical_offset(config.vertical_up_probability);
                view.translate_relative(f64::from(lateral), f64::from(vertical), f64::from(forward));
                state.length += forward;
                state.since_turn += 1;
                state.since_branch += 1;
            }
        };

        self.observer.on_stop(depth, reason, state.length);
        Ok(WalkOutcome {
            length: state.length,
            reason,
            stamps: state.stamps,
            turns: state.turns,
            depth,
            branches,
        })
    }

    /// Binomial(2, p) shifted by -1: P(-1) = (1-p)^2, P(0) = 2p(1-p),
    /// P(+1) = p^2.
    fn vertical_offset(&mut self, p: f64) -> i32 {
        i32::from(self.rng.gen_bool(p)) + i32::from(self.rng.gen_bool(p)) - 1
    }
}
