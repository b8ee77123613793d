//! # Excavation Runs
//!
//! Plans a batch of top-level walks over one grid: an optional tunnel in
//! front of the player, extra tunnels seeded at random columns below the
//! ground, and single-cell tube walks. Walks run one after another so each
//! sees the tunnels carved before it.

use rand::Rng;

use crate::config::CarveConfig;
use crate::error::CarveResult;
use crate::grid::{Block, Coord, Grid, Spawn};
use crate::ground::find_ground_level;
use crate::pattern::Pattern;
use crate::start::StartPose;
use crate::walker::{CaveWalker, WalkConfig, WalkObserver, WalkOutcome};

/// What kind of top-level walk produced an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalkKind {
    /// Tunnel started in front of the player.
    Player,
    /// Tunnel started at a random column.
    Tunnel,
    /// Tube started at a random column.
    Tube,
}

/// One top-level walk and where it started.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkRecord {
    /// Walk kind.
    pub kind: WalkKind,
    /// Start pose before any pattern offset.
    pub start: StartPose,
    /// Result, including branches.
    pub outcome: WalkOutcome,
}

/// Summary of an excavation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExcavationReport {
    /// Completed walks in execution order.
    pub walks: Vec<WalkRecord>,
    /// Random starts dropped because their column had no ground.
    pub skipped: u32,
}

impl ExcavationReport {
    /// Forward travel over all walks and branches.
    #[must_use]
    pub fn total_length(&self) -> u64 {
        self.walks.iter().map(|w| w.outcome.total_length()).sum()
    }

    /// Branches launched over all walks.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.walks.iter().map(|w| w.outcome.branch_count()).sum()
    }

    /// Number of walks of `kind`.
    #[must_use]
    pub fn count(&self, kind: WalkKind) -> usize {
        self.walks.iter().filter(|w| w.kind == kind).count()
    }
}

/// A configured batch of walks.
#[derive(Clone, Debug)]
pub struct Excavation<'a> {
    config: &'a CarveConfig,
    tunnel: Pattern,
    tube: Pattern,
}

impl<'a> Excavation<'a> {
    /// Prepares the stock patterns for `config`.
    #[must_use]
    pub fn new(config: &'a CarveConfig) -> Self {
        Self {
            config,
            tunnel: Pattern::tunnel(),
            tube: Pattern::tube(Block::new(config.tube_material)),
        }
    }

    /// Carves every planned walk into `grid`.
    ///
    /// The player tunnel is skipped when `spawn` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error raised by a walk. Walks that
    /// finished earlier stay carved.
    pub fn run<G, R, O>(
        &self,
        grid: &mut G,
        spawn: Option<&Spawn>,
        rng: &mut R,
        observer: &mut O,
    ) -> CarveResult<ExcavationReport>
    where
        G: Grid + ?Sized,
        R: Rng,
        O: WalkObserver,
    {
        self.config.validate()?;
        let mut report = ExcavationReport::default();

        if self.config.player_tunnel {
            match spawn {
                Some(spawn) => {
                    let start = StartPose::from_spawn(spawn);
                    let view = start.view_ahead(self.tunnel.shape())?;
                    let outcome = CaveWalker::new(grid, rng, observer).walk(
                        view,
                        &self.tunnel,
                        &self.config.walk,
                    )?;
                    Self::log(WalkKind::Player, &start, &outcome);
                    report.walks.push(WalkRecord { kind: WalkKind::Player, start, outcome });
                }
                None => tracing::warn!("World has no spawn, skipping player tunnel"),
            }
        }

        let batches = [
            (WalkKind::Tunnel, self.config.tunnels, &self.tunnel, &self.config.walk),
            (WalkKind::Tube, self.config.tubes, &self.tube, &self.config.tube_walk),
        ];
        for (kind, count, pattern, walk) in batches {
            for _ in 0..count {
                let Some(start) = self.random_start(&*grid, rng) else {
                    report.skipped += 1;
                    continue;
                };
                let outcome = self.walk_from(grid, rng, observer, &start, pattern, walk)?;
                Self::log(kind, &start, &outcome);
                report.walks.push(WalkRecord { kind, start, outcome });
            }
        }

        tracing::info!(
            "Excavated {} walks ({} skipped), total length {}, {} branches",
            report.walks.len(),
            report.skipped,
            report.total_length(),
            report.branch_count()
        );
        Ok(report)
    }

    fn walk_from<G, R, O>(
        &self,
        grid: &mut G,
        rng: &mut R,
        observer: &mut O,
        start: &StartPose,
        pattern: &Pattern,
        walk: &WalkConfig,
    ) -> CarveResult<WalkOutcome>
    where
        G: Grid + ?Sized,
        R: Rng,
        O: WalkObserver,
    {
        let view = start.view(pattern.shape())?;
        CaveWalker::new(grid, rng, observer).walk(view, pattern, walk)
    }

    /// Random column, `start_depth` below its ground, facing a random
    /// cardinal direction. `None` if the column has no ground.
    fn random_start<G, R>(&self, grid: &G, rng: &mut R) -> Option<StartPose>
    where
        G: Grid + ?Sized,
        R: Rng,
    {
        let bounds = grid.bounds();
        if bounds.volume() == 0 {
            return None;
        }
        let x = rng.gen_range(bounds.min.x..bounds.max.x);
        let z = rng.gen_range(bounds.min.z..bounds.max.z);
        let quarter = rng.gen_range(0..4u8);
        let ground = find_ground_level(grid, x, z, self.config.ground_threshold)?;
        let origin = Coord::new(x, ground - self.config.start_depth, z);
        Some(StartPose::new(origin, f64::from(quarter) * 90.0))
    }

    fn log(kind: WalkKind, start: &StartPose, outcome: &WalkOutcome) {
        tracing::debug!(
            "{:?} walk from {:?} at {:.0} deg: {} after {} blocks, {} branches",
            kind,
            start.origin,
            start.yaw.to_degrees(),
            outcome.reason,
            outcome.length,
            outcome.branch_count()
        );
    }
}
