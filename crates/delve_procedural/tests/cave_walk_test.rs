//! # Cave Walk Integration Tests
//!
//! Proves long walks over layered terrain stay inside the world shell,
//! carve connected tunnels, and survive a save/load cycle.

use delve_procedural::{
    AffineView, Block, CarveConfig, CaveWalker, Coord, Excavation, Grid, GridBounds, NullObserver,
    Pattern, Spawn, StopReason, VoxelWorld, WalkConfig, WalkObserver, WalkOutcome,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Records every stamp origin so tunnels can be traced.
#[derive(Default)]
struct PathRecorder {
    origins: Vec<(u32, Coord)>,
}

impl WalkObserver for PathRecorder {
    fn on_stamp(
        &mut self,
        depth: u32,
        origin: Coord,
        _heading_degrees: f64,
        _slice: &delve_procedural::Volume<Block>,
    ) {
        self.origins.push((depth, origin));
    }
}

fn shelled_world(size: i32) -> VoxelWorld {
    let bounds = GridBounds::from_size(size, size, size);
    let mut world = VoxelWorld::filled(bounds, Block::STONE);
    for a in 0..size {
        for b in 0..size {
            for c in [0, size - 1] {
                world.set_material_at(Coord::new(c, a, b), Block::BEDROCK);
                world.set_material_at(Coord::new(a, c, b), Block::BEDROCK);
                world.set_material_at(Coord::new(a, b, c), Block::BEDROCK);
            }
        }
    }
    world
}

fn all_reasons(outcome: &WalkOutcome, out: &mut Vec<StopReason>) {
    out.push(outcome.reason);
    for branch in &outcome.branches {
        all_reasons(branch, out);
    }
}

/// Test: many seeded walks never breach a bedrock shell.
#[test]
fn test_bedrock_shell_survives_many_walks() {
    let size = 48;
    let mut world = shelled_world(size);
    let shell = world.count(|b| b == Block::BEDROCK);
    let pattern = Pattern::tunnel();

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let view = AffineView::new(pattern.shape(), Coord::new(22, 22, 22), 0.0).unwrap();
        let config = WalkConfig {
            max_length: 400,
            steps_between_turns: 3,
            steps_between_branches: 4,
            ..WalkConfig::default()
        };
        let outcome = CaveWalker::new(&mut world, &mut rng, &mut NullObserver)
            .walk(view, &pattern, &config)
            .unwrap();

        let mut reasons = Vec::new();
        all_reasons(&outcome, &mut reasons);
        assert!(
            !reasons.contains(&StopReason::OutOfBounds),
            "seed {seed}: walk escaped the shell"
        );
    }

    assert_eq!(world.count(|b| b == Block::BEDROCK), shell);
    println!("Air blocks after 20 walks: {}", world.count(Block::is_air));
}

/// Test: consecutive stamps of a straight walk are contiguous.
#[test]
fn test_straight_walk_is_contiguous() {
    let mut world = VoxelWorld::filled(GridBounds::from_size(96, 96, 128), Block::STONE);
    let pattern = Pattern::tunnel();
    let view = AffineView::new(pattern.shape(), Coord::new(46, 46, 0), 0.0).unwrap();
    let config = WalkConfig {
        max_length: 90,
        turn_probability: 0.0,
        branch_probability: 0.0,
        ..WalkConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut recorder = PathRecorder::default();

    let outcome = CaveWalker::new(&mut world, &mut rng, &mut recorder)
        .walk(view, &pattern, &config)
        .unwrap();

    assert_eq!(outcome.reason, StopReason::MaxLength);
    assert_eq!(outcome.length, 90);
    assert_eq!(recorder.origins.len(), 30);
    for pair in recorder.origins.windows(2) {
        let (a, b) = (pair[0].1, pair[1].1);
        assert_eq!(b.z - a.z, 3);
        assert!((b.x - a.x).abs() <= 1);
        assert!((b.y - a.y).abs() <= 1);
    }

    // Mid-tunnel cross-sections are open at the centre and floored.
    let (_, mid) = recorder.origins[15];
    assert_eq!(world.material_at(Coord::new(mid.x + 2, mid.y + 2, mid.z + 1)), Block::AIR);
    assert_ne!(world.material_at(Coord::new(mid.x + 2, mid.y, mid.z + 1)), Block::AIR);
}

/// Test: branch stamps are reported at depth one and counted in the outcome.
#[test]
fn test_branch_stamps_are_counted() {
    let mut world = VoxelWorld::filled(GridBounds::from_size(160, 64, 160), Block::STONE);
    let pattern = Pattern::tunnel();
    let view = AffineView::new(pattern.shape(), Coord::new(78, 30, 8), 0.0).unwrap();
    let config = WalkConfig {
        max_length: 120,
        turn_probability: 0.0,
        branch_probability: 0.5,
        steps_between_branches: 5,
        ..WalkConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut recorder = PathRecorder::default();

    let outcome = CaveWalker::new(&mut world, &mut rng, &mut recorder)
        .walk(view, &pattern, &config)
        .unwrap();

    let parent_stamps = recorder.origins.iter().filter(|(d, _)| *d == 0).count();
    let branch_stamps = recorder.origins.iter().filter(|(d, _)| *d == 1).count();
    assert_eq!(parent_stamps, outcome.stamps as usize);
    assert_eq!(parent_stamps + branch_stamps, recorder.origins.len());
    assert_eq!(
        u64::try_from(recorder.origins.len()).unwrap(),
        outcome.total_stamps()
    );
    for branch in &outcome.branches {
        assert!(branch.length <= 60);
        assert_eq!(branch.depth, 1);
    }
}

/// Test: a carved world survives saving and loading.
#[test]
fn test_excavated_world_persists() {
    let mut world = VoxelWorld::layered(GridBounds::from_size(64, 64, 64), 50).with_spawn(Spawn {
        position: [32.0, 51.0, 4.0],
        yaw_degrees: 0.0,
    });
    let spawn = world.spawn;
    let config = CarveConfig {
        seed: Some(3),
        tunnels: 2,
        tubes: 4,
        ..CarveConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let report = Excavation::new(&config)
        .run(&mut world, spawn.as_ref(), &mut rng, &mut NullObserver)
        .unwrap();
    assert_eq!(report.walks.len() + report.skipped as usize, 7);

    let path = std::env::temp_dir().join("delve_excavated_world.dlv");
    world.save(&path).unwrap();
    let loaded = VoxelWorld::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.bounds(), world.bounds());
    assert_eq!(loaded.spawn, spawn);
    assert_eq!(loaded.blocks(), world.blocks());
}
