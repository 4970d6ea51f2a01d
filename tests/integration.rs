//! Integration tests for pherotrace

use pherotrace::checkpoint::Checkpoint;
use pherotrace::{Colony, Config, Coord, DensityField, SimError};

fn corridor_config() -> Config {
    let mut config = Config::default();
    config.grid.shape = [3, 3, 12];
    config.search.start = [1, 1, 1];
    config.search.goal = [1, 1, 9];
    config.search.path_length = 8;
    config.colony.rounds = 3;
    config.colony.ants_per_round = 5;
    config.colony.ticks_per_round = 30;
    config
}

fn open_config() -> Config {
    let mut config = Config::default();
    config.grid.shape = [7, 7, 7];
    config.search.start = [1, 1, 1];
    config.search.goal = [5, 5, 5];
    config.search.path_length = 12;
    config.colony.rounds = 5;
    config.colony.ants_per_round = 10;
    config.colony.ticks_per_round = 40;
    config.map = pherotrace::config::MapConfig::Uniform { value: 0.5 };
    config
}

#[test]
fn test_full_simulation_cycle() {
    let config = open_config();
    let density = config.map.build(config.grid.shape).unwrap();
    let mut colony = Colony::new_with_seed(config.clone(), density, 12345).unwrap();

    colony.run().unwrap();

    assert_eq!(colony.time, 5 * 40);
    assert_eq!(colony.population(), 5 * 10);

    let shape = config.grid.shape;
    for ant in &colony.ants {
        // Positions stay on the grid, off the zero border
        assert!(ant.current.in_bounds(shape));
        assert!(!ant.current.on_border(shape));

        // Paths are connected and loop-free
        let mut seen = std::collections::HashSet::new();
        for c in &ant.path {
            assert!(seen.insert(*c));
        }
        for pair in ant.path.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]));
        }
    }
}

#[test]
fn test_field_invariants_after_run() {
    let config = open_config();
    let density = config.map.build(config.grid.shape).unwrap();
    let mut colony = Colony::new_with_seed(config.clone(), density, 777).unwrap();

    colony.run().unwrap();

    let shape = config.grid.shape;
    for x in 0..shape[0] {
        for y in 0..shape[1] {
            for z in 0..shape[2] {
                let c = Coord::new(x, y, z);
                let v = colony.pheromone.get(c);
                if c.on_border(shape) {
                    assert_eq!(v, 0.0, "border cell {} must stay zero", c);
                } else {
                    assert!(v >= config.pheromone.min_value, "floor violated at {}", c);
                }
            }
        }
    }
}

#[test]
fn test_corridor_scenario_scores_exactly() {
    let config = corridor_config();
    let density = DensityField::uniform(config.grid.shape, 0.3).unwrap();
    let mut colony = Colony::new_with_seed(config, density, 9).unwrap();

    colony.run().unwrap();

    let solution = colony.best_solution().unwrap();
    assert_eq!(solution.path.len(), 9);
    assert_eq!(solution.path[0], Coord::new(1, 1, 1));
    assert_eq!(*solution.path.last().unwrap(), Coord::new(1, 1, 9));
    assert!((solution.score - 8.0 * 0.3).abs() < 1e-9);
}

#[test]
fn test_reproducibility() {
    let config = open_config();
    let density = config.map.build(config.grid.shape).unwrap();

    let mut a = Colony::new_with_seed(config.clone(), density.clone(), 99999).unwrap();
    let mut b = Colony::new_with_seed(config, density, 99999).unwrap();

    a.run().unwrap();
    b.run().unwrap();

    assert_eq!(a.time, b.time);
    assert_eq!(a.population(), b.population());
    assert_eq!(a.valid_count(), b.valid_count());

    for (x, y) in a.ants.iter().zip(&b.ants) {
        assert_eq!(x.path, y.path);
        assert_eq!(x.score, y.score);
        assert_eq!(x.alive, y.alive);
        assert_eq!(x.freeze, y.freeze);
    }
}

#[test]
fn test_no_solution_is_explicit() {
    let mut config = corridor_config();
    // one tick is never enough to spend an 8-move budget
    config.colony.rounds = 1;
    config.colony.ticks_per_round = 1;

    let density = DensityField::uniform(config.grid.shape, 0.3).unwrap();
    let mut colony = Colony::new_with_seed(config, density, 5).unwrap();

    colony.run().unwrap();
    assert_eq!(colony.best_solution().unwrap_err(), SimError::NoSolutionFound);
}

#[test]
fn test_zero_density_fails_cleanly() {
    let config = corridor_config();
    let density = DensityField::uniform(config.grid.shape, 0.0).unwrap();
    let mut colony = Colony::new_with_seed(config, density, 5).unwrap();

    let err = colony.run().unwrap_err();
    assert!(matches!(err, SimError::InvalidDensity { .. }));
}

#[test]
fn test_checkpoint_persistence() {
    let config = open_config();
    let density = config.map.build(config.grid.shape).unwrap();
    let mut colony = Colony::new_with_seed(config, density, 54321).unwrap();

    colony.run_round().unwrap();
    colony.run_round().unwrap();

    let checkpoint = colony.create_checkpoint();
    let temp_path = "/tmp/pherotrace_integration_checkpoint.bin";
    checkpoint.save(temp_path).expect("Failed to save checkpoint");

    let loaded = Checkpoint::load(temp_path).expect("Failed to load checkpoint");

    assert_eq!(loaded.time, colony.time);
    assert_eq!(loaded.round, colony.round);
    assert_eq!(loaded.ants.len(), colony.population());
    assert_eq!(loaded.random_seed, colony.seed());

    // Restore and continue
    let mut restored = Colony::from_checkpoint(loaded);
    assert_eq!(restored.time, colony.time);
    assert_eq!(restored.population(), colony.population());

    restored.run_round().unwrap();
    assert_eq!(restored.round, 3);
    assert_eq!(restored.population(), 30);

    std::fs::remove_file(temp_path).ok();
}

#[test]
fn test_masked_voxels_stay_clear() {
    let mut config = open_config();
    config.grid.mask = vec![[3, 3, 3], [3, 3, 4]];

    let density = config.map.build(config.grid.shape).unwrap();
    let mut colony = Colony::new_with_seed(config.clone(), density, 2024).unwrap();

    colony.run().unwrap();

    for &voxel in &config.grid.mask {
        assert_eq!(colony.pheromone.get(Coord::from(voxel)), 0.0);
    }
    // No ant ever walks into a masked voxel
    for ant in &colony.ants {
        for &voxel in &config.grid.mask {
            assert!(!ant.path.contains(&Coord::from(voxel)));
        }
    }
}

#[test]
fn test_stats_history_records() {
    let mut config = open_config();
    config.logging.stats_interval = 10;

    let density = config.map.build(config.grid.shape).unwrap();
    let mut colony = Colony::new_with_seed(config, density, 33333).unwrap();
    colony.run().unwrap();

    assert!(colony.stats.time == 200);
    assert!(!colony.stats_history.snapshots.is_empty());
    assert_eq!(colony.stats_history.snapshots.len(), 20);

    let series = colony.stats_history.valid_series();
    assert_eq!(series.len(), 20);
}
