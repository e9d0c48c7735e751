use redoxmc::analysis::aggregate::PopulationSummary;
use redoxmc::core::io::table;
use redoxmc::core::models::vector::ModificationVector;
use redoxmc::core::space::state_space::StateSpace;
use redoxmc::engine::config::{
    InitialState, SimulationConfig, SimulationConfigBuilder, TransitionProbabilities,
};
use redoxmc::engine::progress::ProgressReporter;
use redoxmc::engine::streams;
use redoxmc::workflows::simulate::{SimulationResult, StopSignal, run, run_with_streams};

fn config(molecules: usize, steps: usize, probabilities: TransitionProbabilities, seed: u64) -> SimulationConfig {
    SimulationConfigBuilder::new()
        .molecules(molecules)
        .steps(steps)
        .catalytic_site(0)
        .probabilities(probabilities)
        .seed(Some(seed))
        .build()
        .unwrap()
}

fn simulate(space: &StateSpace, config: &SimulationConfig) -> SimulationResult {
    run(space, config, &StopSignal::new(), &ProgressReporter::new()).unwrap()
}

#[test]
fn single_molecule_without_events_stays_put() {
    let space = StateSpace::generate(4).unwrap();
    let config = config(1, 1, TransitionProbabilities::uniform(0.0, 0.0).unwrap(), 3);
    let result = simulate(&space, &config);
    assert_eq!(result.trajectory.column(1), result.trajectory.column(0));
    assert_eq!(result.oxidations + result.reductions, 0);
}

#[test]
fn certain_oxidation_saturates_every_molecule() {
    let space = StateSpace::generate(5).unwrap();
    let probabilities = TransitionProbabilities::uniform(1.0, 0.0).unwrap();
    let config = config(1000, 50, probabilities, 11);
    let result = simulate(&space, &config);

    let expected = 50.min(space.sites());
    for &id in result.final_snapshot() {
        assert_eq!(space.grade_of(id), Some(expected));
    }
    assert_eq!(result.summary.grade_histogram()[expected], 1000);
    assert_eq!(result.summary.mean_grade(), expected as f64);
    assert_eq!(result.summary.redox_percentage(), 100.0);
}

#[test]
fn saturation_is_reached_one_grade_per_step() {
    let space = StateSpace::generate(6).unwrap();
    let probabilities = TransitionProbabilities::uniform(1.0, 0.0).unwrap();
    let config = config(50, 3, probabilities, 5);
    let result = simulate(&space, &config);
    for step in 0..=3 {
        for &id in result.trajectory.column(step).unwrap() {
            assert_eq!(space.grade_of(id), Some(step));
        }
    }
}

#[test]
fn fixed_seed_reproduces_trajectory() {
    let space = StateSpace::generate(5).unwrap();
    let first = simulate(&space, &config(300, 40, TransitionProbabilities::default(), 2024));
    let second = simulate(&space, &config(300, 40, TransitionProbabilities::default(), 2024));
    assert_eq!(first.trajectory, second.trajectory);
    assert_eq!(first.summary, second.summary);

    let other = simulate(&space, &config(300, 40, TransitionProbabilities::default(), 2025));
    assert_ne!(first.trajectory, other.trajectory);
}

#[test]
fn injected_streams_match_seeded_run() {
    let space = StateSpace::generate(4).unwrap();
    let config = config(120, 25, TransitionProbabilities::default(), 99);
    let seeded = simulate(&space, &config);
    let injected = run_with_streams(
        &space,
        &config,
        streams::from_seed(99, 120),
        &StopSignal::new(),
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(seeded.trajectory, injected.trajectory);
    assert_eq!(injected.seed, None);
}

#[test]
fn every_step_changes_at_most_one_site() {
    let space = StateSpace::generate(5).unwrap();
    let probabilities = TransitionProbabilities::uniform(0.6, 0.6).unwrap();
    let result = simulate(&space, &config(200, 30, probabilities, 8));
    let columns: Vec<_> = result.trajectory.iter_columns().collect();
    for pair in columns.windows(2) {
        for (&before, &after) in pair[0].iter().zip(pair[1]) {
            let a = space.vector(before).unwrap();
            let b = space.vector(after).unwrap();
            assert!(a.hamming_distance(&b) <= 1);
        }
    }
}

#[test]
fn counts_sum_to_population_size() {
    let space = StateSpace::generate(5).unwrap();
    let result = simulate(&space, &config(777, 60, TransitionProbabilities::default(), 1));
    assert_eq!(result.summary.grade_histogram().iter().sum::<usize>(), 777);
    assert_eq!(result.summary.occupancy().values().sum::<usize>(), 777);
    assert!(result.visited.len() >= result.summary.occupied_states());
    assert!(result.visited.contains(&space.all_reduced()));
}

#[test]
fn generated_and_loaded_spaces_simulate_identically() {
    let generated = StateSpace::generate(4).unwrap();

    // Reverse the row order so the loaded space numbers its identifiers differently.
    let mut exported = generated.to_table();
    exported.rows.reverse();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("states.csv");
    table::write_to_path(&exported, &path).unwrap();
    let loaded = table::load_state_space(&path).unwrap();

    for k in 0..=4 {
        assert_eq!(
            generated.states_with_grade(k).len(),
            loaded.states_with_grade(k).len()
        );
    }
    for id in generated.ids() {
        let vector = generated.vector(id).unwrap();
        let other = loaded.find(&vector).unwrap();
        assert_eq!(loaded.label(other), generated.label(id));
    }

    let mut config = config(80, 20, TransitionProbabilities::default(), 17);
    config.initial_state = InitialState::Vector(ModificationVector::reduced(4));
    let a = simulate(&generated, &config);
    let b = simulate(&loaded, &config);
    for (column_a, column_b) in a.trajectory.iter_columns().zip(b.trajectory.iter_columns()) {
        for (&x, &y) in column_a.iter().zip(column_b) {
            assert_eq!(generated.vector(x), loaded.vector(y));
        }
    }
}

#[test]
fn stop_signal_raised_before_run_keeps_initial_column_only() {
    let space = StateSpace::generate(3).unwrap();
    let config = config(20, 10, TransitionProbabilities::default(), 4);
    let stop = StopSignal::new();
    stop.raise();
    let result = run(&space, &config, &stop, &ProgressReporter::new()).unwrap();
    assert!(result.interrupted);
    assert_eq!(result.steps_completed, 0);
    assert_eq!(result.trajectory.columns(), 1);
    let expected = PopulationSummary::from_snapshot(result.trajectory.initial_column(), &space).unwrap();
    assert_eq!(result.summary, expected);
}
