use crate::analysis::aggregate::PopulationSummary;
use crate::analysis::temporal;
use crate::core::error::{LookupError, ValidationError};
use crate::core::models::ids::ProteoformId;
use crate::core::space::state_space::StateSpace;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::stochastic::{StepOutcome, StochasticEngine};
use crate::engine::streams;
use crate::engine::trajectory::Trajectory;
use crate::engine::transition::TransitionModel;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Cooperative cancellation flag shared between a running simulation and its owner.
///
/// The step loop checks it before starting each step, so a raised signal never
/// leaves a half-written trajectory column behind.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub trajectory: Trajectory,
    /// Every proteoform seen in any column, including the initial one, sorted by id.
    pub visited: Vec<ProteoformId>,
    /// Aggregate of the last completed column.
    pub summary: PopulationSummary,
    pub steps_completed: usize,
    pub interrupted: bool,
    /// Master seed of the per-molecule streams, when the run created them itself.
    pub seed: Option<u64>,
    pub oxidations: u64,
    pub reductions: u64,
}

impl SimulationResult {
    pub fn final_snapshot(&self) -> &[ProteoformId] {
        self.trajectory.last_column()
    }

    pub fn unique_states(&self) -> usize {
        self.visited.len()
    }

    /// Visited proteoforms as a percentage of the `2^R` states of `space`.
    pub fn visited_percentage(&self, space: &StateSpace) -> f64 {
        if space.is_empty() {
            return 0.0;
        }
        self.visited.len() as f64 / space.len() as f64 * 100.0
    }
}

/// Event counts and grade total of one freshly written column.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnTally {
    oxidations: u64,
    reductions: u64,
    grade_total: usize,
}

impl ColumnTally {
    fn merge(self, other: Self) -> Self {
        Self {
            oxidations: self.oxidations + other.oxidations,
            reductions: self.reductions + other.reductions,
            grade_total: self.grade_total + other.grade_total,
        }
    }
}

/// Runs a simulation with per-molecule streams derived from `config.seed`, or from
/// fresh entropy when no seed is configured. The seed actually used is returned in
/// the result so the run can be reproduced.
#[instrument(skip_all, name = "simulation_workflow", fields(molecules = config.molecules, steps = config.steps))]
pub fn run(
    space: &StateSpace,
    config: &SimulationConfig,
    stop: &StopSignal,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    let (seed, molecule_streams) = match config.seed {
        Some(seed) => (seed, streams::from_seed(seed, config.molecules)),
        None => streams::from_entropy(config.molecules),
    };
    info!(seed, "Seeded {} molecule streams.", molecule_streams.len());
    reporter.report(Progress::Message(format!(
        "Seeded {} molecule streams from seed {}.",
        molecule_streams.len(),
        seed
    )));

    let mut result = run_with_streams(space, config, molecule_streams, stop, reporter)?;
    result.seed = Some(seed);
    Ok(result)
}

/// Runs a simulation drawing molecule `i`'s randomness from `molecule_streams[i]`.
///
/// Given the same streams the trajectory is identical regardless of how molecules
/// are scheduled across threads.
pub fn run_with_streams<R: Rng + Send>(
    space: &StateSpace,
    config: &SimulationConfig,
    mut molecule_streams: Vec<R>,
    stop: &StopSignal,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let initial = config.check_against(space)?;
    if molecule_streams.len() != config.molecules {
        return Err(ValidationError::StreamCount {
            expected: config.molecules,
            found: molecule_streams.len(),
        }
        .into());
    }
    let model = TransitionModel::new(space, config.catalytic_site, config.probabilities)?;
    let engine = StochasticEngine::new(model, config.allow_reduction_in_first_step);
    let mut trajectory = Trajectory::new(config.molecules, initial, config.steps);
    info!(
        sites = space.sites(),
        states = space.len(),
        initial = %initial,
        "Population initialized."
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::TaskStart {
        total_steps: config.steps as u64,
    });
    let mut steps_completed = 0;
    let mut interrupted = false;
    let mut oxidations = 0u64;
    let mut reductions = 0u64;

    for step in 1..=config.steps {
        if stop.is_raised() {
            warn!(step, "Stop requested; ending the run before this step.");
            interrupted = true;
            break;
        }

        let mut tally = ColumnTally::default();
        trajectory.append_column(|previous, next| {
            tally = advance_column(&engine, step, previous, next, &mut molecule_streams)?;
            Ok::<(), EngineError>(())
        })?;

        oxidations += tally.oxidations;
        reductions += tally.reductions;
        steps_completed = step;

        let mean_grade = tally.grade_total as f64 / config.molecules as f64;
        debug!(
            step,
            mean_k = mean_grade,
            oxidized = tally.oxidations,
            reduced = tally.reductions,
            "Step complete."
        );
        reporter.report(Progress::StepCompleted { step, mean_grade });
    }
    reporter.report(Progress::TaskFinish);

    reporter.report(Progress::PhaseStart { name: "Aggregation" });
    let summary = PopulationSummary::from_snapshot(trajectory.last_column(), space)?;
    let visited = temporal::visited_states(&trajectory);
    reporter.report(Progress::PhaseFinish);

    info!(
        steps_completed,
        interrupted,
        mean_k = summary.mean_grade(),
        unique_states = visited.len(),
        "Simulation finished."
    );

    Ok(SimulationResult {
        trajectory,
        visited,
        summary,
        steps_completed,
        interrupted,
        seed: None,
        oxidations,
        reductions,
    })
}

fn tally_molecule(
    engine: &StochasticEngine<'_>,
    step: usize,
    current: ProteoformId,
    slot: &mut ProteoformId,
    rng: &mut impl Rng,
) -> Result<ColumnTally, EngineError> {
    let result = engine.advance(current, step, rng)?;
    *slot = result.state;
    let grade = engine
        .model()
        .space()
        .grade_of(result.state)
        .ok_or(LookupError::UnknownState { id: result.state })?;
    let (oxidations, reductions) = match result.outcome {
        StepOutcome::Oxidized { .. } => (1, 0),
        StepOutcome::Reduced { .. } => (0, 1),
        StepOutcome::Unchanged => (0, 0),
    };
    Ok(ColumnTally {
        oxidations,
        reductions,
        grade_total: grade,
    })
}

#[cfg(feature = "parallel")]
fn advance_column<R: Rng + Send>(
    engine: &StochasticEngine<'_>,
    step: usize,
    previous: &[ProteoformId],
    next: &mut [ProteoformId],
    molecule_streams: &mut [R],
) -> Result<ColumnTally, EngineError> {
    next.par_iter_mut()
        .zip(previous.par_iter())
        .zip(molecule_streams.par_iter_mut())
        .map(|((slot, &current), rng)| tally_molecule(engine, step, current, slot, rng))
        .try_reduce(ColumnTally::default, |a, b| Ok(a.merge(b)))
}

#[cfg(not(feature = "parallel"))]
fn advance_column<R: Rng + Send>(
    engine: &StochasticEngine<'_>,
    step: usize,
    previous: &[ProteoformId],
    next: &mut [ProteoformId],
    molecule_streams: &mut [R],
) -> Result<ColumnTally, EngineError> {
    next.iter_mut()
        .zip(previous.iter())
        .zip(molecule_streams.iter_mut())
        .try_fold(ColumnTally::default(), |acc, ((slot, &current), rng)| {
            Ok(acc.merge(tally_molecule(engine, step, current, slot, rng)?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{InitialState, SimulationConfigBuilder, TransitionProbabilities};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::sync::Mutex;

    fn config(
        molecules: usize,
        steps: usize,
        probabilities: TransitionProbabilities,
    ) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .molecules(molecules)
            .steps(steps)
            .catalytic_site(0)
            .probabilities(probabilities)
            .seed(Some(42))
            .build()
            .unwrap()
    }

    #[test]
    fn trajectory_has_one_column_per_step_plus_initial() {
        let space = StateSpace::generate(4).unwrap();
        let config = config(25, 12, TransitionProbabilities::default());
        let result = run(&space, &config, &StopSignal::new(), &ProgressReporter::new()).unwrap();
        assert_eq!(result.trajectory.columns(), 13);
        assert_eq!(result.trajectory.molecules(), 25);
        assert_eq!(result.steps_completed, 12);
        assert!(!result.interrupted);
        assert_eq!(result.seed, Some(42));
        assert!(result
            .trajectory
            .initial_column()
            .iter()
            .all(|&id| id == space.all_reduced()));
    }

    #[test]
    fn zero_steps_aggregates_initial_population() {
        let space = StateSpace::generate(3).unwrap();
        let config = config(10, 0, TransitionProbabilities::default());
        let result = run(&space, &config, &StopSignal::new(), &ProgressReporter::new()).unwrap();
        assert_eq!(result.trajectory.columns(), 1);
        assert_eq!(result.summary.grade_histogram(), &[10, 0, 0, 0]);
        assert_eq!(result.visited, vec![space.all_reduced()]);
    }

    #[test]
    fn event_counts_match_grade_change() {
        let space = StateSpace::generate(5).unwrap();
        let config = config(200, 30, TransitionProbabilities::default());
        let result = run(&space, &config, &StopSignal::new(), &ProgressReporter::new()).unwrap();
        let final_total: usize = result
            .final_snapshot()
            .iter()
            .map(|&id| space.grade_of(id).unwrap())
            .sum();
        assert_eq!(
            final_total as i64,
            result.oxidations as i64 - result.reductions as i64
        );
    }

    #[test]
    fn raised_stop_signal_ends_run_between_steps() {
        let space = StateSpace::generate(3).unwrap();
        let config = config(10, 50, TransitionProbabilities::default());
        let stop = StopSignal::new();
        let stopper = stop.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::StepCompleted { step: 5, .. } = event {
                stopper.raise();
            }
        }));
        let result = run(&space, &config, &stop, &reporter).unwrap();
        assert!(result.interrupted);
        assert_eq!(result.steps_completed, 5);
        assert_eq!(result.trajectory.columns(), 6);
        assert_eq!(result.summary.molecules(), 10);
    }

    #[test]
    fn mismatched_stream_count_is_rejected() {
        let space = StateSpace::generate(3).unwrap();
        let config = config(4, 2, TransitionProbabilities::default());
        let rngs: Vec<Xoshiro256PlusPlus> =
            (0..3).map(Xoshiro256PlusPlus::seed_from_u64).collect();
        let result = run_with_streams(
            &space,
            &config,
            rngs,
            &StopSignal::new(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::StreamCount {
                expected: 4,
                found: 3
            }))
        ));
    }

    #[test]
    fn invalid_initial_state_fails_before_running() {
        let space = StateSpace::generate(3).unwrap();
        let mut config = config(4, 2, TransitionProbabilities::default());
        config.initial_state = InitialState::Label("PF999".to_string());
        let result = run(&space, &config, &StopSignal::new(), &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::UnknownInitialLabel(_)))
        ));
    }

    #[test]
    fn progress_reports_every_step_in_order() {
        let space = StateSpace::generate(3).unwrap();
        let config = config(8, 6, TransitionProbabilities::default());
        let steps = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::StepCompleted { step, .. } = event {
                steps.lock().unwrap().push(step);
            }
        }));
        run(&space, &config, &StopSignal::new(), &reporter).unwrap();
        drop(reporter);
        assert_eq!(steps.into_inner().unwrap(), (1..=6).collect::<Vec<_>>());
    }

    #[test]
    fn run_announces_its_seed_through_the_reporter() {
        let space = StateSpace::generate(3).unwrap();
        let config = config(4, 2, TransitionProbabilities::default());
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(msg) = event {
                messages.lock().unwrap().push(msg);
            }
        }));
        let result = run(&space, &config, &StopSignal::new(), &reporter).unwrap();
        drop(reporter);
        let seed = result.seed.unwrap();
        let messages = messages.into_inner().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains(&format!("seed {}", seed)));
        assert!(messages[0].contains("4 molecule streams"));
    }
}
