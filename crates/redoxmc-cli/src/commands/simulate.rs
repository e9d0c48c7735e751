use crate::cli::SimulateArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use crate::utils::report;
use redoxmc::analysis::temporal;
use redoxmc::engine::progress::ProgressReporter;
use redoxmc::workflows::export::ResultsDirectory;
use redoxmc::workflows::simulate::{self, StopSignal};
use tracing::{info, warn};

pub fn run(args: SimulateArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    info!("Preparing state space: {:?}", settings.state_space);
    let space = settings.state_space.load()?;
    println!(
        "State space: {} sites, {} proteoforms.",
        space.sites(),
        space.len()
    );

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Simulating {} molecules for {} steps...",
        settings.simulation.molecules, settings.simulation.steps
    );
    let result = simulate::run(&space, &settings.simulation, &StopSignal::new(), &reporter)?;

    if result.interrupted {
        warn!(
            "Run stopped after {} of {} steps.",
            result.steps_completed, settings.simulation.steps
        );
    }
    if let Some(seed) = result.seed {
        println!("Seed: {} (pass --seed {} to reproduce)", seed, seed);
    }

    let statistics = temporal::step_statistics(&result.trajectory, &space)?;
    let sink = ResultsDirectory::new(&args.output).with_trajectory(!args.no_trajectory);
    let written = sink.write(&result, &statistics, &space)?;
    for path in &written {
        println!("✓ Wrote {}", path.display());
    }

    print!(
        "\n{}",
        report::summary_report(
            &result.summary,
            &space,
            Some(settings.simulation.catalytic_site),
            args.top,
        )
    );
    println!(
        "Unique proteoforms visited: {} ({:.2}% of space); {} oxidation and {} reduction events.",
        result.unique_states(),
        result.visited_percentage(&space),
        result.oxidations,
        result.reductions
    );
    Ok(())
}
