use crate::cli::SummarizeArgs;
use crate::error::Result;
use crate::utils::report;
use redoxmc::analysis::aggregate::PopulationSummary;
use redoxmc::core::io::table::load_state_space;
use redoxmc::workflows::export::read_occupancy_path;
use tracing::info;

pub fn run(args: SummarizeArgs) -> Result<()> {
    let space = load_state_space(&args.table)?;
    let occupancy = read_occupancy_path(&args.input, &space)?;
    info!(
        rows = occupancy.len(),
        "Occupancy table loaded from {:?}", &args.input
    );

    let summary = PopulationSummary::from_occupancy(occupancy, &space)?;
    print!(
        "{}",
        report::summary_report(&summary, &space, args.catalytic_site, args.top)
    );
    Ok(())
}
