use redoxmc::analysis::aggregate::PopulationSummary;
use redoxmc::core::space::state_space::StateSpace;
use std::fmt::Write;

/// Pascal-row table of the space: grade, percent of sites oxidized, number of states.
pub fn grade_table(space: &StateSpace) -> String {
    let sites = space.sites();
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:>10}  {:>10}", "k", "% oxidized", "i-states");
    for (k, count) in space.grade_sizes().into_iter().enumerate() {
        let percent = k as f64 / sites as f64 * 100.0;
        let _ = writeln!(out, "{:>4}  {:>10.1}  {:>10}", k, percent, count);
    }
    let _ = writeln!(out, "{:>4}  {:>10}  {:>10}", "", "total", space.len());
    out
}

pub fn summary_report(
    summary: &PopulationSummary,
    space: &StateSpace,
    catalytic_site: Option<usize>,
    top: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Molecules:            {}", summary.molecules());
    let _ = writeln!(
        out,
        "Mean k-grade:         {:.4} ({:.2}% oxidized)",
        summary.mean_grade(),
        summary.redox_percentage()
    );
    let _ = writeln!(
        out,
        "Occupied proteoforms: {} of {} ({:.2}%)",
        summary.occupied_states(),
        space.len(),
        summary.occupied_percentage()
    );
    if let Some(site) = catalytic_site {
        if let (Some(percent), Some(name)) = (
            summary.site_oxidation_percentage(site),
            space.site_names().get(site),
        ) {
            let _ = writeln!(out, "Catalytic {} oxidized: {:.2}%", name, percent);
        }
    }

    let _ = writeln!(out, "\nk-grade distribution:");
    for (k, count) in summary.grade_histogram().iter().enumerate() {
        let _ = writeln!(out, "  k={:<3} {:>10}", k, count);
    }

    let _ = writeln!(out, "\nPer-site oxidation:");
    for (name, percent) in space
        .site_names()
        .iter()
        .zip(summary.site_oxidation_percentages())
    {
        let _ = writeln!(out, "  {:<10} {:>7.2}%", name, percent);
    }

    if top > 0 {
        let _ = writeln!(out, "\nMost occupied proteoforms:");
        for (id, count) in summary.top_states(top) {
            let label = space.label(id).unwrap_or("?");
            let vector = space
                .vector(id)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<8} {} {:>10} ({:.2}%)",
                label,
                vector,
                count,
                summary.percentage_of(id)
            );
        }
    }
    out
}
