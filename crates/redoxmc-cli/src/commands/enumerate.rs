use crate::cli::EnumerateArgs;
use crate::error::Result;
use crate::utils::report;
use redoxmc::core::io::table::{self, StateSpaceSource};
use tracing::info;

pub fn run(args: EnumerateArgs) -> Result<()> {
    let source = StateSpaceSource::Generate {
        sites: args.sites,
        site_names: args.site_names,
    };
    let space = source.load()?;
    info!(sites = space.sites(), states = space.len(), "State space enumerated.");

    print!("{}", report::grade_table(&space));

    if let Some(path) = &args.output {
        table::write_to_path(&space.to_table(), path)?;
        println!("✓ State table written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use redoxmc::core::io::table::load_state_space;

    #[test]
    fn writes_loadable_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.csv");
        run(EnumerateArgs {
            sites: 4,
            site_names: None,
            output: Some(path.clone()),
        })
        .unwrap();
        let space = load_state_space(&path).unwrap();
        assert_eq!(space.len(), 16);
        assert_eq!(space.label(space.all_reduced()), Some("PF001"));
        assert_eq!(space.label(space.all_oxidized()), Some("PF016"));
    }

    #[test]
    fn rejects_site_names_of_wrong_length() {
        let result = run(EnumerateArgs {
            sites: 3,
            site_names: Some(vec!["Cys1".to_string()]),
            output: None,
        });
        assert!(result.is_err());
    }
}
