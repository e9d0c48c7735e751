use crate::cli::SimulateArgs;
use crate::error::{CliError, Result};
use redoxmc::core::io::table::StateSpaceSource;
use redoxmc::core::models::vector::ModificationVector;
use redoxmc::engine::config::{
    InitialState, SimulationConfig, SimulationConfigBuilder, TransitionProbabilities,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const DEFAULT_MOLECULES: usize = 70_000;
const DEFAULT_STEPS: usize = 300;
const DEFAULT_CATALYTIC_SITE: usize = 3;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSimulationSection {
    molecules: Option<usize>,
    steps: Option<usize>,
    seed: Option<u64>,
    initial_state: Option<String>,
    catalytic_site: Option<usize>,
    allow_reduction_in_first_step: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialProbabilities {
    oxidation_catalytic: Option<f64>,
    oxidation_other: Option<f64>,
    reduction_catalytic: Option<f64>,
    reduction_other: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialStateSpace {
    sites: Option<usize>,
    site_names: Option<Vec<String>>,
    table: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    simulation: Option<PartialSimulationSection>,
    probabilities: Option<PartialProbabilities>,
    #[serde(rename = "state-space")]
    state_space: Option<PartialStateSpace>,
}

/// Fully merged settings for one `simulate` invocation.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub simulation: SimulationConfig,
    pub state_space: StateSpaceSource,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        // Table paths in the file are relative to the file itself.
        if let (Some(dir), Some(space)) = (path.parent(), config.state_space.as_mut()) {
            if let Some(table) = space.table.as_mut() {
                if table.is_relative() {
                    *table = dir.join(&*table);
                }
            }
        }
        Ok(config)
    }

    pub fn merge_with_cli(mut self, args: &SimulateArgs) -> Result<RunSettings> {
        self.apply_set_values(&args.set_values)?;

        let sim = self.simulation.take().unwrap_or_default();
        let probs = self.probabilities.take().unwrap_or_default();
        let space = self.state_space.take().unwrap_or_default();

        let state_space = Self::merge_state_space(args.table.clone(), space)?;

        let defaults = TransitionProbabilities::default();
        let probabilities = TransitionProbabilities::new(
            probs
                .oxidation_catalytic
                .unwrap_or(defaults.oxidation_catalytic),
            probs.oxidation_other.unwrap_or(defaults.oxidation_other),
            probs
                .reduction_catalytic
                .unwrap_or(defaults.reduction_catalytic),
            probs.reduction_other.unwrap_or(defaults.reduction_other),
        )
        .map_err(|e| CliError::Config(e.to_string()))?;

        let initial_state = args
            .initial_state
            .as_deref()
            .or(sim.initial_state.as_deref())
            .map(parse_initial_state)
            .transpose()?
            .unwrap_or_default();

        SimulationConfigBuilder::new()
            .molecules(args.molecules.or(sim.molecules).unwrap_or(DEFAULT_MOLECULES))
            .steps(args.steps.or(sim.steps).unwrap_or(DEFAULT_STEPS))
            .catalytic_site(
                args.catalytic_site
                    .or(sim.catalytic_site)
                    .unwrap_or(DEFAULT_CATALYTIC_SITE),
            )
            .probabilities(probabilities)
            .initial_state(initial_state)
            .allow_reduction_in_first_step(
                args.allow_first_step_reduction
                    || sim.allow_reduction_in_first_step.unwrap_or(false),
            )
            .seed(args.seed.or(sim.seed))
            .build()
            .map(|simulation| RunSettings {
                simulation,
                state_space,
            })
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_state_space(
        cli_table: Option<PathBuf>,
        partial: PartialStateSpace,
    ) -> Result<StateSpaceSource> {
        if let Some(table) = cli_table.or(partial.table) {
            return Ok(StateSpaceSource::Table(table));
        }
        let sites = partial
            .sites
            .or(partial.site_names.as_ref().map(Vec::len))
            .ok_or_else(|| {
                CliError::Config(
                    "Either `state-space.sites` or a state table (`state-space.table` / --table) is required."
                        .to_string(),
                )
            })?;
        Ok(StateSpaceSource::Generate {
            sites,
            site_names: partial.site_names,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "simulation.molecules" => {
                    self.simulation.get_or_insert_with(Default::default).molecules =
                        Some(parse_value(key, value_str)?);
                }
                "simulation.steps" => {
                    self.simulation.get_or_insert_with(Default::default).steps =
                        Some(parse_value(key, value_str)?);
                }
                "simulation.seed" => {
                    self.simulation.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str)?);
                }
                "simulation.initial-state" => {
                    self.simulation.get_or_insert_with(Default::default).initial_state =
                        Some(value_str.to_string());
                }
                "simulation.catalytic-site" => {
                    self.simulation.get_or_insert_with(Default::default).catalytic_site =
                        Some(parse_value(key, value_str)?);
                }
                "simulation.allow-reduction-in-first-step" => {
                    self.simulation
                        .get_or_insert_with(Default::default)
                        .allow_reduction_in_first_step = Some(parse_value(key, value_str)?);
                }
                "probabilities.oxidation-catalytic" => {
                    self.probabilities.get_or_insert_with(Default::default).oxidation_catalytic =
                        Some(parse_value(key, value_str)?);
                }
                "probabilities.oxidation-other" => {
                    self.probabilities.get_or_insert_with(Default::default).oxidation_other =
                        Some(parse_value(key, value_str)?);
                }
                "probabilities.reduction-catalytic" => {
                    self.probabilities.get_or_insert_with(Default::default).reduction_catalytic =
                        Some(parse_value(key, value_str)?);
                }
                "probabilities.reduction-other" => {
                    self.probabilities.get_or_insert_with(Default::default).reduction_other =
                        Some(parse_value(key, value_str)?);
                }
                "state-space.sites" => {
                    self.state_space.get_or_insert_with(Default::default).sites =
                        Some(parse_value(key, value_str)?);
                }
                "state-space.table" => {
                    self.state_space.get_or_insert_with(Default::default).table =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}

/// A string made only of `0`/`1` is read as a modification vector, anything else as
/// a proteoform label.
fn parse_initial_state(raw: &str) -> Result<InitialState> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.chars().all(|c| c == '0' || c == '1') {
        let bits: Vec<bool> = raw.chars().map(|c| c == '1').collect();
        let vector = ModificationVector::try_from_bools(&bits)
            .map_err(|e| CliError::Config(format!("Invalid initial state '{}': {}", raw, e)))?;
        Ok(InitialState::Vector(vector))
    } else {
        Ok(InitialState::Label(raw.to_string()))
    }
}
