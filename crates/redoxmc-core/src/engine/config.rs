use crate::core::error::ValidationError;
use crate::core::models::ids::ProteoformId;
use crate::core::models::vector::ModificationVector;
use crate::core::space::state_space::StateSpace;
use serde::{Deserialize, Serialize};

/// Per-step event probabilities. Which oxidation and reduction rate applies depends
/// only on whether the catalytic site is currently modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionProbabilities {
    /// Oxidation probability while the catalytic site is reduced.
    pub oxidation_catalytic: f64,
    /// Oxidation probability while the catalytic site is already oxidized.
    pub oxidation_other: f64,
    /// Reduction probability while the catalytic site is oxidized.
    pub reduction_catalytic: f64,
    /// Reduction probability while the catalytic site is reduced.
    pub reduction_other: f64,
}

impl TransitionProbabilities {
    pub fn new(
        oxidation_catalytic: f64,
        oxidation_other: f64,
        reduction_catalytic: f64,
        reduction_other: f64,
    ) -> Result<Self, ValidationError> {
        let probabilities = Self {
            oxidation_catalytic,
            oxidation_other,
            reduction_catalytic,
            reduction_other,
        };
        probabilities.validate()?;
        Ok(probabilities)
    }

    /// Same oxidation and reduction rate regardless of the catalytic site.
    pub fn uniform(oxidation: f64, reduction: f64) -> Result<Self, ValidationError> {
        Self::new(oxidation, oxidation, reduction, reduction)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_probability("oxidation_catalytic", self.oxidation_catalytic)?;
        check_probability("oxidation_other", self.oxidation_other)?;
        check_probability("reduction_catalytic", self.reduction_catalytic)?;
        check_probability("reduction_other", self.reduction_other)?;
        Ok(())
    }
}

impl Default for TransitionProbabilities {
    /// Rates fitted for PTP1B with Cys215 as the catalytic site.
    fn default() -> Self {
        Self {
            oxidation_catalytic: 0.1254,
            oxidation_other: 0.0312,
            reduction_catalytic: 0.3001,
            reduction_other: 0.1287,
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::Probability { name, value })
    }
}

/// How the starting proteoform of every molecule is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InitialState {
    #[default]
    AllReduced,
    Id(ProteoformId),
    Label(String),
    Vector(ModificationVector),
}

impl InitialState {
    pub fn resolve(&self, space: &StateSpace) -> Result<ProteoformId, ValidationError> {
        match self {
            InitialState::AllReduced => Ok(space.all_reduced()),
            InitialState::Id(id) => {
                if space.contains(*id) {
                    Ok(*id)
                } else {
                    Err(ValidationError::UnknownInitialState {
                        id: *id,
                        len: space.len(),
                    })
                }
            }
            InitialState::Label(label) => space
                .id_of_label(label)
                .ok_or_else(|| ValidationError::UnknownInitialLabel(label.clone())),
            InitialState::Vector(vector) => {
                space
                    .find(vector)
                    .ok_or_else(|| ValidationError::UnknownInitialLabel(vector.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub molecules: usize,
    pub steps: usize,
    pub initial_state: InitialState,
    pub catalytic_site: usize,
    pub probabilities: TransitionProbabilities,
    /// Reduction is suppressed during step 1 unless this is set.
    pub allow_reduction_in_first_step: bool,
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Cross-checks the configuration against a concrete state space and returns the
    /// resolved initial proteoform.
    pub fn check_against(&self, space: &StateSpace) -> Result<ProteoformId, ValidationError> {
        if self.molecules == 0 {
            return Err(ValidationError::NoMolecules);
        }
        self.probabilities.validate()?;
        if self.catalytic_site >= space.sites() {
            return Err(ValidationError::CatalyticSite {
                site: self.catalytic_site,
                sites: space.sites(),
            });
        }
        self.initial_state.resolve(space)
    }
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    molecules: Option<usize>,
    steps: Option<usize>,
    initial_state: Option<InitialState>,
    catalytic_site: Option<usize>,
    probabilities: Option<TransitionProbabilities>,
    allow_reduction_in_first_step: Option<bool>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn molecules(mut self, n: usize) -> Self {
        self.molecules = Some(n);
        self
    }
    pub fn steps(mut self, t: usize) -> Self {
        self.steps = Some(t);
        self
    }
    pub fn initial_state(mut self, state: InitialState) -> Self {
        self.initial_state = Some(state);
        self
    }
    pub fn catalytic_site(mut self, site: usize) -> Self {
        self.catalytic_site = Some(site);
        self
    }
    pub fn probabilities(mut self, probabilities: TransitionProbabilities) -> Self {
        self.probabilities = Some(probabilities);
        self
    }
    pub fn allow_reduction_in_first_step(mut self, allow: bool) -> Self {
        self.allow_reduction_in_first_step = Some(allow);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ValidationError> {
        let molecules = self
            .molecules
            .ok_or(ValidationError::MissingParameter("molecules"))?;
        if molecules == 0 {
            return Err(ValidationError::NoMolecules);
        }
        let probabilities = self
            .probabilities
            .ok_or(ValidationError::MissingParameter("probabilities"))?;
        probabilities.validate()?;

        Ok(SimulationConfig {
            molecules,
            steps: self.steps.ok_or(ValidationError::MissingParameter("steps"))?,
            initial_state: self.initial_state.unwrap_or_default(),
            catalytic_site: self
                .catalytic_site
                .ok_or(ValidationError::MissingParameter("catalytic_site"))?,
            probabilities,
            allow_reduction_in_first_step: self.allow_reduction_in_first_step.unwrap_or(false),
            seed: self.seed,
        })
    }
}
