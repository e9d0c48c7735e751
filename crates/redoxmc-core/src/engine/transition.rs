use crate::core::error::ValidationError;
use crate::core::models::vector::ModificationVector;
use crate::core::space::state_space::StateSpace;
use crate::engine::config::TransitionProbabilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Oxidation,
    Reduction,
}

impl Direction {
    /// k-grade reached by one event from `grade`, or `None` at the boundary
    /// (`k = R` blocks oxidation, `k = 0` blocks reduction).
    pub fn target_grade(self, grade: usize, sites: usize) -> Option<usize> {
        match self {
            Direction::Oxidation if grade < sites => Some(grade + 1),
            Direction::Reduction if grade > 0 => Some(grade - 1),
            _ => None,
        }
    }
}

/// Single-site transition rules over a fixed state space.
#[derive(Debug, Clone, Copy)]
pub struct TransitionModel<'a> {
    space: &'a StateSpace,
    catalytic_site: usize,
    probabilities: TransitionProbabilities,
}

impl<'a> TransitionModel<'a> {
    pub fn new(
        space: &'a StateSpace,
        catalytic_site: usize,
        probabilities: TransitionProbabilities,
    ) -> Result<Self, ValidationError> {
        if catalytic_site >= space.sites() {
            return Err(ValidationError::CatalyticSite {
                site: catalytic_site,
                sites: space.sites(),
            });
        }
        probabilities.validate()?;
        Ok(Self {
            space,
            catalytic_site,
            probabilities,
        })
    }

    pub fn space(&self) -> &'a StateSpace {
        self.space
    }

    pub fn catalytic_site(&self) -> usize {
        self.catalytic_site
    }

    pub fn oxidation_probability(&self, current: &ModificationVector) -> f64 {
        if current.is_modified(self.catalytic_site) {
            self.probabilities.oxidation_other
        } else {
            self.probabilities.oxidation_catalytic
        }
    }

    pub fn reduction_probability(&self, current: &ModificationVector) -> f64 {
        if current.is_modified(self.catalytic_site) {
            self.probabilities.reduction_catalytic
        } else {
            self.probabilities.reduction_other
        }
    }

    pub fn event_probability(&self, current: &ModificationVector, direction: Direction) -> f64 {
        match direction {
            Direction::Oxidation => self.oxidation_probability(current),
            Direction::Reduction => self.reduction_probability(current),
        }
    }

    pub fn can_step(&self, current: &ModificationVector, direction: Direction) -> bool {
        direction
            .target_grade(current.grade(), self.space.sites())
            .is_some()
    }

    /// Every vector one event away from `current` in `direction` that the state space
    /// actually enumerates, ordered by the flipped site index.
    ///
    /// The candidate count equals the number of reduced (oxidation) or oxidized
    /// (reduction) sites of `current`, minus any targets missing from the space.
    pub fn targets(
        &self,
        current: &ModificationVector,
        direction: Direction,
    ) -> Vec<ModificationVector> {
        if !self.can_step(current, direction) {
            return Vec::new();
        }
        let flips_oxidized = direction == Direction::Reduction;
        (0..current.sites())
            .filter(|&site| current.is_modified(site) == flips_oxidized)
            .map(|site| current.flipped(site))
            .inspect(|target| {
                debug_assert!(Self::is_valid_transition(current, target, direction));
            })
            .filter(|target| self.space.find(target).is_some())
            .collect()
    }

    /// `true` iff `target` is reachable from `current` by one event in `direction`:
    /// grade changes by exactly one and exactly one site flips the matching way.
    pub fn is_valid_transition(
        current: &ModificationVector,
        target: &ModificationVector,
        direction: Direction,
    ) -> bool {
        if current.sites() != target.sites() || current.hamming_distance(target) != 1 {
            return false;
        }
        match direction {
            Direction::Oxidation => {
                target.grade() == current.grade() + 1 && current.mask() & !target.mask() == 0
            }
            Direction::Reduction => {
                current.grade() == target.grade() + 1 && target.mask() & !current.mask() == 0
            }
        }
    }
}
