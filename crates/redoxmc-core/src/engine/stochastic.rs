use crate::core::models::ids::ProteoformId;
use crate::core::models::vector::ModificationVector;
use crate::engine::error::EngineError;
use crate::engine::transition::{Direction, TransitionModel};
use crate::engine::utils::sampling::{choose_uniform, draw_event};
use rand::Rng;

/// What happened to one molecule during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    Oxidized { site: usize },
    Reduced { site: usize },
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub state: ProteoformId,
    pub outcome: StepOutcome,
}

/// Advances single molecules by one time step under a [`TransitionModel`].
///
/// Stateless apart from read-only configuration, so one engine is shared by every
/// worker; each molecule brings its own random stream.
#[derive(Debug, Clone, Copy)]
pub struct StochasticEngine<'a> {
    model: TransitionModel<'a>,
    allow_reduction_in_first_step: bool,
}

impl<'a> StochasticEngine<'a> {
    pub fn new(model: TransitionModel<'a>, allow_reduction_in_first_step: bool) -> Self {
        Self {
            model,
            allow_reduction_in_first_step,
        }
    }

    pub fn model(&self) -> &TransitionModel<'a> {
        &self.model
    }

    /// Moves `current` forward by step `step` (1-based).
    ///
    /// Oxidation is attempted first: if `k < R`, draw `u1` and fire when
    /// `u1 < p_ox`. Only if no oxidation happened, and `k > 0`, draw `u2` for
    /// reduction. At most one event occurs. A successful draw with no available
    /// target is a no-event outcome, not an error.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        current: ProteoformId,
        step: usize,
        rng: &mut R,
    ) -> Result<StepResult, EngineError> {
        let space = self.model.space();
        let vector = space.require_vector(current)?;

        if let Some(result) = self.attempt(&vector, Direction::Oxidation, rng)? {
            return Ok(result);
        }

        if self.reduction_enabled(step) {
            if let Some(result) = self.attempt(&vector, Direction::Reduction, rng)? {
                return Ok(result);
            }
        }

        Ok(StepResult {
            state: current,
            outcome: StepOutcome::Unchanged,
        })
    }

    fn reduction_enabled(&self, step: usize) -> bool {
        step > 1 || self.allow_reduction_in_first_step
    }

    fn attempt<R: Rng + ?Sized>(
        &self,
        vector: &ModificationVector,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Option<StepResult>, EngineError> {
        if !self.model.can_step(vector, direction) {
            return Ok(None);
        }
        if !draw_event(self.model.event_probability(vector, direction), rng) {
            return Ok(None);
        }

        let targets = self.model.targets(vector, direction);
        let Some(target) = choose_uniform(&targets, rng) else {
            return Ok(None);
        };

        let state = self.model.space().lookup(target)?;
        let site = (vector.mask() ^ target.mask()).trailing_zeros() as usize;
        let outcome = match direction {
            Direction::Oxidation => StepOutcome::Oxidized { site },
            Direction::Reduction => StepOutcome::Reduced { site },
        };
        Ok(Some(StepResult { state, outcome }))
    }
}
