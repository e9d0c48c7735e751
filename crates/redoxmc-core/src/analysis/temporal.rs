use crate::core::error::LookupError;
use crate::core::models::ids::ProteoformId;
use crate::core::space::state_space::StateSpace;
use crate::engine::error::EngineError;
use crate::engine::trajectory::Trajectory;
use std::collections::HashSet;

/// Population statistics of a single trajectory column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStatistics {
    pub step: usize,
    pub mean_grade: f64,
    pub redox_percentage: f64,
    pub distinct_states: usize,
}

pub fn column_statistics(
    step: usize,
    column: &[ProteoformId],
    space: &StateSpace,
) -> Result<StepStatistics, EngineError> {
    let mut grade_total = 0usize;
    let mut distinct = HashSet::with_capacity(column.len().min(space.len()));
    for &id in column {
        let grade = space.grade_of(id).ok_or(LookupError::UnknownState { id })?;
        grade_total += grade;
        distinct.insert(id);
    }

    let mean_grade = if column.is_empty() {
        0.0
    } else {
        grade_total as f64 / column.len() as f64
    };
    let redox_percentage = if space.sites() == 0 {
        0.0
    } else {
        mean_grade / space.sites() as f64 * 100.0
    };

    Ok(StepStatistics {
        step,
        mean_grade,
        redox_percentage,
        distinct_states: distinct.len(),
    })
}

/// Per-step evolution of the population, one entry per recorded column (step 0 first).
pub fn step_statistics(
    trajectory: &Trajectory,
    space: &StateSpace,
) -> Result<Vec<StepStatistics>, EngineError> {
    trajectory
        .iter_columns()
        .enumerate()
        .map(|(step, column)| column_statistics(step, column, space))
        .collect()
}

/// Every proteoform that appears anywhere in the trajectory, initial column included,
/// in ascending identifier order.
pub fn visited_states(trajectory: &Trajectory) -> Vec<ProteoformId> {
    let mut seen: Vec<ProteoformId> = trajectory
        .iter_columns()
        .flatten()
        .copied()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    seen.sort_unstable();
    seen
}
