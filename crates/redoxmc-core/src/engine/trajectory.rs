use crate::core::models::ids::ProteoformId;

/// N × (T+1) table of proteoform identifiers, stored column by column.
///
/// Column 0 is the initial state of every molecule; column `t` holds the population
/// after `t` steps. Columns are only ever appended whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    molecules: usize,
    data: Vec<ProteoformId>,
}

impl Trajectory {
    pub(crate) fn new(molecules: usize, initial: ProteoformId, planned_steps: usize) -> Self {
        let mut data = Vec::with_capacity(molecules * (planned_steps + 1));
        data.resize(molecules, initial);
        Self { molecules, data }
    }

    /// Appends one column computed from the previous one. If `fill` fails the new
    /// column is discarded and the trajectory is left as it was.
    pub(crate) fn append_column<F, E>(&mut self, fill: F) -> Result<(), E>
    where
        F: FnOnce(&[ProteoformId], &mut [ProteoformId]) -> Result<(), E>,
    {
        let start = self.data.len();
        let previous_start = start - self.molecules;
        self.data.extend_from_within(previous_start..start);

        let (head, next) = self.data.split_at_mut(start);
        let previous = &head[previous_start..];
        if let Err(e) = fill(previous, next) {
            self.data.truncate(start);
            return Err(e);
        }
        Ok(())
    }

    #[inline]
    pub fn molecules(&self) -> usize {
        self.molecules
    }

    /// Number of recorded columns (`steps() + 1`).
    #[inline]
    pub fn columns(&self) -> usize {
        if self.molecules == 0 {
            return 0;
        }
        self.data.len() / self.molecules
    }

    /// Number of simulated steps recorded after the initial column.
    pub fn steps(&self) -> usize {
        self.columns().saturating_sub(1)
    }

    pub fn column(&self, step: usize) -> Option<&[ProteoformId]> {
        let start = step.checked_mul(self.molecules)?;
        self.data.get(start..start + self.molecules)
    }

    pub fn initial_column(&self) -> &[ProteoformId] {
        &self.data[..self.molecules]
    }

    pub fn last_column(&self) -> &[ProteoformId] {
        &self.data[self.data.len() - self.molecules..]
    }

    pub fn state(&self, molecule: usize, step: usize) -> Option<ProteoformId> {
        if molecule >= self.molecules {
            return None;
        }
        self.column(step).map(|col| col[molecule])
    }

    /// History of one molecule across all recorded columns.
    pub fn row(&self, molecule: usize) -> impl Iterator<Item = ProteoformId> + '_ {
        let molecules = self.molecules;
        let data: &[ProteoformId] = if molecule < molecules { &self.data } else { &[] };
        data.iter().skip(molecule).step_by(molecules.max(1)).copied()
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = &[ProteoformId]> + '_ {
        self.data.chunks_exact(self.molecules.max(1))
    }
}
