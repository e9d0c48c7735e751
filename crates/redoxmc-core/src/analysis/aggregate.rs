use crate::core::error::{LookupError, ValidationError};
use crate::core::models::ids::ProteoformId;
use crate::core::space::state_space::StateSpace;
use crate::engine::error::EngineError;
use std::collections::BTreeMap;

/// Population-level reduction of one snapshot (N proteoform identifiers).
///
/// Everything here is a pure function of the snapshot; no randomness is involved.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSummary {
    molecules: usize,
    sites: usize,
    space_size: usize,
    grade_histogram: Vec<usize>,
    occupancy: BTreeMap<ProteoformId, usize>,
    site_oxidized: Vec<usize>,
    mean_grade: f64,
}

impl PopulationSummary {
    pub fn from_snapshot(
        snapshot: &[ProteoformId],
        space: &StateSpace,
    ) -> Result<Self, EngineError> {
        let mut occupancy: BTreeMap<ProteoformId, usize> = BTreeMap::new();
        for &id in snapshot {
            *occupancy.entry(id).or_default() += 1;
        }
        Self::from_occupancy(occupancy, space)
    }

    /// Builds the summary from already-counted occupancy, e.g. a final distribution
    /// read back from storage. Zero counts are dropped.
    pub fn from_occupancy<I>(occupancy: I, space: &StateSpace) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (ProteoformId, usize)>,
    {
        let sites = space.sites();
        let mut grade_histogram = vec![0usize; sites + 1];
        let mut site_oxidized = vec![0usize; sites];
        let mut counts: BTreeMap<ProteoformId, usize> = BTreeMap::new();
        let mut molecules = 0usize;
        let mut grade_total = 0usize;

        for (id, count) in occupancy {
            if count == 0 {
                continue;
            }
            let vector = space
                .vector(id)
                .ok_or(LookupError::UnknownState { id })?;
            let grade = vector.grade();
            grade_histogram[grade] += count;
            for site in vector.modified_sites() {
                site_oxidized[site] += count;
            }
            *counts.entry(id).or_default() += count;
            molecules += count;
            grade_total += grade * count;
        }

        if molecules == 0 {
            return Err(ValidationError::NoMolecules.into());
        }

        Ok(Self {
            molecules,
            sites,
            space_size: space.len(),
            grade_histogram,
            occupancy: counts,
            site_oxidized,
            mean_grade: grade_total as f64 / molecules as f64,
        })
    }

    pub fn molecules(&self) -> usize {
        self.molecules
    }

    /// Molecule count per k-grade, indexed `0..=R`.
    pub fn grade_histogram(&self) -> &[usize] {
        &self.grade_histogram
    }

    /// Molecule count for every occupied proteoform, ordered by identifier.
    pub fn occupancy(&self) -> &BTreeMap<ProteoformId, usize> {
        &self.occupancy
    }

    pub fn count_of(&self, id: ProteoformId) -> usize {
        self.occupancy.get(&id).copied().unwrap_or(0)
    }

    pub fn percentage_of(&self, id: ProteoformId) -> f64 {
        percentage(self.count_of(id), self.molecules)
    }

    /// Population-mean k-grade, Σ(k · count_k) / N.
    pub fn mean_grade(&self) -> f64 {
        self.mean_grade
    }

    /// Mean k-grade as a percentage of the site count.
    pub fn redox_percentage(&self) -> f64 {
        self.mean_grade / self.sites as f64 * 100.0
    }

    pub fn occupied_states(&self) -> usize {
        self.occupancy.len()
    }

    /// Occupied proteoforms as a percentage of the full `2^R` space.
    pub fn occupied_percentage(&self) -> f64 {
        percentage(self.occupancy.len(), self.space_size)
    }

    /// Percentage of molecules with each site oxidized, in site order.
    pub fn site_oxidation_percentages(&self) -> Vec<f64> {
        self.site_oxidized
            .iter()
            .map(|&count| percentage(count, self.molecules))
            .collect()
    }

    /// Percentage of molecules with `site` oxidized; for the catalytic site this is
    /// the activated fraction of the population.
    pub fn site_oxidation_percentage(&self, site: usize) -> Option<f64> {
        self.site_oxidized
            .get(site)
            .map(|&count| percentage(count, self.molecules))
    }

    /// The `n` most occupied proteoforms, most frequent first, ties by identifier.
    pub fn top_states(&self, n: usize) -> Vec<(ProteoformId, usize)> {
        let mut ranked: Vec<(ProteoformId, usize)> =
            self.occupancy.iter().map(|(&id, &count)| (id, count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::vector::ModificationVector;

    fn id_of(space: &StateSpace, bits: &[bool]) -> ProteoformId {
        space.lookup(&ModificationVector::from_bools(bits)).unwrap()
    }

    fn sample_snapshot(space: &StateSpace) -> Vec<ProteoformId> {
        let reduced = id_of(space, &[false, false, false]);
        let a = id_of(space, &[true, false, false]);
        let ab = id_of(space, &[true, true, false]);
        let full = id_of(space, &[true, true, true]);
        vec![reduced, reduced, a, a, a, ab, full, full]
    }

    #[test]
    fn histogram_and_occupancy_sum_to_population() {
        let space = StateSpace::generate(3).unwrap();
        let summary = PopulationSummary::from_snapshot(&sample_snapshot(&space), &space).unwrap();
        assert_eq!(summary.molecules(), 8);
        assert_eq!(summary.grade_histogram(), &[2, 3, 1, 2]);
        assert_eq!(summary.grade_histogram().iter().sum::<usize>(), 8);
        assert_eq!(summary.occupancy().values().sum::<usize>(), 8);
        assert_eq!(summary.occupied_states(), 4);
    }

    #[test]
    fn mean_grade_is_weighted_by_counts() {
        let space = StateSpace::generate(3).unwrap();
        let summary = PopulationSummary::from_snapshot(&sample_snapshot(&space), &space).unwrap();
        // (0*2 + 1*3 + 2*1 + 3*2) / 8
        assert!((summary.mean_grade() - 11.0 / 8.0).abs() < 1e-12);
        assert!((summary.redox_percentage() - 11.0 / 8.0 / 3.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn site_percentages_count_modified_molecules() {
        let space = StateSpace::generate(3).unwrap();
        let summary = PopulationSummary::from_snapshot(&sample_snapshot(&space), &space).unwrap();
        let per_site = summary.site_oxidation_percentages();
        assert_eq!(per_site, vec![75.0, 37.5, 25.0]);
        assert_eq!(summary.site_oxidation_percentage(2), Some(25.0));
        assert_eq!(summary.site_oxidation_percentage(3), None);
    }

    #[test]
    fn top_states_rank_by_count_then_identifier() {
        let space = StateSpace::generate(3).unwrap();
        let snapshot = sample_snapshot(&space);
        let summary = PopulationSummary::from_snapshot(&snapshot, &space).unwrap();
        let top = summary.top_states(3);
        assert_eq!(top[0], (id_of(&space, &[true, false, false]), 3));
        let reduced = id_of(&space, &[false, false, false]);
        let full = id_of(&space, &[true, true, true]);
        assert_eq!(top[1], (reduced.min(full), 2));
        assert_eq!(top[2], (reduced.max(full), 2));
        assert_eq!(summary.top_states(10).len(), 4);
    }

    #[test]
    fn occupancy_percentages_are_relative_to_space_and_population() {
        let space = StateSpace::generate(3).unwrap();
        let summary = PopulationSummary::from_snapshot(&sample_snapshot(&space), &space).unwrap();
        assert_eq!(summary.occupied_percentage(), 50.0);
        assert_eq!(
            summary.percentage_of(id_of(&space, &[true, true, false])),
            12.5
        );
        assert_eq!(summary.count_of(id_of(&space, &[false, true, false])), 0);
    }

    #[test]
    fn from_occupancy_matches_from_snapshot() {
        let space = StateSpace::generate(3).unwrap();
        let snapshot = sample_snapshot(&space);
        let direct = PopulationSummary::from_snapshot(&snapshot, &space).unwrap();
        let counted = PopulationSummary::from_occupancy(
            direct.occupancy().iter().map(|(&id, &c)| (id, c)),
            &space,
        )
        .unwrap();
        assert_eq!(direct, counted);
    }

    #[test]
    fn unknown_state_in_snapshot_is_a_lookup_error() {
        let space = StateSpace::generate(2).unwrap();
        let bogus = ProteoformId::new(17);
        assert_eq!(
            PopulationSummary::from_snapshot(&[bogus], &space),
            Err(EngineError::Lookup(LookupError::UnknownState { id: bogus }))
        );
    }

    #[test]
    fn empty_snapshot_is_rejected() {
        let space = StateSpace::generate(2).unwrap();
        assert_eq!(
            PopulationSummary::from_snapshot(&[], &space),
            Err(EngineError::Validation(ValidationError::NoMolecules))
        );
    }
}
