use super::table::StateTable;
use crate::core::error::{LookupError, ValidationError};
use crate::core::models::ids::ProteoformId;
use crate::core::models::vector::{MAX_SITES, ModificationVector};
use crate::core::utils::combinatorics::vectors_of_grade;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, instrument};

/// The complete, immutable enumeration of proteoforms for one site count.
#[derive(Debug, Clone)]
pub struct StateSpace {
    sites: usize,
    site_names: Vec<String>,
    labels: Vec<String>,
    vectors: Vec<ModificationVector>,
    by_mask: Vec<Option<ProteoformId>>,
    by_label: HashMap<String, ProteoformId>,
    grades: Vec<Vec<ProteoformId>>,
}

impl StateSpace {
    /// Enumerates all `2^sites` vectors in increasing k-grade order, ties broken by
    /// combination order, and labels them `PF001`, `PF002`, ...
    #[instrument(level = "debug")]
    pub fn generate(sites: usize) -> Result<Self, ValidationError> {
        validate_site_count(sites)?;

        let mut table = StateTable::new((1..=sites).map(|i| format!("site{}", i)).collect());
        let mut index = 0usize;
        for grade in 0..=sites {
            for vector in vectors_of_grade(sites, grade) {
                index += 1;
                table.push(generated_label(index), vector.to_bits());
            }
        }
        Self::from_table(table)
    }

    /// Like [`generate`](Self::generate) but with caller-provided site names
    /// (e.g. `Cys32`, `Cys49`, ...). The site count is the number of names.
    pub fn generate_named(site_names: Vec<String>) -> Result<Self, ValidationError> {
        let mut space = Self::generate(site_names.len())?;
        space.site_names = site_names;
        Ok(space)
    }

    /// Builds the space from an externally enumerated table, keeping its row order as
    /// identifier order. The table must hold exactly `2^R` distinct binary vectors of
    /// width `R`; any violation rejects the whole table.
    #[instrument(level = "debug", skip_all, fields(sites = table.sites(), rows = table.len()))]
    pub fn from_table(table: StateTable) -> Result<Self, ValidationError> {
        let sites = table.sites();
        validate_site_count(sites)?;

        let expected = 1usize << sites;
        if table.len() != expected {
            return Err(ValidationError::StateCount {
                sites,
                expected,
                found: table.len(),
            });
        }

        let mut labels: Vec<String> = Vec::with_capacity(expected);
        let mut vectors = Vec::with_capacity(expected);
        let mut by_mask: Vec<Option<ProteoformId>> = vec![None; expected];
        let mut by_label = HashMap::with_capacity(expected);
        let mut grades: Vec<Vec<ProteoformId>> = vec![Vec::new(); sites + 1];

        for (index, row) in table.rows.into_iter().enumerate() {
            let vector = parse_row(&row.label, &row.cells, sites)?;
            let id = ProteoformId::new(index as u32);

            let slot = &mut by_mask[vector.mask() as usize];
            if let Some(first) = slot {
                return Err(ValidationError::DuplicateVector {
                    label: row.label,
                    first: labels[first.index()].clone(),
                });
            }
            *slot = Some(id);

            match by_label.entry(row.label.clone()) {
                Entry::Occupied(_) => return Err(ValidationError::DuplicateLabel(row.label)),
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }

            grades[vector.grade()].push(id);
            vectors.push(vector);
            labels.push(row.label);
        }

        debug!(
            sites,
            states = vectors.len(),
            "State space constructed and validated."
        );

        Ok(Self {
            sites,
            site_names: table.site_names,
            labels,
            vectors,
            by_mask,
            by_label,
            grades,
        })
    }

    /// Exports the space in supplier-table form, preserving identifier order and labels.
    pub fn to_table(&self) -> StateTable {
        let mut table = StateTable::new(self.site_names.clone());
        for (label, vector) in self.labels.iter().zip(&self.vectors) {
            table.push(label.clone(), vector.to_bits());
        }
        table
    }

    #[inline]
    pub fn sites(&self) -> usize {
        self.sites
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn site_names(&self) -> &[String] {
        &self.site_names
    }

    pub fn ids(&self) -> impl Iterator<Item = ProteoformId> + '_ {
        (0..self.vectors.len()).map(|i| ProteoformId::new(i as u32))
    }

    pub fn contains(&self, id: ProteoformId) -> bool {
        id.index() < self.vectors.len()
    }

    #[inline]
    pub fn vector(&self, id: ProteoformId) -> Option<ModificationVector> {
        self.vectors.get(id.index()).copied()
    }

    pub fn label(&self, id: ProteoformId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    pub fn grade_of(&self, id: ProteoformId) -> Option<usize> {
        self.vector(id).map(|v| v.grade())
    }

    pub fn id_of_label(&self, label: &str) -> Option<ProteoformId> {
        self.by_label.get(label).copied()
    }

    /// Reverse lookup; `None` when the vector is not indexed.
    #[inline]
    pub fn find(&self, vector: &ModificationVector) -> Option<ProteoformId> {
        if vector.sites() != self.sites {
            return None;
        }
        self.by_mask.get(vector.mask() as usize).copied().flatten()
    }

    /// Reverse lookup that treats a missing vector as a defect.
    pub fn lookup(&self, vector: &ModificationVector) -> Result<ProteoformId, LookupError> {
        self.find(vector)
            .ok_or(LookupError::VectorNotIndexed { vector: *vector })
    }

    pub fn require_vector(&self, id: ProteoformId) -> Result<ModificationVector, LookupError> {
        self.vector(id).ok_or(LookupError::UnknownState { id })
    }

    /// States of k-grade `grade` in identifier order; empty when `grade > R`.
    pub fn states_with_grade(&self, grade: usize) -> &[ProteoformId] {
        self.grades.get(grade).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of states per k-grade, i.e. row `R` of Pascal's triangle.
    pub fn grade_sizes(&self) -> Vec<usize> {
        self.grades.iter().map(Vec::len).collect()
    }

    /// Identifier of the all-reduced (k = 0) proteoform.
    pub fn all_reduced(&self) -> ProteoformId {
        self.grades[0][0]
    }

    /// Identifier of the fully oxidized (k = R) proteoform.
    pub fn all_oxidized(&self) -> ProteoformId {
        self.grades[self.sites][0]
    }
}

fn validate_site_count(sites: usize) -> Result<(), ValidationError> {
    if sites == 0 || sites > MAX_SITES {
        return Err(ValidationError::SiteCount(sites));
    }
    Ok(())
}

fn parse_row(label: &str, cells: &[u8], sites: usize) -> Result<ModificationVector, ValidationError> {
    if cells.len() != sites {
        return Err(ValidationError::RowWidth {
            label: label.to_string(),
            expected: sites,
            found: cells.len(),
        });
    }
    let mut mask = 0u64;
    for (site, &value) in cells.iter().enumerate() {
        match value {
            0 => {}
            1 => mask |= 1 << site,
            other => {
                return Err(ValidationError::NonBinaryCell {
                    label: label.to_string(),
                    site,
                    value: other,
                });
            }
        }
    }
    Ok(ModificationVector::from_mask(mask, sites))
}

fn generated_label(index: usize) -> String {
    format!("PF{:03}", index)
}
