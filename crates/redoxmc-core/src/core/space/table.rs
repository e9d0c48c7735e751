/// One row of an externally enumerated state table: a label and one 0/1 cell per site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRow {
    pub label: String,
    pub cells: Vec<u8>,
}

/// Raw state table as supplied from storage. Nothing about it is trusted until it
/// passes through [`StateSpace::from_table`](super::state_space::StateSpace::from_table).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateTable {
    pub site_names: Vec<String>,
    pub rows: Vec<StateRow>,
}

impl StateTable {
    pub fn new(site_names: Vec<String>) -> Self {
        Self {
            site_names,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, cells: Vec<u8>) {
        self.rows.push(StateRow {
            label: label.into(),
            cells,
        });
    }

    pub fn sites(&self) -> usize {
        self.site_names.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
