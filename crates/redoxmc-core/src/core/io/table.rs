use crate::core::error::ValidationError;
use crate::core::space::state_space::StateSpace;
use crate::core::space::table::StateTable;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

const LABEL_HEADER: &str = "proteoform";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("State table header declares no site columns")]
    MissingSites,
    #[error("Invalid value '{value}' for state '{label}' in column '{column}'")]
    Cell {
        label: String,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Parses a state table without validating it as a state space.
pub fn read_from(reader: impl Read) -> Result<StateTable, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let site_names: Vec<String> = csv_reader
        .headers()?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();
    if site_names.is_empty() {
        return Err(TableError::MissingSites);
    }

    let mut table = StateTable::new(site_names);
    for record in csv_reader.records() {
        let record = record?;
        let label = record.get(0).unwrap_or_default().to_string();
        let cells = record
            .iter()
            .skip(1)
            .enumerate()
            .map(|(site, raw)| {
                raw.parse::<u8>().map_err(|_| TableError::Cell {
                    label: label.clone(),
                    column: table
                        .site_names
                        .get(site)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", site + 1)),
                    value: raw.to_string(),
                })
            })
            .collect::<Result<Vec<u8>, TableError>>()?;
        table.push(label, cells);
    }
    Ok(table)
}

pub fn read_from_path(path: &Path) -> Result<StateTable, TableError> {
    let file = File::open(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_from(file)
}

/// Reads and validates a state table into a [`StateSpace`].
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_state_space(path: &Path) -> Result<StateSpace, TableError> {
    let table = read_from_path(path)?;
    debug!(rows = table.len(), sites = table.sites(), "State table parsed.");
    Ok(StateSpace::from_table(table)?)
}

pub fn write_to(table: &StateTable, writer: impl Write) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(
        std::iter::once(LABEL_HEADER).chain(table.site_names.iter().map(String::as_str)),
    )?;
    for row in &table.rows {
        let cells: Vec<String> = row.cells.iter().map(u8::to_string).collect();
        csv_writer.write_record(
            std::iter::once(row.label.as_str()).chain(cells.iter().map(String::as_str)),
        )?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_to_path(table: &StateTable, path: &Path) -> Result<(), TableError> {
    let file = File::create(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_to(table, file)
}

/// Where the state space of a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateSpaceSource {
    /// Enumerate all `2^R` proteoforms internally. Site names default to
    /// `site1..siteR`.
    Generate {
        sites: usize,
        site_names: Option<Vec<String>>,
    },
    /// Load an externally enumerated state table.
    Table(PathBuf),
}

impl StateSpaceSource {
    pub fn load(&self) -> Result<StateSpace, TableError> {
        match self {
            StateSpaceSource::Generate {
                site_names: Some(names),
                sites,
            } => {
                if names.len() != *sites {
                    return Err(TableError::Validation(ValidationError::SiteNames {
                        sites: *sites,
                        names: names.len(),
                    }));
                }
                Ok(StateSpace::generate_named(names.clone())?)
            }
            StateSpaceSource::Generate {
                sites,
                site_names: None,
            } => Ok(StateSpace::generate(*sites)?),
            StateSpaceSource::Table(path) => load_state_space(path),
        }
    }
}
