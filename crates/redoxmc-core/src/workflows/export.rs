use crate::analysis::aggregate::PopulationSummary;
use crate::analysis::temporal::StepStatistics;
use crate::core::error::LookupError;
use crate::core::models::ids::ProteoformId;
use crate::core::space::state_space::StateSpace;
use crate::engine::trajectory::Trajectory;
use crate::workflows::simulate::SimulationResult;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

pub const TRAJECTORY_FILE: &str = "trajectory.csv";
pub const OCCUPANCY_FILE: &str = "occupancy.csv";
pub const HISTOGRAM_FILE: &str = "k_histogram.csv";
pub const STEP_STATISTICS_FILE: &str = "step_statistics.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unknown proteoform label '{0}' in occupancy table")]
    UnknownLabel(String),
    #[error("Lookup failed while exporting: {0}")]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Serialize)]
struct OccupancyRow<'a> {
    proteoform: &'a str,
    count: usize,
    k: usize,
}

#[derive(Debug, Deserialize)]
struct OccupancyRecord {
    proteoform: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct HistogramRow {
    k: usize,
    count: usize,
}

#[derive(Debug, Serialize)]
struct StepRow {
    step: usize,
    mean_k: f64,
    redox_percent: f64,
    distinct_states: usize,
}

fn label_of(space: &StateSpace, id: ProteoformId) -> Result<&str, LookupError> {
    space.label(id).ok_or(LookupError::UnknownState { id })
}

/// One row per molecule: `molecule,0,1,..,T` with proteoform labels as cells.
pub fn write_trajectory(
    trajectory: &Trajectory,
    space: &StateSpace,
    writer: impl Write,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(trajectory.columns() + 1);
    header.push("molecule".to_string());
    header.extend((0..trajectory.columns()).map(|step| step.to_string()));
    csv.write_record(&header)?;

    let mut record = Vec::with_capacity(header.len());
    for molecule in 0..trajectory.molecules() {
        record.clear();
        record.push(molecule.to_string());
        for id in trajectory.row(molecule) {
            record.push(label_of(space, id)?.to_string());
        }
        csv.write_record(&record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_occupancy(
    summary: &PopulationSummary,
    space: &StateSpace,
    writer: impl Write,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (&id, &count) in summary.occupancy() {
        let k = space.grade_of(id).ok_or(LookupError::UnknownState { id })?;
        csv.serialize(OccupancyRow {
            proteoform: label_of(space, id)?,
            count,
            k,
        })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_histogram(summary: &PopulationSummary, writer: impl Write) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (k, &count) in summary.grade_histogram().iter().enumerate() {
        csv.serialize(HistogramRow { k, count })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_step_statistics(
    statistics: &[StepStatistics],
    writer: impl Write,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for stats in statistics {
        csv.serialize(StepRow {
            step: stats.step,
            mean_k: stats.mean_grade,
            redox_percent: stats.redox_percentage,
            distinct_states: stats.distinct_states,
        })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads an occupancy table written by [`write_occupancy`], resolving labels
/// against `space`. Extra columns such as `k` are ignored.
pub fn read_occupancy(
    reader: impl Read,
    space: &StateSpace,
) -> Result<Vec<(ProteoformId, usize)>, ExportError> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut occupancy = Vec::new();
    for record in csv.deserialize::<OccupancyRecord>() {
        let record = record?;
        let id = space
            .id_of_label(&record.proteoform)
            .ok_or_else(|| ExportError::UnknownLabel(record.proteoform.clone()))?;
        occupancy.push((id, record.count));
    }
    Ok(occupancy)
}

pub fn read_occupancy_path(
    path: &Path,
    space: &StateSpace,
) -> Result<Vec<(ProteoformId, usize)>, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_occupancy(file, space)
}

/// Writes the standard set of result tables into one directory.
#[derive(Debug, Clone)]
pub struct ResultsDirectory {
    root: PathBuf,
    include_trajectory: bool,
}

impl ResultsDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_trajectory: true,
        }
    }

    /// The full trajectory is N × (T+1) cells; large runs may want to skip it.
    pub fn with_trajectory(mut self, include: bool) -> Self {
        self.include_trajectory = include;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[instrument(skip_all, name = "export_results", fields(dir = %self.root.display()))]
    pub fn write(
        &self,
        result: &SimulationResult,
        statistics: &[StepStatistics],
        space: &StateSpace,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(&self.root).map_err(|source| ExportError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut written = Vec::new();
        if self.include_trajectory {
            let path = self.root.join(TRAJECTORY_FILE);
            write_trajectory(&result.trajectory, space, self.create(&path)?)?;
            written.push(path);
        }

        let path = self.root.join(OCCUPANCY_FILE);
        write_occupancy(&result.summary, space, self.create(&path)?)?;
        written.push(path);

        let path = self.root.join(HISTOGRAM_FILE);
        write_histogram(&result.summary, self.create(&path)?)?;
        written.push(path);

        let path = self.root.join(STEP_STATISTICS_FILE);
        write_step_statistics(statistics, self.create(&path)?)?;
        written.push(path);

        info!("Wrote {} result table(s).", written.len());
        Ok(written)
    }

    fn create(&self, path: &Path) -> Result<BufWriter<File>, ExportError> {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::temporal::step_statistics;
    use crate::engine::config::{SimulationConfigBuilder, TransitionProbabilities};
    use crate::engine::progress::ProgressReporter;
    use crate::workflows::simulate::{StopSignal, run};
    use tempfile::tempdir;

    fn small_run(space: &StateSpace) -> SimulationResult {
        let config = SimulationConfigBuilder::new()
            .molecules(6)
            .steps(4)
            .catalytic_site(1)
            .probabilities(TransitionProbabilities::default())
            .seed(Some(7))
            .build()
            .unwrap();
        run(space, &config, &StopSignal::new(), &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn trajectory_csv_has_labelled_rows() {
        let space = StateSpace::generate(3).unwrap();
        let result = small_run(&space);
        let mut buffer = Vec::new();
        write_trajectory(&result.trajectory, &space, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "molecule,0,1,2,3,4");
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("0,PF001,"));
    }

    #[test]
    fn histogram_csv_lists_every_grade() {
        let space = StateSpace::generate(3).unwrap();
        let summary =
            PopulationSummary::from_snapshot(&[space.all_reduced(), space.all_oxidized()], &space)
                .unwrap();
        let mut buffer = Vec::new();
        write_histogram(&summary, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "k,count\n0,1\n1,0\n2,0\n3,1\n"
        );
    }

    #[test]
    fn occupancy_table_reads_back_into_same_summary() {
        let space = StateSpace::generate(4).unwrap();
        let result = small_run(&space);
        let mut buffer = Vec::new();
        write_occupancy(&result.summary, &space, &mut buffer).unwrap();
        assert!(String::from_utf8_lossy(&buffer).starts_with("proteoform,count,k\n"));

        let occupancy = read_occupancy(buffer.as_slice(), &space).unwrap();
        let rebuilt = PopulationSummary::from_occupancy(occupancy, &space).unwrap();
        assert_eq!(rebuilt, result.summary);
    }

    #[test]
    fn unknown_label_in_occupancy_is_rejected() {
        let space = StateSpace::generate(2).unwrap();
        let input = "proteoform,count,k\nPF042,3,1\n";
        assert!(matches!(
            read_occupancy(input.as_bytes(), &space),
            Err(ExportError::UnknownLabel(label)) if label == "PF042"
        ));
    }

    #[test]
    fn results_directory_writes_all_tables() {
        let space = StateSpace::generate(3).unwrap();
        let result = small_run(&space);
        let stats = step_statistics(&result.trajectory, &space).unwrap();
        let dir = tempdir().unwrap();
        let sink = ResultsDirectory::new(dir.path().join("out"));

        let written = sink.write(&result, &stats, &space).unwrap();
        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }
        let steps = fs::read_to_string(sink.root().join(STEP_STATISTICS_FILE)).unwrap();
        assert_eq!(steps.lines().count(), 1 + 5);
        assert!(steps.starts_with("step,mean_k,redox_percent,distinct_states\n0,0.0,0.0,1\n"));
    }

    #[test]
    fn trajectory_can_be_skipped() {
        let space = StateSpace::generate(2).unwrap();
        let result = small_run(&space);
        let stats = step_statistics(&result.trajectory, &space).unwrap();
        let dir = tempdir().unwrap();
        let sink = ResultsDirectory::new(dir.path()).with_trajectory(false);
        let written = sink.write(&result, &stats, &space).unwrap();
        assert_eq!(written.len(), 3);
        assert!(!dir.path().join(TRAJECTORY_FILE).exists());
    }
}
