use crate::routines::charts::ChartData;
use crate::routines::settings::Settings;
use crate::structs::observation::Dataset;
use crate::structs::series::{AggregateSeries, SubjectSeriesMap};
use csv::WriterBuilder;
use eyre::{Result, WrapErr};
use serde_derive::Serialize;
use std::fs::{create_dir_all, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Defines the result of a run
///
/// A [SeriesResult] holds the loaded [Dataset], every derived series and the prepared chart data,
/// and knows how to write them for a renderer to pick up.
#[derive(Debug, Clone)]
pub struct SeriesResult {
    data: Dataset,
    subjects: SubjectSeriesMap,
    aggregate: AggregateSeries,
    charts: Vec<ChartData>,
    settings: Settings,
}

#[derive(Debug, Serialize)]
struct SubjectRow<'a> {
    subject_id: &'a str,
    time_h: f64,
    concentration_mg_l: f64,
}

#[derive(Debug, Serialize)]
struct ChartRow {
    series: String,
    time_h: f64,
    value: f64,
    std: Option<f64>,
}

impl SeriesResult {
    pub fn new(
        data: Dataset,
        subjects: SubjectSeriesMap,
        aggregate: AggregateSeries,
        charts: Vec<ChartData>,
        settings: Settings,
    ) -> Self {
        Self {
            data,
            subjects,
            aggregate,
            charts,
            settings,
        }
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn subjects(&self) -> &SubjectSeriesMap {
        &self.subjects
    }

    pub fn aggregate(&self) -> &AggregateSeries {
        &self.aggregate
    }

    pub fn charts(&self) -> &[ChartData] {
        &self.charts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Write all output files, if enabled in the settings
    pub fn write_outputs(&self) -> Result<()> {
        if self.settings.output.write {
            tracing::debug!("Writing outputs to {:?}", self.settings.output.path);
            self.write_subjects()?;
            self.write_aggregate()?;
            self.write_charts()?;
            self.write_meta()?;
            self.write_settings()?;
            tracing::info!("Output files written to {:?}", self.settings.output.path);
        }
        Ok(())
    }

    /// Writes the individual concentration-time series, one row per point
    pub fn write_subjects(&self) -> Result<()> {
        let outputfile = OutputFile::new(&self.settings.output.path, "subjects.csv")?;
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(&outputfile.file);

        for series in self.subjects.iter() {
            for (time_h, concentration_mg_l) in series.points() {
                writer.serialize(SubjectRow {
                    subject_id: series.subject_id(),
                    time_h: *time_h,
                    concentration_mg_l: *concentration_mg_l,
                })?;
            }
        }
        writer.flush()?;
        tracing::debug!("Subject series written to {:?}", &outputfile.relative_path());
        Ok(())
    }

    /// Writes the mean and standard deviation at each time point
    pub fn write_aggregate(&self) -> Result<()> {
        let outputfile = OutputFile::new(&self.settings.output.path, "aggregate.csv")?;
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(&outputfile.file);

        for point in self.aggregate.points() {
            writer.serialize(point)?;
        }
        writer.flush()?;
        tracing::debug!("Aggregate series written to {:?}", &outputfile.relative_path());
        Ok(())
    }

    /// Writes one file per prepared chart to `charts/`, in long format
    ///
    /// The `series` column is `subject:<id>` for individual curves and `mean` for the aggregate,
    /// whose rows also carry the standard deviation.
    pub fn write_charts(&self) -> Result<()> {
        let folder = Path::new(&self.settings.output.path).join("charts");
        let folder = folder.to_string_lossy();

        for chart in &self.charts {
            let file_name = format!("{}.csv", chart.kind.file_stem());
            let outputfile = OutputFile::new(&folder, &file_name).wrap_err_with(|| {
                format!("Failed to create output file for chart {}", chart.kind)
            })?;
            let mut writer = WriterBuilder::new()
                .has_headers(true)
                .from_writer(&outputfile.file);

            for series in &chart.subjects {
                for (time_h, value) in series.points() {
                    writer.serialize(ChartRow {
                        series: format!("subject:{}", series.subject_id()),
                        time_h: *time_h,
                        value: *value,
                        std: None,
                    })?;
                }
            }
            if let Some(aggregate) = &chart.aggregate {
                for point in aggregate.points() {
                    writer.serialize(ChartRow {
                        series: "mean".to_string(),
                        time_h: point.time_h,
                        value: point.mean,
                        std: Some(point.std),
                    })?;
                }
            }
            writer.flush()?;
            tracing::debug!(
                "Data for chart {} ({} points) written to {:?}",
                chart.kind,
                chart.npoints(),
                &outputfile.relative_path()
            );
        }
        Ok(())
    }

    /// Writes a summary of the run
    pub fn write_meta(&self) -> Result<()> {
        let outputfile = OutputFile::new(&self.settings.output.path, "meta.csv")?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(&outputfile.file);

        writer.write_record([
            "subjects",
            "observations",
            "times",
            "std_policy",
            "generated",
        ])?;
        writer.write_record([
            self.subjects.len().to_string(),
            self.data.len().to_string(),
            self.aggregate.len().to_string(),
            self.settings.config.std_policy.to_string(),
            chrono::Local::now().to_rfc3339(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the effective settings as JSON
    pub fn write_settings(&self) -> Result<()> {
        let outputfile = OutputFile::new(&self.settings.output.path, "settings.json")?;
        serde_json::to_writer_pretty(outputfile.file(), &self.settings)
            .wrap_err("Failed to serialize settings")?;
        Ok(())
    }
}

/// A file inside the output folder, created along with any missing parent directory
pub struct OutputFile {
    file: File,
    relative_path: PathBuf,
}

impl OutputFile {
    pub fn new(folder: &str, file_name: &str) -> Result<Self> {
        let relative_path = Path::new(&folder).join(file_name);

        if let Some(parent) = relative_path.parent() {
            create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directories for {:?}", parent))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&relative_path)
            .wrap_err_with(|| format!("Failed to open file: {:?}", relative_path))?;

        Ok(OutputFile {
            file,
            relative_path,
        })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_owned(self) -> File {
        self.file
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_creates_missing_folders() {
        let folder = std::env::temp_dir().join("pkseries_output_file_test/nested");
        let _ = std::fs::remove_dir_all(&folder);

        let outputfile = OutputFile::new(&folder.to_string_lossy(), "test.csv").unwrap();
        assert!(outputfile.relative_path().exists());
        assert_eq!(outputfile.relative_path(), folder.join("test.csv"));
    }
}
