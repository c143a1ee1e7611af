use crate::prelude::*;

use eyre::{Result, WrapErr};
use std::time::Instant;

/// Primary entrypoint for pkseries
///
/// Reads the datafile named in the settings, derives the individual and aggregate series,
/// prepares the configured charts and writes the output files.
/// The settings are usually read from a TOML configuration file, see [settings::read_settings].
pub fn run(settings: Settings) -> Result<SeriesResult> {
    let now = Instant::now();
    logger::setup_log(&settings)?;
    tracing::info!("Starting pkseries");

    // Read input data
    let data = Dataset::from_path(&settings.paths.data, &settings.columns)
        .wrap_err_with(|| format!("Failed to read datafile {}", settings.paths.data))?;

    // Provide information of the input data
    tracing::info!(
        "Datafile contains {} subjects with a total of {} observations",
        data.subject_ids().len(),
        data.len()
    );

    let result = process(data, settings)?;
    result.write_outputs()?;

    tracing::info!("Finished in {:.3} s", now.elapsed().as_secs_f64());
    Ok(result)
}

/// Derive every series and chart from an already loaded [Dataset]
///
/// Nothing is written to disk.
pub fn process(data: Dataset, settings: Settings) -> Result<SeriesResult> {
    let subjects = derive_subject_series(&data).wrap_err("Failed to derive subject series")?;
    let aggregate = derive_aggregate_series(&data, settings.config.std_policy);

    let singletons = aggregate.points().iter().filter(|p| p.n == 1).count();
    if singletons > 0 {
        tracing::warn!(
            "{} time points have a single observation, their standard deviation is reported as {}",
            singletons,
            settings.config.std_policy
        );
    }

    let charts: Vec<ChartData> = settings
        .config
        .charts
        .iter()
        .map(|kind| ChartData::prepare(*kind, &subjects, &aggregate))
        .collect();
    tracing::info!(
        "Derived {} subject series, {} aggregate time points and {} charts",
        subjects.len(),
        aggregate.len(),
        charts.len()
    );

    Ok(SeriesResult::new(data, subjects, aggregate, charts, settings))
}
