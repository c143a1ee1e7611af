use crate::routines::datafile::DataError;
use crate::routines::settings::StdPolicy;
use crate::structs::observation::{Dataset, Observation};
use crate::structs::series::{
    AggregatePoint, AggregateSeries, SubjectKey, SubjectSeries, SubjectSeriesMap,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Exact observation time used as a grouping key
///
/// Times are finite and non-negative once loaded, so [f64::total_cmp] orders them numerically.
#[derive(Debug, Clone, Copy)]
struct TimeKey(f64);

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Split the dataset into one time-ordered series per subject
///
/// Every observation ends up in exactly one [SubjectSeries]. Two observations of the same subject
/// at the same time are rejected with [DataError::DuplicateObservation]. Subjects are checked in
/// the iteration order of [SubjectSeriesMap], so the same input always reports the same duplicate.
pub fn derive_subject_series(data: &Dataset) -> Result<SubjectSeriesMap, DataError> {
    let mut groups: BTreeMap<SubjectKey, Vec<&Observation>> = BTreeMap::new();
    for obs in data.observations() {
        groups
            .entry(SubjectKey::from(obs.subject_id()))
            .or_default()
            .push(obs);
    }

    let mut map = SubjectSeriesMap::default();
    for (key, mut observations) in groups {
        let id = key.as_str();
        // Stable sort, so the duplicate check reports rows in file order
        observations.sort_by(|a, b| a.time().total_cmp(&b.time()));

        if let Some(pair) = observations
            .windows(2)
            .find(|pair| pair[0].time() == pair[1].time())
        {
            return Err(DataError::DuplicateObservation {
                subject_id: id.to_string(),
                time_h: pair[0].time(),
                first_row: pair[0].row(),
                second_row: pair[1].row(),
            });
        }

        let points = observations
            .iter()
            .map(|obs| (obs.time(), obs.concentration()))
            .collect();
        map.insert(SubjectSeries::new(id.to_string(), points));
    }

    tracing::debug!(
        "Derived concentration-time series for {} subjects",
        map.len()
    );
    Ok(map)
}

/// Mean and sample standard deviation of the concentration at every distinct time
///
/// Only observations recorded at exactly that time contribute to a point; nothing is interpolated.
/// The standard deviation uses the n - 1 denominator, and `policy` decides what is reported when n = 1.
/// No values are filtered: zero concentrations are part of the statistics.
pub fn derive_aggregate_series(data: &Dataset, policy: StdPolicy) -> AggregateSeries {
    let mut groups: BTreeMap<TimeKey, Vec<f64>> = BTreeMap::new();
    for obs in data.observations() {
        groups
            .entry(TimeKey(obs.time()))
            .or_default()
            .push(obs.concentration());
    }

    let points: Vec<AggregatePoint> = groups
        .into_iter()
        .map(|(time, values)| {
            let mean = mean(&values);
            let std = if values.len() > 1 {
                sample_std(&values, mean)
            } else {
                policy.single_value()
            };
            AggregatePoint {
                time_h: time.0,
                mean,
                std,
                n: values.len(),
            }
        })
        .collect();

    tracing::debug!("Derived aggregate series with {} time points", points.len());
    AggregateSeries::new(points)
}

/// Running mean, stays finite for values close to [f64::MAX]
fn mean(values: &[f64]) -> f64 {
    values
        .iter()
        .enumerate()
        .fold(0.0, |m, (k, x)| m + (x - m) / (k + 1) as f64)
}

/// Bessel-corrected standard deviation, requires at least two values
fn sample_std(values: &[f64], mean: f64) -> f64 {
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
