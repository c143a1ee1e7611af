use serde_derive::Serialize;
use std::collections::BTreeMap;

/// The concentration-time profile of a single subject
///
/// Points are `(time_h, concentration_mg_l)` pairs, strictly ascending in time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSeries {
    subject_id: String,
    points: Vec<(f64, f64)>,
}

impl SubjectSeries {
    pub(crate) fn new(subject_id: String, points: Vec<(f64, f64)>) -> Self {
        SubjectSeries { subject_id, points }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|(t, _)| *t).collect()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.points.iter().map(|(_, c)| *c).collect()
    }

    /// Keep only the points for which `keep` returns true
    pub(crate) fn retain(&self, keep: impl Fn(f64, f64) -> bool) -> Self {
        SubjectSeries {
            subject_id: self.subject_id.clone(),
            points: self
                .points
                .iter()
                .filter(|(t, c)| keep(*t, *c))
                .copied()
                .collect(),
        }
    }
}

/// Ordering key for subject identifiers
///
/// Identifiers that parse as integers sort numerically and come before any other identifier,
/// so that subjects `1, 2, 10` are not ordered as `1, 10, 2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SubjectKey {
    Numeric(i64, String),
    Text(String),
}

impl SubjectKey {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            SubjectKey::Numeric(_, id) | SubjectKey::Text(id) => id,
        }
    }
}

impl From<&str> for SubjectKey {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => SubjectKey::Numeric(n, id.to_string()),
            Err(_) => SubjectKey::Text(id.to_string()),
        }
    }
}

/// Mapping from subject identifier to its [SubjectSeries]
///
/// Iteration is deterministic: integer identifiers first, in numeric order, then all others in lexical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectSeriesMap {
    series: BTreeMap<SubjectKey, SubjectSeries>,
}

impl SubjectSeriesMap {
    pub(crate) fn insert(&mut self, series: SubjectSeries) {
        self.series.insert(SubjectKey::from(series.subject_id()), series);
    }

    pub fn get(&self, subject_id: &str) -> Option<&SubjectSeries> {
        self.series.get(&SubjectKey::from(subject_id))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn subject_ids(&self) -> Vec<&str> {
        self.series.values().map(|s| s.subject_id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubjectSeries> {
        self.series.values()
    }

    /// Total number of points across all subjects
    pub fn npoints(&self) -> usize {
        self.series.values().map(|s| s.points().len()).sum()
    }
}

/// Summary statistics across subjects at one time point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatePoint {
    /// Time since dose, in hours
    pub time_h: f64,
    /// Arithmetic mean of the concentrations recorded at `time_h`
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator), see [crate::routines::settings::StdPolicy] for n = 1
    pub std: f64,
    /// Number of observations contributing to this point
    pub n: usize,
}

/// Mean and standard deviation of the concentration at every distinct time, ascending in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSeries {
    points: Vec<AggregatePoint>,
}

impl AggregateSeries {
    pub(crate) fn new(points: Vec<AggregatePoint>) -> Self {
        AggregateSeries { points }
    }

    pub fn points(&self) -> &[AggregatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the point recorded at exactly `time_h`
    pub fn at(&self, time_h: f64) -> Option<&AggregatePoint> {
        self.points.iter().find(|p| p.time_h == time_h)
    }

    pub(crate) fn retain(&self, keep: impl Fn(&AggregatePoint) -> bool) -> Self {
        AggregateSeries {
            points: self.points.iter().filter(|p| keep(*p)).copied().collect(),
        }
    }
}
