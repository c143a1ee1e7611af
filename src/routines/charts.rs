//! Chart data preparation
//!
//! Describes the standard set of concentration-time charts as data: which series each chart
//! shows and on which scale. Drawing is left to the renderer, which receives a [ChartData]
//! holding copies of the series already filtered for the chart's scale.

use crate::structs::series::{AggregateSeries, SubjectSeries, SubjectSeriesMap};
use serde_derive::{Deserialize, Serialize};

/// Scale of the concentration axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    /// Whether a concentration can be shown on this scale
    pub fn shows(&self, value: f64) -> bool {
        match self {
            Scale::Linear => true,
            Scale::Log => value > 0.0,
        }
    }
}

/// The charts that can be prepared from a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// All subjects, one labelled curve each
    Individual,
    /// All subjects overlaid without labels, linear scale
    SpaghettiLinear,
    /// All subjects overlaid without labels, logarithmic scale
    SpaghettiSemilog,
    /// Mean ± SD at each time point
    Mean,
    /// Mean ± SD at each time point, logarithmic scale
    MeanSemilog,
    /// Individual curves in the background with the mean ± SD on top
    Combined,
}

impl ChartKind {
    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Individual,
            ChartKind::SpaghettiLinear,
            ChartKind::SpaghettiSemilog,
            ChartKind::Mean,
            ChartKind::MeanSemilog,
            ChartKind::Combined,
        ]
    }

    pub fn scale(&self) -> Scale {
        match self {
            ChartKind::SpaghettiSemilog | ChartKind::MeanSemilog => Scale::Log,
            _ => Scale::Linear,
        }
    }

    pub fn shows_subjects(&self) -> bool {
        !matches!(self, ChartKind::Mean | ChartKind::MeanSemilog)
    }

    pub fn shows_aggregate(&self) -> bool {
        matches!(
            self,
            ChartKind::Mean | ChartKind::MeanSemilog | ChartKind::Combined
        )
    }

    /// File name, without extension, used for this chart's data
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::Individual => "individual_concentration_time",
            ChartKind::SpaghettiLinear => "spaghetti_linear",
            ChartKind::SpaghettiSemilog => "spaghetti_semilog",
            ChartKind::Mean => "mean_concentration_time",
            ChartKind::MeanSemilog => "mean_concentration_time_semilog",
            ChartKind::Combined => "combined_concentration_time",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartKind::Individual => "individual",
            ChartKind::SpaghettiLinear => "spaghetti_linear",
            ChartKind::SpaghettiSemilog => "spaghetti_semilog",
            ChartKind::Mean => "mean",
            ChartKind::MeanSemilog => "mean_semilog",
            ChartKind::Combined => "combined",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::all()
            .iter()
            .find(|kind| kind.to_string() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown chart kind: {}", s))
    }
}

/// The series a renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    /// Subject curves, empty if the chart does not show them
    pub subjects: Vec<SubjectSeries>,
    /// Mean ± SD, `None` if the chart does not show it
    pub aggregate: Option<AggregateSeries>,
}

impl ChartData {
    /// Copy and filter the series shown by `kind`
    ///
    /// On a logarithmic scale, subject points with a non-positive concentration and aggregate points
    /// with a non-positive mean are dropped, as are subjects left without any point.
    /// The derived series themselves are never modified.
    pub fn prepare(
        kind: ChartKind,
        subjects: &SubjectSeriesMap,
        aggregate: &AggregateSeries,
    ) -> Self {
        let scale = kind.scale();

        let subjects = if kind.shows_subjects() {
            subjects
                .iter()
                .map(|series| series.retain(|_, c| scale.shows(c)))
                .filter(|series| !series.points().is_empty())
                .collect()
        } else {
            Vec::new()
        };

        let aggregate = if kind.shows_aggregate() {
            Some(aggregate.retain(|p| scale.shows(p.mean)))
        } else {
            None
        };

        ChartData {
            kind,
            subjects,
            aggregate,
        }
    }

    pub fn scale(&self) -> Scale {
        self.kind.scale()
    }

    /// Number of points across all series of the chart
    pub fn npoints(&self) -> usize {
        self.subjects.iter().map(|s| s.points().len()).sum::<usize>()
            + self.aggregate.as_ref().map_or(0, |a| a.len())
    }
}
