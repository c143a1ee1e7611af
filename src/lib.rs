//! Derive concentration-time series from pharmacokinetic datasets
//!
//! A dataset of `(subject, time, concentration)` observations is read from a delimited file,
//! then split into one time-ordered series per subject and summarised as the mean and sample
//! standard deviation at every observed time. The series can be prepared for the standard set
//! of individual, spaghetti, mean and combined charts on linear or logarithmic scales,
//! and written out for a renderer.
//!
//! ```rust,no_run
//! use pkseries::prelude::*;
//!
//! let settings = settings::read_settings(Some("settings.toml")).unwrap();
//! let result = run(settings).unwrap();
//! for point in result.aggregate().points() {
//!     println!("{:>5} h: {:.2} ± {:.2} mg/L", point.time_h, point.mean, point.std);
//! }
//! ```

pub mod entrypoints;
pub mod routines {
    pub mod charts;
    pub mod datafile;
    pub mod derive;
    pub mod logger;
    pub mod output;
    pub mod settings;
}
pub mod structs {
    pub mod observation;
    pub mod series;
}

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::entrypoints::{process, run};
    pub use crate::routines::charts::{ChartData, ChartKind, Scale};
    pub use crate::routines::datafile::DataError;
    pub use crate::routines::derive::{derive_aggregate_series, derive_subject_series};
    pub use crate::routines::output::{OutputFile, SeriesResult};
    pub use crate::routines::settings::{Columns, Settings, StdPolicy};
    pub use crate::routines::*;
    pub use crate::structs::observation::{Dataset, Observation};
    pub use crate::structs::series::{
        AggregatePoint, AggregateSeries, SubjectSeries, SubjectSeriesMap,
    };
}
