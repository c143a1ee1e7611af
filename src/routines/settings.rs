use crate::routines::charts::ChartKind;
use config::Config as eConfig;
use serde_derive::{Deserialize, Serialize};

/// Settings for a run, read from a TOML file and/or environment variables
///
/// Every section and field has a default, so an empty configuration is valid.
/// Environment variables are prefixed with `PKSERIES` and use `__` to separate sections and keys,
/// e.g. `PKSERIES__LOG__LEVEL=debug` or `PKSERIES__PATHS__DATA=data.csv`.
/// Lists are comma separated, as in `PKSERIES__CONFIG__CHARTS=mean,combined`.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub paths: Paths,
    pub columns: Columns,
    pub config: Config,
    pub output: Output,
    pub log: Log,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Paths {
    /// The concentration-time datafile
    #[serde(default = "default_data")]
    pub data: String,
}

/// Layout of the datafile
///
/// Column names are matched case-insensitively, after trimming surrounding whitespace.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Columns {
    #[serde(default = "default_subject_column")]
    pub subject: String,
    #[serde(default = "default_time_column")]
    pub time: String,
    #[serde(default = "default_concentration_column")]
    pub concentration: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Standard deviation reported when a single observation exists at a time point
    #[serde(default)]
    pub std_policy: StdPolicy,
    /// Charts to prepare data for
    #[serde(default = "default_charts")]
    pub charts: Vec<ChartKind>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Output {
    /// Whether output files are written
    #[serde(default = "default_true")]
    pub write: bool,
    /// Folder for the output files, created if it does not exist
    #[serde(default = "default_output_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Log {
    /// Level, or any [tracing_subscriber::EnvFilter] directive
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Name of the log file inside the output folder, no file is written if unset
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_true")]
    pub stdout: bool,
}

/// How the standard deviation is reported when only one observation contributes to a time point
///
/// The sample standard deviation is undefined for n = 1.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StdPolicy {
    /// Report 0.0
    #[default]
    Zero,
    /// Report NaN
    Nan,
}

impl StdPolicy {
    pub(crate) fn single_value(&self) -> f64 {
        match self {
            StdPolicy::Zero => 0.0,
            StdPolicy::Nan => f64::NAN,
        }
    }
}

impl std::fmt::Display for StdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StdPolicy::Zero => write!(f, "zero"),
            StdPolicy::Nan => write!(f, "nan"),
        }
    }
}

impl Settings {
    pub fn set_data(&mut self, path: impl Into<String>) {
        self.paths.data = path.into();
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        self.output.path = path.into();
    }

    pub fn set_write(&mut self, write: bool) {
        self.output.write = write;
    }

    pub fn set_log_level(&mut self, level: impl Into<String>) {
        self.log.level = level.into();
    }

    pub fn set_std_policy(&mut self, policy: StdPolicy) {
        self.config.std_policy = policy;
    }

    pub fn set_charts(&mut self, charts: Vec<ChartKind>) {
        self.config.charts = charts;
    }
}

/// Read settings from an optional TOML file, with environment overrides applied on top
pub fn read_settings(path: Option<&str>) -> Result<Settings, config::ConfigError> {
    let mut builder = eConfig::builder();
    if let Some(path) = path {
        builder =
            builder.add_source(config::File::with_name(path).format(config::FileFormat::Toml));
    }

    let parsed = builder
        .add_source(
            config::Environment::with_prefix("PKSERIES")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("config.charts"),
        )
        .build()?;

    parsed.try_deserialize()
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            data: default_data(),
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Columns {
            subject: default_subject_column(),
            time: default_time_column(),
            concentration: default_concentration_column(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            std_policy: StdPolicy::default(),
            charts: default_charts(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Output {
            write: default_true(),
            path: default_output_path(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: default_log_level(),
            file: None,
            stdout: default_true(),
        }
    }
}

// *********************************
// Default values for deserializing
// *********************************
fn default_true() -> bool {
    true
}

fn default_data() -> String {
    "data.csv".to_string()
}

fn default_subject_column() -> String {
    "subject_id".to_string()
}

fn default_time_column() -> String {
    "time_h".to_string()
}

fn default_concentration_column() -> String {
    "concentration_mg_l".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_charts() -> Vec<ChartKind> {
    ChartKind::all().to_vec()
}

fn default_output_path() -> String {
    "outputs/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
