use clap::Parser;
use eyre::{Result, WrapErr};
use pkseries::prelude::*;

/// Derive individual and mean concentration-time series from a pharmacokinetic datafile
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Datafile, overrides `paths.data`
    #[arg(short, long)]
    data: Option<String>,

    /// Output folder, overrides `output.path`
    #[arg(short, long)]
    output: Option<String>,

    /// Log level, overrides `log.level`
    #[arg(long)]
    log_level: Option<String>,

    /// Standard deviation reported for single-observation time points
    #[arg(long, value_parser = parse_std_policy)]
    std_policy: Option<StdPolicy>,

    /// Charts to prepare, overrides `config.charts`
    #[arg(long, value_delimiter = ',')]
    charts: Option<Vec<ChartKind>>,

    /// Do not write output files
    #[arg(long)]
    no_output: bool,
}

impl Cli {
    /// Apply the command line overrides on top of the file and environment settings
    fn apply(self, settings: &mut Settings) {
        if let Some(data) = self.data {
            settings.set_data(data);
        }
        if let Some(output) = self.output {
            settings.set_output_path(output);
        }
        if let Some(level) = self.log_level {
            settings.set_log_level(level);
        }
        if let Some(policy) = self.std_policy {
            settings.set_std_policy(policy);
        }
        if let Some(charts) = self.charts {
            settings.set_charts(charts);
        }
        if self.no_output {
            settings.set_write(false);
        }
    }
}

fn parse_std_policy(s: &str) -> Result<StdPolicy, String> {
    match s.to_lowercase().as_str() {
        "zero" => Ok(StdPolicy::Zero),
        "nan" => Ok(StdPolicy::Nan),
        _ => Err(format!("expected `zero` or `nan`, got `{}`", s)),
    }
}

fn main() {
    if let Err(error) = run_cli() {
        tracing::error!("{:#}", error);
        eprintln!("Error: {:?}", error);
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = Cli::parse();

    let mut settings = settings::read_settings(args.config.as_deref())
        .wrap_err("Failed to read settings")?;
    args.apply(&mut settings);

    let result = run(settings)?;
    for chart in result.charts() {
        tracing::info!("Prepared {}: {} points", chart.kind, chart.npoints());
    }
    Ok(())
}
