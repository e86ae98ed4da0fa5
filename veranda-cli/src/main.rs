use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use veranda::dashboard::{self, SourceMode};
use veranda::{compose, Loader};

mod render;

#[derive(Parser, Debug)]
#[clap(name = "veranda", about, version)]
struct Args {
    /// Increase output logging verbosity.
    #[clap(short, long)]
    verbose: bool,

    /// Optional YAML settings file. Command line flags take precedence.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Read the file-backed datasets from CSV files in this directory
    /// instead of using the inline figures.
    #[clap(short, long)]
    data_dir: Option<PathBuf>,

    /// Analysis year to select in the filter control.
    #[clap(short, long)]
    year: Option<i64>,

    /// Where to write the rendered report.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Write the chart specifications as JSON instead of rendering HTML.
    #[clap(long)]
    json: bool,
}

/// The same settings as the flags, loadable from a YAML file.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_dir: Option<PathBuf>,
    year: Option<i64>,
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    simple_logger::init_with_level(if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    })
    .unwrap();

    match run(args) {
        Ok(path) => log::info!("Wrote {}", path.display()),
        Err(e) => {
            log::error!("Failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<PathBuf, Box<dyn Error>> {
    let file_settings = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str::<FileSettings>(&content)?
        }
        None => FileSettings::default(),
    };
    let data_dir = args.data_dir.or(file_settings.data_dir);
    let year = args
        .year
        .or(file_settings.year)
        .unwrap_or(dashboard::ANALYSIS_YEARS[0]);
    let default_output = if args.json {
        "dashboard.json"
    } else {
        "dashboard.html"
    };
    let output = args
        .output
        .or(file_settings.output)
        .unwrap_or_else(|| PathBuf::from(default_output));

    let mode = match data_dir {
        Some(dir) => SourceMode::FromDir(dir),
        None => SourceMode::Inline,
    };
    let sources = dashboard::sources(&mode)?;
    // A misconfigured view is a programming defect; fail before composing
    // anything.
    let views = dashboard::views(&sources)?;
    let mut filter = dashboard::filter();
    filter.select(year)?;

    let mut loader = Loader::new(&sources);
    let charts = compose(&views, &mut loader, &filter);

    let rendered = if args.json {
        serde_json::to_string_pretty(&charts)?
    } else {
        render::render_html(&charts, year)?
    };
    fs::write(&output, rendered)?;
    Ok(output)
}
