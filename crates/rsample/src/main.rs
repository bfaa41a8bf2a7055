use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use rsample::{PlanFile, frame_io, init_logging, run};

#[derive(Parser, Debug)]
#[command(name = "rsample")]
#[command(about = "Generate reproducible resampling plans for tabular data")]
struct Args {
    /// Path to the YAML plan file
    #[arg(short, long)]
    plan: PathBuf,

    /// Dataset file (YAML, or JSON by extension); overrides the plan's `data`
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Random seed; overrides the plan's `seed`
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only report split sizes, not row indices
    #[arg(long)]
    summary: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _guard = init_logging(args.log_file.as_deref(), &args.log_level)?;

    let plan = PlanFile::load(&args.plan)?;
    let mode = plan.mode()?;

    let data_path = args
        .data
        .or(plan.data)
        .ok_or_else(|| eyre!("no dataset given; pass --data or set `data` in the plan"))?;
    let data = Arc::new(frame_io::load_frame(&data_path)?);

    let seed = match args.seed.or(plan.seed) {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            tracing::warn!(seed, "no seed given, drew one at random");
            seed
        }
    };

    let report = run(&mode, data, seed, args.summary)
        .wrap_err_with(|| format!("failed to generate plan {}", args.plan.display()))?;
    let json = report.to_json().wrap_err("failed to serialize report")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), splits = report.splits.len(), "wrote plan");
        }
        None => println!("{json}"),
    }

    Ok(())
}
