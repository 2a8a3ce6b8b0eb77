use anyhow::{ensure, Context, Result};
use bee_colony_core::colony::ColonyState;
use bee_colony_core::config::SimConfig;
use bee_colony_core::field::SpatialField;
use bee_colony_core::metrics::{collect_step_metrics, snapshot_colony, RunSummary, StepMetrics};
use bee_colony_core::pacing::TickPacing;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "bee-colony")]
#[command(about = "Honeybee colony foraging simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation, optionally from a JSON config file
    Run {
        /// Path to config file (JSON); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 10_000)]
        ticks: usize,

        /// Sample metrics every N ticks
        #[arg(long, default_value_t = 100)]
        sample_every: usize,

        /// Write a RunSummary JSON to this directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pace ticks against wall-clock time at this rate multiplier
        /// (one simulated hour per real minute at 1.0); unpaced when
        /// omitted
        #[arg(long)]
        time_multiplier: Option<f64>,

        /// Simulated seconds represented by one tick, for pacing only
        #[arg(long, default_value_t = 1.0)]
        tick_sim_seconds: f64,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let config = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config file {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file)).context("failed to parse config")?
        }
        None => SimConfig::default(),
    };
    config.validate().context("config validation error")?;
    Ok(config)
}

fn run(
    config: SimConfig,
    ticks: usize,
    sample_every: usize,
    out: Option<PathBuf>,
    pacing: Option<TickPacing>,
    tick_sim_seconds: f64,
) -> Result<()> {
    ensure!(sample_every > 0, "sample_every must be positive");

    let mut field = SpatialField::new(config.field_size, config.flower_nectar);
    let mut colony =
        ColonyState::new(&mut field, config).context("failed to initialize colony")?;
    info!(hive = ?colony.hive_location(), "colony established");

    let mut samples: Vec<StepMetrics> = Vec::new();
    for tick in 1..=ticks {
        colony
            .update(&mut field)
            .context("simulation tick failed")?;
        if tick % sample_every == 0 {
            let metrics = collect_step_metrics(tick, &colony, &field);
            println!(
                "tick {:>7}  bees {:>4}  nectar {:>3}  honey {:>6}  eggs {:>6}  queen {}",
                metrics.step,
                metrics.bee_count,
                metrics.nectar,
                metrics.honey,
                metrics.eggs_laid,
                if metrics.queen_alive { "alive" } else { "dead" },
            );
            samples.push(metrics);
        }
        if let Some(pacing) = pacing {
            std::thread::sleep(pacing.real_delay_for(tick_sim_seconds));
        }
    }

    let summary = RunSummary {
        schema_version: 1,
        steps: ticks,
        sample_every,
        samples,
        final_snapshot: snapshot_colony(&colony),
    };

    if let Some(out_dir) = out {
        std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
        let summary_path = out_dir.join("summary.json");
        let file = File::create(&summary_path).context("failed to create summary file")?;
        serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
        println!("Run complete. Summary saved to {}", summary_path.display());
    } else {
        println!(
            "Run complete. Honey: {}, eggs laid: {}, colony size: {}",
            summary.final_snapshot.honey,
            summary.final_snapshot.eggs_laid,
            summary.final_snapshot.bee_count,
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::DumpDefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        }
        Commands::Run {
            config,
            ticks,
            sample_every,
            out,
            time_multiplier,
            tick_sim_seconds,
        } => {
            let config = load_config(config.as_ref())?;
            let pacing = match time_multiplier {
                Some(multiplier) => {
                    ensure!(
                        multiplier.is_finite() && multiplier > 0.0,
                        "time multiplier must be positive and finite"
                    );
                    Some(TickPacing::new(multiplier))
                }
                None => None,
            };
            run(config, ticks, sample_every, out, pacing, tick_sim_seconds)?;
        }
    }
    Ok(())
}
