use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use riffmetrics::{
    compute_distributions, execute_analysis, format_distributions, parse_utterance_file,
    AffirmationThresholds, AnalysisConfig, HumanReport, InterruptionThresholds,
};

#[derive(Parser)]
#[command(name = "riffmetrics")]
#[command(author, version, about = "Meeting utterance metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find who affirmed and who interrupted whom in each meeting
    Relations {
        /// Input utterance batch (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the full report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Merge a participant's utterances separated by less than this (ms)
        #[arg(long)]
        merge_gap_ms: Option<i64>,

        /// Minimum overlap for an affirmation in milliseconds
        #[arg(long, default_value = "250")]
        affirmation_min_overlap_ms: i64,

        /// Affirmations must be shorter than this (ms)
        #[arg(long, default_value = "2000")]
        affirmation_max_length_ms: i64,

        /// Minimum overlap for an interruption in milliseconds
        #[arg(long, default_value = "1000")]
        interruption_min_overlap_ms: i64,

        /// Interruptions must last at least this long (ms)
        #[arg(long, default_value = "5000")]
        interruption_min_length_ms: i64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print utterance duration, gap and meeting length distributions
    Distributions {
        /// Input utterance batch (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of meeting parts for the zero-length utterance distribution
        #[arg(long, default_value = "50")]
        slots: usize,

        /// Skip meetings shorter than this for the zero-length distribution (ms)
        #[arg(long, default_value = "60000")]
        min_meeting_ms: i64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Relations {
            input,
            output,
            human_readable,
            merge_gap_ms,
            affirmation_min_overlap_ms,
            affirmation_max_length_ms,
            interruption_min_overlap_ms,
            interruption_min_length_ms,
            verbose,
        } => {
            setup_logging(verbose);
            let config = AnalysisConfig {
                merge_gap_ms,
                ..Default::default()
            }
            .with_affirmation(AffirmationThresholds {
                min_overlap_ms: affirmation_min_overlap_ms,
                max_length_ms: affirmation_max_length_ms,
            })
            .with_interruption(InterruptionThresholds {
                min_overlap_ms: interruption_min_overlap_ms,
                min_length_ms: interruption_min_length_ms,
            });
            report_relations(input, output, human_readable, &config)
        }
        Commands::Distributions {
            input,
            slots,
            min_meeting_ms,
            verbose,
        } => {
            setup_logging(verbose);
            let config = AnalysisConfig {
                zero_length_slots: slots,
                min_meeting_duration_ms: min_meeting_ms,
                ..Default::default()
            };
            report_distributions(input, &config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn report_relations(
    input: PathBuf,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    config: &AnalysisConfig,
) -> Result<()> {
    info!("Loading utterances from {:?}", input);
    let meetings = parse_utterance_file(&input).context("Failed to parse input utterances")?;
    info!(
        "Loaded {} meetings, {} utterances",
        meetings.len(),
        meetings.iter().map(|m| m.utterance_count()).sum::<usize>()
    );

    let report = execute_analysis(&meetings, config).context("Analysis failed")?;
    let human = HumanReport::new(&report);

    if let Some(path) = &output {
        report.write_json(path)?;
        info!("Report written to {:?}", path);
    }
    if let Some(path) = &human_readable {
        human.write_file(path)?;
        info!("Human-readable report written to {:?}", path);
    }
    if output.is_none() && human_readable.is_none() {
        print!("{}", human.format_relations());
    }

    let affirmations: usize = report.meetings.iter().map(|m| m.affirmations.events.len()).sum();
    let interruptions: usize = report.meetings.iter().map(|m| m.interruptions.events.len()).sum();
    info!(
        "Complete: {} affirmations, {} interruptions in {} meetings",
        affirmations,
        interruptions,
        report.meetings.len()
    );

    Ok(())
}

fn report_distributions(input: PathBuf, config: &AnalysisConfig) -> Result<()> {
    info!("Loading utterances from {:?}", input);
    let meetings = parse_utterance_file(&input).context("Failed to parse input utterances")?;

    let distributions =
        compute_distributions(&meetings, config).context("Failed to compute distributions")?;

    println!("Utterance Distributions");
    println!("=======================");
    println!();
    print!("{}", format_distributions(&distributions));

    Ok(())
}
