//! Candidate Selection Demo
//!
//! Scores a list of candidates, then picks one by amplitude amplification
//! over the candidates that stand out from the rest.

use std::path::PathBuf;

use ampsel::{
    CandidateSelector, Direction, Selection, SelectionPath, SelectorConfig, success_probability,
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ampsel_demos::{
    Tally, describe_path, print_header, print_info, print_result, print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "demo-select")]
#[command(about = "Pick a candidate by Grover amplification over its score")]
struct Args {
    /// Comma-separated candidate scores
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "0.2,0.4,0.1,0.9,0.3"
    )]
    scores: Vec<f64>,

    /// Prefer low scores instead of high ones
    #[arg(long)]
    minimize: bool,

    /// Seed for reproducible sampling (trial t uses seed + t)
    #[arg(long)]
    seed: Option<u64>,

    /// Measurement shots per selection (overrides the configuration)
    #[arg(long)]
    shots: Option<u32>,

    /// Number of independent selections to run
    #[arg(short, long, default_value = "1")]
    trials: u32,

    /// YAML configuration file
    #[arg(short, long, env = "AMPSEL_CONFIG")]
    config: Option<PathBuf>,

    /// Emit a JSON report instead of the styled one
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    direction: Direction,
    scores: &'a [f64],
    config: &'a SelectorConfig,
    first: &'a Selection,
    tally: &'a Tally,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.trials == 0 {
        bail!("--trials must be at least 1");
    }

    let mut config = SelectorConfig::load(args.config.as_deref())
        .context("failed to load selector configuration")?;
    if let Some(shots) = args.shots {
        config = config.with_shots(shots);
    }
    let selector = CandidateSelector::new(config)?;
    info!(
        config = ?args.config,
        shots = selector.config().shots,
        rounding = %selector.config().rounding,
        "selector configured"
    );

    let direction = if args.minimize {
        Direction::Minimize
    } else {
        Direction::Maximize
    };

    let mut tally = Tally::new();
    let mut selections = Vec::with_capacity(args.trials as usize);
    for trial in 0..args.trials {
        let selection = match args.seed {
            Some(seed) => {
                let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(u64::from(trial)));
                selector.select_index_with_rng(&args.scores, direction, &mut rng)?
            }
            None => selector.select_index(&args.scores, direction)?,
        };
        tally.record(&selection);
        selections.push(selection);
    }
    info!(
        trials = tally.trials,
        amplified = tally.amplified,
        hits = tally.hits,
        "selections complete"
    );
    let Some(first) = selections.first() else {
        bail!("no selection was made");
    };

    if args.json {
        let report = Report {
            direction,
            scores: &args.scores,
            config: selector.config(),
            first,
            tally: &tally,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("Amplified Candidate Selection");

    print_section("Problem Setup");
    print_result("Candidates", args.scores.len());
    print_result("Direction", direction);
    print_result("Shots per selection", selector.config().shots);
    print_result("Rounding", selector.config().rounding);
    print_result("Max register width", selector.config().max_qubits());
    for (i, score) in args.scores.iter().enumerate() {
        print_result(&format!("Score [{i}]"), score);
    }

    print_section("Thresholding");
    match &first.threshold {
        Some(threshold) => {
            print_result("Mean", format!("{:.4}", threshold.mean));
            print_result("Std dev", format!("{:.4}", threshold.std_dev));
            print_result("Cut-off", format!("{:.4}", threshold.cutoff));
            print_result("Marked", format!("{:?}", threshold.marked));
        }
        None => print_info("Single candidate, no thresholding needed"),
    }

    print_section("Selection");
    print_result("Path", describe_path(&first.path));
    if let SelectionPath::Amplified {
        iterations,
        num_qubits,
        sampled,
        hit,
    } = first.path
    {
        let marked = first.threshold.as_ref().map_or(0, |t| t.marked.len());
        let expected = success_probability(1 << num_qubits, marked, iterations);
        print_result(
            "Sampled state",
            format!("|{sampled}⟩ = |{sampled:0num_qubits$b}⟩"),
        );
        print_result("Marked hit", hit);
        print_result(
            "Theoretical success",
            format!("{:.1}%", expected * 100.0),
        );
    }
    print_result("Chosen candidate", first.index);

    if args.trials > 1 {
        print_section("Trials");
        for (index, wins) in &tally.wins {
            print_result(
                &format!("Candidate [{index}]"),
                format!(
                    "{wins} ({:.1}%)",
                    f64::from(*wins) * 100.0 / f64::from(tally.trials)
                ),
            );
        }
        if let Some(rate) = tally.hit_rate() {
            print_result("Marked hit rate", format!("{:.1}%", rate * 100.0));
        }
        if let Some(favourite) = tally.favourite() {
            print_result("Most chosen", favourite);
        }
    }

    println!();
    print_success("Selection complete!");
    Ok(())
}
