//! Command-line driver: parse tuning flags, run the planner, print the
//! trajectory, and write the upload/replay script files.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};

use cascade_core::{action, STEPS};
use cascade_eval::QualityWeights;
use cascade_search::{solve, SearchConfig};

#[derive(Debug, Parser)]
#[command(name = "cascade", about = "Beam-search planner for the fixed-sequence stacking game")]
struct Cli {
    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v = DEBUG, -vv = TRACE)"
    )]
    verbose: u8,

    #[arg(long, default_value_t = 9041, help = "States kept per layer")]
    total_keep: usize,

    #[arg(long, default_value_t = 0.163, help = "Share of the keep given to the score pass")]
    score_keep_ratio: f64,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "0.3,0.5,0.7,0.9",
        help = "Ancestor quotas for the score pass"
    )]
    score_parent_quota: Vec<f64>,

    #[arg(long, default_value_t = 0.210, help = "Height quota for the score pass")]
    score_height_quota: f64,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "0.3,0.5,0.7,0.9",
        help = "Ancestor quotas for the quality pass"
    )]
    quality_parent_quota: Vec<f64>,

    #[arg(long, default_value_t = 0.355, help = "Height quota for the quality pass")]
    quality_height_quota: f64,

    #[arg(long, default_value_t = 2200, help = "Prune states this far behind the best score")]
    ignore_score_threshold: u32,

    #[arg(long, default_value_t = 6, help = "Prune states this far below the tallest stack")]
    ignore_height_threshold: u32,

    #[arg(long, default_value_t = 458)]
    row_transition_penalty: i32,

    #[arg(long, default_value_t = 0)]
    col_transition_penalty: i32,

    #[arg(long, default_value_t = 1080)]
    hole_penalty: i32,

    #[arg(long, default_value_t = 0)]
    overhang_penalty: i32,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Per-step minimum scores; the run aborts when the best falls below"
    )]
    abort_threshold: Vec<u32>,

    #[arg(long, default_value_t = 8, help = "Worker threads")]
    threads: usize,

    #[arg(long, default_value_t = STEPS, help = "Layers to run")]
    steps: usize,

    #[arg(long, default_value = "out", help = "Directory for the emitted script files")]
    out_dir: PathBuf,
}

impl Cli {
    fn to_config(&self) -> SearchConfig {
        SearchConfig {
            total_keep: self.total_keep,
            score_keep_ratio: self.score_keep_ratio,
            score_parent_quota: self.score_parent_quota.clone(),
            score_height_quota: self.score_height_quota,
            quality_parent_quota: self.quality_parent_quota.clone(),
            quality_height_quota: self.quality_height_quota,
            ignore_score_threshold: self.ignore_score_threshold,
            ignore_height_threshold: self.ignore_height_threshold,
            quality: QualityWeights {
                row_transition: self.row_transition_penalty,
                col_transition: self.col_transition_penalty,
                hole: self.hole_penalty,
                overhang: self.overhang_penalty,
            },
            abort_threshold: self.abort_threshold.clone(),
            threads: self.threads,
            max_steps: self.steps,
        }
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.to_config();
    info!(steps = config.max_steps, threads = config.threads, "starting search");
    let solution = solve(&config);

    println!("Final steps: {}", solution.final_board.step);
    println!("{}", solution.final_board);

    // The tuning harness parses these two lines.
    let trajectory: Vec<String> = solution.score_by_step.iter().map(u32::to_string).collect();
    println!("score_by_step={}", trajectory.join(","));
    println!("final_score={}", solution.final_board.score);

    let script = action::join(&solution.actions);
    let score = solution.final_board.score;

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let submit = cli.out_dir.join(format!("{score}.submit.js"));
    fs::write(
        &submit,
        format!(
            "axios.post(`api/upload`, {{record: '{script}', score: {score}}})\
             .then(({{data}}) => {{ console.log('upload result', data); \
             if (data.info) {{ console.log(data.info) }} }});\n"
        ),
    )
    .with_context(|| format!("writing {}", submit.display()))?;

    let replay = cli.out_dir.join(format!("{score}.replay.js"));
    fs::write(
        &replay,
        format!("game.pause();game.playRecord('{script}'.split(','));\n"),
    )
    .with_context(|| format!("writing {}", replay.display()))?;

    info!(submit = %submit.display(), replay = %replay.display(), "artifacts written");
    Ok(())
}
