//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! CLI supporting `split` and `convert`.
//!
//! Examples:
//! ```bash
//! textds-cli split   --config imdb.json                      # print partition sizes
//! textds-cli split   --config imdb.json --out splits/ -v     # also write train/dev/test.json
//! textds-cli split   --config imdb.json --cache-dir .cache   # cache token lengths
//! textds-cli convert data/xsum --text-name document          # dataset.json -> train.json
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use textds::constants::RAW_DATASET_JSON;
use textds::data_formats::{convert_list_of_dicts, write_json_lines};
use textds::{load_from_json_or_csv, LoadConfig, SplitSize};

/// Macro to safely print with broken pipe handling
macro_rules! safe_println {
    ($($arg:tt)*) => {
        match writeln!(io::stdout(), $($arg)*) {
            Ok(_) => {},
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                // Gracefully exit on broken pipe (e.g., when piped to head/tail)
                std::process::exit(0);
            }
            Err(e) => return Err(e.into())
        }
    };
}

// -- Commands

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short = 'v',
        long,
        action = ArgAction::Count,
        help = "Increase log verbosity: -v = Info, -vv = Debug",
    )]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a dataset and split it into train / dev / test.
    Split {
        /// JSON config with path, dataset_name, text_name, label_name, ...
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Directory for cached token lengths (quantile filtering only)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Write train.json, dev.json and test.json here
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Override the config seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override test_size_split (integer = rows, decimal = fraction)
        #[arg(long, value_parser = parse_split_size)]
        test_size: Option<SplitSize>,

        /// Override dev_size_split (integer = rows kept in train, decimal = fraction)
        #[arg(long, value_parser = parse_split_size)]
        dev_size: Option<SplitSize>,
    },

    /// Convert <DIR>/dataset.json into <DIR>/train.json.
    Convert {
        dir: PathBuf,

        /// Name of the text field; list values are joined with newlines
        #[arg(long)]
        text_name: String,
    },
}

/// `2` is a row count, `0.2` a fraction.
fn parse_split_size(s: &str) -> Result<SplitSize, String> {
    if let Ok(n) = s.parse::<usize>() {
        return Ok(SplitSize::Count(n));
    }
    s.parse::<f64>()
        .map(SplitSize::Fraction)
        .map_err(|_| format!("expected an integer or a decimal, got `{s}`"))
}

fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",        // no -v: WARN level
        1 => "info",        // -v: INFO level
        _ => "debug",       // -vv or more: DEBUG level
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Split { config, cache_dir, out, seed, test_size, dev_size } => {
            let mut cfg = LoadConfig::from_json_file(&config)
                .with_context(|| format!("loading config {}", config.display()))?;
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if test_size.is_some() {
                cfg.test_size_split = test_size;
            }
            if dev_size.is_some() {
                cfg.dev_size_split = dev_size;
            }

            let splits = load_from_json_or_csv(&cfg, cache_dir.as_deref())
                .with_context(|| format!("splitting dataset {}", cfg.dataset_dir().display()))?;

            safe_println!("train: {}", splits.train.len());
            if splits.dev_is_test() {
                safe_println!("dev:   {} (same rows as test)", splits.dev().len());
            } else {
                safe_println!("dev:   {}", splits.dev().len());
            }
            safe_println!("test:  {}", splits.test.len());

            if let Some(out) = out {
                fs::create_dir_all(&out)
                    .with_context(|| format!("creating {}", out.display()))?;
                let [train, dev, test] = splits.into_parts();
                for (name, ds) in [("train", &train), ("dev", &dev), ("test", &test)] {
                    let path = out.join(format!("{name}.json"));
                    write_json_lines(ds, &path)?;
                    info!("Wrote {} rows to {}", ds.len(), path.display());
                }
            }
        }

        Command::Convert { dir, text_name } => {
            let written = convert_list_of_dicts(&dir, RAW_DATASET_JSON, &text_name)
                .with_context(|| format!("converting {}", dir.join(RAW_DATASET_JSON).display()))?;
            safe_println!("{}", written.display());
        }
    }

    Ok(())
}
