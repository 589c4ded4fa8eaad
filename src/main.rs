use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use jsmin::{minify_with, MinifyOptions, MinifyPipeline, MinifyState};

#[derive(Parser)]
#[command(name = "jsmin")]
#[command(author, version, about = "Remove comments and insignificant whitespace from JavaScript", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Minify a script (stdin to stdout by default)
    Minify {
        /// Read from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Replace the input file with its minified form
        #[arg(long, requires = "input")]
        in_place: bool,

        /// Lines to prepend as `//` comments
        comments: Vec<String>,
    },

    /// Minify a file in memory and report problems and size savings
    Check {
        /// The script to check
        input: PathBuf,

        /// Also check that the token sequence is unchanged
        #[arg(long)]
        verify: bool,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Minify {
            input,
            output,
            in_place,
            comments,
        } => {
            let options = MinifyOptions::new().with_header_comments(comments);
            if let Err(e) = minify(input, output, in_place, &options) {
                eprintln!("JSMIN Error: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Check {
            input,
            verify,
            json,
        } => match check(input, verify, json) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                eprintln!("{}: {:#}", "error".red().bold(), e);
                std::process::exit(1);
            }
        },
    }
}

fn minify(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    in_place: bool,
    options: &MinifyOptions,
) -> Result<()> {
    let reader: Box<dyn Read> = match &input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let reader = BufReader::new(reader);

    if in_place {
        let path = input
            .as_deref()
            .context("--in-place needs an input file")?;
        return minify_in_place(reader, path, options);
    }

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            minify_with(reader, file, options)?;
        }
        None => {
            minify_with(reader, io::stdout().lock(), options)?;
        }
    }
    Ok(())
}

/// Write to a temporary file next to `path`, then rename over it.
fn minify_in_place<R: Read>(reader: R, path: &Path, options: &MinifyOptions) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;
    minify_with(reader, temp.as_file_mut(), options)?;
    temp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    log::debug!("rewrote {}", path.display());
    Ok(())
}

/// Returns whether the file minified (and verified) cleanly.
fn check(input: PathBuf, verify: bool, json: bool) -> Result<bool> {
    log::info!("Checking {:?}", input);

    let state = MinifyState::new(&input)?;
    let mut pipeline = MinifyPipeline::new(state, MinifyOptions::new());
    let output = pipeline.run(verify);
    pipeline.report_errors()?;

    let Some(output) = output else {
        return Ok(false);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output.stats)?);
    } else {
        println!(
            "{}: {} -> {} bytes ({:.1}% smaller)",
            "success".green().bold(),
            output.stats.input_bytes,
            output.stats.output_bytes,
            output.stats.reduction_pct
        );
        if let Some(count) = output.verified_tokens {
            println!("{}: {} tokens unchanged", "verified".green().bold(), count);
        }
    }
    Ok(true)
}
