use anyhow::Result;
use clap::Parser;
use repo_ingest_cli::{open_output, JsonLinesSink, Pipeline, DEFAULT_PROGRESS_EVERY};
use repo_ingest_scanner::{ScanOptions, DEFAULT_MAX_FILE_SIZE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repo-ingest")]
#[command(about = "Split a repository into structural code chunks (JSON lines)", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository root to scan
    #[arg(long, default_value = "..")]
    repo_path: PathBuf,

    /// Output file (`-` for stdout)
    #[arg(short, long, default_value = "chunks.jsonl")]
    output: PathBuf,

    /// Extra path segments or globs to ignore
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Walk the whole tree even inside a git repository
    #[arg(long)]
    no_vcs: bool,

    /// Log progress every N chunks (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    progress_every: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut options = ScanOptions::new(&cli.repo_path)
        .max_file_size(cli.max_file_size)
        .use_vcs(!cli.no_vcs);
    for pattern in cli.ignore {
        options = options.ignore(pattern);
    }

    let pipeline = Pipeline::new(options)?.progress_every(cli.progress_every);
    let mut sink = JsonLinesSink::new(open_output(&cli.output)?);
    pipeline.run(&mut sink)?;

    if cli.output.as_os_str() != "-" {
        log::info!("Wrote {} chunks to {}", sink.written(), cli.output.display());
    }
    Ok(())
}
