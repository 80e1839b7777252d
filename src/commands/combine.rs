//! Combine command implementation
//!
//! Runs the full merge pipeline once:
//! 1. Read the source manifest
//! 2. Reconcile namespaces and extract keyed entries per source
//! 3. Order entries by their references
//! 4. Write the combined dictionary if its content changed

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the combine command
#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Manifest listing one source dictionary path per line
    #[arg(short, long, value_name = "PATH", env = "XAML_COMBINE_SOURCES")]
    pub sources: PathBuf,

    /// Path of the combined output dictionary
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Base directory for resolving relative paths (defaults to current directory)
    #[arg(short, long, value_name = "PATH")]
    pub base_dir: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the combine command
pub fn execute(args: CombineArgs) -> Result<()> {
    use std::time::Instant;

    let start_time = Instant::now();

    let base_dir = match args.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let report = xaml_combine::combine(&args.sources, &args.output, &base_dir)?;

    if !args.quiet {
        let duration = start_time.elapsed();
        if report.written {
            println!(
                "Combined {} resources from {} sources into {} in {:.2?}",
                report.entries,
                report.sources,
                args.output.display(),
                duration
            );
        } else {
            println!("{} is up to date", args.output.display());
        }
    }

    Ok(())
}
