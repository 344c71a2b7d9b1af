use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use class_finder::cli;
use class_finder::logging::{self, Verbosity};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    let config = args.load_config()?;
    let output = cli::run(&args, config)?;

    match &args.output_file {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => print!("{output}"),
    }

    Ok(())
}
