//! Main entry point for the zippack CLI app

use std::io::Write;

use tracing_subscriber::EnvFilter;
use zippack::cli::{self, Commands};
use zippack::{PackOptions, Pipeline};

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_app() {
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            // Prints help/usage to the right stream and exits with clap's code.
            clap_err.exit();
        }
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::run()?;

    match args.command {
        Commands::Create {
            inputs,
            output,
            level,
            threads,
            quiet,
        } => {
            let mut pipeline = Pipeline::new(PackOptions { level, threads });
            if !quiet {
                pipeline = pipeline.with_progress(|pct| {
                    eprint!("\r[pack] {:>5.1}%", pct);
                    let _ = std::io::stderr().flush();
                });
            }

            let report = pipeline.run(&inputs, &output)?;
            if !quiet && report.inputs > 0 {
                eprintln!();
            }
            println!(
                "Archived {} of {} file(s) → {}",
                report.entries_written,
                report.inputs,
                output.display()
            );
            if report.skipped() > 0 {
                eprintln!("Warning: {} input(s) were skipped", report.skipped());
            }
        }
        Commands::List { archive } => {
            let entries = zippack::archive::list_entries(&archive)?;
            println!("Archive contents ({} entries):", entries.len());
            for (name, size) in entries {
                println!("- {} ({} bytes)", name, size);
            }
        }
    }

    Ok(())
}
