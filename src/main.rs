use anyhow::Result;
use clap::Parser;
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;
use yearsort::yearsort_core::{
    AssumeYes, Cli, Commands, ConflictResolver, OrganizeConfig, PromptResolver, YearLookup,
    YearsortError, extract_year, format_report, organize,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers; stdout is reserved for reports
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("yearsort.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    log::debug!("Parsed arguments: {:?}", cli);

    match cli.command {
        Commands::Organize {
            source_dir,
            destination_dir,
            conflict,
            yes,
            backend,
            output,
        } => {
            let config = OrganizeConfig {
                source: source_dir,
                destination: destination_dir,
                conflict_policy: conflict,
            };

            let mut reader = backend.open()?;
            let mut resolver: Box<dyn ConflictResolver> = if yes {
                Box::new(AssumeYes)
            } else {
                Box::new(PromptResolver::stdio())
            };

            let report = organize(&config, reader.as_mut(), resolver.as_mut())?;
            println!("{}", format_report(&report, &output)?);

            if report.failed() > 0 {
                return Err(YearsortError::MoveFailed(report.failed()).into());
            }
        }

        Commands::Year { files, backend } => {
            let mut reader = backend.open()?;

            for file in &files {
                match extract_year(reader.as_mut(), file) {
                    YearLookup::Year(year) => println!("{}: {}", file.display(), year),
                    YearLookup::NoYear(reason) => {
                        println!("{}: no year ({})", file.display(), reason)
                    }
                }
            }
        }
    }

    Ok(())
}
