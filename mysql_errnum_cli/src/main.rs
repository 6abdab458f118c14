use clap::Parser;
use mysql_errnum::config::{LoggingPreferences, OutputPreferences};
use mysql_errnum_cli::{run, Cli, Outcome};
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = LoggingPreferences::default()
        .min_log_level
        .raised_by(cli.verbose);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    let mut preferences = OutputPreferences::default();
    if let Some(format) = cli.format {
        preferences.format = format;
    }
    log::debug!(
        "Output format {}, compiled table for MySQL {}",
        preferences.format.as_str(),
        mysql_errnum::config::build_info::server_version()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run(&cli, &preferences, &mut out)?;
    out.flush()?;

    if outcome == Outcome::Unknown {
        std::process::exit(outcome.exit_code());
    }
    Ok(())
}
