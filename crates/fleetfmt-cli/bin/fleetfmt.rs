use clap::Parser;
use fleetfmt_cli::{
    commands::{AppArgs, Colors},
    log::setup_stderr_logging,
    App,
};
use std::process::exit;

fn main() {
    let cli = AppArgs::parse();
    setup_stderr_logging(
        cli.log_spans,
        cli.verbose,
        match cli.colors {
            Colors::Auto => None,
            Colors::Always => Some(true),
            Colors::Never => Some(false),
        },
    );

    let _span = tracing::info_span!("fleetfmt").entered();
    match App::new().execute(cli) {
        Ok(_) => {
            exit(0);
        }
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "operation failed");
            exit(1);
        }
    }
}
