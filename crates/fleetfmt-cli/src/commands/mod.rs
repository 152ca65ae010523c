pub use self::format::FormatCommand;
use crate::App;

mod format;

use clap::{Parser, ValueEnum};

impl App {
    pub fn execute(&mut self, args: AppArgs) -> Result<(), anyhow::Error> {
        self.colors = match args.colors {
            Colors::Auto => atty::is(atty::Stream::Stderr),
            Colors::Always => true,
            Colors::Never => false,
        };

        self.execute_format(args.format)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Colors {
    /// Determine whether to colorize output automatically.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

/// Formats the YAML source of an Elastic integration package.
///
/// Map field order and quote usage are canonicalised where possible, and
/// field definitions are ordered by name. Without a path the package
/// containing the working directory is processed.
///
/// By default the formatted files are written to the standard output as a
/// txtar archive for inspection.
#[derive(Debug, Clone, Parser)]
#[command(name = "fleetfmt", bin_name = "fleetfmt", version)]
pub struct AppArgs {
    #[arg(long, value_enum, global = true, default_value = "auto")]
    pub colors: Colors,
    /// Enable a verbose logging format.
    #[arg(long, global = true)]
    pub verbose: bool,
    /// Enable logging spans.
    #[arg(long, global = true)]
    pub log_spans: bool,
    #[command(flatten)]
    pub format: FormatCommand,
}
