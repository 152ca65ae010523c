use crate::{package, txtar::Archive, App};

use anyhow::{anyhow, Context};
use clap::Args;
use codespan_reporting::files::SimpleFile;
use fleetfmt::{classify::class_for, conventions::Conventions, formatter, parser};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Name of the conventions file looked up at the package root.
pub const CONFIG_FILE_NAME: &str = ".fleetfmt.yml";

impl App {
    #[tracing::instrument(skip_all)]
    pub fn execute_format(&mut self, cmd: FormatCommand) -> Result<(), anyhow::Error> {
        let mut result = Ok(());
        let mut archive = Archive::default();

        for path in &cmd.paths {
            let root = match package::find_root(path) {
                Ok(root) => root,
                Err(error) => {
                    tracing::error!(error = %format!("{error:#}"), "skipping path");
                    result = Err(anyhow!("some paths were skipped"));
                    continue;
                }
            };
            if let Err(error) = self.format_package(&cmd, &root, &mut archive) {
                if result.is_ok() {
                    result = Err(error);
                }
            }
        }

        if !cmd.check && !cmd.write {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(archive.to_string().as_bytes())?;
            stdout.flush()?;
        }

        result
    }

    /// Formats the files of the package at `root`, adding them to `archive`
    /// when neither writing nor checking.
    #[tracing::instrument(skip_all, fields(root = %root.display()))]
    fn format_package(
        &mut self,
        cmd: &FormatCommand,
        root: &Path,
        archive: &mut Archive,
    ) -> Result<(), anyhow::Error> {
        let conventions = self.load_conventions(cmd, root)?;
        let options = self.format_options(cmd, &conventions)?;
        let name = package::name(root);
        tracing::debug!("found package");

        let mut result = Ok(());

        for file in package::files(root)? {
            let class = class_for(&file.relative)?;
            let passes = match conventions.passes(&class) {
                Some(passes) => passes,
                None => {
                    tracing::trace!(path = %file.relative, "no conventions for file");
                    continue;
                }
            };
            let source = fs::read_to_string(&file.path)
                .with_context(|| format!("failed to read {}", file.path.display()))?;

            let p = parser::parse(&source);
            if !p.errors.is_empty() {
                self.print_parse_errors(
                    &SimpleFile::new(file.relative.as_str(), source.as_str()),
                    &p.errors,
                )?;
                result = Err(anyhow!("some files were not formatted due to syntax errors"));
                continue;
            }

            let formatted = match formatter::format_syntax(p.into_syntax(), passes, &options) {
                Ok(formatted) => formatted,
                Err(error) => {
                    tracing::error!(path = %file.relative, %error, "failed to format file");
                    result = Err(anyhow!("some files could not be formatted"));
                    continue;
                }
            };

            if cmd.check {
                if source != formatted {
                    tracing::error!(path = %file.relative, "the file is not properly formatted");
                    result = Err(anyhow!("some files were not properly formatted"));
                }
            } else if cmd.write {
                if source != formatted {
                    fs::write(&file.path, formatted.as_bytes())
                        .with_context(|| format!("failed to write {}", file.path.display()))?;
                    tracing::info!(path = %file.relative, "formatted");
                }
            } else {
                archive.push(format!("{name}/{}", file.relative), formatted);
            }
        }

        result
    }

    fn load_conventions(&self, cmd: &FormatCommand, root: &Path) -> Result<Conventions, anyhow::Error> {
        let path = match &cmd.config {
            Some(path) => Some(path.clone()),
            None if cmd.no_auto_config => None,
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|path| path.is_file()),
        };
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using conventions file");
                let source = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Conventions::from_yaml(&source)
                    .with_context(|| format!("failed to load {}", path.display()))
            }
            None => Ok(Conventions::fleet()),
        }
    }

    fn format_options(
        &self,
        cmd: &FormatCommand,
        conventions: &Conventions,
    ) -> Result<formatter::Options, anyhow::Error> {
        let mut format_opts = formatter::Options::default();
        format_opts.update(conventions.options.clone());
        format_opts.update_from_str(cmd.options.iter().filter_map(|s| {
            let mut split = s.split('=');
            let k = split.next();
            let v = split.next();

            if let (Some(k), Some(v)) = (k, v) {
                Some((k, v))
            } else {
                tracing::error!(option = %s, "malformed formatter option");
                None
            }
        }))?;

        Ok(format_opts)
    }
}

#[derive(Debug, Clone, Args)]
pub struct FormatCommand {
    /// Write the result to the source files instead of the standard output.
    #[arg(short, long, conflicts_with = "check")]
    pub write: bool,

    /// Dry-run and report any files that are not correctly formatted.
    #[arg(long)]
    pub check: bool,

    /// Path to a conventions file replacing the built-in rules.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Do not look for a conventions file at the package root.
    #[arg(long)]
    pub no_auto_config: bool,

    /// A formatter option given as a "key=value", can be set multiple times.
    #[arg(long = "option", short)]
    pub options: Vec<String>,

    /// Directories inside of the packages to format, each package is
    /// processed once per path.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}
