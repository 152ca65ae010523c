//! Class keys of package files.

use crate::Error;
use once_cell::sync::Lazy;
use regex::Regex;

const DATA_STREAM_PATTERNS: &[(&str, &str)] = &[
    (r"^data_stream/[^/]+/", "data_stream/*/"),
    (r"/(pipeline|system)/test-[^/]+-config\.yml$", "/*/test-*-config.yml"),
    (r"/fields/[^/]+\.yml$", "/fields/*.yml"),
    (r"/ingest_pipeline/[^/]+\.yml$", "/ingest_pipeline/*.yml"),
];

static DATA_STREAM_RULES: Lazy<Result<Vec<(Regex, &'static str)>, regex::Error>> =
    Lazy::new(|| compile(DATA_STREAM_PATTERNS));

fn compile(
    patterns: &[(&str, &'static str)],
) -> Result<Vec<(Regex, &'static str)>, regex::Error> {
    patterns
        .iter()
        .map(|&(pattern, replacement)| Ok((Regex::new(pattern)?, replacement)))
        .collect()
}

/// The class key of a file from its `/` separated path relative to the
/// package root, `data_stream/logs/fields/ecs.yml` is of the class
/// `data_stream/*/fields/*.yml`.
///
/// Files outside of `data_stream/` are their own class.
pub fn class_for(relative_path: &str) -> Result<String, Error> {
    let mut class = relative_path.trim_start_matches("./").to_string();
    if class.starts_with("data_stream/") {
        let rules = DATA_STREAM_RULES
            .as_ref()
            .map_err(|err| Error::InvalidConventions(format!("invalid class pattern: {err}")))?;
        for (regex, replacement) in rules {
            class = regex.replace(&class, *replacement).into_owned();
        }
    }
    Ok(class)
}
