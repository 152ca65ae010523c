//! Locating a package and its YAML files.

use anyhow::{anyhow, bail, Context};
use fleetfmt::{
    dom::{query_path, Document, QueryError},
    parser,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// A YAML file of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub path: PathBuf,
    /// The `/` separated path relative to the package root.
    pub relative: String,
}

/// Finds the root of the package containing `dir`, the closest directory
/// with a `manifest.yml` of `type: integration`.
pub fn find_root(dir: &Path) -> Result<PathBuf, anyhow::Error> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", dir.display()))?;
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let mut current = Some(dir.as_path());
    while let Some(d) = current {
        if is_root_dir(d)? {
            return Ok(d.to_path_buf());
        }
        current = d.parent();
    }
    Err(anyhow!("{} is not in a package", dir.display()))
}

/// Whether `dir` holds the manifest of an integration package.
pub fn is_root_dir(dir: &Path) -> Result<bool, anyhow::Error> {
    let path = dir.join("manifest.yml");
    if !path.is_file() {
        return Ok(false);
    }
    let source =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let p = parser::parse(&source);
    if let Some(error) = p.errors.first() {
        bail!("invalid manifest {}: {}", path.display(), error.message);
    }
    let body = match p.into_syntax().children().find_map(Document::cast).and_then(|d| d.body()) {
        Some(body) => body,
        None => return Ok(false),
    };
    match query_path(&body, "$.type") {
        Ok(node) => Ok(node.text_value() == "integration"),
        Err(QueryError::NotFound(_)) => {
            tracing::debug!(path = %path.display(), "manifest without a type");
            Ok(false)
        }
        Err(error) => Err(error.into()),
    }
}

/// The name of the package, the name of its root directory.
pub fn name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Every `.yml` file below the root, in lexical order.
pub fn files(root: &Path) -> Result<Vec<PackageFile>, anyhow::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file()
            || entry.path().extension().map_or(true, |ext| ext != "yml")
        {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(PackageFile {
            path: entry.path().to_path_buf(),
            relative,
        });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_find_root() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("pkg");
        write(&pkg, "manifest.yml", "name: pkg\ntype: integration\n");
        write(&pkg, "data_stream/logs/manifest.yml", "title: Logs\ntype: logs\n");

        let root = find_root(&pkg.join("data_stream/logs")).unwrap();
        assert_eq!(root, pkg.canonicalize().unwrap());
        assert_eq!(name(&root), "pkg");
    }

    #[test]
    fn test_not_in_a_package() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.yml", "name: input\ntype: input\n");
        assert!(!is_root_dir(dir.path()).unwrap());
        write(dir.path(), "sub/manifest.yml", "name: none\n");
        assert!(!is_root_dir(&dir.path().join("sub")).unwrap());
    }

    #[test]
    fn test_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.yml", "type: integration\n");
        write(dir.path(), "changelog.yml", "- version: 1.0.0\n");
        write(dir.path(), "data_stream/b/fields/fields.yml", "- name: a\n");
        write(dir.path(), "data_stream/a/manifest.yml", "title: A\n");
        write(dir.path(), "docs/README.md", "# readme\n");

        let files: Vec<String> = files(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.relative)
            .collect();
        assert_eq!(
            files,
            [
                "changelog.yml",
                "data_stream/a/manifest.yml",
                "data_stream/b/fields/fields.yml",
                "manifest.yml",
            ]
        );
    }
}
