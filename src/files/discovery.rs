//! Expansion of command line paths into trace file paths.
//!
//! Files named explicitly are taken as given; directories contribute their
//! immediate `*.appmap.json` children. Any path that can't be inspected
//! aborts the whole lookup.

use crate::utils::config::TRACE_FILE_SUFFIX;
use crate::utils::error::DiscoveryError;
use log::debug;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// Predicate over candidate files, e.g. a size limit
pub type Validator = Box<dyn Fn(&Path, &Metadata) -> bool>;

/// Reject files larger than `limit` bytes
pub fn max_size(limit: u64) -> Validator {
    Box::new(move |path, meta| {
        let ok = meta.len() <= limit;
        if !ok {
            debug!("Skipping {} ({} bytes > {})", path.display(), meta.len(), limit);
        }
        ok
    })
}

/// Find trace files under the given paths
///
/// **Public** - used by the stats and upload commands
///
/// # Returns
/// Trace file paths in argument order; directory entries sorted by name
///
/// # Errors
/// * `DiscoveryError::Stat` - a path does not exist or can't be inspected
/// * `DiscoveryError::ReadDir` - a directory can't be listed
pub fn find_trace_files<P: AsRef<Path>>(
    paths: &[P],
    validators: &[Validator],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut found = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|source| DiscoveryError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if meta.is_dir() {
            found.extend(load_directory(path, validators)?);
        } else if meta.is_file() && validate(path, &meta, validators) {
            found.push(path.to_path_buf());
        }
    }

    debug!("Found {} trace file(s)", found.len());
    Ok(found)
}

fn load_directory(dir: &Path, validators: &[Validator]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let read_dir_error = |source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();

        let is_trace = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(TRACE_FILE_SUFFIX));
        if !is_trace {
            continue;
        }

        let meta = entry.metadata().map_err(read_dir_error)?;
        if meta.is_file() && validate(&path, &meta, validators) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn validate(path: &Path, meta: &Metadata, validators: &[Validator]) -> bool {
    validators.iter().all(|v| v(path, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_fails() {
        let result = find_trace_files(&["no/such/path"], &[]);
        assert!(matches!(result, Err(DiscoveryError::Stat { .. })));
    }

    #[test]
    fn test_directory_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.appmap.json"), "{}").unwrap();
        fs::write(dir.path().join("a.appmap.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested.appmap.json")).unwrap();

        let found = find_trace_files(&[dir.path()], &[]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.appmap.json", "b.appmap.json"]);
    }

    #[test]
    fn test_explicit_file_kept_regardless_of_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(find_trace_files(&[&path], &[]).unwrap(), vec![path]);
    }

    #[test]
    fn test_size_validator() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("small.appmap.json"), "{}").unwrap();
        fs::write(dir.path().join("large.appmap.json"), "x".repeat(100)).unwrap();

        let found = find_trace_files(&[dir.path()], &[max_size(10)]).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("small.appmap.json"));
    }
}
