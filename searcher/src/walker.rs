use anyhow::{Context, Result};
use docsearch_core::SearchConfig;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists every file under each root in traversal order, pruning ignored
/// directory names. An unreadable or missing root is a startup error;
/// unreadable entries below a root are skipped with a diagnostic.
pub fn list_files(roots: &[PathBuf], config: &SearchConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        // A root that cannot be opened (missing, not a directory, or
        // permission denied) fails startup instead of yielding an empty
        // result set.
        fs::read_dir(root)
            .with_context(|| format!("cannot read search root: {}", root.display()))?;
        walk_root(root, config, &mut files);
    }
    Ok(files)
}

fn walk_root(root: &Path, config: &SearchConfig, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .into_iter()
        .filter_entry(|entry| {
            // The root itself is never pruned by name.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            match entry.file_name().to_str() {
                Some(name) => !config.ignores_dir(name),
                None => true,
            }
        });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => tracing::warn!(%err, "skipping unreadable entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_root_is_an_error() {
        let config = SearchConfig::default();
        let err = list_files(&[PathBuf::from("/no/such/dir")], &config);
        assert!(err.is_err());
    }

    #[test]
    fn non_directory_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "not a directory").unwrap();
        let err = list_files(&[file], &SearchConfig::default()).unwrap_err();
        assert!(err.to_string().contains("cannot read search root"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_root_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("locked");
        fs::create_dir(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

        // Root bypasses permission checks, so only assert the error when
        // the environment actually enforces them.
        let enforced = fs::read_dir(&root).is_err();
        let result = list_files(&[root.clone()], &SearchConfig::default());
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert!(result.is_err());
        } else {
            assert!(result.unwrap().is_empty());
        }
    }

    #[test]
    fn walks_files_and_prunes_ignored_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("top.txt"), "top").unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join(".git/config"), "hidden").unwrap();

        let config = SearchConfig { ignore_dirs: vec![".Git".into()], ..SearchConfig::default() };
        let files = list_files(&[dir.path().to_path_buf()], &config).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("top.txt")));
        assert!(files.iter().any(|p| p.ends_with("src/main.rs")));
        assert!(!files.iter().any(|p| p.to_string_lossy().contains(".git")));
    }
}
