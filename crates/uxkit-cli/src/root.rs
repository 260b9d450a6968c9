use std::path::{Path, PathBuf};

/// Resolve the uxkit project root.
///
/// Priority:
/// 1. `--root` flag / `UXKIT_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.uxkit/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_root_from(explicit, &cwd)
}

fn resolve_root_from(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    find_upward(cwd, uxkit_core::paths::UXKIT_DIR)
        .or_else(|| find_upward(cwd, ".git"))
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// First ancestor of `start` (inclusive) containing a `marker` directory.
fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root_from(Some(dir.path()), Path::new("/"));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_uxkit_dir_above_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".uxkit")).unwrap();
        let subdir = dir.path().join("research/notes");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(resolve_root_from(None, &subdir), dir.path());
    }

    #[test]
    fn uxkit_dir_beats_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("apps/web");
        std::fs::create_dir_all(nested.join(".uxkit")).unwrap();

        assert_eq!(resolve_root_from(None, &nested), nested);
        assert_eq!(resolve_root_from(None, &dir.path().join("apps")), dir.path());
    }
}
