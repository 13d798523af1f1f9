// Filesystem path utilities.
// Constructs paths for per-user cache entries and the durable history file.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "ghstats")
}

/// Get the base cache directory (~/.cache/ghstats on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the durable history document, under the platform data dir.
pub fn history_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("history.json"))
}

/// Per-user cache path rooted at an explicit cache directory.
pub fn user_repos_path_in(cache_dir: &std::path::Path, username: &str) -> PathBuf {
    cache_dir
        .join("users")
        .join(format!("{}.json", sanitize_name(username)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("simple"), "simple");
        assert_eq!(sanitize_name("with/slash"), "with_slash");
        assert_eq!(sanitize_name("who?"), "who_");
    }

    #[test]
    fn test_user_repos_path_layout() {
        let path = user_repos_path_in(std::path::Path::new("/tmp/cache"), "octo");
        assert!(path.ends_with("users/octo.json"));

        let odd = user_repos_path_in(std::path::Path::new("/tmp/cache"), "a/b");
        assert!(odd.ends_with("users/a_b.json"));
    }
}
