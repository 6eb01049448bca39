// Cache path utilities.
// Default directories and the file names used inside them.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File holding the JSON array of the last fetched quotes.
pub const QUOTES_FILE: &str = "quotes_cache.json";

/// Key-value file holding the last fetch timestamp.
pub const PREFS_FILE: &str = "quotes_cache.prefs.json";

/// Key of the last fetch timestamp inside [`PREFS_FILE`].
pub const LAST_UPDATE_KEY: &str = "last_update_timestamp";

/// File holding appearance preferences.
pub const APPEARANCE_FILE: &str = "appearance.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "codebuzz", "flipquotes")
}

/// Get the base cache directory (~/.cache/flipquotes on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the data directory for user state (likes, bookmarks, appearance).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the cached quotes inside `dir`.
pub fn quotes_path(dir: &Path) -> PathBuf {
    dir.join(QUOTES_FILE)
}

/// Path to the timestamp key-value file inside `dir`.
pub fn prefs_path(dir: &Path) -> PathBuf {
    dir.join(PREFS_FILE)
}

/// Path to the appearance preferences inside `dir`.
pub fn appearance_path(dir: &Path) -> PathBuf {
    dir.join(APPEARANCE_FILE)
}
