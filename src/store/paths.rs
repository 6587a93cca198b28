use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the per-project / per-user data directory
pub const DATA_DIR_NAME: &str = ".timepunch";

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "timepunch.db";

/// Log file used while the TUI owns the terminal
pub const LOG_FILE: &str = "timepunch.log";

/// Environment variable that overrides the database location
pub const DB_ENV_VAR: &str = "TIMEPUNCH_DB";

/// Get the data directory - checks for a local .timepunch first, then falls back to ~/.timepunch
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find a local .timepunch directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .timepunch directory in the current directory
pub fn init_local_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let data_dir = current_dir.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Resolve the database path: explicit flag, then $TIMEPUNCH_DB, then the data directory
pub fn database_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let chosen = explicit.or_else(|| {
        env::var_os(DB_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });

    match chosen {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            Ok(path)
        }
        None => Ok(ensure_data_dir()?.join(DATABASE_FILE)),
    }
}

/// Log file next to the database
pub fn log_file_for(db_path: &Path) -> PathBuf {
    match db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.join(LOG_FILE),
        None => PathBuf::from(LOG_FILE),
    }
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir().context("Could not determine current directory")?,
    };

    let mut temp_file = NamedTempFile::new_in(&dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_local_data_dir_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join(DATA_DIR_NAME);
        fs::create_dir_all(&data_dir).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_data_dir(&nested), Some(data_dir));
    }

    #[test]
    fn test_database_path_explicit_creates_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = temp_dir.path().join("nested").join("tracker.db");

        let resolved = database_path(Some(db.clone())).unwrap();
        assert_eq!(resolved, db);
        assert!(temp_dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_log_file_sits_next_to_database() {
        let log = log_file_for(Path::new("/tmp/tp/timepunch.db"));
        assert_eq!(log, PathBuf::from("/tmp/tp/timepunch.log"));
        assert_eq!(log_file_for(Path::new("timepunch.db")), PathBuf::from(LOG_FILE));
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("summary.txt");

        atomic_write(&file, "first").unwrap();
        atomic_write(&file, "second").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "second");
    }
}
