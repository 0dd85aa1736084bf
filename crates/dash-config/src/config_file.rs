use std::{
    env,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = ".homedash.toml";

/// Load config file content from CWD first, then home directory, then the
/// config directory.
///
/// Searches for:
/// 1. `./.homedash.toml`
/// 2. `~/.homedash.toml`
/// 3. `~/.config/homedash/config.toml`
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    read_first(&candidate_paths())
}

/// Every location a config file may live in, highest priority first
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    if let Ok(path) = crate::paths::app_config_path() {
        paths.push(path);
    }
    paths
}

/// Content of the first readable file in `paths`
pub fn read_first<P: AsRef<Path>>(paths: &[P]) -> Option<String> {
    paths.iter().find_map(|path| {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Some(content)
            }
            Err(_) => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_readable_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let home = dir.path().join("home.toml");
        let global = dir.path().join("global.toml");
        std::fs::write(&home, "from = 'home'").unwrap();
        std::fs::write(&global, "from = 'global'").unwrap();

        let content = read_first(&[missing, home, global]).unwrap();
        assert_eq!(content, "from = 'home'");
    }

    #[test]
    fn test_nothing_readable() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_first(&[dir.path().join("nope.toml")]), None);
    }
}
