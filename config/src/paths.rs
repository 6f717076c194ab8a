use std::path::PathBuf;

pub struct PathManager;

impl PathManager {
    /// Directory holding `config.toml`, `~/.docs-mcp` by default
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".docs-mcp"))
    }

    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }
}
