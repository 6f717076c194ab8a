//! Configuration for the docs-mcp bridge.
//!
//! Settings come from three layers, lowest precedence first:
//! `~/.docs-mcp/config.toml`, environment variables (optionally seeded from
//! `.env` files), and finally CLI flags applied by the binary.

pub mod paths;
pub mod settings;

pub use paths::PathManager;
pub use settings::Settings;

/// Load environment variables from .env files.
///
/// `dotenv` never overwrites a variable that is already set, so the project
/// `.env` is loaded before `~/.env` to give it precedence. Variables already
/// present in the process environment win over both.
pub fn load_env_file() {
    dotenv::dotenv().ok();

    if let Some(home) = dirs::home_dir() {
        let home_env_path = home.join(".env");
        dotenv::from_path(home_env_path).ok();
    }
}
