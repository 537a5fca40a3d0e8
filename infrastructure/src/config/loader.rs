//! Configuration loader with multi-source merging

use super::client_config::ClientConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Prefix of the environment variables read by [`ConfigLoader::load`].
pub const ENV_PREFIX: &str = "CLAUDE_WEB_";

/// Project-level file names, checked in order.
const PROJECT_FILES: [&str; 2] = ["claude-web.toml", ".claude-web.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `CLAUDE_WEB_SESSION_KEY`, `CLAUDE_WEB_PROXY`, ...
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./claude-web.toml` or `./.claude-web.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/claude-web/config.toml` (or platform equivalent)
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<ClientConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        figment.extract().map_err(Box::new)
    }

    /// Load a single file on top of the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<ClientConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(ClientConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("claude-web").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}
