//! Configuration for a deminify run
//!
//! Settings are layered, later layers winning: built-in defaults, the user
//! file in the platform config directory, the project file (`./demin.toml` or
//! an explicit `--config` path), and finally command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::dirs::{CONFIG_FILE_NAME, user_config_file};

/// Controls whether non-fatal diagnostics are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logging {
    /// Only fatal errors are reported
    None,
    /// Unhandled `define()` shapes, naming collisions and emitted modules are reported
    #[default]
    Verbose,
}

impl Logging {
    pub fn is_verbose(self) -> bool {
        matches!(self, Logging::Verbose)
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Folder receiving one file per module
    pub output_folder: Option<PathBuf>,
    /// Skip all filesystem writes
    pub dry: bool,
    /// Remove the output folder before the first write (ignored when `dry`)
    pub clean: bool,
    /// Maximum number of modules emitted; `None` means unlimited
    pub limit: Option<usize>,
    /// Post-process emitted code with the external `prettier` formatter
    pub prettier: bool,
    pub logging: Logging,
}

/// On-disk shape of a config file; every key is optional so files can be layered
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    output_folder: Option<PathBuf>,
    dry: Option<bool>,
    clean: Option<bool>,
    limit: Option<i64>,
    prettier: Option<bool>,
    logging: Option<Logging>,
}

/// Convert a signed limit where any negative value means "unlimited"
pub fn limit_from_signed(raw: i64) -> Option<usize> {
    usize::try_from(raw).ok()
}

impl Config {
    /// Load the layered configuration.
    ///
    /// When `explicit` is given it replaces the project-level `./demin.toml`
    /// lookup and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_file) = user_config_file().filter(|path| path.is_file()) {
            log::debug!("Loading user config from {}", user_file.display());
            config.apply_file(&user_file)?;
        }

        match explicit {
            Some(path) => config.apply_file(path)?,
            None => {
                let project_file = Path::new(CONFIG_FILE_NAME);
                if project_file.is_file() {
                    log::debug!("Loading project config from {}", project_file.display());
                    config.apply_file(project_file)?;
                }
            }
        }

        Ok(config)
    }

    /// Parse a config file and merge its keys over the current values
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        self.apply_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Merge the keys of a TOML document over the current values
    pub fn apply_str(&mut self, content: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(content)?;
        if let Some(output_folder) = file.output_folder {
            self.output_folder = Some(output_folder);
        }
        if let Some(dry) = file.dry {
            self.dry = dry;
        }
        if let Some(clean) = file.clean {
            self.clean = clean;
        }
        if let Some(limit) = file.limit {
            self.limit = limit_from_signed(limit);
        }
        if let Some(prettier) = file.prettier {
            self.prettier = prettier;
        }
        if let Some(logging) = file.logging {
            self.logging = logging;
        }
        Ok(())
    }

    /// The configured output folder, required for every run
    pub fn output_folder(&self) -> Result<&Path> {
        self.output_folder.as_deref().ok_or_else(|| {
            anyhow!("No output folder configured; pass --output or set `output-folder`")
        })
    }
}
