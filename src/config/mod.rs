//! Tool configuration management for `svgmux.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── sprite     # [sprite]
//! │   ├── build      # [build]
//! │   ├── optimize   # [optimize]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                             |
//! |--------------|-----------------------------------------------------|
//! | `[sprite]`   | Sprite identity (name, filename template, inputs)   |
//! | `[build]`    | Output directory, HTML-data manifest                |
//! | `[optimize]` | Optimizer switch and options                        |
//! | `[watch]`    | Watch-mode debounce                                 |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{BuildConfig, OptimizeConfig, SpriteConfig, WatchConfig};

// Re-export from types/
pub use types::{
    ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config,
};

use crate::cli::Cli;
use crate::log;
use crate::utils::path::resolve_path;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Cache directory name (inside project root)
pub const CACHE_DIR: &str = ".svgmux/cache";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgmux.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Verbose logging (from CLI, internal use only)
    #[serde(skip)]
    pub verbose: bool,

    /// Sprite identity and inputs
    #[serde(default)]
    pub sprite: SpriteConfig,

    /// Build output settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Optimizer settings
    #[serde(default)]
    pub optimize: OptimizeConfig,

    /// Watch-mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// For non-init commands, searches upward from cwd to find the config
    /// file. The project root is the config file's parent directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        // Validate config existence (skip for init)
        if !cli.is_init() && !exists {
            log!(
                "error";
                "config file `{}` not found. Run `svgmux init` to create one.",
                cli.config.display()
            );
            std::process::exit(1);
        }

        // Load or create default config
        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        // Set paths and apply CLI options
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        // Full validation (skip for init: no config file yet)
        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        if cli.is_init() {
            // Init creates the file in cwd, no upward search
            let path = std::env::current_dir()?.join(&cli.config);
            let exists = path.exists();
            return Ok((path, exists));
        }

        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((std::env::current_dir()?.join(&cli.config), false)),
        }
    }

    /// Parse config from a file, warning on unknown keys.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let de = toml::de::Deserializer::new(&raw);
        let mut unknown = Vec::new();
        let config: Self = serde_ignored::deserialize(de, |key| {
            unknown.push(key.to_string());
        })?;

        if !unknown.is_empty() {
            log!(
                "warning";
                "unknown config key{} ignored: {}",
                crate::utils::plural_s(unknown.len()),
                unknown.join(", ")
            );
        }

        Ok(config)
    }

    /// Finalize configuration after loading.
    ///
    /// Resolves the project root, applies CLI overrides, and normalizes
    /// all configured paths to absolute form.
    fn finalize(&mut self, cli: &Cli) {
        self.root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(args) = cli.build_args() {
            if let Some(optimize) = args.optimize {
                self.optimize.enabled = optimize;
            }
            if let Some(use_hash) = args.hash {
                self.sprite.use_hash = use_hash;
            }
            if let Some(output) = &args.output {
                self.build.output = output.clone();
            }
            self.verbose = args.verbose;
        }

        self.build.output = resolve_path(&self.build.output, &self.root);
        self.sprite.files = self
            .sprite
            .files
            .iter()
            .map(|f| resolve_path(f, &self.root))
            .collect();
    }

    /// Validate the finalized configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let diag = self.diagnostics();
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)?;
        Ok(())
    }

    /// Collect validation diagnostics from all sections.
    pub(crate) fn diagnostics(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        self.sprite.validate(&mut diag);
        self.build.validate(&mut diag);
        self.optimize.validate(&mut diag);
        self.watch.validate(&mut diag);
        diag
    }

    /// Output directory (absolute after finalize).
    #[inline]
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Cache directory for the persisted snapshot.
    #[inline]
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }
}

/// Parse a config fragment for section tests (no path resolution).
#[cfg(test)]
pub(crate) fn test_parse_config(raw: &str) -> Config {
    toml::from_str(raw).expect("test config should parse")
}
