//! `init` command: write a starter config file.

use std::fs;

use anyhow::{Result, bail};

use crate::config::Config;
use crate::log;

/// Starter configuration written by `svgmux init`.
const STARTER_CONFIG: &str = r#"# svgmux configuration
# Every path is relative to this file's directory.

[sprite]
name = "svg-sprite"
file_name = "[name].[hash].svg"
use_hash = false
# Ordered inputs; directory entries expand to their .svg files, sorted.
files = []

[build]
output = "dist"
manifest = true

[optimize]
enabled = false
dpi = 96.0

[watch]
debounce_ms = 100
"#;

/// Write the starter config, refusing to overwrite without `--force`.
pub fn init_config_file(config: &Config, force: bool) -> Result<()> {
    let path = &config.config_path;

    if path.exists() && !force {
        bail!(
            "`{}` already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::write(path, STARTER_CONFIG)?;
    log!("init"; "wrote {}", path.display());
    log!("init"; "add inputs to `sprite.files`, then run `svgmux build`");
    Ok(())
}
