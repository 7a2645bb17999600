use std::path::Path;

use anyhow::Context;
use loadpack_error::BuildResult;
use sugar_path::SugarPath;

use crate::BundlerOptions;

pub const DEFAULT_CONFIG_FILE: &str = "loadpack.config.json";

impl BundlerOptions {
  /// Read a JSON config file. A missing or relative `context` is anchored at
  /// the directory holding the file.
  pub fn from_config_file(path: &Path) -> BuildResult<Self> {
    let path = path.absolutize();
    let content = std::fs::read_to_string(&path)
      .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let mut options = Self::from_json(&content)
      .with_context(|| format!("Invalid config file {}", path.display()))?;

    let config_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    options.context = Some(match options.context.take() {
      Some(context) if context.is_absolute() => context,
      Some(context) => config_dir.join(context).normalize(),
      None => config_dir,
    });

    Ok(options)
  }

  pub fn from_json(content: &str) -> anyhow::Result<Self> {
    Ok(serde_json::from_str(content)?)
  }
}
