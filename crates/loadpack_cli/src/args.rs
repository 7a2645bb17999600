use std::path::PathBuf;

use clap::Args;
use loadpack::DEFAULT_CONFIG_FILE;

#[derive(Args)]
pub struct ConfigArgs {
  /// JSON configuration file.
  #[clap(long, short = 'c', default_value = DEFAULT_CONFIG_FILE)]
  pub config: PathBuf,
}

#[derive(Args)]
pub struct OverrideArgs {
  /// Replaces `output.path`, relative to the working directory.
  #[clap(long, short = 'o')]
  pub output_path: Option<PathBuf>,

  /// Replaces `devtool`, e.g. `eval-source-map` or `false`.
  #[clap(long, short = 'd')]
  pub devtool: Option<String>,

  /// Skip the asset summary.
  #[clap(long, short = 's')]
  pub silent: bool,
}
