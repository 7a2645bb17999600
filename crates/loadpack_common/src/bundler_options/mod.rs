pub mod config_file;
pub mod devtool;
pub mod es_target;
pub mod filename_template;
pub mod module_rule;
pub mod normalized_bundler_options;
pub mod plugin_options;

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::PluginOptions;

/// The configuration descriptor as written by the user.
///
/// Every field is optional here; `normalize_options` fills in defaults and
/// validates the result into a `NormalizedBundlerOptions`.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BundlerOptions {
  /// Base directory for every relative path below. Defaults to the directory
  /// holding the config file, or the current directory.
  pub context: Option<PathBuf>,
  pub entry: Option<EntryOptions>,
  pub output: Option<OutputOptions>,
  pub resolve: Option<ResolveOptions>,
  pub resolve_loader: Option<ResolveLoaderOptions>,
  pub module: Option<ModuleOptions>,
  pub plugins: Option<Vec<PluginOptions>>,
  pub devtool: Option<DevtoolOption>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntryOptions {
  /// `"./src/app.js"`, bundled under the name `main`.
  Single(String),
  /// `{ "app": "./src/app.js" }`
  Named(IndexMap<String, String>),
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputOptions {
  pub path: Option<PathBuf>,
  pub filename: Option<String>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveOptions {
  pub extensions: Option<Vec<String>>,
  pub alias: Option<IndexMap<String, String>>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveLoaderOptions {
  pub alias: Option<IndexMap<String, String>>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleOptions {
  pub rules: Option<Vec<RuleOptions>>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleOptions {
  /// Regular expression matched against the absolute resource path.
  pub test: Option<String>,
  pub loader: Option<String>,
  /// Loader chain, applied from last to first.
  #[serde(rename = "use")]
  pub use_: Option<Vec<String>>,
  pub include: Option<OneOrMany<PathBuf>>,
  pub exclude: Option<OneOrMany<PathBuf>>,
  pub options: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
  One(T),
  Many(Vec<T>),
}

impl<T> OneOrMany<T> {
  pub fn into_vec(self) -> Vec<T> {
    match self {
      Self::One(item) => vec![item],
      Self::Many(items) => items,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DevtoolOption {
  Enabled(bool),
  Name(String),
}
