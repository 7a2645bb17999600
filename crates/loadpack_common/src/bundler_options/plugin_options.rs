use std::path::PathBuf;

use serde::Deserialize;

/// A `plugins[]` directive: `{ "html": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum PluginOptions {
  Html(HtmlPluginOptions),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HtmlPluginOptions {
  /// Emitted file name, relative to `output.path`. Defaults to `index.html`.
  pub filename: Option<String>,
  /// Template file, relative to `context`.
  pub template: Option<PathBuf>,
  /// Whether `<script>` tags for the emitted chunks are added.
  pub inject: Option<bool>,
}
