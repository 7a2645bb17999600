use std::path::PathBuf;

use loadpack_utils::indexmap::FxIndexMap;

use crate::{Devtool, FilenameTemplate, ModuleRule, PluginOptions};

#[derive(Debug, Clone)]
pub struct EntryItem {
  pub name: String,
  pub import: String,
}

/// The validated, immutable configuration every build stage reads.
#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub context: PathBuf,
  pub entries: Vec<EntryItem>,

  // --- Output
  pub output_path: PathBuf,
  pub output_filename: FilenameTemplate,

  // --- Resolve
  pub extensions: Vec<String>,
  pub alias: Vec<(String, String)>,
  pub loader_alias: FxIndexMap<String, String>,

  // --- Module
  pub rules: Vec<ModuleRule>,

  // --- Enhance
  pub plugins: Vec<PluginOptions>,
  pub devtool: Devtool,
}
