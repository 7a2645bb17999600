#![allow(dead_code)]

use std::path::Path;

use loadpack::{BundleOutput, Bundler, BundlerOptions, LoaderRegistry, OutputAsset};
use tempfile::TempDir;

/// A throwaway project directory holding `files`.
pub fn project(files: &[(&str, &str)]) -> TempDir {
  let dir = tempfile::tempdir().unwrap();
  for (path, content) in files {
    let path = dir.path().join(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }
  dir
}

/// Options parsed from `config`, anchored at `dir`.
pub fn options(dir: &Path, config: &str) -> BundlerOptions {
  let mut options = BundlerOptions::from_json(config).unwrap();
  options.context = Some(dir.to_path_buf());
  options
}

/// The `babel-loader` setup most tests share, with a configurable devtool.
pub fn babel_config(devtool: &str) -> String {
  format!(
    r#"{{
      "entry": "./src/app.js",
      "resolveLoader": {{ "alias": {{ "babel-loader": "builtin:transform-loader" }} }},
      "module": {{ "rules": [{{ "test": "\\.js$", "loader": "babel-loader", "include": "src" }}] }},
      "devtool": {devtool}
    }}"#
  )
}

pub async fn generate(dir: &Path, config: &str) -> BundleOutput {
  generate_with_loaders(dir, config, LoaderRegistry::new()).await
}

pub async fn generate_with_loaders(
  dir: &Path,
  config: &str,
  loaders: LoaderRegistry,
) -> BundleOutput {
  let bundler = Bundler::with_loaders(options(dir, config), loaders)
    .unwrap_or_else(|err| panic!("{err}"));
  bundler.generate().await.unwrap_or_else(|err| panic!("{err}"))
}

pub fn asset<'a>(output: &'a BundleOutput, filename: &str) -> &'a OutputAsset {
  output
    .assets
    .iter()
    .find(|asset| asset.filename == filename)
    .unwrap_or_else(|| panic!("no asset named {filename}"))
}
