use std::{path::Path, sync::Arc};

use anyhow::Context;
use loadpack_common::{BundlerOptions, NormalizedBundlerOptions, OutputAsset, PluginOptions};
use loadpack_error::BuildResult;
use loadpack_loader::LoaderRegistry;
use loadpack_plugin::{HtmlPlugin, SharedPlugin};
use loadpack_resolver::{Resolver, ResolverOptions};

use crate::{
  stages::{generate::GenerateStage, scan::ScanStage},
  types::{bundle_output::BundleOutput, SharedLoaderRegistry, SharedOptions, SharedResolver},
  utils::normalize_options::{normalize_options, NormalizeOptionsReturn},
};

pub struct Bundler {
  options: SharedOptions,
  resolver: SharedResolver,
  loaders: SharedLoaderRegistry,
  plugins: Vec<SharedPlugin>,
  /// Raised while normalizing options, reported with every build.
  option_warnings: Vec<String>,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> BuildResult<Self> {
    Self::with_loaders(options, LoaderRegistry::new())
  }

  /// Like `new`, with custom loaders registered next to the builtin ones.
  pub fn with_loaders(options: BundlerOptions, loaders: LoaderRegistry) -> BuildResult<Self> {
    let NormalizeOptionsReturn { options, warnings } = normalize_options(options, &loaders)?;

    let loaders = loaders.with_alias(options.loader_alias.clone());
    let resolver = Resolver::new(ResolverOptions {
      context: options.context.clone(),
      extensions: options.extensions.clone(),
      alias: options.alias.clone(),
    });
    let plugins = options
      .plugins
      .iter()
      .map(|plugin| match plugin {
        PluginOptions::Html(html) => Arc::new(HtmlPlugin::new(html.clone())) as SharedPlugin,
      })
      .collect();

    Ok(Self {
      options: Arc::new(options),
      resolver: Arc::new(resolver),
      loaders: Arc::new(loaders),
      plugins,
      option_warnings: warnings.iter().map(ToString::to_string).collect(),
    })
  }

  pub fn from_config_file(path: &Path) -> BuildResult<Self> {
    Self::new(BundlerOptions::from_config_file(path)?)
  }

  /// Add a plugin that runs after the configured ones.
  #[must_use]
  pub fn with_plugin(mut self, plugin: SharedPlugin) -> Self {
    self.plugins.push(plugin);
    self
  }

  pub fn options(&self) -> &NormalizedBundlerOptions {
    &self.options
  }

  /// Build every entry without touching the output directory.
  pub async fn generate(&self) -> BuildResult<BundleOutput> {
    tracing::info!(entries = self.options.entries.len(), "build started");

    let scan_output = ScanStage::new(
      Arc::clone(&self.options),
      Arc::clone(&self.resolver),
      Arc::clone(&self.loaders),
    )
    .scan()
    .await?;

    let mut output = GenerateStage::new(&self.options, &self.plugins).generate(scan_output)?;
    let mut warnings =
      self.option_warnings.iter().map(|warning| anyhow::anyhow!("{warning}")).collect::<Vec<_>>();
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    Ok(output)
  }

  /// Build, then write every asset below `output.path`.
  pub async fn write(&self) -> BuildResult<BundleOutput> {
    let output = self.generate().await?;

    let mut errors = vec![];
    for asset in &output.assets {
      if let Err(err) = self.write_asset(asset) {
        errors.push(err);
      }
    }
    if !errors.is_empty() {
      Err(errors)?;
    }

    tracing::info!(path = %self.options.output_path.display(), "assets written");
    Ok(output)
  }

  fn write_asset(&self, asset: &OutputAsset) -> anyhow::Result<()> {
    let path = self.options.output_path.join(asset.filename());
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    std::fs::write(&path, asset.content_as_bytes())
      .with_context(|| format!("Failed to write {}", path.display()))
  }
}
