mod bundler_options;
mod loader_request;
mod module_loader;
mod types;

pub use bundler_options::{
  config_file::DEFAULT_CONFIG_FILE,
  devtool::Devtool,
  es_target::ESTarget,
  filename_template::{FilenameRenderOptions, FilenameTemplate},
  module_rule::{loader_chain, matching_rules, LoaderItem, ModuleRule},
  normalized_bundler_options::{EntryItem, NormalizedBundlerOptions},
  plugin_options::{HtmlPluginOptions, PluginOptions},
  BundlerOptions, DevtoolOption, EntryOptions, ModuleOptions, OneOrMany, OutputOptions,
  ResolveLoaderOptions, ResolveOptions, RuleOptions,
};

pub use crate::{
  loader_request::{build_loader_request, request_filename, request_resource, LOADER_DELIMITER},
  module_loader::{ModuleLoaderMsg, NormalModuleTaskResult, ResolvedDependency},
  types::{
    normal_module::NormalModule,
    output_asset::{OutputAsset, OutputKind, RenderedChunk},
  },
};
