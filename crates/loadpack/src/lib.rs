mod ast_scanner;
mod bundler;
mod module_finalizer;
mod module_loader;
mod stages;
mod types;
mod utils;

pub use crate::{bundler::Bundler, types::bundle_output::BundleOutput};
pub use loadpack_common::*;
pub use loadpack_loader::{Loader, LoaderContext, LoaderOutput, LoaderRegistry, TransformLoader};
pub use loadpack_plugin::{HtmlPlugin, Plugin, PluginContext};
pub use loadpack_sourcemap::SourceMap;
