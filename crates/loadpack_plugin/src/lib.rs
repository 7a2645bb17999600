mod html;
mod plugin;
mod plugin_context;

pub use crate::{
  html::HtmlPlugin,
  plugin::{Plugin, SharedPlugin},
  plugin_context::PluginContext,
};
