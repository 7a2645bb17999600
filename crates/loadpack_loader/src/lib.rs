mod registry;
mod runner;
mod transform_loader;
mod types;

pub use crate::{
  registry::LoaderRegistry,
  runner::{run_loader_chain, LoaderChainOutput},
  transform_loader::TransformLoader,
  types::{Loader, LoaderContext, LoaderOutput, SharedLoader},
};
