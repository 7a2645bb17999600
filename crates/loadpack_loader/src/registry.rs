use std::sync::Arc;

use anyhow::bail;
use loadpack_utils::indexmap::FxIndexMap;

use crate::{SharedLoader, TransformLoader};

/// Loaders known to the bundler, addressed by the names rules use.
#[derive(Debug, Clone)]
pub struct LoaderRegistry {
  loaders: FxIndexMap<String, SharedLoader>,
  /// `resolveLoader.alias`: user-facing name -> registered name.
  alias: FxIndexMap<String, String>,
}

impl LoaderRegistry {
  /// A registry with every builtin loader and no aliases.
  pub fn new() -> Self {
    let mut registry = Self { loaders: FxIndexMap::default(), alias: FxIndexMap::default() };
    registry.register(TransformLoader::NAME, Arc::new(TransformLoader));
    registry
  }

  #[must_use]
  pub fn with_alias(mut self, alias: FxIndexMap<String, String>) -> Self {
    self.alias = alias;
    self
  }

  pub fn register(&mut self, name: impl Into<String>, loader: SharedLoader) {
    self.loaders.insert(name.into(), loader);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.loaders.contains_key(self.canonical_name(name))
  }

  /// `name` after alias substitution.
  pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
    self.alias.get(name).map_or(name, String::as_str)
  }

  pub fn get(&self, name: &str) -> anyhow::Result<SharedLoader> {
    let canonical = self.canonical_name(name);
    match self.loaders.get(canonical) {
      Some(loader) => Ok(Arc::clone(loader)),
      None if canonical == name => bail!("Loader {name:?} is not registered"),
      None => bail!("Loader {name:?} is aliased to {canonical:?}, which is not registered"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_through_alias() {
    let mut alias = FxIndexMap::default();
    alias.insert("babel-loader".to_string(), TransformLoader::NAME.to_string());
    let registry = LoaderRegistry::new().with_alias(alias);

    assert!(registry.contains("babel-loader"));
    assert_eq!(registry.get("babel-loader").unwrap().name(), TransformLoader::NAME);
    assert!(registry.get(TransformLoader::NAME).is_ok());
  }

  #[test]
  fn unknown_loaders_are_errors() {
    let registry = LoaderRegistry::new();
    assert!(!registry.contains("babel-loader"));
    let err = registry.get("babel-loader").unwrap_err();
    assert!(err.to_string().contains("babel-loader"), "{err}");
  }
}
