use std::path::{Path, PathBuf};

use loadpack_utils::path_ext::PathExt;
use oxc_resolver::{AliasValue, ResolveError, ResolveOptions as OxcResolverOptions};
use sugar_path::SugarPath;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
  pub context: PathBuf,
  /// Tried in order when a specifier has no extension.
  pub extensions: Vec<String>,
  /// `resolve.alias`: specifier prefix to replacement path or package.
  pub alias: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct Resolver {
  context: PathBuf,
  inner: oxc_resolver::Resolver,
}

impl Resolver {
  pub fn new(options: ResolverOptions) -> Self {
    let ResolverOptions { context, extensions, alias } = options;

    let alias = alias
      .into_iter()
      .map(|(from, to)| {
        let to = if to.starts_with('.') { context.join(&to).normalize().to_slash_string() } else { to };
        (from, vec![AliasValue::Path(to)])
      })
      .collect();

    let inner = oxc_resolver::Resolver::new(OxcResolverOptions {
      extensions,
      alias,
      alias_fields: vec![vec!["browser".to_string()]],
      condition_names: vec!["import".to_string(), "browser".to_string(), "default".to_string()],
      main_fields: vec!["browser".to_string(), "module".to_string(), "main".to_string()],
      ..OxcResolverOptions::default()
    });

    Self { context, inner }
  }

  /// Resolve `specifier` as written in `importer`, or as an entry when there
  /// is no importer.
  pub fn resolve(&self, importer: Option<&Path>, specifier: &str) -> Result<PathBuf, ResolveError> {
    let dir = importer
      .and_then(Path::parent)
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.context.as_path());

    let mut resolution = self.inner.resolve(dir, specifier);

    // Entries written as `src/app.js` mean `<context>/src/app.js`, not a package.
    if resolution.is_err() && importer.is_none() {
      let is_specifier_path_like = specifier.starts_with('.') || specifier.starts_with('/');
      if !is_specifier_path_like {
        let in_context = self.context.join(specifier).normalize();
        let retried = self.inner.resolve(dir, &in_context.to_slash_string());
        if retried.is_ok() {
          resolution = retried;
        }
      }
    }

    resolution.map(|resolution| {
      let path = resolution.path().to_path_buf();
      tracing::trace!(specifier, path = %path.display(), "resolved");
      path
    })
  }
}
