use std::{path::Path, path::PathBuf, sync::Arc};

use loadpack_utils::path_ext::PathExt;
use regex::Regex;
use smallvec::SmallVec;

/// One loader of a chain, with the options of the rule it came from.
#[derive(Debug, Clone)]
pub struct LoaderItem {
  pub name: String,
  pub options: Option<Arc<serde_json::Value>>,
}

/// A normalized `module.rules[]` entry.
#[derive(Debug, Clone)]
pub struct ModuleRule {
  pub test: Option<Regex>,
  /// Loader names in configuration order; they run last to first.
  pub loaders: SmallVec<[String; 2]>,
  /// Absolute directories or files. Empty means "everywhere".
  pub include: Vec<PathBuf>,
  pub exclude: Vec<PathBuf>,
  pub options: Option<Arc<serde_json::Value>>,
}

impl ModuleRule {
  pub fn matches(&self, resource: &Path) -> bool {
    if let Some(test) = &self.test {
      if !test.is_match(&resource.to_slash_string()) {
        return false;
      }
    }
    if !self.include.is_empty() && !self.include.iter().any(|dir| resource.is_within(dir)) {
      return false;
    }
    !self.exclude.iter().any(|dir| resource.is_within(dir))
  }
}

/// Rules that apply to `resource`, in configuration order.
pub fn matching_rules<'a>(rules: &'a [ModuleRule], resource: &'a Path) -> impl Iterator<Item = &'a ModuleRule> + 'a {
  rules.iter().filter(move |rule| rule.matches(resource))
}

/// The loader chain for `resource`, in request order: the loader that runs
/// first is the last item.
pub fn loader_chain(rules: &[ModuleRule], resource: &Path) -> Vec<LoaderItem> {
  matching_rules(rules, resource)
    .flat_map(|rule| {
      rule
        .loaders
        .iter()
        .map(|name| LoaderItem { name: name.clone(), options: rule.options.clone() })
    })
    .collect()
}
