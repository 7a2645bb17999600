use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::anyhow;
use itertools::Itertools;
use loadpack_common::{
  BundlerOptions, Devtool, DevtoolOption, EntryItem, EntryOptions, FilenameTemplate, ModuleRule,
  NormalizedBundlerOptions, OneOrMany, RuleOptions,
};
use loadpack_error::BuildResult;
use loadpack_loader::LoaderRegistry;
use loadpack_utils::indexmap::FxIndexMap;
use regex::Regex;
use sugar_path::SugarPath;

pub struct NormalizeOptionsReturn {
  pub options: NormalizedBundlerOptions,
  pub warnings: Vec<anyhow::Error>,
}

/// Fill in defaults and validate the raw descriptor.
///
/// Every configuration problem is collected so the user sees all of them at
/// once; nothing is resolved or read from disk here.
pub fn normalize_options(
  raw_options: BundlerOptions,
  loaders: &LoaderRegistry,
) -> BuildResult<NormalizeOptionsReturn> {
  let mut errors = vec![];
  let mut warnings = vec![];

  let context = raw_options.context.unwrap_or_else(|| PathBuf::from(".")).absolutize();
  // The resolver hands back canonical paths, module ids are computed
  // relative to this.
  let context = dunce::canonicalize(&context).unwrap_or(context);

  let entries = match raw_options.entry {
    None => {
      errors.push(anyhow!("`entry` is required"));
      vec![]
    }
    Some(EntryOptions::Single(import)) => vec![EntryItem { name: "main".to_string(), import }],
    Some(EntryOptions::Named(map)) => {
      map.into_iter().map(|(name, import)| EntryItem { name, import }).collect()
    }
  };
  if entries.is_empty() && errors.is_empty() {
    errors.push(anyhow!("`entry` must name at least one module"));
  }
  for entry in &entries {
    if entry.name.is_empty() {
      errors.push(anyhow!("Entry names must not be empty"));
    }
    if entry.import.is_empty() {
      errors.push(anyhow!("Entry {:?} has an empty path", entry.name));
    }
  }

  let raw_output = raw_options.output.unwrap_or_default();
  let output_path =
    context.join(raw_output.path.unwrap_or_else(|| PathBuf::from("dist"))).normalize();
  let output_filename = raw_output.filename.unwrap_or_else(|| "[name].js".to_string());
  if output_filename.is_empty() {
    errors.push(anyhow!("`output.filename` must not be empty"));
  }
  if entries.len() > 1 && !output_filename.contains("[name]") && !output_filename.contains("[id]") {
    errors.push(anyhow!(
      "`output.filename` {output_filename:?} gives every entry the same file name, \
       use `[name]` or `[id]`"
    ));
  }

  let raw_resolve = raw_options.resolve.unwrap_or_default();
  let extensions = raw_resolve.extensions.unwrap_or_else(|| vec![".js".to_string()]);
  for extension in &extensions {
    if !extension.starts_with('.') {
      errors.push(anyhow!("`resolve.extensions` entry {extension:?} must start with `.`"));
    }
  }
  let alias = raw_resolve.alias.unwrap_or_default().into_iter().collect_vec();

  let loader_alias: FxIndexMap<String, String> = raw_options
    .resolve_loader
    .and_then(|resolve_loader| resolve_loader.alias)
    .unwrap_or_default()
    .into_iter()
    .collect();
  for (name, target) in &loader_alias {
    if !loaders.contains(target) {
      errors.push(anyhow!(
        "`resolveLoader.alias` maps {name:?} to {target:?}, which is not a registered loader"
      ));
    }
  }
  let loaders = loaders.clone().with_alias(loader_alias.clone());

  let rules = raw_options
    .module
    .and_then(|module| module.rules)
    .unwrap_or_default()
    .into_iter()
    .enumerate()
    .filter_map(|(index, rule)| match normalize_rule(rule, &context, &loaders) {
      Ok(rule) => Some(rule),
      Err(rule_errors) => {
        errors.extend(
          rule_errors.into_iter().map(|err| err.context(format!("module.rules[{index}]"))),
        );
        None
      }
    })
    .collect_vec();

  for rule in &rules {
    if let Some(test) = &rule.test {
      if !extensions.iter().any(|extension| test.is_match(&format!("file{extension}"))) {
        let warning = anyhow!(
          "Rule /{test}/ matches none of `resolve.extensions` {extensions:?}, \
           extensionless imports never reach it"
        );
        tracing::warn!("{warning}");
        warnings.push(warning);
      }
    }
  }

  let devtool = match raw_options.devtool {
    None | Some(DevtoolOption::Enabled(false)) => Devtool::NONE,
    Some(DevtoolOption::Enabled(true)) => {
      errors.push(anyhow!("`devtool: true` is ambiguous, name a mode such as \"source-map\""));
      Devtool::NONE
    }
    Some(DevtoolOption::Name(name)) => name.parse().unwrap_or_else(|err: String| {
      errors.push(anyhow!(err));
      Devtool::NONE
    }),
  };

  if !errors.is_empty() {
    return Err(errors.into());
  }

  Ok(NormalizeOptionsReturn {
    options: NormalizedBundlerOptions {
      context,
      entries,
      output_path,
      output_filename: FilenameTemplate::new(output_filename),
      extensions,
      alias,
      loader_alias,
      rules,
      plugins: raw_options.plugins.unwrap_or_default(),
      devtool,
    },
    warnings,
  })
}

fn normalize_rule(
  raw: RuleOptions,
  context: &Path,
  loaders: &LoaderRegistry,
) -> Result<ModuleRule, Vec<anyhow::Error>> {
  let mut errors = vec![];

  let test = raw.test.and_then(|pattern| match Regex::new(&pattern) {
    Ok(regex) => Some(regex),
    Err(err) => {
      errors.push(anyhow!("`test` {pattern:?} is not a valid regular expression: {err}"));
      None
    }
  });

  let names = match (raw.loader, raw.use_) {
    (Some(_), Some(_)) => {
      errors.push(anyhow!("`loader` and `use` are mutually exclusive"));
      vec![]
    }
    (Some(loader), None) => vec![loader],
    (None, Some(chain)) => chain,
    (None, None) => vec![],
  };
  if names.is_empty() && errors.is_empty() {
    errors.push(anyhow!("A rule must name a `loader` or a non-empty `use` chain"));
  }
  for name in &names {
    if !loaders.contains(name) {
      errors.push(anyhow!(
        "Loader {name:?} is neither registered nor aliased in `resolveLoader.alias`"
      ));
    }
  }

  let to_absolute = |paths: Option<OneOrMany<PathBuf>>| {
    paths
      .map(OneOrMany::into_vec)
      .unwrap_or_default()
      .into_iter()
      .map(|path| context.join(path).normalize())
      .collect_vec()
  };

  if !errors.is_empty() {
    return Err(errors);
  }

  Ok(ModuleRule {
    test,
    loaders: names.into_iter().collect(),
    include: to_absolute(raw.include),
    exclude: to_absolute(raw.exclude),
    options: raw.options.map(Arc::new),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn normalize(json: &str) -> BuildResult<NormalizeOptionsReturn> {
    let mut options = BundlerOptions::from_json(json).unwrap();
    options.context = Some(PathBuf::from("/project"));
    normalize_options(options, &LoaderRegistry::new())
  }

  #[test]
  fn fills_defaults() {
    let NormalizeOptionsReturn { options, warnings } = normalize(r#"{ "entry": "./src/app.js" }"#)
      .unwrap_or_else(|err| panic!("{err}"));
    assert!(warnings.is_empty());
    assert_eq!(options.entries[0].name, "main");
    assert_eq!(options.output_path, PathBuf::from("/project/dist"));
    assert_eq!(options.output_filename.template(), "[name].js");
    assert_eq!(options.extensions, [".js"]);
    assert!(options.devtool.is_none());
  }

  #[test]
  fn accepts_aliased_builtin_loader() {
    let ret = normalize(
      r#"{
        "entry": { "app": "./src/app.js" },
        "resolveLoader": { "alias": { "babel-loader": "builtin:transform-loader" } },
        "module": { "rules": [{ "test": "\\.js$", "loader": "babel-loader", "include": "src" }] },
        "devtool": "eval-source-map"
      }"#,
    )
    .unwrap_or_else(|err| panic!("{err}"));
    let rule = &ret.options.rules[0];
    assert_eq!(rule.loaders.as_slice(), ["babel-loader"]);
    assert_eq!(rule.include, [PathBuf::from("/project/src")]);
    assert!(ret.options.devtool.is_eval());
  }

  #[test]
  fn reports_every_problem_at_once() {
    let err = normalize(
      r#"{
        "resolveLoader": { "alias": { "babel-loader": "babel-core-loader" } },
        "module": { "rules": [{ "test": "(", "loader": "babel-loader" }] },
        "devtool": "source-maps"
      }"#,
    )
    .err()
    .unwrap();
    // entry, alias target, rule regex, rule loader, devtool
    assert_eq!(err.len(), 5, "{err}");
  }

  #[test]
  fn warns_when_no_extension_reaches_a_rule() {
    let ret = normalize(
      r#"{
        "entry": "./src/app.js",
        "resolveLoader": { "alias": { "ts-loader": "builtin:transform-loader" } },
        "module": { "rules": [{ "test": "\\.ts$", "loader": "ts-loader" }] }
      }"#,
    )
    .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(ret.warnings.len(), 1);
  }

  #[test]
  fn rejects_rules_without_loaders() {
    assert!(normalize(r#"{ "entry": "./a.js", "module": { "rules": [{ "test": "\\.js$" }] } }"#)
      .is_err());
    assert!(normalize(r#"{ "entry": "./a.js", "resolve": { "extensions": ["js"] } }"#).is_err());
  }
}
