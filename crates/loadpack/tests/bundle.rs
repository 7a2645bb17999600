mod common;

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use pretty_assertions::assert_eq;

use common::{asset, babel_config, generate, generate_with_loaders, options, project};
use loadpack::{
  Bundler, Loader, LoaderContext, LoaderOutput, LoaderRegistry, OutputKind, SourceMap,
};

const APP: &str = r#"import { double } from "./math";
const legacy = require("./legacy");
export const result = double(legacy.base);
"#;
const MATH: &str = "export const double = (n) => n * 2;\n";
const LEGACY: &str = "module.exports = { base: 21 };\n";

fn app_project() -> tempfile::TempDir {
  project(&[("src/app.js", APP), ("src/math.js", MATH), ("src/legacy.js", LEGACY)])
}

#[derive(Debug, Default)]
struct CountingLoader {
  runs: Arc<AtomicUsize>,
}

impl Loader for CountingLoader {
  fn name(&self) -> std::borrow::Cow<'static, str> {
    "counting-loader".into()
  }

  fn run(
    &self,
    source: &str,
    _input_map: Option<&SourceMap>,
    ctx: &mut dyn LoaderContext,
  ) -> anyhow::Result<()> {
    self.runs.fetch_add(1, Ordering::SeqCst);
    ctx.complete(LoaderOutput { code: source.to_string(), map: None });
    Ok(())
  }
}

fn counting_registry() -> (LoaderRegistry, Arc<AtomicUsize>) {
  let runs = Arc::new(AtomicUsize::new(0));
  let mut registry = LoaderRegistry::new();
  registry.register("counting-loader", Arc::new(CountingLoader { runs: Arc::clone(&runs) }));
  (registry, runs)
}

#[tokio::test]
async fn bundles_every_reachable_module() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config("false")).await;

  assert_eq!(output.assets.len(), 1);
  let chunk = asset(&output, "main.js");
  assert_eq!(chunk.kind, OutputKind::Chunk);
  let code = &chunk.content;
  assert!(code.contains("return __loadpack_require__(\"./src/app.js\");"), "{code}");
  for id in ["./src/app.js", "./src/legacy.js", "./src/math.js"] {
    assert!(code.contains(&format!("\"{id}\": function (module, exports, require) {{")), "{code}");
  }
  assert!(code.contains("require(\"./src/legacy.js\")"), "{code}");
  assert!(code.contains("var __loadpack_import_0__ = require(\"./src/math.js\");"), "{code}");
  // Lowered by the transform loader.
  assert!(!code.contains("=>"), "{code}");
  assert!(!code.contains("const "), "{code}");
  assert!(code.contains("var double = function"), "{code}");
  assert!(output.warnings.is_empty());
}

#[tokio::test]
async fn modules_are_sorted_by_id() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config("false")).await;
  let code = &asset(&output, "main.js").content;
  let app = code.find("\"./src/app.js\": function").unwrap();
  let legacy = code.find("\"./src/legacy.js\": function").unwrap();
  let math = code.find("\"./src/math.js\": function").unwrap();
  assert!(app < legacy && legacy < math);
}

#[tokio::test]
async fn ts_resources_do_not_reach_js_rules() {
  let dir = project(&[("src/app.ts", "var typed = 1;\n"), ("src/app.js", "var plain = 1;\n")]);
  let config = |entry: &str| {
    format!(
      r#"{{
        "entry": "{entry}",
        "resolve": {{ "extensions": [".js"] }},
        "module": {{ "rules": [{{ "test": "\\.js$", "loader": "counting-loader" }}] }}
      }}"#
    )
  };

  let (registry, runs) = counting_registry();
  generate_with_loaders(dir.path(), &config("./src/app.ts"), registry).await;
  assert_eq!(runs.load(Ordering::SeqCst), 0);

  let (registry, runs) = counting_registry();
  generate_with_loaders(dir.path(), &config("./src/app.js"), registry).await;
  assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn each_module_is_loaded_once() {
  let dir = project(&[
    ("src/a.js", "import \"./b\";\nimport \"./c\";\n"),
    ("src/b.js", "import \"./c\";\nimport \"./a\";\n"),
    ("src/c.js", "export var c = 1;\n"),
  ]);
  let (registry, runs) = counting_registry();
  let config = r#"{
    "entry": "./src/a.js",
    "module": { "rules": [{ "test": "\\.js$", "loader": "counting-loader" }] }
  }"#;
  let output = generate_with_loaders(dir.path(), config, registry).await;
  assert_eq!(runs.load(Ordering::SeqCst), 3);
  assert_eq!(asset(&output, "main.js").content.matches(": function (module, exports, require)").count(), 3);
}

#[tokio::test]
async fn transform_failures_fail_the_build() {
  let dir = project(&[("src/app.js", "import \"./ok\";\nvar = ;\n"), ("src/ok.js", "")]);
  let bundler = Bundler::new(options(dir.path(), &babel_config("false"))).unwrap();
  let err = bundler.generate().await.unwrap_err();
  assert_eq!(err.len(), 1, "{err}");
  assert!(err.to_string().contains("app.js"), "{err}");
}

#[tokio::test]
async fn every_unresolved_import_is_reported() {
  let dir = project(&[
    ("src/app.js", "import \"./missing\";\nimport \"./present\";\nrequire(\"./gone\");\n"),
    ("src/present.js", ""),
  ]);
  let bundler = Bundler::new(options(dir.path(), &babel_config("false"))).unwrap();
  let err = bundler.generate().await.unwrap_err();
  let message = err.to_string();
  assert_eq!(err.len(), 2, "{message}");
  assert!(message.contains("./missing") && message.contains("./gone"), "{message}");
}

#[tokio::test]
async fn unresolvable_entry_is_an_error() {
  let dir = project(&[]);
  let bundler = Bundler::new(options(dir.path(), &babel_config("false"))).unwrap();
  let err = bundler.generate().await.unwrap_err();
  assert!(err.to_string().contains("main"), "{err}");
}

#[tokio::test]
async fn configuration_errors_surface_before_any_module_work() {
  let dir = app_project();
  let config = r#"{
    "entry": "./src/app.js",
    "module": { "rules": [{ "test": "\\.js$", "loader": "babel-loader" }] },
    "devtool": "nope"
  }"#;
  let Err(err) = Bundler::new(options(dir.path(), config)) else {
    panic!("configuration should be rejected");
  };
  assert_eq!(err.len(), 2, "{err}");
}

#[tokio::test]
async fn dynamic_import_is_a_warning() {
  let dir = project(&[("src/app.js", "import(\"./lazy\");\n")]);
  let output = generate(dir.path(), r#"{ "entry": "./src/app.js" }"#).await;
  assert_eq!(output.warnings.len(), 1);
  assert!(output.warnings[0].to_string().contains("./src/app.js"));
}

#[tokio::test]
async fn entries_keep_configuration_order() {
  let dir = project(&[("src/b.js", "var b;\n"), ("src/a.js", "var a;\n")]);
  let config = r#"{
    "entry": { "second": "./src/b.js", "first": "./src/a.js" },
    "output": { "filename": "[id]-[name].js" }
  }"#;
  let output = generate(dir.path(), config).await;
  let filenames = output.assets.iter().map(|asset| asset.filename.as_str()).collect::<Vec<_>>();
  assert_eq!(filenames, ["0-second.js", "1-first.js"]);
}

#[tokio::test]
async fn content_hash_tracks_content() {
  let config = r#"{ "entry": "./src/app.js", "output": { "filename": "[name].[contenthash:8].js" } }"#;
  let first = project(&[("src/app.js", "var a = 1;\n")]);
  let second = project(&[("src/app.js", "var a = 2;\n")]);

  let first = generate(first.path(), config).await;
  let second = generate(second.path(), config).await;
  let first = &first.assets[0].filename;
  let second = &second.assets[0].filename;

  assert!(first.starts_with("main.") && first.ends_with(".js"), "{first}");
  assert_eq!(first.len(), "main..js".len() + 8);
  assert_ne!(first, second);
}

#[tokio::test]
async fn write_emits_assets_below_output_path() {
  let dir = app_project();
  let config = babel_config("false").replacen('{', r#"{ "output": { "path": "build/js" },"#, 1);
  let bundler = Bundler::new(options(dir.path(), &config)).unwrap();
  bundler.write().await.unwrap_or_else(|err| panic!("{err}"));

  let written = std::fs::read_to_string(dir.path().join("build/js/main.js")).unwrap();
  assert!(written.contains("\"./src/app.js\""));
}

#[tokio::test]
async fn source_map_is_written_next_to_the_chunk() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config(r#""source-map""#)).await;

  assert_eq!(output.assets.len(), 2);
  let chunk = asset(&output, "main.js");
  assert!(chunk.is_chunk());
  assert!(chunk.content.ends_with("\n//# sourceMappingURL=main.js.map"), "{}", chunk.content);

  let map = asset(&output, "main.js.map");
  assert_eq!(map.kind, OutputKind::SourceMap);
  assert!(!map.is_chunk());
  let map: serde_json::Value = serde_json::from_str(&map.content).unwrap();
  assert_eq!(map["file"], "main.js");
  let sources = map["sources"].as_array().unwrap();
  assert!(sources.iter().any(|source| source == "loadpack:///./src/app.js"), "{sources:?}");
  let contents = map["sourcesContent"].as_array().unwrap();
  assert!(contents.iter().any(|content| content.as_str().is_some_and(|c| c.contains("=>"))));
}

#[tokio::test]
async fn hidden_source_map_is_not_referenced() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config(r#""hidden-source-map""#)).await;
  assert!(!asset(&output, "main.js").content.contains("sourceMappingURL"));
  asset(&output, "main.js.map");
}

#[tokio::test]
async fn inline_source_map_is_embedded() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config(r#""inline-source-map""#)).await;
  assert_eq!(output.assets.len(), 1);
  assert!(asset(&output, "main.js")
    .content
    .contains("//# sourceMappingURL=data:application/json;charset=utf-8;base64,"));
}

#[tokio::test]
async fn eval_wraps_each_module() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config(r#""eval""#)).await;
  assert_eq!(output.assets.len(), 1);
  let code = &asset(&output, "main.js").content;
  assert_eq!(code.matches("eval(\"").count(), 3);
  assert!(code.contains("//# sourceURL=loadpack:///./src/math.js"), "{code}");
  assert!(!code.contains("sourceMappingURL"), "{code}");
}

#[tokio::test]
async fn eval_source_map_inlines_module_maps() {
  let dir = app_project();
  let output = generate(dir.path(), &babel_config(r#""eval-source-map""#)).await;
  let code = &asset(&output, "main.js").content;
  assert_eq!(code.matches("sourceMappingURL=data:application/json").count(), 3);
}

#[tokio::test]
async fn html_plugin_injects_chunks() {
  let dir = project(&[("src/app.js", "var a = 1;\n")]);
  let config = r#"{
    "entry": "./src/app.js",
    "output": { "filename": "js/[name].js" },
    "plugins": [{ "html": { "filename": "pages/index.html" } }]
  }"#;
  let output = generate(dir.path(), config).await;
  let filenames = output.assets.iter().map(|asset| asset.filename.as_str()).collect::<Vec<_>>();
  assert_eq!(filenames, ["js/main.js", "pages/index.html"]);
  let html = &asset(&output, "pages/index.html").content;
  assert!(html.contains("<script src=\"../js/main.js\"></script>\n</body>"), "{html}");
}

#[tokio::test]
async fn custom_plugins_run_after_configured_ones() {
  #[derive(Debug)]
  struct Banner;

  impl loadpack::Plugin for Banner {
    fn name(&self) -> std::borrow::Cow<'static, str> {
      "banner".into()
    }

    fn generate_bundle(
      &self,
      _ctx: &loadpack::PluginContext<'_>,
      assets: &mut Vec<loadpack::OutputAsset>,
    ) -> loadpack_error::BuildResult<()> {
      for asset in assets.iter_mut().filter(|asset| asset.kind == OutputKind::Chunk) {
        asset.content.insert_str(0, "/* banner */\n");
      }
      Ok(())
    }
  }

  let dir = project(&[("src/app.js", "var a = 1;\n")]);
  let bundler = Bundler::new(options(dir.path(), r#"{ "entry": "./src/app.js" }"#))
    .unwrap()
    .with_plugin(Arc::new(Banner));
  let output = bundler.generate().await.unwrap();
  assert!(asset(&output, "main.js").content.starts_with("/* banner */\n(function (modules) {"));
}
