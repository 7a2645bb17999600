use std::path::PathBuf;

use loadpack_common::{
  Devtool, FilenameTemplate, HtmlPluginOptions, NormalizedBundlerOptions, OutputAsset, RenderedChunk,
};

use super::*;

fn options(context: PathBuf) -> NormalizedBundlerOptions {
  NormalizedBundlerOptions {
    context,
    entries: vec![],
    output_path: PathBuf::from("/project/dist"),
    output_filename: FilenameTemplate::new("[name].js".to_string()),
    extensions: vec![".js".to_string()],
    alias: vec![],
    loader_alias: Default::default(),
    rules: vec![],
    plugins: vec![],
    devtool: Devtool::NONE,
  }
}

fn chunk(name: &str) -> RenderedChunk {
  RenderedChunk { name: name.to_string(), filename: format!("{name}.js"), modules: vec![] }
}

fn run(plugin: &HtmlPlugin, options: &NormalizedBundlerOptions) -> Vec<OutputAsset> {
  let chunks = [chunk("main"), chunk("admin")];
  let mut assets = vec![];
  plugin.generate_bundle(&PluginContext { options, chunks: &chunks }, &mut assets).unwrap();
  assets
}

#[test]
fn injects_scripts_before_body_end() {
  let assets = run(&HtmlPlugin::default(), &options(PathBuf::from("/project")));
  assert_eq!(assets.len(), 1);
  assert_eq!(assets[0].filename, "index.html");
  let html = &assets[0].content;
  let main = html.find(r#"<script src="main.js"></script>"#).unwrap();
  let admin = html.find(r#"<script src="admin.js"></script>"#).unwrap();
  assert!(main < admin);
  assert!(admin < html.find("</body>").unwrap());
}

#[test]
fn reads_template_relative_to_context() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("page.html"), "<main></main>").unwrap();
  let plugin = HtmlPlugin::new(HtmlPluginOptions {
    filename: Some("pages/app.html".to_string()),
    template: Some(PathBuf::from("page.html")),
    inject: None,
  });

  let assets = run(&plugin, &options(dir.path().to_path_buf()));
  assert_eq!(assets[0].filename, "pages/app.html");
  assert!(assets[0].content.starts_with("<main></main><script src=\"../main.js\">"));
}

#[test]
fn inject_false_leaves_template_untouched() {
  let plugin =
    HtmlPlugin::new(HtmlPluginOptions { filename: None, template: None, inject: Some(false) });
  let assets = run(&plugin, &options(PathBuf::from("/project")));
  assert_eq!(assets[0].content, DEFAULT_TEMPLATE);
}

#[test]
fn missing_template_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let plugin = HtmlPlugin::new(HtmlPluginOptions {
    filename: None,
    template: Some(PathBuf::from("missing.html")),
    inject: None,
  });
  let options = options(dir.path().to_path_buf());
  let mut assets = vec![];
  let result = plugin.generate_bundle(&PluginContext { options: &options, chunks: &[] }, &mut assets);
  assert!(result.is_err());
  assert!(assets.is_empty());
}
