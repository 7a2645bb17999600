use std::borrow::Cow;

use anyhow::Context;
use loadpack_common::{HtmlPluginOptions, OutputAsset, OutputKind};
use loadpack_error::BuildResult;

use crate::{Plugin, PluginContext};

const DEFAULT_FILENAME: &str = "index.html";

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>loadpack</title>
  </head>
  <body>
  </body>
</html>
"#;

/// Emits an HTML document that loads every entry chunk.
#[derive(Debug, Default)]
pub struct HtmlPlugin {
  options: HtmlPluginOptions,
}

impl HtmlPlugin {
  pub fn new(options: HtmlPluginOptions) -> Self {
    Self { options }
  }

  fn filename(&self) -> &str {
    self.options.filename.as_deref().unwrap_or(DEFAULT_FILENAME)
  }

  fn load_template(&self, ctx: &PluginContext<'_>) -> BuildResult<String> {
    let Some(template) = &self.options.template else {
      return Ok(DEFAULT_TEMPLATE.to_string());
    };
    let path = ctx.options.context.join(template);
    let content = std::fs::read_to_string(&path)
      .with_context(|| format!("Failed to read html template {}", path.display()))?;
    Ok(content)
  }
}

impl Plugin for HtmlPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("builtin:html")
  }

  fn generate_bundle(
    &self,
    ctx: &PluginContext<'_>,
    assets: &mut Vec<OutputAsset>,
  ) -> BuildResult<()> {
    let filename = self.filename();
    let mut html = self.load_template(ctx)?;

    if self.options.inject.unwrap_or(true) {
      let prefix = relative_prefix(filename);
      let tags = ctx
        .chunks
        .iter()
        .map(|chunk| format!("<script src=\"{prefix}{}\"></script>\n", chunk.filename))
        .collect::<String>();
      inject_before_body_end(&mut html, &tags);
    }

    tracing::debug!(filename, chunks = ctx.chunks.len(), "emitting html");
    assets.push(OutputAsset { filename: filename.to_string(), content: html, kind: OutputKind::Asset });
    Ok(())
  }
}

/// `../` once per directory `filename` is nested in.
fn relative_prefix(filename: &str) -> String {
  "../".repeat(filename.matches('/').count())
}

fn inject_before_body_end(html: &mut String, tags: &str) {
  match html.rfind("</body>") {
    Some(idx) => html.insert_str(idx, tags),
    None => html.push_str(tags),
  }
}

#[cfg(test)]
mod tests;
