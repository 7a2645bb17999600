use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[(name|id|hash|contenthash|chunkhash)(?::(\d+))?\]")
    .expect("placeholder pattern is valid")
});

/// Full hashes are this long; `[contenthash:N]` keeps the first `N` characters.
pub const DEFAULT_HASH_LEN: usize = 20;

/// `output.filename`, e.g. `[name].[contenthash:8].js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

pub struct FilenameRenderOptions<'a> {
  pub name: &'a str,
  pub id: &'a str,
  /// Called with the requested length when the template asks for a hash.
  pub hash: Option<&'a dyn Fn(usize) -> String>,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn render(&self, options: &FilenameRenderOptions<'_>) -> String {
    PLACEHOLDER_RE
      .replace_all(&self.template, |caps: &Captures| match &caps[1] {
        "name" => options.name.to_string(),
        "id" => options.id.to_string(),
        _ => {
          let len = caps.get(2).and_then(|len| len.as_str().parse().ok()).unwrap_or(DEFAULT_HASH_LEN);
          options.hash.map(|hash| hash(len)).unwrap_or_default()
        }
      })
      .into_owned()
  }
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self::new(template)
  }
}

#[test]
fn renders_placeholders() {
  let template = FilenameTemplate::new("[name].[contenthash:4].js".to_string());
  let hash = |len: usize| "abcdefgh"[..len].to_string();
  let rendered =
    template.render(&FilenameRenderOptions { name: "app", id: "0", hash: Some(&hash) });
  assert_eq!(rendered, "app.abcd.js");

  let template = FilenameTemplate::new("[name]-[id].js".to_string());
  assert_eq!(template.render(&FilenameRenderOptions { name: "app", id: "3", hash: None }), "app-3.js");
}
