use std::path::{Component, Path};

use sugar_path::SugarPath;

pub trait PathExt {
  /// Slash-separated form of the path, regardless of the host platform.
  fn to_slash_string(&self) -> String;

  /// Stable module id used inside bundles: `./`-prefixed and relative to
  /// `context` when the path lives below it, the absolute slash path otherwise.
  fn module_id(&self, context: &Path) -> String;

  /// Whether `self` equals `dir` or lives somewhere below it.
  fn is_within(&self, dir: &Path) -> bool;
}

impl PathExt for Path {
  fn to_slash_string(&self) -> String {
    self.to_slash_lossy().into_owned()
  }

  fn module_id(&self, context: &Path) -> String {
    if !self.is_within(context) {
      return self.to_slash_string();
    }
    let relative = self.relative(context);
    let relative = relative.to_slash_lossy();
    if relative.starts_with("../") {
      relative.into_owned()
    } else {
      format!("./{relative}")
    }
  }

  fn is_within(&self, dir: &Path) -> bool {
    let normalized = self.normalize();
    let dir = dir.normalize();
    let mut components = normalized.components();
    dir
      .components()
      .filter(|component| !matches!(component, Component::CurDir))
      .all(|expected| components.next() == Some(expected))
  }
}

#[test]
fn test_module_id() {
  let context = Path::new("/project");
  assert_eq!(Path::new("/project/src/app.js").module_id(context), "./src/app.js");
  assert_eq!(Path::new("/elsewhere/lib.js").module_id(context), "/elsewhere/lib.js");
}

#[test]
fn test_is_within() {
  let dir = Path::new("/project/src");
  assert!(Path::new("/project/src/app.js").is_within(dir));
  assert!(Path::new("/project/src").is_within(dir));
  assert!(!Path::new("/project/srcs/app.js").is_within(dir));
  assert!(!Path::new("/project/lib/app.js").is_within(dir));
}
