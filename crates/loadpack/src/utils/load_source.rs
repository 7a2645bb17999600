use std::path::Path;

use anyhow::Context;

/// Read a module from disk, rejecting files that are not valid UTF-8.
pub fn load_source(path: &Path) -> anyhow::Result<String> {
  let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
  match simdutf8::basic::from_utf8(&bytes) {
    Ok(text) => Ok(text.to_owned()),
    Err(_) => anyhow::bail!("{} is not valid UTF-8", path.display()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_binary_files() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("a.js");
    let binary = dir.path().join("b.js");
    std::fs::write(&text, "var a = 1;").unwrap();
    std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

    assert_eq!(load_source(&text).unwrap(), "var a = 1;");
    assert!(load_source(&binary).is_err());
    assert!(load_source(&dir.path().join("missing.js")).is_err());
  }

  #[test]
  fn keeps_multibyte_text_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("i18n.js");
    std::fs::write(&path, "export const greeting = \"héllo, 世界\";").unwrap();
    assert_eq!(load_source(&path).unwrap(), "export const greeting = \"héllo, 世界\";");
  }
}
