use std::{fmt::Display, str::FromStr, sync::LazyLock};

use bitflags::bitflags;
use regex::Regex;

static DEVTOOL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(eval-|inline-|hidden-)?(nosources-)?(cheap-(module-)?)?source-map$")
    .expect("devtool pattern is valid")
});

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
  struct DevtoolFlags: u8 {
    /// Module bodies are wrapped in `eval(...)` with a `sourceURL`.
    const EVAL = 1;
    /// A source map is produced.
    const SOURCE_MAP = 1 << 1;
    /// The chunk map is embedded as a data URL instead of a `.map` file.
    const INLINE = 1 << 2;
    /// The `.map` file is written but not referenced from the chunk.
    const HIDDEN = 1 << 3;
    /// Line-only mappings.
    const CHEAP = 1 << 4;
    /// Maps go back to the sources before loaders ran.
    const MODULE = 1 << 5;
    /// `sourcesContent` is left out of the map.
    const NOSOURCES = 1 << 6;
  }
}

/// Source-map generation mode, spelled as webpack's `devtool` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Devtool(DevtoolFlags);

impl Devtool {
  pub const NONE: Self = Self(DevtoolFlags::empty());

  pub fn is_none(self) -> bool {
    self.0.is_empty()
  }

  pub fn is_eval(self) -> bool {
    self.0.contains(DevtoolFlags::EVAL)
  }

  pub fn has_source_map(self) -> bool {
    self.0.contains(DevtoolFlags::SOURCE_MAP)
  }

  pub fn is_inline(self) -> bool {
    self.0.contains(DevtoolFlags::INLINE)
  }

  pub fn is_hidden(self) -> bool {
    self.0.contains(DevtoolFlags::HIDDEN)
  }

  pub fn is_cheap(self) -> bool {
    self.0.contains(DevtoolFlags::CHEAP)
  }

  pub fn is_nosources(self) -> bool {
    self.0.contains(DevtoolFlags::NOSOURCES)
  }

  /// Cheap maps stop at the code loaders produced unless `module` is set.
  pub fn maps_to_loader_input(self) -> bool {
    !self.is_cheap() || self.0.contains(DevtoolFlags::MODULE)
  }
}

impl FromStr for Devtool {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "false" | "none" => return Ok(Self::NONE),
      "eval" => return Ok(Self(DevtoolFlags::EVAL)),
      _ => {}
    }

    let captures = DEVTOOL_RE.captures(s).ok_or_else(|| {
      format!(
        "Invalid devtool \"{s}\". Expected `false`, `eval` or a value matching \
         [inline-|hidden-|eval-][nosources-][cheap-[module-]]source-map."
      )
    })?;

    let mut flags = DevtoolFlags::SOURCE_MAP;
    match captures.get(1).map(|m| m.as_str()) {
      Some("eval-") => flags |= DevtoolFlags::EVAL,
      Some("inline-") => flags |= DevtoolFlags::INLINE,
      Some("hidden-") => flags |= DevtoolFlags::HIDDEN,
      _ => {}
    }
    if captures.get(2).is_some() {
      flags |= DevtoolFlags::NOSOURCES;
    }
    if captures.get(3).is_some() {
      flags |= DevtoolFlags::CHEAP;
    }
    if captures.get(4).is_some() {
      flags |= DevtoolFlags::MODULE;
    }

    Ok(Self(flags))
  }
}

impl Display for Devtool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.is_none() {
      return write!(f, "false");
    }
    if !self.has_source_map() {
      return write!(f, "eval");
    }
    if self.is_eval() {
      write!(f, "eval-")?;
    } else if self.is_inline() {
      write!(f, "inline-")?;
    } else if self.is_hidden() {
      write!(f, "hidden-")?;
    }
    if self.is_nosources() {
      write!(f, "nosources-")?;
    }
    if self.is_cheap() {
      write!(f, "cheap-")?;
      if self.0.contains(DevtoolFlags::MODULE) {
        write!(f, "module-")?;
      }
    }
    write!(f, "source-map")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_webpack_spellings() {
    let devtool: Devtool = "eval-source-map".parse().unwrap();
    assert!(devtool.is_eval() && devtool.has_source_map() && !devtool.is_cheap());

    let devtool: Devtool = "hidden-nosources-cheap-module-source-map".parse().unwrap();
    assert!(devtool.is_hidden() && devtool.is_nosources() && devtool.is_cheap());
    assert!(!devtool.is_eval());

    let devtool: Devtool = "eval".parse().unwrap();
    assert!(devtool.is_eval() && !devtool.has_source_map());

    assert!("false".parse::<Devtool>().unwrap().is_none());
  }

  #[test]
  fn rejects_unknown_values() {
    assert!("source-maps".parse::<Devtool>().is_err());
    assert!("inline-eval-source-map".parse::<Devtool>().is_err());
    assert!("".parse::<Devtool>().is_err());
  }

  #[test]
  fn display_round_trips_canonical_names() {
    for name in ["false", "eval", "source-map", "eval-cheap-module-source-map", "inline-source-map"] {
      assert_eq!(name.parse::<Devtool>().unwrap().to_string(), name);
    }
  }
}
