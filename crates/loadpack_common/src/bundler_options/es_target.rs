use std::{fmt::Display, str::FromStr};

use oxc::transformer::ESTarget as OxcEstarget;

/// Language level the environment preset lowers syntax to.
///
/// Defaults to `es5`, the level an environment preset targets when no
/// browser targets are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ESTarget {
  #[default]
  Es5,
  Es2015,
  Es2016,
  Es2017,
  Es2018,
  Es2019,
  Es2020,
  Es2021,
  Es2022,
  Es2023,
  Es2024,
  EsNext,
}

impl ESTarget {
  const ALL: [(Self, &'static str); 12] = [
    (Self::Es5, "es5"),
    (Self::Es2015, "es2015"),
    (Self::Es2016, "es2016"),
    (Self::Es2017, "es2017"),
    (Self::Es2018, "es2018"),
    (Self::Es2019, "es2019"),
    (Self::Es2020, "es2020"),
    (Self::Es2021, "es2021"),
    (Self::Es2022, "es2022"),
    (Self::Es2023, "es2023"),
    (Self::Es2024, "es2024"),
    (Self::EsNext, "esnext"),
  ];

  pub fn as_str(self) -> &'static str {
    Self::ALL.iter().find(|(target, _)| *target == self).map_or("esnext", |(_, name)| name)
  }
}

impl FromStr for ESTarget {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lowercase = s.to_ascii_lowercase();
    Self::ALL
      .iter()
      .find(|(_, name)| *name == lowercase)
      .map(|(target, _)| *target)
      .ok_or_else(|| format!("Invalid target \"{s}\"."))
  }
}

impl Display for ESTarget {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<ESTarget> for OxcEstarget {
  fn from(value: ESTarget) -> Self {
    match value {
      ESTarget::Es5 => Self::ES5,
      ESTarget::Es2015 => Self::ES2015,
      ESTarget::Es2016 => Self::ES2016,
      ESTarget::Es2017 => Self::ES2017,
      ESTarget::Es2018 => Self::ES2018,
      ESTarget::Es2019 => Self::ES2019,
      ESTarget::Es2020 => Self::ES2020,
      ESTarget::Es2021 => Self::ES2021,
      ESTarget::Es2022 => Self::ES2022,
      ESTarget::Es2023 => Self::ES2023,
      ESTarget::Es2024 => Self::ES2024,
      ESTarget::EsNext => Self::ESNext,
    }
  }
}

#[test]
fn test_parse_es_target() {
  assert_eq!("ES2015".parse::<ESTarget>(), Ok(ESTarget::Es2015));
  assert_eq!("esnext".parse::<ESTarget>().map(|t| t.to_string()), Ok("esnext".to_string()));
  assert!("es3".parse::<ESTarget>().is_err());
}
