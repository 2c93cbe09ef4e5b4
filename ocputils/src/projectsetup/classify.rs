use serde::{Deserialize, Serialize};

/// Purpose of a namespace within its projectsetup, inferred from the naming suffix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Build,
  Deploy,
  Promote,
}

impl std::fmt::Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match *self {
      Role::Build => write!(f, "build"),
      Role::Deploy => write!(f, "deploy"),
      Role::Promote => write!(f, "promote"),
    }
  }
}

/// Ordered mapping of namespace suffixes to roles
///
/// Suffixes are consulted longest first so that a name which ends in more than one
/// configured suffix always resolves the same way. Suffixes of equal length keep
/// the order they were declared in.
#[derive(Clone, Debug, Default)]
pub struct SuffixTable {
  entries: Vec<(String, Role)>,
}

impl SuffixTable {
  pub fn new(entries: impl IntoIterator<Item = (String, Role)>) -> Self {
    let mut entries: Vec<(String, Role)> = entries.into_iter().collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    Self { entries }
  }

  /// Strip the first matching suffix and return the role with the remaining base name
  ///
  /// A match that would leave an empty base name is not a match.
  pub fn strip_and_identify<'a>(&self, name: &'a str) -> Option<(Role, &'a str)> {
    self.entries.iter().find_map(|(suffix, role)| {
      name
        .strip_suffix(suffix.as_str())
        .filter(|base| !base.is_empty())
        .map(|base| (*role, base))
    })
  }

  #[cfg(test)]
  fn suffixes(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(suffix, _)| suffix.as_str())
  }
}
