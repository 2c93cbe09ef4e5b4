use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tabled::{builder::Builder, settings::Style};

use crate::{clients::OcpClients, ocp::Group, usercache::UserCache};

/// Fetch the named group, or all groups when no name is given
///
/// Both calls are fatal on failure.
pub async fn collect<C: OcpClients>(client: &C, name: Option<&str>) -> Result<Vec<Group>> {
  match name {
    Some(name) => Ok(vec![client.get_group(name).await?]),
    None => client.get_groups().await,
  }
}

fn sorted_users(group: &Group) -> Vec<String> {
  let mut users = group.users.clone();
  users.sort();
  users
}

/// Group name followed by its users, one per line, framed by blank lines
pub fn simple(group: &Group) -> String {
  let mut output = format!("\n{}\n", group.name);
  for user in sorted_users(group) {
    output.push_str(&user);
    output.push('\n');
  }
  output.push('\n');

  output
}

/// Group name and members with their full names in aligned columns
pub fn formatted(group: &Group, cache: &UserCache) -> String {
  if group.users.is_empty() {
    return "\n".to_owned();
  }

  let mut builder = Builder::default();
  for user in &group.users {
    builder.push_record([format!("- {user}"), cache.full_name(user).to_owned()]);
  }
  let mut table = builder.build();
  table.with(Style::blank());

  format!("Group: {}\n Members:\n{table}\n\n", group.name)
}

/// Entry of the groups file consumed by the ansible group tooling
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
  pub name: String,
  pub users: Vec<String>,
}

/// JSON array of `{name, users}` with groups and users sorted, tab indented
pub fn to_json(groups: &[Group]) -> Result<String> {
  let mut entries: Vec<GroupEntry> = groups
    .iter()
    .map(|group| GroupEntry {
      name: group.name.clone(),
      users: sorted_users(group),
    })
    .collect();
  entries.sort_by(|a, b| a.name.cmp(&b.name));

  let mut buf = Vec::new();
  let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
  let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
  entries.serialize(&mut ser)?;

  let mut output = String::from_utf8(buf)?;
  output.push('\n');

  Ok(output)
}

/// Members whose full name contains `needle`, ignoring case
pub fn search(groups: &[Group], cache: &UserCache, needle: &str) -> Vec<String> {
  let needle = needle.to_lowercase();
  let mut found = Vec::new();

  for group in groups {
    for user in &group.users {
      let name = cache.full_name(user);
      if name.to_lowercase().contains(&needle) {
        found.push(format!("Found: {name} ({user}) in group {}", group.name));
      }
    }
  }

  found
}

/// Write one `<group>.txt` per group into `dir` using the simple format
pub fn export(groups: &[Group], dir: &Path) -> Result<usize> {
  for group in groups {
    let filename = dir.join(format!("{}.txt", group.name));
    fs::write(&filename, simple(group)).with_context(|| format!("Failed to write file {}", filename.display()))?;
  }

  Ok(groups.len())
}
