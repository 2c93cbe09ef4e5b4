use std::{fs, path::Path};

use anyhow::{Context, Result};
use handlebars::Handlebars;
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::{config::ProjectsetupConfig, projectsetup::Projectsetup};

/// Placeholder for values the operator has to supply by hand
pub const FILL_IN: &str = "<fill in>";

const TEMPLATE: &str = "projectsetup.yaml";

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

#[derive(Serialize)]
struct NamespaceData {
  name: String,
  role: String,
  editor_groups: String,
  viewer_groups: String,
}

/// Data passed to the projectsetup template
#[derive(Serialize)]
struct DefinitionData<'a> {
  api_version: &'a str,
  operator_namespace: &'a str,
  name: &'a str,
  owner_group: String,
  namespaces: Vec<NamespaceData>,
}

impl Projectsetup {
  /// Value of the `ownerGroup` field
  ///
  /// With more than one candidate the operator is asked to pick one instead of
  /// choosing on their behalf.
  pub fn owner_group(&self) -> String {
    match self.owner_groups.as_slice() {
      [] => FILL_IN.to_string(),
      [owner] => owner.to_owned(),
      owners => format!("Select one of [{}]", owners.join(", ")),
    }
  }
}

/// Renders projectsetups as resource definitions to be completed by hand
pub struct DefinitionRenderer<'a> {
  handlebars: Handlebars<'a>,
  api_version: String,
  operator_namespace: String,
}

impl DefinitionRenderer<'_> {
  pub fn new(config: &ProjectsetupConfig) -> Result<Self> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_embed_templates::<Templates>()?;

    Ok(Self {
      handlebars,
      api_version: config.api_version.clone(),
      operator_namespace: config.operator_namespace.clone(),
    })
  }

  pub fn render(&self, setup: &Projectsetup) -> Result<String> {
    let data = DefinitionData {
      api_version: &self.api_version,
      operator_namespace: &self.operator_namespace,
      name: &setup.name,
      owner_group: setup.owner_group(),
      namespaces: setup
        .namespaces
        .iter()
        .map(|ns| NamespaceData {
          name: ns.name.clone(),
          role: ns.role.to_string(),
          editor_groups: ns.editor_groups.join(","),
          viewer_groups: ns.viewer_groups.join(","),
        })
        .collect(),
    };

    let rendered = self
      .handlebars
      .render(TEMPLATE, &data)
      .with_context(|| format!("Unable to render projectsetup {}", setup.name))?;

    Ok(rendered)
  }

  /// All definitions, each followed by a line holding a single `-`
  pub fn render_all(&self, setups: &[Projectsetup]) -> Result<String> {
    let mut output = String::new();
    for setup in setups {
      output.push_str(&self.render(setup)?);
      output.push_str("-\n");
    }

    Ok(output)
  }

  /// Write one `<name>.yaml` per projectsetup into `dir`
  pub fn write_files(&self, setups: &[Projectsetup], dir: &Path) -> Result<()> {
    for setup in setups {
      let filename = dir.join(format!("{}.yaml", setup.name));
      fs::write(&filename, self.render(setup)?)
        .with_context(|| format!("Failed to write resource to file {}", filename.display()))?;
    }

    Ok(())
  }
}
