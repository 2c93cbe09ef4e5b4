pub mod cli;
pub mod clients;
pub mod config;
pub mod groups;
pub mod hpa;
pub mod images;
pub mod ocp;
pub mod output;
pub mod projects;
pub mod projectsetup;
pub mod usercache;

use std::{fs, path::Path};

use anyhow::{Context, Result};

pub use cli::{Cli, Commands, ExtractProjectsetups, ListGroups, Report};
use clients::{OcpClients, RealOcpClients};
use config::Config;
use projectsetup::DefinitionRenderer;
use usercache::UserCache;

/// Target of `extract-projectsetups` that writes the definitions to stdout
pub const STDOUT: &str = "-";

/// Load configuration, connect to the cluster and run the selected command
pub async fn run(cli: &Cli) -> Result<()> {
  if let Commands::ExtractProjectsetups(ExtractProjectsetups { target: None }) = &cli.commands {
    print!("{}", cli::extract_projectsetups_help());
    return Ok(());
  }

  let config = config::load(cli.config.as_deref())?;
  let client = RealOcpClients::new(cli.kubeconfig.as_deref(), cli.context.as_deref()).await?;

  let report = match &cli.commands {
    Commands::ListGroups(args) => list_groups(&client, args).await?,
    Commands::ListProjects(_) => list_projects(&client).await?,
    Commands::ExtractProjectsetups(args) => extract_projectsetups(&client, &config, args).await?,
    Commands::MatchImageGit(args) => return match_image_git(&client, &config, args).await,
    Commands::ListBrokenHpas(args) => return list_broken_hpas(&client, args).await,
  };
  print!("{report}");

  Ok(())
}

/// Groups report; `--export` wins over `--groupsfile`, which wins over `--search`,
/// which wins over the plain listing
pub async fn list_groups<C: OcpClients>(client: &C, args: &ListGroups) -> Result<String> {
  let groups = groups::collect(client, args.group.as_deref()).await?;

  if let Some(dir) = &args.export {
    let written = groups::export(&groups, dir)?;
    return Ok(format!("Wrote {written} group definitions to {}\n", dir.display()));
  }

  if let Some(file) = &args.groupsfile {
    fs::write(file, groups::to_json(&groups)?)
      .with_context(|| format!("Failed to write groups file {}", file.display()))?;
    return Ok(String::new());
  }

  if let Some(needle) = &args.search {
    let cache = UserCache::load(client).await?;
    return Ok(
      groups::search(&groups, &cache, needle)
        .into_iter()
        .map(|found| format!("{found}\n"))
        .collect(),
    );
  }

  if args.simple {
    return Ok(groups.iter().map(groups::simple).collect());
  }

  let cache = UserCache::load(client).await?;
  Ok(groups.iter().map(|group| groups::formatted(group, &cache)).collect())
}

pub async fn list_projects<C: OcpClients>(client: &C) -> Result<String> {
  let projects = client.get_projects().await?;
  Ok(projects::to_text(&projects))
}

/// Unmapped namespaces first, then the definitions when they go to stdout, then a summary
pub async fn extract_projectsetups<C: OcpClients>(
  client: &C,
  config: &Config,
  args: &ExtractProjectsetups,
) -> Result<String> {
  let target = args.target.as_deref().unwrap_or(STDOUT);
  let renderer = DefinitionRenderer::new(&config.projectsetups)?;
  let extraction = projectsetup::extract(client, &config.projectsetups).await?;

  let mut report = String::from("Unmapped namespaces:\n");
  for namespace in &extraction.unmapped {
    report.push_str(&format!(" - {namespace}\n"));
  }

  if target == STDOUT {
    report.push_str("\nGenerated projectsetups:\n\n");
    report.push_str(&renderer.render_all(&extraction.projectsetups)?);
  } else {
    renderer.write_files(&extraction.projectsetups, Path::new(target))?;
  }

  report.push_str(&format!(
    "Extracted {} projectsetups to {target}\n",
    extraction.projectsetups.len()
  ));

  Ok(report)
}

pub async fn match_image_git<C: OcpClients>(client: &C, config: &Config, args: &Report) -> Result<()> {
  let report = images::correlate(client, &config.images).await?;
  let rendered = output::render(&report, args.format, images::ImageReport::to_text)?;

  output::output(&rendered, args.output.as_deref())
}

pub async fn list_broken_hpas<C: OcpClients>(client: &C, args: &Report) -> Result<()> {
  let broken = hpa::broken_autoscalers(client).await?;
  let rendered = output::render(broken.as_slice(), args.format, hpa::to_text)?;

  output::output(&rendered, args.output.as_deref())
}
