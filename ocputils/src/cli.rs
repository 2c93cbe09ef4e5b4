use std::path::PathBuf;

use anstyle::{AnsiColor, Effects};
use clap::{Args, Parser, Subcommand, builder::Styles};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use crate::output;

fn styles() -> Styles {
  Styles::styled()
    .header(AnsiColor::Green.on_default() | Effects::BOLD)
    .usage(AnsiColor::Green.on_default() | Effects::BOLD)
    .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
    .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(author, about, version)]
#[command(propagate_version = true, styles = styles())]
pub struct Cli {
  #[command(subcommand)]
  pub commands: Commands,

  /// Path to the kubeconfig file [default: ~/.kube/config]
  #[arg(long, global = true)]
  pub kubeconfig: Option<PathBuf>,

  /// Kubeconfig context to use instead of the current context
  #[arg(long, global = true)]
  pub context: Option<String>,

  /// Path to the configuration file [default: .ocputils.yaml if present]
  #[arg(long, global = true)]
  pub config: Option<String>,

  #[clap(flatten)]
  pub verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  ListGroups(ListGroups),
  ListProjects(ListProjects),
  ExtractProjectsetups(ExtractProjectsetups),
  /// Map the images of deployment configs to their git project and repository
  MatchImageGit(Report),
  /// List autoscalers whose scale target does not exist
  ListBrokenHpas(Report),
}

/// List groups and their members
#[derive(Args, Debug, Default)]
pub struct ListGroups {
  /// Group to show, or all groups when omitted
  #[arg(short, long)]
  pub group: Option<String>,

  /// Show output using simple Ansible Tower compatible formatting
  #[arg(long)]
  pub simple: bool,

  /// Search for users whose full name contains the given text
  #[arg(long)]
  pub search: Option<String>,

  /// Export definitions into simple text files in the given directory, one per group
  #[arg(long, value_name = "DIRECTORY")]
  pub export: Option<PathBuf>,

  /// Create a JSON file with group definitions for use with opt-ansible-groups
  #[arg(long, value_name = "FILE")]
  pub groupsfile: Option<PathBuf>,
}

/// List the projects in the cluster
#[derive(Args, Debug)]
pub struct ListProjects {}

/// Extract namespaces and create Projectsetup resource definitions for those that match known suffixes
///
/// The extracted resources MUST be completed by hand before they are used with the projects operator.
#[derive(Args, Debug)]
pub struct ExtractProjectsetups {
  /// Directory to write one <name>.yaml per projectsetup into, or - to write to stdout
  #[arg(value_name = "DIRECTORY")]
  pub target: Option<String>,
}

/// Long help of `extract-projectsetups`, shown when it is run without a target
pub fn extract_projectsetups_help() -> String {
  use clap::CommandFactory;

  let mut command = Cli::command();
  command
    .find_subcommand_mut("extract-projectsetups")
    .map(|sub| sub.render_long_help().to_string())
    .unwrap_or_default()
}

#[derive(Args, Debug, Default)]
pub struct Report {
  #[arg(short, long, value_enum, default_value_t)]
  pub format: output::Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,
}
