use std::{fs::File, io::prelude::*};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum Format {
  /// JSON format used for logging or writing to a *.json file
  Json,
  /// Text format used for writing to stdout
  #[default]
  Text,
}

/// Render `results` in the requested format, `to_text` producing the text variant
pub fn render<T, F>(results: &T, format: Format, to_text: F) -> Result<String>
where
  T: Serialize + ?Sized,
  F: FnOnce(&T) -> String,
{
  let output = match format {
    Format::Json => format!("{}\n", serde_json::to_string_pretty(results)?),
    Format::Text => to_text(results),
  };

  Ok(output)
}

/// Write to the file when one is given, otherwise to stdout
pub fn output(output: &str, filename: Option<&str>) -> Result<()> {
  match filename {
    Some(filename) => {
      let mut file = File::create(filename).with_context(|| format!("Failed to create {filename}"))?;
      file.write_all(output.as_bytes())?;
    }
    None => {
      print!("{output}");
    }
  }

  Ok(())
}
