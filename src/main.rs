use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use summora_icons::gradient::{parse_color, Gradient};
use summora_icons::icon_gen::{self, IconConfig, Style};

#[derive(Debug, Parser)]
#[clap(
    name = "summora-icons",
    about = "Generate the gradient placeholder icons for the Summora extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "icons")]
    output: PathBuf,

    /// Letter drawn in the middle of every icon.
    #[clap(short, long, value_name = "CHAR", default_value = "S")]
    letter: char,

    /// Gradient colour at the top edge (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#667eea")]
    start_color: String,

    /// Gradient colour at the bottom edge (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#764ba2")]
    end_color: String,

    /// TrueType font tried before the system fonts
    #[clap(long, value_name = "FONT")]
    font: Option<PathBuf>,

    /// Also write an icons.json fragment for the extension manifest
    #[clap(long)]
    manifest: bool,
}

impl Args {
    fn into_config(self) -> Result<IconConfig> {
        let start = parse_color(&self.start_color).context("Invalid --start-color")?;
        let end = parse_color(&self.end_color).context("Invalid --end-color")?;

        Ok(IconConfig {
            output: self.output,
            style: Style {
                gradient: Gradient::new(start, end),
                letter: self.letter,
                ..Style::default()
            },
            font: self.font,
            manifest: self.manifest,
            ..IconConfig::default()
        })
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config()?;

    icon_gen::generate_icons(&config)?;
    Ok(())
}
