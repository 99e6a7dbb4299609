//! svg-sprite - merge a directory of SVG icons into one inline sprite sheet.

use anyhow::{Context, Result};
use clap::Parser;
use site_tools::{cli::SpriteCli, log, logger, sprite::SpriteBuilder};

fn main() -> Result<()> {
    let cli = SpriteCli::parse();
    logger::apply_color_choice(cli.color);
    logger::set_verbose(cli.verbose);

    let report = SpriteBuilder::new(&cli.input, &cli.output)
        .build()
        .with_context(|| format!("failed to build sprite from {}", cli.input.display()))?;

    log!("sprite"; "wrote {} symbol(s) to {}", report.symbols, report.output.display());
    Ok(())
}
