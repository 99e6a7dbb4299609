//! md-export - write a plain Markdown copy of every article.

use anyhow::{Context, Result};
use clap::Parser;
use site_tools::{
    cli::ExportCli, config::SiteToolsConfig, export::MarkdownExporter, log, logger,
};

fn main() -> Result<()> {
    let cli = ExportCli::parse();
    logger::apply_color_choice(cli.color);
    logger::set_verbose(cli.verbose);

    let config = SiteToolsConfig::load(&cli)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let save_as = config.save_as()?;

    let exporter = MarkdownExporter::new(&config.export.content, &config.export.output, save_as)
        .with_page_paths(config.export.page_paths.iter().cloned());
    let exported = exporter.export_all().with_context(|| {
        format!(
            "failed to export articles from {}",
            config.export.content.display()
        )
    })?;

    log!("export"; "wrote {} markdown file(s) to {}", exported.len(), config.export.output.display());
    Ok(())
}
