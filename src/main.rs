use anyhow::Context;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tgcalls_docs::{
    build::build_from_sources,
    cli::{Cli, Commands},
    config::Settings,
    error::Result,
    format::{
        OutputFormat, render_as, render_markup_hits, render_overview, render_overview_text,
    },
    search::{MarkupIndex, RankedSearch, RecordIndex},
    server::DocServer,
    state::DocState,
    tools::RECORD_SEPARATOR,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    tgcalls_docs::tracing::init(cli.json_logs);

    let mut settings = Settings::load(cli.settings.as_deref())?;

    match cli.command {
        Commands::Build {
            map,
            config,
            output,
        } => {
            if let Some(map) = map {
                settings.sources.map = map;
            }
            if let Some(config) = config {
                settings.sources.config = config;
            }
            if let Some(output) = output {
                settings.snapshot.path = output;
            }
            run_build(&settings)
        }
        Commands::Search {
            query,
            limit,
            raw,
            errors,
            format,
        } => {
            let limit = limit.unwrap_or(settings.search.limit);
            if raw {
                run_markup_search(&settings, &query, limit)
            } else {
                run_search(&settings, &query, limit, errors, format)
            }
        }
        Commands::Show {
            path,
            errors,
            raw,
            format,
        } => {
            if raw {
                run_show_raw(&settings, &path, format)
            } else {
                run_show(&settings, &path, errors, format)
            }
        }
        Commands::Serve { markup } => {
            settings.search.markup |= markup;
            run_server(settings)
        }
    }
}

fn run_build(settings: &Settings) -> Result<()> {
    let report = build_from_sources(settings)?;
    println!(
        "Wrote {} records to {} ({} pages skipped, {} unresolved references)",
        report.records,
        settings.snapshot.path.display(),
        report.skipped.len(),
        report.unresolved
    );
    for path in &report.skipped {
        println!("  skipped: {}", path);
    }
    Ok(())
}

fn load_records(settings: &Settings) -> Result<RecordIndex> {
    RecordIndex::load(&settings.snapshot.path)
        .context("Run `tgcalls-docs build` to create the snapshot first")
}

fn run_search(
    settings: &Settings,
    query: &str,
    limit: usize,
    include_errors: bool,
    format: OutputFormat,
) -> Result<()> {
    let index = load_records(settings)?;
    let hits = index.search(query, limit);
    if hits.is_empty() {
        println!("No results found for '{}'.", query.trim());
        return Ok(());
    }

    let rendered: Vec<String> = hits
        .iter()
        .map(|record| render_as(record, include_errors, format))
        .collect();
    println!("{}", rendered.join(RECORD_SEPARATOR));
    Ok(())
}

fn run_markup_search(settings: &Settings, query: &str, limit: usize) -> Result<()> {
    let markup = MarkupIndex::load(&settings.sources.map)?;
    let hits = markup.search(query, limit);
    print!("{}", render_markup_hits(query, &hits));
    Ok(())
}

fn run_show(
    settings: &Settings,
    path: &str,
    include_errors: bool,
    format: OutputFormat,
) -> Result<()> {
    let index = load_records(settings)?;
    if let Some(record) = index.get(path) {
        println!("{}", render_as(record, include_errors, format));
        return Ok(());
    }

    let suggestions = index.suggest(path, 5);
    anyhow::ensure!(!suggestions.is_empty(), "No documentation page at '{}'", path);

    println!("No documentation page at '{}'. Did you mean:", path);
    for suggestion in suggestions {
        println!("  {}  ({})", suggestion.path, suggestion.title);
    }
    Ok(())
}

fn run_show_raw(settings: &Settings, path: &str, format: OutputFormat) -> Result<()> {
    let markup = MarkupIndex::load(&settings.sources.map)?;
    let overview = markup
        .overview(path)
        .with_context(|| format!("No page at '{}' in {}", path, settings.sources.map))?;
    match format {
        OutputFormat::Html => println!("{}", render_overview(&overview)),
        OutputFormat::Text => print!("{}", render_overview_text(&overview)),
    }
    Ok(())
}

fn run_server(settings: Settings) -> Result<()> {
    // Sources are read with blocking I/O, so load before the runtime starts.
    let state = DocState::load(settings)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        tracing::info!("Starting tgcalls-docs MCP server on stdio");
        let service = DocServer::new(state)
            .serve(stdio())
            .await
            .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;
        service.waiting().await?;
        Ok::<(), anyhow::Error>(())
    })
}
