//! Coursefinder CLI - curriculum search and elective recommendations.

use std::io::{stdout, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use coursefinder::catalog::{normalize_tags, Catalog};
use coursefinder::cli::{Cli, Command};
use coursefinder::config::Config;
use coursefinder::intent::explain;
use coursefinder::output::Format;
use coursefinder::tags::map_background_to_tags;
use coursefinder::{Assistant, Reply};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "coursefinder=debug"
    } else {
        "coursefinder=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_default(".")?,
    };
    if let Some(data) = cli.data {
        config.dataset = data;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    let format = Format::from(config.output.format);
    let mut out = stdout().lock();

    let load = |config: &Config| {
        Catalog::load(&config.dataset, config.catalog.load_options())
            .with_context(|| format!("failed to load dataset {}", config.dataset.display()))
    };

    match cli.command {
        Command::Config(args) => {
            if args.default {
                out.write_all(Config::default_toml().as_bytes())?;
            } else {
                out.write_all(config.to_toml()?.as_bytes())?;
            }
        }
        Command::Classify(args) => format.format(&explain(&args.text), &mut out)?,
        Command::Tags(args) => format.format(&map_background_to_tags(&args.text), &mut out)?,
        Command::Search(args) => {
            args.filters.apply(&mut config.query);
            let catalog = load(&config)?;
            let mut options = config.query.search_options();
            options.full_scan_fallback &= !args.no_fallback;
            let mut hits = catalog.search(&args.query, &options);
            if let Some(semester) = config.query.semester {
                hits.retain(|h| h.course.semester == Some(semester));
            }
            format.format(&hits, &mut out)?;
        }
        Command::Recommend(args) => {
            args.filters.apply(&mut config.query);
            let catalog = load(&config)?;
            let tags = match args.background {
                Some(text) if args.tags.is_empty() => map_background_to_tags(&text),
                _ => normalize_tags(args.tags),
            };
            let mut items =
                catalog.recommend(&tags, config.query.program.as_deref(), config.query.top_k);
            if let Some(semester) = config.query.semester {
                items.retain(|r| r.course.semester == Some(semester));
            }
            format.format(&Reply::Recommendations { tags, items }, &mut out)?;
        }
        Command::Plan(args) => {
            let catalog = load(&config)?;
            let limit = args.limit.unwrap_or(config.query.plan_limit);
            let courses = catalog.plan(&args.program, args.semester, limit);
            format.format(&courses, &mut out)?;
        }
        Command::Ask(args) => {
            args.filters.apply(&mut config.query);
            let catalog = load(&config)?;
            let reply = Assistant::new(&catalog, &config.query).respond(&args.text);
            format.format(&reply, &mut out)?;
        }
        Command::Export(args) => {
            let catalog = load(&config)?;
            let grouped = catalog.by_program();
            match args.output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    serde_json::to_writer_pretty(file, &grouped)?;
                    tracing::info!(path = %path.display(), programs = grouped.len(), "exported catalog");
                }
                None => format.format(&grouped, &mut out)?,
            }
        }
        Command::Stats => {
            let catalog = load(&config)?;
            format.format(&catalog.stats(), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
