//! Terminal front end for the craftbook recipe explorer.

pub mod config;
pub mod logging;
pub mod render;
pub mod view;

pub use config::{AppConfig, CliArgs, Command, OutputFormat};

use anyhow::{Context, Result};
use craftbook_core::{Catalog, Item, RecipeTree, aggregate};
use render::{SummaryReport, parse_multiplier, render_item, render_list, render_summary};
use std::io::Write;
use tracing::{debug, warn};
use view::ViewState;

const MAX_SUGGESTIONS: usize = 5;

/// Load the configured catalog and execute one command, writing to `out`.
pub fn run(args: CliArgs, out: &mut impl Write) -> Result<()> {
    let config = AppConfig::from_args(&args)?;
    let catalog = craftbook_data::load_catalog(&config.catalog)
        .with_context(|| format!("failed to load catalog {:?}", config.catalog))?;
    execute(&args.command, &catalog, &config, out)
}

/// Execute a command against an already loaded catalog.
pub fn execute(
    command: &Command,
    catalog: &Catalog,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    let multiplier_or_default = |text: &Option<String>| {
        text.as_deref()
            .and_then(parse_multiplier)
            .unwrap_or(config.default_multiplier)
    };

    match command {
        Command::List { search } => {
            let filter = search.as_deref().unwrap_or("");
            let text = render_list(catalog.search(filter), search.as_deref());
            out.write_all(text.as_bytes())?;
        }
        Command::Show {
            id,
            multiplier,
            resources,
            expand_all,
            expand_farmer,
            expand,
        } => {
            let item = lookup(catalog, id)?;
            let state = ViewState {
                id: Some(item.id.to_string()),
                multiplier: multiplier_or_default(multiplier),
                show_resources: *resources,
                expand_all: *expand_all,
                expand_all_farmer: *expand_farmer,
                expand: expand.clone(),
            };
            show(item, &state, catalog, out)?;
        }
        Command::Summary {
            id,
            multiplier,
            format,
        } => {
            let item = lookup(catalog, id)?;
            let multiplier = multiplier_or_default(multiplier);
            let requirements = aggregate(item, multiplier, catalog)?;
            match format {
                OutputFormat::Text => {
                    let text = render_summary(&item.id, multiplier, &requirements);
                    out.write_all(text.as_bytes())?;
                }
                OutputFormat::Json => {
                    let report = SummaryReport::new(&item.id, multiplier, &requirements, catalog);
                    serde_json::to_writer_pretty(&mut *out, &report)?;
                    writeln!(out)?;
                }
            }
        }
        Command::View { query } => {
            let state = ViewState::from_query(query, config.default_multiplier);
            debug!(?state, "parsed view query");
            let Some(id) = state.id.as_deref() else {
                anyhow::bail!("query {query:?} does not select an item (missing 'id')");
            };
            let item = lookup(catalog, id)?;
            show(item, &state, catalog, out)?;
        }
    }
    Ok(())
}

/// Item details, recipe tree, optional summary and a link reproducing the
/// view.
fn show(item: &Item, state: &ViewState, catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    let tree = RecipeTree::expand(item, state.multiplier, catalog, &state.expand_policy());
    out.write_all(render_item(item, catalog, &tree).as_bytes())?;

    if state.show_resources {
        writeln!(out)?;
        match aggregate(item, state.multiplier, catalog) {
            Ok(requirements) => {
                let text = render_summary(&item.id, state.multiplier, &requirements);
                out.write_all(text.as_bytes())?;
            }
            Err(err) => {
                warn!(item = %item.id, %err, "cannot aggregate requirements");
                writeln!(out, "Cannot compute resources: {err}")?;
            }
        }
    }

    writeln!(out, "\nLink: ?{}", state.to_query())?;
    Ok(())
}

fn lookup<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Item> {
    if let Some(item) = catalog.find_by_id(id) {
        return Ok(item);
    }
    let suggestions: Vec<&str> = catalog
        .search(id)
        .take(MAX_SUGGESTIONS)
        .map(|item| item.id.as_str())
        .collect();
    if suggestions.is_empty() {
        anyhow::bail!("unknown item '{id}'");
    }
    anyhow::bail!("unknown item '{id}'; did you mean: {}", suggestions.join(", "))
}
