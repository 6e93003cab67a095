mod args;
mod config;
mod render;

use anyhow::{Context, Result};
use args::{FilterArgs, SelectionArgs, parse_selection};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::AppConfig;
use dashboard::{
    NoteStore, Session, parse_column, parse_combination, parse_dimension, parse_group_by,
    parse_metric,
};
use data_loader::{Dimension, NumericColumn};
use pipeline::{
    AggregateOptions, GroupBy, HeatmapRequest, MembershipSelection, Metric, SortOrder,
    TimeGranularity,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// game-insights - Steam games analytics
#[derive(Parser)]
#[command(name = "game-insights")]
#[command(about = "Filter and aggregate Steam game success metrics", long_about = None)]
struct Cli {
    /// Directory holding cleaned_games.csv and the index files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML config file (defaults to ./game-insights.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List numeric columns with their ranges and current filters
    Columns {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Aggregate success metrics by one grouping
    Aggregate {
        /// price-bin, language-count, os, os-combination, os-count, genres,
        /// tags, categories, languages, year, month or quarter
        #[arg(long, value_parser = parse_group_by)]
        group_by: GroupBy,

        /// Metrics to report (default: every success metric)
        #[arg(long = "metric", value_parser = parse_metric)]
        metrics: Vec<Metric>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Keep the N largest groups and collapse the rest into "Other"
        #[arg(long)]
        top_n: Option<usize>,

        /// Hide groups with fewer games unless pinned
        #[arg(long)]
        min_group_size: Option<usize>,

        /// Always show this group
        #[arg(long = "pin", value_name = "LABEL")]
        pinned: Vec<String>,

        /// natural, asc or desc (by the first metric)
        #[arg(long, default_value = "natural")]
        sort: SortOrder,

        /// Add per-metric min-max normalized values
        #[arg(long)]
        normalize: bool,

        /// Leave zero values of this column out of its mean
        #[arg(long, value_parser = parse_column)]
        zero_as_missing: Vec<NumericColumn>,
    },

    /// Compare the groups of one membership dimension across metrics
    Heatmap {
        #[arg(long, default_value = "languages", value_parser = parse_dimension)]
        dimension: Dimension,

        #[arg(long = "metric", value_parser = parse_metric)]
        metrics: Vec<Metric>,

        /// Comma-separated keys shown as one custom row, e.g. "English,German"
        #[arg(long = "combination", value_name = "KEYS")]
        combinations: Vec<String>,

        /// Keep groups ranking in the top K of any metric
        #[arg(long)]
        top_per_metric: Option<usize>,

        #[arg(long)]
        min_group_size: Option<usize>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Games released per month or year, with summed or averaged columns
    Timeseries {
        #[arg(long, default_value = "month")]
        granularity: TimeGranularity,

        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        /// Columns to reduce per period (default: Review score)
        #[arg(long = "metric", value_parser = parse_column)]
        columns: Vec<NumericColumn>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Another selection to compare, e.g. "genres=Indie;tags=Co-op"
        #[arg(long = "compare", value_name = "SELECTION", value_parser = parse_selection)]
        compare: Vec<MembershipSelection>,
    },

    /// Show, save or clear the session notes
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },
}

#[derive(Subcommand)]
enum NotesAction {
    Show,
    Save { text: String },
    Clear,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Columns { filters } => {
            let mut session = load_session(&config)?;
            filters.apply(&mut session);
            let columns = session.list_columns();
            if cli.json {
                print_json(&columns)?;
            } else {
                render::print_columns(&columns);
            }
        }
        Commands::Aggregate {
            group_by,
            metrics,
            selection,
            filters,
            top_n,
            min_group_size,
            pinned,
            sort,
            normalize,
            zero_as_missing,
        } => {
            let mut session = load_session(&config)?;
            filters.apply(&mut session);
            let metrics = or_success_metrics(metrics);
            let mut options = AggregateOptions::new().with_sort(sort);
            // Unbounded membership groupings get the configured caps by default
            let membership = matches!(group_by, GroupBy::Membership(_));
            if let Some(n) = top_n.or(membership.then_some(config.aggregation.top_n)) {
                options = options.with_top_n(n);
            }
            if let Some(size) = min_group_size.or(membership.then_some(config.aggregation.min_group_size)) {
                options = options.with_min_group_size(size);
            }
            for label in pinned {
                options = options.pin(label);
            }
            for column in zero_as_missing {
                options = options.zero_as_missing(column);
            }
            if normalize {
                options = options.normalized();
            }

            let selection = selection.selection();
            let table = session.query(&selection, group_by, &metrics, &options);
            let stats = session.cache_stats();
            tracing::debug!(hits = stats.hits, misses = stats.misses, "Aggregation cache");
            if cli.json {
                print_json(table.as_ref())?;
            } else {
                render::print_table(&selection.label(), &table);
            }
        }
        Commands::Heatmap {
            dimension,
            metrics,
            combinations,
            top_per_metric,
            min_group_size,
            selection,
            filters,
        } => {
            let mut session = load_session(&config)?;
            filters.apply(&mut session);
            let mut request = HeatmapRequest::new(dimension, or_success_metrics(metrics))
                .with_min_group_size(min_group_size.unwrap_or(config.aggregation.min_group_size))
                .with_top_per_metric(top_per_metric.unwrap_or(config.aggregation.heatmap_top_per_metric));
            for text in &combinations {
                request.combinations.push(parse_combination(dimension, text)?);
            }

            let selection = selection.selection();
            let table = session.heatmap(&selection, &request)?;
            if cli.json {
                print_json(&table)?;
            } else {
                render::print_table(&selection.label(), &table);
            }
        }
        Commands::Timeseries {
            granularity,
            from,
            to,
            columns,
            selection,
            filters,
            compare,
        } => {
            let mut session = load_session(&config)?;
            filters.apply(&mut session);
            let columns = if columns.is_empty() {
                vec![NumericColumn::ReviewScore]
            } else {
                columns
            };
            let years = match (from, to) {
                (None, None) => None,
                (from, to) => {
                    let range = session.dataset().release_index().year_range();
                    let first = from.or(range.map(|r| r.0)).or(to);
                    let last = to.or(range.map(|r| r.1)).or(from);
                    first.zip(last)
                }
            };

            let selection = selection.selection();
            let mut selections = Vec::with_capacity(compare.len() + 1);
            if !selection.is_empty() {
                selections.push(selection);
            }
            selections.extend(compare);

            let comparisons = session.compare_time_series(&selections, years, granularity, &columns)?;
            if cli.json {
                print_json(&comparisons)?;
            } else {
                render::print_series(&comparisons);
            }
        }
        Commands::Notes { action } => handle_notes(&config, &action, cli.json)?,
    }

    Ok(())
}

/// Load the dataset and open a session over it (this may take a moment)
fn load_session(config: &AppConfig) -> Result<Session> {
    eprintln!("Loading games dataset from {}...", config.data_dir.display());
    let start = Instant::now();
    let session = Session::load(&config.data_dir, config.filters.floors.clone())
        .context("Failed to load games dataset")?;
    eprintln!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());
    Ok(session)
}

fn or_success_metrics(metrics: Vec<Metric>) -> Vec<Metric> {
    if metrics.is_empty() {
        Metric::SUCCESS.to_vec()
    } else {
        metrics
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle the 'notes' command
fn handle_notes(config: &AppConfig, action: &NotesAction, json: bool) -> Result<()> {
    let store = NoteStore::new(config.notes_path());
    match action {
        NotesAction::Show => {
            let notes = store.load()?;
            if json {
                print_json(&serde_json::json!({ "notes": notes }))?;
            } else if notes.is_empty() {
                println!("{}", "No notes saved".dimmed());
            } else {
                println!("{notes}");
            }
        }
        NotesAction::Save { text } => {
            store.save(text)?;
            println!("{} Notes saved to {}", "✓".green(), store.path().display());
        }
        NotesAction::Clear => {
            store.clear()?;
            println!("{} Notes cleared", "✓".green());
        }
    }
    Ok(())
}
