//! Command-line flags shared by several subcommands.

use clap::Args;
use dashboard::{Session, parse_column};
use data_loader::{Dimension, NumericColumn};
use pipeline::MembershipSelection;

/// One `--filter COLUMN=MIN:MAX`; either side may be left empty
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub column: NumericColumn,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn parse_filter(text: &str) -> Result<FilterSpec, String> {
    let (column, range) = text
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=MIN:MAX, got {text:?}"))?;
    let column = parse_column(column.trim()).map_err(|e| e.to_string())?;
    let (min, max) = range
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got {range:?}"))?;
    Ok(FilterSpec {
        column,
        min: parse_end(min)?,
        max: parse_end(max)?,
    })
}

fn parse_end(text: &str) -> Result<Option<f64>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| format!("not a number: {text:?}"))
}

/// `FROM:TO` release years
pub fn parse_years(text: &str) -> Result<(i32, i32), String> {
    let (from, to) = text
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got {text:?}"))?;
    let year = |s: &str| {
        s.trim()
            .parse::<i32>()
            .map_err(|_| format!("not a year: {s:?}"))
    };
    Ok((year(from)?, year(to)?))
}

/// A `--compare` selection, e.g. `genres=Action,Indie;tags=Co-op;years=2015:2018`
pub fn parse_selection(text: &str) -> Result<MembershipSelection, String> {
    let mut selection = MembershipSelection::new();
    for part in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| format!("expected DIMENSION=KEYS, got {part:?}"))?;
        if name.trim().eq_ignore_ascii_case("years") {
            let (from, to) = parse_years(value)?;
            selection = selection.with_release_years(from, to);
            continue;
        }
        let dimension: Dimension = name.trim().parse()?;
        let keys = value.split(',').map(str::trim).filter(|k| !k.is_empty());
        selection = selection.with(dimension, keys);
    }
    Ok(selection)
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Bound a numeric column, e.g. `price=0:20` or `reviews=100:`
    #[arg(long = "filter", value_name = "COLUMN=MIN:MAX", value_parser = parse_filter)]
    pub filters: Vec<FilterSpec>,

    /// Start without the configured default filters
    #[arg(long)]
    pub no_default_filters: bool,
}

impl FilterArgs {
    pub fn apply(&self, session: &mut Session) {
        if self.no_default_filters {
            session.clear_all_filters();
        }
        for spec in &self.filters {
            session.set_filter(spec.column, spec.min, spec.max);
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Keep games with this genre (repeat to require several)
    #[arg(long = "genre", value_name = "GENRE")]
    pub genres: Vec<String>,

    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    #[arg(long = "language", value_name = "LANGUAGE")]
    pub languages: Vec<String>,

    /// Keep games released within `FROM:TO`
    #[arg(long, value_name = "FROM:TO", value_parser = parse_years)]
    pub years: Option<(i32, i32)>,
}

impl SelectionArgs {
    pub fn selection(&self) -> MembershipSelection {
        let mut selection = MembershipSelection::new()
            .with(Dimension::Genres, self.genres.iter().cloned())
            .with(Dimension::Tags, self.tags.iter().cloned())
            .with(Dimension::Categories, self.categories.iter().cloned())
            .with(Dimension::Languages, self.languages.iter().cloned());
        if let Some((from, to)) = self.years {
            selection = selection.with_release_years(from, to);
        }
        selection
    }
}
