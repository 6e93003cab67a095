//! Parsers for the dataset files.
//!
//! - `cleaned_games.csv`: one row per game, headers as in the store export
//! - `genres.json`, `tags.json`, `categories.json`, `supported_languages.json`:
//!   `{ key: [id, ...] }`
//! - `release.json`: `{ "YYYY": { "M": [id, ...] } }`
//!
//! Ids in the JSON files may be numbers or numeric strings.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Release date formats, tried in order; the first that parses wins
const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%m/%d/%Y", "%Y-%m-%d"];

/// Open a data file, reporting a missing file by path
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Games table
// =============================================================================

/// One CSV row as exported; unknown columns (including a leading unnamed
/// index column) are ignored.
#[derive(Debug, Deserialize)]
struct RawGame {
    #[serde(rename = "AppID")]
    app_id: GameId,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Release date", default)]
    release_date: String,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Average playtime", alias = "Average playtime forever")]
    average_playtime: f64,
    #[serde(rename = "Peak CCU")]
    peak_ccu: f64,
    #[serde(rename = "Reviews")]
    reviews: f64,
    #[serde(rename = "Recommendations")]
    recommendations: f64,
    #[serde(rename = "Review score", default)]
    review_score: Option<f64>,
    #[serde(rename = "Windows", deserialize_with = "deserialize_flag")]
    windows: bool,
    #[serde(rename = "Mac", deserialize_with = "deserialize_flag")]
    mac: bool,
    #[serde(rename = "Linux", deserialize_with = "deserialize_flag")]
    linux: bool,
}

impl From<RawGame> for Game {
    fn from(raw: RawGame) -> Self {
        Game {
            id: raw.app_id,
            name: raw.name,
            release_date: parse_release_date(&raw.release_date),
            price: raw.price,
            average_playtime: raw.average_playtime,
            peak_ccu: raw.peak_ccu,
            reviews: raw.reviews,
            recommendations: raw.recommendations,
            review_score: raw.review_score,
            windows: raw.windows,
            mac: raw.mac,
            linux: raw.linux,
        }
    }
}

/// Booleans as pandas writes them, plus the usual spellings
fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_flag(&s).ok_or_else(|| de::Error::custom(format!("invalid boolean {s:?}")))
}

/// Parse a free-text release date.
///
/// Example: "Oct 21, 2008" -> Some(2008-10-21)
///          "10/21/2008"   -> Some(2008-10-21)
///          "Coming soon"  -> None
pub fn parse_release_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse the games table
pub fn parse_games(path: &Path) -> Result<Vec<Game>> {
    let file = file_label(path);
    let mut reader = csv::Reader::from_reader(BufReader::new(open(path)?));
    let mut games = Vec::new();

    for row in reader.deserialize::<RawGame>() {
        let raw = row.map_err(|e| match e.position() {
            Some(pos) => DataLoadError::ParseError {
                file: file.clone(),
                line: pos.line() as usize,
                reason: e.to_string(),
            },
            None => DataLoadError::Csv {
                file: file.clone(),
                source: e,
            },
        })?;
        games.push(Game::from(raw));
    }

    Ok(games)
}

// =============================================================================
// Membership and release indexes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn resolve_id(raw: &RawId, file: &str, key: &str) -> Result<GameId> {
    let invalid = |value: String| DataLoadError::InvalidId {
        file: file.to_string(),
        key: key.to_string(),
        value,
    };
    match raw {
        RawId::Number(n) => GameId::try_from(*n).map_err(|_| invalid(n.to_string())),
        RawId::Text(s) => s.trim().parse().map_err(|_| invalid(s.clone())),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    serde_json::from_reader(BufReader::new(open(path)?)).map_err(|e| DataLoadError::Json {
        file: file_label(path),
        source: e,
    })
}

/// Parse one `{ key: [id, ...] }` membership file
pub fn parse_membership_index(path: &Path) -> Result<MembershipIndex> {
    let file = file_label(path);
    let raw: BTreeMap<String, Vec<RawId>> = read_json(path)?;

    let mut index = MembershipIndex::new();
    for (key, ids) in &raw {
        for id in ids {
            index.insert(key.as_str(), resolve_id(id, &file, key)?);
        }
    }
    Ok(index)
}

/// Parse the `{ year: { month: [id, ...] } }` release file
pub fn parse_release_index(path: &Path) -> Result<ReleaseIndex> {
    let file = file_label(path);
    let raw: BTreeMap<String, BTreeMap<String, Vec<RawId>>> = read_json(path)?;

    let mut index = ReleaseIndex::new();
    for (year_key, months) in &raw {
        let year: i32 = year_key.trim().parse().map_err(|_| DataLoadError::InvalidKey {
            file: file.clone(),
            what: "year",
            key: year_key.clone(),
        })?;
        for (month_key, ids) in months {
            let month = month_key
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| DataLoadError::InvalidKey {
                    file: file.clone(),
                    what: "month",
                    key: format!("{year_key}/{month_key}"),
                })?;
            for id in ids {
                index.insert(year, month, resolve_id(id, &file, month_key)?);
            }
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_release_date_formats() {
        assert_eq!(
            parse_release_date("Oct 21, 2008"),
            NaiveDate::from_ymd_opt(2008, 10, 21)
        );
        assert_eq!(
            parse_release_date("10/21/2008"),
            NaiveDate::from_ymd_opt(2008, 10, 21)
        );
        assert_eq!(parse_release_date("Coming soon"), None);
        assert_eq!(parse_release_date(""), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_parse_games_with_index_column_and_alias() {
        let csv = "\
,AppID,Name,Release date,Price,Average playtime forever,Peak CCU,Reviews,Recommendations,Review score,Windows,Mac,Linux
0,10,Counter-Strike,\"Nov 1, 2000\",9.99,100,500,1000,900,0.97,True,True,True
1,20,Mystery Box,soon,0.0,0,0,3,0,,True,False,False
";
        let (_dir, path) = write_temp("cleaned_games.csv", csv);
        let games = parse_games(&path).unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, 10);
        assert_eq!(games[0].average_playtime, 100.0);
        assert_eq!(games[0].release_date, NaiveDate::from_ymd_opt(2000, 11, 1));
        assert!(games[0].linux);
        assert_eq!(games[1].release_date, None);
        assert_eq!(games[1].review_score, None);
        assert!(!games[1].mac);
    }

    #[test]
    fn test_parse_membership_index_mixed_ids() {
        let (_dir, path) = write_temp("tags.json", r#"{"Indie": ["10", 20], "RPG": [30]}"#);
        let index = parse_membership_index(&path).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.ids("Indie").unwrap().contains(&20));
        assert!(index.ids("Indie").unwrap().contains(&10));
        assert!(index.ids("Puzzle").is_none());
    }

    #[test]
    fn test_parse_membership_index_rejects_bad_id() {
        let (_dir, path) = write_temp("tags.json", r#"{"Indie": ["ten"]}"#);
        let err = parse_membership_index(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidId { .. }));
    }

    #[test]
    fn test_parse_release_index() {
        let (_dir, path) = write_temp(
            "release.json",
            r#"{"2015": {"1": ["10"], "12": [20]}, "2016": {"3": [30]}}"#,
        );
        let index = parse_release_index(&path).unwrap();

        assert_eq!(index.year_range(), Some((2015, 2016)));
        assert!(index.ids(2015, 12).unwrap().contains(&20));
        assert!(index.ids(2016, 1).is_none());
    }

    #[test]
    fn test_parse_release_index_rejects_bad_month() {
        let (_dir, path) = write_temp("release.json", r#"{"2015": {"13": [1]}}"#);
        let err = parse_release_index(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidKey { what: "month", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_games(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
