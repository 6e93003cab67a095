//! End-to-end tests: load data files from disk, then query a session.

use dashboard::{DashboardError, NoteStore, Session, parse_combination};
use data_loader::{Dimension, NumericColumn};
use pipeline::{
    AggregateOptions, FilterDefaults, GroupBy, HeatmapRequest, MembershipSelection, Metric,
    TimeGranularity,
};
use std::fs;
use std::path::Path;

fn write_dataset(dir: &Path) {
    fs::write(
        dir.join("cleaned_games.csv"),
        "\
,AppID,Name,Release date,Price,Average playtime forever,Peak CCU,Reviews,Recommendations,Review score,Windows,Mac,Linux
0,10,Alpha,\"Jan 5, 2015\",0,10,5,100,50,0.9,True,False,True
1,20,Beta,03/15/2015,19.99,0,0,25,10,0.6,True,True,False
2,30,Gamma,2016-07-01,150,300,40,5,1,,True,False,False
3,40,Delta,\"Dec 24, 2016\",9.99,45,12,400,120,0.75,True,True,True
",
    )
    .unwrap();
    fs::write(dir.join("genres.json"), r#"{"Action": [10, 20, 40], "Indie": [20, 30, 40]}"#).unwrap();
    fs::write(dir.join("tags.json"), r#"{"Co-op": ["10", "40"]}"#).unwrap();
    fs::write(dir.join("categories.json"), r#"{"Single-player": [10, 20, 30, 40]}"#).unwrap();
    fs::write(
        dir.join("supported_languages.json"),
        r#"{"English": [10, 20, 30, 40], "German": [20, 40], "Japanese": [40]}"#,
    )
    .unwrap();
    fs::write(
        dir.join("release.json"),
        r#"{"2015": {"1": [10], "3": [20]}, "2016": {"7": [30], "12": [40]}}"#,
    )
    .unwrap();
}

fn load_session() -> Session {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    Session::load(dir.path(), FilterDefaults::default()).unwrap()
}

#[test]
fn test_load_and_default_filter() {
    let session = load_session();
    let subset = session.apply_filters(&MembershipSelection::new());

    // Gamma has only 5 reviews
    let ids: Vec<_> = subset.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![10, 20, 40]);
}

#[test]
fn test_missing_data_file_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    fs::remove_file(dir.path().join("tags.json")).unwrap();

    let result = Session::load(dir.path(), FilterDefaults::default());
    assert!(matches!(result, Err(DashboardError::DataLoad(_))));
}

#[test]
fn test_query_genres_with_selection() {
    let mut session = load_session();
    let selection = MembershipSelection::new().with(Dimension::Languages, ["German"]);

    let table = session.query(
        &selection,
        GroupBy::Membership(Dimension::Genres),
        &[Metric::GamesReleased, Metric::Mean(NumericColumn::Reviews)],
        &AggregateOptions::new(),
    );

    assert_eq!(table.labels(), vec!["Action", "Indie"]);
    let action = table.row("Action").unwrap();
    assert_eq!(action.size, 2);
    assert_eq!(action.value(1), Some((25.0 + 400.0) / 2.0));
}

#[test]
fn test_filter_reset_round_trip() {
    let mut session = load_session();
    let before = session.apply_filters(&MembershipSelection::new()).len();

    session.set_filter(NumericColumn::Price, None, Some(10.0));
    assert_eq!(session.apply_filters(&MembershipSelection::new()).len(), 2);

    session.reset_filters();
    assert_eq!(session.apply_filters(&MembershipSelection::new()).len(), before);
}

#[test]
fn test_reversed_ranges_give_empty_results() {
    let mut session = load_session();

    session.set_filter(NumericColumn::Price, Some(100.0), Some(5.0));
    let table = session.query(
        &MembershipSelection::new(),
        GroupBy::Membership(Dimension::Genres),
        &[Metric::GamesReleased],
        &AggregateOptions::new(),
    );
    assert!(table.is_empty());

    session.reset_filters();
    let series = session
        .time_series(
            &MembershipSelection::new(),
            Some((2016, 2015)),
            TimeGranularity::Month,
            &[NumericColumn::Reviews],
        )
        .unwrap();
    assert!(series.is_empty());
}

#[test]
fn test_heatmap_with_parsed_combination() {
    let session = load_session();
    let keys = parse_combination(Dimension::Languages, "English, German").unwrap();
    let mut request = HeatmapRequest::new(Dimension::Languages, [Metric::Mean(NumericColumn::Reviews)]);
    request.combinations.push(keys);

    let table = session.heatmap(&MembershipSelection::new(), &request).unwrap();
    assert_eq!(table.rows[0].label, "English, German");
    assert_eq!(table.rows[0].size, 2);
}

#[test]
fn test_compare_time_series_share_years() {
    let session = load_session();
    let selections = vec![MembershipSelection::new().with(Dimension::Tags, ["Co-op"])];

    let compared = session
        .compare_time_series(&selections, None, TimeGranularity::Month, &[NumericColumn::Reviews])
        .unwrap();

    assert_eq!(compared.len(), 2);
    assert_eq!(compared[0].label, "All games");
    assert_eq!(compared[1].label, "T: Co-op");
    assert!(compared.iter().all(|c| c.series.len() == 24));
    assert_eq!(compared[1].series.total_released(), 2);
}

#[test]
fn test_notes_next_to_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::in_dir(dir.path());

    assert_eq!(store.load().unwrap(), "");
    store.save("Co-op games review well").unwrap();
    assert_eq!(NoteStore::in_dir(dir.path()).load().unwrap(), "Co-op games review well");
}
