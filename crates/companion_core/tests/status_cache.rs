use std::sync::Once;

use companion_core::{StatusCache, StatusKind};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[test]
fn parses_known_statuses_and_defaults_the_rest() {
    init_logging();
    assert_eq!(StatusKind::parse("queued"), StatusKind::Queued);
    assert_eq!(StatusKind::parse("downloading"), StatusKind::Downloading);
    assert_eq!(StatusKind::parse("completed"), StatusKind::Completed);
    assert_eq!(StatusKind::parse("error"), StatusKind::Error);
    assert_eq!(StatusKind::parse("paused"), StatusKind::Unknown);
    // An empty status string renders exactly like no match at all.
    assert_eq!(StatusKind::parse(""), StatusKind::Unknown);
}

#[test]
fn badge_table_is_fixed() {
    init_logging();
    assert_eq!(StatusKind::Completed.badge_style().background, "#1db954");
    assert_eq!(StatusKind::Completed.badge_style().foreground, "#fff");
    assert_eq!(StatusKind::Downloading.badge_style().background, "#ffb300");
    assert_eq!(StatusKind::Queued.badge_style().background, "#1976d2");
    assert_eq!(StatusKind::Error.badge_style().background, "#d32f2f");
    assert_eq!(StatusKind::Unknown.badge_style().background, "#eee");
    assert_eq!(StatusKind::Unknown.badge_text(), "");
    assert_eq!(StatusKind::Completed.badge_text(), "completed");
}

#[test]
fn lookup_defaults_to_unknown() {
    init_logging();
    let cache = StatusCache::default();
    assert!(cache.is_empty());
    assert_eq!(cache.lookup("https://site/track/1"), StatusKind::Unknown);
}

#[test]
fn rebuild_replaces_the_whole_snapshot() {
    init_logging();
    let first = StatusCache::rebuild(vec![
        ("https://site/track/1".to_string(), StatusKind::Queued),
        ("https://site/track/2".to_string(), StatusKind::Completed),
    ]);
    assert_eq!(first.len(), 2);
    assert_eq!(first.lookup("https://site/track/1"), StatusKind::Queued);

    let second = StatusCache::rebuild(vec![(
        "https://site/track/2".to_string(),
        StatusKind::Downloading,
    )]);
    // No incremental merge: entries absent from the new listing are gone.
    assert_eq!(second.lookup("https://site/track/1"), StatusKind::Unknown);
    assert_eq!(
        second.lookup("https://site/track/2"),
        StatusKind::Downloading
    );
}

#[test]
fn later_entries_for_the_same_url_win() {
    init_logging();
    let cache = StatusCache::rebuild(vec![
        ("https://site/track/1".to_string(), StatusKind::Queued),
        ("https://site/track/1".to_string(), StatusKind::Completed),
    ]);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.lookup("https://site/track/1"), StatusKind::Completed);
}
