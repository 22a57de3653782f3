//! Registry integration tests.
//!
//! Covers loading (built-ins + definition directory), listing order,
//! id lookup, definition shadowing, skipped parse failures, and the
//! empty-on-failure reload contract.

mod common;

use std::sync::Arc;

use common::{InMemoryRepository, NoopTxnManager, StubParser, StubScraper, TestHarness};
use metaforge::config::ScraperConfig;
use metaforge::scrape::builtin::{AUTOTAG_SCRAPER_ID, TMDB_SCRAPER_ID};
use metaforge::scrape::{Cache, ContentType};

const ALL_TYPES: [ContentType; 5] = [
    ContentType::Scene,
    ContentType::Gallery,
    ContentType::Performer,
    ContentType::Movie,
    ContentType::Tag,
];

#[test]
fn builtins_are_registered() {
    let harness = TestHarness::new(vec![]);

    let tmdb = harness.cache.get(TMDB_SCRAPER_ID).expect("tmdb registered");
    assert_eq!(tmdb.name, "TheMovieDB");
    assert!(tmdb.supports(ContentType::Movie));

    let autotag = harness
        .cache
        .get(AUTOTAG_SCRAPER_ID)
        .expect("autotag registered");
    assert!(autotag.supports(ContentType::Scene));
    assert!(autotag.supports(ContentType::Gallery));
}

#[test]
fn get_unknown_id_is_absent() {
    let harness = TestHarness::new(vec![]);
    assert!(harness.cache.get("nonexistent").is_none());
}

#[test]
fn list_sorts_case_insensitively_by_name() {
    // no built-in supports performers, so the listing is exactly the stubs
    let harness = TestHarness::new(vec![
        Arc::new(StubScraper::new("a", "Beta", vec![ContentType::Performer])),
        Arc::new(StubScraper::new("b", "alpha", vec![ContentType::Performer])),
    ]);

    let specs = harness.cache.list(&[ContentType::Performer]);
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "Beta"]);
}

#[test]
fn list_filters_by_content_type() {
    let harness = TestHarness::new(vec![
        Arc::new(StubScraper::new("p", "Performers", vec![ContentType::Performer])),
        Arc::new(StubScraper::new("t", "Tags", vec![ContentType::Tag])),
    ]);

    let specs = harness.cache.list(&[ContentType::Tag]);
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].id, "t");

    // a scraper matching any of the requested types appears once
    let specs = harness.cache.list(&[ContentType::Performer, ContentType::Tag]);
    assert_eq!(specs.len(), 2);
}

#[test]
fn definition_shadows_builtin_with_same_id() {
    let harness = TestHarness::new(vec![Arc::new(
        StubScraper::new(TMDB_SCRAPER_ID, "Shadowing Definition", vec![ContentType::Movie]),
    )]);

    let spec = harness.cache.get(TMDB_SCRAPER_ID).expect("registered");
    assert_eq!(spec.name, "Shadowing Definition");
}

#[test]
fn broken_definition_is_skipped_not_fatal() {
    let harness = TestHarness::new(vec![Arc::new(StubScraper::new(
        "good",
        "Good",
        vec![ContentType::Performer],
    ))]);
    harness.add_broken_definition();

    harness.cache.reload().expect("reload succeeds");
    assert!(harness.cache.get("good").is_some());
    assert!(harness.cache.get("broken").is_none());
}

#[test]
fn reload_failure_leaves_registry_empty() {
    let harness = TestHarness::new(vec![Arc::new(StubScraper::new(
        "good",
        "Good",
        vec![ContentType::Performer],
    ))]);
    assert!(!harness.cache.list(&ALL_TYPES).is_empty());

    // removing the scrapers directory makes the walk fail
    std::fs::remove_dir_all(harness.dir.path()).unwrap();

    assert!(harness.cache.reload().is_err());
    assert!(harness.cache.list(&ALL_TYPES).is_empty());
    assert!(harness.cache.get("good").is_none());
    assert!(harness.cache.get(TMDB_SCRAPER_ID).is_none());
}

#[test]
fn reload_restores_scrapers() {
    let harness = TestHarness::new(vec![Arc::new(StubScraper::new(
        "good",
        "Good",
        vec![ContentType::Performer],
    ))]);

    harness.cache.reload().expect("reload succeeds");
    assert!(harness.cache.get("good").is_some());
    assert!(harness.cache.get(TMDB_SCRAPER_ID).is_some());
}

#[test]
fn missing_scrapers_directory_fails_load() {
    let config = ScraperConfig {
        scrapers_path: "/nonexistent/scrapers/path".into(),
        ..Default::default()
    };
    let result = Cache::new(
        config,
        Arc::new(NoopTxnManager),
        InMemoryRepository::default().into_repository(),
        Arc::new(StubParser::new(vec![])),
    );
    assert!(result.is_err());
}

#[test]
fn specs_are_detached_copies() {
    let harness = TestHarness::new(vec![Arc::new(StubScraper::new(
        "s",
        "Scraper",
        vec![ContentType::Performer],
    ))]);

    let mut spec = harness.cache.get("s").unwrap();
    spec.name = "Mutated".into();

    assert_eq!(harness.cache.get("s").unwrap().name, "Scraper");
}
