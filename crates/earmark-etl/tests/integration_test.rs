//! Integration tests for the full load → clean → fit → rank pipeline.
//!
//! These tests write small CSV exports into a temporary directory and run the
//! public pipeline over them, the way the CLI does.

use std::path::PathBuf;
use tempfile::TempDir;

use earmark_core::Error;
use earmark_etl::{build_catalog, build_context, Config, JoinKind, MissingDescription, Pipeline};
use earmark_search::{HiddenGems, Query, SharedContext};

const CATALOG: &str = "\
Book Name,Author,Rating,Number of Reviews,Price
A,Author One,4.5,1200,500
B,Author Two,4.0,150,350
C,Author Three,3.0,40,200
Dup,Author Four,4.2,10,100
Dup,author four,1.0,99,100
Quiet,Author Five,-1,0,120
";

const FEATURES: &str = "\
Book Name,Author,Description,Listening Time
A,Author One,space adventure exploration,10 hrs
B,Author Two,space exploration journey,8 hrs
C,Author Three,cooking recipes baking,3 hrs
Dup,Author Four,space cooking,1 hr
Quiet,Author Five,,2 hrs
";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

fn fixture_config(dir: &TempDir) -> Config {
    Config {
        catalog_path: write_fixture(dir, "catalog.csv", CATALOG),
        features_path: write_fixture(dir, "features.csv", FEATURES),
        ..Config::default()
    }
}

/// The three-book scenario: B shares vocabulary with A, C shares none.
#[test]
fn test_similar_description_ranks_first() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_fixture(
        &temp_dir,
        "catalog.csv",
        "Book Name,Author,Rating\nA,x,4.0\nB,y,4.0\nC,z,4.0\n",
    );
    let features = write_fixture(
        &temp_dir,
        "features.csv",
        "Book Name,Author,Description\n\
         A,x,space adventure exploration\n\
         B,y,space exploration journey\n\
         C,z,cooking recipes baking\n",
    );

    let context = Pipeline::default().run(&catalog, &features).unwrap();
    let result = context.recommend("A", 2, None).unwrap();

    assert_eq!(result.titles(), vec!["B", "C"]);
    assert!(result.items[0].score > result.items[1].score);
    assert!(result.items[1].score.abs() < 1e-12);
}

/// Test that the configured pipeline builds a deduplicated catalog
#[test]
fn test_build_context_cleans_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let context = build_context(&fixture_config(&temp_dir)).unwrap();

    // A, B, C, Dup (first copy) and Quiet
    assert_eq!(context.len(), 5);

    let dup = context.entry(context.resolve("dup").unwrap()).unwrap();
    assert_eq!(dup.author, "Author Four");
    assert_eq!(dup.reviews, Some(10));

    let quiet = context.entry(context.resolve("Quiet").unwrap()).unwrap();
    assert!(!quiet.rating.is_rated());
    assert!(!quiet.has_description());
    assert_eq!(quiet.listening_time.as_deref(), Some("2 hrs"));
}

/// Test that results never include the query and respect k
#[test]
fn test_recommend_excludes_query_and_truncates() {
    let temp_dir = TempDir::new().unwrap();
    let context = build_context(&fixture_config(&temp_dir)).unwrap();

    let result = context.recommend("A", 2, None).unwrap();
    assert_eq!(result.len(), 2);
    assert!(!result.titles().contains(&"A"));
    assert_eq!(result.titles()[0], "B");

    for pair in result.items.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

/// Test that rows without a description are never candidates
#[test]
fn test_empty_description_is_never_recommended() {
    let temp_dir = TempDir::new().unwrap();
    let context = build_context(&fixture_config(&temp_dir)).unwrap();

    let result = context.recommend("A", 10, None).unwrap();
    assert!(!result.titles().contains(&"Quiet"));

    let quiet = context.recommend("Quiet", 10, None).unwrap();
    assert!(quiet.is_empty());
}

/// Test the rating threshold and the hidden gems variant
#[test]
fn test_filters() {
    let temp_dir = TempDir::new().unwrap();
    let context = build_context(&fixture_config(&temp_dir)).unwrap();

    let rated = context.recommend("A", 10, Some(3.5)).unwrap();
    assert_eq!(rated.titles(), vec!["B", "Dup"]);

    let gems = Query::top(10).with_hidden_gems(HiddenGems { max_reviews: 100 });
    let result = context.recommend_with("A", &gems).unwrap();
    assert_eq!(result.titles(), vec!["Dup", "C"]);
}

/// Test that an unknown title is reported, not ranked
#[test]
fn test_unknown_title_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let context = build_context(&fixture_config(&temp_dir)).unwrap();

    let err = context.recommend("No Such Book", 5, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("No Such Book"));
}

/// Test that two fits over the same files give identical results
#[test]
fn test_fit_is_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir);

    let first = build_context(&config).unwrap();
    let second = build_context(&config).unwrap();

    assert_eq!(first.vocabulary(), second.vocabulary());
    let a = first.recommend("B", 5, None).unwrap();
    let b = second.recommend("B", 5, None).unwrap();
    assert_eq!(a.titles(), b.titles());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x.score - y.score).abs() < f64::EPSILON);
    }
}

/// Test the missing-description drop policy and left join through config
#[test]
fn test_policies_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        missing_description: MissingDescription::Drop,
        join: JoinKind::Left,
        ..fixture_config(&temp_dir)
    };

    let context = build_context(&config).unwrap();
    assert_eq!(context.len(), 4);
    assert!(context.resolve("Quiet").unwrap_err().is_not_found());
}

/// Test that sources with no title column fail with a data format error
/// Listings work off the cleaned catalog even when no description has a
/// usable term, while fitting the model fails.
#[test]
fn test_catalog_without_vocabulary_still_lists() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        catalog_path: write_fixture(&temp_dir, "catalog.csv", CATALOG),
        features_path: write_fixture(
            &temp_dir,
            "features.csv",
            "Book Name,Author,Description\n\
             A,Author One,the and of\n\
             B,Author Two,\n\
             C,Author Three,it is\n\
             Dup,Author Four,\n\
             Quiet,Author Five,\n",
        ),
        ..Config::default()
    };

    let catalog = build_catalog(&config).unwrap();
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.stats().books, 5);
    assert_eq!(catalog.search_titles("dup"), vec!["Dup"]);

    let err = build_context(&config).unwrap_err();
    assert!(matches!(err, Error::EmptyCorpus(_)));
}

#[test]
fn test_unrecognizable_sources_fail() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_fixture(&temp_dir, "catalog.csv", "foo,bar\n1,2\n");
    let features = write_fixture(&temp_dir, "features.csv", "baz,qux\n3,4\n");

    let err = Pipeline::default().run(&catalog, &features).unwrap_err();
    assert!(matches!(err, Error::DataFormat(_)));
}

/// Test that a missing input file surfaces as an I/O error
#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        features_path: temp_dir.path().join("missing.csv"),
        ..fixture_config(&temp_dir)
    };
    let err = build_context(&config).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

/// Test that a refresh swaps in the new catalog for later readers
#[test]
fn test_refresh_shared_context() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir);
    let pipeline = Pipeline::from_config(&config).unwrap();

    let shared = SharedContext::new(pipeline.run(&config.catalog_path, &config.features_path).unwrap());
    let before = shared.current();

    let features = write_fixture(
        &temp_dir,
        "features.csv",
        "Book Name,Author,Description\nA,Author One,space adventure\nC,Author Three,baking bread\n",
    );
    pipeline
        .refresh(&shared, &config.catalog_path, &features)
        .unwrap();

    assert_eq!(before.len(), 5);
    assert_eq!(shared.current().len(), 2);
}
