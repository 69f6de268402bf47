// tests/test_loader.rs
//
// End-to-end tests for load_from_json_or_csv.
// Each test lays out a dataset directory in a TempDir:
//   <tmp>/<dataset_name>/train.csv | train.json | dataset.json

use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use textds::{load_from_json_or_csv, Dataset, DatasetError, LoadConfig, SplitSize};

const NAME: &str = "reviews";

// word-level vocabulary; every other word maps to [UNK]
const WORD_LEVEL_TOKENIZER: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": null,
    "pre_tokenizer": {"type": "Whitespace"},
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": {"[UNK]": 0, "review": 1, "good": 2, ",": 3},
        "unk_token": "[UNK]"
    }
}"#;

fn dataset_dir(tmp: &TempDir) -> std::path::PathBuf {
    let dir = tmp.path().join(NAME);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_csv(dir: &Path, rows: usize) {
    let mut body = String::from("text,label,source\n");
    for i in 0..rows {
        body.push_str(&format!("\"review {i}, {}\",{},site{}\n", "good ".repeat(i % 7 + 1).trim(), i % 3, i % 2));
    }
    fs::write(dir.join("train.csv"), body).unwrap();
}

fn config(tmp: &TempDir) -> LoadConfig {
    LoadConfig::new(tmp.path(), NAME, "text", "label")
}

fn ids(ds: &Dataset) -> Vec<u64> {
    ds.column("id").unwrap().map(|v| v.as_u64().unwrap()).collect()
}

fn texts(ds: &Dataset) -> HashSet<String> {
    ds.column("text").unwrap().map(|v| v.as_str().unwrap().to_string()).collect()
}

#[test]
fn integer_test_size_holds_out_that_many_rows() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 10);

    let cfg = config(&tmp).with_test_size_split(SplitSize::Count(2));
    let splits = load_from_json_or_csv(&cfg, None)?;

    assert_eq!(splits.train.len(), 8);
    assert_eq!(splits.test.len(), 2);
    assert!(splits.dev_is_test());
    assert_eq!(splits.dev(), &splits.test);
    Ok(())
}

#[test]
fn default_split_projects_columns_and_numbers_rows() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 25);

    let splits = load_from_json_or_csv(&config(&tmp), None)?;
    assert_eq!((splits.train.len(), splits.test.len()), (20, 5));

    for ds in [&splits.train, &splits.test] {
        assert_eq!(ds.column_names(), ["text", "label", "id"]);
        assert!(ds.rows().iter().all(|r| r.len() == 3));
    }

    let mut all = ids(&splits.train);
    all.extend(ids(&splits.test));
    assert_eq!(all, (0..25).collect::<Vec<_>>());
    assert!(texts(&splits.train).is_disjoint(&texts(&splits.test)));
    Ok(())
}

#[test]
fn same_seed_same_partitions() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 40);

    let a = load_from_json_or_csv(&config(&tmp), None)?;
    let b = load_from_json_or_csv(&config(&tmp), None)?;
    assert_eq!(a, b);

    let c = load_from_json_or_csv(&config(&tmp).with_seed(7), None)?;
    assert_ne!(texts(&a.test), texts(&c.test));
    Ok(())
}

#[test]
fn csv_wins_over_json() -> Result<()> {
    let tmp = TempDir::new()?;
    let dir = dataset_dir(&tmp);
    write_csv(&dir, 10);
    fs::write(dir.join("train.json"), "{\"text\":\"only\",\"label\":0}\n")?;

    let splits = load_from_json_or_csv(&config(&tmp), None)?;
    assert_eq!(splits.train.len() + splits.test.len(), 10);
    Ok(())
}

#[test]
fn raw_dataset_json_is_converted_once() -> Result<()> {
    let tmp = TempDir::new()?;
    let dir = dataset_dir(&tmp);
    let raw: Vec<Value> = (0..10)
        .map(|i| json!({"_text": [format!("s{i}a"), format!("s{i}b")], "label": i % 2, "_meta": {"k": i}}))
        .collect();
    fs::write(dir.join("dataset.json"), serde_json::to_string(&raw)?)?;

    let splits = load_from_json_or_csv(&config(&tmp), None)?;
    assert!(dir.join("train.json").exists());
    assert_eq!(splits.train.len() + splits.test.len(), 10);
    assert!(texts(&splits.train).contains("s0a\ns0b") || texts(&splits.test).contains("s0a\ns0b"));
    assert!(!splits.train.has_column("meta"));

    // the written train.json is now picked up directly
    fs::remove_file(dir.join("dataset.json"))?;
    let again = load_from_json_or_csv(&config(&tmp), None)?;
    assert_eq!(again, splits);
    Ok(())
}

#[test]
fn no_source_file_is_missing_dataset_json() -> Result<()> {
    let tmp = TempDir::new()?;
    dataset_dir(&tmp);

    match load_from_json_or_csv(&config(&tmp), None) {
        Err(DatasetError::MissingFile { path }) => {
            assert!(path.ends_with("dataset.json"));
        }
        other => panic!("expected MissingFile, got {other:?}"),
    }
    Ok(())
}

#[test]
fn fractional_dev_split_comes_out_of_train() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 100);

    let cfg = config(&tmp)
        .with_test_size_split(SplitSize::Fraction(0.2))
        .with_dev_size_split(SplitSize::Fraction(0.25));
    let splits = load_from_json_or_csv(&cfg, None)?;

    assert!(!splits.dev_is_test());
    assert_eq!(splits.train.len(), 60);
    assert_eq!(splits.dev().len(), 20);
    assert_eq!(splits.test.len(), 20);

    let mut all: Vec<u64> = ids(&splits.train);
    all.extend(ids(splits.dev()));
    all.extend(ids(&splits.test));
    assert_eq!(all.iter().collect::<HashSet<_>>().len(), 100);
    // test keeps the ids assigned after the first split
    assert!(ids(&splits.test).iter().all(|&id| id >= 80));
    Ok(())
}

#[test]
fn integer_dev_split_keeps_that_many_train_rows() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 100);

    let cfg = config(&tmp).with_dev_size_split(SplitSize::Count(50));
    let splits = load_from_json_or_csv(&cfg, None)?;
    assert_eq!(splits.train.len(), 50);
    assert_eq!(splits.dev().len(), 30);
    assert_eq!(splits.test.len(), 20);
    Ok(())
}

#[test]
fn existing_id_column_is_kept() -> Result<()> {
    let tmp = TempDir::new()?;
    let dir = dataset_dir(&tmp);
    let body: String = (0..10)
        .map(|i| format!("{{\"id\":\"doc-{i}\",\"text\":\"t{i}\",\"label\":0,\"extra\":1}}\n"))
        .collect();
    fs::write(dir.join("train.json"), body)?;

    let splits = load_from_json_or_csv(&config(&tmp), None)?;
    assert_eq!(splits.train.column_names(), ["id", "text", "label"]);
    assert!(splits.train.rows().iter().all(|r| r["id"].as_str().unwrap().starts_with("doc-")));
    Ok(())
}

#[test]
fn id_column_can_be_disabled() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 10);

    let splits = load_from_json_or_csv(&config(&tmp).with_add_id_column(false), None)?;
    assert!(!splits.train.has_column("id"));
    assert!(!splits.test.has_column("id"));
    Ok(())
}

#[test]
fn quantile_filter_and_subset_shrink_train_only() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 70);
    let cache = tmp.path().join("cache");

    let cfg = config(&tmp)
        .with_filter_quantiles(0.0, 0.5, "whitespace")
        .with_subset(SplitSize::Fraction(0.5));
    let splits = load_from_json_or_csv(&cfg, Some(&cache))?;

    assert_eq!(splits.test.len(), 14);
    assert!(splits.train.len() < 56 / 2 + 1);
    assert!(!splits.train.is_empty());
    assert_eq!(fs::read_dir(&cache)?.count(), 1);

    // ids still unique across train and test
    let mut all = ids(&splits.train);
    all.extend(ids(&splits.test));
    assert_eq!(all.iter().collect::<HashSet<_>>().len(), all.len());
    Ok(())
}

#[test]
fn dev_size_is_within_one_of_the_rounded_share() -> Result<()> {
    for rows in [10, 23, 37, 100, 101] {
        let tmp = TempDir::new()?;
        write_csv(&dataset_dir(&tmp), rows);

        for f in [0.1, 0.25, 0.3, 0.5, 0.75] {
            let cfg = config(&tmp).with_dev_size_split(SplitSize::Fraction(f));
            let splits = load_from_json_or_csv(&cfg, None)?;
            let train_before_dev = splits.train.len() + splits.dev().len();
            let expected = (f * train_before_dev as f64).round() as i64;
            let dev = splits.dev().len() as i64;
            assert!(
                (dev - expected).abs() <= 1,
                "rows={rows} f={f}: dev {dev}, expected about {expected}"
            );
            assert!(!splits.train.is_empty());
            assert_eq!(train_before_dev + splits.test.len(), rows);
        }
    }
    Ok(())
}

#[test]
fn quantile_filter_with_a_tokenizer_json_file() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 40);
    let tokenizer = tmp.path().join("tokenizer.json");
    fs::write(&tokenizer, WORD_LEVEL_TOKENIZER)?;
    let cache = tmp.path().join("cache");

    let cfg = config(&tmp).with_filter_quantiles(0.0, 0.5, tokenizer.to_str().unwrap());
    cfg.validate()?;
    let splits = load_from_json_or_csv(&cfg, Some(&cache))?;

    assert_eq!(splits.test.len(), 8);
    assert!(!splits.train.is_empty());
    assert!(splits.train.len() < 32);
    assert_eq!(fs::read_dir(&cache)?.count(), 1);
    Ok(())
}

#[test]
fn unloadable_tokenizer_is_reported() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 10);
    let tokenizer = tmp.path().join("tokenizer.json");
    fs::write(&tokenizer, "[]")?;

    let cfg = config(&tmp).with_filter_quantiles(0.1, 0.9, tokenizer.to_str().unwrap());
    match load_from_json_or_csv(&cfg, None) {
        Err(DatasetError::Tokenizer { name, .. }) => assert_eq!(name, tokenizer.to_str().unwrap()),
        other => panic!("expected a tokenizer error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn csv_text_that_looks_numeric_stays_text() -> Result<()> {
    let tmp = TempDir::new()?;
    let body = "text,label\nhello world,0\n007,1\n1e3,0\ntrue,1\nfine,0\n";
    fs::write(dataset_dir(&tmp).join("train.csv"), body)?;

    let splits = load_from_json_or_csv(&config(&tmp).with_test_size_split(SplitSize::Count(1)), None)?;
    let mut all = texts(&splits.train);
    all.extend(texts(&splits.test));
    let expected: HashSet<String> = ["hello world", "007", "1e3", "true", "fine"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(all, expected);
    Ok(())
}

#[test]
fn oversized_test_count_is_rejected() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 5);

    let cfg = config(&tmp).with_test_size_split(SplitSize::Count(5));
    assert!(matches!(load_from_json_or_csv(&cfg, None), Err(DatasetError::Split(_))));
    Ok(())
}

#[test]
fn bad_config_fails_before_io() {
    let cfg = LoadConfig::new("/definitely/not/here", NAME, "text", "label")
        .with_test_size_split(SplitSize::Fraction(1.2));
    assert!(matches!(load_from_json_or_csv(&cfg, None), Err(DatasetError::Config(_))));
}

#[test]
fn malformed_csv_is_reported() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(dataset_dir(&tmp).join("train.csv"), "text,label\na,1\nb,2,3\n")?;
    assert!(matches!(load_from_json_or_csv(&config(&tmp), None), Err(DatasetError::Csv { .. })));
    Ok(())
}

#[test]
fn config_file_round_trip_through_loader() -> Result<()> {
    let tmp = TempDir::new()?;
    write_csv(&dataset_dir(&tmp), 10);
    let cfg_path = tmp.path().join("cfg.json");
    fs::write(
        &cfg_path,
        serde_json::to_string(&json!({
            "path": tmp.path(),
            "dataset_name": NAME,
            "text_name": "text",
            "label_name": "label",
            "test_size_split": 3,
            "seed": 1
        }))?,
    )?;

    let cfg = LoadConfig::from_json_file(&cfg_path)?;
    let splits = load_from_json_or_csv(&cfg, None)?;
    assert_eq!((splits.train.len(), splits.test.len()), (7, 3));
    Ok(())
}
