// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use seller_app::{FILTER_PREFERENCES_KEY, FilterPreferences, PreferenceStore, SortBy, StatusFilter};
use seller_db::{Store, validate_db_path};
use seller_testkit::temp_db_path;

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path(":memory:").is_ok());
    assert!(validate_db_path("/tmp/seller.db").is_ok());
}

#[test]
fn fresh_store_has_no_stored_filters() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    assert_eq!(store.load_filters()?, None);
    Ok(())
}

#[test]
fn filters_survive_reopen() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let wanted = FilterPreferences {
        search: "acme".to_owned(),
        status: StatusFilter::Qualified,
        sort: SortBy::Score,
    };

    {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        store.save_filters(&wanted)?;
    }

    let reopened = Store::open(&path)?;
    reopened.bootstrap()?;
    assert_eq!(reopened.load_filters()?, Some(wanted));
    Ok(())
}

#[test]
fn filters_are_stored_as_json_under_fixed_key() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.save_filters(&FilterPreferences {
        search: String::new(),
        status: StatusFilter::New,
        sort: SortBy::Company,
    })?;

    let raw = store.get_setting_raw(FILTER_PREFERENCES_KEY)?;
    assert_eq!(
        raw.as_deref(),
        Some(r#"{"search":"","status":"new","sort":"company"}"#)
    );
    Ok(())
}

#[test]
fn last_save_wins() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    for sort in SortBy::ALL {
        store.save_filters(&FilterPreferences {
            sort,
            ..FilterPreferences::default()
        })?;
    }
    assert_eq!(
        store.load_filters()?.map(|prefs| prefs.sort),
        Some(SortBy::Company)
    );
    let rows: i64 = store
        .raw_connection()
        .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
    assert_eq!(rows, 1);
    Ok(())
}

#[test]
fn partial_stored_value_fills_defaults() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.put_setting_raw(FILTER_PREFERENCES_KEY, r#"{"sort":"name"}"#)?;

    let prefs = store.load_filters()?.expect("stored filters");
    assert_eq!(prefs.sort, SortBy::Name);
    assert_eq!(prefs.status, StatusFilter::All);
    assert_eq!(prefs.search, "");
    Ok(())
}

#[test]
fn corrupt_stored_value_names_the_key() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.put_setting_raw(FILTER_PREFERENCES_KEY, r#"{"status":"archived"}"#)?;

    let err = store.load_filters().expect_err("decode should fail");
    assert!(err.to_string().contains("leadFilters"));

    store.clear_setting(FILTER_PREFERENCES_KEY)?;
    assert_eq!(store.load_filters()?, None);
    Ok(())
}

#[test]
fn bootstrap_rejects_foreign_database() -> Result<()> {
    let store = Store::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);")?;

    let err = store.bootstrap().expect_err("schema validation should fail");
    assert!(err.to_string().contains("missing required table `settings`"));
    Ok(())
}

#[test]
fn bootstrap_rejects_settings_missing_column() -> Result<()> {
    let store = Store::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT NOT NULL);")?;

    let err = store.bootstrap().expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `settings` is missing required columns"));
    assert!(message.contains("updated_at"));
    Ok(())
}

#[test]
fn bootstrap_is_idempotent() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.bootstrap()?;
    Ok(())
}
