// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::FilterPreferences;

/// Storage key for the last-used list filters.
pub const FILTER_PREFERENCES_KEY: &str = "leadFilters";

/// Client-local key/value storage for list filters. Single writer; the last
/// save wins.
pub trait PreferenceStore {
    fn load_filters(&self) -> Result<Option<FilterPreferences>>;
    fn save_filters(&self, prefs: &FilterPreferences) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn load_filters(&self) -> Result<Option<FilterPreferences>> {
        (**self).load_filters()
    }

    fn save_filters(&self, prefs: &FilterPreferences) -> Result<()> {
        (**self).save_filters(prefs)
    }
}

/// Overlays stored values on the current ones. An empty stored search term
/// leaves the current term in place.
pub fn merge_stored(current: &FilterPreferences, stored: &FilterPreferences) -> FilterPreferences {
    FilterPreferences {
        search: if stored.search.is_empty() {
            current.search.clone()
        } else {
            stored.search.clone()
        },
        status: stored.status,
        sort: stored.sort,
    }
}
