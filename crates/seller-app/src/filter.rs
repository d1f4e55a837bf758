// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{FilterPreferences, Lead, SortBy, StatusFilter};

/// Case-insensitive substring match against name or company. An empty term
/// matches every lead.
pub fn matches_search(lead: &Lead, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    lead.name.to_lowercase().contains(&needle) || lead.company.to_lowercase().contains(&needle)
}

pub fn matches_status(lead: &Lead, filter: StatusFilter) -> bool {
    match filter.status() {
        Some(status) => lead.status == status,
        None => true,
    }
}

/// Stable in-place sort. Score is descending; name and company are ascending
/// and ignore case.
pub fn sort_leads(leads: &mut [Lead], sort: SortBy) {
    match sort {
        SortBy::Score => leads.sort_by(|left, right| right.score.cmp(&left.score)),
        SortBy::Name => leads.sort_by(|left, right| compare_text(&left.name, &right.name)),
        SortBy::Company => {
            leads.sort_by(|left, right| compare_text(&left.company, &right.company));
        }
    }
}

pub fn filter_leads(leads: &[Lead], prefs: &FilterPreferences) -> Vec<Lead> {
    let mut visible = leads
        .iter()
        .filter(|lead| matches_search(lead, &prefs.search) && matches_status(lead, prefs.status))
        .cloned()
        .collect::<Vec<_>>();
    sort_leads(&mut visible, prefs.sort);
    visible
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}
