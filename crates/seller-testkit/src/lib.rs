// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use seller_app::{
    FilterPreferences, Lead, LeadGateway, LeadId, LeadStatus, Opportunity, OpportunityId,
    PreferenceStore,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use time::OffsetDateTime;
use time::macros::datetime;

/// In-memory preference store that counts writes and can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    stored: RefCell<Option<FilterPreferences>>,
    saves: Cell<usize>,
    fail_loads: Cell<bool>,
}

impl MemoryPreferences {
    pub fn with(prefs: FilterPreferences) -> Self {
        Self {
            stored: RefCell::new(Some(prefs)),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<FilterPreferences> {
        self.stored.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load_filters(&self) -> Result<Option<FilterPreferences>> {
        if self.fail_loads.get() {
            bail!("setting `leadFilters` has invalid value `{{`");
        }
        Ok(self.stored())
    }

    fn save_filters(&self, prefs: &FilterPreferences) -> Result<()> {
        *self.stored.borrow_mut() = Some(prefs.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Gateway over a fixed dataset with queued failures. Each queued message
/// fails the next call of that kind.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    leads: Vec<Lead>,
    load_failures: VecDeque<String>,
    update_failures: VecDeque<String>,
    convert_failures: VecDeque<String>,
    next_opportunity: i64,
    pub load_calls: usize,
    pub update_calls: usize,
    pub convert_calls: usize,
}

impl ScriptedGateway {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self {
            leads,
            next_opportunity: 1000,
            ..Self::default()
        }
    }

    pub fn fail_next_load(&mut self, message: impl Into<String>) -> &mut Self {
        self.load_failures.push_back(message.into());
        self
    }

    pub fn fail_next_update(&mut self, message: impl Into<String>) -> &mut Self {
        self.update_failures.push_back(message.into());
        self
    }

    pub fn fail_next_convert(&mut self, message: impl Into<String>) -> &mut Self {
        self.convert_failures.push_back(message.into());
        self
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }
}

impl LeadGateway for ScriptedGateway {
    fn load_leads(&mut self) -> Result<Vec<Lead>> {
        self.load_calls += 1;
        if let Some(message) = self.load_failures.pop_front() {
            return Err(anyhow!(message));
        }
        Ok(self.leads.clone())
    }

    fn update_lead(&mut self, lead: &Lead) -> Result<Lead> {
        self.update_calls += 1;
        if let Some(message) = self.update_failures.pop_front() {
            return Err(anyhow!(message));
        }
        let slot = self
            .leads
            .iter_mut()
            .find(|candidate| candidate.id == lead.id)
            .with_context(|| format!("lead {} not found", lead.id))?;
        *slot = lead.clone();
        Ok(lead.clone())
    }

    fn convert_lead(&mut self, lead: &Lead) -> Result<Opportunity> {
        self.convert_calls += 1;
        if let Some(message) = self.convert_failures.pop_front() {
            return Err(anyhow!(message));
        }
        let slot = self
            .leads
            .iter_mut()
            .find(|candidate| candidate.id == lead.id)
            .with_context(|| format!("lead {} not found", lead.id))?;
        if slot.is_converted() {
            bail!("lead {} is already converted", lead.id);
        }
        slot.status = LeadStatus::Converted;
        self.next_opportunity += 1;
        Ok(Opportunity::from_lead(
            OpportunityId::new(self.next_opportunity),
            lead,
            fixture_datetime(),
        ))
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("seller.db");
    Ok((dir, db_path))
}

pub fn fixture_datetime() -> OffsetDateTime {
    datetime!(2026-02-19 12:34:56 UTC)
}

/// Small hand-picked dataset with distinct names, companies and scores.
pub fn sample_leads() -> Vec<Lead> {
    let rows: [(i64, &str, &str, &str, u8, LeadStatus); 5] = [
        (1, "Dana Reed", "Acme Corp", "Website", 72, LeadStatus::New),
        (2, "Eli Brooks", "Globex Labs", "Referral", 95, LeadStatus::Qualified),
        (3, "Fay Lopez", "Initech", "Trade Show", 81, LeadStatus::Contacted),
        (4, "Gus Ward", "Acme Corp", "Cold Call", 60, LeadStatus::Converted),
        (5, "Hana Diaz", "Hooli", "LinkedIn", 88, LeadStatus::Qualified),
    ];
    rows.into_iter()
        .map(|(id, name, company, source, score, status)| Lead {
            id: LeadId::new(id),
            name: name.to_owned(),
            company: company.to_owned(),
            email: format!(
                "{}@{}.com",
                name.split_whitespace()
                    .next()
                    .unwrap_or("lead")
                    .to_ascii_lowercase(),
                company
                    .split_whitespace()
                    .next()
                    .unwrap_or("example")
                    .to_ascii_lowercase()
            ),
            source: source.to_owned(),
            score,
            status,
        })
        .collect()
}
