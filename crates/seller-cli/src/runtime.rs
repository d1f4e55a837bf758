// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Latencies;
use anyhow::{Context, Result, anyhow, bail};
use seller_app::{
    FilterPreferences, INVALID_EMAIL_MESSAGE, Lead, LeadGateway, LeadStatus, Opportunity,
    OpportunityId, PreferenceStore, validate_email, validate_seed_dataset,
};
use seller_tui::{GatewayJob, SharedGateway};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use time::OffsetDateTime;

const BUNDLED_LEADS: &str = include_str!("../data/leads.json");

/// Reads the lead dataset from `path`, or the bundled one when absent.
pub fn load_seed_dataset(path: Option<&Path>) -> Result<Vec<Lead>> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read lead dataset {}", path.display()))?;
            parse_seed_dataset(&raw, &path.display().to_string())
        }
        None => parse_seed_dataset(BUNDLED_LEADS, "bundled"),
    }
}

fn parse_seed_dataset(raw: &str, origin: &str) -> Result<Vec<Lead>> {
    let leads: Vec<Lead> = serde_json::from_str(raw)
        .with_context(|| format!("decode {origin} lead dataset; expected a JSON array of leads"))?;
    validate_seed_dataset(&leads).with_context(|| format!("validate {origin} lead dataset"))?;
    Ok(leads)
}

/// Backend stand-in: holds the dataset in memory and sleeps to mimic network
/// round trips.
#[derive(Debug)]
pub struct SimulatedGateway {
    leads: Vec<Lead>,
    latencies: Latencies,
    last_opportunity_id: i64,
}

impl SimulatedGateway {
    pub fn new(leads: Vec<Lead>, latencies: Latencies) -> Self {
        Self {
            leads,
            latencies,
            last_opportunity_id: 0,
        }
    }

    // Millisecond timestamps, bumped when two conversions land in the same ms.
    fn next_opportunity_id(&mut self, now: OffsetDateTime) -> OpportunityId {
        let millis = i64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX);
        let id = millis.max(self.last_opportunity_id.saturating_add(1));
        self.last_opportunity_id = id;
        OpportunityId::new(id)
    }

    fn lead_mut(&mut self, lead: &Lead) -> Result<&mut Lead> {
        self.leads
            .iter_mut()
            .find(|candidate| candidate.id == lead.id)
            .ok_or_else(|| anyhow!("lead {} not found", lead.id))
    }
}

impl LeadGateway for SimulatedGateway {
    fn load_leads(&mut self) -> Result<Vec<Lead>> {
        thread::sleep(self.latencies.load);
        tracing::info!(count = self.leads.len(), "leads loaded");
        Ok(self.leads.clone())
    }

    fn update_lead(&mut self, lead: &Lead) -> Result<Lead> {
        thread::sleep(self.latencies.update);
        if !validate_email(&lead.email) {
            bail!("{INVALID_EMAIL_MESSAGE}");
        }
        let slot = self.lead_mut(lead)?;
        if slot.is_converted() && lead.status != LeadStatus::Converted {
            bail!("lead {} is converted; its status can no longer change", lead.id);
        }
        *slot = lead.clone();
        Ok(slot.clone())
    }

    fn convert_lead(&mut self, lead: &Lead) -> Result<Opportunity> {
        thread::sleep(self.latencies.convert);
        let slot = self.lead_mut(lead)?;
        if slot.is_converted() {
            bail!("lead {} is already converted", lead.id);
        }
        slot.status = LeadStatus::Converted;
        let converted = slot.clone();
        let now = OffsetDateTime::now_utc();
        let id = self.next_opportunity_id(now);
        Ok(Opportunity::from_lead(id, &converted, now))
    }
}

/// Bridges the terminal UI to the simulated backend and the preference store.
/// Gateway calls run on worker threads so the UI keeps rendering.
pub struct ConsoleRuntime<'a, P: PreferenceStore> {
    gateway: Arc<Mutex<SimulatedGateway>>,
    prefs: &'a P,
}

impl<'a, P: PreferenceStore> ConsoleRuntime<'a, P> {
    pub fn new(gateway: SimulatedGateway, prefs: &'a P) -> Self {
        Self {
            gateway: Arc::new(Mutex::new(gateway)),
            prefs,
        }
    }
}

impl<P: PreferenceStore> seller_tui::AppRuntime for ConsoleRuntime<'_, P> {
    fn gateway(&self) -> SharedGateway {
        self.gateway.clone()
    }

    fn load_filters(&mut self) -> Result<Option<FilterPreferences>> {
        self.prefs.load_filters()
    }

    fn save_filters(&mut self, prefs: &FilterPreferences) -> Result<()> {
        self.prefs.save_filters(prefs)
    }

    fn spawn(&mut self, job: GatewayJob) -> Result<()> {
        thread::Builder::new()
            .name("seller-gateway".to_owned())
            .spawn(job)
            .context("start gateway worker")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleRuntime, SimulatedGateway, load_seed_dataset, parse_seed_dataset};
    use crate::config::Latencies;
    use anyhow::Result;
    use seller_app::{
        FilterPreferences, LeadGateway, LeadId, LeadStatus, OpportunityStage, SortBy,
        StatusFilter,
    };
    use seller_testkit::{MemoryPreferences, sample_leads};
    use seller_tui::AppRuntime;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn instant() -> Latencies {
        Latencies {
            load: Duration::ZERO,
            update: Duration::ZERO,
            convert: Duration::ZERO,
        }
    }

    #[test]
    fn bundled_dataset_is_valid() -> Result<()> {
        let leads = load_seed_dataset(None)?;
        assert!(leads.len() >= 10);
        assert!(leads.iter().any(|lead| lead.status == LeadStatus::Converted));
        Ok(())
    }

    #[test]
    fn seed_file_overrides_bundled_dataset() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("leads.json");
        std::fs::write(
            &path,
            r#"[{"id":7,"name":"Ada Park","company":"Northwind","email":"ada@northwind.com","source":"Website","score":91,"status":"qualified"}]"#,
        )?;
        let leads = load_seed_dataset(Some(&path))?;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, LeadId::new(7));
        assert_eq!(leads[0].status, LeadStatus::Qualified);
        Ok(())
    }

    #[test]
    fn seed_with_out_of_range_score_is_rejected() {
        let error = parse_seed_dataset(
            r#"[{"id":1,"name":"Ada Park","company":"Northwind","email":"ada@northwind.com","source":"Website","score":140,"status":"new"}]"#,
            "test",
        )
        .expect_err("score above 100 should fail");
        assert!(format!("{error:#}").contains("scores must be within"));
    }

    #[test]
    fn seed_with_unknown_status_is_rejected() {
        let error = parse_seed_dataset(
            r#"[{"id":1,"name":"Ada Park","company":"Northwind","email":"ada@northwind.com","source":"Website","score":40,"status":"archived"}]"#,
            "test",
        )
        .expect_err("unknown status should fail");
        assert!(error.to_string().contains("decode test lead dataset"));
    }

    #[test]
    fn missing_seed_file_names_the_path() {
        let error = load_seed_dataset(Some(std::path::Path::new("/nonexistent/leads.json")))
            .expect_err("missing file should fail");
        assert!(error.to_string().contains("/nonexistent/leads.json"));
    }

    #[test]
    fn update_replaces_the_stored_record() -> Result<()> {
        let mut gateway = SimulatedGateway::new(sample_leads(), instant());
        let mut lead = sample_leads()[0].clone();
        lead.email = "dana.reed@acme.com".to_owned();
        lead.status = LeadStatus::Contacted;

        let saved = gateway.update_lead(&lead)?;
        assert_eq!(saved, lead);
        assert_eq!(gateway.load_leads()?[0], lead);
        Ok(())
    }

    #[test]
    fn update_rejects_invalid_email() {
        let mut gateway = SimulatedGateway::new(sample_leads(), instant());
        let mut lead = sample_leads()[0].clone();
        lead.email = "not-an-email".to_owned();
        let error = gateway.update_lead(&lead).expect_err("invalid email");
        assert_eq!(error.to_string(), "Please enter a valid email address");
    }

    #[test]
    fn update_cannot_reopen_a_converted_lead() -> Result<()> {
        let mut gateway = SimulatedGateway::new(sample_leads(), instant());
        let mut lead = sample_leads()[3].clone();
        assert_eq!(lead.status, LeadStatus::Converted);
        lead.status = LeadStatus::New;
        let error = gateway.update_lead(&lead).expect_err("reopening a converted lead");
        assert_eq!(
            error.to_string(),
            "lead 4 is converted; its status can no longer change"
        );

        lead.status = LeadStatus::Converted;
        lead.email = "gus@acme.io".to_owned();
        assert_eq!(gateway.update_lead(&lead)?.email, "gus@acme.io");
        let error = gateway.convert_lead(&lead).expect_err("duplicate conversion");
        assert_eq!(error.to_string(), "lead 4 is already converted");
        Ok(())
    }

    #[test]
    fn convert_marks_lead_and_builds_opportunity() -> Result<()> {
        let mut gateway = SimulatedGateway::new(sample_leads(), instant());
        let lead = sample_leads()[1].clone();

        let opportunity = gateway.convert_lead(&lead)?;
        assert_eq!(opportunity.lead_id, lead.id);
        assert_eq!(opportunity.name, "Eli Brooks - Globex Labs");
        assert_eq!(opportunity.stage, OpportunityStage::Prospecting);
        assert_eq!(opportunity.value, Some(0));

        let stored = gateway.load_leads()?;
        assert_eq!(stored[1].status, LeadStatus::Converted);
        Ok(())
    }

    #[test]
    fn second_conversion_is_refused() -> Result<()> {
        let mut gateway = SimulatedGateway::new(sample_leads(), instant());
        let lead = sample_leads()[2].clone();
        gateway.convert_lead(&lead)?;
        let error = gateway.convert_lead(&lead).expect_err("duplicate conversion");
        assert_eq!(error.to_string(), "lead 3 is already converted");
        Ok(())
    }

    #[test]
    fn opportunity_ids_are_unique_within_the_same_millisecond() -> Result<()> {
        let mut gateway = SimulatedGateway::new(sample_leads(), instant());
        let first = gateway.convert_lead(&sample_leads()[0])?;
        let second = gateway.convert_lead(&sample_leads()[1])?;
        let third = gateway.convert_lead(&sample_leads()[2])?;
        assert!(first.id < second.id);
        assert!(second.id < third.id);
        Ok(())
    }

    #[test]
    fn spawned_jobs_run_off_thread_against_the_shared_gateway() -> Result<()> {
        let prefs = MemoryPreferences::default();
        let mut runtime =
            ConsoleRuntime::new(SimulatedGateway::new(sample_leads(), instant()), &prefs);
        let (tx, rx) = mpsc::channel();

        let lead = sample_leads()[0].clone();
        let gateway = runtime.gateway();
        runtime.spawn(Box::new(move || {
            let result = gateway
                .lock()
                .expect("gateway lock")
                .convert_lead(&lead)
                .map(|opportunity| opportunity.lead_id)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send((thread::current().id(), result));
        }))?;

        let (worker, result) = rx.recv_timeout(Duration::from_secs(5))?;
        assert_ne!(worker, thread::current().id());
        assert_eq!(result, Ok(LeadId::new(1)));

        let shared = runtime.gateway();
        let stored = shared.lock().expect("gateway lock").load_leads()?;
        assert_eq!(stored[0].status, LeadStatus::Converted);
        Ok(())
    }

    #[test]
    fn filters_pass_through_to_store() -> Result<()> {
        let prefs = MemoryPreferences::default();
        let mut runtime =
            ConsoleRuntime::new(SimulatedGateway::new(sample_leads(), instant()), &prefs);
        let wanted = FilterPreferences {
            search: "hooli".to_owned(),
            status: StatusFilter::Qualified,
            sort: SortBy::Company,
        };
        runtime.save_filters(&wanted)?;
        assert_eq!(runtime.load_filters()?, Some(wanted));
        assert_eq!(prefs.saves(), 1);
        Ok(())
    }
}
