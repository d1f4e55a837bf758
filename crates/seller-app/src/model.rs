// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

use crate::ids::*;

pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
}

impl LeadStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::Contacted, Self::Qualified, Self::Converted];

    /// Statuses a user may pick by hand. `Converted` is reachable only through
    /// the conversion command.
    pub const EDITABLE: [Self; 3] = [Self::New, Self::Contacted, Self::Qualified];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Converted => "Converted",
        }
    }

    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::Converted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityStage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Prospecting => "Prospecting",
            Self::Qualification => "Qualification",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    New,
    Contacted,
    Qualified,
    Converted,
}

impl StatusFilter {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Converted,
    ];

    pub const fn status(self) -> Option<LeadStatus> {
        match self {
            Self::All => None,
            Self::New => Some(LeadStatus::New),
            Self::Contacted => Some(LeadStatus::Contacted),
            Self::Qualified => Some(LeadStatus::Qualified),
            Self::Converted => Some(LeadStatus::Converted),
        }
    }

    pub const fn label(self) -> &'static str {
        match self.status() {
            Some(status) => status.label(),
            None => "All Status",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl From<LeadStatus> for StatusFilter {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::New => Self::New,
            LeadStatus::Contacted => Self::Contacted,
            LeadStatus::Qualified => Self::Qualified,
            LeadStatus::Converted => Self::Converted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Score,
    Name,
    Company,
}

impl SortBy {
    pub const ALL: [Self; 3] = [Self::Score, Self::Name, Self::Company];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Score => "Sort by Score",
            Self::Name => "Sort by Name",
            Self::Company => "Sort by Company",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub const fn for_score(score: u8) -> Self {
        if score >= 90 {
            Self::High
        } else if score >= 75 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub company: String,
    pub email: String,
    pub source: String,
    pub score: u8,
    pub status: LeadStatus,
}

impl Lead {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score)
    }

    pub fn is_converted(&self) -> bool {
        self.status == LeadStatus::Converted
    }

    pub fn validate_seed(&self) -> Result<()> {
        if self.score > MAX_SCORE {
            bail!(
                "lead {} has score {}; scores must be within 0..={MAX_SCORE}",
                self.id,
                self.score
            );
        }
        if self.name.trim().is_empty() {
            bail!("lead {} has an empty name", self.id);
        }
        Ok(())
    }
}

/// Checks a whole dataset before it becomes authoritative state.
pub fn validate_seed_dataset(leads: &[Lead]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for lead in leads {
        lead.validate_seed()?;
        if !seen.insert(lead.id) {
            bail!("seed dataset repeats lead id {}; ids must be unique", lead.id);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub lead_id: LeadId,
    pub name: String,
    pub company: String,
    pub value: Option<i64>,
    pub stage: OpportunityStage,
    pub created_at: OffsetDateTime,
}

impl Opportunity {
    pub fn from_lead(id: OpportunityId, lead: &Lead, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            lead_id: lead.id,
            name: format!("{} - {}", lead.name, lead.company),
            company: lead.company.clone(),
            value: Some(0),
            stage: OpportunityStage::Prospecting,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterPreferences {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: SortBy,
}

#[cfg(test)]
mod tests {
    use super::{
        FilterPreferences, Lead, LeadStatus, Opportunity, OpportunityStage, ScoreBand, SortBy,
        StatusFilter, validate_seed_dataset,
    };
    use crate::{LeadId, OpportunityId};
    use anyhow::Result;
    use time::OffsetDateTime;

    fn lead(id: i64, score: u8) -> Lead {
        Lead {
            id: LeadId::new(id),
            name: "Dana Reed".to_owned(),
            company: "Acme".to_owned(),
            email: "dana@acme.io".to_owned(),
            source: "Website".to_owned(),
            score,
            status: LeadStatus::New,
        }
    }

    #[test]
    fn seed_record_decodes_from_dataset_shape() -> Result<()> {
        let raw = r#"{"id":7,"name":"Ana","company":"Globex","email":"ana@globex.com","source":"Referral","score":88,"status":"qualified"}"#;
        let lead: Lead = serde_json::from_str(raw)?;
        assert_eq!(lead.id, LeadId::new(7));
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert_eq!(lead.score_band(), ScoreBand::Medium);
        Ok(())
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = r#"{"id":1,"name":"A","company":"B","email":"a@b.co","source":"x","score":1,"status":"lost"}"#;
        assert!(serde_json::from_str::<Lead>(raw).is_err());
    }

    #[test]
    fn dataset_validation_rejects_duplicates_and_out_of_range_scores() {
        assert!(validate_seed_dataset(&[lead(1, 50), lead(2, 100)]).is_ok());
        assert!(validate_seed_dataset(&[lead(1, 50), lead(1, 60)]).is_err());
        assert!(validate_seed_dataset(&[lead(3, 101)]).is_err());
    }

    #[test]
    fn opportunity_derives_name_and_account_from_lead() {
        let source = lead(4, 91);
        let opportunity =
            Opportunity::from_lead(OpportunityId::new(10), &source, OffsetDateTime::UNIX_EPOCH);
        assert_eq!(opportunity.name, "Dana Reed - Acme");
        assert_eq!(opportunity.company, "Acme");
        assert_eq!(opportunity.lead_id, source.id);
        assert_eq!(opportunity.stage, OpportunityStage::Prospecting);
        assert_eq!(opportunity.value, Some(0));
    }

    #[test]
    fn stage_strings_use_kebab_case() -> Result<()> {
        assert_eq!(
            serde_json::to_string(&OpportunityStage::ClosedWon)?,
            "\"closed-won\""
        );
        let decoded: Vec<OpportunityStage> = serde_json::from_str(
            r#"["prospecting","qualification","proposal","negotiation","closed-won","closed-lost"]"#,
        )?;
        assert_eq!(
            decoded,
            vec![
                OpportunityStage::Prospecting,
                OpportunityStage::Qualification,
                OpportunityStage::Proposal,
                OpportunityStage::Negotiation,
                OpportunityStage::ClosedWon,
                OpportunityStage::ClosedLost,
            ]
        );
        Ok(())
    }

    #[test]
    fn preferences_use_stored_key_names() -> Result<()> {
        let prefs = FilterPreferences {
            search: "acme".to_owned(),
            status: StatusFilter::Qualified,
            sort: SortBy::Score,
        };
        assert_eq!(
            serde_json::to_string(&prefs)?,
            r#"{"search":"acme","status":"qualified","sort":"score"}"#
        );
        let partial: FilterPreferences = serde_json::from_str(r#"{"status":"new"}"#)?;
        assert_eq!(partial.search, "");
        assert_eq!(partial.status, StatusFilter::New);
        assert_eq!(partial.sort, SortBy::Score);
        Ok(())
    }

    #[test]
    fn status_filter_all_round_trips_through_json() -> Result<()> {
        let decoded: StatusFilter = serde_json::from_str("\"all\"")?;
        assert_eq!(decoded, StatusFilter::All);
        Ok(())
    }

    #[test]
    fn filter_and_sort_cycles_wrap() {
        assert_eq!(StatusFilter::Converted.next(), StatusFilter::All);
        assert_eq!(SortBy::Company.next(), SortBy::Score);
        assert_eq!(
            StatusFilter::from(LeadStatus::Contacted).status(),
            Some(LeadStatus::Contacted)
        );
    }

    #[test]
    fn score_bands_follow_thresholds() {
        assert_eq!(ScoreBand::for_score(90), ScoreBand::High);
        assert_eq!(ScoreBand::for_score(89), ScoreBand::Medium);
        assert_eq!(ScoreBand::for_score(75), ScoreBand::Medium);
        assert_eq!(ScoreBand::for_score(74), ScoreBand::Low);
    }

    #[test]
    fn converted_is_not_editable() {
        assert!(!LeadStatus::Converted.is_editable());
        assert!(LeadStatus::EDITABLE.iter().all(|status| status.is_editable()));
    }
}
