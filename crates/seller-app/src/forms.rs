// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

use crate::{Lead, LeadStatus};

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Edit buffer for the detail panel. Only email and status are editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadDraft {
    pub email: String,
    pub status: LeadStatus,
}

impl LeadDraft {
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            email: lead.email.clone(),
            status: lead.status,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !validate_email(&self.email) {
            bail!(INVALID_EMAIL_MESSAGE);
        }
        Ok(())
    }

    pub fn set_status(&mut self, status: LeadStatus) -> Result<()> {
        self.ensure_status_unlocked()?;
        if !status.is_editable() {
            bail!(
                "status `{}` cannot be chosen by hand -- convert the lead instead",
                status.as_str()
            );
        }
        self.status = status;
        Ok(())
    }

    /// Next status in the editable cycle. Conversion is one-way, so a
    /// converted draft keeps its status.
    pub fn cycle_status(&mut self) -> Result<()> {
        self.ensure_status_unlocked()?;
        let editable = LeadStatus::EDITABLE;
        let next = editable
            .iter()
            .position(|status| *status == self.status)
            .map_or(0, |index| (index + 1) % editable.len());
        self.status = editable[next];
        Ok(())
    }

    fn ensure_status_unlocked(&self) -> Result<()> {
        if self.status == LeadStatus::Converted {
            bail!("converted leads keep their status -- only the email can change");
        }
        Ok(())
    }

    pub fn apply_to(&self, lead: &Lead) -> Lead {
        Lead {
            email: self.email.clone(),
            status: self.status,
            ..lead.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{INVALID_EMAIL_MESSAGE, LeadDraft, validate_email};
    use crate::{Lead, LeadId, LeadStatus};

    fn lead() -> Lead {
        Lead {
            id: LeadId::new(3),
            name: "Riley Ward".to_owned(),
            company: "Initech".to_owned(),
            email: "riley@initech.com".to_owned(),
            source: "Trade Show".to_owned(),
            score: 81,
            status: LeadStatus::Contacted,
        }
    }

    #[test]
    fn email_pattern_accepts_simple_addresses() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("first.last+tag@sub.example.org"));
    }

    #[test]
    fn email_pattern_rejects_malformed_addresses() {
        for bad in [
            "not-an-email",
            "",
            "a@b",
            "a b@c.io",
            "@b.co",
            "a@.co",
            "a@b.",
            "a@@b.co",
        ] {
            assert!(!validate_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn draft_validation_reports_user_message() {
        let mut draft = LeadDraft::from_lead(&lead());
        draft.email = "nope".to_owned();
        let error = draft.validate().expect_err("invalid email should fail");
        assert_eq!(error.to_string(), INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn draft_refuses_manual_conversion() {
        let mut draft = LeadDraft::from_lead(&lead());
        assert!(draft.set_status(LeadStatus::Converted).is_err());
        assert_eq!(draft.status, LeadStatus::Contacted);
        assert!(draft.set_status(LeadStatus::Qualified).is_ok());
    }

    #[test]
    fn status_cycle_stays_within_editable_statuses() -> anyhow::Result<()> {
        let mut draft = LeadDraft::from_lead(&lead());
        draft.cycle_status()?;
        assert_eq!(draft.status, LeadStatus::Qualified);
        draft.cycle_status()?;
        assert_eq!(draft.status, LeadStatus::New);
        Ok(())
    }

    #[test]
    fn converted_draft_status_is_locked() {
        let mut draft = LeadDraft::from_lead(&Lead {
            status: LeadStatus::Converted,
            ..lead()
        });
        let error = draft.cycle_status().expect_err("cycle should be refused");
        assert!(error.to_string().contains("converted leads keep their status"));
        assert!(draft.set_status(LeadStatus::New).is_err());
        assert_eq!(draft.status, LeadStatus::Converted);

        draft.email = "still@editable.io".to_owned();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.apply_to(&lead()).status, LeadStatus::Converted);
    }

    #[test]
    fn apply_keeps_read_only_fields() {
        let original = lead();
        let mut draft = LeadDraft::from_lead(&original);
        draft.email = "new@initech.com".to_owned();
        let updated = draft.apply_to(&original);
        assert_eq!(updated.email, "new@initech.com");
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.score, original.score);
    }
}
