// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{Lead, LeadDraft, LeadStatus, OperationResult};

pub const UPDATE_FAILED_MESSAGE: &str = "Update failed";
pub const CONVERSION_FAILED_MESSAGE: &str = "Conversion failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    Viewing,
    Editing,
    Saving,
    Converting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    /// Validation failed; the panel stays in editing with `error` set.
    Invalid(String),
    /// Hand this record to the update operation.
    Submit(Lead),
    NotEditing,
}

/// Single-lead edit surface. Only one of save and convert can be in flight,
/// since both occupy the one `mode` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    lead: Lead,
    mode: DetailMode,
    draft: Option<LeadDraft>,
    error: Option<String>,
}

impl DetailPanel {
    pub fn new(lead: Lead) -> Self {
        Self {
            lead,
            mode: DetailMode::Viewing,
            draft: None,
            error: None,
        }
    }

    pub fn lead(&self) -> &Lead {
        &self.lead
    }

    pub fn mode(&self) -> DetailMode {
        self.mode
    }

    pub fn draft(&self) -> Option<&LeadDraft> {
        self.draft.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.mode, DetailMode::Saving | DetailMode::Converting)
    }

    pub fn begin_edit(&mut self) -> bool {
        if self.mode != DetailMode::Viewing {
            return false;
        }
        self.draft = Some(LeadDraft::from_lead(&self.lead));
        self.mode = DetailMode::Editing;
        true
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        let draft = self.editable_draft()?;
        draft.email = email.into();
        Ok(())
    }

    pub fn push_email_char(&mut self, value: char) -> Result<()> {
        self.editable_draft()?.email.push(value);
        Ok(())
    }

    pub fn pop_email_char(&mut self) -> Result<()> {
        self.editable_draft()?.email.pop();
        Ok(())
    }

    pub fn set_status(&mut self, status: LeadStatus) -> Result<()> {
        self.editable_draft()?.set_status(status)
    }

    pub fn cycle_status(&mut self) -> Result<()> {
        self.editable_draft()?.cycle_status()
    }

    pub fn request_save(&mut self) -> SaveRequest {
        if self.mode != DetailMode::Editing {
            return SaveRequest::NotEditing;
        }
        let Some(draft) = &self.draft else {
            return SaveRequest::NotEditing;
        };
        if let Err(error) = draft.validate() {
            let message = error.to_string();
            self.error = Some(message.clone());
            return SaveRequest::Invalid(message);
        }
        let candidate = draft.apply_to(&self.lead);
        self.error = None;
        self.mode = DetailMode::Saving;
        SaveRequest::Submit(candidate)
    }

    /// Completes a save. `saved` is the record echoed by the backend; when
    /// absent the edit buffer applied to the displayed lead is used.
    pub fn finish_save(&mut self, result: &OperationResult, saved: Option<Lead>) {
        if self.mode != DetailMode::Saving {
            return;
        }
        if let Some(message) = result.error_or(UPDATE_FAILED_MESSAGE) {
            self.error = Some(message);
            self.mode = DetailMode::Editing;
            return;
        }
        let committed = match (saved, &self.draft) {
            (Some(lead), _) => lead,
            (None, Some(draft)) => draft.apply_to(&self.lead),
            (None, None) => self.lead.clone(),
        };
        self.lead = committed;
        self.draft = None;
        self.error = None;
        self.mode = DetailMode::Viewing;
    }

    pub fn cancel_edit(&mut self) -> bool {
        if self.mode != DetailMode::Editing {
            return false;
        }
        self.draft = None;
        self.error = None;
        self.mode = DetailMode::Viewing;
        true
    }

    pub fn can_convert(&self) -> bool {
        self.mode == DetailMode::Viewing && !self.lead.is_converted()
    }

    pub fn request_convert(&mut self) -> Option<Lead> {
        if !self.can_convert() {
            return None;
        }
        self.error = None;
        self.mode = DetailMode::Converting;
        Some(self.lead.clone())
    }

    /// On success the owner closes the panel; on failure the error is shown
    /// and the panel stays open.
    pub fn finish_convert(&mut self, result: &OperationResult) {
        if self.mode != DetailMode::Converting {
            return;
        }
        self.error = result.error_or(CONVERSION_FAILED_MESSAGE);
        self.mode = DetailMode::Viewing;
    }

    pub fn save_label(&self) -> &'static str {
        if self.mode == DetailMode::Saving {
            "Saving..."
        } else {
            "Save"
        }
    }

    pub fn convert_label(&self) -> &'static str {
        if self.mode == DetailMode::Converting {
            "Converting..."
        } else {
            "Convert to Opportunity"
        }
    }

    fn editable_draft(&mut self) -> Result<&mut LeadDraft> {
        if self.mode != DetailMode::Editing {
            bail!("lead {} is not being edited -- press e to edit", self.lead.id);
        }
        match self.draft.as_mut() {
            Some(draft) => Ok(draft),
            None => bail!("edit buffer missing for lead {}", self.lead.id),
        }
    }
}
