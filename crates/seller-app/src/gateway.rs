// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{Lead, Opportunity};

/// Backend capability behind the console. The production gateway simulates
/// network latency over a static dataset; tests script the outcomes.
pub trait LeadGateway {
    fn load_leads(&mut self) -> Result<Vec<Lead>>;
    /// Returns the record as the backend now holds it.
    fn update_lead(&mut self, lead: &Lead) -> Result<Lead>;
    fn convert_lead(&mut self, lead: &Lead) -> Result<Opportunity>;
}

/// Outcome handed back to the detail panel. `error` is present only when
/// `success` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl OperationResult {
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }

    /// Message to show, substituting `fallback` when the failure carried none.
    pub fn error_or(&self, fallback: &str) -> Option<String> {
        if self.success {
            return None;
        }
        Some(
            self.error
                .as_deref()
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(fallback)
                .to_owned(),
        )
    }
}
