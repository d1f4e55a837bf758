// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    FilterPreferences, Lead, LeadId, LeadStatus, OperationResult, Opportunity, OpportunityId,
    OpportunitySummary, SortBy, StatusFilter, filter_leads, validate_seed_dataset,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub leads: Vec<Lead>,
    pub opportunities: Vec<Opportunity>,
    pub selected: Option<LeadId>,
    pub load: LoadState,
    pub filters: FilterPreferences,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            leads: Vec::new(),
            opportunities: Vec::new(),
            selected: None,
            load: LoadState::Loading,
            filters: FilterPreferences::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    BeginLoad,
    FinishLoad(Result<Vec<Lead>, String>),
    SetSearch(String),
    SetStatusFilter(StatusFilter),
    SetSort(SortBy),
    ApplyPreferences(FilterPreferences),
    Select(LeadId),
    ClearSelection,
    ApplyUpdate(Lead),
    ApplyConversion(Opportunity),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    LoadStarted,
    LeadsLoaded(usize),
    LoadFailed(String),
    FiltersChanged(FilterPreferences),
    SelectionChanged(Option<LeadId>),
    LeadUpdated(LeadId),
    LeadConverted {
        lead_id: LeadId,
        opportunity_id: OpportunityId,
    },
    CommandRejected(String),
    StatusUpdated(String),
    StatusCleared,
}

/// Immutable snapshot handed to the renderers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleView {
    pub leads: Vec<Lead>,
    pub selected: Option<Lead>,
    pub summary: OpportunitySummary,
    pub load: LoadState,
    pub filters: FilterPreferences,
    pub status_line: Option<String>,
}

impl ConsoleView {
    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn is_selected(&self, lead_id: LeadId) -> bool {
        self.selected.as_ref().is_some_and(|lead| lead.id == lead_id)
    }
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::BeginLoad => {
                self.load = LoadState::Loading;
                vec![AppEvent::LoadStarted]
            }
            AppCommand::FinishLoad(Ok(leads)) => {
                if let Err(error) = validate_seed_dataset(&leads) {
                    return self.fail_load(format!("{error:#}"));
                }
                let count = leads.len();
                self.leads = leads;
                self.selected = None;
                self.load = LoadState::Ready;
                vec![AppEvent::LeadsLoaded(count)]
            }
            AppCommand::FinishLoad(Err(message)) => self.fail_load(message),
            AppCommand::SetSearch(search) => self.update_filters(|filters| filters.search = search),
            AppCommand::SetStatusFilter(status) => {
                self.update_filters(|filters| filters.status = status)
            }
            AppCommand::SetSort(sort) => self.update_filters(|filters| filters.sort = sort),
            AppCommand::ApplyPreferences(prefs) => self.update_filters(|filters| *filters = prefs),
            AppCommand::Select(lead_id) => {
                if self.lead(lead_id).is_none() {
                    return vec![reject(format!("lead {lead_id} does not exist"))];
                }
                self.selected = Some(lead_id);
                vec![AppEvent::SelectionChanged(self.selected)]
            }
            AppCommand::ClearSelection => {
                self.selected = None;
                vec![AppEvent::SelectionChanged(None)]
            }
            AppCommand::ApplyUpdate(lead) => self.apply_update(lead),
            AppCommand::ApplyConversion(opportunity) => self.apply_conversion(opportunity),
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn lead(&self, lead_id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == lead_id)
    }

    pub fn selected_lead(&self) -> Option<&Lead> {
        self.selected.and_then(|lead_id| self.lead(lead_id))
    }

    pub fn visible_leads(&self) -> Vec<Lead> {
        filter_leads(&self.leads, &self.filters)
    }

    /// Folds a finished backend update into state. A backend success that the
    /// state refuses is reported as a failure.
    pub fn complete_update(
        &mut self,
        result: Result<Lead, String>,
    ) -> (OperationResult, Option<Lead>) {
        let saved = match result {
            Ok(saved) => saved,
            Err(message) => return (OperationResult::failed(message), None),
        };
        let events = self.dispatch(AppCommand::ApplyUpdate(saved.clone()));
        match rejection(&events) {
            Some(message) => (OperationResult::failed(message), None),
            None => (OperationResult::ok(), Some(saved)),
        }
    }

    pub fn complete_conversion(&mut self, result: Result<Opportunity, String>) -> OperationResult {
        let opportunity = match result {
            Ok(opportunity) => opportunity,
            Err(message) => return OperationResult::failed(message),
        };
        let events = self.dispatch(AppCommand::ApplyConversion(opportunity));
        match rejection(&events) {
            Some(message) => OperationResult::failed(message),
            None => OperationResult::ok(),
        }
    }

    pub fn view(&self) -> ConsoleView {
        ConsoleView {
            leads: self.visible_leads(),
            selected: self.selected_lead().cloned(),
            summary: OpportunitySummary::from_opportunities(&self.opportunities),
            load: self.load.clone(),
            filters: self.filters.clone(),
            status_line: self.status_line.clone(),
        }
    }

    fn fail_load(&mut self, message: String) -> Vec<AppEvent> {
        tracing::error!(error = %message, "lead load failed");
        self.leads.clear();
        self.selected = None;
        self.load = LoadState::Failed(message.clone());
        vec![AppEvent::LoadFailed(message)]
    }

    fn update_filters(&mut self, change: impl FnOnce(&mut FilterPreferences)) -> Vec<AppEvent> {
        let before = self.filters.clone();
        change(&mut self.filters);
        if self.filters == before {
            return Vec::new();
        }
        vec![AppEvent::FiltersChanged(self.filters.clone())]
    }

    fn apply_update(&mut self, lead: Lead) -> Vec<AppEvent> {
        let Some(current) = self.leads.iter_mut().find(|current| current.id == lead.id) else {
            return vec![reject(format!("lead {} does not exist", lead.id))];
        };
        if lead.status == LeadStatus::Converted && current.status != LeadStatus::Converted {
            return vec![reject(format!(
                "lead {} can only become converted through conversion",
                lead.id
            ))];
        }
        if current.status == LeadStatus::Converted && lead.status != LeadStatus::Converted {
            return vec![reject(format!(
                "lead {} is converted; its status can no longer change",
                lead.id
            ))];
        }
        let lead_id = lead.id;
        *current = lead;
        vec![AppEvent::LeadUpdated(lead_id)]
    }

    fn apply_conversion(&mut self, opportunity: Opportunity) -> Vec<AppEvent> {
        let lead_id = opportunity.lead_id;
        let Some(current) = self.leads.iter_mut().find(|lead| lead.id == lead_id) else {
            return vec![reject(format!("lead {lead_id} does not exist"))];
        };
        if current.status == LeadStatus::Converted {
            return vec![reject(format!("lead {lead_id} is already converted"))];
        }
        *current = Lead {
            status: LeadStatus::Converted,
            ..current.clone()
        };
        let opportunity_id = opportunity.id;
        self.opportunities.push(opportunity);
        self.selected = None;
        vec![
            AppEvent::LeadConverted {
                lead_id,
                opportunity_id,
            },
            AppEvent::SelectionChanged(None),
        ]
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

/// First rejection message among `events`, if any.
pub fn rejection(events: &[AppEvent]) -> Option<&str> {
    events.iter().find_map(|event| match event {
        AppEvent::CommandRejected(message) => Some(message.as_str()),
        _ => None,
    })
}

fn reject(message: String) -> AppEvent {
    tracing::warn!(reason = %message, "command rejected");
    AppEvent::CommandRejected(message)
}
