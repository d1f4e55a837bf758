// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{LeadId, Opportunity, OpportunityId, OpportunityStage};

pub const EMPTY_TITLE: &str = "No opportunities yet";
pub const EMPTY_HINT: &str = "Convert leads to create opportunities";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityRow {
    pub id: OpportunityId,
    pub lead_id: LeadId,
    pub name: String,
    pub stage: OpportunityStage,
    pub account: String,
    /// `None` when the value is absent or zero; zero is never shown.
    pub value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpportunitySummary {
    pub rows: Vec<OpportunityRow>,
    pub total_value: i64,
}

impl OpportunitySummary {
    pub fn from_opportunities(opportunities: &[Opportunity]) -> Self {
        let rows = opportunities
            .iter()
            .map(|opportunity| OpportunityRow {
                id: opportunity.id,
                lead_id: opportunity.lead_id,
                name: opportunity.name.clone(),
                stage: opportunity.stage,
                account: opportunity.company.clone(),
                value: displayed_value(opportunity.value),
            })
            .collect::<Vec<_>>();
        let total_value = rows
            .iter()
            .filter_map(|row| row.value)
            .fold(0_i64, i64::saturating_add);
        Self { rows, total_value }
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count_label(&self) -> String {
        format!("Total Opportunities: {}", self.count())
    }

    pub fn total_label(&self) -> String {
        format!("Total Value: {}", format_currency(self.total_value))
    }
}

fn displayed_value(value: Option<i64>) -> Option<i64> {
    value.filter(|amount| *amount != 0)
}

pub fn format_currency(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}${}", format_thousands(amount.unsigned_abs()))
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{OpportunitySummary, format_currency, format_thousands};
    use crate::{LeadId, Opportunity, OpportunityId, OpportunityStage};
    use time::OffsetDateTime;

    fn opportunity(id: i64, value: Option<i64>) -> Opportunity {
        Opportunity {
            id: OpportunityId::new(id),
            lead_id: LeadId::new(id),
            name: format!("Lead {id} - Co"),
            company: "Co".to_owned(),
            value,
            stage: OpportunityStage::Prospecting,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn zero_values_are_hidden_and_excluded_from_total() {
        let summary = OpportunitySummary::from_opportunities(&[
            opportunity(1, Some(100)),
            opportunity(2, Some(0)),
            opportunity(3, Some(50)),
        ]);
        assert_eq!(summary.total_value, 150);
        assert_eq!(summary.total_label(), "Total Value: $150");
        let shown = summary.rows.iter().map(|row| row.value).collect::<Vec<_>>();
        assert_eq!(shown, vec![Some(100), None, Some(50)]);
        assert_eq!(summary.count(), 3);
    }

    #[test]
    fn absent_values_count_as_zero() {
        let summary = OpportunitySummary::from_opportunities(&[opportunity(1, None)]);
        assert_eq!(summary.total_value, 0);
        assert_eq!(summary.rows[0].value, None);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let summary = OpportunitySummary::from_opportunities(&[
            opportunity(1, Some(i64::MAX)),
            opportunity(2, Some(1)),
        ]);
        assert_eq!(summary.total_value, i64::MAX);
    }

    #[test]
    fn empty_summary() {
        let summary = OpportunitySummary::from_opportunities(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.count_label(), "Total Opportunities: 0");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_currency(-12_500), "-$12,500");
    }
}
