// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use seller_app::{Lead, LeadId, LeadStatus};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const COMPANY_ROOTS: [&str; 14] = [
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark", "Wayne", "Tyrell", "Soylent",
    "Vandelay", "Cyberdyne", "Wonka", "Gringotts", "Monarch",
];
const COMPANY_SUFFIXES: [&str; 6] = ["Corp", "Labs", "Industries", "Systems", "Group", "Co"];

const SOURCES: [&str; 6] = [
    "Website",
    "Referral",
    "Trade Show",
    "Cold Call",
    "LinkedIn",
    "Webinar",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for the `--demo` lead dataset.
#[derive(Debug, Clone)]
pub struct LeadFaker {
    rng: DeterministicRng,
}

impl LeadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    fn lead(&mut self, id: i64) -> Lead {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let company = self.company();
        let domain = company
            .split_whitespace()
            .next()
            .unwrap_or("example")
            .to_ascii_lowercase();
        Lead {
            id: LeadId::new(id),
            name: format!("{first} {last}"),
            email: format!("{}@{domain}.com", first.to_ascii_lowercase()),
            company,
            source: self.pick(&SOURCES).to_owned(),
            score: self.score(),
            status: LeadStatus::ALL[self.rng.int_n(LeadStatus::ALL.len())],
        }
    }

    /// Leads with ids `1..=count`.
    pub fn dataset(&mut self, count: usize) -> Vec<Lead> {
        (1..=count as i64).map(|id| self.lead(id)).collect()
    }

    fn company(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&COMPANY_ROOTS),
            self.pick(&COMPANY_SUFFIXES)
        )
    }

    fn score(&mut self) -> u8 {
        (self.rng.next_u64() % 101) as u8
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::LeadFaker;
    use anyhow::Result;
    use seller_app::{validate_email, validate_seed_dataset};

    #[test]
    fn same_seed_same_dataset() {
        assert_eq!(LeadFaker::new(42).dataset(5), LeadFaker::new(42).dataset(5));
    }

    #[test]
    fn zero_seed_is_usable() {
        assert_eq!(LeadFaker::new(0).dataset(3), LeadFaker::new(1).dataset(3));
    }

    #[test]
    fn dataset_is_valid_seed_data() -> Result<()> {
        let leads = LeadFaker::new(7).dataset(40);
        validate_seed_dataset(&leads)?;
        assert_eq!(leads.len(), 40);
        assert_eq!(leads[0].id.get(), 1);
        assert!(leads.iter().all(|lead| validate_email(&lead.email)));
        assert!(leads.iter().all(|lead| lead.score <= 100));
        Ok(())
    }
}
