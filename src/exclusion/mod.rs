// src/exclusion/mod.rs
//
// Cross-campaign exclusion: checks the deduplicated batch against identity
// keys from prior campaigns and the suppression list. The historical index
// is the "other side" of a match; it never participates in the batch's own
// dedup.

use std::collections::HashMap;

use log::info;
use rayon::prelude::*;

use crate::matching::email::normalize_email;
use crate::matching::similarity::{normalize, similarity_normalized};
use crate::matching::url::normalize_profile_url;
use crate::models::core::{ExclusionReason, HistoricalRecord, LeadRecord};
use crate::models::matching::{DedupedLead, ExcludedLead};
use crate::models::scoring::FuzzyMatchConfig;

/// A historical record prepared for fuzzy name+company comparison.
#[derive(Debug, Clone)]
struct FuzzyHistoryEntry {
    first: String,
    last: String,
    company: String,
    reason: ExclusionReason,
    display_key: String,
}

/// Precomputed lookups over historical identity keys.
///
/// Exact keys live in maps keyed by the normalized value; records with a
/// usable name+company also join an ordered list for the fuzzy scan. When
/// two historical records share a key, the first one supplied wins, so the
/// reported reason is deterministic.
#[derive(Debug, Clone, Default)]
pub struct HistoricalIndex {
    email_keys: HashMap<String, ExclusionReason>,
    url_keys: HashMap<String, ExclusionReason>,
    name_company_keys: HashMap<String, ExclusionReason>,
    fuzzy_entries: Vec<FuzzyHistoryEntry>,
}

fn name_company_key(first: &str, last: &str, company: &str) -> String {
    format!("{}|{}|{}", first, last, company)
}

impl HistoricalIndex {
    pub fn from_records(records: &[HistoricalRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            if let Some(email) = record.email.as_deref() {
                let key = normalize_email(email);
                if !key.is_empty() {
                    index.email_keys.entry(key).or_insert(record.reason);
                }
            }
            if let Some(url) = record.professional_network_url.as_deref() {
                let key = normalize_profile_url(url);
                if !key.is_empty() {
                    index.url_keys.entry(key).or_insert(record.reason);
                }
            }
            let first = normalize(record.first_name.as_deref().unwrap_or(""));
            let last = normalize(record.last_name.as_deref().unwrap_or(""));
            let company = normalize(record.company_name.as_deref().unwrap_or(""));
            if !company.is_empty() && !(first.is_empty() && last.is_empty()) {
                let key = name_company_key(&first, &last, &company);
                index
                    .name_company_keys
                    .entry(key.clone())
                    .or_insert(record.reason);
                index.fuzzy_entries.push(FuzzyHistoryEntry {
                    first,
                    last,
                    company,
                    reason: record.reason,
                    display_key: key,
                });
            }
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.email_keys.is_empty() && self.url_keys.is_empty() && self.fuzzy_entries.is_empty()
    }

    /// Check one lead against the index. Probes run in a fixed order (email,
    /// url, name+company key, fuzzy scan in index order) and the first hit
    /// wins, so the reported reason and key are deterministic.
    pub fn check(
        &self,
        lead: &LeadRecord,
        config: &FuzzyMatchConfig,
    ) -> Option<(ExclusionReason, String)> {
        if let Some(email) = lead.email.as_deref() {
            let key = normalize_email(email);
            if let Some(reason) = self.email_keys.get(&key) {
                return Some((*reason, key));
            }
        }
        if let Some(url) = lead.professional_network_url.as_deref() {
            let key = normalize_profile_url(url);
            if let Some(reason) = self.url_keys.get(&key) {
                return Some((*reason, key));
            }
        }

        let first = normalize(lead.first_name.as_deref().unwrap_or(""));
        let last = normalize(lead.last_name.as_deref().unwrap_or(""));
        let company = normalize(lead.company_name.as_deref().unwrap_or(""));
        if company.is_empty() || (first.is_empty() && last.is_empty()) {
            return None;
        }

        let key = name_company_key(&first, &last, &company);
        if let Some(reason) = self.name_company_keys.get(&key) {
            return Some((*reason, key));
        }

        // Same composite and threshold as the batch's internal fuzzy matcher
        for entry in &self.fuzzy_entries {
            let composite = config.first_name_weight
                * similarity_normalized(&first, &entry.first)
                + config.last_name_weight * similarity_normalized(&last, &entry.last)
                + config.company_weight * similarity_normalized(&company, &entry.company);
            if composite >= config.threshold {
                return Some((entry.reason, entry.display_key.clone()));
            }
        }
        None
    }
}

/// Partition the deduplicated batch into kept and excluded leads.
///
/// Exclusions always carry the reason and matched key; nothing is silently
/// dropped. Both output lists preserve input order.
pub fn partition_leads(
    leads: Vec<DedupedLead>,
    index: &HistoricalIndex,
    config: &FuzzyMatchConfig,
) -> (Vec<DedupedLead>, Vec<ExcludedLead>) {
    if index.is_empty() {
        return (leads, Vec::new());
    }

    let verdicts: Vec<Option<(ExclusionReason, String)>> = leads
        .par_iter()
        .map(|lead| index.check(&lead.record, config))
        .collect();

    let mut kept = Vec::with_capacity(leads.len());
    let mut excluded = Vec::new();
    for (lead, verdict) in leads.into_iter().zip(verdicts) {
        match verdict {
            Some((reason, matched_key)) => excluded.push(ExcludedLead {
                lead_id: lead.record.id.clone(),
                reason,
                matched_key,
            }),
            None => kept.push(lead),
        }
    }

    info!(
        "Exclusion: {} kept, {} excluded against historical index",
        kept.len(),
        excluded.len()
    );
    (kept, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::LeadId;

    fn history(
        email: Option<&str>,
        url: Option<&str>,
        name_company: Option<(&str, &str, &str)>,
        reason: ExclusionReason,
    ) -> HistoricalRecord {
        let (first, last, company) = match name_company {
            Some((f, l, c)) => (Some(f.to_string()), Some(l.to_string()), Some(c.to_string())),
            None => (None, None, None),
        };
        HistoricalRecord {
            email: email.map(String::from),
            professional_network_url: url.map(String::from),
            first_name: first,
            last_name: last,
            company_name: company,
            reason,
        }
    }

    fn deduped(id: &str, email: Option<&str>, name_company: Option<(&str, &str, &str)>) -> DedupedLead {
        let (first, last, company) = match name_company {
            Some((f, l, c)) => (Some(f.to_string()), Some(l.to_string()), Some(c.to_string())),
            None => (None, None, None),
        };
        DedupedLead {
            record: LeadRecord {
                id: LeadId(id.to_string()),
                email: email.map(String::from),
                first_name: first,
                last_name: last,
                company_name: company,
                ..Default::default()
            },
            merged_from: Vec::new(),
        }
    }

    #[test]
    fn email_key_match_excludes_with_reason() {
        let index = HistoricalIndex::from_records(&[history(
            Some("Jane@Example.com"),
            None,
            None,
            ExclusionReason::Unsubscribed,
        )]);
        let leads = vec![
            deduped("l1", Some("jane@example.com"), None),
            deduped("l2", Some("other@example.com"), None),
        ];
        let (kept, excluded) = partition_leads(leads, &index, &FuzzyMatchConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].lead_id, LeadId("l1".into()));
        assert_eq!(excluded[0].reason, ExclusionReason::Unsubscribed);
        assert_eq!(excluded[0].matched_key, "jane@example.com");
    }

    #[test]
    fn url_key_match_excludes() {
        let mut rec = history(None, Some("https://www.linkedin.com/in/jane/"), None, ExclusionReason::Bounced);
        rec.first_name = None;
        let index = HistoricalIndex::from_records(&[rec]);
        let mut lead = deduped("l1", None, None);
        lead.record.professional_network_url = Some("linkedin.com/in/jane".into());
        let (kept, excluded) = partition_leads(vec![lead], &index, &FuzzyMatchConfig::default());
        assert!(kept.is_empty());
        assert_eq!(excluded[0].matched_key, "linkedin.com/in/jane");
        assert_eq!(excluded[0].reason, ExclusionReason::Bounced);
    }

    #[test]
    fn fuzzy_name_company_match_excludes() {
        let index = HistoricalIndex::from_records(&[history(
            None,
            None,
            Some(("Jon", "Smith", "Acme")),
            ExclusionReason::ContactedRecently,
        )]);
        let leads = vec![deduped("l1", None, Some(("John", "Smith", "Acme Corp")))];
        let (kept, excluded) = partition_leads(leads, &index, &FuzzyMatchConfig::default());
        assert!(kept.is_empty());
        assert_eq!(excluded[0].reason, ExclusionReason::ContactedRecently);
        assert_eq!(excluded[0].matched_key, "jon|smith|acme");
    }

    #[test]
    fn no_index_keeps_everything() {
        let index = HistoricalIndex::from_records(&[]);
        let leads = vec![deduped("l1", Some("a@b.com"), None)];
        let (kept, excluded) = partition_leads(leads, &index, &FuzzyMatchConfig::default());
        assert_eq!(kept.len(), 1);
        assert!(excluded.is_empty());
    }

    #[test]
    fn suppression_beats_nothing_else_matching() {
        let index = HistoricalIndex::from_records(&[history(
            Some("vip@donotcontact.com"),
            None,
            None,
            ExclusionReason::Suppressed,
        )]);
        let leads = vec![deduped("l1", Some("vip+promo@donotcontact.com"), None)];
        let (_, excluded) = partition_leads(leads, &index, &FuzzyMatchConfig::default());
        // Plus-alias normalization applies on both sides of the probe
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].reason, ExclusionReason::Suppressed);
    }

    #[test]
    fn email_probe_wins_over_fuzzy_when_both_match() {
        let index = HistoricalIndex::from_records(&[
            history(None, None, Some(("Jane", "Doe", "Acme")), ExclusionReason::Bounced),
            history(Some("jane@acme.com"), None, None, ExclusionReason::Unsubscribed),
        ]);
        let leads = vec![deduped("l1", Some("jane@acme.com"), Some(("Jane", "Doe", "Acme")))];
        let (_, excluded) = partition_leads(leads, &index, &FuzzyMatchConfig::default());
        assert_eq!(excluded[0].reason, ExclusionReason::Unsubscribed);
    }
}
