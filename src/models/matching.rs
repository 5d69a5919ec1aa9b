// src/models/matching.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::core::{ExclusionReason, LeadId, LeadRecord};

/// Enum for supported matching method types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethodType {
    /// Two leads share a normalized email or profile URL
    Exact,
    /// Two leads exceed the composite name+company similarity threshold
    Fuzzy,
}

impl MatchMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethodType::Exact => "exact",
            MatchMethodType::Fuzzy => "fuzzy",
        }
    }
}

/// A set of lead ids judged to represent the same person.
///
/// Members are kept in batch input order. A group formed by both exact and
/// fuzzy edges is tagged `Exact` (the stronger evidence) and still carries
/// the minimum fuzzy composite observed, so the audit trail survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub lead_ids: Vec<LeadId>,
    pub method: MatchMethodType,
    /// Minimum pairwise composite among the fuzzy edges that contributed,
    /// if any did
    pub min_fuzzy_score: Option<f64>,
}

/// Output of resolving one duplicate group.
///
/// `merged_fields` holds only the fields whose chosen value differs from the
/// primary's original value. A group of size 1 resolves to a no-op result
/// with no duplicate ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    pub primary_id: LeadId,
    pub duplicate_ids: Vec<LeadId>,
    // BTreeMap keeps serialized output byte-stable across runs
    pub merged_fields: BTreeMap<String, String>,
}

impl MergeResult {
    pub fn is_noop(&self) -> bool {
        self.duplicate_ids.is_empty() && self.merged_fields.is_empty()
    }
}

/// A surviving lead after dedup: the derived record with merged field values
/// applied, plus provenance of the records it absorbed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupedLead {
    pub record: LeadRecord,
    /// Ids of the duplicate records absorbed into this one; empty when the
    /// lead was never part of a duplicate group
    pub merged_from: Vec<LeadId>,
}

/// A lead removed by cross-campaign exclusion, with the evidence attached.
/// Exclusions are never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedLead {
    pub lead_id: LeadId,
    pub reason: ExclusionReason,
    /// The normalized historical key (or name+company composite) that matched
    pub matched_key: String,
}

/// Per-method counters reported after a dedup pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchMethodStats {
    pub exact_pairs: usize,
    pub fuzzy_pairs: usize,
    pub groups_formed: usize,
    pub leads_in_groups: usize,
}
