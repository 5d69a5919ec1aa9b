// src/matching/exact.rs

use std::collections::HashMap;

use log::debug;

use crate::matching::email::normalize_email;
use crate::matching::url::normalize_profile_url;
use crate::models::core::LeadRecord;

/// One exact-key edge between two batch positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactPair {
    pub index_1: usize,
    pub index_2: usize,
    /// The shared normalized key that produced the edge
    pub matched_key: String,
}

/// Find all exact duplicate edges in the batch.
///
/// Builds lookups over both key spaces (normalized email and normalized
/// profile URL) simultaneously; a pair may match on either or both. Leads
/// with neither key are simply not considered by this pass. Edges connect
/// each lead to the first earlier lead sharing its key, which is sufficient
/// for the disjoint-set union downstream and keeps output order a function
/// of input order.
pub fn find_exact_pairs(batch: &[LeadRecord]) -> Vec<ExactPair> {
    let mut first_seen_email: HashMap<String, usize> = HashMap::new();
    let mut first_seen_url: HashMap<String, usize> = HashMap::new();
    let mut pairs = Vec::new();

    for (idx, lead) in batch.iter().enumerate() {
        if let Some(email) = lead.email.as_deref() {
            let key = normalize_email(email);
            if !key.is_empty() {
                match first_seen_email.get(&key) {
                    Some(&first) => pairs.push(ExactPair {
                        index_1: first,
                        index_2: idx,
                        matched_key: key,
                    }),
                    None => {
                        first_seen_email.insert(key, idx);
                    }
                }
            }
        }
        if let Some(url) = lead.professional_network_url.as_deref() {
            let key = normalize_profile_url(url);
            if !key.is_empty() {
                match first_seen_url.get(&key) {
                    Some(&first) => pairs.push(ExactPair {
                        index_1: first,
                        index_2: idx,
                        matched_key: key,
                    }),
                    None => {
                        first_seen_url.insert(key, idx);
                    }
                }
            }
        }
    }

    debug!(
        "Exact: {} email keys, {} url keys, {} pair edges",
        first_seen_email.len(),
        first_seen_url.len(),
        pairs.len()
    );
    pairs
}
