// src/matching/fuzzy.rs

use log::debug;
use rayon::prelude::*;

use crate::matching::similarity::{normalize, similarity_normalized};
use crate::models::core::LeadRecord;
use crate::models::scoring::FuzzyMatchConfig;

/// One fuzzy edge between two batch positions, with the composite that
/// triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyPair {
    pub index_1: usize,
    pub index_2: usize,
    pub composite: f64,
}

/// Pre-normalized name/company fields for one lead.
struct FuzzyCandidate {
    index: usize,
    first: String,
    last: String,
    company: String,
}

impl FuzzyCandidate {
    fn from_lead(index: usize, lead: &LeadRecord) -> Option<Self> {
        let first = normalize(lead.first_name.as_deref().unwrap_or(""));
        let last = normalize(lead.last_name.as_deref().unwrap_or(""));
        let company = normalize(lead.company_name.as_deref().unwrap_or(""));
        // Name+company is the identity signal here: without a company, or
        // without any name part, a composite can never be meaningful.
        if company.is_empty() || (first.is_empty() && last.is_empty()) {
            return None;
        }
        Some(Self {
            index,
            first,
            last,
            company,
        })
    }
}

/// Find all fuzzy duplicate edges in the batch.
///
/// Composite = w_first * sim(first) + w_last * sim(last) + w_company *
/// sim(company); a pair is an edge iff composite >= threshold. The scan is
/// the naive O(n^2) pairwise comparison over the full batch, parallelized
/// across the outer index; callers with very large batches should pre-bucket
/// by a cheap key before invoking this. Runs independently of exact-match
/// results; the manager unions both edge sets into one disjoint set.
pub fn find_fuzzy_pairs(batch: &[LeadRecord], config: &FuzzyMatchConfig) -> Vec<FuzzyPair> {
    let candidates: Vec<FuzzyCandidate> = batch
        .iter()
        .enumerate()
        .filter_map(|(idx, lead)| FuzzyCandidate::from_lead(idx, lead))
        .collect();

    let pairs: Vec<FuzzyPair> = (0..candidates.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = &candidates[i];
            candidates[i + 1..].iter().filter_map(move |b| {
                let composite = config.first_name_weight
                    * similarity_normalized(&a.first, &b.first)
                    + config.last_name_weight * similarity_normalized(&a.last, &b.last)
                    + config.company_weight * similarity_normalized(&a.company, &b.company);
                if composite >= config.threshold {
                    Some(FuzzyPair {
                        index_1: a.index,
                        index_2: b.index,
                        composite,
                    })
                } else {
                    None
                }
            })
        })
        .collect();

    debug!(
        "Fuzzy: {} eligible of {} leads, {} pair edges at threshold {}",
        candidates.len(),
        batch.len(),
        pairs.len(),
        config.threshold
    );
    pairs
}
