// src/merging/mod.rs
//
// Resolves one duplicate group into a surviving record: deterministic
// primary selection, then a per-field combine of the most complete values
// across the whole group.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use log::debug;

use crate::models::core::{LeadId, LeadRecord};
use crate::models::matching::{DuplicateGroup, MergeResult};

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn has_email(record: &LeadRecord) -> bool {
    non_empty(record.email.as_deref()).is_some()
}

/// Sort key for the "oldest wins" tie-break. A missing `created_at` sorts as
/// timestamp 0, i.e. oldest, so an undated record beats any dated one. That
/// is the inherited behavior, kept pending product clarification.
fn created_sort_key(record: &LeadRecord) -> i64 {
    record.created_at.map(|t| t.timestamp()).unwrap_or(0)
}

/// True when `candidate` strictly outranks `incumbent` as group primary.
/// Criteria in order: has a non-empty email, more populated identity fields,
/// oldest creation timestamp. Remaining ties keep the incumbent, which is
/// the earlier record in group order.
fn outranks(candidate: &LeadRecord, incumbent: &LeadRecord) -> bool {
    let (ce, ie) = (has_email(candidate), has_email(incumbent));
    if ce != ie {
        return ce;
    }
    let (cc, ic) = (
        candidate.populated_field_count(),
        incumbent.populated_field_count(),
    );
    if cc != ic {
        return cc > ic;
    }
    created_sort_key(candidate) < created_sort_key(incumbent)
}

/// First non-empty value scanning primary first, then duplicates in group
/// order.
fn first_non_empty<'a>(
    ordered: &[&'a LeadRecord],
    get: impl Fn(&'a LeadRecord) -> Option<&'a str>,
) -> Option<&'a str> {
    ordered.iter().find_map(|record| non_empty(get(record)))
}

/// Longest non-empty string in the group; more characters are assumed more
/// descriptive. Length ties take the later value in scan order, so an
/// equal-length variant held by a duplicate still surfaces in
/// `merged_fields`.
fn longest_non_empty<'a>(
    ordered: &[&'a LeadRecord],
    get: impl Fn(&'a LeadRecord) -> Option<&'a str>,
) -> Option<&'a str> {
    let mut best: Option<&'a str> = None;
    for record in ordered {
        if let Some(v) = non_empty(get(record)) {
            if best.map_or(true, |b| v.chars().count() >= b.chars().count()) {
                best = Some(v);
            }
        }
    }
    best
}

/// Most comma-separated segments wins, tie-broken by length: "Austin, TX,
/// USA" beats "Texas".
fn most_specific_location<'a>(ordered: &[&'a LeadRecord]) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize, usize)> = None;
    for record in ordered {
        if let Some(v) = non_empty(record.location.as_deref()) {
            let segments = v.split(',').filter(|s| !s.trim().is_empty()).count();
            let len = v.chars().count();
            let better = match best {
                None => true,
                Some((_, bs, bl)) => segments > bs || (segments == bs && len > bl),
            };
            if better {
                best = Some((v, segments, len));
            }
        }
    }
    best.map(|(v, _, _)| v)
}

/// Resolve one duplicate group into a `MergeResult`.
///
/// `lookup` must contain every id in the group. A group of size 1 resolves
/// to a no-op result, which is distinct from an error. Field values are
/// combined across the entire group, not just primary-vs-one-duplicate, and
/// a populated primary field is never downgraded: only non-empty values are
/// ever chosen.
pub fn merge_group(
    group: &DuplicateGroup,
    lookup: &HashMap<LeadId, &LeadRecord>,
) -> Result<MergeResult> {
    let records: Vec<&LeadRecord> = group
        .lead_ids
        .iter()
        .map(|id| {
            lookup
                .get(id)
                .copied()
                .with_context(|| format!("merge: lead {} missing from lookup", id))
        })
        .collect::<Result<_>>()?;

    if records.len() <= 1 {
        let primary_id = group
            .lead_ids
            .first()
            .cloned()
            .context("merge: empty duplicate group")?;
        return Ok(MergeResult {
            primary_id,
            duplicate_ids: Vec::new(),
            merged_fields: BTreeMap::new(),
        });
    }

    let mut primary_pos = 0usize;
    for (pos, &candidate) in records.iter().enumerate().skip(1) {
        if outranks(candidate, records[primary_pos]) {
            primary_pos = pos;
        }
    }
    let primary = records[primary_pos];

    // Scan order for field selection: primary first, then the rest in group order
    let mut ordered: Vec<&LeadRecord> = Vec::with_capacity(records.len());
    ordered.push(primary);
    ordered.extend(
        records
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != primary_pos)
            .map(|(_, r)| *r),
    );

    let mut merged_fields: BTreeMap<String, String> = BTreeMap::new();
    let mut record_choice = |field: &str, chosen: Option<&str>, current: Option<&str>| {
        if let Some(value) = chosen {
            if current != Some(value) {
                merged_fields.insert(field.to_string(), value.to_string());
            }
        }
    };

    record_choice(
        "email",
        first_non_empty(&ordered, |r| r.email.as_deref()),
        primary.email.as_deref(),
    );
    record_choice(
        "phone",
        first_non_empty(&ordered, |r| r.phone.as_deref()),
        primary.phone.as_deref(),
    );
    record_choice(
        "company_domain",
        first_non_empty(&ordered, |r| r.company_domain.as_deref()),
        primary.company_domain.as_deref(),
    );
    record_choice(
        "professional_network_url",
        first_non_empty(&ordered, |r| r.professional_network_url.as_deref()),
        primary.professional_network_url.as_deref(),
    );
    record_choice(
        "title",
        longest_non_empty(&ordered, |r| r.title.as_deref()),
        primary.title.as_deref(),
    );
    record_choice(
        "company_name",
        longest_non_empty(&ordered, |r| r.company_name.as_deref()),
        primary.company_name.as_deref(),
    );
    record_choice(
        "location",
        most_specific_location(&ordered),
        primary.location.as_deref(),
    );

    let duplicate_ids: Vec<LeadId> = group
        .lead_ids
        .iter()
        .filter(|id| **id != primary.id)
        .cloned()
        .collect();

    debug!(
        "Merge: group of {} -> primary {} with {} field updates",
        records.len(),
        primary.id,
        merged_fields.len()
    );

    Ok(MergeResult {
        primary_id: primary.id.clone(),
        duplicate_ids,
        merged_fields,
    })
}

/// Derive the surviving record: a clone of the primary with the merged field
/// values applied. Inputs are never mutated.
pub fn apply_merge(primary: &LeadRecord, result: &MergeResult) -> LeadRecord {
    let mut merged = primary.clone();
    for (field, value) in &result.merged_fields {
        let value = Some(value.clone());
        match field.as_str() {
            "email" => merged.email = value,
            "phone" => merged.phone = value,
            "company_domain" => merged.company_domain = value,
            "professional_network_url" => merged.professional_network_url = value,
            "title" => merged.title = value,
            "company_name" => merged.company_name = value,
            "location" => merged.location = value,
            _ => {}
        }
    }
    merged
}
