// src/pipeline.rs
//
// Full data-quality pass: dedup (exact + fuzzy), merge, cross-campaign
// exclusion, scoring. The caller owns persistence and export; this module
// only transforms in-memory values.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use anyhow::{bail, Result};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exclusion::{partition_leads, HistoricalIndex};
use crate::matching::find_duplicate_groups;
use crate::merging::{apply_merge, merge_group};
use crate::models::core::{HistoricalRecord, LeadId, LeadRecord};
use crate::models::matching::{
    DedupedLead, DuplicateGroup, ExcludedLead, MatchMethodStats, MergeResult,
};
use crate::models::scoring::{
    FuzzyMatchConfig, LeadScoreRecord, ScoringContext, ScoringWeights, TierThresholds,
};
use crate::scoring::score_batch;

/// Every tunable of a pass, supplied explicitly by the caller. No
/// environment variables, no globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub fuzzy: FuzzyMatchConfig,
    pub weights: ScoringWeights,
    pub tiers: TierThresholds,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.fuzzy.validate()?;
        self.weights.validate()?;
        self.tiers.validate()?;
        Ok(())
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStats {
    pub input_count: usize,
    pub duplicate_groups: usize,
    pub duplicates_absorbed: usize,
    pub excluded_count: usize,
    pub scored_count: usize,
    pub match_stats: MatchMethodStats,
    pub elapsed_ms: u64,
}

/// Everything a pass hands back to the orchestration layer.
///
/// `run_id` and `stats.elapsed_ms` are run metadata and vary between runs;
/// every other field is a deterministic function of the inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub run_id: String,
    pub groups: Vec<DuplicateGroup>,
    pub merges: Vec<MergeResult>,
    pub deduped: Vec<DedupedLead>,
    pub excluded: Vec<ExcludedLead>,
    pub scores: Vec<LeadScoreRecord>,
    pub stats: PipelineStats,
}

fn validate_batch(batch: &[LeadRecord]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(batch.len());
    for lead in batch {
        if lead.id.0.is_empty() {
            bail!("lead record with empty id");
        }
        if !seen.insert(lead.id.0.as_str()) {
            bail!("duplicate lead id '{}' in batch", lead.id);
        }
    }
    Ok(())
}

/// Collapse duplicate groups into one surviving record each, preserving
/// batch order for survivors and untouched leads alike.
fn resolve_duplicates(
    batch: &[LeadRecord],
    groups: &[DuplicateGroup],
) -> Result<(Vec<DedupedLead>, Vec<MergeResult>)> {
    let lookup: HashMap<LeadId, &LeadRecord> =
        batch.iter().map(|lead| (lead.id.clone(), lead)).collect();

    let mut merges = Vec::with_capacity(groups.len());
    let mut absorbed: HashSet<LeadId> = HashSet::new();
    let mut merged_records: HashMap<LeadId, (LeadRecord, Vec<LeadId>)> = HashMap::new();

    for group in groups {
        let result = merge_group(group, &lookup)?;
        let primary = lookup[&result.primary_id];
        let derived = apply_merge(primary, &result);
        for id in &result.duplicate_ids {
            absorbed.insert(id.clone());
        }
        merged_records.insert(
            result.primary_id.clone(),
            (derived, result.duplicate_ids.clone()),
        );
        merges.push(result);
    }

    let mut deduped = Vec::with_capacity(batch.len() - absorbed.len());
    for lead in batch {
        if absorbed.contains(&lead.id) {
            continue;
        }
        match merged_records.remove(&lead.id) {
            Some((record, merged_from)) => deduped.push(DedupedLead {
                record,
                merged_from,
            }),
            None => deduped.push(DedupedLead {
                record: lead.clone(),
                merged_from: Vec::new(),
            }),
        }
    }

    Ok((deduped, merges))
}

/// Run a complete pass over one batch.
///
/// Configuration is validated before any lead is processed; a bad weight
/// table aborts the whole pass rather than corrupting every score. Per-lead
/// data oddities never abort: they degrade to conservative sub-scores.
pub fn run_pipeline(
    batch: &[LeadRecord],
    history: &[HistoricalRecord],
    context: &ScoringContext,
    config: &PipelineConfig,
) -> Result<PipelineOutcome> {
    config.validate()?;
    context.validate()?;
    validate_batch(batch)?;

    let run_id = Uuid::new_v4().to_string();
    let start = Instant::now();
    info!("Pipeline run {}: {} leads in batch", run_id, batch.len());

    let (groups, match_stats) = find_duplicate_groups(batch, &config.fuzzy);
    let (deduped, merges) = resolve_duplicates(batch, &groups)?;

    let index = HistoricalIndex::from_records(history);
    let (kept, excluded) = partition_leads(deduped, &index, &config.fuzzy);

    let kept_records: Vec<LeadRecord> = kept.iter().map(|l| l.record.clone()).collect();
    let scores = score_batch(&kept_records, context, &config.weights, &config.tiers);

    let duplicates_absorbed = merges.iter().map(|m| m.duplicate_ids.len()).sum();
    let stats = PipelineStats {
        input_count: batch.len(),
        duplicate_groups: groups.len(),
        duplicates_absorbed,
        excluded_count: excluded.len(),
        scored_count: scores.len(),
        match_stats,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Pipeline run {}: {} groups, {} absorbed, {} excluded, {} scored in {}ms",
        run_id,
        stats.duplicate_groups,
        stats.duplicates_absorbed,
        stats.excluded_count,
        stats.scored_count,
        stats.elapsed_ms
    );

    Ok(PipelineOutcome {
        run_id,
        groups,
        merges,
        deduped: kept,
        excluded,
        scores,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::LeadId;

    fn lead(id: &str, email: Option<&str>) -> LeadRecord {
        LeadRecord {
            id: LeadId(id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn bad_config_fails_before_processing() {
        let config = PipelineConfig {
            fuzzy: FuzzyMatchConfig {
                threshold: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let batch = vec![lead("l1", Some("a@b.com"))];
        let err = run_pipeline(&batch, &[], &ScoringContext::default(), &config);
        assert!(err.is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let batch = vec![lead("l1", None), lead("l1", None)];
        let err = run_pipeline(&batch, &[], &ScoringContext::default(), &PipelineConfig::default());
        assert!(err.is_err());
    }

    #[test]
    fn empty_batch_is_a_valid_noop() {
        let outcome = run_pipeline(
            &[],
            &[],
            &ScoringContext::default(),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert!(outcome.deduped.is_empty());
        assert!(outcome.scores.is_empty());
        assert_eq!(outcome.stats.input_count, 0);
    }

    #[test]
    fn survivors_carry_merge_provenance() {
        let batch = vec![
            lead("l1", Some("j@acme.com")),
            lead("l2", Some("j@acme.com")),
            lead("l3", Some("other@x.com")),
        ];
        let outcome = run_pipeline(
            &batch,
            &[],
            &ScoringContext::default(),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.deduped.len(), 2);
        let survivor = &outcome.deduped[0];
        assert_eq!(survivor.record.id, LeadId("l1".into()));
        assert_eq!(survivor.merged_from, vec![LeadId("l2".into())]);
        assert!(outcome.deduped[1].merged_from.is_empty());
        assert_eq!(outcome.stats.duplicates_absorbed, 1);
    }
}
