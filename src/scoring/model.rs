// src/scoring/model.rs
//
// Multi-factor weighted scoring: title/persona fit, seniority fit, industry
// fit, company-size fit, and data completeness, combined into a 0-100 total
// and a tier.

use log::info;
use rayon::prelude::*;

use crate::models::core::LeadRecord;
use crate::models::scoring::{
    CompanySizeBucket, LeadScoreRecord, ScoreBreakdown, ScoringContext, ScoringWeights,
    TierThresholds,
};
use crate::scoring::title::{match_seniority, match_title, normalize_title};

/// Industry fit when the lead's industry is unknown or absent from the fit
/// table: low but nonzero, since missing data is weaker evidence than an
/// explicit bad fit.
pub const UNKNOWN_INDUSTRY_FIT: f64 = 40.0;

/// Company-size fit when headcount is unknown, mirroring the industry default.
pub const UNKNOWN_SIZE_FIT: f64 = 40.0;

const SIZE_EXACT_FIT: f64 = 100.0;
const SIZE_ADJACENT_FIT: f64 = 60.0;
const SIZE_MISMATCH_FIT: f64 = 20.0;

/// Points-per-rank multiplier lifting seniority points (0..20) onto the
/// common 0..100 component scale.
const SENIORITY_POINT_SCALE: f64 = 5.0;

fn industry_component(lead: &LeadRecord, context: &ScoringContext) -> f64 {
    let industry = match lead.industry.as_deref().map(str::trim) {
        Some(i) if !i.is_empty() => i.to_lowercase(),
        _ => return UNKNOWN_INDUSTRY_FIT,
    };
    context
        .industry_fit
        .iter()
        .find(|(k, _)| k.to_lowercase() == industry)
        .map(|(_, fit)| *fit)
        .unwrap_or(UNKNOWN_INDUSTRY_FIT)
}

fn company_size_component(lead: &LeadRecord, context: &ScoringContext) -> f64 {
    let size = match lead.company_size {
        Some(s) => s,
        None => return UNKNOWN_SIZE_FIT,
    };
    if context.target_size_buckets.is_empty() {
        return UNKNOWN_SIZE_FIT;
    }
    let bucket = CompanySizeBucket::from_headcount(size);
    let index = bucket.index() as i32;
    let min_distance = context
        .target_size_buckets
        .iter()
        .map(|t| (t.index() as i32 - index).abs())
        .min()
        .unwrap_or(i32::MAX);
    match min_distance {
        0 => SIZE_EXACT_FIT,
        1 => SIZE_ADJACENT_FIT,
        _ => SIZE_MISMATCH_FIT,
    }
}

/// Fraction of the core identity fields (email, title, company, location)
/// that are populated, on the 0..100 scale. City stands in for a missing
/// free-form location.
fn completeness_component(lead: &LeadRecord) -> f64 {
    let populated = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
    let has_location = populated(&lead.location) || populated(&lead.city);
    let filled = [
        populated(&lead.email),
        populated(&lead.title),
        populated(&lead.company_name),
        has_location,
    ]
    .iter()
    .filter(|b| **b)
    .count();
    filled as f64 / 4.0 * 100.0
}

/// Score one lead against the context. Pure and deterministic: identical
/// inputs always produce an identical record. A lead with no usable fields
/// still yields a valid low-score record; absence of data is a score input,
/// not an error.
pub fn score_lead(
    lead: &LeadRecord,
    context: &ScoringContext,
    weights: &ScoringWeights,
    thresholds: &TierThresholds,
) -> LeadScoreRecord {
    let title_match = match_title(
        lead.title.as_deref(),
        &context.target_titles,
        Some(&context.personas),
    );
    // A blank or missing title means seniority is unknown, not `Ic`
    let lead_level = lead
        .title
        .as_deref()
        .filter(|t| !normalize_title(t).is_empty())
        .map(|_| title_match.seniority_level);
    let (seniority_points, _) = match_seniority(lead_level, &context.target_seniority);

    let breakdown = ScoreBreakdown {
        title_fit: title_match.score * 100.0,
        seniority_fit: seniority_points as f64 * SENIORITY_POINT_SCALE,
        industry_fit: industry_component(lead, context),
        company_size_fit: company_size_component(lead, context),
        completeness: completeness_component(lead),
        matched_persona: title_match.matched_persona.clone(),
        matched_title: title_match.matched_title.clone(),
        seniority_level: title_match.seniority_level,
    };

    let total = weights.title_fit * breakdown.title_fit
        + weights.seniority_fit * breakdown.seniority_fit
        + weights.industry_fit * breakdown.industry_fit
        + weights.company_size_fit * breakdown.company_size_fit
        + weights.completeness * breakdown.completeness;
    let total_score = total.clamp(0.0, 100.0);

    LeadScoreRecord {
        lead_id: lead.id.clone(),
        tier: thresholds.tier_for(total_score),
        total_score,
        breakdown,
    }
}

/// Score a batch in parallel. Each call reads only its own lead plus the
/// shared immutable context, so the parallel map is safe; output order
/// follows input order.
pub fn score_batch(
    leads: &[LeadRecord],
    context: &ScoringContext,
    weights: &ScoringWeights,
    thresholds: &TierThresholds,
) -> Vec<LeadScoreRecord> {
    let scores: Vec<LeadScoreRecord> = leads
        .par_iter()
        .map(|lead| score_lead(lead, context, weights, thresholds))
        .collect();
    info!("Scoring: {} leads scored", scores.len());
    scores
}
