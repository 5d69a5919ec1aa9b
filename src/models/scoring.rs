// src/models/scoring.rs

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::core::LeadId;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

//------------------------------------------------------------------------------
// SENIORITY
//------------------------------------------------------------------------------

/// Seniority tier inferred from a job title. Ordered keyword rules assign one
/// of these; `Ic` is the default for unknown or empty titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityLevel {
    CSuite,
    Vp,
    Director,
    SeniorManager,
    Manager,
    Senior,
    Ic,
}

impl SeniorityLevel {
    /// Ordinal rank used for distance-based scoring: ic lowest (0),
    /// c_suite highest (6).
    pub fn rank(&self) -> u8 {
        match self {
            SeniorityLevel::Ic => 0,
            SeniorityLevel::Senior => 1,
            SeniorityLevel::Manager => 2,
            SeniorityLevel::SeniorManager => 3,
            SeniorityLevel::Director => 4,
            SeniorityLevel::Vp => 5,
            SeniorityLevel::CSuite => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeniorityLevel::CSuite => "c_suite",
            SeniorityLevel::Vp => "vp",
            SeniorityLevel::Director => "director",
            SeniorityLevel::SeniorManager => "senior_manager",
            SeniorityLevel::Manager => "manager",
            SeniorityLevel::Senior => "senior",
            SeniorityLevel::Ic => "ic",
        }
    }
}

//------------------------------------------------------------------------------
// COMPANY SIZE
//------------------------------------------------------------------------------

/// Standard headcount buckets. Adjacency between buckets earns partial
/// credit in the company-size component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySizeBucket {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "501-1000")]
    VeryLarge,
    #[serde(rename = "1001-5000")]
    Enterprise,
    #[serde(rename = "5001+")]
    Giant,
}

impl CompanySizeBucket {
    pub fn from_headcount(size: u32) -> Self {
        match size {
            0..=10 => CompanySizeBucket::Micro,
            11..=50 => CompanySizeBucket::Small,
            51..=200 => CompanySizeBucket::Medium,
            201..=500 => CompanySizeBucket::Large,
            501..=1000 => CompanySizeBucket::VeryLarge,
            1001..=5000 => CompanySizeBucket::Enterprise,
            _ => CompanySizeBucket::Giant,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            CompanySizeBucket::Micro => 0,
            CompanySizeBucket::Small => 1,
            CompanySizeBucket::Medium => 2,
            CompanySizeBucket::Large => 3,
            CompanySizeBucket::VeryLarge => 4,
            CompanySizeBucket::Enterprise => 5,
            CompanySizeBucket::Giant => 6,
        }
    }
}

//------------------------------------------------------------------------------
// SCORING CONTEXT
//------------------------------------------------------------------------------

/// A named persona with the job titles that identify it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub titles: Vec<String>,
}

/// Read-only reference data for one scoring run. Supplied by the layer that
/// owns persona/niche configuration; immutable for the whole pass and shared
/// across leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringContext {
    pub target_titles: Vec<String>,
    pub target_seniority: Vec<SeniorityLevel>,
    /// Industry label (matched case-insensitively) -> fit score 0-100
    pub industry_fit: HashMap<String, f64>,
    pub target_size_buckets: Vec<CompanySizeBucket>,
    pub personas: Vec<Persona>,
}

impl ScoringContext {
    /// Reject out-of-range fit values and ambiguous industry keys before
    /// any lead is scored.
    pub fn validate(&self) -> Result<()> {
        let mut folded = std::collections::HashSet::new();
        for (industry, fit) in &self.industry_fit {
            if !(0.0..=100.0).contains(fit) || !fit.is_finite() {
                bail!(
                    "industry fit for '{}' must be in [0, 100], got {}",
                    industry,
                    fit
                );
            }
            // Lookups are case-insensitive, so case-variant keys would be
            // ambiguous
            if !folded.insert(industry.to_lowercase()) {
                bail!(
                    "industry fit table has case-variant duplicate for '{}'",
                    industry
                );
            }
        }
        Ok(())
    }
}

//------------------------------------------------------------------------------
// CONFIGURATION
//------------------------------------------------------------------------------

/// Weights and threshold for the composite name+company fuzzy match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyMatchConfig {
    pub first_name_weight: f64,
    pub last_name_weight: f64,
    pub company_weight: f64,
    /// A pair is a fuzzy duplicate iff its composite reaches this value
    pub threshold: f64,
}

impl Default for FuzzyMatchConfig {
    fn default() -> Self {
        // Company carries the most weight: first/last names collide across
        // unrelated people far more often than company names do.
        Self {
            first_name_weight: 0.3,
            last_name_weight: 0.3,
            company_weight: 0.4,
            threshold: 0.85,
        }
    }
}

impl FuzzyMatchConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("first_name_weight", self.first_name_weight),
            ("last_name_weight", self.last_name_weight),
            ("company_weight", self.company_weight),
        ];
        for (name, w) in weights {
            if w < 0.0 || !w.is_finite() {
                bail!("fuzzy match {} must be non-negative, got {}", name, w);
            }
        }
        let sum = self.first_name_weight + self.last_name_weight + self.company_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("fuzzy match weights must sum to 1.0, got {}", sum);
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            bail!(
                "fuzzy match threshold must be in (0, 1], got {}",
                self.threshold
            );
        }
        Ok(())
    }
}

/// Relative weight of each scoring component. Exposed so callers can retune
/// without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub title_fit: f64,
    pub seniority_fit: f64,
    pub industry_fit: f64,
    pub company_size_fit: f64,
    pub completeness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title_fit: 0.30,
            seniority_fit: 0.25,
            industry_fit: 0.20,
            company_size_fit: 0.15,
            completeness: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("title_fit", self.title_fit),
            ("seniority_fit", self.seniority_fit),
            ("industry_fit", self.industry_fit),
            ("company_size_fit", self.company_size_fit),
            ("completeness", self.completeness),
        ];
        for (name, w) in weights {
            if w < 0.0 || !w.is_finite() {
                bail!("scoring weight {} must be non-negative, got {}", name, w);
            }
        }
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("scoring weights must sum to 1.0, got {}", sum);
        }
        Ok(())
    }
}

/// Total-score cutoffs for tier assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Minimum total score for tier A
    pub a_min: f64,
    /// Minimum total score for tier B; everything below is tier C
    pub b_min: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            a_min: 75.0,
            b_min: 50.0,
        }
    }
}

impl TierThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.a_min) || !(0.0..=100.0).contains(&self.b_min) {
            bail!(
                "tier thresholds must be in [0, 100], got a_min={} b_min={}",
                self.a_min,
                self.b_min
            );
        }
        if self.b_min >= self.a_min {
            bail!(
                "tier b_min ({}) must be below a_min ({})",
                self.b_min,
                self.a_min
            );
        }
        Ok(())
    }

    pub fn tier_for(&self, total_score: f64) -> Tier {
        if total_score >= self.a_min {
            Tier::A
        } else if total_score >= self.b_min {
            Tier::B
        } else {
            Tier::C
        }
    }
}

//------------------------------------------------------------------------------
// SCORE OUTPUT
//------------------------------------------------------------------------------

/// Coarse priority bucket assigned from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

/// Component sub-scores, each on a 0-100 scale before weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub title_fit: f64,
    pub seniority_fit: f64,
    pub industry_fit: f64,
    pub company_size_fit: f64,
    pub completeness: f64,
    /// Persona whose title list produced the best title match, if any
    pub matched_persona: Option<String>,
    /// Target title that produced the best match, if any
    pub matched_title: Option<String>,
    /// Seniority level inferred from the lead's title
    pub seniority_level: SeniorityLevel,
}

/// Final per-lead scoring output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadScoreRecord {
    pub lead_id: LeadId,
    pub breakdown: ScoreBreakdown,
    /// Weighted sum of the components, clamped to [0, 100]
    pub total_score: f64,
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!(FuzzyMatchConfig::default().validate().is_ok());
        assert!(ScoringWeights::default().validate().is_ok());
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let cfg = FuzzyMatchConfig {
            first_name_weight: 0.5,
            last_name_weight: 0.5,
            company_weight: 0.4,
            threshold: 0.85,
        };
        assert!(cfg.validate().is_err());

        let weights = ScoringWeights {
            title_fit: 0.9,
            ..Default::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn rejects_negative_weight() {
        let weights = ScoringWeights {
            title_fit: -0.1,
            seniority_fit: 0.35,
            industry_fit: 0.3,
            company_size_fit: 0.25,
            completeness: 0.2,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn rejects_inverted_tier_thresholds() {
        let t = TierThresholds {
            a_min: 40.0,
            b_min: 60.0,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn tier_assignment_uses_thresholds() {
        let t = TierThresholds::default();
        assert_eq!(t.tier_for(90.0), Tier::A);
        assert_eq!(t.tier_for(75.0), Tier::A);
        assert_eq!(t.tier_for(60.0), Tier::B);
        assert_eq!(t.tier_for(10.0), Tier::C);
    }

    #[test]
    fn seniority_ranks_are_ordered() {
        assert!(SeniorityLevel::CSuite.rank() > SeniorityLevel::Vp.rank());
        assert!(SeniorityLevel::Vp.rank() > SeniorityLevel::Director.rank());
        assert_eq!(SeniorityLevel::Ic.rank(), 0);
        assert_eq!(SeniorityLevel::CSuite.rank(), 6);
    }

    #[test]
    fn size_buckets_cover_headcounts() {
        assert_eq!(
            CompanySizeBucket::from_headcount(10),
            CompanySizeBucket::Micro
        );
        assert_eq!(
            CompanySizeBucket::from_headcount(11),
            CompanySizeBucket::Small
        );
        assert_eq!(
            CompanySizeBucket::from_headcount(999),
            CompanySizeBucket::VeryLarge
        );
        assert_eq!(
            CompanySizeBucket::from_headcount(50_000),
            CompanySizeBucket::Giant
        );
    }

    #[test]
    fn context_rejects_out_of_range_industry_fit() {
        let mut ctx = ScoringContext::default();
        ctx.industry_fit.insert("software".into(), 120.0);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn context_rejects_case_variant_industry_keys() {
        let mut ctx = ScoringContext::default();
        ctx.industry_fit.insert("Software".into(), 80.0);
        ctx.industry_fit.insert("SOFTWARE".into(), 60.0);
        assert!(ctx.validate().is_err());
    }
}
