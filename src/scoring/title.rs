// src/scoring/title.rs
//
// Job-title normalization, seniority extraction, and fuzzy matching against
// target title / persona lists.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::similarity::similarity_normalized;
use crate::models::scoring::{Persona, SeniorityLevel};

/// Minimum fuzzy score for a title to count as matched.
pub const TITLE_MATCH_THRESHOLD: f64 = 0.80;

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("static punctuation regex"));

/// Acronym <-> long-form pairs tried literally before falling back to fuzzy
/// similarity. Small and static on purpose; anything beyond these variants
/// is the similarity function's job.
static TITLE_SYNONYMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("vp", "vice president"),
        ("svp", "senior vice president"),
        ("evp", "executive vice president"),
        ("avp", "assistant vice president"),
        ("ceo", "chief executive officer"),
        ("cfo", "chief financial officer"),
        ("cto", "chief technology officer"),
        ("coo", "chief operating officer"),
        ("cmo", "chief marketing officer"),
        ("cio", "chief information officer"),
        ("cro", "chief revenue officer"),
    ]
});

const C_SUITE_TOKENS: [&str; 9] = [
    "ceo", "cfo", "coo", "cto", "cmo", "cio", "cpo", "cro", "cso",
];
const VP_TOKENS: [&str; 4] = ["vp", "svp", "evp", "avp"];

/// Lowercase, strip punctuation, collapse whitespace. Empty or missing input
/// yields the empty string, never an error.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    format!(" {} ", normalized).contains(&format!(" {} ", phrase))
}

fn contains_token(normalized: &str, tokens: &[&str]) -> bool {
    normalized
        .split_whitespace()
        .any(|t| tokens.contains(&t))
}

/// Infer a seniority level from a free-text title.
///
/// Ordered keyword rules evaluated top-down; the first matching rule wins.
/// "Senior Manager" must hit before the plain "Manager" rule, hence the
/// ordering. Empty input and anything unrecognized default to `Ic`.
pub fn extract_seniority_level(title: &str) -> SeniorityLevel {
    let normalized = normalize_title(title);
    if normalized.is_empty() {
        return SeniorityLevel::Ic;
    }
    if contains_token(&normalized, &C_SUITE_TOKENS) || contains_phrase(&normalized, "chief") {
        return SeniorityLevel::CSuite;
    }
    if contains_token(&normalized, &VP_TOKENS) || contains_phrase(&normalized, "vice president") {
        return SeniorityLevel::Vp;
    }
    if contains_phrase(&normalized, "director") || contains_phrase(&normalized, "head of") {
        return SeniorityLevel::Director;
    }
    if contains_phrase(&normalized, "senior manager") {
        return SeniorityLevel::SeniorManager;
    }
    if contains_phrase(&normalized, "manager") {
        return SeniorityLevel::Manager;
    }
    if contains_token(&normalized, &["senior", "lead"]) {
        return SeniorityLevel::Senior;
    }
    SeniorityLevel::Ic
}

/// Ordinal rank of a level, ic=0 through c_suite=6.
pub fn get_seniority_rank(level: SeniorityLevel) -> u8 {
    level.rank()
}

/// All literal variants of a normalized title under the synonym table,
/// including the title itself.
fn expand_variants(normalized: &str) -> Vec<String> {
    let mut variants = vec![normalized.to_string()];
    let padded = format!(" {} ", normalized);
    for (short, long) in TITLE_SYNONYMS.iter() {
        let short_padded = format!(" {} ", short);
        let long_padded = format!(" {} ", long);
        if padded.contains(&short_padded) {
            let expanded = padded.replace(&short_padded, &long_padded);
            variants.push(expanded.trim().to_string());
        }
        if padded.contains(&long_padded) {
            let contracted = padded.replace(&long_padded, &short_padded);
            variants.push(contracted.trim().to_string());
        }
    }
    variants.dedup();
    variants
}

/// Best score between two titles: 1.0 on any literal variant collision,
/// otherwise the max pairwise similarity across variants.
fn title_pair_score(lead_variants: &[String], target: &str) -> f64 {
    let target_variants = expand_variants(target);
    let mut best = 0.0f64;
    for lv in lead_variants {
        for tv in &target_variants {
            if lv == tv {
                return 1.0;
            }
            let s = similarity_normalized(lv, tv);
            if s > best {
                best = s;
            }
        }
    }
    best
}

/// Outcome of matching one lead title against the targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleMatchResult {
    pub matched: bool,
    pub score: f64,
    pub matched_title: Option<String>,
    pub matched_persona: Option<String>,
    pub seniority_level: SeniorityLevel,
}

/// Match a lead's title against target titles and optional persona lists.
///
/// The score is the maximum over all targets (persona titles included);
/// `matched` requires the threshold. Ties keep the earliest target in list
/// order, so results are deterministic.
pub fn match_title(
    title: Option<&str>,
    target_titles: &[String],
    personas: Option<&[Persona]>,
) -> TitleMatchResult {
    let seniority_level = extract_seniority_level(title.unwrap_or(""));
    let normalized = normalize_title(title.unwrap_or(""));
    if normalized.is_empty() {
        return TitleMatchResult {
            matched: false,
            score: 0.0,
            matched_title: None,
            matched_persona: None,
            seniority_level,
        };
    }

    let lead_variants = expand_variants(&normalized);
    let mut best_score = 0.0f64;
    let mut matched_title: Option<String> = None;
    let mut matched_persona: Option<String> = None;

    for target in target_titles {
        let normalized_target = normalize_title(target);
        if normalized_target.is_empty() {
            continue;
        }
        let score = title_pair_score(&lead_variants, &normalized_target);
        if score > best_score {
            best_score = score;
            matched_title = Some(target.clone());
            matched_persona = None;
        }
    }

    if let Some(personas) = personas {
        for persona in personas {
            for target in &persona.titles {
                let normalized_target = normalize_title(target);
                if normalized_target.is_empty() {
                    continue;
                }
                let score = title_pair_score(&lead_variants, &normalized_target);
                if score > best_score {
                    best_score = score;
                    matched_title = Some(target.clone());
                    matched_persona = Some(persona.name.clone());
                }
            }
        }
    }

    TitleMatchResult {
        matched: best_score >= TITLE_MATCH_THRESHOLD,
        score: best_score,
        matched_title,
        matched_persona,
        seniority_level,
    }
}

/// Distance-based seniority points.
///
/// Exact rank match is 20, one rank off 15, two ranks 10, three or more 0.
/// An unknown lead level scores a flat 5: unknown is partial credit, not a
/// mismatch. An empty target list behaves the same way.
pub fn match_seniority(
    lead_level: Option<SeniorityLevel>,
    target_levels: &[SeniorityLevel],
) -> (u32, Option<SeniorityLevel>) {
    let lead_level = match lead_level {
        Some(level) => level,
        None => return (5, None),
    };
    if target_levels.is_empty() {
        return (5, None);
    }

    let lead_rank = lead_level.rank() as i32;
    let mut best: Option<(u32, SeniorityLevel)> = None;
    for &target in target_levels {
        let distance = (lead_rank - target.rank() as i32).abs();
        let points = match distance {
            0 => 20,
            1 => 15,
            2 => 10,
            _ => 0,
        };
        if best.map_or(true, |(bp, _)| points > bp) {
            best = Some((points, target));
        }
    }
    match best {
        Some((points, target)) if points > 0 => (points, Some(target)),
        Some((points, _)) => (points, None),
        None => (0, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_punctuation_and_case() {
        assert_eq!(normalize_title("V.P., Marketing & Growth"), "v p marketing growth");
        assert_eq!(normalize_title("  Chief  Executive   Officer "), "chief executive officer");
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("!!!"), "");
    }

    #[test]
    fn seniority_rules_fire_top_down() {
        assert_eq!(extract_seniority_level("CEO & Co-Founder"), SeniorityLevel::CSuite);
        assert_eq!(extract_seniority_level("Chief Revenue Officer"), SeniorityLevel::CSuite);
        assert_eq!(extract_seniority_level("SVP of Engineering"), SeniorityLevel::Vp);
        assert_eq!(extract_seniority_level("Vice President, Sales"), SeniorityLevel::Vp);
        assert_eq!(extract_seniority_level("Director of Operations"), SeniorityLevel::Director);
        assert_eq!(extract_seniority_level("Head of Growth"), SeniorityLevel::Director);
        assert_eq!(extract_seniority_level("Senior Manager, Support"), SeniorityLevel::SeniorManager);
        assert_eq!(extract_seniority_level("Marketing Manager"), SeniorityLevel::Manager);
        assert_eq!(extract_seniority_level("Senior Software Engineer"), SeniorityLevel::Senior);
        assert_eq!(extract_seniority_level("Tech Lead"), SeniorityLevel::Senior);
        assert_eq!(extract_seniority_level("Software Engineer"), SeniorityLevel::Ic);
        assert_eq!(extract_seniority_level(""), SeniorityLevel::Ic);
    }

    #[test]
    fn c_suite_rule_beats_vp_when_both_present() {
        // "Chief of Staff to the VP" reads as chief first
        assert_eq!(
            extract_seniority_level("Chief of Staff to the VP"),
            SeniorityLevel::CSuite
        );
    }

    #[test]
    fn vp_of_marketing_matches_vp_marketing() {
        let result = match_title(Some("VP of Marketing"), &["VP Marketing".to_string()], None);
        assert!(result.matched, "score {}", result.score);
        assert!(result.score >= 0.8);
        assert_eq!(result.seniority_level, SeniorityLevel::Vp);
        assert_eq!(result.matched_title.as_deref(), Some("VP Marketing"));
    }

    #[test]
    fn synonym_expansion_makes_acronym_and_long_form_identical() {
        let result = match_title(
            Some("VP Marketing"),
            &["Vice President Marketing".to_string()],
            None,
        );
        assert_eq!(result.score, 1.0);
        assert!(result.matched);
    }

    #[test]
    fn unrelated_title_does_not_match() {
        let result = match_title(
            Some("Warehouse Associate"),
            &["Chief Financial Officer".to_string()],
            None,
        );
        assert!(!result.matched);
        assert!(result.score < 0.8);
    }

    #[test]
    fn missing_title_yields_zero_score_ic() {
        let result = match_title(None, &["CEO".to_string()], None);
        assert!(!result.matched);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.seniority_level, SeniorityLevel::Ic);
        assert!(result.matched_title.is_none());
    }

    #[test]
    fn persona_attribution_reports_best_list() {
        let personas = vec![
            Persona {
                name: "finance_leader".into(),
                titles: vec!["CFO".into()],
            },
            Persona {
                name: "marketing_leader".into(),
                titles: vec!["VP Marketing".into(), "CMO".into()],
            },
        ];
        let result = match_title(Some("VP of Marketing"), &[], Some(&personas));
        assert!(result.matched);
        assert_eq!(result.matched_persona.as_deref(), Some("marketing_leader"));
    }

    #[test]
    fn seniority_points_follow_rank_distance() {
        use SeniorityLevel::*;
        assert_eq!(match_seniority(Some(Vp), &[Vp]), (20, Some(Vp)));
        assert_eq!(match_seniority(Some(Director), &[Vp]), (15, Some(Vp)));
        assert_eq!(match_seniority(Some(SeniorManager), &[Vp]), (10, Some(Vp)));
        assert_eq!(match_seniority(Some(Ic), &[Vp]), (0, None));
        assert_eq!(match_seniority(None, &[Vp]), (5, None));
        assert_eq!(match_seniority(Some(Vp), &[]), (5, None));
    }

    #[test]
    fn closest_target_wins() {
        use SeniorityLevel::*;
        let (points, matched) = match_seniority(Some(Director), &[CSuite, Vp, Manager]);
        assert_eq!(points, 15);
        assert_eq!(matched, Some(Vp));
    }

    #[test]
    fn points_always_in_expected_set() {
        use SeniorityLevel::*;
        let levels = [CSuite, Vp, Director, SeniorManager, Manager, Senior, Ic];
        for lead in levels {
            for target in levels {
                let (points, _) = match_seniority(Some(lead), &[target]);
                assert!([0, 5, 10, 15, 20].contains(&points));
            }
        }
    }
}
