// src/matching/similarity.rs

use strsim::jaro_winkler;

/// Trim, lowercase, and collapse internal whitespace. Every matching stage
/// compares normalized forms, never raw input.
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized approximate similarity in [0, 1].
///
/// Jaro-Winkler rewards shared prefixes, which fits how names and company
/// strings actually vary ("Jon"/"John", "Corp"/"Corporation"). Empty input
/// on either side after normalization scores 0.0; empty-vs-empty is not a
/// match. 1.0 only for exact normalized equality.
pub fn similarity(a: &str, b: &str) -> f64 {
    let na = normalize(a);
    let nb = normalize(b);
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }
    jaro_winkler(&na, &nb).clamp(0.0, 1.0)
}

/// Similarity over already-normalized inputs, for hot loops that normalize
/// once up front.
pub fn similarity_normalized(na: &str, nb: &str) -> f64 {
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }
    jaro_winkler(na, nb).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize("  Acme   Corp  "), "acme corp");
        assert_eq!(normalize("ACME\tCORP"), "acme corp");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn empty_inputs_never_match() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("anything", "   "), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn exact_normalized_equality_is_one() {
        assert_eq!(similarity("Acme Corp", "  acme   corp "), 1.0);
    }

    #[test]
    fn close_variants_score_high_but_below_one() {
        let s = similarity("Jon", "John");
        assert!(s > 0.85 && s < 1.0, "got {}", s);
        let s = similarity("Acme Corp", "Acme Corporation");
        assert!(s > 0.9 && s < 1.0, "got {}", s);
    }

    #[test]
    fn symmetric() {
        let pairs = [("Jon", "John"), ("Acme", "Acme Corp"), ("a", "zzz")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn bounded() {
        let pairs = [("Jon", "John"), ("", "x"), ("abc", "xyz"), ("same", "same")];
        for (a, b) in pairs {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{} vs {} -> {}", a, b, s);
        }
    }
}
