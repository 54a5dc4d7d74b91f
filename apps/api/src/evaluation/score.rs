//! Score extraction from free-text model output.
//!
//! Grading models are asked for an exact output grammar but do not reliably
//! produce it, so the extractor is a prioritized cascade of independent
//! matchers, first-match-wins. Order matters: later strategies are
//! progressively less trustworthy, so a noisy reply is resolved by the most
//! precise pattern that fits it rather than by guesswork.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

/// An explicit "TOTAL SCORE: X/Y" declaration, label variants included.
static TOTAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)total\s+score:\s*(\d+)\s*/\s*(\d+)").unwrap(),
        Regex::new(r"(?i)total:\s*(\d+)\s*/\s*(\d+)").unwrap(),
    ]
});

/// Per-question lines carrying a question number, strictest form first.
static NUMBERED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?is)Q(\d+).*?Score:\s*(\d+)/10").unwrap(),
        Regex::new(r"(?is)Question\s*(\d+).*?Score:\s*(\d+)/10").unwrap(),
        Regex::new(r"(?is)Q(\d+).*?(\d+)/10").unwrap(),
    ]
});

/// Bare per-question score lines with no question number.
static BARE_SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Score:\s*(\d+)/10").unwrap());

/// Any fraction anywhere in the text.
static FRACTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap());

type Strategy = fn(&str, usize, u32) -> Option<(u32, u32)>;

/// Recovers `(score, max_score)` from arbitrary model output given the known
/// question count. Never fails: if no strategy matches, the submission scores
/// `(0, 10 * num_questions)`.
pub fn extract_score(content: &str, num_questions: usize) -> (u32, u32) {
    let expected_max = num_questions as u32 * 10;

    const STRATEGIES: [(&str, Strategy); 5] = [
        ("explicit total", explicit_total),
        ("numbered question sum", numbered_question_sum),
        ("bare score sum", bare_score_sum),
        ("plausible fraction", plausible_fraction),
        ("pass inference", pass_inference),
    ];

    for (name, strategy) in STRATEGIES {
        if let Some((score, max)) = strategy(content, num_questions, expected_max) {
            debug!("Score extracted via {name}: {score}/{max}");
            return (score, max);
        }
    }

    warn!(
        "Could not extract score, defaulting to 0/{expected_max}; content: {}",
        truncate(content, 500)
    );
    (0, expected_max)
}

/// Strategy 1: an explicit total declared by the model. The model's own
/// denominator is trusted even when it disagrees with `expected_max` — a
/// self-reported `9/10` on a 3-question set is passed through, not reconciled.
fn explicit_total(content: &str, _n: usize, _expected_max: u32) -> Option<(u32, u32)> {
    TOTAL_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(content)?;
        Some((parse_group(&caps, 1)?, parse_group(&caps, 2)?))
    })
}

/// Strategy 2: sum of numbered per-question lines. Fires only when the match
/// count equals the question count exactly — too few or too many lines means
/// the reply is garbled, and a partial sum would silently under- or
/// over-report, so the strategy disqualifies itself instead. The same rule
/// applies to numbers the model has no business producing: a capture that
/// does not fit `u32`, or a sum that overflows it, disqualifies the pattern.
fn numbered_question_sum(content: &str, n: usize, expected_max: u32) -> Option<(u32, u32)> {
    NUMBERED_PATTERNS.iter().find_map(|pattern| {
        let scores: Option<Vec<u32>> = pattern
            .captures_iter(content)
            .map(|caps| parse_group(&caps, 2))
            .collect();
        let scores = scores?;
        if scores.len() == n && n > 0 {
            Some((checked_sum(&scores)?, expected_max))
        } else {
            None
        }
    })
}

/// Strategy 3: same exact-count and overflow rules as strategy 2, for
/// replies that dropped the question numbers.
fn bare_score_sum(content: &str, n: usize, expected_max: u32) -> Option<(u32, u32)> {
    let scores: Option<Vec<u32>> = BARE_SCORE_PATTERN
        .captures_iter(content)
        .map(|caps| parse_group(&caps, 1))
        .collect();
    let scores = scores?;
    if scores.len() == n && n > 0 {
        Some((checked_sum(&scores)?, expected_max))
    } else {
        None
    }
}

/// Strategy 4: first fraction whose denominator is the expected maximum and
/// whose numerator is in range.
fn plausible_fraction(content: &str, _n: usize, expected_max: u32) -> Option<(u32, u32)> {
    FRACTION_PATTERN.captures_iter(content).find_map(|caps| {
        let score = parse_group(&caps, 1)?;
        let max = parse_group(&caps, 2)?;
        (max == expected_max && score <= max).then_some((score, max))
    })
}

/// Strategy 5: no numeric pattern matched at all, but the model said "pass" —
/// assume a borderline passing score. Runs last so it can never mask a real
/// but low score.
fn pass_inference(content: &str, _n: usize, expected_max: u32) -> Option<(u32, u32)> {
    content
        .to_lowercase()
        .contains("pass")
        .then_some((expected_max / 2, expected_max))
}

fn parse_group(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

/// Model text is untrusted; individually-valid scores can still sum past
/// `u32::MAX`, which must fall through rather than panic or wrap.
fn checked_sum(scores: &[u32]) -> Option<u32> {
    scores.iter().try_fold(0u32, |acc, &s| acc.checked_add(s))
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_total_uppercase() {
        let content = "Q1 - Type: MCQ - Score: 10/10\nTOTAL SCORE: 25/30\nSTATUS: Pass";
        assert_eq!(extract_score(content, 3), (25, 30));
    }

    #[test]
    fn test_explicit_total_wins_over_question_lines() {
        // Per-question lines sum to 18, but the declared total takes priority.
        let content = "Q1 - Score: 9/10\nQ2 - Score: 9/10\nTOTAL SCORE: 7/10";
        assert_eq!(extract_score(content, 2), (7, 10));
    }

    #[test]
    fn test_explicit_total_denominator_is_trusted() {
        // Model reports 9/10 on a 3-question set (expected max 30): passed
        // through untouched, never reconciled.
        let content = "Great work overall.\nTOTAL SCORE: 9/10";
        assert_eq!(extract_score(content, 3), (9, 10));
    }

    #[test]
    fn test_explicit_total_label_variants() {
        assert_eq!(extract_score("Total Score: 12/20", 2), (12, 20));
        assert_eq!(extract_score("Total: 15 / 20", 2), (15, 20));
        assert_eq!(extract_score("TOTAL SCORE: 18 / 20", 2), (18, 20));
    }

    #[test]
    fn test_numbered_sum_exact_count() {
        let content = "Q1 - Type: MCQ - Score: 10/10\n\
                       Q2 - Type: Coding - Score: 8/10\n\
                       Q3 - Type: MCQ - Score: 6/10";
        assert_eq!(extract_score(content, 3), (24, 30));
    }

    #[test]
    fn test_numbered_sum_disqualified_on_count_mismatch() {
        // Only 2 numbered lines for 3 questions: the numbered strategy must
        // not partially sum. No other numeric pattern fits (denominators are
        // 10, not 30), and there is no "pass" keyword, so we fall through to 0.
        let content = "Q1 - Score: 9/10\nQ2 - Score: 9/10";
        assert_eq!(extract_score(content, 3), (0, 30));
    }

    #[test]
    fn test_question_label_variant() {
        let content = "Question 1: correct. Score: 10/10\nQuestion 2: wrong. Score: 0/10";
        assert_eq!(extract_score(content, 2), (10, 20));
    }

    #[test]
    fn test_bare_score_sum() {
        let content = "First answer. Score: 7/10\nSecond answer. Score: 9/10\nThird. Score: 8/10";
        assert_eq!(extract_score(content, 3), (24, 30));
    }

    #[test]
    fn test_bare_score_sum_disqualified_on_count_mismatch() {
        let content = "Score: 7/10\nScore: 9/10";
        assert_eq!(extract_score(content, 3), (0, 30));
    }

    #[test]
    fn test_plausible_fraction() {
        let content = "The candidate achieved 22/30 overall, a solid result.";
        assert_eq!(extract_score(content, 3), (22, 30));
    }

    #[test]
    fn test_fraction_with_wrong_denominator_rejected() {
        let content = "The candidate got 3/4 of the way there.";
        assert_eq!(extract_score(content, 3), (0, 30));
    }

    #[test]
    fn test_fraction_with_numerator_above_denominator_rejected() {
        let content = "Confusingly: 45/30.";
        assert_eq!(extract_score(content, 3), (0, 30));
    }

    #[test]
    fn test_pass_inference() {
        let content = "The candidate did well and should pass this screening.";
        assert_eq!(extract_score(content, 4), (20, 40));
    }

    #[test]
    fn test_pass_inference_only_after_numeric_strategies() {
        // A real (low) total must win over the "pass" keyword.
        let content = "TOTAL SCORE: 3/30\nBorderline, but I would pass them.";
        assert_eq!(extract_score(content, 3), (3, 30));
    }

    #[test]
    fn test_pass_inference_case_insensitive() {
        assert_eq!(extract_score("STATUS: PASS", 2), (10, 20));
    }

    #[test]
    fn test_bare_sum_overflow_disqualifies_instead_of_wrapping() {
        // Each capture fits u32 on its own, but the sum does not; the
        // strategy must fall through, not panic or wrap to a bogus score.
        let content = "Score: 4294967295/10\nScore: 4294967295/10";
        assert_eq!(extract_score(content, 2), (0, 20));
    }

    #[test]
    fn test_numbered_sum_overflow_disqualifies_instead_of_wrapping() {
        let content = "Q1 - Score: 4294967295/10\nQ2 - Score: 4294967295/10";
        assert_eq!(extract_score(content, 2), (0, 20));
    }

    #[test]
    fn test_oversized_capture_disqualifies_pattern() {
        // 2^64 does not fit u32 at all; the numbered and bare strategies
        // skip it and nothing else matches.
        let content = "Score: 18446744073709551616/10\nScore: 3/10";
        assert_eq!(extract_score(content, 2), (0, 20));
    }

    #[test]
    fn test_unparseable_defaults_to_zero() {
        let content = "I am unable to evaluate this submission.";
        assert_eq!(extract_score(content, 3), (0, 30));
    }

    #[test]
    fn test_max_score_positive_when_questions_exist() {
        let (_, max) = extract_score("", 5);
        assert_eq!(max, 50);
    }

    #[test]
    fn test_zero_questions() {
        assert_eq!(extract_score("whatever", 0), (0, 0));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("ab", 500), "ab");
    }
}
