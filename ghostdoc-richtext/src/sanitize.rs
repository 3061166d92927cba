//! Cleanup pass for generated article copy.
//!
//! Removes em dashes and rewrites stock phrases that mark text as machine
//! written. Runs on plain text or HTML alike; tags are never matched by the
//! phrase list.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Stock phrase patterns and their replacements, applied in order.
const PHRASES: &[(&str, &str)] = &[
    (r"\bdelve(?:s|d)?\b", "explore"),
    (r"\bdelving\b", "exploring"),
    (r"\bit'?s worth noting that\s*", ""),
    (r"\bit is worth noting that\s*", ""),
    (r"\bin today's rapidly (?:evolving|changing) (?:landscape|world)\b", "today"),
    (r"\bin today's (?:landscape|world|environment|climate)\b", "today"),
    (r"\brapidly evolving landscape\b", "changing market"),
    (r"\bever-(?:evolving|changing) landscape\b", "shifting market"),
    (r"\bthe landscape of\b", "the world of"),
    (r"\bnavigate the (?:complex )?landscape\b", "work through the challenges"),
    (r"\b(?:pivotal|crucial)\b", "important"),
    (r"\b(?:moreover|furthermore|additionally)\b", "also"),
    (r"\bindeed\b", "really"),
    (r"\bmultifaceted\b", "complex"),
    (r"\btapestry\b", "mix"),
    (r"\bunlock(?:ing)? the (?:full )?potential\b", "get the most out"),
    (r"\bparadigm shift\b", "big change"),
    (r"\bparadigm\b", "model"),
    (r"\bsynergy\b", "teamwork"),
    (r"\bholistic\b", "complete"),
    (r"\bseamless(?:ly)?\b", "smooth"),
    (r"\b(?:leverage|utilize)\b", "use"),
    (r"\bfacilitate\b", "help with"),
    (r"\bcommence\b", "start"),
    (r"\brobust\b", "strong"),
];

static PHRASE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PHRASES
        .iter()
        .map(|(pattern, replacement)| {
            let re = Regex::new(&format!("(?i){pattern}")).expect("invalid phrase regex");
            (re, *replacement)
        })
        .collect()
});

static DOUBLE_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*,").expect("invalid comma regex"));

static STRAY_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s,\s([a-z])").expect("invalid comma regex"));

/// Post-process generated text.
pub fn sanitize_llm_output(text: &str) -> String {
    let mut out = text
        .replace(" \u{2014} ", ", ")
        .replace(" \u{2014}", ",")
        .replace("\u{2014} ", ", ")
        .replace('\u{2014}', ", ");

    for (re, replacement) in PHRASE_RULES.iter() {
        if re.is_match(&out) {
            out = re
                .replace_all(&out, |caps: &Captures| match_case(&caps[0], replacement))
                .into_owned();
        }
    }

    let out = DOUBLE_COMMA.replace_all(&out, ",");
    STRAY_COMMA.replace_all(&out, " $1").into_owned()
}

/// Carry a leading capital from `matched` over to `replacement`.
fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if starts_upper => first.to_uppercase().chain(chars).collect(),
        _ => replacement.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn em_dashes_become_commas() {
        assert_eq!(
            sanitize_llm_output("Growth \u{2014} not size \u{2014} matters"),
            "Growth, not size, matters"
        );
        assert_eq!(sanitize_llm_output("a\u{2014}b"), "a, b");
    }

    #[test]
    fn stock_phrases_are_rewritten() {
        assert_eq!(
            sanitize_llm_output("We delve into a robust, holistic plan."),
            "We explore into a strong, complete plan."
        );
        assert_eq!(sanitize_llm_output("This is crucial."), "This is important.");
    }

    #[test]
    fn leading_capital_is_preserved() {
        assert_eq!(
            sanitize_llm_output("Leverage data. Moreover, utilize it."),
            "Use data. Also, use it."
        );
    }

    #[test]
    fn filler_clause_is_dropped() {
        assert_eq!(
            sanitize_llm_output("It's worth noting that margins fell."),
            "margins fell."
        );
    }

    #[test]
    fn markup_is_left_alone() {
        assert_eq!(
            sanitize_llm_output("<p><strong>Pivotal</strong> moment</p>"),
            "<p><strong>Important</strong> moment</p>"
        );
    }

    #[test]
    fn double_commas_collapse() {
        assert_eq!(sanitize_llm_output("one, , two"), "one, two");
    }

    #[test]
    fn untouched_text_round_trips() {
        let text = "Plain, honest sentences stay put.";
        assert_eq!(sanitize_llm_output(text), text);
    }
}
