//! Precompiled regexes for the hard-rule engine and identity extraction
//! (spec.md §4.1). Compiled once into `LazyLock`s per the teacher's
//! DESIGN NOTES guidance on modeling dynamic-intent detection as a single
//! compiled-matcher pass rather than building regexes per call.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("identity/rule pattern must compile")
}

// ---------------------------------------------------------------------
// Identity declarations (spec.md §4.1 step 3, §4.1 extraction cascade)
//
// Order matters: extraction tries these top to bottom and the first match
// wins (spec.md: "Deterministic cascade, first match wins").
// ---------------------------------------------------------------------

/// "my name is X" / "I'm X" / "I am X" where X is a capitalized token.
pub static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bmy\s+name\s+is\s+([A-Z][\w'-]*)"));

pub static IM_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bi(?:'m| am)\s+([A-Z][\w'-]*)\b"));

/// "I am a vegetarian|vegan|pescatarian|flexitarian" -> diet=<value>.
pub static DIET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bi\s*(?:'m| am)\s+a\s+(vegetarian|vegan|pescatarian|flexitarian)\b")
});

/// "I am (a/an) <religion>" for a closed set of common religious identities.
pub static RELIGION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bi\s*(?:'m| am)\s+(?:an?\s+)?(christian|muslim|jewish|buddhist|hindu|atheist|agnostic|catholic|sikh)\b")
});

/// Generic first-person trait declaration not covered by a more specific
/// pattern, e.g. "I am adventurous" -> trait=adventurous.
pub static GENERIC_TRAIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bi\s*(?:'m| am)\s+(?:an?\s+)?([a-z][a-z\s-]*?)(?:[.!?]|$)")
});

/// "I don't eat|drink Y" -> avoid_eat|avoid_drink=Y.
pub static AVOID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bi\s+don'?t\s+(eat|drink)\s+([\w\s]+?)(?:[.!?]|$)"));

/// "I am allergic to Y" -> allergy=Y.
pub static ALLERGY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bi\s*(?:'m| am)\s+allergic\s+to\s+([\w\s]+?)(?:[.!?]|$)")
});

/// "call me Z" -> preferred_name=Z.
pub static CALL_ME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bcall\s+me\s+([A-Z][\w'-]*)"));

/// "my {diet|religion|language|gender} is W" catch-all.
pub static MY_ATTRIBUTE_IS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bmy\s+(diet|religion|language|gender)\s+is\s+([\w\s]+?)(?:[.!?]|$)")
});

/// Any of the identity-declaration patterns above firing is enough for the
/// rule engine to classify the utterance as IMM, even before extraction
/// decides which key/value it is (spec.md §4.1 step 3).
pub fn any_identity_pattern_matches(text: &str) -> bool {
    NAME_PATTERN.is_match(text)
        || IM_NAME_PATTERN.is_match(text)
        || DIET_PATTERN.is_match(text)
        || RELIGION_PATTERN.is_match(text)
        || AVOID_PATTERN.is_match(text)
        || ALLERGY_PATTERN.is_match(text)
        || CALL_ME_PATTERN.is_match(text)
        || MY_ATTRIBUTE_IS_PATTERN.is_match(text)
}

// ---------------------------------------------------------------------
// Correction patterns (spec.md §4.1 step 4)
// ---------------------------------------------------------------------

pub static CORRECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(actually,?\s+|correction:\s*|i\s+meant\s+)"));

// ---------------------------------------------------------------------
// Knowledge indicators (spec.md §4.1 step 5)
// ---------------------------------------------------------------------

pub static KNOWLEDGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bi(?:'m| am)?\s*(?:know how to|skilled in|specialize in)\b")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_pattern_captures_capitalized_name() {
        let caps = NAME_PATTERN.captures("My name is John").unwrap();
        assert_eq!(&caps[1], "John");
    }

    #[test]
    fn correction_pattern_matches_common_prefixes() {
        assert!(CORRECTION_PATTERN.is_match("Actually, I live in Boston"));
        assert!(CORRECTION_PATTERN.is_match("correction: it's Tuesday"));
        assert!(CORRECTION_PATTERN.is_match("I meant Wednesday"));
        assert!(!CORRECTION_PATTERN.is_match("This is fine"));
    }

    #[test]
    fn knowledge_pattern_matches_capability_declarations() {
        assert!(KNOWLEDGE_PATTERN.is_match("I know how to code in Python"));
        assert!(KNOWLEDGE_PATTERN.is_match("I'm skilled in woodworking"));
        assert!(KNOWLEDGE_PATTERN.is_match("I specialize in backend systems"));
    }

    #[test]
    fn diet_pattern_captures_vegetarian() {
        let caps = DIET_PATTERN.captures("I am a vegetarian").unwrap();
        assert_eq!(&caps[1].to_lowercase(), "vegetarian");
    }

    #[test]
    fn religion_pattern_captures_known_religion() {
        let caps = RELIGION_PATTERN.captures("I am Buddhist").unwrap();
        assert_eq!(&caps[1].to_lowercase(), "buddhist");
    }
}
