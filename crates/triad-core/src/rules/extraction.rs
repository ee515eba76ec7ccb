//! Identity extraction (spec.md §4.1): `extract(text) -> {key?, value?}`.
//! A deterministic cascade, first match wins. Returns `None` when nothing
//! matches; the write pipeline then rejects the identity write with
//! `TriadError::ExtractionFailed`.

use super::patterns::*;

/// An extracted identity key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFact {
    pub key: String,
    pub value: String,
}

/// Run the extraction cascade against `text`. Operates on the trimmed
/// text; extraction works case-insensitively except where capitalization
/// is the disambiguator (names), per spec.md §4.1 edge cases.
pub fn extract(text: &str) -> Option<ExtractedFact> {
    let text = text.trim();

    if let Some(caps) = NAME_PATTERN.captures(text) {
        return Some(ExtractedFact { key: "name".into(), value: caps[1].to_string() });
    }
    if let Some(caps) = IM_NAME_PATTERN.captures(text) {
        return Some(ExtractedFact { key: "name".into(), value: caps[1].to_string() });
    }
    if let Some(caps) = DIET_PATTERN.captures(text) {
        return Some(ExtractedFact { key: "diet".into(), value: caps[1].to_lowercase() });
    }
    if let Some(caps) = RELIGION_PATTERN.captures(text) {
        return Some(ExtractedFact { key: "religion".into(), value: caps[1].to_lowercase() });
    }
    if let Some(caps) = AVOID_PATTERN.captures(text) {
        let verb = caps[1].to_lowercase();
        let key = if verb == "eat" { "avoid_eat" } else { "avoid_drink" };
        return Some(ExtractedFact {
            key: key.into(),
            value: caps[2].trim().to_lowercase(),
        });
    }
    if let Some(caps) = ALLERGY_PATTERN.captures(text) {
        return Some(ExtractedFact {
            key: "allergy".into(),
            value: caps[1].trim().to_lowercase(),
        });
    }
    if let Some(caps) = CALL_ME_PATTERN.captures(text) {
        return Some(ExtractedFact {
            key: "preferred_name".into(),
            value: caps[1].to_string(),
        });
    }
    if let Some(caps) = MY_ATTRIBUTE_IS_PATTERN.captures(text) {
        return Some(ExtractedFact {
            key: caps[1].to_lowercase(),
            value: caps[2].trim().to_lowercase(),
        });
    }
    // Generic trait declaration is tried last among the "I am ..." shapes
    // since NAME_PATTERN/DIET_PATTERN/RELIGION_PATTERN above all anchor on
    // the same "I am/I'm" prefix and must get first refusal.
    if let Some(caps) = GENERIC_TRAIT_PATTERN.captures(text) {
        let value = caps[1].trim().to_lowercase();
        if !value.is_empty() {
            return Some(ExtractedFact { key: "trait".into(), value });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_from_my_name_is() {
        let fact = extract("My name is John").unwrap();
        assert_eq!(fact.key, "name");
        assert_eq!(fact.value, "John");
    }

    #[test]
    fn extracts_name_from_im_form() {
        let fact = extract("I'm Alex").unwrap();
        assert_eq!(fact.key, "name");
        assert_eq!(fact.value, "Alex");
    }

    #[test]
    fn extracts_diet() {
        let fact = extract("I am a vegetarian").unwrap();
        assert_eq!(fact.key, "diet");
        assert_eq!(fact.value, "vegetarian");
    }

    #[test]
    fn extracts_avoid_eat() {
        let fact = extract("I don't eat shellfish").unwrap();
        assert_eq!(fact.key, "avoid_eat");
        assert_eq!(fact.value, "shellfish");
    }

    #[test]
    fn extracts_avoid_drink() {
        let fact = extract("I don't drink alcohol").unwrap();
        assert_eq!(fact.key, "avoid_drink");
        assert_eq!(fact.value, "alcohol");
    }

    #[test]
    fn extracts_allergy() {
        let fact = extract("I am allergic to peanuts").unwrap();
        assert_eq!(fact.key, "allergy");
        assert_eq!(fact.value, "peanuts");
    }

    #[test]
    fn extracts_preferred_name() {
        let fact = extract("call me Jay").unwrap();
        assert_eq!(fact.key, "preferred_name");
        assert_eq!(fact.value, "Jay");
    }

    #[test]
    fn extracts_my_attribute_is_catchall() {
        let fact = extract("my language is Spanish").unwrap();
        assert_eq!(fact.key, "language");
        assert_eq!(fact.value, "spanish");
    }

    #[test]
    fn returns_none_when_nothing_matches() {
        assert_eq!(extract("the weather is nice today"), None);
    }

    #[test]
    fn name_extraction_wins_over_generic_trait_for_capitalized_subject() {
        // "I am John" could also look like a generic trait; name wins.
        let fact = extract("I am John").unwrap();
        assert_eq!(fact.key, "name");
    }
}
