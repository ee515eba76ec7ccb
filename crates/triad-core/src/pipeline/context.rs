//! Context detection (spec.md §4.9): keyword-count heuristic used by the
//! write pipeline to override a caller-passed `general` context.

use crate::model::Context;

struct Lexicon {
    context: Context,
    keywords: &'static [&'static str],
}

const LEXICON: &[Lexicon] = &[
    Lexicon {
        context: Context::Family,
        keywords: &[
            "mom", "dad", "mother", "father", "parent", "sibling", "brother", "sister", "family",
            "home", "grandma", "grandpa", "aunt", "uncle", "cousin", "wife", "husband", "spouse",
            "kid", "child", "son", "daughter",
        ],
    },
    Lexicon {
        context: Context::Work,
        keywords: &[
            "work", "job", "office", "boss", "colleague", "coworker", "project", "meeting",
            "deadline", "salary", "career", "promotion", "client", "business", "professional",
            "company", "manager", "team",
        ],
    },
    Lexicon {
        context: Context::College,
        keywords: &[
            "college", "university", "school", "class", "professor", "teacher", "exam", "test",
            "grade", "study", "student", "campus", "lecture", "homework", "assignment", "degree",
            "major", "semester",
        ],
    },
    Lexicon {
        context: Context::Personal,
        keywords: &[
            "myself", "i feel", "i think", "i believe", "my opinion", "personally", "my life",
            "my goal", "my dream", "my fear", "my hope",
        ],
    },
    Lexicon {
        context: Context::Health,
        keywords: &[
            "health", "doctor", "hospital", "medicine", "sick", "illness", "exercise", "diet",
            "sleep", "mental", "therapy", "anxiety", "depression", "stress", "workout", "gym",
            "weight",
        ],
    },
    Lexicon {
        context: Context::Hobby,
        keywords: &[
            "hobby", "game", "music", "movie", "book", "art", "sport", "travel", "cooking",
            "reading", "playing", "watching", "listening", "collecting", "photography", "painting",
        ],
    },
];

/// Lowercase the text, count keyword hits per context, and return the
/// context with the most hits (ties broken by enum declaration order,
/// `general` if every context scores zero).
pub fn detect_context(text: &str) -> Context {
    let lowered = text.to_lowercase();

    let mut best = Context::General;
    let mut best_count = 0usize;
    for entry in LEXICON {
        let count = entry.keywords.iter().filter(|kw| lowered.contains(*kw)).count();
        if count > best_count {
            best_count = count;
            best = entry.context;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_family_context() {
        assert_eq!(detect_context("I had dinner with my mom and dad"), Context::Family);
    }

    #[test]
    fn detects_work_context() {
        assert_eq!(detect_context("Big deadline at the office tomorrow"), Context::Work);
    }

    #[test]
    fn falls_back_to_general_with_no_keyword_hits() {
        assert_eq!(detect_context("The sky is a pleasant color today"), Context::General);
    }

    #[test]
    fn ties_break_by_enum_order() {
        // Exactly one keyword hit each for family and work; family comes
        // first in ORDERED so it should win the tie.
        assert_eq!(detect_context("family work"), Context::Family);
    }
}
