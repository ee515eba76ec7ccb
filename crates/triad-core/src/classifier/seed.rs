//! The seed training corpus (spec.md §4.2): ~30 labeled utterances, 10 per
//! layer, embedded and trained over in a single pass on first start. The
//! exact sentences aren't prescribed by the specification text; this list
//! is fixed so `retrain_from_history` is reproducible (spec.md §9 open
//! question) — once chosen, it must not be reshuffled or edited, since
//! doing so would change out-of-the-box routing behavior for deployments
//! that rely on cold-start seeding.

use crate::model::Layer;

/// One seed example: raw text and its correct layer.
pub struct SeedExample {
    pub text: &'static str,
    pub layer: Layer,
}

pub const SEED_CORPUS: &[SeedExample] = &[
    // IMM — identity declarations
    SeedExample { text: "My name is Jordan", layer: Layer::Imm },
    SeedExample { text: "I am vegetarian and avoid meat", layer: Layer::Imm },
    SeedExample { text: "I am allergic to peanuts", layer: Layer::Imm },
    SeedExample { text: "Call me Jay from now on", layer: Layer::Imm },
    SeedExample { text: "My religion is Buddhist", layer: Layer::Imm },
    SeedExample { text: "I don't drink alcohol", layer: Layer::Imm },
    SeedExample { text: "My preferred language is Spanish", layer: Layer::Imm },
    SeedExample { text: "I identify as non-binary", layer: Layer::Imm },
    SeedExample { text: "I am a vegan for ethical reasons", layer: Layer::Imm },
    SeedExample { text: "Actually, my name is spelled differently", layer: Layer::Imm },
    // EMM — conversational experiences
    SeedExample { text: "I had coffee with Sarah this morning", layer: Layer::Emm },
    SeedExample { text: "We watched a movie together last night", layer: Layer::Emm },
    SeedExample { text: "I went for a run in the park today", layer: Layer::Emm },
    SeedExample { text: "My boss gave me some tough feedback at work", layer: Layer::Emm },
    SeedExample { text: "I felt really happy at the concert yesterday", layer: Layer::Emm },
    SeedExample { text: "We had a long talk about our vacation plans", layer: Layer::Emm },
    SeedExample { text: "I argued with my brother about the bill", layer: Layer::Emm },
    SeedExample { text: "Today was stressful because of the deadline", layer: Layer::Emm },
    SeedExample { text: "I cooked dinner for my family tonight", layer: Layer::Emm },
    SeedExample { text: "I visited my grandma over the weekend", layer: Layer::Emm },
    // KMM — durable skills/concepts
    SeedExample { text: "I know how to code in Python", layer: Layer::Kmm },
    SeedExample { text: "I'm skilled in woodworking and carpentry", layer: Layer::Kmm },
    SeedExample { text: "I specialize in backend distributed systems", layer: Layer::Kmm },
    SeedExample { text: "I understand how compilers parse syntax trees", layer: Layer::Kmm },
    SeedExample { text: "I can play the guitar and read sheet music", layer: Layer::Kmm },
    SeedExample { text: "I know the rules of chess and common openings", layer: Layer::Kmm },
    SeedExample { text: "I'm experienced in public speaking and debate", layer: Layer::Kmm },
    SeedExample { text: "I understand basic statistics and probability", layer: Layer::Kmm },
    SeedExample { text: "I know how to bake sourdough bread from scratch", layer: Layer::Kmm },
    SeedExample { text: "I'm good at fixing small engine repairs", layer: Layer::Kmm },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_corpus_has_ten_examples_per_layer() {
        for layer in [Layer::Imm, Layer::Emm, Layer::Kmm] {
            let count = SEED_CORPUS.iter().filter(|e| e.layer == layer).count();
            assert_eq!(count, 10, "layer {layer:?} should have 10 seed examples");
        }
    }
}
