//! Part-of-speech tagger
//!
//! Deterministic lexicon + suffix-rule tagger producing Penn Treebank tags.
//! Only the word class matters downstream (the lemmatizer looks at the first
//! letter of the tag), so the tagger concentrates on separating verbs,
//! adjectives and adverbs from the default noun reading.

use std::collections::HashMap;

const LEXICON: &[(&str, &str)] = &[
    // Base-form verbs common in short messages
    ("win", "VB"), ("call", "VB"), ("click", "VB"), ("claim", "VB"), ("reply", "VB"),
    ("send", "VB"), ("get", "VB"), ("go", "VB"), ("come", "VB"), ("know", "VB"),
    ("want", "VB"), ("see", "VB"), ("make", "VB"), ("take", "VB"), ("give", "VB"),
    ("tell", "VB"), ("think", "VB"), ("say", "VB"), ("let", "VB"), ("buy", "VB"),
    ("pay", "VB"), ("ask", "VB"), ("try", "VB"), ("keep", "VB"), ("love", "VB"),
    ("miss", "VB"), ("join", "VB"), ("apply", "VB"), ("subscribe", "VB"),
    ("unsubscribe", "VB"), ("receive", "VB"), ("contact", "VB"), ("redeem", "VB"),
    ("verify", "VB"), ("confirm", "VB"), ("use", "VB"), ("pick", "VB"), ("bring", "VB"),
    ("sing", "VB"), ("ring", "NN"),
    // Irregular past tense / participles
    ("got", "VBD"), ("went", "VBD"), ("gone", "VBN"), ("said", "VBD"), ("made", "VBD"),
    ("came", "VBD"), ("took", "VBD"), ("taken", "VBN"), ("gave", "VBD"), ("given", "VBN"),
    ("sent", "VBD"), ("told", "VBD"), ("knew", "VBD"), ("known", "VBN"), ("thought", "VBD"),
    ("saw", "VBD"), ("seen", "VBN"), ("felt", "VBD"), ("left", "VBD"), ("paid", "VBD"),
    ("bought", "VBD"), ("brought", "VBD"), ("met", "VBD"), ("ran", "VBD"), ("sat", "VBD"),
    ("found", "VBD"), ("kept", "VBD"), ("lost", "VBD"), ("sold", "VBD"), ("held", "VBD"),
    ("ate", "VBD"), ("eaten", "VBN"), ("wrote", "VBD"), ("written", "VBN"), ("spoke", "VBD"),
    ("began", "VBD"), ("begun", "VBN"), ("used", "VBD"), ("chosen", "VBN"), ("won", "VBD"),
    // Nouns that look like inflected verbs
    ("morning", "NN"), ("evening", "NN"), ("nothing", "NN"), ("something", "NN"),
    ("anything", "NN"), ("everything", "NN"), ("thing", "NN"), ("king", "NN"),
    ("spring", "NN"), ("wedding", "NN"), ("building", "NN"), ("meeting", "NN"),
    ("ceiling", "NN"), ("darling", "NN"), ("pudding", "NN"), ("string", "NN"),
    ("wing", "NN"), ("sibling", "NN"), ("sterling", "NN"), ("need", "NN"), ("seed", "NN"),
    ("feed", "NN"), ("speed", "NN"), ("bed", "NN"), ("red", "JJ"), ("shed", "NN"),
    ("breed", "NN"), ("greed", "NN"), ("weed", "NN"), ("hundred", "CD"), ("news", "NN"),
    ("series", "NN"), ("species", "NN"), ("means", "NN"), ("lens", "NN"),
    ("christmas", "NN"), ("today", "NN"), ("tomorrow", "NN"), ("tonight", "NN"),
    ("yesterday", "NN"), ("weekend", "NN"),
    // Adjectives
    ("free", "JJ"), ("new", "JJ"), ("good", "JJ"), ("great", "JJ"), ("big", "JJ"),
    ("small", "JJ"), ("happy", "JJ"), ("sorry", "JJ"), ("nice", "JJ"), ("late", "JJ"),
    ("early", "JJ"), ("sure", "JJ"), ("last", "JJ"), ("next", "JJ"), ("urgent", "JJ"),
    ("important", "JJ"), ("special", "JJ"), ("exclusive", "JJ"), ("cheap", "JJ"),
    ("easy", "JJ"), ("ready", "JJ"), ("available", "JJ"), ("real", "JJ"), ("fine", "JJ"),
    ("hot", "JJ"), ("cool", "JJ"), ("busy", "JJ"), ("better", "JJR"), ("best", "JJS"),
    ("worse", "JJR"), ("worst", "JJS"), ("bigger", "JJR"), ("biggest", "JJS"),
    ("cheaper", "JJR"), ("cheapest", "JJS"), ("larger", "JJR"), ("largest", "JJS"),
    ("smaller", "JJR"), ("smallest", "JJS"), ("higher", "JJR"), ("highest", "JJS"),
    ("lower", "JJR"), ("lowest", "JJS"), ("newer", "JJR"), ("newest", "JJS"),
    ("older", "JJR"), ("oldest", "JJS"), ("faster", "JJR"), ("fastest", "JJS"),
    ("greater", "JJR"), ("greatest", "JJS"), ("latest", "JJS"),
    // Adverbs
    ("still", "RB"), ("already", "RB"), ("soon", "RB"), ("never", "RB"), ("always", "RB"),
    ("maybe", "RB"), ("also", "RB"), ("ever", "RB"), ("even", "RB"), ("later", "RB"),
    ("yet", "RB"), ("back", "RB"), ("away", "RB"), ("perhaps", "RB"), ("sometimes", "RB"),
    ("afterwards", "RB"), ("towards", "IN"), ("besides", "RB"), ("thus", "RB"),
    ("please", "UH"), ("yes", "UH"), ("hey", "UH"), ("hi", "UH"), ("hello", "UH"),
    ("ok", "UH"), ("okay", "UH"), ("thanks", "NNS"),
];

/// Suffix rules, checked in order; the first match wins
const SUFFIX_RULES: &[(&str, usize, &str)] = &[
    ("iest", 5, "JJS"),
    ("ier", 4, "JJR"),
    ("ing", 5, "VBG"),
    ("eed", 5, "VBN"),
    ("ed", 5, "VBD"),
    ("ly", 5, "RB"),
    ("ness", 5, "NN"),
    ("ment", 5, "NN"),
    ("tion", 5, "NN"),
    ("sion", 5, "NN"),
    ("ship", 5, "NN"),
    ("ity", 5, "NN"),
    ("ous", 5, "JJ"),
    ("ful", 5, "JJ"),
    ("ive", 5, "JJ"),
    ("able", 5, "JJ"),
    ("ible", 5, "JJ"),
    ("less", 5, "JJ"),
    ("ical", 6, "JJ"),
    ("ish", 5, "JJ"),
    ("ize", 5, "VB"),
    ("ise", 6, "VB"),
    ("ify", 5, "VB"),
];

pub struct PosTagger {
    lexicon: HashMap<&'static str, &'static str>,
}

impl PosTagger {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    /// Tag each token; output is parallel to the input
    pub fn tag<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<&'static str> {
        tokens.iter().map(|t| self.tag_word(t.as_ref())).collect()
    }

    /// Tag a single lowercased word
    pub fn tag_word(&self, word: &str) -> &'static str {
        if let Some(tag) = self.lexicon.get(word) {
            return *tag;
        }

        let len = word.chars().count();
        for (suffix, min_len, tag) in SUFFIX_RULES {
            if len >= *min_len && word.ends_with(suffix) {
                return *tag;
            }
        }

        if len > 3 && word.ends_with('s') && !is_singular_s(word) {
            return "NNS";
        }

        "NN"
    }
}

impl Default for PosTagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Words ending in `s` that are not plurals
fn is_singular_s(word: &str) -> bool {
    ["ss", "us", "is", "ous", "ics"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_wins_over_suffix_rules() {
        let tagger = PosTagger::new();
        assert_eq!(tagger.tag_word("meeting"), "NN");
        assert_eq!(tagger.tag_word("morning"), "NN");
        assert_eq!(tagger.tag_word("free"), "JJ");
        assert_eq!(tagger.tag_word("still"), "RB");
    }

    #[test]
    fn test_suffix_rules() {
        let tagger = PosTagger::new();
        assert_eq!(tagger.tag_word("running"), "VBG");
        assert_eq!(tagger.tag_word("claimed"), "VBD");
        assert_eq!(tagger.tag_word("quickly"), "RB");
        assert_eq!(tagger.tag_word("wonderful"), "JJ");
        assert_eq!(tagger.tag_word("easier"), "JJR");
        assert_eq!(tagger.tag_word("prizes"), "NNS");
        assert_eq!(tagger.tag_word("bonus"), "NN");
        assert_eq!(tagger.tag_word("cash"), "NN");
    }

    #[test]
    fn test_short_words() {
        let tagger = PosTagger::new();
        assert_eq!(tagger.tag_word("red"), "JJ");
        assert_eq!(tagger.tag_word("sing"), "VB");
        assert_eq!(tagger.tag_word("bus"), "NN");
        assert_eq!(tagger.tag_word("gas"), "NN");
    }

    #[test]
    fn test_tag_is_parallel() {
        let tagger = PosTagger::new();
        let tokens = ["win", "free", "cash"];
        assert_eq!(tagger.tag(&tokens), vec!["VB", "JJ", "NN"]);
    }
}
