//! POS-aware lemmatizer
//!
//! Reduces inflected words to their dictionary base form. Irregular forms are
//! resolved from per-class exception tables; regular forms go through
//! morphological detachment rules (plural `-s`/`-es`/`-ies`, verbal `-ed`/`-ing`
//! with consonant undoubling and silent-`e` restoration, comparative `-ier`).

use std::collections::HashMap;

/// Word class the lemmatizer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordClass {
    /// Map a Penn Treebank tag to a word class; unknown tags read as nouns
    pub fn from_treebank(tag: &str) -> Self {
        match tag.chars().next() {
            Some('J') => WordClass::Adjective,
            Some('V') => WordClass::Verb,
            Some('N') => WordClass::Noun,
            Some('R') => WordClass::Adverb,
            _ => WordClass::Noun,
        }
    }
}

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
    ("teeth", "tooth"), ("mice", "mouse"), ("geese", "goose"), ("lives", "life"),
    ("wives", "wife"), ("knives", "knife"), ("leaves", "leaf"), ("halves", "half"),
    ("wolves", "wolf"), ("thieves", "thief"), ("people", "people"), ("news", "news"),
    ("series", "series"), ("species", "species"), ("means", "means"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("was", "be"), ("were", "be"), ("been", "be"), ("is", "be"), ("am", "be"), ("are", "be"),
    ("has", "have"), ("had", "have"), ("does", "do"), ("did", "do"), ("done", "do"),
    ("goes", "go"), ("went", "go"), ("gone", "go"), ("got", "get"), ("gotten", "get"),
    ("said", "say"), ("made", "make"), ("came", "come"), ("took", "take"), ("taken", "take"),
    ("gave", "give"), ("given", "give"), ("sent", "send"), ("told", "tell"), ("knew", "know"),
    ("known", "know"), ("thought", "think"), ("saw", "see"), ("seen", "see"), ("felt", "feel"),
    ("left", "leave"), ("paid", "pay"), ("bought", "buy"), ("brought", "bring"),
    ("met", "meet"), ("ran", "run"), ("sat", "sit"), ("won", "win"), ("found", "find"),
    ("kept", "keep"), ("lost", "lose"), ("sold", "sell"), ("held", "hold"), ("ate", "eat"),
    ("eaten", "eat"), ("wrote", "write"), ("written", "write"), ("spoke", "speak"),
    ("spoken", "speak"), ("began", "begin"), ("begun", "begin"), ("chose", "choose"),
    ("chosen", "choose"), ("lying", "lie"), ("dying", "die"), ("tying", "tie"),
];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ("bigger", "big"), ("biggest", "big"), ("cheaper", "cheap"), ("cheapest", "cheap"),
    ("larger", "large"), ("largest", "large"), ("smaller", "small"), ("smallest", "small"),
    ("higher", "high"), ("highest", "high"), ("lower", "low"), ("lowest", "low"),
    ("newer", "new"), ("newest", "new"), ("older", "old"), ("oldest", "old"),
    ("faster", "fast"), ("fastest", "fast"), ("greater", "great"), ("greatest", "great"),
    ("latest", "late"), ("hotter", "hot"), ("hottest", "hot"),
];

const ADVERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("best", "well"), ("better", "well"), ("further", "far"), ("farther", "far"),
];

/// Plural / third-person endings that take `-es`
const SIBILANT_ES: &[&str] = &["sses", "shes", "ches", "xes"];

/// Nouns ending in `-ie`, whose plural would otherwise fall to the `-ies` rule
const IE_NOUNS: &[&str] = &[
    "movie", "cookie", "freebie", "selfie", "rookie", "zombie", "calorie", "brownie",
    "hoodie", "smoothie", "newbie", "goalie", "genie", "auntie", "birdie", "sweetie",
    "techie", "foodie", "junkie", "groupie", "hippie", "prairie", "cutie",
];

/// Singular nouns ending in `-s` that pluralize with `-es`
const S_NOUNS: &[&str] = &[
    "bus", "bonus", "virus", "campus", "status", "census", "plus", "minus", "focus",
    "circus", "chorus", "genius", "cactus", "syllabus", "prospectus", "gas", "bias",
    "atlas", "canvas", "alias",
];

pub struct Lemmatizer {
    nouns: HashMap<&'static str, &'static str>,
    verbs: HashMap<&'static str, &'static str>,
    adjectives: HashMap<&'static str, &'static str>,
    adverbs: HashMap<&'static str, &'static str>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            nouns: NOUN_EXCEPTIONS.iter().copied().collect(),
            verbs: VERB_EXCEPTIONS.iter().copied().collect(),
            adjectives: ADJECTIVE_EXCEPTIONS.iter().copied().collect(),
            adverbs: ADVERB_EXCEPTIONS.iter().copied().collect(),
        }
    }

    /// Lemmatize a lowercased word under the given word class
    pub fn lemmatize(&self, word: &str, class: WordClass) -> String {
        let exceptions = match class {
            WordClass::Noun => &self.nouns,
            WordClass::Verb => &self.verbs,
            WordClass::Adjective => &self.adjectives,
            WordClass::Adverb => &self.adverbs,
        };

        if let Some(lemma) = exceptions.get(word) {
            return lemma.to_string();
        }

        match class {
            WordClass::Noun => noun_lemma(word),
            WordClass::Verb => verb_lemma(word),
            WordClass::Adjective => adjective_lemma(word),
            WordClass::Adverb => word.to_string(),
        }
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

fn noun_lemma(word: &str) -> String {
    let len = word.chars().count();
    if len <= 3 || ["ss", "us", "is", "ous"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }

    if len > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            let singular = format!("{stem}ie");
            if IE_NOUNS.contains(&singular.as_str()) {
                return singular;
            }
            return format!("{stem}y");
        }
    }

    if let Some(stem) = strip_sibilant_es(word) {
        return stem.to_string();
    }

    if let Some(stem) = word.strip_suffix("es").filter(|stem| S_NOUNS.contains(stem)) {
        return stem.to_string();
    }

    word.strip_suffix('s').unwrap_or(word).to_string()
}

fn verb_lemma(word: &str) -> String {
    let len = word.chars().count();

    if len > 4 {
        if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
            return format!("{stem}y");
        }
    }

    if let Some(stem) = strip_sibilant_es(word) {
        return stem.to_string();
    }

    if len > 4 && word.ends_with("eed") {
        return word[..word.len() - 1].to_string();
    }

    if len > 4 {
        if let Some(stem) = word.strip_suffix("ing") {
            return restore_stem(stem).unwrap_or_else(|| word.to_string());
        }
    }

    if len > 3 {
        if let Some(stem) = word.strip_suffix("ed") {
            return restore_stem(stem).unwrap_or_else(|| word.to_string());
        }
        if !word.ends_with("ss") {
            if let Some(stem) = word.strip_suffix('s') {
                return stem.to_string();
            }
        }
    }

    word.to_string()
}

fn adjective_lemma(word: &str) -> String {
    let len = word.chars().count();

    if len > 5 {
        if let Some(stem) = word.strip_suffix("iest") {
            return format!("{stem}y");
        }
    }
    if len > 4 {
        if let Some(stem) = word.strip_suffix("ier") {
            return format!("{stem}y");
        }
    }

    word.to_string()
}

fn strip_sibilant_es(word: &str) -> Option<&str> {
    SIBILANT_ES
        .iter()
        .find(|suffix| word.ends_with(*suffix))
        .map(|_| &word[..word.len() - 2])
}

/// Rebuild a verb stem after `-ed`/`-ing` removal. `None` when the stem has
/// no vowel, meaning the ending was part of the word (`bring`, `thing`).
fn restore_stem(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.chars().collect();
    if !chars.iter().any(|c| is_vowel(*c)) {
        return None;
    }

    let n = chars.len();
    if n >= 2 {
        let (last, prev) = (chars[n - 1], chars[n - 2]);
        if last == prev && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
            return Some(chars[..n - 1].iter().collect());
        }
    }

    if needs_silent_e(&chars) {
        return Some(format!("{stem}e"));
    }

    Some(stem.to_string())
}

fn needs_silent_e(chars: &[char]) -> bool {
    let n = chars.len();
    let ends_with = |suffix: &str| {
        let suffix: Vec<char> = suffix.chars().collect();
        n >= suffix.len() && chars[n - suffix.len()..] == suffix[..]
    };

    if ends_with("v") || ends_with("dg") || ends_with("iz") || ends_with("ang") {
        return true;
    }
    if ends_with("nc") || ends_with("rc") {
        return true;
    }
    // secur(e), cur(e) but not pour
    if n >= 3 && ends_with("ur") && !is_vowel(chars[n - 3]) {
        return true;
    }
    // updat(e), relat(e) but not treat
    if n >= 5 && ends_with("at") && !is_vowel(chars[n - 3]) {
        return true;
    }

    is_short_cvc(chars)
}

/// Single-syllable stem ending consonant-vowel-consonant (`lik`, `hop`, `us`)
fn is_short_cvc(chars: &[char]) -> bool {
    let n = chars.len();
    if n < 2 {
        return false;
    }

    let last = chars[n - 1];
    let vowel = chars[n - 2];
    if is_vowel(last) || matches!(last, 'w' | 'x' | 'y') || !is_vowel(vowel) {
        return false;
    }
    if n >= 3 && is_vowel(chars[n - 3]) {
        return false;
    }

    vowel_groups(chars) == 1
}

fn vowel_groups(chars: &[char]) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in chars {
        if is_vowel(*c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    groups
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
