//! Rule-based English singularization for class names.
//!
//! Best effort only: words it has no rule for come back unchanged. For a
//! PascalCase compound only the last word changes (`LineItems` → `LineItem`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::Singularize;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSingularizer;

impl Singularize for EnglishSingularizer {
    fn singularize(&self, word: &str) -> String {
        let split = last_word_start(word);
        let (head, last) = word.split_at(split);
        if last.is_empty() {
            return word.to_string();
        }
        let singular = singularize_lower(&last.to_lowercase());
        format!("{head}{}", restore_case(last, &singular))
    }
}

// ------- Word lists -------

static UNCOUNTABLE: &[&str] = &[
    "aircraft", "alias", "atlas", "bias", "bison", "canvas", "deer", "equipment",
    "feedback", "fish", "gas", "hardware", "information", "lens", "metadata",
    "money", "moose", "news", "plus", "rice", "series", "sheep", "software",
    "species", "swine",
];

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("teeth", "tooth"),
        ("feet", "foot"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("lice", "louse"),
        ("oxen", "ox"),
        ("dice", "die"),
        ("data", "datum"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("cacti", "cactus"),
        ("fungi", "fungus"),
        ("octopi", "octopus"),
        ("radii", "radius"),
        ("alumni", "alumnus"),
        ("indices", "index"),
        ("appendices", "appendix"),
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("pies", "pie"),
        ("ties", "tie"),
        ("lies", "lie"),
        ("zombies", "zombie"),
        ("selfies", "selfie"),
        ("calories", "calorie"),
    ])
});

/// Suffix rules, first match wins.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(quiz)zes$", "$1"),
        (r"(matr)ices$", "${1}ix"),
        (r"(vert)ices$", "${1}ex"),
        (r"(alias|status|bus|virus|campus|census|bonus)es$", "$1"),
        (r"^(cris|ax|test)es$", "${1}is"),
        (r"(analy|diagno|parenthe|progno|synop|hypothe)ses$", "${1}sis"),
        (r"(kni|wi|li)ves$", "${1}fe"),
        (r"(thie|lea|loa|shea)ves$", "${1}f"),
        (r"([lr])ves$", "${1}f"),
        (r"([^aeiouy]|qu)ies$", "${1}y"),
        (r"(x|ch|ss|sh|zz)es$", "$1"),
        (r"(shoe|toe|foe|hoe|oboe)s$", "$1"),
        (r"(her|potat|tomat|ech|vet|torped)oes$", "${1}o"),
        (r"([^s])s$", "$1"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

fn singularize_lower(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some(singular) = IRREGULAR.get(word) {
        return (*singular).to_string();
    }
    // already singular: class, status, analysis
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    for (pattern, replacement) in RULES.iter() {
        if pattern.is_match(word) {
            return pattern.replace(word, *replacement).into_owned();
        }
    }
    word.to_string()
}

/// Byte offset of the last word in a PascalCase/camelCase compound: the last
/// uppercase char that follows a lowercase char or a digit.
fn last_word_start(word: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (i, c) in word.char_indices() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_numeric()) {
            start = i;
        }
        prev = Some(c);
    }
    start
}

fn restore_case(original: &str, singular: &str) -> String {
    let letters = || original.chars().filter(|c| c.is_alphabetic());
    if letters().next().is_some() && letters().all(char::is_uppercase) {
        return singular.to_uppercase();
    }
    match (original.chars().next(), singular.chars().next()) {
        (Some(o), Some(s)) if o.is_uppercase() => {
            let mut out: String = s.to_uppercase().collect();
            out.push_str(&singular[s.len_utf8()..]);
            out
        }
        _ => singular.to_string(),
    }
}
