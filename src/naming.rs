//! Class and member naming.
//!
//! [`NameRegistry`] hands out class names that are unique case-insensitively
//! within one generation run. Names derived from plural field keys go through
//! an injected [`Singularize`] policy first, so `items` yields `Item`.
pub mod singular;

use std::collections::HashSet;

pub use singular::EnglishSingularizer;

/// Used when a key has no letters or digits at all.
pub const FALLBACK_CLASS_NAME: &str = "Class";
pub const FALLBACK_MEMBER_NAME: &str = "Field";

/// Maps a plural noun to its singular form. Must be pure and return the input
/// unchanged when it has no rule for it.
pub trait Singularize {
    fn singularize(&self, word: &str) -> String;
}

impl<F> Singularize for F
where
    F: Fn(&str) -> String,
{
    fn singularize(&self, word: &str) -> String {
        self(word)
    }
}

pub struct NameRegistry {
    taken: HashSet<String>, // lower-cased
    singularizer: Box<dyn Singularize + Send + Sync>,
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameRegistry").field("taken", &self.taken).finish_non_exhaustive()
    }
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::with_singularizer(EnglishSingularizer)
    }

    pub fn with_singularizer(singularizer: impl Singularize + Send + Sync + 'static) -> Self {
        Self { taken: HashSet::new(), singularizer: Box::new(singularizer) }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// Title-cases `base`, then appends the smallest suffix ≥ 2 that makes it
    /// unused. The returned name is registered.
    pub fn unique_name(&mut self, base: &str) -> String {
        let base = class_base_name(base);
        let mut name = base.clone();
        let mut i = 2u64;
        while self.is_taken(&name) {
            name = format!("{base}{i}");
            i += 1;
        }
        self.taken.insert(name.to_lowercase());
        name
    }

    pub fn unique_name_from_plural(&mut self, plural: &str) -> String {
        let singular = self.singularizer.singularize(&to_title_case(plural));
        self.unique_name(&singular)
    }
}

/// Capitalizes the first char of every run of letters/digits and drops
/// everything else. Other chars keep their case: `userID` → `UserID`.
pub fn to_title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_run_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_run_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_run_start = false;
        } else {
            at_run_start = true;
        }
    }
    out
}

fn class_base_name(base: &str) -> String {
    let name = to_title_case(base);
    match name.chars().next() {
        None => FALLBACK_CLASS_NAME.to_string(),
        Some(c) if c.is_numeric() => format!("{FALLBACK_CLASS_NAME}{name}"),
        Some(_) => name,
    }
}

/// Member identifier for a JSON key: title-cased when `pascal_case`,
/// otherwise the key with every non-identifier char replaced by `_`.
/// A leading digit gets a `_` prefix.
pub fn member_identifier(key: &str, pascal_case: bool) -> String {
    let ident: String = if pascal_case {
        to_title_case(key)
    } else {
        key.chars().map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' }).collect()
    };
    match ident.chars().next() {
        None => FALLBACK_MEMBER_NAME.to_string(),
        Some(c) if c.is_numeric() => format!("_{ident}"),
        Some(_) => ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn repeated_names_get_suffixes() {
        let mut names = NameRegistry::new();
        let got: Vec<String> = ["Item", "Item", "Item"].iter().map(|n| names.unique_name(n)).collect();
        assert_eq!(got, vec!["Item", "Item2", "Item3"]);
    }

    #[test]
    fn names_collide_case_insensitively() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name("Item"), "Item");
        assert_eq!(names.unique_name("item"), "Item2");
        assert!(names.is_taken("ITEM2"));
    }

    #[test]
    fn suffix_skips_taken_numbers() {
        let mut names = NameRegistry::new();
        names.unique_name("Item2");
        names.unique_name("Item");
        assert_eq!(names.unique_name("Item"), "Item3");
    }

    #[test]
    fn plural_keys_are_singularized() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name_from_plural("items"), "Item");
        assert_eq!(names.unique_name_from_plural("line_items"), "LineItem");
        assert_eq!(names.unique_name_from_plural("items"), "Item2");
    }

    #[test]
    fn singularizer_is_injectable() {
        let mut names = NameRegistry::with_singularizer(|w: &str| w.to_string());
        assert_eq!(names.unique_name_from_plural("items"), "Items");
    }

    #[test_case("user", "User" ; "lower")]
    #[test_case("first_name", "FirstName" ; "snake")]
    #[test_case("first-name", "FirstName" ; "kebab")]
    #[test_case("userID", "UserID" ; "inner caps kept")]
    #[test_case("  spaced  out ", "SpacedOut" ; "spaces")]
    #[test_case("élan vital", "ÉlanVital" ; "unicode")]
    #[test_case("$", "" ; "symbols only")]
    fn title_case(input: &str, expected: &str) {
        assert_eq!(to_title_case(input), expected);
    }

    #[test]
    fn degenerate_keys_fall_back() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name("$$"), "Class");
        assert_eq!(names.unique_name(""), "Class2");
        assert_eq!(names.unique_name("3d"), "Class3d");
    }

    #[test_case("first_name", false, "first_name" ; "raw kept")]
    #[test_case("first-name", false, "first_name" ; "raw sanitized")]
    #[test_case("first-name", true, "FirstName" ; "pascal")]
    #[test_case("1st", false, "_1st" ; "leading digit")]
    #[test_case("@", true, "Field" ; "empty pascal")]
    fn member_identifiers(key: &str, pascal: bool, expected: &str) {
        assert_eq!(member_identifier(key, pascal), expected);
    }
}
