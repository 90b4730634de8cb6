//! Rust identifiers derived from schema names.

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use std::collections::{BTreeMap, BTreeSet};

/// Strict and reserved keywords that cannot be plain identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers either.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// `PascalCase` type name. `users_user_full` -> `UsersUserFull`,
/// `users.get` -> `UsersGet`.
#[must_use]
pub fn type_name(s: &str) -> String {
    let base: String = s.to_upper_camel_case();
    if base.is_empty() {
        "Unnamed".to_string()
    } else if starts_with_digit(&base) {
        format!("N{base}")
    } else if base == "Self" {
        "Self_".to_string()
    } else {
        base
    }
}

/// `snake_case` field or function name, escaped when it collides with a
/// keyword.
#[must_use]
pub fn field_name(s: &str) -> String {
    let base: String = s.to_snake_case();
    if base.is_empty() {
        return "field".to_string();
    }
    if starts_with_digit(&base) {
        return format!("n{base}");
    }
    if NON_RAW_KEYWORDS.contains(&base.as_str()) {
        return format!("{base}_");
    }
    if is_keyword(&base) {
        return format!("r#{base}");
    }
    base
}

/// `SHOUTY_SNAKE_CASE` constant name. Prefixes `E` when the result would start
/// with a digit or be empty.
#[must_use]
pub fn const_name(s: &str) -> String {
    let base: String = s.to_shouty_snake_case();
    if base.is_empty() || starts_with_digit(&base) {
        format!("E{base}")
    } else {
        base
    }
}

/// Constant name for an error or subcode: `api_error_unknown` -> `UNKNOWN`.
#[must_use]
pub fn error_const_name(s: &str) -> String {
    const_name(s.strip_prefix("api_error_").unwrap_or(s))
}

/// Convert an enum label to a `PascalCase` variant identifier.
/// First char uppercase, rest lowercase per word. Prefixes with `E` (short for Enum)
/// if result is empty, starts with a digit, or is `Self`.
#[must_use]
pub fn variant_name(s: &str) -> String {
    let base: String = s
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars: std::str::Chars<'_> = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            }
        })
        .collect();
    if base.is_empty() || starts_with_digit(&base) || base == "Self" {
        format!("E{base}")
    } else {
        base
    }
}

/// Disambiguates colliding identifiers in declaration order: every member of
/// a colliding group gets `_{index}` appended. An index whose result is
/// already taken is skipped.
#[must_use]
pub fn disambiguate(names: Vec<String>) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for name in &names {
        *counts.entry(name.clone()).or_insert(0) += 1;
    }
    let mut taken: BTreeSet<String> = counts.keys().cloned().collect();
    let mut indices: BTreeMap<String, usize> = BTreeMap::new();
    names
        .into_iter()
        .map(|name| {
            if counts.get(&name).copied().unwrap_or(0) <= 1 {
                return name;
            }
            let idx: &mut usize = indices.entry(name.clone()).or_insert(0);
            loop {
                let candidate: String = format!("{name}_{idx}");
                *idx += 1;
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}

/// Globally unique type names.
///
/// Every name handed out is unique across all emitted files. A taken name gets
/// the smallest numeric suffix starting at 2 that is still free.
#[derive(Debug, Default)]
pub struct NameArena {
    taken: BTreeSet<String>,
}

impl NameArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `candidate` or the first free suffixed variant of it.
    pub fn claim(&mut self, candidate: &str) -> String {
        if self.taken.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let mut n: usize = 2;
        loop {
            let name: String = format!("{candidate}{n}");
            if self.taken.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }

    /// Claims a name for an anonymous shape nested under `parent`.
    pub fn claim_nested(&mut self, parent: &str, segment: &str) -> String {
        let candidate: String = format!("{parent}{}", type_name(segment));
        self.claim(&candidate)
    }

    #[must_use]
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_from_definition() {
        let actual: String = type_name("users_user_full");
        let expected: &str = "UsersUserFull";
        assert_eq!(expected, actual);
    }

    #[test]
    fn type_name_from_method() {
        let actual: String = type_name("users.get");
        let expected: &str = "UsersGet";
        assert_eq!(expected, actual);
    }

    #[test]
    fn type_name_leading_digit() {
        let actual: String = type_name("2fa_settings");
        let expected: &str = "N2faSettings";
        assert_eq!(expected, actual);
    }

    #[test]
    fn field_name_keywords() {
        assert_eq!("r#type", field_name("type"));
        assert_eq!("self_", field_name("self"));
        assert_eq!("r#async", field_name("async"));
        assert_eq!("user_id", field_name("user_id"));
    }

    #[test]
    fn field_name_camel_and_digit() {
        assert_eq!("is_closed", field_name("isClosed"));
        assert_eq!("n2fa_required", field_name("2fa_required"));
    }

    #[test]
    fn method_function_name() {
        let actual: String = field_name(&format!("{}{}", type_name("messages.getHistory"), "UserIds"));
        let expected: &str = "messages_get_history_user_ids";
        assert_eq!(expected, actual);
    }

    #[test]
    fn error_const_strips_prefix() {
        assert_eq!("UNKNOWN", error_const_name("api_error_unknown"));
        assert_eq!("ACCESS_DENIED", error_const_name("api_error_access_denied"));
        assert_eq!("OTHER", error_const_name("other"));
    }

    #[test]
    fn const_name_leading_digit() {
        assert_eq!("E1", const_name("1"));
        assert_eq!("FRIENDS_ONLY", const_name("friends only"));
    }

    #[test]
    fn variant_name_hyphenated() {
        let actual: String = variant_name("blackjack-a");
        let expected: &str = "BlackjackA";
        assert_eq!(expected, actual);
    }

    #[test]
    fn variant_name_numeric_prefix_gets_e_prefix() {
        let actual: String = variant_name("123");
        let expected: &str = "E123";
        assert_eq!(expected, actual);
    }

    #[test]
    fn variant_name_uppercase() {
        let actual: String = variant_name("PENDING");
        let expected: &str = "Pending";
        assert_eq!(expected, actual);
    }

    #[test]
    fn disambiguate_collisions() {
        let input: Vec<String> = vec![
            "Pending".to_string(),
            "Done".to_string(),
            "Pending".to_string(),
        ];
        let actual: Vec<String> = disambiguate(input);
        let expected: Vec<String> = vec![
            "Pending_0".to_string(),
            "Done".to_string(),
            "Pending_1".to_string(),
        ];
        assert_eq!(expected, actual);
    }

    #[test]
    fn disambiguate_skips_suffixes_already_taken() {
        let input: Vec<String> = vec![
            "photo".to_string(),
            "photo_0".to_string(),
            "photo".to_string(),
        ];
        let actual: Vec<String> = disambiguate(input);
        let expected: Vec<String> = vec![
            "photo_1".to_string(),
            "photo_0".to_string(),
            "photo_2".to_string(),
        ];
        assert_eq!(expected, actual);
    }

    #[test]
    fn arena_suffixes_taken_names() {
        let mut arena: NameArena = NameArena::new();
        assert_eq!("Foo", arena.claim("Foo"));
        assert_eq!("Foo2", arena.claim("Foo"));
        assert_eq!("Foo3", arena.claim("Foo"));
        assert!(arena.is_taken("Foo2"));
    }

    #[test]
    fn arena_nested_names_concatenate_path() {
        let mut arena: NameArena = NameArena::new();
        arena.claim("UsersUserType");
        assert_eq!("UsersUserType2", arena.claim_nested("UsersUser", "type"));
        assert_eq!("UsersUserCounters", arena.claim_nested("UsersUser", "counters"));
    }
}
