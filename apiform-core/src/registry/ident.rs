/// JavaScript and TypeScript reserved words that can't name a
/// generated binding.
const KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Members that every generated client defines alongside its endpoint
/// methods, and names that JavaScript object literals treat specially.
const RESERVED_MEMBERS: &[&str] = &["refreshAuth", "updateAuthCallbacks", "__proto__"];

/// Returns `true` if `s` can be used verbatim as a JavaScript binding:
/// it's a syntactically valid identifier, and not a reserved word.
pub fn is_valid_identifier(s: &str) -> bool {
    is_identifier_like(s) && !KEYWORDS.contains(&s)
}

/// Returns `true` if `s` can name an endpoint. Endpoint names are only
/// used as property keys, or combined with a prefix, suffix, or
/// capitalized, so reserved words are fine; client members aren't.
pub fn is_valid_endpoint_name(s: &str) -> bool {
    is_identifier_like(s) && !RESERVED_MEMBERS.contains(&s)
}

/// Returns `true` if `s` is a syntactically valid JavaScript identifier.
/// Reserved words are allowed, since callers use this for fragments
/// that are combined with other text.
pub fn is_identifier_like(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '$' || c == '_' || unicode_ident::is_xid_start(c))
        && is_identifier_continue(chars.as_str())
}

/// Returns `true` if every character of `s` may continue a JavaScript
/// identifier. The empty string qualifies.
pub fn is_identifier_continue(s: &str) -> bool {
    s.chars()
        .all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("getUser"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("$store"));
        assert!(is_valid_identifier("café"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("get-user"));
        assert!(!is_valid_identifier("1user"));
        assert!(!is_valid_identifier("get user"));
    }

    #[test]
    fn test_keywords_are_invalid() {
        assert!(!is_valid_identifier("delete"));
        assert!(!is_valid_identifier("new"));
        assert!(is_identifier_like("delete"));
    }

    #[test]
    fn test_endpoint_names() {
        assert!(is_valid_endpoint_name("getUser"));
        assert!(is_valid_endpoint_name("delete"));
        assert!(is_valid_endpoint_name("new"));
        assert!(!is_valid_endpoint_name("get-user"));
        assert!(!is_valid_endpoint_name("refreshAuth"));
        assert!(!is_valid_endpoint_name("updateAuthCallbacks"));
        assert!(!is_valid_endpoint_name("__proto__"));
    }

    #[test]
    fn test_identifier_continue() {
        assert!(is_identifier_continue(""));
        assert!(is_identifier_continue("Action"));
        assert!(is_identifier_continue("2"));
        assert!(!is_identifier_continue("-action"));
    }
}
