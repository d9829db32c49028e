//! Naming convention utilities for code generation.
//!
//! IDL names arrive in whatever case the schema author used. Generated Rust
//! uses `snake_case` for fields, methods and helper functions, `PascalCase`
//! for synthesized types and variants, and `SCREAMING_SNAKE_CASE` for enum
//! constants.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `DivByZero` | [`to_snake_case`] | `div_by_zero` |
//! | `div_by_zero` | [`to_pascal_case`] | `DivByZero` |
//! | `word` | [`capitalize`] | `Word` |
//! | `darkRed` | [`to_constant_case`] | `DARK_RED` |
//! | `type` | [`rust_ident`] | `r#type` |

/// Convert an identifier to snake_case.
///
/// Word boundaries are a lowercase letter or digit followed by an uppercase
/// letter, and the last letter of an uppercase run followed by a lowercase
/// letter. Dashes and spaces become underscores.
///
/// # Examples
///
/// ```
/// use idlgen_codegen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("DivByZero"), "div_by_zero");
/// assert_eq!(to_snake_case("HTTPServer"), "http_server");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            result.push('_');
            continue;
        }
        if !c.is_uppercase() {
            result.push(c);
            continue;
        }

        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };
        if boundary && !result.ends_with('_') {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Convert a string to PascalCase.
///
/// Handles snake_case, kebab-case, and already-capitalized input.
///
/// # Examples
///
/// ```
/// use idlgen_codegen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("hello-world"), "HelloWorld");
/// assert_eq!(to_pascal_case("getUser"), "GetUser");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_']).map(capitalize).collect()
}

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use idlgen_codegen::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert an identifier to SCREAMING_SNAKE_CASE for associated constants.
pub fn to_constant_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Names that cannot be raw identifiers
const RESERVED: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Make a name usable as a Rust identifier.
///
/// Keywords become raw identifiers; the few names that cannot be raw get a
/// trailing underscore.
///
/// # Examples
///
/// ```
/// use idlgen_codegen::naming::rust_ident;
///
/// assert_eq!(rust_ident("type"), "r#type");
/// assert_eq!(rust_ident("self"), "self_");
/// assert_eq!(rust_ident("value"), "value");
/// ```
pub fn rust_ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// snake_case a field or parameter name and make it a valid identifier
pub fn field_ident(name: &str) -> String {
    rust_ident(&to_snake_case(name))
}
