//! Identifier transforms shared by the templates and the file layout.
//!
//! Everything here is pure: the same input yields the same output on every
//! run, which keeps generated file names and type names stable.

use once_cell::sync::Lazy;
use regex::Regex;

/// Alphanumeric runs; everything else separates words.
static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("word regex should be valid"));

/// Words rendered fully uppercase by [`goify`].
const ACRONYMS: &[&str] = &[
    "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
    "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL",
    "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XSRF", "XSS",
];

/// Convert a PascalCase or camelCase name into a lowercase, underscore
/// separated file stem.
///
/// Only the first uppercase letter of a run gets a separator, so an acronym
/// stays in one segment: `HTTPServer` becomes `h_ttpserver`.
///
/// ```
/// use scaffoldgen::naming::to_file_stem;
/// assert_eq!(to_file_stem("SecuredService"), "secured_service");
/// assert_eq!(to_file_stem("AlsoDoublySecure"), "also_doubly_secure");
/// ```
pub fn to_file_stem(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = String::with_capacity(name.len() + 4);
    out.extend(first.to_lowercase());
    let mut last_underscore = false;
    for c in chars {
        if c.is_uppercase() {
            if !last_underscore {
                out.push('_');
                last_underscore = true;
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
            last_underscore = false;
        }
    }
    out
}

/// Turn an arbitrary name into a Go identifier.
///
/// Non-alphanumeric characters split words, each word is capitalized and
/// known acronyms are uppercased. With `first_upper` unset the first word is
/// lowercased instead, producing an unexported identifier.
pub fn goify(name: &str, first_upper: bool) -> String {
    let mut out = String::with_capacity(name.len());
    for (idx, word) in WORD_REGEX.find_iter(name).map(|m| m.as_str()).enumerate() {
        let upper = word.to_ascii_uppercase();
        if idx == 0 && !first_upper {
            out.push_str(&word.to_ascii_lowercase());
        } else if ACRONYMS.contains(&upper.as_str()) {
            out.push_str(&upper);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Package name holding the generated code of one API version.
///
/// `v1` stays `v1`, `1.0` becomes `v1_0`, `2015-01-30` becomes `v2015_01_30`.
pub fn version_package(version: &str) -> String {
    let mut pkg: String = version
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if pkg.starts_with(|c: char| c.is_ascii_digit()) {
        pkg.insert(0, 'v');
    }
    pkg
}

/// Controller type name for a resource rendered for one version.
///
/// `("Bottle", "v1")` gives `BottleV1Controller`; an empty version is left
/// out entirely, giving `BottleController`.
pub fn mangle(resource: &str, version: &str) -> String {
    let mut name = goify(resource, true);
    if !version.is_empty() {
        name.push_str(&capitalize(&version_package(version)));
    }
    name.push_str("Controller");
    name
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
