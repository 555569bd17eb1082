//! String transformation utilities for script generation

/// Convert a parameter name to a lowercase, underscore delimited shell identifier
///
/// Hyphens and any other character that cannot appear in a shell variable
/// become underscores. A leading digit gets an underscore prefix.
pub fn to_snake_identifier(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Convert a delimited name to PascalCase
///
/// Every run of non-alphanumeric characters separates words. The first
/// character of each word is upper-cased and the rest is kept as is, so
/// `petId` becomes `PetId` and `x-request-id` becomes `XRequestId`.
pub fn to_pascal_case(s: &str) -> String {
    let result: String = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect();

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", result)
    } else {
        result
    }
}

/// Convert a route such as `/pet/{petId}` to PascalCase (`PetPetId`)
pub fn route_to_pascal_case(route: &str) -> String {
    route
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(to_pascal_case)
        .collect()
}

/// Upper-case the first character of a string
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Trim a string and collapse every whitespace run, newlines included, to one space
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
