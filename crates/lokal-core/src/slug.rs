//! Conversion between human display names and URL-safe slugs.
//!
//! `to_slug` is the only authoritative direction. `to_display` is a lossy
//! best-effort fallback used while the canonical directory record is not
//! available; it must never be preferred over `LocationRecord::name`.

/// Converts a display name into a URL slug.
///
/// Lowercases, folds common Latin diacritics (`ñ` → `n`, `á` → `a`),
/// turns whitespace, `-` and `_` runs into a single hyphen, and drops every
/// other character outside `[a-z0-9]`. Leading and trailing hyphens are
/// trimmed, so the result is idempotent: `to_slug(&to_slug(x)) == to_slug(x)`.
#[must_use]
pub fn to_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.trim().chars().flat_map(char::to_lowercase) {
        let c = fold_diacritic(c);
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    out
}

/// Derives a title-cased display name from a slug.
///
/// `"davao-del-norte"` becomes `"Davao Del Norte"`. Lossy: the canonical
/// name is `"Davao del Norte"`.
#[must_use]
pub fn to_display(slug: &str) -> String {
    slug.split('-')
        .filter(|segment| !segment.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` when two slugs (or names) normalize to the same slug.
///
/// The listing service accepts any letter case in location segments, so
/// `DAVAO-DEL-NORTE` and `davao-del-norte` refer to the same province.
#[must_use]
pub fn slugs_match(a: &str, b: &str) -> bool {
    let a = to_slug(a);
    !a.is_empty() && a == to_slug(b)
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
#[path = "slug_test.rs"]
mod tests;
