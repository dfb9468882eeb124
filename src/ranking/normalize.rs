//! Canonical form of mod titles.
//!
//! Catalog titles append the supported loader(s) to tell apart otherwise
//! identical listings ("JEI (Fabric)", "Sodium - Forge/NeoForge"). That
//! decoration is stripped so loader variants compare equal to a loader-agnostic
//! user query.

use crate::core::ModLoader;

/// Trailing symbols left behind once a loader clause is removed
const CONNECTOR_SYMBOLS: [char; 4] = ['&', '|', '/', '-'];

/// Trailing words left behind once a loader clause is removed
const CONNECTOR_WORDS: [&str; 2] = ["and", "or"];

/// Reduce a raw mod title to its canonical comparable form.
///
/// Lowercases, collapses whitespace, drops bracketed/parenthesized spans that
/// mention a loader, then strips trailing loader names and connector tokens
/// until neither rule applies. The result may be empty.
pub fn normalize(raw: &str) -> String {
    let mut name = collapse_whitespace(&raw.to_lowercase());

    loop {
        let stripped = collapse_whitespace(&strip_loader_brackets(&name));
        if stripped == name {
            break;
        }
        name = stripped;
    }

    strip_trailing_decoration(&mut name);
    name
}

/// Remove every whitespace character, used for spacing-insensitive comparison
pub fn without_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn mentions_loader(span: &str) -> bool {
    ModLoader::ALL
        .iter()
        .any(|loader| span.contains(loader.as_str()))
}

/// Drop `(...)` and `[...]` spans whose content names a loader.
///
/// Spans are not nested: an opener pairs with the first closer of the same
/// kind after it. Unclosed openers are kept as plain text.
fn strip_loader_brackets(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(open) = rest.find(|c: char| c == '(' || c == '[') {
        let close_char = if rest[open..].starts_with('(') { ')' } else { ']' };
        out.push_str(&rest[..open]);

        match rest[open + 1..].find(close_char) {
            Some(offset) => {
                let close = open + 1 + offset;
                if !mentions_loader(&rest[open + 1..close]) {
                    out.push_str(&rest[open..=close]);
                }
                rest = &rest[close + 1..];
            }
            None => {
                out.push_str(&rest[open..=open]);
                rest = &rest[open + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Alternate loader-suffix and connector stripping until a fixed point.
fn strip_trailing_decoration(name: &mut String) {
    // Every productive pass shortens the name; the bound only caps a stalled loop.
    for _ in 0..=name.len() {
        let before = name.len();
        strip_loader_suffix(name);
        strip_connectors(name);
        if name.len() == before {
            break;
        }
    }
}

fn trim_end_in_place(name: &mut String) {
    let len = name.trim_end().len();
    name.truncate(len);
}

/// `word` sits at the very end of `name` and starts on a word boundary
fn ends_with_word(name: &str, word: &str) -> bool {
    if !name.ends_with(word) {
        return false;
    }
    name[..name.len() - word.len()]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Strip one trailing loader name plus any `-`/`:` separator before it
fn strip_loader_suffix(name: &mut String) -> bool {
    trim_end_in_place(name);

    let Some(loader) = ModLoader::ALL
        .iter()
        .map(|loader| loader.as_str())
        .find(|loader| ends_with_word(name, loader))
    else {
        return false;
    };

    name.truncate(name.len() - loader.len());
    let kept = name
        .trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == ':')
        .len();
    name.truncate(kept);
    true
}

/// Strip trailing connector tokens (`&`, `|`, `/`, `-`, `and`, `or`)
fn strip_connectors(name: &mut String) -> bool {
    let start = name.len();

    loop {
        trim_end_in_place(name);
        if name.ends_with(|c: char| CONNECTOR_SYMBOLS.contains(&c)) {
            name.pop();
        } else if let Some(word) = CONNECTOR_WORDS
            .iter()
            .find(|word| ends_with_word(name, word))
        {
            name.truncate(name.len() - word.len());
        } else {
            break;
        }
    }

    name.len() != start
}
