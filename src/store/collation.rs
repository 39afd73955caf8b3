//! Locale-aware ordering of text fields.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// How a sort compares string values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Collation {
    /// Plain code point order
    #[default]
    Binary,
    /// Human order for the given locale tag (e.g. `ja`)
    Locale(String),
}

impl Collation {
    pub fn locale(tag: impl Into<String>) -> Self {
        Collation::Locale(tag.into())
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Binary => a.cmp(b),
            Collation::Locale(tag) => sort_key(tag, a)
                .cmp(&sort_key(tag, b))
                .then_with(|| variant_key(tag, a).cmp(&variant_key(tag, b)))
                .then_with(|| a.cmp(b)),
        }
    }

    /// ICU collation name understood by PostgreSQL, if the tag is safe to inline.
    pub fn icu_name(&self) -> Option<String> {
        match self {
            Collation::Binary => None,
            Collation::Locale(tag) => {
                let valid = !tag.is_empty()
                    && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                valid.then(|| format!("{}-x-icu", tag.replace('_', "-")))
            }
        }
    }
}

/// Primary comparison key for `value` under `tag`.
///
/// Width variants are unified and case is folded for every locale. Japanese
/// also compares kana by base letter: katakana folds onto hiragana, voiced
/// and semi-voiced marks are dropped and small kana count as full-size, so
/// ば sorts with は and っ with つ until the rest of the word is compared.
pub fn sort_key(tag: &str, value: &str) -> String {
    if is_japanese(tag) {
        value
            .nfkd()
            .filter(|c| !matches!(c, '\u{3099}' | '\u{309A}'))
            .map(katakana_to_hiragana)
            .map(small_to_full_kana)
            .flat_map(char::to_lowercase)
            .collect()
    } else {
        value.nfkd().flat_map(char::to_lowercase).collect()
    }
}

/// Tie-break among equal primary keys: marks and letter size count again,
/// script and width still do not.
fn variant_key(tag: &str, value: &str) -> String {
    let normalized = value.nfkc().flat_map(char::to_lowercase);
    if is_japanese(tag) {
        normalized.map(katakana_to_hiragana).collect()
    } else {
        normalized.collect()
    }
}

fn is_japanese(tag: &str) -> bool {
    tag == "ja" || tag.starts_with("ja-") || tag.starts_with("ja_")
}

fn katakana_to_hiragana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        '\u{30FD}' | '\u{30FE}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    }
}

fn small_to_full_kana(c: char) -> char {
    match c {
        'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'っ' | 'ゃ' | 'ゅ' | 'ょ' | 'ゎ' => {
            char::from_u32(c as u32 + 1).unwrap_or(c)
        }
        'ゕ' => 'か',
        'ゖ' => 'け',
        _ => c,
    }
}
