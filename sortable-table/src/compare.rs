//! Comparator library.
//!
//! Every comparator here is a total order so it can feed a stable slice sort
//! directly. Sort direction is never handled here: callers reverse the
//! returned [`Ordering`] for descending order.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::model::SortType;
use crate::sort::SortDirection;

/// Russian alphabet in collation order. `ё` is a secondary variant of `е`.
const CYRILLIC_ALPHABET: &str = "абвгдежзийклмнопрстуфхцчшщъыьэюя";

/// Latin letters with diacritics folded onto their base letter.
///
/// The position inside each variant list is the secondary weight.
const LATIN_VARIANTS: &[(char, &str)] = &[
    ('a', "àáâãäåā"),
    ('c', "çćč"),
    ('e', "èéêëēě"),
    ('i', "ìíîïī"),
    ('n', "ñń"),
    ('o', "òóôõöøō"),
    ('s', "šś"),
    ('u', "ùúûüū"),
    ('y', "ýÿ"),
    ('z', "žźż"),
];

/// Compare two cell values with the comparator for `sort_type`.
pub fn compare(a: &Value, b: &Value, sort_type: SortType) -> Ordering {
    match sort_type {
        SortType::String => compare_strings(&cell_text(a), &cell_text(b)),
        SortType::Number => compare_cells_numeric(cell_number(a), cell_number(b)),
    }
}

/// Compare two numbers by the sign of their difference.
pub fn compare_numbers(a: f64, b: f64) -> Ordering {
    let diff = a - b;
    if diff > 0.0 {
        Ordering::Greater
    } else if diff < 0.0 {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Compare two strings with the fixed ru+en collation, uppercase first.
///
/// Three levels are compared in turn:
/// 1. character class (whitespace, punctuation, symbols, digits, Cyrillic,
///    Latin, other) and case-folded base letter,
/// 2. diacritics (`е` before `ё`, `e` before `é`),
/// 3. case, with uppercase before lowercase.
///
/// The result does not depend on the platform locale.
pub fn compare_strings(a: &str, b: &str) -> Ordering {
    let keys_a: Vec<CollationKey> = a.chars().map(CollationKey::of).collect();
    let keys_b: Vec<CollationKey> = b.chars().map(CollationKey::of).collect();

    let primary = keys_a
        .iter()
        .map(CollationKey::primary)
        .cmp(keys_b.iter().map(CollationKey::primary));
    if primary != Ordering::Equal {
        return primary;
    }

    let secondary = keys_a
        .iter()
        .map(|k| k.secondary)
        .cmp(keys_b.iter().map(|k| k.secondary));
    if secondary != Ordering::Equal {
        return secondary;
    }

    keys_a
        .iter()
        .map(|k| k.tertiary)
        .cmp(keys_b.iter().map(|k| k.tertiary))
}

/// Sort strings in the given direction, returning a new vector.
pub fn sort_strings<S: AsRef<str>>(values: &[S], direction: SortDirection) -> Vec<String> {
    let mut sorted: Vec<String> = values.iter().map(|s| s.as_ref().to_string()).collect();
    sorted.sort_by(|a, b| direction.apply(compare_strings(a, b)));
    sorted
}

/// Missing and non-numeric cells order before every number.
fn compare_cells_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_numbers(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cell_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

fn cell_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!number.is_nan()).then_some(number)
}

/// Character class, ordered as the collation orders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Symbol,
    Digit,
    Cyrillic,
    Latin,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct CollationKey {
    class: CharClass,
    weight: u32,
    secondary: u8,
    tertiary: u8,
}

impl CollationKey {
    fn of(c: char) -> Self {
        let tertiary = u8::from(c.is_lowercase());
        let lower = c.to_lowercase().next().unwrap_or(c);

        let (class, weight, secondary) = if c.is_whitespace() {
            (CharClass::Whitespace, c as u32, 0)
        } else if let Some(digit) = c.to_digit(10) {
            (CharClass::Digit, digit, 0)
        } else if c.is_numeric() {
            (CharClass::Digit, 10 + c as u32, 0)
        } else if is_cyrillic(lower) {
            let (weight, secondary) = cyrillic_weight(lower);
            (CharClass::Cyrillic, weight, secondary)
        } else if let Some((weight, secondary)) = latin_weight(lower) {
            (CharClass::Latin, weight, secondary)
        } else if c.is_alphabetic() {
            (CharClass::Other, lower as u32, 0)
        } else if is_symbol(c) {
            (CharClass::Symbol, c as u32, 0)
        } else {
            (CharClass::Punctuation, c as u32, 0)
        };

        Self {
            class,
            weight,
            secondary,
            tertiary,
        }
    }

    fn primary(&self) -> (CharClass, u32) {
        (self.class, self.weight)
    }
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

fn cyrillic_weight(c: char) -> (u32, u8) {
    if c == 'ё' {
        return (position(CYRILLIC_ALPHABET, 'е'), 1);
    }
    match CYRILLIC_ALPHABET.chars().position(|letter| letter == c) {
        Some(index) => (index as u32, 0),
        // Letters outside the Russian alphabet follow it in code point order.
        None => (100 + c as u32, 0),
    }
}

fn latin_weight(c: char) -> Option<(u32, u8)> {
    if c.is_ascii_lowercase() {
        return Some((c as u32 - 'a' as u32, 0));
    }
    for (base, variants) in LATIN_VARIANTS {
        if let Some(index) = variants.chars().position(|variant| variant == c) {
            return Some((*base as u32 - 'a' as u32, index as u8 + 1));
        }
    }
    if ('\u{00C0}'..='\u{024F}').contains(&c) && c.is_alphabetic() {
        return Some((100 + c as u32, 0));
    }
    None
}

fn is_symbol(c: char) -> bool {
    matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~')
        || (!c.is_ascii() && !c.is_alphanumeric() && !is_general_punctuation(c))
}

fn is_general_punctuation(c: char) -> bool {
    ('\u{2010}'..='\u{2027}').contains(&c)
        || matches!(c, '«' | '»' | '¡' | '¿' | '§' | '¶' | '·')
}

fn position(alphabet: &str, c: char) -> u32 {
    alphabet
        .chars()
        .position(|letter| letter == c)
        .map_or(u32::MAX, |index| index as u32)
}
