//! Name ordering for directories and merge candidates.

use std::cmp::Ordering;

use mdparts_shared::SortOrder;

/// Compare two file or directory names under the given ordering.
///
/// `Lexical` is ordinal (byte-wise on UTF-8, i.e. code point order).
/// `Natural` compares ASCII digit runs by value; names that only differ in
/// zero padding (`01` vs `1`) fall back to the lexical order so the result
/// is total.
pub fn compare_names(a: &str, b: &str, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Lexical => a.cmp(b),
        SortOrder::Natural => natural_cmp(a, b).then_with(|| a.cmp(b)),
    }
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((true, x)), Some((true, y))) => match cmp_digits(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (Some((_, x)), Some((_, y))) => match x.cmp(y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Compare two runs of ASCII digits by numeric value, without parsing.
fn cmp_digits(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Split a name into maximal runs of digits and non-digits.
/// Yields `(is_digit_run, text)`.
fn chunks(s: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let digit = rest.chars().next()?.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some((digit, head))
    })
}
