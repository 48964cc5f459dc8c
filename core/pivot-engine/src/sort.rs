//! FILENAME: core/pivot-engine/src/sort.rs
//! Smart label ordering for axis keys and group labels.
//!
//! Labels that both parse fully as numbers (no surrounding whitespace)
//! compare numerically. Everything else compares as natural, case-insensitive
//! text where runs of digits compare by numeric value ("Item2" < "Item10").
//! A final byte-wise tiebreak keeps the ordering total.

use crate::definition::SortOrder;
use std::cmp::Ordering;

/// Compares two labels with the smart comparator.
pub fn smart_compare(a: &str, b: &str) -> Ordering {
    let primary = match (parse_number(a), parse_number(b)) {
        (Some(na), Some(nb)) => na.total_cmp(&nb),
        _ => natural_compare(a, b),
    };
    primary.then_with(|| a.cmp(b))
}

/// Compares two labels under a sort order. `DataSourceOrder` treats every
/// pair as equal, so a stable sort keeps first-appearance order.
pub fn compare_in_order(a: &str, b: &str, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => smart_compare(a, b),
        SortOrder::Descending => smart_compare(b, a),
        SortOrder::DataSourceOrder => Ordering::Equal,
    }
}

/// Sorts labels in place. `DataSourceOrder` leaves the slice untouched.
pub fn sort_labels(labels: &mut [String], order: SortOrder) {
    labels.sort_by(|a, b| compare_in_order(a, b, order));
}

/// The whole label must be a finite number; surrounding whitespace makes it text.
fn parse_number(label: &str) -> Option<f64> {
    // Rust accepts "inf" and "NaN"; labels like that are text.
    label.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Natural, case-insensitive comparison. Digit runs compare by value.
fn natural_compare(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) if ac.is_ascii_digit() && bc.is_ascii_digit() => {
                let a_run = take_digits(&mut a_chars);
                let b_run = take_digits(&mut b_chars);
                match compare_digit_runs(&a_run, &b_run) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            (Some(ac), Some(bc)) => {
                a_chars.next();
                b_chars.next();
                match cmp_char_case_insensitive(ac, bc) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compares two digit runs by numeric value without parsing (no overflow).
/// Equal values with different zero padding are ordered shorter-first.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

fn cmp_char_case_insensitive(a: char, b: char) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase());
    }
    a.to_lowercase().cmp(b.to_lowercase())
}
