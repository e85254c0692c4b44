//! Ordering of free-form version labels.
//!
//! Labels are split on every run of non-digit characters and the remaining
//! digit groups are compared as integers, left to right. If all shared groups
//! are equal, the label with more groups is the greater one. So `10.0` sorts
//! above `2.10`, which sorts above `2.0` and `1.1`.

use common::model::legal::LegalDocumentVersion;
use std::cmp::Ordering;

fn components(label: &str) -> impl Iterator<Item = &str> {
    label
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let trimmed = part.trim_start_matches('0');
            if trimmed.is_empty() {
                "0"
            } else {
                trimmed
            }
        })
}

/// Integer comparison of two digit strings without leading zeros, of any length.
fn compare_component(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

pub fn compare_version_labels(a: &str, b: &str) -> Ordering {
    let mut left = components(a);
    let mut right = components(b);
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => match compare_component(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Sorts versions newest label first. Labels that compare equal fall back to
/// the most recently created first, then to the raw label.
pub fn sort_history(versions: &mut [LegalDocumentVersion]) {
    versions.sort_by(|a, b| {
        compare_version_labels(&b.version_label, &a.version_label)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.version_label.cmp(&a.version_label))
    });
}
