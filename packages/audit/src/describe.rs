//! # Change Descriptions
//!
//! Turns before/after snapshots into one line of prose for the audit trail.
//!
//! ```text
//! create   Created Article II: "Membership"
//! update   Updated Section 3: changed title from "Dues" to "Fees", added content (42 characters)
//! delete   Deleted Amendment 1
//! reorder  Reordered Section 2 from position 2 to 1
//! ```
//!
//! Names come from the counters carried in the snapshot. Positional numbering
//! at the time of the change cannot be reconstructed from a flat snapshot, so
//! subsections are named by type alone.

use crate::snapshot::{ChangeKind, SectionSnapshot};
use constitution_model::SectionType;
use constitution_numbering::roman_numeral;

/// Lightweight name for a snapshot ("Article IV", "Section 2", "Subsection")
pub fn display_name(snapshot: &SectionSnapshot) -> String {
    let label = snapshot.section_type.label();
    let number = match snapshot.section_type {
        SectionType::Preamble | SectionType::Subsection => None,
        SectionType::Article => snapshot.article_number.and_then(roman_numeral),
        SectionType::Section => snapshot.section_number.map(|n| n.to_string()),
        SectionType::Amendment => snapshot.amendment_number.map(|n| n.to_string()),
    };

    match number {
        Some(number) => format!("{} {}", label, number),
        None => label.to_string(),
    }
}

/// Human-readable description of one change
pub fn describe_change(
    kind: ChangeKind,
    before: Option<&SectionSnapshot>,
    after: Option<&SectionSnapshot>,
) -> String {
    let subject = match kind {
        ChangeKind::Delete => before.or(after),
        _ => after.or(before),
    };
    let name = subject
        .map(display_name)
        .unwrap_or_else(|| "section".to_string());

    match kind {
        ChangeKind::Create => with_title("Created", &name, subject),
        ChangeKind::Delete => with_title("Deleted", &name, subject),
        ChangeKind::Update => {
            let fragments = match (before, after) {
                (Some(before), Some(after)) => diff_fragments(before, after),
                _ => Vec::new(),
            };
            if fragments.is_empty() {
                format!("Updated {}", name)
            } else {
                format!("Updated {}: {}", name, fragments.join(", "))
            }
        }
        ChangeKind::Reorder => match (before, after) {
            (Some(before), Some(after)) => format!(
                "Reordered {} from position {} to {}",
                name,
                format_order(before.order),
                format_order(after.order)
            ),
            _ => format!("Reordered {}", name),
        },
    }
}

fn with_title(verb: &str, name: &str, subject: Option<&SectionSnapshot>) -> String {
    match subject.and_then(|s| s.title_text()) {
        Some(title) => format!("{} {}: \"{}\"", verb, name, title),
        None => format!("{} {}", verb, name),
    }
}

/// Field-by-field differences, in title, content, type, order sequence
pub fn diff_fragments(before: &SectionSnapshot, after: &SectionSnapshot) -> Vec<String> {
    let mut fragments = Vec::new();

    match (before.title_text(), after.title_text()) {
        (None, Some(new)) => fragments.push(format!("added title \"{}\"", new)),
        (Some(old), None) => fragments.push(format!("removed title \"{}\"", old)),
        (Some(old), Some(new)) if old != new => {
            fragments.push(format!("changed title from \"{}\" to \"{}\"", old, new))
        }
        _ => {}
    }

    if before.content != after.content {
        fragments.push(describe_content_change(&before.content, &after.content));
    }

    if before.section_type != after.section_type {
        fragments.push(format!(
            "changed type from \"{}\" to \"{}\"",
            before.section_type, after.section_type
        ));
    }

    if before.order != after.order {
        fragments.push(format!(
            "changed position from {} to {}",
            format_order(before.order),
            format_order(after.order)
        ));
    }

    fragments
}

fn describe_content_change(before: &str, after: &str) -> String {
    let old_len = before.chars().count();
    let new_len = after.chars().count();

    match (old_len, new_len) {
        (0, n) => format!("added content ({} characters)", n),
        (n, 0) => format!("removed all content (was {} characters)", n),
        (old, new) => {
            let delta = new as i64 - old as i64;
            format!("modified content ({} → {} characters, {:+})", old, new, delta)
        }
    }
}

/// Orders are floats; whole values print without a fractional part
pub fn format_order(order: f64) -> String {
    if order.is_finite() && order.fract() == 0.0 && order.abs() < 1e15 {
        format!("{}", order as i64)
    } else {
        format!("{}", order)
    }
}
