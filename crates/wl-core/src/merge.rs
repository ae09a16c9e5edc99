//! Merging new entries into an existing collection.
//!
//! Two entries are duplicates when they share a date and location and both
//! their start and end times lie within the configured tolerance of each
//! other. Descriptions never take part in that decision. Entries that overlap
//! on the same date without being duplicates are conflicts: they are kept,
//! and reported so someone can look at them.

use std::collections::BTreeSet;

use chrono::Duration;

use crate::entry::TimeEntry;

/// Default duplicate tolerance in minutes.
pub const DEFAULT_TOLERANCE_MINUTES: i64 = 5;

/// Knobs for [`merge_entries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeConfig {
    /// Maximum start/end difference for two entries to count as the same.
    /// Negative values are treated as their absolute value.
    pub tolerance: Duration,

    /// When set, duplicates whose descriptions are less similar than this
    /// (word-set Jaccard index, 0.0-1.0) are listed in
    /// [`MergeReport::divergent_descriptions`]. They are still dropped.
    pub similarity_threshold: Option<f64>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tolerance: Duration::minutes(DEFAULT_TOLERANCE_MINUTES),
            similarity_threshold: None,
        }
    }
}

/// An accepted entry that overlaps one already in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The entry that was there first (existing, or accepted earlier in the
    /// same merge).
    pub existing: TimeEntry,
    pub incoming: TimeEntry,
}

/// A dropped duplicate whose description differs from the one kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergentDuplicate {
    pub kept: TimeEntry,
    pub dropped: TimeEntry,
    pub similarity: f64,
}

/// Counters and findings of a merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub before_count: usize,
    pub after_count: usize,
    pub added_count: usize,
    pub duplicates_removed_count: usize,
    pub conflicts: Vec<Conflict>,
    pub divergent_descriptions: Vec<DivergentDuplicate>,
}

/// The merged collection together with its report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Sorted by `(date, start)`; ties keep their original relative order.
    pub entries: Vec<TimeEntry>,
    pub report: MergeReport,
}

/// Same date, same location, start and end each within `tolerance`.
pub fn is_duplicate(a: &TimeEntry, b: &TimeEntry, tolerance: Duration) -> bool {
    let tolerance = tolerance.abs();
    a.date() == b.date()
        && a.location_code() == b.location_code()
        && (a.start() - b.start()).abs() <= tolerance
        && (a.end() - b.end()).abs() <= tolerance
}

/// Same date, overlapping ranges, and not a duplicate.
pub fn is_conflict(a: &TimeEntry, b: &TimeEntry, tolerance: Duration) -> bool {
    a.overlaps(b) && !is_duplicate(a, b, tolerance)
}

/// Jaccard index of the lowercase word sets of two descriptions.
///
/// Two empty descriptions are identical (1.0); one empty and one not share
/// nothing (0.0).
#[allow(clippy::cast_precision_loss)]
pub fn description_similarity(a: &str, b: &str) -> f64 {
    let words = |text: &str| -> BTreeSet<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    };
    let (a, b) = (words(a), words(b));
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = a.intersection(&b).count();
    let union = a.union(&b).count();
    shared as f64 / union as f64
}

/// Merges `incoming` into `existing`.
///
/// Incoming entries are visited in order and compared against the existing
/// entries plus the incoming entries accepted so far, so duplicates inside
/// `incoming` are removed as well. Neither input is modified.
pub fn merge_entries(
    existing: &[TimeEntry],
    incoming: &[TimeEntry],
    config: &MergeConfig,
) -> MergeOutcome {
    let tolerance = config.tolerance.abs();
    let mut accepted: Vec<TimeEntry> = Vec::new();
    let mut report = MergeReport {
        before_count: existing.len(),
        ..MergeReport::default()
    };

    for candidate in incoming {
        let known = || existing.iter().chain(accepted.iter());

        if let Some(original) = known().find(|e| is_duplicate(e, candidate, tolerance)) {
            tracing::debug!(entry = %candidate, "dropping duplicate");
            report.duplicates_removed_count += 1;
            if let Some(threshold) = config.similarity_threshold {
                let similarity =
                    description_similarity(original.description(), candidate.description());
                if similarity < threshold {
                    report.divergent_descriptions.push(DivergentDuplicate {
                        kept: original.clone(),
                        dropped: candidate.clone(),
                        similarity,
                    });
                }
            }
            continue;
        }

        for other in known().filter(|e| is_conflict(e, candidate, tolerance)) {
            tracing::debug!(existing = %other, incoming = %candidate, "overlapping entries");
            report.conflicts.push(Conflict {
                existing: other.clone(),
                incoming: candidate.clone(),
            });
        }

        accepted.push(candidate.clone());
        report.added_count += 1;
    }

    let mut entries: Vec<TimeEntry> = existing.iter().cloned().chain(accepted).collect();
    entries.sort_by_key(|e| (e.date(), e.start()));
    report.after_count = entries.len();

    tracing::debug!(
        before = report.before_count,
        after = report.after_count,
        added = report.added_count,
        duplicates = report.duplicates_removed_count,
        conflicts = report.conflicts.len(),
        "merged entries"
    );
    MergeOutcome { entries, report }
}

/// Merges several incoming collections one after another.
///
/// Each source is merged into the result of the previous one; counters are
/// summed and findings concatenated in source order.
pub fn merge_many(
    existing: &[TimeEntry],
    sources: &[Vec<TimeEntry>],
    config: &MergeConfig,
) -> MergeOutcome {
    let mut total = MergeOutcome {
        entries: existing.to_vec(),
        report: MergeReport {
            before_count: existing.len(),
            after_count: existing.len(),
            ..MergeReport::default()
        },
    };

    for source in sources {
        let step = merge_entries(&total.entries, source, config);
        total.report.added_count += step.report.added_count;
        total.report.duplicates_removed_count += step.report.duplicates_removed_count;
        total.report.conflicts.extend(step.report.conflicts);
        total
            .report
            .divergent_descriptions
            .extend(step.report.divergent_descriptions);
        total.report.after_count = step.report.after_count;
        total.entries = step.entries;
    }

    if sources.is_empty() {
        total.entries.sort_by_key(|e| (e.date(), e.start()));
    }
    total
}

/// Pairs of entries within one collection that overlap on the same date.
///
/// Pairs are ordered by the `(date, start)` of their first element.
pub fn find_overlaps(entries: &[TimeEntry]) -> Vec<(TimeEntry, TimeEntry)> {
    let mut sorted: Vec<&TimeEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| (e.date(), e.start()));

    let mut pairs = Vec::new();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            if b.date() != a.date() || b.start() >= a.end() {
                break;
            }
            pairs.push(((*a).clone(), (*b).clone()));
        }
    }
    pairs
}
