//! Final accounting of a pool run.
//!
//! A `Report` is the only place correctness violations surface. A run is
//! consistent when the queue drained and every order was completed exactly
//! once.

use std::collections::HashSet;
use std::fmt;

use crate::queue::WorkQueue;
use crate::sink::ResultSink;
use crate::Item;

/// Counts observed after every worker has been joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Orders still pending in the queue.
    pub remaining_in_queue: usize,
    /// Completions recorded, duplicates included.
    pub total_completed: usize,
    /// Distinct orders among the completions.
    pub unique_completed: usize,
    /// `total_completed - unique_completed`.
    pub duplicate_count: usize,
}

/// One broken equality in a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The queue still held orders at termination.
    Pending { remaining: usize },
    /// Fewer distinct orders were completed than were created.
    Lost { expected: usize, unique: usize },
    /// The same order was recorded more than once.
    Duplicated { count: usize },
    /// The raw completion count differs from the number of orders.
    Miscounted { expected: usize, total: usize },
}

impl Report {
    /// Builds a report from the queue and sink a pool ran against.
    pub fn collect(queue: &dyn WorkQueue, sink: &dyn ResultSink) -> Self {
        let total_completed = sink.count();
        let unique_completed = sink.unique_count();
        Self {
            remaining_in_queue: queue.size(),
            total_completed,
            unique_completed,
            duplicate_count: total_completed.saturating_sub(unique_completed),
        }
    }

    /// Builds a report from a pending count and the raw list of completions.
    pub fn from_completions(remaining_in_queue: usize, completed: &[Item]) -> Self {
        let unique_completed = completed.iter().collect::<HashSet<_>>().len();
        Self {
            remaining_in_queue,
            total_completed: completed.len(),
            unique_completed,
            duplicate_count: completed.len() - unique_completed,
        }
    }

    /// Lists every equality this report breaks for a run of `expected` orders.
    pub fn violations(&self, expected: usize) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.remaining_in_queue != 0 {
            violations.push(Violation::Pending {
                remaining: self.remaining_in_queue,
            });
        }
        if self.unique_completed != expected {
            violations.push(Violation::Lost {
                expected,
                unique: self.unique_completed,
            });
        }
        if self.duplicate_count != 0 {
            violations.push(Violation::Duplicated {
                count: self.duplicate_count,
            });
        }
        if self.total_completed != expected {
            violations.push(Violation::Miscounted {
                expected,
                total: self.total_completed,
            });
        }

        violations
    }

    pub fn is_consistent(&self, expected: usize) -> bool {
        self.violations(expected).is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orders remaining in queue: {}", self.remaining_in_queue)?;
        writeln!(f, "Total orders completed: {}", self.total_completed)?;
        writeln!(f, "Unique orders completed: {}", self.unique_completed)?;
        write!(f, "Duplicate orders: {}", self.duplicate_count)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Pending { remaining } => {
                write!(f, "{} orders left in the queue", remaining)
            }
            Violation::Lost { expected, unique } => {
                write!(f, "{} of {} orders completed", unique, expected)
            }
            Violation::Duplicated { count } => {
                write!(f, "{} duplicate completions", count)
            }
            Violation::Miscounted { expected, total } => {
                write!(f, "{} completions recorded, expected {}", total, expected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::LockedQueue;
    use crate::sink::LockedSink;

    #[test]
    fn clean_run_has_no_violations() {
        let completed: Vec<Item> = (0..10).rev().collect();
        let report = Report::from_completions(0, &completed);

        assert_eq!(
            report,
            Report {
                remaining_in_queue: 0,
                total_completed: 10,
                unique_completed: 10,
                duplicate_count: 0,
            }
        );
        assert!(report.is_consistent(10));
    }

    #[test]
    fn empty_run_is_consistent() {
        let report = Report::from_completions(0, &[]);
        assert_eq!(report, Report::default());
        assert!(report.is_consistent(0));
    }

    #[test]
    fn duplicates_and_losses_are_both_reported() {
        // Order 0 done twice, orders 2 and 3 never done, order 3 still queued.
        let report = Report::from_completions(1, &[0, 0, 1]);

        assert_eq!(
            report.violations(4),
            vec![
                Violation::Pending { remaining: 1 },
                Violation::Lost {
                    expected: 4,
                    unique: 2
                },
                Violation::Duplicated { count: 1 },
                Violation::Miscounted {
                    expected: 4,
                    total: 3
                },
            ]
        );
    }

    #[test]
    fn collect_reads_queue_and_sink() {
        let queue = LockedQueue::new();
        queue.push(7).unwrap();
        let sink = LockedSink::new();
        sink.record_all(&[1, 2, 2]);

        let report = Report::collect(&queue, &sink);
        assert_eq!(report.remaining_in_queue, 1);
        assert_eq!(report.total_completed, 3);
        assert_eq!(report.unique_completed, 2);
        assert_eq!(report.duplicate_count, 1);
    }

    #[test]
    fn display_lists_all_four_counts() {
        let report = Report {
            remaining_in_queue: 0,
            total_completed: 100,
            unique_completed: 100,
            duplicate_count: 0,
        };
        assert_eq!(
            report.to_string(),
            "Orders remaining in queue: 0\n\
             Total orders completed: 100\n\
             Unique orders completed: 100\n\
             Duplicate orders: 0"
        );
    }
}
