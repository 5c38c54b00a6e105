//! Puts results from the worker pool back into (year, day, part) order
//!
//! Expected keys and early arrivals each sit in a min-heap; a result is
//! released once it is the smallest key still outstanding.

use crate::executor::SolverResult;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

/// Min-heap entry keyed by [`ResultKey`]
struct OrderedResult(SolverResult);

impl Ord for OrderedResult {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        ResultKey::from(&other.0).cmp(&ResultKey::from(&self.0))
    }
}

impl PartialOrd for OrderedResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for OrderedResult {}

impl PartialEq for OrderedResult {
    fn eq(&self, other: &Self) -> bool {
        ResultKey::from(&self.0) == ResultKey::from(&other.0)
    }
}

/// Aggregator that buffers results and emits them in sorted order
pub struct ResultAggregator {
    /// Min-heap of expected keys (next to output is at top)
    expected: BinaryHeap<Reverse<ResultKey>>,
    /// Min-heap of received results waiting to be output
    pending: BinaryHeap<OrderedResult>,
}

impl ResultAggregator {
    /// Create aggregator from list of expected keys
    pub fn new(expected_keys: Vec<ResultKey>) -> Self {
        Self {
            expected: expected_keys.into_iter().map(Reverse).collect(),
            pending: BinaryHeap::new(),
        }
    }

    /// Add a result and return any results ready for output (in order)
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.push(OrderedResult(result));

        // Emit results while pending min matches expected min
        let mut ready = Vec::new();
        while let (Some(Reverse(next_expected)), Some(top_pending)) =
            (self.expected.peek(), self.pending.peek())
        {
            if ResultKey::from(&top_pending.0) != *next_expected {
                break;
            }
            self.expected.pop();
            if let Some(OrderedResult(result)) = self.pending.pop() {
                ready.push(result);
            }
        }
        ready
    }

    /// Drain remaining results in order (for final output)
    pub fn drain(&mut self) -> Vec<SolverResult> {
        let mut results: Vec<_> = self.pending.drain().map(|o| o.0).collect();
        results.sort_by_key(|r| ResultKey::from(r));
        results
    }

    /// Check if all expected results have been received
    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn key(day: u8, part: u8) -> ResultKey {
        ResultKey {
            year: 2023,
            day,
            part,
        }
    }

    fn result(day: u8, part: u8) -> SolverResult {
        SolverResult {
            year: 2023,
            day,
            part,
            answer: Ok(format!("{day}/{part}")),
            solve_duration: TimeDelta::milliseconds(3),
            parse_duration: Some(TimeDelta::microseconds(250)),
        }
    }

    fn order(results: &[SolverResult]) -> Vec<(u8, u8)> {
        results.iter().map(|r| (r.day, r.part)).collect()
    }

    #[test]
    fn test_in_order_results_stream_through() {
        let mut agg = ResultAggregator::new(vec![key(16, 1), key(16, 2)]);

        assert_eq!(order(&agg.add(result(16, 1))), vec![(16, 1)]);
        assert_eq!(order(&agg.add(result(16, 2))), vec![(16, 2)]);
        assert!(agg.is_complete());
    }

    #[test]
    fn test_late_result_releases_buffer() {
        let mut agg = ResultAggregator::new(vec![key(17, 1), key(17, 2), key(23, 1)]);

        assert!(agg.add(result(23, 1)).is_empty());
        assert!(agg.add(result(17, 2)).is_empty());
        assert_eq!(
            order(&agg.add(result(17, 1))),
            vec![(17, 1), (17, 2), (23, 1)]
        );
        assert!(agg.is_complete());
    }

    #[test]
    fn test_drain_returns_stragglers_sorted() {
        let mut agg = ResultAggregator::new(vec![key(8, 1), key(8, 2), key(9, 1)]);

        agg.add(result(9, 1));
        agg.add(result(8, 2));

        assert_eq!(order(&agg.drain()), vec![(8, 2), (9, 1)]);
        assert!(!agg.is_complete());
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_emits_sorted(
            keys in proptest::collection::btree_set((1u8..=25, 1u8..=2), 1..20),
            seed in any::<u64>(),
        ) {
            let sorted: Vec<(u8, u8)> = keys.iter().copied().collect();
            let mut arrival = sorted.clone();
            // Deterministic shuffle
            let mut state = seed | 1;
            for i in (1..arrival.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                arrival.swap(i, (state % (i as u64 + 1)) as usize);
            }

            let mut agg = ResultAggregator::new(sorted.iter().map(|&(d, p)| key(d, p)).collect());
            let mut emitted = Vec::new();
            for (day, part) in arrival {
                emitted.extend(order(&agg.add(result(day, part))));
            }

            prop_assert_eq!(emitted, sorted);
            prop_assert!(agg.is_complete());
        }
    }
}
