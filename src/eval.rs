//! Pair-based match quality.
//!
//! A predicted partition is scored against a gold standard by comparing their link
//! sets: every pair in the prediction is a true positive if the gold standard links
//! it too, a false positive otherwise; every gold pair the prediction misses is a
//! false negative.

use crate::cluster::ClusterPartition;

/// Precision, recall and F-measure of a predicted partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchQuality {
    /// `tp / (tp + fp)`.
    pub precision: f64,
    /// `tp / (tp + fn)`.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub fmeasure: f64,
}

/// Score `result` against `gold`.
///
/// An empty prediction has precision 1 and recall 0; an empty gold standard scores
/// 0 everywhere.
///
/// ```rust
/// use erlink::{match_quality, ClusterPartition};
///
/// let gold = ClusterPartition::from_sets(vec![vec!["a1", "b1"], vec!["a2", "b2"]]).unwrap();
/// let res = ClusterPartition::from_sets(vec![vec!["a1", "b1"], vec!["a2", "b3"]]).unwrap();
/// let q = match_quality(&res, &gold);
/// assert_eq!(q.precision, 0.5);
/// assert_eq!(q.recall, 0.5);
/// ```
pub fn match_quality(result: &ClusterPartition, gold: &ClusterPartition) -> MatchQuality {
    if result.is_empty() {
        return MatchQuality {
            precision: 1.0,
            recall: 0.0,
            fmeasure: 0.0,
        };
    }
    if gold.is_empty() {
        return MatchQuality {
            precision: 0.0,
            recall: 0.0,
            fmeasure: 0.0,
        };
    }

    let (mut tp, mut fp) = (0usize, 0usize);
    for (a, b) in result.all_pairs() {
        if gold.contains_pair(a, b) {
            tp += 1;
        } else {
            fp += 1;
        }
    }
    let fn_ = gold
        .all_pairs()
        .filter(|(a, b)| !result.contains_pair(a, b))
        .count();

    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fn_) as f64;
    let fmeasure = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    log::debug!("match quality: tp={tp} fp={fp} fn={fn_}");

    MatchQuality {
        precision,
        recall,
        fmeasure,
    }
}

/// Candidate pairs per entity: `blocks.number_of_links() / num_entities`.
///
/// Returns `None` when `num_entities` is zero.
pub fn pair_entity_ratio(blocks: &ClusterPartition, num_entities: usize) -> Option<f64> {
    if num_entities == 0 {
        return None;
    }
    Some(blocks.number_of_links() as f64 / num_entities as f64)
}
