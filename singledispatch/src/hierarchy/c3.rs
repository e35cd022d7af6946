//! C3 linearization.

use std::collections::VecDeque;

use super::ClassId;

/// Merge linearizations with the C3 rule.
///
/// Repeatedly takes the first head that does not appear in the tail of any
/// sequence. Returns `None` when no such head exists, i.e. the input
/// orderings contradict each other.
pub(crate) fn merge(seqs: Vec<Vec<ClassId>>) -> Option<Vec<ClassId>> {
    let mut seqs: Vec<VecDeque<ClassId>> = seqs.into_iter().map(VecDeque::from).collect();
    let mut result = Vec::new();

    loop {
        seqs.retain(|seq| !seq.is_empty());
        if seqs.is_empty() {
            return Some(result);
        }

        let candidate = seqs
            .iter()
            .filter_map(|seq| seq.front().copied())
            .find(|head| !seqs.iter().any(|seq| seq.iter().skip(1).any(|c| c == head)))?;

        result.push(candidate);
        for seq in &mut seqs {
            if seq.front() == Some(&candidate) {
                seq.pop_front();
            }
        }
    }
}
