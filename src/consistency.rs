use std::collections::HashSet;

use crate::assignment::Assignment;
use crate::crossword::{Crossword, WordId};

/// Check the slots that have been assigned so far: no word may be used twice, and every pair of
/// assigned slots that cross must put the same letter in the shared cell. Unassigned slots are
/// ignored, so this can prune a partial assignment.
pub fn consistent(crossword: &Crossword, assignment: &Assignment) -> bool {
    let mut used: HashSet<WordId> = HashSet::with_capacity(assignment.len());

    for choice in assignment.choices() {
        if !used.insert(choice.word_id) {
            return false;
        }
    }

    for choice in assignment.choices() {
        let word = crossword.word(choice.word_id);

        for &neighbor in crossword.neighbors(choice.slot_id) {
            let neighbor_word = match assignment.get(neighbor) {
                Some(word_id) => crossword.word(word_id),
                None => continue,
            };

            if let Some(overlap) = crossword.overlap(choice.slot_id, neighbor) {
                if word.char_at(overlap.first) != neighbor_word.char_at(overlap.second) {
                    return false;
                }
            }
        }
    }

    true
}
