use std::cmp::Reverse;
use std::collections::HashMap;

use instant::{Duration, Instant};
use log::{debug, info};

use crate::arc_consistency::{self, Arc, ArcConsistencyResult};
use crate::assignment::{Assignment, Choice};
use crate::consistency::consistent;
use crate::crossword::{Crossword, SlotId, WordId};
use crate::domains::Domains;

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Arcs whose revision removed at least one word.
    pub revisions: u64,
    /// Words removed by node and arc consistency.
    pub eliminations: u64,
    /// Calls into the backtracking search.
    pub states: u64,
    /// Tentative choices that had to be undone.
    pub backtracks: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// Why a grid couldn't be filled. Both cases are ordinary answers, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillFailure {
    /// Preprocessing left a slot with no candidate words, so no search was attempted.
    EmptyDomain { slot_id: SlotId },
    /// The search tried everything the domains allowed.
    Exhausted,
}

/// Owns the state of a single solve: the domains, pruned up front and then only read by the
/// search, and the running statistics.
pub struct CrosswordCreator<'a> {
    crossword: &'a Crossword,
    domains: Domains,
    statistics: Statistics,
}

impl<'a> CrosswordCreator<'a> {
    pub fn new(crossword: &'a Crossword) -> CrosswordCreator<'a> {
        CrosswordCreator {
            crossword,
            domains: Domains::initialize(crossword),
            statistics: Statistics::default(),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Drop every word whose length doesn't match its slot.
    pub fn enforce_node_consistency(&mut self) {
        let eliminations = self.domains.enforce_node_consistency(self.crossword);
        self.statistics.eliminations += eliminations as u64;
    }

    /// Run arc consistency over `arcs`, or over every arc when `arcs` is `None`.
    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> ArcConsistencyResult {
        let result = arc_consistency::ac3(self.crossword, &mut self.domains, arcs);
        let (revisions, eliminations) = match &result {
            Ok(success) => (success.revisions, success.eliminations),
            Err(failure) => (failure.revisions, failure.eliminations),
        };
        self.statistics.revisions += revisions;
        self.statistics.eliminations += eliminations;
        result
    }

    /// Choose the unassigned slot with the fewest remaining words, preferring the slot with the
    /// most neighbors on a tie. Returns `None` once every slot is assigned.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<SlotId> {
        self.crossword.variables()
            .filter(|&slot_id| !assignment.contains(slot_id))
            .min_by_key(|&slot_id| {
                (self.domains.len(slot_id), Reverse(self.crossword.neighbors(slot_id).len()))
            })
    }

    /// The words in `slot_id`'s domain, ordered so that the ones ruling out the fewest words in
    /// unassigned neighbors come first.
    pub fn order_domain_values(&self, slot_id: SlotId, assignment: &Assignment) -> Vec<WordId> {
        // For each unassigned neighbor, how many of its words put each letter in the shared cell?
        // A candidate conflicts with every neighbor word that doesn't share its letter.
        let crossings: Vec<(usize, usize, HashMap<char, usize>)> = self.crossword.neighbors(slot_id).iter()
            .filter(|&&neighbor| !assignment.contains(neighbor))
            .filter_map(|&neighbor| {
                let overlap = self.crossword.overlap(slot_id, neighbor)?;
                let mut letter_counts: HashMap<char, usize> = HashMap::new();
                for word_id in self.domains.iter(neighbor) {
                    *letter_counts.entry(self.crossword.word(word_id).char_at(overlap.second)).or_default() += 1;
                }
                Some((overlap.first, self.domains.len(neighbor), letter_counts))
            })
            .collect();

        let mut values: Vec<WordId> = self.domains.iter(slot_id).collect();

        values.sort_by_cached_key(|&word_id| {
            let word = self.crossword.word(word_id);

            crossings.iter().map(|(cell_idx, neighbor_count, letter_counts)| {
                neighbor_count - letter_counts.get(&word.char_at(*cell_idx)).copied().unwrap_or(0)
            }).sum::<usize>()
        });

        values
    }

    /// Extend `assignment` depth-first until it's complete. On success the assignment holds the
    /// solution; on failure it's back to the state it was passed in with.
    pub fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        self.statistics.states += 1;

        let slot_id = match self.select_unassigned_variable(assignment) {
            Some(slot_id) => slot_id,
            None => return true,
        };

        for word_id in self.order_domain_values(slot_id, assignment) {
            assignment.assign(Choice { slot_id, word_id });

            if consistent(self.crossword, assignment) && self.backtrack(assignment) {
                return true;
            }

            assignment.unassign_last();
            self.statistics.backtracks += 1;
        }

        false
    }

    /// Prune the domains, then search. Stops at the first complete assignment.
    pub fn fill(&mut self) -> Result<Assignment, FillFailure> {
        let start = Instant::now();

        let result = self.fill_inner();

        self.statistics.duration = start.elapsed();
        result
    }

    fn fill_inner(&mut self) -> Result<Assignment, FillFailure> {
        self.enforce_node_consistency();

        // A slot with no word of the right length can't be rescued by propagation, and a slot
        // without neighbors would never be looked at by it.
        if let Some(slot_id) = self.domains.first_empty_slot() {
            debug!("Slot {} has no words of length {}", slot_id, self.crossword.slot(slot_id).length);
            return Err(FillFailure::EmptyDomain { slot_id });
        }

        if let Err(failure) = self.ac3(None) {
            return Err(FillFailure::EmptyDomain { slot_id: failure.slot_id });
        }

        let mut assignment = Assignment::new(self.crossword.slot_count());
        if self.backtrack(&mut assignment) {
            Ok(assignment)
        } else {
            Err(FillFailure::Exhausted)
        }
    }

    /// Find a complete assignment, or `None` if the grid can't be filled from the vocabulary.
    pub fn solve(&mut self) -> Option<Assignment> {
        self.fill().ok()
    }
}

/// Search for a valid fill for the given grid.
pub fn find_fill(crossword: &Crossword) -> Result<FillSuccess, FillFailure> {
    let mut creator = CrosswordCreator::new(crossword);
    let result = creator.fill();
    let statistics = creator.statistics().clone();

    info!(
        "Search finished in {:?}: {} states, {} backtracks, {} words pruned",
        statistics.duration,
        statistics.states,
        statistics.backtracks,
        statistics.eliminations,
    );

    result.map(|assignment| FillSuccess { statistics, assignment })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ___
    /// _##
    /// _##
    const CORNER: &str = "___\n_##\n_##";

    fn fill_strings(crossword: &Crossword, assignment: &Assignment) -> Vec<(SlotId, String)> {
        let mut result: Vec<(SlotId, String)> = assignment.choices().iter()
            .map(|choice| (choice.slot_id, crossword.word(choice.word_id).string.clone()))
            .collect();
        result.sort();
        result
    }

    #[test]
    fn test_crossing_pair_is_filled() {
        let crossword = Crossword::new(CORNER, "cat\ncot").unwrap();

        let result = find_fill(&crossword).expect("Failed to find a fill");

        assert!(result.assignment.is_complete());
        let fill = fill_strings(&crossword, &result.assignment);
        assert_ne!(fill[0].1, fill[1].1);
        assert!(fill.iter().all(|(_, word)| word.starts_with('C')));
    }

    #[test]
    fn test_repeated_word_is_not_a_fill() {
        let crossword = Crossword::new(CORNER, "cat\ndog").unwrap();

        assert_eq!(find_fill(&crossword).unwrap_err(), FillFailure::Exhausted);
        assert!(CrosswordCreator::new(&crossword).solve().is_none());
    }

    #[test]
    fn test_missing_length_skips_search() {
        let crossword = Crossword::new("____", "cat\ndog\nelephant").unwrap();
        let mut creator = CrosswordCreator::new(&crossword);

        assert_eq!(creator.fill().unwrap_err(), FillFailure::EmptyDomain { slot_id: 0 });
        assert_eq!(creator.statistics().states, 0);
    }

    #[test]
    fn test_arc_consistency_failure_skips_search() {
        // __
        // #_
        // #_
        let crossword = Crossword::new("__\n#_\n#_", "at\non\nxyz").unwrap();
        let mut creator = CrosswordCreator::new(&crossword);

        assert!(matches!(creator.fill(), Err(FillFailure::EmptyDomain { .. })));
        assert_eq!(creator.statistics().states, 0);
    }

    #[test]
    fn test_failed_arc_consistency_still_counts_pruning() {
        // __
        // #_
        // #_
        //
        // Word ids: 0 = AT, 1 = TOE, 2 = XYZ. Node consistency leaves AT across and TOE, XYZ
        // down. With TOE gone too, nothing down starts with 'T' and the across slot loses AT.
        let crossword = Crossword::new("__\n#_\n#_", "at\ntoe\nxyz").unwrap();
        let mut creator = CrosswordCreator::new(&crossword);
        creator.enforce_node_consistency();
        creator.domains.remove(1, 1);

        assert_eq!(creator.statistics().eliminations, 3);

        let failure = creator.ac3(None).unwrap_err();

        assert_eq!(failure.slot_id, 0);
        assert!(creator.domains().is_empty(0));
        assert_eq!(creator.statistics().revisions, 1);
        assert_eq!(creator.statistics().eliminations, 4);
    }

    #[test]
    fn test_empty_grid_has_empty_fill() {
        let crossword = Crossword::new("#_#\n_#_", "cat").unwrap();

        let result = find_fill(&crossword).unwrap();

        assert!(result.assignment.is_empty());
        assert_eq!(result.statistics.states, 1);
    }

    #[test]
    fn test_select_prefers_smallest_domain_then_degree() {
        // ____
        // _#_#
        // _#__
        //
        // Slots: 0 = across len 4, 1 = across len 2, 2 = down len 3 at col 0, 3 = down len 3 at
        // col 2. Slots 0 and 3 have two neighbors each; 1 and 2 have one.
        let crossword = Crossword::new(
            "____\n_#_#\n_#__",
            "abcd\nefgh\nijkl\nabc\naxy\nbcd\nab",
        ).unwrap();
        let mut creator = CrosswordCreator::new(&crossword);
        creator.enforce_node_consistency();
        let mut assignment = Assignment::new(crossword.slot_count());

        assert_eq!(crossword.neighbors(0).len(), 2);
        assert_eq!(crossword.neighbors(2).len(), 1);
        assert_eq!(crossword.neighbors(3).len(), 2);

        // The one two-letter word makes slot 1 the most constrained.
        assert_eq!(creator.select_unassigned_variable(&assignment), Some(1));

        assignment.assign(Choice { slot_id: 1, word_id: 0 });
        assert_eq!(creator.select_unassigned_variable(&assignment), Some(0));

        // Slots 2 and 3 tie on domain size; 3 has more neighbors.
        assignment.assign(Choice { slot_id: 0, word_id: 1 });
        assert_eq!(creator.select_unassigned_variable(&assignment), Some(3));

        assignment.assign(Choice { slot_id: 3, word_id: 2 });
        assignment.assign(Choice { slot_id: 2, word_id: 3 });
        assert_eq!(creator.select_unassigned_variable(&assignment), None);
    }

    #[test]
    fn test_order_puts_least_constraining_first() {
        // Three down candidates start with 'B' and one with 'A'. The 'B' words across leave the
        // down slot more options than "ACE", so they go first even though they sort later.
        let crossword = Crossword::new(CORNER, "ace\nbat\nbee\nbox").unwrap();
        let mut creator = CrosswordCreator::new(&crossword);
        creator.enforce_node_consistency();
        let assignment = Assignment::new(2);

        let order: Vec<&str> = creator.order_domain_values(0, &assignment).into_iter()
            .map(|word_id| crossword.word(word_id).string.as_str())
            .collect();

        assert_eq!(order, vec!["BAT", "BEE", "BOX", "ACE"]);
    }

    #[test]
    fn test_order_ignores_assigned_neighbors() {
        let crossword = Crossword::new(CORNER, "ace\nbat\nbee\nbox").unwrap();
        let mut creator = CrosswordCreator::new(&crossword);
        creator.enforce_node_consistency();
        let mut assignment = Assignment::new(2);
        assignment.assign(Choice { slot_id: 1, word_id: 0 });

        // With the only neighbor assigned, every word scores zero and word order is kept.
        let order = creator.order_domain_values(0, &assignment);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ring_of_crossings_is_filled() {
        // ___
        // _#_
        // ___
        //
        // Four slots around a ring; each corner ties the ends of two words together. Every fill
        // puts CDE and CQE on the top and left, and EFG and EXG on the right and bottom.
        let crossword = Crossword::new(
            "___\n_#_\n___",
            "abc\ncde\naxe\nefg\ngha\nexg\nzzz\ncqe",
        ).unwrap();

        let result = find_fill(&crossword).expect("Failed to find a fill");
        let assignment = &result.assignment;

        assert!(assignment.is_complete());
        assert!(consistent(&crossword, assignment));
    }
}
