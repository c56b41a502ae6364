use bit_set::BitSet;

use crate::crossword::{Crossword, SlotId, WordId};

/// The words still considered possible for each slot, as a set of `WordId`s per slot. Words are
/// only ever removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Domains {
    by_slot: Vec<BitSet>,
}

impl Domains {
    /// Seed every slot with the entire vocabulary.
    pub fn initialize(crossword: &Crossword) -> Domains {
        let word_count = crossword.words().len();
        let everything: BitSet = (0..word_count).collect();

        Domains {
            by_slot: crossword.variables().map(|_| everything.clone()).collect(),
        }
    }

    /// Keep only the words whose length matches their slot. Running this more than once has no
    /// further effect.
    pub fn enforce_node_consistency(&mut self, crossword: &Crossword) -> usize {
        let mut eliminations = 0;

        for slot_id in crossword.variables() {
            let length = crossword.slot(slot_id).length;
            let before = self.by_slot[slot_id].len();

            let retained: BitSet = self.by_slot[slot_id].iter()
                .filter(|&word_id| crossword.word(word_id).len() == length)
                .collect();

            eliminations += before - retained.len();
            self.by_slot[slot_id] = retained;
        }

        eliminations
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.by_slot[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.by_slot[slot_id].is_empty()
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].contains(word_id)
    }

    /// Returns whether the word was still present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].remove(word_id)
    }

    /// The remaining words for a slot, in word id order.
    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.by_slot[slot_id].iter()
    }

    /// The first slot with nothing left in its domain, if any.
    pub fn first_empty_slot(&self) -> Option<SlotId> {
        self.by_slot.iter().position(|domain| domain.is_empty())
    }
}
