use bit_set::BitSet;
use smallvec::SmallVec;

use crate::crossword::{Crossword, Slot, SlotId, WordId, MAX_SLOT_COUNT};

/// A struct recording a slot assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A partial mapping from slots to words. Choices are made one at a time and undone in reverse
/// order, so the assignment doubles as the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    words_by_slot: Vec<Option<WordId>>,
    assigned: BitSet,
    choices: SmallVec<[Choice; MAX_SLOT_COUNT]>,
}

impl Assignment {
    /// An empty assignment for a grid with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            words_by_slot: vec![None; slot_count],
            assigned: BitSet::with_capacity(slot_count),
            choices: SmallVec::new(),
        }
    }

    /// Put `choice.word_id` in `choice.slot_id`, which must not already be assigned.
    pub fn assign(&mut self, choice: Choice) {
        debug_assert!(!self.assigned.contains(choice.slot_id), "slot {} assigned twice", choice.slot_id);

        self.words_by_slot[choice.slot_id] = Some(choice.word_id);
        self.assigned.insert(choice.slot_id);
        self.choices.push(choice);
    }

    /// Undo the most recent choice, and only that one.
    pub fn unassign_last(&mut self) -> Option<Choice> {
        let choice = self.choices.pop()?;
        self.words_by_slot[choice.slot_id] = None;
        self.assigned.remove(choice.slot_id);
        Some(choice)
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.words_by_slot[slot_id]
    }

    pub fn contains(&self, slot_id: SlotId) -> bool {
        self.assigned.contains(slot_id)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Does every slot have a word?
    pub fn is_complete(&self) -> bool {
        self.choices.len() == self.words_by_slot.len()
    }

    /// The choices in the order they were made.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Each assigned slot with its word, in the order the choices were made.
    pub fn words<'a>(&'a self, crossword: &'a Crossword) -> impl Iterator<Item = (&'a Slot, &'a str)> + 'a {
        self.choices.iter().map(move |choice| {
            (crossword.slot(choice.slot_id), crossword.word(choice.word_id).string.as_str())
        })
    }
}
