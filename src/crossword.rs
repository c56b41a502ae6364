use std::collections::{BTreeSet, HashMap};
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;

use log::debug;
use smallvec::SmallVec;

use crate::errors::Error;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// The expected maximum number of slots appearing in a grid.
pub const MAX_SLOT_COUNT: usize = 256;

/// The character marking a fillable cell in a structure file. Anything else is a block.
pub const OPEN_CELL: char = '_';

/// An identifier for a given slot, based on its index in the Crossword's `slots` field.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the Crossword's `words` field.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// A contiguous run of fillable cells, starting at (`row`, `col`) and extending `length` cells
/// in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    /// The coords of the cell holding the character at `idx`.
    pub fn cell(&self, idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + idx),
            Direction::Down => (self.row + idx, self.col),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |idx| self.cell(idx))
    }
}

/// A candidate word, kept both as the normalized string and as its characters so that overlap
/// checks can index by position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Word {
    pub string: String,
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn new(string: &str) -> Word {
        Word {
            string: string.to_string(),
            chars: string.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, idx: usize) -> char {
        self.chars[idx]
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.string)
    }
}

/// The cell shared by two slots, as an index into each of them. For an ordered pair (a, b),
/// `first` indexes into a and `second` into b.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap {
    pub first: usize,
    pub second: usize,
}

impl Overlap {
    /// The same shared cell seen from the other slot.
    pub fn reversed(self) -> Overlap {
        Overlap { first: self.second, second: self.first }
    }
}

/// A parsed puzzle: the grid layout, the slots derived from it, how they cross, and the
/// vocabulary available to fill them. Immutable once built.
pub struct Crossword {
    width: usize,
    height: usize,
    structure: Vec<Vec<bool>>,
    words: Vec<Word>,
    slots: SmallVec<[Slot; MAX_SLOT_COUNT]>,
    neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>>,
    overlaps: HashMap<(SlotId, SlotId), Overlap>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slots", &self.slots)
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl Crossword {
    /// Build a crossword from the contents of a structure file and a word list.
    pub fn new(structure: &str, words: &str) -> Result<Crossword, Error> {
        let structure = parse_structure(structure)?;
        let height = structure.len();
        let width = structure.iter().map(|row| row.len()).max().unwrap_or(0);

        // Short lines are padded with blocks so that every row has the same width.
        let structure: Vec<Vec<bool>> = structure.into_iter().map(|mut row| {
            row.resize(width, false);
            row
        }).collect();

        let words = parse_words(words);
        let slots = find_slots(&structure);

        // Build a map from cell location to the slots passing through it, which we can then use
        // to calculate crossings.
        let mut slots_by_cell: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for (slot_id, slot) in slots.iter().enumerate() {
            for (cell_idx, loc) in slot.cells().enumerate() {
                slots_by_cell.entry(loc).or_default().push((slot_id, cell_idx));
            }
        }

        let mut neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>> =
            slots.iter().map(|_| SmallVec::new()).collect();
        let mut overlaps = HashMap::new();

        // Slots are visited in id order, so each neighbor list comes out in crossing order.
        for (slot_id, slot) in slots.iter().enumerate() {
            for (cell_idx, loc) in slot.cells().enumerate() {
                for &(other_slot_id, other_cell_idx) in &slots_by_cell[&loc] {
                    if other_slot_id == slot_id {
                        continue;
                    }
                    neighbors[slot_id].push(other_slot_id);
                    overlaps.insert(
                        (slot_id, other_slot_id),
                        Overlap { first: cell_idx, second: other_cell_idx },
                    );
                }
            }
        }

        debug!(
            "Parsed {}x{} grid with {} slots, {} crossings and {} distinct words",
            width,
            height,
            slots.len(),
            overlaps.len() / 2,
            words.len(),
        );

        Ok(Crossword { width, height, structure, words, slots, neighbors, overlaps })
    }

    /// Read and parse a structure file and a word list file.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(structure_path: P, words_path: Q) -> Result<Crossword, Error> {
        let structure = read_file(structure_path.as_ref())?;
        let words = read_file(words_path.as_ref())?;

        Crossword::new(&structure, &words)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Is the cell at (`row`, `col`) fillable? Cells outside the grid are not.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.structure.get(row).and_then(|cells| cells.get(col)).copied().unwrap_or(false)
    }

    /// The ids of every slot in the grid.
    pub fn variables(&self) -> impl Iterator<Item = SlotId> {
        0..self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slots[slot_id]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The slots sharing a cell with the given slot.
    pub fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        &self.neighbors[slot_id]
    }

    /// Where `first` and `second` cross, if they do at all.
    pub fn overlap(&self, first: SlotId, second: SlotId) -> Option<Overlap> {
        self.overlaps.get(&(first, second)).copied()
    }

    /// The deduplicated vocabulary, sorted.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }
}

fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

/// Turn a structure file into rows of open/blocked flags. Blank lines before and after the grid
/// are dropped; blank lines inside it are fully blocked rows.
fn parse_structure(structure: &str) -> Result<Vec<Vec<bool>>, Error> {
    let lines: Vec<&str> = structure.lines().map(|line| line.trim_end_matches('\r')).collect();

    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) => Ok(
            lines[first..=last].iter()
                .map(|line| line.chars().map(|c| c == OPEN_CELL).collect())
                .collect()
        ),
        _ => Err(Error::EmptyStructure),
    }
}

/// One word per line, upper-cased, with duplicates and blank lines dropped.
fn parse_words(words: &str) -> Vec<Word> {
    let unique: BTreeSet<String> = words
        .lines()
        .map(|line| line.trim().to_uppercase())
        .filter(|line| !line.is_empty())
        .collect();

    unique.iter().map(|word| Word::new(word)).collect()
}

/// Find every maximal run of open cells of length at least 2, across runs first (row by row),
/// then down runs (column by column).
fn find_slots(structure: &[Vec<bool>]) -> SmallVec<[Slot; MAX_SLOT_COUNT]> {
    fn build_runs(rows: &[Vec<bool>]) -> Vec<(usize, usize, usize)> {
        let mut result = vec![];

        for (y, line) in rows.iter().enumerate() {
            let mut start: Option<usize> = None;

            for (x, &open) in line.iter().enumerate() {
                match (open, start) {
                    (true, None) => start = Some(x),
                    (false, Some(s)) => {
                        if x - s > 1 {
                            result.push((y, s, x - s));
                        }
                        start = None;
                    }
                    _ => {}
                }
            }

            if let Some(s) = start {
                if line.len() - s > 1 {
                    result.push((y, s, line.len() - s));
                }
            }
        }

        result
    }

    let mut slots: SmallVec<[Slot; MAX_SLOT_COUNT]> = SmallVec::new();

    for (row, col, length) in build_runs(structure) {
        slots.push(Slot { row, col, direction: Direction::Across, length });
    }

    let width = structure.first().map(|row| row.len()).unwrap_or(0);
    let transposed: Vec<Vec<bool>> = (0..width)
        .map(|col| structure.iter().map(|row| row[col]).collect())
        .collect();

    for (col, row, length) in build_runs(&transposed) {
        slots.push(Slot { row, col, direction: Direction::Down, length });
    }

    slots
}
