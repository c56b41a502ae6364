//! Fill a crossword grid from a word list by treating it as a constraint satisfaction problem.
//!
//! Each slot in the grid is a variable whose domain starts out as the whole vocabulary. Domains
//! are cut down to words of the right length, then made arc-consistent with every crossing
//! slot, and finally a backtracking search picks one word per slot, trying the most
//! constrained slot first and the least constraining word first.
//!
//! ```
//! use crossword_csp::{find_fill, render_grid, Crossword};
//!
//! let crossword = Crossword::new("___\n_##\n_##", "cat\ncot").unwrap();
//! let result = find_fill(&crossword).expect("Failed to find a fill");
//!
//! let grid = render_grid(&crossword, &result.assignment);
//! assert!(grid.starts_with('C'));
//! ```

pub mod arc_consistency;
pub mod assignment;
pub mod consistency;
pub mod crossword;
pub mod domains;
pub mod errors;
pub mod fill;
pub mod log;
pub mod render;

pub use arc_consistency::{ac3, revise, Arc, ArcConsistencyFailure, ArcConsistencyResult, ArcConsistencySuccess};
pub use assignment::{Assignment, Choice};
pub use consistency::consistent;
pub use crossword::{Crossword, Direction, Overlap, Slot, SlotId, Word, WordId, MAX_SLOT_COUNT, MAX_SLOT_LENGTH};
pub use domains::Domains;
pub use errors::Error;
pub use fill::{find_fill, CrosswordCreator, FillFailure, FillSuccess, Statistics};
pub use render::{draw_grid, letter_grid, render_grid, save_image, RenderOptions};
