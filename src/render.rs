use std::path::Path;

use image::{Rgb, RgbImage};
use log::{debug, warn};

use crate::assignment::Assignment;
use crate::crossword::Crossword;
use crate::errors::Error;

/// Printed in place of a blocked cell.
pub const BLOCK_GLYPH: char = '█';

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Glyph rows are 5 pixels wide, most significant bit on the left.
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Cell geometry for `save_image`, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub cell_size: u32,
    pub cell_border: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { cell_size: 100, cell_border: 2 }
    }
}

/// The letter in each cell of the grid, by row then column. Blocked cells and cells no assigned
/// slot passes through are `None`.
pub fn letter_grid(crossword: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; crossword.width()]; crossword.height()];

    for (slot, word) in assignment.words(crossword) {
        for ((row, col), letter) in slot.cells().zip(word.chars()) {
            letters[row][col] = Some(letter);
        }
    }

    letters
}

/// Turn the given crossword and assignment into a rendered string, one line per row.
pub fn render_grid(crossword: &Crossword, assignment: &Assignment) -> String {
    let letters = letter_grid(crossword, assignment);

    letters.iter().enumerate().map(|(row, cells)| {
        cells.iter().enumerate().map(|(col, letter)| {
            if crossword.is_open(row, col) {
                letter.unwrap_or(' ')
            } else {
                BLOCK_GLYPH
            }
        }).collect::<String>()
    }).collect::<Vec<_>>().join("\n")
}

/// Draw the filled grid and write it to `path`. The image format follows the file extension.
pub fn save_image(
    crossword: &Crossword,
    assignment: &Assignment,
    path: &Path,
    options: &RenderOptions,
) -> Result<(), Error> {
    let image = draw_grid(crossword, assignment, options);
    image.save(path)?;

    debug!("Wrote {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// Paint a black canvas with a white square for each open cell and its letter centered inside.
pub fn draw_grid(crossword: &Crossword, assignment: &Assignment, options: &RenderOptions) -> RgbImage {
    let RenderOptions { cell_size, cell_border } = *options;
    let interior_size = cell_size.saturating_sub(2 * cell_border);
    let letters = letter_grid(crossword, assignment);

    let mut image = RgbImage::from_pixel(
        crossword.width() as u32 * cell_size,
        crossword.height() as u32 * cell_size,
        BLACK,
    );

    // Letters take up a bit over half of the cell.
    let scale = (interior_size * 3 / 5 / GLYPH_HEIGHT).max(1);

    for (row, cells) in letters.iter().enumerate() {
        for (col, letter) in cells.iter().enumerate() {
            if !crossword.is_open(row, col) {
                continue;
            }

            let left = col as u32 * cell_size + cell_border;
            let top = row as u32 * cell_size + cell_border;
            fill_rect(&mut image, left, top, interior_size, interior_size, WHITE);

            let letter = match letter {
                Some(letter) => *letter,
                None => continue,
            };
            let glyph = match glyph_for(letter) {
                Some(glyph) => glyph,
                None => {
                    warn!("No glyph for {:?}, leaving cell ({}, {}) blank", letter, row, col);
                    continue;
                }
            };

            let glyph_left = left + interior_size.saturating_sub(GLYPH_WIDTH * scale) / 2;
            let glyph_top = top + interior_size.saturating_sub(GLYPH_HEIGHT * scale) / 2;

            for (glyph_row, bits) in glyph.iter().enumerate() {
                for glyph_col in 0..GLYPH_WIDTH {
                    if bits & (1u8 << (GLYPH_WIDTH - 1 - glyph_col)) != 0 {
                        fill_rect(
                            &mut image,
                            glyph_left + glyph_col * scale,
                            glyph_top + glyph_row as u32 * scale,
                            scale,
                            scale,
                            BLACK,
                        );
                    }
                }
            }
        }
    }

    image
}

fn fill_rect(image: &mut RgbImage, left: u32, top: u32, width: u32, height: u32, color: Rgb<u8>) {
    let right = (left + width).min(image.width());
    let bottom = (top + height).min(image.height());

    for y in top..bottom {
        for x in left..right {
            image.put_pixel(x, y, color);
        }
    }
}

/// A 5x7 bitmap for letters and digits.
fn glyph_for(letter: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    let glyph = match letter.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };

    Some(glyph)
}
