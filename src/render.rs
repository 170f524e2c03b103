//! PNG export of a board through its per-cell color lookup.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use thiserror::Error;

use crate::board::Board;
use crate::location::Location;
use crate::palette::{BORDER, UNCLAIMED};

/// Pixels per cell, border included.
pub const CELL_SIZE: u32 = 25;
/// Pixels of each cell's colored square; the rest of [`CELL_SIZE`] is border.
pub const FILL_SIZE: u32 = 22;

/// Failure to write an image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The board is too large to address in pixels.
    #[error("board of {0}x{1} cells is too large to draw")]
    TooLarge(usize, usize),
    /// Encoding or writing the file failed.
    #[error("could not write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Draw `board` as one square per cell: the color of the flow claiming it, or black if none does.
pub fn draw(board: &Board<Rgb<u8>>) -> Result<RgbImage, RenderError> {
    let (rows, cols) = (board.dims().0.get(), board.dims().1.get());
    let pixels = |cells: usize| u32::try_from(cells).ok().and_then(|cells| cells.checked_mul(CELL_SIZE));
    let (Some(width), Some(height)) = (pixels(cols), pixels(rows)) else {
        return Err(RenderError::TooLarge(rows, cols));
    };

    let lookup = board.color_lookup();
    let mut img = ImageBuffer::from_pixel(width, height, BORDER);

    for row in 0..rows {
        for col in 0..cols {
            let color = *lookup.get_or(Location(row, col), &UNCLAIMED);
            // both fit in u32, since the image dimensions did
            let (x0, y0) = (col as u32 * CELL_SIZE, row as u32 * CELL_SIZE);
            for dy in 0..FILL_SIZE {
                for dx in 0..FILL_SIZE {
                    img.put_pixel(x0 + dx, y0 + dy, color);
                }
            }
        }
    }

    Ok(img)
}

/// [`draw`] `board` and save it to `path` as a PNG.
pub fn export_png(board: &Board<Rgb<u8>>, path: impl AsRef<Path>) -> Result<(), RenderError> {
    draw(board)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use image::Rgb;

    use super::{draw, export_png, CELL_SIZE};
    use crate::board::Board;
    use crate::location::Location;
    use crate::palette::{BORDER, UNCLAIMED};

    fn board() -> Board<Rgb<u8>> {
        Board::new(
            (NonZero::new(1).unwrap(), NonZero::new(3).unwrap()),
            [(Location(0, 0), Location(0, 1), Rgb([255, 0, 0]))],
        )
    }

    #[test]
    fn cells_are_inset_squares() {
        let img = draw(&board()).unwrap();
        assert_eq!(img.dimensions(), (3 * CELL_SIZE, CELL_SIZE));
        assert_eq!(*img.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(CELL_SIZE + 21, 21), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(CELL_SIZE + 22, 21), BORDER);
        assert_eq!(*img.get_pixel(2 * CELL_SIZE + 5, 5), UNCLAIMED);
    }

    #[test]
    fn png_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzle.png");
        export_png(&board(), &path).unwrap();
        let read = image::open(&path).unwrap().to_rgb8();
        assert_eq!(read, draw(&board()).unwrap());
    }
}
