//! The glyph grid produced by one conversion.

/// One output cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Paint this glyph in the foreground color.
    Glyph(char),
    /// Background only, nothing is drawn.
    Empty,
}

impl Cell {
    /// Build a cell from a ramp glyph; spaces become `Empty`.
    #[inline]
    pub fn from_glyph(ch: char) -> Self {
        if ch == ' ' {
            Cell::Empty
        } else {
            Cell::Glyph(ch)
        }
    }

    /// The glyph as text, `' '` for empty cells.
    pub fn as_char(&self) -> char {
        match self {
            Cell::Glyph(ch) => *ch,
            Cell::Empty => ' ',
        }
    }

    pub fn is_painted(&self) -> bool {
        matches!(self, Cell::Glyph(_))
    }
}

/// A `rows x cols` grid of cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl GlyphGrid {
    /// Wrap a row-major cell buffer.
    ///
    /// # Panics
    /// Panics if `cells.len() != cols * rows`.
    pub fn from_cells(cols: usize, rows: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(
            cells.len(),
            cols * rows,
            "cell buffer does not match a {}x{} grid",
            cols,
            rows
        );
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// One row of cells.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Iterate rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.cols.max(1))
    }

    /// Number of cells that will be painted.
    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_painted()).count()
    }

    /// Render as text, one line per row joined with `\n`.
    ///
    /// Empty cells become spaces and trailing spaces are kept so every line
    /// has exactly `cols` characters.
    pub fn to_text(&self) -> String {
        self.iter_rows()
            .map(|row| row.iter().map(Cell::as_char).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
