//! Directional focus for remote-control navigation.
//!
//! Home rows use a (row, column) cursor over rows of differing length; button groups use
//! a flat index. Neither manager performs I/O.

/// Column count of a row, looked up on every move since rows can grow or shrink
pub type ColumnsForRow = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Cursor over a jagged grid of rows
pub struct GridFocusManager {
    row_count: usize,
    columns_for_row: ColumnsForRow,
    row: usize,
    col: usize,
}

impl std::fmt::Debug for GridFocusManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFocusManager")
            .field("row_count", &self.row_count)
            .field("row", &self.row)
            .field("col", &self.col)
            .finish()
    }
}

impl GridFocusManager {
    pub fn new(row_count: usize, columns_for_row: impl Fn(usize) -> usize + Send + Sync + 'static) -> Self {
        Self {
            row_count,
            columns_for_row: Box::new(columns_for_row),
            row: 0,
            col: 0,
        }
    }

    /// Grid whose row lengths are fixed up front
    pub fn with_row_sizes(sizes: Vec<usize>) -> Self {
        let row_count = sizes.len();
        Self::new(row_count, move |row| sizes.get(row).copied().unwrap_or(0))
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Columns in `row`, never less than one
    fn columns(&self, row: usize) -> usize {
        (self.columns_for_row)(row).max(1)
    }

    fn last_row(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    pub fn set_focus(&mut self, row: usize, col: usize) {
        self.row = row.min(self.last_row());
        self.col = col.min(self.columns(self.row) - 1);
    }

    pub fn move_up(&mut self) -> bool {
        if self.row == 0 {
            return false;
        }
        self.enter_row(self.row - 1);
        true
    }

    pub fn move_down(&mut self) -> bool {
        if self.row >= self.last_row() {
            return false;
        }
        self.enter_row(self.row + 1);
        true
    }

    // keeps the visual column where the new row allows it
    fn enter_row(&mut self, row: usize) {
        self.row = row;
        self.col = self.col.min(self.columns(row) - 1);
    }

    pub fn move_left(&mut self, wrap: bool) -> bool {
        let cols = self.columns(self.row);
        if cols == 1 {
            return false;
        }
        // the row may have shrunk since focus was last set
        self.col = self.col.min(cols - 1);
        if self.col > 0 {
            self.col -= 1;
            return true;
        }
        if wrap {
            self.col = cols - 1;
            return true;
        }
        false
    }

    pub fn move_right(&mut self, wrap: bool) -> bool {
        let cols = self.columns(self.row);
        if cols == 1 {
            return false;
        }
        if self.col < cols - 1 {
            self.col += 1;
            return true;
        }
        if wrap {
            self.col = 0;
            return true;
        }
        false
    }
}

/// Cursor over a flat list, such as a row of buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearFocusManager {
    item_count: usize,
    index: usize,
}

impl LinearFocusManager {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_focus(&mut self, index: usize) {
        self.index = index.min(self.item_count.saturating_sub(1));
    }

    pub fn move_left(&mut self, wrap: bool) -> bool {
        if self.item_count < 2 {
            return false;
        }
        if self.index > 0 {
            self.index -= 1;
            return true;
        }
        if wrap {
            self.index = self.item_count - 1;
            return true;
        }
        false
    }

    pub fn move_right(&mut self, wrap: bool) -> bool {
        if self.item_count < 2 {
            return false;
        }
        if self.index < self.item_count - 1 {
            self.index += 1;
            return true;
        }
        if wrap {
            self.index = 0;
            return true;
        }
        false
    }
}
