//! Column placement of rate rows for a given terminal size.
//!
//! Rows fill column 1 top to bottom, then column 2, then column 3. A column only exists when
//! the terminal is wide enough for it, and each holds `height - 2` rows. Whatever does not fit
//! is dropped for that cycle.

/// Minimum terminal width for each column to be shown.
pub const COLUMN_MIN_WIDTH: [u16; 3] = [34, 71, 108];

/// Left edge of each column.
pub const COLUMN_X: [u16; 3] = [1, 38, 75];

/// First screen row of every column.
pub const TOP_ROW: u16 = 1;

/// Minimum terminal width for the info panel.
pub const INFO_MIN_WIDTH: u16 = 78;

/// Screen position (row, column) of the first info line.
pub const INFO_ORIGIN: (u16, u16) = (11, 31);

/// Info panel text, one entry per line.
pub const INFO_LINES: [&str; 3] = [
    concat!("coin-monitor (version ", env!("CARGO_PKG_VERSION"), ")"),
    concat!(env!("CARGO_PKG_LICENSE"), " License"),
    "https://github.com/JoerdonFryeman/CoinMonitor",
];

/// Where a single row goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Row index in the snapshot
    pub index: usize,
    /// Column number, 0-based
    pub column: usize,
    /// Added to `index` to get the screen row
    pub row_offset: i32,
}

impl Placement {
    pub fn row(&self) -> u16 {
        (self.index as i32 + self.row_offset).max(0) as u16
    }

    pub fn x(&self) -> u16 {
        COLUMN_X[self.column]
    }
}

/// Result of laying out one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Rate table. `column_rows` holds the rows placed in each column.
    Rates {
        placements: Vec<Placement>,
        column_rows: [usize; 3],
        dropped: usize,
    },
    /// Info panel instead of rates
    Info,
    /// Info mode on a terminal too narrow for the panel
    Blank,
}

impl Layout {
    /// Placement of row `index`, if it is shown.
    pub fn placement(&self, index: usize) -> Option<Placement> {
        match self {
            // Rows are placed in index order from 0 with no gaps
            Layout::Rates { placements, .. } => placements.get(index).copied(),
            Layout::Info | Layout::Blank => None,
        }
    }

    pub fn placed(&self) -> usize {
        match self {
            Layout::Rates { placements, .. } => placements.len(),
            Layout::Info | Layout::Blank => 0,
        }
    }
}

/// Number of columns a terminal of `width` can show.
pub fn available_columns(width: u16) -> usize {
    COLUMN_MIN_WIDTH
        .iter()
        .take_while(|&&min_width| width >= min_width)
        .count()
}

/// Assign `rows` rows to columns for a `height` x `width` terminal.
pub fn place_rows(rows: usize, height: u16, width: u16, info_mode: bool) -> Layout {
    if info_mode {
        return if width >= INFO_MIN_WIDTH {
            Layout::Info
        } else {
            Layout::Blank
        };
    }

    let capacity = height.saturating_sub(2) as usize;
    let columns = available_columns(width);

    let mut column_rows = [0usize; 3];
    let mut placements = Vec::with_capacity(rows.min(capacity * columns));
    let mut column = 0;

    for index in 0..rows {
        while column < columns && column_rows[column] >= capacity {
            column += 1;
        }
        if column >= columns {
            break;
        }

        placements.push(Placement {
            index,
            column,
            row_offset: TOP_ROW as i32 - (column * capacity) as i32,
        });
        column_rows[column] += 1;
    }

    Layout::Rates {
        dropped: rows - placements.len(),
        placements,
        column_rows,
    }
}
