//! Interface to a NEFIS library.
//!
//! NEFIS stores Delft3D history output as a definition file (`.def`) and a
//! data file (`.dat`). Data are organised in named groups; each group has a
//! cell listing element names, and each element has a type, a byte width and
//! a dimension vector. The group dimension (usually time) comes first in an
//! index window, followed by the element dimensions.
//!
//! This crate does not link NEFIS itself. Callers supply a [`NefisLibrary`]
//! that opens [`NefisFile`] sessions; dropping the session closes the file.

use std::path::Path;

/// A failure reported by the NEFIS library.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("code {code}: {message}")]
pub struct NefisError {
    /// Library return code.
    pub code: i32,
    /// Library diagnostic text.
    pub message: String,
}

impl NefisError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Metadata for one NEFIS element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// Storage type tag, e.g. `REAL`, `INTEGER`, `CHARACTE`.
    pub type_name: String,
    /// Bytes per stored value.
    pub byte_width: usize,
    /// Physical quantity.
    pub quantity: String,
    pub units: String,
    pub description: String,
    /// Element dimensions, not including the group dimension.
    pub dimensions: Vec<usize>,
}

impl ElementInfo {
    /// Number of values in one group index.
    pub fn value_count(&self) -> usize {
        self.dimensions.iter().product()
    }
}

/// A 1-based inclusive index range with a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl IndexRange {
    /// The single index `i`.
    pub fn single(i: usize) -> Self {
        Self {
            start: i,
            stop: i,
            step: 1,
        }
    }

    /// Indices `1..=n`.
    pub fn first(n: usize) -> Self {
        Self {
            start: 1,
            stop: n,
            step: 1,
        }
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize {
        if self.stop < self.start || self.step == 0 {
            0
        } else {
            (self.stop - self.start) / self.step + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Opens NEFIS file pairs.
pub trait NefisLibrary {
    /// Opens a definition/data file pair for reading.
    ///
    /// # Errors
    ///
    /// Returns the library's error if the pair cannot be opened.
    fn open(&self, definition: &Path, data: &Path) -> Result<Box<dyn NefisFile>, NefisError>;
}

/// An open NEFIS file pair. Dropping it closes the files.
pub trait NefisFile {
    /// Highest index written to `group`'s group dimension.
    fn max_index(&self, group: &str) -> Result<usize, NefisError>;

    /// Name of the cell that defines `group`.
    fn group_cell(&self, group: &str) -> Result<String, NefisError>;

    /// Names of the elements in `cell`.
    fn cell_elements(&self, cell: &str) -> Result<Vec<String>, NefisError>;

    /// Type, size and dimensions of `element`.
    fn element_info(&self, element: &str) -> Result<ElementInfo, NefisError>;

    /// Reads `element` from `group` over `window` into `buffer`.
    ///
    /// `window` holds one range for the group dimension followed by one per
    /// element dimension. `buffer` must be exactly the size of the selection.
    fn read_element(
        &self,
        group: &str,
        element: &str,
        window: &[IndexRange],
        buffer: &mut [u8],
    ) -> Result<(), NefisError>;
}
