use std::{
    fmt,
    io::{self, Write},
    ops::Range,
    sync::Arc,
};

/// Immutable bytes of a loaded file, shared between everything decoded from it.
///
/// Slicing never copies, so chunk records and embedded textures can keep a view of
/// the original buffer for lossless re-serialisation.
#[derive(Clone, PartialEq, Eq)]
pub struct VFile {
    data: Arc<[u8]>,
    range: Range<usize>,
}

impl VFile {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let range = 0..data.len();
        Self { data, range }
    }

    /// A view of `range` (relative to this view). Returns `None` if it does not fit.
    pub fn slice(&self, range: Range<usize>) -> Option<Self> {
        if range.start > range.end || range.end > self.len() {
            return None;
        }
        Some(Self {
            data: self.data.clone(),
            range: self.range.start + range.start..self.range.start + range.end,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Write the bytes back out exactly as they were loaded.
    pub fn save<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        log::debug!("Writing {} unmodified bytes", self.len());
        writer.write_all(self.data())
    }
}

impl Default for VFile {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AsRef<[u8]> for VFile {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl From<Vec<u8>> for VFile {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for VFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VFile({} bytes @ {:?})", self.len(), self.range)
    }
}
