//! Include/exclude filtering of goroutine blocks

/// Literal substring filters applied to each goroutine's own block
///
/// A block is kept when the include list is empty or one of its entries
/// occurs in the block, and none of the exclude entries does. Empty strings
/// are dropped on construction since they would match every block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Filters {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let clean = |items: Vec<String>| -> Vec<String> {
            items.into_iter().filter(|s| !s.is_empty()).collect()
        };
        Filters {
            include: clean(include.into_iter().map(Into::into).collect()),
            exclude: clean(exclude.into_iter().map(Into::into).collect()),
        }
    }

    /// Filters that keep everything
    pub fn none() -> Self {
        Filters::default()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Whether a block with this raw text survives filtering
    pub fn accepts(&self, block: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|f| block.contains(f.as_str()));
        included && !self.exclude.iter().any(|f| block.contains(f.as_str()))
    }
}
