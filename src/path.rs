//! Locations inside a checked value, relative to the validation root.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// `.name`
    Field(String),
    /// `[index]`
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{name}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Ordered segments from the root down to the offending value.
///
/// Paths only ever grow at the front: each recursion level prepends exactly
/// one segment to the errors its callee produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self { Self::default() }
    pub fn is_root(&self) -> bool { self.0.is_empty() }
    pub fn segments(&self) -> &[Segment] { &self.0 }

    pub fn prefixed(mut self, segment: Segment) -> Self {
        self.0.insert(0, segment);
        self
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self { Self(segments) }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
