//! Object streams and id-tagged values
//!
//! Query results are delivered as [`ObjectStream`]s: lazy, single-pass
//! iterators that hold whatever the producing store needs to keep the
//! iteration going (buffers, index cursors) and release it when the stream is
//! closed or dropped.

use std::fmt;

/// A lazy, closeable stream of results
///
/// Closing (or dropping) the stream releases its source; a closed stream
/// yields nothing. Terminal operations consume the stream.
pub struct ObjectStream<'a, T> {
    source: Option<Box<dyn Iterator<Item = T> + 'a>>,
}

impl<'a, T: 'a> ObjectStream<'a, T> {
    /// Wrap an iterator
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'a,
    {
        ObjectStream {
            source: Some(Box::new(iter)),
        }
    }

    /// A stream with no items
    pub fn empty() -> Self {
        ObjectStream::new(std::iter::empty())
    }

    /// Release the stream's source
    ///
    /// Idempotent; later calls to `next` return `None`.
    pub fn close(&mut self) {
        self.source = None;
    }

    /// Has the stream been closed?
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Transform each item, keeping the stream lazy
    pub fn map_items<U, F>(self, f: F) -> ObjectStream<'a, U>
    where
        F: FnMut(T) -> U + 'a,
        U: 'a,
    {
        match self.source {
            Some(source) => ObjectStream::new(source.map(f)),
            None => ObjectStream { source: None },
        }
    }
}

impl<T> Iterator for ObjectStream<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.source.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            Some(source) => source.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<T> fmt::Debug for ObjectStream<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStream")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A value tagged with an id (e.g. the group key of a grouped query)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdBox<T> {
    id: i64,
    value: T,
}

impl<T> IdBox<T> {
    /// Tag a value with an id
    pub fn new(id: i64, value: T) -> Self {
        IdBox { id, value }
    }

    /// The id
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Unwrap the value
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into id and value
    pub fn into_parts(self) -> (i64, T) {
        (self.id, self.value)
    }

    /// Transform the value, keeping the id
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> IdBox<U> {
        IdBox {
            id: self.id,
            value: f(self.value),
        }
    }
}
