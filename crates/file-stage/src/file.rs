//! File units flowing through a stage.
//!
//! A [`FileUnit`] carries its content in exactly one [`Representation`]: an
//! in-memory buffer, an open readable stream, or nothing at all.

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Boxed readable byte stream backing stream-represented contents.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Content-storage mode of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Buffer,
    Stream,
    Null,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Buffer => f.write_str("buffer"),
            Representation::Stream => f.write_str("stream"),
            Representation::Null => f.write_str("null"),
        }
    }
}

/// Shared handle to a readable stream.
///
/// Clones refer to the same underlying stream, which can be taken exactly once.
#[derive(Clone)]
pub struct ContentStream {
    inner: Arc<Mutex<Option<ByteStream>>>,
}

impl ContentStream {
    pub fn new(stream: ByteStream) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(stream))),
        }
    }

    /// Stream yielding the given chunks in order.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        let chunks = chunks.into_iter().map(Ok::<_, std::io::Error>);
        Self::new(futures::stream::iter(chunks).boxed())
    }

    pub fn empty() -> Self {
        Self::new(futures::stream::empty::<std::io::Result<Bytes>>().boxed())
    }

    /// Take the underlying stream. Returns `None` once it has been consumed.
    pub fn take(&self) -> Option<ByteStream> {
        self.inner.lock().take()
    }

    /// Whether the stream is still available to be taken.
    pub fn is_available(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Returns true when both handles refer to the same stream.
    pub fn ptr_eq(&self, other: &ContentStream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStream")
            .field("available", &self.is_available())
            .finish()
    }
}

/// Contents of a file unit.
#[derive(Debug, Clone)]
pub enum Contents {
    Buffer(Bytes),
    Stream(ContentStream),
    Null,
}

impl Contents {
    pub fn representation(&self) -> Representation {
        match self {
            Contents::Buffer(_) => Representation::Buffer,
            Contents::Stream(_) => Representation::Stream,
            Contents::Null => Representation::Null,
        }
    }
}

/// A discrete item flowing through the pipeline.
#[derive(Debug, Clone)]
pub struct FileUnit {
    path: PathBuf,
    contents: Contents,
}

impl FileUnit {
    pub fn new(path: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }

    pub fn buffer(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self::new(path, Contents::Buffer(data.into()))
    }

    pub fn stream(path: impl Into<PathBuf>, stream: ContentStream) -> Self {
        Self::new(path, Contents::Stream(stream))
    }

    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Contents::Null)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn representation(&self) -> Representation {
        self.contents.representation()
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self.contents, Contents::Buffer(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// Replace the contents, keeping the path.
    pub fn with_contents(mut self, contents: Contents) -> Self {
        self.contents = contents;
        self
    }
}
