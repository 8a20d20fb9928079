//! Input acquisition.
//!
//! The pipeline never holds on to a stream between phases. Every phase asks
//! the [`SourceResolver`] for a fresh one, so a resolver must be able to open
//! the same [`SourceRef`] any number of times.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A readable, seekable byte stream that can move to a worker thread.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// A freshly opened source stream positioned at the start of the image.
pub type SourceStream = Box<dyn ReadSeek>;

/// Where the source image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A content reference such as a `file://` URI.
    Reference(String),
    /// A file path, relative paths resolve against the resolver's files dir.
    Path(PathBuf),
    /// Encoded image bytes held in memory.
    Bytes(Arc<[u8]>),
    /// A bundled resource id.
    Resource(u32),
}

impl SourceRef {
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        SourceRef::Bytes(bytes.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        SourceRef::Path(path.into())
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Reference(uri) => write!(f, "reference {uri}"),
            SourceRef::Path(path) => write!(f, "file {}", path.display()),
            SourceRef::Bytes(bytes) => write!(f, "{} in-memory bytes", bytes.len()),
            SourceRef::Resource(id) => write!(f, "resource #{id}"),
        }
    }
}

/// Opens source streams on demand.
pub trait SourceResolver: Send + Sync {
    /// Open a new stream for `source`, positioned at its first byte.
    fn open(&self, source: &SourceRef) -> io::Result<SourceStream>;
}

impl<R: SourceResolver + ?Sized> SourceResolver for Arc<R> {
    fn open(&self, source: &SourceRef) -> io::Result<SourceStream> {
        (**self).open(source)
    }
}

impl<R: SourceResolver + ?Sized> SourceResolver for &R {
    fn open(&self, source: &SourceRef) -> io::Result<SourceStream> {
        (**self).open(source)
    }
}

/// Resolver backed by the local file system and in-memory tables.
#[derive(Debug, Default, Clone)]
pub struct LocalSourceResolver {
    files_dir: Option<PathBuf>,
    resources: HashMap<u32, PathBuf>,
    references: HashMap<String, PathBuf>,
}

impl LocalSourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that relative [`SourceRef::Path`] values resolve against.
    pub fn with_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files_dir = Some(dir.into());
        self
    }

    /// Register the file backing a bundled resource id.
    pub fn with_resource(mut self, id: u32, path: impl Into<PathBuf>) -> Self {
        self.resources.insert(id, path.into());
        self
    }

    /// Register the file backing a content reference that is not a `file://` URI.
    pub fn with_reference(mut self, reference: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.references.insert(reference.into(), path.into());
        self
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.files_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn open_file(path: &Path) -> io::Result<SourceStream> {
        Ok(Box::new(File::open(path)?))
    }
}

impl SourceResolver for LocalSourceResolver {
    fn open(&self, source: &SourceRef) -> io::Result<SourceStream> {
        match source {
            SourceRef::Bytes(bytes) => Ok(Box::new(Cursor::new(Arc::clone(bytes)))),
            SourceRef::Path(path) => Self::open_file(&self.resolve_path(path)),
            SourceRef::Resource(id) => match self.resources.get(id) {
                Some(path) => Self::open_file(path),
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no resource registered for id {id}"),
                )),
            },
            SourceRef::Reference(uri) => {
                if let Some(path) = self.references.get(uri) {
                    return Self::open_file(path);
                }
                match uri.strip_prefix("file://") {
                    Some(path) => Self::open_file(Path::new(path)),
                    None => Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("cannot resolve content reference {uri}"),
                    )),
                }
            }
        }
    }
}
