//! Destinations for the finished background image.
//!
//! A sink receives either the encoded output or, for the no-crop shortcut,
//! the untouched source stream. Either way it only sees a reader.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Accepts the bytes that become the device background.
pub trait WallpaperSink: Send {
    /// Consume `data` to the end.
    ///
    /// # Returns
    ///
    /// The number of bytes stored.
    fn accept(&mut self, data: &mut dyn Read) -> io::Result<u64>;
}

impl<S: WallpaperSink + ?Sized> WallpaperSink for &mut S {
    fn accept(&mut self, data: &mut dyn Read) -> io::Result<u64> {
        (**self).accept(data)
    }
}

impl<S: WallpaperSink + ?Sized> WallpaperSink for Box<S> {
    fn accept(&mut self, data: &mut dyn Read) -> io::Result<u64> {
        (**self).accept(data)
    }
}

/// Keeps the most recently accepted image in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    bytes: Vec<u8>,
    deliveries: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// How many times [`WallpaperSink::accept`] succeeded.
    pub fn deliveries(&self) -> usize {
        self.deliveries
    }
}

impl WallpaperSink for MemorySink {
    fn accept(&mut self, data: &mut dyn Read) -> io::Result<u64> {
        let mut bytes = Vec::new();
        data.read_to_end(&mut bytes)?;
        self.bytes = bytes;
        self.deliveries += 1;
        Ok(self.bytes.len() as u64)
    }
}

/// Writes the image to a file.
///
/// Data goes to a sibling temp file which is renamed over the destination
/// once complete, so a failed write never leaves a truncated image behind.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl WallpaperSink for FileSink {
    fn accept(&mut self, data: &mut dyn Read) -> io::Result<u64> {
        let temp = self.temp_path();
        let written = File::create(&temp).and_then(|mut file| {
            let written = io::copy(data, &mut file)?;
            file.flush()?;
            file.sync_all()?;
            Ok(written)
        });

        match written.and_then(|n| fs::rename(&temp, &self.path).map(|_| n)) {
            Ok(n) => Ok(n),
            Err(err) => {
                let _ = fs::remove_file(&temp);
                Err(err)
            }
        }
    }
}
