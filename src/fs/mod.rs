//! # File System Module
//!
//! File system modules handle interactions with directories and files.
//! There is a sub-module for each supported file system.
//!
//! File systems are represented by the `DiskFS` trait.
//! The trait object takes ownership of a disk image (`img::Dsk`),
//! which provides the track and sector storage.
//!
//! Files going in or out of a file system are represented by `FileInfo`,
//! which pairs the metadata in a `Descriptor` with the raw payload.
//! The payload excludes any headers the file system stores with the data,
//! e.g., the length and address preceding a DOS 3.3 binary file.

pub mod filetype;
pub mod dos3x;
pub mod prodos;

pub use filetype::Filetype;

use crate::img;
use crate::{STDRESULT,DYNERR};

/// Enumerates file system errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("file system not compatible with request")]
    NotThisFormat,
    #[error("no supported file system was recognized")]
    UnrecognizedFormat,
    #[error("unknown file type `{0}`")]
    UnknownFiletype(String),
    #[error("operation is not supported by this file system")]
    Unsupported
}

/// Metadata of a file as seen from the catalog
#[derive(Debug,Clone,PartialEq)]
pub struct Descriptor {
    pub name: String,
    /// length of the payload in bytes; in a DOS 3.3 catalog listing this is the capacity of the data sectors
    pub length: usize,
    pub filetype: Filetype,
    pub locked: bool,
    /// sectors or blocks used, including overhead
    pub blocks: usize
}

/// A file with its payload, either read from a disk image or about to be written.
#[derive(Debug,Clone,PartialEq)]
pub struct FileInfo {
    pub descriptor: Descriptor,
    pub data: Vec<u8>,
    /// load address, used by binary files
    pub load_addr: Option<u16>
}

impl FileInfo {
    pub fn new(name: &str,filetype: Filetype,data: Vec<u8>) -> Self {
        Self {
            descriptor: Descriptor {
                name: name.to_string(),
                length: data.len(),
                filetype,
                locked: false,
                blocks: 0
            },
            data,
            load_addr: None
        }
    }
    pub fn with_load_addr(mut self,addr: u16) -> Self {
        self.load_addr = Some(addr);
        self
    }
}

/// Abstract file system interface.  Presumed to own an underlying disk image.
/// Names are always plain file names, since only a single (root) directory is handled.
pub trait DiskFS {
    /// Short name of the file system, e.g., `DOS 3.3`
    fn fs_name(&self) -> &'static str;
    /// List the active files
    fn catalog(&mut self) -> Result<Vec<Descriptor>,DYNERR>;
    /// Catalog in the native style of the file system
    fn catalog_to_string(&mut self) -> Result<String,DYNERR>;
    /// Read a file, the payload is truncated to the stored length
    fn get(&mut self,name: &str) -> Result<FileInfo,DYNERR>;
    /// Write a file, returning the new catalog entry.  Nothing is changed if this fails.
    fn put(&mut self,file: &FileInfo,overwrite: bool) -> Result<Descriptor,DYNERR>;
    /// Delete a file, returning false if there was no such file
    fn delete(&mut self,name: &str) -> Result<bool,DYNERR>;
    /// Write protect a file
    fn lock(&mut self,name: &str) -> STDRESULT;
    /// Remove write protection from a file
    fn unlock(&mut self,name: &str) -> STDRESULT;
    /// Rename a file
    fn rename(&mut self,old_name: &str,new_name: &str) -> STDRESULT;
    /// Number of free sectors (DOS) or blocks (ProDOS)
    fn num_free(&mut self) -> Result<usize,DYNERR>;
    /// Heuristic measure of how well the structures check out, used when
    /// more than one sector ordering is accepted for the same buffer.
    fn probe_score(&self) -> usize;
    /// Has the image been changed since it was mounted or written back
    fn is_dirty(&self) -> bool;
    fn clear_dirty(&mut self);
    /// Get the underlying disk image
    fn get_img(&self) -> &img::Dsk;
}
