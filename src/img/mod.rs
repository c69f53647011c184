//! # Disk Image Module
//!
//! A disk image here is a sequential dump of already-decoded 256 byte sectors,
//! 35 tracks of 16 sectors each.  What varies between image files is the order
//! in which each track's sectors were dumped, see `bios::skew::SectorOrder`.
//!
//! ## Relation to File Systems
//!
//! The `Dsk` object serves as the underlying storage for the `fs` modules.
//! A file system addresses sectors in its own logical order, and the image
//! translates that into a position in its buffer.  The ordering of a given buffer
//! cannot be verified at this level, that has to wait for the file system to
//! recognize its structures (see `operator`).

pub mod dsk;

pub use dsk::Dsk;

use crate::bios::skew::SectorOrder;

pub const SECTOR_SIZE: usize = 256;
pub const BLOCK_SIZE: usize = 512;
pub const TRACKS: usize = 35;
pub const SECTORS: usize = 16;
pub const IMAGE_SIZE: usize = TRACKS*SECTORS*SECTOR_SIZE;

/// Enumerates disk image errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("image size {0} did not match the expected {1}")]
    ImageSizeMismatch(usize,usize),
    #[error("unable to access block {0}")]
    BlockAccess(usize)
}

/// Suggest a sector order based on the file extension of an image path.
pub fn order_from_extension(path: &str) -> Option<SectorOrder> {
    match path.rsplit('.').next().map(|s| s.to_lowercase()) {
        Some(ext) if ext=="do" || ext=="dsk" => Some(SectorOrder::Dos),
        Some(ext) if ext=="po" => Some(SectorOrder::ProDos),
        _ => None
    }
}

#[test]
fn extensions() {
    assert_eq!(order_from_extension("games/zork.PO"),Some(SectorOrder::ProDos));
    assert_eq!(order_from_extension("master.dsk"),Some(SectorOrder::Dos));
    assert_eq!(order_from_extension("blank.img"),None);
}
