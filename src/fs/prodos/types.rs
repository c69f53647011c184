use num_derive::FromPrimitive;

pub const BLOCK_SIZE: usize = 512;
pub const VOL_KEY_BLOCK: u16 = 2;
pub const ENTRY_LEN: u8 = 0x27;
pub const ENTRIES_PER_BLOCK: u8 = 0x0d;

/// Enumerates ProDOS errors.  The `Display` trait will print equivalent ProDOS message such as `PATH NOT FOUND`.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("RANGE ERROR")]
    Range,
    #[error("PATH NOT FOUND")]
    FileNotFound,
    #[error("I/O ERROR (DIRECTORY OR INDEX BLOCK DAMAGED)")]
    CorruptDirectory,
    #[error("FILE TYPE MISMATCH")]
    FileTypeMismatch
}

#[derive(Clone,Copy,Debug,FromPrimitive,PartialEq)]
pub enum StorageType {
    Inactive = 0x00,
    Seedling = 0x01,
    Sapling = 0x02,
    Tree = 0x03,
    Pascal = 0x04,
    SubDirEntry = 0x0d,
    SubDirHeader = 0x0e,
    VolDirHeader = 0x0f
}

#[derive(Clone,Copy)]
pub enum Access {
    Read = 0x01,
    Write = 0x02,
    Backup = 0x20,
    Rename = 0x40,
    Destroy = 0x80
}
