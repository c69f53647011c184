use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use a2kit_macro::{DiskStruct,DiskStructError};
use crate::fs::Filetype;

pub const VTOC_TRACK: u8 = 17;
pub const TRACKS: u8 = 35;
pub const SECTORS: u8 = 16;
pub const MAX_PAIRS: u8 = 0x7a;
pub const ENTRIES_PER_SECTOR: usize = 7;
pub const NAME_LEN: usize = 30;
/// `tsl_track` value marking a deleted catalog entry
pub const DELETED: u8 = 0xff;

/// Enumerates DOS errors.  The `Display` trait will print equivalent DOS message such as `FILE NOT FOUND`.
/// Messages that DOS does not have are written in the same style.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("RANGE ERROR")]
    Range,
    #[error("FILE NOT FOUND")]
    FileNotFound,
    #[error("I/O ERROR (CATALOG OR TRACK SECTOR LIST DAMAGED)")]
    CorruptCatalog,
    #[error("DUPLICATE FILE NAME")]
    AlreadyExists,
    #[error("DISK FULL")]
    DiskFull,
    #[error("FILE LOCKED")]
    FileLocked,
    #[error("FILE TYPE MISMATCH")]
    FileTypeMismatch,
    #[error("SYNTAX ERROR")]
    Syntax
}

/// Enumerates the DOS 3.3 file types, the lock bit is handled separately.
/// * FileType to u8: `as u8`
/// * u8 to FileType: `FileType::from_u8` (use FromPrimitive trait)
/// * Filetype to FileType: `FileType::from_filetype`
#[derive(FromPrimitive,Debug,Clone,Copy,PartialEq)]
pub enum FileType {
    Text = 0x00,
    Integer = 0x01,
    Applesoft = 0x02,
    Binary = 0x04,
    S = 0x08,
    Relocatable = 0x10,
    NewA = 0x20,
    NewB = 0x40
}

impl FileType {
    pub fn from_type_byte(byte: u8) -> Option<Self> {
        Self::from_u8(byte & 0x7f)
    }
    pub fn from_filetype(typ: Filetype) -> Option<Self> {
        match typ {
            Filetype::ASCII_TEXT => Some(Self::Text),
            Filetype::INTEGER_BASIC => Some(Self::Integer),
            Filetype::APPLESOFT_BASIC => Some(Self::Applesoft),
            Filetype::BINARY => Some(Self::Binary),
            Filetype::DOS_S => Some(Self::S),
            Filetype::RELOCATABLE => Some(Self::Relocatable),
            Filetype::DOS_NEW_A => Some(Self::NewA),
            Filetype::DOS_NEW_B => Some(Self::NewB),
            _ => None
        }
    }
    pub fn to_filetype(&self) -> Filetype {
        match self {
            Self::Text => Filetype::ASCII_TEXT,
            Self::Integer => Filetype::INTEGER_BASIC,
            Self::Applesoft => Filetype::APPLESOFT_BASIC,
            Self::Binary => Filetype::BINARY,
            Self::S => Filetype::DOS_S,
            Self::Relocatable => Filetype::RELOCATABLE,
            Self::NewA => Filetype::DOS_NEW_A,
            Self::NewB => Filetype::DOS_NEW_B
        }
    }
}

/// Letter shown by the DOS `CATALOG` command
impl fmt::Display for FileType {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Text => "T",
            Self::Integer => "I",
            Self::Applesoft => "A",
            Self::Binary => "B",
            Self::S => "S",
            Self::Relocatable => "R",
            Self::NewA => "A",
            Self::NewB => "B"
        };
        write!(f,"{}",c)
    }
}

/// Structured representation of the bytes on disk that are stored with a BASIC program.  Works with either Applesoft or Integer.
pub struct TokenizedProgram {
    length: [u8;2],
    pub program: Vec<u8>
}

impl TokenizedProgram {
    /// Take unstructured bytes representing the tokens only (sans header) and pack it into the structure
    pub fn pack(prog: &[u8]) -> Result<Self,Error> {
        let len = u16::try_from(prog.len()).or(Err(Error::Range))?;
        Ok(Self {
            length: u16::to_le_bytes(len),
            program: prog.to_vec()
        })
    }
}

impl DiskStruct for TokenizedProgram {
    fn new() -> Self where Self: Sized {
        Self {
            length: [0;2],
            program: Vec::new()
        }
    }
    /// The length header is trusted only as far as the data goes, since there is usually sector padding
    fn from_bytes(dat: &[u8]) -> Result<Self,DiskStructError> where Self: Sized {
        if dat.len()<2 {
            return Err(DiskStructError::OutOfData);
        }
        let declared = u16::from_le_bytes([dat[0],dat[1]]) as usize + 2;
        if declared > dat.len() {
            log::warn!("program length exceeds the data, truncating");
        }
        Ok(Self {
            length: [dat[0],dat[1]],
            program: dat[2..usize::min(declared,dat.len())].to_vec()
        })
    }
    fn to_bytes(&self) -> Vec<u8> {
        [self.length.to_vec(),self.program.clone()].concat()
    }
    fn update_from_bytes(&mut self,dat: &[u8]) -> Result<(),DiskStructError> {
        *self = Self::from_bytes(dat)?;
        Ok(())
    }
    fn len(&self) -> usize {
        2 + self.program.len()
    }
}

/// Structured representation of sequential text files on disk.
/// The text ends at the first null, which need not be stored if the sector padding provides it.
pub struct SequentialText {
    pub text: Vec<u8>
}

impl DiskStruct for SequentialText {
    fn new() -> Self where Self: Sized {
        Self {
            text: Vec::new()
        }
    }
    fn from_bytes(dat: &[u8]) -> Result<Self,DiskStructError> where Self: Sized {
        Ok(Self {
            text: match dat.split(|x| *x==0).next() {
                Some(v) => v.to_vec(),
                None => dat.to_vec()
            }
        })
    }
    fn to_bytes(&self) -> Vec<u8> {
        self.text.clone()
    }
    fn update_from_bytes(&mut self,dat: &[u8]) -> Result<(),DiskStructError> {
        *self = Self::from_bytes(dat)?;
        Ok(())
    }
    fn len(&self) -> usize {
        self.text.len()
    }
}

/// Structured representation of binary data on disk
pub struct BinaryData {
    pub start: [u8;2],
    length: [u8;2],
    pub data: Vec<u8>
}

impl BinaryData {
    /// Take unstructured bytes representing the data only (sans header) and pack it into the structure
    pub fn pack(bin: &[u8],addr: u16) -> Result<Self,Error> {
        let len = u16::try_from(bin.len()).or(Err(Error::Range))?;
        Ok(Self {
            start: u16::to_le_bytes(addr),
            length: u16::to_le_bytes(len),
            data: bin.to_vec()
        })
    }
}

impl DiskStruct for BinaryData {
    fn new() -> Self where Self: Sized {
        Self {
            start: [0;2],
            length: [0;2],
            data: Vec::new()
        }
    }
    fn from_bytes(dat: &[u8]) -> Result<Self,DiskStructError> where Self: Sized {
        if dat.len()<4 {
            return Err(DiskStructError::OutOfData);
        }
        let declared = u16::from_le_bytes([dat[2],dat[3]]) as usize + 4;
        if declared > dat.len() {
            log::warn!("binary length exceeds the data, truncating");
        }
        Ok(Self {
            start: [dat[0],dat[1]],
            length: [dat[2],dat[3]],
            data: dat[4..usize::min(declared,dat.len())].to_vec()
        })
    }
    fn to_bytes(&self) -> Vec<u8> {
        [self.start.to_vec(),self.length.to_vec(),self.data.clone()].concat()
    }
    fn update_from_bytes(&mut self,dat: &[u8]) -> Result<(),DiskStructError> {
        *self = Self::from_bytes(dat)?;
        Ok(())
    }
    fn len(&self) -> usize {
        4 + self.data.len()
    }
}
