//! ## Sector Skewing Module
//!
//! A 5.25 inch track holds 16 physical sectors.  Disk images store them in one of
//! several orders, and file systems address them in a logical order of their own.
//! This module translates a (track,sector) address between these orderings.
//! The permutations are not arithmetic, so translation is always a table lookup.

use std::fmt;
use std::str::FromStr;
use super::Error;

pub const TRACKS: usize = 35;
pub const SECTORS: usize = 16;

/// Translate DOS 3.3 logical sector to physical sector
pub const DOS_LSEC_TO_DOS_PSEC: [usize;16] = [0,13,11,9,7,5,3,1,14,12,10,8,6,4,2,15];
/// Translate DOS 3.3 physical sector to logical sector
pub const DOS_PSEC_TO_DOS_LSEC: [usize;16] = [0,7,14,6,13,5,12,4,11,3,10,2,9,1,8,15];
/// Translate ProDOS logical sector (half block) to physical sector
pub const PRODOS_LSEC_TO_DOS_PSEC: [usize;16] = [0,2,4,6,8,10,12,14,1,3,5,7,9,11,13,15];
/// Translate physical sector to ProDOS logical sector (half block)
pub const DOS_PSEC_TO_PRODOS_LSEC: [usize;16] = [0,8,1,9,2,10,3,11,4,12,5,13,6,14,7,15];

/// Named sector orderings.  An image file stores a track's sectors in one of these,
/// and file systems address sectors in one of these.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum SectorOrder {
    Physical,
    /// DOS 3.3 logical order, used by `.do` and most `.dsk` files
    Dos,
    /// ProDOS logical order, used by `.po` files
    ProDos
}

impl SectorOrder {
    /// orderings in the sequence they are tried when probing an image
    pub const ALL: [SectorOrder;3] = [SectorOrder::Dos,SectorOrder::ProDos,SectorOrder::Physical];
    fn to_physical_table(&self) -> Option<&'static [usize;16]> {
        match self {
            Self::Physical => None,
            Self::Dos => Some(&DOS_LSEC_TO_DOS_PSEC),
            Self::ProDos => Some(&PRODOS_LSEC_TO_DOS_PSEC)
        }
    }
    fn from_physical_table(&self) -> Option<&'static [usize;16]> {
        match self {
            Self::Physical => None,
            Self::Dos => Some(&DOS_PSEC_TO_DOS_LSEC),
            Self::ProDos => Some(&DOS_PSEC_TO_PRODOS_LSEC)
        }
    }
}

impl FromStr for SectorOrder {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "physical" => Ok(Self::Physical),
            "do" | "dos" | "dsk" => Ok(Self::Dos),
            "po" | "prodos" => Ok(Self::ProDos),
            _ => Err(Error::InvalidOrder(s.to_string()))
        }
    }
}

impl fmt::Display for SectorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical => write!(f,"physical"),
            Self::Dos => write!(f,"do"),
            Self::ProDos => write!(f,"po")
        }
    }
}

/// A track and sector.  The ordering it refers to is carried separately.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct SectorAddress {
    pub track: usize,
    pub sector: usize
}

impl SectorAddress {
    pub fn new(track: usize,sector: usize) -> Self {
        Self { track, sector }
    }
    /// Fails unless the address lies on a 35 track, 16 sector disk
    pub fn verify(&self) -> Result<(),Error> {
        match self.track < TRACKS && self.sector < SECTORS {
            true => Ok(()),
            false => Err(Error::InvalidAddress(self.track,self.sector))
        }
    }
}

impl From<[u8;2]> for SectorAddress {
    fn from(ts: [u8;2]) -> Self {
        Self::new(ts[0] as usize,ts[1] as usize)
    }
}

impl fmt::Display for SectorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"T{} S{}",self.track,self.sector)
    }
}

/// Translate an address from one ordering to another.
/// The track never changes, only the sector index within the track.
pub fn translate(addr: SectorAddress,from: SectorOrder,to: SectorOrder) -> Result<SectorAddress,Error> {
    addr.verify()?;
    let phys = match from.to_physical_table() {
        Some(table) => table[addr.sector],
        None => addr.sector
    };
    let sector = match to.from_physical_table() {
        Some(table) => table[phys],
        None => phys
    };
    Ok(SectorAddress::new(addr.track,sector))
}

/// Get the two ProDOS-ordered sector addresses that make up a 512 byte block.
pub fn prodos_block_to_ts(block: usize) -> Result<[SectorAddress;2],Error> {
    let track = block / 8;
    let sec = (block % 8) * 2;
    let ans = [SectorAddress::new(track,sec),SectorAddress::new(track,sec+1)];
    ans[0].verify()?;
    Ok(ans)
}
