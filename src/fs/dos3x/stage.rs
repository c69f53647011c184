//! # Staged changes to a DOS 3.3 volume
//!
//! Multi-sector operations are worked out against a `Transaction`, which holds a copy of the
//! VTOC and every sector written so far.  Reads see the pending writes.  Nothing touches the
//! image until the driver folds the finished transaction in, so an operation that fails
//! part way leaves the volume as it was.

use std::collections::BTreeMap;
use a2kit_macro::DiskStruct;
use log::{trace,debug};
use super::directory::VTOC;
use super::types::Error;
use crate::bios::skew::{SectorAddress,SectorOrder};
use crate::img;
use crate::{STDRESULT,DYNERR};

/// Anything that can produce DOS sectors in the context of a VTOC
pub trait SectorSource {
    fn vtoc(&self) -> &VTOC;
    /// read a sector given as DOS logical [track,sector]
    fn read_ts(&self,ts: [u8;2]) -> Result<Vec<u8>,DYNERR>;
}

/// Read a sector from the image, checking it against the volume geometry
pub fn read_checked(img: &img::Dsk,vtoc: &VTOC,ts: [u8;2]) -> Result<Vec<u8>,DYNERR> {
    if !vtoc.contains(ts) {
        debug!("sector reference T{} S{} is outside the volume",ts[0],ts[1]);
        return Err(Box::new(Error::CorruptCatalog));
    }
    img.read_sector(SectorAddress::new(ts[0] as usize,ts[1] as usize),SectorOrder::Dos)
}

/// The outcome of a successful transaction, ready to be committed
pub struct Staged {
    pub vtoc: VTOC,
    pub sectors: BTreeMap<[u8;2],Vec<u8>>
}

pub struct Transaction<'a> {
    img: &'a img::Dsk,
    pub vtoc: VTOC,
    pending: BTreeMap<[u8;2],Vec<u8>>
}

impl<'a> Transaction<'a> {
    pub fn begin(img: &'a img::Dsk,vtoc: &VTOC) -> Self {
        Self {
            img,
            vtoc: vtoc.clone(),
            pending: BTreeMap::new()
        }
    }
    pub fn write_sector(&mut self,ts: [u8;2],dat: &[u8]) -> STDRESULT {
        if !self.vtoc.contains(ts) {
            return Err(Box::new(Error::Range));
        }
        trace!("stage write T{} S{}",ts[0],ts[1]);
        let mut buf = dat.to_vec();
        buf.resize(crate::img::SECTOR_SIZE,0);
        self.pending.insert(ts,buf);
        Ok(())
    }
    pub fn write_struct<T: DiskStruct>(&mut self,ts: [u8;2],obj: &T) -> STDRESULT {
        self.write_sector(ts,&obj.to_bytes())
    }
    /// Take the next free sector out of the staged bitmap
    pub fn allocate(&mut self) -> Result<[u8;2],Error> {
        match self.vtoc.next_free() {
            Some(ts) => {
                self.vtoc.allocate(ts[0],ts[1]);
                self.vtoc.update_last_track(ts[0]);
                debug!("allocate T{} S{}",ts[0],ts[1]);
                Ok(ts)
            },
            None => Err(Error::DiskFull)
        }
    }
    pub fn deallocate(&mut self,ts: [u8;2]) {
        debug!("free T{} S{}",ts[0],ts[1]);
        self.vtoc.deallocate(ts[0],ts[1]);
    }
    pub fn finish(self) -> Staged {
        Staged {
            vtoc: self.vtoc,
            sectors: self.pending
        }
    }
}

impl<'a> SectorSource for Transaction<'a> {
    fn vtoc(&self) -> &VTOC {
        &self.vtoc
    }
    fn read_ts(&self,ts: [u8;2]) -> Result<Vec<u8>,DYNERR> {
        match self.pending.get(&ts) {
            Some(buf) => Ok(buf.clone()),
            None => read_checked(self.img,&self.vtoc,ts)
        }
    }
}
