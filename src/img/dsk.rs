//! ## Support for sector dump images (DO, PO, DSK)
//!
//! The buffer is kept in the order it was found in, so that writing it back
//! reproduces the original file layout.  Every access is made in some named
//! ordering and is translated to the buffer's own ordering on the way in.

use log::{trace,error};
use super::{Error,SECTOR_SIZE,BLOCK_SIZE,SECTORS,TRACKS,IMAGE_SIZE};
use crate::bios::skew::{self,SectorAddress,SectorOrder};
use crate::{STDRESULT,DYNERR};

/// Wrapper for 140K sector dump data.
#[derive(Clone)]
pub struct Dsk {
    order: SectorOrder,
    data: Vec<u8>
}

impl Dsk {
    /// Create a blank image that will be stored in the given order
    pub fn create(order: SectorOrder) -> Self {
        Self {
            order,
            data: vec![0;IMAGE_SIZE]
        }
    }
    /// Take a copy of the buffer, assuming it is stored in the given order.
    pub fn from_bytes(data: &[u8],order: SectorOrder) -> Result<Self,Error> {
        if data.len()!=IMAGE_SIZE {
            error!("image has {} bytes, expected {}",data.len(),IMAGE_SIZE);
            return Err(Error::ImageSizeMismatch(data.len(),IMAGE_SIZE));
        }
        Ok(Self {
            order,
            data: data.to_vec()
        })
    }
    /// The order in which sectors are stored in this image's buffer
    pub fn order(&self) -> SectorOrder {
        self.order
    }
    pub fn track_count(&self) -> usize {
        TRACKS
    }
    fn offset(&self,addr: SectorAddress,space: SectorOrder) -> Result<usize,DYNERR> {
        let stored = skew::translate(addr,space,self.order)?;
        Ok(stored.track*SECTORS*SECTOR_SIZE + stored.sector*SECTOR_SIZE)
    }
    /// Read a sector, where `addr` is given in ordering `space`
    pub fn read_sector(&self,addr: SectorAddress,space: SectorOrder) -> Result<Vec<u8>,DYNERR> {
        trace!("read {} ({})",addr,space);
        let offset = self.offset(addr,space)?;
        Ok(self.data[offset..offset+SECTOR_SIZE].to_vec())
    }
    /// Write a sector, where `addr` is given in ordering `space`.
    /// Short data is padded with zeros, long data is truncated.
    pub fn write_sector(&mut self,addr: SectorAddress,space: SectorOrder,dat: &[u8]) -> STDRESULT {
        trace!("write {} ({})",addr,space);
        let offset = self.offset(addr,space)?;
        let n = usize::min(dat.len(),SECTOR_SIZE);
        self.data[offset..offset+n].copy_from_slice(&dat[0..n]);
        self.data[offset+n..offset+SECTOR_SIZE].fill(0);
        Ok(())
    }
    /// Read a ProDOS block
    pub fn read_block(&self,block: usize) -> Result<Vec<u8>,DYNERR> {
        let ts_list = match skew::prodos_block_to_ts(block) {
            Ok(l) => l,
            Err(_) => return Err(Box::new(Error::BlockAccess(block)))
        };
        let mut ans = Vec::with_capacity(BLOCK_SIZE);
        for ts in ts_list {
            ans.append(&mut self.read_sector(ts,SectorOrder::ProDos)?);
        }
        Ok(ans)
    }
    /// Write a ProDOS block
    pub fn write_block(&mut self,block: usize,dat: &[u8]) -> STDRESULT {
        let ts_list = match skew::prodos_block_to_ts(block) {
            Ok(l) => l,
            Err(_) => return Err(Box::new(Error::BlockAccess(block)))
        };
        let mut padded = dat.to_vec();
        padded.resize(BLOCK_SIZE,0);
        self.write_sector(ts_list[0],SectorOrder::ProDos,&padded[0..SECTOR_SIZE])?;
        self.write_sector(ts_list[1],SectorOrder::ProDos,&padded[SECTOR_SIZE..])
    }
    /// Buffer in the order it was found in
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
    /// Buffer re-serialized into any ordering
    pub fn to_order(&self,order: SectorOrder) -> Result<Vec<u8>,DYNERR> {
        let mut ans = Vec::with_capacity(IMAGE_SIZE);
        for track in 0..TRACKS {
            for sector in 0..SECTORS {
                ans.append(&mut self.read_sector(SectorAddress::new(track,sector),order)?);
            }
        }
        Ok(ans)
    }
}
