//! # Disk operator
//!
//! The operator is the format agnostic face of the library.  It takes an image buffer,
//! works out which file system and sector ordering it holds, and then forwards file
//! operations to the mounted `DiskFS`.  Changes stay in memory until the buffer is handed
//! back with `write_back` or `to_bytes`.

use std::io::Write;
use std::str::FromStr;
use log::{debug,info};
use crate::bios::skew::SectorOrder;
use crate::fs::{self,DiskFS,Descriptor,FileInfo};
use crate::img;
use crate::{STDRESULT,DYNERR};

/// File systems that can be requested, `Auto` tries each in priority order
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum Format {
    Auto,
    Dos33,
    ProDos
}

impl Format {
    /// Concrete formats in the order they are tried
    pub const PRIORITY: [Format;2] = [Format::Dos33,Format::ProDos];
}

impl FromStr for Format {
    type Err = fs::Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "dos3" | "dos33" => Ok(Self::Dos33),
            "prodos" => Ok(Self::ProDos),
            _ => Err(fs::Error::UnrecognizedFormat)
        }
    }
}

/// Put a file system on the image, this is the only place the concrete drivers are named.
/// Returns `fs::Error::NotThisFormat` if the image does not hold the requested format.
/// `Auto` names no driver, `DiskOperator::open` expands it into `Format::PRIORITY`.
fn mount(format: Format,img: img::Dsk) -> Result<Box<dyn DiskFS>,DYNERR> {
    match format {
        Format::Dos33 => Ok(Box::new(fs::dos3x::Disk::from_img(img)?)),
        Format::ProDos => Ok(Box::new(fs::prodos::Disk::from_img(img)?)),
        Format::Auto => Err(Box::new(fs::Error::NotThisFormat))
    }
}

fn is_not_this_format(e: &DYNERR) -> bool {
    matches!(e.downcast_ref::<fs::Error>(),Some(fs::Error::NotThisFormat))
}

pub struct DiskOperator {
    disk: Box<dyn DiskFS>
}

impl DiskOperator {
    /// Probe the buffer and mount it.  If `order` is `None` every ordering is tried.
    /// When more than one ordering mounts, the one whose directory structure checks out
    /// furthest is chosen, ties going to the first in `SectorOrder::ALL`.
    pub fn open(buf: &[u8],order: Option<SectorOrder>,format: Format) -> Result<(Self,SectorOrder),DYNERR> {
        let formats = match format {
            Format::Auto => Format::PRIORITY.to_vec(),
            f => vec![f]
        };
        let orders = match order {
            Some(o) => vec![o],
            None => SectorOrder::ALL.to_vec()
        };
        for fmt in formats {
            let mut best: Option<(Box<dyn DiskFS>,SectorOrder,usize)> = None;
            for ord in orders.iter() {
                let dsk = img::Dsk::from_bytes(buf,*ord)?;
                match mount(fmt,dsk) {
                    Ok(disk) => {
                        let score = disk.probe_score();
                        debug!("{} mounts in {} order with score {}",disk.fs_name(),ord,score);
                        let better = match &best {
                            Some((_,_,best_score)) => score > *best_score,
                            None => true
                        };
                        if better {
                            best = Some((disk,*ord,score));
                        }
                    },
                    Err(e) if is_not_this_format(&e) => debug!("{:?} rejected in {} order",fmt,ord),
                    Err(e) => return Err(e)
                }
            }
            if let Some((disk,ord,_)) = best {
                info!("identified {} in {} order",disk.fs_name(),ord);
                return Ok((Self { disk },ord));
            }
        }
        Err(Box::new(fs::Error::UnrecognizedFormat))
    }
    /// Format a new DOS 3.3 volume stored in the given order
    pub fn create_dos33(order: SectorOrder,vol: u8) -> Result<Self,DYNERR> {
        let disk = fs::dos3x::Disk::init33(img::Dsk::create(order),vol)?;
        Ok(Self {
            disk: Box::new(disk)
        })
    }
    pub fn fs_name(&self) -> &'static str {
        self.disk.fs_name()
    }
    /// Order of the buffer, as found when the image was opened
    pub fn order(&self) -> SectorOrder {
        self.disk.get_img().order()
    }
    pub fn catalog(&mut self) -> Result<Vec<Descriptor>,DYNERR> {
        self.disk.catalog()
    }
    pub fn catalog_to_string(&mut self) -> Result<String,DYNERR> {
        self.disk.catalog_to_string()
    }
    pub fn get(&mut self,name: &str) -> Result<FileInfo,DYNERR> {
        self.disk.get(name)
    }
    pub fn put(&mut self,file: &FileInfo,overwrite: bool) -> Result<Descriptor,DYNERR> {
        self.disk.put(file,overwrite)
    }
    pub fn delete(&mut self,name: &str) -> Result<bool,DYNERR> {
        self.disk.delete(name)
    }
    pub fn lock(&mut self,name: &str) -> STDRESULT {
        self.disk.lock(name)
    }
    pub fn unlock(&mut self,name: &str) -> STDRESULT {
        self.disk.unlock(name)
    }
    pub fn rename(&mut self,old_name: &str,new_name: &str) -> STDRESULT {
        self.disk.rename(old_name,new_name)
    }
    pub fn num_free(&mut self) -> Result<usize,DYNERR> {
        self.disk.num_free()
    }
    /// Are there changes that have not been written back
    pub fn is_dirty(&self) -> bool {
        self.disk.is_dirty()
    }
    /// Image buffer in its original order, or re-ordered if `order` is given
    pub fn to_bytes(&self,order: Option<SectorOrder>) -> Result<Vec<u8>,DYNERR> {
        match order {
            Some(o) => self.disk.get_img().to_order(o),
            None => Ok(self.disk.get_img().to_bytes())
        }
    }
    /// Hand the complete buffer, in its original order, to the writer.
    /// The image is clean afterwards.
    pub fn write_back<W: Write>(&mut self,writer: &mut W) -> STDRESULT {
        writer.write_all(&self.disk.get_img().to_bytes())?;
        writer.flush()?;
        self.disk.clear_dirty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::Filetype;

    #[test]
    fn formats_parse() {
        assert_eq!(Format::from_str("dos3").expect("parse"),Format::Dos33);
        assert_eq!(Format::from_str("prodos").expect("parse"),Format::ProDos);
        assert!(Format::from_str("cpm").is_err());
    }

    #[test]
    fn blank_is_unrecognized() {
        let err = DiskOperator::open(&vec![0;img::IMAGE_SIZE],None,Format::Auto).err().expect("should fail");
        assert!(matches!(err.downcast_ref::<fs::Error>(),Some(fs::Error::UnrecognizedFormat)));
        let err = DiskOperator::open(&vec![0;100],None,Format::Auto).err().expect("should fail");
        assert!(matches!(err.downcast_ref::<img::Error>(),Some(img::Error::ImageSizeMismatch(100,_))));
    }

    #[test]
    fn dirty_until_written() {
        let mut op = DiskOperator::create_dos33(SectorOrder::Dos,254).expect("create");
        let mut buf: Vec<u8> = Vec::new();
        op.write_back(&mut buf).expect("write back");
        assert!(!op.is_dirty());
        let (mut op,order) = DiskOperator::open(&buf,None,Format::Auto).expect("open");
        assert_eq!(order,SectorOrder::Dos);
        assert!(!op.is_dirty());
        op.put(&FileInfo::new("HELLO",Filetype::ASCII_TEXT,vec![0xc1]),false).expect("put");
        assert!(op.is_dirty());
        op.write_back(&mut buf).expect("write back");
        assert!(!op.is_dirty());
    }

    #[test]
    fn auto_tries_each_format() {
        let op = DiskOperator::create_dos33(SectorOrder::ProDos,1).expect("create");
        let buf = op.to_bytes(None).expect("bytes");
        let (op,order) = DiskOperator::open(&buf,Some(SectorOrder::ProDos),Format::Auto).expect("open");
        assert_eq!((op.fs_name(),order),("DOS 3.3",SectorOrder::ProDos));
        let err = DiskOperator::open(&buf,Some(SectorOrder::ProDos),Format::ProDos).err().expect("not ProDOS");
        assert!(matches!(err.downcast_ref::<fs::Error>(),Some(fs::Error::UnrecognizedFormat)));
    }
}
