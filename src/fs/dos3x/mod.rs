//! # DOS 3.3 file system module
//! This manipulates disk images containing one standard 16 sector DOS 3.3 volume.
//!
//! * Analogues of BASIC commands like SAVE, BSAVE, DELETE, LOCK are exposed through the `DiskFS` trait
//! * Every change is staged in a `stage::Transaction` and folded into the image only when it succeeds
//! * Unlike DOS, sectors are allocated first fit in ascending track and sector order

pub mod types;
pub mod directory;
pub mod stage;
pub mod pack;

use std::collections::HashSet;
use std::fmt::Write;
use a2kit_macro::DiskStruct;
use log::{debug,info,warn};

pub use types::Error;
use types::*;
use directory::*;
use stage::{SectorSource,Staged,Transaction};
use pack::*;
use crate::bios::skew::{SectorAddress,SectorOrder};
use crate::fs::{Descriptor,FileInfo};
use crate::img;
use crate::{STDRESULT,DYNERR};

pub const FS_NAME: &str = "DOS 3.3";

/// Catalog entry as found on disk, along with where it was found
#[derive(Clone,Debug,PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub type_byte: u8,
    pub filetype: Option<FileType>,
    pub locked: bool,
    /// sectors used, including track sector lists
    pub sectors: u16,
    pub tsl: [u8;2],
    /// catalog sector and index of the entry within it
    pub slot: ([u8;2],usize)
}

impl CatalogEntry {
    fn from_entry(entry: &DirectoryEntry,ts: [u8;2],idx: usize) -> Self {
        Self {
            name: file_name_to_string(entry.name),
            type_byte: entry.file_type,
            filetype: entry.file_type(),
            locked: entry.is_locked(),
            sectors: entry.sector_count(),
            tsl: entry.tsl(),
            slot: (ts,idx)
        }
    }
    fn to_descriptor(&self) -> Descriptor {
        Descriptor {
            name: self.name.clone(),
            // capacity of the data sectors, the exact length requires reading the file
            length: (self.sectors as usize).saturating_sub(1) * img::SECTOR_SIZE,
            filetype: match self.filetype {
                Some(t) => t.to_filetype(),
                None => crate::fs::Filetype::TYPELESS
            },
            locked: self.locked,
            blocks: self.sectors as usize
        }
    }
}

/// Walk the catalog, returning every catalog sector in chain order
fn catalog_chain<S: SectorSource>(src: &S) -> Result<Vec<([u8;2],DirectorySector)>,DYNERR> {
    let vtoc = src.vtoc();
    let bound = vtoc.tracks as usize * vtoc.sectors as usize;
    let mut visited: HashSet<[u8;2]> = HashSet::new();
    let mut ans = Vec::new();
    let mut ts = [vtoc.track1,vtoc.sector1];
    while ts[0]>0 {
        if ans.len()>=bound || !visited.insert(ts) {
            debug!("catalog chain loops back to T{} S{}",ts[0],ts[1]);
            return Err(Box::new(Error::CorruptCatalog));
        }
        let dir = DirectorySector::from_bytes(&src.read_ts(ts)?)?;
        let next = dir.next();
        ans.push((ts,dir));
        ts = next;
    }
    Ok(ans)
}

/// Walk a track sector list chain, returning the TSL sectors, and the data sectors in order.
/// Sparse slots are `None`, trailing sparse slots are dropped.
fn tsl_chain<S: SectorSource>(src: &S,start: [u8;2]) -> Result<(Vec<[u8;2]>,Vec<Option<[u8;2]>>),DYNERR> {
    let vtoc = src.vtoc();
    let bound = vtoc.tracks as usize * vtoc.sectors as usize;
    let max_pairs = usize::min(vtoc.max_pairs as usize,MAX_PAIRS as usize);
    let mut visited: HashSet<[u8;2]> = HashSet::new();
    let mut tsls = Vec::new();
    let mut pairs = Vec::new();
    let mut ts = start;
    while ts[0]>0 {
        if tsls.len()>=bound || !visited.insert(ts) {
            debug!("track sector list loops back to T{} S{}",ts[0],ts[1]);
            return Err(Box::new(Error::CorruptCatalog));
        }
        let tsl = TrackSectorList::from_bytes(&src.read_ts(ts)?)?;
        for p in 0..max_pairs {
            let pair = tsl.pair(p);
            if pair[0]==0 {
                pairs.push(None);
            } else if vtoc.contains(pair) {
                pairs.push(Some(pair));
            } else {
                debug!("data sector T{} S{} is outside the volume",pair[0],pair[1]);
                return Err(Box::new(Error::CorruptCatalog));
            }
        }
        tsls.push(ts);
        ts = tsl.next();
    }
    while let Some(None) = pairs.last() {
        pairs.pop();
    }
    Ok((tsls,pairs))
}

/// List every active entry
fn entries<S: SectorSource>(src: &S) -> Result<Vec<CatalogEntry>,DYNERR> {
    let mut ans = Vec::new();
    for (ts,dir) in catalog_chain(src)? {
        for (idx,entry) in dir.entries.iter().enumerate() {
            if entry.is_active() {
                ans.push(CatalogEntry::from_entry(entry,ts,idx));
            }
        }
    }
    Ok(ans)
}

/// Find the active entry with the given name, the name must be unique
fn find<S: SectorSource>(src: &S,name: &str) -> Result<Option<CatalogEntry>,DYNERR> {
    let fname = lookup_name(name)?;
    let mut ans: Option<CatalogEntry> = None;
    for (ts,dir) in catalog_chain(src)? {
        for (idx,entry) in dir.entries.iter().enumerate() {
            if entry.is_active() && entry.name==fname {
                if ans.is_some() {
                    debug!("duplicate catalog entries for {}",name);
                    return Err(Box::new(Error::CorruptCatalog));
                }
                ans = Some(CatalogEntry::from_entry(entry,ts,idx));
            }
        }
    }
    Ok(ans)
}

/// First deleted or never used slot in chain order
fn free_slot<S: SectorSource>(src: &S) -> Result<Option<([u8;2],usize)>,DYNERR> {
    for (ts,dir) in catalog_chain(src)? {
        for (idx,entry) in dir.entries.iter().enumerate() {
            if !entry.is_active() {
                return Ok(Some((ts,idx)));
            }
        }
    }
    Ok(None)
}

/// Release the data and TSL sectors of a file in the staged bitmap
fn free_file(tx: &mut Transaction,tsl_start: [u8;2]) -> STDRESULT {
    let (tsls,pairs) = tsl_chain(&*tx,tsl_start)?;
    for ts in pairs.into_iter().flatten() {
        tx.deallocate(ts);
    }
    for ts in tsls {
        tx.deallocate(ts);
    }
    Ok(())
}

/// The primary interface for disk operations.
pub struct Disk {
    vtoc: VTOC,
    img: img::Dsk,
    dirty: bool
}

impl SectorSource for Disk {
    fn vtoc(&self) -> &VTOC {
        &self.vtoc
    }
    fn read_ts(&self,ts: [u8;2]) -> Result<Vec<u8>,DYNERR> {
        stage::read_checked(&self.img,&self.vtoc,ts)
    }
}

fn vtoc_addr() -> SectorAddress {
    SectorAddress::new(VTOC_TRACK as usize,0)
}

impl Disk {
    /// Test an image to see if it already contains DOS 3.3.
    pub fn test_img(img: &img::Dsk) -> bool {
        if img.track_count()!=TRACKS as usize {
            debug!("track count is unexpected");
            return false;
        }
        let vtoc = match img.read_sector(vtoc_addr(),SectorOrder::Dos) {
            Ok(buf) => match VTOC::from_bytes(&buf) {
                Ok(v) => v,
                Err(_) => return false
            },
            Err(_) => {
                debug!("VTOC sector was not readable");
                return false;
            }
        };
        if vtoc.version<3 {
            debug!("VTOC wrong version {}",vtoc.version);
            return false;
        }
        if vtoc.vol<1 || vtoc.vol>254 {
            debug!("Volume {} out of range",vtoc.vol);
            return false;
        }
        if vtoc.track1 != VTOC_TRACK || vtoc.sector1 >= SECTORS {
            debug!("VTOC wrong track1 {}, sector1 {}",vtoc.track1,vtoc.sector1);
            return false;
        }
        if vtoc.bytes != [0,1] || vtoc.sectors != SECTORS || vtoc.tracks != TRACKS {
            debug!("VTOC wrong bytes {:?}, sectors {}, tracks {}",vtoc.bytes,vtoc.sectors,vtoc.tracks);
            return false;
        }
        if vtoc.max_pairs<1 || vtoc.max_pairs>MAX_PAIRS {
            debug!("VTOC wrong max pairs {}",vtoc.max_pairs);
            return false;
        }
        true
    }
    /// Create a disk file system using the given image as storage.
    /// The DiskFS takes ownership of the image.
    pub fn from_img(img: img::Dsk) -> Result<Self,DYNERR> {
        if !Self::test_img(&img) {
            return Err(Box::new(crate::fs::Error::NotThisFormat));
        }
        let vtoc = VTOC::from_bytes(&img.read_sector(vtoc_addr(),SectorOrder::Dos)?)?;
        info!("found DOS 3.{} volume {}",vtoc.version,vtoc.vol);
        Ok(Self {
            vtoc,
            img,
            dirty: false
        })
    }
    /// Create a standard non-bootable DOS 3.3 volume (140K) on the given image
    pub fn init33(img: img::Dsk,vol: u8) -> Result<Self,DYNERR> {
        if vol<1 || vol>254 {
            return Err(Box::new(Error::Range));
        }
        let mut vtoc = VTOC::new();
        vtoc.pad1 = 4;
        vtoc.track1 = VTOC_TRACK;
        vtoc.sector1 = SECTORS-1;
        vtoc.version = 3;
        vtoc.vol = vol;
        vtoc.max_pairs = MAX_PAIRS;
        vtoc.last_track = VTOC_TRACK;
        vtoc.last_direction = 1;
        vtoc.tracks = TRACKS;
        vtoc.sectors = SECTORS;
        vtoc.bytes = [0,1];
        // everything is free except track 0 and the catalog track
        for track in 1..TRACKS {
            if track!=VTOC_TRACK {
                let i = track as usize * 4;
                vtoc.bitmap[i..i+4].copy_from_slice(&u32::to_be_bytes(0xffff0000));
            }
        }
        let mut tx = Transaction::begin(&img,&vtoc);
        for sec in 1..SECTORS {
            let mut dir = DirectorySector::new();
            if sec>1 {
                dir.next_track = VTOC_TRACK;
                dir.next_sector = sec - 1;
            }
            tx.write_struct([VTOC_TRACK,sec],&dir)?;
        }
        let staged = tx.finish();
        let mut ans = Self {
            vtoc: vtoc.clone(),
            img,
            dirty: false
        };
        ans.commit(staged)?;
        Ok(ans)
    }
    fn commit(&mut self,staged: Staged) -> STDRESULT {
        for (ts,buf) in staged.sectors.iter() {
            self.img.write_sector(SectorAddress::new(ts[0] as usize,ts[1] as usize),SectorOrder::Dos,buf)?;
        }
        self.vtoc = staged.vtoc;
        self.img.write_sector(vtoc_addr(),SectorOrder::Dos,&self.vtoc.to_bytes())?;
        self.dirty = true;
        Ok(())
    }
    pub fn volume(&self) -> u8 {
        self.vtoc.vol
    }
    pub fn num_free_sectors(&self) -> usize {
        self.vtoc.num_free()
    }
    /// List the active catalog entries in catalog order
    pub fn list(&self) -> Result<Vec<CatalogEntry>,DYNERR> {
        entries(self)
    }
    /// Read a file, the payload has the type header removed
    pub fn read(&self,name: &str) -> Result<FileInfo,DYNERR> {
        let entry = match find(self,name)? {
            Some(e) => e,
            None => return Err(Box::new(Error::FileNotFound))
        };
        let typ = match entry.filetype {
            Some(t) => t,
            None => {
                debug!("type byte {} is not a DOS 3.3 type",entry.type_byte);
                return Err(Box::new(Error::FileTypeMismatch));
            }
        };
        let (_tsls,pairs) = tsl_chain(self,entry.tsl)?;
        let mut raw: Vec<u8> = Vec::new();
        for pair in pairs {
            match pair {
                Some(ts) => raw.append(&mut self.read_ts(ts)?),
                None => {
                    warn!("sparse sector in {}, reading as zeros",entry.name);
                    raw.append(&mut vec![0;img::SECTOR_SIZE]);
                }
            }
        }
        let (data,load_addr) = unpack_payload(typ,&raw)?;
        Ok(FileInfo {
            descriptor: Descriptor {
                name: entry.name,
                length: data.len(),
                filetype: typ.to_filetype(),
                locked: entry.locked,
                blocks: entry.sectors as usize
            },
            data,
            load_addr
        })
    }
    /// Write a file.  Unlike DOS, nothing is written unless there is enough space for all the data.
    pub fn put(&mut self,file: &FileInfo,overwrite: bool) -> Result<CatalogEntry,DYNERR> {
        let typ = match FileType::from_filetype(file.descriptor.filetype) {
            Some(t) => t,
            None => {
                log::error!("{} cannot be stored on a DOS 3.3 disk",file.descriptor.filetype);
                return Err(Box::new(Error::FileTypeMismatch));
            }
        };
        let fname = string_to_file_name(&file.descriptor.name)?;
        let payload = pack_payload(typ,&file.data,file.load_addr)?;
        let max_pairs = self.vtoc.max_pairs as usize;
        let data_secs = (payload.len() + img::SECTOR_SIZE - 1) / img::SECTOR_SIZE;
        let tsl_secs = usize::max(1,(data_secs + max_pairs - 1) / max_pairs);

        let mut tx = Transaction::begin(&self.img,&self.vtoc);
        let slot = match find(&tx,&file.descriptor.name)? {
            Some(old) => {
                if !overwrite {
                    return Err(Box::new(Error::AlreadyExists));
                }
                if old.locked {
                    return Err(Box::new(Error::FileLocked));
                }
                free_file(&mut tx,old.tsl)?;
                old.slot
            },
            None => match free_slot(&tx)? {
                Some(slot) => slot,
                None => {
                    debug!("catalog is full");
                    return Err(Box::new(Error::DiskFull));
                }
            }
        };
        if data_secs + tsl_secs > tx.vtoc.num_free() {
            debug!("need {} sectors, {} are free",data_secs + tsl_secs,tx.vtoc.num_free());
            return Err(Box::new(Error::DiskFull));
        }
        let mut tsl_list: Vec<[u8;2]> = Vec::new();
        for _i in 0..tsl_secs {
            tsl_list.push(tx.allocate()?);
        }
        let mut data_list: Vec<[u8;2]> = Vec::new();
        for _i in 0..data_secs {
            data_list.push(tx.allocate()?);
        }
        for (i,tsl_ts) in tsl_list.iter().enumerate() {
            let mut tsl = TrackSectorList::new();
            if let Some(next) = tsl_list.get(i+1) {
                tsl.next_track = next[0];
                tsl.next_sector = next[1];
            }
            tsl.sector_base = u16::to_le_bytes((i*max_pairs) as u16);
            for p in 0..max_pairs {
                if let Some(ts) = data_list.get(i*max_pairs + p) {
                    tsl.set_pair(p,*ts);
                }
            }
            tx.write_struct(*tsl_ts,&tsl)?;
        }
        for (i,ts) in data_list.iter().enumerate() {
            let end = usize::min(payload.len(),(i+1)*img::SECTOR_SIZE);
            tx.write_sector(*ts,&payload[i*img::SECTOR_SIZE..end])?;
        }
        let mut dir = DirectorySector::from_bytes(&tx.read_ts(slot.0)?)?;
        let entry = &mut dir.entries[slot.1];
        entry.tsl_track = tsl_list[0][0];
        entry.tsl_sector = tsl_list[0][1];
        entry.file_type = typ as u8;
        entry.name = fname;
        entry.sectors = u16::to_le_bytes((data_secs + tsl_secs) as u16);
        let ans = CatalogEntry::from_entry(entry,slot.0,slot.1);
        tx.write_struct(slot.0,&dir)?;
        let staged = tx.finish();
        self.commit(staged)?;
        Ok(ans)
    }
    /// Delete a file, returning false if it was not found
    pub fn delete(&mut self,name: &str) -> Result<bool,DYNERR> {
        let mut tx = Transaction::begin(&self.img,&self.vtoc);
        let old = match find(&tx,name)? {
            Some(e) => e,
            None => return Ok(false)
        };
        if old.locked {
            return Err(Box::new(Error::FileLocked));
        }
        free_file(&mut tx,old.tsl)?;
        let mut dir = DirectorySector::from_bytes(&tx.read_ts(old.slot.0)?)?;
        dir.entries[old.slot.1].mark_deleted();
        tx.write_struct(old.slot.0,&dir)?;
        let staged = tx.finish();
        self.commit(staged)?;
        Ok(true)
    }
    /// Apply a change to the catalog entry of an existing file
    fn modify<F>(&mut self,name: &str,f: F) -> STDRESULT where F: FnOnce(&mut DirectoryEntry) {
        let mut tx = Transaction::begin(&self.img,&self.vtoc);
        let old = match find(&tx,name)? {
            Some(e) => e,
            None => return Err(Box::new(Error::FileNotFound))
        };
        let mut dir = DirectorySector::from_bytes(&tx.read_ts(old.slot.0)?)?;
        f(&mut dir.entries[old.slot.1]);
        tx.write_struct(old.slot.0,&dir)?;
        let staged = tx.finish();
        self.commit(staged)
    }
    pub fn lock(&mut self,name: &str) -> STDRESULT {
        self.modify(name,|entry| entry.file_type |= 0x80)
    }
    pub fn unlock(&mut self,name: &str) -> STDRESULT {
        self.modify(name,|entry| entry.file_type &= 0x7f)
    }
    /// Rename a file, locked files cannot be renamed
    pub fn rename(&mut self,old_name: &str,new_name: &str) -> STDRESULT {
        let fname = string_to_file_name(new_name)?;
        let old = match find(self,old_name)? {
            Some(e) => e,
            None => return Err(Box::new(Error::FileNotFound))
        };
        if old.locked {
            return Err(Box::new(Error::FileLocked));
        }
        if let Some(other) = find(self,new_name)? {
            if other.slot!=old.slot {
                return Err(Box::new(Error::AlreadyExists));
            }
        }
        self.modify(old_name,|entry| entry.name = fname)
    }
    /// Catalog in the style of the DOS `CATALOG` command
    pub fn catalog_to_string(&self) -> Result<String,DYNERR> {
        let mut ans = String::new();
        writeln!(ans)?;
        writeln!(ans,"DISK VOLUME {}",self.vtoc.vol)?;
        writeln!(ans)?;
        for entry in self.list()? {
            let lock_char = match entry.locked {
                true => "*",
                false => " "
            };
            let type_char = match entry.filetype {
                Some(t) => t.to_string(),
                None => "?".to_string()
            };
            writeln!(ans,"{}{} {:03} {}",lock_char,type_char,entry.sectors % 1000,entry.name)?;
        }
        Ok(ans)
    }
    /// Count the catalog sectors that can be followed from the VTOC.
    /// The VTOC is in sector 0 in every ordering, so this is how the ordering is decided.
    pub fn probe_score(&self) -> usize {
        let bound = self.vtoc.tracks as usize * self.vtoc.sectors as usize;
        let mut visited: HashSet<[u8;2]> = HashSet::new();
        let mut ts = [self.vtoc.track1,self.vtoc.sector1];
        while ts[0]>0 && visited.len()<bound && visited.insert(ts) {
            match self.read_ts(ts) {
                Ok(buf) => match DirectorySector::from_bytes(&buf) {
                    Ok(dir) => ts = dir.next(),
                    Err(_) => break
                },
                Err(_) => {
                    visited.remove(&ts);
                    break;
                }
            }
        }
        visited.len()
    }
}

impl crate::fs::DiskFS for Disk {
    fn fs_name(&self) -> &'static str {
        FS_NAME
    }
    fn catalog(&mut self) -> Result<Vec<Descriptor>,DYNERR> {
        Ok(self.list()?.iter().map(|e| e.to_descriptor()).collect())
    }
    fn catalog_to_string(&mut self) -> Result<String,DYNERR> {
        Disk::catalog_to_string(self)
    }
    fn get(&mut self,name: &str) -> Result<FileInfo,DYNERR> {
        self.read(name)
    }
    fn put(&mut self,file: &FileInfo,overwrite: bool) -> Result<Descriptor,DYNERR> {
        Ok(Disk::put(self,file,overwrite)?.to_descriptor())
    }
    fn delete(&mut self,name: &str) -> Result<bool,DYNERR> {
        Disk::delete(self,name)
    }
    fn lock(&mut self,name: &str) -> STDRESULT {
        Disk::lock(self,name)
    }
    fn unlock(&mut self,name: &str) -> STDRESULT {
        Disk::unlock(self,name)
    }
    fn rename(&mut self,old_name: &str,new_name: &str) -> STDRESULT {
        Disk::rename(self,old_name,new_name)
    }
    fn num_free(&mut self) -> Result<usize,DYNERR> {
        Ok(self.num_free_sectors())
    }
    fn probe_score(&self) -> usize {
        Disk::probe_score(self)
    }
    fn is_dirty(&self) -> bool {
        self.dirty
    }
    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
    fn get_img(&self) -> &img::Dsk {
        &self.img
    }
}
