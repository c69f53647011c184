//! # ProDOS file system module
//! This reads the volume directory of a 140K ProDOS disk.
//!
//! * Files in the volume directory can be listed and read, whatever their storage type
//! * Subdirectories are listed but not descended into
//! * Writing is not supported, such requests return `fs::Error::Unsupported`

pub mod types;
pub mod directory;

use std::collections::HashSet;
use std::fmt::Write;
use a2kit_macro::DiskStruct;
use log::{debug,info,warn};

pub use types::Error;
use types::*;
use directory::*;
use crate::fs::{Descriptor,FileInfo,Filetype};
use crate::img;
use crate::{STDRESULT,DYNERR};

pub const FS_NAME: &str = "ProDOS";

/// The primary interface for disk operations.
pub struct Disk {
    header: VolDirHeader,
    img: img::Dsk
}

impl Disk {
    /// Test an image to see if it already contains ProDOS.
    pub fn test_img(img: &img::Dsk) -> bool {
        let buf = match img.read_block(VOL_KEY_BLOCK as usize) {
            Ok(buf) => buf,
            Err(_) => {
                debug!("volume key block was not readable");
                return false;
            }
        };
        let key = match EntryBlock::from_bytes(&buf) {
            Ok(k) => k,
            Err(_) => return false
        };
        let header = match VolDirHeader::from_bytes(&buf[4..4+ENTRY_LEN as usize]) {
            Ok(h) => h,
            Err(_) => return false
        };
        let max_blocks = img.track_count() * img::SECTORS / 2;
        if key.prev()!=0 {
            debug!("volume key block has a previous block");
            return false;
        }
        if header.storage_type()!=StorageType::VolDirHeader as u8 {
            debug!("unexpected storage type {}",header.storage_type());
            return false;
        }
        if header.entry_len()!=ENTRY_LEN || header.entries_per_block()!=ENTRIES_PER_BLOCK {
            debug!("unexpected header bytes {}, {}",header.entry_len(),header.entries_per_block());
            return false;
        }
        if header.total_blocks()==0 || header.total_blocks() as usize > max_blocks {
            debug!("peculiar block count {}",header.total_blocks());
            return false;
        }
        if header.bitmap_ptr()<=VOL_KEY_BLOCK || header.bitmap_ptr()>=header.total_blocks() {
            debug!("bitmap pointer {} out of range",header.bitmap_ptr());
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
        let buf = img.read_block(VOL_KEY_BLOCK as usize)?;
        let header = VolDirHeader::from_bytes(&buf[4..4+ENTRY_LEN as usize])?;
        info!("found ProDOS volume /{}",header.name());
        Ok(Self {
            header,
            img
        })
    }
    pub fn volume_name(&self) -> String {
        self.header.name()
    }
    fn read_block(&self,iblock: u16) -> Result<Vec<u8>,DYNERR> {
        if iblock>=self.header.total_blocks() {
            debug!("block {} is outside the volume",iblock);
            return Err(Box::new(Error::CorruptDirectory));
        }
        self.img.read_block(iblock as usize)
    }
    /// Walk the volume directory, returning each active entry in order
    fn entries(&self) -> Result<Vec<Entry>,DYNERR> {
        let bound = self.header.total_blocks() as usize;
        let mut visited: HashSet<u16> = HashSet::new();
        let mut ans = Vec::new();
        let mut curr = VOL_KEY_BLOCK;
        while curr>0 {
            if visited.len()>=bound || !visited.insert(curr) {
                debug!("directory chain loops back to block {}",curr);
                return Err(Box::new(Error::CorruptDirectory));
            }
            let dir = EntryBlock::from_bytes(&self.read_block(curr)?)?;
            let first = match curr {
                VOL_KEY_BLOCK => 1,
                _ => 0
            };
            for entry in dir.entries[first..].iter() {
                if entry.is_active() {
                    ans.push(*entry);
                }
            }
            curr = dir.next();
        }
        Ok(ans)
    }
    fn find(&self,name: &str) -> Result<Entry,DYNERR> {
        for entry in self.entries()? {
            if entry.name().to_uppercase()==name.to_uppercase() {
                return Ok(entry);
            }
        }
        Err(Box::new(Error::FileNotFound))
    }
    /// Append the data blocks referenced by an index block
    fn read_index_block(&self,iblock: u16,ans: &mut Vec<u8>,eof: usize) -> STDRESULT {
        let index = self.read_block(iblock)?;
        for idx in 0..256 {
            if ans.len()>=eof {
                break;
            }
            let ptr = u16::from_le_bytes([index[idx],index[idx+256]]);
            self.append_data_block(ptr,ans)?;
        }
        Ok(())
    }
    fn append_data_block(&self,ptr: u16,ans: &mut Vec<u8>) -> STDRESULT {
        match ptr {
            0 => {
                warn!("sparse block, reading as zeros");
                ans.append(&mut vec![0;BLOCK_SIZE]);
            },
            _ => ans.append(&mut self.read_block(ptr)?)
        }
        Ok(())
    }
    fn read_data(&self,entry: &Entry) -> Result<Vec<u8>,DYNERR> {
        let eof = entry.eof();
        let mut ans: Vec<u8> = Vec::new();
        match entry.storage_type() {
            Some(StorageType::Seedling) => {
                ans.append(&mut self.read_block(entry.key_ptr())?);
            },
            Some(StorageType::Sapling) => {
                self.read_index_block(entry.key_ptr(),&mut ans,eof)?;
            },
            Some(StorageType::Tree) => {
                let master = self.read_block(entry.key_ptr())?;
                for idx in 0..128 {
                    if ans.len()>=eof {
                        break;
                    }
                    let ptr = u16::from_le_bytes([master[idx],master[idx+256]]);
                    match ptr {
                        0 => ans.append(&mut vec![0;256*BLOCK_SIZE]),
                        _ => self.read_index_block(ptr,&mut ans,eof)?
                    }
                }
            },
            _ => return Err(Box::new(Error::FileTypeMismatch))
        }
        if ans.len()<eof {
            warn!("end of file is beyond the data, padding with zeros");
        }
        ans.resize(eof,0);
        Ok(ans)
    }
    pub fn read(&self,name: &str) -> Result<FileInfo,DYNERR> {
        let entry = self.find(name)?;
        let data = self.read_data(&entry)?;
        let filetype = Filetype(entry.file_type() as u16);
        let load_addr = match filetype {
            Filetype::BINARY => Some(entry.aux_type()),
            _ => None
        };
        Ok(FileInfo {
            descriptor: Self::descriptor(&entry),
            data,
            load_addr
        })
    }
    fn descriptor(entry: &Entry) -> Descriptor {
        Descriptor {
            name: entry.name(),
            length: entry.eof(),
            filetype: Filetype(entry.file_type() as u16),
            locked: entry.is_locked(),
            blocks: entry.blocks_used() as usize
        }
    }
    pub fn num_free_blocks(&self) -> Result<usize,DYNERR> {
        let total = self.header.total_blocks() as usize;
        let mut free = 0;
        let bitmap_blocks = (total + 4095) / 4096;
        for b in 0..bitmap_blocks {
            let buf = self.read_block(self.header.bitmap_ptr() + b as u16)?;
            for i in 0..usize::min(4096,total - b*4096) {
                if buf[i/8] & (0x80 >> (i%8)) > 0 {
                    free += 1;
                }
            }
        }
        Ok(free)
    }
    /// Catalog in the style of the ProDOS `CATALOG` command
    pub fn catalog_to_string(&self) -> Result<String,DYNERR> {
        const DATE_FMT: &str = "%d-%b-%y %H:%M";
        let mut ans = String::new();
        writeln!(ans)?;
        writeln!(ans,"/{}",self.header.name())?;
        writeln!(ans)?;
        writeln!(ans," {:15} {:4} {:6} {:16} {:16} {:7} {:7}",
            "NAME","TYPE","BLOCKS","MODIFIED","CREATED","ENDFILE","SUBTYPE")?;
        writeln!(ans)?;
        for entry in self.entries()? {
            let date = |t: Option<chrono::NaiveDateTime>| match t {
                Some(date_time) => date_time.format(DATE_FMT).to_string(),
                None => "<NO DATE>".to_string()
            };
            let type_as_hex = format!("${:02X}",entry.file_type());
            let typ = match crate::fs::filetype::registry().info(Filetype(entry.file_type() as u16)) {
                Some(info) if info.three_letter.len()>0 => info.three_letter.to_string(),
                _ => type_as_hex
            };
            writeln!(ans,"{}{:15} {:4} {:6} {:16} {:16} {:7} {:7}",
                match entry.is_locked() { true => "*", false => " " },
                entry.name(),
                typ,
                entry.blocks_used(),
                date(entry.modified()),
                date(entry.created()),
                entry.eof(),
                entry.aux_type()
            )?;
        }
        writeln!(ans)?;
        let free = self.num_free_blocks()?;
        let total = self.header.total_blocks() as usize;
        writeln!(ans,"BLOCKS FREE: {}  BLOCKS USED: {}  TOTAL BLOCKS: {}",free,total.saturating_sub(free),total)?;
        Ok(ans)
    }
    /// Count the directory blocks that can be followed from the key block
    pub fn probe_score(&self) -> usize {
        let mut visited: HashSet<u16> = HashSet::new();
        let mut curr = VOL_KEY_BLOCK;
        while curr>0 && visited.len()<self.header.total_blocks() as usize {
            let dir = match self.read_block(curr) {
                Ok(buf) => match EntryBlock::from_bytes(&buf) {
                    Ok(dir) => dir,
                    Err(_) => break
                },
                Err(_) => break
            };
            if !visited.insert(curr) {
                break;
            }
            curr = dir.next();
        }
        visited.len()
    }
}

impl crate::fs::DiskFS for Disk {
    fn fs_name(&self) -> &'static str {
        FS_NAME
    }
    fn catalog(&mut self) -> Result<Vec<Descriptor>,DYNERR> {
        Ok(self.entries()?.iter().map(Self::descriptor).collect())
    }
    fn catalog_to_string(&mut self) -> Result<String,DYNERR> {
        Disk::catalog_to_string(self)
    }
    fn get(&mut self,name: &str) -> Result<FileInfo,DYNERR> {
        self.read(name)
    }
    fn put(&mut self,_file: &FileInfo,_overwrite: bool) -> Result<Descriptor,DYNERR> {
        Err(Box::new(crate::fs::Error::Unsupported))
    }
    fn delete(&mut self,_name: &str) -> Result<bool,DYNERR> {
        Err(Box::new(crate::fs::Error::Unsupported))
    }
    fn lock(&mut self,_name: &str) -> STDRESULT {
        Err(Box::new(crate::fs::Error::Unsupported))
    }
    fn unlock(&mut self,_name: &str) -> STDRESULT {
        Err(Box::new(crate::fs::Error::Unsupported))
    }
    fn rename(&mut self,_old_name: &str,_new_name: &str) -> STDRESULT {
        Err(Box::new(crate::fs::Error::Unsupported))
    }
    fn num_free(&mut self) -> Result<usize,DYNERR> {
        self.num_free_blocks()
    }
    fn probe_score(&self) -> usize {
        Disk::probe_score(self)
    }
    fn is_dirty(&self) -> bool {
        false
    }
    fn clear_dirty(&mut self) {
    }
    fn get_img(&self) -> &img::Dsk {
        &self.img
    }
}
