//! ### ProDOS directory structures
//!
//! Only what is needed to read the volume directory is here.
//! The key block holds the volume header in the first entry slot, so both key and
//! entry blocks are loaded as an `EntryBlock`, and the caller skips slot 0 of the key block.

use chrono::NaiveDateTime;
use num_traits::FromPrimitive;
use super::types::*;

// a2kit_macro automatically derives `new`, `to_bytes`, `from_bytes`, and `length` from a DiskStruct.
// The auto-derivation is not used for structures with arrays of structures.
use a2kit_macro::{DiskStructError,DiskStruct};
use a2kit_macro_derive::DiskStruct;

pub fn unpack_time(prodos_date_time: [u8;4]) -> Option<NaiveDateTime> {
    let date = u16::from_le_bytes([prodos_date_time[0],prodos_date_time[1]]);
    let time = u16::from_le_bytes([prodos_date_time[2],prodos_date_time[3]]);
    let yearmod100 = date >> 9;
    // Suppose the earliest date stamp we can find originates from the year before
    // SOS was released, i.e., 1979.  Use this to help decide the century.
    let year = match yearmod100 < 79 {
        true => 2000 + yearmod100,
        false => 1900 + yearmod100
    };
    let month = (date >> 5) & 15;
    let day = date & 31;
    let hour = (time >> 8) & 255;
    let minute = time & 255;
    match chrono::NaiveDate::from_ymd_opt(year as i32,month as u32,day as u32) {
        Some(date) => date.and_hms_opt(hour as u32,minute as u32,0),
        None => None
    }
}

/// Convert filename bytes to a string, escaping if necessary.
fn file_name_to_string(nibs: u8,fname: [u8;15]) -> String {
    let name_len = (nibs & 0x0f) as usize;
    match String::from_utf8(fname[0..name_len].to_vec()) {
        Ok(result) if result.is_ascii() => result,
        _ => {
            log::warn!("continuing with invalid filename");
            fname[0..name_len].iter().map(|b| format!("\\x{:02X}",b)).collect()
        }
    }
}

// Block   | Contents
// -----------------------------
// 0       | Loader
// 1       | Loader
// 2       | Volume Directory Key
// 3 - n   | Volume Directory
// n+1 - p | Volume Bitmap

#[derive(DiskStruct,Clone,Copy)]
pub struct VolDirHeader {
    stor_len_nibs: u8,
    name: [u8;15],
    pad1: [u8;8],
    create_time: [u8;4],
    vers: u8,
    min_vers: u8,
    access: u8,
    entry_len: u8,
    entries_per_block: u8,
    file_count: [u8;2],
    bitmap_ptr: [u8;2],
    total_blocks: [u8;2]
}

#[derive(DiskStruct,Clone,Copy)]
pub struct Entry {
    stor_len_nibs: u8,
    name: [u8;15],
    file_type: u8,
    key_ptr: [u8;2],
    blocks_used: [u8;2],
    eof: [u8;3],
    create_time: [u8;4],
    version: u8,
    min_version: u8,
    access: u8,
    aux_type: [u8;2],
    last_mod: [u8;4],
    header_ptr: [u8;2]
}

pub struct EntryBlock {
    prev_block: [u8;2],
    next_block: [u8;2],
    pub entries: [Entry;13]
}

impl VolDirHeader {
    pub fn storage_type(&self) -> u8 {
        self.stor_len_nibs >> 4
    }
    pub fn name(&self) -> String {
        file_name_to_string(self.stor_len_nibs,self.name)
    }
    pub fn entry_len(&self) -> u8 {
        self.entry_len
    }
    pub fn entries_per_block(&self) -> u8 {
        self.entries_per_block
    }
    pub fn file_count(&self) -> u16 {
        u16::from_le_bytes(self.file_count)
    }
    pub fn bitmap_ptr(&self) -> u16 {
        u16::from_le_bytes(self.bitmap_ptr)
    }
    pub fn total_blocks(&self) -> u16 {
        u16::from_le_bytes(self.total_blocks)
    }
}

impl Entry {
    pub fn storage_type(&self) -> Option<StorageType> {
        StorageType::from_u8(self.stor_len_nibs >> 4)
    }
    pub fn is_active(&self) -> bool {
        match self.storage_type() {
            Some(StorageType::Seedling) | Some(StorageType::Sapling) |
            Some(StorageType::Tree) | Some(StorageType::SubDirEntry) => true,
            _ => false
        }
    }
    pub fn name(&self) -> String {
        file_name_to_string(self.stor_len_nibs,self.name)
    }
    pub fn file_type(&self) -> u8 {
        self.file_type
    }
    pub fn key_ptr(&self) -> u16 {
        u16::from_le_bytes(self.key_ptr)
    }
    pub fn blocks_used(&self) -> u16 {
        u16::from_le_bytes(self.blocks_used)
    }
    pub fn eof(&self) -> usize {
        u32::from_le_bytes([self.eof[0],self.eof[1],self.eof[2],0]) as usize
    }
    pub fn aux_type(&self) -> u16 {
        u16::from_le_bytes(self.aux_type)
    }
    /// write protected, i.e., the write bit is clear
    pub fn is_locked(&self) -> bool {
        self.access & Access::Write as u8 == 0
    }
    pub fn created(&self) -> Option<NaiveDateTime> {
        unpack_time(self.create_time)
    }
    pub fn modified(&self) -> Option<NaiveDateTime> {
        unpack_time(self.last_mod)
    }
}

impl EntryBlock {
    pub fn prev(&self) -> u16 {
        u16::from_le_bytes(self.prev_block)
    }
    pub fn next(&self) -> u16 {
        u16::from_le_bytes(self.next_block)
    }
}

impl DiskStruct for EntryBlock {
    fn new() -> Self where Self: Sized {
        Self {
            prev_block: [0;2],
            next_block: [0;2],
            entries: [Entry::new();13]
        }
    }
    fn to_bytes(&self) -> Vec<u8> {
        let mut ans: Vec<u8> = Vec::new();
        ans.append(&mut self.prev_block.to_vec());
        ans.append(&mut self.next_block.to_vec());
        for entry in self.entries.iter() {
            ans.append(&mut entry.to_bytes());
        }
        ans.push(0);
        ans
    }
    fn update_from_bytes(&mut self,bytes: &[u8]) -> Result<(),DiskStructError> {
        if bytes.len() < self.len() {
            return Err(DiskStructError::OutOfData);
        }
        self.prev_block = [bytes[0],bytes[1]];
        self.next_block = [bytes[2],bytes[3]];
        let mut offset = 4;
        for entry in self.entries.iter_mut() {
            entry.update_from_bytes(&bytes[offset..offset+ENTRY_LEN as usize])?;
            offset += ENTRY_LEN as usize;
        }
        Ok(())
    }
    fn from_bytes(bytes: &[u8]) -> Result<Self,DiskStructError> where Self: Sized {
        let mut ans = Self::new();
        ans.update_from_bytes(bytes)?;
        Ok(ans)
    }
    fn len(&self) -> usize {
        BLOCK_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(VolDirHeader::new().to_bytes().len(),39);
        assert_eq!(Entry::new().to_bytes().len(),39);
        assert_eq!(EntryBlock::new().to_bytes().len(),512);
    }

    #[test]
    fn dates() {
        // 12-Sep-84 13:05
        let t = unpack_time([0x2c,0xa9,5,13]).expect("date");
        assert_eq!(t.format("%d-%b-%y %H:%M").to_string(),"12-Sep-84 13:05");
        assert!(unpack_time([0,0,0,0]).is_none());
    }
}
