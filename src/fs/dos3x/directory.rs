//! # DOS 3.3 directory structures
//! These are fixed length structures, with the DiskStruct trait.

// a2kit_macro automatically derives `new`, `to_bytes`, `from_bytes`, and `length` from a DiskStruct.
// This spares us having to manually write code to copy bytes in and out for every new structure.
// The auto-derivation is not used for structures with arrays of structures.
use a2kit_macro::{DiskStruct,DiskStructError};
use a2kit_macro_derive::DiskStruct;
use super::types::{ENTRIES_PER_SECTOR,DELETED,FileType};

// The bitmap allows 4 bytes per track, of which a 16 sector disk uses the first 2.
// Filling out the sector gives room for 50 tracks.

#[derive(DiskStruct,Clone)]
pub struct VTOC {
    pub pad1: u8,
    pub track1: u8,
    pub sector1: u8,
    pub version: u8,
    pub pad2: [u8;2],
    pub vol: u8,
    pub pad3: [u8;32],
    pub max_pairs: u8,
    pub pad4: [u8;8],
    pub last_track: u8,
    pub last_direction: u8,
    pub pad5: [u8;2],
    pub tracks: u8,
    pub sectors: u8,
    pub bytes: [u8;2],
    pub bitmap: [u8;200]
}

#[derive(DiskStruct,Clone)]
pub struct TrackSectorList {
    pub pad1: u8,
    pub next_track: u8,
    pub next_sector: u8,
    pub pad2: [u8;2],
    pub sector_base: [u8;2],
    pub pad3: [u8;5],
    pub pairs: [u8;244]
}

#[derive(DiskStruct,Clone)]
pub struct DirectoryEntry {
    pub tsl_track: u8,
    pub tsl_sector: u8,
    pub file_type: u8,
    pub name: [u8;30],
    pub sectors: [u8;2]
}

pub struct DirectorySector {
    pub pad1: u8,
    pub next_track: u8,
    pub next_sector: u8,
    pub pad2: [u8;8],
    pub entries: [DirectoryEntry;7]
}

impl VTOC {
    fn bit(&self,sector: u8) -> u32 {
        1 << (sector as u32 + 32 - self.sectors as u32)
    }
    fn track_map(&self,track: u8) -> u32 {
        let i = track as usize * 4;
        let bm = &self.bitmap;
        u32::from_be_bytes([bm[i],bm[i+1],bm[i+2],bm[i+3]])
    }
    fn save_track_map(&mut self,track: u8,map: u32) {
        let i = track as usize * 4;
        self.bitmap[i..i+4].copy_from_slice(&u32::to_be_bytes(map));
    }
    pub fn is_free(&self,track: u8,sector: u8) -> bool {
        self.track_map(track) & self.bit(sector) > 0
    }
    pub fn allocate(&mut self,track: u8,sector: u8) {
        let map = self.track_map(track) & !self.bit(sector);
        self.save_track_map(track,map);
    }
    pub fn deallocate(&mut self,track: u8,sector: u8) {
        let map = self.track_map(track) | self.bit(sector);
        self.save_track_map(track,map);
    }
    pub fn num_free(&self) -> usize {
        let mut ans = 0;
        for track in 0..self.tracks {
            for sector in 0..self.sectors {
                if self.is_free(track,sector) {
                    ans += 1;
                }
            }
        }
        ans
    }
    /// First fit search in ascending track and sector order
    pub fn next_free(&self) -> Option<[u8;2]> {
        for track in 0..self.tracks {
            for sector in 0..self.sectors {
                if self.is_free(track,sector) {
                    return Some([track,sector]);
                }
            }
        }
        None
    }
    /// Is the address on this volume
    pub fn contains(&self,ts: [u8;2]) -> bool {
        ts[0] < self.tracks && ts[1] < self.sectors
    }
    pub fn update_last_track(&mut self,track: u8) {
        // DOS uses these to steer its own allocations, so keep them plausible
        if track < super::types::VTOC_TRACK {
            self.last_direction = 255;
            self.last_track = track;
        }
        if track > super::types::VTOC_TRACK {
            self.last_direction = 1;
            self.last_track = track;
        }
    }
}

impl TrackSectorList {
    pub fn next(&self) -> [u8;2] {
        [self.next_track,self.next_sector]
    }
    pub fn pair(&self,p: usize) -> [u8;2] {
        [self.pairs[p*2],self.pairs[p*2+1]]
    }
    pub fn set_pair(&mut self,p: usize,ts: [u8;2]) {
        self.pairs[p*2] = ts[0];
        self.pairs[p*2+1] = ts[1];
    }
}

impl DirectoryEntry {
    /// never used, the catalog search may stop here
    pub fn is_unused(&self) -> bool {
        self.tsl_track==0
    }
    pub fn is_deleted(&self) -> bool {
        self.tsl_track==DELETED
    }
    pub fn is_active(&self) -> bool {
        !self.is_unused() && !self.is_deleted()
    }
    pub fn is_locked(&self) -> bool {
        self.file_type & 0x80 > 0
    }
    pub fn tsl(&self) -> [u8;2] {
        [self.tsl_track,self.tsl_sector]
    }
    pub fn file_type(&self) -> Option<FileType> {
        FileType::from_type_byte(self.file_type)
    }
    pub fn sector_count(&self) -> u16 {
        u16::from_le_bytes(self.sectors)
    }
    /// Mark deleted the way DOS does, saving the track in the last byte of the name
    pub fn mark_deleted(&mut self) {
        self.name[self.name.len()-1] = self.tsl_track;
        self.tsl_track = DELETED;
    }
}

impl DirectorySector {
    pub fn next(&self) -> [u8;2] {
        [self.next_track,self.next_sector]
    }
}

impl DiskStruct for DirectorySector {
    fn new() -> Self where Self: Sized {
        Self {
            pad1: 0,
            next_track: 0,
            next_sector: 0,
            pad2: [0;8],
            entries: [
                DirectoryEntry::new(),
                DirectoryEntry::new(),
                DirectoryEntry::new(),
                DirectoryEntry::new(),
                DirectoryEntry::new(),
                DirectoryEntry::new(),
                DirectoryEntry::new()
            ]
        }
    }
    fn to_bytes(&self) -> Vec<u8> {
        let mut ans: Vec<u8> = Vec::new();
        ans.push(self.pad1);
        ans.push(self.next_track);
        ans.push(self.next_sector);
        ans.append(&mut self.pad2.to_vec());
        for i in 0..ENTRIES_PER_SECTOR {
            ans.append(&mut self.entries[i].to_bytes());
        }
        ans
    }
    fn update_from_bytes(&mut self,bytes: &[u8]) -> Result<(),DiskStructError> {
        if bytes.len() < self.len() {
            return Err(DiskStructError::OutOfData);
        }
        self.pad1 = bytes[0];
        self.next_track = bytes[1];
        self.next_sector = bytes[2];
        self.pad2.copy_from_slice(&bytes[3..11]);
        let mut offset = 11;
        for i in 0..ENTRIES_PER_SECTOR {
            let n = self.entries[i].len();
            self.entries[i].update_from_bytes(&bytes[offset..offset+n])?;
            offset += n;
        }
        Ok(())
    }
    fn from_bytes(bytes: &[u8]) -> Result<Self,DiskStructError> where Self: Sized {
        let mut ans = Self::new();
        ans.update_from_bytes(bytes)?;
        Ok(ans)
    }
    fn len(&self) -> usize {
        256
    }
}
