//! # DOS 3.3 directory structures
//! These are fixed length structures, with the DiskStruct trait.

// a2kit_macro automatically derives `new`, `to_bytes`, `from_bytes`, and `length` from a DiskStruct.
// The catalog sector holds an array of structures, so it is written out by hand.
use a2kit_macro::{DiskStruct,DiskStructError};
use a2kit_macro_derive::DiskStruct;
use super::types::*;

// Note on large volumes:
// The bitmap runs to the end of the VTOC, allowing for 50 tracks.
// The bitmap allocates 32 bits per track, allowing for 32 sectors.
// This gives 50*32*256 = 409600, i.e., a 400K disk.

#[derive(DiskStruct)]
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

#[derive(DiskStruct)]
pub struct TrackSectorList {
    pub pad1: u8,
    pub next_track: u8,
    pub next_sector: u8,
    pub pad2: [u8;2],
    pub sector_base: [u8;2],
    pub pad3: [u8;5],
    pub pairs: [u8;244]
}

#[derive(DiskStruct)]
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
    /// Geometry as (tracks,sectors)
    pub fn geometry(&self) -> (u8,u8) {
        (self.tracks,self.sectors)
    }
    pub fn total_sectors(&self) -> usize {
        self.tracks as usize * self.sectors as usize
    }
}

impl TrackSectorList {
    /// Get pair `idx` as (track,sector)
    pub fn pair(&self,idx: usize) -> (u8,u8) {
        (self.pairs[idx*2],self.pairs[idx*2+1])
    }
    pub fn set_pair(&mut self,idx: usize,trk: u8,sec: u8) {
        self.pairs[idx*2] = trk;
        self.pairs[idx*2+1] = sec;
    }
    pub fn set_sector_base(&mut self,base: usize) {
        self.sector_base = u16::to_le_bytes(base as u16);
    }
}

impl DirectoryEntry {
    /// Decode the location of the first track/sector list
    pub fn state(&self) -> EntryState {
        match self.tsl_track {
            0 => EntryState::Empty,
            DELETED_MARK => EntryState::Deleted([self.name[NAME_LEN-1],self.tsl_sector]),
            trk => EntryState::Active([trk,self.tsl_sector])
        }
    }
    /// Encode the location of the first track/sector list.
    /// A deleted state escrows the list track in the last byte of the name.
    pub fn set_state(&mut self,state: EntryState) {
        match state {
            EntryState::Empty => {
                self.tsl_track = 0;
                self.tsl_sector = 0;
            },
            EntryState::Deleted([trk,sec]) => {
                self.name[NAME_LEN-1] = trk;
                self.tsl_track = DELETED_MARK;
                self.tsl_sector = sec;
            },
            EntryState::Active([trk,sec]) => {
                self.tsl_track = trk;
                self.tsl_sector = sec;
            }
        }
    }
    pub fn is_locked(&self) -> bool {
        self.file_type & LOCK_FLAG > 0
    }
    pub fn set_locked(&mut self,locked: bool) {
        match locked {
            true => self.file_type |= LOCK_FLAG,
            false => self.file_type &= !LOCK_FLAG
        }
    }
    /// File type code with the lock flag masked off
    pub fn type_code(&self) -> u8 {
        self.file_type & !LOCK_FLAG
    }
    pub fn sector_count(&self) -> usize {
        u16::from_le_bytes(self.sectors) as usize
    }
    pub fn set_sector_count(&mut self,count: usize) {
        self.sectors = u16::to_le_bytes(count as u16);
    }
}

impl DiskStruct for DirectorySector {
    fn new() -> Self {
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
        return ans;
    }
    fn update_from_bytes(&mut self,bytes: &[u8]) -> Result<(),DiskStructError> {
        if bytes.len()<SECTOR_SIZE {
            return Err(DiskStructError::OutOfData);
        }
        self.pad1 = bytes[0];
        self.next_track = bytes[1];
        self.next_sector = bytes[2];
        for i in 0..8 {
            self.pad2[i] = bytes[i+3];
        }
        let mut offset = ENTRIES_OFFSET;
        for i in 0..ENTRIES_PER_SECTOR {
            self.entries[i].update_from_bytes(&bytes[offset..offset+ENTRY_SIZE])?;
            offset += ENTRY_SIZE;
        }
        Ok(())
    }
    fn from_bytes(bytes: &[u8]) -> Result<Self,DiskStructError> {
        let mut ans = Self::new();
        ans.update_from_bytes(bytes)?;
        Ok(ans)
    }
    fn len(&self) -> usize {
        return SECTOR_SIZE;
    }
}
