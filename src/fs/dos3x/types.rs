use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::str::FromStr;
use std::fmt;
use a2kit_macro::{DiskStruct,DiskStructError};
use crate::img;

pub const VTOC_TRACK: u8 = 17;
pub const VTOC_SECTOR: u8 = 0;
pub const SECTOR_SIZE: usize = 256;
/// Track/sector pairs held by one track/sector list sector
pub const MAX_PAIRS: usize = 122;
/// Offset of the first track/sector pair in a track/sector list sector
pub const PAIRS_OFFSET: usize = 0x0c;
/// Offset of the first directory entry in a catalog sector
pub const ENTRIES_OFFSET: usize = 0x0b;
pub const ENTRY_SIZE: usize = 0x23;
pub const ENTRIES_PER_SECTOR: usize = 7;
/// Offset of the bitmap within the VTOC
pub const BITMAP_OFFSET: usize = 0x38;
/// Sanity bounds on bitmap addressing, 50 tracks fill the VTOC, 32 bits are available per track
pub const MAX_TRACKS: u8 = 50;
pub const MAX_SECTORS: u8 = 32;
pub const DELETED_MARK: u8 = 0xff;
pub const LOCK_FLAG: u8 = 0x80;
pub const NAME_LEN: usize = 30;

/// Kinds of structural damage that are detected while walking a chain
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum CorruptKind {
    RecursiveDirectory,
    RecursiveTrackSectorList
}

impl fmt::Display for CorruptKind {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecursiveDirectory => write!(f,"recursive directory structure"),
            Self::RecursiveTrackSectorList => write!(f,"recursive track/sector list")
        }
    }
}

/// Enumerates DOS errors.  The `Display` trait will print the equivalent DOS message such as
/// `FILE NOT FOUND`, followed by any context that helps locate the problem.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("RANGE ERROR: track {track} sector {sector}")]
    Range { track: usize, sector: usize },
    #[error("FILE NOT FOUND")]
    FileNotFound,
    #[error("VOLUME MISMATCH")]
    VolumeMismatch,
    #[error("I/O ERROR: {kind} at track {track} sector {sector}")]
    Corrupt { kind: CorruptKind, track: u8, sector: u8 },
    #[error("DISK FULL: {required} sectors required, {available} available")]
    DiskFull { required: usize, available: usize },
    #[error("DISK FULL: no free catalog entry")]
    CatalogFull,
    #[error("FILE LOCKED")]
    FileLocked,
    #[error("DUPLICATE FILE NAME")]
    DuplicateName,
    #[error("FILE TYPE MISMATCH")]
    FileTypeMismatch,
    #[error("SYNTAX ERROR")]
    SyntaxError,
    #[error("entry is not in the right state for this operation")]
    WrongEntryKind,
    #[error(transparent)]
    Img(#[from] img::Error),
    #[error("bad structure: {0}")]
    Struct(#[from] DiskStructError)
}

impl Error {
    /// Both kinds of DISK FULL, out of sectors or out of catalog entries
    pub fn is_disk_full(&self) -> bool {
        matches!(self,Self::DiskFull {..} | Self::CatalogFull)
    }
}

/// Enumerates the file types, available conversions are:
/// * FileType to u8: `as u8`
/// * u8 to FileType: `FileType::from_u8`, the lock flag must be masked off first
/// * &str to FileType: `FileType::from_str`, str can be a number, DOS letter, or mnemonic
#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
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
    /// Single letter used by the DOS catalog
    pub fn letter(&self) -> char {
        match self {
            Self::Text => 'T',
            Self::Integer => 'I',
            Self::Applesoft => 'A',
            Self::Binary => 'B',
            Self::S => 'S',
            Self::Relocatable => 'R',
            Self::NewA => 'a',
            Self::NewB => 'b'
        }
    }
    /// Guess a type from a host file name, only text is distinguished
    pub fn suggested(host_name: &str) -> Self {
        match host_name.rsplit_once('.') {
            Some((stem,ext)) if stem.len()>0 && ext.eq_ignore_ascii_case("txt") => Self::Text,
            _ => Self::Binary
        }
    }
}

impl FromStr for FileType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        // string can be the number itself
        if let Ok(num) = u8::from_str(s) {
            return match FileType::from_u8(num) {
                Some(typ) => Ok(typ),
                _ => Err(Error::FileTypeMismatch)
            };
        }
        // or a mnemonic
        match s {
            "txt" | "T" => Ok(Self::Text),
            "itok" | "I" => Ok(Self::Integer),
            "atok" | "A" => Ok(Self::Applesoft),
            "bin" | "B" => Ok(Self::Binary),
            "S" => Ok(Self::S),
            "rel" | "R" => Ok(Self::Relocatable),
            "a" => Ok(Self::NewA),
            "b" => Ok(Self::NewB),
            _ => Err(Error::FileTypeMismatch)
        }
    }
}

/// Where a directory entry points.  On disk this is the first byte of the entry:
/// 0x00 is empty, 0xff is deleted, anything else is the track of the first track/sector list.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum EntryState {
    /// never used
    Empty,
    /// deleted, the value is the escrowed location of the old list, which is no longer owned
    Deleted([u8;2]),
    /// value is [track,sector] of the first track/sector list
    Active([u8;2])
}

/// Parameters of a new volume.  The default is the standard 140K DOS 3.3 floppy.
#[derive(Clone,Copy,Debug)]
pub struct FormatConfig {
    pub catalog_track: u8,
    /// the catalog runs from this sector down to sector 1
    pub first_catalog_sector: u8,
    pub tracks_per_disk: u8,
    pub sectors_per_track: u8,
    pub volume: u8
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            catalog_track: VTOC_TRACK,
            first_catalog_sector: 15,
            tracks_per_disk: 35,
            sectors_per_track: 16,
            volume: 254
        }
    }
}

impl FormatConfig {
    /// Refuse anything the VTOC cannot represent
    pub fn verify(&self) -> Result<(),Error> {
        let bad = Error::Range { track: self.tracks_per_disk as usize, sector: self.sectors_per_track as usize };
        if self.tracks_per_disk<=VTOC_TRACK || self.tracks_per_disk>MAX_TRACKS {
            log::error!("track count must be from {} to {}",VTOC_TRACK+1,MAX_TRACKS);
            return Err(bad);
        }
        if self.sectors_per_track!=16 && self.sectors_per_track!=32 {
            log::error!("sector count must be 16 or 32");
            return Err(bad);
        }
        if self.catalog_track==0 || self.catalog_track>=self.tracks_per_disk {
            log::error!("catalog track {} is outside the volume",self.catalog_track);
            return Err(Error::Range { track: self.catalog_track as usize, sector: 0 });
        }
        if self.first_catalog_sector==0 || self.first_catalog_sector>=self.sectors_per_track
            || (self.catalog_track==VTOC_TRACK && self.first_catalog_sector==VTOC_SECTOR) {
            log::error!("catalog cannot start at sector {}",self.first_catalog_sector);
            return Err(Error::Range { track: self.catalog_track as usize, sector: self.first_catalog_sector as usize });
        }
        if self.volume<1 || self.volume>254 {
            log::error!("volume must be from 1 to 254");
            return Err(Error::VolumeMismatch);
        }
        Ok(())
    }
}

/// Transforms between UTF8 and DOS text encodings.
/// DOS uses negative ASCII with CR line separators.
pub struct Encoder {
    line_terminator: Vec<u8>
}

impl Encoder {
    pub fn new(line_terminator: Vec<u8>) -> Self {
        Self {
            line_terminator
        }
    }
    fn is_terminated(bytes: &[u8],term: &[u8]) -> bool {
        term.len()==0 || bytes.ends_with(term)
    }
    pub fn encode(&self,txt: &str) -> Option<Vec<u8>> {
        let src = txt.as_bytes();
        let mut ans: Vec<u8> = Vec::new();
        for i in 0..src.len() {
            if i+1<src.len() && src[i]==0x0d && src[i+1]==0x0a {
                continue;
            }
            if src[i]==0x0a || src[i]==0x0d {
                ans.push(0x8d);
            } else if src[i]<128 {
                ans.push(src[i]+0x80);
            } else {
                return None;
            }
        }
        if !Self::is_terminated(&ans, &self.line_terminator) {
            ans.append(&mut self.line_terminator.clone());
        }
        return Some(ans);
    }
    /// Decoding stops at the first null, which ends sequential DOS text
    pub fn decode(&self,src: &[u8]) -> Option<String> {
        let mut ans: Vec<u8> = Vec::new();
        for b in src {
            match *b {
                0 => break,
                0x8d => ans.push(0x0a),
                x if x>127 => ans.push(x-0x80),
                _ => return None
            }
        }
        String::from_utf8(ans).ok()
    }
}

/// Structured representation of binary data on disk, the data is preceded
/// by the load address and the length.
pub struct BinaryData {
    pub start: [u8;2],
    length: [u8;2],
    pub data: Vec<u8>
}

impl BinaryData {
    /// Take unstructured bytes representing the data only (sans header) and pack it into the structure
    pub fn pack(bin: &[u8], addr: u16) -> Result<Self,Error> {
        let len = u16::try_from(bin.len()).map_err(|_| Error::Range { track: 0, sector: 0 })?;
        Ok(Self {
            start: u16::to_le_bytes(addr),
            length: u16::to_le_bytes(len),
            data: bin.to_vec()
        })
    }
    pub fn load_address(&self) -> u16 {
        u16::from_le_bytes(self.start)
    }
}

impl DiskStruct for BinaryData {
    fn new() -> Self {
        Self {
            start: [0;2],
            length: [0;2],
            data: Vec::new()
        }
    }
    /// Trailing bytes beyond the length in the header (sector padding) are dropped
    fn from_bytes(dat: &[u8]) -> Result<Self,DiskStructError> {
        if dat.len()<4 {
            return Err(DiskStructError::OutOfData);
        }
        let end_byte = u16::from_le_bytes([dat[2],dat[3]]) as usize + 4;
        if end_byte>dat.len() {
            return Err(DiskStructError::OutOfData);
        }
        Ok(Self {
            start: [dat[0],dat[1]],
            length: [dat[2],dat[3]],
            data: dat[4..end_byte].to_vec()
        })
    }
    fn to_bytes(&self) -> Vec<u8> {
        let mut ans: Vec<u8> = Vec::new();
        ans.append(&mut self.start.to_vec());
        ans.append(&mut self.length.to_vec());
        ans.append(&mut self.data.clone());
        return ans;
    }
    fn update_from_bytes(&mut self,dat: &[u8]) -> Result<(),DiskStructError> {
        let temp = BinaryData::from_bytes(dat)?;
        self.start = temp.start;
        self.length = temp.length;
        self.data = temp.data;
        Ok(())
    }
    fn len(&self) -> usize {
        return 4 + self.data.len();
    }
}
