//! # DOS 3.3 file system module
//! This manipulates disk images containing one standard DOS 3.3 volume.
//! At the level of this module, wide latitude is allowed for track counts
//! (up to 50), while sector counts are restricted to 16 or 32.
//!
//! * Every operation reads the VTOC, works, and writes the VTOC back before returning
//! * Files are addressed either by their catalog location or by name
//! * Structural damage that would cause an endless walk is reported as an error

pub mod types;
pub mod directory;
pub mod bitmap;
pub mod alloc;
pub mod catalog;
pub mod tslist;
pub mod pack;

use std::fmt::Write;
use std::collections::HashSet;
use num_traits::FromPrimitive;
use a2kit_macro::DiskStruct;
use log::{debug,error,info};

use types::*;
use directory::*;
pub use catalog::EntryLocation;
use crate::img;

/// Summary of an active file, as it appears in the catalog
#[derive(Clone,Debug)]
pub struct FileInfo {
    pub name: String,
    pub type_code: u8,
    pub locked: bool,
    pub sectors: usize
}

impl FileInfo {
    fn from_entry(entry: &DirectoryEntry) -> Self {
        Self {
            name: pack::file_name_to_string(entry.name),
            type_code: entry.type_code(),
            locked: entry.is_locked(),
            sectors: entry.sector_count()
        }
    }
    /// Type as the catalog shows it, `?` if unknown
    pub fn type_letter(&self) -> char {
        match FileType::from_u8(self.type_code) {
            Some(typ) => typ.letter(),
            None => '?'
        }
    }
}

/// The primary interface for disk operations.
pub struct Disk
{
    img: Box<dyn img::DiskImage>
}

impl Disk
{
    /// Create a disk file system using the given image as storage.
    /// The Disk takes ownership of the image.  Fails if the image does not hold a DOS 3.3 volume.
    pub fn from_img(img: Box<dyn img::DiskImage>) -> Result<Self,Error> {
        if !Self::test_img(img.as_ref()) {
            error!("image does not contain a DOS 3.3 volume");
            return Err(Error::VolumeMismatch);
        }
        Ok(Self {
            img
        })
    }
    /// Format the image and create a disk file system using it as storage.
    pub fn format_img(img: Box<dyn img::DiskImage>,cfg: &FormatConfig) -> Result<Self,Error> {
        let mut disk = Self {
            img
        };
        disk.format(cfg)?;
        Ok(disk)
    }
    /// Test an image to see if it already contains DOS 3.3.
    pub fn test_img(img: &dyn img::DiskImage) -> bool {
        let dat = match img.read_sector(VTOC_TRACK as usize,VTOC_SECTOR as usize) {
            Ok(dat) => dat,
            Err(_) => {
                debug!("VTOC sector was not readable");
                return false;
            }
        };
        let vtoc = match VTOC::from_bytes(&dat) {
            Ok(vtoc) => vtoc,
            Err(_) => return false
        };
        if vtoc.version!=3 {
            debug!("VTOC wrong version {}",vtoc.version);
            return false;
        }
        if vtoc.vol<1 || vtoc.vol>254 {
            debug!("volume {} out of range",vtoc.vol);
            return false;
        }
        if vtoc.max_pairs as usize!=MAX_PAIRS {
            debug!("VTOC wrong pair count {}",vtoc.max_pairs);
            return false;
        }
        if vtoc.bytes!=[0,1] || vtoc.tracks<=VTOC_TRACK || vtoc.tracks>MAX_TRACKS
            || vtoc.tracks as usize>img.track_count() || vtoc.sectors as usize!=img.sector_count() {
            debug!("VTOC wrong bytes {:?}, sectors {}, tracks {}",vtoc.bytes,vtoc.sectors,vtoc.tracks);
            return false;
        }
        if vtoc.track1==0 || vtoc.track1>=vtoc.tracks || vtoc.sector1>=vtoc.sectors {
            debug!("VTOC wrong track1 {}, sector1 {}",vtoc.track1,vtoc.sector1);
            return false;
        }
        true
    }
    pub fn read_vtoc(&self) -> Result<VTOC,Error> {
        let buf = self.img.read_sector(VTOC_TRACK as usize,VTOC_SECTOR as usize)?;
        Ok(VTOC::from_bytes(&buf)?)
    }
    pub fn write_vtoc(&mut self,vtoc: &VTOC) -> Result<(),Error> {
        self.img.write_sector(VTOC_TRACK as usize,VTOC_SECTOR as usize,&vtoc.to_bytes())?;
        Ok(())
    }
    /// Create a DOS 3.3 volume, all prior content is erased.
    pub fn format(&mut self,cfg: &FormatConfig) -> Result<(),Error> {
        cfg.verify()?;
        if cfg.tracks_per_disk as usize>self.img.track_count() || cfg.sectors_per_track as usize!=self.img.sector_count() {
            error!("image geometry {}x{} cannot hold the volume",self.img.track_count(),self.img.sector_count());
            return Err(Error::Range { track: cfg.tracks_per_disk as usize, sector: cfg.sectors_per_track as usize });
        }
        let zeros = vec![0;SECTOR_SIZE];
        for trk in 0..self.img.track_count() {
            for sec in 0..self.img.sector_count() {
                self.img.write_sector(trk,sec,&zeros)?;
            }
        }
        // catalog runs downward, each sector pointing to the one below
        for sec in (1..=cfg.first_catalog_sector).rev() {
            let mut dir = DirectorySector::new();
            if sec>1 {
                dir.next_track = cfg.catalog_track;
                dir.next_sector = sec-1;
            }
            self.img.write_sector(cfg.catalog_track as usize,sec as usize,&dir.to_bytes())?;
        }
        let mut vtoc = VTOC::new();
        vtoc.pad1 = 4;
        vtoc.track1 = cfg.catalog_track;
        vtoc.sector1 = cfg.first_catalog_sector;
        vtoc.version = 3;
        vtoc.vol = cfg.volume;
        vtoc.max_pairs = MAX_PAIRS as u8;
        vtoc.last_track = cfg.catalog_track + 1;
        vtoc.last_direction = 1;
        vtoc.tracks = cfg.tracks_per_disk;
        vtoc.sectors = cfg.sectors_per_track;
        vtoc.bytes = u16::to_le_bytes(SECTOR_SIZE as u16);
        for trk in 0..cfg.tracks_per_disk {
            if trk==0 || trk==VTOC_TRACK || trk==cfg.catalog_track {
                continue;
            }
            for sec in 0..cfg.sectors_per_track {
                bitmap::set_free(&mut vtoc,trk,sec)?;
            }
        }
        self.write_vtoc(&vtoc)?;
        info!("formatted volume {} with {} free sectors",cfg.volume,bitmap::free_count(&vtoc));
        Ok(())
    }
    /// Length of the catalog chain, fails if the chain is damaged
    pub fn catalog_sector_count(&self) -> Result<usize,Error> {
        let vtoc = self.read_vtoc()?;
        Ok(catalog::read_chain(self.img.as_ref(),&vtoc)?.len())
    }
    /// Every entry that is active or deleted, in catalog order
    pub fn list_entries(&self) -> Result<Vec<(EntryLocation,DirectoryEntry)>,Error> {
        let vtoc = self.read_vtoc()?;
        catalog::list_entries(self.img.as_ref(),&vtoc)
    }
    /// Summaries of the active files, in catalog order
    pub fn list_files(&self) -> Result<Vec<FileInfo>,Error> {
        Ok(self.list_entries()?.iter()
            .filter(|(_,entry)| matches!(entry.state(),EntryState::Active(_)))
            .map(|(_,entry)| FileInfo::from_entry(entry))
            .collect())
    }
    pub fn read_entry(&self,loc: &EntryLocation) -> Result<DirectoryEntry,Error> {
        catalog::read_entry(self.img.as_ref(),loc)
    }
    /// Find an active file by name, case is converted as DOS would
    pub fn find_entry(&self,name: &str) -> Result<(EntryLocation,DirectoryEntry),Error> {
        let fname = pack::string_to_file_name(name)?;
        for (loc,entry) in self.list_entries()? {
            if matches!(entry.state(),EntryState::Active(_)) && entry.name==fname {
                return Ok((loc,entry));
            }
        }
        debug!("no active file named {}",name);
        Err(Error::FileNotFound)
    }
    /// Put an empty file in the first empty or deleted catalog slot.
    /// The file owns one track/sector list sector from the start.
    pub fn create_file(&mut self,name: &str,typ: FileType) -> Result<EntryLocation,Error> {
        let fname = pack::string_to_file_name(name)?;
        match self.find_entry(name) {
            Ok(_) => {
                error!("{} already exists",name);
                return Err(Error::DuplicateName);
            },
            Err(Error::FileNotFound) => {},
            Err(e) => return Err(e)
        }
        let vtoc = self.read_vtoc()?;
        let loc = catalog::allocate_entry_slot(self.img.as_ref(),&vtoc)?;
        let mut entry = DirectoryEntry::new();
        entry.name = fname;
        entry.file_type = typ as u8;
        self.store(&loc,entry,&[])?;
        debug!("created {} at {},{} slot {}",name,loc.track,loc.sector,loc.slot);
        Ok(loc)
    }
    fn store(&mut self,loc: &EntryLocation,mut entry: DirectoryEntry,dat: &[u8]) -> Result<(),Error> {
        let mut vtoc = self.read_vtoc()?;
        tslist::write_data(self.img.as_mut(),&mut vtoc,&mut entry,dat)?;
        catalog::write_entry(self.img.as_mut(),loc,&entry)?;
        self.write_vtoc(&vtoc)
    }
    /// Replace the data of the active file at `loc`
    pub fn write_file_data(&mut self,loc: &EntryLocation,dat: &[u8]) -> Result<(),Error> {
        let entry = self.read_entry(loc)?;
        if !matches!(entry.state(),EntryState::Active(_)) {
            error!("cannot write to an entry that is not active");
            return Err(Error::WrongEntryKind);
        }
        if entry.is_locked() {
            return Err(Error::FileLocked);
        }
        self.store(loc,entry,dat)
    }
    /// Data sectors of the file at `loc`, padded out to the recorded sector count
    pub fn read_file_data(&self,loc: &EntryLocation) -> Result<Vec<u8>,Error> {
        let entry = self.read_entry(loc)?;
        tslist::read_data(self.img.as_ref(),&entry)
    }
    /// Free the file's sectors and mark the slot deleted, the slot can be reused afterwards
    pub fn delete(&mut self,loc: &EntryLocation) -> Result<(),Error> {
        let mut entry = self.read_entry(loc)?;
        let head = match entry.state() {
            EntryState::Active(head) => head,
            _ => {
                error!("cannot delete an entry that is not active");
                return Err(Error::WrongEntryKind);
            }
        };
        if entry.is_locked() {
            return Err(Error::FileLocked);
        }
        let mut vtoc = self.read_vtoc()?;
        tslist::free_chain(self.img.as_ref(),&mut vtoc,entry.state())?;
        entry.set_state(EntryState::Deleted(head));
        catalog::write_entry(self.img.as_mut(),loc,&entry)?;
        self.write_vtoc(&vtoc)
    }
    /// modify a file entry, optionally lock, unlock, rename; attempt to rename a locked file will fail.
    fn modify(&mut self,name: &str,maybe_lock: Option<bool>,maybe_new_name: Option<&str>) -> Result<(),Error> {
        let (loc,mut entry) = self.find_entry(name)?;
        if let Some(new_name) = maybe_new_name {
            if entry.is_locked() {
                return Err(Error::FileLocked);
            }
            let fname = pack::string_to_file_name(new_name)?;
            match self.find_entry(new_name) {
                Ok((other,_)) if other!=loc => return Err(Error::DuplicateName),
                Ok(_) | Err(Error::FileNotFound) => {},
                Err(e) => return Err(e)
            }
            entry.name = fname;
        }
        if let Some(locked) = maybe_lock {
            entry.set_locked(locked);
        }
        catalog::write_entry(self.img.as_mut(),&loc,&entry)
    }
    pub fn lock(&mut self,name: &str) -> Result<(),Error> {
        self.modify(name,Some(true),None)
    }
    pub fn unlock(&mut self,name: &str) -> Result<(),Error> {
        self.modify(name,Some(false),None)
    }
    pub fn rename(&mut self,old_name: &str,new_name: &str) -> Result<(),Error> {
        self.modify(old_name,None,Some(new_name))
    }
    /// Write a file by name, overwriting an existing file in place or creating a new one.
    /// Overwriting with a different type is refused.
    pub fn put_file(&mut self,name: &str,typ: FileType,dat: &[u8]) -> Result<EntryLocation,Error> {
        let loc = match self.find_entry(name) {
            Ok((loc,entry)) => {
                if entry.type_code()!=typ as u8 {
                    error!("{} exists with a different type",name);
                    return Err(Error::FileTypeMismatch);
                }
                loc
            },
            Err(Error::FileNotFound) => {
                alloc::check_capacity(&self.read_vtoc()?,dat.len(),&HashSet::new())?;
                self.create_file(name,typ)?
            },
            Err(e) => return Err(e)
        };
        self.write_file_data(&loc,dat)?;
        Ok(loc)
    }
    /// Read a file by name, returns the type code (lock flag removed) and the padded data
    pub fn get_file(&self,name: &str) -> Result<(u8,Vec<u8>),Error> {
        let (loc,entry) = self.find_entry(name)?;
        Ok((entry.type_code(),self.read_file_data(&loc)?))
    }
    pub fn delete_file(&mut self,name: &str) -> Result<(),Error> {
        let (loc,_) = self.find_entry(name)?;
        self.delete(&loc)
    }
    pub fn free_sector_count(&self) -> Result<usize,Error> {
        Ok(bitmap::free_count(&self.read_vtoc()?))
    }
    pub fn used_sector_count(&self) -> Result<usize,Error> {
        Ok(bitmap::used_count(&self.read_vtoc()?))
    }
    pub fn total_sector_count(&self) -> Result<usize,Error> {
        Ok(self.read_vtoc()?.total_sectors())
    }
    pub fn volume(&self) -> Result<u8,Error> {
        Ok(self.read_vtoc()?.vol)
    }
    pub fn disk_name(&self) -> Result<String,Error> {
        Ok(format!("DISK VOLUME {}",self.volume()?))
    }
    /// Listing in the style of the DOS CATALOG command
    pub fn catalog_to_string(&self) -> Result<String,Error> {
        let mut ans = String::new();
        // writing to a String cannot fail
        let _ = writeln!(ans);
        let _ = writeln!(ans,"{}",self.disk_name()?);
        let _ = writeln!(ans);
        for file in self.list_files()? {
            let lock = match file.locked { true => '*', false => ' ' };
            let _ = writeln!(ans,"{}{} {:03} {}",lock,file.type_letter(),file.sectors,file.name);
        }
        Ok(ans)
    }
    pub fn what_am_i(&self) -> img::DiskImageType {
        self.img.what_am_i()
    }
    pub fn get_img(&mut self) -> &mut Box<dyn img::DiskImage> {
        &mut self.img
    }
    /// Flatten the underlying image into the bytes of an image file
    pub fn to_bytes(&self) -> Vec<u8> {
        self.img.to_bytes()
    }
}
