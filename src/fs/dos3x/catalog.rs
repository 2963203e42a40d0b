//! Walking the catalog chain.
//!
//! The catalog is a linked list of sectors rooted in the VTOC.  It is laid down
//! by the formatter and never grows, so a full chain means the disk is full.

use std::collections::HashSet;
use a2kit_macro::DiskStruct;
use super::directory::*;
use super::types::*;
use crate::img::DiskImage;

/// Address of a directory entry: catalog sector and slot within it
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct EntryLocation {
    pub track: u8,
    pub sector: u8,
    pub slot: usize
}

/// Read every sector of the catalog chain in order.
/// The chain ends at a zero track, a sector visited twice is an error.
pub fn read_chain(img: &dyn DiskImage,vtoc: &VTOC) -> Result<Vec<([u8;2],DirectorySector)>,Error> {
    let mut ans = Vec::new();
    let mut visited: HashSet<[u8;2]> = HashSet::new();
    let mut ts = [vtoc.track1,vtoc.sector1];
    while ts[0]!=0 {
        if !visited.insert(ts) {
            log::error!("catalog revisits track {} sector {}",ts[0],ts[1]);
            return Err(Error::Corrupt { kind: CorruptKind::RecursiveDirectory, track: ts[0], sector: ts[1] });
        }
        log::trace!("reading catalog sector {},{}",ts[0],ts[1]);
        let buf = img.read_sector(ts[0] as usize,ts[1] as usize)?;
        let dir = DirectorySector::from_bytes(&buf)?;
        let next = [dir.next_track,dir.next_sector];
        ans.push((ts,dir));
        ts = next;
    }
    Ok(ans)
}

/// All entries that were ever used, i.e., active and deleted, in catalog order
pub fn list_entries(img: &dyn DiskImage,vtoc: &VTOC) -> Result<Vec<(EntryLocation,DirectoryEntry)>,Error> {
    let mut ans = Vec::new();
    for (ts,dir) in read_chain(img,vtoc)? {
        for (slot,entry) in dir.entries.into_iter().enumerate() {
            if entry.state()!=EntryState::Empty {
                ans.push((EntryLocation { track: ts[0], sector: ts[1], slot },entry));
            }
        }
    }
    Ok(ans)
}

/// First slot that is empty or deleted
pub fn allocate_entry_slot(img: &dyn DiskImage,vtoc: &VTOC) -> Result<EntryLocation,Error> {
    for (ts,dir) in read_chain(img,vtoc)? {
        for slot in 0..ENTRIES_PER_SECTOR {
            match dir.entries[slot].state() {
                EntryState::Active(_) => continue,
                _ => return Ok(EntryLocation { track: ts[0], sector: ts[1], slot })
            }
        }
    }
    log::error!("catalog is full");
    Err(Error::CatalogFull)
}

/// Byte offset of the entry within its catalog sector
fn entry_offset(loc: &EntryLocation) -> Result<usize,Error> {
    if loc.slot>=ENTRIES_PER_SECTOR {
        log::error!("catalog slot {} does not exist",loc.slot);
        return Err(Error::Range { track: loc.track as usize, sector: loc.sector as usize });
    }
    Ok(ENTRIES_OFFSET + loc.slot*ENTRY_SIZE)
}

pub fn read_entry(img: &dyn DiskImage,loc: &EntryLocation) -> Result<DirectoryEntry,Error> {
    let offset = entry_offset(loc)?;
    let buf = img.read_sector(loc.track as usize,loc.sector as usize)?;
    Ok(DirectoryEntry::from_bytes(&buf[offset..offset+ENTRY_SIZE])?)
}

/// Put the entry in its slot, leaving the rest of the catalog sector as is
pub fn write_entry(img: &mut dyn DiskImage,loc: &EntryLocation,entry: &DirectoryEntry) -> Result<(),Error> {
    let offset = entry_offset(loc)?;
    let mut buf = img.read_sector(loc.track as usize,loc.sector as usize)?;
    buf[offset..offset+ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
    img.write_sector(loc.track as usize,loc.sector as usize,&buf)?;
    Ok(())
}
