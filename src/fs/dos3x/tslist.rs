//! Track/sector list chains.
//!
//! Each file is indexed by a chain of list sectors, each holding up to 122 ordered
//! pointers to data sectors.  Reading, freeing and writing all walk the same chain.

use std::collections::HashSet;
use a2kit_macro::DiskStruct;
use super::directory::*;
use super::types::*;
use super::{alloc,bitmap};
use crate::img::DiskImage;

/// Read every list sector of the chain starting at `head`.
/// The chain ends at a zero track, a sector visited twice is an error.
pub fn read_chain(img: &dyn DiskImage,head: [u8;2]) -> Result<Vec<([u8;2],TrackSectorList)>,Error> {
    let mut ans = Vec::new();
    let mut visited: HashSet<[u8;2]> = HashSet::new();
    let mut ts = head;
    while ts[0]!=0 {
        if !visited.insert(ts) {
            log::error!("track/sector list revisits track {} sector {}",ts[0],ts[1]);
            return Err(Error::Corrupt { kind: CorruptKind::RecursiveTrackSectorList, track: ts[0], sector: ts[1] });
        }
        log::trace!("reading track/sector list {},{}",ts[0],ts[1]);
        let buf = img.read_sector(ts[0] as usize,ts[1] as usize)?;
        let tslist = TrackSectorList::from_bytes(&buf)?;
        let next = [tslist.next_track,tslist.next_sector];
        ans.push((ts,tslist));
        ts = next;
    }
    Ok(ans)
}

/// Data sector pointers of one list sector, stopping at the first zero track
fn data_pairs(tslist: &TrackSectorList) -> impl Iterator<Item = (u8,u8)> + '_ {
    (0..MAX_PAIRS).map(move |i| tslist.pair(i)).take_while(|(trk,_)| *trk!=0)
}

/// Distinct list and data sectors the entry actually holds on disk
pub fn owned_sectors(img: &dyn DiskImage,state: EntryState) -> Result<HashSet<(u8,u8)>,Error> {
    let mut ans = HashSet::new();
    if let EntryState::Active(head) = state {
        for (ts,tslist) in read_chain(img,head)? {
            ans.insert((ts[0],ts[1]));
            ans.extend(data_pairs(&tslist));
        }
    }
    Ok(ans)
}

/// Read the file's data sectors in order.  The output is `(sectors-1)*256` bytes,
/// where `sectors` is the recorded count on the entry.  Entries that are not active yield nothing.
pub fn read_data(img: &dyn DiskImage,entry: &DirectoryEntry) -> Result<Vec<u8>,Error> {
    let head = match entry.state() {
        EntryState::Active(head) => head,
        _ => return Ok(Vec::new())
    };
    let mut ans = vec![0;entry.sector_count().saturating_sub(1) * SECTOR_SIZE];
    let mut offset = 0;
    for (_,tslist) in read_chain(img,head)? {
        for (trk,sec) in data_pairs(&tslist) {
            if offset+SECTOR_SIZE>ans.len() {
                log::warn!("file has more data sectors than its recorded count");
                return Ok(ans);
            }
            let buf = img.read_sector(trk as usize,sec as usize)?;
            ans[offset..offset+SECTOR_SIZE].copy_from_slice(&buf);
            offset += SECTOR_SIZE;
        }
    }
    Ok(ans)
}

/// Mark every list and data sector of the chain free in the VTOC.
/// The whole chain is read before anything is freed.
pub fn free_chain(img: &dyn DiskImage,vtoc: &mut VTOC,state: EntryState) -> Result<(),Error> {
    let head = match state {
        EntryState::Active(head) => head,
        _ => return Ok(())
    };
    for (ts,tslist) in read_chain(img,head)? {
        bitmap::set_free(vtoc,ts[0],ts[1])?;
        for (trk,sec) in data_pairs(&tslist) {
            bitmap::set_free(vtoc,trk,sec)?;
        }
    }
    Ok(())
}

/// Replace the entry's data with `dat`.  The old chain is released first, and its head
/// is reused if there was one.  Updates the entry's state and sector count, but the caller
/// is responsible for saving the entry and the VTOC.
pub fn write_data(img: &mut dyn DiskImage,vtoc: &mut VTOC,entry: &mut DirectoryEntry,dat: &[u8]) -> Result<(),Error> {
    let owned = owned_sectors(img,entry.state())?;
    alloc::check_capacity(vtoc,dat.len(),&owned)?;
    free_chain(img,vtoc,entry.state())?;
    let head = match entry.state() {
        EntryState::Active([trk,sec]) => (trk,sec),
        _ => alloc::find_free_sector(vtoc,alloc::SCAN_START)?
    };
    bitmap::set_used(vtoc,head.0,head.1)?;
    alloc::note_last_track(vtoc,head.0);
    let mut list_ts = head;
    let mut tslist = TrackSectorList::new();
    let mut list_count = 1;
    let mut idx = 0;
    let mut cursor = alloc::SCAN_START;
    for (chunk_num,chunk) in dat.chunks(SECTOR_SIZE).enumerate() {
        if idx==MAX_PAIRS {
            let next = alloc::find_free_sector(vtoc,cursor)?;
            bitmap::set_used(vtoc,next.0,next.1)?;
            alloc::note_last_track(vtoc,next.0);
            tslist.next_track = next.0;
            tslist.next_sector = next.1;
            img.write_sector(list_ts.0 as usize,list_ts.1 as usize,&tslist.to_bytes())?;
            tslist = TrackSectorList::new();
            tslist.set_sector_base(chunk_num);
            list_ts = next;
            list_count += 1;
            idx = 0;
            cursor = next;
        }
        let ts = alloc::find_free_sector(vtoc,cursor)?;
        bitmap::set_used(vtoc,ts.0,ts.1)?;
        alloc::note_last_track(vtoc,ts.0);
        img.write_sector(ts.0 as usize,ts.1 as usize,chunk)?;
        tslist.set_pair(idx,ts.0,ts.1);
        idx += 1;
        cursor = ts;
    }
    img.write_sector(list_ts.0 as usize,list_ts.1 as usize,&tslist.to_bytes())?;
    let data_count = (dat.len() + SECTOR_SIZE - 1) / SECTOR_SIZE;
    log::debug!("wrote {} data sectors, {} list sectors",data_count,list_count);
    entry.set_state(EntryState::Active([head.0,head.1]));
    entry.set_sector_count(data_count + list_count);
    Ok(())
}
