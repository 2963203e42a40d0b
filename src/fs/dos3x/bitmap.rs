//! Free-space bitmap stored in the VTOC.
//!
//! Each track gets 4 bytes, read as a big endian map where a set bit means the sector is free.
//! Sector `s` is bit `s+32-sectors`, so on 16 sector volumes sectors 0-7 live in byte 1
//! and sectors 8-15 in byte 0, while on 32 sector volumes sectors 0-7 live in byte 3.

use super::directory::VTOC;
use super::types::*;

/// Bit of the track map belonging to the sector, sectors beyond the geometry are refused
fn locate(vtoc: &VTOC,trk: u8,sec: u8) -> Result<u32,Error> {
    let eff_sec = sec as u32 + 32 - u8::min(vtoc.sectors,MAX_SECTORS) as u32;
    if trk>=MAX_TRACKS || sec>=MAX_SECTORS || eff_sec>=32 {
        log::error!("bitmap access out of bounds: track {} sector {}",trk,sec);
        return Err(Error::Range { track: trk as usize, sector: sec as usize });
    }
    Ok(eff_sec)
}

fn get_track_map(vtoc: &VTOC,trk: u8) -> u32 {
    let i = trk as usize * 4;
    let bm = &vtoc.bitmap;
    u32::from_be_bytes([bm[i],bm[i+1],bm[i+2],bm[i+3]])
}

fn save_track_map(vtoc: &mut VTOC,trk: u8,map: u32) {
    let i = trk as usize * 4;
    vtoc.bitmap[i..i+4].copy_from_slice(&u32::to_be_bytes(map));
}

pub fn is_free(vtoc: &VTOC,trk: u8,sec: u8) -> Result<bool,Error> {
    let eff_sec = locate(vtoc,trk,sec)?;
    Ok(get_track_map(vtoc,trk) & (1 << eff_sec) > 0)
}

pub fn set_free(vtoc: &mut VTOC,trk: u8,sec: u8) -> Result<(),Error> {
    let eff_sec = locate(vtoc,trk,sec)?;
    let map = get_track_map(vtoc,trk) | (1 << eff_sec);
    save_track_map(vtoc,trk,map);
    Ok(())
}

pub fn set_used(vtoc: &mut VTOC,trk: u8,sec: u8) -> Result<(),Error> {
    let eff_sec = locate(vtoc,trk,sec)?;
    let map = get_track_map(vtoc,trk) & !(1 << eff_sec);
    save_track_map(vtoc,trk,map);
    Ok(())
}

/// Count of set bits over the bitmap bytes that belong to the volume's tracks
pub fn free_count(vtoc: &VTOC) -> usize {
    let end = usize::min(vtoc.tracks as usize,MAX_TRACKS as usize) * 4;
    vtoc.bitmap[0..end].iter().map(|b| b.count_ones() as usize).sum()
}

pub fn used_count(vtoc: &VTOC) -> usize {
    vtoc.total_sectors().saturating_sub(free_count(vtoc))
}

/// Walk every sector of the volume reporting (track,sector,free), track-major.
/// Iteration can be started over any number of times from the same VTOC.
pub fn usage(vtoc: &VTOC) -> Usage<'_> {
    Usage {
        vtoc,
        track: 0,
        sector: 0
    }
}

#[derive(Clone)]
pub struct Usage<'a> {
    vtoc: &'a VTOC,
    track: u8,
    sector: u8
}

impl<'a> Iterator for Usage<'a> {
    type Item = (u8,u8,bool);
    fn next(&mut self) -> Option<Self::Item> {
        let (tracks,sectors) = self.vtoc.geometry();
        if self.track>=tracks || sectors==0 {
            return None;
        }
        let (trk,sec) = (self.track,self.sector);
        self.sector += 1;
        if self.sector>=sectors {
            self.sector = 0;
            self.track += 1;
        }
        match is_free(self.vtoc,trk,sec) {
            Ok(free) => Some((trk,sec,free)),
            Err(_) => None
        }
    }
}
