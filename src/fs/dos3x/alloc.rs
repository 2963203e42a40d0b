//! Sector allocation arithmetic and the free sector scan.

use std::collections::HashSet;
use super::directory::VTOC;
use super::bitmap;
use super::types::*;

/// Where every allocation scan begins, track 0 is never handed out.
pub const SCAN_START: (u8,u8) = (1,0);

/// Scan forward from `start` for a free sector, sector first, then track.
/// The scan does not wrap around from the last track.
pub fn find_free_sector(vtoc: &VTOC,start: (u8,u8)) -> Result<(u8,u8),Error> {
    let (tracks,sectors) = vtoc.geometry();
    let (mut trk,mut sec) = start;
    while trk<tracks {
        while sec<sectors {
            if bitmap::is_free(vtoc,trk,sec)? {
                log::trace!("found free sector {},{}",trk,sec);
                return Ok((trk,sec));
            }
            sec += 1;
        }
        sec = 0;
        trk += 1;
    }
    log::debug!("no free sector at or after {},{}",start.0,start.1);
    Err(Error::DiskFull { required: 1, available: 0 })
}

/// Record the track of the latest allocation along with the direction
/// away from the VTOC track.  Allocations on the VTOC track itself leave both alone.
pub fn note_last_track(vtoc: &mut VTOC,trk: u8) {
    if trk<VTOC_TRACK {
        vtoc.last_direction = 255;
        vtoc.last_track = trk;
    }
    if trk>VTOC_TRACK {
        vtoc.last_direction = 1;
        vtoc.last_track = trk;
    }
}

/// Data sectors plus track/sector list sectors needed to hold `len` bytes
pub fn required_sector_count(len: usize) -> usize {
    let data = (len + SECTOR_SIZE - 1) / SECTOR_SIZE;
    data + (data + MAX_PAIRS - 1) / MAX_PAIRS
}

/// Sectors the scan can hand out once the `owned` sectors are released.
/// Free bits on track 0 or past the geometry are not counted.
pub fn available_count(vtoc: &VTOC,owned: &HashSet<(u8,u8)>) -> usize {
    bitmap::usage(vtoc)
        .filter(|(trk,sec,free)| *trk>=SCAN_START.0 && (*free || owned.contains(&(*trk,*sec))))
        .count()
}

/// Verify `len` bytes will fit given the sectors the file already owns, which are
/// going to be released.  Returns the number of sectors the write will take.
/// An empty file still takes its track/sector list sector.
pub fn check_capacity(vtoc: &VTOC,len: usize,owned: &HashSet<(u8,u8)>) -> Result<usize,Error> {
    let required = usize::max(required_sector_count(len),1);
    let available = available_count(vtoc,owned);
    if required>available {
        log::error!("{} sectors needed, {} available",required,available);
        return Err(Error::DiskFull { required, available });
    }
    Ok(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2kit_macro::DiskStruct;

    #[test]
    fn sector_arithmetic() {
        assert_eq!(required_sector_count(0),0);
        assert_eq!(required_sector_count(1),2);
        assert_eq!(required_sector_count(256),2);
        assert_eq!(required_sector_count(257),3);
        assert_eq!(required_sector_count(122*256),123);
        assert_eq!(required_sector_count(122*256+1),125);
    }

    #[test]
    fn scan_order() {
        let mut vtoc = VTOC::new();
        vtoc.tracks = 35;
        vtoc.sectors = 16;
        assert!(find_free_sector(&vtoc,SCAN_START).is_err());
        bitmap::set_free(&mut vtoc,3,2).unwrap();
        bitmap::set_free(&mut vtoc,2,9).unwrap();
        assert_eq!(find_free_sector(&vtoc,SCAN_START).unwrap(),(2,9));
        assert_eq!(find_free_sector(&vtoc,(2,10)).unwrap(),(3,2));
        assert!(find_free_sector(&vtoc,(3,3)).is_err());
    }

    #[test]
    fn capacity() {
        let mut vtoc = VTOC::new();
        vtoc.tracks = 35;
        vtoc.sectors = 16;
        bitmap::set_free(&mut vtoc,5,0).unwrap();
        // the scan never reaches track 0
        bitmap::set_free(&mut vtoc,0,4).unwrap();
        let none = HashSet::new();
        assert_eq!(check_capacity(&vtoc,0,&none).unwrap(),1);
        match check_capacity(&vtoc,1,&none) {
            Err(Error::DiskFull { required, available }) => assert_eq!((required,available),(2,1)),
            _ => panic!("expected disk full")
        }
        let owned = HashSet::from([(6,3)]);
        assert_eq!(check_capacity(&vtoc,1,&owned).unwrap(),2);
        // an owned sector that is also free counts once
        let owned = HashSet::from([(5,0)]);
        assert_eq!(available_count(&vtoc,&owned),1);
    }

    #[test]
    fn last_track() {
        let mut vtoc = VTOC::new();
        note_last_track(&mut vtoc,3);
        assert_eq!((vtoc.last_track,vtoc.last_direction),(3,255));
        note_last_track(&mut vtoc,17);
        assert_eq!((vtoc.last_track,vtoc.last_direction),(3,255));
        note_last_track(&mut vtoc,20);
        assert_eq!((vtoc.last_track,vtoc.last_direction),(20,1));
    }
}
