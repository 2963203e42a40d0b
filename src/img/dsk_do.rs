//! ## Support for DOS ordered disk images (DO,DSK)
//! 
//! DSK images are a simple sequential dump of the already-decoded sector data.
//! If the sector sequence is ordered as in DOS 3.3, we have a DO variant.
//! N.b. the ordering cannot be verified until we get up to the file system layer.

use log::trace;
use crate::img;
use super::{Error,SECTOR_SIZE};

const MAX_TRACKS: usize = 50;

pub fn file_extensions() -> Vec<String> {
    vec!["do".to_string(),"dsk".to_string()]
}

/// Wrapper for DO data.
pub struct DO {
    tracks: u16,
    sectors: u16,
    data: Vec<u8>
}

impl DO {
    /// Create a blank image, the track count can be up to 50, sectors can be 16 or 32.
    pub fn create(tracks: u16,sectors: u16) -> Self {
        Self {
            tracks,
            sectors,
            data: vec![0;tracks as usize*sectors as usize*SECTOR_SIZE]
        }
    }
    /// Interpret the bytes of an image file assuming the given sectors per track, 16 or 32.
    pub fn from_bytes_with_sectors(data: &[u8],sectors: u16) -> Result<Self,Error> {
        let track_size = sectors as usize*SECTOR_SIZE;
        if sectors!=16 && sectors!=32 {
            return Err(Error::ImageTypeMismatch);
        }
        if data.len()==0 || data.len()%track_size > 0 || data.len()/track_size > MAX_TRACKS {
            return Err(Error::ImageSizeMismatch);
        }
        Ok(Self {
            tracks: (data.len()/track_size) as u16,
            sectors,
            data: data.to_vec()
        })
    }
    fn offset(&self,trk: usize,sec: usize) -> usize {
        (trk*self.sectors as usize + sec)*SECTOR_SIZE
    }
}

impl img::DiskImage for DO {
    fn track_count(&self) -> usize {
        return self.tracks as usize;
    }
    fn sector_count(&self) -> usize {
        return self.sectors as usize;
    }
    fn what_am_i(&self) -> img::DiskImageType {
        img::DiskImageType::DO
    }
    fn file_extensions(&self) -> Vec<String> {
        file_extensions()
    }
    fn read_sector(&self,trk: usize,sec: usize) -> Result<Vec<u8>,Error> {
        trace!("read track {} sector {}",trk,sec);
        super::check_bounds(self,trk,sec,0)?;
        let offset = self.offset(trk,sec);
        Ok(self.data[offset..offset+SECTOR_SIZE].to_vec())
    }
    fn write_sector(&mut self,trk: usize,sec: usize,dat: &[u8]) -> Result<(),Error> {
        trace!("write track {} sector {}",trk,sec);
        super::check_bounds(self,trk,sec,dat.len())?;
        let offset = self.offset(trk,sec);
        let padded = super::quantize_block(dat, SECTOR_SIZE);
        self.data[offset..offset+SECTOR_SIZE].copy_from_slice(&padded);
        Ok(())
    }
    /// Sequential dumps do not record the geometry, 16 sectors per track is assumed
    fn from_bytes(data: &[u8]) -> Result<Self,Error> {
        Self::from_bytes_with_sectors(data,16)
    }
    fn to_bytes(&self) -> Vec<u8> {
        return self.data.clone();
    }
}
