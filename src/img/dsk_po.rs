//! ## Support for ProDOS ordered disk images (PO,DSK)
//! 
//! DSK images are a simple sequential dump of the already-decoded sector data.
//! If the sector sequence is ordered as in ProDOS, we have a PO variant.
//! A DOS volume can be stored this way, the logical sectors are then found using the
//! ProDOS block that contains them.

use log::trace;
use crate::img;
use crate::bios::skew;
use super::{Error,SECTOR_SIZE};

const BLOCK_SIZE: usize = 512;
const MAX_BLOCKS: usize = 400;

pub fn file_extensions() -> Vec<String> {
    vec!["po".to_string(),"dsk".to_string()]
}

/// Wrapper for PO data.
pub struct PO {
    blocks: u16,
    data: Vec<u8>
}

impl PO {
    pub fn create(blocks: u16) -> Self {
        Self {
            blocks,
            data: vec![0;blocks as usize*BLOCK_SIZE]
        }
    }
    fn offset(&self,trk: usize,sec: usize) -> usize {
        let (block,byte) = skew::prodos_block_from_ts(trk,sec);
        block*BLOCK_SIZE + byte
    }
}

impl img::DiskImage for PO {
    fn track_count(&self) -> usize {
        return self.blocks as usize/8;
    }
    fn sector_count(&self) -> usize {
        16
    }
    fn what_am_i(&self) -> img::DiskImageType {
        img::DiskImageType::PO
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
    fn from_bytes(data: &[u8]) -> Result<Self,Error> {
        // demand an integral number of tracks (8 blocks each)
        if data.len()==0 || data.len()%(8*BLOCK_SIZE) > 0 || data.len()/BLOCK_SIZE > MAX_BLOCKS {
            return Err(Error::ImageSizeMismatch);
        }
        Ok(Self {
            blocks: (data.len()/BLOCK_SIZE) as u16,
            data: data.to_vec()
        })
    }
    fn to_bytes(&self) -> Vec<u8> {
        return self.data.clone();
    }
}
