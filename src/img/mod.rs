//! # Disk Image Module
//!
//! Disk images are represented by objects implementing the `DiskImage` trait.
//! The object type is named for the disk image type that it handles, e.g., `DO`.
//! The trait object is the sector store used by the file system layer.
//!
//! ## Relation to File Systems
//!
//! The `fs` modules work by reading sectors from, or writing sectors to, the disk image.
//! Sectors are always requested by their DOS *logical* (track,sector) address.
//! The task of mapping a logical sector to a byte offset within the image (the sector
//! ordering of the container) happens in submodules of `img`, with the aid of `bios::skew`,
//! but never with any help from `fs`.
//!
//! ## Sector Skews
//!
//! The actual skew tables are maintained separately in `bios::skew`.

pub mod dsk_do;
pub mod dsk_po;

use std::fmt;
use std::str::FromStr;

/// Size of every sector handled by the image layer.
pub const SECTOR_SIZE: usize = 256;

/// Enumerates disk image errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("unknown image type")]
    UnknownImageType,
    #[error("image size did not match the request")]
    ImageSizeMismatch,
    #[error("image type not compatible with request")]
    ImageTypeMismatch,
    #[error("unable to access track {track} sector {sector}")]
    SectorAccess { track: usize, sector: usize }
}

/// Enumerates the image containers this crate understands
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum DiskImageType {
    DO,
    PO
}

impl FromStr for DiskImageType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "do" => Ok(Self::DO),
            "po" => Ok(Self::PO),
            _ => Err(Error::UnknownImageType)
        }
    }
}

impl fmt::Display for DiskImageType {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DO => write!(f,"do"),
            Self::PO => write!(f,"po")
        }
    }
}

/// The main trait for working with any kind of disk image.
/// The corresponding trait object serves as storage for `fs::dos3x::Disk`.
pub trait DiskImage {
    /// Get the count of tracks the image holds
    fn track_count(&self) -> usize;
    /// Get the count of sectors in every track
    fn sector_count(&self) -> usize;
    /// Get the integrated storage capacity of the image
    fn byte_capacity(&self) -> usize {
        self.track_count() * self.sector_count() * SECTOR_SIZE
    }
    fn what_am_i(&self) -> DiskImageType;
    fn file_extensions(&self) -> Vec<String>;
    /// Read a logical sector from the image, always returns `SECTOR_SIZE` bytes.
    fn read_sector(&self,trk: usize,sec: usize) -> Result<Vec<u8>,Error>;
    /// Write a logical sector to the image.  Short data is padded with zeros, long data is an error.
    fn write_sector(&mut self,trk: usize,sec: usize,dat: &[u8]) -> Result<(),Error>;
    /// Create the image from the bytes of an image file
    fn from_bytes(buf: &[u8]) -> Result<Self,Error> where Self: Sized;
    /// Flatten the image into the bytes of an image file
    fn to_bytes(&self) -> Vec<u8>;
}

/// Pad or truncate `src` to exactly `quantum` bytes
pub fn quantize_block(src: &[u8],quantum: usize) -> Vec<u8> {
    let mut padded: Vec<u8> = Vec::new();
    for i in 0..quantum {
        if i<src.len() {
            padded.push(src[i])
        } else {
            padded.push(0);
        }
    }
    return padded;
}

/// Common bounds check for the sequential dump images
fn check_bounds(img: &dyn DiskImage,trk: usize,sec: usize,len: usize) -> Result<(),Error> {
    if trk>=img.track_count() || sec>=img.sector_count() || len>SECTOR_SIZE {
        log::error!("exceeded bounds: image has {} tracks of {} sectors",img.track_count(),img.sector_count());
        return Err(Error::SectorAccess { track: trk, sector: sec });
    }
    Ok(())
}

#[test]
fn test_quantize() {
    assert_eq!(quantize_block(&[1,2,3],5),vec![1,2,3,0,0]);
    assert_eq!(quantize_block(&[1,2,3,4,5,6],4),vec![1,2,3,4]);
}
