//! # `a2dos` main library
//!
//! This library manipulates DOS 3.3 volumes held in flat disk images suitable for emulators.
//!
//! ## Architecture
//!
//! Disk image operations are built around two layers:
//! * `img::DiskImage` trait objects store sectors, they do not try to interpret a file system
//! * `fs::dos3x::Disk` imposes the DOS 3.3 file system on the sectors
//!
//! When a `Disk` object is created it takes ownership of some `DiskImage`.
//! It then uses this owned image as storage.  Any changes are not permanent until the
//! image is saved to whatever file system is hosting a2dos.
//!
//! ## Disk Images
//!
//! The sector ordering of the image file has to be known in order to find the sectors.
//! As of this writing `a2dos` supports
//! * DSK or DO, DOS ordered sectors
//! * PO, ProDOS ordered sectors
//!
//! ## Disk Kinds
//!
//! Standard volumes are 35 tracks of 16 sectors (140K).  The VTOC can describe up
//! to 50 tracks of 32 sectors (400K), and such volumes can be created in DO images.

pub mod fs;
pub mod bios;
pub mod img;
pub mod commands;

use img::{DiskImage,DiskImageType};
use fs::dos3x::Disk;
use std::io::Read;
use std::fmt::Write;
use log::{warn,info,debug};

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const KNOWN_FILE_EXTENSIONS: [&str;3] = ["dsk","do","po"];

/// Save the image file (make changes permanent)
pub fn save_img(disk: &Disk,img_path: &str) -> STDRESULT {
    std::fs::write(img_path,disk.to_bytes())?;
    Ok(())
}

/// Create an empty image with the given ordering and geometry
pub fn create_img(typ: DiskImageType,tracks: u8,sectors: u8) -> Result<Box<dyn DiskImage>,DYNERR> {
    match typ {
        DiskImageType::DO => Ok(Box::new(img::dsk_do::DO::create(tracks as u16,sectors as u16))),
        DiskImageType::PO => {
            if sectors!=16 {
                warn!("PO images must have 16 sectors per track");
                return Err(Box::new(img::Error::ImageTypeMismatch));
            }
            Ok(Box::new(img::dsk_po::PO::create(tracks as u16 * 8)))
        }
    }
}

/// Return the file system on a disk image, or None if one cannot be found.
/// If found, the file system takes ownership of the disk image.
fn try_img(img: Box<dyn DiskImage>) -> Option<Disk> {
    if Disk::test_img(img.as_ref()) {
        info!("identified DOS 3.3 file system in {} image",img.what_am_i());
        return Disk::from_img(img).ok();
    }
    None
}

/// Sector 0 and sector 15 are in the same place with either ordering, so the VTOC
/// alone cannot settle the ordering.  The ordering that yields the longer intact
/// catalog chain wins, ties go to DO.
fn pick_ordering(candidates: Vec<Disk>) -> Option<Disk> {
    let mut best: Option<(usize,Disk)> = None;
    for disk in candidates {
        let score = match disk.catalog_sector_count() {
            Ok(count) => count,
            Err(_) => 0
        };
        debug!("catalog chain has {} sectors assuming {} ordering",score,disk.what_am_i());
        let better = match &best {
            Some((best_score,_)) => score>*best_score,
            None => true
        };
        if better {
            best = Some((score,disk));
        }
    }
    best.map(|(_,disk)| disk)
}

/// Given a bytestream return a Disk, or Err if the bytestream cannot be interpreted.
/// Optional `maybe_ext` restricts the image types that will be tried based on file extension.
/// A `dsk` extension could be either ordering, so both are tried.
pub fn create_fs_from_bytestream(disk_img_data: &[u8],maybe_ext: Option<&str>) -> Result<Disk,DYNERR> {
    let ext = match maybe_ext {
        Some(x) => x.to_lowercase(),
        None => "".to_string()
    };
    let mut candidates: Vec<Disk> = Vec::new();
    if ["do","dsk",""].contains(&ext.as_str()) {
        for sectors in [16,32] {
            if let Ok(img) = img::dsk_do::DO::from_bytes_with_sectors(disk_img_data,sectors) {
                info!("possible DO image with {} sectors",sectors);
                candidates.extend(try_img(Box::new(img)));
            }
        }
    }
    if ["po","dsk",""].contains(&ext.as_str()) {
        if let Ok(img) = img::dsk_po::PO::from_bytes(disk_img_data) {
            info!("possible PO image");
            candidates.extend(try_img(Box::new(img)));
        }
    }
    match pick_ordering(candidates) {
        Some(disk) => Ok(disk),
        None => {
            warn!("cannot match any file system");
            Err(Box::new(fs::dos3x::types::Error::VolumeMismatch))
        }
    }
}

/// Calls `create_fs_from_bytestream` getting the bytes from a file.
/// File extension will be used to restrict image types that are tried,
/// unless the extension is unknown, in which case all will be tried.
pub fn create_fs_from_file(img_path: &str) -> Result<Disk,DYNERR> {
    let disk_img_data = std::fs::read(img_path)?;
    let maybe_ext = match img_path.rsplit_once('.') {
        Some((_,ext)) if KNOWN_FILE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => Some(ext),
        _ => None
    };
    create_fs_from_bytestream(&disk_img_data,maybe_ext)
}

/// Calls `create_fs_from_bytestream` getting the bytes from stdin.
/// All image types will be tried heuristically.
pub fn create_fs_from_stdin() -> Result<Disk,DYNERR> {
    let mut disk_img_data = Vec::new();
    std::io::stdin().read_to_end(&mut disk_img_data)?;
    create_fs_from_bytestream(&disk_img_data,None)
}

/// Format binary as rows of address, hex, and negative ascii, for display on a terminal
pub fn display_block(start_addr: u16,block: &[u8]) -> String {
    let mut ans = String::new();
    for (row,slice) in block.chunks(16).enumerate() {
        let addr = start_addr as usize + row*16;
        let hex_cols: Vec<String> = slice.iter().map(|b| hex::encode_upper([*b])).collect();
        let neg_txt: String = slice.iter().map(|b| match *b {
            x if x>=0xa0 && x<0xff => (x - 0x80) as char,
            _ => '.'
        }).collect();
        let _ = writeln!(ans,"{:04X} : {:<48}|-| {}",addr,hex_cols.join(" ") + " ",neg_txt);
    }
    ans
}

/// This takes any bytes and makes an ascii friendly string
/// by using hex escapes, e.g., `\xFF`.
/// if `escape_cc` is true, ascii control characters are also escaped.
/// if `inverted` is true, assume we have negative ascii bytes.
pub fn escaped_ascii_from_bytes(bytes: &[u8],escape_cc: bool,inverted: bool) -> String {
    let mut result = String::new();
    let (lb,ub) = match (escape_cc,inverted) {
        (true,false) => (0x20,0x7e),
        (false,false) => (0x00,0x7f),
        (true,true) => (0xa0,0xfe),
        (false,true) => (0x80,0xff)
    };
    for b in bytes {
        if *b>=lb && *b<=ub {
            match inverted {
                true => result.push((*b - 0x80) as char),
                false => result.push(*b as char)
            }
        } else {
            let _ = write!(result,"\\x{}",hex::encode_upper([*b]));
        }
    }
    result
}

/// Interpret a UTF8 string as pure ascii and put into bytes.
/// Non-ascii characters are omitted from the result, but arbitrary
/// bytes can be introduced using escapes, e.g., `\xFF`, which are never inverted.
/// if `inverted` is true the sign of the non-escaped bytes is flipped.
/// if `caps` is true the ascii is put in upper case.
pub fn parse_escaped_ascii(s: &str,inverted: bool,caps: bool) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i<chars.len() {
        if chars[i]=='\\' && i+3<chars.len() && chars[i+1]=='x' {
            let digits: String = chars[i+2..i+4].iter().collect();
            if let Ok(byte) = hex::decode(&digits) {
                ans.push(byte[0]);
                i += 4;
                continue;
            }
        }
        let c = match caps {
            true => chars[i].to_ascii_uppercase(),
            false => chars[i]
        };
        if c.is_ascii() {
            match inverted {
                true => ans.push(c as u8 + 0x80),
                false => ans.push(c as u8)
            }
        }
        i += 1;
    }
    ans
}

/// Calls `parse_escaped_ascii` with `caps` set, as needed for file names
pub fn escaped_ascii_to_bytes(s: &str,inverted: bool) -> Vec<u8> {
    parse_escaped_ascii(s,inverted,true)
}

#[test]
fn test_escapes() {
    assert_eq!(parse_escaped_ascii("ab\\x07c",true,true),vec![0xc1,0xc2,0x07,0xc3]);
    assert_eq!(parse_escaped_ascii("\\x4",false,false),vec![0x5c,0x78,0x34]);
    assert_eq!(escaped_ascii_from_bytes(&[0xc1,0x8d,0xa0],true,true),"A\\x8D ");
    assert_eq!(escaped_ascii_from_bytes(&[0x41,0x0d],true,false),"A\\x0D");
}

#[test]
fn test_display_block() {
    let out = display_block(0x300,&[0xc1;18]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(),2);
    assert!(lines[0].starts_with("0300 : C1 C1"));
    assert!(lines[1].starts_with("0310 : C1 C1"));
    assert!(lines[1].ends_with("|-| AA"));
}
