//! # File System Module
//!
//! File system modules handle interactions with directories and files.
//! The only file system supported is DOS 3.3, in `dos3x`.
//!
//! The file system takes ownership of some disk image, which it uses as storage.
//! Sectors are addressed by DOS logical (track,sector) pairs.  Transformation of a sector
//! address to a position in the image file is handled within the `img` module.
//! Transformations that go between a file system and a disk, such as sector skews,
//! are kept in the `bios` module.

pub mod dos3x;
