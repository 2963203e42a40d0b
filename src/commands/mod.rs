//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod mkdsk;
pub mod put;
pub mod get;
pub mod stat;
pub mod modify;
pub mod completions;

use std::str::FromStr;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Item type is unknown")]
    UnknownItemType,
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("Input source could not be interpreted")]
    UnknownFormat,
    #[error("File already exists")]
    FileExists
}

/// Ways of transforming file data on its way in or out of the disk image.
/// The DOS file type is chosen separately, except for binary and text.
#[derive(PartialEq,Clone,Copy,Debug)]
pub enum ItemType {
    /// data as stored in the data sectors
    Raw,
    /// data preceded by load address and length
    Binary,
    /// negative ASCII with CR line separators
    Text
}

impl FromStr for ItemType {
    type Err = CommandError;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "bin" => Ok(Self::Binary),
            "txt" => Ok(Self::Text),
            _ => Err(CommandError::UnknownItemType)
        }
    }
}

/// Parse an address or volume number, hex is accepted with a `$` or `0x` prefix
pub fn parse_number<T: num_traits::Num>(s: &str) -> Result<T,CommandError> {
    let res = match s {
        x if x.starts_with('$') => T::from_str_radix(&x[1..],16),
        x if x.starts_with("0x") => T::from_str_radix(&x[2..],16),
        x => T::from_str_radix(x,10)
    };
    res.map_err(|_| CommandError::OutOfRange)
}

#[test]
fn test_parse_number() {
    assert_eq!(parse_number::<u16>("768").unwrap(),768);
    assert_eq!(parse_number::<u16>("$300").unwrap(),768);
    assert_eq!(parse_number::<u16>("0x300").unwrap(),768);
    assert!(parse_number::<u8>("256").is_err());
    assert_eq!(ItemType::from_str("bin").unwrap(),ItemType::Binary);
    assert!(ItemType::from_str("atok").is_err());
}
