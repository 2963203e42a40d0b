use clap;
use std::io::Read;
use std::str::FromStr;
use log::{info,error};
use super::{ItemType,CommandError};
use crate::fs::dos3x::types::{FileType,Encoder,BinaryData};
use crate::fs::dos3x::pack;
use crate::STDRESULT;
use a2kit_macro::DiskStruct;

const RCH: &str = "unreachable was reached";

/// Get the bytes to put, from a host file if given, otherwise from stdin
fn read_input(maybe_host: Option<&String>) -> Result<Vec<u8>,Box<dyn std::error::Error>> {
    let mut file_data = Vec::new();
    match maybe_host {
        Some(host_path) => file_data = std::fs::read(host_path)?,
        None => {
            if atty::is(atty::Stream::Stdin) {
                error!("cannot use `put` with console input, please pipe something in");
                return Err(Box::new(CommandError::InvalidCommand));
            }
            std::io::stdin().read_to_end(&mut file_data)?;
        }
    }
    Ok(file_data)
}

pub fn put(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let maybe_host = cmd.get_one::<String>("input");
    let dest_name = match (cmd.get_one::<String>("file"),maybe_host) {
        (Some(name),_) => name.to_string(),
        (None,Some(host_path)) => {
            let host_name = std::path::Path::new(host_path).file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let suggestion = pack::suggested_filename(&host_name);
            info!("using name {}",suggestion);
            suggestion
        },
        (None,None) => {
            error!("a name is needed when the data is piped");
            return Err(Box::new(CommandError::InvalidCommand));
        }
    };
    let typ = match (cmd.get_one::<String>("type"),maybe_host) {
        (Some(s),_) => ItemType::from_str(s)?,
        (None,Some(host_path)) => match FileType::suggested(host_path) {
            FileType::Text => ItemType::Text,
            _ => ItemType::Binary
        },
        (None,None) => ItemType::Raw
    };
    let file_data = read_input(maybe_host)?;
    let mut disk = crate::create_fs_from_file(img_path)?;
    match typ {
        ItemType::Binary => {
            let load_address = match cmd.get_one::<String>("addr") {
                Some(a) => super::parse_number::<u16>(a)?,
                None => {
                    error!("binary file requires an address");
                    return Err(Box::new(CommandError::InvalidCommand));
                }
            };
            let bin = BinaryData::pack(&file_data,load_address)?;
            disk.put_file(&dest_name,FileType::Binary,&bin.to_bytes())?;
        },
        ItemType::Text => {
            let encoder = Encoder::new(vec![0x8d]);
            let encoded = match std::str::from_utf8(&file_data).ok().and_then(|s| encoder.encode(s)) {
                Some(dat) => dat,
                None => {
                    error!("could not encode data as DOS text");
                    return Err(Box::new(CommandError::UnknownFormat));
                }
            };
            disk.put_file(&dest_name,FileType::Text,&encoded)?;
        },
        ItemType::Raw => {
            let ftype = match cmd.get_one::<String>("ftype") {
                Some(s) => FileType::from_str(s)?,
                None => FileType::Text
            };
            disk.put_file(&dest_name,ftype,&file_data)?;
        }
    }
    crate::save_img(&disk,img_path)
}
