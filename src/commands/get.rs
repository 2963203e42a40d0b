use clap;
use std::io::Write;
use std::str::FromStr;
use log::error;
use num_traits::FromPrimitive;
use super::{ItemType,CommandError};
use crate::fs::dos3x::types::{FileType,Encoder,BinaryData};
use crate::STDRESULT;
use a2kit_macro::DiskStruct;

const RCH: &str = "unreachable was reached";

fn output(start_addr: u16,dat: &[u8],console: bool) -> STDRESULT {
    if console {
        print!("{}",crate::display_block(start_addr,dat));
    } else {
        std::io::stdout().write_all(dat)?;
    }
    Ok(())
}

pub fn get(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let console = cmd.get_flag("console") || atty::is(atty::Stream::Stdout);
    let disk = crate::create_fs_from_file(img_path)?;
    let (code,dat) = disk.get_file(name)?;
    let typ = match cmd.get_one::<String>("type") {
        Some(s) => ItemType::from_str(s)?,
        None => match FileType::from_u8(code) {
            Some(FileType::Binary) => ItemType::Binary,
            Some(FileType::Text) => ItemType::Text,
            _ => ItemType::Raw
        }
    };
    match typ {
        ItemType::Binary => {
            let bin = BinaryData::from_bytes(&dat)?;
            output(bin.load_address(),&bin.data,console)
        },
        ItemType::Text => {
            let encoder = Encoder::new(vec![0x8d]);
            match encoder.decode(&dat) {
                Some(txt) => {
                    print!("{}",txt);
                    Ok(())
                },
                None => {
                    error!("could not decode data as DOS text");
                    Err(Box::new(CommandError::UnknownFormat))
                }
            }
        },
        ItemType::Raw => {
            let trimmed = match cmd.get_flag("trunc") {
                true => dat.split(|x| *x==0).next().unwrap_or(&[]),
                false => &dat[..]
            };
            output(0,trimmed,console)
        }
    }
}
