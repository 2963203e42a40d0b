use clap;
use std::str::FromStr;
use log::{info,error};
use crate::fs::dos3x::{Disk,types::FormatConfig};
use crate::img::DiskImageType;
use crate::STDRESULT;
use super::CommandError;

const RCH: &str = "unreachable was reached";

pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    if std::path::Path::new(path_to_img).exists() {
        error!("refusing to overwrite {}",path_to_img);
        return Err(Box::new(CommandError::FileExists));
    }
    let img_typ = DiskImageType::from_str(cmd.get_one::<String>("type").expect(RCH))?;
    let mut cfg = FormatConfig::default();
    if let Some(vol) = cmd.get_one::<String>("volume") {
        cfg.volume = super::parse_number::<u8>(vol)?;
    }
    if let Some(tracks) = cmd.get_one::<u8>("tracks") {
        cfg.tracks_per_disk = *tracks;
    }
    if let Some(sectors) = cmd.get_one::<u8>("sectors") {
        cfg.sectors_per_track = *sectors;
    }
    let img = crate::create_img(img_typ,cfg.tracks_per_disk,cfg.sectors_per_track)?;
    let disk = Disk::format_img(img,&cfg)?;
    info!("writing {} image to {}",img_typ,path_to_img);
    crate::save_img(&disk,path_to_img)
}
