use clap;
use crate::STDRESULT;
const RCH: &str = "unreachable was reached";

pub fn catalog(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let disk = crate::create_fs_from_file(img_path)?;
    print!("{}",disk.catalog_to_string()?);
    Ok(())
}

/// Volume statistics and file summaries as JSON
pub fn stat(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let disk = crate::create_fs_from_file(img_path)?;
    let vtoc = disk.read_vtoc()?;
    let mut files = json::JsonValue::new_array();
    for file in disk.list_files()? {
        files.push(json::object! {
            name: file.name.clone(),
            file_type: file.type_letter().to_string(),
            locked: file.locked,
            sectors: file.sectors
        })?;
    }
    let obj = json::object! {
        volume: vtoc.vol,
        tracks: vtoc.tracks,
        sectors: vtoc.sectors,
        total_sectors: disk.total_sector_count()?,
        free_sectors: disk.free_sector_count()?,
        used_sectors: disk.used_sector_count()?,
        files: files
    };
    let s = match cmd.get_one::<u16>("indent") {
        Some(spaces) => json::stringify_pretty(obj,*spaces),
        None => json::stringify(obj)
    };
    println!("{}",s);
    Ok(())
}
