use clap;
use crate::STDRESULT;
const RCH: &str = "unreachable was reached";

pub fn delete(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(&path_to_img)?;
    disk.delete_file(&name)?;
    return crate::save_img(&disk,&path_to_img);
}

pub fn lock(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(&path_to_img)?;
    disk.lock(&name)?;
    return crate::save_img(&disk,&path_to_img);
}

pub fn unlock(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(&path_to_img)?;
    disk.unlock(&name)?;
    return crate::save_img(&disk,&path_to_img);
}

pub fn rename(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("name").expect(RCH);
    let old_name = cmd.get_one::<String>("file").expect(RCH);
    let mut disk = crate::create_fs_from_file(&path_to_img)?;
    disk.rename(&old_name,&name)?;
    return crate::save_img(&disk,&path_to_img);
}
