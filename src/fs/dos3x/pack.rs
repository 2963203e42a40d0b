//! File name conversions between host strings and DOS directory entries.

use super::types::*;

/// This will accept lower case; case will be automatically converted as appropriate
pub fn is_name_valid(s: &str) -> bool {
    for char in s.chars() {
        if !char.is_ascii() {
            log::debug!("non-ascii file name character `{}` (codepoint {})",char,char as u32);
            log::info!("use hex escapes to introduce arbitrary bytes");
            return false;
        }
    }
    if s.len()<1 {
        log::info!("file name is empty");
        return false;
    }
    if crate::escaped_ascii_to_bytes(s,true).len()>NAME_LEN {
        log::info!("file name too long, max {}",NAME_LEN);
        return false;
    }
    true
}

/// Name is negative ASCII padded to the end with negative spaces.
/// Non-printing bytes go out as hex escapes.
pub fn file_name_to_string(fname: [u8;30]) -> String {
    String::from(crate::escaped_ascii_from_bytes(&fname,true,true).trim_end())
}

pub fn string_to_file_name(s: &str) -> Result<[u8;30],Error> {
    if !is_name_valid(s) {
        return Err(Error::SyntaxError);
    }
    let mut ans: [u8;30] = [0xa0;30];
    let unescaped = crate::escaped_ascii_to_bytes(s,true);
    for i in 0..unescaped.len() {
        ans[i] = unescaped[i];
    }
    Ok(ans)
}

/// Make a legal DOS name out of a host file name: upper case, printable,
/// not starting below `@`, at most 30 characters.
pub fn suggested_filename(host_name: &str) -> String {
    let stem = match host_name.rsplit_once('.') {
        Some((stem,_ext)) if stem.len()>0 => stem,
        _ => host_name
    };
    let mut ans: String = stem.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c!=',')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match ans.chars().next() {
        Some(c) if c>='@' => {},
        _ => ans.insert(0,'A')
    }
    ans.truncate(NAME_LEN);
    ans
}
