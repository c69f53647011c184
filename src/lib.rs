//! # `a2fs` main library
//!
//! This library reads and writes files on Apple II floppy disk images,
//! and converts Integer BASIC programs between their tokenized and listed forms.
//!
//! ## Architecture
//!
//! Disk operations are layered as follows:
//! * `bios::skew` translates sector addresses between the physical, DOS, and ProDOS orderings
//! * `img::Dsk` owns the image buffer and performs every sector access through the translator
//! * `fs::DiskFS` imposes a file system on the image, implemented by `fs::dos3x` and `fs::prodos`
//! * `operator::DiskOperator` probes an image buffer, mounts the right file system, and writes back
//!
//! When a `DiskFS` object is created it takes ownership of the image.
//! Changes are not permanent until the operator hands the buffer to whatever
//! is hosting `a2fs` (see `DiskOperator::write_back`).
//!
//! ## File Systems
//!
//! * DOS 3.3, read and write
//! * ProDOS, read only, volume directory only
//!
//! ## Language Files
//!
//! * `lang::integer` handles (de)tokenization of Integer BASIC

pub mod bios;
pub mod img;
pub mod fs;
pub mod lang;
pub mod operator;
pub mod commands;

use std::fmt::Write;
use regex::Regex;

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Hex dump of binary data in columns of hex, +ascii, and -ascii
pub fn hex_dump(start_addr: u16,block: &[u8]) -> String {
    let mut ans = String::new();
    let mut slice_start = 0;
    while slice_start < block.len() {
        let slice_end = usize::min(slice_start + 16,block.len());
        let slice = &block[slice_start..slice_end];
        let txt: String = slice.iter().map(|c| match *c {
            x if x>=32 && x<127 => x as char,
            _ => '.'
        }).collect();
        let neg_txt: String = slice.iter().map(|c| match *c {
            x if x>=160 && x<255 => (x - 128) as char,
            _ => '.'
        }).collect();
        let _ = write!(ans,"{:04X} : ",start_addr as usize + slice_start);
        for byte in slice {
            let _ = write!(ans,"{:02X} ",byte);
        }
        let pad = slice_start + 16 - slice_end;
        let _ = writeln!(ans,"{}|+| {}{} |-| {}","   ".repeat(pad),txt," ".repeat(pad),neg_txt);
        slice_start = slice_end;
    }
    return ans;
}

/// Render negative ASCII bytes, such as a DOS file name, as a string.
/// Bytes that have no printable form become hex escapes, e.g., `\x8D`.
/// A backslash that would be mistaken for an escape is itself escaped.
pub fn escaped_ascii_from_bytes(bytes: &[u8]) -> String {
    let mut result = String::new();
    for i in 0..bytes.len() {
        let c = bytes[i];
        let looks_like_escape = c==0xdc && i+3<bytes.len() && bytes[i+1]==0xf8
            && (bytes[i+2] & 0x7f).is_ascii_hexdigit() && (bytes[i+3] & 0x7f).is_ascii_hexdigit();
        if c>=0xa0 && c<0xff && !looks_like_escape {
            result.push((c - 0x80) as char);
        } else {
            let _ = write!(result,"\\x{:02X}",c);
        }
    }
    return result;
}

/// Interpret a string as pure ASCII and produce negative ASCII bytes.
/// Arbitrary bytes can be introduced using escapes, e.g., `\xFF`, which are taken literally.
/// If `caps` is true the non-escaped characters are put in upper case.
/// Returns `None` if there is a character that cannot be represented.
pub fn parse_escaped_ascii(s: &str,caps: bool) -> Option<Vec<u8>> {
    let hex_patt = Regex::new(r"^\\x[0-9A-Fa-f]{2}").expect("unreachable");
    let mut ans: Vec<u8> = Vec::new();
    let mut curs = 0;
    while curs < s.len() {
        if let Some(m) = hex_patt.find(&s[curs..]) {
            ans.append(&mut hex::decode(&m.as_str()[2..4]).ok()?);
            curs += m.end();
            continue;
        }
        let c = s[curs..].chars().next()?;
        if !c.is_ascii() || c.is_ascii_control() {
            return None;
        }
        let c = match caps {
            true => c.to_ascii_uppercase(),
            false => c
        };
        ans.push(c as u8 + 0x80);
        curs += 1;
    }
    return Some(ans);
}
