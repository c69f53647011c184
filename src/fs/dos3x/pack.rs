//! # DOS 3.3 names and payload framing
//!
//! Payloads are stored with a per-type header: INT and FP programs carry their length,
//! binaries carry the load address and length, text ends at the first null.
//! Other types are stored as whole sectors.

use a2kit_macro::DiskStruct;
use super::types::*;
use crate::DYNERR;

/// This will accept lower case; case will be automatically converted as appropriate
pub fn is_name_valid(s: &str) -> bool {
    let fname = match crate::parse_escaped_ascii(s,true) {
        Some(bytes) => bytes,
        None => {
            log::debug!("file name `{}` has characters that cannot be stored",s);
            log::info!("use hex escapes to introduce arbitrary bytes");
            return false;
        }
    };
    if fname.len()<1 {
        log::info!("file name is empty");
        return false;
    }
    if fname.len()>NAME_LEN {
        log::info!("file name too long, max 30");
        return false;
    }
    if !(fname[0] & 0x7f).is_ascii_alphabetic() {
        log::info!("file name must begin with a letter");
        return false;
    }
    if fname.contains(&(b',' | 0x80)) {
        log::info!("file name cannot contain a comma");
        return false;
    }
    true
}

pub fn file_name_to_string(fname: [u8;NAME_LEN]) -> String {
    // fname is negative ASCII padded to the end with spaces
    // non-ASCII will go as hex escapes
    String::from(crate::escaped_ascii_from_bytes(&fname).trim_end())
}

pub fn string_to_file_name(s: &str) -> Result<[u8;NAME_LEN],Error> {
    if !is_name_valid(s) {
        return Err(Error::Syntax);
    }
    lookup_name(s)
}

/// Convert a name for searching the catalog.  This is looser than `string_to_file_name`,
/// so that files named by other software can still be found.
pub fn lookup_name(s: &str) -> Result<[u8;NAME_LEN],Error> {
    let unescaped = crate::parse_escaped_ascii(s,true).ok_or(Error::Syntax)?;
    if unescaped.len()<1 || unescaped.len()>NAME_LEN {
        return Err(Error::Syntax);
    }
    let mut ans: [u8;NAME_LEN] = [0xa0;NAME_LEN];
    ans[0..unescaped.len()].copy_from_slice(&unescaped);
    Ok(ans)
}

/// Put the file system header on the payload
pub fn pack_payload(typ: FileType,dat: &[u8],load_addr: Option<u16>) -> Result<Vec<u8>,Error> {
    match typ {
        FileType::Integer | FileType::Applesoft => Ok(TokenizedProgram::pack(dat)?.to_bytes()),
        FileType::Binary => Ok(BinaryData::pack(dat,load_addr.unwrap_or(0))?.to_bytes()),
        FileType::Text => {
            if dat.contains(&0) {
                log::warn!("text file contains a null, it will be cut short when read back");
            }
            Ok(dat.to_vec())
        },
        _ => Ok(dat.to_vec())
    }
}

/// Strip the file system header from the sector data, returning the payload and load address, if any
pub fn unpack_payload(typ: FileType,raw: &[u8]) -> Result<(Vec<u8>,Option<u16>),DYNERR> {
    match typ {
        FileType::Integer | FileType::Applesoft => {
            let prog = TokenizedProgram::from_bytes(raw)?;
            Ok((prog.program,None))
        },
        FileType::Binary => {
            let bin = BinaryData::from_bytes(raw)?;
            Ok((bin.data,Some(u16::from_le_bytes(bin.start))))
        },
        FileType::Text => Ok((SequentialText::from_bytes(raw)?.text,None)),
        _ => Ok((raw.to_vec(),None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(is_name_valid("hello"));
        assert!(is_name_valid("A PROGRAM WITH SPACES"));
        assert!(!is_name_valid(""));
        assert!(!is_name_valid("1ST"));
        assert!(!is_name_valid("A,B"));
        assert!(!is_name_valid("ABCDEFGHIJABCDEFGHIJABCDEFGHIJK"));
        let fname = string_to_file_name("hello").expect("valid");
        assert_eq!(fname[0..6],[0xc8,0xc5,0xcc,0xcc,0xcf,0xa0]);
        assert_eq!(file_name_to_string(fname),"HELLO");
        let fname = string_to_file_name("X\\x84Y").expect("valid");
        assert_eq!(fname[0..3],[0xd8,0x84,0xd9]);
        assert_eq!(file_name_to_string(fname),"X\\x84Y");
    }

    #[test]
    fn framing() {
        let raw = pack_payload(FileType::Binary,&[1,2,3],Some(0x300)).expect("pack");
        assert_eq!(raw,vec![0x00,0x03,0x03,0x00,1,2,3]);
        let mut padded = raw.clone();
        padded.resize(256,0);
        assert_eq!(unpack_payload(FileType::Binary,&padded).expect("unpack"),(vec![1,2,3],Some(0x300)));
        let raw = pack_payload(FileType::Integer,&[5,6],None).expect("pack");
        assert_eq!(raw,vec![2,0,5,6]);
        assert_eq!(unpack_payload(FileType::Integer,&[2,0,5,6,0,0]).expect("unpack").0,vec![5,6]);
        assert_eq!(unpack_payload(FileType::Text,&[0xc1,0x8d,0,0]).expect("unpack").0,vec![0xc1,0x8d]);
        assert_eq!(unpack_payload(FileType::S,&[0,1,0]).expect("unpack").0,vec![0,1,0]);
    }

    #[test]
    fn too_large() {
        assert!(matches!(pack_payload(FileType::Binary,&vec![0;0x10000],None),Err(Error::Range)));
    }
}
