//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.
//! The library never touches paths or consoles, that is all done here.

pub mod mkdsk;
pub mod get;
pub mod put;
pub mod modify;
pub mod langx;

use std::path::Path;
use std::str::FromStr;
use log::{info,error};
use crate::bios::skew::SectorOrder;
use crate::operator::{DiskOperator,Format};
use crate::{STDRESULT,DYNERR};

const RCH: &str = "unreachable was reached";

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("File not found")]
    FileNotFound
}

/// Sector order requested on the command line, `None` means probe for it
pub fn get_order(cmd: &clap::ArgMatches) -> Result<Option<SectorOrder>,DYNERR> {
    match cmd.get_one::<String>("order") {
        Some(s) if s=="auto" => Ok(None),
        Some(s) => Ok(Some(SectorOrder::from_str(s)?)),
        None => Ok(None)
    }
}

/// File system requested on the command line
pub fn get_system(cmd: &clap::ArgMatches) -> Result<Format,DYNERR> {
    match cmd.get_one::<String>("system") {
        Some(s) => Ok(Format::from_str(s)?),
        None => Ok(Format::Auto)
    }
}

/// Read the image named by `--dimg` and mount it
pub fn open_img(cmd: &clap::ArgMatches) -> Result<DiskOperator,DYNERR> {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let buf = match std::fs::read(path_to_img) {
        Ok(buf) => buf,
        Err(e) => {
            error!("could not read {}",path_to_img);
            return Err(Box::new(e));
        }
    };
    let (op,order) = DiskOperator::open(&buf,get_order(cmd)?,get_system(cmd)?)?;
    info!("{} is {} in {} order",path_to_img,op.fs_name(),order);
    Ok(op)
}

/// Replace the image file with the operator's buffer.  A temporary file is written
/// in the same directory and then moved over the original.
pub fn save_img(op: &mut DiskOperator,img_path: &str) -> STDRESULT {
    let dir = match Path::new(img_path).parent() {
        Some(p) if p.as_os_str().len()>0 => p,
        _ => Path::new(".")
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    op.write_back(&mut tmp)?;
    tmp.persist(img_path)?;
    info!("saved {}",img_path);
    Ok(())
}
