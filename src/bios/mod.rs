//! # BIOS module
//!
//! This module is a place for the middleware between the `fs` and `img` modules.
//! It is named in analogy with the CP/M concept of a BIOS as being (in part)
//! a layer between the BDOS and the physical disk.
//!
//! All the sector skewing tables are kept in this module.

pub mod skew;

#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("invalid sector address: track {0} sector {1}")]
    InvalidAddress(usize,usize),
    #[error("unknown sector order {0}")]
    InvalidOrder(String)
}
