use clap;
use std::io::Read;
use log::{info,error};
use super::CommandError;
use crate::fs::{filetype,Filetype,FileInfo};
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

/// Parse an address, decimal or hex with a `$` or `0x` prefix
fn parse_addr(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix('$').or(s.strip_prefix("0x")) {
        return u16::from_str_radix(hex,16).ok();
    }
    u16::from_str_radix(s,10).ok()
}

/// Read stdin and save it as a file in the image
pub fn put(cmd: &clap::ArgMatches) -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        error!("cannot use `put` with console input, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let typ: Filetype = filetype::registry().code_for(cmd.get_one::<String>("type").expect(RCH))?;
    let load_addr = match cmd.get_one::<String>("addr") {
        Some(s) => match parse_addr(s) {
            Some(a) => a,
            None => {
                error!("address must be a 16 bit number");
                return Err(Box::new(CommandError::OutOfRange));
            }
        },
        None => 768
    };
    let mut file_data = Vec::new();
    std::io::stdin().read_to_end(&mut file_data)?;
    let mut op = super::open_img(cmd)?;
    let mut file = FileInfo::new(name,typ,file_data);
    if typ==Filetype::BINARY {
        file = file.with_load_addr(load_addr);
    }
    let desc = op.put(&file,cmd.get_flag("overwrite"))?;
    info!("wrote {} using {} sectors",desc.name,desc.blocks);
    super::save_img(&mut op,path_to_img)
}

#[test]
fn addresses() {
    assert_eq!(parse_addr("768"),Some(768));
    assert_eq!(parse_addr("$300"),Some(768));
    assert_eq!(parse_addr("0x2000"),Some(0x2000));
    assert_eq!(parse_addr("70000"),None);
}
