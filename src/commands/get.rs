use clap;
use std::io::Write;
use log::error;
use super::CommandError;
use crate::fs::Filetype;
use crate::lang::integer;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

/// Read a file from the image and write it to stdout.
/// The console gets a hex dump, a pipe gets the bytes.
pub fn get(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut op = super::open_img(cmd)?;
    let file = op.get(name)?;
    if cmd.get_flag("listing") {
        if file.descriptor.filetype!=Filetype::INTEGER_BASIC {
            error!("listing requires an Integer BASIC file, {} is {}",name,file.descriptor.filetype);
            return Err(Box::new(CommandError::InvalidCommand));
        }
        let tokenizer = integer::Tokenizer::new();
        let program = tokenizer.detokenize(&file.data)?;
        for line in program.lines() {
            println!("{}",line);
        }
        return Ok(());
    }
    if atty::is(atty::Stream::Stdout) {
        print!("{}",crate::hex_dump(file.load_addr.unwrap_or(0),&file.data));
    } else {
        std::io::stdout().write_all(&file.data)?;
    }
    Ok(())
}
