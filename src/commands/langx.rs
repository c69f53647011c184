//! ## Language Transformations

use std::io::{Read,Write};
use log::error;
use super::CommandError;
use crate::lang::integer;
use crate::fs::filetype;
use crate::STDRESULT;

pub fn tokenize() -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        error!("line entry is not supported for `tokenize`, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut program = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut program) {
        error!("the file to tokenize could not be interpreted as a string");
        return Err(Box::new(e));
    }
    if program.len()==0 {
        error!("tokenize did not receive any data from previous node");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut tokenizer = integer::Tokenizer::new();
    let object = tokenizer.tokenize(&program)?;
    if atty::is(atty::Stream::Stdout) {
        print!("{}",crate::hex_dump(0,&object));
    } else {
        std::io::stdout().write_all(&object)?;
    }
    Ok(())
}

pub fn detokenize() -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        error!("line entry is not supported for `detokenize`, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut tok: Vec<u8> = Vec::new();
    std::io::stdin().read_to_end(&mut tok)?;
    if tok.len()==0 {
        error!("detokenize did not receive any data from previous node");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let tokenizer = integer::Tokenizer::new();
    let program = tokenizer.detokenize(&tok)?;
    for line in program.lines() {
        println!("{}",line);
    }
    Ok(())
}

pub fn filetypes() -> STDRESULT {
    for name in filetype::registry().names() {
        println!("{}",name);
    }
    Ok(())
}
