//! # Language Module
//!
//! Language specific operations such as tokenization are in the submodules.
//! This module holds the errors, the tree walker, and the rendering of literal text
//! (strings and remarks), which are common to the tokenized BASIC dialects.

pub mod integer;

use std::fmt::Write;
use regex::Regex;
use thiserror::Error;

pub enum WalkerChoice {
    GotoChild,
    GotoSibling,
    GotoParentSibling,
    Exit
}

#[derive(Error,Debug)]
pub enum Error {
    #[error("malformed program: {0}")]
    MalformedProgram(String),
    #[error("unknown token {0:#04x}")]
    UnknownToken(u8),
    #[error("syntax error in line {0}")]
    Syntax(usize),
    #[error("invalid line number")]
    LineNumber,
    #[error("line too long")]
    LineTooLong
}

/// Walks a syntax tree, calling `visit` on each node reached.
/// The visitor steers the walk with its return value.
pub trait Visit {
    fn visit(&mut self,curs: &tree_sitter::TreeCursor) -> WalkerChoice;
    fn walk(&mut self,tree: &tree_sitter::Tree)
    {
        let mut curs = tree.walk();
        let mut choice = WalkerChoice::GotoChild;
        while ! matches!(choice,WalkerChoice::Exit)
        {
            if matches!(choice,WalkerChoice::GotoChild) && curs.goto_first_child() {
                choice = self.visit(&curs);
            } else if matches!(choice,WalkerChoice::GotoParentSibling) && curs.goto_parent() && curs.goto_next_sibling() {
                choice = self.visit(&curs);
            } else if matches!(choice,WalkerChoice::GotoSibling) && curs.goto_next_sibling() {
                choice = self.visit(&curs);
            } else if curs.goto_next_sibling() {
                choice = self.visit(&curs);
            } else if curs.goto_parent() {
                choice = WalkerChoice::GotoSibling;
            } else {
                choice = WalkerChoice::Exit;
            }
        }
    }
}

/// Render the bytes of a string or remark, which are negative ASCII.
/// Control characters `0x80..0x9F` are shown as `«ctrl-X»`, other bytes with no
/// printable form become hex escapes.  A backslash that would be mistaken for
/// an escape is itself escaped.  Inside a string (`quoted`) the quote byte is
/// escaped as well, otherwise it would end the string when the listing is read back.
pub fn render_literal(bytes: &[u8],quoted: bool) -> String {
    let mut ans = String::new();
    for i in 0..bytes.len() {
        let c = bytes[i];
        let looks_like_escape = c==0xdc && i+3<bytes.len() && bytes[i+1]==0xf8
            && (bytes[i+2] & 0x7f).is_ascii_hexdigit() && (bytes[i+3] & 0x7f).is_ascii_hexdigit();
        match c {
            0x80..=0x9f => {
                let _ = write!(ans,"«ctrl-{}»",(c - 0x40) as char);
            },
            0xa2 if quoted => ans.push_str("\\xA2"),
            0xa0..=0xfe if !looks_like_escape => ans.push((c - 0x80) as char),
            _ => {
                let _ = write!(ans,"\\x{:02X}",c);
            }
        }
    }
    return ans;
}

/// Inverse of `render_literal`.  Case is preserved.
/// Returns `None` if there is a character that cannot be represented.
pub fn parse_literal(s: &str) -> Option<Vec<u8>> {
    let hex_patt = Regex::new(r"^\\x[0-9A-Fa-f]{2}").expect("unreachable");
    let ctrl_patt = Regex::new(r"^«ctrl-([@-_a-z])»").expect("unreachable");
    let mut ans: Vec<u8> = Vec::new();
    let mut curs = 0;
    while curs < s.len() {
        if let Some(m) = hex_patt.find(&s[curs..]) {
            ans.push(u8::from_str_radix(&m.as_str()[2..4],16).ok()?);
            curs += m.end();
            continue;
        }
        if let Some(caps) = ctrl_patt.captures(&s[curs..]) {
            let x = caps.get(1)?.as_str().as_bytes()[0].to_ascii_uppercase();
            ans.push(x - 0x40 + 0x80);
            curs += caps.get(0)?.end();
            continue;
        }
        let c = s[curs..].chars().next()?;
        if !c.is_ascii() || c.is_ascii_control() {
            return None;
        }
        ans.push(c as u8 + 0x80);
        curs += 1;
    }
    return Some(ans);
}
