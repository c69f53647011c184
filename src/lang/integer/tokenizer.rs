//! Module containing the Integer BASIC tokenizer
//!
//! A tokenized program is a sequence of line records:
//! `[len] [line number LE] [items...] [0x01]`, where `len` counts the whole record.
//! Items are tokens (below 0x80), numeric constants (a digit in negative ASCII followed by
//! a u16 LE), or variable names in negative ASCII.
//!
//! Each line is parsed with the Integer BASIC grammar and the syntax tree is walked.
//! Most tokens follow from the node kind.  The same glyph can have several token
//! codes though (there are three PRINTs and ten commas), so the walker also
//! tracks the statement context and settles those as it goes.

use std::collections::{BTreeMap,HashMap};
use tree_sitter;
use tree_sitter_integerbasic;
use log::{debug,error};
use super::token_maps;
use crate::lang;
use crate::lang::Visit;
use crate::DYNERR;

const EOL: u8 = 0x01;
const COLON: u8 = 0x03;
const THEN_LINE: u8 = 0x24;
const THEN_STATEMENT: u8 = 0x25;
const OPEN_QUOTE: u8 = 0x28;
const CLOSE_QUOTE: u8 = 0x29;
const STR_SUBSCRIPT: u8 = 0x2a;
const FCALL_OPEN: u8 = 0x3f;
const SCRN: u8 = 0x3d;
const DIM: u8 = 0x4f;
const INPUT_STR: u8 = 0x52;
const INPUT_PROMPT: u8 = 0x53;
const INPUT_NUM: u8 = 0x54;
const FOR: u8 = 0x55;
const REM_TOK: u8 = 0x5d;
const LET_TOK: u8 = 0x5e;
const PRINT_STR: u8 = 0x61;
const PRINT_NUM: u8 = 0x62;
const PRINT_NULL: u8 = 0x63;
const VLIN: u8 = 0x6c;
const CLOSE_PAREN: u8 = 0x72;

/// A line from a tokenized program along with its listing
#[derive(Debug,Clone,PartialEq)]
pub struct ProgramLine {
	pub number: u16,
	/// the whole record, including length byte and terminator
	pub bytes: Vec<u8>,
	/// the listing, e.g., `10 PRINT "HELLO"`
	pub text: String
}

#[derive(Clone,Copy,PartialEq,Debug)]
enum Kind {
	Num,
	Str
}

/// What was last put down, this separates unary from binary operators
#[derive(Clone,Copy,PartialEq,Debug)]
enum Last {
	Start,
	Operator,
	Name(Kind),
	Value(Kind)
}

/// An open parenthesis, `kind` is the value it yields once closed
struct Paren {
	code: u8,
	kind: Option<Kind>
}

/// Handles tokenization of Integer BASIC
pub struct Tokenizer
{
	line: String,
	src_line: usize,
	line_number: Option<u16>,
	tokenized_line: Vec<u8>,
	tok_map: HashMap<&'static str,u8>,
	detok_map: HashMap<u8,&'static str>,
	stmt: Option<u8>,
	stmt_at: usize,
	last: Last,
	parens: Vec<Paren>,
	/// token for the next `=` if it assigns
	assign: Option<u8>,
	/// PRINT separator that takes its trailing form unless an item follows
	sep_at: Option<usize>,
	/// THEN that becomes the line number form if a number follows
	then_at: Option<usize>,
	/// INPUT prompt is waiting for its comma
	prompt: bool,
	/// function token is waiting for its `(`
	fcall_open: bool,
	/// the `(` already went out with the function token
	swallow_open: bool,
	failure: Option<lang::Error>
}

impl lang::Visit for Tokenizer
{
	fn visit(&mut self,curs:&tree_sitter::TreeCursor) -> lang::WalkerChoice
	{
		let node = curs.node();
		let kind = node.kind();

		// Numbers to binary
		if kind=="linenum" && self.line_number.is_none() {
			let cleaned = self.text(node).replace(" ","");
			return match u16::from_str_radix(&cleaned,10) {
				Ok(num) => {
					self.line_number = Some(num);
					lang::WalkerChoice::GotoSibling
				},
				Err(_) => {
					error!("line number {} is out of range",cleaned);
					self.fail(lang::Error::LineNumber)
				}
			};
		}
		if kind=="linenum" || kind=="integer" {
			let cleaned = self.text(node).replace(" ","");
			return match u16::from_str_radix(&cleaned,10) {
				Ok(num) => {
					self.operand(Kind::Num,true);
					self.tokenized_line.push(cleaned.as_bytes()[0]+128);
					self.tokenized_line.extend_from_slice(&u16::to_le_bytes(num));
					self.last = Last::Value(Kind::Num);
					lang::WalkerChoice::GotoSibling
				},
				Err(_) => {
					debug!("{} is not a 16 bit integer",cleaned);
					self.fail(lang::Error::Syntax(self.src_line))
				}
			};
		}
		// Variables to upper case and negative ASCII
		if kind=="str_name" || kind=="int_name" {
			let cleaned = self.text(node).to_uppercase().replace(" ","");
			let neg: Vec<u8> = cleaned.as_bytes().iter().map(|b| {
				if *b==36 {
					64 // tokenize $
				} else {
					b+128
				}
			}).collect();
			self.name(if kind=="str_name" { Kind::Str } else { Kind::Num },neg);
			return lang::WalkerChoice::GotoSibling;
		}
		// Strings including tokenized quotes and escapes
		if kind=="string" {
			return self.string(node);
		}
		if kind.starts_with("statement_rem") {
			return self.remark(node);
		}
		// Tokens settled by the node kind
		if let Some(tok) = self.tok_map.get(kind) {
			let tok = *tok;
			let cleaned = self.text(node).to_uppercase().replace(" ","");
			return self.keyword(tok,&cleaned);
		}
		// Terminal nodes, the statement context decides
		if node.named_child_count()==0 {
			let cleaned = self.text(node).to_uppercase().replace(" ","");
			if cleaned.len()==0 {
				return lang::WalkerChoice::GotoSibling;
			}
			return self.context_token(node,&cleaned);
		}

		return lang::WalkerChoice::GotoChild;
	}
}

impl Tokenizer
{
	/// Create a new `Tokenizer` structure
	pub fn new() -> Self
	{
		Self {
			line: String::new(),
			src_line: 0,
			line_number: None,
			tokenized_line: Vec::new(),
			tok_map: HashMap::from(token_maps::TOK_MAP),
			detok_map: HashMap::from(token_maps::DETOK_MAP),
			stmt: None,
			stmt_at: 0,
			last: Last::Start,
			parens: Vec::new(),
			assign: None,
			sep_at: None,
			then_at: None,
			prompt: false,
			fcall_open: false,
			swallow_open: false,
			failure: None
		}
	}
	fn text(&self,node: tree_sitter::Node) -> String {
		match self.line.get(node.start_byte()..node.end_byte()) {
			Some(s) => String::from(s),
			None => String::new()
		}
	}
	fn fail(&mut self,e: lang::Error) -> lang::WalkerChoice {
		if self.failure.is_none() {
			self.failure = Some(e);
		}
		lang::WalkerChoice::Exit
	}
	fn new_statement(&mut self) {
		self.stmt = None;
		self.last = Last::Start;
		self.parens = Vec::new();
		self.assign = None;
		self.sep_at = None;
		self.then_at = None;
		self.prompt = false;
		self.fcall_open = false;
		self.swallow_open = false;
	}
	/// A trailing PRINT separator takes the form that ends the list
	fn end_list(&mut self) {
		if let Some(i) = self.sep_at.take() {
			self.tokenized_line[i] = match self.tokenized_line[i] {
				0x45 => 0x47,
				_ => 0x4a
			};
		}
	}
	/// An item is starting, settle the forms that were waiting on it
	fn operand(&mut self,kind: Kind,number: bool) {
		if let Some(i) = self.then_at.take() {
			if number {
				self.tokenized_line[i] = THEN_LINE;
				self.stmt = Some(THEN_LINE);
				self.stmt_at = i;
			}
		}
		self.sep_at = None;
		if self.stmt==Some(PRINT_NULL) && self.tokenized_line[self.stmt_at]==PRINT_NULL {
			self.tokenized_line[self.stmt_at] = match kind {
				Kind::Str => PRINT_STR,
				Kind::Num => PRINT_NUM
			};
		}
		if let Some(paren) = self.parens.last_mut() {
			if paren.kind.is_none() {
				paren.kind = Some(kind);
			}
		}
	}
	fn operator(&mut self,tok: u8) -> lang::WalkerChoice {
		self.then_at = None;
		self.tokenized_line.push(tok);
		self.last = Last::Operator;
		lang::WalkerChoice::GotoSibling
	}
	fn name(&mut self,kind: Kind,mut bytes: Vec<u8>) {
		let first = self.last==Last::Start;
		self.operand(kind,false);
		if first {
			match self.stmt {
				None | Some(LET_TOK) => {
					self.stmt = Some(LET_TOK);
					self.assign = Some(match kind {
						Kind::Str => 0x70,
						Kind::Num => 0x71
					});
				},
				Some(FOR) => self.assign = Some(0x56),
				Some(INPUT_NUM) if kind==Kind::Str && self.tokenized_line[self.stmt_at]==INPUT_NUM => {
					self.tokenized_line[self.stmt_at] = INPUT_STR;
				},
				_ => {}
			}
		}
		self.tokenized_line.append(&mut bytes);
		self.last = Last::Name(kind);
	}
	fn string(&mut self,node: tree_sitter::Node) -> lang::WalkerChoice {
		let txt = self.text(node);
		if txt.len()<2 || !txt.starts_with('"') || !txt.ends_with('"') {
			debug!("unterminated string {}",txt);
			return self.fail(lang::Error::Syntax(self.src_line));
		}
		let mut bytes = match lang::parse_literal(&txt[1..txt.len()-1]) {
			Some(b) => b,
			None => return self.fail(lang::Error::Syntax(self.src_line))
		};
		if self.last==Last::Start && self.stmt==Some(INPUT_NUM) {
			self.tokenized_line[self.stmt_at] = INPUT_PROMPT;
			self.prompt = true;
		}
		self.operand(Kind::Str,false);
		self.tokenized_line.push(OPEN_QUOTE);
		self.tokenized_line.append(&mut bytes);
		self.tokenized_line.push(CLOSE_QUOTE);
		self.last = Last::Value(Kind::Str);
		lang::WalkerChoice::GotoSibling
	}
	/// REM takes the rest of the line, one space after the keyword is dropped
	fn remark(&mut self,node: tree_sitter::Node) -> lang::WalkerChoice {
		let start = node.start_byte();
		let is_rem = match self.line.get(start..start+3) {
			Some(s) => s.eq_ignore_ascii_case("REM"),
			None => false
		};
		if !is_rem {
			return self.fail(lang::Error::Syntax(self.src_line));
		}
		let rest = self.line[start+3..].trim_end_matches(['\n','\r']);
		let rest = rest.strip_prefix(' ').unwrap_or(rest);
		match lang::parse_literal(rest) {
			Some(mut bytes) => {
				self.then_at = None;
				self.tokenized_line.push(REM_TOK);
				self.tokenized_line.append(&mut bytes);
				lang::WalkerChoice::Exit
			},
			None => self.fail(lang::Error::Syntax(self.src_line))
		}
	}
	fn open(&mut self,tok: u8,kind: Option<Kind>) -> lang::WalkerChoice {
		self.parens.push(Paren { code: tok, kind });
		self.operator(tok)
	}
	fn open_paren(&mut self) -> lang::WalkerChoice {
		if self.swallow_open {
			self.swallow_open = false;
			return lang::WalkerChoice::GotoSibling;
		}
		if self.fcall_open {
			self.fcall_open = false;
			return self.open(FCALL_OPEN,Some(Kind::Num));
		}
		match (self.last,self.stmt) {
			(Last::Name(Kind::Str),Some(DIM)) => self.open(0x22,Some(Kind::Num)),
			(Last::Name(Kind::Num),Some(DIM)) => self.open(0x34,Some(Kind::Num)),
			(Last::Name(Kind::Str),_) => self.open(STR_SUBSCRIPT,Some(Kind::Str)),
			(Last::Name(Kind::Num),_) => self.open(0x2d,Some(Kind::Num)),
			_ => self.open(0x38,None)
		}
	}
	fn close_paren(&mut self) -> lang::WalkerChoice {
		let kind = match self.parens.pop() {
			Some(paren) => paren.kind.unwrap_or(Kind::Num),
			None => return self.fail(lang::Error::Syntax(self.src_line))
		};
		if let Some(outer) = self.parens.last_mut() {
			if outer.kind.is_none() {
				outer.kind = Some(kind);
			}
		}
		self.operator(CLOSE_PAREN);
		self.last = Last::Value(kind);
		lang::WalkerChoice::GotoSibling
	}
	fn print_separator(&mut self,tok: u8) -> lang::WalkerChoice {
		if self.tokenized_line[self.stmt_at]==PRINT_NULL {
			self.tokenized_line[self.stmt_at] = PRINT_NUM;
		}
		self.end_list();
		self.sep_at = Some(self.tokenized_line.len());
		self.operator(tok)
	}
	fn comma(&mut self) -> lang::WalkerChoice {
		if let Some(code) = self.parens.last().map(|p| p.code) {
			return match code {
				STR_SUBSCRIPT => self.operator(0x23),
				SCRN => self.operator(0x3e),
				_ => self.fail(lang::Error::Syntax(self.src_line))
			};
		}
		match self.stmt {
			Some(PRINT_NULL) => self.print_separator(0x49),
			Some(INPUT_NUM) => {
				let tok = if self.prompt { 0x26 } else { 0x27 };
				self.prompt = false;
				self.operator(tok)
			},
			Some(stmt) => match token_maps::SEPARATORS.iter().find(|(s,_)| *s==stmt) {
				Some((_,sep)) => self.operator(*sep),
				None => self.fail(lang::Error::Syntax(self.src_line))
			},
			None => self.fail(lang::Error::Syntax(self.src_line))
		}
	}
	fn function(&mut self,tok: u8,text: &str) -> lang::WalkerChoice {
		self.operand(Kind::Num,false);
		if token_maps::FUNCTIONS.iter().any(|(_,t,own_paren)| *t==tok && *own_paren) {
			self.open(tok,Some(Kind::Num));
			self.swallow_open = !text.ends_with('(');
		} else {
			self.operator(tok);
			self.fcall_open = true;
		}
		lang::WalkerChoice::GotoSibling
	}
	/// Put down a keyword token and update the statement context
	fn keyword(&mut self,tok: u8,text: &str) -> lang::WalkerChoice {
		match tok {
			COLON => {
				self.end_list();
				self.tokenized_line.push(COLON);
				self.new_statement();
				lang::WalkerChoice::GotoSibling
			},
			THEN_STATEMENT => {
				self.tokenized_line.push(THEN_STATEMENT);
				self.new_statement();
				self.then_at = Some(self.tokenized_line.len()-1);
				lang::WalkerChoice::GotoSibling
			},
			0x2e..=0x32 | 0x3b..=0x3d => self.function(tok,text),
			0x22 | 0x34 => self.open(tok,Some(Kind::Num)),
			0x37 => {
				self.operand(Kind::Num,false);
				self.operator(tok)
			},
			0x57 | 0x58 | 0x6b | 0x6e => self.operator(tok),
			_ => {
				self.then_at = None;
				self.stmt = Some(tok);
				self.stmt_at = self.tokenized_line.len();
				self.tokenized_line.push(tok);
				self.last = Last::Start;
				lang::WalkerChoice::GotoSibling
			}
		}
	}
	/// Terminal node whose kind does not settle the token
	fn context_token(&mut self,node: tree_sitter::Node,text: &str) -> lang::WalkerChoice {
		let left_kind = match self.last {
			Last::Name(k) | Last::Value(k) => Some(k),
			_ => None
		};
		match text {
			"REM" => return self.remark(node),
			":" => return self.keyword(COLON,text),
			"(" => return self.open_paren(),
			")" => return self.close_paren(),
			"," => return self.comma(),
			";" if self.stmt==Some(PRINT_NULL) && self.parens.is_empty() => return self.print_separator(0x45),
			"=" if self.parens.is_empty() && self.assign.is_some() => {
				let tok = self.assign.take().unwrap_or(0x71);
				return self.operator(tok);
			},
			"+" | "-" if left_kind.is_none() => {
				self.operand(Kind::Num,false);
				return self.operator(if text=="+" { 0x35 } else { 0x36 });
			},
			"AT" => return self.keyword(if self.stmt==Some(VLIN) { 0x6e } else { 0x6b },text),
			_ => {}
		}
		for (glyph,num_tok,str_tok) in token_maps::BINARY_OPS {
			if text==glyph {
				return self.operator(match left_kind {
					Some(Kind::Str) => str_tok,
					_ => num_tok
				});
			}
		}
		for (name,tok,_) in token_maps::FUNCTIONS {
			if name.trim_end_matches('(')==text.trim_end_matches('(') {
				return self.function(tok,text);
			}
		}
		for (kw,tok) in token_maps::KEYWORDS {
			if kw==text {
				return self.keyword(tok,text);
			}
		}
		debug!("no token for `{}` in line {}",text,self.src_line);
		self.fail(lang::Error::Syntax(self.src_line))
	}
	/// Returns the line number and the complete record
	fn tokenize_line(&mut self,parser: &mut tree_sitter::Parser) -> Result<(u16,Vec<u8>),DYNERR> {
		self.tokenized_line = Vec::new();
		self.line_number = None;
		self.failure = None;
		self.new_statement();
		let tree = match parser.parse(&self.line,None) {
			Some(tree) => tree,
			None => return Err(Box::new(lang::Error::Syntax(self.src_line)))
		};
		if tree.root_node().has_error() {
			debug!("parser flagged line {}",self.src_line);
			return Err(Box::new(lang::Error::Syntax(self.src_line)));
		}
		self.walk(&tree);
		if let Some(e) = self.failure.take() {
			return Err(Box::new(e));
		}
		self.end_list();
		let num = match self.line_number {
			Some(num) if self.parens.is_empty() => num,
			_ => return Err(Box::new(lang::Error::Syntax(self.src_line)))
		};
		if self.tokenized_line.len() + 4 > 255 {
			error!("line {} is too long",num);
			return Err(Box::new(lang::Error::LineTooLong));
		}
		let mut record = vec![self.tokenized_line.len() as u8 + 4];
		record.extend_from_slice(&u16::to_le_bytes(num));
		record.append(&mut self.tokenized_line);
		record.push(EOL);
		Ok((num,record))
	}
	/// Tokenize a program contained in a UTF8 string, result is an array of bytes.
	/// Lines are put in order, if a line number repeats the last one wins.
	pub fn tokenize(&mut self,program: &str) -> Result<Vec<u8>,DYNERR> {
		let mut parser = tree_sitter::Parser::new();
		parser.set_language(&tree_sitter_integerbasic::LANGUAGE.into())?;
		let mut lines: BTreeMap<u16,Vec<u8>> = BTreeMap::new();
		for (idx,line) in program.lines().enumerate() {
			let line = line.trim_end_matches('\r');
			if line.trim().len()==0 {
				continue;
			}
			self.line = String::from(line) + "\n";
			self.src_line = idx + 1;
			let (num,record) = self.tokenize_line(&mut parser)?;
			if lines.insert(num,record).is_some() {
				debug!("line {} replaced",num);
			}
		}
		Ok(lines.into_values().flatten().collect())
	}
	fn append_token(code: &mut String,tok: &str) {
		let spaced = tok.len()>1 && tok.starts_with(|c: char| c.is_ascii_alphabetic());
		if spaced && !code.ends_with(' ') {
			*code += " ";
		}
		*code += tok;
		if spaced && !tok.ends_with('(') && !tok.ends_with('=') {
			*code += " ";
		}
	}
	fn line_to_string(&self,num: u16,items: &[u8]) -> Result<String,DYNERR> {
		let mut code = u16::to_string(&num) + " ";
		let mut idx = 0;
		while idx < items.len() {
			match items[idx] {
				OPEN_QUOTE => {
					let close = match items[idx+1..].iter().position(|b| *b==CLOSE_QUOTE) {
						Some(offset) => idx + 1 + offset,
						None => {
							error!("unterminated string in line {}",num);
							return Err(Box::new(lang::Error::MalformedProgram(format!("unterminated string in line {}",num))));
						}
					};
					code += "\"";
					code += &lang::render_literal(&items[idx+1..close],true);
					code += "\"";
					idx = close + 1;
				},
				REM_TOK => {
					if !code.ends_with(' ') {
						code += " ";
					}
					code += "REM ";
					code += &lang::render_literal(&items[idx+1..],false);
					idx = items.len();
				},
				EOL => {
					error!("early end of line {}",num);
					return Err(Box::new(lang::Error::MalformedProgram(format!("early end of line {}",num))));
				},
				tok if tok < 0x80 => {
					match self.detok_map.get(&tok) {
						Some(s) => Self::append_token(&mut code,s),
						None => {
							error!("unrecognized integer BASIC token encountered");
							return Err(Box::new(lang::Error::UnknownToken(tok)));
						}
					}
					idx += 1;
				},
				0xb0..=0xb9 => {
					// next 2 bytes are a binary number
					if idx + 2 >= items.len() {
						error!("line {} ended while processing integer",num);
						return Err(Box::new(lang::Error::MalformedProgram(format!("truncated number in line {}",num))));
					}
					code += &u16::to_string(&u16::from_le_bytes([items[idx+1],items[idx+2]]));
					idx += 3;
				},
				_ => {
					// this is a variable name
					while idx < items.len() && items[idx] >= 0x80 {
						code.push((items[idx] - 0x80) as char);
						idx += 1;
					}
				}
			}
		}
		Ok(code)
	}
	/// Split the tokenized program into lines, producing the listing of each.
	/// The program ends with the buffer, or with a record whose length is 0.
	pub fn decode(&self,img: &[u8]) -> Result<Vec<ProgramLine>,DYNERR> {
		let mut ans = Vec::new();
		let mut addr = 0;
		while addr < img.len() {
			let len = img[addr] as usize;
			if len==0 {
				break;
			}
			if len < 4 || addr + len > img.len() {
				error!("bad record length {} at offset {}",len,addr);
				return Err(Box::new(lang::Error::MalformedProgram(format!("bad record length at offset {}",addr))));
			}
			if img[addr+len-1]!=EOL {
				error!("record at offset {} is not terminated",addr);
				return Err(Box::new(lang::Error::MalformedProgram(format!("missing terminator at offset {}",addr))));
			}
			let number = u16::from_le_bytes([img[addr+1],img[addr+2]]);
			let text = self.line_to_string(number,&img[addr+3..addr+len-1])?;
			ans.push(ProgramLine {
				number,
				bytes: img[addr..addr+len].to_vec(),
				text
			});
			addr += len;
		}
		Ok(ans)
	}
	/// Detokenize from byte array into a UTF8 string, each line ends with a newline
	pub fn detokenize(&self,img: &[u8]) -> Result<String,DYNERR> {
		let mut code = String::new();
		for line in self.decode(img)? {
			code += &line.text;
			code += "\n";
		}
		Ok(code)
	}
}
