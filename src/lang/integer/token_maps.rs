// Integer BASIC token table.  Several codes share a glyph; the code that is
// used depends on the statement context (see `tokenizer`).
// Code 0x01 is the line terminator and has no glyph.  Codes 0x02, 0x2B, and 0x2C
// are never produced by the ROM's parser.
pub const DETOK_MAP: [(u8,&str);124] = [
	(0x00,"HIMEM:"),(0x03,":"),(0x04,"LOAD"),(0x05,"SAVE"),(0x06,"CON"),(0x07,"RUN"),
	(0x08,"RUN"),(0x09,"DEL"),(0x0a,","),(0x0b,"NEW"),(0x0c,"CLR"),(0x0d,"AUTO"),(0x0e,","),(0x0f,"MAN"),
	(0x10,"HIMEM:"),(0x11,"LOMEM:"),(0x12,"+"),(0x13,"-"),(0x14,"*"),(0x15,"/"),(0x16,"="),(0x17,"#"),
	(0x18,">="),(0x19,">"),(0x1a,"<="),(0x1b,"<>"),(0x1c,"<"),(0x1d,"AND"),(0x1e,"OR"),(0x1f,"MOD"),
	(0x20,"^"),(0x21,"+"),(0x22,"("),(0x23,","),(0x24,"THEN"),(0x25,"THEN"),(0x26,","),(0x27,","),
	(0x28,"\""),(0x29,"\""),(0x2a,"("),(0x2d,"("),(0x2e,"PEEK"),(0x2f,"RND"),
	(0x30,"SGN"),(0x31,"ABS"),(0x32,"PDL"),(0x33,"RNDX"),(0x34,"("),(0x35,"+"),(0x36,"-"),(0x37,"NOT"),
	(0x38,"("),(0x39,"="),(0x3a,"#"),(0x3b,"LEN("),(0x3c,"ASC("),(0x3d,"SCRN("),(0x3e,","),(0x3f,"("),
	(0x40,"$"),(0x41,"$"),(0x42,"("),(0x43,","),(0x44,","),(0x45,";"),(0x46,";"),(0x47,";"),
	(0x48,","),(0x49,","),(0x4a,","),(0x4b,"TEXT"),(0x4c,"GR"),(0x4d,"CALL"),(0x4e,"DIM"),(0x4f,"DIM"),
	(0x50,"TAB"),(0x51,"END"),(0x52,"INPUT"),(0x53,"INPUT"),(0x54,"INPUT"),(0x55,"FOR"),(0x56,"="),(0x57,"TO"),
	(0x58,"STEP"),(0x59,"NEXT"),(0x5a,","),(0x5b,"RETURN"),(0x5c,"GOSUB"),(0x5d,"REM"),(0x5e,"LET"),(0x5f,"GOTO"),
	(0x60,"IF"),(0x61,"PRINT"),(0x62,"PRINT"),(0x63,"PRINT"),(0x64,"POKE"),(0x65,","),(0x66,"COLOR="),(0x67,"PLOT"),
	(0x68,","),(0x69,"HLIN"),(0x6a,","),(0x6b,"AT"),(0x6c,"VLIN"),(0x6d,","),(0x6e,"AT"),(0x6f,"VTAB"),
	(0x70,"="),(0x71,"="),(0x72,")"),(0x73,")"),(0x74,"LIST"),(0x75,","),(0x76,"LIST"),(0x77,"POP"),
	(0x78,"NODSP"),(0x79,"NODSP"),(0x7a,"NOTRACE"),(0x7b,"DSP"),(0x7c,"DSP"),(0x7d,"TRACE"),(0x7e,"PR#"),(0x7f,"IN#")
];

// Grammar nodes whose kind alone settles the token.  Keywords with several codes
// (PRINT, INPUT, DIM, DSP, LIST, RUN) and the punctuation are chosen in context.
pub const TOK_MAP: [(&str,u8);46] = [
	("com_auto",0x0d),("com_clr",0x0c),("com_con",0x06),("com_del",0x09),("com_himem",0x10),("com_load",0x04),
	("com_lomem",0x11),("com_man",0x0f),("com_new",0x0b),("com_save",0x05),
	("fcall_abs",0x31),("fcall_ascp",0x3c),("fcall_lenp",0x3b),("fcall_pdl",0x32),("fcall_peek",0x2e),
	("fcall_rnd",0x2f),("fcall_scrnp",0x3d),("fcall_sgn",0x30),
	("open_dim_int",0x34),("open_dim_str",0x22),
	("statement_call",0x4d),("statement_coloreq",0x66),("statement_end",0x51),("statement_for",0x55),
	("statement_gosub",0x5c),("statement_goto",0x5f),("statement_gr",0x4c),("statement_hlin",0x69),
	("statement_if",0x60),("statement_inn",0x7f),("statement_let",0x5e),("statement_next",0x59),
	("statement_nodsp",0x78),("statement_notrace",0x7a),("statement_plot",0x67),("statement_poke",0x64),
	("statement_pop",0x77),("statement_prn",0x7e),("statement_return",0x5b),("statement_tab",0x50),
	("statement_text",0x4b),("statement_then",0x25),("statement_then_line",0x24),("statement_trace",0x7d),
	("statement_vlin",0x6c),("statement_vtab",0x6f)
];

/// Keyword text as it appears in a leaf (upper case, spaces removed) and its token.
/// PRINT and INPUT get their numeric forms here, the walker changes them once
/// the first item is seen.
pub const KEYWORDS: [(&str,u8);45] = [
	("LOAD",0x04),("SAVE",0x05),("CON",0x06),("RUN",0x07),("DEL",0x09),("NEW",0x0b),("CLR",0x0c),
	("AUTO",0x0d),("MAN",0x0f),("HIMEM:",0x10),("LOMEM:",0x11),("TEXT",0x4b),("GR",0x4c),("CALL",0x4d),
	("DIM",0x4f),("TAB",0x50),("END",0x51),("INPUT",0x54),("FOR",0x55),("TO",0x57),("STEP",0x58),
	("NEXT",0x59),("RETURN",0x5b),("GOSUB",0x5c),("LET",0x5e),("GOTO",0x5f),("IF",0x60),("THEN",0x25),
	("PRINT",0x63),("POKE",0x64),("COLOR=",0x66),("PLOT",0x67),("HLIN",0x69),("VLIN",0x6c),("VTAB",0x6f),
	("LIST",0x74),("POP",0x77),("NODSP",0x78),("NOTRACE",0x7a),("DSP",0x7b),("TRACE",0x7d),("PR#",0x7e),
	("IN#",0x7f),("NOT",0x37),("AT",0x6b)
];

/// Binary operators as (glyph, numeric code, string code)
pub const BINARY_OPS: [(&str,u8,u8);15] = [
	(">=",0x18,0x18),("<=",0x1a,0x1a),("<>",0x1b,0x1b),(">",0x19,0x19),("<",0x1c,0x1c),
	("=",0x16,0x39),("#",0x17,0x3a),("+",0x12,0x12),("-",0x13,0x13),("*",0x14,0x14),
	("/",0x15,0x15),("^",0x20,0x20),("AND",0x1d,0x1d),("OR",0x1e,0x1e),("MOD",0x1f,0x1f)
];

/// Functions as (name, token, whether the token carries its own parenthesis).
/// The others are followed by a separate `(` (code 0x3F).
pub const FUNCTIONS: [(&str,u8,bool);8] = [
	("PEEK",0x2e,false),("RND",0x2f,false),("SGN",0x30,false),("ABS",0x31,false),("PDL",0x32,false),
	("LEN(",0x3b,true),("ASC(",0x3c,true),("SCRN(",0x3d,true)
];

/// Statement token and the code its argument separator takes
pub const SEPARATORS: [(u8,u8);9] = [
	(0x09,0x0a),(0x0d,0x0e),(0x4f,0x43),(0x59,0x5a),(0x64,0x65),(0x67,0x68),(0x69,0x6a),(0x6c,0x6d),
	(0x74,0x75)
];
