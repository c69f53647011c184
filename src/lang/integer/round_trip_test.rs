// Listings produced by the detokenizer must tokenize back to the same bytes.

#[cfg(test)]
use super::tokenizer::Tokenizer;

/// source -> bytes -> listing -> bytes -> listing, both stages must agree
#[cfg(test)]
fn from_source(test_code: &str) {
	let mut tokenizer = Tokenizer::new();
	let bytes = tokenizer.tokenize(test_code).expect("tokenizer failed");
	let listing = tokenizer.detokenize(&bytes).expect("detokenizer failed");
	let bytes2 = tokenizer.tokenize(&listing).expect("listing did not tokenize");
	assert_eq!(hex::encode_upper(&bytes2),hex::encode_upper(&bytes),"listing was\n{}",listing);
	assert_eq!(tokenizer.detokenize(&bytes2).expect("detokenizer failed"),listing);
}

/// bytes -> listing -> bytes
#[cfg(test)]
fn from_tokens(hex_tokens: &str) {
	let bytes = hex::decode(hex_tokens).expect("hex error");
	let mut tokenizer = Tokenizer::new();
	let listing = tokenizer.detokenize(&bytes).expect("detokenizer failed");
	let bytes2 = tokenizer.tokenize(&listing).expect("listing did not tokenize");
	assert_eq!(hex::encode_upper(&bytes2),hex_tokens,"listing was\n{}",listing);
}

mod sources {
	#[test]
	fn output() {
		super::from_source("10 TEXT\n");
		super::from_source("10 TEXT\r\n20 PRINT \"HELLO\"\n");
		super::from_source("10 print a,B, ,C;d$;;;E$\n");
		super::from_source("80 PRINT \"«ctrl-D»CATALOG\"");
		super::from_source("10 PRINT \"A\\xA2B\"");
	}
	#[test]
	fn input() {
		super::from_source("10 PRINT \"PREFIX\": INPUT PR$\n");
		super::from_source("10 INPUT \"\",A$\n");
		super::from_source("10 INPUT X,Y\n");
	}
	#[test]
	fn expressions() {
		super::from_source("10 X = 1 + 1 \n");
		super::from_source("10 X = -1\n");
		super::from_source("10 X = - - 1\n");
		super::from_source("10 X = 6*(1 + (X1 + X2)*5)\n");
		super::from_source("10 COLOR = I/2*(I<32)\n");
		super::from_source("10 X = 6*(abs(X0) + (sgn(X1) + asc(A$))*5)\n");
		super::from_source("50 X1= RND (200)+150");
	}
	#[test]
	fn graphics() {
		super::from_source("10 gr: color=4\n20 X=5:Y=5\n30 plot X,Y\n40 hlin X+1,X+10 at Y\n50 vlin Y+1,Y+10 at X");
		super::from_source("10 C = SCRN(X,Y)");
	}
	#[test]
	fn control() {
		super::from_source("32 x = 32");
		super::from_source("10 gosub 1000: goto 100\n100 end\n1000 return");
		super::from_source("10 for i = 1 to LAST: print i: next I");
		super::from_source(" 1 0  if x > y then 1000\n20 if x < y then 1010\n30 if x <> y then 1020\n40 if x = y then 1030\n");
		super::from_source("1000 RETURN\n10 GOSUB 1000: GOTO 100\n100 END\n");
		super::from_source("170 IF A$=\"Y\" THEN CUR=RTPTR: GOTO 110");
	}
}

mod edge_bytes {
	#[test]
	fn quote_byte() {
		super::from_tokens("0A0A006128C1A2C22901");
		super::from_tokens("080A005DC1A2C201");
	}
	#[test]
	fn control_characters() {
		super::from_tokens("0B0A0061288AB18AB22901");
		super::from_tokens("0D0A005DA08A8AC1C1C18A8A01");
	}
	#[test]
	fn hex_escapes() {
		super::from_tokens("0C0A00612841DCF8B4B12901");
		super::from_tokens("0B0A006128FF80DCC12901");
	}
	#[test]
	fn dos_commands() {
		super::from_tokens("0800007EB00000011E01006303612884C2CCCFC1C4A0C4C1D4C1B1ACC1A4B4B0B0B029035101");
	}
	#[test]
	fn numbers_and_remarks() {
		super::from_tokens("100A004B034D36B9A803036FB3030001171800630350B31E00036128B1B6ADC6C5C2ADB7B929010F28005DB1B2B3BAD2C5CDB4B5B601");
	}
}
