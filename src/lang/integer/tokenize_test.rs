// Expected hex was captured from the memory of an emulated Apple II after typing
// in each program, by dumping the bytes from PRGST ($CA) to PRGEND ($4C).

#[cfg(test)]
use super::tokenizer::Tokenizer;
#[cfg(test)]
use crate::lang;

#[cfg(test)]
fn test_tokenizer(test_code: &str,expected: &str) {
	let mut tokenizer = Tokenizer::new();
	let bytes = tokenizer.tokenize(test_code).expect("tokenizer failed");
	assert_eq!(hex::encode_upper(bytes),expected);
}

#[cfg(test)]
fn tokenizer_error(test_code: &str) -> lang::Error {
	let mut tokenizer = Tokenizer::new();
	let err = tokenizer.tokenize(test_code).expect_err("tokenizer should fail");
	*err.downcast::<lang::Error>().expect("wrong error type")
}

mod output_tests {
	#[test]
	fn single_line() {
		let test_code = "10 TEXT\n";
		let expected = "050A004B01";
		super::test_tokenizer(test_code,expected);
	}
	#[test]
	fn multi_line() {
		let test_code = "10 TEXT\r\n20 PRINT \"HELLO\"\n";
		let expected = "050A004B010C14006128C8C5CCCCCF2901";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn print_with_nulls() {
		let test_code = "10 print a,B, ,C;d$;;;E$\n";
		let expected = "130A0062C149C24A49C345C440474745C54001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn control_characters() {
		let test_code = "80 PRINT \"«ctrl-D»CATALOG\"";
		let expected = "0F5000612884C3C1D4C1CCCFC72901";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn escaped_quote() {
		let test_code = "10 PRINT \"A\\xA2B\"";
		let expected = "0A0A006128C1A2C22901";
		super::test_tokenizer(test_code, expected);
	}
}

mod input_statements {
	#[test]
	fn quote_parity() {
		let test_code = "10 PRINT \"PREFIX\": INPUT PR$\n";
		let expected = "120A006128D0D2C5C6C9D8290352D0D24001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn input_null_prompt() {
		let test_code = "10 INPUT \"\",A$\n";
		let expected = "0A0A0053282926C14001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn numeric_list() {
		let test_code = "10 INPUT X,Y\n";
		let expected = "080A0054D827D901";
		super::test_tokenizer(test_code, expected);
	}
}

mod expression_tests {
	#[test]
	fn simple() {
		let test_code = "10 X = 1 + 1 \n";
		let expected = "0D0A00D871B1010012B1010001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn negative_numbers() {
		let test_code = "10 X = -1\n";
		let expected = "0A0A00D87136B1010001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn double_negative() {
		let test_code = "10 X = - - 1\n";
		let expected = "0B0A00D8713636B1010001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn nested() {
		let test_code = "10 X = 6*(1 + (X1 + X2)*5)\n";
		let expected = "1B0A00D871B606001438B101001238D8B112D8B27214B505007201";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn logic_values() {
		let test_code = "10 COLOR = I/2*(I<32)\n";
		let expected = "120A0066C915B202001438C91CB320007201";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn with_functions() {
		let test_code = "10 X = 6*(abs(X0) + (sgn(X1) + asc(A$))*5)\n";
		let expected = "220A00D871B606001438313FD8B0721238303FD8B172123CC140727214B505007201";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn random() {
		let test_code = "50 X1= RND (200)+150";
		let expected = "113200D8B1712F3FB2C8007212B1960001";
		super::test_tokenizer(test_code, expected);
	}
}

mod graphics_tests {
	#[test]
	fn low_res_statements() {
		let test_code = "10 gr: color=4\n20 X=5:Y=5\n30 plot X,Y\n40 hlin X+1,X+10 at Y\n50 vlin Y+1,Y+10 at X";
		let expected = "0A0A004C0366B40400010F1400D871B5050003D971B5050001081E0067D868D90112280069D812B101006AD812B10A006BD9011232006CD912B101006DD912B10A006ED801";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn low_res_functions() {
		let test_code = "10 C = SCRN(X,Y)";
		let expected = "0B0A00C3713DD83ED97201";
		super::test_tokenizer(test_code, expected);
	}
}

mod control_tests {
	#[test]
	fn binary_ascii_collisions() {
		let test_code = "32 x = 32";
		let expected = "092000D871B3200001";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn goto_gosub_end_return() {
		let test_code = "10 gosub 1000: goto 100\n100 end\n1000 return";
		let expected = "0D0A005CB1E803035FB1640001056400510105E8035B01";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn loop_() {
		let test_code = "10 for i = 1 to LAST: print i: next I";
		let expected = "150A0055C956B1010057CCC1D3D40362C90359C901";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn if_then() {
		let mut test_string = " 1 0  if x > y then 1000\n".to_string();
		test_string += "20 if x < y then 1010\n";
		test_string += "30 if x <> y then 1020\n";
		test_string += "40 if x = y then 1030\n";
		let expected = "0C0A0060D819D924B1E803010C140060D81CD924B1F203010C1E0060D81BD924B1FC03010C280060D816D924B1060401";
		super::test_tokenizer(&test_string, expected);
	}
	#[test]
	fn lines_are_sorted() {
		let test_code = "1000 RETURN\n10 GOSUB 1000: GOTO 100\n100 END\n";
		let expected = "0D0A005CB1E803035FB1640001056400510105E8035B01";
		super::test_tokenizer(test_code, expected);
	}
	#[test]
	fn string_conditions() {
		let test_code = "170 IF A$=\"Y\" THEN CUR=RTPTR: GOTO 110";
		let expected = "1AAA0060C1403928D92925C3D5D271D2D4D0D4D2035FB16E0001";
		super::test_tokenizer(test_code, expected);
	}
}

mod errors {
	use crate::lang::Error;
	#[test]
	fn bad_line_number() {
		assert!(matches!(super::tokenizer_error("70000 END"),Error::LineNumber));
	}
	#[test]
	fn missing_line_number() {
		assert!(matches!(super::tokenizer_error("10 END\nPRINT"),Error::Syntax(2)));
	}
	#[test]
	fn unbalanced() {
		assert!(matches!(super::tokenizer_error("10 X=(1+2"),Error::Syntax(1)));
		assert!(matches!(super::tokenizer_error("10 PRINT \"HELLO"),Error::Syntax(1)));
	}
	#[test]
	fn number_too_large() {
		assert!(matches!(super::tokenizer_error("10 X=65536"),Error::Syntax(1)));
	}
	#[test]
	fn line_too_long() {
		let code = format!("10 REM {}","A".repeat(260));
		assert!(matches!(super::tokenizer_error(&code),Error::LineTooLong));
	}
}
