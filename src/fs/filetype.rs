//! ### File type registry
//!
//! Numeric file type codes follow the ProDOS/SOS type byte in the range 00-FF.
//! Codes 100-102 extend the range to cover DOS 3.3 types that have no ProDOS equivalent.
//! Each code has a canonical name, possibly a 3 letter (ProDOS) and 1 letter (DOS 3.3)
//! abbreviation, and a description.  Reserved ranges get synthesized entries.
//!
//! The table is built once, on first use, and is never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use super::Error;

/// Largest code that is in the valid range
pub const MAX_CODE: u16 = 0x102;

/// A numeric file type code, see `registry` for names.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct Filetype(pub u16);

impl Filetype {
    pub const TYPELESS: Filetype = Filetype(0x00);
    pub const ASCII_TEXT: Filetype = Filetype(0x04);
    pub const BINARY: Filetype = Filetype(0x06);
    pub const DIRECTORY: Filetype = Filetype(0x0f);
    pub const INTEGER_BASIC: Filetype = Filetype(0xfa);
    pub const APPLESOFT_BASIC: Filetype = Filetype(0xfc);
    pub const RELOCATABLE: Filetype = Filetype(0xfe);
    pub const SYSTEM: Filetype = Filetype(0xff);
    pub const DOS_S: Filetype = Filetype(0x100);
    pub const DOS_NEW_A: Filetype = Filetype(0x101);
    pub const DOS_NEW_B: Filetype = Filetype(0x102);
}

impl fmt::Display for Filetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",registry().describe(*self))
    }
}

/// Name information for one code
#[derive(Debug,Clone)]
pub struct FiletypeInfo {
    pub code: Filetype,
    pub name: String,
    pub three_letter: &'static str,
    pub one_letter: &'static str,
    pub desc: String
}

impl FiletypeInfo {
    /// Description followed by all the aliases, e.g., `Binary file (Binary|BIN|B)`
    pub fn stringified(&self) -> String {
        let mut ans = format!("{} ({}",self.desc,self.name);
        if self.three_letter.len()>0 {
            ans += "|";
            ans += self.three_letter;
        }
        if self.one_letter.len()>0 {
            ans += "|";
            ans += self.one_letter;
        }
        ans + ")"
    }
}

/// (code, name, three letter, one letter, description)
const ASSIGNED: [(u16,&str,&str,&str,&str);38] = [
    (0x00,"Typeless","","","Typeless file"),
    (0x01,"BadBlocks","","","Bad blocks file"),
    (0x02,"SOSPascalCode","","","PASCAL code file"),
    (0x03,"SOSPascalText","","","PASCAL text file"),
    (0x04,"ASCIIText","TXT","T","ASCII text file"),
    (0x05,"SOSPascalText2","","","PASCAL text file"),
    (0x06,"Binary","BIN","B","Binary file"),
    (0x07,"Font","","","Font file"),
    (0x08,"GraphicsScreen","","","Graphics screen file"),
    (0x09,"BusinessBASIC","","","Business BASIC program file"),
    (0x0a,"BusinessBASICData","","","Business BASIC data file"),
    (0x0b,"SOSWordProcessor","","","Word processor file"),
    (0x0c,"SOSSystem","","","SOS system file"),
    (0x0f,"Directory","DIR","","Directory file"),
    (0x10,"RPSData","","","RPS data file"),
    (0x11,"RPSIndex","","","RPS index file"),
    (0x19,"AppleWorksDatabase","ADB","","AppleWorks data base file"),
    (0x1a,"AppleWorksWordProcessor","AWP","","AppleWorks word processing file"),
    (0x1b,"AppleWorksSpreadsheet","ASP","","AppleWorks spreadsheet file"),
    (0xef,"Pascal","PAS","","ProDOS PASCAL file"),
    (0xf0,"Command","CMD","","Added command file"),
    (0xf1,"UserDefinedF1","","","ProDOS user defined file type F1"),
    (0xf2,"UserDefinedF2","","","ProDOS user defined file type F2"),
    (0xf3,"UserDefinedF3","","","ProDOS user defined file type F3"),
    (0xf4,"UserDefinedF4","","","ProDOS user defined file type F4"),
    (0xf5,"UserDefinedF5","","","ProDOS user defined file type F5"),
    (0xf6,"UserDefinedF6","","","ProDOS user defined file type F6"),
    (0xf7,"UserDefinedF7","","","ProDOS user defined file type F7"),
    (0xf8,"UserDefinedF8","","","ProDOS user defined file type F8"),
    (0xfa,"IntegerBASIC","INT","I","Integer BASIC program file"),
    (0xfb,"IntegerBASICVariables","IVR","","Integer BASIC variables file"),
    (0xfc,"ApplesoftBASIC","BAS","A","Applesoft BASIC program file"),
    (0xfd,"ApplesoftBASICVariables","VAR","","Applesoft BASIC variables file"),
    (0xfe,"Relocatable","REL","R","EDASM relocatable object module file"),
    (0xff,"System","SYS","","System file"),
    // The DOS-only types share their one letter abbreviation with types above,
    // and since the first match wins, they are reached by name only (except S).
    (0x100,"DOSTypeS","","S","DOS 3.3 Type \"S\""),
    (0x101,"DOSTypeNewA","","A","DOS 3.3 Type \"new A\""),
    (0x102,"DOSTypeNewB","","B","DOS 3.3 Type \"new B\"")
];

/// The process wide file type table, see `registry()`
pub struct Registry {
    infos: Vec<FiletypeInfo>,
    by_code: HashMap<Filetype,usize>
}

impl Registry {
    fn build() -> Self {
        let mut infos: Vec<FiletypeInfo> = ASSIGNED.iter().map(|(code,name,three,one,desc)| FiletypeInfo {
            code: Filetype(*code),
            name: name.to_string(),
            three_letter: *three,
            one_letter: *one,
            desc: desc.to_string()
        }).collect();
        let sos_reserved = [0x0d,0x0e].into_iter().chain(0x12..0x19).chain(0x1c..0xc0);
        for code in sos_reserved {
            infos.push(FiletypeInfo {
                code: Filetype(code),
                name: format!("SOSReserved{:02X}",code),
                three_letter: "",
                one_letter: "",
                desc: format!("SOS reserved for future use {:02X}",code)
            });
        }
        for code in 0xc0..0xef {
            infos.push(FiletypeInfo {
                code: Filetype(code),
                name: format!("ProDOSReserved{:02X}",code),
                three_letter: "",
                one_letter: "",
                desc: format!("ProDOS reserved for future use {:02X}",code)
            });
        }
        let by_code = infos.iter().enumerate().map(|(i,info)| (info.code,i)).collect();
        Self { infos, by_code }
    }
    pub fn info(&self,code: Filetype) -> Option<&FiletypeInfo> {
        self.by_code.get(&code).map(|i| &self.infos[*i])
    }
    /// Canonical name of the code.  Never fails, unknown or invalid codes get a generated name.
    pub fn name_for(&self,code: Filetype) -> String {
        match (self.info(code),code.0) {
            (Some(info),_) => info.name.clone(),
            (None,c) if c <= MAX_CODE => format!("unknown type {:02X}",c),
            (None,c) => format!("invalid type {:02X}",c)
        }
    }
    /// Find the code using the canonical name, or the 3 letter or 1 letter abbreviation.
    /// The match is case sensitive, the first entry in the table that matches wins.
    pub fn code_for(&self,name: &str) -> Result<Filetype,Error> {
        for info in &self.infos {
            if info.name==name || info.three_letter==name || info.one_letter==name {
                return Ok(info.code);
            }
        }
        Err(Error::UnknownFiletype(name.to_string()))
    }
    /// Description with all aliases, suitable for display
    pub fn describe(&self,code: Filetype) -> String {
        match (self.info(code),code.0) {
            (Some(info),_) => info.stringified(),
            (None,c) if c <= MAX_CODE => format!("Unknown filetype {:02X}",c),
            (None,c) => format!("Invalid filetype {:02X}",c)
        }
    }
    /// Descriptive strings for every entry in table order
    pub fn names(&self) -> Vec<String> {
        self.infos.iter().map(|info| info.stringified()).collect()
    }
}

/// Get the registry, building it if this is the first use
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        let reg = registry();
        for info in &reg.infos {
            assert_eq!(reg.code_for(&reg.name_for(info.code)).expect("name not found"),info.code);
        }
    }

    #[test]
    fn abbreviations() {
        let reg = registry();
        assert_eq!(reg.code_for("TXT").unwrap(),Filetype::ASCII_TEXT);
        assert_eq!(reg.code_for("T").unwrap(),Filetype::ASCII_TEXT);
        assert_eq!(reg.code_for("B").unwrap(),Filetype::BINARY);
        assert_eq!(reg.code_for("A").unwrap(),Filetype::APPLESOFT_BASIC);
        assert_eq!(reg.code_for("S").unwrap(),Filetype::DOS_S);
        assert_eq!(reg.code_for("DOSTypeNewB").unwrap(),Filetype::DOS_NEW_B);
        assert_eq!(reg.code_for("INT").unwrap(),Filetype::INTEGER_BASIC);
        assert!(matches!(reg.code_for("int"),Err(Error::UnknownFiletype(_))));
        assert!(matches!(reg.code_for("XYZ"),Err(Error::UnknownFiletype(_))));
    }

    #[test]
    fn generated_names() {
        let reg = registry();
        assert_eq!(reg.name_for(Filetype(0x1c)),"SOSReserved1C");
        assert_eq!(reg.name_for(Filetype(0xc0)),"ProDOSReservedC0");
        assert_eq!(reg.name_for(Filetype(0xf9)),"unknown type F9");
        assert_eq!(reg.name_for(Filetype(0x200)),"invalid type 200");
    }

    #[test]
    fn descriptions() {
        assert_eq!(Filetype::BINARY.to_string(),"Binary file (Binary|BIN|B)");
        assert_eq!(Filetype::DIRECTORY.to_string(),"Directory file (Directory|DIR)");
        assert_eq!(Filetype(0xe0).to_string(),"ProDOS reserved for future use E0 (ProDOSReservedE0)");
        assert_eq!(Filetype(0xf9).to_string(),"Unknown filetype F9");
        let names = registry().names();
        assert_eq!(names.len(),38 + 2 + 7 + (0xc0-0x1c) + (0xef-0xc0));
        assert_eq!(names[0],"Typeless file (Typeless)");
    }
}
