//! Token code constants.
//!
//! A token stream is a sequence of variable-length records. The first byte of
//! a record is its primary code; readers decide between one- and two-byte
//! codes by inspecting that byte (see [`is_two_byte_lead`]). Two-byte codes
//! pack the family in the high byte and the member in the low byte.

/// Terminates a line of tokens.
pub const T_EOL: u16 = 0x00;
/// Identifier; payload is a length byte followed by the name bytes.
pub const T_IDENT: u16 = 0x05;
/// String literal; payload is a length byte followed by the string bytes.
pub const T_STRLIT: u16 = 0x07;
/// Line number; payload is a 24-bit big-endian unsigned integer.
pub const T_LINENO: u16 = 0x08;
/// Numeric literal; payload is a type byte plus 1..=8 value bytes.
pub const T_NUMLIT: u16 = 0x09;
/// Jump label; payload is a length byte followed by the label bytes.
pub const T_LABEL: u16 = 0x0C;
/// Small byte integer; payload is one signed byte. Compact encoding for
/// decimal integers in `-128..=127`.
pub const T_SBI: u16 = 0x11;
/// Whitespace run. Never emitted by the tokenizer; reserved for editors.
pub const T_SPC: u16 = 0x20;

/// `!`
pub const T_PLING: u16 = 0x21;
/// `'`, also the comment token; payload is a length byte plus the comment.
pub const T_REM: u16 = 0x27;
/// `(`
pub const T_LPAREN: u16 = 0x28;
/// `)`
pub const T_RPAREN: u16 = 0x29;
/// `*`
pub const T_TIMES: u16 = 0x2A;
/// `+`
pub const T_PLUS: u16 = 0x2B;
/// `,`
pub const T_COMMA: u16 = 0x2C;
/// `-`
pub const T_MINUS: u16 = 0x2D;
/// `/`
pub const T_DIV: u16 = 0x2F;
/// `:`
pub const T_COLON: u16 = 0x3A;
/// `;`
pub const T_SEMIC: u16 = 0x3B;
/// `<`
pub const T_LT: u16 = 0x3C;
/// `=`
pub const T_EQ: u16 = 0x3D;
/// `>`
pub const T_GT: u16 = 0x3E;
/// `?`, shorthand for the PRINT statement.
pub const T_PRINT: u16 = 0x3F;
/// `[`
pub const T_LBRACK: u16 = 0x5B;
/// `]`
pub const T_RBRACK: u16 = 0x5D;
/// `{`
pub const T_LBRACE: u16 = 0x7B;
/// `|`
pub const T_PIPE: u16 = 0x7C;
/// `}`
pub const T_RBRACE: u16 = 0x7D;

/* STATEMENT KEYWORDS (family 0x03) */

/// `NOP`
pub const KW_NOP: u16 = 0x0300;
/// `END`
pub const KW_END: u16 = 0x0301;
/// `AGAIN`
pub const KW_AGAIN: u16 = 0x0302;
/// `LEAVE`
pub const KW_LEAVE: u16 = 0x0303;
/// `BREAK`
pub const KW_BREAK: u16 = 0x0304;
/// `ITERATE`
pub const KW_ITERATE: u16 = 0x0305;
/// `CONT`
pub const KW_CONT: u16 = 0x0306;
/// `STOP`
pub const KW_STOP: u16 = 0x0307;
/// `RESTORE`
pub const KW_RESTORE: u16 = 0x0308;
/// `READ`
pub const KW_READ: u16 = 0x0309;
/// `DATA`
pub const KW_DATA: u16 = 0x030A;
/// `FOR`
pub const KW_FOR: u16 = 0x030B;
/// `RETURN`
pub const KW_RETURN: u16 = 0x030C;
/// `GOSUB`
pub const KW_GOSUB: u16 = 0x030D;
/// `GOTO`
pub const KW_GOTO: u16 = 0x030E;
/// `RESET`
pub const KW_RESET: u16 = 0x030F;
/// `FORTH`
pub const KW_FORTH: u16 = 0x0310;
/// `SEND`
pub const KW_SEND: u16 = 0x0311;
/// `BIND`
pub const KW_BIND: u16 = 0x0312;
/// `BLOCK`
pub const KW_BLOCK: u16 = 0x0313;
/// `NONBLOCK`
pub const KW_NONBLOCK: u16 = 0x0314;
/// `LISTEN`
pub const KW_LISTEN: u16 = 0x0315;
/// `CONNECT`
pub const KW_CONNECT: u16 = 0x0316;
/// `OPEN`
pub const KW_OPEN: u16 = 0x0317;
/// `CLOSE`
pub const KW_CLOSE: u16 = 0x0318;
/// `INPUT`
pub const KW_INPUT: u16 = 0x0319;
/// `REWIND`
pub const KW_REWIND: u16 = 0x031A;
/// `SEEK`
pub const KW_SEEK: u16 = 0x031B;
/// `LET`
pub const KW_LET: u16 = 0x031C;
/// `IF`
pub const KW_IF: u16 = 0x031D;
/// `UNLESS`
pub const KW_UNLESS: u16 = 0x031E;
/// `NEW`
pub const KW_NEW: u16 = 0x031F;
/// `OLD`
pub const KW_OLD: u16 = 0x0320;
/// `SAVE`
pub const KW_SAVE: u16 = 0x0321;
/// `LOAD`
pub const KW_LOAD: u16 = 0x0322;
/// `DIR`
pub const KW_DIR: u16 = 0x0323;
/// `CHDIR`
pub const KW_CHDIR: u16 = 0x0324;
// 0x0325 reserved
/// `PUSHDIR`
pub const KW_PUSHDIR: u16 = 0x0326;
/// `POPDIR`
pub const KW_POPDIR: u16 = 0x0327;
/// `RUN`
pub const KW_RUN: u16 = 0x0328;
/// `LIST`
pub const KW_LIST: u16 = 0x0329;
/// `DELETE`
pub const KW_DELETE: u16 = 0x032A;
/// `RENUM`
pub const KW_RENUM: u16 = 0x032B;
/// `HELP`
pub const KW_HELP: u16 = 0x032C;
// 0x032D reserved
/// `QHELP`
pub const KW_QHELP: u16 = 0x032E;
/// `WHY`
pub const KW_WHY: u16 = 0x032F;
/// `CALL`
pub const KW_CALL: u16 = 0x0330;
/// `RESULT`
pub const KW_RESULT: u16 = 0x0331;
/// `OPTION`
pub const KW_OPTION: u16 = 0x0332;
/// `DEF`
pub const KW_DEF: u16 = 0x0333;
/// `DIM`
pub const KW_DIM: u16 = 0x0334;
/// `NEXT`
pub const KW_NEXT: u16 = 0x0335;
/// `CLR`
pub const KW_CLR: u16 = 0x0336;
/// `RANDOMIZE`
pub const KW_RANDOMIZE: u16 = 0x0337;
/// `DEG`
pub const KW_DEG: u16 = 0x0338;
/// `RAD`
pub const KW_RAD: u16 = 0x0339;
/// `WHILE`
pub const KW_WHILE: u16 = 0x033A;
/// `WEND`
pub const KW_WEND: u16 = 0x033B;
/// `REPEAT`
pub const KW_REPEAT: u16 = 0x033C;
/// `UNTIL`
pub const KW_UNTIL: u16 = 0x033D;
/// `FOREVER`
pub const KW_FOREVER: u16 = 0x033E;
/// `FOREACH`
pub const KW_FOREACH: u16 = 0x033F;
/// `WARRANTY`
pub const KW_WARRANTY: u16 = 0x0340;
/// `CONDITIONS`
pub const KW_CONDITIONS: u16 = 0x0341;
// 0x0342.. reserved

/* FUNCTION KEYWORDS (family 0x06) */

/// `ASC(`
pub const FN_ASC: u16 = 0x0600;
/// `VAL(`
pub const FN_VAL: u16 = 0x0601;
/// `STR$(`
pub const FN_STR_S: u16 = 0x0602;
/// `TI`
pub const FN_TI: u16 = 0x0603;
/// `TI$`
pub const FN_TI_S: u16 = 0x0604;
/// `LEFT$(`
pub const FN_LEFT_S: u16 = 0x0605;
/// `RIGHT$(`
pub const FN_RIGHT_S: u16 = 0x0606;
/// `MID$(`
pub const FN_MID_S: u16 = 0x0607;
/// `POS`
pub const FN_POS: u16 = 0x0608;
/// `HPOS`
pub const FN_HPOS: u16 = 0x0609;
/// `VPOS`
pub const FN_VPOS: u16 = 0x060A;
/// `BIN$(`
pub const FN_BIN_S: u16 = 0x060B;
/// `OCT$(`
pub const FN_OCT_S: u16 = 0x060C;
/// `DEC$(`
pub const FN_DEC_S: u16 = 0x060D;
/// `HEX$(`
pub const FN_HEX_S: u16 = 0x060E;
/// `CVI(`
pub const FN_CVI: u16 = 0x060F;
/// `CVF(`
pub const FN_CVF: u16 = 0x0610;
/// `MKI$(`
pub const FN_MKI_S: u16 = 0x0611;
/// `MKF$(`
pub const FN_MKF_S: u16 = 0x0612;
/// `WHERE$`
pub const FN_WHERE_S: u16 = 0x0613;
/// `IPV4$(`
pub const FN_IPV4_S: u16 = 0x0614;
/// `IPV6$(`
pub const FN_IPV6_S: u16 = 0x0615;
/// `HOSTNAME$`
pub const FN_HOSTNAME_S: u16 = 0x0616;
/// `DOMAIN$`
pub const FN_DOMAIN_S: u16 = 0x0617;
/// `RECV$(`
pub const FN_RECV_S: u16 = 0x0618;
/// `SOCKETV4`
pub const FN_SOCKETV4: u16 = 0x0619;
/// `SOCKETV6`
pub const FN_SOCKETV6: u16 = 0x061A;
/// `ACCEPT(`
pub const FN_ACCEPT: u16 = 0x061B;
/// `CWD$`
pub const FN_CWD_S: u16 = 0x061C;
/// `RND(`
pub const FN_RND: u16 = 0x061D;
/// `SIN(`
pub const FN_SIN: u16 = 0x061E;
/// `LN(`
pub const FN_LN: u16 = 0x061F;
/// `LOG(`
pub const FN_LOG: u16 = 0x0620;
/// `LOG2(`
pub const FN_LOG2: u16 = 0x0621;
/// `COS(`
pub const FN_COS: u16 = 0x0622;
/// `TAN(`
pub const FN_TAN: u16 = 0x0623;
/// `COT(`
pub const FN_COT: u16 = 0x0624;
/// `ATN(`
pub const FN_ATN: u16 = 0x0625;
/// `HEAD(`
pub const FN_HEAD: u16 = 0x0626;
/// `TAIL(`
pub const FN_TAIL: u16 = 0x0627;
/// `TRUE`
pub const FN_TRUE: u16 = 0x0628;
/// `FALSE`
pub const FN_FALSE: u16 = 0x0629;
/// `NIL`
pub const FN_NIL: u16 = 0x062A;
/// `NEXT(`
pub const FN_NEXT: u16 = 0x062B;
/// `PREV(`
pub const FN_PREV: u16 = 0x062C;
/// `CELLS(`
pub const FN_CELLS: u16 = 0x062D;

/* MODIFIER KEYWORDS (family 0x0B) */

/// `SUB`
pub const MD_SUB: u16 = 0x0B00;
/// `FUNC`
pub const MD_FUNC: u16 = 0x0B01;
/// `BASE`
pub const MD_BASE: u16 = 0x0B02;
/// `BYTEORDER`
pub const MD_BYTEORDER: u16 = 0x0B03;
/// `INT`
pub const MD_INT: u16 = 0x0B04;
/// `FLOAT`
pub const MD_FLOAT: u16 = 0x0B05;
/// `FIXED`
pub const MD_FIXED: u16 = 0x0B06;
/// `FN`
pub const MD_FN: u16 = 0x0B07;
/// `DYNAMIC`
pub const MD_DYNAMIC: u16 = 0x0B08;
/// `PTR`
pub const MD_PTR: u16 = 0x0B09;
/// `LINE`
pub const MD_LINE: u16 = 0x0B0A;
/// `IN`
pub const MD_IN: u16 = 0x0B0B;
/// `LABEL`
pub const MD_LABEL: u16 = 0x0B0C;
/// `THEN`
pub const MD_THEN: u16 = 0x0B0D;
/// `TO`
pub const MD_TO: u16 = 0x0B0E;
/// `DOWNTO`
pub const MD_DOWNTO: u16 = 0x0B0F;

/* OPERATOR KEYWORDS (family 0x0F) */

/// `<=`
pub const OP_LE: u16 = 0x0F00;
/// `>=`
pub const OP_GE: u16 = 0x0F01;
/// `<>`
pub const OP_NE: u16 = 0x0F02;
/// `AND`
pub const OP_AND: u16 = 0x0F03;
/// `OR`
pub const OP_OR: u16 = 0x0F04;
/// `XOR`
pub const OP_XOR: u16 = 0x0F05;
/// `NOT`
pub const OP_NOT: u16 = 0x0F06;
/// `NAND`
pub const OP_NAND: u16 = 0x0F07;
/// `NOR`
pub const OP_NOR: u16 = 0x0F08;
/// `XNOR`
pub const OP_XNOR: u16 = 0x0F09;
// 0x0F0A..=0x0F0F reserved
/// `EQV`
pub const OP_EQV: u16 = 0x0F10;
/// `NEQV`
pub const OP_NEQV: u16 = 0x0F11;
/// `SHL`
pub const OP_SHL: u16 = 0x0F12;
/// `SHR`
pub const OP_SHR: u16 = 0x0F13;
/// `**` / `^`
pub const OP_POW: u16 = 0x0F14;
/// `++`
pub const OP_INC: u16 = 0x0F15;
/// `--`
pub const OP_DEC: u16 = 0x0F16;

/// Keyword family classification, from the high byte of a two-byte code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[repr(u8)]
pub enum KeywordFamily {
    /// Statement keywords (`LIST`, `DIM`, ...).
    Statement = 0x03,
    /// Built-in function keywords (`ASC(`, `STR$(`, ...).
    Function = 0x06,
    /// Modifier keywords (`FN`, `DYNAMIC`, ...).
    Modifier = 0x0B,
    /// Operator keywords (`AND`, `SHL`, `<=`, ...).
    Operator = 0x0F,
}

impl KeywordFamily {
    /// Classify a two-byte token code by its high byte.
    pub const fn of(code: u16) -> Option<Self> {
        match code >> 8 {
            0x03 => Some(Self::Statement),
            0x06 => Some(Self::Function),
            0x0B => Some(Self::Modifier),
            0x0F => Some(Self::Operator),
            _ => None,
        }
    }
}

/// Whether `lead` is the high byte of a two-byte token. All other first bytes
/// begin a one-byte code (possibly with a payload).
pub const fn is_two_byte_lead(lead: u8) -> bool {
    matches!(lead, 0x03 | 0x06 | 0x0B | 0x0F | 0xFF)
}

/// Whether `code` is a built-in function keyword.
pub const fn is_function_keyword(code: u16) -> bool {
    code >> 8 == KeywordFamily::Function as u16
}

/// Whether `code` is a statement keyword.
pub const fn is_statement_keyword(code: u16) -> bool {
    code >> 8 == KeywordFamily::Statement as u16
}

/// Whether `code` is in the tokenizer error code space (`0xFFxx`).
pub const fn is_error_token(code: u16) -> bool {
    code >> 8 == 0xFF
}
