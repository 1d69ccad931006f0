//! The static keyword table.
//!
//! Keyword texts are stored the way the user types them: function keywords
//! carry their sigils (`STR$(`, `TI$`), so the tokenizer's identifier path,
//! which folds a trailing `$`/`%` and `(` into the lookup key, hits them
//! directly. `PRINT` and `REM` appear with their single-byte codes so the
//! word forms tokenize and the detokenizer can print them.

use crate::token::*;

/// One keyword table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordDef {
    /// Canonical source text, uppercase, including sigils.
    pub text: &'static str,
    /// Token code the text maps to.
    pub code: u16,
}

const fn kw(text: &'static str, code: u16) -> KeywordDef {
    KeywordDef { text, code }
}

/// Every predefined keyword, operator text included.
pub const KEYWORDS: &[KeywordDef] = &[
    // statements
    kw("NOP", KW_NOP),
    kw("END", KW_END),
    kw("AGAIN", KW_AGAIN),
    kw("LEAVE", KW_LEAVE),
    kw("BREAK", KW_BREAK),
    kw("ITERATE", KW_ITERATE),
    kw("CONT", KW_CONT),
    kw("STOP", KW_STOP),
    kw("RESTORE", KW_RESTORE),
    kw("READ", KW_READ),
    kw("DATA", KW_DATA),
    kw("FOR", KW_FOR),
    kw("RETURN", KW_RETURN),
    kw("GOSUB", KW_GOSUB),
    kw("GOTO", KW_GOTO),
    kw("RESET", KW_RESET),
    kw("FORTH", KW_FORTH),
    kw("SEND", KW_SEND),
    kw("BIND", KW_BIND),
    kw("BLOCK", KW_BLOCK),
    kw("NONBLOCK", KW_NONBLOCK),
    kw("LISTEN", KW_LISTEN),
    kw("CONNECT", KW_CONNECT),
    kw("OPEN", KW_OPEN),
    kw("CLOSE", KW_CLOSE),
    kw("INPUT", KW_INPUT),
    kw("REWIND", KW_REWIND),
    kw("SEEK", KW_SEEK),
    kw("LET", KW_LET),
    kw("IF", KW_IF),
    kw("UNLESS", KW_UNLESS),
    kw("NEW", KW_NEW),
    kw("OLD", KW_OLD),
    kw("SAVE", KW_SAVE),
    kw("LOAD", KW_LOAD),
    kw("DIR", KW_DIR),
    kw("CHDIR", KW_CHDIR),
    kw("PUSHDIR", KW_PUSHDIR),
    kw("POPDIR", KW_POPDIR),
    kw("RUN", KW_RUN),
    kw("LIST", KW_LIST),
    kw("DELETE", KW_DELETE),
    kw("RENUM", KW_RENUM),
    kw("HELP", KW_HELP),
    kw("QHELP", KW_QHELP),
    kw("WHY", KW_WHY),
    kw("CALL", KW_CALL),
    kw("RESULT", KW_RESULT),
    kw("OPTION", KW_OPTION),
    kw("DEF", KW_DEF),
    kw("DIM", KW_DIM),
    kw("NEXT", KW_NEXT),
    kw("CLR", KW_CLR),
    kw("RANDOMIZE", KW_RANDOMIZE),
    kw("DEG", KW_DEG),
    kw("RAD", KW_RAD),
    kw("WHILE", KW_WHILE),
    kw("WEND", KW_WEND),
    kw("REPEAT", KW_REPEAT),
    kw("UNTIL", KW_UNTIL),
    kw("FOREVER", KW_FOREVER),
    kw("FOREACH", KW_FOREACH),
    kw("WARRANTY", KW_WARRANTY),
    kw("CONDITIONS", KW_CONDITIONS),
    // built-in functions
    kw("ASC(", FN_ASC),
    kw("VAL(", FN_VAL),
    kw("STR$(", FN_STR_S),
    kw("TI", FN_TI),
    kw("TI$", FN_TI_S),
    kw("LEFT$(", FN_LEFT_S),
    kw("RIGHT$(", FN_RIGHT_S),
    kw("MID$(", FN_MID_S),
    kw("POS", FN_POS),
    kw("HPOS", FN_HPOS),
    kw("VPOS", FN_VPOS),
    kw("BIN$(", FN_BIN_S),
    kw("OCT$(", FN_OCT_S),
    kw("DEC$(", FN_DEC_S),
    kw("HEX$(", FN_HEX_S),
    kw("CVI(", FN_CVI),
    kw("CVF(", FN_CVF),
    kw("MKI$(", FN_MKI_S),
    kw("MKF$(", FN_MKF_S),
    kw("WHERE$", FN_WHERE_S),
    kw("IPV4$(", FN_IPV4_S),
    kw("IPV6$(", FN_IPV6_S),
    kw("HOSTNAME$", FN_HOSTNAME_S),
    kw("DOMAIN$", FN_DOMAIN_S),
    kw("RECV$(", FN_RECV_S),
    kw("SOCKETV4", FN_SOCKETV4),
    kw("SOCKETV6", FN_SOCKETV6),
    kw("ACCEPT(", FN_ACCEPT),
    kw("CWD$", FN_CWD_S),
    kw("RND(", FN_RND),
    kw("SIN(", FN_SIN),
    kw("LN(", FN_LN),
    kw("LOG(", FN_LOG),
    kw("LOG2(", FN_LOG2),
    kw("COS(", FN_COS),
    kw("TAN(", FN_TAN),
    kw("COT(", FN_COT),
    kw("ATN(", FN_ATN),
    kw("HEAD(", FN_HEAD),
    kw("TAIL(", FN_TAIL),
    kw("TRUE", FN_TRUE),
    kw("FALSE", FN_FALSE),
    kw("NIL", FN_NIL),
    kw("NEXT(", FN_NEXT),
    kw("PREV(", FN_PREV),
    kw("CELLS(", FN_CELLS),
    // modifiers
    kw("SUB", MD_SUB),
    kw("FUNC", MD_FUNC),
    kw("BASE", MD_BASE),
    kw("BYTEORDER", MD_BYTEORDER),
    kw("INT", MD_INT),
    kw("FLOAT", MD_FLOAT),
    kw("FIXED", MD_FIXED),
    kw("FN", MD_FN),
    kw("DYNAMIC", MD_DYNAMIC),
    kw("PTR", MD_PTR),
    kw("LINE", MD_LINE),
    kw("IN", MD_IN),
    kw("LABEL", MD_LABEL),
    kw("THEN", MD_THEN),
    kw("TO", MD_TO),
    kw("DOWNTO", MD_DOWNTO),
    // operators
    kw("<=", OP_LE),
    kw(">=", OP_GE),
    kw("<>", OP_NE),
    kw("AND", OP_AND),
    kw("OR", OP_OR),
    kw("XOR", OP_XOR),
    kw("NOT", OP_NOT),
    kw("NAND", OP_NAND),
    kw("NOR", OP_NOR),
    kw("XNOR", OP_XNOR),
    kw("EQV", OP_EQV),
    kw("NEQV", OP_NEQV),
    kw("SHL", OP_SHL),
    kw("SHR", OP_SHR),
    kw("**", OP_POW),
    kw("++", OP_INC),
    kw("--", OP_DEC),
    // single-byte codes with word forms
    kw("PRINT", T_PRINT),
    kw("REM", T_REM),
];

/// Linear lookup of a keyword text by code. The interpreter's registry wraps
/// this in a hashed reverse index; this form exists for tools and tests.
pub fn keyword_text(code: u16) -> Option<&'static str> {
    KEYWORDS.iter().find(|k| k.code == code).map(|k| k.text)
}
