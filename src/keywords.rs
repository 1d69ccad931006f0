//! Process-wide keyword registry.
//!
//! Built once from the static table in `priamos-tokens` and read-only
//! afterwards, so it can be shared freely. Both directions are hashed: the
//! tokenizer resolves identifier bytes to codes, the detokenizer resolves
//! codes back to their canonical text.

use crate::hash::HashTable;
use priamos_tokens::{KeywordDef, KEYWORDS};

use std::sync::OnceLock;
use tracing::debug;

/// Bidirectional keyword map.
#[derive(Debug)]
pub struct Keywords {
    by_name: HashTable<u16>,
    by_code: HashTable<usize>,
}

impl Keywords {
    /// The process-wide instance, built on first use.
    pub fn get() -> &'static Keywords {
        static INSTANCE: OnceLock<Keywords> = OnceLock::new();
        INSTANCE.get_or_init(Keywords::build)
    }

    fn build() -> Self {
        let mut by_name = HashTable::new();
        let mut by_code = HashTable::new();
        for (index, KeywordDef { text, code }) in KEYWORDS.iter().enumerate() {
            by_name.insert(text.as_bytes(), *code);
            by_code.insert(&code.to_be_bytes(), index);
        }
        debug!(
            entries = KEYWORDS.len(),
            coverage = by_name.coverage(),
            "keyword registry initialized"
        );
        Self { by_name, by_code }
    }

    /// Token code for a keyword text, uppercase with sigils.
    pub fn lookup_by_name(&self, name: &[u8]) -> Option<u16> {
        self.by_name.find(name).copied()
    }

    /// Canonical text for a token code.
    pub fn lookup_by_code(&self, code: u16) -> Option<&'static str> {
        self.by_code
            .find(&code.to_be_bytes())
            .map(|&index| KEYWORDS[index].text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priamos_tokens::{FN_STR_S, KW_LIST, OP_SHL, T_PRINT};

    #[test]
    fn lookup_both_directions() {
        let kw = Keywords::get();
        assert_eq!(kw.lookup_by_name(b"LIST"), Some(KW_LIST));
        assert_eq!(kw.lookup_by_name(b"STR$("), Some(FN_STR_S));
        assert_eq!(kw.lookup_by_name(b"SHL"), Some(OP_SHL));
        assert_eq!(kw.lookup_by_name(b"PRINT"), Some(T_PRINT));
        assert_eq!(kw.lookup_by_name(b"NOSUCH"), None);

        assert_eq!(kw.lookup_by_code(KW_LIST), Some("LIST"));
        assert_eq!(kw.lookup_by_code(FN_STR_S), Some("STR$("));
        assert_eq!(kw.lookup_by_code(0x03FF), None);
    }

    #[test]
    fn every_table_entry_resolves() {
        let kw = Keywords::get();
        for def in KEYWORDS {
            assert_eq!(kw.lookup_by_name(def.text.as_bytes()), Some(def.code));
            assert_eq!(kw.lookup_by_code(def.code), Some(def.text));
        }
    }
}
