//! Program store: stored lines and the byte buffer backing them.
//!
//! Line edits append; the bytes of a replaced or deleted line stay orphaned
//! in the buffer until the next growth would be needed, at which point the
//! store compacts itself in line-number order first.

use crate::buffer::ByteBuffer;
use crate::consts::PROGRAM_BUFFER_SIZE;
use crate::error::BasicError;
use crate::line_info::{LineInfo, LineInfoManager};
use crate::scanner::TokenScanner;
use priamos_tokens::{T_EOL, T_LINENO};

use tracing::{debug, trace};

/// Owner of the program text: a byte buffer of token streams plus the
/// line-info records indexing into it.
#[derive(Debug)]
pub struct Program {
    buf: ByteBuffer,
    lines: LineInfoManager,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    /// Empty program store.
    pub fn new() -> Self {
        Self {
            buf: ByteBuffer::with_capacity(PROGRAM_BUFFER_SIZE),
            lines: LineInfoManager::new(),
        }
    }

    /// Number of stored lines.
    pub fn line_count(&self) -> usize {
        self.lines.count()
    }

    /// Line record at `index`, in line-number order.
    pub fn line_at(&self, index: usize) -> Option<&LineInfo> {
        self.lines.get(index)
    }

    /// The highest stored line number.
    pub fn last_line_number(&self) -> Option<u32> {
        self.lines.last_line_number()
    }

    /// Token bytes of a stored line.
    pub fn line_bytes(&self, rec: &LineInfo) -> &[u8] {
        &self.buf.as_slice()[rec.offset..rec.offset + rec.length]
    }

    /// Consume one fully tokenized line.
    ///
    /// Lines without a leading `LINENO` are for immediate execution and are
    /// not stored. A bare `LINENO EOL` deletes that line; anything else is
    /// appended and insert-sorted, replacing any previous copy.
    pub fn enter_line(&mut self, tokens: &[u8]) -> Result<(), BasicError> {
        let mut scan = TokenScanner::new(tokens);
        if scan.tok_type() != T_LINENO {
            return Ok(());
        }
        let line_no = scan.get_line_no().ok_or(BasicError::InterpretError)?;
        if !scan.skip_token() {
            return Err(BasicError::InterpretError);
        }
        if scan.tok_type() == T_EOL {
            let existed = self.lines.delete_line(line_no);
            debug!(line_no, existed, "line deleted");
            return Ok(());
        }

        if self.buf.remaining_capacity() < tokens.len() {
            self.compact()?;
        }
        let offset = self.buf.write_pos();
        self.buf.write_block(tokens)?;
        self.lines.insert(LineInfo {
            line_no,
            offset,
            length: tokens.len(),
        });
        Ok(())
    }

    /// Remove every stored line whose number falls in `start..=end`.
    pub fn delete_range(&mut self, start: u32, end: u32) -> usize {
        let doomed: Vec<u32> = self
            .lines
            .records()
            .iter()
            .map(|rec| rec.line_no)
            .filter(|n| (start..=end).contains(n))
            .collect();
        for line_no in &doomed {
            self.lines.delete_line(*line_no);
        }
        doomed.len()
    }

    /// Drop the whole program.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.lines.clear();
    }

    /// Bytes currently occupied in the backing buffer, orphans included.
    pub fn buffer_fill(&self) -> usize {
        self.buf.write_pos()
    }

    /// Rewrite the buffer to hold exactly the live lines, in line-number
    /// order, and fix up every record's offset.
    fn compact(&mut self) -> Result<(), BasicError> {
        let before = self.buf.write_pos();
        let live = self.lines.total_bytes();
        let mut tmp = ByteBuffer::with_capacity(live);

        let Self { buf, lines } = self;
        let mut target = 0usize;
        for rec in lines.records_mut() {
            buf.set_read_pos(rec.offset)?;
            let block = buf.read_block(rec.length)?;
            tmp.write_block(block)?;
            rec.offset = target;
            target += rec.length;
        }
        buf.clear();
        buf.write_block(tmp.as_slice())?;
        debug!(before, after = self.buf.write_pos(), "program buffer compacted");
        trace!(
            "live program bytes\n{}",
            crate::util::hex_dump(self.buf.as_slice())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn tokens(src: &str) -> Vec<u8> {
        Tokenizer::new(src.as_bytes())
            .tokenize()
            .expect("test line tokenizes")
            .as_slice()
            .to_vec()
    }

    fn stored_lines(prog: &Program) -> Vec<u32> {
        (0..prog.line_count())
            .map(|i| prog.line_at(i).unwrap().line_no)
            .collect()
    }

    #[test]
    fn direct_mode_lines_are_not_stored() {
        let mut prog = Program::new();
        prog.enter_line(&tokens("END")).unwrap();
        assert_eq!(prog.line_count(), 0);
    }

    #[test]
    fn entering_twice_leaves_one_record() {
        let mut prog = Program::new();
        let line = tokens("10 END");
        prog.enter_line(&line).unwrap();
        prog.enter_line(&line).unwrap();
        assert_eq!(stored_lines(&prog), vec![10]);
    }

    #[test]
    fn bare_lineno_deletes_idempotently() {
        let mut prog = Program::new();
        prog.enter_line(&tokens("10 END")).unwrap();
        prog.enter_line(&tokens("10")).unwrap();
        assert_eq!(prog.line_count(), 0);
        prog.enter_line(&tokens("10")).unwrap();
        assert_eq!(prog.line_count(), 0);
    }

    #[test]
    fn replaced_lines_orphan_bytes_until_compaction() {
        let mut prog = Program::new();
        let line = tokens("10 END");
        prog.enter_line(&line).unwrap();
        prog.enter_line(&line).unwrap();
        // both copies occupy the buffer, only one record is live
        assert_eq!(prog.buffer_fill(), line.len() * 2);
        prog.compact().unwrap();
        assert_eq!(prog.buffer_fill(), line.len());
        let rec = *prog.line_at(0).unwrap();
        assert_eq!(rec.offset, 0);
        assert_eq!(prog.line_bytes(&rec), &line[..]);
    }

    #[test]
    fn compaction_orders_bytes_by_line_number() {
        let mut prog = Program::new();
        prog.enter_line(&tokens("20 NOP")).unwrap();
        prog.enter_line(&tokens("10 END")).unwrap();
        prog.compact().unwrap();
        assert_eq!(stored_lines(&prog), vec![10, 20]);
        let first = *prog.line_at(0).unwrap();
        let second = *prog.line_at(1).unwrap();
        assert_eq!(first.offset, 0);
        assert_eq!(second.offset, first.length);
        assert_eq!(prog.line_bytes(&first), &tokens("10 END")[..]);
    }

    #[test]
    fn delete_range_is_inclusive() {
        let mut prog = Program::new();
        for src in ["10 NOP", "20 NOP", "30 NOP", "40 NOP"] {
            prog.enter_line(&tokens(src)).unwrap();
        }
        assert_eq!(prog.delete_range(20, 30), 2);
        assert_eq!(stored_lines(&prog), vec![10, 40]);
        assert_eq!(prog.last_line_number(), Some(40));
    }
}
