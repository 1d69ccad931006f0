//! Token stream → printable line text, the reverse mapping `LIST` uses.

use crate::buffer::ByteBuffer;
use crate::consts::DETOK_BUFFER_SIZE;
use crate::error::BasicError;
use crate::keywords::Keywords;
use crate::scanner::TokenScanner;
use crate::util::format_real;
use priamos_tokens::{T_EOL, T_IDENT, T_LABEL, T_LINENO, T_NUMLIT, T_PRINT, T_REM, T_SBI, T_STRLIT};

/// Walks a token stream and renders each token, one space between
/// successive tokens.
#[derive(Debug)]
pub struct Detokenizer<'a> {
    scan: TokenScanner<'a>,
    buf: ByteBuffer,
}

impl<'a> Detokenizer<'a> {
    /// Detokenize the stream starting at `tokens`.
    pub fn new(tokens: &'a [u8]) -> Self {
        Self {
            scan: TokenScanner::new(tokens),
            buf: ByteBuffer::with_capacity(DETOK_BUFFER_SIZE),
        }
    }

    /// Produce the text of the line up to its `EOL`.
    pub fn detokenize(mut self) -> Result<Vec<u8>, BasicError> {
        let mut first = true;
        loop {
            let tok = self.scan.tok_type();
            if tok == T_EOL {
                break;
            }
            if !first {
                self.buf.write_byte(b' ')?;
            }
            first = false;
            self.render(tok)?;
            if !self.scan.skip_token() {
                return Err(BasicError::InterpretError);
            }
        }
        Ok(self.buf.as_slice().to_vec())
    }

    fn render(&mut self, tok: u16) -> Result<(), BasicError> {
        match tok {
            T_LINENO => {
                let line_no = self.scan.get_line_no().ok_or(BasicError::InterpretError)?;
                self.buf.write_block(line_no.to_string().as_bytes())?;
            }
            T_IDENT => {
                let text = self.scan.get_text().ok_or(BasicError::InterpretError)?;
                self.buf.write_block(text)?;
            }
            T_STRLIT => {
                let text = self.scan.get_text().ok_or(BasicError::InterpretError)?;
                self.buf.write_byte(b'"')?;
                self.buf.write_block(text)?;
                self.buf.write_byte(b'"')?;
            }
            T_LABEL => {
                let text = self.scan.get_text().ok_or(BasicError::InterpretError)?;
                self.buf.write_block(text)?;
                self.buf.write_byte(b':')?;
            }
            T_NUMLIT | T_SBI => {
                // integers print exactly; reals use the %g rendering
                let text = if self.scan.is_int() {
                    self.scan
                        .get_int()
                        .ok_or(BasicError::InterpretError)?
                        .to_string()
                } else {
                    format_real(self.scan.get_number().ok_or(BasicError::InterpretError)?)
                };
                self.buf.write_block(text.as_bytes())?;
            }
            T_REM => {
                let keyword = Keywords::get()
                    .lookup_by_code(T_REM)
                    .ok_or(BasicError::InterpretError)?;
                self.buf.write_block(keyword.as_bytes())?;
                self.buf.write_byte(b' ')?;
                let text = self.scan.get_text().ok_or(BasicError::InterpretError)?;
                self.buf.write_block(text)?;
            }
            tok if tok >= 0x0100 || tok == T_PRINT => {
                let keyword = Keywords::get()
                    .lookup_by_code(tok)
                    .ok_or(BasicError::InterpretError)?;
                self.buf.write_block(keyword.as_bytes())?;
            }
            tok => {
                self.buf.write_byte(tok as u8)?;
            }
        }
        Ok(())
    }
}
