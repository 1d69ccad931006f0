//! Small shared utilities: monotonic time, `%g`-style real formatting and a
//! hex dump for byte-level debugging.

use std::fmt::Write;
use std::sync::OnceLock;
use std::time::Instant;

/// Seconds elapsed on a monotonic clock since the first call in this process.
pub fn monotonic_time() -> f64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Format a real the way C's `%g` does: six significant digits, trailing
/// zeros stripped, exponential notation outside `1e-4..1e6`.
///
/// The detokenizer and the Real→Str coercion both print through this
/// rendering.
pub fn format_real(value: f64) -> String {
    const PREC: usize = 6;

    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    // Round to the target precision first; the style decision uses the
    // exponent after rounding, exactly like printf.
    let sci = format!("{:.*e}", PREC - 1, value);
    let (mantissa, exp) = sci
        .split_once('e')
        .expect("exponential format always contains 'e'");
    let exp: i32 = exp.parse().expect("exponent is an integer");

    if exp < -4 || exp >= PREC as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (PREC as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        trim_fraction(&fixed).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Render `bytes` as an offset-prefixed hex dump with an ASCII column,
/// 16 bytes per row.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:04X}:", row * 16);
        for (i, b) in chunk.iter().enumerate() {
            if i % 4 == 0 {
                out.push(' ');
            }
            let _ = write!(out, " {b:02X}");
        }
        for i in chunk.len()..16 {
            if i % 4 == 0 {
                out.push(' ');
            }
            out.push_str("   ");
        }
        out.push_str("  ");
        for b in chunk {
            out.push(if (0x20..0x7F).contains(b) { *b as char } else { '.' });
        }
        out.push('\n');
    }
    out
}
