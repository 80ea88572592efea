//! Textual VMIL assembler.
//!
//! One instruction per line:
//!
//! ```text
//! MNEMONIC [OPERAND]
//! ```
//!
//! - Mnemonics are matched exactly and are case-sensitive (`PUSH`, not `push`).
//! - Operands are decimal integers, optionally signed, and are emitted as
//!   8-byte little-endian two's-complement words.
//! - An operand is required for exactly the IMMEDIATE opcodes and forbidden
//!   for every other opcode.
//! - Blank lines are skipped.
//!
//! Any error aborts the whole pass; no partial output is produced.

use std::fmt::Write;

use thiserror::Error;
use vm::decoder::decode_all;
use vm::{Instruction, Opcode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyErrorKind {
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    #[error("`{0}` requires an operand")]
    MissingOperand(&'static str),

    #[error("`{0}` takes no operand")]
    ExtraneousOperand(&'static str),

    #[error("invalid operand `{0}`")]
    InvalidOperand(String),
}

/// A rejected source line. `offset` and `length` locate the whole line in the
/// source text in bytes; `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AssemblyError {
    pub kind: AssemblyErrorKind,
    pub line: usize,
    pub offset: usize,
    pub length: usize,
}

impl AssemblyError {
    /// Formats a compiler-style diagnostic pointing at the offending line.
    pub fn render(&self, file: &str, source: &str) -> String {
        let mut diag = String::new();
        let _ = writeln!(diag, "error: {}", self.kind);
        let _ = writeln!(diag, " --> {}:{}", file, self.line);

        if let Some(text) = source.get(self.offset..self.offset + self.length) {
            let _ = writeln!(diag, "     |");
            let _ = writeln!(diag, "{:>4} | {}", self.line, text);
            let _ = writeln!(diag, "     | {}", "^".repeat(text.len().max(1)));
        }

        diag
    }
}

/// Assembles `source` into raw code bytes (no image header).
pub fn assemble(source: &str) -> Result<Vec<u8>, AssemblyError> {
    let mut code = Vec::new();
    let mut offset = 0;

    for (index, raw) in source.split('\n').enumerate() {
        let line_start = offset;
        offset += raw.len() + 1;

        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let fail = |kind| AssemblyError {
            kind,
            line: index + 1,
            offset: line_start,
            length: text.len(),
        };

        let mut tokens = text.split_whitespace();
        let Some(mnemonic) = tokens.next() else {
            continue;
        };
        let operand = tokens.next();

        let opcode = Opcode::from_mnemonic(mnemonic)
            .ok_or_else(|| fail(AssemblyErrorKind::UnknownMnemonic(mnemonic.to_string())))?;
        let name = opcode.mnemonic();

        if tokens.next().is_some() {
            return Err(fail(AssemblyErrorKind::ExtraneousOperand(name)));
        }

        let instr = match (opcode.has_immediate(), operand) {
            (true, Some(token)) => {
                let value = parse_operand(token)
                    .ok_or_else(|| fail(AssemblyErrorKind::InvalidOperand(token.to_string())))?;
                Instruction::with_operand(opcode, value)
            }
            (true, None) => return Err(fail(AssemblyErrorKind::MissingOperand(name))),
            (false, Some(_)) => return Err(fail(AssemblyErrorKind::ExtraneousOperand(name))),
            (false, None) => Instruction::new(opcode),
        };

        tracing::trace!(line = index + 1, at = code.len(), "{}", instr.pretty_print());
        instr.encode_into(&mut code);
    }

    Ok(code)
}

/// Decimal, optionally signed. Negative values are stored as two's complement;
/// non-negative values may use the full unsigned range.
fn parse_operand(token: &str) -> Option<u64> {
    if token.starts_with('-') {
        token.parse::<i64>().ok().map(|v| v as u64)
    } else {
        token.parse::<u64>().ok()
    }
}

/// Lists `code` one instruction per line, prefixed with its offset. Decoding
/// stops at the first byte that is not a valid instruction.
pub fn disassemble(code: &[u8]) -> Vec<String> {
    let (instrs, fault) = decode_all(code);
    let mut lines: Vec<String> = instrs
        .iter()
        .map(|(at, instr)| format!("{:04x}: {}", at, instr.pretty_print()))
        .collect();
    if let Some((at, fault)) = fault {
        lines.push(format!("{:04x}: <{}>", at, fault));
    }
    lines
}
