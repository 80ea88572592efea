use crate::fault::Fault;
use crate::instruction::Instruction;
use crate::isa::{Opcode, IMMEDIATE_FLAG};
use types::read_word_le;

/// Decodes the instruction at the start of `bytes`.
///
/// `bytes` runs from the instruction cursor to the end of the memory region, so
/// any operand that does not fit is outside the region. The operand is checked
/// before the opcode is looked up: an undefined byte with the IMMEDIATE flag
/// still consumes (and needs) eight operand bytes.
///
/// Returns the instruction and its encoded size.
pub fn decode(bytes: &[u8]) -> Result<(Instruction, u8), Fault> {
    let op = *bytes.first().ok_or(Fault::InvalidPointer)?;

    let operand = if op & IMMEDIATE_FLAG != 0 {
        Some(read_word_le(bytes, 1).ok_or(Fault::InvalidOperand)?)
    } else {
        None
    };

    let opcode = Opcode::from_u8(op).ok_or(Fault::UndefinedOpcode(op))?;
    let instr = Instruction { opcode, operand };

    Ok((instr, instr.size()))
}

/// Decodes a whole code buffer for listings. Stops at the first byte that
/// does not decode and reports its offset.
pub fn decode_all(code: &[u8]) -> (Vec<(usize, Instruction)>, Option<(usize, Fault)>) {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        match decode(&code[offset..]) {
            Ok((instr, size)) => {
                out.push((offset, instr));
                offset += size as usize;
            }
            Err(fault) => return (out, Some((offset, fault))),
        }
    }
    (out, None)
}
