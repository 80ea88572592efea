use crate::isa::Opcode;

/// One decoded VMIL instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Present exactly when the opcode has the IMMEDIATE flag.
    pub operand: Option<u64>,
}

impl Instruction {
    pub fn new(opcode: Opcode) -> Self {
        Self { opcode, operand: None }
    }

    pub fn with_operand(opcode: Opcode, operand: u64) -> Self {
        Self {
            opcode,
            operand: Some(operand),
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> u8 {
        self.opcode.encoded_len() as u8
    }

    /// Appends the encoded form to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode.as_u8());
        if self.opcode.has_immediate() {
            out.extend_from_slice(&self.operand.unwrap_or(0).to_le_bytes());
        }
    }

    /// Assembly text for this instruction. Operands print signed, which the
    /// assembler reads back to the same bit pattern.
    pub fn pretty_print(&self) -> String {
        match self.operand {
            Some(value) => format!("{} {}", self.opcode.mnemonic(), value as i64),
            None => self.opcode.mnemonic().to_string(),
        }
    }
}
