/// VMIL opcodes.
///
/// Every instruction starts with one opcode byte. Bit 0 of that byte is the
/// IMMEDIATE flag: when set, an 8-byte little-endian operand follows. The
/// immediate opcodes therefore all carry odd values and everything else is even.
/// Byte values not listed here are undefined and fault when executed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Halt: the process is finished.
    Hlt = 0x00,
    /// Push the immediate operand.
    Push = 0x01,
    /// Yield: the process goes idle until resumed.
    Brk = 0x02,
    /// Push variable slot `operand`.
    LdVar = 0x03,
    /// Duplicate the top of stack.
    Dup = 0x04,
    /// Push the region address of variable slot `operand`.
    LdIndVar = 0x05,
    /// Discard the top of stack.
    Pop = 0x06,
    /// Pop into variable slot `operand`.
    StVar = 0x07,
    /// Push the current stack depth.
    LdStack = 0x08,

    Add = 0x0a,
    Sub = 0x0c,
    Mul = 0x0e,
    IMul = 0x10,
    Div = 0x12,
    IDiv = 0x14,
    Mod = 0x16,
    IMod = 0x18,

    And = 0x1a,
    Or = 0x1c,
    Xor = 0x1e,
    Not = 0x20,

    /// Equal.
    Equ = 0x22,
    /// Not equal.
    Neq = 0x24,
    /// Unsigned above.
    Abv = 0x26,
    /// Unsigned below.
    Bel = 0x28,
    /// Signed greater.
    Gtr = 0x2a,
    /// Signed less.
    Les = 0x2c,

    /// Relative jump by the popped displacement.
    Jmp = 0x2e,
    /// Relative jump by the popped displacement if the next popped value is nonzero.
    Jif = 0x30,
}

/// Bit 0 of the opcode byte: an 8-byte operand follows.
pub const IMMEDIATE_FLAG: u8 = 0x01;

/// Size of an immediate operand in bytes.
pub const OPERAND_SIZE: usize = 8;

impl Opcode {
    pub const ALL: [Opcode; 29] = [
        Opcode::Hlt,
        Opcode::Brk,
        Opcode::Push,
        Opcode::Dup,
        Opcode::Pop,
        Opcode::LdStack,
        Opcode::LdVar,
        Opcode::LdIndVar,
        Opcode::StVar,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::IMul,
        Opcode::Div,
        Opcode::IDiv,
        Opcode::Mod,
        Opcode::IMod,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Not,
        Opcode::Equ,
        Opcode::Neq,
        Opcode::Abv,
        Opcode::Bel,
        Opcode::Gtr,
        Opcode::Les,
        Opcode::Jmp,
        Opcode::Jif,
    ];

    /// Convert a raw byte to an opcode. Returns `None` for undefined values.
    pub fn from_u8(value: u8) -> Option<Self> {
        use Opcode::*;
        Some(match value {
            0x00 => Hlt,
            0x01 => Push,
            0x02 => Brk,
            0x03 => LdVar,
            0x04 => Dup,
            0x05 => LdIndVar,
            0x06 => Pop,
            0x07 => StVar,
            0x08 => LdStack,
            0x0a => Add,
            0x0c => Sub,
            0x0e => Mul,
            0x10 => IMul,
            0x12 => Div,
            0x14 => IDiv,
            0x16 => Mod,
            0x18 => IMod,
            0x1a => And,
            0x1c => Or,
            0x1e => Xor,
            0x20 => Not,
            0x22 => Equ,
            0x24 => Neq,
            0x26 => Abv,
            0x28 => Bel,
            0x2a => Gtr,
            0x2c => Les,
            0x2e => Jmp,
            0x30 => Jif,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// True when the encoded instruction carries an 8-byte operand.
    pub fn has_immediate(self) -> bool {
        self.as_u8() & IMMEDIATE_FLAG != 0
    }

    /// Encoded size of the instruction in bytes.
    pub fn encoded_len(self) -> usize {
        if self.has_immediate() {
            1 + OPERAND_SIZE
        } else {
            1
        }
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Hlt => "HLT",
            Brk => "BRK",
            Push => "PUSH",
            Dup => "DUP",
            Pop => "POP",
            LdStack => "LDSTACK",
            LdVar => "LDVAR",
            LdIndVar => "LDINDVAR",
            StVar => "STVAR",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            IMul => "IMUL",
            Div => "DIV",
            IDiv => "IDIV",
            Mod => "MOD",
            IMod => "IMOD",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Not => "NOT",
            Equ => "EQU",
            Neq => "NEQ",
            Abv => "ABV",
            Bel => "BEL",
            Gtr => "GTR",
            Les => "LES",
            Jmp => "JMP",
            Jif => "JIF",
        }
    }

    /// Exact, case-sensitive lookup of an assembly mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == name)
    }
}
