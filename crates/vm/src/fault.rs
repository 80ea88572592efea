use std::fmt;

/// Runtime conditions that redirect a VM to its error handler.
///
/// Faults never leave the VM as errors: the step that raises one moves the
/// instruction cursor to the image's error address and the process keeps running
/// from there. The most recent fault is kept on the VM for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The instruction cursor is outside the memory region.
    InvalidPointer,
    /// The 8-byte immediate operand runs past the end of the region.
    InvalidOperand,
    /// The opcode byte has no instruction assigned.
    UndefinedOpcode(u8),
    /// A pop found the operand stack empty.
    StackUnderflow,
    /// A push would exceed the stack depth limit.
    StackOverflow,
    /// A variable index at or beyond the variable count.
    VariableOutOfRange(u64),
    /// Division or remainder with a zero divisor.
    DivisionByZero,
    /// A jump target outside the memory region.
    JumpOutOfBounds,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::InvalidPointer => write!(f, "instruction pointer out of bounds"),
            Fault::InvalidOperand => write!(f, "operand runs past end of memory"),
            Fault::UndefinedOpcode(op) => write!(f, "undefined opcode 0x{:02x}", op),
            Fault::StackUnderflow => write!(f, "stack underflow"),
            Fault::StackOverflow => write!(f, "stack overflow"),
            Fault::VariableOutOfRange(index) => write!(f, "variable {} out of range", index),
            Fault::DivisionByZero => write!(f, "division by zero"),
            Fault::JumpOutOfBounds => write!(f, "jump target out of bounds"),
        }
    }
}
