use crate::decoder::decode;
use crate::fault::Fault;
use crate::instruction::Instruction;
use crate::isa::Opcode;
use crate::memory_page::MemoryRegion;
use types::{ArrayList, WORD_SIZE};

/// Maximum operand stack depth. Pushing beyond it faults.
pub const MAX_STACK_DEPTH: usize = 1 << 20;

/// What the VM's lifecycle should do after an instruction completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Continue,
    Halt,
    Yield,
}

/// Execution state of one VM: instruction cursor, fault landing address and
/// operand stack. Addresses are offsets into the VM's memory region.
#[derive(Debug)]
pub struct CPU {
    /// Address of the next instruction.
    pub current: usize,
    /// Entry point: first byte after the variable table.
    pub start: usize,
    /// Where execution continues after a fault.
    pub error: usize,
    pub stack: ArrayList<u64>,
    /// Trace every executed instruction.
    pub verbose: bool,
}

impl CPU {
    pub fn new(start: usize, error: usize) -> Self {
        Self {
            current: start,
            start,
            error,
            stack: ArrayList::new(),
            verbose: false,
        }
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// On `Err` nothing has been redirected yet; the caller sends the cursor to
    /// the error address so that every fault takes the same path.
    pub fn step(&mut self, memory: &mut MemoryRegion, var_count: u64) -> Result<Effect, Fault> {
        if !memory.contains(self.current) {
            return Err(Fault::InvalidPointer);
        }
        let bytes = memory.slice_from(self.current).ok_or(Fault::InvalidPointer)?;
        let (instr, size) = decode(bytes)?;

        if self.verbose {
            tracing::trace!(
                addr = self.current,
                depth = self.stack.len(),
                "{}",
                instr.pretty_print()
            );
        }

        self.current += size as usize;
        self.execute(instr, memory, var_count)
    }

    fn execute(
        &mut self,
        instr: Instruction,
        memory: &mut MemoryRegion,
        var_count: u64,
    ) -> Result<Effect, Fault> {
        let operand = instr.operand.unwrap_or(0);

        match instr.opcode {
            Opcode::Hlt => return Ok(Effect::Halt),
            Opcode::Brk => return Ok(Effect::Yield),
            Opcode::Push => self.push(operand)?,
            Opcode::Dup => {
                let value = self.pop()?;
                self.ensure_room(2)?;
                self.push(value)?;
                self.push(value)?;
            }
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::LdStack => {
                let depth = self.stack.len() as u64;
                self.push(depth)?;
            }
            Opcode::LdVar => {
                let addr = variable_addr(operand, var_count)?;
                let value = memory
                    .read_u64_le(addr)
                    .ok_or(Fault::VariableOutOfRange(operand))?;
                self.push(value)?;
            }
            Opcode::LdIndVar => {
                let addr = variable_addr(operand, var_count)?;
                self.push(addr as u64)?;
            }
            Opcode::StVar => {
                let value = self.pop()?;
                let addr = variable_addr(operand, var_count)?;
                if !memory.write_u64_le(addr, value) {
                    return Err(Fault::VariableOutOfRange(operand));
                }
            }
            Opcode::Not => {
                let value = self.pop()?;
                self.push(!value)?;
            }
            Opcode::Jmp => {
                let displacement = self.pop()?;
                self.jump(displacement, memory)?;
            }
            Opcode::Jif => {
                let displacement = self.pop()?;
                let condition = self.pop()?;
                if condition != 0 {
                    self.jump(displacement, memory)?;
                }
            }
            op => {
                let rhs = self.pop()?;
                let lhs = self.pop()?;
                let result = binary(op, lhs, rhs)?;
                self.push(result)?;
            }
        }

        Ok(Effect::Continue)
    }

    fn push(&mut self, value: u64) -> Result<(), Fault> {
        self.ensure_room(1)?;
        self.stack.add(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<u64, Fault> {
        self.stack.pop().ok_or(Fault::StackUnderflow)
    }

    fn ensure_room(&self, n: usize) -> Result<(), Fault> {
        if self.stack.len() + n > MAX_STACK_DEPTH {
            return Err(Fault::StackOverflow);
        }
        Ok(())
    }

    /// Relative jump from the already-advanced cursor.
    fn jump(&mut self, displacement: u64, memory: &MemoryRegion) -> Result<(), Fault> {
        let target = self
            .current
            .checked_add_signed(displacement as i64 as isize)
            .filter(|&target| memory.contains(target))
            .ok_or(Fault::JumpOutOfBounds)?;
        self.current = target;
        Ok(())
    }
}

fn variable_addr(index: u64, var_count: u64) -> Result<usize, Fault> {
    if index >= var_count {
        return Err(Fault::VariableOutOfRange(index));
    }
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(WORD_SIZE))
        .ok_or(Fault::VariableOutOfRange(index))
}

/// Two-operand instructions: `lhs` was pushed first, `rhs` is the top of stack.
fn binary(op: Opcode, lhs: u64, rhs: u64) -> Result<u64, Fault> {
    let (slhs, srhs) = (lhs as i64, rhs as i64);
    Ok(match op {
        Opcode::Add => lhs.wrapping_add(rhs),
        Opcode::Sub => lhs.wrapping_sub(rhs),
        Opcode::Mul => lhs.wrapping_mul(rhs),
        Opcode::IMul => slhs.wrapping_mul(srhs) as u64,
        Opcode::Div => lhs.checked_div(rhs).ok_or(Fault::DivisionByZero)?,
        Opcode::Mod => lhs.checked_rem(rhs).ok_or(Fault::DivisionByZero)?,
        Opcode::IDiv => {
            if srhs == 0 {
                return Err(Fault::DivisionByZero);
            }
            slhs.wrapping_div(srhs) as u64
        }
        Opcode::IMod => {
            if srhs == 0 {
                return Err(Fault::DivisionByZero);
            }
            slhs.wrapping_rem(srhs) as u64
        }
        Opcode::And => lhs & rhs,
        Opcode::Or => lhs | rhs,
        Opcode::Xor => lhs ^ rhs,
        Opcode::Equ => (lhs == rhs) as u64,
        Opcode::Neq => (lhs != rhs) as u64,
        Opcode::Abv => (lhs > rhs) as u64,
        Opcode::Bel => (lhs < rhs) as u64,
        Opcode::Gtr => (slhs > srhs) as u64,
        Opcode::Les => (slhs < srhs) as u64,
        // every other opcode is handled by the caller
        other => return Err(Fault::UndefinedOpcode(other.as_u8())),
    })
}
