#![allow(dead_code)]

use types::{TaskId, WORD_SIZE};
use vm::{Instruction, Layout, MemoryRegion, Opcode, VM};

pub fn op(opcode: Opcode) -> Instruction {
    Instruction::new(opcode)
}

pub fn imm(opcode: Opcode, operand: i64) -> Instruction {
    Instruction::with_operand(opcode, operand as u64)
}

pub fn encode(program: &[Instruction]) -> Vec<u8> {
    let mut code = Vec::new();
    for instr in program {
        instr.encode_into(&mut code);
    }
    code
}

/// Places `code` right after `vars` variable slots in a region of exactly
/// `vars * 8 + code.len() + slack` bytes. The error handler sits `error_off`
/// bytes after the entry point.
pub fn vm_with(code: &[u8], vars: u64, error_off: usize, slack: usize) -> VM {
    let entry = vars as usize * WORD_SIZE;
    let len = entry + code.len() + slack;
    let mut memory = MemoryRegion::zeroed(len);
    for (i, byte) in code.iter().enumerate() {
        assert!(memory.write_u8(entry + i, *byte));
    }
    let layout = Layout {
        var_count: vars,
        entry,
        error: entry + error_off,
    };
    VM::new(TaskId(0), memory, layout).expect("layout fits")
}

pub fn vm_for(program: &[Instruction]) -> VM {
    vm_with(&encode(program), 0, 0, 0)
}

pub fn run_until_stopped(vm: &mut VM, max_steps: usize) {
    for _ in 0..max_steps {
        if vm.status() != vm::Status::Active {
            break;
        }
        vm.step();
    }
}
