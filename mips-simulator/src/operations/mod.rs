//! Execution units, one file per operation group

use crate::instruction::{DecodedInstruction, Fields, IFields, JFields, Mnemonic, RFields};
use crate::Processor;

mod alu;
mod immediate;
mod jump_branch;
mod load_store;
mod syscall;

/// How to run one mnemonic, typed by the fields it expects
#[derive(Copy, Clone)]
enum Handler {
    R(fn(&mut Processor, RFields, &mut String)),
    I(fn(&mut Processor, IFields, &mut String)),
    J(fn(&mut Processor, JFields, &mut String)),
    Syscall(fn(&mut Processor, &mut String)),
}

/// The handler for a mnemonic, or `None` if no unit implements it
fn handler(mnemonic: Mnemonic) -> Option<Handler> {
    use Handler::*;

    let handler = match mnemonic {
        // Integer ALU
        Mnemonic::Add => R(|p, r, out| p.op_add(r, out)),
        Mnemonic::Addu => R(|p, r, _| p.op_addu(r)),
        Mnemonic::Sub => R(|p, r, out| p.op_sub(r, out)),
        Mnemonic::Subu => R(|p, r, _| p.op_subu(r)),
        Mnemonic::Mult => R(|p, r, _| p.op_mult(r)),
        Mnemonic::Multu => R(|p, r, _| p.op_multu(r)),
        Mnemonic::Div => R(|p, r, _| p.op_div(r)),
        Mnemonic::Divu => R(|p, r, _| p.op_divu(r)),
        Mnemonic::Sll => R(|p, r, _| p.op_sll(r)),
        Mnemonic::Srl => R(|p, r, _| p.op_srl(r)),
        Mnemonic::Sra => R(|p, r, _| p.op_sra(r)),
        Mnemonic::Sllv => R(|p, r, _| p.op_sllv(r)),
        Mnemonic::Srlv => R(|p, r, _| p.op_srlv(r)),
        Mnemonic::Srav => R(|p, r, _| p.op_srav(r)),
        Mnemonic::Slt => R(|p, r, _| p.op_slt(r)),
        Mnemonic::And => R(|p, r, _| p.op_and(r)),
        Mnemonic::Or => R(|p, r, _| p.op_or(r)),
        Mnemonic::Xor => R(|p, r, _| p.op_xor(r)),
        Mnemonic::Nor => R(|p, r, _| p.op_nor(r)),
        Mnemonic::Mfhi => R(|p, r, _| p.op_mfhi(r)),
        Mnemonic::Mflo => R(|p, r, _| p.op_mflo(r)),

        // Immediate ALU
        Mnemonic::Addi => I(|p, i, out| p.op_addi(i, out)),
        Mnemonic::Addiu => I(|p, i, _| p.op_addiu(i)),
        Mnemonic::Slti => I(|p, i, _| p.op_slti(i)),
        Mnemonic::Andi => I(|p, i, _| p.op_andi(i)),
        Mnemonic::Ori => I(|p, i, _| p.op_ori(i)),
        Mnemonic::Xori => I(|p, i, _| p.op_xori(i)),

        // Jumps and branches
        Mnemonic::J => J(|p, j, _| p.op_j(j)),
        Mnemonic::Jal => J(|p, j, _| p.op_jal(j)),
        Mnemonic::Jr => R(|p, r, _| p.op_jr(r)),
        Mnemonic::Beq => I(|p, i, _| p.op_beq(i)),
        Mnemonic::Bne => I(|p, i, _| p.op_bne(i)),
        Mnemonic::Bltz => I(|p, i, _| p.op_bltz(i)),
        Mnemonic::Blez => I(|p, i, _| p.op_blez(i)),
        Mnemonic::Bgtz => I(|p, i, _| p.op_bgtz(i)),

        // Loads and stores
        Mnemonic::Lw => I(|p, i, _| p.op_lw(i)),
        Mnemonic::Sw => I(|p, i, _| p.op_sw(i)),
        Mnemonic::Lb => I(|p, i, _| p.op_lb(i)),
        Mnemonic::Lbu => I(|p, i, _| p.op_lbu(i)),
        Mnemonic::Sb => I(|p, i, _| p.op_sb(i)),
        Mnemonic::Lui => I(|p, i, _| p.op_lui(i)),

        Mnemonic::Syscall => Syscall(|p, out| p.op_syscall(out)),

        // Traps are not modelled
        Mnemonic::Break => return None,
    };

    Some(handler)
}

impl Processor {
    /// Run a decoded instruction, appending any program output.
    /// Returns false if nothing implements the instruction.
    pub(crate) fn execute(&mut self, instruction: &DecodedInstruction, output: &mut String) -> bool {
        let handler = match handler(instruction.mnemonic) {
            Some(handler) => handler,
            None => return false,
        };

        match (handler, instruction.fields) {
            (Handler::R(op), Fields::R(fields)) => op(self, fields, output),
            (Handler::I(op), Fields::I(fields)) => op(self, fields, output),
            (Handler::J(op), Fields::J(fields)) => op(self, fields, output),
            (Handler::Syscall(op), Fields::Syscall(_)) => op(self, output),
            _ => return false,
        }

        true
    }
}

/// Record a signed overflow trap. The destination register is left untouched.
fn trap_overflow(instruction: &str, output: &mut String) {
    warn!("Arithmetic overflow in {}", instruction);
    output.push_str("overflow");
}
