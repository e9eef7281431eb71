use crate::error::{Result, SimError};
use mips_types::constants::*;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A raw MIPS instruction word
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Get the operation code
    pub fn op_code(&self) -> u8 {
        ((self.0 & 0xFC000000) >> 26) as u8
    }

    /// Get the s register (for R and I type instructions)
    pub fn s_register(&self) -> u8 {
        ((self.0 & 0x03E00000) >> 21) as u8
    }

    /// Get the t register (for R and I type instructions)
    pub fn t_register(&self) -> u8 {
        ((self.0 & 0x001F0000) >> 16) as u8
    }

    /// Get the d register (For R type instructions)
    pub fn d_register(&self) -> u8 {
        ((self.0 & 0x0000F800) >> 11) as u8
    }

    /// Get the shift amount (for R type instructions)
    pub fn shift_amount(&self) -> u8 {
        ((self.0 & 0x000007C0) >> 6) as u8
    }

    /// Get the ALU function (for R type instructions)
    pub fn function(&self) -> u8 {
        (self.0 & 0x0000003F) as u8
    }

    /// Get the immediate value (for I type instructions)
    pub fn immediate(&self) -> i16 {
        (self.0 & 0x0000FFFF) as i16
    }

    /// Get the pseudo address (for J type instructions)
    pub fn pseudo_address(&self) -> u32 {
        self.0 & 0x03FFFFFF
    }

    /// The jump target: the pseudo address shifted left by two
    pub fn target_address(&self) -> u32 {
        self.pseudo_address() << 2
    }
}

/// The encoding layout of an instruction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    R,
    I,
    J,
    /// R layout, told apart from other R-type words only by its funct
    Syscall,
}

/// Every instruction the decoder knows about
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Sll,
    Srl,
    Sra,
    Sllv,
    Srlv,
    Srav,
    Jr,
    Syscall,
    Break,
    Mfhi,
    Mflo,
    Mult,
    Multu,
    Div,
    Divu,
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Bltz,
    J,
    Jal,
    Beq,
    Bne,
    Blez,
    Bgtz,
    Addi,
    Addiu,
    Slti,
    Andi,
    Ori,
    Xori,
    Lui,
    Lb,
    Lw,
    Lbu,
    Sb,
    Sw,
}

impl Mnemonic {
    /// The lowercase assembly name
    pub fn name(&self) -> &'static str {
        match self {
            Mnemonic::Sll => "sll",
            Mnemonic::Srl => "srl",
            Mnemonic::Sra => "sra",
            Mnemonic::Sllv => "sllv",
            Mnemonic::Srlv => "srlv",
            Mnemonic::Srav => "srav",
            Mnemonic::Jr => "jr",
            Mnemonic::Syscall => "syscall",
            Mnemonic::Break => "break",
            Mnemonic::Mfhi => "mfhi",
            Mnemonic::Mflo => "mflo",
            Mnemonic::Mult => "mult",
            Mnemonic::Multu => "multu",
            Mnemonic::Div => "div",
            Mnemonic::Divu => "divu",
            Mnemonic::Add => "add",
            Mnemonic::Addu => "addu",
            Mnemonic::Sub => "sub",
            Mnemonic::Subu => "subu",
            Mnemonic::And => "and",
            Mnemonic::Or => "or",
            Mnemonic::Xor => "xor",
            Mnemonic::Nor => "nor",
            Mnemonic::Slt => "slt",
            Mnemonic::Bltz => "bltz",
            Mnemonic::J => "j",
            Mnemonic::Jal => "jal",
            Mnemonic::Beq => "beq",
            Mnemonic::Bne => "bne",
            Mnemonic::Blez => "blez",
            Mnemonic::Bgtz => "bgtz",
            Mnemonic::Addi => "addi",
            Mnemonic::Addiu => "addiu",
            Mnemonic::Slti => "slti",
            Mnemonic::Andi => "andi",
            Mnemonic::Ori => "ori",
            Mnemonic::Xori => "xori",
            Mnemonic::Lui => "lui",
            Mnemonic::Lb => "lb",
            Mnemonic::Lw => "lw",
            Mnemonic::Lbu => "lbu",
            Mnemonic::Sb => "sb",
            Mnemonic::Sw => "sw",
        }
    }

    /// Jumps and branches write the program counter themselves
    pub fn sets_program_counter(&self) -> bool {
        matches!(
            self,
            Mnemonic::J
                | Mnemonic::Jal
                | Mnemonic::Jr
                | Mnemonic::Beq
                | Mnemonic::Bne
                | Mnemonic::Bgtz
                | Mnemonic::Blez
                | Mnemonic::Bltz
        )
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the instruction table
#[derive(Copy, Clone, Debug)]
pub struct InstructionSpec {
    pub mnemonic: Mnemonic,
    pub format: Format,
    pub op_code: u8,
    /// Only meaningful for R and syscall formats
    pub function: Option<u8>,
}

const fn r(mnemonic: Mnemonic, function: u8) -> InstructionSpec {
    InstructionSpec {
        mnemonic,
        format: Format::R,
        op_code: OP_R_TYPE,
        function: Some(function),
    }
}

const fn i(mnemonic: Mnemonic, op_code: u8) -> InstructionSpec {
    InstructionSpec {
        mnemonic,
        format: Format::I,
        op_code,
        function: None,
    }
}

const fn j(mnemonic: Mnemonic, op_code: u8) -> InstructionSpec {
    InstructionSpec {
        mnemonic,
        format: Format::J,
        op_code,
        function: None,
    }
}

/// The instruction set shared by the decoder and the dispatcher
pub static INSTRUCTION_TABLE: [InstructionSpec; 43] = [
    r(Mnemonic::Sll, FUNCTION_SLL),
    r(Mnemonic::Srl, FUNCTION_SRL),
    r(Mnemonic::Sra, FUNCTION_SRA),
    r(Mnemonic::Sllv, FUNCTION_SLLV),
    r(Mnemonic::Srlv, FUNCTION_SRLV),
    r(Mnemonic::Srav, FUNCTION_SRAV),
    r(Mnemonic::Jr, FUNCTION_JR),
    InstructionSpec {
        mnemonic: Mnemonic::Syscall,
        format: Format::Syscall,
        op_code: OP_R_TYPE,
        function: Some(FUNCTION_SYSCALL),
    },
    r(Mnemonic::Break, FUNCTION_BREAK),
    r(Mnemonic::Mfhi, FUNCTION_MFHI),
    r(Mnemonic::Mflo, FUNCTION_MFLO),
    r(Mnemonic::Mult, FUNCTION_MULT),
    r(Mnemonic::Multu, FUNCTION_MULTU),
    r(Mnemonic::Div, FUNCTION_DIV),
    r(Mnemonic::Divu, FUNCTION_DIVU),
    r(Mnemonic::Add, FUNCTION_ADD),
    r(Mnemonic::Addu, FUNCTION_ADDU),
    r(Mnemonic::Sub, FUNCTION_SUB),
    r(Mnemonic::Subu, FUNCTION_SUBU),
    r(Mnemonic::And, FUNCTION_AND),
    r(Mnemonic::Or, FUNCTION_OR),
    r(Mnemonic::Xor, FUNCTION_XOR),
    r(Mnemonic::Nor, FUNCTION_NOR),
    r(Mnemonic::Slt, FUNCTION_SLT),
    i(Mnemonic::Bltz, OP_BLTZ),
    j(Mnemonic::J, OP_J),
    j(Mnemonic::Jal, OP_JAL),
    i(Mnemonic::Beq, OP_BEQ),
    i(Mnemonic::Bne, OP_BNE),
    i(Mnemonic::Blez, OP_BLEZ),
    i(Mnemonic::Bgtz, OP_BGTZ),
    i(Mnemonic::Addi, OP_ADDI),
    i(Mnemonic::Addiu, OP_ADDIU),
    i(Mnemonic::Slti, OP_SLTI),
    i(Mnemonic::Andi, OP_ANDI),
    i(Mnemonic::Ori, OP_ORI),
    i(Mnemonic::Xori, OP_XORI),
    i(Mnemonic::Lui, OP_LUI),
    i(Mnemonic::Lb, OP_LB),
    i(Mnemonic::Lw, OP_LW),
    i(Mnemonic::Lbu, OP_LBU),
    i(Mnemonic::Sb, OP_SB),
    i(Mnemonic::Sw, OP_SW),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RFields {
    pub op_code: u8,
    pub rs: u8,
    pub rt: u8,
    pub rd: u8,
    pub shamt: u8,
    pub funct: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IFields {
    pub op_code: u8,
    pub rs: u8,
    pub rt: u8,
    /// Sign-extended from the low 16 bits
    pub immediate: i16,
}

impl IFields {
    /// The raw 16-bit pattern, zero-extended
    pub fn unsigned_immediate(&self) -> u32 {
        self.immediate as u16 as u32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JFields {
    pub op_code: u8,
    /// The 26-bit field already multiplied by four
    pub address: u32,
}

/// Operand fields, tagged by format
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fields {
    R(RFields),
    I(IFields),
    J(JFields),
    Syscall(RFields),
}

impl Fields {
    fn extract(instruction: Instruction, format: Format) -> Self {
        let r_fields = || RFields {
            op_code: instruction.op_code(),
            rs: instruction.s_register(),
            rt: instruction.t_register(),
            rd: instruction.d_register(),
            shamt: instruction.shift_amount(),
            funct: instruction.function(),
        };

        match format {
            Format::R => Fields::R(r_fields()),
            Format::Syscall => Fields::Syscall(r_fields()),
            Format::I => Fields::I(IFields {
                op_code: instruction.op_code(),
                rs: instruction.s_register(),
                rt: instruction.t_register(),
                immediate: instruction.immediate(),
            }),
            Format::J => Fields::J(JFields {
                op_code: instruction.op_code(),
                address: instruction.target_address(),
            }),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Fields::R(_) => Format::R,
            Fields::I(_) => Format::I,
            Fields::J(_) => Format::J,
            Fields::Syscall(_) => Format::Syscall,
        }
    }
}

/// The result of decoding one word
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub word: u32,
    pub mnemonic: Mnemonic,
    pub fields: Fields,
    pub assembly: String,
}

/// Decode a word into its mnemonic, fields and assembly text
pub fn decode(word: u32) -> Result<DecodedInstruction> {
    let instruction = Instruction(word);
    let op_code = instruction.op_code();

    // Every entry sharing an opcode shares a layout, so the first match fixes
    // how the remaining bits are read
    let format = INSTRUCTION_TABLE
        .iter()
        .find(|spec| spec.op_code == op_code)
        .map(|spec| spec.format)
        .ok_or(SimError::Decode { word })?;
    let format = if format == Format::Syscall {
        Format::R
    } else {
        format
    };
    let fields = Fields::extract(instruction, format);

    let spec = INSTRUCTION_TABLE
        .iter()
        .find(|spec| {
            spec.op_code == op_code
                && match fields {
                    Fields::R(r) => spec.function == Some(r.funct),
                    // Opcode 1 selects the branch through rt, and only bltz is known
                    Fields::I(i) if op_code == OP_BLTZ => spec.format == format && i.rt == 0,
                    _ => spec.format == format,
                }
        })
        .ok_or(SimError::Decode { word })?;

    // Syscall is only distinguishable once its funct is known
    let fields = match (spec.format, fields) {
        (Format::Syscall, Fields::R(r)) => Fields::Syscall(r),
        (_, fields) => fields,
    };

    Ok(DecodedInstruction {
        word,
        mnemonic: spec.mnemonic,
        fields,
        assembly: render(spec.mnemonic, &fields),
    })
}

/// Format the assembly text for a decoded instruction
fn render(mnemonic: Mnemonic, fields: &Fields) -> String {
    let name = mnemonic.name();

    match fields {
        Fields::Syscall(_) => name.to_string(),
        Fields::R(r) => match mnemonic {
            Mnemonic::Sll | Mnemonic::Srl | Mnemonic::Sra => {
                format!("{} ${}, ${}, {}", name, r.rd, r.rt, r.shamt)
            }
            Mnemonic::Sllv | Mnemonic::Srlv | Mnemonic::Srav => {
                format!("{} ${}, ${}, ${}", name, r.rd, r.rt, r.rs)
            }
            Mnemonic::Mult | Mnemonic::Multu | Mnemonic::Div | Mnemonic::Divu => {
                format!("{} ${}, ${}", name, r.rs, r.rt)
            }
            Mnemonic::Mfhi | Mnemonic::Mflo => format!("{} ${}", name, r.rd),
            Mnemonic::Jr => format!("{} ${}", name, r.rs),
            Mnemonic::Break => name.to_string(),
            _ => format!("{} ${}, ${}, ${}", name, r.rd, r.rs, r.rt),
        },
        Fields::I(i) => match mnemonic {
            Mnemonic::Andi | Mnemonic::Ori | Mnemonic::Xori => {
                format!("{} ${}, ${}, {}", name, i.rt, i.rs, i.unsigned_immediate())
            }
            Mnemonic::Lui => format!("{} ${}, {}", name, i.rt, i.unsigned_immediate()),
            Mnemonic::Lb | Mnemonic::Lbu | Mnemonic::Lw | Mnemonic::Sb | Mnemonic::Sw => {
                format!("{} ${}, {}(${})", name, i.rt, i.immediate, i.rs)
            }
            Mnemonic::Beq | Mnemonic::Bne => {
                format!("{} ${}, ${}, {}", name, i.rs, i.rt, i.immediate)
            }
            Mnemonic::Bltz | Mnemonic::Blez | Mnemonic::Bgtz => {
                format!("{} ${}, {}", name, i.rs, i.immediate)
            }
            _ => format!("{} ${}, ${}, {}", name, i.rt, i.rs, i.immediate),
        },
        Fields::J(j) => format!("{} {}", name, j.address),
    }
}
