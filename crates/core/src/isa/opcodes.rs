//! Opcode and function-code constants for the reduced MIPS32 encoding.
//!
//! Values are written as binary literals so they read the same way the
//! architecture manual's field tables do.

/// J-type absolute jump.
pub const OP_J: u32 = 0b000010;
/// I-type `SW rt, offset(rs)`.
pub const OP_SW: u32 = 0b101011;
/// I-type `LW rt, offset(rs)`.
pub const OP_LW: u32 = 0b100011;
/// I-type `BEQ rs, rt, offset`.
pub const OP_BEQ: u32 = 0b000100;
/// I-type `BGTZ rs, offset`.
pub const OP_BGTZ: u32 = 0b000111;
/// REGIMM family; `BLTZ` is the `rt == 0` member.
pub const OP_REGIMM: u32 = 0b000001;
/// R-type family (`ADD`, `SUB`, `AND`, `NOR`, `SLT`, `SLL`, `SRL`, `SRA`, `JR`, `NOP`, `BREAK`).
pub const OP_RTYPE: u32 = 0b000000;
/// R-type `MUL rd, rs, rt` — shares the R-type field layout but a distinct opcode.
pub const OP_MUL_RTYPE: u32 = 0b011100;

/// Category-2 immediate `ADD rt, rs, imm`.
pub const OP_ADDI: u32 = 0b110000;
/// Category-2 immediate `SUB rt, rs, imm`.
pub const OP_SUBI: u32 = 0b110001;
/// Category-2 immediate `MUL rt, rs, imm`.
pub const OP_MULI: u32 = 0b100001;
/// Category-2 immediate `AND rt, rs, imm`.
pub const OP_ANDI: u32 = 0b110010;
/// Category-2 immediate `NOR rt, rs, imm`.
pub const OP_NORI: u32 = 0b110011;
/// Category-2 immediate `SLT rt, rs, imm`.
pub const OP_SLTI: u32 = 0b110101;

/// `rt` field value that selects `BLTZ` within the REGIMM family.
pub const RT_BLTZ: u32 = 0b00000;

/// R-type function code: `ADD`.
pub const FUNC_ADD: u32 = 0b100000;
/// R-type function code: `SUB`.
pub const FUNC_SUB: u32 = 0b100010;
/// R-type function code: `AND`.
pub const FUNC_AND: u32 = 0b100100;
/// R-type function code: `NOR`.
pub const FUNC_NOR: u32 = 0b100111;
/// R-type function code: `SLL` — also the NOP encoding when every field is zero.
pub const FUNC_SLL: u32 = 0b000000;
/// R-type function code: `SRL`.
pub const FUNC_SRL: u32 = 0b000010;
/// R-type function code: `SRA`.
pub const FUNC_SRA: u32 = 0b000011;
/// R-type function code: `SLT`.
pub const FUNC_SLT: u32 = 0b101010;
/// R-type function code: `JR`.
pub const FUNC_JR: u32 = 0b001000;
/// R-type function code: `BREAK`.
pub const FUNC_BREAK: u32 = 0b001101;
/// Function code for `MUL` under [`OP_MUL_RTYPE`].
pub const FUNC_MUL: u32 = 0b000010;
