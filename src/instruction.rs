use std::fmt;

/// A decoded CHIP-8 instruction. Register operands are indices into the V registers (0x0-0xF),
/// addresses are 12 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /* 00E0 */ Cls,
    /* 00EE */ Ret,
    /* 1nnn */ Jp { addr: u16 },
    /* 2nnn */ Call { addr: u16 },
    /* 3xkk */ SeByte { x: usize, byte: u8 },
    /* 4xkk */ SneByte { x: usize, byte: u8 },
    /* 5xy0 */ SeReg { x: usize, y: usize },
    /* 6xkk */ LdByte { x: usize, byte: u8 },
    /* 7xkk */ AddByte { x: usize, byte: u8 },
    /* 8xy0 */ LdReg { x: usize, y: usize },
    /* 8xy1 */ Or { x: usize, y: usize },
    /* 8xy2 */ And { x: usize, y: usize },
    /* 8xy3 */ Xor { x: usize, y: usize },
    /* 8xy4 */ AddReg { x: usize, y: usize },
    /* 8xy5 */ Sub { x: usize, y: usize },
    /* 8xy6 */ Shr { x: usize, y: usize },
    /* 8xy7 */ Subn { x: usize, y: usize },
    /* 8xyE */ Shl { x: usize, y: usize },
    /* 9xy0 */ SneReg { x: usize, y: usize },
    /* Annn */ LdI { addr: u16 },
    /* Bnnn */ JpV0 { addr: u16 },
    /* Cxkk */ Rnd { x: usize, byte: u8 },
    /* Dxyn */ Drw { x: usize, y: usize, height: u8 },
    /* Ex9E */ Skp { x: usize },
    /* ExA1 */ Sknp { x: usize },
    /* Fx07 */ LdVxDt { x: usize },
    /* Fx0A */ LdVxK { x: usize },
    /* Fx15 */ LdDtVx { x: usize },
    /* Fx18 */ LdStVx { x: usize },
    /* Fx1E */ AddIVx { x: usize },
    /* Fx29 */ LdFVx { x: usize },
    /* Fx33 */ LdBVx { x: usize },
    /* Fx55 */ LdMemVx { x: usize },
    /* Fx65 */ LdVxMem { x: usize },
}

impl Instruction {
    /// Decode a raw instruction word. Returns `None` for any bit pattern that is not a known
    /// instruction, including the machine-code `SYS addr` form of 0nnn.
    pub fn decode(instr: u16) -> Option<Instruction> {
        use Instruction::*;

        let x = decode_instr_x_reg(instr);
        let y = decode_instr_y_reg(instr);
        let byte = decode_instr_byte_imm(instr);
        let nibble = decode_instr_nibble_imm(instr);
        let addr = decode_instr_addr(instr);

        // The instruction type is determined by the most significant nibble. Families 0, 8, E and
        // F are further selected by their trailing nibble or byte.
        let decoded = match decode_instr_class(instr) {
            0x0 => match instr {
                0x00E0 => Cls,
                0x00EE => Ret,
                _ => return None,
            },
            0x1 => Jp { addr },
            0x2 => Call { addr },
            0x3 => SeByte { x, byte },
            0x4 => SneByte { x, byte },
            0x5 if nibble == 0 => SeReg { x, y },
            0x6 => LdByte { x, byte },
            0x7 => AddByte { x, byte },
            0x8 => match nibble {
                0x0 => LdReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => Shr { x, y },
                0x7 => Subn { x, y },
                0xE => Shl { x, y },
                _ => return None,
            },
            0x9 if nibble == 0 => SneReg { x, y },
            0xA => LdI { addr },
            0xB => JpV0 { addr },
            0xC => Rnd { x, byte },
            0xD => Drw {
                x,
                y,
                height: nibble,
            },
            0xE => match byte {
                0x9E => Skp { x },
                0xA1 => Sknp { x },
                _ => return None,
            },
            0xF => match byte {
                0x07 => LdVxDt { x },
                0x0A => LdVxK { x },
                0x15 => LdDtVx { x },
                0x18 => LdStVx { x },
                0x1E => AddIVx { x },
                0x29 => LdFVx { x },
                0x33 => LdBVx { x },
                0x55 => LdMemVx { x },
                0x65 => LdVxMem { x },
                _ => return None,
            },
            _ => return None,
        };

        Some(decoded)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SeByte { x, byte } => write!(f, "SE V{:X}, {:#04X}", x, byte),
            SneByte { x, byte } => write!(f, "SNE V{:X}, {:#04X}", x, byte),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, byte } => write!(f, "LD V{:X}, {:#04X}", x, byte),
            AddByte { x, byte } => write!(f, "ADD V{:X}, {:#04X}", x, byte),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { addr } => write!(f, "LD I, {:#05X}", addr),
            JpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Rnd { x, byte } => write!(f, "RND V{:X}, {:#04X}", x, byte),
            Drw { x, y, height } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, height),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdVxK { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddIVx { x } => write!(f, "ADD I, V{:X}", x),
            LdFVx { x } => write!(f, "LD F, V{:X}", x),
            LdBVx { x } => write!(f, "LD B, V{:X}", x),
            LdMemVx { x } => write!(f, "LD [I], V{:X}", x),
            LdVxMem { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

/// Decodes the instruction class (most significant nibble) from a CHIP-8 instruction
pub fn decode_instr_class(instr: u16) -> u8 {
    ((instr & 0xF000) >> 12) as u8
}

/// Decodes a memory address from a CHIP-8 instruction
pub fn decode_instr_addr(instr: u16) -> u16 {
    instr & 0x0FFF
}

/// Decodes the first register from a CHIP-8 instruction
pub fn decode_instr_x_reg(instr: u16) -> usize {
    ((instr & 0x0F00) >> 8) as usize
}

/// Decodes the second register from a CHIP-8 instruction
pub fn decode_instr_y_reg(instr: u16) -> usize {
    ((instr & 0x00F0) >> 4) as usize
}

/// Decodes a byte-sized immediate from a CHIP-8 instruction
pub fn decode_instr_byte_imm(instr: u16) -> u8 {
    (instr & 0x00FF) as u8
}

/// Decodes a nibble-sized immediate from a CHIP-8 instruction
pub fn decode_instr_nibble_imm(instr: u16) -> u8 {
    (instr & 0x000F) as u8
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn field_extraction() {
        let instr = 0xD12A;
        assert_eq!(decode_instr_class(instr), 0xD);
        assert_eq!(decode_instr_x_reg(instr), 0x1);
        assert_eq!(decode_instr_y_reg(instr), 0x2);
        assert_eq!(decode_instr_nibble_imm(instr), 0xA);
        assert_eq!(decode_instr_byte_imm(instr), 0x2A);
        assert_eq!(decode_instr_addr(instr), 0x12A);
    }

    #[test]
    fn decodes_every_family() {
        assert_eq!(Instruction::decode(0x00E0), Some(Cls));
        assert_eq!(Instruction::decode(0x00EE), Some(Ret));
        assert_eq!(Instruction::decode(0x1ABC), Some(Jp { addr: 0xABC }));
        assert_eq!(Instruction::decode(0x2ABC), Some(Call { addr: 0xABC }));
        assert_eq!(Instruction::decode(0x3A12), Some(SeByte { x: 0xA, byte: 0x12 }));
        assert_eq!(Instruction::decode(0x4A12), Some(SneByte { x: 0xA, byte: 0x12 }));
        assert_eq!(Instruction::decode(0x5AB0), Some(SeReg { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x6A02), Some(LdByte { x: 0xA, byte: 0x02 }));
        assert_eq!(Instruction::decode(0x7A02), Some(AddByte { x: 0xA, byte: 0x02 }));
        assert_eq!(Instruction::decode(0x8AB0), Some(LdReg { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB1), Some(Or { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB2), Some(And { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB3), Some(Xor { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB4), Some(AddReg { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB5), Some(Sub { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB6), Some(Shr { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8AB7), Some(Subn { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8ABE), Some(Shl { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x9AB0), Some(SneReg { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0xA123), Some(LdI { addr: 0x123 }));
        assert_eq!(Instruction::decode(0xB123), Some(JpV0 { addr: 0x123 }));
        assert_eq!(Instruction::decode(0xC30F), Some(Rnd { x: 0x3, byte: 0x0F }));
        assert_eq!(
            Instruction::decode(0xD125),
            Some(Drw {
                x: 0x1,
                y: 0x2,
                height: 5
            })
        );
        assert_eq!(Instruction::decode(0xE49E), Some(Skp { x: 0x4 }));
        assert_eq!(Instruction::decode(0xE4A1), Some(Sknp { x: 0x4 }));
        assert_eq!(Instruction::decode(0xF507), Some(LdVxDt { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF50A), Some(LdVxK { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF515), Some(LdDtVx { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF518), Some(LdStVx { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF51E), Some(AddIVx { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF529), Some(LdFVx { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF533), Some(LdBVx { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF555), Some(LdMemVx { x: 0x5 }));
        assert_eq!(Instruction::decode(0xF565), Some(LdVxMem { x: 0x5 }));
    }

    #[test]
    fn rejects_unknown_patterns() {
        for &instr in &[
            0x0000, 0x0123, 0x01E0, 0x00E1, 0x5AB1, 0x9AB4, 0x8AB8, 0x8ABF, 0xE49F, 0xF500,
            0xF566, 0xFFFF,
        ] {
            assert_eq!(Instruction::decode(instr), None, "{:#06X}", instr);
        }
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instruction::decode(0x8AB4).unwrap().to_string(), "ADD VA, VB");
        assert_eq!(Instruction::decode(0xD125).unwrap().to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::decode(0xA123).unwrap().to_string(), "LD I, 0x123");
        assert_eq!(Instruction::decode(0xF355).unwrap().to_string(), "LD [I], V3");
    }
}
