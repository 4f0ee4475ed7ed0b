//! Instruction words and their decoded form.
//!
//! Opcodes are 16-bit words decoded by nibble position. The conventional
//! operand fields are:
//! - `X`, bits 8-11: a register index, or the top of a `V0..=VX` range
//! - `Y`, bits 4-7: a second register index
//! - `N`, bits 0-3: a 4-bit immediate (sprite height)
//! - `NN`, bits 0-7: an 8-bit immediate
//! - `NNN`, bits 0-11: a 12-bit address

/// A raw 16-bit instruction word with accessors for the operand fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (((self.0 & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

/// An instruction with its operand fields extracted once at decode time, so
/// handlers never re-derive them from the raw word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipIfEqualImmediate { x: u8, nn: u8 },
    /// 4XNN
    SkipIfNotEqualImmediate { x: u8, nn: u8 },
    /// 5XY0
    SkipIfEqualRegister { x: u8, y: u8 },
    /// 6XNN
    LoadImmediate { x: u8, nn: u8 },
    /// 7XNN
    AddImmediate { x: u8, nn: u8 },
    /// 8XY0
    LoadRegister { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddRegister { x: u8, y: u8 },
    /// 8XY5
    SubRegister { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8 },
    /// 8XY7
    SubRegisterNegated { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8 },
    /// 9XY0
    SkipIfNotEqualRegister { x: u8, y: u8 },
    /// ANNN
    LoadIndex { nnn: u16 },
    /// BNNN
    JumpWithOffset { nnn: u16 },
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    DrawSprite { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipIfKeyPressed { x: u8 },
    /// EXA1
    SkipIfKeyNotPressed { x: u8 },
    /// FX07
    LoadDelayTimer { x: u8 },
    /// FX0A
    WaitForKey { x: u8 },
    /// FX15
    SetDelayTimer { x: u8 },
    /// FX18
    SetSoundTimer { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadFontGlyph { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
    /// Anything else; reported and executed as a no-op.
    Unknown { opcode: u16 },
}

impl Instruction {
    pub fn decode(opcode: Opcode) -> Self {
        use Instruction::*;

        let (x, y) = (opcode.x(), opcode.y());
        let (n, nn, nnn) = (opcode.n(), opcode.nn(), opcode.nnn());

        match opcode.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => ClearDisplay,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, ..) => Jump { nnn },
            (0x2, ..) => Call { nnn },
            (0x3, ..) => SkipIfEqualImmediate { x, nn },
            (0x4, ..) => SkipIfNotEqualImmediate { x, nn },
            (0x5, .., 0x0) => SkipIfEqualRegister { x, y },
            (0x6, ..) => LoadImmediate { x, nn },
            (0x7, ..) => AddImmediate { x, nn },
            (0x8, .., 0x0) => LoadRegister { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddRegister { x, y },
            (0x8, .., 0x5) => SubRegister { x, y },
            (0x8, .., 0x6) => ShiftRight { x },
            (0x8, .., 0x7) => SubRegisterNegated { x, y },
            (0x8, .., 0xE) => ShiftLeft { x },
            (0x9, .., 0x0) => SkipIfNotEqualRegister { x, y },
            (0xA, ..) => LoadIndex { nnn },
            (0xB, ..) => JumpWithOffset { nnn },
            (0xC, ..) => Random { x, nn },
            (0xD, ..) => DrawSprite { x, y, n },
            (0xE, .., 0x9, 0xE) => SkipIfKeyPressed { x },
            (0xE, .., 0xA, 0x1) => SkipIfKeyNotPressed { x },
            (0xF, .., 0x0, 0x7) => LoadDelayTimer { x },
            (0xF, .., 0x0, 0xA) => WaitForKey { x },
            (0xF, .., 0x1, 0x5) => SetDelayTimer { x },
            (0xF, .., 0x1, 0x8) => SetSoundTimer { x },
            (0xF, .., 0x1, 0xE) => AddIndex { x },
            (0xF, .., 0x2, 0x9) => LoadFontGlyph { x },
            (0xF, .., 0x3, 0x3) => StoreBcd { x },
            (0xF, .., 0x5, 0x5) => StoreRegisters { x },
            (0xF, .., 0x6, 0x5) => LoadRegisters { x },
            _ => Unknown { opcode: opcode.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_fields() {
        let opcode = Opcode(0xABCD);

        assert_eq!(opcode.nibbles(), (0xA, 0xB, 0xC, 0xD));
        assert_eq!(opcode.x(), 0xB);
        assert_eq!(opcode.y(), 0xC);
        assert_eq!(opcode.n(), 0xD);
        assert_eq!(opcode.nn(), 0xCD);
        assert_eq!(opcode.nnn(), 0xBCD);
    }

    #[test_case(0x00E0, Instruction::ClearDisplay ; "00E0 clear")]
    #[test_case(0x00EE, Instruction::Return ; "00EE return")]
    #[test_case(0x1789, Instruction::Jump { nnn: 0x789 } ; "1NNN jump")]
    #[test_case(0x2123, Instruction::Call { nnn: 0x123 } ; "2NNN call")]
    #[test_case(0x3A42, Instruction::SkipIfEqualImmediate { x: 0xA, nn: 0x42 } ; "3XNN skip eq imm")]
    #[test_case(0x4A42, Instruction::SkipIfNotEqualImmediate { x: 0xA, nn: 0x42 } ; "4XNN skip ne imm")]
    #[test_case(0x5AB0, Instruction::SkipIfEqualRegister { x: 0xA, y: 0xB } ; "5XY0 skip eq reg")]
    #[test_case(0x6A42, Instruction::LoadImmediate { x: 0xA, nn: 0x42 } ; "6XNN load imm")]
    #[test_case(0x7A42, Instruction::AddImmediate { x: 0xA, nn: 0x42 } ; "7XNN add imm")]
    #[test_case(0x8AB0, Instruction::LoadRegister { x: 0xA, y: 0xB } ; "8XY0 load reg")]
    #[test_case(0x8AB1, Instruction::Or { x: 0xA, y: 0xB } ; "8XY1 or")]
    #[test_case(0x8AB2, Instruction::And { x: 0xA, y: 0xB } ; "8XY2 and")]
    #[test_case(0x8AB3, Instruction::Xor { x: 0xA, y: 0xB } ; "8XY3 xor")]
    #[test_case(0x8AB4, Instruction::AddRegister { x: 0xA, y: 0xB } ; "8XY4 add reg")]
    #[test_case(0x8AB5, Instruction::SubRegister { x: 0xA, y: 0xB } ; "8XY5 sub reg")]
    #[test_case(0x8AB6, Instruction::ShiftRight { x: 0xA } ; "8XY6 shr")]
    #[test_case(0x8AB7, Instruction::SubRegisterNegated { x: 0xA, y: 0xB } ; "8XY7 subn")]
    #[test_case(0x8ABE, Instruction::ShiftLeft { x: 0xA } ; "8XYE shl")]
    #[test_case(0x9AB0, Instruction::SkipIfNotEqualRegister { x: 0xA, y: 0xB } ; "9XY0 skip ne reg")]
    #[test_case(0xA678, Instruction::LoadIndex { nnn: 0x678 } ; "ANNN load index")]
    #[test_case(0xB678, Instruction::JumpWithOffset { nnn: 0x678 } ; "BNNN jump offset")]
    #[test_case(0xCA42, Instruction::Random { x: 0xA, nn: 0x42 } ; "CXNN random")]
    #[test_case(0xDAB5, Instruction::DrawSprite { x: 0xA, y: 0xB, n: 0x5 } ; "DXYN draw")]
    #[test_case(0xEA9E, Instruction::SkipIfKeyPressed { x: 0xA } ; "EX9E skip key")]
    #[test_case(0xEAA1, Instruction::SkipIfKeyNotPressed { x: 0xA } ; "EXA1 skip no key")]
    #[test_case(0xFA07, Instruction::LoadDelayTimer { x: 0xA } ; "FX07 load delay")]
    #[test_case(0xFA0A, Instruction::WaitForKey { x: 0xA } ; "FX0A wait key")]
    #[test_case(0xFA15, Instruction::SetDelayTimer { x: 0xA } ; "FX15 set delay")]
    #[test_case(0xFA18, Instruction::SetSoundTimer { x: 0xA } ; "FX18 set sound")]
    #[test_case(0xFA1E, Instruction::AddIndex { x: 0xA } ; "FX1E add index")]
    #[test_case(0xFA29, Instruction::LoadFontGlyph { x: 0xA } ; "FX29 font glyph")]
    #[test_case(0xFA33, Instruction::StoreBcd { x: 0xA } ; "FX33 bcd")]
    #[test_case(0xFA55, Instruction::StoreRegisters { x: 0xA } ; "FX55 store regs")]
    #[test_case(0xFA65, Instruction::LoadRegisters { x: 0xA } ; "FX65 load regs")]
    fn test_decode(raw: u16, expected: Instruction) {
        assert_eq!(Instruction::decode(Opcode(raw)), expected);
    }

    #[test_case(0x0000 ; "0000 no-op")]
    #[test_case(0x5AB1 ; "5XY1 bad low nibble")]
    #[test_case(0x8AB8 ; "8XY8 bad math op")]
    #[test_case(0x9AB4 ; "9XY4 bad low nibble")]
    #[test_case(0xEAFF ; "EXFF bad key op")]
    #[test_case(0xFAFF ; "FXFF bad misc op")]
    fn test_decode_unknown(raw: u16) {
        assert_eq!(
            Instruction::decode(Opcode(raw)),
            Instruction::Unknown { opcode: raw }
        );
    }
}
