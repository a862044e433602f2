/*
 * instruction layout:
 * each instruction is 16 bits, big-endian in memory. fields:
 *   opClass = bits 15-12   (top nibble, selects the class)
 *   X       = bits 11-8    (register index)
 *   Y       = bits 7-4     (register index)
 *   N       = bits 3-0     (4-bit literal)
 *   NN      = bits 7-0     (8-bit literal)
 *   NNN     = bits 11-0    (12-bit address)
 * classes 0x0, 0x8, 0xE and 0xF sub-dispatch on NN or N.
 */

/// One decoded CHIP-8 instruction. `Nop` covers every raw value that does not
/// match one of the 35 documented patterns; the hardware silently ignores
/// those, so we do too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 00E0: clear the display
    Cls,
    /// 00EE: return from subroutine
    Ret,
    /// 1NNN: jump
    Jump(u16),
    /// 2NNN: call subroutine
    Call(u16),
    /// 3XNN: skip next if Vx == NN
    SkipEq(usize, u8),
    /// 4XNN: skip next if Vx != NN
    SkipNe(usize, u8),
    /// 5XY0: skip next if Vx == Vy
    SkipEqReg(usize, usize),
    /// 6XNN: Vx = NN
    Load(usize, u8),
    /// 7XNN: Vx += NN, wrapping, carry untouched
    Add(usize, u8),
    /// 8XY0: Vx = Vy
    Move(usize, usize),
    /// 8XY1: Vx |= Vy
    Or(usize, usize),
    /// 8XY2: Vx &= Vy
    And(usize, usize),
    /// 8XY3: Vx ^= Vy
    Xor(usize, usize),
    /// 8XY4: Vx += Vy, VF = carry
    AddReg(usize, usize),
    /// 8XY5: Vx -= Vy, VF = no-borrow
    SubReg(usize, usize),
    /// 8XY6: VF = Vx & 1, Vx >>= 1 (Y ignored)
    Shr(usize),
    /// 8XY7: Vx = Vy - Vx, VF = no-borrow
    SubFrom(usize, usize),
    /// 8XYE: VF = top bit of Vx, Vx <<= 1 (Y ignored)
    Shl(usize),
    /// 9XY0: skip next if Vx != Vy
    SkipNeReg(usize, usize),
    /// ANNN: I = NNN
    LoadI(u16),
    /// BNNN: jump to V0 + NNN
    JumpV0(u16),
    /// CXNN: Vx = random byte & NN
    Rand(usize, u8),
    /// DXYN: draw N-row sprite at (Vx, Vy)
    Draw(usize, usize, u8),
    /// EX9E: skip next if key[Vx] pressed
    SkipKey(usize),
    /// EXA1: skip next if key[Vx] not pressed
    SkipNoKey(usize),
    /// FX07: Vx = delay timer
    LoadDelay(usize),
    /// FX0A: wait for a key press, Vx = key
    WaitKey(usize),
    /// FX15: delay timer = Vx
    SetDelay(usize),
    /// FX18: sound timer = Vx
    SetSound(usize),
    /// FX1E: I += Vx
    AddI(usize),
    /// FX29: I = font glyph address of Vx
    LoadFont(usize),
    /// FX33: memory[I..I+3] = BCD digits of Vx
    Bcd(usize),
    /// FX55: memory[I..=I+X] = V0..=Vx, then I += X + 1
    Store(usize),
    /// FX65: V0..=Vx = memory[I..=I+X], then I += X + 1
    Fill(usize),
    /// anything unmapped: advance PC and do nothing
    Nop,
}

impl Opcode {
    pub fn decode(raw: u16) -> Self {
        let x = ((raw >> 8) & 0xF) as usize;
        let y = ((raw >> 4) & 0xF) as usize;
        let n = (raw & 0xF) as u8;
        let nn = (raw & 0xFF) as u8;
        let nnn = raw & 0xFFF;

        match raw >> 12 {
            0x0 => match nn {
                0xE0 => Opcode::Cls,
                0xEE => Opcode::Ret,
                _ => Opcode::Nop,
            },
            0x1 => Opcode::Jump(nnn),
            0x2 => Opcode::Call(nnn),
            0x3 => Opcode::SkipEq(x, nn),
            0x4 => Opcode::SkipNe(x, nn),
            0x5 if n == 0x0 => Opcode::SkipEqReg(x, y),
            0x6 => Opcode::Load(x, nn),
            0x7 => Opcode::Add(x, nn),
            0x8 => match n {
                0x0 => Opcode::Move(x, y),
                0x1 => Opcode::Or(x, y),
                0x2 => Opcode::And(x, y),
                0x3 => Opcode::Xor(x, y),
                0x4 => Opcode::AddReg(x, y),
                0x5 => Opcode::SubReg(x, y),
                0x6 => Opcode::Shr(x),
                0x7 => Opcode::SubFrom(x, y),
                0xE => Opcode::Shl(x),
                _ => Opcode::Nop,
            },
            0x9 if n == 0x0 => Opcode::SkipNeReg(x, y),
            0xA => Opcode::LoadI(nnn),
            0xB => Opcode::JumpV0(nnn),
            0xC => Opcode::Rand(x, nn),
            0xD => Opcode::Draw(x, y, n),
            0xE => match nn {
                0x9E => Opcode::SkipKey(x),
                0xA1 => Opcode::SkipNoKey(x),
                _ => Opcode::Nop,
            },
            0xF => match nn {
                0x07 => Opcode::LoadDelay(x),
                0x0A => Opcode::WaitKey(x),
                0x15 => Opcode::SetDelay(x),
                0x18 => Opcode::SetSound(x),
                0x1E => Opcode::AddI(x),
                0x29 => Opcode::LoadFont(x),
                0x33 => Opcode::Bcd(x),
                0x55 => Opcode::Store(x),
                0x65 => Opcode::Fill(x),
                _ => Opcode::Nop,
            },
            _ => Opcode::Nop,
        }
    }
}
