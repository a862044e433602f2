use crate::opcode::Opcode;

/*
 * mem docs:
 * 0x000-0x04F (0-79): built-in font set, 16 glyphs x 5 bytes
 * 0x050-0x1FF (80-511): reserved for the interpreter, left zeroed
 * 0x200-0xFFF (512-4095): program space, ROMs load at 0x200
 *
 * addresses are masked to 12 bits on every access, so reads and writes
 * past 0xFFF wrap around instead of faulting. this matches the original
 * hardware and keeps ROMs that run I off the end of memory alive.
*/

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: usize = 0x200;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
const STACK_DEPTH: usize = 16;
const NUM_KEYS: usize = 16;
const FONT_GLYPH_SIZE: u16 = 5;

#[rustfmt::skip]
const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Machine faults surfaced to the host. The host decides whether to reset;
/// the machine itself never recovers from one of these.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("rom is too large ({size} bytes, max {max} bytes)")]
    RomTooLarge { size: usize, max: usize },

    #[error("call stack overflow at {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("call stack underflow at {pc:#06X}")]
    StackUnderflow { pc: u16 },
}

pub struct Chip8 {
    memory: [u8; MEMORY_SIZE],
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; STACK_DEPTH],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    gfx: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    keys: [bool; NUM_KEYS],
    // FX0A parks the executor here until a key arrives
    waiting_key: Option<usize>,
    pub debug: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        let mut machine = Self {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START as u16,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            gfx: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            keys: [false; NUM_KEYS],
            waiting_key: None,
            debug: false,
        };
        machine.memory[..FONT_SET.len()].copy_from_slice(&FONT_SET);
        machine
    }

    /// Copies a ROM into memory starting at 0x200. Anything up to 3584 bytes
    /// is accepted as-is; there is no header or checksum to validate.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        let max = MEMORY_SIZE - PROGRAM_START;
        if rom.len() > max {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max,
            });
        }
        self.memory[PROGRAM_START..PROGRAM_START + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// One atomic fetch-decode-execute transition. While awaiting a key
    /// (FX0A) nothing is fetched; the pending register is filled and PC
    /// advanced once a key shows up.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if let Some(x) = self.waiting_key {
            if let Some(key) = self.first_pressed() {
                self.v[x] = key;
                self.waiting_key = None;
                self.pc = self.pc.wrapping_add(2);
            }
            return Ok(());
        }

        let raw = self.fetch();
        if self.debug {
            log::debug!("{:#06X}: {:04X}", self.pc, raw);
        }
        self.exec(Opcode::decode(raw))
    }

    /// Decrements both timers at the 60 Hz driver cadence. Returns true
    /// exactly when the sound timer transitions from 1 to 0, which is the
    /// host's cue to play its tone.
    pub fn tick_timers(&mut self) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
            return self.sound_timer == 0;
        }
        false
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if (key as usize) < NUM_KEYS {
            self.keys[key as usize] = pressed;
        }
    }

    /// One byte per pixel, 0 or 1, row-major 64x32.
    pub fn framebuffer(&self) -> &[u8] {
        &self.gfx
    }

    fn fetch(&self) -> u16 {
        let high = self.read8(self.pc);
        let low = self.read8(self.pc.wrapping_add(1));
        (high as u16) << 8 | low as u16
    }

    fn exec(&mut self, op: Opcode) -> Result<(), Chip8Error> {
        // default rule: past the current instruction; branches overwrite,
        // skips add another 2 on top
        let prev_pc = self.pc;
        self.pc = self.pc.wrapping_add(2);

        match op {
            Opcode::Cls => self.gfx.fill(0),
            Opcode::Ret => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow { pc: prev_pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }
            Opcode::Jump(nnn) => self.pc = nnn,
            Opcode::Call(nnn) => {
                if self.sp == STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow { pc: prev_pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }
            Opcode::SkipEq(x, nn) => {
                if self.v[x] == nn {
                    self.pc = self.pc.wrapping_add(2);
                }
            }
            Opcode::SkipNe(x, nn) => {
                if self.v[x] != nn {
                    self.pc = self.pc.wrapping_add(2);
                }
            }
            Opcode::SkipEqReg(x, y) => {
                if self.v[x] == self.v[y] {
                    self.pc = self.pc.wrapping_add(2);
                }
            }
            Opcode::Load(x, nn) => self.v[x] = nn,
            Opcode::Add(x, nn) => self.v[x] = self.v[x].wrapping_add(nn),
            Opcode::Move(x, y) => self.v[x] = self.v[y],
            Opcode::Or(x, y) => self.v[x] |= self.v[y],
            Opcode::And(x, y) => self.v[x] &= self.v[y],
            Opcode::Xor(x, y) => self.v[x] ^= self.v[y],
            Opcode::AddReg(x, y) => {
                // VF is written after the result so it wins when X == 0xF
                let (result, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = result;
                self.v[0xF] = carry as u8;
            }
            Opcode::SubReg(x, y) => {
                let flag = (self.v[x] > self.v[y]) as u8;
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
                self.v[0xF] = flag;
            }
            Opcode::Shr(x) => {
                let flag = self.v[x] & 0x1;
                self.v[x] >>= 1;
                self.v[0xF] = flag;
            }
            Opcode::SubFrom(x, y) => {
                let flag = (self.v[y] > self.v[x]) as u8;
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
                self.v[0xF] = flag;
            }
            Opcode::Shl(x) => {
                let flag = (self.v[x] >> 7) & 0x1;
                self.v[x] <<= 1;
                self.v[0xF] = flag;
            }
            Opcode::SkipNeReg(x, y) => {
                if self.v[x] != self.v[y] {
                    self.pc = self.pc.wrapping_add(2);
                }
            }
            Opcode::LoadI(nnn) => self.i = nnn,
            Opcode::JumpV0(nnn) => self.pc = nnn.wrapping_add(self.v[0] as u16),
            Opcode::Rand(x, nn) => self.v[x] = fastrand::u8(..) & nn,
            Opcode::Draw(x, y, n) => self.draw_sprite(self.v[x], self.v[y], n),
            Opcode::SkipKey(x) => {
                if self.key_pressed(self.v[x]) {
                    self.pc = self.pc.wrapping_add(2);
                }
            }
            Opcode::SkipNoKey(x) => {
                if !self.key_pressed(self.v[x]) {
                    self.pc = self.pc.wrapping_add(2);
                }
            }
            Opcode::LoadDelay(x) => self.v[x] = self.delay_timer,
            Opcode::WaitKey(x) => {
                if let Some(key) = self.first_pressed() {
                    self.v[x] = key;
                } else {
                    self.waiting_key = Some(x);
                    self.pc = prev_pc;
                }
            }
            Opcode::SetDelay(x) => self.delay_timer = self.v[x],
            Opcode::SetSound(x) => self.sound_timer = self.v[x],
            // no carry flag, no masking of I below 12 bits
            Opcode::AddI(x) => self.i = self.i.wrapping_add(self.v[x] as u16),
            Opcode::LoadFont(x) => self.i = self.v[x] as u16 * FONT_GLYPH_SIZE,
            Opcode::Bcd(x) => {
                let value = self.v[x];
                self.write8(self.i, value / 100);
                self.write8(self.i.wrapping_add(1), value / 10 % 10);
                self.write8(self.i.wrapping_add(2), value % 10);
            }
            Opcode::Store(x) => {
                for offset in 0..=x {
                    self.write8(self.i.wrapping_add(offset as u16), self.v[offset]);
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
            }
            Opcode::Fill(x) => {
                for offset in 0..=x {
                    self.v[offset] = self.read8(self.i.wrapping_add(offset as u16));
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
            }
            Opcode::Nop => {}
        }
        Ok(())
    }

    /// XOR-composites an n-row sprite from memory[I..] at (x0, y0).
    /// Coordinates wrap at the display edges. VF reports whether any pixel
    /// was flipped from 1 to 0.
    fn draw_sprite(&mut self, x0: u8, y0: u8, n: u8) {
        self.v[0xF] = 0;
        for row in 0..n as usize {
            let sprite = self.read8(self.i.wrapping_add(row as u16));
            for col in 0..8 {
                if sprite & (0x80 >> col) == 0 {
                    continue;
                }
                let x = (x0 as usize + col) % DISPLAY_WIDTH;
                let y = (y0 as usize + row) % DISPLAY_HEIGHT;
                let index = y * DISPLAY_WIDTH + x;
                if self.gfx[index] == 1 {
                    self.v[0xF] = 1;
                }
                self.gfx[index] ^= 1;
            }
        }
    }

    fn key_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|k| k as u8)
    }

    fn read8(&self, addr: u16) -> u8 {
        self.memory[(addr & 0xFFF) as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[(addr & 0xFFF) as usize] = value;
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
