use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    display::Display,
    error::Result,
    keyboard::Keyboard,
    memory::{Memory, FONT_GLYPH_SIZE, START_FONT},
    opcode::{Instruction, Opcode},
    registers::{Registers, StackPush},
};

/// The virtual machine: exclusive owner of all mutable state, driven
/// externally one cycle at a time.
///
/// The driver loop is expected to call [`execute_cycle`](Self::execute_cycle)
/// as many times per frame as its instruction rate demands, then
/// [`tick_timers`](Self::tick_timers) once per 60 Hz frame, then read the
/// display and feed key events before the next frame.
pub struct Interpreter {
    registers: Registers,
    memory: Memory,
    display: Display,
    keyboard: Keyboard,
    rng: ChaCha8Rng,
    /// Register awaiting a key press (`FX0A`). While set, cycles check the
    /// keypad instead of fetching, so the same instruction is not re-decoded.
    waiting_for_key: Option<u8>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Builds an interpreter with a fixed random seed, making `CXNN`
    /// reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Interpreter {
            registers: Registers::default(),
            memory: Memory::new(),
            display: Display::new(),
            keyboard: Keyboard::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            waiting_for_key: None,
        }
    }

    pub fn with_rom(bytes: &[u8]) -> Result<Self> {
        let mut interpreter = Self::new();
        interpreter.load_rom(bytes)?;
        Ok(interpreter)
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        self.memory.load_rom(bytes)?;
        debug!("loaded {} byte ROM", bytes.len());
        Ok(())
    }

    /// Runs one fetch/decode/execute cycle.
    ///
    /// While a `WaitForKey` is pending, no instruction is fetched; the cycle
    /// polls the keypad and completes the wait as soon as a key is down.
    pub fn execute_cycle(&mut self) -> Result<()> {
        if let Some(x) = self.waiting_for_key {
            if let Some(key) = self.keyboard.first_pressed() {
                self.registers.vx[usize::from(x)] = key;
                self.waiting_for_key = None;
            }
            return Ok(());
        }

        let pc = self.registers.pc;
        let opcode = Opcode(self.memory.fetch_opcode(pc)?);

        // Branch and jump handlers overwrite this default advance.
        self.registers.pc = pc + 2;

        self.execute(Instruction::decode(opcode), pc)
    }

    fn execute(&mut self, instruction: Instruction, pc: u16) -> Result<()> {
        use crate::opcode::Instruction as I;

        match instruction {
            I::ClearDisplay => self.handle_clear(),
            I::Return => self.handle_ret(),
            I::Jump { nnn } => self.handle_jump(nnn),
            I::Call { nnn } => self.handle_call(nnn),
            I::SkipIfEqualImmediate { x, nn } => self.handle_skip_if_equal_immediate(x, nn),
            I::SkipIfNotEqualImmediate { x, nn } => self.handle_skip_if_not_equal_immediate(x, nn),
            I::SkipIfEqualRegister { x, y } => self.handle_skip_if_equal_register(x, y),
            I::LoadImmediate { x, nn } => self.handle_load_immediate(x, nn),
            I::AddImmediate { x, nn } => self.handle_add_immediate(x, nn),
            I::LoadRegister { x, y } => self.handle_load_register(x, y),
            I::Or { x, y } => self.handle_or(x, y),
            I::And { x, y } => self.handle_and(x, y),
            I::Xor { x, y } => self.handle_xor(x, y),
            I::AddRegister { x, y } => self.handle_add_register(x, y),
            I::SubRegister { x, y } => self.handle_sub_register(x, y),
            I::ShiftRight { x } => self.handle_shift_right(x),
            I::SubRegisterNegated { x, y } => self.handle_sub_register_negated(x, y),
            I::ShiftLeft { x } => self.handle_shift_left(x),
            I::SkipIfNotEqualRegister { x, y } => self.handle_skip_if_not_equal_register(x, y),
            I::LoadIndex { nnn } => self.handle_load_index(nnn),
            I::JumpWithOffset { nnn } => self.handle_jump_with_offset(nnn),
            I::Random { x, nn } => self.handle_random(x, nn),
            I::DrawSprite { x, y, n } => self.handle_draw_sprite(x, y, n)?,
            I::SkipIfKeyPressed { x } => self.handle_skip_if_key_pressed(x),
            I::SkipIfKeyNotPressed { x } => self.handle_skip_if_key_not_pressed(x),
            I::LoadDelayTimer { x } => self.handle_load_delay_timer(x),
            I::WaitForKey { x } => self.handle_wait_for_key(x),
            I::SetDelayTimer { x } => self.handle_set_delay_timer(x),
            I::SetSoundTimer { x } => self.handle_set_sound_timer(x),
            I::AddIndex { x } => self.handle_add_index(x),
            I::LoadFontGlyph { x } => self.handle_load_font_glyph(x),
            I::StoreBcd { x } => self.handle_store_bcd(x)?,
            I::StoreRegisters { x } => self.handle_store_registers(x)?,
            I::LoadRegisters { x } => self.handle_load_registers(x)?,
            I::Unknown { opcode } => {
                warn!("unknown opcode {:#06X} at {:#05X}", opcode, pc);
            }
        }

        Ok(())
    }

    /// 00E0 - clear the display.
    fn handle_clear(&mut self) {
        self.display.clear();
    }

    /// 00EE - return from a subroutine.
    ///
    /// Popping an empty stack yields the 0 sentinel instead of failing,
    /// matching the original interpreter.
    fn handle_ret(&mut self) {
        self.registers.pc = self.registers.pop().unwrap_or(0);
    }

    /// 1NNN - jump to NNN.
    fn handle_jump(&mut self, nnn: u16) {
        self.registers.pc = nnn;
    }

    /// 2NNN - call the subroutine at NNN.
    ///
    /// The pushed return address is the instruction after the call; a push
    /// onto a full stack is dropped.
    fn handle_call(&mut self, nnn: u16) {
        let return_address = self.registers.pc;
        if self.registers.push(return_address) == StackPush::Dropped {
            debug!("call stack full, dropped return address {:#05X}", return_address);
        }
        self.registers.pc = nnn;
    }

    /// 3XNN - skip the next instruction if VX == NN.
    fn handle_skip_if_equal_immediate(&mut self, x: u8, nn: u8) {
        if self.registers.vx[usize::from(x)] == nn {
            self.registers.pc += 2;
        }
    }

    /// 4XNN - skip the next instruction if VX != NN.
    fn handle_skip_if_not_equal_immediate(&mut self, x: u8, nn: u8) {
        if self.registers.vx[usize::from(x)] != nn {
            self.registers.pc += 2;
        }
    }

    /// 5XY0 - skip the next instruction if VX == VY.
    fn handle_skip_if_equal_register(&mut self, x: u8, y: u8) {
        if self.registers.vx[usize::from(x)] == self.registers.vx[usize::from(y)] {
            self.registers.pc += 2;
        }
    }

    /// 6XNN - set VX to NN.
    fn handle_load_immediate(&mut self, x: u8, nn: u8) {
        self.registers.vx[usize::from(x)] = nn;
    }

    /// 7XNN - add NN to VX, wrapping. The carry flag is untouched.
    fn handle_add_immediate(&mut self, x: u8, nn: u8) {
        let x = usize::from(x);
        self.registers.vx[x] = self.registers.vx[x].wrapping_add(nn);
    }

    /// 8XY0 - set VX to VY.
    fn handle_load_register(&mut self, x: u8, y: u8) {
        self.registers.vx[usize::from(x)] = self.registers.vx[usize::from(y)];
    }

    /// 8XY1 - set VX to VX | VY.
    fn handle_or(&mut self, x: u8, y: u8) {
        self.registers.vx[usize::from(x)] |= self.registers.vx[usize::from(y)];
    }

    /// 8XY2 - set VX to VX & VY.
    fn handle_and(&mut self, x: u8, y: u8) {
        self.registers.vx[usize::from(x)] &= self.registers.vx[usize::from(y)];
    }

    /// 8XY3 - set VX to VX ^ VY.
    fn handle_xor(&mut self, x: u8, y: u8) {
        self.registers.vx[usize::from(x)] ^= self.registers.vx[usize::from(y)];
    }

    /// 8XY4 - set VX to VX + VY, wrapping; VF becomes the carry.
    fn handle_add_register(&mut self, x: u8, y: u8) {
        let a = self.registers.vx[usize::from(x)];
        let b = self.registers.vx[usize::from(y)];

        let (result, carry) = a.overflowing_add(b);
        self.registers.vx[usize::from(x)] = result;
        self.registers.vx[0xF] = carry as u8;
    }

    /// 8XY5 - set VX to VX - VY, wrapping; VF is 1 when there is no borrow
    /// (VX >= VY).
    fn handle_sub_register(&mut self, x: u8, y: u8) {
        let a = self.registers.vx[usize::from(x)];
        let b = self.registers.vx[usize::from(y)];

        self.registers.vx[usize::from(x)] = a.wrapping_sub(b);
        self.registers.vx[0xF] = (a >= b) as u8;
    }

    /// 8XY6 - shift VX right by one; VF receives the shifted-out bit.
    fn handle_shift_right(&mut self, x: u8) {
        let a = self.registers.vx[usize::from(x)];

        self.registers.vx[usize::from(x)] = a >> 1;
        self.registers.vx[0xF] = a & 1;
    }

    /// 8XY7 - set VX to VY - VX, wrapping; VF is 1 when there is no borrow
    /// (VY >= VX).
    fn handle_sub_register_negated(&mut self, x: u8, y: u8) {
        let a = self.registers.vx[usize::from(x)];
        let b = self.registers.vx[usize::from(y)];

        self.registers.vx[usize::from(x)] = b.wrapping_sub(a);
        self.registers.vx[0xF] = (b >= a) as u8;
    }

    /// 8XYE - shift VX left by one; VF receives the shifted-out bit.
    fn handle_shift_left(&mut self, x: u8) {
        let a = self.registers.vx[usize::from(x)];

        self.registers.vx[usize::from(x)] = a << 1;
        self.registers.vx[0xF] = a >> 7;
    }

    /// 9XY0 - skip the next instruction if VX != VY.
    fn handle_skip_if_not_equal_register(&mut self, x: u8, y: u8) {
        if self.registers.vx[usize::from(x)] != self.registers.vx[usize::from(y)] {
            self.registers.pc += 2;
        }
    }

    /// ANNN - set I to NNN.
    fn handle_load_index(&mut self, nnn: u16) {
        self.registers.i = nnn;
    }

    /// BNNN - jump to NNN + V0.
    fn handle_jump_with_offset(&mut self, nnn: u16) {
        self.registers.pc = nnn + u16::from(self.registers.vx[0]);
    }

    /// CXNN - set VX to a random byte masked with NN.
    fn handle_random(&mut self, x: u8, nn: u8) {
        self.registers.vx[usize::from(x)] = self.rng.gen::<u8>() & nn;
    }

    /// DXYN - draw the N-row sprite at memory[I..] to (VX, VY); VF becomes
    /// the collision flag.
    fn handle_draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<()> {
        let px = self.registers.vx[usize::from(x)];
        let py = self.registers.vx[usize::from(y)];

        let sprite = self
            .memory
            .slice(usize::from(self.registers.i), usize::from(n))?;
        let collision = self.display.draw_sprite(px, py, sprite);

        self.registers.vx[0xF] = collision as u8;

        Ok(())
    }

    /// EX9E - skip the next instruction if key VX is pressed.
    fn handle_skip_if_key_pressed(&mut self, x: u8) {
        if self.keyboard.is_pressed(self.registers.vx[usize::from(x)]) {
            self.registers.pc += 2;
        }
    }

    /// EXA1 - skip the next instruction if key VX is not pressed.
    fn handle_skip_if_key_not_pressed(&mut self, x: u8) {
        if !self.keyboard.is_pressed(self.registers.vx[usize::from(x)]) {
            self.registers.pc += 2;
        }
    }

    /// FX07 - set VX to the delay timer.
    fn handle_load_delay_timer(&mut self, x: u8) {
        self.registers.vx[usize::from(x)] = self.registers.delay;
    }

    /// FX0A - block until a key is pressed, then store it in VX.
    ///
    /// If a key is already down it is taken immediately; otherwise the
    /// machine enters the awaiting-key state and makes no further progress
    /// until the input collaborator reports a key press.
    fn handle_wait_for_key(&mut self, x: u8) {
        match self.keyboard.first_pressed() {
            Some(key) => self.registers.vx[usize::from(x)] = key,
            None => self.waiting_for_key = Some(x),
        }
    }

    /// FX15 - set the delay timer to VX.
    fn handle_set_delay_timer(&mut self, x: u8) {
        self.registers.delay = self.registers.vx[usize::from(x)];
    }

    /// FX18 - set the sound timer to VX.
    fn handle_set_sound_timer(&mut self, x: u8) {
        self.registers.sound = self.registers.vx[usize::from(x)];
    }

    /// FX1E - add VX to I; VF is 1 when the sum leaves the 12-bit address
    /// range.
    fn handle_add_index(&mut self, x: u8) {
        let sum = u32::from(self.registers.i) + u32::from(self.registers.vx[usize::from(x)]);

        self.registers.i = sum as u16;
        self.registers.vx[0xF] = (sum > 0xFFF) as u8;
    }

    /// FX29 - point I at the font glyph for the hex digit in VX.
    fn handle_load_font_glyph(&mut self, x: u8) {
        let digit = self.registers.vx[usize::from(x)];
        self.registers.i = (START_FONT + usize::from(digit) * FONT_GLYPH_SIZE) as u16;
    }

    /// FX33 - store the decimal digits of VX at memory[I..I+3], most
    /// significant first.
    fn handle_store_bcd(&mut self, x: u8) -> Result<()> {
        let value = self.registers.vx[usize::from(x)];
        let address = usize::from(self.registers.i);

        self.memory.write(address, value / 100)?;
        self.memory.write(address + 1, value / 10 % 10)?;
        self.memory.write(address + 2, value % 10)?;

        Ok(())
    }

    /// FX55 - store V0..=VX at memory[I..]. I is left unchanged.
    fn handle_store_registers(&mut self, x: u8) -> Result<()> {
        let address = usize::from(self.registers.i);

        for offset in 0..=usize::from(x) {
            self.memory.write(address + offset, self.registers.vx[offset])?;
        }

        Ok(())
    }

    /// FX65 - load V0..=VX from memory[I..]. I is left unchanged.
    fn handle_load_registers(&mut self, x: u8) -> Result<()> {
        let address = usize::from(self.registers.i);

        for offset in 0..=usize::from(x) {
            self.registers.vx[offset] = self.memory.read(address + offset)?;
        }

        Ok(())
    }

    /// Advances both timers by one tick. Called once per 60 Hz frame,
    /// independent of how many cycles ran in that frame.
    pub fn tick_timers(&mut self) {
        self.registers.tick_timers();
    }

    /// Whether a tone should currently be playing. The transition to `false`
    /// is the signal to stop it; synthesis itself is the driver's concern.
    pub fn sound_active(&self) -> bool {
        self.registers.sound > 0
    }

    pub fn key_press(&mut self, key: u8) {
        self.keyboard.set_key(key, true);
    }

    pub fn key_release(&mut self, key: u8) {
        self.keyboard.set_key(key, false);
    }

    pub fn display(&self) -> &Display {
        &self.display
    }
}
