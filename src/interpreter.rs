use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use slog::{crit, o, trace, Discard, Logger};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graphics::{Framebuffer, HEIGHT, WIDTH};
use crate::keyboard::{Key, Keyboard};
use crate::memory::{AddressSpace, NUM_BYTES_IN_FONT_CHAR, STARTING_MEMORY_BYTE};
use crate::op::Op;

/// CHIP 8 can hold up to 16 return addresses
pub const STACK_SIZE: usize = 16;
pub const NUM_REGISTERS: usize = 16;

/// Point-in-time copy of the interpreter's registers, for debuggers and tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub registers: [u8; NUM_REGISTERS],
    pub stack: [u16; STACK_SIZE],
    /// index of the top stack frame, None when no subroutine is active
    pub stack_pointer: Option<usize>,
    pub pc: u16,
    pub i: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub key: Option<Key>,
}

/// The CPU half of a CHIP-8 machine: registers, timers, call stack and key latch. Memory and the
/// display are borrowed for each cycle so the caller decides who owns them.
pub struct Interpreter {
    // 16 8-bit registers. VF is used as a flag by several of the opcodes (see @Op)
    pub(crate) v: [u8; NUM_REGISTERS],
    pub(crate) i: u16, // address register
    pub(crate) pc: u16,

    pub(crate) stack: [u16; STACK_SIZE],
    pub(crate) sp: usize, // number of frames in use, the top frame is stack[sp - 1]

    pub(crate) delay_timer: u8, // 60 Hz timer that can be set and read
    pub(crate) sound_timer: u8, // 60 Hz timer that beeps whenever it is nonzero

    pub(crate) keyboard: Keyboard,
    shift_quirk: bool,
    rng: StdRng,
    logger: Logger,
}

impl Interpreter {
    pub fn new(config: &Config, logger: Option<Logger>) -> Self {
        let logger = logger.unwrap_or_else(|| Logger::root(Discard, o!()));
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Interpreter {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: STARTING_MEMORY_BYTE as u16,
            stack: [0; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keyboard: Keyboard::new(),
            shift_quirk: config.shift_quirk,
            rng,
            logger,
        }
    }

    /// Fetch the opcode at the program counter, advance past it, then execute it.
    /// Returns the op that ran.
    pub fn cycle(&mut self, memory: &mut AddressSpace, graphics: &mut Framebuffer) -> Result<Op> {
        let pc = self.pc;
        let opcode = memory.read_word(pc as usize)?;
        self.pc = pc.wrapping_add(2);

        let op = match Op::decode(opcode) {
            Some(op) => op,
            None => {
                crit!(self.logger, "unknown opcode"; "opcode" => format!("{:#06X}", opcode), "pc" => format!("{:#05X}", pc));
                return Err(Error::UnknownOpcode { opcode, pc });
            }
        };

        trace!(self.logger, "execute"; "op" => ?op, "pc" => format!("{:#05X}", pc));
        self.execute(op, memory, graphics)?;
        Ok(op)
    }

    /// Decrement both timers by one, stopping at zero. Call once per presented frame.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn key(&self) -> Option<Key> {
        self.keyboard.latch()
    }

    pub fn set_key(&mut self, key: Option<Key>) {
        self.keyboard.set_latch(key);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.v,
            stack: self.stack,
            stack_pointer: self.sp.checked_sub(1),
            pc: self.pc,
            i: self.i,
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
            key: self.key(),
        }
    }

    /// Address of the instruction currently executing (pc has already moved past it)
    fn current_instr_addr(&self) -> u16 {
        self.pc.wrapping_sub(2)
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn key_matches(&self, x: u8) -> bool {
        self.key().map(Key::nibble) == Some(self.v[x as usize])
    }

    pub(crate) fn execute(
        &mut self,
        op: Op,
        memory: &mut AddressSpace,
        graphics: &mut Framebuffer,
    ) -> Result<()> {
        match op {
            Op::CallRca(addr) => {
                let pc = self.current_instr_addr();
                crit!(self.logger, "unsupported machine code call"; "opcode" => format!("{:#06X}", addr), "pc" => format!("{:#05X}", pc));
                return Err(Error::UnsupportedCall { opcode: addr, pc });
            }
            Op::DispClear => graphics.clear(),
            Op::Return => {
                if self.sp == 0 {
                    let pc = self.current_instr_addr();
                    crit!(self.logger, "return with an empty call stack"; "pc" => format!("{:#05X}", pc));
                    return Err(Error::StackUnderflow { pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }
            Op::Goto(addr) => self.pc = addr,
            Op::GotoSubRtn(addr) => {
                if self.sp == STACK_SIZE {
                    let pc = self.current_instr_addr();
                    crit!(self.logger, "call with a full call stack"; "pc" => format!("{:#05X}", pc), "target" => format!("{:#05X}", addr));
                    return Err(Error::StackOverflow { pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = addr;
            }
            Op::CondVxEq(x, kk) => self.skip_if(self.v[x as usize] == kk),
            Op::CondVxNe(x, kk) => self.skip_if(self.v[x as usize] != kk),
            Op::CondVxVyEq(x, y) => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            Op::ConstSetVx(x, kk) => self.v[x as usize] = kk,
            Op::ConstAddVx(x, kk) => self.v[x as usize] = self.v[x as usize].wrapping_add(kk),
            Op::AssignVyToVx(x, y) => self.v[x as usize] = self.v[y as usize],
            Op::BitOpOr(x, y) => self.v[x as usize] |= self.v[y as usize],
            Op::BitOpAnd(x, y) => self.v[x as usize] &= self.v[y as usize],
            Op::BitOpXor(x, y) => self.v[x as usize] ^= self.v[y as usize],
            Op::MathVxAddVy(x, y) => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.v[x as usize] = sum;
                self.v[0xF] = carry as u8;
            }
            Op::MathVxMinusVy(x, y) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.v[x as usize] = vx.wrapping_sub(vy);
                self.v[0xF] = (vx >= vy) as u8;
            }
            Op::BitOpRtShift(x, y) => {
                let src = if self.shift_quirk { x } else { y };
                let val = self.v[src as usize];
                self.v[x as usize] = val >> 1;
                self.v[0xF] = val & 1;
            }
            Op::MathVyMinusVx(x, y) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.v[x as usize] = vy.wrapping_sub(vx);
                self.v[0xF] = (vy >= vx) as u8;
            }
            Op::BitOpLftShift(x, y) => {
                let src = if self.shift_quirk { x } else { y };
                let val = self.v[src as usize];
                self.v[x as usize] = val << 1;
                self.v[0xF] = val >> 7;
            }
            Op::CondVxVyNe(x, y) => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            Op::MemSetI(addr) => self.i = addr,
            Op::GotoPlusV0(addr) => self.pc = addr + self.v[0] as u16,
            Op::Rand(x, kk) => self.v[x as usize] = self.rng.gen::<u8>() & kk,
            Op::DispDraw(x, y, n) => {
                let collided = self.draw_sprite(x, y, n, memory, graphics)?;
                self.v[0xF] = collided as u8;
            }
            Op::KeyOpEqVx(x) => self.skip_if(self.key_matches(x)),
            Op::KeyOpNeVx(x) => self.skip_if(!self.key_matches(x)),
            Op::DelayGet(x) => self.v[x as usize] = self.delay_timer,
            Op::KeyOpGet(x) => match self.key() {
                // no key yet, run this instruction again next cycle
                None => self.pc = self.current_instr_addr(),
                Some(key) => self.v[x as usize] = key.nibble(),
            },
            Op::DelaySet(x) => self.delay_timer = self.v[x as usize],
            Op::SoundSet(x) => self.sound_timer = self.v[x as usize],
            Op::MemIPlusEqVx(x) => self.i = self.i.wrapping_add(self.v[x as usize] as u16),
            Op::MemISetSprite(x) => {
                self.i = self.v[x as usize] as u16 * NUM_BYTES_IN_FONT_CHAR as u16;
            }
            Op::Bcd(x) => {
                let val = self.v[x as usize];
                let addr = self.i as usize;
                memory.write_byte(addr, val / 100)?;
                memory.write_byte(addr + 1, (val / 10) % 10)?;
                memory.write_byte(addr + 2, val % 10)?;
            }
            Op::RegDump(x) => {
                for offset in 0..=x as usize {
                    memory.write_byte(self.i as usize + offset, self.v[offset])?;
                }
            }
            Op::RegLoad(x) => {
                for offset in 0..=x as usize {
                    self.v[offset] = memory.read_byte(self.i as usize + offset)?;
                }
            }
        }

        Ok(())
    }

    /// Draw the n byte sprite at I to (Vx, Vy). The origin wraps onto the screen but the sprite
    /// itself is clipped at the right and bottom edges. Returns true if any lit pixel was
    /// turned off.
    fn draw_sprite(
        &self,
        x: u8,
        y: u8,
        n: u8,
        memory: &AddressSpace,
        graphics: &mut Framebuffer,
    ) -> Result<bool> {
        let origin_x = self.v[x as usize] as usize % WIDTH;
        let origin_y = self.v[y as usize] as usize % HEIGHT;
        let mut collided = false;

        for row in 0..n as usize {
            let py = origin_y + row;
            if py >= HEIGHT {
                break;
            }

            let sprite_byte = memory.read_byte(self.i as usize + row)?;
            for col in 0..8 {
                let px = origin_x + col;
                if px >= WIDTH {
                    break;
                }

                let bit = (sprite_byte >> (7 - col)) & 1;
                collided |= graphics.set_pixel(px, py, bit);
            }
        }

        Ok(collided)
    }
}
