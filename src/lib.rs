//! An implementation of the CHIP 8 virtual machine in Rust, with the windowing, audio and input
//! left to whoever embeds it.
//!
//! # Interpreter
//! * 4095 (0xFFF) bytes of memory, the font glyphs live at 0x000 - 0x04F
//! * programs are loaded at 0x200
//! * 16 8-bit registers: V0 - VF
//! * VF if used is the carry flag in addition operations, "no borrow" flag in subtraction, in draw
//! operation the VF flag is set to denote pixel collision
//! * the address register I is 16 bits wide
//! * the stack is only used to store return addresses when subroutines are called
//!
//! # Timers
//! * two timers that the driver ticks once per frame (roughly 60 hertz)
//!  - delay timer is used for events, it can be set and read
//!  - sound timer beeps when its value is nonzero
//!
//! # Input
//! there is a 16 symbol hex keyboard with values 0 - F. The interpreter only sees one key at a time
//! (the latch). There are 3 opcodes that deal with handling input
//!  - one skips an instruction if a specific key is pressed
//!  - one skips an instruction if a specific key is NOT pressed
//!  - waits for a key press and stores it in a register once it detects it
//!
//! # Graphics
//! 64x32 pixels, sprites are XOR-ed onto the screen
//!
//! # Driving it
//! ```no_run
//! use chip8vm::{Emulator, CYCLES_PER_FRAME};
//!
//! let program = std::fs::read("games/PONG").unwrap();
//! let mut emulator = Emulator::with_program(&program, &Default::default(), None).unwrap();
//! loop {
//!     let redraw = emulator.run_frame(CYCLES_PER_FRAME).unwrap();
//!     if redraw {
//!         let _pixels = emulator.pixels();
//!         // present the frame
//!     }
//! }
//! ```
use slog::{error, info, o, Discard, Logger};

mod config;
mod error;
mod graphics;
mod interpreter;
mod keyboard;
mod memory;
mod op;


pub use config::Config;
pub use error::{Error, Result};
pub use graphics::{Framebuffer, HEIGHT, WIDTH};
pub use interpreter::{Interpreter, Snapshot, NUM_REGISTERS, STACK_SIZE};
pub use keyboard::{AsKeyboard, Key, Keyboard};
pub use memory::{AddressSpace, MEMORY_SIZE, NUM_BYTES_IN_FONT_CHAR, STARTING_MEMORY_BYTE};
pub use op::{three_nibbles_to_address, two_nibbles_to_u8, Op};

/// Instructions to run between timer ticks. The reference driver ran 9 per 60 Hz frame.
pub const CYCLES_PER_FRAME: usize = 9;

/// One CHIP-8 session: memory, display and interpreter. Sessions share nothing, so any number of
/// them can run side by side.
pub struct Emulator {
    interpreter: Interpreter,
    memory: AddressSpace,
    graphics: Framebuffer,
    halted: bool,
    logger: Logger,
}

impl Emulator {
    /// Create an emulator with the default configuration. Without a logger nothing is logged.
    pub fn new(logger: Option<Logger>) -> Self {
        Emulator::with_config(&Config::default(), logger)
    }

    pub fn with_config(config: &Config, logger: Option<Logger>) -> Self {
        let logger = logger.unwrap_or_else(|| Logger::root(Discard, o!()));
        let interpreter = Interpreter::new(config, Some(logger.new(o!("component" => "interpreter"))));

        Emulator {
            interpreter,
            memory: AddressSpace::new(),
            graphics: Framebuffer::new(),
            halted: false,
            logger,
        }
    }

    /// Create an emulator and load `program` into it
    pub fn with_program(program: &[u8], config: &Config, logger: Option<Logger>) -> Result<Self> {
        let mut emulator = Emulator::with_config(config, logger);
        emulator.load_program(program)?;
        Ok(emulator)
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if let Err(e) = self.memory.load_program(program) {
            error!(self.logger, "failed to load program"; "error" => %e);
            return Err(e);
        }
        info!(self.logger, "loaded program"; "size" => program.len());
        Ok(())
    }

    /// Execute one instruction. Any error is fatal: the session halts and every later call
    /// returns `Error::Halted`.
    pub fn cycle(&mut self) -> Result<Op> {
        if self.halted {
            return Err(Error::Halted);
        }

        let result = self.interpreter.cycle(&mut self.memory, &mut self.graphics);
        if let Err(e) = &result {
            error!(self.logger, "halting"; "error" => %e);
            self.halted = true;
        }
        result
    }

    /// Run `cycles` instructions then tick the timers once. Returns true if the display changed.
    pub fn run_frame(&mut self, cycles: usize) -> Result<bool> {
        let mut redraw = false;
        for _ in 0..cycles {
            redraw |= self.cycle()?.is_display_op();
        }
        self.tick_timers();
        Ok(redraw)
    }

    pub fn tick_timers(&mut self) {
        self.interpreter.tick_timers();
    }

    /// Set or clear the key latch directly
    pub fn set_key(&mut self, key: Option<Key>) {
        self.interpreter.set_key(key);
    }

    /// Poll `keyboard` and update the key latch with whatever changed since the last poll
    pub fn handle_key_input(&mut self, keyboard: &impl AsKeyboard) {
        self.interpreter
            .keyboard
            .update_with_keys(&keyboard.keys_down());
    }

    /// Every pixel, row-major, each 0 or 1
    pub fn pixels(&self) -> &[u8] {
        self.graphics.pixels()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.graphics
    }

    pub fn snapshot(&self) -> Snapshot {
        self.interpreter.snapshot()
    }

    /// The opcode the next cycle will execute, without executing it
    pub fn current_opcode(&self) -> Result<u16> {
        self.memory.read_word(self.interpreter.pc() as usize)
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// True while the sound timer is running
    pub fn sound_active(&self) -> bool {
        self.interpreter.sound_active()
    }
}
