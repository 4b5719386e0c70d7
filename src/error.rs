/// Every way a session can stop. All of these are fatal: once `Emulator::cycle` returns one
/// the session is halted and will not execute another instruction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported machine code call {opcode:#06X} at pc {pc:#05X}")]
    UnsupportedCall { opcode: u16, pc: u16 },

    #[error("unknown opcode {opcode:#06X} at pc {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("memory access out of bounds at address {addr:#06X}")]
    AddressOutOfBounds { addr: usize },

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("stack overflow: subroutine call at pc {pc:#05X} with a full call stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at pc {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("interpreter halted after a previous fatal error")]
    Halted,

    #[error("failed to build logger: {0}")]
    Logger(#[from] sloggers::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
