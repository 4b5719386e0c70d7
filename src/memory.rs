use crate::error::{Error, Result};

/// Size of the addressable memory. The last valid address is 0xFFE.
pub const MEMORY_SIZE: usize = 0xFFF;

/// Programs get loaded here; everything below belongs to the interpreter (and the font).
pub const STARTING_MEMORY_BYTE: usize = 0x200;

pub const NUM_BYTES_IN_FONT_CHAR: u8 = 5;

/// The 16 hex digit glyphs, 5 bytes each, stored at address 0x000
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

/// Flat byte store shared by the interpreter's fetch and its memory instructions.
pub struct AddressSpace {
    bytes: Box<[u8]>,
}

impl AddressSpace {
    /// Create a zeroed address space with the font glyphs preloaded
    pub fn new() -> Self {
        let mut bytes = vec![0u8; MEMORY_SIZE].into_boxed_slice();
        bytes[..FONT_SET.len()].copy_from_slice(&FONT_SET);

        AddressSpace { bytes }
    }

    /// Copy a raw CHIP-8 program into memory starting at 0x200. A program that does not fit is
    /// rejected whole rather than truncated.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let max = MEMORY_SIZE - STARTING_MEMORY_BYTE;
        if program.len() > max {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }

        let end = STARTING_MEMORY_BYTE + program.len();
        self.bytes[STARTING_MEMORY_BYTE..end].copy_from_slice(program);
        Ok(())
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Error::AddressOutOfBounds { addr })
    }

    pub fn write_byte(&mut self, addr: usize, byte: u8) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(addr)
            .ok_or(Error::AddressOutOfBounds { addr })?;
        *slot = byte;
        Ok(())
    }

    /// Read the big-endian 16 bit word at `addr` and `addr + 1`
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read_byte(addr)? as u16;
        let lo = self.read_byte(addr + 1)? as u16;
        Ok((hi << 8) | lo)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_preloaded() {
        let memory = AddressSpace::new();

        // the glyph for 0 starts at 0x000 and the glyph for F at 0x04B
        assert_eq!(memory.read_byte(0x000).unwrap(), 0xF0);
        assert_eq!(memory.read_byte(0x001).unwrap(), 0x90);
        assert_eq!(memory.read_byte(0x04B).unwrap(), 0xF0);
        assert_eq!(memory.read_byte(0x04F).unwrap(), 0x80);
        assert_eq!(memory.read_byte(0x050).unwrap(), 0x00);
    }

    #[test]
    fn load_program_at_start() {
        let mut memory = AddressSpace::new();
        memory.load_program(&[0x12, 0x05, 0xAB]).unwrap();

        assert_eq!(memory.read_byte(0x1FF).unwrap(), 0);
        assert_eq!(memory.read_word(STARTING_MEMORY_BYTE).unwrap(), 0x1205);
        assert_eq!(memory.read_byte(0x202).unwrap(), 0xAB);
    }

    #[test]
    fn load_program_that_exactly_fits() {
        let mut memory = AddressSpace::new();
        let program = vec![0xEE; MEMORY_SIZE - STARTING_MEMORY_BYTE];

        memory.load_program(&program).unwrap();

        assert_eq!(memory.read_byte(MEMORY_SIZE - 1).unwrap(), 0xEE);
    }

    #[test]
    fn load_program_too_large() {
        let mut memory = AddressSpace::new();
        let program = vec![0xEE; MEMORY_SIZE - STARTING_MEMORY_BYTE + 1];

        match memory.load_program(&program) {
            Err(Error::ProgramTooLarge { size, max }) => {
                assert_eq!(size, program.len());
                assert_eq!(max, 0xDFF);
            }
            other => panic!("expected ProgramTooLarge, got {:?}", other),
        }

        // nothing got copied
        assert_eq!(memory.read_byte(STARTING_MEMORY_BYTE).unwrap(), 0);
    }

    #[test]
    fn out_of_bounds_access() {
        let mut memory = AddressSpace::new();

        assert_eq!(memory.len(), 4095);
        assert!(memory.read_byte(0xFFE).is_ok());
        assert!(matches!(
            memory.read_byte(0xFFF),
            Err(Error::AddressOutOfBounds { addr: 0xFFF })
        ));
        assert!(matches!(
            memory.write_byte(0x1000, 1),
            Err(Error::AddressOutOfBounds { addr: 0x1000 })
        ));
        assert!(matches!(
            memory.read_word(0xFFE),
            Err(Error::AddressOutOfBounds { addr: 0xFFF })
        ));
    }
}
