use crate::error::{Error, Result};

/// Size of the byte-addressable memory image.
pub const MEM_SIZE: usize = 4096;

/// Programs are loaded starting at 0x200; the region below is reserved.
pub const START_ROM: usize = 0x200;

/// The built-in font sprites occupy 0x050-0x09F.
pub const START_FONT: usize = 0x050;

/// Every font glyph is five bytes, one byte per row of 8 pixels.
pub const FONT_GLYPH_SIZE: usize = 5;

const MAX_ROM_SIZE: usize = MEM_SIZE - START_ROM;

/// One 8x5 sprite per hex digit 0-F.
const FONT_DATA: &[u8] = &[
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

#[derive(Debug)]
pub(crate) struct Memory(pub [u8; MEM_SIZE]);

impl Memory {
    pub fn new() -> Self {
        let mut memory = Memory([0; MEM_SIZE]);
        memory.0[START_FONT..START_FONT + FONT_DATA.len()].copy_from_slice(FONT_DATA);
        memory
    }

    /// Copies a ROM image into memory starting at [`START_ROM`].
    ///
    /// The original interpreter silently truncated oversized images at the
    /// memory boundary; this implementation rejects them instead.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: bytes.len(),
                capacity: MAX_ROM_SIZE,
            });
        }

        self.0[START_ROM..START_ROM + bytes.len()].copy_from_slice(bytes);

        Ok(())
    }

    /// Reads the two consecutive bytes at `pc` as one big-endian instruction
    /// word. A safe fetch requires `pc <= 4094`.
    pub fn fetch_opcode(&self, pc: u16) -> Result<u16> {
        let address = usize::from(pc);
        if address + 1 >= MEM_SIZE {
            return Err(Error::FetchOutOfBounds { pc });
        }

        Ok(u16::from_be_bytes([self.0[address], self.0[address + 1]]))
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.0
            .get(address)
            .copied()
            .ok_or(Error::AddressOutOfBounds { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        match self.0.get_mut(address) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::AddressOutOfBounds { address }),
        }
    }

    /// Borrows `len` bytes starting at `address`, e.g. the rows of a sprite.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        self.0
            .get(address..address + len)
            .ok_or(Error::AddressOutOfBounds { address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};
    use fake::{Dummy, Fake, Faker};
    use quickcheck_macros::quickcheck;
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Debug, Clone, Dummy)]
    struct RomFixture {
        #[dummy(faker = "(Faker, 1..3584)")]
        bytes: Vec<u8>,
    }

    impl quickcheck::Arbitrary for RomFixture {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));

            Faker.fake_with_rng(&mut rng)
        }
    }

    #[quickcheck]
    fn test_load_rom(rom: RomFixture) {
        let num_bytes = rom.bytes.len();

        let mut memory = Memory::new();
        assert_ok!(memory.load_rom(&rom.bytes));

        assert_eq!(memory.0[START_ROM..START_ROM + num_bytes], rom.bytes);
    }

    #[test]
    fn test_load_rom_too_large() {
        let rom = vec![0xAB; MAX_ROM_SIZE + 1];

        let mut memory = Memory::new();
        let error = assert_err!(memory.load_rom(&rom));

        assert_eq!(
            error,
            Error::RomTooLarge {
                size: MAX_ROM_SIZE + 1,
                capacity: MAX_ROM_SIZE
            }
        );
    }

    #[test]
    fn test_font_is_loaded() {
        let memory = Memory::new();

        assert_eq!(&memory.0[START_FONT..START_FONT + FONT_DATA.len()], FONT_DATA);

        // The glyph for "0" starts the block, the glyph for "F" ends it.
        assert_eq!(memory.0[0x050], 0xF0);
        assert_eq!(memory.0[0x09F], 0x80);
    }

    #[test]
    fn test_fetch_opcode_is_big_endian() {
        let mut memory = Memory::new();
        assert_ok!(memory.load_rom(&[0x6A, 0x02]));

        assert_eq!(memory.fetch_opcode(START_ROM as u16), Ok(0x6A02));
    }

    #[test]
    fn test_fetch_opcode_out_of_bounds() {
        let memory = Memory::new();

        assert_ok!(memory.fetch_opcode(4094));
        assert_eq!(
            memory.fetch_opcode(4095),
            Err(Error::FetchOutOfBounds { pc: 4095 })
        );
    }

    #[test]
    fn test_read_write_bounds() {
        let mut memory = Memory::new();

        assert_ok!(memory.write(MEM_SIZE - 1, 0x42));
        assert_eq!(memory.read(MEM_SIZE - 1), Ok(0x42));

        assert_err!(memory.write(MEM_SIZE, 0x42));
        assert_err!(memory.read(MEM_SIZE));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let memory = Memory::new();

        assert_ok!(memory.slice(MEM_SIZE - 2, 2));
        assert_err!(memory.slice(MEM_SIZE - 2, 3));
    }
}
