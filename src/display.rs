pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The 64x32 monochrome framebuffer:
/// ( 0, 0)   (63, 0)
/// ( 0,31)   (63,31)
///
/// Sprites are composited by XOR and coordinates wrap on both axes. Only
/// [`Display::clear`] and [`Display::draw_sprite`] mutate pixels.
pub struct Display([bool; DISPLAY_WIDTH * DISPLAY_HEIGHT]);

impl Display {
    pub fn new() -> Self {
        Display([false; DISPLAY_WIDTH * DISPLAY_HEIGHT])
    }

    /// Sets every pixel to off.
    pub fn clear(&mut self) {
        for pixel in &mut self.0 {
            *pixel = false
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.0[self.compute_idx(x, y)]
    }

    /// Toggles the pixel at (`x`, `y`) and returns `true` if it was lit
    /// immediately before the toggle.
    fn xor_pixel(&mut self, x: usize, y: usize) -> bool {
        let idx = self.compute_idx(x, y);
        let last_value = self.0[idx];
        self.0[idx] = !last_value;

        last_value
    }

    /// Blits a sprite at (`x`, `y`), one byte per row, most significant bit
    /// leftmost. Set bits toggle the target pixel; coordinates wrap modulo
    /// the display size. Returns `true` if any toggled pixel was already lit
    /// (the collision flag of the `DXYN` instruction).
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;

        for (row, &byte) in sprite.iter().enumerate() {
            for col in 0..8 {
                if byte & (0x80 >> col) != 0 {
                    let px = (usize::from(x) + col) % DISPLAY_WIDTH;
                    let py = (usize::from(y) + row) % DISPLAY_HEIGHT;

                    if self.xor_pixel(px, py) {
                        collision = true;
                    }
                }
            }
        }

        collision
    }

    fn compute_idx(&self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    /// Row-major pixel data, for the rendering collaborator.
    pub fn pixels(&self) -> &[bool] {
        &self.0
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }
}
