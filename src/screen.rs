pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Monochromatic framebuffer. A pixel is `true` if it is turned on. Pixels are stored row-major,
/// so pixel (x, y) lives at `y * W + x`.
///
/// Both dimensions must be non-zero. An empty screen is rejected when it is built:
///
/// ```compile_fail
/// let screen = chip8_vm::Screen::<0, 32>::new();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen<const W: usize, const H: usize> {
    pixels: Vec<bool>,
}

/// The standard 64x32 CHIP-8 display.
pub type Chip8Screen = Screen<SCREEN_WIDTH, SCREEN_HEIGHT>;

impl<const W: usize, const H: usize> Screen<W, H> {
    // Coordinates are reduced modulo the dimensions.
    const NON_EMPTY: () = assert!(W > 0 && H > 0, "screen dimensions must be non-zero");

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Screen {
            pixels: vec![false; W * H],
        }
    }

    pub fn width(&self) -> usize {
        W
    }

    pub fn height(&self) -> usize {
        H
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = false;
        }
    }

    /// State of the pixel at (x, y). Coordinates wrap around the screen edges.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    /// Flip the pixel at (x, y), wrapping the coordinates around the screen edges. Returns true
    /// if the pixel was on, i.e. it has just been turned off.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let offset = Self::offset(x, y);
        let was_on = self.pixels[offset];
        self.pixels[offset] = !was_on;
        was_on
    }

    /// XOR an 8-pixel-wide sprite onto the screen with its top-left corner at (x, y). Each byte
    /// of `rows` is one row of the sprite, the MSB being the leftmost pixel. Every pixel wraps
    /// independently. Returns true if any pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, &row) in rows.iter().enumerate() {
            for dx in 0..8 {
                if (row >> (7 - dx)) & 1 != 0 {
                    collision |= self.toggle(x + dx, y + dy);
                }
            }
        }
        collision
    }

    /// Dense row-major view of the pixels, `W * H` long.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    fn offset(x: usize, y: usize) -> usize {
        (y % H) * W + (x % W)
    }
}

impl<const W: usize, const H: usize> Default for Screen<W, H> {
    fn default() -> Self {
        Screen::new()
    }
}
