/// 24-bit RGB pixel, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn splat(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Channel mean with integer truncation: `(r + g + b) / 3`.
    pub fn mean_intensity(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }
}
