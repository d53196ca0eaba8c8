//! RGB colours and the blending the renderer needs.
//!
//! Channel arithmetic rounds half to even.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const DARK_RED: Color = Color::rgb(120, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn sum(&self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }

    /// The colour as seen over `bg` at the given opacity (0 = only bg, 1 = only self).
    pub fn apply_opacity(&self, bg: Color, opacity: f64) -> Color {
        let mix = |fg: u8, bg: u8| channel(bg as f64 + (fg as f64 - bg as f64) * opacity);
        Color {
            r: mix(self.r, bg.r),
            g: mix(self.g, bg.g),
            b: mix(self.b, bg.b),
        }
    }
}

fn channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Visual identity of a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub frame: Color,
    pub bg: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            frame: Color::WHITE,
            bg: Color::BLACK,
            text: Color::WHITE,
        }
    }
}
