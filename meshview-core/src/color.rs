/// RGB colors and the fixed palettes the viewer cycles through

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
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
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const GRAY: Color = Color::rgb(100, 100, 100);
    pub const DARK_BLUE: Color = Color::rgb(0, 0, 100);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor`, clamped to the valid range
    pub fn scaled(self, factor: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self::rgb(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Squared distance in RGB space
    pub fn distance_sq(self, other: Color) -> u32 {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2) as u32;
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

/// Face fill colors and edge/vertex color pairs
pub const COLORS: [Color; 7] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::WHITE,
    Color::YELLOW,
    Color::CYAN,
    Color::MAGENTA,
];

/// Background colors
pub const BG_COLORS: [Color; 5] = [
    Color::BLACK,
    Color::GRAY,
    Color::DARK_BLUE,
    Color::rgb(50, 50, 50),
    Color::rgb(0, 100, 100),
];
