use barmark_protocol::ThemeToken;

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust
        GridLine => ResolvedColor::rgba(0x31, 0x32, 0x44, 160), // Surface0

        BarUp => ResolvedColor::rgb(0xa6, 0xe3, 0xa1),   // Green
        BarDown => ResolvedColor::rgb(0xf3, 0x8b, 0xa8), // Red
        BarWick => ResolvedColor::rgb(0x6c, 0x70, 0x86), // Overlay0

        MarkerText => ResolvedColor::rgb(0xf9, 0xe2, 0xaf), // Yellow
        TextPrimary => ResolvedColor::rgb(0xcd, 0xd6, 0xf4), // Text
        TextMuted => ResolvedColor::rgb(0xa6, 0xad, 0xc8),  // Subtext0
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(255, 255, 255),
        GridLine => ResolvedColor::rgba(210, 210, 220, 160),

        BarUp => ResolvedColor::rgb(56, 142, 60),
        BarDown => ResolvedColor::rgb(211, 47, 47),
        BarWick => ResolvedColor::rgb(120, 120, 130),

        MarkerText => ResolvedColor::rgb(150, 100, 10),
        TextPrimary => ResolvedColor::rgb(20, 20, 30),
        TextMuted => ResolvedColor::rgb(100, 100, 110),
    }
}
