/// Display list for the certificate canvas

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const GRAY_200: Color = Color(0xe5, 0xe7, 0xeb);
    pub const GRAY_500: Color = Color(0x6b, 0x72, 0x80);
    pub const GRAY_600: Color = Color(0x4b, 0x55, 0x63);
    pub const GRAY_700: Color = Color(0x37, 0x41, 0x51);
    pub const GRAY_800: Color = Color(0x1f, 0x29, 0x37);
    pub const GRAY_900: Color = Color(0x11, 0x18, 0x27);
    pub const BLUE_200: Color = Color(0xbf, 0xdb, 0xfe);
    pub const BLUE_300: Color = Color(0x93, 0xc5, 0xfd);
    pub const BLUE_500: Color = Color(0x3b, 0x82, 0xf6);
    pub const BLUE_600: Color = Color(0x25, 0x63, 0xeb);
    pub const INDIGO_500: Color = Color(0x63, 0x66, 0xf1);
    pub const RED_200: Color = Color(0xfe, 0xca, 0xca);
    pub const RED_300: Color = Color(0xfc, 0xa5, 0xa5);
    pub const RED_500: Color = Color(0xef, 0x44, 0x44);
    pub const ORANGE_400: Color = Color(0xfb, 0x92, 0x3c);
    pub const YELLOW_300: Color = Color(0xfd, 0xe0, 0x47);
    pub const YELLOW_500: Color = Color(0xea, 0xb3, 0x08);
    pub const GREEN_200: Color = Color(0xbb, 0xf7, 0xd0);
    pub const GREEN_300: Color = Color(0x86, 0xef, 0xac);
    pub const GREEN_500: Color = Color(0x22, 0xc5, 0x5e);
    pub const TEAL_400: Color = Color(0x2d, 0xd4, 0xbf);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Medium,
    Bold,
}

/// A run of text sharing one fill and weight
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub fill: Color,
    pub weight: Weight,
    pub underline: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>, fill: Color) -> Self {
        Self { text: text.into(), fill, weight: Weight::Normal, underline: false }
    }

    pub fn bold(text: impl Into<String>, fill: Color) -> Self {
        Self { text: text.into(), fill, weight: Weight::Bold, underline: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
        opacity: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Color,
        opacity: f32,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Color,
        width: f32,
        opacity: f32,
    },
    Text {
        x: f32,
        y: f32,
        size: f32,
        anchor: Anchor,
        italic: bool,
        runs: Vec<TextRun>,
    },
}
