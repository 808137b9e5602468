use colored::{ColoredString, Colorize};

/// RGBA color with channels in `[0,1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn lerp(self, other: Color, f: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * f,
            g: self.g + (other.g - self.g) * f,
            b: self.b + (other.b - self.b) * f,
            a: self.a + (other.a - self.a) * f,
        }
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn paint(self, text: &str) -> ColoredString {
        let (r, g, b) = self.to_rgb8();
        text.truecolor(r, g, b)
    }
}

/// 在多個 (顏色, 權重) 目標之間做線性插值
///
/// 找到 `A.factor < f <= B.factor` 的相鄰目標 A、B 並依 `f` 插值；
/// `f` 小於第一個目標時回傳第一個顏色，大於最後一個時回傳最後一個。
/// 目標為空時回傳 `None`。
pub fn multiple_lerp_with_weights(targets: &[(Color, f32)], f: f32) -> Option<Color> {
    let mut sorted = targets.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let first = sorted.first()?;
    if f <= first.1 {
        return Some(first.0);
    }

    for pair in sorted.windows(2) {
        let (a_value, a_factor) = pair[0];
        let (b_value, b_factor) = pair[1];
        if a_factor < f && f <= b_factor {
            let lerp_f = (f - a_factor) / (b_factor - a_factor);
            return Some(a_value.lerp(b_value, lerp_f));
        }
    }

    sorted.last().map(|(color, _)| *color)
}
