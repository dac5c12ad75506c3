use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::GROUP_COUNT;

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Control band reference lines.
pub const BAND_COLOR: Color32 = Color32::from_rgb(214, 39, 40);

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting from green.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 120.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.40);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Series colour for each material group.
pub fn group_colors() -> [Color32; GROUP_COUNT] {
    let palette = generate_palette(GROUP_COUNT);
    std::array::from_fn(|i| palette[i])
}
