//! Color helpers for the PNG charts.

use plotters::style::RGBColor;

/// Yellow -> orange -> red ramp for the weekday/month heatmap, `t` in [0, 1].
pub fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp((255, 255, 178), (253, 141, 60), t * 2.0)
    } else {
        lerp((253, 141, 60), (189, 0, 38), (t - 0.5) * 2.0)
    }
}

/// Blue -> white -> red diverging ramp for the correlation grid, `t` in [0, 1]
/// (0 = strongly negative, 0.5 = zero, 1 = strongly positive).
pub fn diverging_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp((59, 76, 192), (245, 245, 245), t * 2.0)
    } else {
        lerp((245, 245, 245), (180, 4, 38), (t - 0.5) * 2.0)
    }
}

/// Rotating palette for pie slices.
pub fn slice_color(i: usize) -> RGBColor {
    const PALETTE: [RGBColor; 10] = [
        RGBColor(31, 119, 180),
        RGBColor(255, 127, 14),
        RGBColor(44, 160, 44),
        RGBColor(214, 39, 40),
        RGBColor(148, 103, 189),
        RGBColor(140, 86, 75),
        RGBColor(227, 119, 194),
        RGBColor(127, 127, 127),
        RGBColor(188, 189, 34),
        RGBColor(23, 190, 207),
    ];
    PALETTE[i % PALETTE.len()]
}

fn lerp(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}
