use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour maps
// ---------------------------------------------------------------------------

/// Perceptually uniform maps used to encode time progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    Viridis,
    Plasma,
}

/// Matplotlib control points at t = 0, 1/8, ..., 1.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2d, 0x7b),
    (0x3b, 0x52, 0x8b),
    (0x2c, 0x72, 0x8e),
    (0x21, 0x91, 0x8c),
    (0x28, 0xae, 0x80),
    (0x5e, 0xc9, 0x62),
    (0xad, 0xdc, 0x30),
    (0xfd, 0xe7, 0x25),
];

const PLASMA: [(u8, u8, u8); 9] = [
    (0x0d, 0x08, 0x87),
    (0x4c, 0x02, 0xa1),
    (0x7e, 0x03, 0xa8),
    (0xa9, 0x23, 0x95),
    (0xcc, 0x47, 0x78),
    (0xe5, 0x6b, 0x5d),
    (0xf8, 0x95, 0x40),
    (0xfd, 0xc3, 0x28),
    (0xf0, 0xf9, 0x21),
];

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

impl ColorMap {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorMap::Viridis => &VIRIDIS,
            ColorMap::Plasma => &PLASMA,
        }
    }

    /// Colour at `t` in `[0, 1]` (clamped), blended in linear RGB.
    pub fn sample(self, t: f32) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f32;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - i as f32;

        let mixed = linear(stops[i]).mix(linear(stops[i + 1]), frac);
        let rgb: Srgb<u8> = Srgb::from_linear(mixed);
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// Colour of step `index` out of `len` steps.
    pub fn for_index(self, index: usize, len: usize) -> Color32 {
        if len <= 1 {
            return self.sample(0.0);
        }
        self.sample(index as f32 / (len - 1) as f32)
    }
}

/// Apply a 0..1 opacity to an opaque colour.
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(c: Color32, (r, g, b): (u8, u8, u8)) -> bool {
        let d = |a: u8, b: u8| (a as i16 - b as i16).abs() <= 1;
        d(c.r(), r) && d(c.g(), g) && d(c.b(), b)
    }

    #[test]
    fn ends_hit_the_control_points() {
        assert!(close(ColorMap::Viridis.sample(0.0), VIRIDIS[0]));
        assert!(close(ColorMap::Viridis.sample(1.0), VIRIDIS[8]));
        assert!(close(ColorMap::Plasma.sample(0.5), PLASMA[4]));
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(ColorMap::Plasma.sample(-3.0), ColorMap::Plasma.sample(0.0));
        assert_eq!(ColorMap::Plasma.sample(7.0), ColorMap::Plasma.sample(1.0));
        assert_eq!(ColorMap::Plasma.sample(f32::NAN), ColorMap::Plasma.sample(0.0));
    }

    #[test]
    fn index_maps_first_and_last_step_to_ends() {
        assert_eq!(ColorMap::Viridis.for_index(0, 10), ColorMap::Viridis.sample(0.0));
        assert_eq!(ColorMap::Viridis.for_index(9, 10), ColorMap::Viridis.sample(1.0));
        assert_eq!(ColorMap::Viridis.for_index(0, 1), ColorMap::Viridis.sample(0.0));
    }

    #[test]
    fn alpha_is_scaled_to_a_byte() {
        let c = with_alpha(Color32::from_rgb(10, 20, 30), 0.7);
        assert_eq!(c.a(), 179);
    }
}
