use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Scale a colour's opacity by `alpha` (clamped to 0..=1).
pub fn faded(color: Color32, alpha: f64) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * f64::from(color.a())).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

// ---------------------------------------------------------------------------
// Tag → Color32
// ---------------------------------------------------------------------------

/// Colours for the tags currently on screen.
#[derive(Debug, Clone)]
pub struct TagColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl TagColors {
    /// Fixed colours win; remaining tags share the generated palette.
    pub fn new<'a>(
        tags: impl IntoIterator<Item = &'a str>,
        fixed: &BTreeMap<String, [u8; 3]>,
    ) -> Self {
        let mut mapping: BTreeMap<String, Color32> = BTreeMap::new();
        let mut free: Vec<&str> = Vec::new();
        for tag in tags {
            if mapping.contains_key(tag) || free.contains(&tag) {
                continue;
            }
            match fixed.get(tag) {
                Some(&[r, g, b]) => {
                    mapping.insert(tag.to_string(), Color32::from_rgb(r, g, b));
                }
                None => free.push(tag),
            }
        }
        free.sort_unstable();
        let palette = generate_palette(free.len());
        mapping.extend(free.into_iter().map(str::to_string).zip(palette));

        TagColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a tag.
    pub fn color_for(&self, tag: &str) -> Color32 {
        self.mapping.get(tag).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn fixed_colors_take_priority() {
        let fixed = BTreeMap::from([("Tag1".to_string(), [0, 0, 255])]);
        let colors = TagColors::new(["Tag1", "Zed", "Tag1", "Abe"], &fixed);
        assert_eq!(colors.color_for("Tag1"), Color32::from_rgb(0, 0, 255));
        assert_ne!(colors.color_for("Abe"), colors.color_for("Zed"));
        assert_eq!(colors.color_for("missing"), Color32::GRAY);
    }

    #[test]
    fn faded_scales_alpha_only() {
        let c = faded(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(c.a(), 128);
        let full = faded(Color32::from_rgb(10, 20, 30), 1.0);
        assert_eq!(full, Color32::from_rgb(10, 20, 30));
    }
}
