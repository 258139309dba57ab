use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::data::model::{Floor, PerFloor};

/// Decode a floor-plan image into egui's pixel format.
pub fn decode_image(path: &Path) -> Result<ColorImage> {
    let img = image::open(path)
        .with_context(|| format!("opening floor plan {}", path.display()))?
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, img.as_flat_samples().as_slice()))
}

/// Floor plans uploaded to the GPU. A floor whose image failed to load
/// simply has no background.
pub struct Backgrounds {
    textures: PerFloor<Option<TextureHandle>>,
}

impl Backgrounds {
    pub fn load(ctx: &egui::Context, paths: &PerFloor<std::path::PathBuf>) -> Self {
        let load = |floor: Floor| {
            let path = paths.get(floor);
            match decode_image(path) {
                Ok(img) => Some(ctx.load_texture(
                    format!("floor-plan-{floor}"),
                    img,
                    TextureOptions::LINEAR,
                )),
                Err(e) => {
                    log::warn!("No background for the {floor} floor: {e:#}");
                    None
                }
            }
        };
        Self {
            textures: PerFloor {
                second: load(Floor::Second),
                third: load(Floor::Third),
            },
        }
    }

    pub fn get(&self, floor: Floor) -> Option<&TextureHandle> {
        self.textures.get(floor).as_ref()
    }
}
