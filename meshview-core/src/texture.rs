/// Texture image loading
use std::path::Path;

use crate::color::Color;
use crate::error::{MeshError, Result};
use crate::geometry::Texture;

/// Source of decoded texture images for `map_Kd` references
pub trait TextureLoader {
    fn load_texture(&self, path: &Path) -> Result<Texture>;
}

impl<F> TextureLoader for F
where
    F: Fn(&Path) -> Result<Texture>,
{
    fn load_texture(&self, path: &Path) -> Result<Texture> {
        self(path)
    }
}

/// Decodes textures from disk with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTextureLoader;

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&self, path: &Path) -> Result<Texture> {
        let image = image::open(path)
            .map_err(|e| MeshError::TextureLoadFailure {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgb8();

        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| Color::rgb(p[0], p[1], p[2]))
            .collect();
        Ok(Texture::new(width as usize, height as usize, pixels))
    }
}
