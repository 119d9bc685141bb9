use std::path::Path;

use anyhow::Context as _;

use crate::{data_structures::texture::Texture, resources::load_binary};

/// File extension as an image format hint, e.g. `"jpg"` for `earth.jpg`.
fn format_hint(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|e| e.to_str())
}

pub async fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    root: &Path,
    file_name: &str,
) -> anyhow::Result<Texture> {
    let data = load_binary(root, file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name, format_hint(file_name))
        .with_context(|| format!("cannot decode {}", file_name))
}

/// Load a texture, or log a warning and use `fallback` when it is missing or unreadable.
pub async fn load_texture_or(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    root: &Path,
    file_name: &str,
    fallback: impl FnOnce() -> Texture,
) -> Texture {
    match load_texture(device, queue, root, file_name).await {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("{:#}; using a generated texture", e);
            fallback()
        }
    }
}

/// Build a cube map from six image files in the order +X, -X, +Y, -Y, +Z, -Z.
pub async fn load_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    root: &Path,
    faces: [&str; 6],
    label: &str,
) -> anyhow::Result<Texture> {
    let mut images = Vec::with_capacity(6);
    for face in faces {
        let data = load_binary(root, face).await?;
        let img = match format_hint(face).and_then(image::ImageFormat::from_extension) {
            Some(format) => image::load_from_memory_with_format(&data, format),
            None => image::load_from_memory(&data),
        }
        .with_context(|| format!("cannot decode cube face {}", face))?;
        images.push(img.to_rgba8());
    }
    let images: [image::RgbaImage; 6] = images
        .try_into()
        .map_err(|_| anyhow::anyhow!("cube map {} needs six faces", label))?;
    Texture::cube_from_images(device, queue, &images, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_the_hint() {
        assert_eq!(format_hint("Textures/earth.jpg"), Some("jpg"));
        assert_eq!(format_hint("sky"), None);
    }
}
