//! Optional organisation logo: the one asynchronous step of a build.
//!
//! Every failure along the way (network, missing file, undecodable bytes)
//! collapses to `None`; the receipt is then simply printed without a logo.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::FilterType;
use tracing::{instrument, warn};

use crate::render::EmbeddedImage;

/// Longest edge, in pixels, of an embedded logo.
const MAX_LOGO_PIXELS: u32 = 256;

/// Fetches raw logo bytes from wherever an organisation points.
#[async_trait]
pub trait LogoSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Option<Vec<u8>>;
}

/// Resolves `http(s)://` URLs over the network, `data:` URLs inline and
/// anything else (`file://` or a bare path) from disk.
#[derive(Clone, Default)]
pub struct DefaultLogoSource {
    client: reqwest::Client,
}

impl DefaultLogoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a caller-configured client, e.g. one with a timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_http(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(url, error = %err, "logo request failed");
                return None;
            }
        };
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(err) => {
                warn!(url, error = %err, "logo request rejected");
                return None;
            }
        };
        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(err) => {
                warn!(url, error = %err, "logo body could not be read");
                None
            }
        }
    }

    async fn fetch_file(&self, path: PathBuf) -> Option<Vec<u8>> {
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "logo file unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl LogoSource for DefaultLogoSource {
    async fn fetch(&self, location: &str) -> Option<Vec<u8>> {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_http(location).await
        } else if location.starts_with("data:") {
            decode_data_url(location)
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            self.fetch_file(PathBuf::from(path)).await
        }
    }
}

/// Never yields a logo.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogoSource;

#[async_trait]
impl LogoSource for NoLogoSource {
    async fn fetch(&self, _location: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Fetches and decodes a logo, returning `None` on any failure.
#[instrument(name = "load_logo", skip_all)]
pub async fn load_logo(source: &dyn LogoSource, location: &str) -> Option<EmbeddedImage> {
    let bytes = source.fetch(location).await?;
    let image = decode_logo(&bytes);
    if image.is_none() {
        warn!(bytes = bytes.len(), "logo bytes could not be decoded");
    }
    image
}

/// Decodes any supported raster, downsizes it and flattens alpha onto white.
pub fn decode_logo(bytes: &[u8]) -> Option<EmbeddedImage> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let decoded = if decoded.width() > MAX_LOGO_PIXELS || decoded.height() > MAX_LOGO_PIXELS {
        decoded.resize(MAX_LOGO_PIXELS, MAX_LOGO_PIXELS, FilterType::Triangle)
    } else {
        decoded
    };
    let rgba = decoded.to_rgba8();
    let (pixel_width, pixel_height) = rgba.dimensions();
    if pixel_width == 0 || pixel_height == 0 {
        return None;
    }
    let mut rgb = Vec::with_capacity(pixel_width as usize * pixel_height as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        for channel in [r, g, b] {
            let blended = (channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    Some(EmbeddedImage {
        pixel_width,
        pixel_height,
        rgb,
    })
}

fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let (meta, payload) = url.strip_prefix("data:")?.split_once(',')?;
    if !meta.ends_with(";base64") {
        warn!("logo data url is not base64 encoded");
        return None;
    }
    match STANDARD.decode(payload.trim()) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!(error = %err, "logo data url is malformed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, color);
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_into_rgb() {
        let logo = decode_logo(&png_bytes(4, 2, Rgba([200, 10, 10, 255]))).unwrap();
        assert_eq!((logo.pixel_width, logo.pixel_height), (4, 2));
        assert_eq!(logo.rgb.len(), 4 * 2 * 3);
        assert_eq!(&logo.rgb[..3], &[200, 10, 10]);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let logo = decode_logo(&png_bytes(1, 1, Rgba([0, 0, 0, 0]))).unwrap();
        assert_eq!(logo.rgb, vec![255, 255, 255]);
    }

    #[test]
    fn large_logos_are_downsized() {
        let logo = decode_logo(&png_bytes(1024, 512, Rgba([0, 0, 255, 255]))).unwrap();
        assert_eq!(logo.pixel_width, MAX_LOGO_PIXELS);
        assert_eq!(logo.pixel_height, MAX_LOGO_PIXELS / 2);
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        assert!(decode_logo(b"definitely not an image").is_none());
    }

    #[tokio::test]
    async fn data_urls_are_decoded_inline() {
        let png = png_bytes(2, 2, Rgba([1, 2, 3, 255]));
        let url = format!("data:image/png;base64,{}", STANDARD.encode(&png));
        let logo = load_logo(&DefaultLogoSource::new(), &url).await.unwrap();
        assert_eq!(logo.pixel_width, 2);
    }

    #[tokio::test]
    async fn missing_file_yields_no_logo() {
        let source = DefaultLogoSource::new();
        assert!(load_logo(&source, "/nonexistent/parish/logo.png")
            .await
            .is_none());
    }
}
