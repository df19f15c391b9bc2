//! Image sinks: PPM text and PNG.

use anyhow::{Context, Result};
use image::RgbImage;
use log::info;
use sable_renderer::{quantize, ImageBuffer, RowOrder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `image` as plain-text PPM (P3), top scanline first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut out: W) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width(), image.height())?;
    writeln!(out, "255")?;

    for row in image.rows(RowOrder::TopDown) {
        for color in row {
            let [r, g, b] = quantize(*color);
            writeln!(out, "{r} {g} {b}")?;
        }
    }
    out.flush()
}

/// Convert to an 8-bit `image` buffer, top scanline first.
pub fn to_rgb_image(image: &ImageBuffer) -> Result<RgbImage> {
    RgbImage::from_raw(image.width(), image.height(), image.to_rgb8(RowOrder::TopDown))
        .context("pixel buffer does not match image dimensions")
}

/// Save to `path`, picking the format from its extension.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("ppm") => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_ppm(image, BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        Some("png") => {
            to_rgb_image(image)?
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "unsupported output extension for {}; use .ppm or .png",
            path.display()
        ),
    }

    info!("Image saved as {}", path.display());
    Ok(())
}

/// Stream PPM to stdout.
pub fn write_stdout(image: &ImageBuffer) -> Result<()> {
    let stdout = io::stdout();
    write_ppm(image, BufWriter::new(stdout.lock())).context("failed to write PPM to stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_renderer::Color;

    #[test]
    fn test_ppm_emits_bottom_row_last() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::ONE);
        image.set(1, 1, Color::new(0.5, 0.25, 0.0));

        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(&lines[..3], &["P3", "2 2", "255"]);
        assert_eq!(lines[3], "0 0 0");
        assert_eq!(lines[4], "128 64 0");
        assert_eq!(lines[5], "255 255 255");
        assert_eq!(lines.len(), 3 + 4);
    }

    #[test]
    fn test_rgb_image_is_top_down() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 0, Color::new(1.0, 0.0, 0.0));

        let rgb = to_rgb_image(&image).unwrap();
        assert_eq!(rgb.get_pixel(2, 1).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(2, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let image = ImageBuffer::new(1, 1);
        assert!(save(&image, Path::new("render.bmp.txt")).is_err());
    }
}
