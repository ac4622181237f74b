//! Bounds-checked RGB raster that waterfall rows are painted onto.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use log::debug;

use crate::errors::*;
use crate::palette::*;

/// An in-memory RGB raster, origin at the top left.
///
/// Every write is bounds checked. Writes that fall off the canvas are reported
/// as [`Error::OutOfBounds`] instead of being dropped.
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.img.get_pixel_checked(x, y).copied()
    }

    fn check(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    pub fn set_point(&mut self, x: u32, y: u32, color: Rgb<u8>) -> Result<()> {
        self.check(x, y)?;
        self.img.put_pixel(x, y, color);
        Ok(())
    }

    /// Paint `height` cells downwards from `(x, y)`.
    pub fn set_column_run(&mut self, x: u32, y: u32, height: u32, color: Rgb<u8>) -> Result<()> {
        if height == 0 {
            return Ok(());
        }
        self.check(x, y)?;
        let last = y.checked_add(height - 1).ok_or(Error::OutOfBounds {
            x,
            y: u32::MAX,
            width: self.width(),
            height: self.height(),
        })?;
        self.check(x, last)?;

        for row in y..=last {
            self.img.put_pixel(x, row, color);
        }
        Ok(())
    }

    /// Vertical line centred on column `x` covering rows `y0..y1`.
    ///
    /// The centre column and the row range must lie on the canvas. Columns of
    /// a thick line that spill over the left or right edge are clipped.
    pub fn draw_vertical_line(
        &mut self,
        x: u32,
        y0: u32,
        y1: u32,
        thickness: u32,
        color: Rgb<u8>,
    ) -> Result<()> {
        if y1 <= y0 || thickness == 0 {
            return Ok(());
        }
        self.check(x, y0)?;
        self.check(x, y1 - 1)?;

        let start = x as i64 - ((thickness - 1) / 2) as i64;
        let end = (start + thickness as i64).min(self.width() as i64);
        for col in start.max(0) as u32..end as u32 {
            self.set_column_run(col, y0, y1 - y0, color)?;
        }
        Ok(())
    }

    /// Overlay full-height gridlines between stretched columns: every 3rd
    /// column in light grey, every 30th in white and every 300th in black.
    ///
    /// Sparser lines are drawn last so they win where positions coincide.
    pub fn overlay_grid(&mut self, stretch: u32, thickness: u32) -> Result<()> {
        if stretch == 0 || self.height() == 0 {
            return Ok(());
        }

        for (period, color) in [(3, LIGHT_GREY), (30, WHITE), (300, BLACK)] {
            let mut i = 0u32;
            loop {
                let x = stretch * i + stretch / 2;
                if x >= self.width() {
                    break;
                }
                self.draw_vertical_line(x, 0, self.height(), thickness, color)?;
                i += period;
            }
        }
        Ok(())
    }

    /// Encode as PNG, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::file_io(path, e))?;
        }

        let mut writer = BufWriter::new(File::create(path).map_err(|e| Error::file_io(path, e))?);
        self.img
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| Error::Image {
                file: path.display().to_string(),
                source: e,
            })?;
        writer.flush().map_err(|e| Error::file_io(path, e))?;

        debug!(
            "Wrote {}x{} image to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}
