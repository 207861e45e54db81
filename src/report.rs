//! Rendering of the clinician-facing report raster.
//!
//! The report is a 1000x1000 RGB canvas: identifying text at the top, a block
//! of study details and measurements, and three overlays of the predicted mask
//! on representative slices along the bottom.

use crate::colormap::Colormap;
use crate::error::{HippoError, Result};
use crate::header::{Header, format_list};
use crate::quantifier::VolumeStatistics;
use crate::volume::{LabelVolume, Volume, normalize_to_u8, rotate_transpose};

use ab_glyph::{FontVec, PxScale};
use image::{ImageBuffer, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;
use log::{debug, info, warn};
use ndarray::ArrayView2;
use std::path::Path;

pub const CANVAS_SIZE: u32 = 1000;
pub const PRODUCT_TITLE: &str = "HippoVolume.AI";

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MAIN_FONT_SIZE: f32 = 20.0;
const HEADER_FONT_SIZE: f32 = 40.0;
const LINE_HEIGHT: i32 = 24;

const PANEL_X_OFFSET: u32 = 10;
const PANEL_X_PADDING: u32 = 10;
const PANEL_Y_OFFSET: u32 = 450;
const PANEL_MAX_WIDTH: u32 = 320;
const PANEL_MAX_HEIGHT: u32 = 540;

/// Raw interleaved RGB raster, 8 bits per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ReportImage {
    pub const SAMPLES_PER_PIXEL: u16 = 3;
    pub const BITS_PER_SAMPLE: u16 = 8;

    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Wrap bytes without checking them against the dimensions; the encoder
    /// validates the layout before writing.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes expected for the declared geometry
    pub fn expected_len(&self) -> usize {
        self.width as usize
            * self.height as usize
            * Self::SAMPLES_PER_PIXEL as usize
            * (Self::BITS_PER_SAMPLE as usize / 8)
    }

    pub fn to_rgb(&self) -> Option<RgbImage> {
        ImageBuffer::from_raw(self.width, self.height, self.pixels.clone())
    }
}

/// Composes report rasters. Text is only drawn when a font is available.
#[derive(Default)]
pub struct ReportComposer {
    font: Option<FontVec>,
}

impl ReportComposer {
    /// Use the TrueType/OpenType font at `font_path`.
    pub fn with_font_path(font_path: &Path) -> Result<Self> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data).map_err(|_| {
            HippoError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to parse font file: {}", font_path.display()),
            ))
        })?;
        Ok(Self { font: Some(font) })
    }

    /// Try a bundled asset and common system font locations.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "assets/Roboto-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(font_data)
            {
                info!("Loaded report font: {}", path);
                return Self { font: Some(font) };
            }
        }

        warn!("No font found, report text will not be rendered");
        Self::default()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn compose(
        &self,
        statistics: &VolumeStatistics,
        header: &Header,
        volume: &Volume,
        labels: &LabelVolume,
    ) -> ReportImage {
        let mut canvas = RgbImage::new(CANVAS_SIZE, CANVAS_SIZE);
        let slice_numbers = slice_indices(volume.num_slices());

        match &self.font {
            Some(font) => Self::draw_text(&mut canvas, font, statistics, header, &slice_numbers),
            None => debug!("Skipping report text, no font loaded"),
        }

        let mut x = PANEL_X_OFFSET;
        for &index in &slice_numbers {
            let (Some(plane), Some(mask)) = (volume.slice(index), labels.slice(index)) else {
                continue;
            };
            let panel = overlay(plane, mask);
            imageops::replace(&mut canvas, &panel, x as i64, PANEL_Y_OFFSET as i64);
            x += panel.width() + PANEL_X_PADDING;
        }

        ReportImage::from_rgb(canvas)
    }

    fn draw_text(
        canvas: &mut RgbImage,
        font: &FontVec,
        statistics: &VolumeStatistics,
        header: &Header,
        slice_numbers: &[usize; 3],
    ) {
        let main = PxScale::from(MAIN_FONT_SIZE);
        draw_text_mut(canvas, TEXT_COLOR, 10, 0, main, font, &header.patient_name);
        draw_text_mut(canvas, TEXT_COLOR, 10, 30, main, font, &header.patient_id);
        draw_text_mut(canvas, TEXT_COLOR, 10, 60, main, font, &header.modality);
        draw_text_mut(
            canvas,
            TEXT_COLOR,
            10,
            90,
            PxScale::from(HEADER_FONT_SIZE),
            font,
            PRODUCT_TITLE,
        );

        for (i, line) in detail_lines(statistics, header, slice_numbers)
            .iter()
            .enumerate()
        {
            draw_text_mut(
                canvas,
                TEXT_COLOR,
                10,
                170 + i as i32 * LINE_HEIGHT,
                main,
                font,
                line,
            );
        }
    }
}

/// Slices at one third, one half and three quarters of the stack.
pub fn slice_indices(num_slices: usize) -> [usize; 3] {
    [num_slices / 3, num_slices / 2, num_slices * 3 / 4]
}

/// The multi-line details block, one entry per line.
pub fn detail_lines(
    statistics: &VolumeStatistics,
    header: &Header,
    slice_numbers: &[usize; 3],
) -> Vec<String> {
    let slice_thickness = header
        .slice_thickness
        .map(|t| t.to_string())
        .unwrap_or_default();
    vec![
        format!("Study Description: {}", header.study_description),
        format!("Series Description: {}", header.series_description),
        format!("Slice Thickness: {slice_thickness}"),
        format!("Anterior volume: {}", statistics.anterior),
        format!("Posterior volume: {}", statistics.posterior),
        format!("Total volume: {}", statistics.total),
        format!("Pixel Spacing: {}", format_list(&header.pixel_spacing)),
        format!("Image Position: {}", format_list(&header.image_position)),
        format!("Image Orientation: {}", format_list(&header.image_orientation)),
        format!(
            "Showing prediction for axial slice numbers: {}, {}, {}",
            slice_numbers[0], slice_numbers[1], slice_numbers[2]
        ),
    ]
}

/// Panel geometry for a stored plane of `(rows, cols)`: three times as wide
/// and five times as tall, bounded so three panels fit on the canvas.
pub fn panel_size((rows, cols): (usize, usize)) -> (u32, u32) {
    let width = (cols as u32).saturating_mul(3).clamp(1, PANEL_MAX_WIDTH);
    let height = (rows as u32).saturating_mul(5).clamp(1, PANEL_MAX_HEIGHT);
    (width, height)
}

/// Blend a greyscale rendering of `plane` with a red rendering of `mask`.
fn overlay(plane: ArrayView2<'_, f32>, mask: ArrayView2<'_, u8>) -> RgbImage {
    let (width, height) = panel_size(plane.dim());

    let image = Colormap::Greys.colorize(&normalize_to_u8(rotate_transpose(plane).view()));
    let mask = Colormap::Reds.colorize(&normalize_to_u8(rotate_transpose(mask).view()));

    let image = imageops::resize(&image, width, height, imageops::FilterType::CatmullRom);
    let mask = imageops::resize(&mask, width, height, imageops::FilterType::CatmullRom);

    blend(&image, &mask)
}

// Equal-weight blend of two images of the same size.
fn blend(a: &RgbImage, b: &RgbImage) -> RgbImage {
    RgbImage::from_fn(a.width(), a.height(), |x, y| {
        let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
        Rgb(std::array::from_fn(|c| {
            ((pa.0[c] as u16 + pb.0[c] as u16 + 1) / 2) as u8
        }))
    })
}
