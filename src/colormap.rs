use image::{Rgb, RgbImage};
use ndarray::Array2;

// ColorBrewer sequential ramps, nine stops from low to high.
const GREYS: [[u8; 3]; 9] = [
    [255, 255, 255],
    [240, 240, 240],
    [217, 217, 217],
    [189, 189, 189],
    [150, 150, 150],
    [115, 115, 115],
    [82, 82, 82],
    [37, 37, 37],
    [0, 0, 0],
];

const REDS: [[u8; 3]; 9] = [
    [255, 245, 240],
    [254, 224, 210],
    [252, 187, 161],
    [252, 146, 114],
    [251, 106, 74],
    [239, 59, 44],
    [203, 24, 29],
    [165, 15, 21],
    [103, 0, 13],
];

/// Sequential colormaps used for the report overlays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    /// White for low values, black for high values
    Greys,
    /// Pale pink for low values, dark red for high values
    Reds,
}

impl Colormap {
    fn stops(&self) -> &'static [[u8; 3]; 9] {
        match self {
            Colormap::Greys => &GREYS,
            Colormap::Reds => &REDS,
        }
    }

    /// Linear interpolation between the stops, `0` and `255` hit the ends.
    pub fn lookup(&self, value: u8) -> Rgb<u8> {
        let stops = self.stops();
        let segments = (stops.len() - 1) as f32;
        let position = value as f32 / 255.0 * segments;
        let lower = (position.floor() as usize).min(stops.len() - 2);
        let t = position - lower as f32;

        let (a, b) = (stops[lower], stops[lower + 1]);
        Rgb(std::array::from_fn(|c| {
            (a[c] as f32 + (b[c] as f32 - a[c] as f32) * t).round() as u8
        }))
    }

    /// Colorize an 8-bit plane; rows map to image height.
    pub fn colorize(&self, plane: &Array2<u8>) -> RgbImage {
        let (height, width) = plane.dim();
        RgbImage::from_fn(width as u32, height as u32, |x, y| {
            self.lookup(plane[[y as usize, x as usize]])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn endpoints_match_ramp_ends() {
        assert_eq!(Colormap::Greys.lookup(0), Rgb([255, 255, 255]));
        assert_eq!(Colormap::Greys.lookup(255), Rgb([0, 0, 0]));
        assert_eq!(Colormap::Reds.lookup(0), Rgb([255, 245, 240]));
        assert_eq!(Colormap::Reds.lookup(255), Rgb([103, 0, 13]));
    }

    #[test]
    fn greys_is_monotonic() {
        let values: Vec<u8> = (0..=255).map(|v| Colormap::Greys.lookup(v).0[0]).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn colorize_keeps_plane_geometry() {
        let image = Colormap::Reds.colorize(&array![[0, 255, 0], [0, 0, 0]]);

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(*image.get_pixel(1, 0), Rgb([103, 0, 13]));
    }
}
