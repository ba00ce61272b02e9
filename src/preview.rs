use image::imageops::{self, FilterType};
use image::RgbImage;

/// One terminal cell drawn as an upper half block: `top` is the foreground,
/// `bottom` the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

/// A decoded result image, ready to be scaled into a terminal area.
#[derive(Debug, Clone)]
pub struct Preview {
    image: RgbImage,
}

impl Preview {
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let image = image::load_from_memory(bytes)?.to_rgb8();
        Ok(Self { image })
    }

    /// Rows of cells fitting in `cols` x `rows`. Each cell covers two
    /// vertical pixels, so pixels stay roughly square on screen.
    pub fn cells(&self, cols: u16, rows: u16) -> Vec<Vec<Cell>> {
        let (width, height) = self.image.dimensions();
        let max_w = u32::from(cols);
        let max_h = u32::from(rows) * 2;
        if width == 0 || height == 0 || max_w == 0 || max_h == 0 {
            return vec![];
        }

        let scale = f64::min(
            f64::from(max_w) / f64::from(width),
            f64::from(max_h) / f64::from(height),
        );
        let target_w = ((f64::from(width) * scale).floor() as u32).clamp(1, max_w);
        let mut target_h = ((f64::from(height) * scale).floor() as u32).clamp(1, max_h);
        if target_h % 2 == 1 {
            target_h += 1;
        }

        // nearest keeps module edges sharp
        let scaled = imageops::resize(&self.image, target_w, target_h, FilterType::Nearest);
        (0..target_h / 2)
            .map(|row| {
                (0..target_w)
                    .map(|x| Cell {
                        top: scaled.get_pixel(x, row * 2).0,
                        bottom: scaled.get_pixel(x, row * 2 + 1).0,
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker(side: u32) -> Preview {
        let image = RgbImage::from_fn(side, side, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        Preview { image }
    }

    #[test]
    fn fits_inside_the_area() {
        let preview = checker(100);
        let cells = preview.cells(40, 10);
        assert_eq!(cells.len(), 10);
        assert!(cells.iter().all(|row| row.len() == 20));
    }

    #[test]
    fn keeps_pixels_at_native_size() {
        let preview = checker(4);
        let cells = preview.cells(4, 2);
        assert_eq!(cells.len(), 2);
        assert_eq!(
            cells[0][0],
            Cell {
                top: [0, 0, 0],
                bottom: [255, 255, 255]
            }
        );
    }

    #[test]
    fn empty_area_yields_nothing() {
        assert!(checker(8).cells(0, 5).is_empty());
        assert!(checker(8).cells(5, 0).is_empty());
    }

    #[test]
    fn decode_rejects_non_images() {
        assert!(Preview::decode(b"definitely not a png").is_err());
    }
}
