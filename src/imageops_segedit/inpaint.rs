use image::Rgba;
use imageproc::definitions::Image;
use itertools::iproduct;
use log::debug;

use crate::error::InpaintError;
use crate::utils::{count_holes, is_hole};

/// Iteration budget used by [`Inpainter::default`].
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Iterative neighbour-average hole filling.
///
/// Every pass replaces each hole (alpha 0) that touches at least one opaque
/// pixel in its 3×3 neighbourhood with the truncated mean colour of those
/// pixels, made fully opaque. All pixels of a pass read the state left by the
/// previous pass, so colour diffuses inward one ring per pass. Passes repeat
/// until nothing changes or the iteration budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inpainter {
    max_iterations: usize,
}

/// Result of an [`Inpainter::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InpaintOutcome {
    /// The filled image.
    pub image: Image<Rgba<u8>>,
    /// Number of passes that changed at least one pixel.
    pub iterations: usize,
    /// Whether a pass without changes was reached within the budget.
    pub converged: bool,
}

impl Inpainter {
    /// Creates an inpainter running at most `max_iterations` passes.
    ///
    /// # Errors
    ///
    /// * `InpaintError::InvalidIterationBudget` - When `max_iterations` is 0
    pub const fn new(max_iterations: usize) -> Result<Self, InpaintError> {
        if max_iterations == 0 {
            return Err(InpaintError::InvalidIterationBudget(max_iterations));
        }
        Ok(Self { max_iterations })
    }

    pub const fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Fills the holes of `image`, returning a new image.
    ///
    /// Holes that no opaque colour can reach within the budget stay
    /// transparent. An image without any opaque pixel is returned unchanged.
    pub fn run(&self, image: &Image<Rgba<u8>>) -> InpaintOutcome {
        let mut read = image.clone();
        let mut iterations = 0;
        let mut converged = false;

        for _ in 0..self.max_iterations {
            let write = relax(&read);
            if write == read {
                converged = true;
                break;
            }
            read = write;
            iterations += 1;
        }

        if converged {
            debug!("inpainting converged after {iterations} filling passes");
        } else {
            debug!(
                "inpainting stopped at {} passes with {} holes remaining",
                self.max_iterations,
                count_holes(&read)
            );
        }

        InpaintOutcome {
            image: read,
            iterations,
            converged,
        }
    }
}

impl Default for Inpainter {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Trait providing hole filling for RGBA images
pub trait InpaintExt {
    /// Fills transparent pixels with the default [`Inpainter`]
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_segedit::{Image, InpaintExt};
    /// use image::Rgba;
    ///
    /// let mut image: Image<Rgba<u8>> = Image::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
    /// image.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
    ///
    /// let filled = image.fill_holes();
    /// assert_eq!(filled.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
    /// ```
    fn fill_holes(&self) -> Image<Rgba<u8>>;

    /// Fills transparent pixels with a configured [`Inpainter`]
    fn fill_holes_with(&self, inpainter: &Inpainter) -> Image<Rgba<u8>>;
}

impl InpaintExt for Image<Rgba<u8>> {
    fn fill_holes(&self) -> Image<Rgba<u8>> {
        self.fill_holes_with(&Inpainter::default())
    }

    fn fill_holes_with(&self, inpainter: &Inpainter) -> Image<Rgba<u8>> {
        inpainter.run(self).image
    }
}

/// Running colour sum over the valid neighbours of one hole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NeighborColorSum {
    red: u32,
    green: u32,
    blue: u32,
    count: u32,
}

impl NeighborColorSum {
    #[inline]
    fn add(self, Rgba([red, green, blue, _]): Rgba<u8>) -> Self {
        Self {
            red: self.red + u32::from(red),
            green: self.green + u32::from(green),
            blue: self.blue + u32::from(blue),
            count: self.count + 1,
        }
    }

    /// Truncated per-channel mean, fully opaque. `None` without neighbours.
    #[inline]
    fn average(self) -> Option<Rgba<u8>> {
        if self.count == 0 {
            return None;
        }
        Some(Rgba([
            (self.red / self.count) as u8,
            (self.green / self.count) as u8,
            (self.blue / self.count) as u8,
            u8::MAX,
        ]))
    }
}

/// Sums the opaque, in-bounds pixels of the 3×3 block centred on `(x, y)`.
fn accumulate_neighbors(read: &Image<Rgba<u8>>, x: u32, y: u32) -> NeighborColorSum {
    let (width, height) = read.dimensions();
    let rows = y.saturating_sub(1)..=(y + 1).min(height - 1);
    let columns = x.saturating_sub(1)..=(x + 1).min(width - 1);

    iproduct!(rows, columns)
        .map(|(ny, nx)| *read.get_pixel(nx, ny))
        .filter(|pixel| !is_hole(pixel))
        .fold(NeighborColorSum::default(), NeighborColorSum::add)
}

#[inline]
fn fill_pixel(read: &Image<Rgba<u8>>, x: u32, y: u32, pixel: &mut Rgba<u8>) {
    if !is_hole(pixel) {
        return;
    }
    if let Some(color) = accumulate_neighbors(read, x, y).average() {
        *pixel = color;
    }
}

/// One relaxation pass over the whole image.
#[cfg(not(feature = "rayon"))]
fn relax(read: &Image<Rgba<u8>>) -> Image<Rgba<u8>> {
    relax_sequential(read)
}

#[cfg(any(not(feature = "rayon"), test))]
fn relax_sequential(read: &Image<Rgba<u8>>) -> Image<Rgba<u8>> {
    let mut write = read.clone();
    for (x, y, pixel) in write.enumerate_pixels_mut() {
        fill_pixel(read, x, y, pixel);
    }
    write
}

/// One relaxation pass over the whole image, rows split across threads.
#[cfg(feature = "rayon")]
fn relax(read: &Image<Rgba<u8>>) -> Image<Rgba<u8>> {
    use rayon::iter::ParallelIterator;

    let mut write = read.clone();
    write
        .par_enumerate_pixels_mut()
        .for_each(|(x, y, pixel)| fill_pixel(read, x, y, pixel));
    write
}
