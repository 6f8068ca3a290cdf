//! Simple display variant: show the found photo on a single surface.

use image::DynamicImage;
use std::sync::{Mutex, PoisonError};

/// The surface the adapter draws on (an image view, a file, a terminal).
///
/// `set_image(None)` must remove whatever is currently shown.
pub trait DisplaySurface: Send {
    fn set_image(&mut self, image: Option<DynamicImage>);
}

/// Replaces the surface content with each presented image.
///
/// The surrounding glue clears the surface when a run starts (to signal
/// "searching") and presents on a `Found` outcome; `Empty` and `Failed`
/// outcomes present nothing, leaving the cleared surface as is.
pub struct DisplayAdapter {
    surface: Mutex<Box<dyn DisplaySurface>>,
}

impl DisplayAdapter {
    pub fn new(surface: Box<dyn DisplaySurface>) -> Self {
        Self {
            surface: Mutex::new(surface),
        }
    }

    /// Show `image`, replacing any prior content.
    pub fn present(&self, image: DynamicImage) {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_image(Some(image));
    }

    /// Clear the surface to empty.
    pub fn clear(&self) {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_image(None);
    }
}
