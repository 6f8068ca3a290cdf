//! Map variant: two markers (photo, self) framed by an animated camera.

use image::DynamicImage;
use std::sync::{Mutex, PoisonError};

use crate::pipeline::SearchOutcome;
use crate::types::{GeoBounds, GeoCoordinate};

/// The opaque external map the adapter drives.
///
/// `clear_markers` must be safe on an empty map.
pub trait MapRenderer: Send {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, coordinate: GeoCoordinate, icon: Option<&DynamicImage>);
    fn animate_to_bounds(&mut self, bounds: GeoBounds, margin_px: u32);
}

/// The most recent completed result, ready to draw.
struct Scene {
    photo: GeoCoordinate,
    user: GeoCoordinate,
    image: DynamicImage,
}

struct MapInner {
    renderer: Option<Box<dyn MapRenderer>>,
    scene: Option<Scene>,
}

/// Holds one scene slot and renders it whenever both the renderer and the
/// data are available.
///
/// The slot is written by the pipeline's completion path and read by
/// `render()`; the tokio runtime schedules both on real OS threads, so
/// the slot lives behind a mutex rather than relying on a single-threaded
/// presentation context.
pub struct MapAdapter {
    inner: Mutex<MapInner>,
    margin_px: u32,
}

impl MapAdapter {
    pub fn new(margin_px: u32) -> Self {
        Self {
            inner: Mutex::new(MapInner {
                renderer: None,
                scene: None,
            }),
            margin_px,
        }
    }

    /// Attach the renderer once the map is ready; draws any scene that
    /// completed while the map was still loading.
    pub fn attach(&self, renderer: Box<dyn MapRenderer>) {
        let mut inner = self.lock();
        inner.renderer = Some(renderer);
        Self::render_locked(&mut inner, self.margin_px);
    }

    /// Detach the renderer (the surrounding glue's stop hook). The scene
    /// is kept for the next attach.
    pub fn detach(&self) {
        self.lock().renderer = None;
    }

    /// Consume a completed outcome.
    ///
    /// `Found` atomically replaces the scene and redraws; `Empty` and
    /// `Failed` leave the previous scene visible — the map is never
    /// cleared speculatively.
    pub fn apply(&self, outcome: &SearchOutcome) {
        match outcome {
            SearchOutcome::Found {
                record,
                image,
                coordinate,
            } => {
                let mut inner = self.lock();
                inner.scene = Some(Scene {
                    photo: record.coordinate(),
                    user: *coordinate,
                    image: image.image.clone(),
                });
                Self::render_locked(&mut inner, self.margin_px);
            }
            SearchOutcome::Empty => tracing::debug!("nothing new to show on map"),
            SearchOutcome::Failed(e) => tracing::debug!(error = %e, "keeping previous map state"),
        }
    }

    /// Redraw the current scene. A no-op unless both the renderer is
    /// attached and a scene is present.
    pub fn render(&self) {
        let mut inner = self.lock();
        Self::render_locked(&mut inner, self.margin_px);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MapInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render_locked(inner: &mut MapInner, margin_px: u32) {
        let MapInner {
            renderer: Some(renderer),
            scene: Some(scene),
        } = inner
        else {
            return;
        };

        renderer.clear_markers();
        renderer.add_marker(scene.photo, Some(&scene.image));
        renderer.add_marker(scene.user, None);

        // Two coordinates always yield a bounds, degenerate or not.
        if let Some(bounds) = GeoBounds::enclosing(&[scene.photo, scene.user]) {
            renderer.animate_to_bounds(bounds, margin_px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhotoRecord;
    use image::ImageFormat;
    use std::sync::Arc;

    #[derive(Default)]
    struct RenderLog {
        markers: Vec<(GeoCoordinate, bool)>,
        camera: Option<(GeoBounds, u32)>,
        clears: usize,
    }

    #[derive(Clone, Default)]
    struct RecordingRenderer {
        log: Arc<Mutex<RenderLog>>,
    }

    impl MapRenderer for RecordingRenderer {
        fn clear_markers(&mut self) {
            let mut log = self.log.lock().unwrap();
            log.markers.clear();
            log.clears += 1;
        }

        fn add_marker(&mut self, coordinate: GeoCoordinate, icon: Option<&DynamicImage>) {
            self.log
                .lock()
                .unwrap()
                .markers
                .push((coordinate, icon.is_some()));
        }

        fn animate_to_bounds(&mut self, bounds: GeoBounds, margin_px: u32) {
            self.log.lock().unwrap().camera = Some((bounds, margin_px));
        }
    }

    fn found_outcome(photo: GeoCoordinate, user: GeoCoordinate) -> SearchOutcome {
        let image = DynamicImage::new_rgb8(2, 2);
        SearchOutcome::Found {
            record: PhotoRecord {
                id: "1".to_string(),
                owner: "98765@N00".to_string(),
                url: "https://img.example/1_m.jpg".to_string(),
                caption: "test".to_string(),
                lat: photo.lat,
                lon: photo.lon,
            },
            image: crate::pipeline::DecodedImage {
                width: image.width(),
                height: image.height(),
                byte_len: 0,
                format: ImageFormat::Png,
                image,
            },
            coordinate: user,
        }
    }

    #[test]
    fn test_render_without_renderer_or_scene_is_noop() {
        let adapter = MapAdapter::new(100);
        adapter.render(); // neither present

        let renderer = RecordingRenderer::default();
        adapter.attach(Box::new(renderer.clone()));
        adapter.render(); // renderer but no scene
        assert_eq!(renderer.log.lock().unwrap().clears, 0);
    }

    #[test]
    fn test_found_places_both_markers_and_frames_camera() {
        let adapter = MapAdapter::new(64);
        let renderer = RecordingRenderer::default();
        adapter.attach(Box::new(renderer.clone()));

        let photo = GeoCoordinate::new(40.013, -105.285);
        let user = GeoCoordinate::new(40.0, -105.0);
        adapter.apply(&found_outcome(photo, user));

        let log = renderer.log.lock().unwrap();
        assert_eq!(log.markers, vec![(photo, true), (user, false)]);
        let (bounds, margin) = log.camera.unwrap();
        assert_eq!(margin, 64);
        assert_eq!(bounds, GeoBounds::enclosing(&[photo, user]).unwrap());
    }

    #[test]
    fn test_render_is_idempotent() {
        let adapter = MapAdapter::new(100);
        let renderer = RecordingRenderer::default();
        adapter.attach(Box::new(renderer.clone()));

        let photo = GeoCoordinate::new(40.013, -105.285);
        let user = GeoCoordinate::new(40.0, -105.0);
        adapter.apply(&found_outcome(photo, user));
        adapter.render();
        adapter.render();

        // Markers never accumulate across redraws.
        let log = renderer.log.lock().unwrap();
        assert_eq!(log.markers.len(), 2);
        assert_eq!(log.clears, 3);
    }

    #[test]
    fn test_identical_coordinates_render_zero_area_bounds() {
        let adapter = MapAdapter::new(100);
        let renderer = RecordingRenderer::default();
        adapter.attach(Box::new(renderer.clone()));

        let c = GeoCoordinate::new(40.0, -105.0);
        adapter.apply(&found_outcome(c, c));

        let log = renderer.log.lock().unwrap();
        let (bounds, _) = log.camera.unwrap();
        assert!(bounds.is_point());
    }

    #[test]
    fn test_empty_and_failed_leave_scene_untouched() {
        let adapter = MapAdapter::new(100);
        let renderer = RecordingRenderer::default();
        adapter.attach(Box::new(renderer.clone()));

        let photo = GeoCoordinate::new(40.013, -105.285);
        let user = GeoCoordinate::new(40.0, -105.0);
        adapter.apply(&found_outcome(photo, user));

        adapter.apply(&SearchOutcome::Empty);
        adapter.apply(&SearchOutcome::Failed(
            crate::error::PipelineError::Network {
                url: "https://img.example/1_m.jpg".to_string(),
                message: "connection reset".to_string(),
                status_code: None,
            },
        ));

        // Still the original scene; no extra renders were triggered.
        adapter.render();
        let log = renderer.log.lock().unwrap();
        assert_eq!(log.markers, vec![(photo, true), (user, false)]);
    }

    #[test]
    fn test_scene_survives_detach_and_reattach() {
        let adapter = MapAdapter::new(100);
        let first = RecordingRenderer::default();
        adapter.attach(Box::new(first));

        let photo = GeoCoordinate::new(40.013, -105.285);
        let user = GeoCoordinate::new(40.0, -105.0);
        adapter.apply(&found_outcome(photo, user));

        adapter.detach();
        adapter.render(); // no renderer: safe no-op

        let second = RecordingRenderer::default();
        adapter.attach(Box::new(second.clone()));

        // Attach redraws the kept scene.
        let log = second.log.lock().unwrap();
        assert_eq!(log.markers.len(), 2);
    }
}
