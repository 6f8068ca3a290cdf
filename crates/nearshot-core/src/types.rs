//! Core data types for the nearshot pipeline.
//!
//! These types carry a discovered photo and the geography around it from
//! the search client through the pipeline to the presentation adapters.

use serde::{Deserialize, Serialize};

/// One discovered photo, as returned by the search provider.
///
/// Records are immutable once constructed. The search client guarantees
/// that `id` and `owner` are non-empty and that `url` resolves to a
/// downloadable image; entries missing any of those are filtered out
/// before a record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Provider-assigned photo id
    pub id: String,

    /// Provider-assigned owner id
    pub owner: String,

    /// Direct URL of the downloadable image
    pub url: String,

    /// Photo title, possibly empty
    pub caption: String,

    /// Latitude where the photo was taken (decimal degrees)
    pub lat: f64,

    /// Longitude where the photo was taken (decimal degrees)
    pub lon: f64,
}

impl PhotoRecord {
    /// The coordinate this photo was taken at.
    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.lat, self.lon)
    }

    /// Web page for this photo, built from `owner` and `id`.
    ///
    /// Used for user-facing linking only, never for fetching.
    pub fn photo_page_url(&self) -> String {
        format!("https://www.flickr.com/photos/{}/{}", self.owner, self.id)
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The minimal rectangular region containing a set of coordinates.
///
/// Built by a min/max fold, so a single coordinate (or several identical
/// ones) yields a valid zero-area region. Bounds spanning the
/// antimeridian are not special-cased.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest bounds containing every coordinate, or `None` for an
    /// empty slice.
    pub fn enclosing(coordinates: &[GeoCoordinate]) -> Option<Self> {
        let first = coordinates.first()?;
        let mut bounds = Self {
            south: first.lat,
            west: first.lon,
            north: first.lat,
            east: first.lon,
        };
        for c in &coordinates[1..] {
            bounds.south = bounds.south.min(c.lat);
            bounds.west = bounds.west.min(c.lon);
            bounds.north = bounds.north.max(c.lat);
            bounds.east = bounds.east.max(c.lon);
        }
        Some(bounds)
    }

    /// Geometric center of the region.
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Whether the region has degenerated to a single point.
    pub fn is_point(&self) -> bool {
        self.south == self.north && self.west == self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PhotoRecord {
        PhotoRecord {
            id: "54321".to_string(),
            owner: "98765@N00".to_string(),
            url: "https://live.staticflickr.com/1234/54321_abcd_m.jpg".to_string(),
            caption: "Boulder flatirons".to_string(),
            lat: 40.0,
            lon: -105.0,
        }
    }

    #[test]
    fn test_photo_page_url_from_owner_and_id() {
        let record = sample_record();
        assert_eq!(
            record.photo_page_url(),
            "https://www.flickr.com/photos/98765@N00/54321"
        );
    }

    #[test]
    fn test_record_coordinate() {
        let record = sample_record();
        assert_eq!(record.coordinate(), GeoCoordinate::new(40.0, -105.0));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PhotoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_enclosing_orders_corners() {
        let bounds = GeoBounds::enclosing(&[
            GeoCoordinate::new(40.0, -105.0),
            GeoCoordinate::new(39.5, -104.5),
        ])
        .unwrap();
        assert_eq!(bounds.south, 39.5);
        assert_eq!(bounds.west, -105.0);
        assert_eq!(bounds.north, 40.0);
        assert_eq!(bounds.east, -104.5);
        assert!(!bounds.is_point());
    }

    #[test]
    fn test_enclosing_identical_coordinates_is_zero_area() {
        let c = GeoCoordinate::new(40.0, -105.0);
        let bounds = GeoBounds::enclosing(&[c, c]).unwrap();
        assert!(bounds.is_point());
        assert_eq!(bounds.center(), c);
    }

    #[test]
    fn test_enclosing_empty_is_none() {
        assert!(GeoBounds::enclosing(&[]).is_none());
    }

    #[test]
    fn test_center_midpoint() {
        let bounds = GeoBounds {
            south: 0.0,
            west: -10.0,
            north: 10.0,
            east: 10.0,
        };
        assert_eq!(bounds.center(), GeoCoordinate::new(5.0, 0.0));
    }
}
