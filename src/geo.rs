//! State polygons for the map view.
//!
//! This module handles:
//! - Parsing a GeoJSON FeatureCollection keyed by state code
//! - Mercator projection and fitting the map into a screen rectangle
//! - Triangulating outer rings so concave states can be filled
//! - Hit-testing the pointer against state polygons
//! - Fetching and caching the GeoJSON, with a tile-grid layout as fallback
//!
//! Coordinates are kept in projected "map space" (x east, y north) and only
//! converted to screen space through a [`Viewport`].

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_4;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::app_data::app_data;
use crate::config;
use crate::regions::{self, StateCode};

/// A point in map or screen space
pub type Point = [f64; 2];

/// Gap between cells of the tile-grid layout, as a fraction of a cell
const TILE_GAP: f64 = 0.1;

/// Mercator is undefined at the poles
const MAX_LATITUDE: f64 = 85.0;

const USER_AGENT: &str = concat!("hackhere/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while loading map geometry
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON contains no state polygons")]
    NoRegions,
}

/// Where the current geometry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    TileGrid,
    GeoJson,
}

/// One filled area: an outer ring, optional holes and its triangulation
#[derive(Debug, Clone)]
pub struct Polygon {
    pub outer: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
    /// Indices into `outer`
    pub triangles: Vec<[usize; 3]>,
}

impl Polygon {
    fn new(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let triangles = triangulate(&outer);
        Self {
            outer,
            holes,
            triangles,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        ring_contains(&self.outer, p) && !self.holes.iter().any(|hole| ring_contains(hole, p))
    }

    fn area(&self) -> f64 {
        signed_area(&self.outer).abs()
    }
}

/// All polygons belonging to one state
#[derive(Debug, Clone)]
pub struct RegionShape {
    pub code: StateCode,
    pub polygons: Vec<Polygon>,
    /// Where to draw the state label
    pub label_pos: Point,
}

impl RegionShape {
    fn new(code: StateCode, polygons: Vec<Polygon>) -> Self {
        let label_pos = polygons
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .map(|largest| Bounds::of(&largest.outer).center())
            .unwrap_or([0.0, 0.0]);
        Self {
            code,
            polygons,
            label_pos,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.polygons.iter().any(|polygon| polygon.contains(p))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    fn of(points: &[Point]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.include(p);
        }
        bounds
    }

    fn include(&mut self, p: Point) {
        self.min = [self.min[0].min(p[0]), self.min[1].min(p[1])];
        self.max = [self.max[0].max(p[0]), self.max[1].max(p[1])];
    }

    fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> Point {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

/// Fitted mapping between map space and a screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    /// Screen position of the map's top-left corner
    origin: Point,
    min_x: f64,
    max_y: f64,
}

impl Viewport {
    pub fn to_screen(&self, p: Point) -> Point {
        [
            self.origin[0] + (p[0] - self.min_x) * self.scale,
            self.origin[1] + (self.max_y - p[1]) * self.scale,
        ]
    }

    pub fn to_map(&self, s: Point) -> Point {
        [
            self.min_x + (s[0] - self.origin[0]) / self.scale,
            self.max_y - (s[1] - self.origin[1]) / self.scale,
        ]
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// The complete set of state shapes shown by the map
#[derive(Debug, Clone)]
pub struct MapGeometry {
    pub source: GeometrySource,
    pub regions: Vec<RegionShape>,
    bounds: Bounds,
}

impl MapGeometry {
    fn new(source: GeometrySource, regions: Vec<RegionShape>) -> Self {
        let mut bounds = Bounds::empty();
        for polygon in regions.iter().flat_map(|r| &r.polygons) {
            for &p in &polygon.outer {
                bounds.include(p);
            }
        }
        if bounds.is_empty() {
            bounds = Bounds {
                min: [0.0, 0.0],
                max: [1.0, 1.0],
            };
        }
        Self {
            source,
            regions,
            bounds,
        }
    }

    /// One square cell per state, laid out roughly like the country
    pub fn tile_grid() -> Self {
        let size = 1.0 - TILE_GAP;
        let shapes = regions::all()
            .iter()
            .map(|region| {
                let x = f64::from(region.tile[0]);
                let top = -f64::from(region.tile[1]);
                let outer = vec![
                    [x, top - size],
                    [x + size, top - size],
                    [x + size, top],
                    [x, top],
                ];
                RegionShape::new(StateCode::new(region.code.as_str()), vec![Polygon::new(outer, Vec::new())])
            })
            .collect();
        Self::new(GeometrySource::TileGrid, shapes)
    }

    /// Parse a GeoJSON FeatureCollection.
    ///
    /// The state code is read from `properties.sigla`, falling back to
    /// `properties.UF`. Features without a code or without polygon geometry
    /// are skipped; features sharing a code are merged.
    pub fn from_geojson(text: &str) -> Result<Self, GeoError> {
        let collection: FeatureCollection = serde_json::from_str(text)?;

        let mut projected: BTreeMap<StateCode, Vec<Vec<Vec<Point>>>> = BTreeMap::new();
        for feature in collection.features {
            let Some(code) = feature.properties.and_then(FeatureProperties::code) else {
                continue;
            };
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let polygons: Vec<Vec<Vec<Point>>> = match geometry.kind.as_str() {
                "Polygon" => polygon_from_value(&geometry.coordinates).into_iter().collect(),
                "MultiPolygon" => geometry
                    .coordinates
                    .as_array()
                    .map(|polys| polys.iter().filter_map(polygon_from_value).collect())
                    .unwrap_or_default(),
                other => {
                    tracing::debug!("Skipping {} geometry for {}", other, code);
                    Vec::new()
                }
            };
            projected.entry(code).or_default().extend(polygons);
        }

        let mut bounds = Bounds::empty();
        for ring in projected.values().flatten().filter_map(|rings| rings.first()) {
            for &p in ring {
                bounds.include(p);
            }
        }
        if bounds.is_empty() {
            return Err(GeoError::NoRegions);
        }

        let tolerance = bounds.width().max(bounds.height()) * app_data().map.simplify_tolerance;
        let shapes: Vec<RegionShape> = projected
            .into_iter()
            .filter_map(|(code, polygons)| {
                let polygons: Vec<Polygon> = polygons
                    .into_iter()
                    .filter_map(|rings| {
                        let mut rings = rings.into_iter().map(|ring| simplify(&ring, tolerance));
                        let outer = rings.next().filter(|ring| ring.len() >= 3)?;
                        let holes = rings.filter(|ring| ring.len() >= 3).collect();
                        Some(Polygon::new(outer, holes))
                    })
                    .collect();
                (!polygons.is_empty()).then(|| RegionShape::new(code, polygons))
            })
            .collect();

        if shapes.is_empty() {
            return Err(GeoError::NoRegions);
        }
        tracing::info!("Parsed GeoJSON with {} states", shapes.len());
        Ok(Self::new(GeometrySource::GeoJson, shapes))
    }

    pub fn is_tile_grid(&self) -> bool {
        self.source == GeometrySource::TileGrid
    }

    /// Fit the whole map into a screen rectangle, keeping its aspect ratio
    /// and centering it on the unused axis
    pub fn viewport(&self, rect_min: Point, rect_size: Point, padding: f64) -> Viewport {
        let avail_w = (rect_size[0] - 2.0 * padding).max(1.0);
        let avail_h = (rect_size[1] - 2.0 * padding).max(1.0);
        let width = self.bounds.width().max(f64::EPSILON);
        let height = self.bounds.height().max(f64::EPSILON);
        let scale = (avail_w / width).min(avail_h / height);

        let origin = [
            rect_min[0] + padding + (avail_w - width * scale) / 2.0,
            rect_min[1] + padding + (avail_h - height * scale) / 2.0,
        ];
        Viewport {
            scale,
            origin,
            min_x: self.bounds.min[0],
            max_y: self.bounds.max[1],
        }
    }

    /// The state whose polygon contains a map-space point
    pub fn region_at(&self, p: Point) -> Option<&RegionShape> {
        self.regions.iter().find(|region| region.contains(p))
    }
}

// ============================================================================
// GeoJSON
// ============================================================================

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    sigla: Option<String>,
    #[serde(default, rename = "UF")]
    uf: Option<String>,
}

impl FeatureProperties {
    fn code(self) -> Option<StateCode> {
        self.sigla
            .filter(|s| !s.trim().is_empty())
            .or(self.uf)
            .and_then(|s| StateCode::parse(&s))
    }
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Project a longitude/latitude pair (degrees) with spherical Mercator
pub fn project(lon: f64, lat: f64) -> Point {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    [lon.to_radians(), (FRAC_PI_4 + lat / 2.0).tan().ln()]
}

fn ring_from_value(value: &Value) -> Option<Vec<Point>> {
    value
        .as_array()?
        .iter()
        .map(|position| {
            let position = position.as_array()?;
            Some(project(position.first()?.as_f64()?, position.get(1)?.as_f64()?))
        })
        .collect()
}

/// Rings of one polygon; the first ring is the outer boundary
fn polygon_from_value(value: &Value) -> Option<Vec<Vec<Point>>> {
    let rings: Vec<Vec<Point>> = value
        .as_array()?
        .iter()
        .filter_map(ring_from_value)
        .collect();
    (!rings.is_empty()).then_some(rings)
}

// ============================================================================
// Polygon math
// ============================================================================

/// Drop points closer than `tolerance` to the previously kept point,
/// including the closing point GeoJSON repeats at the end of each ring
fn simplify(ring: &[Point], tolerance: f64) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        if kept.last().is_none_or(|&last| distance(last, p) > tolerance) {
            kept.push(p);
        }
    }
    while kept.len() > 1 && kept.first().zip(kept.last()).is_some_and(|(&a, &b)| distance(a, b) <= tolerance) {
        kept.pop();
    }
    kept
}

fn distance(a: Point, b: Point) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Positive for counter-clockwise rings
fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
        / 2.0
}

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Inclusive test against a counter-clockwise triangle
fn in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear-clipping triangulation of a simple ring.
///
/// Returns index triples into `ring`, all counter-clockwise. If the ring is
/// degenerate enough that no ear can be found, the remainder is fanned.
fn triangulate(ring: &[Point]) -> Vec<[usize; 3]> {
    if ring.len() < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..ring.len()).collect();
    if signed_area(ring) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(ring.len() - 2);
    let mut i = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let n = remaining.len();
        if misses >= n {
            for k in 1..n - 1 {
                triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
            }
            return triangles;
        }

        i %= n;
        let prev = remaining[(i + n - 1) % n];
        let cur = remaining[i];
        let next = remaining[(i + 1) % n];
        let turn = cross(ring[prev], ring[cur], ring[next]);

        if turn.abs() <= f64::EPSILON {
            // Collinear vertex: contributes no area
            remaining.remove(i);
            misses = 0;
            continue;
        }

        let is_ear = turn > 0.0
            && !remaining.iter().any(|&k| {
                k != prev && k != cur && k != next && in_triangle(ring[k], ring[prev], ring[cur], ring[next])
            });

        if is_ear {
            triangles.push([prev, cur, next]);
            remaining.remove(i);
            misses = 0;
        } else {
            i += 1;
            misses += 1;
        }
    }

    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }
    triangles
}

/// Even-odd ray casting
fn ring_contains(ring: &[Point], p: Point) -> bool {
    let Some(&last) = ring.last() else {
        return false;
    };

    let mut inside = false;
    let mut prev = last;
    for &cur in ring {
        if (cur[1] > p[1]) != (prev[1] > p[1]) {
            let x_cross = (prev[0] - cur[0]) * (p[1] - cur[1]) / (prev[1] - cur[1]) + cur[0];
            if p[0] < x_cross {
                inside = !inside;
            }
        }
        prev = cur;
    }
    inside
}

// ============================================================================
// Loading
// ============================================================================

/// Location of the cached GeoJSON
pub fn cache_path() -> Option<PathBuf> {
    config::project_dirs()
        .ok()
        .map(|dirs| dirs.cache_dir().join(&app_data().map.cache_file))
}

/// Read geometry from the cache, if a valid copy exists
pub fn load_cached() -> Option<MapGeometry> {
    let path = cache_path()?;
    if !path.exists() {
        return None;
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(GeoError::from)
        .and_then(|text| MapGeometry::from_geojson(&text));
    match parsed {
        Ok(geometry) => {
            tracing::info!("Loaded map geometry from cache {:?}", path);
            Some(geometry)
        }
        Err(e) => {
            tracing::warn!("Ignoring unusable map cache {:?}: {}", path, e);
            None
        }
    }
}

/// Download the GeoJSON document
pub async fn fetch_geojson(url: &str) -> Result<String, GeoError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?;

    let text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

/// Download and parse geometry, storing the raw document in the cache
pub async fn fetch_geometry(url: String, cache: bool) -> Result<MapGeometry, GeoError> {
    tracing::info!("Fetching map geometry from {}", url);
    let text = fetch_geojson(&url).await?;
    let geometry = MapGeometry::from_geojson(&text)?;

    if cache {
        if let Some(path) = cache_path() {
            if let Err(e) = write_cache(&path, &text).await {
                tracing::warn!("Failed to cache map geometry at {:?}: {}", path, e);
            }
        }
    }

    Ok(geometry)
}

async fn write_cache(path: &std::path::Path, text: &str) -> Result<(), GeoError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"sigla": "SP", "name": "São Paulo"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-53.0, -25.0], [-44.0, -25.0], [-44.0, -20.0], [-53.0, -20.0], [-53.0, -25.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"UF": "RJ"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-44.0, -23.0, 0.0], [-41.0, -23.0, 0.0], [-41.0, -21.0, 0.0], [-44.0, -21.0, 0.0]]],
                        [[[-44.5, -23.3], [-44.2, -23.3], [-44.2, -23.1]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "no code"},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": {"sigla": "DF"},
                "geometry": {"type": "Point", "coordinates": [-47.9, -15.8]}
            }
        ]
    }"#;

    fn triangle_area(ring: &[Point], t: &[usize; 3]) -> f64 {
        cross(ring[t[0]], ring[t[1]], ring[t[2]]) / 2.0
    }

    #[test]
    fn test_parse_geojson() {
        let geometry = MapGeometry::from_geojson(SAMPLE).unwrap();
        assert_eq!(geometry.source, GeometrySource::GeoJson);

        let codes: Vec<&str> = geometry.regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["RJ", "SP"]);

        let rj = &geometry.regions[0];
        assert_eq!(rj.polygons.len(), 2);
    }

    #[test]
    fn test_parse_geojson_without_states() {
        let text = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(MapGeometry::from_geojson(text), Err(GeoError::NoRegions)));
        assert!(matches!(MapGeometry::from_geojson("{"), Err(GeoError::Parse(_))));
    }

    #[test]
    fn test_region_at_projected_point() {
        let geometry = MapGeometry::from_geojson(SAMPLE).unwrap();

        let inside_sp = project(-50.0, -22.0);
        assert_eq!(geometry.region_at(inside_sp).map(|r| r.code.as_str()), Some("SP"));

        let inside_rj = project(-42.0, -22.0);
        assert_eq!(geometry.region_at(inside_rj).map(|r| r.code.as_str()), Some("RJ"));

        let ocean = project(-30.0, -22.0);
        assert!(geometry.region_at(ocean).is_none());
    }

    #[test]
    fn test_project_orientation() {
        let south = project(-50.0, -25.0);
        let north = project(-50.0, -20.0);
        let east = project(-45.0, -25.0);
        assert!(north[1] > south[1]);
        assert!(east[0] > south[0]);
        assert!(project(0.0, 90.0)[1].is_finite());
    }

    #[test]
    fn test_tile_grid_has_every_state() {
        let geometry = MapGeometry::tile_grid();
        assert!(geometry.is_tile_grid());
        assert_eq!(geometry.regions.len(), 27);

        let sp = geometry.regions.iter().find(|r| r.code.as_str() == "SP").unwrap();
        assert_eq!(geometry.region_at(sp.label_pos).map(|r| r.code.as_str()), Some("SP"));
    }

    #[test]
    fn test_triangulate_concave_ring() {
        // An "L" shape, clockwise to exercise the orientation fix
        let ring = vec![
            [0.0, 0.0],
            [0.0, 2.0],
            [1.0, 2.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [2.0, 0.0],
        ];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 4);

        let total: f64 = triangles.iter().map(|t| triangle_area(&ring, t)).sum();
        assert!((total - 3.0).abs() < 1e-9);
        assert!(triangles.iter().all(|t| triangle_area(&ring, t) > 0.0));
    }

    #[test]
    fn test_triangulate_degenerate_input() {
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());

        // Collinear points are dropped without producing slivers
        let ring = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        let total: f64 = triangulate(&ring).iter().map(|t| triangle_area(&ring, t)).sum();
        assert!((total - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_simplify_drops_close_and_closing_points() {
        let ring = vec![[0.0, 0.0], [0.001, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        assert_eq!(simplify(&ring, 0.01), vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_ring_contains_with_hole() {
        let outer = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
        let hole = vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]];
        let polygon = Polygon::new(outer, vec![hole]);

        assert!(polygon.contains([0.5, 0.5]));
        assert!(!polygon.contains([2.0, 2.0]));
        assert!(!polygon.contains([5.0, 2.0]));
    }

    #[test]
    fn test_viewport_round_trip_and_fit() {
        let geometry = MapGeometry::tile_grid();
        let viewport = geometry.viewport([10.0, 20.0], [600.0, 800.0], 16.0);

        let p = [2.5, -4.5];
        let back = viewport.to_map(viewport.to_screen(p));
        assert!((back[0] - p[0]).abs() < 1e-9 && (back[1] - p[1]).abs() < 1e-9);

        let bounds = geometry.bounds;
        let top_left = viewport.to_screen([bounds.min[0], bounds.max[1]]);
        let bottom_right = viewport.to_screen([bounds.max[0], bounds.min[1]]);
        assert!(top_left[0] >= 26.0 - 1e-9 && top_left[1] >= 36.0 - 1e-9);
        assert!(bottom_right[0] <= 594.0 + 1e-9 && bottom_right[1] <= 804.0 + 1e-9);
    }
}
