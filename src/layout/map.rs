//! Maps drawn from GeoJSON polygons.
//!
//! Longitude and latitude are projected equirectangularly (x = lon,
//! y = lat, north up) and the whole collection is scaled uniformly to fit
//! the available rectangle. Only outer rings are drawn.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};
use crate::layout::shape::{emit_polygons, PathStyle};
use crate::layout::{LayoutBox, LayoutElement};
use crate::page::Page;
use crate::writer::ContentStreamBuilder;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

fn ring(positions: &[Vec<f64>]) -> Vec<Point> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Point::new(p[0] as f32, p[1] as f32))
        .collect()
}

/// One named area of a map.
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    synonyms: Vec<String>,
    polygons: Vec<Vec<Point>>,
    fill: Option<Color>,
    stroke: Option<Color>,
}

impl Region {
    /// Primary name (the `name` property when present).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every name this region answers to.
    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    /// Projected outer rings.
    pub fn polygons(&self) -> &[Vec<Point>] {
        &self.polygons
    }

    /// Fill override.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill
    }

    /// Stroke override.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke
    }

    fn answers_to(&self, name: &str) -> bool {
        self.synonyms.iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

/// A set of regions drawn as filled, stroked polygons.
#[derive(Debug, Clone)]
pub struct Map {
    layout: LayoutBox,
    regions: Vec<Region>,
    style: PathStyle,
}

impl Map {
    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// Features without a `Polygon` or `MultiPolygon` geometry are skipped.
    /// String properties whose key starts with `name` or `formal` become
    /// synonyms for region look-up.
    pub fn from_geojson(json: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(json)
            .map_err(|e| Error::InvalidArgument(format!("invalid GeoJSON: {}", e)))?;

        let mut regions = Vec::new();
        for (index, feature) in collection.features.into_iter().enumerate() {
            let polygons: Vec<Vec<Point>> = match feature.geometry {
                Some(Geometry::Polygon { coordinates }) => coordinates.first().map(|r| ring(r)).into_iter().collect(),
                Some(Geometry::MultiPolygon { coordinates }) => coordinates
                    .iter()
                    .filter_map(|polygon| polygon.first().map(|r| ring(r)))
                    .collect(),
                _ => {
                    log::debug!("skipping feature {} without polygon geometry", index);
                    continue;
                },
            };

            let properties = feature.properties.unwrap_or_default();
            let synonyms: Vec<String> = properties
                .iter()
                .filter(|(key, _)| {
                    let key = key.to_ascii_lowercase();
                    key.starts_with("name") || key.starts_with("formal")
                })
                .filter_map(|(_, value)| value.as_str().map(str::to_string))
                .collect();
            let name = properties
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| synonyms.first().cloned())
                .unwrap_or_else(|| format!("region-{}", index + 1));
            let mut synonyms = synonyms;
            if !synonyms.contains(&name) {
                synonyms.insert(0, name.clone());
            }

            regions.push(Region {
                name,
                synonyms,
                polygons,
                fill: None,
                stroke: None,
            });
        }
        log::debug!("map loaded with {} regions", regions.len());

        Ok(Self {
            layout: LayoutBox::default(),
            regions,
            style: PathStyle {
                stroke: Some(Color::BLACK),
                fill: Some(Color::WHITE),
                line_width: 0.5,
                dash: Vec::new(),
            },
        })
    }

    /// All regions in file order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Find a region by any of its names, ignoring case.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.answers_to(name))
    }

    fn region_mut(&mut self, name: &str) -> Result<&mut Region> {
        self.regions
            .iter_mut()
            .find(|r| r.answers_to(name))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown map region {:?}", name)))
    }

    /// Fill one region, looked up by any synonym.
    pub fn set_fill_color(&mut self, region: &str, color: Color) -> Result<&mut Self> {
        self.region_mut(region)?.fill = Some(color);
        Ok(self)
    }

    /// Stroke one region, looked up by any synonym.
    pub fn set_stroke_color(&mut self, region: &str, color: Color) -> Result<&mut Self> {
        self.region_mut(region)?.stroke = Some(color);
        Ok(self)
    }

    /// Default fill for regions without an override.
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.style.fill = Some(color);
        self
    }

    /// Default stroke for regions without an override.
    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.style.stroke = Some(color);
        self
    }

    /// Stroke width for every region.
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.style.line_width = width.max(0.0);
        self
    }

    fn bounds(&self) -> Option<Rect> {
        Rect::bounding(
            self.regions
                .iter()
                .flat_map(|r| r.polygons.iter().flatten().copied()),
        )
    }

    fn scale(bounds: Rect, available: Size) -> f32 {
        let sx = if bounds.width > 0.0 { available.width / bounds.width } else { f32::INFINITY };
        let sy = if bounds.height > 0.0 { available.height / bounds.height } else { f32::INFINITY };
        let s = sx.min(sy);
        if s.is_finite() {
            s
        } else {
            1.0
        }
    }
}

impl LayoutElement for Map {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "Map"
    }

    fn content_size(&self, available: Size) -> Size {
        let Some(bounds) = self.bounds() else {
            return Size::default();
        };
        let s = Self::scale(bounds, available);
        Size::new(bounds.width * s, bounds.height * s)
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        let Some(bounds) = self.bounds() else {
            return Ok(());
        };
        let s = Self::scale(bounds, area.size());
        let project = |p: Point| Point::new(area.x + (p.x - bounds.x) * s, area.y + (p.y - bounds.y) * s);

        let mut ops = ContentStreamBuilder::new();
        for region in &self.regions {
            let style = PathStyle {
                fill: region.fill.or(self.style.fill),
                stroke: region.stroke.or(self.style.stroke),
                ..self.style.clone()
            };
            emit_polygons(&mut ops, &region.polygons, &style, true, project);
        }
        page.content_stream_mut().append(&ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Belgium", "name_nl": "België", "NAME_FR": "Belgique", "formal_en": "Kingdom of Belgium", "pop": 11},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 5], [0, 5], [0, 0]]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Islands"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[20, 0], [30, 0], [30, 5, 100], [20, 0]]],
                    [[[20, 10], [30, 10], [25, 20], [20, 10]]]
                ]}
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {"type": "Point", "coordinates": [1, 1]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_regions() {
        let map = Map::from_geojson(SAMPLE).unwrap();
        assert_eq!(map.regions().len(), 2);
        assert_eq!(map.regions()[1].polygons().len(), 2);
        assert_eq!(map.region("belgique").unwrap().name(), "Belgium");
        assert_eq!(map.region("KINGDOM OF BELGIUM").unwrap().name(), "Belgium");
        assert!(map.region("pop").is_none());
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let mut map = Map::from_geojson(SAMPLE).unwrap();
        assert!(map.set_fill_color("Atlantis", Color::RED).is_err());
        map.set_fill_color("belgium", Color::RED).unwrap();
        assert_eq!(map.region("Belgium").unwrap().fill_color(), Some(Color::RED));
    }

    #[test]
    fn test_scaled_to_fit() {
        let map = Map::from_geojson(SAMPLE).unwrap();
        // Bounds are 30 x 20; fitting 300 x 300 scales by 10.
        assert_eq!(map.get_size(Size::new(300.0, 300.0)), Size::new(300.0, 200.0));
    }

    #[test]
    fn test_paint_uses_overrides() {
        let mut map = Map::from_geojson(SAMPLE).unwrap();
        map.set_fill_color("Islands", Color::BLUE).unwrap();
        let mut page = Page::new();
        map.paint(Rect::new(0.0, 0.0, 300.0, 200.0), &mut page).unwrap();
        let text = String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned();
        assert!(text.contains("0 0 1 rg"));
        assert!(text.contains("1 1 1 rg"));
        assert_eq!(text.lines().filter(|l| *l == "B").count(), 3);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Map::from_geojson("{"), Err(Error::InvalidArgument(_))));
    }
}
