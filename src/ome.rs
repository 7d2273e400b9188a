//! The bio-imaging overlay: typed navigation over groups whose
//! attributes describe multiscale images, label masks, or
//! high-content-screening plates.

use serde::Deserialize;
use serde_json::Value;

use crate::array::{Array, ReadOptions};
use crate::coords::{CoordinateMapping, CoordinateTransform};
use crate::error::{Error, Result};
use crate::group::Group;
use crate::metadata::JsonObject;
use crate::region::{PhysicalRegion, PixelRegion};

/// One axis of a multiscale image.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Axis {
    pub name: String,
    #[serde(rename = "type", default)]
    pub axis_type: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Axis {
    fn named(name: &str, axis_type: &str) -> Self {
        Self {
            name: name.to_string(),
            axis_type: Some(axis_type.to_string()),
            unit: None,
        }
    }
}

// Very old overlays write axes as a plain list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum AxisEntry {
    Full(Axis),
    Name(String),
}

impl From<AxisEntry> for Axis {
    fn from(entry: AxisEntry) -> Self {
        match entry {
            AxisEntry::Full(axis) => axis,
            AxisEntry::Name(name) => Self {
                name,
                axis_type: None,
                unit: None,
            },
        }
    }
}

/// Axes assumed when an overlay predates the axes field: the rank-length
/// suffix of `(t, c, z, y, x)`. Never inferred beyond rank 5.
fn inferred_axes(ndim: usize) -> Result<Vec<Axis>> {
    const CANONICAL: [(&str, &str); 5] = [
        ("t", "time"),
        ("c", "channel"),
        ("z", "space"),
        ("y", "space"),
        ("x", "space"),
    ];
    if ndim == 0 || ndim > CANONICAL.len() {
        return Err(Error::Unsupported(format!(
            "cannot infer axes for a rank-{ndim} image"
        )));
    }
    Ok(CANONICAL[CANONICAL.len() - ndim..]
        .iter()
        .map(|(name, kind)| Axis::named(name, kind))
        .collect())
}

#[derive(Deserialize)]
struct DatasetDocument {
    path: String,
    #[serde(default, rename = "coordinateTransformations")]
    coordinate_transformations: Vec<Value>,
}

#[derive(Deserialize)]
struct MultiscaleDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    axes: Option<Vec<AxisEntry>>,
    datasets: Vec<DatasetDocument>,
    #[serde(default, rename = "coordinateTransformations")]
    coordinate_transformations: Vec<Value>,
}

/// Channel rendering hints from the `omero` block, parsed leniently.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OmeroMeta {
    #[serde(default)]
    pub channels: Vec<OmeroChannel>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OmeroChannel {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub window: Option<ChannelWindow>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ChannelWindow {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

struct Dataset {
    path: String,
    transforms: Vec<CoordinateTransform>,
}

fn parse_transforms(values: &[Value]) -> Result<Vec<CoordinateTransform>> {
    values.iter().map(CoordinateTransform::from_value).collect()
}

/// A multiscale image: an ordered family of resolution levels, highest
/// resolution first.
pub struct Image {
    group: Group,
    name: Option<String>,
    axes: Option<Vec<Axis>>,
    datasets: Vec<Dataset>,
    multiscale_transforms: Vec<CoordinateTransform>,
    omero: Option<OmeroMeta>,
}

impl Image {
    pub(crate) fn from_group(group: Group) -> Result<Self> {
        let value = group
            .attributes()
            .get("multiscales")
            .ok_or_else(|| Error::MetadataInvalid("node has no multiscales".to_string()))?
            .clone();
        let documents: Vec<MultiscaleDocument> =
            serde_json::from_value(value).map_err(Error::metadata)?;
        let doc = documents
            .into_iter()
            .next()
            .ok_or_else(|| Error::MetadataInvalid("empty multiscales list".to_string()))?;

        let datasets = doc
            .datasets
            .into_iter()
            .map(|d| {
                Ok(Dataset {
                    transforms: parse_transforms(&d.coordinate_transformations)?,
                    path: d.path,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if datasets.is_empty() {
            return Err(Error::MetadataInvalid(
                "multiscale without datasets".to_string(),
            ));
        }

        let omero = group
            .attributes()
            .get("omero")
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        Ok(Self {
            name: doc.name,
            axes: doc.axes.map(|a| a.into_iter().map(Axis::from).collect()),
            multiscale_transforms: parse_transforms(&doc.coordinate_transformations)?,
            datasets,
            omero,
            group,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn num_levels(&self) -> usize {
        self.datasets.len()
    }

    pub fn omero(&self) -> Option<&OmeroMeta> {
        self.omero.as_ref()
    }

    /// The declared or inferred axes for an array of the given rank.
    pub fn axes_for_rank(&self, ndim: usize) -> Result<Vec<Axis>> {
        match &self.axes {
            Some(axes) => {
                if axes.len() != ndim {
                    return Err(Error::MetadataInvalid(format!(
                        "{} axes declared for a rank-{ndim} array",
                        axes.len()
                    )));
                }
                Ok(axes.clone())
            }
            None => inferred_axes(ndim),
        }
    }

    /// Open one resolution level: the backing array plus its composed
    /// index-to-physical mapping (dataset transforms first, then the
    /// multiscale-level ones).
    pub fn level(&self, index: usize) -> Result<ResolutionLevel> {
        let dataset = self.datasets.get(index).ok_or_else(|| {
            Error::NotFound(format!(
                "resolution level {index} of {} level(s)",
                self.datasets.len()
            ))
        })?;
        let array = self.group.open_array(&dataset.path)?;
        let axes = self.axes_for_rank(array.ndim())?;
        let mut mapping = CoordinateMapping::identity(array.ndim());
        for t in &dataset.transforms {
            mapping.push(t)?;
        }
        for t in &self.multiscale_transforms {
            mapping.push(t)?;
        }
        Ok(ResolutionLevel {
            array,
            mapping,
            axes,
        })
    }
}

/// One opened resolution level of a multiscale image.
pub struct ResolutionLevel {
    array: Array,
    mapping: CoordinateMapping,
    axes: Vec<Axis>,
}

impl ResolutionLevel {
    pub fn array(&self) -> &Array {
        &self.array
    }

    pub fn shape(&self) -> &[u64] {
        self.array.shape()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn mapping(&self) -> &CoordinateMapping {
        &self.mapping
    }

    pub fn read_region(&self, region: &PixelRegion) -> Result<Vec<u8>> {
        self.array.read_region(region)
    }

    /// Read a physical region: clamp and snap it to pixel bounds, then
    /// read. Returns the pixel region actually read along with its bytes.
    pub fn read_physical(&self, roi: &PhysicalRegion) -> Result<(PixelRegion, Vec<u8>)> {
        self.read_physical_opt(roi, &ReadOptions::default())
    }

    pub fn read_physical_opt(
        &self,
        roi: &PhysicalRegion,
        options: &ReadOptions,
    ) -> Result<(PixelRegion, Vec<u8>)> {
        let pixels = self.mapping.physical_to_pixel(roi, self.array.shape())?;
        let bytes = self.array.read_region_opt(&pixels, options)?;
        Ok((pixels, bytes))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlateIndexEntry {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlateWellEntry {
    pub path: String,
    #[serde(default, rename = "rowIndex")]
    pub row_index: Option<u64>,
    #[serde(default, rename = "columnIndex")]
    pub column_index: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlateAcquisition {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlateMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rows: Vec<PlateIndexEntry>,
    #[serde(default)]
    pub columns: Vec<PlateIndexEntry>,
    #[serde(default)]
    pub wells: Vec<PlateWellEntry>,
    #[serde(default)]
    pub acquisitions: Vec<PlateAcquisition>,
    #[serde(default)]
    pub field_count: Option<u64>,
}

/// A high-content-screening plate: wells navigated by relative group path.
pub struct Plate {
    group: Group,
    meta: PlateMeta,
}

impl Plate {
    pub(crate) fn from_group(group: Group) -> Result<Self> {
        let value = group
            .attributes()
            .get("plate")
            .ok_or_else(|| Error::MetadataInvalid("node has no plate".to_string()))?
            .clone();
        let meta = serde_json::from_value(value).map_err(Error::metadata)?;
        Ok(Self { group, meta })
    }

    pub fn meta(&self) -> &PlateMeta {
        &self.meta
    }

    pub fn wells(&self) -> &[PlateWellEntry] {
        &self.meta.wells
    }

    pub fn acquisitions(&self) -> &[PlateAcquisition] {
        &self.meta.acquisitions
    }

    pub fn well(&self, path: &str) -> Result<Well> {
        Well::from_group(self.group.open_group(path)?)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WellImageEntry {
    pub path: String,
    #[serde(default)]
    pub acquisition: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WellMeta {
    #[serde(default)]
    pub images: Vec<WellImageEntry>,
}

/// One well of a plate: a list of field-of-view images.
pub struct Well {
    group: Group,
    meta: WellMeta,
}

impl Well {
    pub(crate) fn from_group(group: Group) -> Result<Self> {
        let value = group
            .attributes()
            .get("well")
            .ok_or_else(|| Error::MetadataInvalid("node has no well".to_string()))?
            .clone();
        let meta = serde_json::from_value(value).map_err(Error::metadata)?;
        Ok(Self { group, meta })
    }

    pub fn fields(&self) -> &[WellImageEntry] {
        &self.meta.images
    }

    pub fn field(&self, index: usize) -> Result<Image> {
        let entry = self.fields().get(index).ok_or_else(|| {
            Error::NotFound(format!("field {index} of {} field(s)", self.fields().len()))
        })?;
        Image::from_group(self.group.open_group(&entry.path)?)
    }
}

/// A group of label masks, each itself a multiscale image.
pub struct Labels {
    group: Group,
    paths: Vec<String>,
}

impl Labels {
    pub(crate) fn from_group(group: Group) -> Result<Self> {
        let value = group
            .attributes()
            .get("labels")
            .ok_or_else(|| Error::MetadataInvalid("node has no labels".to_string()))?
            .clone();
        let paths = serde_json::from_value(value).map_err(Error::metadata)?;
        Ok(Self { group, paths })
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn label(&self, path: &str) -> Result<Image> {
        Image::from_group(self.group.open_group(path)?)
    }
}

/// A plain group whose numbered children are independent image series.
pub struct Collection {
    group: Group,
}

impl Collection {
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Discover the numbered sub-series by probing, so stores without
    /// listing support still work.
    pub fn series(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut index = 0u64;
        while self.group.has_child(&index.to_string())? {
            names.push(index.to_string());
            index += 1;
        }
        Ok(names)
    }

    pub fn image(&self, index: usize) -> Result<Image> {
        Image::from_group(self.group.open_group(&index.to_string())?)
    }
}

/// A group that matched no known overlay kind; its attributes can still
/// be interrogated.
pub struct Unknown {
    group: Group,
}

impl Unknown {
    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn attributes(&self) -> &JsonObject {
        self.group.attributes()
    }
}

/// The typed classification of a root (or any other) group node.
pub enum NodeKind {
    Image(Image),
    Plate(Plate),
    Well(Well),
    Labels(Labels),
    Collection(Collection),
    Unknown(Unknown),
}

impl NodeKind {
    /// Classify a group by its overlay attributes. Unrecognized kinds are
    /// `Unknown`, not an error.
    pub fn classify(group: Group) -> Result<Self> {
        let attrs = group.attributes();
        if attrs.contains_key("multiscales") {
            Ok(Self::Image(Image::from_group(group)?))
        } else if attrs.contains_key("plate") {
            Ok(Self::Plate(Plate::from_group(group)?))
        } else if attrs.contains_key("well") {
            Ok(Self::Well(Well::from_group(group)?))
        } else if attrs.contains_key("labels") {
            Ok(Self::Labels(Labels::from_group(group)?))
        } else if group.has_child("0")? {
            Ok(Self::Collection(Collection { group }))
        } else {
            Ok(Self::Unknown(Unknown { group }))
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Self::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_plate(&self) -> Option<&Plate> {
        match self {
            Self::Plate(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data_type::DataType;
    use crate::metadata::ArraySpec;
    use crate::store::MemoryStore;

    fn image_attrs(with_axes: bool) -> JsonObject {
        let axes = if with_axes {
            serde_json::json!([
                {"name": "z", "type": "space", "unit": "micrometer"},
                {"name": "y", "type": "space", "unit": "micrometer"},
                {"name": "x", "type": "space", "unit": "micrometer"}
            ])
        } else {
            Value::Null
        };
        let mut multiscale = serde_json::json!({
            "version": "0.4",
            "name": "test image",
            "datasets": [
                {
                    "path": "0",
                    "coordinateTransformations": [
                        {"type": "scale", "scale": [2.0, 0.5, 0.5]}
                    ]
                },
                {
                    "path": "1",
                    "coordinateTransformations": [
                        {"type": "scale", "scale": [2.0, 1.0, 1.0]}
                    ]
                }
            ],
            "coordinateTransformations": [
                {"type": "translation", "translation": [0.0, 10.0, 20.0]}
            ]
        });
        if with_axes {
            multiscale["axes"] = axes;
        }
        let mut attrs = JsonObject::new();
        attrs.insert("multiscales".to_string(), Value::Array(vec![multiscale]));
        attrs.insert(
            "omero".to_string(),
            serde_json::json!({
                "channels": [
                    {"label": "DAPI", "color": "0000FF", "active": true,
                     "window": {"start": 0.0, "end": 255.0, "min": 0.0, "max": 255.0}}
                ]
            }),
        );
        attrs
    }

    fn build_image(store: Arc<MemoryStore>, with_axes: bool) -> Image {
        let root = Group::create(store, "", image_attrs(with_axes)).unwrap();
        for (name, shape) in [("0", [4u64, 32, 32]), ("1", [4u64, 16, 16])] {
            root.create_array(name, ArraySpec::new(shape, [2u64, 8, 8], DataType::UInt8))
                .unwrap();
        }
        match NodeKind::classify(root).unwrap() {
            NodeKind::Image(image) => image,
            _ => panic!("expected an image"),
        }
    }

    #[test]
    fn image_levels_and_axes() {
        let image = build_image(Arc::new(MemoryStore::new()), true);
        assert_eq!(image.num_levels(), 2);
        assert_eq!(image.name(), Some("test image"));

        let level = image.level(0).unwrap();
        assert_eq!(level.shape(), &[4, 32, 32]);
        assert_eq!(level.axes()[0].name, "z");
        assert_eq!(level.axes()[0].unit.as_deref(), Some("micrometer"));
        assert_eq!(level.mapping().scale(), &[2.0, 0.5, 0.5]);
        assert_eq!(level.mapping().translation(), &[0.0, 10.0, 20.0]);

        assert!(matches!(image.level(2), Err(Error::NotFound(_))));
    }

    #[test]
    fn physical_read_snaps_and_reads() {
        let store = Arc::new(MemoryStore::new());
        let image = build_image(store.clone(), true);
        let level = image.level(0).unwrap();

        // write something recognizable through the raw array
        let array = image.group().open_array("0").unwrap();
        let data: Vec<u8> = (0..4 * 32 * 32u32).map(|v| (v % 251) as u8).collect();
        array
            .write_region(&PixelRegion::new([0u64, 0, 0], [4u64, 32, 32]), &data)
            .unwrap();

        let roi = PhysicalRegion::new([0.0, 10.0, 20.0], [4.0, 5.0, 6.0]);
        let (pixels, bytes) = level.read_physical(&roi).unwrap();
        assert_eq!(pixels, PixelRegion::new([0u64, 0, 0], [2u64, 10, 12]));
        assert_eq!(bytes.len(), 2 * 10 * 12);
        assert_eq!(bytes[0], data[0]);
    }

    #[test]
    fn axes_inferred_for_old_overlays() {
        let image = build_image(Arc::new(MemoryStore::new()), false);
        let axes = image.axes_for_rank(3).unwrap();
        let names: Vec<_> = axes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["z", "y", "x"]);
        assert_eq!(axes[0].axis_type.as_deref(), Some("space"));

        let names: Vec<_> = image
            .axes_for_rank(5)
            .unwrap()
            .iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(names, vec!["t", "c", "z", "y", "x"]);

        assert!(matches!(
            image.axes_for_rank(6),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn string_axes_accepted() {
        let store = Arc::new(MemoryStore::new());
        let mut attrs = image_attrs(false);
        attrs["multiscales"][0]["axes"] = serde_json::json!(["z", "y", "x"]);
        let root = Group::create(store, "", attrs).unwrap();
        root.create_array("0", ArraySpec::new([4u64, 8, 8], [2u64, 4, 4], DataType::UInt8))
            .unwrap();
        root.create_array("1", ArraySpec::new([4u64, 4, 4], [2u64, 4, 4], DataType::UInt8))
            .unwrap();

        let image = Image::from_group(root).unwrap();
        let axes = image.axes_for_rank(3).unwrap();
        assert_eq!(axes[2].name, "x");
        assert_eq!(axes[2].axis_type, None);
    }

    #[test]
    fn omero_channels_exposed() {
        let image = build_image(Arc::new(MemoryStore::new()), true);
        let omero = image.omero().unwrap();
        assert_eq!(omero.channels.len(), 1);
        let channel = &omero.channels[0];
        assert_eq!(channel.label.as_deref(), Some("DAPI"));
        assert_eq!(channel.window.unwrap().end, Some(255.0));
    }

    #[test]
    fn rejected_transform_type_fails_classification() {
        let store = Arc::new(MemoryStore::new());
        let mut attrs = image_attrs(true);
        attrs["multiscales"][0]["datasets"][0]["coordinateTransformations"][0] =
            serde_json::json!({"type": "rotation", "rotation": [1.0]});
        let root = Group::create(store, "", attrs).unwrap();
        assert!(matches!(
            NodeKind::classify(root),
            Err(Error::Unsupported(_))
        ));
    }

    fn well_attrs() -> JsonObject {
        let mut attrs = JsonObject::new();
        attrs.insert(
            "well".to_string(),
            serde_json::json!({
                "images": [{"path": "0", "acquisition": 1}]
            }),
        );
        attrs
    }

    #[test]
    fn plate_well_field_navigation() {
        let store = Arc::new(MemoryStore::new());
        let mut plate_attrs = JsonObject::new();
        plate_attrs.insert(
            "plate".to_string(),
            serde_json::json!({
                "name": "screen-1",
                "rows": [{"name": "A"}],
                "columns": [{"name": "1"}],
                "wells": [{"path": "A/1", "rowIndex": 0, "columnIndex": 0}],
                "acquisitions": [{"id": 1, "name": "first pass"}],
                "field_count": 1
            }),
        );
        let root = Group::create(store.clone(), "", plate_attrs).unwrap();
        let well_group = root
            .create_group("A", JsonObject::new())
            .unwrap()
            .create_group("1", well_attrs())
            .unwrap();
        let field = well_group.create_group("0", image_attrs(true)).unwrap();
        field
            .create_array("0", ArraySpec::new([4u64, 8, 8], [2u64, 4, 4], DataType::UInt8))
            .unwrap();
        field
            .create_array("1", ArraySpec::new([4u64, 4, 4], [2u64, 4, 4], DataType::UInt8))
            .unwrap();

        let NodeKind::Plate(plate) = NodeKind::classify(root).unwrap() else {
            panic!("expected a plate");
        };
        assert_eq!(plate.meta().name.as_deref(), Some("screen-1"));
        assert_eq!(plate.wells().len(), 1);
        assert_eq!(plate.acquisitions()[0].name.as_deref(), Some("first pass"));

        let well = plate.well("A/1").unwrap();
        assert_eq!(well.fields().len(), 1);
        assert_eq!(well.fields()[0].acquisition, Some(1));
        let image = well.field(0).unwrap();
        assert_eq!(image.level(0).unwrap().shape(), &[4, 8, 8]);
        assert!(matches!(well.field(3), Err(Error::NotFound(_))));
    }

    #[test]
    fn labels_navigation() {
        let store = Arc::new(MemoryStore::new());
        let mut attrs = JsonObject::new();
        attrs.insert("labels".to_string(), serde_json::json!(["nuclei"]));
        let root = Group::create(store, "", attrs).unwrap();
        let mask = root.create_group("nuclei", image_attrs(true)).unwrap();
        mask.create_array("0", ArraySpec::new([4u64, 8, 8], [2u64, 4, 4], DataType::UInt16))
            .unwrap();
        mask.create_array("1", ArraySpec::new([4u64, 4, 4], [2u64, 4, 4], DataType::UInt16))
            .unwrap();

        let NodeKind::Labels(labels) = NodeKind::classify(root).unwrap() else {
            panic!("expected labels");
        };
        assert_eq!(labels.paths(), &["nuclei".to_string()]);
        let mask = labels.label("nuclei").unwrap();
        assert_eq!(mask.level(0).unwrap().array().data_type(), DataType::UInt16);
    }

    #[test]
    fn collection_discovers_numbered_series() {
        let store = Arc::new(MemoryStore::new());
        let root = Group::create(store, "", JsonObject::new()).unwrap();
        for series in ["0", "1"] {
            let g = root.create_group(series, image_attrs(true)).unwrap();
            g.create_array("0", ArraySpec::new([4u64, 8, 8], [2u64, 4, 4], DataType::UInt8))
                .unwrap();
            g.create_array("1", ArraySpec::new([4u64, 4, 4], [2u64, 4, 4], DataType::UInt8))
                .unwrap();
        }

        let NodeKind::Collection(collection) = NodeKind::classify(root).unwrap() else {
            panic!("expected a collection");
        };
        assert_eq!(collection.series().unwrap(), vec!["0", "1"]);
        assert_eq!(collection.image(1).unwrap().num_levels(), 2);
    }

    #[test]
    fn unrecognized_overlay_is_unknown() {
        let store = Arc::new(MemoryStore::new());
        let mut attrs = JsonObject::new();
        attrs.insert("bioformats2raw.layout".to_string(), serde_json::json!(3));
        let root = Group::create(store, "", attrs).unwrap();
        let NodeKind::Unknown(unknown) = NodeKind::classify(root).unwrap() else {
            panic!("expected unknown");
        };
        assert_eq!(unknown.attributes()["bioformats2raw.layout"], 3);
    }
}
