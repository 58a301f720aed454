//! Region boundaries read from GeoJSON and resource existence checks.

mod geojson;
mod probe;

pub use geojson::{
    BoundaryFeature, BoundaryFormat, BoundaryLoader, BoundaryOutput, BoundarySource,
    GeoJsonLoader, LonLatTable,
};
pub use probe::{ExistenceProbe, LocalPathProbe, is_remote};
