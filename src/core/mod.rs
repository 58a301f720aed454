pub mod color;
pub mod geometry;
pub mod palette;
pub mod precision;
pub mod scenario;
pub mod table;

pub use color::Color;
pub use geometry::{Extent, LonLat, MapCell, MapGrid};
pub use palette::{
    ColorRef, ColorScale, PaletteFamily, PaletteRequest, PaletteSource, PaletteSpec,
    PaletteTables, SignIndex, classify_variable, select_palette,
};
pub use precision::{AdjustedValue, PrecisionOutput, PrecisionResult};
pub use scenario::{Scenario, ScenarioSelection, SimulationSelection};
pub use table::{EnvelopeRole, ScenarioTable, aggregate_scenarios};
