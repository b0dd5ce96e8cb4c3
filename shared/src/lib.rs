pub mod colors;
pub mod config;
pub mod dataset;
pub mod error;
pub mod flag;
pub mod geometry;
pub mod interaction;
pub mod legend;
pub mod projection;
pub mod scene;
pub mod shadow_list;
pub mod spatial;
pub mod style;
pub mod tooltip;
pub mod viewport;

pub use config::{MapConfig, MapHeight};
pub use dataset::*;
pub use error::{LoadError, LoadErrorKind, Resource, SchemaError};
pub use geometry::CountryGeometry;
pub use interaction::{InteractionState, MapContext, MapEvent, Phase};
pub use legend::LegendState;
pub use scene::ProjectedScene;
pub use spatial::SpatialGrid;
pub use viewport::Viewport;
