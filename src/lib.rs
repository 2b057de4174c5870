pub mod biome;
pub mod cell;
pub mod climate;
pub mod config;
pub mod coordinates;
pub mod direction;
pub mod edit;
pub mod erosion;
pub mod error;
pub mod generator;
pub mod grid;
pub mod land;
pub mod pathfinding;
pub mod preview;
pub mod queue;
pub mod region;
pub mod rivers;

pub use cell::{HexCell, HexEdgeType};
pub use config::{
    ClimateSettings, HemisphereMode, LandSettings, MapGenConfig, RiverSettings, TemperatureSettings,
};
pub use coordinates::HexCoordinates;
pub use direction::HexDirection;
pub use edit::EditCommand;
pub use error::MapError;
pub use generator::{GenerationReport, MapGenerator, generate_map};
pub use grid::HexGrid;
pub use pathfinding::{MovementRules, Path, find_path};
pub use preview::{render_preview, save_preview};
