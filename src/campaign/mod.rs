//! Overland movement - the strategic map across every plane

pub mod capacity;
pub mod distance;
pub mod map;

pub use capacity::TransportCapacityMap;
pub use distance::{
    calculate_overland_movement, calculate_overland_movement_batch, OverlandContext,
    OverlandMovement,
};
pub use map::{CampaignMap, TerrainCell};
