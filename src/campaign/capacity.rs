//! Spare transport capacity per overland cell
//!
//! Each friendly transport adds its capacity to its cell and each friendly
//! unit that depends on being carried takes one seat. Whatever is left over
//! is room a land stack can board into.

use ahash::AHashMap;

use crate::campaign::map::CampaignMap;
use crate::core::error::Result;
use crate::core::types::PlayerId;
use crate::rules::database::MovementRules;
use crate::spatial::PlaneCoords;
use crate::units::roster::{Players, UnitRoster};

/// Sparse map of spare seats; cells with no room left are absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportCapacityMap {
    spare: AHashMap<PlaneCoords, u32>,
}

impl TransportCapacityMap {
    /// Account every alive unit `owner` has on the map
    ///
    /// Units in a tower are counted on every plane.
    pub fn calculate(
        map: &CampaignMap,
        roster: &UnitRoster,
        owner: PlayerId,
        players: &Players,
        rules: &impl MovementRules,
    ) -> Result<Self> {
        players.find(owner)?;

        let mut seats: AHashMap<PlaneCoords, i64> = AHashMap::new();
        for (unit, location) in roster.alive_on_map().filter(|(u, _)| u.owner == owner) {
            let add = if unit.details.is_transport() {
                unit.details.transport_capacity as i64
            } else if unit.details.needs_transport(rules) {
                -1
            } else {
                0
            };
            if add == 0 {
                continue;
            }

            for plane in map.planes_occupied_from(location) {
                *seats.entry(location.coords().on_plane(plane)).or_default() += add;
            }
        }

        let spare: AHashMap<PlaneCoords, u32> = seats
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(at, n)| (at, n as u32))
            .collect();

        tracing::trace!(cells = spare.len(), ?owner, "Calculated transport capacity");
        Ok(Self { spare })
    }

    /// Seats free at `at`; never negative
    pub fn spare_capacity(&self, at: PlaneCoords) -> u32 {
        self.spare.get(&at).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaneCoords, u32)> + '_ {
        self.spare.iter().map(|(at, n)| (*at, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.spare.is_empty()
    }
}
