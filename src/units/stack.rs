//! Unit stack classification: who carries whom when a stack moves
//!
//! A selection containing transports with room for every unit that can't
//! cross water on its own moves in transported mode, where only the
//! transports are charged movement. Otherwise each unit moves at its own rate.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{MovementError, Result};
use crate::core::types::{PlayerId, SkillId, UnitId};
use crate::rules::database::MovementRules;
use crate::spatial::PlaneCoords;
use crate::units::roster::{Players, UnitRoster, UnitSnapshot};

/// Units moving together this turn. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitStack {
    owner: PlayerId,
    location: PlaneCoords,
    transports: Vec<UnitSnapshot>,
    riders: Vec<UnitSnapshot>,
    stack_skills: AHashSet<SkillId>,
}

impl UnitStack {
    fn new(
        owner: PlayerId,
        location: PlaneCoords,
        transports: Vec<UnitSnapshot>,
        riders: Vec<UnitSnapshot>,
    ) -> Self {
        let stack_skills = transports
            .iter()
            .chain(riders.iter())
            .flat_map(|u| u.details.skills.iter().cloned())
            .collect();
        Self {
            owner,
            location,
            transports,
            riders,
            stack_skills,
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn location(&self) -> PlaneCoords {
        self.location
    }

    pub fn transports(&self) -> &[UnitSnapshot] {
        &self.transports
    }

    pub fn riders(&self) -> &[UnitSnapshot] {
        &self.riders
    }

    /// Transported mode: only the transports pay for movement
    pub fn is_transported(&self) -> bool {
        !self.transports.is_empty()
    }

    /// Units whose movement rates decide the stack's costs
    pub fn charged_units(&self) -> &[UnitSnapshot] {
        if self.is_transported() {
            &self.transports
        } else {
            &self.riders
        }
    }

    /// Union of every member's skills, for rules keyed on a stack skill
    pub fn stack_skills(&self) -> &AHashSet<SkillId> {
        &self.stack_skills
    }

    pub fn members(&self) -> impl Iterator<Item = &UnitSnapshot> + '_ {
        self.transports.iter().chain(self.riders.iter())
    }

    pub fn len(&self) -> usize {
        self.transports.len() + self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.members().any(|u| u.id == id)
    }

    /// Smallest overland movement allowance among charged units
    pub fn double_overland_moves(&self) -> u32 {
        self.charged_units()
            .iter()
            .map(|u| u.details.double_overland_moves)
            .min()
            .unwrap_or(0)
    }
}

/// Classify a selection of units into a movable stack
///
/// Every selected unit must be alive, on the map, at the same cell and owned
/// by the same player; anything else is a caller bug and fails the request.
pub fn create_unit_stack(
    selected: &[UnitId],
    roster: &UnitRoster,
    players: &Players,
    rules: &impl MovementRules,
) -> Result<UnitStack> {
    let Some(&first_id) = selected.first() else {
        return Err(MovementError::PreconditionViolation(
            "Cannot create a unit stack from an empty selection".into(),
        ));
    };

    let first = roster.find(first_id).ok_or_else(|| {
        MovementError::PreconditionViolation(format!("Selected unit {:?} not found", first_id))
    })?;
    let owner = first.owner;
    let location = first.location.ok_or_else(|| {
        MovementError::PreconditionViolation(format!("Selected unit {:?} is not on the map", first_id))
    })?;

    let mut units = Vec::with_capacity(selected.len());
    for &id in selected {
        let unit = roster.find(id).ok_or_else(|| {
            MovementError::PreconditionViolation(format!("Selected unit {:?} not found", id))
        })?;
        if !unit.is_alive() {
            return Err(MovementError::PreconditionViolation(format!(
                "Selected unit {:?} is not alive",
                id
            )));
        }
        if unit.location != Some(location) {
            return Err(MovementError::PreconditionViolation(format!(
                "Selected unit {:?} is at {:?}, expected {:?}",
                id, unit.location, location
            )));
        }
        if unit.owner != owner {
            return Err(MovementError::PreconditionViolation(format!(
                "Selected unit {:?} is owned by {:?}, expected {:?}",
                id, unit.owner, owner
            )));
        }
        for skill in &unit.details.skills {
            rules.find_unit_skill(skill)?;
        }
        units.push(unit);
    }

    players.find(owner)?;

    let transport_capacity: u32 = units.iter().map(|u| u.details.transport_capacity).sum();
    let mut space_required = units
        .iter()
        .filter(|u| !u.details.is_transport() && u.details.needs_transport(rules))
        .count() as u32;

    if transport_capacity == 0 || transport_capacity < space_required {
        tracing::debug!(
            units = units.len(),
            transport_capacity,
            space_required,
            "Unit stack moves in normal mode"
        );
        return Ok(UnitStack::new(
            owner,
            location,
            Vec::new(),
            units.into_iter().cloned().collect(),
        ));
    }

    let (transports, mut riders): (Vec<UnitSnapshot>, Vec<UnitSnapshot>) = units
        .into_iter()
        .cloned()
        .partition(|u| u.details.is_transport());

    // Automatic hitchhikers: units already standing with the transports get
    // pulled along even though nobody selected them. Flyers and other
    // self-sufficient units always join; units that need carrying join while
    // there's room. Unselected transports never join.
    // REVIEW: saved games depend on exactly who qualifies here; confirm with
    // content owners before narrowing it.
    for unit in roster.alive() {
        if unit.owner != owner
            || unit.location != Some(location)
            || selected.contains(&unit.id)
            || unit.details.is_transport()
        {
            continue;
        }

        if !unit.details.needs_transport(rules) {
            riders.push(unit.clone());
        } else if space_required < transport_capacity {
            space_required += 1;
            riders.push(unit.clone());
        }
    }

    tracing::debug!(
        transports = transports.len(),
        riders = riders.len(),
        transport_capacity,
        space_required,
        "Unit stack moves in transported mode"
    );

    Ok(UnitStack::new(owner, location, transports, riders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::database::RulesDatabase;
    use crate::rules::movement_rate::MovementRateRule;
    use crate::units::expanded::ExpandedUnit;
    use crate::units::roster::{PlayerKind, UnitStatus};

    const HOME: PlaneCoords = PlaneCoords { x: 3, y: 3, plane: 0 };

    fn rules() -> RulesDatabase {
        let mut db = RulesDatabase::new();
        db.add_tile_type("grass")
            .add_tile_type("ocean")
            .add_unit_skill("flight")
            .add_unit_skill("sailing")
            .add_rule(MovementRateRule::new(Some(2)).with_unit_skill("flight"))
            .add_rule(
                MovementRateRule::new(Some(2))
                    .for_tile("ocean")
                    .with_unit_skill("sailing"),
            )
            .add_rule(MovementRateRule::new(Some(2)).for_tile("grass"));
        db
    }

    fn players() -> Players {
        let mut players = Players::new();
        players
            .add(PlayerId(1), "Merlin", PlayerKind::Human)
            .add(PlayerId(2), "Raven", PlayerKind::Ai);
        players
    }

    fn land(id: u32) -> UnitSnapshot {
        UnitSnapshot::new(UnitId(id), PlayerId(1), HOME, ExpandedUnit::new("Spearmen", 2))
    }

    fn ship(id: u32, capacity: u32) -> UnitSnapshot {
        UnitSnapshot::new(
            UnitId(id),
            PlayerId(1),
            HOME,
            ExpandedUnit::new("Trireme", 4)
                .with_skill("sailing")
                .with_transport_capacity(capacity),
        )
    }

    fn flyer(id: u32) -> UnitSnapshot {
        UnitSnapshot::new(
            UnitId(id),
            PlayerId(1),
            HOME,
            ExpandedUnit::new("Eagles", 6).with_skill("flight"),
        )
    }

    fn roster(units: Vec<UnitSnapshot>) -> UnitRoster {
        UnitRoster { units }
    }

    fn ids(units: &[UnitSnapshot]) -> Vec<u32> {
        units.iter().map(|u| u.id.0).collect()
    }

    #[test]
    fn test_empty_selection_is_precondition_violation() {
        let err = create_unit_stack(&[], &UnitRoster::new(), &players(), &rules()).unwrap_err();
        assert!(matches!(err, MovementError::PreconditionViolation(_)));
    }

    #[test]
    fn test_mixed_locations_rejected() {
        let mut away = land(2);
        away.location = Some(PlaneCoords::new(4, 3, 0));
        let roster = roster(vec![land(1), away]);
        let err = create_unit_stack(&[UnitId(1), UnitId(2)], &roster, &players(), &rules())
            .unwrap_err();
        assert!(matches!(err, MovementError::PreconditionViolation(_)));
    }

    #[test]
    fn test_mixed_owners_rejected() {
        let mut theirs = land(2);
        theirs.owner = PlayerId(2);
        let roster = roster(vec![land(1), theirs]);
        let err = create_unit_stack(&[UnitId(1), UnitId(2)], &roster, &players(), &rules())
            .unwrap_err();
        assert!(matches!(err, MovementError::PreconditionViolation(_)));
    }

    #[test]
    fn test_dead_unit_rejected() {
        let mut dead = land(1);
        dead.status = UnitStatus::Dead;
        let err =
            create_unit_stack(&[UnitId(1)], &roster(vec![dead]), &players(), &rules()).unwrap_err();
        assert!(matches!(err, MovementError::PreconditionViolation(_)));
    }

    #[test]
    fn test_unknown_owner_is_lookup_failure() {
        let mut stray = land(1);
        stray.owner = PlayerId(7);
        let err =
            create_unit_stack(&[UnitId(1)], &roster(vec![stray]), &players(), &rules()).unwrap_err();
        assert!(matches!(err, MovementError::OwnerLookup(PlayerId(7))));
    }

    #[test]
    fn test_unknown_skill_is_configuration_error() {
        let mut odd = land(1);
        odd.details.skills.insert(SkillId::new("tunnelling"));
        let err =
            create_unit_stack(&[UnitId(1)], &roster(vec![odd]), &players(), &rules()).unwrap_err();
        assert!(matches!(err, MovementError::Configuration(_)));
    }

    #[test]
    fn test_land_units_move_normally() {
        let roster = roster(vec![land(1), land(2)]);
        let stack =
            create_unit_stack(&[UnitId(1), UnitId(2)], &roster, &players(), &rules()).unwrap();
        assert!(!stack.is_transported());
        assert_eq!(ids(stack.riders()), vec![1, 2]);
        assert_eq!(ids(stack.charged_units()), vec![1, 2]);
    }

    #[test]
    fn test_ship_with_room_moves_transported() {
        let roster = roster(vec![ship(1, 2), land(2), land(3)]);
        let stack = create_unit_stack(
            &[UnitId(1), UnitId(2), UnitId(3)],
            &roster,
            &players(),
            &rules(),
        )
        .unwrap();
        assert!(stack.is_transported());
        assert_eq!(ids(stack.transports()), vec![1]);
        assert_eq!(ids(stack.charged_units()), vec![1]);
        assert_eq!(stack.double_overland_moves(), 4);
    }

    #[test]
    fn test_ship_without_room_moves_normally() {
        let roster = roster(vec![ship(1, 1), land(2), land(3)]);
        let stack = create_unit_stack(
            &[UnitId(1), UnitId(2), UnitId(3)],
            &roster,
            &players(),
            &rules(),
        )
        .unwrap();
        assert!(!stack.is_transported());
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_hitchhikers_join_transported_stack() {
        // Ship (room for 2) selected with one land unit; two more land units
        // and a flyer are in the same cell, plus a second ship
        let roster = roster(vec![ship(1, 2), land(2), land(3), land(4), flyer(5), ship(6, 3)]);
        let stack =
            create_unit_stack(&[UnitId(1), UnitId(2)], &roster, &players(), &rules()).unwrap();

        assert!(stack.is_transported());
        assert_eq!(ids(stack.transports()), vec![1]);
        // One seat left: unit 3 takes it, unit 4 stays behind, flyer always joins
        assert_eq!(ids(stack.riders()), vec![2, 3, 5]);
        assert!(!stack.contains(UnitId(4)));
        assert!(!stack.contains(UnitId(6)));
    }

    #[test]
    fn test_hitchhikers_ignore_other_cells_and_owners() {
        let mut elsewhere = land(3);
        elsewhere.location = Some(PlaneCoords::new(0, 0, 0));
        let mut enemy = land(4);
        enemy.owner = PlayerId(2);
        let roster = roster(vec![ship(1, 4), land(2), elsewhere, enemy]);
        let stack =
            create_unit_stack(&[UnitId(1), UnitId(2)], &roster, &players(), &rules()).unwrap();
        assert_eq!(ids(stack.riders()), vec![2]);
    }

    #[test]
    fn test_normal_mode_takes_no_hitchhikers() {
        let roster = roster(vec![land(1), flyer(2)]);
        let stack = create_unit_stack(&[UnitId(1)], &roster, &players(), &rules()).unwrap();
        assert_eq!(ids(stack.riders()), vec![1]);
    }

    #[test]
    fn test_stack_skills_are_union() {
        let roster = roster(vec![land(1), flyer(2)]);
        let stack =
            create_unit_stack(&[UnitId(1), UnitId(2)], &roster, &players(), &rules()).unwrap();
        assert!(stack.stack_skills().contains(&SkillId::new("flight")));
    }
}
