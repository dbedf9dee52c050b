#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement validation for new seeds and moved plants.
//!
//! The validator never mutates anything: it inspects the footprints of the
//! plants currently in the garden and reports which of the three placement
//! checks a candidate position fails.

use pomo_patch_core::{GardenLayout, PlacementCheck, PlantFootprint, PlantKey, Position};

/// Validates candidate plant positions against the garden layout.
#[derive(Clone, Debug)]
pub struct PlacementValidator {
    layout: GardenLayout,
}

impl PlacementValidator {
    /// Creates a validator bound to the provided layout.
    #[must_use]
    pub fn new(layout: GardenLayout) -> Self {
        Self { layout }
    }

    /// Layout the validator checks against.
    #[must_use]
    pub fn layout(&self) -> &GardenLayout {
        &self.layout
    }

    /// Validates a position for a newly planted seed, capacity included.
    #[must_use]
    pub fn check_new(
        &self,
        position: Position,
        plants: &[PlantFootprint],
        plant_limit: u32,
    ) -> PlacementCheck {
        self.can_place_at(position, None, plants, Some(plant_limit))
    }

    /// Validates the drop position of a moved plant; capacity is not checked.
    #[must_use]
    pub fn check_move(
        &self,
        position: Position,
        moving: PlantKey,
        plants: &[PlantFootprint],
    ) -> PlacementCheck {
        self.can_place_at(position, Some(moving), plants, None)
    }

    /// Runs every placement check against the candidate position.
    ///
    /// `exclude` names the plant being moved so it never collides with itself.
    /// Capacity is only evaluated when `plant_limit` is provided.
    #[must_use]
    pub fn can_place_at(
        &self,
        position: Position,
        exclude: Option<PlantKey>,
        plants: &[PlantFootprint],
        plant_limit: Option<u32>,
    ) -> PlacementCheck {
        let collision = plants
            .iter()
            .filter(|footprint| Some(footprint.plant) != exclude)
            .any(|footprint| self.collides(footprint.position, position));

        let over_capacity = plant_limit.is_some_and(|limit| {
            let count = u32::try_from(plants.len()).unwrap_or(u32::MAX);
            count >= limit
        });

        PlacementCheck {
            collision,
            in_restricted_zone: self.in_restricted_zone(position),
            over_capacity,
        }
    }

    /// Reports whether two positions are closer than the collision threshold on both axes.
    #[must_use]
    pub fn collides(&self, a: Position, b: Position) -> bool {
        let threshold = self.layout.collision_threshold;
        (a.x - b.x).abs() < threshold && (a.y - b.y).abs() < threshold
    }

    /// Reports whether the position lies in an interface band or off screen.
    #[must_use]
    pub fn in_restricted_zone(&self, position: Position) -> bool {
        let viewport = self.layout.viewport;
        let off_screen = position.x < 0.0
            || position.x > viewport.width
            || position.y < 0.0
            || position.y > viewport.height;
        let top_band = position.y < self.layout.top_band;
        let bottom_band = position.y > viewport.height - self.layout.bottom_band;
        off_screen || top_band || bottom_band
    }

    /// Reports whether a dragged plant hovers the sell zone.
    #[must_use]
    pub fn over_sell_zone(&self, position: Position) -> bool {
        self.layout.sell_zone.contains(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_patch_core::PlantId;

    #[test]
    fn collision_requires_both_axes_within_threshold() {
        let validator = PlacementValidator::new(GardenLayout::default());
        let origin = Position::new(400.0, 300.0);

        assert!(validator.collides(origin, Position::new(429.0, 329.0)));
        assert!(!validator.collides(origin, Position::new(430.0, 300.0)));
        assert!(!validator.collides(origin, Position::new(400.0, 340.0)));
    }

    #[test]
    fn bands_are_restricted_at_their_edges() {
        let validator = PlacementValidator::new(GardenLayout::default());

        assert!(validator.in_restricted_zone(Position::new(640.0, 95.0)));
        assert!(!validator.in_restricted_zone(Position::new(640.0, 96.0)));
        assert!(!validator.in_restricted_zone(Position::new(640.0, 592.0)));
        assert!(validator.in_restricted_zone(Position::new(640.0, 593.0)));
        assert!(validator.in_restricted_zone(Position::new(-1.0, 300.0)));
    }

    #[test]
    fn moved_plant_is_excluded_from_its_own_check() {
        let validator = PlacementValidator::new(GardenLayout::default());
        let key = PlantKey::Confirmed(PlantId::new(1));
        let plants = [PlantFootprint {
            plant: key,
            position: Position::new(400.0, 300.0),
        }];

        let check = validator.check_move(Position::new(405.0, 305.0), key, &plants);
        assert!(check.is_legal(), "plant must not collide with itself: {check}");
    }
}
