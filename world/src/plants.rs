//! Plant lifecycle state machine.

use pomo_patch_core::{
    wire::PlantReply, EconomyRules, PlantKey, PlantRecord, PlantSnapshot, PlantType, Position,
    Rarity, Rejection, Stage,
};

/// Lifecycle fields of a plant, captured so a failed tool action can be reverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    pub(crate) stage: Stage,
    pub(crate) growth_time_remaining: Option<u32>,
    pub(crate) fertilizer_remaining: Option<u32>,
}

/// Result of crediting growth time to a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Growth {
    pub(crate) remaining: Option<u32>,
    pub(crate) advanced: Option<Stage>,
}

/// Local mirror of a plant.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Plant {
    pub(crate) plant_type: PlantType,
    pub(crate) species: Option<String>,
    pub(crate) rarity: Option<Rarity>,
    pub(crate) size: Option<f32>,
    pub(crate) stage: Stage,
    pub(crate) position: Position,
    pub(crate) growth_time_remaining: Option<u32>,
    pub(crate) fertilizer_remaining: Option<u32>,
}

impl Plant {
    /// Freshly planted, unwatered seed.
    pub(crate) fn seed(plant_type: PlantType, position: Position) -> Self {
        Self {
            plant_type,
            species: None,
            rarity: None,
            size: None,
            stage: Stage::Seed,
            position,
            growth_time_remaining: None,
            fertilizer_remaining: None,
        }
    }

    /// Plant first seen in an authoritative list, placed at the provided screen position.
    pub(crate) fn from_record(record: &PlantRecord, position: Position) -> Self {
        Self {
            plant_type: record.plant_type,
            species: record.plant_species.clone(),
            rarity: record.rarity,
            size: record.size,
            stage: record.stage,
            position,
            growth_time_remaining: record.growth_time_remaining,
            fertilizer_remaining: record.fertilizer_remaining,
        }
    }

    /// Rarity used by the formulas; unknown rarity counts as common.
    pub(crate) fn rarity(&self) -> Rarity {
        self.rarity.unwrap_or(Rarity::Common)
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        Lifecycle {
            stage: self.stage,
            growth_time_remaining: self.growth_time_remaining,
            fertilizer_remaining: self.fertilizer_remaining,
        }
    }

    /// Reverts a tool action. A plant that has since entered another stage
    /// keeps its current lifecycle and `false` is returned.
    pub(crate) fn restore(&mut self, lifecycle: Lifecycle) -> bool {
        if self.stage != lifecycle.stage {
            return false;
        }
        self.growth_time_remaining = lifecycle.growth_time_remaining;
        self.fertilizer_remaining = lifecycle.fertilizer_remaining;
        true
    }

    pub(crate) fn can_water(&self) -> Result<(), Rejection> {
        if self.stage != Stage::Seed {
            return Err(Rejection::WrongStage { stage: self.stage });
        }
        if self.growth_time_remaining.is_some() {
            return Err(Rejection::AlreadyGrowing);
        }
        Ok(())
    }

    /// Starts the stage-0 growth timer. Callers check [`Plant::can_water`] first.
    pub(crate) fn water(&mut self, rules: &EconomyRules) -> u32 {
        let growth = rules.seed_growth_time;
        self.growth_time_remaining = Some(growth);
        growth
    }

    pub(crate) fn can_fertilize(&self) -> Result<(), Rejection> {
        if self.stage != Stage::Seedling {
            return Err(Rejection::WrongStage { stage: self.stage });
        }
        if self.growth_time_remaining.is_some() {
            return Err(Rejection::AlreadyGrowing);
        }
        match self.fertilizer_remaining {
            Some(remaining) if remaining > 0 => Ok(()),
            _ => Err(Rejection::FertilizerNotNeeded),
        }
    }

    /// Applies one dose; the final dose starts the rarity-scaled growth timer.
    pub(crate) fn fertilize(&mut self, rules: &EconomyRules) {
        let remaining = self.fertilizer_remaining.unwrap_or(0).saturating_sub(1);
        if remaining == 0 {
            self.fertilizer_remaining = None;
            self.growth_time_remaining = Some(rules.seedling_growth_time(self.rarity()));
        } else {
            self.fertilizer_remaining = Some(remaining);
        }
    }

    /// Credits growth time; the stage advances when the timer reaches zero.
    ///
    /// Returns `None` when the plant is not growing.
    pub(crate) fn grow(&mut self, time: u32, rules: &EconomyRules) -> Option<Growth> {
        let current = self.growth_time_remaining?;
        let remaining = current.saturating_sub(time);
        if remaining > 0 {
            self.growth_time_remaining = Some(remaining);
            return Some(Growth {
                remaining: Some(remaining),
                advanced: None,
            });
        }

        self.growth_time_remaining = None;
        let advanced = self.stage.next();
        if let Some(stage) = advanced {
            self.enter_stage(stage, rules);
        }
        Some(Growth {
            remaining: None,
            advanced,
        })
    }

    fn enter_stage(&mut self, stage: Stage, rules: &EconomyRules) {
        self.stage = stage;
        self.growth_time_remaining = None;
        self.fertilizer_remaining = match stage {
            Stage::Seedling => Some(rules.fertilizer_required_for(self.rarity())),
            Stage::Seed | Stage::Mature => None,
        };
    }

    /// Merges the fields a reply provides into the plant.
    ///
    /// Lifecycle fields are only taken from replies that describe the stage the
    /// plant is at now; the stage never moves backwards. Returns the stage the
    /// plant entered, if the reply advanced it.
    pub(crate) fn merge_reply(
        &mut self,
        reply: &PlantReply,
        issued_at: Stage,
        rules: &EconomyRules,
    ) -> Option<Stage> {
        if let Some(species) = &reply.plant_species {
            self.species = Some(species.clone());
        }
        if let Some(rarity) = reply.rarity {
            self.rarity = Some(rarity);
        }
        if reply.size.is_some() {
            self.size = reply.size;
        }

        let mut advanced = None;
        match reply.stage {
            Some(stage) if stage < self.stage => return None,
            Some(stage) if stage > self.stage => {
                self.enter_stage(stage, rules);
                advanced = Some(stage);
            }
            Some(_) => {}
            None if self.stage != issued_at => return None,
            None => {}
        }

        if let Some(growth) = reply.growth_time_remaining {
            self.growth_time_remaining = growth;
        }
        if let Some(fertilizer) = reply.fertilizer_remaining {
            self.fertilizer_remaining = fertilizer;
        }
        advanced
    }

    /// Overlays an authoritative record; the local screen position is kept.
    pub(crate) fn overlay(&mut self, record: &PlantRecord) -> Option<Stage> {
        if record.plant_species.is_some() {
            self.species = record.plant_species.clone();
        }
        if record.rarity.is_some() {
            self.rarity = record.rarity;
        }
        if record.size.is_some() {
            self.size = record.size;
        }
        if record.stage < self.stage {
            return None;
        }

        let advanced = (record.stage > self.stage).then_some(record.stage);
        self.stage = record.stage;
        self.growth_time_remaining = record.growth_time_remaining;
        self.fertilizer_remaining = record.fertilizer_remaining;
        advanced
    }

    pub(crate) fn snapshot(&self, key: PlantKey) -> PlantSnapshot {
        PlantSnapshot {
            key,
            plant_type: self.plant_type,
            species: self.species.clone(),
            rarity: self.rarity,
            size: self.size,
            stage: self.stage,
            position: self.position,
            growth_time_remaining: self.growth_time_remaining,
            fertilizer_remaining: self.fertilizer_remaining,
        }
    }
}
