//! Game loop tying the garden, the reconciler and the economy service together.

use anyhow::{bail, Result};
use pomo_patch_core::{Account, Command, Event, PlantKey};
use pomo_patch_service::{EconomyClient, LocalEconomy, StaticToken};
use pomo_patch_system_sync::{Config, Reconciler};
use pomo_patch_world::{self as world, query, Garden};
use tracing::{debug, info, warn};

use crate::{
    config::GardenConfig,
    script::{Line, Step},
};

pub(crate) type LocalClient = EconomyClient<LocalEconomy, StaticToken>;

pub(crate) struct Driver {
    garden: Garden,
    reconciler: Reconciler,
    service: LocalClient,
}

impl Driver {
    pub(crate) fn new(config: &GardenConfig, account: Account, service: LocalClient) -> Self {
        let garden = Garden::with_rules(
            account,
            config.rules.clone(),
            config.session.clone(),
            config.layout.clone(),
        );
        Self {
            garden,
            reconciler: Reconciler::new(Config::new(config.sync.resync_interval())),
            service,
        }
    }

    pub(crate) fn garden(&self) -> &Garden {
        &self.garden
    }

    /// Applies a player command and everything the reconciler derives from it.
    pub(crate) fn act(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        let mut queue = vec![command];
        while let Some(command) = queue.pop() {
            let start = events.len();
            world::apply(&mut self.garden, command, &mut events);
            self.reconciler.handle(&events[start..], &mut queue);
        }
        report(&events);
        events
    }

    /// Executes queued remote calls until none remain.
    pub(crate) fn settle(&mut self) {
        let mut commands = Vec::new();
        while self.reconciler.poll_one(&mut self.service, &mut commands) {
            for command in std::mem::take(&mut commands) {
                let _ = self.act(command);
            }
        }
    }

    pub(crate) fn run_script(&mut self, lines: &[Line]) -> Result<()> {
        for line in lines {
            debug!(line = line.number, step = ?line.step, "script step");
            match &line.step {
                Step::Action(command) => {
                    let _ = self.act(command.clone());
                }
                Step::Settle => self.settle(),
                Step::Offline(offline) => self.service.transport_mut().set_offline(*offline),
                Step::ExpectMoney(expected) => {
                    let money = query::money(&self.garden);
                    if money != *expected {
                        bail!("line {}: expected money {expected}, found {money}", line.number);
                    }
                }
                Step::ExpectPlants(expected) => {
                    let count = query::plant_count(&self.garden);
                    if count != *expected {
                        bail!("line {}: expected {expected} plants, found {count}", line.number);
                    }
                }
                Step::ExpectStage { plant, stage } => {
                    let Some(snapshot) = query::plant(&self.garden, *plant) else {
                        bail!("line {}: no plant {}", line.number, describe(*plant));
                    };
                    if snapshot.stage != *stage {
                        bail!(
                            "line {}: expected plant {} at {stage:?}, found {:?}",
                            line.number,
                            describe(*plant),
                            snapshot.stage
                        );
                    }
                }
            }
        }
        self.settle();
        Ok(())
    }

    pub(crate) fn summary(&self) -> String {
        let account = query::account(&self.garden);
        let mut lines = vec![format!(
            "money {} | plants {}/{} | weather {:?} | income x{:.2}",
            account.money,
            query::plant_count(&self.garden),
            account.plant_limit,
            account.weather,
            query::income_multiplier(&self.garden),
        )];
        for plant in query::plants(&self.garden) {
            lines.push(format!(
                "  {:>4} {:<6} {:<16} {:<10} size {:<4} {:?} growth {:?} fertilizer {:?} at ({:.0}, {:.0})",
                describe(plant.key),
                plant.plant_type,
                plant.species.as_deref().unwrap_or("?"),
                plant
                    .rarity
                    .map_or_else(|| "?".to_owned(), |rarity| format!("{rarity:?}")),
                plant
                    .size
                    .map_or_else(|| "?".to_owned(), |size| format!("{size:.2}")),
                plant.stage,
                plant.growth_time_remaining,
                plant.fertilizer_remaining,
                plant.position.x,
                plant.position.y,
            ));
        }
        lines.join("\n")
    }
}

fn describe(key: PlantKey) -> String {
    match key {
        PlantKey::Confirmed(id) => id.get().to_string(),
        PlantKey::Pending(pending) => format!("p{}", pending.get()),
    }
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::ActionRejected { action, reason } => info!(?action, %reason, "rejected"),
            Event::PlantConfirmed { pending, plant } => {
                info!(pending = pending.get(), plant = plant.get(), "plant confirmed");
            }
            Event::StageAdvanced { plant, stage } => {
                info!(plant = %describe(*plant), ?stage, "stage advanced");
            }
            Event::PlantSold { plant, payout } => {
                info!(plant = plant.get(), payout, "plant sold");
            }
            Event::RewardGranted { mode, reward } => info!(
                ?mode,
                coins = reward.coins,
                growth = reward.growth,
                particles = reward.particles,
                "reward"
            ),
            Event::SessionCompleted { mode } => info!(?mode, "session complete"),
            Event::RemoteCallFailed {
                error, rolled_back, ..
            } => warn!(%error, rolled_back, "sync failed"),
            other => debug!(event = ?other, "garden event"),
        }
    }
}
