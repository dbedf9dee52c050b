//! Self-playing demo: plants, tends and harvests through several work cycles.

use pomo_patch_core::{Command, Event, PlantType, Position, Stage};
use pomo_patch_world::query;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::driver::Driver;

const PLACEMENT_ATTEMPTS: usize = 8;

pub(crate) fn run(driver: &mut Driver, seed: u64, cycles: u32) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for cycle in 1..=cycles {
        plant_one(driver, &mut rng);
        driver.settle();
        tend(driver);
        driver.settle();

        complete(driver, Command::ClaimWorkReward);
        complete(driver, Command::ClaimBreakReward);
        driver.settle();

        harvest(driver);
        upgrade_when_full(driver);
        driver.settle();

        info!(
            cycle,
            money = query::money(driver.garden()),
            plants = query::plant_count(driver.garden()),
            "demo cycle finished"
        );
    }
}

fn plant_one(driver: &mut Driver, rng: &mut ChaCha8Rng) {
    let layout = query::layout(driver.garden()).clone();
    let plant_type = PlantType::ALL
        .choose(rng)
        .copied()
        .unwrap_or(PlantType::Berry);

    for _ in 0..PLACEMENT_ATTEMPTS {
        let position = Position::new(
            rng.gen_range(0.0..layout.viewport.width),
            rng.gen_range(layout.top_band..layout.viewport.height - layout.bottom_band),
        );
        let events = driver.act(Command::PlaceSeed {
            plant_type,
            position,
        });
        let planted = events
            .iter()
            .any(|event| matches!(event, Event::SeedPlanted { .. }));
        let broke = events.iter().any(|event| {
            matches!(
                event,
                Event::ActionRejected {
                    reason: pomo_patch_core::Rejection::InsufficientFunds { .. },
                    ..
                }
            )
        });
        if planted || broke {
            return;
        }
    }
}

fn tend(driver: &mut Driver) {
    for plant in query::plants(driver.garden()) {
        if plant.key.is_pending() || plant.growth_time_remaining.is_some() {
            continue;
        }
        match (plant.stage, plant.fertilizer_remaining) {
            (Stage::Seed, _) => {
                let _ = driver.act(Command::ApplyWater { plant: plant.key });
            }
            (Stage::Seedling, Some(doses)) => {
                for _ in 0..doses {
                    let _ = driver.act(Command::ApplyFertilizer { plant: plant.key });
                }
            }
            _ => {}
        }
    }
}

/// Starts the countdown the claim belongs to when needed, runs it out and claims.
fn complete(driver: &mut Driver, claim: Command) {
    if claim == Command::ClaimWorkReward {
        let _ = driver.act(Command::StartWorkSession);
    }
    let dt = query::session(driver.garden()).time_remaining;
    let _ = driver.act(Command::Tick { dt });
    let _ = driver.act(claim);
}

/// Sells every mature plant through the sell zone.
fn harvest(driver: &mut Driver) {
    let zone = query::layout(driver.garden()).sell_zone;
    let target = Position::new(
        zone.origin.x + zone.width / 2.0,
        zone.origin.y + zone.height / 2.0,
    );
    let mature: Vec<_> = query::plants(driver.garden())
        .into_iter()
        .filter(|plant| plant.stage == Stage::Mature && !plant.key.is_pending())
        .map(|plant| plant.key)
        .collect();

    for plant in mature {
        let _ = driver.act(Command::PickUp { plant });
        let _ = driver.act(Command::MoveAttached { position: target });
        let _ = driver.act(Command::Sell);
    }
}

fn upgrade_when_full(driver: &mut Driver) {
    let garden = driver.garden();
    let full = query::plant_count(garden) >= query::plant_limit(garden) as usize;
    let affordable = query::money(garden) >= query::plant_limit_upgrade_cost(garden);
    if full && affordable {
        let _ = driver.act(Command::UpgradePlantLimit);
    }
}
