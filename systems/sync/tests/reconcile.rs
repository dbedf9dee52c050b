use std::{collections::BTreeMap, time::Duration};

use pomo_patch_core::{
    wire::{AccountReply, PlantReply},
    Account, ActionKind, CallOutcome, Command, EconomyRules, EconomyService, Event, GardenLayout,
    PlantId, PlantKey, PlantRecord, PlantType, Position, Rarity, Rejection, RemoteCall,
    RemoteReply, ServiceError, SessionRules, Stage, Weather,
};
use pomo_patch_service::{bootstrap_account, EconomyClient, LocalConfig, LocalEconomy, StaticToken};
use pomo_patch_system_sync::{Config, Reconciler};
use pomo_patch_world::{self as world, query, Garden};

const EMAIL: &str = "gardener@example.com";

/// Drives the garden the way the game loop does: apply, hand events to the
/// reconciler, feed its commands back.
struct Harness<S> {
    garden: Garden,
    reconciler: Reconciler,
    service: S,
}

impl<S: EconomyService> Harness<S> {
    fn new(garden: Garden, service: S) -> Self {
        Self {
            garden,
            reconciler: Reconciler::new(Config::default()),
            service,
        }
    }

    fn act(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        let mut queue = vec![command];
        while let Some(command) = queue.pop() {
            let start = events.len();
            world::apply(&mut self.garden, command, &mut events);
            self.reconciler.handle(&events[start..], &mut queue);
        }
        events
    }

    fn settle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let mut commands = Vec::new();
        while self.reconciler.poll_one(&mut self.service, &mut commands) {
            for command in std::mem::take(&mut commands) {
                events.extend(self.act(command));
            }
        }
        events
    }

    fn only_plant(&self) -> PlantKey {
        let plants = query::plants(&self.garden);
        assert_eq!(plants.len(), 1, "expected exactly one plant: {plants:?}");
        plants[0].key
    }

    fn complete_work_session(&mut self) -> Vec<Event> {
        let mut events = self.act(Command::StartWorkSession);
        events.extend(self.act(Command::Tick {
            dt: SessionRules::default().work_duration(),
        }));
        events.extend(self.act(Command::ClaimWorkReward));
        events
    }
}

/// Service answering each call through a closure.
struct Scripted<F> {
    answer: F,
    calls: Vec<RemoteCall>,
}

impl<F> Scripted<F>
where
    F: FnMut(&RemoteCall) -> Result<RemoteReply, ServiceError>,
{
    fn new(answer: F) -> Self {
        Self {
            answer,
            calls: Vec::new(),
        }
    }
}

impl<F> EconomyService for Scripted<F>
where
    F: FnMut(&RemoteCall) -> Result<RemoteReply, ServiceError>,
{
    fn execute(&mut self, call: &RemoteCall) -> Result<RemoteReply, ServiceError> {
        self.calls.push(call.clone());
        (self.answer)(call)
    }
}

fn account(money: u64) -> Account {
    Account {
        money,
        plant_limit: 25,
        weather: Weather::Cloudy,
    }
}

fn local_harness(
    rules: EconomyRules,
    config: LocalConfig,
) -> Harness<EconomyClient<LocalEconomy, StaticToken>> {
    let mut service = LocalEconomy::new(rules.clone(), config).into_client(EMAIL);
    let account = bootstrap_account(&mut service).expect("bootstrap succeeds");
    let garden = Garden::with_rules(
        account,
        rules,
        SessionRules::default(),
        GardenLayout::default(),
    );
    Harness::new(garden, service)
}

fn place(plant_type: PlantType, x: f32, y: f32) -> Command {
    Command::PlaceSeed {
        plant_type,
        position: Position::new(x, y),
    }
}

fn issued_calls(events: &[Event]) -> Vec<RemoteCall> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::RemoteCallIssued { call, .. } => Some(call.clone()),
            _ => None,
        })
        .collect()
}

fn stage_history(events: &[Event], history: &mut BTreeMap<PlantId, Vec<Stage>>) {
    for event in events {
        if let Event::StageAdvanced {
            plant: PlantKey::Confirmed(id),
            stage,
        } = event
        {
            history.entry(*id).or_default().push(*stage);
        }
    }
}

#[test]
fn seed_to_seedling_end_to_end() {
    let rules = EconomyRules {
        water_price: 0,
        ..EconomyRules::default()
    };
    let mut harness = local_harness(
        rules.clone(),
        LocalConfig {
            initial_money: 100,
            initial_plant_limit: 50,
            ..LocalConfig::default()
        },
    );
    assert_eq!(query::plant_count(&harness.garden), 0);

    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    assert_eq!(query::money(&harness.garden), 0);
    let seed = query::plants(&harness.garden).remove(0);
    assert_eq!(seed.stage, Stage::Seed);
    assert_eq!(seed.growth_time_remaining, None);

    let _ = harness.settle();
    let key = harness.only_plant();
    assert!(!key.is_pending(), "create reply confirms the plant");

    let _ = harness.act(Command::ApplyWater { plant: key });
    let watered = query::plant(&harness.garden, key).expect("plant exists");
    assert_eq!(watered.growth_time_remaining, Some(rules.seed_growth_time));
    let _ = harness.settle();

    let _ = harness.complete_work_session();
    let grown = query::plant(&harness.garden, key).expect("plant exists");
    let rarity = grown.rarity.expect("rarity known after confirmation");
    assert_eq!(grown.stage, Stage::Seedling);
    assert_eq!(
        grown.fertilizer_remaining,
        Some(rarity.ordinal() as u32 + 1),
        "new seedlings need rarity + 1 doses"
    );

    let _ = harness.settle();
    let settled = query::plant(&harness.garden, key).expect("plant exists");
    assert_eq!(settled.stage, Stage::Seedling, "stale resync must not lower the stage");
    assert_eq!(settled.fertilizer_remaining, grown.fertilizer_remaining);
    assert_eq!(
        Some(query::money(&harness.garden)),
        harness.service.transport().money(EMAIL),
        "wallet converges to the authority"
    );
    assert!(query::pending_tickets(&harness.garden).is_empty());
}

#[test]
fn unaffordable_seed_changes_nothing() {
    let mut harness = local_harness(
        EconomyRules::default(),
        LocalConfig {
            initial_money: 60,
            ..LocalConfig::default()
        },
    );

    let events = harness.act(place(PlantType::Rose, 400.0, 300.0));

    assert_eq!(query::money(&harness.garden), 60);
    assert_eq!(query::plant_count(&harness.garden), 0);
    assert!(issued_calls(&events).is_empty(), "no call may be issued");
    assert!(harness.reconciler.is_idle());
    assert_eq!(
        events,
        vec![Event::ActionRejected {
            action: ActionKind::PlaceSeed,
            reason: Rejection::InsufficientFunds {
                needed: 100,
                available: 60,
            },
        }]
    );
}

#[test]
fn failed_water_restores_exact_balance() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    let _ = harness.act(place(PlantType::Fungi, 500.0, 400.0));
    let _ = harness.settle();
    let key = harness.only_plant();
    let before = query::money(&harness.garden);

    let _ = harness.act(Command::ApplyWater { plant: key });
    assert_eq!(query::money(&harness.garden), before - 25);

    harness.service.transport_mut().fail_next(1);
    let events = harness.settle();

    assert_eq!(query::money(&harness.garden), before);
    let plant = query::plant(&harness.garden, key).expect("plant survives");
    assert_eq!(plant.growth_time_remaining, None, "timer reverted");
    assert!(events.iter().any(|event| matches!(
        event,
        Event::RemoteCallFailed {
            rolled_back: true,
            ..
        }
    )));
}

fn seed_confirmed_as(
    plant_id: PlantId,
) -> impl FnMut(&RemoteCall) -> Result<RemoteReply, ServiceError> {
    move |call: &RemoteCall| match call {
        RemoteCall::CreatePlant { .. } => Ok(RemoteReply::Plant(PlantReply {
            plant_id: Some(plant_id),
            rarity: Some(Rarity::Common),
            stage: Some(Stage::Seed),
            ..PlantReply::default()
        })),
        _ => Ok(RemoteReply::Ack),
    }
}

fn failed_calls(events: &[Event]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::RemoteCallFailed { rolled_back, .. } => Some(*rolled_back),
            _ => None,
        })
        .collect()
}

#[test]
fn failed_water_after_growth_keeps_the_new_stage() {
    let key = PlantKey::Confirmed(PlantId::new(1));
    let mut confirm = seed_confirmed_as(PlantId::new(1));
    let service = Scripted::new(move |call: &RemoteCall| match call {
        RemoteCall::ApplyWater { .. } => Err(ServiceError::Transport("offline".to_owned())),
        other => confirm(other),
    });
    let mut harness = Harness::new(Garden::new(account(1_000)), service);
    let mut history = BTreeMap::new();
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let _ = harness.settle();

    let _ = harness.act(Command::ApplyWater { plant: key });
    stage_history(&harness.complete_work_session(), &mut history);
    let grown = query::plant(&harness.garden, key).expect("plant exists");
    assert_eq!(grown.stage, Stage::Seedling);
    let money = query::money(&harness.garden);

    let events = harness.settle();
    stage_history(&events, &mut history);

    let plant = query::plant(&harness.garden, key).expect("plant survives");
    assert_eq!(plant.stage, Stage::Seedling, "rollback must not lower the stage");
    assert_eq!(plant.fertilizer_remaining, Some(1));
    assert_eq!(plant.growth_time_remaining, None);
    assert_eq!(query::money(&harness.garden), money + 25, "water price refunded");
    assert_eq!(failed_calls(&events), vec![true]);
    for stages in history.values() {
        assert!(
            stages.windows(2).all(|pair| pair[0] <= pair[1]),
            "stage went backwards: {stages:?}"
        );
    }
}

#[test]
fn failed_fertilizer_after_growth_keeps_the_new_stage() {
    let key = PlantKey::Confirmed(PlantId::new(1));
    let mut confirm = seed_confirmed_as(PlantId::new(1));
    let service = Scripted::new(move |call: &RemoteCall| match call {
        RemoteCall::ApplyFertilizer { .. } => Err(ServiceError::Transport("offline".to_owned())),
        other => confirm(other),
    });
    let mut harness = Harness::new(Garden::new(account(1_000)), service);
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let _ = harness.settle();
    let _ = harness.act(Command::ApplyWater { plant: key });
    let _ = harness.complete_work_session();
    let _ = harness.act(Command::ExitSession);
    let _ = harness.settle();
    assert_eq!(
        query::plant(&harness.garden, key).map(|plant| plant.stage),
        Some(Stage::Seedling)
    );

    let _ = harness.act(Command::ApplyFertilizer { plant: key });
    let _ = harness.complete_work_session();
    assert_eq!(
        query::plant(&harness.garden, key).map(|plant| plant.stage),
        Some(Stage::Mature),
        "rainy work reward covers the whole seedling timer"
    );
    let money = query::money(&harness.garden);

    let events = harness.settle();

    let plant = query::plant(&harness.garden, key).expect("plant survives");
    assert_eq!(plant.stage, Stage::Mature);
    assert_eq!(plant.fertilizer_remaining, None);
    assert_eq!(plant.growth_time_remaining, None);
    assert_eq!(query::money(&harness.garden), money + 25);
    assert_eq!(failed_calls(&events), vec![true]);
}

#[test]
fn failed_reward_calls_keep_local_reward() {
    let key = PlantKey::Confirmed(PlantId::new(1));
    let mut confirm = seed_confirmed_as(PlantId::new(1));
    let service = Scripted::new(move |call: &RemoteCall| match call {
        RemoteCall::ChangeMoney { .. } | RemoteCall::CycleWeather => {
            Err(ServiceError::Transport("offline".to_owned()))
        }
        RemoteCall::GrowPlant { .. } => Ok(RemoteReply::Plant(PlantReply {
            stage: Some(Stage::Seedling),
            growth_time_remaining: Some(None),
            fertilizer_remaining: Some(Some(1)),
            ..PlantReply::default()
        })),
        other => confirm(other),
    });
    let mut harness = Harness::new(Garden::new(account(1_000)), service);
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let _ = harness.settle();
    let _ = harness.act(Command::ApplyWater { plant: key });
    let _ = harness.settle();
    let before_claim = query::money(&harness.garden);

    let claimed = harness.complete_work_session();
    let grow_ticket = claimed
        .iter()
        .find_map(|event| match event {
            Event::RemoteCallIssued {
                ticket,
                call: RemoteCall::GrowPlant { .. },
            } => Some(*ticket),
            _ => None,
        })
        .expect("growth call issued");
    let money = query::money(&harness.garden);
    assert!(money > before_claim, "coins credited on claim");

    let events = harness.settle();

    assert_eq!(query::money(&harness.garden), money, "coins stay applied");
    assert_eq!(query::account(&harness.garden).weather, Weather::Rainy);
    let plant = query::plant(&harness.garden, key).expect("plant exists");
    assert_eq!(plant.stage, Stage::Seedling);
    assert_eq!(plant.fertilizer_remaining, Some(1));
    assert_eq!(failed_calls(&events), vec![false, false]);
    assert!(events.contains(&Event::RemoteCallSettled {
        ticket: grow_ticket
    }));
    assert!(harness.service.calls.contains(&RemoteCall::GrowPlant {
        plant: PlantId::new(1),
        time: 60,
    }));
    assert!(harness.reconciler.is_idle());
}

#[test]
fn offline_create_removes_pending_plant() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    harness.service.transport_mut().set_offline(true);

    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    assert_eq!(query::money(&harness.garden), 150);
    let _ = harness.settle();

    assert_eq!(query::money(&harness.garden), 250);
    assert_eq!(query::plant_count(&harness.garden), 0);
    assert_eq!(harness.service.transport().plant_count(EMAIL), 0);
}

#[test]
fn create_reply_overrides_placeholders() {
    let service = Scripted::new(|call: &RemoteCall| match call {
        RemoteCall::CreatePlant { .. } => Ok(RemoteReply::Plant(PlantReply {
            plant_id: Some(PlantId::new(7)),
            plant_species: Some("X".to_owned()),
            rarity: Some(Rarity::Rare),
            size: Some(0.7),
            stage: Some(Stage::Seed),
            growth_time_remaining: Some(None),
            fertilizer_remaining: Some(None),
            new_balance: Some(150),
        })),
        other => panic!("unexpected call {other:?}"),
    });
    let mut harness = Harness::new(Garden::new(account(250)), service);

    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let pending = query::plants(&harness.garden).remove(0);
    assert!(pending.key.is_pending());
    assert_eq!(pending.rarity, None);
    assert_eq!(pending.size, None);
    let events = harness.settle();

    let key = PlantKey::Confirmed(PlantId::new(7));
    let plant = query::plant(&harness.garden, key).expect("plant re-keyed");
    assert_eq!(plant.species.as_deref(), Some("X"));
    assert_eq!(plant.rarity, Some(Rarity::Rare));
    assert_eq!(plant.size, Some(0.7));
    assert_eq!(plant.position, Position::new(400.0, 300.0));
    assert_eq!(query::plant_count(&harness.garden), 1);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PlantConfirmed { plant, .. } if *plant == PlantId::new(7))));
}

#[test]
fn stale_replies_never_lower_stage() {
    let plant_id = PlantId::new(1);
    let service = Scripted::new(move |call: &RemoteCall| match call {
        RemoteCall::CreatePlant { .. } => Ok(RemoteReply::Plant(PlantReply {
            plant_id: Some(plant_id),
            rarity: Some(Rarity::Common),
            stage: Some(Stage::Seed),
            ..PlantReply::default()
        })),
        RemoteCall::ApplyWater { .. } => Ok(RemoteReply::Plant(PlantReply {
            growth_time_remaining: Some(Some(30)),
            ..PlantReply::default()
        })),
        RemoteCall::ListPlants => Ok(RemoteReply::Plants(vec![PlantRecord {
            plant_id,
            plant_type: PlantType::Berry,
            plant_species: Some("blueberry".to_owned()),
            rarity: Some(Rarity::Common),
            size: None,
            x: -240.0,
            y: -60.0,
            stage: Stage::Seed,
            growth_time_remaining: Some(30),
            fertilizer_remaining: None,
        }])),
        RemoteCall::GrowPlant { .. } => Ok(RemoteReply::Plant(PlantReply {
            stage: Some(Stage::Seedling),
            growth_time_remaining: Some(None),
            ..PlantReply::default()
        })),
        RemoteCall::GetUser => Ok(RemoteReply::Account(AccountReply::default())),
        _ => Ok(RemoteReply::Ack),
    });
    let mut harness = Harness::new(Garden::new(account(1_000)), service);
    let mut history = BTreeMap::new();

    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    stage_history(&harness.settle(), &mut history);
    let key = PlantKey::Confirmed(plant_id);
    let _ = harness.act(Command::ApplyWater { plant: key });
    stage_history(&harness.settle(), &mut history);

    stage_history(&harness.complete_work_session(), &mut history);
    stage_history(&harness.settle(), &mut history);

    assert!(
        harness.service.calls.contains(&RemoteCall::ListPlants),
        "the long session triggers a resync"
    );
    let plant = query::plant(&harness.garden, key).expect("plant exists");
    assert_eq!(plant.stage, Stage::Seedling);
    assert_eq!(plant.fertilizer_remaining, Some(1));
    assert_eq!(plant.position, Position::new(400.0, 300.0));
    for stages in history.values() {
        assert!(
            stages.windows(2).all(|pair| pair[0] <= pair[1]),
            "stage went backwards: {stages:?}"
        );
    }
}

#[test]
fn repeated_water_on_growing_plant_is_rejected_without_change() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let _ = harness.settle();
    let key = harness.only_plant();
    let _ = harness.act(Command::ApplyWater { plant: key });
    let _ = harness.settle();
    let snapshot = query::plant(&harness.garden, key);
    let money = query::money(&harness.garden);

    for _ in 0..3 {
        let events = harness.act(Command::ApplyWater { plant: key });
        assert_eq!(
            events,
            vec![Event::ActionRejected {
                action: ActionKind::ApplyWater,
                reason: Rejection::AlreadyGrowing,
            }]
        );
        assert_eq!(query::plant(&harness.garden, key), snapshot);
        assert_eq!(query::money(&harness.garden), money);
    }

    let events = harness.act(Command::ApplyFertilizer { plant: key });
    assert_eq!(
        events,
        vec![Event::ActionRejected {
            action: ActionKind::ApplyFertilizer,
            reason: Rejection::WrongStage { stage: Stage::Seed },
        }]
    );
    assert!(harness.reconciler.is_idle());
}

#[test]
fn placement_rejections_name_the_failed_rule() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));

    let collision = harness.act(place(PlantType::Rose, 410.0, 310.0));
    let banded = harness.act(place(PlantType::Rose, 800.0, 40.0));

    assert!(matches!(
        collision.as_slice(),
        [Event::ActionRejected {
            reason: Rejection::IllegalPlacement { check },
            ..
        }] if check.collision
    ));
    assert!(matches!(
        banded.as_slice(),
        [Event::ActionRejected {
            reason: Rejection::IllegalPlacement { check },
            ..
        }] if check.in_restricted_zone && !check.collision
    ));
    assert_eq!(query::plant_count(&harness.garden), 1);
    assert_eq!(query::money(&harness.garden), 150);
}

#[test]
fn failed_sale_is_not_rolled_back() {
    let service = Scripted::new(|call: &RemoteCall| match call {
        RemoteCall::SellPlant { .. } => Err(ServiceError::Transport("offline".to_owned())),
        RemoteCall::ListPlants => Ok(RemoteReply::Plants(vec![PlantRecord {
            plant_id: PlantId::new(3),
            plant_type: PlantType::Rose,
            plant_species: Some("red_rose".to_owned()),
            rarity: Some(Rarity::Common),
            size: None,
            x: 0.0,
            y: 0.0,
            stage: Stage::Mature,
            growth_time_remaining: None,
            fertilizer_remaining: None,
        }])),
        _ => Ok(RemoteReply::Account(AccountReply::default())),
    });
    let mut harness = Harness::new(Garden::new(account(0)), service);
    let _ = harness.act(Command::Resync);
    let _ = harness.settle();
    let key = harness.only_plant();

    let sell_zone = query::layout(&harness.garden).sell_zone;
    let over_zone = Position::new(sell_zone.origin.x + 10.0, sell_zone.origin.y + 10.0);
    let _ = harness.act(Command::PickUp { plant: key });
    let _ = harness.act(Command::MoveAttached {
        position: over_zone,
    });
    let _ = harness.act(Command::Sell);
    assert_eq!(query::money(&harness.garden), 100);

    let events = harness.settle();
    assert_eq!(query::money(&harness.garden), 100, "sale stays credited");
    assert_eq!(query::plant_count(&harness.garden), 0);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::RemoteCallFailed {
            rolled_back: false,
            ..
        }
    )));
}

#[test]
fn rejected_move_returns_plant_to_origin() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let _ = harness.settle();
    let key = harness.only_plant();

    let _ = harness.act(Command::PickUp { plant: key });
    let _ = harness.act(Command::MoveAttached {
        position: Position::new(700.0, 450.0),
    });
    let _ = harness.act(Command::DropAttached);
    assert_eq!(
        query::plant(&harness.garden, key).map(|plant| plant.position),
        Some(Position::new(700.0, 450.0))
    );

    harness.service.transport_mut().fail_next(1);
    let _ = harness.settle();
    assert_eq!(
        query::plant(&harness.garden, key).map(|plant| plant.position),
        Some(Position::new(400.0, 300.0))
    );
}

#[test]
fn resolution_of_each_ticket_happens_once() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    let events = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let ticket = events
        .iter()
        .find_map(|event| match event {
            Event::RemoteCallIssued { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("create call issued");
    let _ = harness.settle();
    let money = query::money(&harness.garden);

    let replay = harness.act(Command::Resolve {
        ticket,
        outcome: CallOutcome::Failed(ServiceError::Transport("late".to_owned())),
    });

    assert!(replay.is_empty(), "settled tickets are ignored: {replay:?}");
    assert_eq!(query::money(&harness.garden), money);
    assert_eq!(query::plant_count(&harness.garden), 1);
}

#[test]
fn resync_keeps_pending_and_drops_missing_plants() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());
    let _ = harness.act(place(PlantType::Berry, 400.0, 300.0));
    let _ = harness.settle();
    let sold = harness.only_plant();
    let _ = harness
        .service
        .execute(&RemoteCall::SellPlant {
            plant: sold.confirmed().expect("confirmed id"),
        })
        .expect("sold behind the garden's back");

    let _ = harness.act(Command::Resync);
    let _ = harness.act(place(PlantType::Fungi, 800.0, 300.0));

    let mut commands = Vec::new();
    for _ in 0..2 {
        assert!(harness.reconciler.poll_one(&mut harness.service, &mut commands));
    }
    for command in commands {
        let _ = harness.act(command);
    }
    let plants = query::plants(&harness.garden);
    assert_eq!(plants.len(), 1, "sold plant dropped: {plants:?}");
    assert!(plants[0].key.is_pending(), "pending plant survives the overlay");

    let _ = harness.settle();
    assert!(!harness.only_plant().is_pending());
}

#[test]
fn long_idle_time_requests_a_resync() {
    let mut harness = local_harness(EconomyRules::default(), LocalConfig::default());

    let events = harness.act(Command::Tick {
        dt: Duration::from_secs(61),
    });

    assert_eq!(
        issued_calls(&events),
        vec![RemoteCall::GetUser, RemoteCall::ListPlants]
    );
    let events = harness.settle();
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::Resynced { plants: 0 })));
}
