#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative local garden state for Pomo Patch.
//!
//! The garden applies every player action optimistically, records how to undo
//! it, and announces the remote call that must confirm it. Resolving the call
//! later either merges the authoritative reply or reverts the recorded undo.

mod journal;
mod plants;
mod session;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use pomo_patch_core::{
    wire::{AccountReply, PlantReply},
    Account, CallOutcome, Command, EconomyRules, Event, GardenLayout, PendingId, PlantFootprint,
    PlantId, PlantKey, PlantRecord, PlantType, Position, Rejection, RemoteCall, RemoteReply,
    Reward, SessionMode, SessionRules, Stage, Ticket,
};
use pomo_patch_system_economy::EconomyCalculator;
use pomo_patch_system_placement::PlacementValidator;
use tracing::{debug, info, warn};

use journal::{Entry, Journal, Subject, Undo};
use plants::Plant;
use session::SessionTimer;

/// Plant currently following the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    /// Plant that is attached.
    pub plant: PlantKey,
    /// Position the plant was picked up from.
    pub origin: Position,
    /// Current drag position.
    pub position: Position,
}

/// Represents the authoritative local Pomo Patch garden.
#[derive(Debug)]
pub struct Garden {
    plants: BTreeMap<PlantKey, Plant>,
    account: Account,
    attachment: Option<Attachment>,
    session: SessionTimer,
    session_rules: SessionRules,
    journal: Journal,
    placement: PlacementValidator,
    economy: EconomyCalculator,
    next_pending: u32,
}

impl Garden {
    /// Creates an empty garden for the account using the default rules.
    #[must_use]
    pub fn new(account: Account) -> Self {
        Self::with_rules(
            account,
            EconomyRules::default(),
            SessionRules::default(),
            GardenLayout::default(),
        )
    }

    /// Creates an empty garden for the account using explicit rules.
    #[must_use]
    pub fn with_rules(
        account: Account,
        rules: EconomyRules,
        session_rules: SessionRules,
        layout: GardenLayout,
    ) -> Self {
        Self {
            plants: BTreeMap::new(),
            account,
            attachment: None,
            session: SessionTimer::default(),
            session_rules,
            journal: Journal::default(),
            placement: PlacementValidator::new(layout),
            economy: EconomyCalculator::new(rules),
            next_pending: 0,
        }
    }

    fn footprints(&self) -> Vec<PlantFootprint> {
        self.plants
            .iter()
            .map(|(key, plant)| PlantFootprint {
                plant: *key,
                position: plant.position,
            })
            .collect()
    }

    fn income_multiplier(&self) -> f64 {
        self.economy.income_multiplier(
            self.plants
                .iter()
                .filter(|(key, _)| !key.is_pending())
                .map(|(_, plant)| (plant.stage, plant.rarity())),
        )
    }

    fn confirmed_plant(&self, key: PlantKey) -> Result<PlantId, Rejection> {
        if !self.plants.contains_key(&key) {
            return Err(Rejection::MissingPlant);
        }
        key.confirmed().ok_or(Rejection::PendingPlant)
    }

    fn to_server(&self, position: Position) -> Position {
        self.placement.layout().viewport.to_server(position)
    }

    fn issue(
        &mut self,
        call: RemoteCall,
        undo: Undo,
        subject: Option<Subject>,
        out_events: &mut Vec<Event>,
    ) {
        let ticket = self.journal.record(Entry {
            call: call.clone(),
            undo,
            subject,
        });
        debug!(ticket = ticket.get(), call = call.label(), "remote call issued");
        out_events.push(Event::RemoteCallIssued { ticket, call });
    }

    fn debit(&mut self, amount: u64, out_events: &mut Vec<Event>) {
        self.account.money = self.account.money.saturating_sub(amount);
        out_events.push(Event::BalanceChanged {
            money: self.account.money,
        });
    }

    fn credit(&mut self, amount: u64, out_events: &mut Vec<Event>) {
        self.account.money = self.account.money.saturating_add(amount);
        out_events.push(Event::BalanceChanged {
            money: self.account.money,
        });
    }

    fn set_money(&mut self, money: u64, out_events: &mut Vec<Event>) {
        if self.account.money != money {
            self.account.money = money;
            out_events.push(Event::BalanceChanged { money });
        }
    }

    fn detach_if(&mut self, plant: PlantKey) {
        if self
            .attachment
            .is_some_and(|attachment| attachment.plant == plant)
        {
            self.attachment = None;
        }
    }

    fn place_seed(
        &mut self,
        plant_type: PlantType,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let check =
            self.placement
                .check_new(position, &self.footprints(), self.account.plant_limit);
        if !check.is_legal() {
            return Err(Rejection::IllegalPlacement { check });
        }
        let price = self.economy.seed_price(plant_type);
        ensure_funds(&self.account, price)?;

        let pending = PendingId::new(self.next_pending);
        self.next_pending = self.next_pending.wrapping_add(1);
        let key = PlantKey::Pending(pending);
        let _ = self.plants.insert(key, Plant::seed(plant_type, position));
        out_events.push(Event::SeedPlanted {
            plant: key,
            plant_type,
            position,
        });
        self.debit(price, out_events);

        let call = RemoteCall::CreatePlant {
            plant_type,
            position: self.to_server(position),
        };
        self.issue(
            call,
            Undo::RemovePlant {
                plant: key,
                refund: price,
            },
            Some(Subject {
                plant: key,
                issued_at: Stage::Seed,
            }),
            out_events,
        );
        Ok(())
    }

    fn pick_up(&mut self, key: PlantKey, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if self.attachment.is_some() {
            return Err(Rejection::AlreadyAttached);
        }
        let plant = self.plants.get(&key).ok_or(Rejection::MissingPlant)?;
        if key.is_pending() {
            return Err(Rejection::PendingPlant);
        }
        self.attachment = Some(Attachment {
            plant: key,
            origin: plant.position,
            position: plant.position,
        });
        out_events.push(Event::PlantPickedUp { plant: key });
        Ok(())
    }

    fn move_attached(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let attachment = self
            .attachment
            .as_mut()
            .ok_or(Rejection::NothingAttached)?;
        attachment.position = position;
        out_events.push(Event::PlantDragged {
            plant: attachment.plant,
            position,
        });
        Ok(())
    }

    fn drop_attached(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let attachment = self.attachment.take().ok_or(Rejection::NothingAttached)?;
        let key = attachment.plant;
        let plant_id = self.confirmed_plant(key)?;

        if attachment.position == attachment.origin {
            out_events.push(Event::PlantReturned {
                plant: key,
                position: attachment.origin,
            });
            return Ok(());
        }

        let check = self
            .placement
            .check_move(attachment.position, key, &self.footprints());
        if !check.is_legal() {
            out_events.push(Event::PlantReturned {
                plant: key,
                position: attachment.origin,
            });
            return Err(Rejection::IllegalPlacement { check });
        }

        let Some(plant) = self.plants.get_mut(&key) else {
            return Err(Rejection::MissingPlant);
        };
        plant.position = attachment.position;
        let issued_at = plant.stage;
        out_events.push(Event::PlantMoved {
            plant: key,
            position: attachment.position,
        });

        let call = RemoteCall::MovePlant {
            plant: plant_id,
            position: self.to_server(attachment.position),
        };
        self.issue(
            call,
            Undo::RestorePosition {
                plant: key,
                origin: attachment.origin,
            },
            Some(Subject {
                plant: key,
                issued_at,
            }),
            out_events,
        );
        Ok(())
    }

    fn sell(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let attachment = self.attachment.ok_or(Rejection::NothingAttached)?;
        if !self.placement.over_sell_zone(attachment.position) {
            return Err(Rejection::NotOverSellZone);
        }
        let key = attachment.plant;
        let plant_id = key.confirmed().ok_or(Rejection::PendingPlant)?;
        self.attachment = None;
        let plant = self.plants.remove(&key).ok_or(Rejection::MissingPlant)?;

        let payout = self.economy.sell_price(plant.stage, plant.rarity());
        out_events.push(Event::PlantSold {
            plant: plant_id,
            payout,
        });
        self.credit(payout, out_events);
        self.issue(
            RemoteCall::SellPlant { plant: plant_id },
            Undo::Nothing,
            None,
            out_events,
        );
        Ok(())
    }

    fn apply_water(&mut self, key: PlantKey, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let plant_id = self.confirmed_plant(key)?;
        let price = self.economy.water_price();
        let plant = self.plants.get_mut(&key).ok_or(Rejection::MissingPlant)?;
        plant.can_water()?;
        ensure_funds(&self.account, price)?;

        let lifecycle = plant.lifecycle();
        let growth_time_remaining = plant.water(self.economy.rules());
        out_events.push(Event::PlantWatered {
            plant: key,
            growth_time_remaining,
        });
        self.debit(price, out_events);
        self.issue(
            RemoteCall::ApplyWater { plant: plant_id },
            Undo::RestorePlant {
                plant: key,
                lifecycle,
                refund: price,
            },
            Some(Subject {
                plant: key,
                issued_at: lifecycle.stage,
            }),
            out_events,
        );
        Ok(())
    }

    fn apply_fertilizer(
        &mut self,
        key: PlantKey,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let plant_id = self.confirmed_plant(key)?;
        let price = self.economy.fertilizer_price();
        let plant = self.plants.get_mut(&key).ok_or(Rejection::MissingPlant)?;
        plant.can_fertilize()?;
        ensure_funds(&self.account, price)?;

        let lifecycle = plant.lifecycle();
        plant.fertilize(self.economy.rules());
        out_events.push(Event::PlantFertilized {
            plant: key,
            fertilizer_remaining: plant.fertilizer_remaining,
            growth_time_remaining: plant.growth_time_remaining,
        });
        self.debit(price, out_events);
        self.issue(
            RemoteCall::ApplyFertilizer { plant: plant_id },
            Undo::RestorePlant {
                plant: key,
                lifecycle,
                refund: price,
            },
            Some(Subject {
                plant: key,
                issued_at: lifecycle.stage,
            }),
            out_events,
        );
        Ok(())
    }

    fn upgrade_plant_limit(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let cost = self
            .economy
            .plant_limit_upgrade_cost(self.account.plant_limit);
        ensure_funds(&self.account, cost)?;

        let increment = self.economy.rules().plant_limit_increment;
        self.debit(cost, out_events);
        self.account.plant_limit = self.account.plant_limit.saturating_add(increment);
        out_events.push(Event::PlantLimitChanged {
            plant_limit: self.account.plant_limit,
        });
        self.issue(
            RemoteCall::IncreasePlantLimit,
            Undo::RevertUpgrade {
                refund: cost,
                increment,
            },
            None,
            out_events,
        );
        Ok(())
    }

    fn start_work_session(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let duration = self.session.start_work(&self.session_rules)?;
        out_events.push(Event::SessionStarted {
            mode: SessionMode::Work,
            duration,
            long_break: false,
        });
        Ok(())
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        if let Some(mode) = self.session.advance(dt) {
            info!(?mode, "session completed");
            out_events.push(Event::SessionCompleted { mode });
        }
    }

    fn claim_work_reward(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.session.ensure_claimable(SessionMode::Work)?;
        let weather = self.account.weather;
        let reward = self.economy.work_reward(self.income_multiplier(), weather);
        self.grant(SessionMode::Work, reward, out_events);

        let next = weather.next();
        self.account.weather = next;
        out_events.push(Event::WeatherChanged { weather: next });
        self.issue(RemoteCall::CycleWeather, Undo::Nothing, None, out_events);

        let (duration, long_break) = self.session.begin_break(&self.session_rules);
        out_events.push(Event::SessionStarted {
            mode: SessionMode::Break,
            duration,
            long_break,
        });
        Ok(())
    }

    fn claim_break_reward(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.session.ensure_claimable(SessionMode::Break)?;
        let long_break = self.session.is_long_break(&self.session_rules);
        let reward = self.economy.break_reward(
            self.income_multiplier(),
            self.account.weather,
            long_break,
        );
        self.grant(SessionMode::Break, reward, out_events);
        self.session.finish();
        Ok(())
    }

    /// Credits a reward locally and issues its independent remote updates.
    fn grant(&mut self, mode: SessionMode, reward: Reward, out_events: &mut Vec<Event>) {
        info!(
            ?mode,
            coins = reward.coins,
            growth = reward.growth,
            "session reward granted"
        );
        out_events.push(Event::RewardGranted { mode, reward });
        if reward.coins > 0 {
            self.credit(reward.coins, out_events);
        }

        if reward.growth > 0 {
            let growing: Vec<(PlantKey, PlantId)> = self
                .plants
                .iter()
                .filter(|(_, plant)| plant.growth_time_remaining.is_some())
                .filter_map(|(key, _)| key.confirmed().map(|id| (*key, id)))
                .collect();
            for (key, plant_id) in growing {
                let Some(plant) = self.plants.get_mut(&key) else {
                    continue;
                };
                let issued_at = plant.stage;
                if let Some(growth) = plant.grow(reward.growth, self.economy.rules()) {
                    out_events.push(Event::PlantGrew {
                        plant: key,
                        growth_time_remaining: growth.remaining,
                    });
                    if let Some(stage) = growth.advanced {
                        out_events.push(Event::StageAdvanced { plant: key, stage });
                    }
                }
                self.issue(
                    RemoteCall::GrowPlant {
                        plant: plant_id,
                        time: reward.growth,
                    },
                    Undo::Nothing,
                    Some(Subject {
                        plant: key,
                        issued_at,
                    }),
                    out_events,
                );
            }
        }

        if reward.coins > 0 {
            let amount = i64::try_from(reward.coins).unwrap_or(i64::MAX);
            self.issue(
                RemoteCall::ChangeMoney { amount },
                Undo::Nothing,
                None,
                out_events,
            );
        }
    }

    fn exit_session(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let mode = self.session.exit()?;
        out_events.push(Event::SessionExited { mode });
        Ok(())
    }

    fn resync(&mut self, out_events: &mut Vec<Event>) {
        self.issue(RemoteCall::GetUser, Undo::Nothing, None, out_events);
        self.issue(RemoteCall::ListPlants, Undo::Nothing, None, out_events);
    }

    fn resolve(&mut self, ticket: Ticket, outcome: CallOutcome, out_events: &mut Vec<Event>) {
        let Some(entry) = self.journal.take(ticket) else {
            debug!(ticket = ticket.get(), "ignoring resolution of unknown ticket");
            return;
        };
        let label = entry.call.label();

        match outcome {
            CallOutcome::Succeeded(reply) => {
                debug!(ticket = ticket.get(), call = label, "remote call settled");
                self.merge(&entry, reply, out_events);
                out_events.push(Event::RemoteCallSettled { ticket });
            }
            CallOutcome::Failed(error) => {
                let rolled_back = entry.undo.reverts_anything();
                self.roll_back(entry.undo, out_events);
                warn!(
                    ticket = ticket.get(),
                    call = label,
                    %error,
                    rolled_back,
                    "remote call failed"
                );
                out_events.push(Event::RemoteCallFailed {
                    ticket,
                    error,
                    rolled_back,
                });
            }
        }
    }

    fn merge(&mut self, entry: &Entry, reply: RemoteReply, out_events: &mut Vec<Event>) {
        match reply {
            RemoteReply::Ack => {}
            RemoteReply::Account(account) => self.merge_account(&account, out_events),
            RemoteReply::Plant(reply) => {
                if let Some(subject) = entry.subject {
                    match (&entry.call, subject.plant) {
                        (RemoteCall::CreatePlant { .. }, PlantKey::Pending(pending)) => {
                            self.confirm_plant(pending, &reply, out_events);
                        }
                        _ => self.merge_plant(subject, &reply, out_events),
                    }
                }
                if let Some(balance) = reply.new_balance {
                    self.set_money(balance, out_events);
                }
            }
            RemoteReply::Plants(records) => self.overlay_plants(&records, out_events),
        }
    }

    fn merge_account(&mut self, reply: &AccountReply, out_events: &mut Vec<Event>) {
        if let Some(money) = reply.money {
            self.set_money(money, out_events);
        }
        if let Some(plant_limit) = reply.plant_limit {
            if plant_limit != self.account.plant_limit {
                self.account.plant_limit = plant_limit;
                out_events.push(Event::PlantLimitChanged { plant_limit });
            }
        }
        if let Some(weather) = reply.weather {
            if weather != self.account.weather {
                self.account.weather = weather;
                out_events.push(Event::WeatherChanged { weather });
            }
        }
    }

    fn merge_plant(&mut self, subject: Subject, reply: &PlantReply, out_events: &mut Vec<Event>) {
        let Some(plant) = self.plants.get_mut(&subject.plant) else {
            return;
        };
        if let Some(stage) = plant.merge_reply(reply, subject.issued_at, self.economy.rules()) {
            out_events.push(Event::StageAdvanced {
                plant: subject.plant,
                stage,
            });
        }
    }

    fn confirm_plant(&mut self, pending: PendingId, reply: &PlantReply, out_events: &mut Vec<Event>) {
        let pending_key = PlantKey::Pending(pending);
        let Some(plant_id) = reply.plant_id else {
            warn!(pending = pending.get(), "create reply carried no plant id");
            let subject = Subject {
                plant: pending_key,
                issued_at: Stage::Seed,
            };
            self.merge_plant(subject, reply, out_events);
            return;
        };
        let Some(mut plant) = self.plants.remove(&pending_key) else {
            return;
        };

        let key = PlantKey::Confirmed(plant_id);
        let rules = self.economy.rules();
        let advanced = match self.plants.get_mut(&key) {
            Some(existing) => {
                let issued_at = existing.stage;
                existing.merge_reply(reply, issued_at, rules)
            }
            None => {
                let advanced = plant.merge_reply(reply, Stage::Seed, rules);
                let _ = self.plants.insert(key, plant);
                advanced
            }
        };
        if let Some(attachment) = self
            .attachment
            .as_mut()
            .filter(|attachment| attachment.plant == pending_key)
        {
            attachment.plant = key;
        }

        out_events.push(Event::PlantConfirmed {
            pending,
            plant: plant_id,
        });
        if let Some(stage) = advanced {
            out_events.push(Event::StageAdvanced { plant: key, stage });
        }
    }

    fn overlay_plants(&mut self, records: &[PlantRecord], out_events: &mut Vec<Event>) {
        let viewport = self.placement.layout().viewport;
        let mut seen = BTreeSet::new();

        for record in records {
            let key = PlantKey::Confirmed(record.plant_id);
            let _ = seen.insert(key);
            match self.plants.get_mut(&key) {
                Some(plant) => {
                    if let Some(stage) = plant.overlay(record) {
                        out_events.push(Event::StageAdvanced { plant: key, stage });
                    }
                }
                None => {
                    let position = viewport.to_screen(Position::new(record.x, record.y));
                    let _ = self.plants.insert(key, Plant::from_record(record, position));
                }
            }
        }

        let stale: Vec<PlantKey> = self
            .plants
            .keys()
            .copied()
            .filter(|key| !key.is_pending() && !seen.contains(key))
            .collect();
        for key in stale {
            let _ = self.plants.remove(&key);
            self.detach_if(key);
            out_events.push(Event::PlantRemoved { plant: key });
        }

        info!(plants = self.plants.len(), "garden resynced");
        out_events.push(Event::Resynced {
            plants: self.plants.len(),
        });
    }

    fn roll_back(&mut self, undo: Undo, out_events: &mut Vec<Event>) {
        match undo {
            Undo::Nothing => {}
            Undo::RemovePlant { plant, refund } => {
                if self.plants.remove(&plant).is_some() {
                    self.detach_if(plant);
                    out_events.push(Event::PlantRemoved { plant });
                }
                self.credit(refund, out_events);
            }
            Undo::RestorePlant {
                plant,
                lifecycle,
                refund,
            } => {
                if let Some(state) = self.plants.get_mut(&plant) {
                    if !state.restore(lifecycle) {
                        debug!(
                            stage = ?state.stage,
                            "plant advanced since the failed action, lifecycle kept"
                        );
                    }
                }
                self.credit(refund, out_events);
            }
            Undo::RestorePosition { plant, origin } => {
                if let Some(state) = self.plants.get_mut(&plant) {
                    state.position = origin;
                    out_events.push(Event::PlantReturned {
                        plant,
                        position: origin,
                    });
                }
            }
            Undo::RevertUpgrade { refund, increment } => {
                self.account.plant_limit = self.account.plant_limit.saturating_sub(increment);
                out_events.push(Event::PlantLimitChanged {
                    plant_limit: self.account.plant_limit,
                });
                self.credit(refund, out_events);
            }
        }
    }
}

fn ensure_funds(account: &Account, price: u64) -> Result<(), Rejection> {
    if account.money < price {
        return Err(Rejection::InsufficientFunds {
            needed: price,
            available: account.money,
        });
    }
    Ok(())
}

/// Applies the provided command to the garden, mutating state deterministically.
///
/// Rejected actions change nothing and are reported through
/// [`Event::ActionRejected`]; an illegal drop still returns the plant to its
/// pick-up origin before the rejection is reported.
pub fn apply(garden: &mut Garden, command: Command, out_events: &mut Vec<Event>) {
    let action = command.action();
    let result = match command {
        Command::PlaceSeed {
            plant_type,
            position,
        } => garden.place_seed(plant_type, position, out_events),
        Command::PickUp { plant } => garden.pick_up(plant, out_events),
        Command::MoveAttached { position } => garden.move_attached(position, out_events),
        Command::DropAttached => garden.drop_attached(out_events),
        Command::Sell => garden.sell(out_events),
        Command::ApplyWater { plant } => garden.apply_water(plant, out_events),
        Command::ApplyFertilizer { plant } => garden.apply_fertilizer(plant, out_events),
        Command::UpgradePlantLimit => garden.upgrade_plant_limit(out_events),
        Command::StartWorkSession => garden.start_work_session(out_events),
        Command::Tick { dt } => {
            garden.tick(dt, out_events);
            Ok(())
        }
        Command::ClaimWorkReward => garden.claim_work_reward(out_events),
        Command::ClaimBreakReward => garden.claim_break_reward(out_events),
        Command::ExitSession => garden.exit_session(out_events),
        Command::Resync => {
            garden.resync(out_events);
            Ok(())
        }
        Command::Resolve { ticket, outcome } => {
            garden.resolve(ticket, outcome, out_events);
            Ok(())
        }
    };

    if let (Err(reason), Some(action)) = (result, action) {
        debug!(?action, %reason, "action rejected");
        out_events.push(Event::ActionRejected { action, reason });
    }
}

/// Query functions that provide read-only access to the garden state.
pub mod query {
    use pomo_patch_core::{
        Account, EconomyRules, GardenLayout, PlantFootprint, PlantKey, PlantSnapshot,
        SessionSnapshot, Ticket, Weather,
    };

    use super::{Attachment, Garden};

    /// Captures every plant in deterministic key order, pending plants first.
    #[must_use]
    pub fn plants(garden: &Garden) -> Vec<PlantSnapshot> {
        garden
            .plants
            .iter()
            .map(|(key, plant)| plant.snapshot(*key))
            .collect()
    }

    /// Captures a single plant, if it exists.
    #[must_use]
    pub fn plant(garden: &Garden, key: PlantKey) -> Option<PlantSnapshot> {
        garden.plants.get(&key).map(|plant| plant.snapshot(key))
    }

    /// Number of plants in the garden, pending plants included.
    #[must_use]
    pub fn plant_count(garden: &Garden) -> usize {
        garden.plants.len()
    }

    /// Positions of every plant as seen by placement validation.
    #[must_use]
    pub fn footprints(garden: &Garden) -> Vec<PlantFootprint> {
        garden.footprints()
    }

    /// Wallet, capacity and weather.
    #[must_use]
    pub fn account(garden: &Garden) -> Account {
        garden.account
    }

    /// Current currency balance.
    #[must_use]
    pub fn money(garden: &Garden) -> u64 {
        garden.account.money
    }

    /// Current plant limit.
    #[must_use]
    pub fn plant_limit(garden: &Garden) -> u32 {
        garden.account.plant_limit
    }

    /// Weather currently in effect.
    #[must_use]
    pub fn weather(garden: &Garden) -> Weather {
        garden.account.weather
    }

    /// Read-only view of the work/break countdown.
    #[must_use]
    pub fn session(garden: &Garden) -> SessionSnapshot {
        garden.session.snapshot()
    }

    /// Plant currently attached to the cursor.
    #[must_use]
    pub fn attached(garden: &Garden) -> Option<Attachment> {
        garden.attachment
    }

    /// Tickets of remote calls that have not been resolved yet, in issue order.
    #[must_use]
    pub fn pending_tickets(garden: &Garden) -> Vec<Ticket> {
        garden.journal.tickets().collect()
    }

    /// Income multiplier contributed by the confirmed plants.
    #[must_use]
    pub fn income_multiplier(garden: &Garden) -> f64 {
        garden.income_multiplier()
    }

    /// Price of the next capacity upgrade.
    #[must_use]
    pub fn plant_limit_upgrade_cost(garden: &Garden) -> u64 {
        garden
            .economy
            .plant_limit_upgrade_cost(garden.account.plant_limit)
    }

    /// Economy rules the garden plays by.
    #[must_use]
    pub fn rules(garden: &Garden) -> &EconomyRules {
        garden.economy.rules()
    }

    /// Screen layout the garden validates against.
    #[must_use]
    pub fn layout(garden: &Garden) -> &GardenLayout {
        garden.placement.layout()
    }
}
