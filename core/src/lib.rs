#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pomo Patch garden.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative local garden, and pure systems. Adapters submit [`Command`]
//! values describing player actions, the garden executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Remote calls against the economy service are announced through
//! [`Event::RemoteCallIssued`] and settled by feeding [`Command::Resolve`]
//! back into the garden.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

pub mod rules;
pub mod wire;

pub use rules::{EconomyRules, GardenLayout, ScreenRect, SessionRules, Viewport};
pub use wire::{
    CallOutcome, EconomyService, PlantRecord, RemoteCall, RemoteReply, ServiceError,
};

/// Commands that express all permissible garden mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Buys a seed packet and plants it at the provided screen position.
    PlaceSeed {
        /// Kind of plant the seed grows into.
        plant_type: PlantType,
        /// Screen position the seed is dropped at.
        position: Position,
    },
    /// Attaches an existing plant to the cursor.
    PickUp {
        /// Plant that should follow the cursor.
        plant: PlantKey,
    },
    /// Drags the attached plant to a new screen position without committing it.
    MoveAttached {
        /// Current cursor position.
        position: Position,
    },
    /// Releases the attached plant at its current drag position.
    DropAttached,
    /// Sells the attached plant when it hovers the sell zone.
    Sell,
    /// Waters a freshly planted seed so it starts growing.
    ApplyWater {
        /// Plant receiving the water.
        plant: PlantKey,
    },
    /// Applies one fertilizer dose to a seedling.
    ApplyFertilizer {
        /// Plant receiving the fertilizer.
        plant: PlantKey,
    },
    /// Buys additional garden capacity.
    UpgradePlantLimit,
    /// Starts a work countdown.
    StartWorkSession,
    /// Advances the work/break countdown by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Claims the reward of a completed work session.
    ClaimWorkReward,
    /// Claims the reward of a completed break.
    ClaimBreakReward,
    /// Abandons the current work or break countdown without a reward.
    ExitSession,
    /// Requests a full refresh of the account and plant list from the service.
    Resync,
    /// Delivers the completion of a previously issued remote call.
    Resolve {
        /// Ticket allocated when the call was issued.
        ticket: Ticket,
        /// Authoritative reply or the failure that ended the call.
        outcome: CallOutcome,
    },
}

impl Command {
    /// Player-facing action represented by the command, if any.
    #[must_use]
    pub const fn action(&self) -> Option<ActionKind> {
        match self {
            Self::PlaceSeed { .. } => Some(ActionKind::PlaceSeed),
            Self::PickUp { .. } => Some(ActionKind::PickUp),
            Self::MoveAttached { .. } => Some(ActionKind::MoveAttached),
            Self::DropAttached => Some(ActionKind::DropAttached),
            Self::Sell => Some(ActionKind::Sell),
            Self::ApplyWater { .. } => Some(ActionKind::ApplyWater),
            Self::ApplyFertilizer { .. } => Some(ActionKind::ApplyFertilizer),
            Self::UpgradePlantLimit => Some(ActionKind::UpgradePlantLimit),
            Self::StartWorkSession => Some(ActionKind::StartWorkSession),
            Self::ClaimWorkReward => Some(ActionKind::ClaimWorkReward),
            Self::ClaimBreakReward => Some(ActionKind::ClaimBreakReward),
            Self::ExitSession => Some(ActionKind::ExitSession),
            Self::Tick { .. } | Self::Resync | Self::Resolve { .. } => None,
        }
    }
}

/// Events broadcast by the garden after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a seed was planted locally and awaits the service.
    SeedPlanted {
        /// Temporary key assigned to the pending plant.
        plant: PlantKey,
        /// Kind of plant that was planted.
        plant_type: PlantType,
        /// Screen position of the new plant.
        position: Position,
    },
    /// Announces that the service assigned a permanent identifier to a pending plant.
    PlantConfirmed {
        /// Temporary identifier the plant carried until now.
        pending: PendingId,
        /// Identifier assigned by the service.
        plant: PlantId,
    },
    /// Confirms that a plant is now attached to the cursor.
    PlantPickedUp {
        /// Plant that was attached.
        plant: PlantKey,
    },
    /// Confirms that the attached plant followed the cursor.
    PlantDragged {
        /// Plant being dragged.
        plant: PlantKey,
        /// Current drag position.
        position: Position,
    },
    /// Confirms that a plant was released at a new position.
    PlantMoved {
        /// Plant that moved.
        plant: PlantKey,
        /// Committed screen position.
        position: Position,
    },
    /// Reports that a plant returned to an earlier position.
    PlantReturned {
        /// Plant that was put back.
        plant: PlantKey,
        /// Restored screen position.
        position: Position,
    },
    /// Confirms that water started a seed's growth timer.
    PlantWatered {
        /// Plant that was watered.
        plant: PlantKey,
        /// Growth time now remaining.
        growth_time_remaining: u32,
    },
    /// Confirms that fertilizer was applied to a seedling.
    PlantFertilized {
        /// Plant that was fertilized.
        plant: PlantKey,
        /// Doses still required before growth starts.
        fertilizer_remaining: Option<u32>,
        /// Growth timer started by the final dose, if any.
        growth_time_remaining: Option<u32>,
    },
    /// Reports growth time credited to a plant.
    PlantGrew {
        /// Plant that grew.
        plant: PlantKey,
        /// Growth time now remaining, `None` once the stage completed.
        growth_time_remaining: Option<u32>,
    },
    /// Announces that a plant reached a new lifecycle stage.
    StageAdvanced {
        /// Plant that advanced.
        plant: PlantKey,
        /// Stage the plant entered.
        stage: Stage,
    },
    /// Confirms that a plant was sold and removed from the garden.
    PlantSold {
        /// Plant that was sold.
        plant: PlantId,
        /// Currency credited for the sale.
        payout: u64,
    },
    /// Reports that a plant disappeared from the garden without a sale.
    PlantRemoved {
        /// Plant that was removed.
        plant: PlantKey,
    },
    /// Reports the wallet balance after it changed.
    BalanceChanged {
        /// New currency balance.
        money: u64,
    },
    /// Reports the garden capacity after it changed.
    PlantLimitChanged {
        /// New maximum plant count.
        plant_limit: u32,
    },
    /// Reports the weather after it changed.
    WeatherChanged {
        /// Weather now in effect.
        weather: Weather,
    },
    /// Announces that a work or break countdown started.
    SessionStarted {
        /// Mode of the countdown.
        mode: SessionMode,
        /// Full length of the countdown.
        duration: Duration,
        /// Indicates whether a break is a long break.
        long_break: bool,
    },
    /// Announces that a countdown reached zero and its reward can be claimed.
    SessionCompleted {
        /// Mode of the countdown that completed.
        mode: SessionMode,
    },
    /// Announces that the player abandoned the running countdown.
    SessionExited {
        /// Mode that was abandoned.
        mode: SessionMode,
    },
    /// Confirms that a work or break reward was granted.
    RewardGranted {
        /// Mode whose reward was claimed.
        mode: SessionMode,
        /// Amounts credited by the reward.
        reward: Reward,
    },
    /// Reports that an action failed validation and changed nothing.
    ActionRejected {
        /// Action that was rejected.
        action: ActionKind,
        /// Specific reason the action failed.
        reason: Rejection,
    },
    /// Announces a remote call that must be executed against the economy service.
    RemoteCallIssued {
        /// Ticket that resolves the call.
        ticket: Ticket,
        /// Call to execute.
        call: RemoteCall,
    },
    /// Confirms that a remote call succeeded and its reply was merged.
    RemoteCallSettled {
        /// Ticket of the settled call.
        ticket: Ticket,
    },
    /// Reports that a remote call failed; the failure cue for the player.
    RemoteCallFailed {
        /// Ticket of the failed call.
        ticket: Ticket,
        /// Error that ended the call.
        error: ServiceError,
        /// Indicates whether the optimistic mutation was reverted.
        rolled_back: bool,
    },
    /// Reports that an authoritative plant list was overlaid onto the garden.
    Resynced {
        /// Number of plants in the garden after the overlay.
        plants: usize,
    },
}

/// Player-facing actions used to attribute rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Planting a seed.
    PlaceSeed,
    /// Attaching a plant to the cursor.
    PickUp,
    /// Dragging the attached plant.
    MoveAttached,
    /// Releasing the attached plant.
    DropAttached,
    /// Selling the attached plant.
    Sell,
    /// Watering a seed.
    ApplyWater,
    /// Fertilizing a seedling.
    ApplyFertilizer,
    /// Buying additional capacity.
    UpgradePlantLimit,
    /// Starting a work countdown.
    StartWorkSession,
    /// Claiming a work reward.
    ClaimWorkReward,
    /// Claiming a break reward.
    ClaimBreakReward,
    /// Abandoning a countdown.
    ExitSession,
}

/// Reasons an action may be rejected before any mutation or remote call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The wallet cannot cover the price of the action.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the action.
        needed: u64,
        /// Balance at the time of the action.
        available: u64,
    },
    /// The candidate position is not a legal plant location.
    #[error("illegal placement: {check}")]
    IllegalPlacement {
        /// Outcome of the placement validation.
        check: PlacementCheck,
    },
    /// No plant with the provided key exists.
    #[error("plant does not exist")]
    MissingPlant,
    /// The plant has not been confirmed by the service yet.
    #[error("plant is still waiting for the service")]
    PendingPlant,
    /// The plant is not at the stage the action requires.
    #[error("plant is at the wrong stage ({stage:?})")]
    WrongStage {
        /// Stage the plant is at.
        stage: Stage,
    },
    /// The plant is already counting down a growth timer.
    #[error("plant is already growing")]
    AlreadyGrowing,
    /// The plant requires no further fertilizer.
    #[error("plant does not need fertilizer")]
    FertilizerNotNeeded,
    /// No plant is attached to the cursor.
    #[error("no plant is attached")]
    NothingAttached,
    /// Another plant is already attached to the cursor.
    #[error("a plant is already attached")]
    AlreadyAttached,
    /// The attached plant is not hovering the sell zone.
    #[error("plant is not over the sell zone")]
    NotOverSellZone,
    /// A countdown is already active.
    #[error("a {mode:?} session is already active")]
    SessionActive {
        /// Mode of the active countdown.
        mode: SessionMode,
    },
    /// The countdown has not completed or is in another mode.
    #[error("no completed {expected:?} session to claim")]
    SessionIncomplete {
        /// Mode whose completion the action requires.
        expected: SessionMode,
    },
    /// No countdown is active.
    #[error("no session is active")]
    NoActiveSession,
}

/// Kind of plant a seed grows into. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantType {
    /// Berry bushes.
    Berry,
    /// Mushrooms.
    Fungi,
    /// Roses.
    Rose,
}

impl PlantType {
    /// Every plant type in catalog order.
    pub const ALL: [Self; 3] = [Self::Berry, Self::Fungi, Self::Rose];

    /// Wire name of the plant type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Berry => "berry",
            Self::Fungi => "fungi",
            Self::Rose => "rose",
        }
    }

    /// Parses a wire name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PlantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal rarity tier assigned by the service when a plant is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rarity {
    /// Tier 0.
    Common,
    /// Tier 1, also shown as epic.
    Rare,
    /// Tier 2.
    Legendary,
}

impl Rarity {
    /// Every tier in ascending order.
    pub const ALL: [Self; 3] = [Self::Common, Self::Rare, Self::Legendary];

    /// Zero-based ordinal of the tier, usable as a table index.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Legendary => 2,
        }
    }
}

impl TryFrom<u8> for Rarity {
    type Error = OrdinalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Common),
            1 => Ok(Self::Rare),
            2 => Ok(Self::Legendary),
            other => Err(OrdinalError {
                kind: "rarity",
                value: other,
            }),
        }
    }
}

impl From<Rarity> for u8 {
    fn from(rarity: Rarity) -> Self {
        rarity.ordinal() as u8
    }
}

/// Lifecycle stage of a plant. Stages never decrease.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stage {
    /// Freshly planted seed or sprout.
    Seed,
    /// Seedling waiting for fertilizer or growing toward maturity.
    Seedling,
    /// Fully grown plant. Terminal.
    Mature,
}

impl Stage {
    /// Zero-based ordinal of the stage.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Seed => 0,
            Self::Seedling => 1,
            Self::Mature => 2,
        }
    }

    /// Stage that follows this one, or `None` for the terminal stage.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Seed => Some(Self::Seedling),
            Self::Seedling => Some(Self::Mature),
            Self::Mature => None,
        }
    }
}

impl TryFrom<u8> for Stage {
    type Error = OrdinalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Seed),
            1 => Ok(Self::Seedling),
            2 => Ok(Self::Mature),
            other => Err(OrdinalError {
                kind: "stage",
                value: other,
            }),
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.ordinal()
    }
}

/// Weather condition of the garden, cycled by claiming work rewards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weather {
    /// Neutral weather.
    #[default]
    Cloudy,
    /// Boosts growth time granted by rewards.
    Rainy,
    /// Boosts coins granted by rewards.
    Sunny,
}

impl Weather {
    /// Weather that follows this one in the fixed three-step cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Cloudy => Self::Rainy,
            Self::Rainy => Self::Sunny,
            Self::Sunny => Self::Cloudy,
        }
    }
}

impl TryFrom<u8> for Weather {
    type Error = OrdinalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Cloudy),
            1 => Ok(Self::Rainy),
            2 => Ok(Self::Sunny),
            other => Err(OrdinalError {
                kind: "weather",
                value: other,
            }),
        }
    }
}

impl From<Weather> for u8 {
    fn from(weather: Weather) -> Self {
        match weather {
            Weather::Cloudy => 0,
            Weather::Rainy => 1,
            Weather::Sunny => 2,
        }
    }
}

/// Error raised when an ordinal does not name a known tier, stage or weather.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{value} is not a valid {kind} ordinal")]
pub struct OrdinalError {
    kind: &'static str,
    value: u8,
}

/// Identifier assigned to a plant by the economy service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(u64);

impl PlantId {
    /// Creates a new plant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Temporary identifier of a plant the service has not confirmed yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(u32);

impl PendingId {
    /// Creates a new pending identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Key of a plant inside the local garden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlantKey {
    /// Plant created locally and still awaiting its service identifier.
    Pending(PendingId),
    /// Plant known to the service.
    Confirmed(PlantId),
}

impl PlantKey {
    /// Service identifier of the plant, if it has one.
    #[must_use]
    pub const fn confirmed(self) -> Option<PlantId> {
        match self {
            Self::Confirmed(id) => Some(id),
            Self::Pending(_) => None,
        }
    }

    /// Reports whether the plant still awaits confirmation.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl From<PlantId> for PlantKey {
    fn from(id: PlantId) -> Self {
        Self::Confirmed(id)
    }
}

/// Identifier of a single issued remote call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Creates a new ticket with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the ticket.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Point in the garden expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, increasing downwards.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Outcome of validating a candidate plant position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlacementCheck {
    /// Another plant lies within the collision threshold.
    pub collision: bool,
    /// The position falls inside a band reserved for the interface.
    pub in_restricted_zone: bool,
    /// The garden already holds as many plants as its limit allows.
    pub over_capacity: bool,
}

impl PlacementCheck {
    /// A placement is legal iff none of the flags is raised.
    #[must_use]
    pub const fn is_legal(&self) -> bool {
        !(self.collision || self.in_restricted_zone || self.over_capacity)
    }
}

impl fmt::Display for PlacementCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reasons = Vec::new();
        if self.collision {
            reasons.push("collision");
        }
        if self.in_restricted_zone {
            reasons.push("restricted zone");
        }
        if self.over_capacity {
            reasons.push("over capacity");
        }
        if reasons.is_empty() {
            f.write_str("legal")
        } else {
            f.write_str(&reasons.join(", "))
        }
    }
}

/// Position of a plant considered by placement validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantFootprint {
    /// Plant occupying the position.
    pub plant: PlantKey,
    /// Screen position of the plant.
    pub position: Position,
}

/// Immutable representation of a single plant's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantSnapshot {
    /// Local key of the plant.
    pub key: PlantKey,
    /// Kind of plant.
    pub plant_type: PlantType,
    /// Variety rolled by the service, unknown while pending.
    pub species: Option<String>,
    /// Rarity rolled by the service, unknown while pending.
    pub rarity: Option<Rarity>,
    /// Display size rolled by the service, unknown while pending.
    pub size: Option<f32>,
    /// Current lifecycle stage.
    pub stage: Stage,
    /// Screen position of the plant.
    pub position: Position,
    /// Growth time left before the next stage; `None` while not growing.
    pub growth_time_remaining: Option<u32>,
    /// Fertilizer doses still required at the seedling stage.
    pub fertilizer_remaining: Option<u32>,
}

/// Wallet, capacity and weather of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    /// Currency balance.
    pub money: u64,
    /// Maximum number of plants the garden may hold.
    pub plant_limit: u32,
    /// Weather currently in effect.
    pub weather: Weather,
}

/// Mode of the work/break countdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// No countdown is active.
    #[default]
    Idle,
    /// Focused work countdown.
    Work,
    /// Break countdown following a claimed work reward.
    Break,
}

/// Read-only view of the work/break countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Active mode.
    pub mode: SessionMode,
    /// Time left on the countdown.
    pub time_remaining: Duration,
    /// Indicates whether the countdown is ticking.
    pub running: bool,
    /// Number of work rewards claimed so far; the ordinal of the latest break.
    pub cycle: u32,
}

/// Amounts granted when a work or break reward is claimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reward {
    /// Currency credited to the wallet.
    pub coins: u64,
    /// Growth time credited to every growing plant.
    pub growth: u32,
    /// Amount of celebratory feedback the presentation layer should show.
    pub particles: u32,
}
