//! Tunable rules of the garden economy, the work/break timer and the screen layout.
//!
//! Every structure deserialises from configuration with per-field defaults so a
//! partial configuration file only overrides what it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Position, Rarity, Stage};

/// Prices, growth durations and reward amounts of the garden economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    /// Price of a seed packet of any type.
    pub seed_price: u64,
    /// Price of one watering.
    pub water_price: u64,
    /// Price of one fertilizer dose.
    pub fertilizer_price: u64,
    /// Growth time a watered seed needs before becoming a seedling.
    pub seed_growth_time: u32,
    /// Growth time a fully fertilized seedling needs, indexed by rarity.
    pub seedling_growth_times: [u32; 3],
    /// Fertilizer doses a new seedling requires, indexed by rarity.
    pub fertilizer_required: [u32; 3],
    /// Sell price of a common seedling; mature plants sell for double.
    pub sell_base_price: u64,
    /// Sell price multiplier indexed by rarity.
    pub rarity_sell_multipliers: [u64; 3],
    /// Income bonus in percent contributed by a seedling, indexed by rarity.
    /// Mature plants contribute double.
    pub income_bonus_percent: [f64; 3],
    /// Plant limit of a fresh account.
    pub base_plant_limit: u32,
    /// Capacity added by one upgrade.
    pub plant_limit_increment: u32,
    /// Price of the first capacity upgrade.
    pub plant_limit_base_cost: f64,
    /// Growth factor applied to the upgrade price per purchased upgrade.
    pub plant_limit_cost_multiplier: f64,
    /// Reward granted for a completed work session before multipliers.
    pub work_reward: RewardBase,
    /// Reward granted for a completed break before multipliers.
    pub break_reward: RewardBase,
    /// Factor applied to every part of a long break's reward.
    pub long_break_multiplier: u32,
    /// Coin multiplier in effect while the weather is sunny.
    pub sunny_income_multiplier: f64,
    /// Growth multiplier in effect while the weather is rainy.
    pub rainy_growth_multiplier: f64,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            seed_price: 100,
            water_price: 25,
            fertilizer_price: 25,
            seed_growth_time: 30,
            seedling_growth_times: [60, 120, 360],
            fertilizer_required: [1, 2, 3],
            sell_base_price: 50,
            rarity_sell_multipliers: [1, 2, 3],
            income_bonus_percent: [1.0, 2.0, 3.0],
            base_plant_limit: 25,
            plant_limit_increment: 25,
            plant_limit_base_cost: 1_000.0,
            plant_limit_cost_multiplier: 1.1,
            work_reward: RewardBase {
                coins: 50,
                growth: 60,
                particles: 12,
            },
            break_reward: RewardBase {
                coins: 10,
                growth: 15,
                particles: 4,
            },
            long_break_multiplier: 3,
            sunny_income_multiplier: 1.5,
            rainy_growth_multiplier: 1.5,
        }
    }
}

impl EconomyRules {
    /// Growth time a seedling of the provided rarity needs once fertilized.
    #[must_use]
    pub fn seedling_growth_time(&self, rarity: Rarity) -> u32 {
        self.seedling_growth_times[rarity.ordinal()]
    }

    /// Fertilizer doses a seedling of the provided rarity requires.
    #[must_use]
    pub fn fertilizer_required_for(&self, rarity: Rarity) -> u32 {
        self.fertilizer_required[rarity.ordinal()]
    }

    /// Base sell price of a plant at the provided stage, before rarity.
    #[must_use]
    pub fn stage_base_price(&self, stage: Stage) -> u64 {
        match stage {
            Stage::Seed => 0,
            Stage::Seedling => self.sell_base_price,
            Stage::Mature => self.sell_base_price.saturating_mul(2),
        }
    }
}

/// Unscaled amounts of a session reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBase {
    /// Coins before income and weather multipliers.
    pub coins: u64,
    /// Growth time before the weather multiplier.
    pub growth: u32,
    /// Feedback particles.
    pub particles: u32,
}

/// Durations of the work/break countdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRules {
    /// Length of a work countdown in seconds.
    pub work_secs: u64,
    /// Length of a regular break in seconds.
    pub short_break_secs: u64,
    /// Length of a long break in seconds.
    pub long_break_secs: u64,
    /// Every n-th break is a long break.
    pub long_break_every: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_every: 4,
        }
    }
}

impl SessionRules {
    /// Length of a work countdown.
    #[must_use]
    pub const fn work_duration(&self) -> Duration {
        Duration::from_secs(self.work_secs)
    }

    /// Reports whether the break with the provided ordinal is a long break.
    #[must_use]
    pub const fn is_long_break(&self, ordinal: u32) -> bool {
        self.long_break_every != 0 && ordinal != 0 && ordinal % self.long_break_every == 0
    }

    /// Length of the break with the provided ordinal.
    #[must_use]
    pub const fn break_duration(&self, ordinal: u32) -> Duration {
        if self.is_long_break(ordinal) {
            Duration::from_secs(self.long_break_secs)
        } else {
            Duration::from_secs(self.short_break_secs)
        }
    }
}

/// Size of the visible garden in screen units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width of the viewport.
    pub width: f32,
    /// Height of the viewport.
    pub height: f32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Visual centre of the viewport; the origin of service coordinates.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Translates a screen position into service coordinates.
    #[must_use]
    pub fn to_server(&self, screen: Position) -> Position {
        let center = self.center();
        Position::new(screen.x - center.x, screen.y - center.y)
    }

    /// Translates service coordinates into a screen position.
    #[must_use]
    pub fn to_screen(&self, server: Position) -> Position {
        let center = self.center();
        Position::new(server.x + center.x, server.y + center.y)
    }
}

/// Axis-aligned rectangle in screen units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Upper-left corner of the rectangle.
    pub origin: Position,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl ScreenRect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(origin: Position, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.height
    }
}

/// Screen layout constraints used by placement and selling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenLayout {
    /// Visible garden area.
    pub viewport: Viewport,
    /// Height of the interface band along the top edge.
    pub top_band: f32,
    /// Height of the interface band along the bottom edge.
    pub bottom_band: f32,
    /// Two plants collide when both axis distances are below this threshold.
    pub collision_threshold: f32,
    /// Area a dragged plant must hover to be sold.
    pub sell_zone: ScreenRect,
}

impl Default for GardenLayout {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1_280.0, 720.0),
            top_band: 96.0,
            bottom_band: 128.0,
            collision_threshold: 30.0,
            sell_zone: ScreenRect::new(Position::new(1_120.0, 592.0), 160.0, 128.0),
        }
    }
}
