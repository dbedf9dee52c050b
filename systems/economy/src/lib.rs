#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pricing, income and reward formulas of the garden economy.

use pomo_patch_core::{EconomyRules, PlantType, Rarity, Reward, Stage, Weather};

/// Pure calculator evaluating the economy formulas for a rule set.
#[derive(Clone, Debug, Default)]
pub struct EconomyCalculator {
    rules: EconomyRules,
}

impl EconomyCalculator {
    /// Creates a calculator for the provided rules.
    #[must_use]
    pub fn new(rules: EconomyRules) -> Self {
        Self { rules }
    }

    /// Rules the calculator evaluates.
    #[must_use]
    pub fn rules(&self) -> &EconomyRules {
        &self.rules
    }

    /// Price of a seed packet. Every plant type costs the same.
    #[must_use]
    pub fn seed_price(&self, _plant_type: PlantType) -> u64 {
        self.rules.seed_price
    }

    /// Price of one watering.
    #[must_use]
    pub fn water_price(&self) -> u64 {
        self.rules.water_price
    }

    /// Price of one fertilizer dose.
    #[must_use]
    pub fn fertilizer_price(&self) -> u64 {
        self.rules.fertilizer_price
    }

    /// Payout for selling a plant: `basePrice(stage) * rarityMultiplier(rarity)`.
    #[must_use]
    pub fn sell_price(&self, stage: Stage, rarity: Rarity) -> u64 {
        self.rules
            .stage_base_price(stage)
            .saturating_mul(self.rules.rarity_sell_multipliers[rarity.ordinal()])
    }

    /// Income multiplier contributed by the owned plants.
    ///
    /// Starts at 1.0; every plant at stage 1 or above adds its rarity's
    /// percentage, doubled at stage 2.
    #[must_use]
    pub fn income_multiplier<I>(&self, plants: I) -> f64
    where
        I: IntoIterator<Item = (Stage, Rarity)>,
    {
        let bonus_percent: f64 = plants
            .into_iter()
            .map(|(stage, rarity)| {
                let percent = self.rules.income_bonus_percent[rarity.ordinal()];
                match stage {
                    Stage::Seed => 0.0,
                    Stage::Seedling => percent,
                    Stage::Mature => percent * 2.0,
                }
            })
            .sum();
        1.0 + bonus_percent / 100.0
    }

    /// Number of capacity upgrades already bought for the provided limit.
    #[must_use]
    pub fn plant_limit_level(&self, plant_limit: u32) -> u32 {
        if self.rules.plant_limit_increment == 0 {
            return 0;
        }
        plant_limit.saturating_sub(self.rules.base_plant_limit) / self.rules.plant_limit_increment
    }

    /// Price of the upgrade at the provided level, rounded to the nearest hundred.
    #[must_use]
    pub fn upgrade_cost_at_level(&self, level: u32) -> u64 {
        let exponent = i32::try_from(level).unwrap_or(i32::MAX);
        let raw = self.rules.plant_limit_base_cost
            * self.rules.plant_limit_cost_multiplier.powi(exponent);
        ((raw / 100.0).round() as u64).saturating_mul(100)
    }

    /// Price of the next capacity upgrade for an account at the provided limit.
    #[must_use]
    pub fn plant_limit_upgrade_cost(&self, plant_limit: u32) -> u64 {
        self.upgrade_cost_at_level(self.plant_limit_level(plant_limit))
    }

    /// Coin multiplier the weather applies to rewards.
    #[must_use]
    pub fn weather_income_multiplier(&self, weather: Weather) -> f64 {
        match weather {
            Weather::Sunny => self.rules.sunny_income_multiplier,
            Weather::Cloudy | Weather::Rainy => 1.0,
        }
    }

    /// Growth multiplier the weather applies to rewards.
    #[must_use]
    pub fn weather_growth_multiplier(&self, weather: Weather) -> f64 {
        match weather {
            Weather::Rainy => self.rules.rainy_growth_multiplier,
            Weather::Cloudy | Weather::Sunny => 1.0,
        }
    }

    /// Reward granted for a completed work session.
    #[must_use]
    pub fn work_reward(&self, income_multiplier: f64, weather: Weather) -> Reward {
        let base = self.rules.work_reward;
        self.scaled_reward(base.coins, base.growth, base.particles, income_multiplier, weather, 1)
    }

    /// Reward granted for a completed break; long breaks multiply every part.
    #[must_use]
    pub fn break_reward(&self, income_multiplier: f64, weather: Weather, long_break: bool) -> Reward {
        let base = self.rules.break_reward;
        let factor = if long_break {
            self.rules.long_break_multiplier
        } else {
            1
        };
        self.scaled_reward(
            base.coins,
            base.growth,
            base.particles,
            income_multiplier,
            weather,
            factor,
        )
    }

    fn scaled_reward(
        &self,
        coins: u64,
        growth: u32,
        particles: u32,
        income_multiplier: f64,
        weather: Weather,
        factor: u32,
    ) -> Reward {
        let coins = (coins as f64 * income_multiplier * self.weather_income_multiplier(weather))
            .floor() as u64;
        let growth = (f64::from(growth) * self.weather_growth_multiplier(weather)).floor() as u32;
        Reward {
            coins: coins.saturating_mul(u64::from(factor)),
            growth: growth.saturating_mul(factor),
            particles: particles.saturating_mul(factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_multiplier_starts_at_one() {
        let calculator = EconomyCalculator::default();
        assert_eq!(calculator.income_multiplier(Vec::new()), 1.0);
        assert_eq!(
            calculator.income_multiplier(vec![(Stage::Seed, Rarity::Legendary)]),
            1.0
        );
    }

    #[test]
    fn level_ignores_partial_increments() {
        let calculator = EconomyCalculator::default();
        assert_eq!(calculator.plant_limit_level(25), 0);
        assert_eq!(calculator.plant_limit_level(49), 0);
        assert_eq!(calculator.plant_limit_level(50), 1);
        assert_eq!(calculator.plant_limit_level(10), 0);
    }
}
