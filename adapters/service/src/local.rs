//! In-memory authority implementing the economy service contract.

use std::collections::BTreeMap;

use pomo_patch_core::{
    wire::{Method, WireRequest, WireResponse},
    EconomyRules, PlantId, PlantRecord, PlantType, Rarity, ServiceError, Stage, Weather,
};
use pomo_patch_system_economy::EconomyCalculator;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::{EconomyClient, StaticToken, Transport};

/// Settings of the local authority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Seed of the rarity, species and size rolls.
    pub seed: u64,
    /// Balance of a newly created account.
    pub initial_money: u64,
    /// Plant limit of a newly created account.
    pub initial_plant_limit: u32,
    /// Probability of each rarity tier, common first.
    pub rarity_odds: [f64; 3],
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_ca7e,
            initial_money: 250,
            initial_plant_limit: 25,
            rarity_odds: [0.79, 0.20, 0.01],
        }
    }
}

const SIZE_MEAN: f32 = 0.5;
const SIZE_DEVIATION: f32 = 0.2;

#[derive(Clone, Debug)]
struct UserRow {
    money: u64,
    plant_limit: u32,
    weather: Weather,
}

#[derive(Clone, Debug)]
struct PlantRow {
    owner: String,
    plant_type: PlantType,
    species: &'static str,
    rarity: Rarity,
    size: f32,
    x: f32,
    y: f32,
    stage: Stage,
    growth_time_remaining: Option<u32>,
    fertilizer_remaining: Option<u32>,
}

#[derive(Debug)]
struct Reject {
    status: u16,
    detail: String,
}

impl Reject {
    fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(404, "Not found")
    }
}

type Handled = Result<(u16, Value), Reject>;

fn species_pool(plant_type: PlantType, rarity: Rarity) -> &'static [&'static str] {
    match (plant_type, rarity) {
        (PlantType::Berry, Rarity::Common) => &["blueberry"],
        (PlantType::Berry, Rarity::Rare) => &["strawberry"],
        (PlantType::Berry, Rarity::Legendary) => &["ancient_fruit"],
        (PlantType::Fungi, Rarity::Common) => &["brown_mushroom"],
        (PlantType::Fungi, Rarity::Rare) => &["red_mushroom"],
        (PlantType::Fungi, Rarity::Legendary) => &["mario_mushroom"],
        (PlantType::Rose, Rarity::Common) => &["red_rose"],
        (PlantType::Rose, Rarity::Rare) => &["pink_rose", "white_rose"],
        (PlantType::Rose, Rarity::Legendary) => &["withered_rose"],
    }
}

fn body_f32(body: Option<&Value>, field: &str) -> Result<f32, Reject> {
    body.and_then(|body| body.get(field))
        .and_then(Value::as_f64)
        .map(|value| value as f32)
        .ok_or_else(|| Reject::new(422, format!("{field} is required")))
}

/// In-memory economy authority with deterministic rolls and failure injection.
#[derive(Debug)]
pub struct LocalEconomy {
    config: LocalConfig,
    economy: EconomyCalculator,
    rng: ChaCha8Rng,
    users: BTreeMap<String, UserRow>,
    plants: BTreeMap<u64, PlantRow>,
    tokens: BTreeMap<String, String>,
    next_plant_id: u64,
    offline: bool,
    failures_pending: u32,
}

impl LocalEconomy {
    /// Creates an empty authority playing by the provided rules.
    #[must_use]
    pub fn new(rules: EconomyRules, config: LocalConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            economy: EconomyCalculator::new(rules),
            users: BTreeMap::new(),
            plants: BTreeMap::new(),
            tokens: BTreeMap::new(),
            next_plant_id: 1,
            offline: false,
            failures_pending: 0,
        }
    }

    /// Issues a bearer token authenticating `email`.
    pub fn issue_token(&mut self, email: &str) -> String {
        let token = format!("local-{}-{email}", self.tokens.len());
        let _ = self.tokens.insert(token.clone(), email.to_owned());
        token
    }

    /// Consumes the authority into a client authenticated as `email`.
    #[must_use]
    pub fn into_client(mut self, email: &str) -> EconomyClient<Self, StaticToken> {
        let token = self.issue_token(email);
        EconomyClient::new(email, self, StaticToken::new(token))
    }

    /// Makes every request fail at the transport level while `offline` is set.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Fails the next `count` requests at the transport level.
    pub fn fail_next(&mut self, count: u32) {
        self.failures_pending = count;
    }

    /// Current balance of the account, if it exists.
    #[must_use]
    pub fn money(&self, email: &str) -> Option<u64> {
        self.users.get(email).map(|user| user.money)
    }

    /// Number of plants stored for the account.
    #[must_use]
    pub fn plant_count(&self, email: &str) -> usize {
        self.plants
            .values()
            .filter(|plant| plant.owner == email)
            .count()
    }

    fn route(&mut self, request: &WireRequest) -> WireResponse {
        let Some(email) = self.tokens.get(&request.bearer).cloned() else {
            return reject(&Reject::new(401, "Invalid authentication credentials"));
        };
        let segments: Vec<&str> = request
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let body = request.body.as_ref();

        let handled = match (request.method, segments.as_slice()) {
            (Method::Post, ["users"]) => self.create_user(&email, body),
            (method, ["users", owner, rest @ ..]) => {
                if *owner != email {
                    Err(Reject::new(403, "Cannot access another user's data"))
                } else {
                    self.user_route(method, &email, rest, body)
                }
            }
            _ => Err(Reject::not_found()),
        };

        match handled {
            Ok((status, value)) => WireResponse::json(status, &value),
            Err(rejection) => reject(&rejection),
        }
    }

    fn user_route(
        &mut self,
        method: Method,
        email: &str,
        rest: &[&str],
        body: Option<&Value>,
    ) -> Handled {
        match (method, rest) {
            (Method::Get, []) => self.get_user(email),
            (Method::Patch, ["money"]) => self.change_money(email, body),
            (Method::Post, ["increase-plant-limit"]) => self.increase_plant_limit(email),
            (Method::Post, ["cycle-weather"]) => self.cycle_weather(email),
            (Method::Get, ["plants"]) => self.list_plants(email),
            (Method::Post, ["plants"]) => self.create_plant(email, body),
            (method, ["plants", id, action]) => {
                let id: u64 = id
                    .parse()
                    .map_err(|_| Reject::new(422, "Invalid plant id"))?;
                match (method, *action) {
                    (Method::Patch, "position") => self.move_plant(email, id, body),
                    (Method::Patch, "apply-water") => self.apply_water(email, id),
                    (Method::Patch, "apply-fertilizer") => self.apply_fertilizer(email, id),
                    (Method::Patch, "grow") => self.grow_plant(email, id, body),
                    (Method::Delete, "sell") => self.sell_plant(email, id),
                    _ => Err(Reject::not_found()),
                }
            }
            _ => Err(Reject::not_found()),
        }
    }

    fn user_mut(&mut self, email: &str) -> Result<&mut UserRow, Reject> {
        self.users
            .get_mut(email)
            .ok_or_else(|| Reject::new(404, "User not found"))
    }

    fn plant(&self, email: &str, id: u64) -> Result<&PlantRow, Reject> {
        self.plants
            .get(&id)
            .filter(|plant| plant.owner == email)
            .ok_or_else(|| Reject::new(404, "Plant not found"))
    }

    fn charge(&mut self, email: &str, price: u64) -> Result<u64, Reject> {
        let user = self.user_mut(email)?;
        if user.money < price {
            return Err(Reject::new(
                400,
                format!("Insufficient money. Need {price}, have {}", user.money),
            ));
        }
        user.money -= price;
        Ok(user.money)
    }

    fn create_user(&mut self, email: &str, body: Option<&Value>) -> Handled {
        let requested = body
            .and_then(|body| body.get("email"))
            .and_then(Value::as_str)
            .ok_or_else(|| Reject::new(422, "email is required"))?;
        if requested != email {
            return Err(Reject::new(403, "Cannot create user with different email"));
        }
        if self.users.contains_key(email) {
            return Err(Reject::new(400, "User with this email already exists"));
        }

        let row = UserRow {
            money: self.config.initial_money,
            plant_limit: self.config.initial_plant_limit,
            weather: Weather::Cloudy,
        };
        let value = user_json(email, &row);
        let _ = self.users.insert(email.to_owned(), row);
        Ok((201, value))
    }

    fn get_user(&mut self, email: &str) -> Handled {
        let user = self.user_mut(email)?;
        Ok((200, user_json(email, user)))
    }

    fn change_money(&mut self, email: &str, body: Option<&Value>) -> Handled {
        let amount = body
            .and_then(|body| body.get("amount"))
            .and_then(Value::as_i64)
            .ok_or_else(|| Reject::new(422, "amount is required"))?;
        let user = self.user_mut(email)?;
        user.money = if amount < 0 {
            user.money
                .checked_sub(amount.unsigned_abs())
                .ok_or_else(|| Reject::new(400, "Insufficient money"))?
        } else {
            user.money.saturating_add(amount.unsigned_abs())
        };
        Ok((
            200,
            json!({ "message": "Money updated successfully", "new_balance": user.money }),
        ))
    }

    fn increase_plant_limit(&mut self, email: &str) -> Handled {
        let increment = self.economy.rules().plant_limit_increment;
        let limit = self.user_mut(email)?.plant_limit;
        let cost = self.economy.plant_limit_upgrade_cost(limit);
        let new_money = self.charge(email, cost)?;
        let user = self.user_mut(email)?;
        user.plant_limit = user.plant_limit.saturating_add(increment);
        let new_plant_limit = user.plant_limit;
        let next_upgrade_cost = self.economy.plant_limit_upgrade_cost(new_plant_limit);
        Ok((
            200,
            json!({
                "message": "Plant limit increased successfully",
                "cost_paid": cost,
                "new_money": new_money,
                "new_plant_limit": new_plant_limit,
                "next_upgrade_cost": next_upgrade_cost,
            }),
        ))
    }

    fn cycle_weather(&mut self, email: &str) -> Handled {
        let user = self.user_mut(email)?;
        let previous = user.weather;
        user.weather = previous.next();
        Ok((
            200,
            json!({
                "message": "Weather cycled successfully",
                "previous_weather": previous,
                "new_weather": user.weather,
            }),
        ))
    }

    fn list_plants(&mut self, email: &str) -> Handled {
        let _ = self.user_mut(email)?;
        let records: Vec<PlantRecord> = self
            .plants
            .iter()
            .filter(|(_, plant)| plant.owner == email)
            .map(|(id, plant)| PlantRecord {
                plant_id: PlantId::new(*id),
                plant_type: plant.plant_type,
                plant_species: Some(plant.species.to_owned()),
                rarity: Some(plant.rarity),
                size: Some(plant.size),
                x: plant.x,
                y: plant.y,
                stage: plant.stage,
                growth_time_remaining: plant.growth_time_remaining,
                fertilizer_remaining: plant.fertilizer_remaining,
            })
            .collect();
        let plants =
            serde_json::to_value(records).map_err(|error| Reject::new(500, error.to_string()))?;
        Ok((200, json!({ "plants": plants })))
    }

    fn create_plant(&mut self, email: &str, body: Option<&Value>) -> Handled {
        let plant_limit = self.user_mut(email)?.plant_limit;
        let count = self.plant_count(email);
        if count >= plant_limit as usize {
            return Err(Reject::new(
                400,
                format!("Plant limit reached. Current: {count}/{plant_limit}"),
            ));
        }

        let plant_type = body
            .and_then(|body| body.get("plant_type"))
            .and_then(Value::as_str)
            .and_then(PlantType::from_name)
            .ok_or_else(|| {
                Reject::new(
                    400,
                    "Invalid plant_type. Must be one of: berry, fungi, rose",
                )
            })?;
        let x = body_f32(body, "x")?;
        let y = body_f32(body, "y")?;
        let price = self.economy.seed_price(plant_type);
        let new_balance = self.charge(email, price)?;

        let rarity = self.roll_rarity();
        let species = species_pool(plant_type, rarity)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();
        let size = self.roll_size();
        let plant_id = self.next_plant_id;
        self.next_plant_id = self.next_plant_id.saturating_add(1);
        let _ = self.plants.insert(
            plant_id,
            PlantRow {
                owner: email.to_owned(),
                plant_type,
                species,
                rarity,
                size,
                x,
                y,
                stage: Stage::Seed,
                growth_time_remaining: None,
                fertilizer_remaining: None,
            },
        );

        Ok((
            201,
            json!({
                "message": "Plant created successfully",
                "plant_id": plant_id,
                "plant_type": plant_type,
                "plant_species": species,
                "rarity": rarity,
                "size": size,
                "money_spent": price,
                "new_balance": new_balance,
            }),
        ))
    }

    fn roll_rarity(&mut self) -> Rarity {
        let roll: f64 = self.rng.gen();
        let mut cumulative = 0.0;
        for (rarity, odds) in Rarity::ALL.into_iter().zip(self.config.rarity_odds) {
            cumulative += odds;
            if roll < cumulative {
                return rarity;
            }
        }
        Rarity::Legendary
    }

    /// Normal around the middle of the range, clamped to `[0, 1]`.
    fn roll_size(&mut self) -> f32 {
        let size = Normal::new(SIZE_MEAN, SIZE_DEVIATION)
            .map(|normal| normal.sample(&mut self.rng))
            .unwrap_or(SIZE_MEAN);
        size.clamp(0.0, 1.0)
    }

    fn move_plant(&mut self, email: &str, id: u64, body: Option<&Value>) -> Handled {
        let x = body_f32(body, "x")?;
        let y = body_f32(body, "y")?;
        let _ = self.plant(email, id)?;
        if let Some(plant) = self.plants.get_mut(&id) {
            plant.x = x;
            plant.y = y;
        }
        Ok((
            200,
            json!({ "message": "Plant moved successfully", "x": x, "y": y }),
        ))
    }

    fn apply_water(&mut self, email: &str, id: u64) -> Handled {
        let plant = self.plant(email, id)?;
        if plant.stage != Stage::Seed {
            return Err(Reject::new(400, "Can only water plants at stage 0"));
        }
        if plant.growth_time_remaining.is_some() {
            return Err(Reject::new(400, "Plant is already growing"));
        }

        let new_balance = self.charge(email, self.economy.water_price())?;
        let growth = self.economy.rules().seed_growth_time;
        if let Some(plant) = self.plants.get_mut(&id) {
            plant.growth_time_remaining = Some(growth);
        }
        Ok((
            200,
            json!({
                "message": "Plant watered successfully",
                "new_balance": new_balance,
                "growth_time_remaining": growth,
            }),
        ))
    }

    fn apply_fertilizer(&mut self, email: &str, id: u64) -> Handled {
        let plant = self.plant(email, id)?;
        if plant.stage != Stage::Seedling {
            return Err(Reject::new(400, "Can only fertilize plants at stage 1"));
        }
        if plant.growth_time_remaining.is_some() {
            return Err(Reject::new(
                400,
                "Plant is already growing and doesn't need fertilizer",
            ));
        }
        let remaining = match plant.fertilizer_remaining {
            Some(remaining) if remaining > 0 => remaining - 1,
            _ => return Err(Reject::new(400, "Plant doesn't need fertilizer")),
        };
        let rarity = plant.rarity;

        let new_balance = self.charge(email, self.economy.fertilizer_price())?;
        let (fertilizer_remaining, growth_time_remaining) = if remaining == 0 {
            (None, Some(self.economy.rules().seedling_growth_time(rarity)))
        } else {
            (Some(remaining), None)
        };
        if let Some(plant) = self.plants.get_mut(&id) {
            plant.fertilizer_remaining = fertilizer_remaining;
            plant.growth_time_remaining = growth_time_remaining;
        }
        Ok((
            200,
            json!({
                "message": "Fertilizer applied successfully",
                "new_balance": new_balance,
                "stage": Stage::Seedling,
                "fertilizer_remaining": fertilizer_remaining,
                "growth_time_remaining": growth_time_remaining,
            }),
        ))
    }

    fn grow_plant(&mut self, email: &str, id: u64, body: Option<&Value>) -> Handled {
        let time = body
            .and_then(|body| body.get("time"))
            .and_then(Value::as_u64)
            .map(|time| u32::try_from(time).unwrap_or(u32::MAX))
            .ok_or_else(|| Reject::new(422, "time is required"))?;
        let plant = self.plant(email, id)?;
        let Some(current) = plant.growth_time_remaining else {
            return Err(Reject::new(400, "Plant is not currently growing"));
        };
        let remaining = current.saturating_sub(time);
        let rarity = plant.rarity;
        let stage = plant.stage;

        if remaining > 0 {
            if let Some(plant) = self.plants.get_mut(&id) {
                plant.growth_time_remaining = Some(remaining);
            }
            return Ok((
                200,
                json!({
                    "message": "Plant growth updated",
                    "growth_time_remaining": remaining,
                    "stage_advanced": false,
                }),
            ));
        }

        let Some(next) = stage.next() else {
            return Err(Reject::new(400, "Plant is already at maximum stage"));
        };
        let fertilizer = match next {
            Stage::Seedling => Some(self.economy.rules().fertilizer_required_for(rarity)),
            Stage::Seed | Stage::Mature => None,
        };
        if let Some(plant) = self.plants.get_mut(&id) {
            plant.stage = next;
            plant.growth_time_remaining = None;
            plant.fertilizer_remaining = fertilizer;
        }
        Ok((
            200,
            json!({
                "message": "Plant growth completed and advanced to next stage",
                "growth_time_remaining": null,
                "new_stage": next,
                "stage_advanced": true,
            }),
        ))
    }

    fn sell_plant(&mut self, email: &str, id: u64) -> Handled {
        let plant = self.plant(email, id)?;
        let money_earned = self.economy.sell_price(plant.stage, plant.rarity);
        let _ = self.plants.remove(&id);
        let user = self.user_mut(email)?;
        user.money = user.money.saturating_add(money_earned);
        Ok((
            200,
            json!({
                "message": "Plant sold successfully",
                "money_earned": money_earned,
                "new_balance": user.money,
            }),
        ))
    }
}

impl Transport for LocalEconomy {
    fn send(&mut self, request: &WireRequest) -> Result<WireResponse, ServiceError> {
        if self.offline {
            return Err(ServiceError::Transport("local economy is offline".to_owned()));
        }
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(ServiceError::Transport("injected failure".to_owned()));
        }
        let response = self.route(request);
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "local economy handled request"
        );
        Ok(response)
    }
}

fn user_json(email: &str, user: &UserRow) -> Value {
    json!({
        "email": email,
        "money": user.money as f64,
        "plant_limit": user.plant_limit,
        "weather": user.weather,
    })
}

fn reject(rejection: &Reject) -> WireResponse {
    WireResponse::json(rejection.status, &json!({ "detail": rejection.detail }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_patch_core::{EconomyService, Position, RemoteCall, RemoteReply};

    #[test]
    fn unknown_token_is_unauthorized() {
        let mut local = LocalEconomy::new(EconomyRules::default(), LocalConfig::default());
        let request = RemoteCall::GetUser.to_request("a@b", "forged");

        let response = local.send(&request).expect("local transport answers");
        assert_eq!(response.status, 401);
    }

    #[test]
    fn foreign_account_is_forbidden() {
        let mut local = LocalEconomy::new(EconomyRules::default(), LocalConfig::default());
        let token = local.issue_token("a@b");
        let request = RemoteCall::GetUser.to_request("c@d", &token);

        let response = local.send(&request).expect("local transport answers");
        assert_eq!(response.status, 403);
    }

    #[test]
    fn species_matches_rolled_rarity() {
        let mut client =
            LocalEconomy::new(EconomyRules::default(), LocalConfig::default()).into_client("a@b");
        let _ = client
            .execute(&RemoteCall::CreateUser)
            .expect("account created");

        for _ in 0..2 {
            let reply = client
                .execute(&RemoteCall::CreatePlant {
                    plant_type: PlantType::Rose,
                    position: Position::new(0.0, 0.0),
                })
                .expect("plant created");
            let RemoteReply::Plant(plant) = reply else {
                panic!("expected plant reply");
            };
            let rarity = plant.rarity.expect("rarity rolled");
            let species = plant.plant_species.expect("species rolled");
            let size = plant.size.expect("size rolled");
            assert!((0.0..=1.0).contains(&size), "size {size} out of range");
            assert!(
                species_pool(PlantType::Rose, rarity).contains(&species.as_str()),
                "{species} does not belong to {rarity:?}"
            );
        }
        assert_eq!(client.transport().money("a@b"), Some(50));
    }

    #[test]
    fn injected_failures_are_consumed() {
        let mut local = LocalEconomy::new(EconomyRules::default(), LocalConfig::default());
        let token = local.issue_token("a@b");
        local.fail_next(1);
        let request = RemoteCall::CreateUser.to_request("a@b", &token);

        assert!(local.send(&request).is_err());
        assert_eq!(local.send(&request).expect("second attempt").status, 201);
    }
}
