//! Contract of the remote economy service.
//!
//! [`RemoteCall`] names every operation the garden may issue and knows how to
//! shape it as a [`WireRequest`]. Replies are decoded leniently: every field is
//! optional and an absent field means "keep the locally predicted value".

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::{PlantId, PlantType, Position, Rarity, Stage, Weather};

/// Operations offered by the economy service.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCall {
    /// Registers the account of the signed-in player.
    CreateUser,
    /// Fetches money, plant limit and weather.
    GetUser,
    /// Adds a signed amount to the balance.
    ChangeMoney {
        /// Amount to add; negative values deduct.
        amount: i64,
    },
    /// Buys the next capacity upgrade.
    IncreasePlantLimit,
    /// Advances the weather one step through its cycle.
    CycleWeather,
    /// Fetches every plant the player owns.
    ListPlants,
    /// Creates a plant from a seed packet.
    CreatePlant {
        /// Kind of plant to create.
        plant_type: PlantType,
        /// Position in service coordinates.
        position: Position,
    },
    /// Stores a new plant position.
    MovePlant {
        /// Plant that moved.
        plant: PlantId,
        /// Position in service coordinates.
        position: Position,
    },
    /// Waters a seed.
    ApplyWater {
        /// Plant receiving the water.
        plant: PlantId,
    },
    /// Applies one fertilizer dose.
    ApplyFertilizer {
        /// Plant receiving the fertilizer.
        plant: PlantId,
    },
    /// Credits growth time to a growing plant.
    GrowPlant {
        /// Plant that grows.
        plant: PlantId,
        /// Growth time credited.
        time: u32,
    },
    /// Sells and deletes a plant.
    SellPlant {
        /// Plant being sold.
        plant: PlantId,
    },
}

impl RemoteCall {
    /// Short stable name of the operation used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::GetUser => "get_user",
            Self::ChangeMoney { .. } => "change_money",
            Self::IncreasePlantLimit => "increase_plant_limit",
            Self::CycleWeather => "cycle_weather",
            Self::ListPlants => "list_plants",
            Self::CreatePlant { .. } => "create_plant",
            Self::MovePlant { .. } => "move_plant",
            Self::ApplyWater { .. } => "apply_water",
            Self::ApplyFertilizer { .. } => "apply_fertilizer",
            Self::GrowPlant { .. } => "grow_plant",
            Self::SellPlant { .. } => "sell_plant",
        }
    }

    /// HTTP method of the operation.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::GetUser | Self::ListPlants => Method::Get,
            Self::CreateUser
            | Self::IncreasePlantLimit
            | Self::CycleWeather
            | Self::CreatePlant { .. } => Method::Post,
            Self::ChangeMoney { .. }
            | Self::MovePlant { .. }
            | Self::ApplyWater { .. }
            | Self::ApplyFertilizer { .. }
            | Self::GrowPlant { .. } => Method::Patch,
            Self::SellPlant { .. } => Method::Delete,
        }
    }

    /// Request path of the operation for the provided account.
    #[must_use]
    pub fn path(&self, email: &str) -> String {
        match self {
            Self::CreateUser => "/users/".to_owned(),
            Self::GetUser => format!("/users/{email}"),
            Self::ChangeMoney { .. } => format!("/users/{email}/money"),
            Self::IncreasePlantLimit => format!("/users/{email}/increase-plant-limit"),
            Self::CycleWeather => format!("/users/{email}/cycle-weather"),
            Self::ListPlants => format!("/users/{email}/plants"),
            Self::CreatePlant { .. } => format!("/users/{email}/plants/"),
            Self::MovePlant { plant, .. } => {
                format!("/users/{email}/plants/{}/position", plant.get())
            }
            Self::ApplyWater { plant } => {
                format!("/users/{email}/plants/{}/apply-water", plant.get())
            }
            Self::ApplyFertilizer { plant } => {
                format!("/users/{email}/plants/{}/apply-fertilizer", plant.get())
            }
            Self::GrowPlant { plant, .. } => format!("/users/{email}/plants/{}/grow", plant.get()),
            Self::SellPlant { plant } => format!("/users/{email}/plants/{}/sell", plant.get()),
        }
    }

    /// JSON body of the operation, if it carries one.
    #[must_use]
    pub fn body(&self, email: &str) -> Option<Value> {
        match self {
            Self::CreateUser => Some(json!({ "email": email })),
            Self::ChangeMoney { amount } => Some(json!({ "amount": amount })),
            Self::CreatePlant {
                plant_type,
                position,
            } => Some(json!({
                "plant_type": plant_type.as_str(),
                "x": position.x,
                "y": position.y,
            })),
            Self::MovePlant { position, .. } => Some(json!({ "x": position.x, "y": position.y })),
            Self::GrowPlant { time, .. } => Some(json!({ "time": time })),
            Self::GetUser
            | Self::IncreasePlantLimit
            | Self::CycleWeather
            | Self::ListPlants
            | Self::ApplyWater { .. }
            | Self::ApplyFertilizer { .. }
            | Self::SellPlant { .. } => None,
        }
    }

    /// Shapes the operation as a request carrying the provided bearer credential.
    #[must_use]
    pub fn to_request(&self, email: &str, bearer: &str) -> WireRequest {
        WireRequest {
            method: self.method(),
            path: self.path(email),
            body: self.body(email),
            bearer: bearer.to_owned(),
        }
    }

    /// Decodes a successful response body into the reply this operation produces.
    pub fn decode_reply(&self, body: &str) -> Result<RemoteReply, ServiceError> {
        let body = if body.trim().is_empty() { "{}" } else { body };
        let malformed = |error: serde_json::Error| ServiceError::Malformed(error.to_string());
        match self {
            Self::MovePlant { .. } => Ok(RemoteReply::Ack),
            Self::CreateUser
            | Self::GetUser
            | Self::ChangeMoney { .. }
            | Self::IncreasePlantLimit
            | Self::CycleWeather => serde_json::from_str(body)
                .map(RemoteReply::Account)
                .map_err(malformed),
            Self::ListPlants => serde_json::from_str::<PlantList>(body)
                .map(|list| RemoteReply::Plants(list.plants))
                .map_err(malformed),
            Self::CreatePlant { .. }
            | Self::ApplyWater { .. }
            | Self::ApplyFertilizer { .. }
            | Self::GrowPlant { .. }
            | Self::SellPlant { .. } => serde_json::from_str(body)
                .map(RemoteReply::Plant)
                .map_err(malformed),
        }
    }
}

/// HTTP methods used by the economy service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read-only fetch.
    Get,
    /// Creation or action.
    Post,
    /// Partial update.
    Patch,
    /// Removal.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// Transport-level request sent to the economy service.
#[derive(Clone, Debug, PartialEq)]
pub struct WireRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below the service base URL.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Bearer credential authorising the request.
    pub bearer: String,
}

/// Transport-level response returned by the economy service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw JSON body.
    pub body: String,
}

impl WireResponse {
    /// Builds a response from a status code and JSON value.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// Reports whether the status denotes success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Converts a non-success response into a [`ServiceError::Rejected`].
    #[must_use]
    pub fn rejection(&self) -> ServiceError {
        let detail = serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|error| error.detail)
            .unwrap_or_else(|| self.body.clone());
        ServiceError::Rejected {
            status: self.status,
            detail,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Authoritative data returned by a completed remote call.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteReply {
    /// The call succeeded without data the garden merges.
    Ack,
    /// Account fields.
    Account(AccountReply),
    /// Fields of a single plant plus the resulting balance.
    Plant(PlantReply),
    /// Complete authoritative plant list.
    Plants(Vec<PlantRecord>),
}

/// Account fields a reply may carry.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AccountReply {
    /// Authoritative balance.
    #[serde(
        default,
        alias = "new_balance",
        alias = "new_money",
        deserialize_with = "money"
    )]
    pub money: Option<u64>,
    /// Authoritative plant limit.
    #[serde(default, alias = "new_plant_limit")]
    pub plant_limit: Option<u32>,
    /// Authoritative weather.
    #[serde(default, alias = "new_weather")]
    pub weather: Option<Weather>,
}

/// Plant fields a reply may carry.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PlantReply {
    /// Identifier assigned by the service on creation.
    #[serde(default)]
    pub plant_id: Option<PlantId>,
    /// Variety rolled on creation.
    #[serde(default)]
    pub plant_species: Option<String>,
    /// Rarity rolled on creation.
    #[serde(default)]
    pub rarity: Option<Rarity>,
    /// Display size in `[0, 1]` rolled on creation.
    #[serde(default)]
    pub size: Option<f32>,
    /// Authoritative stage.
    #[serde(default, alias = "new_stage")]
    pub stage: Option<Stage>,
    /// Authoritative growth timer; `Some(None)` clears the local timer.
    #[serde(default, deserialize_with = "present")]
    pub growth_time_remaining: Option<Option<u32>>,
    /// Authoritative fertilizer count; `Some(None)` clears the local count.
    #[serde(default, deserialize_with = "present")]
    pub fertilizer_remaining: Option<Option<u32>>,
    /// Authoritative balance after the call.
    #[serde(default, alias = "new_money", deserialize_with = "money")]
    pub new_balance: Option<u64>,
}

/// Plant as stored by the economy service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    /// Identifier assigned by the service.
    pub plant_id: PlantId,
    /// Kind of plant.
    pub plant_type: PlantType,
    /// Variety of the plant.
    #[serde(default)]
    pub plant_species: Option<String>,
    /// Rarity tier.
    #[serde(default)]
    pub rarity: Option<Rarity>,
    /// Display size in `[0, 1]`.
    #[serde(default)]
    pub size: Option<f32>,
    /// Horizontal position in service coordinates.
    pub x: f32,
    /// Vertical position in service coordinates.
    pub y: f32,
    /// Lifecycle stage.
    pub stage: Stage,
    /// Growth time left, `None` while not growing.
    #[serde(default)]
    pub growth_time_remaining: Option<u32>,
    /// Fertilizer doses still required.
    #[serde(default)]
    pub fertilizer_remaining: Option<u32>,
}

#[derive(Deserialize)]
struct PlantList {
    #[serde(default)]
    plants: Vec<PlantRecord>,
}

/// Balances may arrive as integers or floats; negative amounts clamp to zero.
fn money<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = Option::<f64>::deserialize(deserializer)?;
    Ok(amount.map(|value| value.max(0.0).round() as u64))
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Failures of a remote call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service rejected the request ({status}): {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error detail reported by the service.
        detail: String,
    },
    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// No bearer credential could be obtained.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),
}

impl ServiceError {
    /// Reports whether the service refused to create an account that already exists.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Rejected { status: 400, detail } if detail.contains("already exists"))
    }
}

/// Completion of an issued remote call.
#[derive(Clone, Debug, PartialEq)]
pub enum CallOutcome {
    /// The service accepted the call.
    Succeeded(RemoteReply),
    /// The call failed and its optimistic mutation may need to be reverted.
    Failed(ServiceError),
}

impl From<Result<RemoteReply, ServiceError>> for CallOutcome {
    fn from(result: Result<RemoteReply, ServiceError>) -> Self {
        match result {
            Ok(reply) => Self::Succeeded(reply),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Remote authority holding the durable truth of money, plants and weather.
pub trait EconomyService {
    /// Executes a call and returns the decoded authoritative reply.
    fn execute(&mut self, call: &RemoteCall) -> Result<RemoteReply, ServiceError>;
}

impl<S> EconomyService for &mut S
where
    S: EconomyService + ?Sized,
{
    fn execute(&mut self, call: &RemoteCall) -> Result<RemoteReply, ServiceError> {
        (**self).execute(call)
    }
}
