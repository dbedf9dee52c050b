#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Economy service adapters.
//!
//! [`EconomyClient`] speaks the REST contract over any [`Transport`], and
//! [`LocalEconomy`] is an in-memory authority implementing the same contract
//! for offline play and tests.

mod local;

use anyhow::{bail, Context, Result};
use pomo_patch_core::{
    wire::{WireRequest, WireResponse},
    Account, EconomyService, RemoteCall, RemoteReply, ServiceError,
};
use tracing::{debug, info};

pub use local::{LocalConfig, LocalEconomy};

/// Carries requests to the economy service and returns its raw responses.
pub trait Transport {
    /// Sends the request; failing to obtain any response is a transport error.
    fn send(&mut self, request: &WireRequest) -> Result<WireResponse, ServiceError>;
}

impl<T> Transport for &mut T
where
    T: Transport + ?Sized,
{
    fn send(&mut self, request: &WireRequest) -> Result<WireResponse, ServiceError> {
        (**self).send(request)
    }
}

/// Supplies the bearer credential attached to every request.
pub trait Credentials {
    /// Returns a currently valid bearer token.
    fn bearer(&mut self) -> Result<String, ServiceError>;
}

/// Fixed bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wraps an already issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Credentials for StaticToken {
    fn bearer(&mut self) -> Result<String, ServiceError> {
        if self.token.is_empty() {
            return Err(ServiceError::Unauthenticated("empty bearer token".to_owned()));
        }
        Ok(self.token.clone())
    }
}

/// Client executing [`RemoteCall`]s for one account.
#[derive(Debug)]
pub struct EconomyClient<T, C> {
    email: String,
    transport: T,
    credentials: C,
}

impl<T, C> EconomyClient<T, C>
where
    T: Transport,
    C: Credentials,
{
    /// Creates a client acting on behalf of `email`.
    #[must_use]
    pub fn new(email: impl Into<String>, transport: T, credentials: C) -> Self {
        Self {
            email: email.into(),
            transport,
            credentials,
        }
    }

    /// Account the client acts for.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Provides read-only access to the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Provides mutable access to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T, C> EconomyService for EconomyClient<T, C>
where
    T: Transport,
    C: Credentials,
{
    fn execute(&mut self, call: &RemoteCall) -> Result<RemoteReply, ServiceError> {
        let bearer = self.credentials.bearer()?;
        let request = call.to_request(&self.email, &bearer);
        let response = self.transport.send(&request)?;
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "economy service responded"
        );
        if !response.is_success() {
            return Err(response.rejection());
        }
        call.decode_reply(&response.body)
    }
}

/// Registers the account if needed and fetches its authoritative state.
///
/// An "already exists" refusal from the create step is expected for returning
/// players and is not an error.
pub fn bootstrap_account<S>(service: &mut S) -> Result<Account>
where
    S: EconomyService + ?Sized,
{
    match service.execute(&RemoteCall::CreateUser) {
        Ok(_) => info!("account created"),
        Err(error) if error.is_already_exists() => debug!("account already exists"),
        Err(error) => return Err(error).context("failed to create account"),
    }

    let reply = service
        .execute(&RemoteCall::GetUser)
        .context("failed to fetch account")?;
    let RemoteReply::Account(account) = reply else {
        bail!("account fetch returned an unexpected reply");
    };

    Ok(Account {
        money: account.money.context("account reply carried no money")?,
        plant_limit: account
            .plant_limit
            .context("account reply carried no plant limit")?,
        weather: account.weather.unwrap_or_default(),
    })
}
