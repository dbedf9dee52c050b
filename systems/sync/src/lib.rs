#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Optimistic sync reconciler bridging the garden and the economy service.
//!
//! The garden announces every remote call through
//! [`Event::RemoteCallIssued`]. The reconciler queues those calls in issue
//! order and, when polled, executes them against an [`EconomyService`],
//! feeding each completion back as [`Command::Resolve`]. Until a call is
//! polled the garden keeps showing its optimistic prediction.

use std::{collections::VecDeque, time::Duration};

use pomo_patch_core::{CallOutcome, Command, EconomyService, Event, RemoteCall, Ticket};
use tracing::{debug, warn};

/// Configuration parameters required to construct the reconciler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    resync_interval: Duration,
}

impl Config {
    /// Creates a configuration; a zero interval disables periodic resyncs.
    #[must_use]
    pub const fn new(resync_interval: Duration) -> Self {
        Self { resync_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

/// Remote call waiting to be executed.
#[derive(Clone, Debug, PartialEq)]
pub struct InFlight {
    /// Ticket that resolves the call.
    pub ticket: Ticket,
    /// Call to execute.
    pub call: RemoteCall,
}

/// Pure system that executes issued calls and requests periodic resyncs.
#[derive(Debug)]
pub struct Reconciler {
    in_flight: VecDeque<InFlight>,
    resync_interval: Duration,
    accumulator: Duration,
}

impl Reconciler {
    /// Creates a new reconciler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            in_flight: VecDeque::new(),
            resync_interval: config.resync_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes garden events, queueing issued calls and emitting resync commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::RemoteCallIssued { ticket, call } => self.in_flight.push_back(InFlight {
                    ticket: *ticket,
                    call: call.clone(),
                }),
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if self.resync_interval.is_zero() || accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.accumulator >= self.resync_interval {
            self.accumulator = Duration::ZERO;
            out.push(Command::Resync);
        }
    }

    /// Executes every queued call in issue order.
    pub fn poll<S>(&mut self, service: &mut S, out: &mut Vec<Command>)
    where
        S: EconomyService + ?Sized,
    {
        while self.poll_one(service, out) {}
    }

    /// Executes the oldest queued call, if any. Returns `false` when idle.
    pub fn poll_one<S>(&mut self, service: &mut S, out: &mut Vec<Command>) -> bool
    where
        S: EconomyService + ?Sized,
    {
        let Some(InFlight { ticket, call }) = self.in_flight.pop_front() else {
            return false;
        };

        debug!(ticket = ticket.get(), call = call.label(), "executing remote call");
        let outcome = CallOutcome::from(service.execute(&call));
        if let CallOutcome::Failed(error) = &outcome {
            warn!(ticket = ticket.get(), call = call.label(), %error, "remote call rejected");
        }
        out.push(Command::Resolve { ticket, outcome });
        true
    }

    /// Calls issued but not executed yet, oldest first.
    pub fn in_flight(&self) -> impl Iterator<Item = &InFlight> {
        self.in_flight.iter()
    }

    /// Reports whether no call is waiting for execution.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_patch_core::{RemoteReply, ServiceError};

    struct Offline;

    impl EconomyService for Offline {
        fn execute(&mut self, _call: &RemoteCall) -> Result<RemoteReply, ServiceError> {
            Err(ServiceError::Transport("offline".to_owned()))
        }
    }

    #[test]
    fn resync_is_requested_once_per_interval() {
        let mut reconciler = Reconciler::new(Config::new(Duration::from_secs(10)));
        let mut commands = Vec::new();

        reconciler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(6),
            }],
            &mut commands,
        );
        assert!(commands.is_empty());

        reconciler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(6),
            }],
            &mut commands,
        );
        assert_eq!(commands, vec![Command::Resync]);
    }

    #[test]
    fn zero_interval_disables_resync() {
        let mut reconciler = Reconciler::new(Config::new(Duration::ZERO));
        let mut commands = Vec::new();
        reconciler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(600),
            }],
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn failures_resolve_as_failed_outcomes() {
        let mut reconciler = Reconciler::new(Config::default());
        let mut commands = Vec::new();
        reconciler.handle(
            &[Event::RemoteCallIssued {
                ticket: Ticket::new(3),
                call: RemoteCall::GetUser,
            }],
            &mut commands,
        );

        reconciler.poll(&mut Offline, &mut commands);

        assert!(reconciler.is_idle());
        assert_eq!(
            commands,
            vec![Command::Resolve {
                ticket: Ticket::new(3),
                outcome: CallOutcome::Failed(ServiceError::Transport("offline".to_owned())),
            }]
        );
    }
}
