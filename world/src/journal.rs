//! Ledger of remote calls awaiting resolution.

use std::collections::BTreeMap;

use pomo_patch_core::{PlantKey, Position, RemoteCall, Stage, Ticket};

use crate::plants::Lifecycle;

/// Reversal recorded for an optimistic mutation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Undo {
    /// Failure leaves local state untouched.
    Nothing,
    /// Drops a plant that was never created remotely and refunds its price.
    RemovePlant { plant: PlantKey, refund: u64 },
    /// Restores a plant's lifecycle fields and refunds the tool price.
    RestorePlant {
        plant: PlantKey,
        lifecycle: Lifecycle,
        refund: u64,
    },
    /// Puts a moved plant back at its pick-up origin.
    RestorePosition { plant: PlantKey, origin: Position },
    /// Takes back a capacity upgrade and refunds its price.
    RevertUpgrade { refund: u64, increment: u32 },
}

impl Undo {
    pub(crate) const fn reverts_anything(&self) -> bool {
        !matches!(self, Self::Nothing)
    }
}

/// Plant a call operated on and the stage it was at when the call was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Subject {
    pub(crate) plant: PlantKey,
    pub(crate) issued_at: Stage,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entry {
    pub(crate) call: RemoteCall,
    pub(crate) undo: Undo,
    pub(crate) subject: Option<Subject>,
}

/// Outstanding calls keyed by ticket; each ticket can be taken exactly once.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: BTreeMap<Ticket, Entry>,
    next_ticket: u64,
}

impl Journal {
    pub(crate) fn record(&mut self, entry: Entry) -> Ticket {
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        let _ = self.entries.insert(ticket, entry);
        ticket
    }

    pub(crate) fn take(&mut self, ticket: Ticket) -> Option<Entry> {
        self.entries.remove(&ticket)
    }

    pub(crate) fn tickets(&self) -> impl Iterator<Item = Ticket> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry {
            call: RemoteCall::GetUser,
            undo: Undo::Nothing,
            subject: None,
        }
    }

    #[test]
    fn tickets_are_allocated_in_order() {
        let mut journal = Journal::default();
        let first = journal.record(entry());
        let second = journal.record(entry());

        assert!(first < second);
        assert_eq!(journal.tickets().collect::<Vec<_>>(), vec![first, second]);
    }

    #[test]
    fn ticket_resolves_exactly_once() {
        let mut journal = Journal::default();
        let ticket = journal.record(entry());

        assert!(journal.take(ticket).is_some());
        assert!(journal.take(ticket).is_none(), "second take must find nothing");
    }
}
