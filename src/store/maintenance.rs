//! Maintenance tickets.

use chrono::Utc;

use crate::store::models::{Ticket, TicketPriority, TicketStatus};
use crate::store::{get, next, sorted, Store, StoreError};

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub shop_id: u64,
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
}

impl Store {
    pub fn ticket(&self, id: u64) -> Result<Ticket, StoreError> {
        get(&self.inner.tickets, "ticket", id)
    }

    /// Tickets, most urgent first, then oldest first.
    pub fn tickets(&self) -> Vec<Ticket> {
        let mut tickets = sorted(&self.inner.tickets);
        tickets.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        tickets
    }

    pub fn open_ticket(&self, new: NewTicket) -> Result<Ticket, StoreError> {
        self.shop(new.shop_id)?;
        if new.title.trim().is_empty() {
            return Err(StoreError::Invalid("ticket title is required".into()));
        }

        let ticket = Ticket {
            id: next(&self.inner.ids.ticket),
            shop_id: new.shop_id,
            title: new.title,
            description: new.description,
            priority: new.priority,
            status: TicketStatus::Open,
            opened_at: Utc::now(),
        };
        self.inner.tickets.insert(ticket.id, ticket.clone());
        self.record("ticket.opened", format!("ticket {} on shop {}", ticket.id, ticket.shop_id));
        Ok(ticket)
    }

    pub fn move_ticket(&self, id: u64, to: TicketStatus) -> Result<Ticket, StoreError> {
        let ticket = {
            let mut ticket = self
                .inner
                .tickets
                .get_mut(&id)
                .ok_or(StoreError::NotFound { kind: "ticket", id })?;
            if !ticket.status.can_move_to(to) {
                return Err(StoreError::Conflict(format!(
                    "ticket {id} cannot move from {:?} to {to:?}",
                    ticket.status
                )));
            }
            ticket.status = to;
            ticket.clone()
        };
        self.record("ticket.moved", format!("ticket {id} → {to:?}"));
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::seeded;

    fn ticket(shop_id: u64, title: &str, priority: TicketPriority) -> NewTicket {
        NewTicket {
            shop_id,
            title: title.into(),
            description: String::new(),
            priority,
        }
    }

    #[test]
    fn test_open_requires_known_shop() {
        let store = seeded();
        let err = store.open_ticket(ticket(42, "Leak", TicketPriority::High)).unwrap_err();
        assert_eq!(err, StoreError::NotFound { kind: "shop", id: 42 });
    }

    #[test]
    fn test_tickets_sorted_by_urgency() {
        let store = seeded();
        store.open_ticket(ticket(1, "Paint", TicketPriority::Low)).unwrap();
        store.open_ticket(ticket(1, "Leak", TicketPriority::Urgent)).unwrap();
        store.open_ticket(ticket(2, "Door", TicketPriority::Low)).unwrap();

        let titles: Vec<String> = store.tickets().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["Leak", "Paint", "Door"]);
    }

    #[test]
    fn test_ticket_workflow() {
        let store = seeded();
        let t = store.open_ticket(ticket(1, "Leak", TicketPriority::High)).unwrap();

        assert!(store.move_ticket(t.id, TicketStatus::Closed).is_err());
        store.move_ticket(t.id, TicketStatus::InProgress).unwrap();
        store.move_ticket(t.id, TicketStatus::Resolved).unwrap();
        let closed = store.move_ticket(t.id, TicketStatus::Closed).unwrap();
        assert_eq!(closed.status, TicketStatus::Closed);
    }
}
