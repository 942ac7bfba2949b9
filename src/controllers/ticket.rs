use std::sync::Arc;
use tokio::sync::RwLock;

use crate::types::ticket::Ticket;

/// In-memory ticket list, kept in insertion order. Lookups match the first
/// ticket with an identical id; ids are not required to be unique.
#[derive(Clone, Debug, Default)]
pub(crate) struct TicketController {
    tickets: Arc<RwLock<Vec<Ticket>>>,
}

impl TicketController {
    pub(crate) fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Arc::new(RwLock::new(tickets)),
        }
    }

    pub(crate) async fn get_all(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }

    pub(crate) async fn get(&self, id: &str) -> Option<Ticket> {
        self.tickets
            .read()
            .await
            .iter()
            .find(|ticket| ticket.ticket_id == id)
            .cloned()
    }

    pub(crate) async fn add(&self, ticket: Ticket) {
        self.tickets.write().await.push(ticket);
    }

    pub(crate) async fn update(&self, id: &str, values: Ticket) -> bool {
        let mut tickets = self.tickets.write().await;

        match tickets.iter_mut().find(|ticket| ticket.ticket_id == id) {
            Some(ticket) => {
                ticket.apply(values);
                true
            }
            None => false,
        }
    }

    pub(crate) async fn delete(&self, id: &str) -> bool {
        let mut tickets = self.tickets.write().await;

        match tickets.iter().position(|ticket| ticket.ticket_id == id) {
            Some(index) => {
                tickets.remove(index);
                true
            }
            None => false,
        }
    }
}
