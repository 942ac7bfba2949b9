use crate::controllers::ticket::TicketController;
use crate::controllers::token::TokenController;
use crate::core::config::Args;
use crate::core::error::ConfigError;
use crate::token::store::MemoryStore;
use crate::types::ticket::Ticket;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) token_controller: TokenController<MemoryStore>,
    pub(crate) ticket_controller: TicketController,
}

impl AppState {
    pub(crate) fn new(config: &Args, tickets: Vec<Ticket>) -> Result<Self, ConfigError> {
        Ok(AppState {
            token_controller: TokenController::new(
                &config.jwt,
                config.users.clone(),
                MemoryStore::new(),
            )?,
            ticket_controller: TicketController::new(tickets),
        })
    }
}
