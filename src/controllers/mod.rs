pub(crate) mod ticket;
pub(crate) mod token;
