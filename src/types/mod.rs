pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod ticket;
pub(crate) mod user;
