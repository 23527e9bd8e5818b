pub mod chat;
pub mod status_route;
