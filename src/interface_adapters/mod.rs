// Interface adapters: wire protocol, HTTP clients and push transports.

pub mod clients;
pub mod net;
pub mod protocol;
