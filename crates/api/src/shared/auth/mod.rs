mod route_guards;

pub use route_guards::{protect_api_route, protect_cron_route};
