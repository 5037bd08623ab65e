mod event;
mod guest;
mod rsvp;
mod scheduler;
mod status;
mod webhook;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::guest::dtos::*;
    pub use crate::scheduler::dtos::*;
}

pub use crate::event::api::*;
pub use crate::guest::api::*;
pub use crate::rsvp::api::*;
pub use crate::scheduler::api::*;
pub use crate::status::api::*;
pub use crate::webhook::api::*;
