//! Data models for the API service

pub mod event;
pub mod group;
pub mod rsvp;
pub mod user;

pub use event::{CreateEvent, Event, EventFilters, EventResponse};
pub use group::{CreateGroup, Group, GroupMember, UpdateGroup};
pub use rsvp::{Rsvp, RsvpCounts, RsvpRequest, RsvpStatus};
pub use user::{LoginRequest, NewUser, User, UserPublic, UserSummary};
