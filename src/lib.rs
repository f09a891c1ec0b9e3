//! This crate provides a small meeting dashboard.
//!
//! Meetings (a name, a start time and a join link) are kept in a local key-value store by the [`storage`] module.
//! Depending on the current time, each meeting is live, upcoming or over (see the [`status`] module).
//!
//! The [`Controller`](controller::Controller) owns the dashboard state and applies user actions to it. \
//! After each change, it saves the meeting list and asks the [`render`] module for a fresh dashboard page,
//! that is handed over to a [`RenderTarget`](traits::RenderTarget). \
//! User interface events reach the controller through a [`Dispatcher`](dispatch::Dispatcher), and the
//! [`timer`] module keeps the page up to date as time goes by.

pub mod traits;
pub mod error;
pub use error::Error;

mod meeting;
pub use meeting::{Meeting, MeetingForm, MeetingId, parse_meeting_time};
pub mod status;
pub use status::Status;

pub mod storage;
pub mod render;
pub mod controller;
pub use controller::Controller;
pub mod dispatch;
pub mod command;
pub mod timer;

pub mod clock;
pub mod config;
pub mod mocks;
pub mod utils;
