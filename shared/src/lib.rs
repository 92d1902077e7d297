//! Shared core of the Surabhi festival site.
//!
//! The core owns all page state (countdown, gallery, registered events,
//! session) and talks to the platform shell through Crux capabilities. The
//! shell draws the [`ViewModel`] and reports user input, viewport proximity,
//! image loads and timer ticks back as [`Event`]s.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod countdown;
pub mod deferred_image;
pub mod error;
pub mod event;
pub mod gallery;
pub mod home;
pub mod model;
pub mod registered_events;
pub mod session;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::AppConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind, ErrorSeverity, UserFacingError};
pub use event::Event;
pub use model::{Model, Route, ViewLifetime};
pub use view::ViewModel;

pub const TICK_INTERVAL_MS: u64 = 1000;
pub const FADE_DURATION_MS: u32 = 300;
pub const DEFAULT_ROOT_MARGIN_PX: u32 = 50;
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.01;
pub const DEFAULT_MAX_IMAGE_RETRIES: u32 = 2;
pub const DEFAULT_LOADED_IMAGE_CACHE: usize = 256;
pub const DEFAULT_COUNTDOWN_DAYS: u32 = 102;
pub const PLACEHOLDER_COLOR: &str = "rgba(88, 28, 135, 0.1)";
pub const GUESTS_PER_PAGE: usize = 3;
pub const GALLERY_ROWS: usize = 4;
pub const GALLERY_ROW_STRIDE: usize = 3;
pub const REGISTERED_EVENTS_PATH: &str = "/api/events/registered";
