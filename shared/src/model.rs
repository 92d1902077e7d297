use serde::{Deserialize, Serialize};

use crate::capabilities::{ApiBase, TimerId};
use crate::config::AppConfig;
use crate::countdown::Countdown;
use crate::deferred_image::{ImageSlots, LoadedImages, ProximityOptions};
use crate::error::AppError;
use crate::gallery::GalleryPage;
use crate::home::HomePage;
use crate::registered_events::RegisteredEventsPage;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Home,
    Gallery,
    RegisteredEvents,
    Login,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Gallery => "/gallery",
            Route::RegisteredEvents => "/registered-events",
            Route::Login => "/login",
        }
    }
}

/// Identifies one visit to a page. Every asynchronous request carries the
/// lifetime it was issued under and its completion is dropped once the
/// lifetime is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ViewLifetime(pub u64);

impl std::fmt::Display for ViewLifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "visit-{}", self.0)
    }
}

#[derive(Debug)]
pub struct Model {
    pub config: AppConfig,
    pub api_base: Option<ApiBase>,
    pub route: Route,
    pub lifetime: ViewLifetime,
    pub session: Session,
    pub images: ImageSlots,
    pub loaded_images: LoadedImages,
    pub countdown: Countdown,
    pub home: HomePage,
    pub gallery: GalleryPage,
    pub registered: RegisteredEventsPage,
    pub active_error: Option<AppError>,
    next_timer_id: u64,
}

impl Default for Model {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            loaded_images: LoadedImages::new(config.loaded_image_cache),
            countdown: config.countdown_start,
            config,
            api_base: None,
            route: Route::default(),
            lifetime: ViewLifetime::default(),
            session: Session::default(),
            images: ImageSlots::default(),
            home: HomePage::default(),
            gallery: GalleryPage::default(),
            registered: RegisteredEventsPage::default(),
            active_error: None,
            next_timer_id: 0,
        }
    }
}

impl Model {
    /// Starts a new page visit, invalidating everything the previous one
    /// still has in flight.
    pub fn begin_visit(&mut self, route: Route) -> ViewLifetime {
        self.lifetime = ViewLifetime(self.lifetime.0 + 1);
        self.route = route;
        self.lifetime
    }

    pub fn is_current(&self, lifetime: ViewLifetime) -> bool {
        self.lifetime == lifetime
    }

    pub fn proximity(&self) -> ProximityOptions {
        ProximityOptions {
            root_margin_px: self.config.image_root_margin_px,
            threshold: self.config.image_threshold,
        }
    }

    pub fn next_timer_id(&mut self) -> TimerId {
        self.next_timer_id += 1;
        TimerId(self.next_timer_id)
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_get_increasing_lifetimes() {
        let mut model = Model::default();
        let first = model.begin_visit(Route::Gallery);
        let second = model.begin_visit(Route::Home);
        assert!(second > first);
        assert!(model.is_current(second));
        assert!(!model.is_current(first));
        assert_eq!(model.route, Route::Home);
    }

    #[test]
    fn test_defaults_follow_config() {
        let model = Model::default();
        assert_eq!(model.countdown.days, 102);
        assert_eq!(model.proximity().root_margin_px, 50);
        assert!(model.api_base.is_none());
    }

    #[test]
    fn test_timer_ids_unique() {
        let mut model = Model::default();
        assert_ne!(model.next_timer_id(), model.next_timer_id());
    }
}
