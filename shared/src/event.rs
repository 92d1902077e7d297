use serde::{Deserialize, Serialize};

use crate::capabilities::{ImageOutput, KvError, StorageKey, TimerOutput, ViewportOutput};
use crate::config::AppConfig;
use crate::deferred_image::ImageId;
use crate::gallery::GalleryCategory;
use crate::model::{Route, ViewLifetime};
use crate::registered_events::{EventId, FetchOutcome, ViewMode};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum Event {
    // Lifecycle
    Configure(AppConfig),
    Navigate(Route),
    ErrorDismissed,

    // Session
    LoggedIn {
        token: String,
        user: serde_json::Value,
    },
    LogoutRequested,

    // Home
    CarouselVisibilityChanged {
        visible: bool,
    },
    NextGuests,
    PreviousGuests,

    // Gallery
    GalleryCategorySelected {
        category: GalleryCategory,
    },
    GalleryLightboxClosed,

    // Images
    ImageClicked {
        image: ImageId,
    },
    ImageRetryRequested {
        image: ImageId,
    },

    // Registered events
    RegisteredSearchChanged {
        term: String,
    },
    RegisteredViewModeSelected {
        mode: ViewMode,
    },
    RegisteredEventToggled {
        id: EventId,
    },

    // Capability responses
    #[serde(skip)]
    CountdownTick {
        lifetime: ViewLifetime,
        output: TimerOutput,
    },
    #[serde(skip)]
    ImageInView {
        lifetime: ViewLifetime,
        output: ViewportOutput,
    },
    #[serde(skip)]
    ImageLoadFinished {
        lifetime: ViewLifetime,
        image: ImageId,
        output: ImageOutput,
    },
    #[serde(skip)]
    RegisteredTokenLoaded {
        lifetime: ViewLifetime,
        result: Result<Option<String>, KvError>,
    },
    #[serde(skip)]
    RegisteredEventsFetched {
        lifetime: ViewLifetime,
        outcome: FetchOutcome,
    },
    #[serde(skip)]
    SessionTokenLoaded {
        result: Result<Option<String>, KvError>,
    },
    #[serde(skip)]
    SessionUserLoaded {
        result: Result<Option<serde_json::Value>, KvError>,
    },
    #[serde(skip)]
    StorageWritten {
        key: StorageKey,
        result: Result<(), String>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Configure(_) => "configure",
            Event::Navigate(_) => "navigate",
            Event::ErrorDismissed => "error_dismissed",
            Event::LoggedIn { .. } => "logged_in",
            Event::LogoutRequested => "logout_requested",
            Event::CarouselVisibilityChanged { .. } => "carousel_visibility_changed",
            Event::NextGuests => "next_guests",
            Event::PreviousGuests => "previous_guests",
            Event::GalleryCategorySelected { .. } => "gallery_category_selected",
            Event::GalleryLightboxClosed => "gallery_lightbox_closed",
            Event::ImageClicked { .. } => "image_clicked",
            Event::ImageRetryRequested { .. } => "image_retry_requested",
            Event::RegisteredSearchChanged { .. } => "registered_search_changed",
            Event::RegisteredViewModeSelected { .. } => "registered_view_mode_selected",
            Event::RegisteredEventToggled { .. } => "registered_event_toggled",
            Event::CountdownTick { .. } => "countdown_tick",
            Event::ImageInView { .. } => "image_in_view",
            Event::ImageLoadFinished { .. } => "image_load_finished",
            Event::RegisteredTokenLoaded { .. } => "registered_token_loaded",
            Event::RegisteredEventsFetched { .. } => "registered_events_fetched",
            Event::SessionTokenLoaded { .. } => "session_token_loaded",
            Event::SessionUserLoaded { .. } => "session_user_loaded",
            Event::StorageWritten { .. } => "storage_written",
        }
    }

    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Event::Navigate(_)
                | Event::ErrorDismissed
                | Event::LoggedIn { .. }
                | Event::LogoutRequested
                | Event::NextGuests
                | Event::PreviousGuests
                | Event::GalleryCategorySelected { .. }
                | Event::GalleryLightboxClosed
                | Event::ImageClicked { .. }
                | Event::ImageRetryRequested { .. }
                | Event::RegisteredSearchChanged { .. }
                | Event::RegisteredViewModeSelected { .. }
                | Event::RegisteredEventToggled { .. }
        )
    }

    /// The page visit a capability response belongs to, if it is scoped to one.
    pub fn lifetime(&self) -> Option<ViewLifetime> {
        match self {
            Event::CountdownTick { lifetime, .. }
            | Event::ImageInView { lifetime, .. }
            | Event::ImageLoadFinished { lifetime, .. }
            | Event::RegisteredTokenLoaded { lifetime, .. }
            | Event::RegisteredEventsFetched { lifetime, .. } => Some(*lifetime),
            _ => None,
        }
    }
}
