use serde::{Deserialize, Serialize};

use crate::countdown::Countdown;
use crate::deferred_image::{DeferredImageView, ImageId, ImageSlots};
use crate::error::UserFacingError;
use crate::gallery::{GalleryCategory, RowLayout};
use crate::home::{ABOUT, PARTICIPATION_STEPS, TIMELINE, TRAILER_URL, VIDEO_TEASERS};
use crate::model::{Model, Route};
use crate::registered_events::{EventId, RegisteredEvent, ViewMode};
use crate::session::SessionChange;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub route: Route,
    pub path: String,
    pub session: SessionView,
    pub page: PageView,
    pub error: Option<UserFacingError>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SessionView {
    pub signed_in: bool,
    pub user: Option<serde_json::Value>,
    pub revision: u64,
    pub last_change: Option<SessionChange>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum PageView {
    Home(HomeView),
    Gallery(GalleryView),
    RegisteredEvents(RegisteredEventsView),
    Login,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CountdownView {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub finished: bool,
}

impl From<Countdown> for CountdownView {
    fn from(c: Countdown) -> Self {
        Self {
            days: format!("{:02}", c.days),
            hours: format!("{:02}", c.hours),
            minutes: format!("{:02}", c.minutes),
            seconds: format!("{:02}", c.seconds),
            finished: c.is_finished(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimelineView {
    pub year: u16,
    pub title: String,
    pub description: String,
    pub image: Option<DeferredImageView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TeaserView {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<DeferredImageView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StepView {
    pub id: u8,
    pub title: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GuestView {
    pub name: String,
    pub role: String,
    pub image: Option<DeferredImageView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HomeView {
    pub countdown: CountdownView,
    pub about: String,
    pub trailer_url: String,
    pub timeline: Vec<TimelineView>,
    pub teasers: Vec<TeaserView>,
    pub steps: Vec<StepView>,
    pub guests: Vec<GuestView>,
    pub guest_offset: usize,
    pub carousel: Vec<DeferredImageView>,
    pub carousel_animating: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CategoryView {
    pub category: GalleryCategory,
    pub label: String,
    pub selected: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GalleryRowView {
    pub layout: RowLayout,
    pub tiles: Vec<DeferredImageView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GalleryView {
    pub categories: Vec<CategoryView>,
    pub rows: Vec<GalleryRowView>,
    pub lightbox: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EventCardView {
    pub id: EventId,
    pub title: String,
    pub category_name: String,
    pub image: String,
    pub description: String,
    pub venue: String,
    pub date: String,
    pub time: String,
    pub expanded: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimetableGroupView {
    pub date: String,
    pub entries: Vec<EventCardView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RegisteredEventsView {
    pub loading: bool,
    pub error: Option<UserFacingError>,
    pub search_term: String,
    pub view_mode: ViewMode,
    pub cards: Vec<EventCardView>,
    pub timetable: Vec<TimetableGroupView>,
}

pub fn build(model: &Model) -> ViewModel {
    let page = match model.route {
        Route::Home => PageView::Home(home_view(model)),
        Route::Gallery => PageView::Gallery(gallery_view(model)),
        Route::RegisteredEvents => PageView::RegisteredEvents(registered_view(model)),
        Route::Login => PageView::Login,
    };

    ViewModel {
        route: model.route,
        path: model.route.path().to_string(),
        session: SessionView {
            signed_in: model.session.is_signed_in(),
            user: model.session.user().cloned(),
            revision: model.session.revision(),
            last_change: model.session.last_change(),
        },
        page,
        error: model.active_error.as_ref().map(UserFacingError::from),
    }
}

fn image_view(slots: &ImageSlots, ids: &[ImageId], index: usize, max_retries: u32) -> Option<DeferredImageView> {
    ids.get(index)
        .and_then(|id| slots.get(*id))
        .map(|image| image.view(max_retries))
}

fn home_view(model: &Model) -> HomeView {
    let page = &model.home;
    let slots = &model.images;
    let retries = model.config.max_image_retries;

    let guest_ids = page.visible_guest_images();
    let guests = page
        .visible_guests()
        .iter()
        .enumerate()
        .map(|(i, g)| GuestView {
            name: g.name.to_string(),
            role: g.role.to_string(),
            image: image_view(slots, &guest_ids, i, retries),
        })
        .collect();

    HomeView {
        countdown: model.countdown.into(),
        about: ABOUT.to_string(),
        trailer_url: TRAILER_URL.to_string(),
        timeline: TIMELINE
            .iter()
            .enumerate()
            .map(|(i, t)| TimelineView {
                year: t.year,
                title: t.title.to_string(),
                description: t.description.to_string(),
                image: image_view(slots, &page.timeline_images, i, retries),
            })
            .collect(),
        teasers: VIDEO_TEASERS
            .iter()
            .enumerate()
            .map(|(i, t)| TeaserView {
                title: t.title.to_string(),
                description: t.description.to_string(),
                thumbnail: image_view(slots, &page.teaser_images, i, retries),
            })
            .collect(),
        steps: PARTICIPATION_STEPS
            .iter()
            .map(|s| StepView {
                id: s.id,
                title: s.title.to_string(),
                description: s.description.to_string(),
            })
            .collect(),
        guests,
        guest_offset: page.guest_offset,
        carousel: slots.views(&page.carousel_images, retries),
        carousel_animating: page.carousel_visible,
    }
}

fn gallery_view(model: &Model) -> GalleryView {
    let page = &model.gallery;
    GalleryView {
        categories: GalleryCategory::ALL
            .iter()
            .map(|c| CategoryView {
                category: *c,
                label: c.label(),
                selected: *c == page.selected,
            })
            .collect(),
        rows: page
            .rows
            .iter()
            .map(|row| GalleryRowView {
                layout: row.layout,
                tiles: model.images.views(&row.tiles, model.config.max_image_retries),
            })
            .collect(),
        lightbox: page.lightbox.clone(),
    }
}

fn card(event: &RegisteredEvent, expanded: Option<&EventId>) -> EventCardView {
    EventCardView {
        id: event.id.clone(),
        title: event.title.clone(),
        category_name: event.category_name.clone(),
        image: event.image.clone(),
        description: event.details.description.clone(),
        venue: event.details.venue.clone(),
        date: event.details.date.clone(),
        time: event.details.time.clone(),
        expanded: expanded == Some(&event.id),
    }
}

fn registered_view(model: &Model) -> RegisteredEventsView {
    let page = &model.registered;
    let expanded = page.expanded.as_ref();
    let cards = page.filtered().into_iter().map(|e| card(e, expanded)).collect();
    let timetable = match page.view_mode {
        ViewMode::List => Vec::new(),
        ViewMode::Timetable => page
            .grouped_by_date()
            .iter()
            .map(|group| TimetableGroupView {
                date: group.date.clone(),
                entries: group.events.iter().map(|e| card(e, expanded)).collect(),
            })
            .collect(),
    };

    RegisteredEventsView {
        loading: page.is_loading(),
        error: page.error().map(UserFacingError::from),
        search_term: page.search_term.clone(),
        view_mode: page.view_mode,
        cards,
        timetable,
    }
}
