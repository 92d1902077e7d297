use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use crate::capabilities::{bearer_authorization, Capabilities, TimerOutput, ViewportOutput};
use crate::config::AppConfig;
use crate::deferred_image::{ClickAction, ImageCommand, ImageId};
use crate::error::{AppError, ErrorKind};
use crate::event::Event;
use crate::gallery::GalleryCategory;
use crate::model::{Model, Route, ViewLifetime};
use crate::registered_events::{FetchOutcome, FetchState, RegisteredEvent};
use crate::session::SessionStore;
use crate::view::{self, ViewModel};
use crate::{REGISTERED_EVENTS_PATH, TICK_INTERVAL_MS};

#[derive(Default)]
pub struct App;

impl App {
    #[instrument(skip_all)]
    fn configure(config: AppConfig, model: &mut Model, caps: &Capabilities) {
        match config.validate() {
            Ok(base) => {
                info!(api_host = base.host(), "configured");
                model.api_base = Some(base);
                model.countdown = config.countdown_start;
                model.loaded_images.resize(config.loaded_image_cache);
                model.config = config;
                model.clear_error();
            }
            Err(e) => {
                warn!(error = %e, "rejected configuration");
                model.set_error(e.into());
                return;
            }
        }

        let store = SessionStore::new(&caps.kv);
        store.get_token(|result| Event::SessionTokenLoaded { result });
        store.get_user(|result| Event::SessionUserLoaded { result });

        Self::navigate(model.route, model, caps);
    }

    #[instrument(skip(model, caps), fields(from = ?model.route))]
    fn navigate(route: Route, model: &mut Model, caps: &Capabilities) {
        Self::leave_page(model, caps);
        let lifetime = model.begin_visit(route);
        info!(path = route.path(), %lifetime, "entering page");

        match route {
            Route::Home => {
                let ids = model.home.populate(&mut model.images);
                Self::mount_images(&ids, lifetime, model, caps);
                Self::arm_ticker(lifetime, model, caps);
            }
            Route::Gallery => {
                model.gallery.populate(GalleryCategory::default(), &mut model.images);
                let ids = model.gallery.tile_ids();
                Self::mount_images(&ids, lifetime, model, caps);
            }
            Route::RegisteredEvents => {
                model.registered.reset();
                model.registered.state = FetchState::CheckingCredentials;
                SessionStore::new(&caps.kv)
                    .get_token(move |result| Event::RegisteredTokenLoaded { lifetime, result });
            }
            Route::Login => {}
        }
    }

    fn leave_page(model: &mut Model, caps: &Capabilities) {
        if let Some(timer) = model.home.clear() {
            caps.timer.cancel(timer);
        }
        model.gallery.clear();
        let lifetime = model.lifetime;
        for command in model.images.teardown_all() {
            Self::run_image_command(command, lifetime, caps);
        }
    }

    fn mount_images(ids: &[ImageId], lifetime: ViewLifetime, model: &mut Model, caps: &Capabilities) {
        let options = model.proximity();
        for command in model.images.mount(ids, options, &mut model.loaded_images) {
            Self::run_image_command(command, lifetime, caps);
        }
    }

    fn run_image_command(command: ImageCommand, lifetime: ViewLifetime, caps: &Capabilities) {
        match command {
            ImageCommand::Observe { target, options } => {
                caps.viewport.observe(target, options.root_margin_px, options.threshold, move |output| {
                    Event::ImageInView { lifetime, output }
                });
            }
            ImageCommand::Disconnect { target } => caps.viewport.disconnect(target),
            ImageCommand::Load { target, url, eager } => {
                caps.image.load(target, url, eager, move |output| Event::ImageLoadFinished {
                    lifetime,
                    image: target,
                    output,
                });
            }
        }
    }

    fn arm_ticker(lifetime: ViewLifetime, model: &mut Model, caps: &Capabilities) {
        if model.countdown.is_finished() {
            return;
        }
        let id = model.next_timer_id();
        model.home.ticker = Some(id);
        caps.timer
            .start(id, TICK_INTERVAL_MS, move |output| Event::CountdownTick { lifetime, output });
    }

    fn tick(lifetime: ViewLifetime, output: TimerOutput, model: &mut Model, caps: &Capabilities) {
        let TimerOutput::Fired { id } = output else {
            return;
        };
        if model.home.ticker != Some(id) {
            debug!(timer = id.0, "ignoring tick from a replaced timer");
            return;
        }

        model.countdown.tick();
        if model.countdown.is_finished() {
            model.home.ticker = None;
            info!("countdown reached zero");
        } else {
            Self::arm_ticker(lifetime, model, caps);
        }
    }

    fn page_guests(forward: bool, model: &mut Model, caps: &Capabilities) {
        if model.route != Route::Home {
            return;
        }
        let lifetime = model.lifetime;
        let (left, entered) = model.home.page_guests(forward);
        for command in model.images.detach(&left) {
            Self::run_image_command(command, lifetime, caps);
        }
        Self::mount_images(&entered, lifetime, model, caps);
    }

    fn select_category(category: GalleryCategory, model: &mut Model, caps: &Capabilities) {
        if model.route != Route::Gallery || model.gallery.selected == category {
            return;
        }
        let lifetime = model.lifetime;
        let old = model.gallery.tile_ids();
        for command in model.images.teardown(&old) {
            Self::run_image_command(command, lifetime, caps);
        }
        model.gallery.populate(category, &mut model.images);
        let ids = model.gallery.tile_ids();
        Self::mount_images(&ids, lifetime, model, caps);
    }

    fn image_clicked(image: ImageId, model: &mut Model) {
        if !model.gallery.contains(image) {
            return;
        }
        if let Some(slot) = model.images.get(image) {
            if slot.on_click == Some(ClickAction::OpenLightbox) {
                model.gallery.lightbox = Some(slot.src.clone());
            }
        }
    }

    fn retry_image(image: ImageId, model: &mut Model, caps: &Capabilities) {
        let max = model.config.max_image_retries;
        let command = model.images.get_mut(image).and_then(|slot| slot.retry(max));
        match command {
            Some(command) => {
                info!(%image, "retrying image load");
                Self::run_image_command(command, model.lifetime, caps);
            }
            None => debug!(%image, "retry not available"),
        }
    }

    #[instrument(skip_all, fields(%lifetime))]
    fn token_loaded(
        lifetime: ViewLifetime,
        result: Result<Option<String>, crate::capabilities::KvError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let token = match result {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                info!("no stored credential, redirecting to login");
                Self::navigate(Route::Login, model, caps);
                return;
            }
            Err(e) => {
                warn!(error = %e, "token read failed, treating as signed out");
                Self::navigate(Route::Login, model, caps);
                return;
            }
        };

        let Some(base) = model.api_base.as_ref() else {
            model.registered.state = FetchState::Failed(AppError::new(
                ErrorKind::InvalidState,
                "The site is not configured yet",
            ));
            return;
        };

        let header = match bearer_authorization(&token) {
            Ok(header) => header,
            Err(e) => {
                warn!(error = %e, "stored token cannot be sent");
                model.registered.state = FetchState::Failed(
                    AppError::new(ErrorKind::Authentication, "Failed to fetch registered events")
                        .with_internal(e.to_string()),
                );
                return;
            }
        };

        let url = base.endpoint(REGISTERED_EVENTS_PATH);
        model.session.set_token(SecretString::new(token));
        model.registered.state = FetchState::Loading;
        debug!(%url, "fetching registered events");

        caps.http
            .get(url)
            .header("Authorization", header.as_str())
            .expect_json::<Vec<RegisteredEvent>>()
            .send(move |result| Event::RegisteredEventsFetched {
                lifetime,
                outcome: FetchOutcome::from_http(result),
            });
    }

    fn events_fetched(outcome: FetchOutcome, model: &mut Model) {
        match &outcome {
            FetchOutcome::Loaded(events) => info!(count = events.len(), "registered events loaded"),
            FetchOutcome::Failed(e) => warn!(error = %e, "registered events fetch failed"),
        }
        model.registered.apply(outcome);
    }

    fn log_in(token: String, user: serde_json::Value, model: &mut Model, caps: &Capabilities) {
        let token = SecretString::new(token);
        let store = SessionStore::new(&caps.kv);
        if let Err(e) = store.save(&token, &user) {
            warn!(error = %e, "could not persist session");
            model.set_error(e.into());
            return;
        }
        model.session.set_token(token);
        model.session.set_user(user);
        info!("signed in");
    }

    fn log_out(model: &mut Model, caps: &Capabilities) {
        let store = SessionStore::new(&caps.kv);
        store.remove_token();
        store.remove_user();
        model.session.clear_token();
        model.session.remove_user();
        info!("signed out");

        if model.route == Route::RegisteredEvents {
            Self::navigate(Route::Login, model, caps);
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();

        if let Some(lifetime) = event.lifetime() {
            if !model.is_current(lifetime) {
                debug!(event = event_name, %lifetime, current = %model.lifetime, "dropping stale completion");
                return;
            }
        }

        if event.is_user_initiated() {
            debug!(event = event_name, "user action");
        }

        match event {
            Event::Configure(config) => Self::configure(config, model, caps),
            Event::Navigate(route) => Self::navigate(route, model, caps),
            Event::ErrorDismissed => model.clear_error(),

            Event::LoggedIn { token, user } => Self::log_in(token, user, model, caps),
            Event::LogoutRequested => Self::log_out(model, caps),

            Event::CarouselVisibilityChanged { visible } => {
                if model.route == Route::Home {
                    model.home.carousel_visible = visible;
                }
            }
            Event::NextGuests => Self::page_guests(true, model, caps),
            Event::PreviousGuests => Self::page_guests(false, model, caps),

            Event::GalleryCategorySelected { category } => Self::select_category(category, model, caps),
            Event::GalleryLightboxClosed => model.gallery.lightbox = None,

            Event::ImageClicked { image } => Self::image_clicked(image, model),
            Event::ImageRetryRequested { image } => Self::retry_image(image, model, caps),

            Event::RegisteredSearchChanged { term } => model.registered.search_term = term,
            Event::RegisteredViewModeSelected { mode } => model.registered.view_mode = mode,
            Event::RegisteredEventToggled { id } => model.registered.toggle(id),

            Event::CountdownTick { lifetime, output } => Self::tick(lifetime, output, model, caps),

            Event::ImageInView { lifetime, output } => {
                let ViewportOutput::Intersecting { target } = output else {
                    return;
                };
                let command = model.images.get_mut(target).and_then(|slot| slot.on_proximity());
                if let Some(command) = command {
                    Self::run_image_command(command, lifetime, caps);
                }
            }

            Event::ImageLoadFinished { image, output, .. } => {
                let Some(slot) = model.images.get_mut(image) else {
                    debug!(%image, "load finished for a removed image");
                    return;
                };
                if !slot.on_load_finished(&output, &mut model.loaded_images) {
                    return;
                }
                if let crate::capabilities::ImageOutput::Failed { reason } = &output {
                    warn!(%image, %reason, "image failed to load");
                }
            }

            Event::RegisteredTokenLoaded { lifetime, result } => {
                Self::token_loaded(lifetime, result, model, caps);
            }
            Event::RegisteredEventsFetched { outcome, .. } => Self::events_fetched(outcome, model),

            Event::SessionTokenLoaded { result } => match result {
                Ok(Some(token)) if !token.is_empty() => model.session.set_token(SecretString::new(token)),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "could not restore token"),
            },
            Event::SessionUserLoaded { result } => match result {
                Ok(user) => model.session.restore_user(user),
                Err(e) => warn!(error = %e, "could not restore user"),
            },
            Event::StorageWritten { key, result } => {
                if let Err(e) = result {
                    warn!(%key, error = %e, "storage write failed");
                }
                return;
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
