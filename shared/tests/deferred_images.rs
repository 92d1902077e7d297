use crux_core::testing::AppTester;
use crux_core::Request;
use shared::capabilities::{ImageOperation, ImageOutput, ViewportOperation, ViewportOutput};
use shared::deferred_image::ImageId;
use shared::view::{GalleryView, PageView};
use shared::{App, AppConfig, Effect, Event, Model, Route};

fn gallery() -> (AppTester<App, Effect>, Model, Vec<Effect>) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let _ = app.update(
        Event::Configure(AppConfig::with_api_base("https://api.surabhi.example")),
        &mut model,
    );
    // Start from a page without images so only gallery effects are collected.
    let _ = app.update(Event::Navigate(Route::Login), &mut model);
    let effects = app.update(Event::Navigate(Route::Gallery), &mut model).effects;
    (app, model, effects)
}

fn loads(effects: Vec<Effect>) -> Vec<Request<ImageOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::ImageLoader(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn observations(effects: Vec<Effect>) -> Vec<Request<ViewportOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Viewport(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn gallery_view(app: &AppTester<App, Effect>, model: &Model) -> GalleryView {
    match app.view(model).page {
        PageView::Gallery(view) => view,
        other => panic!("expected gallery, got {other:?}"),
    }
}

fn load_target(request: &Request<ImageOperation>) -> ImageId {
    let ImageOperation::Load { target, .. } = &request.operation;
    *target
}

#[test]
fn test_first_row_loads_immediately_and_the_rest_wait_for_proximity() {
    let (_app, model, effects) = gallery();

    let (load_effects, observe_effects): (Vec<Effect>, Vec<Effect>) = effects
        .into_iter()
        .filter(|e| matches!(e, Effect::ImageLoader(_) | Effect::Viewport(_)))
        .partition(|e| matches!(e, Effect::ImageLoader(_)));
    let load_requests = loads(load_effects);
    let observe_requests = observations(observe_effects);

    // Vastrashala: four rows of two tiles, the first row eager.
    assert_eq!(load_requests.len(), 2);
    assert_eq!(observe_requests.len(), 6);

    let first_row = &model.gallery.rows[0].tiles;
    for request in &load_requests {
        assert!(first_row.contains(&load_target(request)));
        assert!(matches!(request.operation, ImageOperation::Load { eager: true, .. }));
    }
    for request in &observe_requests {
        let ViewportOperation::Observe {
            root_margin_px,
            threshold,
            target,
        } = request.operation
        else {
            panic!("expected observe");
        };
        assert_eq!(root_margin_px, 50);
        assert!((threshold - 0.01).abs() < f32::EPSILON);
        assert!(!first_row.contains(&target));
    }
}

#[test]
fn test_lazy_tile_has_no_source_until_proximity() {
    let (app, mut model, effects) = gallery();
    let mut observe = observations(effects).remove(0);
    let ViewportOperation::Observe { target, .. } = observe.operation else {
        panic!("expected observe");
    };

    let tile = |view: &GalleryView| {
        view.rows
            .iter()
            .flat_map(|r| r.tiles.iter())
            .find(|t| t.id == target)
            .cloned()
            .unwrap()
    };
    assert!(tile(&gallery_view(&app, &model)).src.is_none());

    let update = app
        .resolve(&mut observe, ViewportOutput::Intersecting { target })
        .expect("resolve observe");
    let mut load_effects = Vec::new();
    for event in update.events {
        load_effects.extend(app.update(event, &mut model).effects);
    }
    let requests = loads(load_effects);
    assert_eq!(requests.len(), 1);
    assert_eq!(load_target(&requests[0]), target);
    assert!(tile(&gallery_view(&app, &model)).src.is_some());
}

#[test]
fn test_load_completion_flips_opacity_exactly_once() {
    let (app, mut model, effects) = gallery();
    let mut request = loads(effects).remove(0);
    let target = load_target(&request);

    let update = app.resolve(&mut request, ImageOutput::Loaded).expect("resolve load");
    let finished: Vec<Event> = update.events;
    assert_eq!(finished.len(), 1);

    let _ = app.update(finished[0].clone(), &mut model);
    let view = gallery_view(&app, &model);
    let tile = view.rows[0].tiles.iter().find(|t| t.id == target).unwrap();
    assert!((tile.image_opacity - 1.0).abs() < f32::EPSILON);
    assert!(tile.placeholder_opacity.abs() < f32::EPSILON);
    assert_eq!(tile.fade_ms, 300);

    let repeat = app.update(finished[0].clone(), &mut model);
    assert!(repeat.effects.is_empty());
    assert_eq!(gallery_view(&app, &model), view);
}

#[test]
fn test_failed_load_offers_manual_retry() {
    let (app, mut model, effects) = gallery();
    let mut request = loads(effects).remove(0);
    let target = load_target(&request);

    let update = app
        .resolve(&mut request, ImageOutput::Failed { reason: "404".into() })
        .expect("resolve load");
    for event in update.events {
        let _ = app.update(event, &mut model);
    }
    let view = gallery_view(&app, &model);
    let tile = view.rows[0].tiles.iter().find(|t| t.id == target).unwrap();
    assert!(tile.failed);
    assert!(tile.can_retry);

    let retry = app.update(Event::ImageRetryRequested { image: target }, &mut model);
    assert_eq!(loads(retry.effects).len(), 1);
}

#[test]
fn test_late_completion_after_leaving_is_dropped() {
    let (app, mut model, effects) = gallery();
    let mut request = loads(effects).remove(0);
    let update = app.resolve(&mut request, ImageOutput::Loaded).expect("resolve load");

    let leave = app.update(Event::Navigate(Route::Login), &mut model);
    // Pending observations of the six lazy tiles are disconnected.
    let disconnects = observations(leave.effects)
        .into_iter()
        .filter(|r| matches!(r.operation, ViewportOperation::Disconnect { .. }))
        .count();
    assert_eq!(disconnects, 6);

    for event in update.events {
        let late = app.update(event, &mut model);
        assert!(late.effects.is_empty());
    }
    assert!(model.images.is_empty());
    assert!(model.loaded_images.is_empty());
}

#[test]
fn test_loaded_urls_are_reused_on_next_visit() {
    let (app, mut model, effects) = gallery();
    for mut request in loads(effects) {
        let update = app.resolve(&mut request, ImageOutput::Loaded).expect("resolve load");
        for event in update.events {
            let _ = app.update(event, &mut model);
        }
    }

    let _ = app.update(Event::Navigate(Route::Home), &mut model);
    let again = app.update(Event::Navigate(Route::Gallery), &mut model);
    assert!(loads(again.effects).is_empty());
    let view = gallery_view(&app, &model);
    assert!(view.rows[0].tiles.iter().all(|t| (t.image_opacity - 1.0).abs() < f32::EPSILON));
}

#[test]
fn test_clicking_a_tile_opens_the_lightbox() {
    let (app, mut model, _) = gallery();
    let tile = model.gallery.rows[1].tiles[0];
    let src = model.images.get(tile).unwrap().src.clone();

    let _ = app.update(Event::ImageClicked { image: tile }, &mut model);
    assert_eq!(gallery_view(&app, &model).lightbox, Some(src));

    let _ = app.update(Event::GalleryLightboxClosed, &mut model);
    assert_eq!(gallery_view(&app, &model).lightbox, None);
}
