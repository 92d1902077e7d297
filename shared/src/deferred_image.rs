//! Deferred image loading.
//!
//! A [`DeferredImage`] shows a tinted placeholder until its source is close to
//! the viewport (or it is marked `priority`) and the shell has finished
//! loading it, then cross-fades to the real image once. Every instance lives
//! in [`ImageSlots`] for the duration of one page visit and is torn down when
//! the page is left.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capabilities::ImageOutput;
use crate::{
    DEFAULT_ROOT_MARGIN_PX, DEFAULT_VISIBILITY_THRESHOLD, FADE_DURATION_MS, PLACEHOLDER_COLOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityOptions {
    pub root_margin_px: u32,
    pub threshold: f32,
}

impl Default for ProximityOptions {
    fn default() -> Self {
        Self {
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

/// What a click on a rendered image does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickAction {
    OpenLightbox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPhase {
    Pending,
    Requested { attempt: u32 },
    Loaded,
    Failed { attempts: u32, reason: String },
}

/// Side effects an image asks the app to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageCommand {
    Observe {
        target: ImageId,
        options: ProximityOptions,
    },
    Disconnect {
        target: ImageId,
    },
    Load {
        target: ImageId,
        url: String,
        eager: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeferredImage {
    pub id: ImageId,
    pub src: String,
    pub alt: String,
    pub priority: bool,
    pub on_click: Option<ClickAction>,
    in_view: bool,
    observing: bool,
    phase: LoadPhase,
}

impl DeferredImage {
    pub fn new(id: ImageId, src: impl Into<String>, alt: impl Into<String>, priority: bool) -> Self {
        Self {
            id,
            src: src.into(),
            alt: alt.into(),
            priority,
            on_click: None,
            in_view: priority,
            observing: false,
            phase: LoadPhase::Pending,
        }
    }

    #[must_use]
    pub fn with_click(mut self, action: ClickAction) -> Self {
        self.on_click = Some(action);
        self
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    /// First render. Picks between showing a cached image, loading at once
    /// (`priority`) or waiting for proximity.
    pub fn mount(&mut self, options: ProximityOptions, loaded: &mut LoadedImages) -> Option<ImageCommand> {
        if self.phase != LoadPhase::Pending || self.observing {
            return None;
        }

        if loaded.contains(&self.src) {
            self.in_view = true;
            self.phase = LoadPhase::Loaded;
            return None;
        }

        if self.priority {
            self.in_view = true;
            return Some(self.request(1));
        }

        self.observing = true;
        Some(ImageCommand::Observe {
            target: self.id,
            options,
        })
    }

    /// The viewport reported the element close enough. Only the first report
    /// for a still-attached observation counts; the shell has already stopped
    /// observing.
    pub fn on_proximity(&mut self) -> Option<ImageCommand> {
        if !self.observing || self.in_view {
            debug!(image = %self.id, "ignoring proximity with no observation attached");
            return None;
        }
        self.in_view = true;
        self.observing = false;
        Some(self.request(1))
    }

    /// Applies a load completion. Returns whether anything changed; a
    /// completion that arrives when no load is outstanding is ignored.
    pub fn on_load_finished(&mut self, output: &ImageOutput, loaded: &mut LoadedImages) -> bool {
        let LoadPhase::Requested { attempt } = self.phase else {
            debug!(image = %self.id, "ignoring load completion with no request outstanding");
            return false;
        };

        self.phase = match output {
            ImageOutput::Loaded => {
                loaded.insert(&self.src);
                LoadPhase::Loaded
            }
            ImageOutput::Failed { reason } => LoadPhase::Failed {
                attempts: attempt,
                reason: reason.clone(),
            },
        };
        true
    }

    pub fn can_retry(&self, max_retries: u32) -> bool {
        matches!(self.phase, LoadPhase::Failed { attempts, .. } if attempts <= max_retries)
    }

    /// Re-issues a failed load. The first load does not count against
    /// `max_retries`.
    pub fn retry(&mut self, max_retries: u32) -> Option<ImageCommand> {
        let LoadPhase::Failed { attempts, .. } = self.phase else {
            return None;
        };
        if attempts > max_retries {
            return None;
        }
        Some(self.request(attempts + 1))
    }

    /// Detaches a still-pending observation.
    pub fn teardown(&mut self) -> Option<ImageCommand> {
        if !self.observing {
            return None;
        }
        self.observing = false;
        Some(ImageCommand::Disconnect { target: self.id })
    }

    fn request(&mut self, attempt: u32) -> ImageCommand {
        self.phase = LoadPhase::Requested { attempt };
        ImageCommand::Load {
            target: self.id,
            url: self.src.clone(),
            eager: self.priority,
        }
    }

    pub fn view(&self, max_retries: u32) -> DeferredImageView {
        let loaded = self.is_loaded();
        DeferredImageView {
            id: self.id,
            src: self.in_view.then(|| self.src.clone()),
            alt: self.alt.clone(),
            placeholder_color: PLACEHOLDER_COLOR.to_string(),
            placeholder_opacity: if loaded { 0.0 } else { 1.0 },
            image_opacity: if loaded { 1.0 } else { 0.0 },
            fade_ms: FADE_DURATION_MS,
            eager: self.priority,
            loading: matches!(self.phase, LoadPhase::Requested { .. }),
            failed: matches!(self.phase, LoadPhase::Failed { .. }),
            can_retry: self.can_retry(max_retries),
            clickable: self.on_click.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredImageView {
    pub id: ImageId,
    /// Set once the image may be fetched; `None` keeps only the placeholder.
    pub src: Option<String>,
    pub alt: String,
    pub placeholder_color: String,
    pub placeholder_opacity: f32,
    pub image_opacity: f32,
    pub fade_ms: u32,
    pub eager: bool,
    pub loading: bool,
    pub failed: bool,
    pub can_retry: bool,
    pub clickable: bool,
}

/// All images alive in the current page visit.
#[derive(Debug, Default)]
pub struct ImageSlots {
    slots: BTreeMap<ImageId, DeferredImage>,
    next_id: u64,
}

impl ImageSlots {
    pub fn create(&mut self, src: impl Into<String>, alt: impl Into<String>, priority: bool) -> ImageId {
        self.insert_with(|id| DeferredImage::new(id, src, alt, priority))
    }

    pub fn create_clickable(
        &mut self,
        src: impl Into<String>,
        alt: impl Into<String>,
        priority: bool,
        action: ClickAction,
    ) -> ImageId {
        self.insert_with(|id| DeferredImage::new(id, src, alt, priority).with_click(action))
    }

    fn insert_with(&mut self, build: impl FnOnce(ImageId) -> DeferredImage) -> ImageId {
        self.next_id += 1;
        let id = ImageId(self.next_id);
        self.slots.insert(id, build(id));
        id
    }

    pub fn get(&self, id: ImageId) -> Option<&DeferredImage> {
        self.slots.get(&id)
    }

    pub fn get_mut(&mut self, id: ImageId) -> Option<&mut DeferredImage> {
        self.slots.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Mounts the given images in order and collects their commands.
    pub fn mount(
        &mut self,
        ids: &[ImageId],
        options: ProximityOptions,
        loaded: &mut LoadedImages,
    ) -> Vec<ImageCommand> {
        let mut commands = Vec::new();
        for id in ids {
            if let Some(image) = self.slots.get_mut(id) {
                commands.extend(image.mount(options, loaded));
            }
        }
        commands
    }

    pub fn views(&self, ids: &[ImageId], max_retries: u32) -> Vec<DeferredImageView> {
        ids.iter()
            .filter_map(|id| self.slots.get(id))
            .map(|image| image.view(max_retries))
            .collect()
    }

    /// Removes the given images, returning the disconnects they need.
    pub fn teardown(&mut self, ids: &[ImageId]) -> Vec<ImageCommand> {
        ids.iter()
            .filter_map(|id| self.slots.remove(id))
            .filter_map(|mut image| image.teardown())
            .collect()
    }

    /// Stops observing the given images but keeps their state, for images
    /// that leave the page without the visit ending.
    pub fn detach(&mut self, ids: &[ImageId]) -> Vec<ImageCommand> {
        let mut commands = Vec::new();
        for id in ids {
            if let Some(image) = self.slots.get_mut(id) {
                commands.extend(image.teardown());
            }
        }
        commands
    }

    pub fn teardown_all(&mut self) -> Vec<ImageCommand> {
        let slots = std::mem::take(&mut self.slots);
        slots
            .into_values()
            .filter_map(|mut image| image.teardown())
            .collect()
    }
}

/// Image URLs that finished loading during this session, bounded by LRU.
pub struct LoadedImages {
    cache: LruCache<String, ()>,
}

impl LoadedImages {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    pub fn contains(&mut self, url: &str) -> bool {
        self.cache.get(url).is_some()
    }

    pub fn insert(&mut self, url: &str) {
        self.cache.put(url.to_string(), ());
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn resize(&mut self, capacity: usize) {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        self.cache.resize(capacity);
    }
}

impl Default for LoadedImages {
    fn default() -> Self {
        Self::new(crate::DEFAULT_LOADED_IMAGE_CACHE)
    }
}

impl fmt::Debug for LoadedImages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImages")
            .field("len", &self.cache.len())
            .field("cap", &self.cache.cap())
            .finish()
    }
}
