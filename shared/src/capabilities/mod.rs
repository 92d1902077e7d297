mod http;
mod image;
mod kv;
mod timer;
mod viewport;

pub use self::http::{bearer_authorization, is_success, ApiBase, HttpError};
pub use self::image::{ImageLoader, ImageOperation, ImageOutput};
pub use self::kv::{decode_json, decode_text, encode_json, encode_text, KvError, StorageKey, MAX_VALUE_SIZE};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};
pub use self::viewport::{Viewport, ViewportOperation, ViewportOutput};

// Render comes straight from Crux; it only has to tell the shell to redraw.
pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub render: Render<Event>,
    pub timer: Timer<Event>,
    pub viewport: Viewport<Event>,
    pub image: ImageLoader<Event>,
}
