use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::deferred_image::ImageId;

/// Asks the shell to fetch and decode one image into a single preloaded
/// instance keyed by `target`, which the rendered element then reuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageOperation {
    Load {
        target: ImageId,
        url: String,
        eager: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageOutput {
    Loaded,
    Failed { reason: String },
}

impl Operation for ImageOperation {
    type Output = ImageOutput;
}

pub struct ImageLoader<Ev> {
    context: CapabilityContext<ImageOperation, Ev>,
}

impl<Ev> Clone for ImageLoader<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for ImageLoader<Ev> {
    type Operation = ImageOperation;
    type MappedSelf<MappedEv> = ImageLoader<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        ImageLoader::new(self.context.map_event(f))
    }
}

impl<Ev> ImageLoader<Ev> {
    pub fn new(context: CapabilityContext<ImageOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> ImageLoader<Ev>
where
    Ev: Send + 'static,
{
    pub fn load<F>(&self, target: ImageId, url: String, eager: bool, make_event: F)
    where
        F: FnOnce(ImageOutput) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(ImageOperation::Load { target, url, eager })
                .await;
            ctx.update_app(make_event(output));
        });
    }
}
