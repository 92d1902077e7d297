use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::deferred_image::ImageId;

/// Proximity detection. The shell attaches one observer to the element
/// rendered for `target`, grows the viewport by `root_margin_px` on every
/// side, and resolves the request the first time at least `threshold` of the
/// element overlaps it. After resolving, the shell stops observing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportOperation {
    Observe {
        target: ImageId,
        root_margin_px: u32,
        threshold: f32,
    },
    Disconnect {
        target: ImageId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportOutput {
    Intersecting { target: ImageId },
    Disconnected { target: ImageId },
}

impl Operation for ViewportOperation {
    type Output = ViewportOutput;
}

pub struct Viewport<Ev> {
    context: CapabilityContext<ViewportOperation, Ev>,
}

impl<Ev> Clone for Viewport<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Viewport<Ev> {
    type Operation = ViewportOperation;
    type MappedSelf<MappedEv> = Viewport<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Viewport::new(self.context.map_event(f))
    }
}

impl<Ev> Viewport<Ev> {
    pub fn new(context: CapabilityContext<ViewportOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Viewport<Ev>
where
    Ev: Send + 'static,
{
    pub fn observe<F>(&self, target: ImageId, root_margin_px: u32, threshold: f32, make_event: F)
    where
        F: FnOnce(ViewportOutput) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(ViewportOperation::Observe {
                    target,
                    root_margin_px,
                    threshold,
                })
                .await;
            ctx.update_app(make_event(output));
        });
    }

    pub fn disconnect(&self, target: ImageId) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(ViewportOperation::Disconnect { target }).await;
        });
    }
}
