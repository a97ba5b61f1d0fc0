//! Process and frame spans.

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Keeps the `app` span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter the application span, tagged with `scene` and the build id.
    #[must_use]
    pub fn new(scene: impl Into<String>) -> Self {
        let scene = scene.into();
        let span: &'static Span = Box::leak(Box::new(
            tracing::info_span!("app", scene = %scene, build_sha = %build_sha()),
        ));
        Self {
            _guard: span.enter(),
        }
    }
}

/// Span wrapping one `update` call of the host loop.
#[must_use]
pub fn frame_span(frame: u64, delta: f32) -> Span {
    tracing::debug_span!("frame", frame, delta)
}
