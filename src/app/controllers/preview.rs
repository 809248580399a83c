//! Pushes composed documents into the isolated preview surfaces.

use crate::app::services::composer::ComposedDocument;

/// A rendering surface that runs or displays a document in isolation from
/// the host. Each `load_document` fully replaces the previous content.
pub trait PreviewSurface {
    fn load_document(&mut self, doc: &ComposedDocument);

    /// Hidden surfaces are skipped by `flush` and caught up by `refresh`.
    fn is_visible(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

/// What the caller must do after `schedule`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    /// No debounce configured, call `flush` now.
    FlushNow,
    /// Start a timer for this many seconds, then call `flush`.
    StartTimer(f64),
    /// A timer is already running and will pick up the new document.
    AlreadyPending,
}

struct RegisteredSurface {
    surface: Box<dyn PreviewSurface>,
    /// Revision last loaded into the surface.
    shown: u64,
}

/// Coalesces high-frequency renders: only the latest scheduled document is
/// ever flushed.
pub struct PreviewController {
    surfaces: Vec<RegisteredSurface>,
    pending: Option<ComposedDocument>,
    latest: Option<ComposedDocument>,
    revision: u64,
    debounce_ms: u64,
    timer_active: bool,
}

impl PreviewController {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            surfaces: Vec::new(),
            pending: None,
            latest: None,
            revision: 0,
            debounce_ms,
            timer_active: false,
        }
    }

    pub fn set_debounce_ms(&mut self, debounce_ms: u64) {
        self.debounce_ms = debounce_ms;
    }

    /// Register a surface. It is given the latest document right away if
    /// it is visible.
    pub fn add_surface(&mut self, surface: Box<dyn PreviewSurface>) -> SurfaceId {
        self.surfaces.push(RegisteredSurface { surface, shown: 0 });
        let id = SurfaceId(self.surfaces.len() - 1);
        self.refresh(id);
        id
    }

    pub fn schedule(&mut self, doc: ComposedDocument) -> Schedule {
        self.pending = Some(doc);
        if self.debounce_ms == 0 {
            return Schedule::FlushNow;
        }
        if self.timer_active {
            return Schedule::AlreadyPending;
        }
        self.timer_active = true;
        Schedule::StartTimer(self.debounce_ms as f64 / 1000.0)
    }

    /// Render the pending document into every visible surface. Returns the
    /// new revision, or `None` when nothing was pending.
    pub fn flush(&mut self) -> Option<u64> {
        self.timer_active = false;
        let doc = self.pending.take()?;
        self.revision += 1;
        for entry in self.surfaces.iter_mut().filter(|s| s.surface.is_visible()) {
            entry.surface.load_document(&doc);
            entry.shown = self.revision;
        }
        self.latest = Some(doc);
        log::trace!("preview revision {}", self.revision);
        Some(self.revision)
    }

    /// Bring a surface that just became visible up to the latest revision.
    pub fn refresh(&mut self, id: SurfaceId) {
        let (Some(entry), Some(doc)) = (self.surfaces.get_mut(id.0), self.latest.as_ref()) else {
            return;
        };
        if entry.surface.is_visible() && entry.shown != self.revision {
            entry.surface.load_document(doc);
            entry.shown = self.revision;
        }
    }

    /// Bring every visible surface up to date.
    pub fn refresh_all(&mut self) {
        for i in 0..self.surfaces.len() {
            self.refresh(SurfaceId(i));
        }
    }

    pub fn latest(&self) -> Option<&ComposedDocument> {
        self.latest.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
