//! The playground session: every piece of mutable state the dispatcher
//! touches, behind one set of methods.
//!
//! Widgets are not reachable from here. The editor is driven through the
//! `EditorHandle` trait and the previews through `PreviewSurface`, which
//! keeps the whole edit → compose → render pipeline testable without a
//! display.

use crate::app::controllers::console::{ConsoleEntry, ConsoleLog};
use crate::app::controllers::layout::{LayoutSelector, ViewportClass};
use crate::app::controllers::preview::{PreviewController, PreviewSurface, Schedule, SurfaceId};
use crate::app::controllers::tabs::{EditorHandle, LanguageTabs};
use crate::app::domain::{AppSettings, Language, PreviewMessage, SourceBuffer};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::composer::{ComposedDocument, DocumentComposer};

pub struct Session {
    buffers: SourceBuffer,
    tabs: LanguageTabs,
    layout: LayoutSelector,
    composer: DocumentComposer,
    preview: PreviewController,
    console: ConsoleLog,
    editor: Option<Box<dyn EditorHandle>>,
}

impl Session {
    pub fn new(settings: &AppSettings, window_width: i32) -> Self {
        Self {
            buffers: SourceBuffer::with_defaults(),
            tabs: LanguageTabs::new(settings.initial_language),
            layout: LayoutSelector::new(window_width),
            composer: DocumentComposer::new(),
            preview: PreviewController::new(settings.preview_debounce_ms),
            console: ConsoleLog::default(),
            editor: None,
        }
    }

    /// Bind the editor widget. Only the first handle is kept.
    pub fn attach_editor(&mut self, mut editor: Box<dyn EditorHandle>) -> Result<()> {
        if self.editor.is_some() {
            return Err(AppError::Editor("editor handle already attached".into()));
        }
        editor.set_language(self.tabs.active());
        self.editor = Some(editor);
        Ok(())
    }

    // --- Buffers ---

    pub fn buffers(&self) -> &SourceBuffer {
        &self.buffers
    }

    pub fn buffer(&self, language: Language) -> &str {
        self.buffers.get(language)
    }

    /// Replace one buffer and schedule the re-render.
    pub fn set_buffer(&mut self, language: Language, text: &str) -> Schedule {
        if self.buffers.get(language) != text {
            self.buffers = self.buffers.set(language, text);
        }
        self.schedule_render()
    }

    /// Restore the sample program in all three buffers.
    pub fn reset_buffers(&mut self) -> Schedule {
        self.buffers = SourceBuffer::with_defaults();
        self.schedule_render()
    }

    pub fn composed(&mut self) -> ComposedDocument {
        self.composer.compose(&self.buffers)
    }

    // --- Tabs ---

    pub fn active_language(&self) -> Language {
        self.tabs.active()
    }

    pub fn select_language(&mut self, language: Language) -> bool {
        self.tabs.select(language, editor_mut(&mut self.editor))
    }

    /// Reformat the active buffer through the editor.
    pub fn format_active(&mut self) -> Result<()> {
        match editor_mut(&mut self.editor) {
            Some(editor) => editor.format(),
            None => Err(AppError::Editor("no editor attached".into())),
        }
    }

    // --- Preview ---

    pub fn add_surface(&mut self, surface: Box<dyn PreviewSurface>) -> SurfaceId {
        self.preview.add_surface(surface)
    }

    pub fn schedule_render(&mut self) -> Schedule {
        let doc = self.composer.compose(&self.buffers);
        self.preview.schedule(doc)
    }

    pub fn flush_preview(&mut self) -> Option<u64> {
        self.preview.flush()
    }

    pub fn refresh_surface(&mut self, id: SurfaceId) {
        self.preview.refresh(id);
    }

    pub fn set_preview_debounce(&mut self, debounce_ms: u64) {
        self.preview.set_debounce_ms(debounce_ms);
    }

    pub fn preview_revision(&self) -> u64 {
        self.preview.revision()
    }

    // --- Layout ---

    pub fn layout(&self) -> &LayoutSelector {
        &self.layout
    }

    /// Record a window resize. `apply_geometry` moves the widgets; the
    /// editor re-measures right after it.
    pub fn resize(
        &mut self,
        width: i32,
        apply_geometry: impl FnOnce(&LayoutSelector),
    ) -> Option<ViewportClass> {
        let changed = self.layout.resize(width);
        apply_geometry(&self.layout);
        self.relayout_editor();
        if changed == Some(ViewportClass::Wide) {
            self.preview.refresh_all();
        }
        changed
    }

    pub fn drag_divider(
        &mut self,
        x: i32,
        body_x: i32,
        body_w: i32,
        apply_geometry: impl FnOnce(&LayoutSelector),
    ) {
        self.layout.drag_divider(x, body_x, body_w);
        apply_geometry(&self.layout);
        self.relayout_editor();
    }

    /// Open the overlay preview (narrow mode only). The overlay surface
    /// should report visible once this returns true.
    pub fn open_overlay(&mut self) -> bool {
        let opened = self.layout.open_overlay();
        if opened {
            // Edits made while the overlay was closed may still be pending.
            if self.preview.has_pending() {
                self.preview.flush();
            }
            self.preview.refresh_all();
        }
        opened
    }

    pub fn close_overlay(&mut self) -> bool {
        self.layout.close_overlay()
    }

    fn relayout_editor(&mut self) {
        if let Some(editor) = editor_mut(&mut self.editor) {
            editor.relayout();
        }
    }

    // --- Console ---

    pub fn receive(&mut self, msg: &PreviewMessage) -> &ConsoleEntry {
        if msg.is_error() {
            log::debug!("preview reported: {msg}");
        }
        self.console.push(msg)
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }
}

fn editor_mut(editor: &mut Option<Box<dyn EditorHandle>>) -> Option<&mut dyn EditorHandle> {
    editor.as_mut().map(|e| e.as_mut() as &mut dyn EditorHandle)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::app::controllers::preview::tests::RecordingSurface;
    use crate::app::controllers::tabs::tests::MockEditor;
    use crate::app::domain::ConsoleMethod;
    use crate::app::domain::buffers::{DEFAULT_MARKUP, DEFAULT_SCRIPT, DEFAULT_STYLE};
    use crate::app::services::static_html;

    fn immediate_settings() -> AppSettings {
        AppSettings {
            preview_debounce_ms: 0,
            ..Default::default()
        }
    }

    /// Session with a mock editor and a recording surface that is visible
    /// only in wide mode, like the docked panel.
    fn session_at(width: i32) -> (Session, MockEditor, RecordingSurface) {
        let mut session = Session::new(&immediate_settings(), width);
        let editor = MockEditor::default();
        session.attach_editor(Box::new(editor.clone())).unwrap();
        let surface = RecordingSurface::default();
        surface.hidden.set(width < 1024);
        session.add_surface(Box::new(surface.clone()));
        (session, editor, surface)
    }

    fn render(session: &mut Session) {
        if session.schedule_render() == Schedule::FlushNow {
            session.flush_preview();
        }
    }

    #[test]
    fn test_write_read_fidelity() {
        let (mut session, _, _) = session_at(1200);
        for language in Language::ALL {
            let before: Vec<String> =
                Language::ALL.iter().map(|l| session.buffer(*l).to_string()).collect();
            let text = format!("text for {}\n\twith ünïcode", language.id());
            session.set_buffer(language, &text);
            assert_eq!(session.buffer(language), text);
            for other in Language::ALL.iter().filter(|l| **l != language) {
                assert_eq!(session.buffer(*other), before[other.index()]);
            }
        }
    }

    #[test]
    fn test_set_buffer_shares_untouched_entries() {
        let (mut session, _, _) = session_at(1200);
        let before = session.buffers().clone();
        session.set_buffer(Language::Style, "p {}");
        assert!(session.buffers().shares_entry(&before, Language::Markup));
        assert!(session.buffers().shares_entry(&before, Language::Script));
        assert!(!session.buffers().shares_entry(&before, Language::Style));
    }

    #[test]
    fn test_initial_render_contains_all_defaults() {
        let (mut session, _, surface) = session_at(1200);
        for language in Language::ALL {
            assert!(!session.buffer(language).is_empty());
        }
        render(&mut session);

        let loads = surface.loads.borrow();
        let doc = loads.last().unwrap().as_str();
        assert!(doc.contains(DEFAULT_MARKUP));
        assert!(doc.contains(DEFAULT_STYLE));
        assert!(doc.contains(DEFAULT_SCRIPT));
        assert!(static_html::project(doc).contains("<h1>Hello World!</h1>"));
    }

    #[test]
    fn test_throwing_script_does_not_disturb_host() {
        let (mut session, _, surface) = session_at(1200);
        session.set_buffer(Language::Script, "throw new Error('boom');");
        session.flush_preview();

        let loads = surface.loads.borrow();
        let doc = loads.last().unwrap();
        assert!(doc.as_str().contains("throw new Error('boom');"));
        assert!(static_html::project(doc.as_str()).contains("<h1>Hello World!</h1>"));
    }

    #[test]
    fn test_markup_appears_once_unescaped() {
        let (mut session, _, surface) = session_at(1200);
        session.set_buffer(Language::Markup, "<b>hi</b>");
        session.flush_preview();
        let loads = surface.loads.borrow();
        let doc = loads.last().unwrap().as_str();
        assert_eq!(doc.matches("<b>hi</b>").count(), 1);
    }

    #[test]
    fn test_select_language_drives_editor() {
        let (mut session, editor, _) = session_at(1200);
        assert_eq!(*editor.language.borrow(), Some(Language::Markup));
        for language in [Language::Script, Language::Style, Language::Markup] {
            session.select_language(language);
            assert_eq!(session.active_language(), language);
            assert_eq!(*editor.language.borrow(), Some(language));
        }
    }

    #[test]
    fn test_tab_switch_does_not_recompose() {
        let (mut session, _, surface) = session_at(1200);
        render(&mut session);
        let revision = session.preview_revision();
        session.select_language(Language::Script);
        assert_eq!(session.preview_revision(), revision);
        assert_eq!(surface.loads.borrow().len(), 1);
    }

    #[test]
    fn test_resize_wide_to_narrow_keeps_buffers() {
        let (mut session, editor, _) = session_at(1200);
        session.set_buffer(Language::Markup, "<i>kept</i>");
        session.set_buffer(Language::Script, "let kept = 1;");
        let before = session.buffers().clone();
        assert_eq!(session.layout().class(), ViewportClass::Wide);

        let changed = session.resize(800, |_| {});
        assert_eq!(changed, Some(ViewportClass::Narrow));
        assert_eq!(session.layout().class(), ViewportClass::Narrow);
        assert!(!session.layout().docked_visible());
        assert!(!session.layout().overlay_open());
        assert!(session.buffers().same_as(&before));
        assert_eq!(session.buffer(Language::Markup), "<i>kept</i>");
        assert!(editor.calls.borrow().contains(&"relayout".to_string()));

        assert!(session.open_overlay());
        assert!(session.layout().overlay_open());
    }

    #[test]
    fn test_relayout_runs_after_geometry_update() {
        let (mut session, editor, _) = session_at(1200);
        editor.calls.borrow_mut().clear();
        let calls = editor.calls.clone();
        session.resize(1300, |_| calls.borrow_mut().push("geometry".into()));
        let calls = editor.calls.clone();
        session.drag_divider(400, 0, 1000, |layout| {
            calls.borrow_mut().push(format!("geometry:{}", layout.editor_width(1000)));
        });
        assert_eq!(
            editor.calls.borrow().as_slice(),
            ["geometry", "relayout", "geometry:400", "relayout"]
        );
    }

    #[test]
    fn test_overlay_open_shows_latest_document() {
        let settings = AppSettings::default();
        let mut session = Session::new(&settings, 800);
        let overlay = RecordingSurface::default();
        overlay.hidden.set(true);
        session.add_surface(Box::new(overlay.clone()));

        // Debounced edit: nothing rendered yet.
        assert!(matches!(
            session.set_buffer(Language::Markup, "<p>late</p>"),
            Schedule::StartTimer(_)
        ));
        overlay.hidden.set(false);
        assert!(session.open_overlay());

        let loads = overlay.loads.borrow();
        assert_eq!(loads.len(), 1);
        assert!(loads[0].as_str().contains("<p>late</p>"));
    }

    #[test]
    fn test_widening_closes_overlay_and_refreshes_docked() {
        let mut session = Session::new(&immediate_settings(), 800);
        let docked = RecordingSurface::default();
        docked.hidden.set(true);
        session.add_surface(Box::new(docked.clone()));
        render(&mut session);
        session.open_overlay();
        assert!(docked.loads.borrow().is_empty());

        let hidden = docked.hidden.clone();
        session.resize(1400, |layout| hidden.set(!layout.docked_visible()));
        assert!(!session.layout().overlay_open());
        assert_eq!(docked.loads.borrow().len(), 1);
    }

    #[test]
    fn test_format_goes_through_editor() {
        let (mut session, editor, _) = session_at(1200);
        session.format_active().unwrap();
        assert!(editor.calls.borrow().contains(&"format".to_string()));

        let mut session = Session::new(&immediate_settings(), 1200);
        assert!(matches!(session.format_active(), Err(AppError::Editor(_))));
        let failing = MockEditor {
            fail_format: true,
            ..Default::default()
        };
        session.attach_editor(Box::new(failing)).unwrap();
        assert!(matches!(session.format_active(), Err(AppError::Format(_))));
    }

    #[test]
    fn test_editor_attaches_once() {
        let (mut session, _, _) = session_at(1200);
        assert!(matches!(
            session.attach_editor(Box::new(MockEditor::default())),
            Err(AppError::Editor(_))
        ));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (mut session, _, _) = session_at(1200);
        session.set_buffer(Language::Style, "");
        session.reset_buffers();
        assert_eq!(session.buffer(Language::Style), DEFAULT_STYLE);
    }

    #[test]
    fn test_console_messages_are_logged() {
        let (mut session, _, _) = session_at(1200);
        let entry = session
            .receive(&PreviewMessage::Console {
                method: ConsoleMethod::Log,
                args: vec!["Welcome to CodeBench!".into()],
            })
            .clone();
        assert_eq!(entry.text, "log: Welcome to CodeBench!");
        assert_eq!(session.console().len(), 1);
        session.clear_console();
        assert!(session.console().is_empty());
    }

    #[test]
    fn test_rapid_edits_render_final_state() {
        let mut session = Session::new(&AppSettings::default(), 1200);
        let surface = RecordingSurface::default();
        session.add_surface(Box::new(surface.clone()));
        let mut timers = 0;
        let mut text = String::new();
        for ch in "hello".chars() {
            text.push(ch);
            if let Schedule::StartTimer(_) = session.set_buffer(Language::Markup, &text) {
                timers += 1;
            }
        }
        session.flush_preview();
        assert_eq!(timers, 1);
        let loads = surface.loads.borrow();
        assert_eq!(loads.len(), 1);
        assert!(loads[0].as_str().contains("hello"));
    }
}
