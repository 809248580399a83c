use super::language::Language;
use super::preview_message::PreviewMessage;
use super::settings::SyntaxTheme;

/// All messages that can be sent through the FLTK channel.
/// Widget callbacks and background threads send these; the dispatch loop in
/// main hands each one to `AppState::handle`, in arrival order.
#[derive(Debug, Clone)]
pub enum Message {
    // Editing
    BufferEdited(Language),
    SelectLanguage(Language),
    FormatCode,
    ResetCode,

    // Preview pipeline
    FlushPreview,
    OpenPreviewOverlay,
    ClosePreviewOverlay,
    OpenLivePreview,
    Preview(PreviewMessage),
    ToggleConsole,
    ClearConsole,

    // Layout
    WindowResized(i32),
    DividerDragged(i32),

    // View
    ToggleDarkMode,
    ToggleLineNumbers,
    ToggleWordWrap,
    ToggleHighlighting,
    SetFontSize(i32),

    // Settings
    OpenSettings,
    PreviewSyntaxTheme(SyntaxTheme),

    Quit,
}
