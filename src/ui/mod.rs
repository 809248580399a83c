pub mod code_editor;
pub mod dialogs;
pub mod divider;
pub mod main_window;
pub mod menu;
pub mod preview_overlay;
pub mod preview_panel;
pub mod tab_bar;
pub mod theme;
