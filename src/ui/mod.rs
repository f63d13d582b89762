pub mod editor_surface;
pub mod file_dialogs;
pub mod main_window;
pub mod menu;
pub mod preview_pane;
pub mod tab_bar;
pub mod theme;
