use fltk::{app, dialog, prelude::*};

use mendel::app::coordinator::SyncCoordinator;
use mendel::app::messages::Message;
use mendel::app::settings::AppSettings;
use mendel::app::storage::NativeStorage;
use mendel::ui::editor_surface::EditorSurface;
use mendel::ui::main_window::build_main_window;
use mendel::ui::menu::build_menu;
use mendel::ui::preview_pane::HelpViewRenderer;
use mendel::ui::theme::apply_theme;

const EXTERNAL_OPEN_POLL_SECS: f64 = 2.0;

fn main() {
    let mut settings = AppSettings::load();
    let mut dark_mode = settings.dark_mode;

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let mut widgets = build_main_window(&sender);
    build_menu(&mut widgets.menu, &sender, dark_mode);
    widgets.editor.set_text_size(settings.font_size as i32);
    apply_theme(
        &mut widgets.editor,
        &mut widgets.preview,
        &mut widgets.menu,
        &mut widgets.wind,
        dark_mode,
    );
    widgets.wind.show();

    let surface = EditorSurface::new(widgets.editor.clone(), sender.clone());
    let renderer = HelpViewRenderer::new(widgets.preview.clone());
    let mut coordinator = SyncCoordinator::new(NativeStorage::new(), surface, renderer);

    // File handed over on the command line (file-association open). It takes
    // the place of the initial untitled tab.
    if let Some(path) = std::env::args().nth(1) {
        let initial = coordinator.store().active_id();
        match coordinator.open_path(&path) {
            Ok(()) => {
                if let Some(id) = initial {
                    let _ = coordinator.on_close_tab(id);
                }
            }
            Err(e) => dialog::alert_default(&e.to_string()),
        }
    }

    widgets.wind.set_label(&coordinator.window_title());
    widgets.tab_bar.rebuild(
        coordinator.store().documents(),
        coordinator.store().active_id(),
        dark_mode,
    );

    // Low-frequency poll for files requested via the external open hook.
    {
        let sender = sender.clone();
        app::add_timeout3(EXTERNAL_OPEN_POLL_SECS, move |handle| {
            sender.send(Message::PollExternalOpen);
            app::repeat_timeout3(EXTERNAL_OPEN_POLL_SECS, handle);
        });
    }

    while app.wait() {
        let Some(msg) = receiver.recv() else { continue };

        let result = match msg {
            Message::FileNewTab => coordinator.on_new_tab(),
            Message::FileOpen => coordinator.open_dialog_flow(),
            Message::FileSave => coordinator.on_save(),
            Message::FileSaveAs => coordinator.on_save_as(),
            Message::FileQuit => {
                app.quit();
                Ok(())
            }
            Message::TabSwitch(id) => coordinator.on_user_switch(id),
            Message::TabClose(id) => coordinator.on_close_tab(id),
            Message::TabCloseActive => coordinator.on_close_active(),
            Message::EditorChanged => coordinator.on_editor_change(),
            Message::InsertImage => coordinator.on_insert_image(),
            Message::InsertDroppedImage(ref path) => coordinator.insert_image_from(path),
            Message::Export(format) => coordinator.on_export(format),
            Message::ToggleDarkMode => {
                dark_mode = !dark_mode;
                apply_theme(
                    &mut widgets.editor,
                    &mut widgets.preview,
                    &mut widgets.menu,
                    &mut widgets.wind,
                    dark_mode,
                );
                settings.dark_mode = dark_mode;
                if let Err(e) = settings.save() {
                    eprintln!("Failed to save settings: {}", e);
                }
                Ok(())
            }
            Message::PollExternalOpen => coordinator.poll_external_open(),
        };

        if let Err(e) = result {
            dialog::alert_default(&e.to_string());
        }

        widgets.wind.set_label(&coordinator.window_title());
        widgets.tab_bar.rebuild(
            coordinator.store().documents(),
            coordinator.store().active_id(),
            dark_mode,
        );
    }
}
