use fltk::{
    app::Sender,
    group::Flex,
    menu::MenuBar,
    misc::HelpView,
    prelude::*,
    text::TextEditor,
    window::Window,
};

use super::tab_bar::{TAB_BAR_HEIGHT, TabBar};
use crate::app::messages::Message;

pub struct MainWidgets {
    pub wind: Window,
    pub menu: MenuBar,
    pub tab_bar: TabBar,
    pub editor: TextEditor,
    pub preview: HelpView,
}

/// Build the single main window: menu bar, tab bar, then a split row with
/// the editing surface on the left and the preview pane on the right.
pub fn build_main_window(sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, 1000, 700, "Untitled - Mendel");
    wind.set_xclass("Mendel");

    let mut flex = Flex::new(0, 0, 1000, 700, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let tab_bar = TabBar::new(0, 30, 1000, sender.clone());
    flex.fixed(&tab_bar.widget, TAB_BAR_HEIGHT);

    let mut split = Flex::new(0, 0, 0, 0, None);
    split.set_type(fltk::group::FlexType::Row);
    let editor = TextEditor::new(0, 0, 0, 0, "");
    let mut preview = HelpView::new(0, 0, 0, 0, "");
    preview.set_text_size(14);
    split.end();

    flex.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        menu,
        tab_bar,
        editor,
        preview,
    }
}
