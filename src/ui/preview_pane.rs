use std::path::Path;

use fltk::{misc::HelpView, prelude::*};

use crate::app::coordinator::Renderer;
use crate::app::preview::{render_markdown, resolve_asset_paths, wrap_html_for_helpview};

/// Preview renderer bound to the HelpView pane in the main window.
pub struct HelpViewRenderer {
    view: HelpView,
}

impl HelpViewRenderer {
    pub fn new(view: HelpView) -> Self {
        Self { view }
    }
}

impl Renderer for HelpViewRenderer {
    fn render(&mut self, markdown: &str, base_path: Option<&Path>) {
        let html = resolve_asset_paths(&render_markdown(markdown), base_path);
        self.view.set_value(&wrap_html_for_helpview(&html));
    }
}
