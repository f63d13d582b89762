use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    draw,
    enums::{Align, Color, Event, Font},
    prelude::*,
    widget::Widget,
};

use crate::app::document::{Document, DocumentId};
use crate::app::messages::Message;

pub const TAB_BAR_HEIGHT: i32 = 30;

const MIN_TAB_WIDTH: i32 = 60;
const MAX_TAB_WIDTH: i32 = 200;
const CLOSE_BTN_SIZE: i32 = 14;
const CLOSE_BTN_MARGIN: i32 = 6;
const DIRTY_DOT_SIZE: i32 = 7;
const TAB_GAP: i32 = 1;
const PLUS_BTN_WIDTH: i32 = 28;

struct TabInfo {
    id: DocumentId,
    display_name: String,
    is_dirty: bool,
    is_active: bool,
}

enum HitResult {
    Tab { index: usize, is_close: bool },
    PlusButton,
    None,
}

struct TabBarState {
    tabs: Vec<TabInfo>,
    tab_width: i32,
    is_dark: bool,
    hover_close: Option<usize>,
    sender: Sender<Message>,
}

/// One visual handle per open document, rebuilt from store snapshots after
/// every coordinator mutation. Holds no state the store doesn't have.
pub struct TabBar {
    pub widget: Widget,
    state: Rc<RefCell<TabBarState>>,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32, sender: Sender<Message>) -> Self {
        let state = Rc::new(RefCell::new(TabBarState {
            tabs: Vec::new(),
            tab_width: MAX_TAB_WIDTH,
            is_dark: false,
            hover_close: None,
            sender,
        }));

        let mut widget = Widget::new(x, y, w, TAB_BAR_HEIGHT, None);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_tab_bar(wid, &st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_tab_bar(wid, event, &handle_state));

        Self { widget, state }
    }

    pub fn rebuild(
        &mut self,
        documents: &[Document],
        active_id: Option<DocumentId>,
        is_dark: bool,
    ) {
        let mut st = self.state.borrow_mut();
        st.is_dark = is_dark;
        st.tabs.clear();
        for doc in documents {
            st.tabs.push(TabInfo {
                id: doc.id,
                display_name: doc.display_name.clone(),
                is_dirty: doc.is_dirty,
                is_active: active_id == Some(doc.id),
            });
        }
        st.hover_close = None;
        st.tab_width = compute_tab_width(self.widget.w(), st.tabs.len());
        drop(st);
        self.widget.redraw();
    }
}

fn compute_tab_width(widget_w: i32, count: usize) -> i32 {
    if count == 0 {
        return MAX_TAB_WIDTH;
    }
    let available = widget_w - PLUS_BTN_WIDTH - TAB_GAP * count as i32;
    (available / count as i32).clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH)
}

fn tab_x(index: usize, tab_width: i32) -> i32 {
    index as i32 * (tab_width + TAB_GAP)
}

fn hit_test(st: &TabBarState, local_x: i32, _local_y: i32) -> HitResult {
    for index in 0..st.tabs.len() {
        let x = tab_x(index, st.tab_width);
        if local_x >= x && local_x < x + st.tab_width {
            let close_x = x + st.tab_width - CLOSE_BTN_SIZE - CLOSE_BTN_MARGIN;
            let is_close = local_x >= close_x;
            return HitResult::Tab { index, is_close };
        }
    }

    let plus_x = tab_x(st.tabs.len(), st.tab_width);
    if local_x >= plus_x && local_x < plus_x + PLUS_BTN_WIDTH {
        return HitResult::PlusButton;
    }
    HitResult::None
}

fn handle_tab_bar(wid: &mut Widget, event: Event, state: &Rc<RefCell<TabBarState>>) -> bool {
    match event {
        Event::Push => {
            let st = state.borrow();
            let local_x = fltk::app::event_x() - wid.x();
            let local_y = fltk::app::event_y() - wid.y();
            match hit_test(&st, local_x, local_y) {
                HitResult::Tab { index, is_close } => {
                    let id = st.tabs[index].id;
                    if is_close {
                        st.sender.send(Message::TabClose(id));
                    } else {
                        st.sender.send(Message::TabSwitch(id));
                    }
                    true
                }
                HitResult::PlusButton => {
                    st.sender.send(Message::FileNewTab);
                    true
                }
                HitResult::None => false,
            }
        }
        Event::Move => {
            let mut st = state.borrow_mut();
            let local_x = fltk::app::event_x() - wid.x();
            let local_y = fltk::app::event_y() - wid.y();
            let hover = match hit_test(&st, local_x, local_y) {
                HitResult::Tab {
                    index,
                    is_close: true,
                } => Some(index),
                _ => None,
            };
            if hover != st.hover_close {
                st.hover_close = hover;
                drop(st);
                wid.redraw();
            }
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            if st.hover_close.is_some() {
                st.hover_close = None;
                drop(st);
                wid.redraw();
            }
            true
        }
        _ => false,
    }
}

struct Palette {
    bar: Color,
    tab: Color,
    active_tab: Color,
    text: Color,
    dirty: Color,
    close: Color,
    close_hover: Color,
}

fn palette(is_dark: bool) -> Palette {
    if is_dark {
        Palette {
            bar: Color::from_rgb(25, 25, 25),
            tab: Color::from_rgb(45, 45, 45),
            active_tab: Color::from_rgb(70, 70, 70),
            text: Color::from_rgb(220, 220, 220),
            dirty: Color::from_rgb(255, 180, 80),
            close: Color::from_rgb(150, 150, 150),
            close_hover: Color::from_rgb(230, 120, 120),
        }
    } else {
        Palette {
            bar: Color::from_rgb(215, 215, 215),
            tab: Color::from_rgb(235, 235, 235),
            active_tab: Color::White,
            text: Color::Black,
            dirty: Color::from_rgb(200, 120, 0),
            close: Color::from_rgb(110, 110, 110),
            close_hover: Color::from_rgb(200, 60, 60),
        }
    }
}

fn draw_tab_bar(wid: &Widget, st: &TabBarState) {
    let colors = palette(st.is_dark);
    let (wx, wy, ww, wh) = (wid.x(), wid.y(), wid.w(), wid.h());
    draw::draw_rect_fill(wx, wy, ww, wh, colors.bar);

    for (index, tab) in st.tabs.iter().enumerate() {
        let x = wx + tab_x(index, st.tab_width);
        let bg = if tab.is_active {
            colors.active_tab
        } else {
            colors.tab
        };
        draw::draw_rect_fill(x, wy, st.tab_width, wh, bg);

        // Dirty dot on the left, title in the middle, close glyph on the right.
        let mut label_x = x + CLOSE_BTN_MARGIN;
        if tab.is_dirty {
            draw::set_draw_color(colors.dirty);
            draw::draw_pie(
                label_x,
                wy + (wh - DIRTY_DOT_SIZE) / 2,
                DIRTY_DOT_SIZE,
                DIRTY_DOT_SIZE,
                0.0,
                360.0,
            );
            label_x += DIRTY_DOT_SIZE + 4;
        }

        let close_x = x + st.tab_width - CLOSE_BTN_SIZE - CLOSE_BTN_MARGIN;
        let label_w = close_x - label_x - 4;

        draw::set_draw_color(colors.text);
        draw::set_font(Font::Helvetica, 12);
        draw::draw_text2(
            &fit_label(&tab.display_name, label_w),
            label_x,
            wy,
            label_w,
            wh,
            Align::Left | Align::Inside,
        );

        let close_color = if st.hover_close == Some(index) {
            colors.close_hover
        } else {
            colors.close
        };
        draw::set_draw_color(close_color);
        draw::set_font(Font::Helvetica, 13);
        draw::draw_text2(
            "\u{00d7}",
            close_x,
            wy,
            CLOSE_BTN_SIZE,
            wh,
            Align::Center,
        );
    }

    let plus_x = wx + tab_x(st.tabs.len(), st.tab_width);
    draw::set_draw_color(colors.text);
    draw::set_font(Font::Helvetica, 14);
    draw::draw_text2("+", plus_x, wy, PLUS_BTN_WIDTH, wh, Align::Center);
}

/// Truncate a label with an ellipsis until it fits the given pixel width.
fn fit_label(name: &str, max_w: i32) -> String {
    let (tw, _) = draw::measure(name, true);
    if tw <= max_w {
        return name.to_string();
    }
    let mut truncated: String = name.to_string();
    while !truncated.is_empty() {
        truncated.pop();
        let candidate = format!("{truncated}\u{2026}");
        let (tw, _) = draw::measure(&candidate, true);
        if tw <= max_w {
            return candidate;
        }
    }
    String::new()
}
