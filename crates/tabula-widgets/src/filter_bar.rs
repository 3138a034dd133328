//! Row of per-column filter buttons, each opening a descriptive menu.
//!
//! The bar does not filter data. It only tracks which menu is open. A single
//! `active` key owned by the bar is the only popover state, and whoever embeds
//! the bar closes it through [`FilterBar::dismiss`].

use crate::header::{ColumnHeader, ColumnType};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tabula_core::command::Command;
use tabula_core::component::Component;

/// The kind of form a filter menu offers for a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterForm {
    /// Pick a date range.
    DateRange,
    /// Compare with eq, lt, gt.
    NumberComparison,
    /// Search and multi-select text values.
    TextSearch,
}

impl FilterForm {
    /// Form for a declared column type.
    pub fn for_type(column_type: Option<ColumnType>) -> Self {
        match column_type {
            Some(ColumnType::Date) => FilterForm::DateRange,
            Some(ColumnType::Number) => FilterForm::NumberComparison,
            _ => FilterForm::TextSearch,
        }
    }

    /// Short description shown inside the open menu.
    pub fn description(self) -> &'static str {
        match self {
            FilterForm::DateRange => "Date range",
            FilterForm::NumberComparison => "Number eq, lt, gt",
            FilterForm::TextSearch => "String search multiselect",
        }
    }
}

/// One button on the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    /// Column label.
    pub label: String,
    /// Column key; identifies the menu.
    pub key: String,
    /// Form shown when the menu is open.
    pub form: FilterForm,
}

/// Messages for the filter bar.
#[derive(Debug, Clone)]
pub enum Message {
    /// Open the menu for a column key, or close it if it is already open.
    Toggle(String),
    /// Close whatever menu is open.
    Dismiss,
}

/// Style configuration for the filter bar.
#[derive(Debug, Clone)]
pub struct FilterBarStyle {
    /// Closed buttons.
    pub button: Style,
    /// The button whose menu is open.
    pub active: Style,
    /// The menu line.
    pub menu: Style,
}

impl Default for FilterBarStyle {
    fn default() -> Self {
        Self {
            button: Style::default().fg(Color::Gray),
            active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            menu: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Filter buttons for every filterable column.
pub struct FilterBar {
    buttons: Vec<FilterButton>,
    active: Option<String>,
    style: FilterBarStyle,
}

impl FilterBar {
    /// Build buttons for the headers whose `filterable` flag is set, in order.
    pub fn new(headers: &[ColumnHeader]) -> Self {
        Self {
            buttons: filter_buttons(headers),
            active: None,
            style: FilterBarStyle::default(),
        }
    }

    /// Set the filter bar style.
    pub fn with_style(mut self, style: FilterBarStyle) -> Self {
        self.style = style;
        self
    }

    /// Rebuild the buttons. An open menu stays open only if its column is
    /// still filterable.
    pub fn set_headers(&mut self, headers: &[ColumnHeader]) {
        self.buttons = filter_buttons(headers);
        if let Some(key) = &self.active {
            if !self.buttons.iter().any(|b| &b.key == key) {
                self.active = None;
            }
        }
    }

    /// The buttons, in header order.
    pub fn buttons(&self) -> &[FilterButton] {
        &self.buttons
    }

    /// Key of the open menu, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether the menu for `key` is open.
    pub fn is_open(&self, key: &str) -> bool {
        self.active.as_deref() == Some(key)
    }

    /// The button whose menu is open.
    pub fn active_button(&self) -> Option<&FilterButton> {
        let key = self.active.as_deref()?;
        self.buttons.iter().find(|b| b.key == key)
    }

    /// Open the menu for `key`, or close it if it is the open one. Unknown
    /// keys are ignored.
    pub fn toggle(&mut self, key: &str) {
        if !self.buttons.iter().any(|b| b.key == key) {
            log::warn!("filter bar: no filterable column {key:?}");
            return;
        }
        self.active = if self.is_open(key) {
            None
        } else {
            Some(key.to_string())
        };
        log::debug!("filter bar: active menu {:?}", self.active);
    }

    /// Close any open menu.
    pub fn dismiss(&mut self) {
        if self.active.take().is_some() {
            log::debug!("filter bar: menu dismissed");
        }
    }

    /// Rows needed to draw the bar: one for buttons, one more while a menu is
    /// open.
    pub fn height(&self) -> u16 {
        if self.active.is_some() {
            2
        } else {
            1
        }
    }
}

fn filter_buttons(headers: &[ColumnHeader]) -> Vec<FilterButton> {
    headers
        .iter()
        .filter(|h| h.filterable)
        .map(|h| FilterButton {
            label: h.label.clone(),
            key: h.key().to_string(),
            form: FilterForm::for_type(h.data.column_type),
        })
        .collect()
}

impl Component for FilterBar {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Toggle(key) => self.toggle(&key),
            Message::Dismiss => self.dismiss(),
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 || self.buttons.is_empty() {
            return;
        }

        let mut spans = Vec::with_capacity(self.buttons.len() * 2);
        for (i, b) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if self.is_open(&b.key) {
                self.style.active
            } else {
                self.style.button
            };
            spans.push(Span::styled(format!("[{} ▾]", b.label), style));
        }
        let mut lines = vec![Line::from(spans)];

        if let Some(b) = self.active_button() {
            lines.push(Line::from(Span::styled(
                format!("  {}: {}", b.label, b.form.description()),
                self.style.menu,
            )));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}
