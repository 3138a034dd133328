//! Paginated, sortable data table over an in-memory row set.
//!
//! Rows live in an arena that is never reordered; sorting permutes a list of
//! indices instead. Page, sort and page-size requests go through a settle
//! delay (see [`Latency`]) and are serialized: while one is in flight the
//! rest queue in arrival order.

use crate::error::TableError;
use crate::filter_bar::{self, FilterBar};
use crate::format::{Cell, CellFormatter};
use crate::header::ColumnHeader;
use crate::key::{Binding, KeyCombination};
use crate::pager::{PageSlot, Pager, PagerStyle};
use crate::sorter::{self, MissingKeys, SortDirection, SortState};
use crate::value::Row;
use chrono::{FixedOffset, Offset, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell as RatatuiCell, Paragraph, Row as RatatuiRow, Table};
use ratatui::Frame;
use std::collections::VecDeque;
use std::time::Duration;
use tabula_core::command::Command;
use tabula_core::component::Component;
use tabula_core::latency::Latency;
use unicode_width::UnicodeWidthStr;

/// Default pause between a request and its commit.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// A page, sort or page-size change waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Show the given 1-based page.
    GoToPage(usize),
    /// Show the page after the current one, if any.
    NextPage,
    /// Show the page before the current one, if any.
    PrevPage,
    /// Show the last page.
    LastPage,
    /// Sort by a column key, flipping direction if it is already sorted.
    SortBy(String),
    /// Change the number of rows per page.
    SetPageSize(usize),
}

/// Messages for the data table component.
#[derive(Debug, Clone)]
pub enum Message {
    /// Request a 1-based page.
    GoToPage(usize),
    /// Request the next page.
    NextPage,
    /// Request the previous page.
    PrevPage,
    /// Request page 1.
    FirstPage,
    /// Request the last page.
    LastPage,
    /// Request a sort by column key.
    SortBy(String),
    /// Request a new page size.
    SetPageSize(usize),
    /// Forwarded to the embedded filter bar.
    Filter(filter_bar::Message),
    /// A key press forwarded to the table for handling.
    KeyPress(KeyEvent),
    /// A request's settle delay elapsed; commit it.
    Settled(Request),
}

/// Behavior options for a [`DataTable`].
///
/// # Example
///
/// ```ignore
/// let opts = TableOptions {
///     limit: 25,
///     latency: Latency::None,
///     ..TableOptions::default()
/// };
/// let table = DataTable::new(headers, rows).with_options(opts);
/// ```
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Rows per page (default: 10).
    pub limit: usize,
    /// Page sizes a host may offer (default: `[15]`).
    pub page_sizes: Vec<usize>,
    /// Settle delay before each request commits (default: 100ms).
    pub latency: Latency,
    /// Placement of rows lacking the sort key (default: last).
    pub missing_keys: MissingKeys,
    /// Offset used to render dates (default: UTC).
    pub date_offset: FixedOffset,
    /// Text for missing cells (default: `-`).
    pub placeholder: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            page_sizes: vec![15],
            latency: Latency::Fixed(DEFAULT_SETTLE),
            missing_keys: MissingKeys::Last,
            date_offset: Utc.fix(),
            placeholder: "-".to_string(),
        }
    }
}

/// Configurable key bindings for the data table.
#[derive(Debug, Clone)]
pub struct DataTableKeyBindings {
    /// Previous page. Default: Left, h
    pub prev_page: Binding,
    /// Next page. Default: Right, l
    pub next_page: Binding,
    /// First page. Default: Home
    pub first_page: Binding,
    /// Last page. Default: End
    pub last_page: Binding,
    /// Select the next column. Default: Tab
    pub next_column: Binding,
    /// Select the previous column. Default: BackTab
    pub prev_column: Binding,
    /// Sort by the selected column. Default: Enter, s
    pub sort: Binding,
}

impl Default for DataTableKeyBindings {
    fn default() -> Self {
        Self {
            prev_page: Binding::new([KeyCode::Left.into(), KeyCombination::from('h')], "Previous page"),
            next_page: Binding::new([KeyCode::Right.into(), KeyCombination::from('l')], "Next page"),
            first_page: Binding::new([KeyCode::Home], "First page"),
            last_page: Binding::new([KeyCode::End], "Last page"),
            next_column: Binding::new([KeyCode::Tab], "Next column"),
            prev_column: Binding::new([KeyCode::BackTab], "Previous column"),
            sort: Binding::new([KeyCode::Enter.into(), KeyCombination::from('s')], "Sort"),
        }
    }
}

/// Style configuration for the data table.
#[derive(Debug, Clone)]
pub struct DataTableStyle {
    /// Header labels.
    pub header: Style,
    /// Header of the column selected for keyboard sorting.
    pub selected_column: Style,
    /// Placeholder cells.
    pub placeholder: Style,
    /// Border when focused.
    pub focused_border: Style,
    /// Border when not focused.
    pub unfocused_border: Style,
    /// The "Showing x to y of z results" line.
    pub summary: Style,
    /// Page buttons.
    pub pager: PagerStyle,
}

impl Default for DataTableStyle {
    fn default() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            selected_column: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            placeholder: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Cyan),
            unfocused_border: Style::default().fg(Color::DarkGray),
            summary: Style::default(),
            pager: PagerStyle {
                page: Style::default(),
                current: Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                ellipsis: Style::default().fg(Color::DarkGray),
                arrow: Style::default(),
                disabled: Style::default().fg(Color::DarkGray),
            },
        }
    }
}

/// A paginated, sortable table with a filter bar.
///
/// # Example
///
/// ```ignore
/// let headers = vec![
///     ColumnHeader::new("Date", "CreatedDateTime").with_type(ColumnType::Date),
///     ColumnHeader::new("Supplier", "SupplierName"),
/// ];
/// let mut table = DataTable::new(headers, rows).with_title("Inventory");
/// table.focus();
/// let cmd = table.update(Message::SortBy("SupplierName".into()));
/// ```
pub struct DataTable {
    headers: Vec<ColumnHeader>,
    rows: Vec<Row>,
    order: Vec<usize>,
    pager: Pager,
    sort: SortState,
    options: TableOptions,
    formatter: CellFormatter,
    filter_bar: FilterBar,
    loading: bool,
    queue: VecDeque<Request>,
    focus: bool,
    selected_col: usize,
    title: String,
    style: DataTableStyle,
    key_bindings: DataTableKeyBindings,
}

impl DataTable {
    /// Create a table on page 1 with default options.
    pub fn new(headers: Vec<ColumnHeader>, rows: Vec<Row>) -> Self {
        let options = TableOptions::default();
        Self {
            filter_bar: FilterBar::new(&headers),
            order: (0..rows.len()).collect(),
            pager: Pager::new(rows.len(), options.limit),
            formatter: formatter_for(&options),
            headers,
            rows,
            sort: SortState::default(),
            options,
            loading: false,
            queue: VecDeque::new(),
            focus: false,
            selected_col: 0,
            title: String::new(),
            style: DataTableStyle::default(),
            key_bindings: DataTableKeyBindings::default(),
        }
    }

    /// Replace the options. Resets paging to page 1.
    ///
    /// A `limit` of 0 is rejected like [`set_page_size`](Self::set_page_size)
    /// would reject it: the current page size is kept.
    pub fn with_options(mut self, mut options: TableOptions) -> Self {
        if options.limit == 0 {
            log::warn!(
                "data table: {}; keeping {} rows per page",
                TableError::InvalidPageSize,
                self.pager.limit()
            );
            options.limit = self.pager.limit();
        }
        self.pager = Pager::new(self.rows.len(), options.limit);
        self.formatter = formatter_for(&options);
        self.options = options;
        self
    }

    /// Set the border title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the style configuration.
    pub fn with_style(mut self, style: DataTableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set custom key bindings.
    pub fn with_key_bindings(mut self, bindings: DataTableKeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    /// Give focus to the table, enabling keyboard navigation.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove focus from the table.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    // ── Derived views ──

    /// Column headers.
    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    /// All rows in their original order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All rows in display (sorted) order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.order.iter().filter_map(|&i| self.rows.get(i))
    }

    /// The rows of the current page, in display order.
    pub fn page_rows(&self) -> Vec<&Row> {
        self.pager
            .slice(&self.order)
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .collect()
    }

    /// Formatted cells of the current page, one inner vector per row.
    pub fn page_cells(&self) -> Vec<Vec<Cell>> {
        self.page_rows()
            .into_iter()
            .map(|row| self.row_cells(row))
            .collect()
    }

    /// Format every column of `row`.
    pub fn row_cells(&self, row: &Row) -> Vec<Cell> {
        self.headers
            .iter()
            .map(|h| self.formatter.format_cell(row, h))
            .collect()
    }

    /// Pagination state.
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Current page (1-based).
    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pager.page_count()
    }

    /// Rows per page.
    pub fn limit(&self) -> usize {
        self.pager.limit()
    }

    /// Page sizes the host may offer.
    pub fn page_sizes(&self) -> &[usize] {
        &self.options.page_sizes
    }

    /// Page-button classification for the current page.
    pub fn page_slots(&self) -> Vec<PageSlot> {
        self.pager.slots()
    }

    /// `(from_record, to_record, total)` for the summary line.
    pub fn record_window(&self) -> (usize, usize, usize) {
        (
            self.pager.from_record(),
            self.pager.to_record(),
            self.pager.total(),
        )
    }

    /// Active sort column and direction.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Whether a request is waiting to settle.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Requests queued behind the one in flight.
    pub fn queued_requests(&self) -> usize {
        self.queue.len()
    }

    /// The embedded filter bar.
    pub fn filter_bar(&self) -> &FilterBar {
        &self.filter_bar
    }

    /// Index of the column selected for keyboard sorting.
    pub fn selected_column(&self) -> usize {
        self.selected_col
    }

    // ── Direct, immediate operations ──

    /// Show `page` immediately.
    pub fn go_to_page(&mut self, page: usize) -> Result<(), TableError> {
        self.pager.set_page(page)?;
        log::debug!("data table: page {page} of {}", self.pager.page_count());
        Ok(())
    }

    /// Sort by `key` immediately and return to page 1.
    ///
    /// Returns the direction applied, or `None` if the column is declared
    /// unsortable. Keys without a header sort as text.
    pub fn sort_by(&mut self, key: &str) -> Option<SortDirection> {
        let header = self.headers.iter().find(|h| h.key() == key);
        if header.is_some_and(|h| !h.sortable) {
            log::warn!("data table: column {key:?} is not sortable");
            return None;
        }
        let column_type = header.map(ColumnHeader::column_type).unwrap_or_default();
        let direction = self.sort.toggle(key);
        sorter::sort_order(
            &self.rows,
            &mut self.order,
            key,
            direction,
            column_type,
            self.options.missing_keys,
        );
        self.pager.first_page();
        log::debug!("data table: sorted by {key:?} {direction:?}");
        Some(direction)
    }

    /// Change the page size immediately and return to page 1.
    pub fn set_page_size(&mut self, limit: usize) -> Result<(), TableError> {
        self.pager.set_limit(limit)?;
        log::debug!("data table: page size {limit}");
        Ok(())
    }

    /// Replace the rows. The active sort is re-applied in its current
    /// direction and paging returns to page 1.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.order = (0..self.rows.len()).collect();
        if let Some(key) = self.sort.key() {
            let column_type = self
                .headers
                .iter()
                .find(|h| h.key() == key)
                .map(ColumnHeader::column_type)
                .unwrap_or_default();
            sorter::sort_order(
                &self.rows,
                &mut self.order,
                key,
                self.sort.direction(),
                column_type,
                self.options.missing_keys,
            );
        }
        self.pager.set_total(self.rows.len());
        self.pager.first_page();
    }

    /// Replace the column headers.
    pub fn set_headers(&mut self, headers: Vec<ColumnHeader>) {
        self.filter_bar.set_headers(&headers);
        self.selected_col = self.selected_col.min(headers.len().saturating_sub(1));
        self.headers = headers;
    }

    // ── Request pipeline ──

    fn request(&mut self, req: Request) -> Command<Message> {
        self.filter_bar.dismiss();
        if !self.loading {
            if let Err(reason) = self.check(&req) {
                log::warn!("data table: ignoring {req:?}: {reason}");
                return Command::none();
            }
        }
        if self.loading {
            log::trace!("data table: queued {req:?}");
            self.queue.push_back(req);
            return Command::none();
        }
        self.loading = true;
        self.options.latency.settle(Message::Settled(req))
    }

    // Requests that can already be seen to fail are dropped before the delay.
    fn check(&self, req: &Request) -> Result<(), String> {
        match req {
            Request::GoToPage(page) if !self.pager.is_valid_page(*page) => {
                Err(TableError::PageOutOfRange {
                    page: *page,
                    page_count: self.pager.page_count(),
                }
                .to_string())
            }
            Request::SetPageSize(0) => Err(TableError::InvalidPageSize.to_string()),
            Request::SortBy(key)
                if self
                    .headers
                    .iter()
                    .any(|h| h.key() == key && !h.sortable) =>
            {
                Err(format!("column {key:?} is not sortable"))
            }
            _ => Ok(()),
        }
    }

    fn commit(&mut self, req: Request) {
        let result = match req {
            Request::GoToPage(page) => self.go_to_page(page),
            Request::NextPage => {
                self.pager.next_page();
                Ok(())
            }
            Request::PrevPage => {
                self.pager.prev_page();
                Ok(())
            }
            Request::LastPage => {
                self.pager.last_page();
                Ok(())
            }
            Request::SortBy(key) => {
                self.sort_by(&key);
                Ok(())
            }
            Request::SetPageSize(limit) => self.set_page_size(limit),
        };
        if let Err(e) = result {
            log::warn!("data table: request failed at commit: {e}");
        }
    }

    fn settled(&mut self, req: Request) -> Command<Message> {
        self.commit(req);
        match self.queue.pop_front() {
            Some(next) => self.options.latency.settle(Message::Settled(next)),
            None => {
                self.loading = false;
                Command::none()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let kb = &self.key_bindings;
        if kb.prev_page.matches(&key) {
            self.request(Request::PrevPage)
        } else if kb.next_page.matches(&key) {
            self.request(Request::NextPage)
        } else if kb.first_page.matches(&key) {
            self.request(Request::GoToPage(1))
        } else if kb.last_page.matches(&key) {
            self.request(Request::LastPage)
        } else if kb.next_column.matches(&key) {
            if !self.headers.is_empty() {
                self.selected_col = (self.selected_col + 1) % self.headers.len();
            }
            Command::none()
        } else if kb.prev_column.matches(&key) {
            if !self.headers.is_empty() {
                self.selected_col = self
                    .selected_col
                    .checked_sub(1)
                    .unwrap_or(self.headers.len() - 1);
            }
            Command::none()
        } else if kb.sort.matches(&key) {
            match self.headers.get(self.selected_col) {
                Some(h) => {
                    let key = h.key().to_string();
                    self.request(Request::SortBy(key))
                }
                None => Command::none(),
            }
        } else {
            Command::none()
        }
    }

    // ── Rendering helpers ──

    fn header_label(&self, header: &ColumnHeader) -> String {
        if self.sort.is_sorted_by(header.key()) {
            format!("{} {}", header.label, self.sort.direction().indicator())
        } else {
            header.label.clone()
        }
    }

    fn column_widths(&self, cells: &[Vec<Cell>]) -> Vec<Constraint> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, h)| {
                let label = self.header_label(h).width();
                let widest = cells
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|c| c.to_string().width())
                    .max()
                    .unwrap_or(0);
                width_constraint(label.max(widest))
            })
            .collect()
    }
}

// Saturates instead of wrapping for absurdly wide content.
fn width_constraint(width: usize) -> Constraint {
    Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
}

fn formatter_for(options: &TableOptions) -> CellFormatter {
    CellFormatter::new()
        .with_offset(options.date_offset)
        .with_placeholder(options.placeholder.clone())
}

impl Component for DataTable {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::GoToPage(page) => self.request(Request::GoToPage(page)),
            Message::NextPage => self.request(Request::NextPage),
            Message::PrevPage => self.request(Request::PrevPage),
            Message::FirstPage => self.request(Request::GoToPage(1)),
            Message::LastPage => self.request(Request::LastPage),
            Message::SortBy(key) => self.request(Request::SortBy(key)),
            Message::SetPageSize(limit) => self.request(Request::SetPageSize(limit)),
            Message::Filter(m) => self.filter_bar.update(m).map(Message::Filter),
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::KeyPress(_) => Command::none(),
            Message::Settled(req) => self.settled(req),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let [bar_area, table_area, footer_area] = Layout::vertical([
            Constraint::Length(self.filter_bar.height()),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.filter_bar.view(frame, bar_area);

        let border_style = if self.focus {
            self.style.focused_border
        } else {
            self.style.unfocused_border
        };
        let mut title = self.title.clone();
        if self.loading {
            if !title.is_empty() {
                title.push(' ');
            }
            title.push_str("Loading…");
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let header_cells: Vec<RatatuiCell> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, h)| {
                let style = if self.focus && col == self.selected_col {
                    self.style.selected_column
                } else {
                    self.style.header
                };
                RatatuiCell::from(self.header_label(h)).style(style)
            })
            .collect();

        let cells = self.page_cells();
        let widths = self.column_widths(&cells);
        let rows: Vec<RatatuiRow> = cells
            .into_iter()
            .map(|row| {
                RatatuiRow::new(row.into_iter().map(|cell| {
                    let style = if cell.is_placeholder() {
                        self.style.placeholder
                    } else {
                        Style::default()
                    };
                    let line = Line::from(cell.to_string()).alignment(cell.alignment);
                    RatatuiCell::from(line).style(style)
                }))
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(RatatuiRow::new(header_cells))
            .block(block)
            .column_spacing(2);
        frame.render_widget(table, table_area);

        let (from, to, total) = self.record_window();
        let nav = self.pager.nav_line(&self.style.pager);
        let [summary_area, nav_area] = Layout::horizontal([
            Constraint::Fill(1),
            width_constraint(nav.width()),
        ])
        .areas(footer_area);
        frame.render_widget(
            Paragraph::new(format!("Showing {from} to {to} of {total} results"))
                .style(self.style.summary),
            summary_area,
        );
        frame.render_widget(Paragraph::new(nav), nav_area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
