use crate::command::Command;
use ratatui::layout::Rect;
use ratatui::Frame;

/// A stateful widget driven by messages.
///
/// The host routes each message to [`update`](Component::update), runs the
/// returned [`Command`], and calls [`view`](Component::view) whenever it
/// redraws. A component draws only inside the `area` it is given.
///
/// Embedding one component in another means wrapping the child's messages in
/// a parent variant and lifting the child's commands with [`Command::map`]:
///
/// ```rust,ignore
/// enum AppMsg { Table(data_table::Message) }
///
/// fn update(table: &mut DataTable, msg: AppMsg) -> Command<AppMsg> {
///     match msg {
///         AppMsg::Table(m) => table.update(m).map(AppMsg::Table),
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// Messages this component reacts to.
    type Message: Send + 'static;

    /// Apply `msg` and describe any follow-up work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Draw the current state into `area`.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether keyboard input should be routed here. Defaults to `false`.
    fn focused(&self) -> bool {
        false
    }
}
