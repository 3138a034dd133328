use crate::command::{Command, CommandInner};
use crate::component::Component;
use futures::future::BoxFuture;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::collections::VecDeque;

/// A headless test harness that drives a [`Component`] without a real terminal.
///
/// Synchronous commands ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestHarness::drain_messages). Future commands are held
/// until [`settle`](TestHarness::settle) awaits them, which pairs well with
/// `#[tokio::test(start_paused = true)]` so timer-based latency resolves
/// instantly.
///
/// # Example
///
/// ```rust,ignore
/// use tabula_core::testing::TestHarness;
///
/// let mut h = TestHarness::new(DataTable::new(headers, rows));
/// h.send(Message::GoToPage(2));
/// h.drain_messages();
/// assert_eq!(h.component().current_page(), 2);
///
/// let output = h.render_string(60, 12);
/// assert!(output.contains("Showing 11 to 20"));
/// ```
pub struct TestHarness<C: Component> {
    component: C,
    pending_messages: VecDeque<C::Message>,
    pending_futures: VecDeque<BoxFuture<'static, C::Message>>,
}

impl<C: Component> TestHarness<C> {
    /// Wrap a component.
    pub fn new(component: C) -> Self {
        Self {
            component,
            pending_messages: VecDeque::new(),
            pending_futures: VecDeque::new(),
        }
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Any commands returned by `update` are enqueued; nothing they produce is
    /// processed until [`drain_messages`](TestHarness::drain_messages) or
    /// [`settle`](TestHarness::settle) is called.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.collect(cmd);
    }

    /// Process all pending synchronous messages.
    ///
    /// Repeats until no new synchronous messages are generated. Future
    /// commands stay queued.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.pending_messages.pop_front() {
            let cmd = self.component.update(msg);
            self.collect(cmd);
        }
    }

    /// Await every queued future in FIFO order, feeding each result back into
    /// the component, until nothing is left pending.
    pub async fn settle(&mut self) {
        loop {
            self.drain_messages();
            let Some(fut) = self.pending_futures.pop_front() else {
                break;
            };
            let msg = fut.await;
            let cmd = self.component.update(msg);
            self.collect(cmd);
        }
    }

    /// Number of future commands waiting to be awaited.
    pub fn pending_futures(&self) -> usize {
        self.pending_futures.len()
    }

    /// Get a shared reference to the component for assertions.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Get a mutable reference to the component for direct test setup.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Render the component into a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                self.component.view(frame, area);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render the component and return the visible content as a plain string.
    ///
    /// Rows are separated by newlines. Trailing whitespace within each row is
    /// preserved.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn collect(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => self.pending_messages.push_back(msg),
            CommandInner::Future(fut) => self.pending_futures.push_back(fut),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::Latency;
    use ratatui::widgets::Paragraph;
    use ratatui::Frame;
    use std::time::Duration;

    struct Steps {
        log: Vec<String>,
        latency: Latency,
    }

    #[derive(Debug)]
    enum StepMsg {
        Start,
        Step(String),
        Later(String),
    }

    impl Component for Steps {
        type Message = StepMsg;

        fn update(&mut self, msg: StepMsg) -> Command<StepMsg> {
            match msg {
                StepMsg::Start => {
                    self.log.push("started".into());
                    Command::message(StepMsg::Step("auto".into()))
                }
                StepMsg::Step(s) => {
                    self.log.push(s);
                    self.latency.settle(StepMsg::Later("settled".into()))
                }
                StepMsg::Later(s) => {
                    self.log.push(s);
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut Frame, area: Rect) {
            frame.render_widget(Paragraph::new(self.log.join(", ")), area);
        }
    }

    fn steps(latency: Latency) -> TestHarness<Steps> {
        TestHarness::new(Steps {
            log: Vec::new(),
            latency,
        })
    }

    #[test]
    fn drain_follows_message_chains() {
        let mut h = steps(Latency::None);
        h.send(StepMsg::Start);
        assert_eq!(h.component().log, vec!["started"]);
        h.drain_messages();
        assert_eq!(h.component().log, vec!["started", "auto", "settled"]);
    }

    #[test]
    fn drain_leaves_futures_queued() {
        let mut h = steps(Latency::Fixed(Duration::from_millis(100)));
        h.send(StepMsg::Start);
        h.drain_messages();
        assert_eq!(h.component().log, vec!["started", "auto"]);
        assert_eq!(h.pending_futures(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_awaits_futures() {
        let mut h = steps(Latency::Fixed(Duration::from_millis(100)));
        h.send(StepMsg::Start);
        h.settle().await;
        assert_eq!(h.component().log, vec!["started", "auto", "settled"]);
        assert_eq!(h.pending_futures(), 0);
    }

    #[test]
    fn render_string_shows_view() {
        let mut h = steps(Latency::None);
        h.send(StepMsg::Step("hello".into()));
        h.drain_messages();
        let out = h.render_string(30, 1);
        assert!(out.contains("hello, settled"));
    }
}
