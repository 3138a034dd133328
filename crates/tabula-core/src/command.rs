use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Work a component hands back to its host from
/// [`Component::update`](crate::Component::update).
///
/// `update` itself never waits. A settle delay, for example, is returned as a
/// future; the host polls it and feeds the message it yields back into
/// `update`.
///
/// # Examples
///
/// ```rust,ignore
/// // Nothing to do.
/// let cmd = Command::none();
///
/// // Re-enter update right away.
/// let cmd = Command::message(Msg::NextPage);
///
/// // Re-enter update once the future resolves.
/// let cmd = Command::perform(
///     tokio::time::sleep(Duration::from_millis(100)),
///     |()| Msg::Settled,
/// );
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Message(Msg),
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
}

type Lift<Msg, NewMsg> = Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>;

impl<Msg: Send + 'static> Command<Msg> {
    fn wrap(inner: CommandInner<Msg>) -> Self {
        Command { inner }
    }

    /// A command that does nothing.
    pub fn none() -> Self {
        Self::wrap(CommandInner::None)
    }

    /// Deliver `msg` on the next update cycle.
    pub fn message(msg: Msg) -> Self {
        Self::wrap(CommandInner::Message(msg))
    }

    /// Await `future`, then deliver `to_msg` of its output.
    pub fn perform<F, T>(future: F, to_msg: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::wrap(CommandInner::Future(Box::pin(async move {
            to_msg(future.await)
        })))
    }

    /// Several independent commands. Empty and single-element inputs collapse
    /// to `none()` and the element itself.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        if cmds.len() > 1 {
            return Self::wrap(CommandInner::Batch(cmds));
        }
        cmds.pop().unwrap_or_else(Command::none)
    }

    /// Lift the message type, typically into a parent's message enum.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.lift(Arc::new(f))
    }

    fn lift<NewMsg: Send + 'static>(self, f: Lift<Msg, NewMsg>) -> Command<NewMsg> {
        let inner = match self.inner {
            CommandInner::None => CommandInner::None,
            CommandInner::Message(msg) => CommandInner::Message(f(msg)),
            CommandInner::Future(fut) => {
                CommandInner::Future(Box::pin(async move { f(fut.await) }))
            }
            CommandInner::Batch(cmds) => CommandInner::Batch(
                cmds.into_iter().map(|c| c.lift(Arc::clone(&f))).collect(),
            ),
        };
        Command { inner }
    }

    /// True for `none()`.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// True if any part of the command still has to be awaited.
    pub fn is_pending(&self) -> bool {
        match &self.inner {
            CommandInner::Future(_) => true,
            CommandInner::Batch(cmds) => cmds.iter().any(Command::is_pending),
            CommandInner::None | CommandInner::Message(_) => false,
        }
    }

    /// The message, if this is an immediate one.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Message(msg) => Some(msg),
            _ => None,
        }
    }
}
