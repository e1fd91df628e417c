use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use slog::warn;

use crate::actor::channel::{DeadLetter, Publish};
use crate::actor::props::{ActorArgs, ActorFactory, ActorFactoryArgs};
use crate::actor::supervisor::RestartStatistics;
use crate::actor::{
    Actor, ActorPath, ActorRef, ActorRefFactory, ActorReference, ActorSelection,
    ActorSelectionFactory, ActorUri, BasicActorRef, BoxActorProd, CreateError, MsgError,
    MsgResult, Props, Sender, Strategy, Tell, TmpActorRefFactory,
};
use crate::kernel::kernel_ref::{dispatch_any, KernelRef};
use crate::kernel::mailbox::{AnySender, MailboxSender};
use crate::system::{ActorSystem, Continuation, Run, ScheduleId, SystemCmd, SystemMsg};
use crate::validate::InvalidPath;
use crate::{AnyMessage, Envelope, Message};

/// Ordering mirrors the actor's valid lifecycle transitions: `None` before
/// a mailbox exists, `Alive` while running, `Restarting`/`Stopping` while a
/// child-draining sequence is in progress, `Stopped` once terminal.
/// `Restarting` is the only state permitted to move backwards, to `Alive`,
/// on re-incarnation; every other transition is monotonic.
#[repr(usize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Lifecycle {
    None = 0,
    Alive = 1,
    Restarting = 2,
    Stopping = 3,
    Stopped = 4,
}

impl Lifecycle {
    fn from_usize(v: usize) -> Lifecycle {
        match v {
            0 => Lifecycle::None,
            1 => Lifecycle::Alive,
            2 => Lifecycle::Restarting,
            3 => Lifecycle::Stopping,
            _ => Lifecycle::Stopped,
        }
    }
}

#[derive(Clone)]
struct Children {
    actors: Arc<RwLock<HashMap<String, BasicActorRef>>>,
}

impl Children {
    fn new() -> Children {
        Children {
            actors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn add(&self, actor: BasicActorRef) {
        self.actors
            .write()
            .unwrap()
            .insert(actor.name().to_string(), actor);
    }

    fn remove(&self, name: &str) {
        self.actors.write().unwrap().remove(name);
    }

    fn count(&self) -> usize {
        self.actors.read().unwrap().len()
    }

    fn iter(&self) -> impl Iterator<Item = BasicActorRef> {
        self.actors
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
    }
}

struct ActorCellInner {
    uri: ActorUri,
    parent: Option<BasicActorRef>,
    children: Children,
    status: AtomicUsize,
    kernel: Mutex<Option<KernelRef>>,
    any_sender: Arc<dyn AnySender>,
    sys_sender: MailboxSender<SystemMsg>,
    system: ActorSystem,
    restart_stats: Mutex<HashMap<String, RestartStatistics>>,
    watchers: Mutex<HashMap<String, BasicActorRef>>,
}

/// The type-erased half of an actor's execution context: everything that
/// does not depend on the actor's message type. `BasicActorRef` wraps one
/// of these directly; `ExtendedCell<Msg>` wraps one plus the typed
/// mailbox sender.
#[derive(Clone)]
pub struct ActorCell {
    inner: Arc<ActorCellInner>,
}

impl ActorCell {
    pub fn new(
        uri: ActorUri,
        parent: Option<BasicActorRef>,
        sys: &ActorSystem,
        any_sender: Arc<dyn AnySender>,
        sys_sender: MailboxSender<SystemMsg>,
    ) -> ActorCell {
        ActorCell {
            inner: Arc::new(ActorCellInner {
                uri,
                parent,
                children: Children::new(),
                status: AtomicUsize::new(Lifecycle::None as usize),
                kernel: Mutex::new(None),
                any_sender,
                sys_sender,
                system: sys.clone(),
                restart_stats: Mutex::new(HashMap::new()),
                watchers: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn uri(&self) -> &ActorUri {
        &self.inner.uri
    }

    pub fn path(&self) -> &ActorPath {
        &self.inner.uri.path
    }

    pub fn name(&self) -> &str {
        &self.inner.uri.name
    }

    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    pub fn parent(&self) -> BasicActorRef {
        self.inner
            .parent
            .clone()
            .unwrap_or_else(|| panic!("root actor has no parent"))
    }

    pub fn user_root(&self) -> BasicActorRef {
        self.inner.system.user_root().clone()
    }

    pub fn has_children(&self) -> bool {
        self.inner.children.count() > 0
    }

    pub fn is_child(&self, actor: &BasicActorRef) -> bool {
        self.inner.children.iter().any(|c| c.path() == actor.path())
    }

    pub fn children(&self) -> Box<dyn Iterator<Item = BasicActorRef>> {
        Box::new(self.inner.children.iter())
    }

    pub(crate) fn add_child(&self, actor: BasicActorRef) {
        self.inner.children.add(actor);
    }

    pub(crate) fn kernel(&self) -> KernelRef {
        self.inner
            .kernel
            .lock()
            .unwrap()
            .clone()
            .expect("actor cell used before kernel was attached")
    }

    pub(crate) fn set_kernel(&self, kernel: KernelRef) {
        *self.inner.kernel.lock().unwrap() = Some(kernel);
    }

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_usize(self.inner.status.load(Ordering::SeqCst))
    }

    fn set_lifecycle(&self, state: Lifecycle) {
        self.inner.status.store(state as usize, Ordering::SeqCst);
    }

    pub fn send_sys_msg(&self, msg: Envelope<SystemMsg>) -> MsgResult<Envelope<SystemMsg>> {
        self.inner
            .sys_sender
            .try_enqueue(msg)
            .map_err(|e| MsgError::new(e.msg))?;

        if !self.inner.sys_sender.is_scheduled() {
            self.inner.sys_sender.set_scheduled(true);
            self.kernel().schedule(&self.inner.system);
        }
        Ok(())
    }

    pub fn send_any_msg(&self, msg: &mut AnyMessage, sender: Sender) -> Result<(), ()> {
        dispatch_any(msg, sender, &self.inner.any_sender, &self.kernel(), &self.inner.system)
            .map_err(|_| ())
    }

    /// Invoked when a `SystemCmd` reaches this actor's mailbox.
    pub(crate) fn receive_cmd<A: Actor>(&self, cmd: SystemCmd, actor: &mut Option<A>) {
        match cmd {
            SystemCmd::Stop => self.terminate(actor),
            SystemCmd::Restart => self.restart(),
        }
    }

    pub(crate) fn terminate<A: Actor>(&self, actor: &mut Option<A>) {
        self.set_lifecycle(Lifecycle::Stopping);

        if self.inner.children.count() == 0 {
            self.kernel().terminate(&self.inner.system);
            self.set_lifecycle(Lifecycle::Stopped);
            post_stop(actor);
        } else {
            for child in self.inner.children.iter() {
                child.sys_tell(SystemCmd::Stop.into());
            }
        }
    }

    pub(crate) fn restart(&self) {
        if self.inner.children.count() == 0 {
            self.set_lifecycle(Lifecycle::Alive);
            self.kernel().restart(&self.inner.system);
        } else {
            self.set_lifecycle(Lifecycle::Restarting);
            for child in self.inner.children.iter() {
                child.sys_tell(SystemCmd::Stop.into());
            }
        }
    }

    /// A child terminated: drop it from the children set, and if this
    /// cell was waiting on that drain to finish its own stop/restart,
    /// complete it now.
    pub(crate) fn death_watch<A: Actor>(&self, terminated: &BasicActorRef, actor: &mut Option<A>) {
        if self.is_child(terminated) {
            self.inner.children.remove(terminated.name());

            if self.inner.children.count() == 0 {
                match self.lifecycle() {
                    Lifecycle::Stopping => {
                        self.kernel().terminate(&self.inner.system);
                        self.set_lifecycle(Lifecycle::Stopped);
                        post_stop(actor);
                    }
                    Lifecycle::Restarting => {
                        self.set_lifecycle(Lifecycle::Alive);
                        self.kernel().restart(&self.inner.system);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Registers `watcher` to receive a single `SystemMsg::Terminated` when
    /// this actor stops. If this actor is already stopping or stopped, the
    /// notification is sent immediately instead of being queued.
    pub(crate) fn watch(&self, watcher: BasicActorRef) {
        if self.lifecycle() >= Lifecycle::Stopping {
            let myself = BasicActorRef::new(self.clone());
            watcher.sys_tell(SystemMsg::Terminated(myself));
        } else {
            self.inner
                .watchers
                .lock()
                .unwrap()
                .insert(watcher.path().to_string(), watcher);
        }
    }

    /// Removes `watcher` from this actor's watcher set. A no-op if it was
    /// never watching, or watched and already notified.
    pub(crate) fn unwatch(&self, watcher: &BasicActorRef) {
        self.inner.watchers.lock().unwrap().remove(watcher.path().as_str());
    }

    /// Drains the watcher set, used once at stop finalization to notify
    /// each watcher exactly once.
    pub(crate) fn take_watchers(&self) -> Vec<BasicActorRef> {
        self.inner
            .watchers
            .lock()
            .unwrap()
            .drain()
            .map(|(_, v)| v)
            .collect()
    }

    /// Restart statistics recorded for `child` so far, for actors that want
    /// to apply a `SupervisorStrategy` informed by a child's failure history.
    pub fn restart_stats_for(&self, child: &BasicActorRef) -> RestartStatistics {
        self.inner
            .restart_stats
            .lock()
            .unwrap()
            .get(child.path().as_str())
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn handle_failure(&self, failed: BasicActorRef, strategy: Strategy) {
        self.inner
            .restart_stats
            .lock()
            .unwrap()
            .entry(failed.path().to_string())
            .or_default()
            .fail();

        match strategy {
            Strategy::Resume => failed.sys_tell(SystemMsg::Resume),
            Strategy::Stop => failed.sys_tell(SystemCmd::Stop.into()),
            Strategy::Restart => failed.sys_tell(SystemCmd::Restart.into()),
            Strategy::Escalate => self.escalate_failure(),
        }
    }

    fn escalate_failure(&self) {
        let myself = BasicActorRef::new(self.clone());
        match &self.inner.parent {
            Some(parent) => parent.sys_tell(SystemMsg::Failed(myself)),
            None => warn!(self.inner.system.log(), "Failure escalated past root: {:?}", myself),
        }
    }
}

/// Runs the actor's `post_stop` hook if an instance still exists. The
/// instance is `None` when termination was reached by an escalated
/// supervisor that never got to incarnate one.
fn post_stop<A: Actor>(actor: &mut Option<A>) {
    if let Some(act) = actor.as_mut() {
        act.post_stop();
    }
}

impl fmt::Debug for ActorCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ActorCell[{:?}]", self.uri())
    }
}

impl<Msg: Message> From<ExtendedCell<Msg>> for ActorCell {
    fn from(cell: ExtendedCell<Msg>) -> ActorCell {
        cell.cell
    }
}

/// Messages stashed by the actor while it is deferring processing; they
/// are replayed LIFO (most recently stashed first) the next time the
/// actor unstashes, and survive a restart since the stash lives on the
/// `ExtendedCell` shared across incarnations.
struct Stash<Msg: Message> {
    envelopes: VecDeque<Envelope<Msg>>,
}

impl<Msg: Message> Stash<Msg> {
    fn new() -> Self {
        Stash {
            envelopes: VecDeque::new(),
        }
    }
}

struct ExtendedCellInner<Msg: Message> {
    sender: MailboxSender<Msg>,
    stash: Mutex<Stash<Msg>>,
    receive_timeout: Mutex<Option<(Duration, ScheduleId)>>,
}

/// The typed half of an actor's execution context. Wraps the type-erased
/// `ActorCell` and adds the actor's own mailbox sender plus the
/// per-actor extras (stash, receive-timeout bookkeeping) that only make
/// sense once the actor's message type is known.
#[derive(Clone)]
pub struct ExtendedCell<Msg: Message> {
    inner: Arc<ExtendedCellInner<Msg>>,
    cell: ActorCell,
}

impl<Msg: Message> ExtendedCell<Msg> {
    pub fn new(
        uri: ActorUri,
        parent: Option<BasicActorRef>,
        sys: &ActorSystem,
        any_sender: Arc<dyn AnySender>,
        sys_sender: MailboxSender<SystemMsg>,
        sender: MailboxSender<Msg>,
    ) -> ExtendedCell<Msg> {
        let cell = ActorCell::new(uri, parent, sys, any_sender, sys_sender);

        ExtendedCell {
            inner: Arc::new(ExtendedCellInner {
                sender,
                stash: Mutex::new(Stash::new()),
                receive_timeout: Mutex::new(None),
            }),
            cell,
        }
    }

    /// Attaches the kernel reference once the actor's background task has
    /// been spawned. Returns `self` for chaining at the call site.
    pub fn init(self, kernel: &KernelRef) -> ExtendedCell<Msg> {
        self.cell.set_kernel(kernel.clone());
        self.cell.set_lifecycle(Lifecycle::Alive);
        self
    }

    pub fn uri(&self) -> &ActorUri {
        self.cell.uri()
    }

    pub fn path(&self) -> &ActorPath {
        self.cell.path()
    }

    pub fn is_root(&self) -> bool {
        self.cell.is_root()
    }

    pub fn parent(&self) -> BasicActorRef {
        self.cell.parent()
    }

    pub fn user_root(&self) -> BasicActorRef {
        self.cell.user_root()
    }

    pub fn has_children(&self) -> bool {
        self.cell.has_children()
    }

    pub fn is_child(&self, actor: &BasicActorRef) -> bool {
        self.cell.is_child(actor)
    }

    pub fn children(&self) -> Box<dyn Iterator<Item = BasicActorRef>> {
        self.cell.children()
    }

    pub fn myself(&self) -> ActorRef<Msg> {
        ActorRef::new(self.clone())
    }

    pub fn send_msg(&self, msg: Envelope<Msg>) -> MsgResult<Envelope<Msg>> {
        self.inner
            .sender
            .try_enqueue(msg)
            .map_err(|e| MsgError::new(e.msg))?;

        if !self.inner.sender.is_scheduled() {
            self.inner.sender.set_scheduled(true);
            self.cell.kernel().schedule(&self.cell.inner.system);
        }
        Ok(())
    }

    pub fn send_sys_msg(&self, msg: Envelope<SystemMsg>) -> MsgResult<Envelope<SystemMsg>> {
        self.cell.send_sys_msg(msg)
    }

    pub(crate) fn is_user(&self) -> bool {
        self.cell.uri().path.as_str().starts_with("/user")
    }

    pub(crate) fn receive_cmd<A>(&self, cmd: SystemCmd, actor: &mut Option<A>)
    where
        A: Actor<Msg = Msg>,
    {
        self.cell.receive_cmd(cmd, actor)
    }

    pub(crate) fn terminate<A>(&self, actor: &mut Option<A>)
    where
        A: Actor<Msg = Msg>,
    {
        self.cell.terminate(actor);
    }

    pub(crate) fn restart(&self) {
        self.cell.restart();
    }

    pub(crate) fn death_watch<A>(&self, terminated: &BasicActorRef, actor: &mut Option<A>)
    where
        A: Actor<Msg = Msg>,
    {
        self.cell.death_watch(terminated, actor);
    }

    pub(crate) fn handle_failure(&self, failed: BasicActorRef, strategy: Strategy) {
        self.cell.handle_failure(failed, strategy);
    }

    pub fn restart_stats_for(&self, child: &BasicActorRef) -> RestartStatistics {
        self.cell.restart_stats_for(child)
    }

    /// Stashes an incoming envelope for later replay via `unstash_all`.
    pub(crate) fn stash(&self, envelope: Envelope<Msg>) {
        self.inner.stash.lock().unwrap().envelopes.push_front(envelope);
    }

    /// Returns every stashed envelope, most recently stashed first (LIFO),
    /// clearing the stash.
    pub(crate) fn unstash_all(&self) -> Vec<Envelope<Msg>> {
        self.inner.stash.lock().unwrap().envelopes.drain(..).collect()
    }

    pub(crate) fn set_receive_timeout_id(&self, id: Option<(Duration, ScheduleId)>) {
        *self.inner.receive_timeout.lock().unwrap() = id;
    }

    pub(crate) fn receive_timeout_id(&self) -> Option<(Duration, ScheduleId)> {
        self.inner.receive_timeout.lock().unwrap().clone()
    }
}

impl<Msg: Message> fmt::Debug for ExtendedCell<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ExtendedCell[{:?}]", self.uri())
    }
}

/// Provides context, including the actor system, during actor execution.
///
/// `Context` is passed to an actor's `recv`/`sys_recv`/lifecycle hooks.
/// Operations performed through it act from the current actor's
/// perspective: spawning a child with `ctx.actor_of` creates it under
/// the current actor in the hierarchy.
pub struct Context<Msg: Message> {
    pub myself: ActorRef<Msg>,
    pub system: ActorSystem,
    pub(crate) kernel: KernelRef,
}

impl<Msg: Message> Context<Msg> {
    pub fn myself(&self) -> ActorRef<Msg> {
        self.myself.clone()
    }

    /// Requests that this actor receive `SystemMsg::ReceiveTimeout` if no
    /// user message arrives within `duration`. Pass `None` to cancel a
    /// previously set timeout. The timer re-arms after every delivered
    /// user message. Setting the same duration that is already armed is a
    /// no-op: it neither cancels nor reschedules the running timer.
    pub fn set_receive_timeout(&self, duration: Option<Duration>) {
        let cell = &self.myself.cell;
        let current = cell.receive_timeout_id();

        if let (Some(d), Some((current_d, _))) = (duration, current) {
            if d == current_d {
                return;
            }
        }

        if let Some((_, id)) = current {
            self.system.cancel_schedule(id);
        }

        match duration {
            Some(d) => {
                assert!(!d.is_zero(), "receive timeout duration must be positive");
                let id = self
                    .system
                    .schedule_once(d, self.myself.clone(), None, SystemMsg::ReceiveTimeout);
                cell.set_receive_timeout_id(Some((d, id)));
            }
            None => cell.set_receive_timeout_id(None),
        }
    }

    /// Re-arms the receive-timeout timer after a delivered, influencing
    /// message. Unlike `set_receive_timeout`, this always cancels and
    /// reschedules: the point is to push the deadline forward, not to
    /// leave an identical-duration timer running from before the message.
    pub(crate) fn rearm_receive_timeout(&self) {
        let cell = &self.myself.cell;
        if let Some((d, id)) = cell.receive_timeout_id() {
            self.system.cancel_schedule(id);
            let new_id = self
                .system
                .schedule_once(d, self.myself.clone(), None, SystemMsg::ReceiveTimeout);
            cell.set_receive_timeout_id(Some((d, new_id)));
        }
    }

    /// Registers this actor to receive a `SystemMsg::Terminated(who)` when
    /// `who` stops. If `who` has already stopped, the notification is
    /// delivered immediately rather than being lost.
    pub fn watch(&self, who: &BasicActorRef) {
        who.cell.watch(BasicActorRef::from(self.myself.clone()));
    }

    /// Cancels a previous `watch` of `who`. A no-op if `who` was never
    /// watched, or was watched and has already sent its `Terminated`.
    pub fn unwatch(&self, who: &BasicActorRef) {
        who.cell.unwatch(&BasicActorRef::from(self.myself.clone()));
    }

    /// Restart statistics recorded so far for `child`, for use by a
    /// custom `SupervisorStrategy`.
    pub fn restart_stats_for(&self, child: &BasicActorRef) -> RestartStatistics {
        self.myself.cell.restart_stats_for(child)
    }

    /// Defers the current message: it is recorded and replayed, most
    /// recently stashed first, the next time `unstash_all` is called (or
    /// automatically, after `Started`, once this actor restarts).
    pub fn stash(&self, envelope: Envelope<Msg>) {
        self.myself.cell.stash(envelope);
    }

    /// Replays every stashed message, most recently stashed first (LIFO),
    /// by re-enqueuing it onto this actor's own mailbox.
    pub fn unstash_all(&self) {
        for envelope in self.myself.cell.unstash_all() {
            let _ = self.myself.cell.send_msg(envelope);
        }
    }

    /// Re-sends `msg` to `target`, preserving the original `sender` so the
    /// eventual reply still reaches whoever sent the message in the first
    /// place. Silently does nothing if `target` has no mailbox to accept it.
    pub fn forward<T>(&self, target: &T, msg: Msg, sender: Sender)
    where
        T: Tell<Msg>,
    {
        target.tell(msg, sender);
    }

    /// Sends `response` to `sender`, or to the dead-letter channel if
    /// `sender` is absent (there is no one to reply to).
    pub fn respond<R: Message>(&self, response: R, sender: Sender) {
        match sender {
            Some(sender) => {
                let _ = sender.try_tell(response, self.myself());
            }
            None => {
                let dl = DeadLetter {
                    msg: format!("{:?}", response),
                    sender: None,
                    recipient: BasicActorRef::from(self.myself.clone()),
                };

                self.system.dead_letters().tell(
                    Publish {
                        topic: "dead_letter".into(),
                        msg: dl,
                    },
                    None,
                );
            }
        }
    }

    /// Sends `Stop` to every current child.
    pub fn stop_children(&self) {
        for child in self.myself.children() {
            child.sys_tell(SystemCmd::Stop.into());
        }
    }

    /// Sends `Restart` to every current child.
    pub fn restart_children(&self) {
        for child in self.myself.children() {
            child.sys_tell(SystemCmd::Restart.into());
        }
    }

    /// Resumes every current child that is suspended after a failure,
    /// matching `Strategy::Resume`'s own handling of a single failed child.
    pub fn resume_children(&self) {
        for child in self.myself.children() {
            child.sys_tell(SystemMsg::Resume);
        }
    }

    /// Escalates a failure this actor cannot handle itself: suspends this
    /// actor's mailbox and notifies the parent's supervisor with a
    /// `Failure` system message, exactly as an unhandled panic already
    /// does (there is no separate runtime exception type in Rust to model
    /// escalation with, so this reuses that same panic-and-catch pathway).
    pub fn escalate_failure<E: fmt::Debug>(&self, reason: E, message: &Msg) -> ! {
        panic!("escalated failure: {:?} (message: {:?})", reason, message);
    }

    /// Awaits `future` off this actor's execution thread and, once it
    /// resolves, delivers `continuation` back to this actor as a
    /// `Continuation` system message, so it still runs one-at-a-time with
    /// every other message this actor processes. The await itself never
    /// blocks the mailbox: this actor keeps handling other messages while
    /// `future` is still pending.
    pub fn await_future<Fut, F>(&self, future: Fut, continuation: F)
    where
        Fut: std::future::Future + Send + 'static,
        Fut::Output: Send + 'static,
        F: FnOnce(Fut::Output) + Send + 'static,
    {
        let myself: BasicActorRef = self.myself.clone().into();

        let _ = self.system.run(async move {
            let output = future.await;
            myself.sys_tell(SystemMsg::Continuation(Continuation::new(move || {
                continuation(output)
            })));
        });
    }
}

impl<Msg: Message> ActorRefFactory for Context<Msg> {
    fn actor_of_props<A>(&self, name: &str, props: BoxActorProd<A>) -> Result<ActorRef<A::Msg>, CreateError>
    where
        A: Actor,
    {
        self.system.provider().create_actor(
            props,
            name,
            &BasicActorRef::from(self.myself.clone()),
            &self.system,
        )
    }

    fn actor_of<A>(&self, name: &str) -> Result<ActorRef<<A as Actor>::Msg>, CreateError>
    where
        A: ActorFactory,
    {
        self.actor_of_props(name, Props::new::<A>())
    }

    fn actor_of_args<A, Args>(&self, name: &str, args: Args) -> Result<ActorRef<<A as Actor>::Msg>, CreateError>
    where
        Args: ActorArgs,
        A: ActorFactoryArgs<Args>,
    {
        self.actor_of_props(name, Props::new_args::<A, _>(args))
    }

    fn stop(&self, actor: impl ActorReference) {
        actor.sys_tell(SystemCmd::Stop.into());
    }
}

impl<Msg: Message> TmpActorRefFactory for Context<Msg> {
    fn tmp_actor_of_props<A>(&self, props: BoxActorProd<A>) -> Result<ActorRef<A::Msg>, CreateError>
    where
        A: Actor,
    {
        self.system
            .provider()
            .create_actor(props, &self.system.next_temp_name(), self.system.temp_root(), &self.system)
    }
}

impl<Msg: Message> ActorSelectionFactory for Context<Msg> {
    fn select(&self, path: &str) -> Result<ActorSelection, InvalidPath> {
        ActorSelection::new(BasicActorRef::from(self.myself.clone()), path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Lifecycle;

    #[test]
    fn lifecycle_ordering_is_monotonic() {
        assert!(Lifecycle::None < Lifecycle::Alive);
        assert!(Lifecycle::Alive < Lifecycle::Restarting);
        assert!(Lifecycle::Restarting < Lifecycle::Stopping);
        assert!(Lifecycle::Stopping < Lifecycle::Stopped);
    }

    #[test]
    fn stopping_and_stopped_are_at_or_past_stopping() {
        assert!(Lifecycle::Stopping >= Lifecycle::Stopping);
        assert!(Lifecycle::Stopped >= Lifecycle::Stopping);
        assert!(Lifecycle::Restarting < Lifecycle::Stopping);
    }
}
