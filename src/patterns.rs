//! The `ask` pattern: send a message to an actor and get a `Future` back
//! for its reply, for use from outside any actor context.

use std::sync::{Arc, Mutex};

use futures::channel::oneshot::{channel, Sender as ChannelSender};

use crate::actor::{
    Actor, ActorFactoryArgs, BasicActorRef, Context, Props, Sender, Tell, TmpActorRefFactory,
};
use crate::system::{ActorSystem, Run, RunHandle};
use crate::Message;

/// Sends `msg` to `receiver` and returns a future that resolves to its
/// reply. `receiver`'s actor must, on receiving `msg`, `tell` its reply
/// back to the provided `sender` (a temporary actor created for this
/// single round trip and torn down once it has relayed the reply).
pub fn ask<Msg, R, T>(sys: &ActorSystem, receiver: &T, msg: Msg) -> RunHandle<R>
where
    Msg: Message,
    R: Message,
    T: Tell<Msg>,
{
    let (tx, rx) = channel::<R>();
    let tx = Arc::new(Mutex::new(Some(tx)));

    let props = Props::new_args::<AskActor<R>, _>(tx);
    let actor = sys.tmp_actor_of_props(props).unwrap();
    receiver.tell(msg, Some(actor.into()));

    sys.run(async move { rx.await.expect("ask actor dropped without replying") })
        .unwrap()
}

/// Like `ask`, but addresses the receiver through a type-erased
/// `BasicActorRef`, for callers that only have untyped references handy.
pub fn ask_ref<Msg, R>(sys: &ActorSystem, receiver: &BasicActorRef, msg: Msg) -> RunHandle<R>
where
    Msg: Message,
    R: Message,
{
    let (tx, rx) = channel::<R>();
    let tx = Arc::new(Mutex::new(Some(tx)));

    let props = Props::new_args::<AskActor<R>, _>(tx);
    let actor = sys.tmp_actor_of_props(props).unwrap();
    receiver.try_tell(msg, Some(actor.into())).unwrap();

    sys.run(async move { rx.await.expect("ask actor dropped without replying") })
        .unwrap()
}

struct AskActor<Msg> {
    tx: Arc<Mutex<Option<ChannelSender<Msg>>>>,
}

impl<Msg: Message> ActorFactoryArgs<Arc<Mutex<Option<ChannelSender<Msg>>>>> for AskActor<Msg> {
    fn create_args(tx: Arc<Mutex<Option<ChannelSender<Msg>>>>) -> Self {
        AskActor { tx }
    }
}

impl<Msg: Message> Actor for AskActor<Msg> {
    type Msg = Msg;

    fn recv(&mut self, ctx: &Context<Msg>, msg: Msg, _sender: Sender) {
        if let Ok(mut tx) = self.tx.lock() {
            if let Some(tx) = tx.take() {
                let _ = tx.send(msg);
            }
        }

        ctx.system.stop(ctx.myself());
    }
}
