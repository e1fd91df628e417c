use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct Ping;

#[derive(Clone, Debug)]
pub struct Pong;

struct Responder;

impl ActorFactory for Responder {
    fn create() -> Self {
        Responder
    }
}

impl Actor for Responder {
    type Msg = Ping;

    fn recv(&mut self, ctx: &Context<Self::Msg>, _msg: Self::Msg, sender: Sender) {
        ctx.respond(Pong, sender);
    }
}

struct Asker {
    target: ActorRef<Ping>,
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<(ActorRef<Ping>, ChannelProbe<(), ()>)> for Asker {
    fn create_args((target, probe): (ActorRef<Ping>, ChannelProbe<(), ()>)) -> Self {
        Asker { target, probe }
    }
}

impl Actor for Asker {
    type Msg = Pong;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        self.target.tell(Ping, Some(ctx.myself().into()));
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        self.probe.event(());
    }
}

#[test]
fn respond_replies_to_the_original_sender() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let responder = sys.actor_of::<Responder>("responder").unwrap();
    let _asker = sys
        .actor_of_args::<Asker, _>("asker", (responder, probe))
        .unwrap();

    p_assert_eq!(listen, ());
}

#[test]
fn respond_with_no_sender_reaches_dead_letters() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let dl_recorder = sys
        .actor_of_args::<DeadLetterRecorder, _>("dl-recorder", probe)
        .unwrap();
    sys.dead_letters().tell(
        Subscribe {
            topic: "dead_letter".into(),
            actor: Box::new(dl_recorder),
        },
        None,
    );

    let responder = sys.actor_of::<Responder>("lonely-responder").unwrap();
    responder.tell(Ping, None);

    p_assert_eq!(listen, ());
}

struct DeadLetterRecorder {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for DeadLetterRecorder {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        DeadLetterRecorder { probe }
    }
}

impl Actor for DeadLetterRecorder {
    type Msg = DeadLetter;

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        self.probe.event(());
    }
}
