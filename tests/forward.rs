use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct Work(pub u32);

struct Target {
    probe: ChannelProbe<(), u32>,
}

impl ActorFactoryArgs<ChannelProbe<(), u32>> for Target {
    fn create_args(probe: ChannelProbe<(), u32>) -> Self {
        Target { probe }
    }
}

impl Actor for Target {
    type Msg = Work;

    fn recv(&mut self, _ctx: &Context<Self::Msg>, msg: Self::Msg, _sender: Sender) {
        self.probe.event(msg.0);
    }
}

struct Relay {
    target: ActorRef<Work>,
}

impl ActorFactoryArgs<ActorRef<Work>> for Relay {
    fn create_args(target: ActorRef<Work>) -> Self {
        Relay { target }
    }
}

impl Actor for Relay {
    type Msg = Work;

    fn recv(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg, sender: Sender) {
        ctx.forward(&self.target, msg, sender);
    }
}

#[test]
fn forward_preserves_original_sender() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<u32>();

    let target = sys.actor_of_args::<Target, _>("fwd-target", probe).unwrap();
    let relay = sys
        .actor_of_args::<Relay, _>("fwd-relay", target)
        .unwrap();

    relay.tell(Work(7), None);

    p_assert_eq!(listen, 7);
}
