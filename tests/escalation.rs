use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct BadNews(pub String);

struct Flaky {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Flaky {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Flaky { probe }
    }
}

impl Actor for Flaky {
    type Msg = BadNews;

    fn post_start(&mut self, _ctx: &Context<Self::Msg>) {
        self.probe.event(());
    }

    fn recv(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg, _sender: Sender) {
        ctx.escalate_failure(msg.0.clone(), &msg);
    }
}

struct Sup {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Sup {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Sup { probe }
    }
}

impl Actor for Sup {
    type Msg = ();

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let _ = ctx.actor_of_args::<Flaky, _>("flaky", self.probe.clone());
    }

    fn supervisor_strategy(&self) -> Strategy {
        Strategy::Restart
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn explicit_escalate_failure_reaches_the_parents_supervisor() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let _sup = sys.actor_of_args::<Sup, _>("escalating-sup", probe).unwrap();
    let child = sys.select("escalating-sup/flaky").unwrap();

    // post_start on initial incarnation
    p_assert_eq!(listen, ());

    child.try_tell(BadNews("disk full".into()), None);

    // Sup's Restart strategy restarts the child: post_start fires again
    p_assert_eq!(listen, ());
}

struct Parent {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Parent {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Parent { probe }
    }
}

struct Child {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Child {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Child { probe }
    }
}

impl Actor for Child {
    type Msg = ();

    fn post_start(&mut self, _ctx: &Context<Self::Msg>) {
        self.probe.event(());
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

impl Actor for Parent {
    type Msg = ();

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let _ = ctx.actor_of_args::<Child, _>("child-a", self.probe.clone());
        let _ = ctx.actor_of_args::<Child, _>("child-b", self.probe.clone());
    }

    fn recv(&mut self, ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        ctx.restart_children();
    }
}

#[test]
fn restart_children_broadcasts_to_every_child() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let parent = sys
        .actor_of_args::<Parent, _>("broadcast-parent", probe)
        .unwrap();

    // two children post_start on initial creation
    p_assert_eq!(listen, ());
    p_assert_eq!(listen, ());

    parent.tell((), None);

    // both children post_start again after being restarted
    p_assert_eq!(listen, ());
    p_assert_eq!(listen, ());
}
