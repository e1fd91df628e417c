use std::time::Duration;

use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct Panic;

/// Reports on every `post_start`, which fires once on initial creation
/// and again on every restart (actor state itself does not survive a
/// restart, only the probe handle passed back in via `create_args`).
struct PanicActor {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for PanicActor {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        PanicActor { probe }
    }
}

impl Actor for PanicActor {
    type Msg = Panic;

    fn post_start(&mut self, _ctx: &Context<Self::Msg>) {
        self.probe.event(());
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        panic!("PanicActor intentionally failing");
    }
}

struct RestartSup {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for RestartSup {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        RestartSup { probe }
    }
}

impl Actor for RestartSup {
    type Msg = ();

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let _ = ctx.actor_of_args::<PanicActor, _>("child", self.probe.clone());
    }

    fn supervisor_strategy(&self) -> Strategy {
        Strategy::Restart
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

struct EscalateSup {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for EscalateSup {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        EscalateSup { probe }
    }
}

impl Actor for EscalateSup {
    type Msg = ();

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let _ = ctx.actor_of_args::<PanicActor, _>("child", self.probe.clone());
    }

    fn supervisor_strategy(&self) -> Strategy {
        Strategy::Escalate
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn supervision_restart_failed_actor() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let _sup = sys
        .actor_of_args::<RestartSup, _>("restart-sup", probe)
        .unwrap();
    let child = sys.select("restart-sup/child").unwrap();

    // post_start on initial incarnation
    p_assert_eq!(listen, ());

    child.try_tell(Panic, None);

    // RestartSup restarts the child: post_start fires again
    p_assert_eq!(listen, ());
}

#[test]
fn supervision_escalate_failed_actor() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let sup = sys
        .actor_of_args::<EscalateSup, _>("escalate-sup", probe)
        .unwrap();
    let sup_basic: BasicActorRef = sup.into();
    let child = sys.select("escalate-sup/child").unwrap();

    // post_start on initial incarnation
    p_assert_eq!(listen, ());

    child.try_tell(Panic, None);

    // EscalateSup escalates to user_root, whose default strategy
    // (Strategy::Restart) restarts EscalateSup itself; give it a moment
    // and confirm the supervisor is still addressable afterwards.
    std::thread::sleep(Duration::from_millis(100));
    assert!(!sup_basic.is_root());
}

#[test]
fn restart_statistics_are_tracked_per_child() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let sup = sys
        .actor_of_args::<RestartSup, _>("stats-sup", probe)
        .unwrap();
    let sup_basic: BasicActorRef = sup.into();
    let child = sys.select("stats-sup/child").unwrap();
    let child_basic = sup_basic
        .children()
        .find(|c| c.name() == "child")
        .expect("child registered under its supervisor");

    p_assert_eq!(listen, ());

    child.try_tell(Panic, None);
    p_assert_eq!(listen, ());

    child.try_tell(Panic, None);
    p_assert_eq!(listen, ());

    assert_eq!(
        sup_basic.cell.restart_stats_for(&child_basic).fail_count(),
        2
    );
}
