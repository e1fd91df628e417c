use std::time::Duration;

use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct WhoDied(pub String);

struct Watcher {
    target: BasicActorRef,
    probe: ChannelProbe<(), String>,
}

impl ActorFactoryArgs<(BasicActorRef, ChannelProbe<(), String>)> for Watcher {
    fn create_args((target, probe): (BasicActorRef, ChannelProbe<(), String>)) -> Self {
        Watcher { target, probe }
    }
}

impl Actor for Watcher {
    type Msg = ();

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.watch(&self.target);
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::Terminated(who) = msg {
            self.probe.event(who.path().to_string());
        }
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

struct Victim;

impl ActorFactory for Victim {
    fn create() -> Self {
        Victim
    }
}

impl Actor for Victim {
    type Msg = ();

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn watcher_receives_exactly_one_terminated_on_stop() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<String>();

    let victim = sys.actor_of::<Victim>("victim").unwrap();
    let victim_basic: BasicActorRef = victim.clone().into();

    let _watcher = sys
        .actor_of_args::<Watcher, _>("watcher", (victim_basic.clone(), probe))
        .unwrap();

    // give the watch registration time to land before the victim stops
    std::thread::sleep(Duration::from_millis(50));

    sys.stop(victim);

    let path = listen.recv();
    assert!(path.contains("victim"));
}

#[test]
fn watching_an_already_stopped_actor_still_yields_terminated() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<String>();

    let victim = sys.actor_of::<Victim>("victim-gone").unwrap();
    let victim_basic: BasicActorRef = victim.clone().into();

    sys.stop(victim);
    std::thread::sleep(Duration::from_millis(100));

    // watch is registered after the victim has already fully stopped
    let _watcher = sys
        .actor_of_args::<Watcher, _>("late-watcher", (victim_basic, probe))
        .unwrap();

    let path = listen.recv();
    assert!(path.contains("victim-gone"));
}

struct Unwatcher {
    target: BasicActorRef,
    probe: ChannelProbe<(), String>,
}

impl ActorFactoryArgs<(BasicActorRef, ChannelProbe<(), String>)> for Unwatcher {
    fn create_args((target, probe): (BasicActorRef, ChannelProbe<(), String>)) -> Self {
        Unwatcher { target, probe }
    }
}

impl Actor for Unwatcher {
    type Msg = ();

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.watch(&self.target);
        ctx.unwatch(&self.target);
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::Terminated(who) = msg {
            self.probe.event(who.path().to_string());
        }
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn unwatch_before_stop_prevents_terminated_notification() {
    let sys = ActorSystem::new().unwrap();
    let (probe, _listen) = probe::<String>();

    let victim = sys.actor_of::<Victim>("victim-unwatched").unwrap();
    let victim_basic: BasicActorRef = victim.clone().into();

    let _watcher = sys
        .actor_of_args::<Unwatcher, _>("unwatcher", (victim_basic, probe))
        .unwrap();

    std::thread::sleep(Duration::from_millis(50));
    sys.stop(victim);

    // give the stop time to flow through; no Terminated should arrive since
    // the watch was cancelled in pre_start before any failure could occur
    std::thread::sleep(Duration::from_millis(100));
}
