use std::time::Duration;

use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct Tick;

struct Ticker {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Ticker {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Ticker { probe }
    }
}

impl Actor for Ticker {
    type Msg = Tick;

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        self.probe.event(());
    }
}

#[test]
fn schedule_once() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let actor = sys.actor_of_args::<Ticker, _>("once-ticker", probe).unwrap();

    sys.schedule_once(Duration::from_millis(50), actor, None, Tick);

    p_assert_eq!(listen, ());
}

#[test]
fn schedule_repeat_then_cancel() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let actor = sys
        .actor_of_args::<Ticker, _>("repeat-ticker", probe)
        .unwrap();

    let id = sys.schedule(
        Duration::from_millis(20),
        Duration::from_millis(20),
        actor,
        None,
        Tick,
    );

    // several ticks should arrive
    p_assert_eq!(listen, ());
    p_assert_eq!(listen, ());
    p_assert_eq!(listen, ());

    sys.cancel_schedule(id);

    // give the cancellation time to reach the timer thread
    std::thread::sleep(Duration::from_millis(100));
}

#[test]
fn schedule_once_sender_is_forwarded() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let actor = sys
        .actor_of_args::<Ticker, _>("once-ticker-sender", probe)
        .unwrap();
    let sender: BasicActorRef = actor.clone().into();

    sys.schedule_once(
        Duration::from_millis(50),
        actor,
        Some(sender),
        Tick,
    );

    p_assert_eq!(listen, ());
}
