use std::time::{Duration, Instant};

use riker::actors::*;

use riker_testkit::p_assert_eq;
use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};

#[derive(Clone, Debug)]
pub struct Ping;

struct Idle {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Idle {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Idle { probe }
    }
}

impl Actor for Idle {
    type Msg = Ping;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.set_receive_timeout(Some(Duration::from_millis(50)));
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::ReceiveTimeout = msg {
            self.probe.event(());
        }
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn receive_timeout_fires_when_idle() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let _actor = sys.actor_of_args::<Idle, _>("idle", probe).unwrap();

    p_assert_eq!(listen, ());
}

struct Busy {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Busy {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Busy { probe }
    }
}

impl Actor for Busy {
    type Msg = Ping;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.set_receive_timeout(Some(Duration::from_millis(100)));
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::ReceiveTimeout = msg {
            self.probe.event(());
        }
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn user_messages_rearm_the_timeout() {
    let sys = ActorSystem::new().unwrap();
    let (probe, _listen) = probe::<()>();

    let actor = sys.actor_of_args::<Busy, _>("busy", probe).unwrap();

    // keep sending pings faster than the timeout: it should never fire
    for _ in 0..5 {
        actor.tell(Ping, None);
        std::thread::sleep(Duration::from_millis(40));
    }
}

struct Cancels {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Cancels {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Cancels { probe }
    }
}

impl Actor for Cancels {
    type Msg = Ping;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.set_receive_timeout(Some(Duration::from_millis(40)));
    }

    fn recv(&mut self, ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        ctx.set_receive_timeout(None);
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::ReceiveTimeout = msg {
            self.probe.event(());
        }
    }
}

#[test]
fn cancelling_receive_timeout_stops_further_firing() {
    let sys = ActorSystem::new().unwrap();
    let (probe, _listen) = probe::<()>();

    let actor = sys.actor_of_args::<Cancels, _>("cancels", probe).unwrap();

    // cancel the timeout before it would otherwise fire
    actor.tell(Ping, None);

    // give plenty of time for a stray timeout to have fired, it shouldn't
    std::thread::sleep(Duration::from_millis(150));
}

#[derive(Clone, Debug)]
pub struct HealthCheck;

#[derive(Clone, Debug)]
enum AloofMsg {
    Ping(Ping),
    HealthCheck(HealthCheck),
}

impl From<Ping> for AloofMsg {
    fn from(m: Ping) -> Self {
        AloofMsg::Ping(m)
    }
}

impl From<HealthCheck> for AloofMsg {
    fn from(m: HealthCheck) -> Self {
        AloofMsg::HealthCheck(m)
    }
}

/// Treats `HealthCheck` as not influencing its receive-timeout: only a
/// `Ping` should push the deadline back.
struct Aloof {
    probe: ChannelProbe<(), ()>,
}

impl ActorFactoryArgs<ChannelProbe<(), ()>> for Aloof {
    fn create_args(probe: ChannelProbe<(), ()>) -> Self {
        Aloof { probe }
    }
}

impl Actor for Aloof {
    type Msg = AloofMsg;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.set_receive_timeout(Some(Duration::from_millis(50)));
    }

    fn influences_receive_timeout(&self, msg: &Self::Msg) -> bool {
        !matches!(msg, AloofMsg::HealthCheck(_))
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::ReceiveTimeout = msg {
            self.probe.event(());
        }
    }

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn non_influencing_message_does_not_push_timeout_back() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<()>();

    let actor = sys.actor_of_args::<Aloof, _>("aloof", probe).unwrap();

    // sent well before the 50ms deadline; since it doesn't influence the
    // timeout, it must not delay the ReceiveTimeout that follows
    std::thread::sleep(Duration::from_millis(20));
    actor.tell(HealthCheck, None);

    p_assert_eq!(listen, ());
}

#[derive(Clone, Debug)]
pub struct Reaffirm;

#[derive(Clone, Debug)]
enum ReaffirmMsg {
    Reaffirm(Reaffirm),
}

impl From<Reaffirm> for ReaffirmMsg {
    fn from(m: Reaffirm) -> Self {
        ReaffirmMsg::Reaffirm(m)
    }
}

/// Re-asserts the exact duration already armed from inside `recv`.
/// `influences_receive_timeout` always returns `false` here so
/// `process_msgs`'s own rearm-after-message never fires; any timer
/// activity left over must have come from the explicit call in `recv`.
struct Reaffirms {
    probe: ChannelProbe<(), Instant>,
}

impl ActorFactoryArgs<ChannelProbe<(), Instant>> for Reaffirms {
    fn create_args(probe: ChannelProbe<(), Instant>) -> Self {
        Reaffirms { probe }
    }
}

impl Actor for Reaffirms {
    type Msg = ReaffirmMsg;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.set_receive_timeout(Some(Duration::from_millis(150)));
    }

    fn influences_receive_timeout(&self, _msg: &Self::Msg) -> bool {
        false
    }

    fn recv(&mut self, ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {
        ctx.set_receive_timeout(Some(Duration::from_millis(150)));
    }

    fn sys_recv(&mut self, _ctx: &Context<Self::Msg>, msg: SystemMsg, _sender: Sender) {
        if let SystemMsg::ReceiveTimeout = msg {
            self.probe.event(Instant::now());
        }
    }
}

#[test]
fn setting_same_receive_timeout_twice_is_a_no_op() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<Instant>();

    let actor = sys.actor_of_args::<Reaffirms, _>("reaffirms", probe).unwrap();
    let start = Instant::now();

    // sent well before the 150ms deadline; since it reasserts the exact
    // same duration, it must not delay the timer by another 150ms
    std::thread::sleep(Duration::from_millis(60));
    actor.tell(Reaffirm, None);

    let fired_at = listen.recv();
    let elapsed = fired_at.duration_since(start);

    assert!(
        elapsed < Duration::from_millis(250),
        "receive timeout fired at {:?}, expected close to 150ms, not pushed back to ~210ms",
        elapsed
    );
}
