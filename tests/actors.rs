use riker::actors::*;

use riker_testkit::probe::channel::{probe, ChannelProbe};
use riker_testkit::probe::{Probe, ProbeReceive};
use riker_testkit::p_assert_eq;

#[derive(Clone, Debug)]
pub struct Add;

#[derive(Clone, Debug)]
pub struct GetCount;

#[derive(Clone, Debug)]
enum CounterMsg {
    Add(Add),
    GetCount(GetCount),
}

impl From<Add> for CounterMsg {
    fn from(m: Add) -> Self {
        CounterMsg::Add(m)
    }
}

impl From<GetCount> for CounterMsg {
    fn from(m: GetCount) -> Self {
        CounterMsg::GetCount(m)
    }
}

struct Counter {
    count: u32,
    probe: Option<ChannelProbe<(), u32>>,
}

impl ActorFactoryArgs<ChannelProbe<(), u32>> for Counter {
    fn create_args(probe: ChannelProbe<(), u32>) -> Self {
        Counter {
            count: 0,
            probe: Some(probe),
        }
    }
}

impl Actor for Counter {
    type Msg = CounterMsg;

    fn recv(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg, sender: Sender) {
        match msg {
            CounterMsg::Add(m) => self.receive(ctx, m, sender),
            CounterMsg::GetCount(m) => self.receive(ctx, m, sender),
        }
    }
}

impl Receive<Add> for Counter {
    type Msg = CounterMsg;

    fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Add, _sender: Sender) {
        self.count += 1;
    }
}

impl Receive<GetCount> for Counter {
    type Msg = CounterMsg;

    fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: GetCount, _sender: Sender) {
        self.probe.as_ref().unwrap().event(self.count);
    }
}

#[test]
fn actor_create() {
    let sys = ActorSystem::new().unwrap();
    let (probe, _listen) = probe::<u32>();

    let actor = sys.actor_of_args::<Counter, _>("counter", probe);
    assert!(actor.is_ok());

    // creating at the same path a second time must fail
    let (probe2, _listen2) = probe::<u32>();
    let dup = sys.actor_of_args::<Counter, _>("counter", probe2);
    assert!(dup.is_err());
}

#[test]
fn actor_tell() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<u32>();

    let actor = sys.actor_of_args::<Counter, _>("counter-tell", probe).unwrap();

    actor.tell(Add, None);
    actor.tell(Add, None);
    actor.tell(Add, None);
    actor.tell(GetCount, None);

    p_assert_eq!(listen, 3);
}

#[test]
fn actor_try_tell() {
    let sys = ActorSystem::new().unwrap();
    let (probe, listen) = probe::<u32>();

    let actor = sys.actor_of_args::<Counter, _>("counter-basic", probe).unwrap();
    let basic: BasicActorRef = actor.into();

    assert!(basic.try_tell(Add, None).is_ok());
    assert!(basic.try_tell(GetCount, None).is_ok());

    p_assert_eq!(listen, 1);

    // a message type the actor's mailbox doesn't carry is rejected
    #[derive(Clone, Debug)]
    struct NotACounterMsg;
    assert!(basic.try_tell(NotACounterMsg, None).is_err());
}

#[test]
fn actor_stop() {
    let sys = ActorSystem::new().unwrap();
    let (probe, _listen) = probe::<u32>();

    let actor = sys.actor_of_args::<Counter, _>("counter-stop", probe).unwrap();
    let basic: BasicActorRef = actor.clone().into();

    sys.stop(actor);

    // give the stop a moment to flow through the mailbox
    std::thread::sleep(std::time::Duration::from_millis(100));

    assert!(!sys.user_root().is_child(&basic));
}

#[test]
fn actor_parent_child() {
    let sys = ActorSystem::new().unwrap();
    let (probe, _listen) = probe::<u32>();

    let parent = sys.actor_of_args::<Counter, _>("parent", probe).unwrap();
    let parent_ref: BasicActorRef = parent.into();

    assert!(!parent_ref.has_children());
    assert_eq!(parent_ref.path().to_string(), "/user/parent");
}
