use riker::actors::*;

#[derive(Clone, Debug)]
pub struct Ping;

#[derive(Clone, Debug)]
pub struct Pong;

struct Ponger;

impl ActorFactory for Ponger {
    fn create() -> Self {
        Ponger
    }
}

impl Actor for Ponger {
    type Msg = Ping;

    fn recv(&mut self, ctx: &Context<Self::Msg>, _msg: Self::Msg, sender: Sender) {
        if let Some(sender) = sender {
            sender.try_tell(Pong, ctx.myself()).unwrap();
        }
    }
}

#[test]
fn ask_resolves_to_the_actors_reply() {
    let sys = ActorSystem::new().unwrap();
    let ponger = sys.actor_of::<Ponger>("ponger").unwrap();

    let fut = ask(&sys, &ponger, Ping);
    let _reply: Pong = futures::executor::block_on(fut);
}

#[test]
fn ask_ref_resolves_through_a_basic_actor_ref() {
    let sys = ActorSystem::new().unwrap();
    let ponger = sys.actor_of::<Ponger>("ponger-ref").unwrap();
    let ponger_basic: BasicActorRef = ponger.into();

    let fut = ask_ref(&sys, &ponger_basic, Ping);
    let _reply: Pong = futures::executor::block_on(fut);
}
