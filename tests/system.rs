use riker::actors::*;

#[test]
fn system_create() {
    let sys = ActorSystem::new();
    assert!(sys.is_ok());

    let sys = sys.unwrap();
    assert_eq!(sys.name(), "tezedge-actor-system");
}

#[test]
fn system_create_with_name() {
    let sys = ActorSystem::with_name("my-app").unwrap();
    assert_eq!(sys.name(), "my-app");
}

#[test]
fn system_create_invalid_name() {
    // spaces aren't a valid system name, mirroring actor name validation
    let sys = ActorSystem::with_name("not a valid name");
    assert!(sys.is_err());
}

#[test]
fn system_builder() {
    let sys = SystemBuilder::new().name("builder-sys").create();
    assert!(sys.is_ok());
    assert_eq!(sys.unwrap().name(), "builder-sys");
}

struct ShutdownTest;

impl ActorFactory for ShutdownTest {
    fn create() -> Self {
        ShutdownTest
    }
}

impl Actor for ShutdownTest {
    type Msg = ();

    fn recv(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg, _sender: Sender) {}
}

#[test]
fn system_shutdown() {
    let sys = ActorSystem::new().unwrap();

    let _actor = sys.actor_of::<ShutdownTest>("shutdown-test").unwrap();

    // shutdown blocks until every user actor (and the actor hierarchy)
    // has finished stopping
    sys.shutdown();
}

#[test]
fn system_print_tree() {
    let sys = ActorSystem::new().unwrap();
    let _actor = sys.actor_of::<ShutdownTest>("tree-test").unwrap();

    let tree = sys.print_tree();
    assert!(tree.iter().any(|line| line.contains("tree-test")));
}
