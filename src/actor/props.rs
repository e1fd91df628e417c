use std::fmt;
use std::panic::{RefUnwindSafe, UnwindSafe};
use std::sync::{Arc, Mutex};

use crate::actor::Actor;

/// Produces instances of an `Actor` for use when spawning (`actor_of`)
/// or restarting. Actors are never created directly: a `Props` is
/// configured once, up front, and the runtime asks it to `produce` a
/// fresh actor every time one is needed.
pub trait ActorProducer: fmt::Debug + Send + UnwindSafe + RefUnwindSafe {
    type Actor: Actor;

    /// Produces an instance of an `Actor`.
    ///
    /// # Panics
    /// If the underlying factory closure panics, the panic is caught by
    /// the kernel and surfaced as `CreateError::Panicked` / `RestartError`.
    fn produce(&self) -> Self::Actor;
}

struct ClosureProducer<A> {
    creator: Box<dyn Fn() -> A + Send + Sync>,
}

impl<A> UnwindSafe for ClosureProducer<A> {}
impl<A> RefUnwindSafe for ClosureProducer<A> {}

impl<A: Actor> fmt::Debug for ClosureProducer<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Props")
    }
}

impl<A: Actor> ActorProducer for ClosureProducer<A> {
    type Actor = A;

    fn produce(&self) -> A {
        (self.creator)()
    }
}

impl<A> ActorProducer for Arc<Mutex<dyn ActorProducer<Actor = A>>>
where
    A: Actor + Send + 'static,
{
    type Actor = A;

    fn produce(&self) -> A {
        self.lock().unwrap().produce()
    }
}

/// A `Clone`, `Send` and `Sync` `ActorProducer` handle, stored by the
/// kernel and reused to produce a fresh actor instance on every restart.
pub type BoxActorProd<A> = Arc<Mutex<dyn ActorProducer<Actor = A>>>;

/// Marker trait for values that can be passed to `actor_of_args`: must be
/// cheap enough to clone once per restart and safe to move across the
/// thread that ends up owning the produced actor.
pub trait ActorArgs: Clone + Send + Sync + 'static {}
impl<T> ActorArgs for T where T: Clone + Send + Sync + 'static {}

/// Factory trait implemented by actors that can be produced with no
/// arguments, backing `ActorRefFactory::actor_of` and `Props::new`.
pub trait ActorFactory: Actor {
    fn create() -> Self;
}

/// Factory trait implemented by actors that require construction
/// arguments, backing `ActorRefFactory::actor_of_args` and
/// `Props::new_args`.
pub trait ActorFactoryArgs<Args: ActorArgs>: Actor {
    fn create_args(args: Args) -> Self;
}

/// Namespace for constructing `BoxActorProd` handles. `Props` itself is
/// never instantiated; actors are spawned with `Props::new::<MyActor>()`
/// or `Props::new_args::<MyActor, _>(args)`.
pub struct Props;

impl Props {
    /// `A::create` is invoked fresh every time the actor is (re)started.
    pub fn new<A>() -> BoxActorProd<A>
    where
        A: ActorFactory + Send + 'static,
    {
        Arc::new(Mutex::new(ClosureProducer {
            creator: Box::new(A::create),
        }))
    }

    /// `args` is cloned and passed to `A::create_args` every time the
    /// actor is (re)started.
    pub fn new_args<A, Args>(args: Args) -> BoxActorProd<A>
    where
        A: ActorFactoryArgs<Args> + Send + 'static,
        Args: ActorArgs,
    {
        let creator = move || A::create_args(args.clone());
        Arc::new(Mutex::new(ClosureProducer {
            creator: Box::new(creator),
        }))
    }
}
