use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Numeric identifier handed out to anonymously-named actors (`tmp_actor_of`).
/// Not part of actor identity: actor identity is the `ActorPath`.
pub type ActorId = u64;

/// Process-wide counter backing `tmp_actor_of`'s generated names.
#[derive(Debug, Default)]
pub struct AtomicActorId(AtomicU64);

impl AtomicActorId {
    pub const fn new() -> Self {
        AtomicActorId(AtomicU64::new(0))
    }

    pub fn next(&self) -> ActorId {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Slash-separated location of an actor within the system's actor tree,
/// e.g. `/user/parent/child`.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct ActorPath(Arc<str>);

impl ActorPath {
    pub fn new(path: impl AsRef<str>) -> Self {
        ActorPath(Arc::from(path.as_ref()))
    }

    pub fn child(&self, name: &str) -> ActorPath {
        ActorPath(format!("{}/{}", self.0, name).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An `ActorUri` represents the location of an actor, including the
/// path and actor system host.
///
/// Note: `host` is currently unused but will be utilized when
/// networking and clustering are introduced.
#[derive(Clone)]
pub struct ActorUri {
    pub name: Arc<str>,
    pub path: ActorPath,
    pub host: Arc<str>,
}

impl PartialEq for ActorUri {
    fn eq(&self, other: &ActorUri) -> bool {
        self.path == other.path
    }
}

impl Eq for ActorUri {}

impl Hash for ActorUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for ActorUri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ActorUri[{}]", self.path)
    }
}

impl fmt::Debug for ActorUri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ActorUri[{}://{}]", self.host, self.path)
    }
}
