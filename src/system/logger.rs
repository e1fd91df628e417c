use slog::{o, Drain, Logger};

use crate::{
    actor::{
        Actor, ActorFactoryArgs, ActorRef, All, BasicActorRef, ChannelMsg, Context, DeadLetter,
        Subscribe, Tell,
    },
    system::LoggingSystem,
    Config,
};

/// Builds the system's default logger from configuration: term-colored,
/// asynchronous output, filtered to the configured level.
pub fn default_log(cfg: &Config) -> Logger {
    let cfg = cfg.log.clone();

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, cfg.level).fuse();

    Logger::root(drain, o!())
}

#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub level: slog::Level,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: slog::Level::Debug,
        }
    }
}

impl LoggerConfig {
    pub(crate) fn merge(&mut self, v: &toml::Value) {
        if let Some(v) = v.as_table() {
            if let Some(level) = v.get("level").and_then(|v| v.as_str()) {
                if let Some(level) = level.parse::<slog::Level>().ok() {
                    self.level = level;
                }
            }
        }
    }
}

/// Simple actor that subscribes to the dead letters channel and logs
/// each one using the system's logger.
pub struct DeadLetterLogger {
    dl_chan: ActorRef<ChannelMsg<DeadLetter>>,
    log: LoggingSystem,
}

impl DeadLetterLogger {
    fn new(dl_chan: ActorRef<ChannelMsg<DeadLetter>>, log: LoggingSystem) -> Self {
        DeadLetterLogger { dl_chan, log }
    }
}

impl ActorFactoryArgs<(ActorRef<ChannelMsg<DeadLetter>>, LoggingSystem)> for DeadLetterLogger {
    fn create_args((dl_chan, log): (ActorRef<ChannelMsg<DeadLetter>>, LoggingSystem)) -> Self {
        DeadLetterLogger::new(dl_chan, log)
    }
}

impl Actor for DeadLetterLogger {
    type Msg = DeadLetter;

    fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let sub = Box::new(ctx.myself());
        self.dl_chan.tell(
            Subscribe {
                topic: All.into(),
                actor: sub,
            },
            None,
        );
    }

    fn recv(&mut self, _: &Context<Self::Msg>, msg: Self::Msg, _: Option<BasicActorRef>) {
        slog::info!(
            self.log,
            "DeadLetter: {:?} => {:?} ({:?})",
            msg.sender,
            msg.recipient,
            msg.msg
        );
    }
}
