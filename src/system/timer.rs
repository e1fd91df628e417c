use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use uuid::Uuid;

use crate::{
    actor::{ActorRef, BasicActorRef, Sender},
    AnyMessage, Config, Message,
};

pub type ScheduleId = Uuid;

#[derive(Clone)]
pub struct TimerRef(mpsc::Sender<Job>);

impl TimerRef {
    pub fn send(&self, job: Job) -> Result<(), mpsc::SendError<Job>> {
        self.0.send(job)
    }
}

pub trait Timer {
    fn schedule<T, M>(
        &self,
        initial_delay: Duration,
        interval: Duration,
        receiver: ActorRef<M>,
        sender: Sender,
        msg: T,
    ) -> ScheduleId
    where
        T: Message + Into<M>,
        M: Message;

    fn schedule_once<T, M>(
        &self,
        delay: Duration,
        receiver: ActorRef<M>,
        sender: Sender,
        msg: T,
    ) -> ScheduleId
    where
        T: Message + Into<M>,
        M: Message;

    fn cancel_schedule(&self, id: ScheduleId);
}

pub enum Job {
    Once(OnceJob),
    Repeat(RepeatJob),
    Cancel(ScheduleId),
}

pub struct OnceJob {
    pub id: ScheduleId,
    pub send_at: Instant,
    pub receiver: BasicActorRef,
    pub sender: Sender,
    pub msg: AnyMessage,
}

impl OnceJob {
    pub fn send(mut self) {
        let _ = self.receiver.try_tell_any(&mut self.msg, self.sender);
    }
}

pub struct RepeatJob {
    pub id: ScheduleId,
    pub send_at: Instant,
    pub interval: Duration,
    pub receiver: BasicActorRef,
    pub sender: Sender,
    pub msg: AnyMessage,
}

impl RepeatJob {
    pub fn send(&mut self) {
        let _ = self
            .receiver
            .try_tell_any(&mut self.msg, self.sender.clone());
    }
}

/// Default, in-process `Timer` backend. Runs a dedicated thread that
/// wakes on a fixed interval, flushes pending schedule/cancel requests
/// and fires any jobs whose time has come.
pub struct BasicTimer {
    once_jobs: Vec<OnceJob>,
    repeat_jobs: Vec<RepeatJob>,
}

impl BasicTimer {
    pub fn start(cfg: &Config) -> TimerRef {
        let cfg = cfg.scheduler.clone();

        let mut process = BasicTimer {
            once_jobs: Vec::new(),
            repeat_jobs: Vec::new(),
        };

        let (tx, rx) = mpsc::channel();

        let _ = thread::Builder::new()
            .name("riker-timer".into())
            .spawn(move || loop {
                process.execute_once_jobs();
                process.execute_repeat_jobs();

                while let Ok(job) = rx.try_recv() {
                    match job {
                        Job::Cancel(id) => process.cancel(&id),
                        Job::Once(job) => process.schedule_once(job),
                        Job::Repeat(job) => process.schedule_repeat(job),
                    }
                }

                thread::sleep(Duration::from_millis(cfg.frequency_millis));
            });

        TimerRef(tx)
    }

    pub fn execute_once_jobs(&mut self) {
        let (send, keep): (Vec<OnceJob>, Vec<OnceJob>) = self
            .once_jobs
            .drain(..)
            .partition(|j| Instant::now() >= j.send_at);

        for job in send.into_iter() {
            job.send();
        }

        for job in keep.into_iter() {
            self.once_jobs.push(job);
        }
    }

    pub fn execute_repeat_jobs(&mut self) {
        for job in self.repeat_jobs.iter_mut() {
            if Instant::now() >= job.send_at {
                job.send_at = Instant::now() + job.interval;
                job.send();
            }
        }
    }

    pub fn cancel(&mut self, id: &ScheduleId) {
        if let Some(pos) = self.once_jobs.iter().position(|job| &job.id == id) {
            self.once_jobs.remove(pos);
        }

        if let Some(pos) = self.repeat_jobs.iter().position(|job| &job.id == id) {
            self.repeat_jobs.remove(pos);
        }
    }

    pub fn schedule_once(&mut self, job: OnceJob) {
        if Instant::now() >= job.send_at {
            job.send();
        } else {
            self.once_jobs.push(job);
        }
    }

    pub fn schedule_repeat(&mut self, mut job: RepeatJob) {
        if Instant::now() >= job.send_at {
            job.send();
        }
        self.repeat_jobs.push(job);
    }
}

#[derive(Clone, Debug)]
pub struct BasicTimerConfig {
    pub frequency_millis: u64,
}

impl Default for BasicTimerConfig {
    fn default() -> Self {
        BasicTimerConfig {
            frequency_millis: 50,
        }
    }
}

impl BasicTimerConfig {
    pub(crate) fn merge(&mut self, v: &toml::Value) {
        if let Some(v) = v.as_table() {
            if let Some(n) = v.get("frequency_millis").and_then(|v| v.as_integer()) {
                self.frequency_millis = n as u64;
            }
        }
    }
}
