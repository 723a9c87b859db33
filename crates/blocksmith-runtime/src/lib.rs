//! Worker threads for the slow collaborator calls (structure generation and
//! challenge text). The event loop submits jobs and drains results; the world
//! itself never leaves the event loop.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use blocksmith_structures::{ImportError, Structure, reconcile};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use thiserror::Error;

/// Shown when the challenge source answers with nothing.
pub const EMPTY_CHALLENGE: &str = "Build a floating city.";
/// Shown when the challenge source fails.
pub const FAILED_CHALLENGE: &str = "Build a giant space castle.";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("no structure matches `{0}`")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

/// Turns a free-text description into a raw structure response.
pub trait StructureGenerator: Send + Sync + 'static {
    fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Produces one building challenge per call.
pub trait ChallengeSource: Send + 'static {
    fn challenge(&mut self) -> Result<String, GeneratorError>;
}

/// Request number; later requests always get larger tickets.
pub type Ticket = u64;

struct StructureJob {
    ticket: Ticket,
    prompt: String,
}

struct ChallengeJob {
    ticket: Ticket,
}

pub enum JobOut {
    Structure {
        ticket: Ticket,
        prompt: String,
        result: Result<Structure, ImportError>,
        t_total_ms: u32,
    },
    Challenge {
        ticket: Ticket,
        text: String,
    },
}

impl JobOut {
    pub fn ticket(&self) -> Ticket {
        match self {
            JobOut::Structure { ticket, .. } | JobOut::Challenge { ticket, .. } => *ticket,
        }
    }
}

fn run_structure_job<G: StructureGenerator>(
    generator: &G,
    prompt: &str,
) -> Result<Structure, ImportError> {
    let raw = generator
        .generate(prompt)
        .map_err(|e| ImportError::Unavailable(e.to_string()))?;
    reconcile(Some(&raw))
}

fn run_challenge_job<C: ChallengeSource>(source: &mut C) -> String {
    match source.challenge() {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => EMPTY_CHALLENGE.to_string(),
        Err(e) => {
            log::warn!("challenge source failed: {}", e);
            FAILED_CHALLENGE.to_string()
        }
    }
}

pub struct Runtime {
    job_tx: Option<Sender<StructureJob>>,
    challenge_tx: Option<Sender<ChallengeJob>>,
    res_rx: Receiver<JobOut>,
    workers: Vec<JoinHandle<()>>,
    next_ticket: Ticket,
    pending: usize,
}

impl Runtime {
    /// Spawns `structure_workers` threads for structure jobs (at least one)
    /// and one thread for challenge text.
    pub fn new<G, C>(generator: G, mut challenges: C, structure_workers: usize) -> Self
    where
        G: StructureGenerator,
        C: ChallengeSource,
    {
        let (job_tx, job_rx) = unbounded::<StructureJob>();
        let (challenge_tx, challenge_rx) = unbounded::<ChallengeJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let generator = Arc::new(generator);
        let mut workers = Vec::new();

        for _ in 0..structure_workers.max(1) {
            let job_rx = job_rx.clone();
            let res_tx = res_tx.clone();
            let generator = Arc::clone(&generator);
            workers.push(thread::spawn(move || {
                while let Ok(StructureJob { ticket, prompt }) = job_rx.recv() {
                    let t0 = Instant::now();
                    let result = run_structure_job(generator.as_ref(), &prompt);
                    let t_total_ms = t0.elapsed().as_millis().min(u32::MAX as u128) as u32;
                    let out = JobOut::Structure {
                        ticket,
                        prompt,
                        result,
                        t_total_ms,
                    };
                    if res_tx.send(out).is_err() {
                        break;
                    }
                }
            }));
        }

        workers.push(thread::spawn(move || {
            while let Ok(ChallengeJob { ticket }) = challenge_rx.recv() {
                let out = JobOut::Challenge {
                    ticket,
                    text: run_challenge_job(&mut challenges),
                };
                if res_tx.send(out).is_err() {
                    break;
                }
            }
        }));

        Self {
            job_tx: Some(job_tx),
            challenge_tx: Some(challenge_tx),
            res_rx,
            workers,
            next_ticket: 0,
            pending: 0,
        }
    }

    fn alloc_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn track<T>(&mut self, tx: Option<&Sender<T>>, job: T, ticket: Ticket) {
        match tx.map(|tx| tx.send(job)) {
            Some(Ok(())) => self.pending += 1,
            _ => log::error!("runtime worker is gone; job {} dropped", ticket),
        }
    }

    pub fn submit_structure(&mut self, prompt: impl Into<String>) -> Ticket {
        let ticket = self.alloc_ticket();
        let job = StructureJob {
            ticket,
            prompt: prompt.into(),
        };
        let tx = self.job_tx.clone();
        self.track(tx.as_ref(), job, ticket);
        ticket
    }

    pub fn submit_challenge(&mut self) -> Ticket {
        let ticket = self.alloc_ticket();
        let tx = self.challenge_tx.clone();
        self.track(tx.as_ref(), ChallengeJob { ticket }, ticket);
        ticket
    }

    /// Everything that finished since the last drain, in arrival order.
    pub fn drain_results(&mut self) -> Vec<JobOut> {
        let out: Vec<JobOut> = self.res_rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(out.len());
        out
    }

    /// Block until one result arrives or `timeout` passes.
    pub fn wait_result(&mut self, timeout: Duration) -> Option<JobOut> {
        if self.pending == 0 {
            return None;
        }
        match self.res_rx.recv_timeout(timeout) {
            Ok(out) => {
                self.pending -= 1;
                Some(out)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.job_tx.take();
        self.challenge_tx.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("runtime worker panicked");
            }
        }
    }
}

/// Drops structure results that arrive after a newer one was already applied.
#[derive(Default, Debug, Clone, Copy)]
pub struct StaleGuard {
    applied: Ticket,
}

impl StaleGuard {
    /// Returns `true` and records the ticket if it is newer than the last one applied.
    pub fn admit(&mut self, ticket: Ticket) -> bool {
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        true
    }

    pub fn last_applied(&self) -> Ticket {
        self.applied
    }
}
