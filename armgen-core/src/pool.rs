use crate::planner::{Planner, PlannerBuilder};
use crate::sampling::draw_transition;
use crate::transition::Transition;
use anyhow::{Context, Result, anyhow};
use crossbeam::channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::thread::JoinHandle;

// The shared result queue is bounded so producers stall instead of buffering
// the whole run when collection outpaces consumption.
const QUEUE_SIZE_PER_WORKER: usize = 100;

pub enum WorkerCommand {
    Shutdown,
}

pub struct CollectorWorker<P: Planner> {
    planner: P,
    result_tx: Sender<Result<Transition>>,
    command_rx: Receiver<WorkerCommand>,
}

impl<P: Planner> CollectorWorker<P> {
    pub fn new(
        planner: P,
        result_tx: Sender<Result<Transition>>,
        command_rx: Receiver<WorkerCommand>,
    ) -> Self {
        Self {
            planner,
            result_tx,
            command_rx,
        }
    }

    pub fn work(&mut self) {
        loop {
            if let Ok(WorkerCommand::Shutdown) = self.command_rx.try_recv() {
                break;
            }
            let transition = draw_transition(&mut self.planner);
            let faulted = transition.is_err();
            // a dropped receiver shuts the worker down as well
            if self.result_tx.send(transition).is_err() || faulted {
                break;
            }
        }
    }
}

pub struct CollectorPool {
    command_txs: Vec<Sender<WorkerCommand>>,
    result_rx: Receiver<Result<Transition>>,
    handles: Vec<JoinHandle<()>>,
}

impl CollectorPool {
    pub fn queue_size(workers: usize) -> usize {
        QUEUE_SIZE_PER_WORKER * workers
    }

    pub fn build<PB: PlannerBuilder>(builder: Arc<PB>, workers: usize) -> Self {
        let (result_tx, result_rx) = bounded(Self::queue_size(workers));
        let mut command_txs = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (command_tx, command_rx) = unbounded();
            let result_tx = result_tx.clone();
            let builder = builder.clone();
            handles.push(std::thread::spawn(move || {
                let planner = match builder.build_planner() {
                    Ok(planner) => planner,
                    Err(err) => {
                        let _ = result_tx.send(Err(err));
                        return;
                    }
                };
                let mut worker = CollectorWorker::new(planner, result_tx, command_rx);
                worker.work();
            }));
            command_txs.push(command_tx);
        }
        Self {
            command_txs,
            result_rx,
            handles,
        }
    }

    pub fn num_workers(&self) -> usize {
        self.command_txs.len()
    }

    /// Blocks until `count` transitions have been produced by the workers.
    pub fn generate_samples(&self, count: usize) -> Result<Vec<Transition>> {
        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            let transition = self
                .result_rx
                .recv()
                .context("collector workers disconnected")??;
            batch.push(transition);
        }
        Ok(batch)
    }

    /// Signals every worker, unblocks the ones stalled on a full queue and
    /// joins the threads.
    pub fn shutdown(self) -> Result<()> {
        for tx in &self.command_txs {
            let _ = tx.send(WorkerCommand::Shutdown);
        }
        drop(self.result_rx);
        for handle in self.handles {
            handle
                .join()
                .map_err(|_| anyhow!("collector worker panicked"))?;
        }
        Ok(())
    }
}
