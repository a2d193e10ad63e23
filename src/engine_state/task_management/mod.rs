//! # Task Management System
//!
//! A small worker pool for executing tasks on background threads and
//! returning their outputs to the owning thread.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed on a worker
//! - `TaskChannel`: Communication channel between the owner and one worker thread
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back their outputs
//! 4. `wait_for_all()` blocks the owning thread until every published task has
//!    reported back, handing each output over as it arrives
//!
//! ## Worker Failure
//!
//! A worker that panics drops its result sender. The manager notices the
//! disconnect, logs the lost task and stops using that worker. Once every
//! worker is gone, queued tasks run inline on the owning thread.
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new(num_workers);
//!
//! task_manager.publish_task(Box::new(MyTask::new(...)));
//!
//! // Block until everything published so far is done.
//! task_manager.wait_for_all(|output| handle(output));
//! ```

pub mod task;

use log::{error, info};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use task::Task;

/// A boxed task producing `R`.
pub type BoxedTask<R> = Box<dyn Task<Output = R>>;

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owner to the worker
/// - `result_receiver`: Receives task outputs from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `alive`: Cleared once the worker has disconnected
/// - `_worker`: Handle to the worker thread
pub struct TaskChannel<R> {
    task_sender: Sender<BoxedTask<R>>,
    result_receiver: Receiver<R>,
    num_tasks_in_flight: usize,
    alive: bool,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: Set of worker channels
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager<R> {
    channels: Vec<TaskChannel<R>>,
    queued_tasks: VecDeque<BoxedTask<R>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 so a busy worker never holds queued work another worker
/// could pick up.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl<R: Send + 'static> TaskManager<R> {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. Zero is allowed;
    ///   every task then runs inline in `wait_for_all()`.
    ///
    /// Workers that fail to spawn are logged and left out of the pool.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Available parallelism: {:?}, spawning {} workers",
            thread::available_parallelism(),
            num_workers
        );

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<BoxedTask<R>>();
            let (result_tx, result_rx) = channel::<R>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("task-worker-{index}"))
                .spawn(task_closure);

            match worker {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    alive: true,
                    _worker: worker,
                }),
                Err(e) => error!("Failed to spawn worker {}: {}", index, e),
            }
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of workers still accepting tasks.
    pub fn live_workers(&self) -> usize {
        self.channels.iter().filter(|channel| channel.alive).count()
    }

    /// Number of tasks queued or in flight.
    pub fn pending_tasks(&self) -> usize {
        self.queued_tasks.len()
            + self
                .channels
                .iter()
                .map(|channel| channel.num_tasks_in_flight)
                .sum::<usize>()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the worker has disconnected; the channel is marked dead
    fn try_send_task(&mut self, task: BoxedTask<R>, channel_idx: usize) -> Result<(), BoxedTask<R>> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                error!("Worker {} disconnected, retiring it", channel_idx);
                channel.alive = false;
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel using round-robin from the last used
    /// channel, skipping dead and full channels.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
        let mut current = start_channel;

        loop {
            let channel = &self.channels[current];
            if channel.alive && channel.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because no worker is free
    pub fn publish_task(&mut self, task: BoxedTask<R>) -> bool {
        let mut task = task;
        while let Some(channel_idx) = self.find_available_channel() {
            match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    return true;
                }
                Err(returned) => task = returned,
            }
        }
        self.queued_tasks.push_back(task);
        false
    }

    /// Moves queued tasks onto free workers, oldest first, until the queue is
    /// empty or every worker is busy.
    fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => self.queued_tasks.push_front(task),
            }
        }
    }

    /// Blocks until every published task has finished, handing each output to
    /// `handler` on the calling thread.
    ///
    /// Tasks lost to a crashed worker produce no output. With no live worker
    /// left, the remaining queue is processed inline.
    pub fn wait_for_all(&mut self, mut handler: impl FnMut(R)) {
        loop {
            self.process_queued_tasks();

            if self.live_workers() == 0 {
                while let Some(task) = self.queued_tasks.pop_front() {
                    handler(task.process());
                }
            }

            let mut waited = false;
            for (index, channel) in self.channels.iter_mut().enumerate() {
                if channel.num_tasks_in_flight == 0 {
                    continue;
                }
                waited = true;
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        handler(result);
                    }
                    Err(_) => Self::retire(index, channel),
                }
            }

            if !waited && self.queued_tasks.is_empty() {
                return;
            }
        }
    }

    fn retire(index: usize, channel: &mut TaskChannel<R>) {
        error!(
            "Worker {} stopped with {} task(s) in flight",
            index, channel.num_tasks_in_flight
        );
        channel.alive = false;
        channel.num_tasks_in_flight = 0;
    }
}
