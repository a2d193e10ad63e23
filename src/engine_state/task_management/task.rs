//! # Task System Core Trait
//!
//! This module defines the unit of work the task system executes on its worker
//! threads.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task's output is sent back to the thread owning the `TaskManager`
//! 4. The owner consumes outputs in `TaskManager::wait_for_all()`
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `Task::Output` must be `Send` to be transferred back
//! - All shared state must be properly synchronized

/// A trait representing a unit of work that can be executed asynchronously.
///
/// Tasks are the primary mechanism for offloading work from the frame thread to
/// background workers. They should own all the data they need, sharing
/// anything large through `MtResource` handles.
///
/// # Implementation Guidelines
/// - Should be relatively coarse-grained to amortize scheduling overhead
/// - Must only read shared state; merging results is the owner's job
pub trait Task: Send {
    /// What the task hands back to the owner.
    type Output: Send;

    /// Processes the task and returns its output.
    ///
    /// Runs on a background thread, or inline on the owner's thread when no
    /// worker is available.
    fn process(&self) -> Self::Output;
}
