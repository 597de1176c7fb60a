//! Collaborator services for devsh.
//!
//! The interpreter only sees the traits in [`services`]. The rest of the
//! crate provides in-memory and file-backed implementations of them used by
//! the `devsh` binary and by tests.

pub mod device;
pub mod invoker;
pub mod memory;
pub mod run_loop;
pub mod script;
pub mod services;
pub mod sink;

pub use device::PropertyDevice;
pub use invoker::MemberInvoker;
pub use memory::{MemoryRegistry, MemoryTaskMonitor};
pub use run_loop::FlagRunLoop;
pub use script::{FileScriptFactory, ScriptTask, TaskState};
pub use services::{
    Device, DeviceHandle, DeviceRegistry, Invoker, MessageSink, RunLoop, ScriptFactory,
    TaskMonitor,
};
pub use sink::{BufferSink, Level, LogSink};
