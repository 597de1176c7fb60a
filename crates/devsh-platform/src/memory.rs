//! In-memory registry and task monitor.
//!
//! Both keep their entries behind a lock so several interpreters (one per
//! loaded script, say) can share them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::services::{Device, DeviceHandle, DeviceRegistry, MessageSink, TaskMonitor};

/// Registry backed by a sorted map.
#[derive(Default)]
pub struct MemoryRegistry {
    devices: RwLock<BTreeMap<String, DeviceHandle>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn has(&self, id: &str) -> bool {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn get(&self, id: &str) -> Option<DeviceHandle> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(Arc::clone)
    }

    fn add(&self, device: DeviceHandle) {
        let id = device.id().to_string();
        log::debug!("registry: add {id}");
        if let Some(old) = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, device)
        {
            log::warn!("registry: replaced existing entry {}", old.id());
        }
    }

    fn remove(&self, id: &str) -> Option<DeviceHandle> {
        log::debug!("registry: remove {id}");
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    fn ids(&self) -> Vec<String> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn print_devices(&self, sink: &dyn MessageSink) {
        let devices = self.devices.read().unwrap_or_else(PoisonError::into_inner);
        if devices.is_empty() {
            sink.message("(no devices)");
            return;
        }
        sink.message(&format!("Devices ({}):", devices.len()));
        for (id, dev) in devices.iter() {
            sink.message(&format!("  {id:16} {}", dev.describe()));
        }
    }
}

/// Task monitor keeping tasks in registration order.
#[derive(Default)]
pub struct MemoryTaskMonitor {
    tasks: Mutex<Vec<DeviceHandle>>,
}

impl MemoryTaskMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of monitored tasks, in registration order.
    pub fn task_ids(&self) -> Vec<String> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|t| t.id().to_string())
            .collect()
    }
}

impl TaskMonitor for MemoryTaskMonitor {
    fn add_monitorable(&self, task: DeviceHandle) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| t.id() != task.id());
        log::debug!("monitor: add {}", task.id());
        tasks.push(task);
    }

    fn remove_monitorable(&self, task: &dyn Device) {
        log::debug!("monitor: remove {}", task.id());
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|t| t.id() != task.id());
    }

    fn print_tasks(&self, sink: &dyn MessageSink) {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if tasks.is_empty() {
            sink.message("(no tasks)");
            return;
        }
        sink.message(&format!("Tasks ({}):", tasks.len()));
        for task in tasks.iter() {
            let state = if task.ready() { "ready" } else { "not ready" };
            sink.message(&format!("  {:16} {state:10} {}", task.id(), task.describe()));
        }
    }
}
