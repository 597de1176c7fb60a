//! Service traits the interpreter is wired against.
//!
//! Every collaborator is `Send + Sync` and synchronizes internally. The
//! interpreter borrows them for its whole lifetime and never locks anything
//! itself.

use std::sync::Arc;

use devsh_types::error::{DevshError, Result};
use devsh_types::{Literal, Value};

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// A named, controllable object exposed by the host.
///
/// The member hooks (`get_attribute`, `set_attribute`, `call`) are the
/// static-registration backend used by [`crate::MemberInvoker`]. A device
/// that does not override them has no members.
pub trait Device: Send + Sync {
    /// Registry identifier. Never contains `.` or whitespace.
    fn id(&self) -> &str;

    /// String representation shown by the describe command.
    fn describe(&self) -> String {
        self.id().to_string()
    }

    /// Whether the device finished initialising and may be stopped.
    fn ready(&self) -> bool {
        true
    }

    fn start(&self) -> Result<()> {
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        Ok(())
    }

    /// Read an attribute.
    fn get_attribute(&self, name: &str) -> Result<Option<Value>> {
        Err(DevshError::member_not_found(
            name,
            format!("{} has no attribute '{name}'", self.id()),
        ))
    }

    /// Assign raw text to an attribute. Typing is up to the device.
    fn set_attribute(&self, name: &str, _raw_value: &str) -> Result<()> {
        Err(DevshError::member_not_found(
            name,
            format!("{} has no attribute '{name}'", self.id()),
        ))
    }

    /// Call a method.
    fn call(&self, method: &str, _params: &[Literal]) -> Result<Option<Value>> {
        Err(DevshError::member_not_found(
            method,
            format!("{} has no method '{method}'", self.id()),
        ))
    }
}

/// Shared reference to a registered device.
pub type DeviceHandle = Arc<dyn Device>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps identifiers to devices (loaded scripts included).
pub trait DeviceRegistry: Send + Sync {
    fn has(&self, id: &str) -> bool;

    fn get(&self, id: &str) -> Option<DeviceHandle>;

    /// Register a device under its own id. Replaces any previous entry.
    fn add(&self, device: DeviceHandle);

    /// Remove and return the entry for `id`.
    fn remove(&self, id: &str) -> Option<DeviceHandle>;

    /// Registered ids in sorted order.
    fn ids(&self) -> Vec<String>;

    /// Write a listing of all devices to `sink`.
    fn print_devices(&self, sink: &dyn MessageSink);
}

// ---------------------------------------------------------------------------
// Invocation capability
// ---------------------------------------------------------------------------

/// Get/set/invoke on a resolved device.
///
/// A missing member is reported as [`DevshError::MemberNotFound`]; any other
/// error is an unexpected failure of the host.
pub trait Invoker: Send + Sync {
    fn get(&self, device: &dyn Device, attribute: &str) -> Result<Option<Value>>;

    fn set(&self, device: &dyn Device, attribute: &str, raw_value: &str) -> Result<()>;

    fn invoke(&self, device: &dyn Device, method: &str, params: &[Literal])
    -> Result<Option<Value>>;
}

// ---------------------------------------------------------------------------
// Scripts and tasks
// ---------------------------------------------------------------------------

/// Builds script tasks by base name (no extension).
pub trait ScriptFactory: Send + Sync {
    fn create_script(&self, base_name: &str, args: &[String]) -> Result<DeviceHandle>;
}

/// Tracks long-running tasks.
pub trait TaskMonitor: Send + Sync {
    fn add_monitorable(&self, task: DeviceHandle);

    fn remove_monitorable(&self, task: &dyn Device);

    /// Write a listing of all tasks to `sink`.
    fn print_tasks(&self, sink: &dyn MessageSink);
}

// ---------------------------------------------------------------------------
// Output and run loop
// ---------------------------------------------------------------------------

/// Destination for user-facing output.
pub trait MessageSink: Send + Sync {
    fn message(&self, text: &str);

    fn warning(&self, text: &str);

    fn error(&self, text: &str);
}

/// The loop feeding lines to the interpreter.
pub trait RunLoop: Send + Sync {
    /// Ask the loop to exit after the current line.
    fn stop(&self);

    fn is_running(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Device for Bare {
        fn id(&self) -> &str {
            "bare"
        }
    }

    #[test]
    fn default_device_has_no_members() {
        let d = Bare;
        assert_eq!(d.describe(), "bare");
        assert!(d.ready());
        assert!(matches!(
            d.get_attribute("x"),
            Err(DevshError::MemberNotFound { member, .. }) if member == "x"
        ));
        assert!(matches!(
            d.set_attribute("x", "1"),
            Err(DevshError::MemberNotFound { member, .. }) if member == "x"
        ));
        assert!(matches!(
            d.call("go", &[Literal::Int(1)]),
            Err(DevshError::MemberNotFound { member, .. }) if member == "go"
        ));
    }
}
