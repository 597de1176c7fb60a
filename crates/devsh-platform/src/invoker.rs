//! Invocation through the devices' own member hooks.

use devsh_types::error::{DevshError, Result};
use devsh_types::{Literal, Value};

use crate::services::{Device, Invoker};

/// [`Invoker`] that forwards to [`Device::get_attribute`],
/// [`Device::set_attribute`] and [`Device::call`].
///
/// Reading a name that is not an attribute falls back to calling it as a
/// zero-argument method, so `lamp.keys` and `lamp.keys()` agree.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemberInvoker;

impl MemberInvoker {
    pub fn new() -> Self {
        Self
    }
}

impl Invoker for MemberInvoker {
    fn get(&self, device: &dyn Device, attribute: &str) -> Result<Option<Value>> {
        match device.get_attribute(attribute) {
            Err(DevshError::MemberNotFound { member, message }) => {
                log::trace!("{}: '{attribute}' is not an attribute, trying a method", device.id());
                match device.call(attribute, &[]) {
                    Err(DevshError::MemberNotFound { .. }) => {
                        Err(DevshError::MemberNotFound { member, message })
                    },
                    other => other,
                }
            },
            other => other,
        }
    }

    fn set(&self, device: &dyn Device, attribute: &str, raw_value: &str) -> Result<()> {
        log::trace!("{}: set {attribute} = {raw_value}", device.id());
        device.set_attribute(attribute, raw_value)
    }

    fn invoke(
        &self,
        device: &dyn Device,
        method: &str,
        params: &[Literal],
    ) -> Result<Option<Value>> {
        log::trace!("{}: call {method} with {} param(s)", device.id(), params.len());
        device.call(method, params)
    }
}
