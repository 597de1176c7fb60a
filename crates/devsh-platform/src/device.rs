//! A device backed by an in-memory attribute table.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use devsh_types::error::{DevshError, Result};
use devsh_types::{Literal, Value};

use crate::services::Device;

/// Attribute bag with a handful of built-in methods.
///
/// Assignments are coerced to the type of the current value. Unknown
/// attributes are rejected unless the schema is open, in which case they are
/// created with an inferred type.
///
/// Methods: `keys()`, `reset()`, `toggle("name")`, `echo(args...)`.
pub struct PropertyDevice {
    id: String,
    description: String,
    open_schema: bool,
    defaults: BTreeMap<String, Value>,
    attributes: RwLock<BTreeMap<String, Value>>,
    running: AtomicBool,
}

impl PropertyDevice {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            open_schema: false,
            defaults: BTreeMap::new(),
            attributes: RwLock::new(BTreeMap::new()),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an attribute; its initial value is also what `reset()` restores.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        self.defaults.insert(name.clone(), value.clone());
        self.attributes
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
        self
    }

    /// Accept assignments to attributes that do not exist yet.
    pub fn with_open_schema(mut self) -> Self {
        self.open_schema = true;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn no_attribute(&self, name: &str) -> DevshError {
        DevshError::member_not_found(name, format!("{} has no attribute '{name}'", self.id))
    }

    fn toggle(&self, params: &[Literal]) -> Result<Option<Value>> {
        let name = match params {
            [param] => param.as_str(),
            _ => None,
        }
        .ok_or_else(|| {
            DevshError::InvocationFailed("usage: toggle(\"attribute\")".to_string())
        })?;
        let mut attrs = self.attributes.write().unwrap_or_else(PoisonError::into_inner);
        match attrs.get_mut(name) {
            Some(Value::Bool(b)) => {
                *b = !*b;
                Ok(Some(Value::Bool(*b)))
            },
            Some(other) => Err(DevshError::InvocationFailed(format!(
                "cannot toggle {} attribute '{name}'",
                other.type_name()
            ))),
            None => Err(self.no_attribute(name)),
        }
    }
}

impl Device for PropertyDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn describe(&self) -> String {
        let kind = if self.description.is_empty() {
            "device"
        } else {
            self.description.as_str()
        };
        let attrs = self.attributes.read().unwrap_or_else(PoisonError::into_inner);
        let names: Vec<&str> = attrs.keys().map(String::as_str).collect();
        format!("{kind} [{}] attributes: {}", self.id, names.join(", "))
    }

    fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn get_attribute(&self, name: &str) -> Result<Option<Value>> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| self.no_attribute(name))
    }

    fn set_attribute(&self, name: &str, raw_value: &str) -> Result<()> {
        let mut attrs = self.attributes.write().unwrap_or_else(PoisonError::into_inner);
        match attrs.get_mut(name) {
            Some(current) => {
                let next = current.coerce(raw_value).ok_or_else(|| {
                    DevshError::InvocationFailed(format!(
                        "cannot assign '{}' to {} attribute '{name}'",
                        raw_value.trim(),
                        current.type_name()
                    ))
                })?;
                *current = next;
                Ok(())
            },
            None if self.open_schema => {
                attrs.insert(name.to_string(), Value::infer(raw_value));
                Ok(())
            },
            None => Err(self.no_attribute(name)),
        }
    }

    fn call(&self, method: &str, params: &[Literal]) -> Result<Option<Value>> {
        match method {
            "keys" => {
                let attrs = self.attributes.read().unwrap_or_else(PoisonError::into_inner);
                Ok(Some(Value::List(
                    attrs.keys().map(|k| Value::Text(k.clone())).collect(),
                )))
            },
            "reset" => {
                *self.attributes.write().unwrap_or_else(PoisonError::into_inner) =
                    self.defaults.clone();
                Ok(None)
            },
            "toggle" => self.toggle(params),
            "echo" => Ok(match params {
                [] => None,
                [single] => Some(Value::from(single.clone())),
                many => Some(Value::List(many.iter().cloned().map(Value::from).collect())),
            }),
            _ => Err(DevshError::member_not_found(
                method,
                format!("{} has no method '{method}'", self.id),
            )),
        }
    }
}
