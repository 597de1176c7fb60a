use std::sync::Arc;

use devsh_platform::{DeviceRegistry, PropertyDevice};
use devsh_types::Value;
use devsh_types::config::DeviceConfig;

/// Build a device from its config entry.
pub fn device_from_config(config: &DeviceConfig) -> PropertyDevice {
    let mut device = PropertyDevice::new(&config.id).with_description(&config.description);
    for (name, value) in &config.attributes {
        device = device.with_attribute(name, value.clone());
    }
    device
}

/// Register every configured device.
pub fn populate_devices(registry: &dyn DeviceRegistry, devices: &[DeviceConfig]) {
    for config in devices {
        log::debug!("registering {} ({} attributes)", config.id, config.attributes.len());
        registry.add(Arc::new(device_from_config(config)));
    }
}

/// A small set of devices to play with when the config declares none.
pub fn populate_demo_devices(registry: &dyn DeviceRegistry) {
    registry.add(Arc::new(
        PropertyDevice::new("lamp")
            .with_description("Desk lamp")
            .with_attribute("brightness", 42i64)
            .with_attribute("on", false)
            .with_attribute("color", "warm white"),
    ));
    registry.add(Arc::new(
        PropertyDevice::new("thermostat")
            .with_description("Hallway thermostat")
            .with_attribute("target", Value::Float(20.5))
            .with_attribute("mode", "heat")
            .with_attribute("schedule", Value::List(vec![
                Value::Text("06:30".into()),
                Value::Text("22:00".into()),
            ])),
    ));
    registry.add(Arc::new(
        PropertyDevice::new("notes")
            .with_description("Scratch store")
            .with_open_schema(),
    ));
}
