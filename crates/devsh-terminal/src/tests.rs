//! End-to-end tests for the interpreter.

use std::path::Path;
use std::sync::{Arc, Mutex};

use devsh_platform::{
    BufferSink, Device, DeviceRegistry, FileScriptFactory, FlagRunLoop, Invoker, MemberInvoker,
    MemoryRegistry, MemoryTaskMonitor, PropertyDevice, RunLoop,
};
use devsh_types::error::{DevshError, Result};
use devsh_types::{Literal, Value};

use crate::{Interpreter, Services};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// [`MemberInvoker`] that also records every set and invoke.
#[derive(Default)]
struct RecordingInvoker {
    sets: Mutex<Vec<(String, String, String)>>,
    invokes: Mutex<Vec<(String, String, Vec<Literal>)>>,
}

impl RecordingInvoker {
    fn sets(&self) -> Vec<(String, String, String)> {
        self.sets.lock().unwrap().clone()
    }

    fn invokes(&self) -> Vec<(String, String, Vec<Literal>)> {
        self.invokes.lock().unwrap().clone()
    }
}

impl Invoker for RecordingInvoker {
    fn get(&self, device: &dyn Device, attribute: &str) -> Result<Option<Value>> {
        MemberInvoker.get(device, attribute)
    }

    fn set(&self, device: &dyn Device, attribute: &str, raw_value: &str) -> Result<()> {
        self.sets.lock().unwrap().push((
            device.id().to_string(),
            attribute.to_string(),
            raw_value.to_string(),
        ));
        MemberInvoker.set(device, attribute, raw_value)
    }

    fn invoke(
        &self,
        device: &dyn Device,
        method: &str,
        params: &[Literal],
    ) -> Result<Option<Value>> {
        self.invokes.lock().unwrap().push((
            device.id().to_string(),
            method.to_string(),
            params.to_vec(),
        ));
        MemberInvoker.invoke(device, method, params)
    }
}

struct Fixture {
    lamp: Arc<PropertyDevice>,
    registry: MemoryRegistry,
    invoker: RecordingInvoker,
    monitor: MemoryTaskMonitor,
    sink: BufferSink,
    run_loop: FlagRunLoop,
    primary: FileScriptFactory,
    secondary: FileScriptFactory,
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let lamp = Arc::new(
            PropertyDevice::new("lamp")
                .with_description("Desk lamp")
                .with_attribute("brightness", 42i64)
                .with_attribute("on", false),
        );
        let registry = MemoryRegistry::new();
        let handle: Arc<PropertyDevice> = Arc::clone(&lamp);
        registry.add(handle);
        Self {
            lamp,
            registry,
            invoker: RecordingInvoker::default(),
            monitor: MemoryTaskMonitor::new(),
            sink: BufferSink::new(),
            run_loop: FlagRunLoop::new(),
            primary: FileScriptFactory::new(dir.path(), "dsh"),
            secondary: FileScriptFactory::new(dir.path(), "rb"),
            dir,
        }
    }

    fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(Services {
            registry: &self.registry,
            invoker: &self.invoker,
            monitor: &self.monitor,
            sink: &self.sink,
            run_loop: &self.run_loop,
            primary_factory: &self.primary,
            secondary_factory: &self.secondary,
            secondary_suffix: ".rb",
        })
    }

    fn write_script(&self, file: &str, body: &str) {
        std::fs::write(self.dir.path().join(file), body).unwrap();
    }

    fn scripts_dir(&self) -> &Path {
        self.dir.path()
    }
}

// ---------------------------------------------------------------------------
// Builtins
// ---------------------------------------------------------------------------

#[test]
fn devices_lists_registry() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("devices").unwrap());
    let messages = fx.sink.messages();
    assert_eq!(messages[0], "Devices (1):");
    assert!(messages[1].contains("lamp"));
    assert!(fx.sink.warnings().is_empty());
    assert!(fx.sink.errors().is_empty());
}

#[test]
fn tasks_lists_monitor() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("tasks").unwrap());
    assert_eq!(fx.sink.messages(), vec!["(no tasks)"]);
}

#[test]
fn exit_stops_run_loop() {
    let fx = Fixture::new();
    assert!(fx.run_loop.is_running());
    assert!(fx.interpreter().interpret("exit").unwrap());
    assert!(!fx.run_loop.is_running());
    assert!(fx.sink.is_empty());
}

#[test]
fn help_lists_command_forms() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("help").unwrap());
    let messages = fx.sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("load <script>"));
    assert!(messages[0].contains("<id>.<method>(args...)"));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("  exit \n").unwrap());
    assert!(!fx.run_loop.is_running());
}

#[test]
fn blank_and_nameless_lines_are_unhandled() {
    let fx = Fixture::new();
    let interp = fx.interpreter();
    assert!(!interp.interpret("").unwrap());
    assert!(!interp.interpret("   ").unwrap());
    assert!(!interp.interpret(".brightness").unwrap());
    assert!(fx.sink.is_empty());
}

// ---------------------------------------------------------------------------
// Device interaction
// ---------------------------------------------------------------------------

#[test]
fn get_prints_value() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("lamp.brightness").unwrap());
    assert_eq!(fx.sink.messages(), vec!["42"]);
}

#[test]
fn set_passes_raw_text_once() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("lamp.brightness = 10").unwrap());
    assert_eq!(
        fx.invoker.sets(),
        vec![("lamp".to_string(), "brightness".to_string(), "10".to_string())]
    );
    assert!(fx.sink.is_empty());
}

#[test]
fn set_then_get_round_trip() {
    let fx = Fixture::new();
    let interp = fx.interpreter();
    interp.interpret("lamp.brightness = 10").unwrap();
    interp.interpret("lamp.on = true").unwrap();
    interp.interpret("lamp.brightness").unwrap();
    interp.interpret("lamp.on").unwrap();
    assert_eq!(fx.sink.messages(), vec!["10", "true"]);
}

#[test]
fn set_value_containing_equals_reaches_setter() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("lamp.label = \"a=b\"").unwrap());
    assert_eq!(
        fx.invoker.sets(),
        vec![("lamp".to_string(), "label".to_string(), "\"a=b\"".to_string())]
    );
    let errors = fx.sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("lamp: missing member 'label'"));
}

#[test]
fn invoke_passes_typed_params_once() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("lamp.blink(\"slow\", 3)").unwrap());
    assert_eq!(
        fx.invoker.invokes(),
        vec![(
            "lamp".to_string(),
            "blink".to_string(),
            vec![Literal::Str("slow".into()), Literal::Int(3)],
        )]
    );
}

#[test]
fn invoke_prints_result() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("lamp.echo(\"slow\", 3)").unwrap());
    assert_eq!(fx.sink.messages(), vec!["[slow, 3]"]);
}

#[test]
fn invoke_without_result_prints_nothing() {
    let fx = Fixture::new();
    let interp = fx.interpreter();
    interp.interpret("lamp.brightness = 1").unwrap();
    assert!(interp.interpret("lamp.reset()").unwrap());
    assert!(fx.sink.is_empty());
    interp.interpret("lamp.brightness").unwrap();
    assert_eq!(fx.sink.messages(), vec!["42"]);
}

#[test]
fn describe_is_idempotent() {
    let fx = Fixture::new();
    let interp = fx.interpreter();
    assert!(interp.interpret("lamp").unwrap());
    assert!(interp.interpret("lamp").unwrap());
    let messages = fx.sink.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], messages[1]);
    assert_eq!(messages[0], "Desk lamp [lamp] attributes: brightness, on");
}

#[test]
fn unknown_device_warns_and_is_unhandled() {
    let fx = Fixture::new();
    assert!(!fx.interpreter().interpret("ghost.on").unwrap());
    assert_eq!(fx.sink.warnings(), vec!["Device not found: ghost"]);
    assert!(fx.sink.messages().is_empty());
    assert!(fx.invoker.sets().is_empty());
}

#[test]
fn unknown_device_describe() {
    let fx = Fixture::new();
    assert!(!fx.interpreter().interpret("ghost").unwrap());
    assert_eq!(fx.sink.warnings(), vec!["Device not found: ghost"]);
}

#[test]
fn missing_member_is_reported() {
    let fx = Fixture::new();
    let interp = fx.interpreter();
    assert!(interp.interpret("lamp.color").unwrap());
    assert!(interp.interpret("lamp.color = red").unwrap());
    assert!(interp.interpret("lamp.blink()").unwrap());
    let errors = fx.sink.errors();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].starts_with("lamp: missing member 'color'"));
    assert!(errors[1].contains("color"));
    assert!(errors[2].starts_with("lamp: missing member 'blink'"));
}

#[test]
fn invocation_failure_propagates() {
    let fx = Fixture::new();
    let err = fx
        .interpreter()
        .interpret("lamp.brightness = bright")
        .unwrap_err();
    assert!(matches!(err, DevshError::InvocationFailed(_)));
    assert!(fx.sink.is_empty());
}

#[test]
fn ambiguous_param_on_known_device() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("lamp.blink(fast)").unwrap());
    let errors = fx.sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("fast"));
    assert!(fx.invoker.invokes().is_empty());
}

#[test]
fn ambiguous_param_on_unknown_device() {
    let fx = Fixture::new();
    assert!(!fx.interpreter().interpret("ghost.blink(fast)").unwrap());
    assert_eq!(fx.sink.warnings(), vec!["Device not found: ghost"]);
    assert!(fx.sink.errors().is_empty());
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn start_stop_restart() {
    let fx = Fixture::new();
    let interp = fx.interpreter();
    assert!(interp.interpret("start lamp").unwrap());
    assert!(fx.lamp.is_running());
    assert!(interp.interpret("stop lamp").unwrap());
    assert!(!fx.lamp.is_running());
    assert!(interp.interpret("restart lamp").unwrap());
    assert!(fx.lamp.is_running());
    assert_eq!(
        fx.sink.messages(),
        vec![
            " -- starting: lamp",
            " -- stopping: lamp",
            " -- restarting: lamp"
        ]
    );
}

#[test]
fn lifecycle_unknown_device() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("start ghost").unwrap());
    assert_eq!(fx.sink.warnings(), vec!["No device named: ghost"]);
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

#[test]
fn load_without_name_reports_error() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("load ").unwrap());
    assert_eq!(fx.sink.errors(), vec!["No script name specified"]);
    assert_eq!(fx.registry.ids(), vec!["lamp"]);
    assert!(fx.monitor.task_ids().is_empty());
}

#[test]
fn load_registers_script_as_device_and_task() {
    let fx = Fixture::new();
    fx.write_script("blink.dsh", "lamp.on = true\nlamp.on = false\n");
    let interp = fx.interpreter();
    assert!(interp.interpret("load blink fast 3").unwrap());
    assert_eq!(fx.sink.messages(), vec![" -- loaded script: blink"]);
    assert!(fx.registry.has("blink"));
    assert_eq!(fx.monitor.task_ids(), vec!["blink"]);

    fx.sink.clear();
    interp.interpret("blink.lines").unwrap();
    interp.interpret("blink.args").unwrap();
    assert_eq!(fx.sink.messages(), vec!["2", "[fast, 3]"]);
}

#[test]
fn reload_replaces_previous_task() {
    let fx = Fixture::new();
    fx.write_script("blink.dsh", "one\n");
    let interp = fx.interpreter();
    interp.interpret("load blink").unwrap();
    let first = fx.registry.get("blink").unwrap();

    fx.write_script("blink.dsh", "one\ntwo\nthree\n");
    interp.interpret("load blink").unwrap();
    assert!(!first.ready());
    assert_eq!(fx.monitor.task_ids(), vec!["blink"]);

    fx.sink.clear();
    interp.interpret("blink.lines").unwrap();
    assert_eq!(fx.sink.messages(), vec!["3"]);
}

#[test]
fn load_secondary_extension() {
    let fx = Fixture::new();
    fx.write_script("job.rb", "puts 1\n");
    assert!(fx.interpreter().interpret("load job.rb").unwrap());
    assert_eq!(fx.sink.messages(), vec![" -- loaded script: job"]);
    assert!(fx.registry.has("job"));
    assert!(!fx.registry.has("job.rb"));

    fx.sink.clear();
    fx.interpreter().interpret("job.path").unwrap();
    let expected = fx.scripts_dir().join("job.rb").display().to_string();
    assert_eq!(fx.sink.messages(), vec![expected]);
}

#[test]
fn load_missing_file_is_handled() {
    let fx = Fixture::new();
    assert!(fx.interpreter().interpret("load nothing").unwrap());
    let errors = fx.sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("not found"));
    assert!(!fx.registry.has("nothing"));
}

#[test]
fn loaded_script_lifecycle() {
    let fx = Fixture::new();
    fx.write_script("blink.dsh", "x\n");
    let interp = fx.interpreter();
    interp.interpret("load blink").unwrap();
    interp.interpret("start blink").unwrap();
    fx.sink.clear();
    interp.interpret("blink.state").unwrap();
    interp.interpret("stop blink").unwrap();
    interp.interpret("blink.state").unwrap();
    assert_eq!(
        fx.sink.messages(),
        vec!["running", " -- stopping: blink", "stopped"]
    );
}
