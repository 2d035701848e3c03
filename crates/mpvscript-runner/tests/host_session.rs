use std::fs;
use std::sync::Arc;

use mpvscript_client::config::ScriptingConfig;
use mpvscript_client::{LogLevel, MemoryHost, PropertyValue};
use mpvscript_events::{ClientIdentity, CompoundKey, HostEvent};
use mpvscript_runner::{BridgeRunner, DEFAULT_BUS_CAPACITY};
use mpvscript_scripting_host::{BindingSpec, ScriptRunner};
use tempfile::TempDir;
use tokio::sync::mpsc;

#[tokio::test]
async fn host_thread_drives_scripts_until_shutdown() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pause.py"), "").unwrap();
    fs::write(dir.path().join("broken.py"), "").unwrap();

    let host = Arc::new(MemoryHost::new());
    let config = ScriptingConfig {
        script_dir: Some(dir.path().to_path_buf()),
        ..ScriptingConfig::default()
    };
    let mut runner = ScriptRunner::new(host.clone(), config);
    let failures = runner.load_configured(|path, ctx| {
        let handle = ctx.handle().clone();
        if path.ends_with("broken.py") {
            ctx.add_binding(BindingSpec::new().key("b").name("explode"))
                .bind(|| panic!("script bug"));
        } else {
            ctx.add_binding(BindingSpec::new().key("space").name("toggle"))
                .bind(move || {
                    let paused = handle.get_property_bool("pause");
                    handle.set_property_bool("pause", !paused);
                    Ok(())
                });
        }
        Ok(())
    });
    assert!(failures.is_empty());

    let bridge = BridgeRunner::start(runner, DEFAULT_BUS_CAPACITY);
    let (tx, rx) = mpsc::unbounded_channel();

    let producer = std::thread::spawn(move || {
        let explode = CompoundKey::new(ClientIdentity::new("broken"), "explode");
        let toggle = CompoundKey::new(ClientIdentity::new("pause"), "toggle");
        tx.send(HostEvent::key_binding(&explode, "u-")).unwrap();
        tx.send(HostEvent::key_binding(&toggle, "d-")).unwrap();
        tx.send(HostEvent::key_binding(&toggle, "u-")).unwrap();
        tx.send(HostEvent::shutdown()).unwrap();
    });

    let reports = bridge.run(rx).await.unwrap();
    producer.join().unwrap();

    let broken = reports.iter().find(|r| r.identity.as_str() == "broken").unwrap();
    assert_eq!(broken.failed, 1);
    let pause = reports.iter().find(|r| r.identity.as_str() == "pause").unwrap();
    assert_eq!(pause.invoked, 1);

    assert_eq!(host.property("pause"), Some(PropertyValue::Flag(true)));
    assert_eq!(
        host.logs(LogLevel::Error),
        vec!["(broken) callback explode failed: panicked: script bug".to_string()]
    );
}
