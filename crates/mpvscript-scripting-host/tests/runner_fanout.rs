use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mpvscript_client::config::ScriptingConfig;
use mpvscript_client::MemoryHost;
use mpvscript_events::{ClientIdentity, CompoundKey, HostEvent};
use mpvscript_scripting_host::{BindingSpec, Dispatch, ScriptRunner};
use tempfile::TempDir;

#[test]
fn messages_reach_only_their_own_script() {
    let dir = TempDir::new().unwrap();
    for name in ["left.py", "right.py"] {
        fs::write(dir.path().join(name), "").unwrap();
    }

    let host = Arc::new(MemoryHost::new());
    let mut runner = ScriptRunner::new(host.clone(), ScriptingConfig::default());
    let hits = Arc::new(AtomicUsize::new(0));

    for name in ["left.py", "right.py"] {
        let h = hits.clone();
        runner
            .load_script(&dir.path().join(name), move |ctx| {
                let h = h.clone();
                ctx.add_binding(BindingSpec::new().key("x").name("go"))
                    .bind(move || {
                        h.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    });
                Ok(())
            })
            .unwrap();
    }

    let target = CompoundKey::new(ClientIdentity::new("right"), "go");
    let outcomes = runner.handle_event(&HostEvent::key_binding(&target, "u-"));
    assert_eq!(
        outcomes,
        vec![
            (ClientIdentity::new("left"), Dispatch::Foreign),
            (ClientIdentity::new("right"), Dispatch::Invoked("go".into())),
        ]
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let names: Vec<String> = host.defined_sections().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["py_left_kbs", "py_right_kbs"]);
}
