//! Arena operations emit tracing events without disturbing results

use std::io;
use std::sync::{Arc, Mutex};

use linear_arena::{ArenaConfig, HeapArena};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

/// Collects formatted events in memory
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_operations_emit_events() {
    let logs = CapturedLogs::default();
    let _guard = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_writer(logs.clone())
        .finish()
        .set_default();

    let mut arena = HeapArena::with_config(ArenaConfig::small()).unwrap();
    let start = arena.snapshot();
    arena.alloc(128).unwrap();
    let ahead = arena.snapshot();
    arena.rewind(start).unwrap();

    assert!(arena.alloc(usize::MAX).is_err());
    assert!(arena.rewind(ahead).is_err());

    arena.alloc(4).unwrap();
    let clone = arena.try_clone().unwrap();
    arena.reset();
    clone.release();

    assert_eq!(arena.used(), 0);

    let output = logs.contents();
    if cfg!(feature = "logging") {
        for event in [
            "created heap arena",
            "arena rewound",
            "arena exceeded capacity",
            "refusing to rewind arena forward",
            "cloned arena",
            "arena reset",
            "released heap arena",
        ] {
            assert!(output.contains(event), "missing {event:?} in:\n{output}");
        }
    } else {
        assert!(output.is_empty());
    }
}
