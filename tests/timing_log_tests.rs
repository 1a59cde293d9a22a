/// Completion logs of each pipeline stage carry how long the stage took
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use recon::rbac::load_rbac_dir;
use recon::reconcile::reconcile;
use recon::report::{load_report, LineFilter};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
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
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn subscriber(logs: &CapturedLogs) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish()
}

fn line_with<'a>(text: &'a str, message: &str) -> &'a str {
    text.lines()
        .find(|line| line.contains(message))
        .unwrap_or_else(|| panic!("no log line containing {:?} in:\n{}", message, text))
}

#[tokio::test]
async fn test_stage_logs_report_elapsed_time() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(subscriber(&logs));

    let users = load_report(&fixtures().join("R01RUGAR_20241030.rpt"), LineFilter::default())
        .await
        .unwrap();
    let rbac = load_rbac_dir(&fixtures().join("rbac")).await.unwrap();
    reconcile(&users, &rbac.profile_users);

    let text = logs.text();
    assert!(line_with(&text, "Parsed 3 operators").contains("elapsed_ms="));
    assert!(line_with(&text, "Loaded 3 profile assignments").contains("elapsed_ms="));
    assert!(line_with(&text, "Reconciled 3 report operators").contains("elapsed_ms="));
}
