#![allow(dead_code)]

use rox::error::{CollectingReporter, Diagnostic};
use rox::session::{RunStatus, Session};

/// What one program produced: its `print` output, every diagnostic, and the
/// overall status.
pub struct Outcome {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
    pub status: RunStatus,
}

impl Outcome {
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(Diagnostic::message).collect()
    }
}

pub fn session() -> Session<Vec<u8>, CollectingReporter> {
    Session::new(Vec::new(), CollectingReporter::new())
}

pub fn output_of(session: &Session<Vec<u8>, CollectingReporter>) -> String {
    String::from_utf8(session.output().clone()).expect("program output is UTF-8")
}

/// Run `source` in a fresh session.
pub fn run(source: &str) -> Outcome {
    let mut session = session();
    let status = session.run(source);

    Outcome {
        output: output_of(&session),
        diagnostics: session.reporter().diagnostics.clone(),
        status,
    }
}
