#![deny(missing_docs)]

//! CLI entry point: compare two audio files for fingerprint similarity.
//!
//! Usage: `sonoprint <file1> <file2>`. Progress lines go to stderr, the
//! final verdict to stdout. Exits non-zero on failure.

use std::path::PathBuf;
use std::process::ExitCode;

use sonoprint::job::{self, JobEvent};
use sonoprint::logging;

fn main() -> ExitCode {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let mut args = std::env::args_os().skip(1);
    let (Some(file1), Some(file2), None) = (args.next(), args.next(), args.next()) else {
        eprintln!("Usage: sonoprint <file1> <file2>");
        return ExitCode::from(2);
    };

    let handle = job::spawn_comparison(PathBuf::from(file1), PathBuf::from(file2));
    let mut exit = ExitCode::FAILURE;
    for event in handle.events().iter() {
        match event {
            JobEvent::Progress {
                percent,
                status,
                eta,
            } => eprintln!("[{percent:3}%] {status} ({eta})"),
            JobEvent::Finished(verdict) => {
                println!("{verdict}");
                exit = ExitCode::SUCCESS;
            }
            JobEvent::Failed(message) => {
                eprintln!("Comparison failed: {message}");
                exit = ExitCode::FAILURE;
            }
        }
    }
    handle.join();
    exit
}
