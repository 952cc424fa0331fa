//! Conversion pipeline tests against fake `soffice` scripts.
//!
//! Each script mimics the converter's command-line contract closely enough
//! for the orchestrator: it reads `--convert-to` / `--outdir` and the input
//! path, then misbehaves in its own way.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use docbridge::{Config, ConversionDirection, ConvertError, Converter, Soffice, Workspace};
use tempfile::TempDir;

/// Writes `<outdir>/<stem>.<format>` holding `converted:` and the input.
const CONVERTING: &str = r#"#!/bin/sh
outdir=""
fmt=""
while [ $# -gt 1 ]; do
  case "$1" in
    --outdir) outdir="$2"; shift ;;
    --convert-to) fmt="$2"; shift ;;
  esac
  shift
done
name=$(basename "$1")
stem="${name%.*}"
printf 'converted:' > "$outdir/$stem.$fmt"
cat "$1" >> "$outdir/$stem.$fmt"
"#;

const SILENT: &str = "#!/bin/sh\nexit 0\n";

const FAILING: &str = "#!/bin/sh\necho 'source file could not be loaded' >&2\nexit 1\n";

const HANGING: &str = "#!/bin/sh\nexec sleep 30\n";

/// Writes a lock file and a file of the wrong type, but no `.docx`.
const WRONG_OUTPUT: &str = r#"#!/bin/sh
while [ $# -gt 1 ]; do
  case "$1" in
    --outdir) outdir="$2"; shift ;;
  esac
  shift
done
touch "$outdir/.~lock.x#" "$outdir/out.pdf"
"#;

struct Fixture {
    _bin: TempDir,
    scratch: TempDir,
    script: PathBuf,
}

impl Fixture {
    fn new(script: &str) -> Self {
        let bin = TempDir::new().unwrap();
        let path = bin.path().join("soffice");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            _bin: bin,
            scratch: TempDir::new().unwrap(),
            script: path,
        }
    }

    fn converter(&self) -> Converter {
        self.converter_with_timeout(Duration::from_secs(10))
    }

    fn converter_with_timeout(&self, timeout: Duration) -> Converter {
        let soffice = Soffice::new(&self.script)
            .with_timeout(timeout)
            .with_isolated_profile(false);
        Converter::new(soffice, Workspace::new(self.scratch.path()))
    }

    fn assert_workspace_empty(&self) {
        assert!(
            leftovers(self.scratch.path()).is_empty(),
            "workspace not cleaned: {:?}",
            leftovers(self.scratch.path())
        );
    }
}

fn leftovers(root: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(root) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn html_to_docx_returns_converter_output() {
    let fixture = Fixture::new(CONVERTING);

    let docx = fixture.converter().html_to_docx("<h1>Title</h1>").await.unwrap();
    let text = String::from_utf8(docx).unwrap();

    assert!(text.starts_with("converted:<!DOCTYPE html>"));
    assert!(text.contains("<h1>Title</h1>"));
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn complete_documents_are_not_rewrapped() {
    let fixture = Fixture::new(CONVERTING);
    let doc = "<!DOCTYPE html><html><body><p>x</p></body></html>";

    let docx = fixture.converter().html_to_docx(doc).await.unwrap();

    assert_eq!(docx, format!("converted:{doc}").into_bytes());
}

#[tokio::test]
async fn clean_exit_without_output_is_reported() {
    let fixture = Fixture::new(SILENT);

    let err = fixture.converter().html_to_docx("<p>x</p>").await.unwrap_err();

    match err {
        ConvertError::OutputNotProduced {
            extension, listing, ..
        } => {
            assert_eq!(extension, "docx");
            assert_eq!(listing.len(), 1, "only the staged input: {listing:?}");
            assert!(listing[0].ends_with(".html"));
        }
        other => panic!("expected OutputNotProduced, got {other:?}"),
    }
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn unrelated_new_files_do_not_count() {
    let fixture = Fixture::new(WRONG_OUTPUT);

    let err = fixture.converter().html_to_docx("<p>x</p>").await.unwrap_err();

    assert!(matches!(err, ConvertError::OutputNotProduced { .. }));
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn nonzero_exit_carries_stderr() {
    let fixture = Fixture::new(FAILING);

    let err = fixture.converter().html_to_docx("<p>x</p>").await.unwrap_err();

    match err {
        ConvertError::SubprocessError { status, stderr } => {
            assert_eq!(status, Some(1));
            assert!(stderr.contains("could not be loaded"));
        }
        other => panic!("expected SubprocessError, got {other:?}"),
    }
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn hung_converter_times_out() {
    let fixture = Fixture::new(HANGING);

    let err = fixture
        .converter_with_timeout(Duration::from_secs(1))
        .html_to_docx("<p>x</p>")
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::Timeout { seconds: 1 }));
    fixture.assert_workspace_empty();
}

/// Whether `pid` names a live, non-zombie process.
#[cfg(target_os = "linux")]
fn process_running(pid: u32) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
        return false;
    };
    // state follows the parenthesized command name
    let state = stat.rsplit(')').next().unwrap_or("").trim_start();
    !state.starts_with('Z') && !state.starts_with('X')
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn timeout_kills_forked_helpers() {
    let pids = TempDir::new().unwrap();
    let pid_file = pids.path().join("helper.pid");
    let script = format!(
        "#!/bin/sh\nsleep 30 &\necho $! > '{}'\nwait\n",
        pid_file.display()
    );
    let fixture = Fixture::new(&script);

    let err = fixture
        .converter_with_timeout(Duration::from_secs(1))
        .html_to_docx("<p>x</p>")
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Timeout { seconds: 1 }));

    let helper: u32 = std::fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    let mut running = process_running(helper);
    for _ in 0..50 {
        if !running {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        running = process_running(helper);
    }
    assert!(!running, "helper {helper} outlived the timed-out converter");
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn missing_binary_is_a_launch_error() {
    let scratch = TempDir::new().unwrap();
    let converter = Converter::new(
        Soffice::new("/nonexistent/docbridge/soffice"),
        Workspace::new(scratch.path()),
    );

    let err = converter.html_to_docx("<p>x</p>").await.unwrap_err();

    assert!(matches!(err, ConvertError::SubprocessLaunch { .. }));
    assert!(leftovers(scratch.path()).is_empty());
}

#[tokio::test]
async fn concurrent_jobs_get_their_own_output() {
    let fixture = Fixture::new(CONVERTING);
    let converter = fixture.converter();

    let (a, b) = tokio::join!(
        converter.html_to_docx("<p>first</p>"),
        converter.html_to_docx("<p>second</p>"),
    );
    let a = String::from_utf8(a.unwrap()).unwrap();
    let b = String::from_utf8(b.unwrap()).unwrap();

    assert!(a.contains("<p>first</p>") && !a.contains("second"));
    assert!(b.contains("<p>second</p>") && !b.contains("first"));
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn docx_to_html_decodes_output() {
    let fixture = Fixture::new(CONVERTING);

    let html = fixture.converter().docx_to_html(b"PK\x03\x04").await.unwrap();

    assert!(html.starts_with("converted:PK"));
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn docx_to_html_failures_are_conversion_failed() {
    let fixture = Fixture::new(FAILING);

    let err = fixture.converter().docx_to_html(b"PK").await.unwrap_err();

    match err {
        ConvertError::ConversionFailed { reason } => {
            assert!(reason.contains("could not be loaded"));
        }
        other => panic!("expected ConversionFailed, got {other:?}"),
    }
    fixture.assert_workspace_empty();
}

#[tokio::test]
async fn convert_bytes_stages_by_direction() {
    let fixture = Fixture::new(CONVERTING);

    let out = fixture
        .converter()
        .convert_bytes(b"<p>raw</p>", ConversionDirection::MarkupToBinary)
        .await
        .unwrap();

    assert_eq!(out, b"converted:<p>raw</p>");
}

#[tokio::test]
async fn converter_from_config_uses_explicit_path() {
    let fixture = Fixture::new(CONVERTING);
    let config = Config {
        soffice_path: Some(fixture.script.clone()),
        workspace_dir: fixture.scratch.path().to_path_buf(),
        timeout_secs: 5,
        isolate_profile: false,
        ..Config::default()
    };

    let converter = Converter::from_config(&config).unwrap();
    assert_eq!(converter.soffice().path(), fixture.script.as_path());
    assert_eq!(converter.soffice().timeout(), Duration::from_secs(5));

    converter.html_to_docx("<p>x</p>").await.unwrap();
    fixture.assert_workspace_empty();
}

#[test]
fn converter_from_config_rejects_missing_explicit_path() {
    let config = Config {
        soffice_path: Some(PathBuf::from("/nonexistent/docbridge/soffice")),
        ..Config::default()
    };

    let err = Converter::from_config(&config).unwrap_err();
    assert!(matches!(err, ConvertError::ConverterNotFound { .. }));
}
