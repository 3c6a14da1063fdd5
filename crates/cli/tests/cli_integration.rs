use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("aargs-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn aargs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aargs"))
}

fn write_schema(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("aargs.json");
    fs::write(&path, json).expect("failed to write schema");
    path
}

fn stdout_json(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "aargs failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    serde_json::from_slice(&out.stdout).expect("stdout is not JSON")
}

#[test]
fn help_works() {
    let out = aargs()
        .arg("--help")
        .output()
        .expect("failed to run aargs --help");
    assert!(
        out.status.success(),
        "aargs --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("scan") && stdout.contains("bind") && stdout.contains("usage"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn scan_splits_tokens() {
    let dir = make_temp_dir("scan");
    let out = aargs()
        .current_dir(&dir)
        .args(["scan", "--", "look", "how", "--easy", "--this=is", "to", "use!"])
        .output()
        .expect("failed to run aargs scan");
    let json = stdout_json(&out);
    assert_eq!(
        json,
        serde_json::json!({
            "prologue": ["look", "how"],
            "flags": { "easy": true, "this": "is" },
            "epilogue": ["to", "use!"],
        })
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn scan_of_nothing_is_null() {
    let dir = make_temp_dir("scan-empty");
    let out = aargs()
        .current_dir(&dir)
        .args(["scan", "--compact"])
        .output()
        .expect("failed to run aargs scan");
    assert_eq!(stdout_json(&out), serde_json::Value::Null);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bind_uses_schema_from_working_directory() {
    let dir = make_temp_dir("bind");
    write_schema(&dir, r#"{ "prologue": ["mode"], "epilogue": "etc" }"#);

    let out = aargs()
        .current_dir(&dir)
        .args([
            "bind",
            "--",
            "anything",
            "extra1",
            "--read-all-about-it",
            "--",
            "extra2",
            "extra3",
        ])
        .output()
        .expect("failed to run aargs bind");
    assert_eq!(
        stdout_json(&out),
        serde_json::json!({
            "mode": "anything",
            "read_all_about_it": true,
            "etc": ["extra1", "extra2", "extra3"],
        })
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bind_reports_unexpected_epilogue() {
    let dir = make_temp_dir("bind-epilogue");
    let schema = write_schema(&dir, r#"{ "prologue": ["mode"] }"#);

    let out = aargs()
        .arg("bind")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "anything", "extra"])
        .output()
        .expect("failed to run aargs bind");
    assert!(!out.status.success(), "bind unexpectedly succeeded");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("unexpected epilogue"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_renders_flag_table() {
    let dir = make_temp_dir("usage");
    write_schema(
        &dir,
        r#"{ "prologue": ["mode"], "flags": { "src": { "help": "file to operate on" } } }"#,
    );

    let out = aargs()
        .current_dir(&dir)
        .args(["usage", "--program", "examples"])
        .output()
        .expect("failed to run aargs usage");
    assert!(
        out.status.success(),
        "aargs usage failed:\nstderr:\n{}",
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout,
        "Usage: examples MODE --src=VALUE\n  --src=VALUE : file to operate on\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_explicit_schema_fails() {
    let dir = make_temp_dir("missing-schema");
    let out = aargs()
        .current_dir(&dir)
        .args(["usage", "--schema", "nope.json"])
        .output()
        .expect("failed to run aargs usage");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("schema not found"));

    let _ = fs::remove_dir_all(&dir);
}
