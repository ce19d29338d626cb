//! End-to-end tests driving the built `sycl-aspect-filter` binary.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::{Command, Output};

use sycl_props::DeviceRequirements;

const DEVICES: &str = r#"
[targets.intel_gpu_pvc]
aspects = ["gpu", "accelerator", "fp16", "fp64"]
sub-group-sizes = [16, 32]

[targets.x86_64]
aspects = ["cpu"]
sub-group-sizes = [4, 8, 16]
may-support-other-aspects = true
"#;

fn filter(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sycl-aspect-filter"))
        .current_dir(dir)
        .args(args)
        .env_remove("SYCL_ASPECT_FILTER_LOG")
        .output()
        .expect("failed to spawn sycl-aspect-filter")
}

fn write_props(dir: &Path, name: &str, aspects: &[u32]) {
    let reqs = DeviceRequirements {
        aspects: Some(aspects.iter().copied().collect::<BTreeSet<_>>()),
        ..Default::default()
    };
    let mut buffer = Vec::new();
    reqs.to_property_set().write_to(&mut buffer);
    std::fs::write(dir.join(name), buffer).unwrap();
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn drops_rows_with_unsupported_aspects() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_props(root, "a.props", &[3]);
    write_props(root, "b.props", &[9]);
    std::fs::write(root.join("files.table"), "[IR|Properties]\na.o|a.props\nb.o|b.props\n").unwrap();
    std::fs::write(root.join("devices.toml"), DEVICES).unwrap();

    let out = filter(
        root,
        &[
            "files.table",
            "--target",
            "intel_gpu_pvc",
            "--device-config-file",
            "devices.toml",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(out.stderr.is_empty());

    let written = std::fs::read_to_string(root.join("files_filtered.table")).unwrap();
    assert_eq!(written, "[IR|Properties]\na.o|a.props\n");
}

#[test]
fn other_aspects_target_keeps_everything() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_props(root, "a.props", &[3]);
    write_props(root, "b.props", &[9]);
    let table = "[IR|Properties]\na.o|a.props\nb.o|b.props\n";
    std::fs::write(root.join("files.table"), table).unwrap();
    std::fs::write(root.join("devices.toml"), DEVICES).unwrap();

    let out = filter(
        root,
        &[
            "files.table",
            "-o",
            "kept.table",
            "--target",
            "x86_64",
            "--device-config-file",
            "devices.toml",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(std::fs::read_to_string(root.join("kept.table")).unwrap(), table);
}

#[test]
fn header_only_table_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("empty.txt"), "[Code|Properties|Symbols]\n").unwrap();
    std::fs::write(root.join("devices.toml"), DEVICES).unwrap();

    let out = filter(
        root,
        &[
            "empty.txt",
            "--target",
            "intel_gpu_pvc",
            "--device-config-file",
            "devices.toml",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        std::fs::read_to_string(root.join("empty_filtered.txt")).unwrap(),
        "[Code|Properties|Symbols]\n"
    );
}

#[test]
fn table_without_properties_is_copied() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let table = "[Code|Symbols]\nhost.o|missing.sym\n";
    std::fs::write(root.join("host.table"), table).unwrap();
    std::fs::write(root.join("devices.toml"), DEVICES).unwrap();

    let out = filter(
        root,
        &[
            "host.table",
            "--target",
            "intel_gpu_pvc",
            "--device-config-file",
            "devices.toml",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        std::fs::read_to_string(root.join("host_filtered.table")).unwrap(),
        table
    );
}

#[test]
fn unknown_target_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("files.table"), "[IR|Properties]\n").unwrap();
    std::fs::write(root.join("devices.toml"), DEVICES).unwrap();

    let out = filter(
        root,
        &[
            "files.table",
            "--target",
            "amd_gpu_gfx90a",
            "--device-config-file",
            "devices.toml",
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.starts_with("sycl-aspect-filter: "), "stderr: {err}");
    assert!(err.contains("unknown target 'amd_gpu_gfx90a'"));
    assert_eq!(err.lines().count(), 1);
    assert!(!root.join("files_filtered.table").exists());
}

#[test]
fn missing_target_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("files.table"), "[IR|Properties]\n").unwrap();

    let out = filter(root, &["files.table"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out), "sycl-aspect-filter: target not provided\n");
}

#[test]
fn missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = filter(dir.path(), &["nope.table", "--target", "x86_64"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stderr(&out),
        "sycl-aspect-filter: input file 'nope.table' not found\n"
    );
}

#[test]
fn bad_flag_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = filter(dir.path(), &["--frobnicate"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.starts_with("sycl-aspect-filter: "));
    assert_eq!(err.lines().count(), 1);
}

#[test]
fn malformed_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("files.table"), "[IR|Properties]\na.o\n").unwrap();
    std::fs::write(root.join("devices.toml"), DEVICES).unwrap();

    let out = filter(
        root,
        &[
            "files.table",
            "--target",
            "intel_gpu_pvc",
            "--device-config-file",
            "devices.toml",
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("line 2: expected 2 cells, found 1"));
    assert!(!root.join("files_filtered.table").exists());
}
