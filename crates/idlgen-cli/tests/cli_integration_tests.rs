//! Integration tests for the idlgen binary.
//!
//! Runs the built executable against the calc fixture shared with the
//! conformance crate and against small hand-written programs.

#![allow(non_snake_case)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn idlgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_idlgen"))
}

fn calc_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../idlgen-conformance/fixtures/calc.json")
}

fn write_program(dir: &TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Generate
// =============================================================================

mod generate {
    use super::*;

    #[test]
    fn generate___calc_fixture___writes_three_units() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("gen");

        let output = idlgen()
            .arg("generate")
            .arg("-i")
            .arg(calc_fixture())
            .arg("-o")
            .arg(&out)
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        for name in ["calc_types.rs", "calc.rs", "calc_impl.rs"] {
            assert!(out.join(name).exists(), "missing {name}");
        }
        assert!(stdout(&output).contains("✓ Generated"));
    }

    #[test]
    fn generate___twice___identical_output() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");

        for out in [&first, &second] {
            let status = idlgen()
                .args(["generate", "-i"])
                .arg(calc_fixture())
                .arg("-o")
                .arg(out)
                .status()
                .unwrap();
            assert!(status.success());
        }

        for name in ["calc_types.rs", "calc.rs", "calc_impl.rs"] {
            assert_eq!(
                fs::read(first.join(name)).unwrap(),
                fs::read(second.join(name)).unwrap()
            );
        }
    }

    #[test]
    fn generate___config_file___applied() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("idlgen.toml");
        fs::write(&config, "runtime_crate = \"rpc_rt\"\nheader = false\n").unwrap();
        let out = temp.path().join("gen");

        let output = idlgen()
            .args(["generate", "--base", "shapes", "-i"])
            .arg(calc_fixture())
            .arg("-o")
            .arg(&out)
            .arg("-c")
            .arg(&config)
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let interfaces = fs::read_to_string(out.join("shapes.rs")).unwrap();
        assert!(interfaces.starts_with("// unit: shapes\n"));
        assert!(interfaces.contains("::rpc_rt::"));
    }

    #[test]
    fn generate___cyclic_program___schema_exit_status() {
        let temp = TempDir::new().unwrap();
        let input = write_program(
            &temp,
            "cycle.json",
            r#"{"definitions": [{"kind": "struct", "name": "Node", "fields": [
                {"id": 1, "name": "next", "type": {"struct": "Node"}}
            ]}]}"#,
        );
        let out = temp.path().join("gen");

        let output = idlgen()
            .args(["generate", "-i"])
            .arg(&input)
            .arg("-o")
            .arg(&out)
            .output()
            .unwrap();

        // CyclicType has error code 2
        assert_eq!(output.status.code(), Some(12));
        assert!(stderr(&output).contains("Node"));
        assert!(!out.exists());
    }

    #[test]
    fn generate___missing_input___exit_status_one() {
        let temp = TempDir::new().unwrap();

        let output = idlgen()
            .args(["generate", "-i"])
            .arg(temp.path().join("absent.json"))
            .arg("-o")
            .arg(temp.path().join("gen"))
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Failed to load program"));
    }
}

// =============================================================================
// Check
// =============================================================================

mod check {
    use super::*;

    #[test]
    fn check___calc_fixture___reports_counts() {
        let output = idlgen()
            .args(["check", "-i"])
            .arg(calc_fixture())
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let report = stdout(&output);
        assert!(report.contains("is valid"));
        assert!(report.contains("Services: 1 (5 functions)"));
    }

    #[test]
    fn check___invalid_exception___schema_exit_status() {
        let temp = TempDir::new().unwrap();
        let input = write_program(
            &temp,
            "bad.json",
            r#"{"definitions": [
                {"kind": "struct", "name": "Point", "fields": []},
                {"kind": "service", "name": "Geo", "functions": [
                    {"name": "locate", "return_type": {"struct": "Point"},
                     "throws": [{"id": 1, "name": "err", "type": {"struct": "Point"}}]}
                ]}
            ]}"#,
        );

        let output = idlgen().args(["check", "-i"]).arg(&input).output().unwrap();

        // InvalidException has error code 5
        assert_eq!(output.status.code(), Some(15));
    }

    #[test]
    fn check___writes_no_files() {
        let temp = TempDir::new().unwrap();
        let input = fs::read_to_string(calc_fixture()).unwrap();
        let input = write_program(&temp, "calc.json", &input);

        let status = idlgen()
            .args(["check", "-i"])
            .arg(&input)
            .current_dir(temp.path())
            .status()
            .unwrap();

        assert!(status.success());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
