use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn resumegen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("resumegen").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn init_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    resumegen(dir.path()).arg("init").assert().success();
    dir
}

#[test]
fn test_init_then_build() {
    let dir = init_project();

    resumegen(dir.path())
        .args(["build", "python"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated python resume"));

    let doc = fs::read_to_string(dir.path().join("outputs/resume_python.md")).unwrap();
    assert!(doc.starts_with("# Jordan Rivera\n"));
    assert!(doc.contains("Rebuilt the settlement pipeline"));
    assert!(doc.contains("- **Python:** Python, Django, FastAPI, Celery"));
    assert!(!doc.contains("Spring Boot services"));
    assert!(doc.ends_with('\n') && !doc.ends_with("\n\n"));
}

#[test]
fn test_batch_continues_past_unknown_role() {
    let dir = init_project();

    resumegen(dir.path())
        .args(["build", "python", "unknown", "java"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown: Role not found"));

    assert!(dir.path().join("outputs/resume_python.md").exists());
    assert!(dir.path().join("outputs/resume_java.md").exists());
    assert!(!dir.path().join("outputs/resume_unknown.md").exists());
}

#[test]
fn test_build_every_role() {
    let dir = init_project();

    resumegen(dir.path()).args(["build", "--every"]).assert().success();

    for role in ["python", "java", "fullstack", "cloud", "mobile", "all"] {
        assert!(
            dir.path().join(format!("outputs/resume_{}.md", role)).exists(),
            "missing output for {}",
            role
        );
    }
}

#[test]
fn test_render_prints_to_stdout() {
    let dir = init_project();

    resumegen(dir.path())
        .args(["render", "java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Led migration of 40 Spring Boot services"))
        .stdout(predicate::str::contains("Django REST API").not());

    assert!(!dir.path().join("outputs").exists());
}

#[test]
fn test_dir_flag() {
    let dir = init_project();
    let elsewhere = tempfile::tempdir().unwrap();

    resumegen(elsewhere.path())
        .arg("-C")
        .arg(dir.path())
        .args(["render", "cloud"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AWS Certified Solutions Architect"));
}

#[test]
fn test_check_and_roles() {
    let dir = init_project();

    resumegen(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All 9 roles render"));

    resumegen(dir.path())
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("python\njava\n"));
}

#[test]
fn test_missing_field_fails_without_output() {
    let dir = init_project();
    fs::write(
        dir.path().join("templates/resume.md"),
        "# {{ name }}\n{{ nickname }}\n",
    )
    .unwrap();

    resumegen(dir.path())
        .args(["build", "python"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined variable `nickname`"));

    assert!(!dir.path().join("outputs/resume_python.md").exists());
}

#[test]
fn test_lenient_config_renders_missing_field_empty() {
    let dir = init_project();
    fs::write(
        dir.path().join("templates/resume.md"),
        "# {{ name }}{{ nickname }}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("resumegen.json"),
        r#"{ "undefined": "lenient" }"#,
    )
    .unwrap();

    resumegen(dir.path())
        .args(["render", "python"])
        .assert()
        .success()
        .stdout("# Jordan Rivera\n");
}

#[test]
fn test_bad_template_is_reported() {
    let dir = init_project();
    fs::write(
        dir.path().join("templates/resume.md"),
        "{% for s in summary %}{{ s }}",
    )
    .unwrap();

    resumegen(dir.path())
        .args(["build", "python"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_init_without_force_keeps_edits() {
    let dir = init_project();
    fs::write(dir.path().join("templates/resume.md"), "{{ name }}\n").unwrap();

    resumegen(dir.path()).arg("init").assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("templates/resume.md")).unwrap(),
        "{{ name }}\n"
    );

    resumegen(dir.path()).args(["init", "--force"]).assert().success();
    assert_ne!(
        fs::read_to_string(dir.path().join("templates/resume.md")).unwrap(),
        "{{ name }}\n"
    );
}

#[test]
fn test_successful_build_is_quiet_on_stderr() {
    let dir = init_project();

    resumegen(dir.path())
        .args(["build", "python"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    resumegen(dir.path())
        .args(["-v", "build", "python"])
        .assert()
        .success()
        .stderr(predicate::str::contains("built resume"));
}
