//! CLI integration tests for md-tasks
//!
//! These tests run the binary against a temporary project and check both the
//! printed output and the markdown file left behind.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the md-tasks binary
///
/// The global config directory points into `dir/.global` so a developer's own
/// settings never leak into the tests.
fn md_tasks_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("md-tasks"));
    cmd.current_dir(dir)
        .env("MD_TASKS_CONFIG_DIR", dir.join(".global"))
        .env_remove("MD_TASKS_FILE");
    cmd
}

/// Create a temporary directory and initialize an md-tasks project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    md_tasks_cmd(dir.path()).arg("init").assert().success();
    dir
}

/// Create a project whose task file has the given content
fn project_with(content: &str) -> TempDir {
    let dir = setup_project();
    fs::write(dir.path().join("tasks.md"), content).unwrap();
    dir
}

fn read_tasks(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("tasks.md")).unwrap()
}

const BOARD: &str = "# Tasks\n\n## Todo\n\n* 1: write docs\n* 2: fix bug\n\n## Doing\n\n* 3: review\n\n## Done\n";

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    md_tasks_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized md-tasks project"));

    assert!(dir.path().join("md-tasks.toml").is_file());
    assert_eq!(read_tasks(&dir), "# Tasks\n\n## Todo\n\n## Doing\n\n## Done\n");
}

#[test]
fn test_init_is_idempotent() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept existing task file"));

    assert_eq!(read_tasks(&dir), BOARD);
}

#[test]
fn test_commands_require_task_file() {
    let dir = TempDir::new().unwrap();

    md_tasks_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task file not found"));
}

// =============================================================================
// Add Tests
// =============================================================================

#[test]
fn test_add_to_first_section() {
    let dir = setup_project();

    md_tasks_cmd(dir.path())
        .args(["add", "Buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: "))
        .stdout(predicate::str::contains(": Buy milk"));

    let content = read_tasks(&dir);
    let todo = content.find("## Todo").unwrap();
    let doing = content.find("## Doing").unwrap();
    let task = content.find(": Buy milk").unwrap();
    assert!(todo < task && task < doing);
}

#[test]
fn test_add_json_reports_ids() {
    let dir = setup_project();

    let output = md_tasks_cmd(dir.path())
        .args(["--format", "json", "add", "one", "two", "--section", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["section"], 1);
    let tasks = json["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["text"], "one");
    assert_eq!(tasks[1]["text"], "two");

    // Batch ids count up from the same timestamp
    let first: i64 = tasks[0]["id"].as_str().unwrap().parse().unwrap();
    let second: i64 = tasks[1]["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(second, first + 1);

    let id = tasks[0]["id"].as_str().unwrap();
    md_tasks_cmd(dir.path())
        .args(["locate", id])
        .assert()
        .success()
        .stdout("1\tDoing\n");
}

#[test]
fn test_add_keeps_markup_characters() {
    let dir = setup_project();

    md_tasks_cmd(dir.path())
        .args(["add", "fix ~~old~~ new", "use &copy; sign", "C# *notes*"])
        .assert()
        .success();

    let output = md_tasks_cmd(dir.path())
        .args(["-f", "json", "list"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let texts: Vec<_> = json[0]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["text"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(texts, vec!["fix ~~old~~ new", "use &copy; sign", "C# *notes*"]);
}

#[test]
fn test_add_reads_text_from_stdin() {
    let dir = setup_project();

    md_tasks_cmd(dir.path())
        .arg("add")
        .write_stdin("Call mom\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(": Call mom"));

    assert!(read_tasks(&dir).contains(": Call mom"));
}

#[test]
fn test_add_rejects_empty_stdin() {
    let dir = setup_project();

    md_tasks_cmd(dir.path())
        .arg("add")
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task text"));
}

#[test]
fn test_add_to_missing_section_fails() {
    let dir = setup_project();

    md_tasks_cmd(dir.path())
        .args(["add", "nowhere", "--section", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section not found: 7"));

    assert_eq!(read_tasks(&dir), "# Tasks\n\n## Todo\n\n## Doing\n\n## Done\n");
}

#[test]
fn test_add_without_sections_fails() {
    let dir = project_with("# Just a title\n");

    md_tasks_cmd(dir.path())
        .args(["add", "task"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is no section"));
}

#[test]
fn test_add_uses_hash_ids_when_configured() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("md-tasks.toml"), "id_style = \"hash\"\n").unwrap();
    md_tasks_cmd(dir.path()).arg("init").assert().success();

    let output = md_tasks_cmd(dir.path())
        .args(["--format", "json", "add", "hashed"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = json["tasks"][0]["id"].as_str().unwrap();

    assert_eq!(id.len(), 7);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_add_uses_configured_default_section() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("md-tasks.toml"), "default_section = 2\n").unwrap();
    md_tasks_cmd(dir.path()).arg("init").assert().success();

    md_tasks_cmd(dir.path()).args(["add", "late"]).assert().success();

    let content = read_tasks(&dir);
    assert!(content.find(": late").unwrap() > content.find("## Done").unwrap());
}

// =============================================================================
// Shift Tests
// =============================================================================

#[test]
fn test_shift_forward() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["shift", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shifted: 1: write docs (section 0 -> 1)"));

    assert_eq!(
        read_tasks(&dir),
        "# Tasks\n\n## Todo\n\n* 2: fix bug\n\n## Doing\n\n* 3: review\n* 1: write docs\n\n## Done\n"
    );
}

#[test]
fn test_shift_backward_with_step() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["shift", "1", "--step", "2"])
        .assert()
        .success();

    md_tasks_cmd(dir.path())
        .args(["shift", "1", "--backward", "--step", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(section 2 -> 0)"));

    md_tasks_cmd(dir.path())
        .args(["locate", "1"])
        .assert()
        .success()
        .stdout("0\tTodo\n");
}

#[test]
fn test_shift_into_empty_section_creates_list() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["shift", "3"])
        .assert()
        .success();

    assert_eq!(
        read_tasks(&dir),
        "# Tasks\n\n## Todo\n\n* 1: write docs\n* 2: fix bug\n\n## Doing\n\n## Done\n\n* 3: review\n"
    );
}

#[test]
fn test_shift_to_section() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["shift", "3", "--to", "0"])
        .assert()
        .success();

    md_tasks_cmd(dir.path())
        .args(["locate", "3"])
        .assert()
        .success()
        .stdout("0\tTodo\n");
}

#[test]
fn test_shift_past_last_section_fails() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["shift", "3", "--step", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section not found"));

    md_tasks_cmd(dir.path())
        .args(["shift", "1", "--backward"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section not found: -1"));

    assert_eq!(read_tasks(&dir), BOARD);
}

#[test]
fn test_shift_unknown_task_fails() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["shift", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: 404"));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_task() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["remove", "2"])
        .assert()
        .success()
        .stdout("Removed: 2: fix bug\n");

    assert_eq!(
        read_tasks(&dir),
        "# Tasks\n\n## Todo\n\n* 1: write docs\n\n## Doing\n\n* 3: review\n\n## Done\n"
    );
}

#[test]
fn test_remove_unknown_task_fails() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["remove", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: 404"));

    assert_eq!(read_tasks(&dir), BOARD);
}

#[test]
fn test_remove_without_id_needs_terminal() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .arg("remove")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task ID is not specified"));
}

#[test]
fn test_remove_json_output() {
    let dir = project_with(BOARD);

    let output = md_tasks_cmd(dir.path())
        .args(["-f", "json", "remove", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "3");
    assert_eq!(json["text"], "review");
    assert_eq!(json["section"], 1);
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_list_groups_by_section() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(
            "## Todo\n  1: write docs\n  2: fix bug\n\n## Doing\n  3: review\n\n## Done\n  (no tasks)\n",
        );
}

#[test]
fn test_list_without_sections() {
    let dir = project_with("Nothing here\n");

    md_tasks_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sections"));
}

#[test]
fn test_sections_table() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .arg("sections")
        .assert()
        .success()
        .stdout(predicate::str::contains("SECTION"))
        .stdout(predicate::str::is_match(r"(?m)^0\s+2\s+Todo$").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^2\s+0\s+Done$").unwrap());
}

#[test]
fn test_locate_unknown_task_fails() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["locate", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_show_task_and_malformed_item() {
    let dir = project_with("## Todo\n\n* just a note\n* 5: real task\n");

    md_tasks_cmd(dir.path())
        .args(["show", "0", "1"])
        .assert()
        .success()
        .stdout("5: real task\n");

    md_tasks_cmd(dir.path())
        .args(["show", "0", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a task"));

    md_tasks_cmd(dir.path())
        .args(["show", "0", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_export_document_json() {
    let dir = project_with("## Todo\n\n* 1: a\n");

    let output = md_tasks_cmd(dir.path())
        .args(["-f", "json", "export"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let children = json["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["type"], "heading");
    assert_eq!(children[1]["type"], "list");
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_file_override() {
    let dir = setup_project();
    fs::write(dir.path().join("other.md"), "## Inbox\n").unwrap();

    md_tasks_cmd(dir.path())
        .args(["--file", "other.md", "add", "elsewhere"])
        .assert()
        .success();

    assert!(fs::read_to_string(dir.path().join("other.md"))
        .unwrap()
        .contains(": elsewhere"));
    assert!(!read_tasks(&dir).contains("elsewhere"));

    md_tasks_cmd(dir.path())
        .env("MD_TASKS_FILE", "other.md")
        .arg("sections")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inbox"));
}

#[test]
fn test_init_honors_file_override() {
    let dir = TempDir::new().unwrap();

    md_tasks_cmd(dir.path())
        .args(["--file", "x.md", "init"])
        .assert()
        .success();

    assert!(dir.path().join("x.md").is_file());
    assert!(!dir.path().join("tasks.md").exists());

    md_tasks_cmd(dir.path())
        .args(["--file", "x.md", "sections"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Todo"));
}

#[test]
fn test_malformed_global_config_is_reported() {
    let dir = project_with(BOARD);
    let global = dir.path().join(".global");
    fs::create_dir_all(&global).unwrap();
    fs::write(global.join("config.toml"), "default_format = [\n").unwrap();

    md_tasks_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse global config"));
}

#[test]
fn test_global_default_format() {
    let dir = project_with(BOARD);
    let global = dir.path().join(".global");
    fs::create_dir_all(&global).unwrap();
    fs::write(global.join("config.toml"), "default_format = \"json\"\n").unwrap();

    let output = md_tasks_cmd(dir.path()).args(["locate", "3"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["section"], 1);
    assert_eq!(json["title"], "Doing");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = project_with(BOARD);

    md_tasks_cmd(dir.path())
        .args(["--verbose", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:project]"));
}

#[test]
fn test_runs_from_subdirectory() {
    let dir = project_with(BOARD);
    let nested = dir.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();

    let mut cmd = md_tasks_cmd(dir.path());
    cmd.current_dir(&nested)
        .args(["locate", "2"])
        .assert()
        .success()
        .stdout("0\tTodo\n");
}
