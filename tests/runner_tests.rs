use std::{ffi::OsString, fs, path::PathBuf};

use automark::{
    AutomarkError,
    paths::ProjectPaths,
    runner::{
        JestMode, ensure_jest_config, eslint_args, find_automarking_file, git_log_args, jest_args,
        server_args,
    },
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("automark-runner-{}", Uuid::new_v4()));
    fs::create_dir_all(root.join("src")).expect("create temp root");
    root
}

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

#[test]
fn exactly_one_automarking_file_is_found() {
    let root = temp_root();
    fs::write(root.join("automarking.test.ts"), "").expect("write test file");
    fs::write(root.join("echo.test.ts"), "").expect("write student test");

    let found = find_automarking_file(&root).expect("one automarking file");
    assert_eq!(found.file_name().and_then(|n| n.to_str()), Some("automarking.test.ts"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_automarking_file_is_fatal() {
    let root = temp_root();

    let err = find_automarking_file(&root).expect_err("no automarking file");
    assert!(matches!(err, AutomarkError::AutomarkingFileDiscovery { ref found } if found.is_empty()));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn ambiguous_automarking_files_are_fatal() {
    let root = temp_root();
    fs::write(root.join("automarking.test.ts"), "").expect("write ts test");
    fs::write(root.join("automarking.test.js"), "").expect("write js test");

    let err = find_automarking_file(&root).expect_err("two automarking files");
    match err {
        AutomarkError::AutomarkingFileDiscovery { found } => assert_eq!(found.len(), 2),
        other => panic!("unexpected error: {other}"),
    }

    let _ = fs::remove_dir_all(root);
}

#[test]
fn existing_jest_config_is_preferred() {
    let root = temp_root();
    let paths = ProjectPaths::new(root.clone());
    fs::write(root.join("jest.config.js"), "module.exports = {};").expect("write jest config");

    let config = ensure_jest_config(&paths).expect("jest config");

    assert_eq!(config, root.join("jest.config.js"));
    assert!(!paths.generated_jest_config().exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn jest_config_is_generated_when_absent() {
    let root = temp_root();
    let paths = ProjectPaths::new(root.clone());

    let config = ensure_jest_config(&paths).expect("jest config");

    assert_eq!(config, paths.generated_jest_config());
    let contents = fs::read_to_string(&config).expect("read generated config");
    assert!(contents.contains("verbose: true"));
    assert!(contents.contains("module.exports = config;"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn staff_jest_run_writes_json_for_the_automarking_file() {
    let paths = ProjectPaths::new(PathBuf::from("."));
    let args = strings(&jest_args(
        &paths,
        &paths.generated_jest_config(),
        &PathBuf::from("./automarking.test.ts"),
        false,
        JestMode::Staff,
    ));

    assert_eq!(
        args,
        [
            "jest",
            "--colors",
            "--verbose",
            "--runInBand",
            "--config=jest.config.cjs",
            "--json",
            "--outputFile=__automarking_test__.json",
            "automarking.test.ts",
        ]
    );
}

#[test]
fn student_jest_run_ignores_the_automarking_file_and_collects_coverage() {
    let paths = ProjectPaths::new(PathBuf::from("."));
    let args = strings(&jest_args(
        &paths,
        &paths.existing_jest_config(),
        &PathBuf::from("./automarking.test.js"),
        true,
        JestMode::Student,
    ));

    assert!(args.contains(&"--coverage".to_string()));
    assert!(args.contains(&"--coverageReporters=json-summary".to_string()));
    assert!(args.contains(&"--config=jest.config.js".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("--testPathIgnorePatterns=automarking.test.js"));
    assert!(!args.contains(&"--json".to_string()));
}

#[test]
fn server_runs_under_nyc_only_for_coverage() {
    let paths = ProjectPaths::new(PathBuf::from("."));

    assert_eq!(strings(&server_args(&paths, false)), ["ts-node", "src/server"]);
    assert_eq!(
        strings(&server_args(&paths, true)),
        ["nyc", "--reporter=json-summary", "ts-node", "src/server"]
    );
}

#[test]
fn eslint_json_run_writes_the_results_file() {
    let paths = ProjectPaths::new(PathBuf::from("."));

    assert_eq!(strings(&eslint_args(&paths, false)), ["eslint", "--color", "src", "./**.js"]);
    assert_eq!(
        strings(&eslint_args(&paths, true)),
        [
            "eslint",
            "--color",
            "src",
            "./**.js",
            "--format=json",
            "--output-file=__eslint_result___.json",
        ]
    );
}

#[test]
fn git_log_shows_requested_commit_count() {
    let args = strings(&git_log_args(10));
    assert_eq!(args[0], "log");
    assert_eq!(args[1], "-10");
    assert!(args.contains(&"--graph".to_string()));
}
