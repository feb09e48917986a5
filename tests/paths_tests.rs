use std::path::PathBuf;

use automark::{Settings, paths::ProjectPaths};

#[test]
fn project_paths_defaults_are_consistent() {
    let root = PathBuf::from("/builds/comp1531/lab04");

    let via_new = ProjectPaths::new(root.clone());
    let via_builder = automark::paths::project_paths().root_dir(root.clone()).build();

    let snapshot = |p: &ProjectPaths| {
        (
            p.root_dir().to_path_buf(),
            p.config_file().to_path_buf(),
            p.test_results().to_path_buf(),
            p.coverage_summary().to_path_buf(),
            p.lint_results().to_path_buf(),
            p.artifact().to_path_buf(),
            p.source_dir().to_path_buf(),
        )
    };

    assert_eq!(snapshot(&via_new), snapshot(&via_builder));
    assert_eq!(via_new.config_file(), root.join("automarking-config.json"));
    assert_eq!(via_new.coverage_summary(), root.join("coverage/coverage-summary.json"));
    assert_eq!(via_new.server_entry(), root.join("src/server"));
}

#[test]
fn builder_overrides_individual_files() {
    let paths = automark::paths::project_paths()
        .root_dir("/tmp/lab")
        .artifact(PathBuf::from("/tmp/out/mark.txt"))
        .build();

    assert_eq!(paths.artifact(), PathBuf::from("/tmp/out/mark.txt"));
    assert_eq!(paths.test_results(), PathBuf::from("/tmp/lab/__automarking_test__.json"));
}

#[test]
fn debug_runs_clean_up_every_generated_file() {
    let paths = ProjectPaths::default();
    let generated = paths.generated_files();

    assert_eq!(generated.len(), 4);
    assert!(generated.contains(&paths.artifact().to_path_buf()));
    assert!(generated.contains(&paths.generated_jest_config()));
    assert!(!generated.contains(&paths.coverage_summary().to_path_buf()));

    let settings = Settings::new(paths);
    assert!(!settings.cleanup());
    assert!(settings.with_cleanup(true).cleanup());
}

#[test]
fn timing_overrides_replace_only_their_own_setting() {
    let settings = Settings::new(ProjectPaths::new(PathBuf::from("/builds/comp1531/lab04")));
    let jest_timeout = settings.jest_timeout();

    let tuned = settings
        .with_server_boot(std::time::Duration::from_secs(9))
        .with_server_grace(std::time::Duration::from_millis(50));

    assert_eq!(tuned.server_boot().as_secs(), 9);
    assert_eq!(tuned.server_grace().as_millis(), 50);
    assert_eq!(tuned.jest_timeout(), jest_timeout);
    assert_eq!(
        tuned.with_jest_timeout(std::time::Duration::from_secs(1)).jest_timeout().as_secs(),
        1
    );
}
