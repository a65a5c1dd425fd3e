//! `app_data_dir` resolution through the env-var override. Marked
//! `#[serial]` since the override is a process-global environment
//! variable and would otherwise race with any other test touching it.

use serial_test::serial;

#[test]
#[serial]
fn data_dir_env_override_wins_over_the_platform_default() {
    let dir = tempfile::tempdir().unwrap();
    unsafe {
        std::env::set_var("CONCOURSE_SIM_DATA_DIR", dir.path());
    }

    let resolved = concourse_sim::app_data_dir().unwrap();
    assert_eq!(resolved, dir.path());

    unsafe {
        std::env::remove_var("CONCOURSE_SIM_DATA_DIR");
    }
}
