use std::process::Command;

fn spp_loadtest(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_spp-loadtest"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn spp-loadtest")
}

#[test]
fn no_arguments_prints_help_and_exits_2() {
    let out = spp_loadtest(&[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stdout).contains("COUNTRY"));
}

#[test]
fn bad_profile_exits_2() {
    let out = spp_loadtest(&["finland", "fast"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("km/h integer or ALL"));
}

#[test]
fn unknown_country_is_logged_and_exits_1() {
    let out = spp_loadtest(&["atlantis", "60", "--no-color"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ERROR"), "{stderr}");
    assert!(stderr.contains("unknown country 'atlantis'"), "{stderr}");
}

#[test]
fn unreadable_config_is_reported_before_logging() {
    let out = spp_loadtest(&["finland", "60", "--config", "does/not/exist.toml"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("spp-loadtest: reading config"), "{stderr}");
}
