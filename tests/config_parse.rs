use spp_loadtest::{config::Config, region::RegionTable};

#[test]
fn parse_example_config() {
    let raw = include_str!("../spp-loadtest.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    cfg.validate().expect("example config is valid");
    assert_eq!(cfg.target.endpoint, "/spp/");
    assert_eq!(cfg.run.requests, 1);
    assert_eq!(cfg.run.poll_deadline_seconds, 0);
    assert!(cfg.run.seed.is_none());
}

#[test]
fn configured_regions_extend_builtins() {
    let raw = include_str!("../spp-loadtest.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    let table = RegionTable::with_overrides(&cfg.regions);
    assert_eq!(table.names(), vec!["finland", "germany", "sweden"]);
    let sweden = table.lookup("SWEDEN").unwrap();
    assert!(sweden.contains(59.33, 18.07));
}

#[test]
fn rejects_inverted_region() {
    let raw = r#"
[regions.broken]
long_min = 10.0
long_max = 5.0
lat_min = 50.0
lat_max = 55.0
"#;
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(cfg.validate().is_err());
}
