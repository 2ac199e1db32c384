//! Precedence and validation through the full pipeline

use multiconf::{
    BaseConf, ConfPath, ConfigError, Configurable, ErrorHandling, Field, LoadInTurn, Observer,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Debug, Default)]
struct Limits {
    burst: u32,
}

impl Configurable for Limits {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::scalar("burst", &mut self.burst).default_value("10")]
    }
}

#[derive(Debug, Default)]
struct Service {
    base: BaseConf,
    x: i64,
    region: String,
    api_key: String,
    limits: Limits,
}

impl Configurable for Service {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::embedded("base", &mut self.base),
            Field::scalar("x", &mut self.x).default_value("1"),
            Field::scalar("region", &mut self.region).default_value("eu-west"),
            Field::scalar("api_key", &mut self.api_key),
            Field::nested("limits", &mut self.limits),
        ]
    }
}

impl ConfPath for Service {
    fn conf_path(&self) -> Option<&str> {
        self.base.conf_path()
    }
}

#[derive(Debug, Default)]
struct Strict {
    base: BaseConf,
    token: String,
    port: u16,
    region: String,
}

impl Configurable for Strict {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::embedded("base", &mut self.base),
            Field::scalar("token", &mut self.token).required(),
            Field::scalar("port", &mut self.port).required(),
            Field::scalar("region", &mut self.region).required().default_value("eu-west"),
        ]
    }
}

impl ConfPath for Strict {
    fn conf_path(&self) -> Option<&str> {
        self.base.conf_path()
    }
}

#[derive(Default)]
struct Events {
    failures: RefCell<Vec<String>>,
    files: RefCell<Vec<PathBuf>>,
}

impl Observer for Events {
    fn loader_failed(&self, loader: &str, _error: &ConfigError) {
        self.failures.borrow_mut().push(loader.to_string());
    }

    fn file_read(&self, path: &Path) {
        self.files.borrow_mut().push(path.to_path_buf());
    }
}

fn write_conf(dir: &TempDir, name: &str, content: &str) {
    let conf_dir = dir.path().join("conf");
    fs::create_dir_all(&conf_dir).expect("mkdir conf");
    fs::write(conf_dir.join(name), content).expect("write conf");
}

fn pipeline(dir: &TempDir, args: &[&str], vars: &[(&str, &str)]) -> LoadInTurn {
    LoadInTurn::new()
        .base_dir(dir.path())
        .args(args.iter().copied())
        .vars(vars.iter().copied())
        .error_handling(ErrorHandling::Continue)
}

#[test]
fn test_defaults_alone_satisfy_requirements() {
    let tmp = TempDir::new().expect("tmp");
    let mut service = Service::default();
    pipeline(&tmp, &[], &[]).load(&mut service).expect("defaults are enough");
    assert_eq!(service.x, 1);
    assert_eq!(service.region, "eu-west");
    assert_eq!(service.limits.burst, 10);
    assert_eq!(service.base.log_level, "info");
}

#[test]
fn test_environment_beats_conventional_file() {
    let tmp = TempDir::new().expect("tmp");
    write_conf(&tmp, "conf.json", r#"{"x": 3, "region": "us-east"}"#);
    let mut service = Service::default();
    pipeline(&tmp, &[], &[("X", "4")]).load(&mut service).expect("load");
    assert_eq!(service.x, 4);
    assert_eq!(service.region, "us-east");
}

#[test]
fn test_flag_beats_environment() {
    let tmp = TempDir::new().expect("tmp");
    let mut service = Service::default();
    pipeline(&tmp, &["--x", "6", "--limits-burst=20"], &[("X", "4"), ("LIMITS_BURST", "15")])
        .load(&mut service)
        .expect("load");
    assert_eq!(service.x, 6);
    assert_eq!(service.limits.burst, 20);
}

#[test]
fn test_flags_beat_explicit_toml_file() {
    let tmp = TempDir::new().expect("tmp");
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, "x = 5\nregion = \"ap-south\"\n").expect("write");
    let conf = explicit.to_str().expect("utf8 path");

    let mut service = Service::default();
    pipeline(&tmp, &["--conf", conf, "--x=9"], &[]).load(&mut service).expect("load");
    assert_eq!(service.x, 9);
    assert_eq!(service.region, "ap-south");
}

#[test]
fn test_explicit_file_beats_conventional_file_and_environment() {
    let tmp = TempDir::new().expect("tmp");
    write_conf(&tmp, "conf.yaml", "x: 2\nregion: conventional\napi_key: k1\n");
    fs::write(tmp.path().join("explicit.json"), r#"{"region": "explicit"}"#).expect("write");

    let mut service = Service::default();
    pipeline(&tmp, &[], &[("CONF", "explicit.json"), ("REGION", "from-env")])
        .load(&mut service)
        .expect("load");
    assert_eq!(service.region, "explicit");
    assert_eq!(service.x, 2);
    assert_eq!(service.api_key, "k1");
}

#[test]
fn test_missing_conventional_files_never_error() {
    let tmp = TempDir::new().expect("tmp");
    let events = Rc::new(Events::default());
    let mut service = Service::default();
    pipeline(&tmp, &[], &[]).observer(events.clone()).load(&mut service).expect("load");
    assert_eq!(events.failures.borrow().len(), 4);
    assert!(events.files.borrow().is_empty());
}

#[test]
fn test_missing_explicit_file_errors() {
    let tmp = TempDir::new().expect("tmp");
    let mut service = Service::default();
    let err = pipeline(&tmp, &["--conf", "nowhere/app.toml"], &[])
        .load(&mut service)
        .expect_err("explicit file must exist");
    assert!(matches!(err, ConfigError::FileNotFound { .. }), "{err}");
}

#[test]
fn test_conventional_file_is_reported_as_read() {
    let tmp = TempDir::new().expect("tmp");
    write_conf(&tmp, "conf.yml", "api_key: secret\n");
    let events = Rc::new(Events::default());
    let mut service = Service::default();
    pipeline(&tmp, &[], &[]).observer(events.clone()).load(&mut service).expect("load");
    assert_eq!(service.api_key, "secret");
    assert_eq!(*events.files.borrow(), vec![tmp.path().join("conf").join("conf.yml")]);
    assert_eq!(events.failures.borrow().len(), 3);
}

#[test]
fn test_malformed_environment_value_is_not_fatal() {
    let tmp = TempDir::new().expect("tmp");
    let events = Rc::new(Events::default());
    let mut service = Service::default();
    pipeline(&tmp, &[], &[("X", "not-a-number")])
        .observer(events.clone())
        .load(&mut service)
        .expect("best-effort pass");
    assert_eq!(service.x, 1);
    assert!(events.failures.borrow().iter().any(|loader| loader == "environment"));
}

#[test]
fn test_single_missing_required_field() {
    let tmp = TempDir::new().expect("tmp");
    let mut strict = Strict::default();
    let err = pipeline(&tmp, &["--port", "80"], &[]).load(&mut strict).expect_err("token unset");
    match err {
        ConfigError::Validation { missing } => assert_eq!(missing, vec!["token"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_every_missing_required_field_is_named() {
    let tmp = TempDir::new().expect("tmp");
    let mut strict = Strict::default();
    let err = pipeline(&tmp, &[], &[]).load(&mut strict).expect_err("token and port unset");
    match &err {
        ConfigError::Validation { missing } => assert_eq!(missing, &vec!["token", "port"]),
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("token") && message.contains("port"), "{message}");
}

#[test]
fn test_help_under_continue_is_reported() {
    let tmp = TempDir::new().expect("tmp");
    let events = Rc::new(Events::default());
    let mut service = Service::default();
    pipeline(&tmp, &["--help"], &[]).observer(events.clone()).load(&mut service).expect("load");
    assert!(events.failures.borrow().iter().any(|loader| loader == "flags"));
}
