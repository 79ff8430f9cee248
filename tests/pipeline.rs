use std::collections::HashSet;
use std::fs;
use std::future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use credspray_rs::engine;
use credspray_rs::{
    ConfigError, CredentialPair, CredentialSpec, Outcome, Probe, ProbeError, ProbeRegistry, RunConfig, RunStatus,
    StopReason, Target,
};
use tempfile::TempDir;

/// Accepts one fixed pair and counts every call.
struct FixedPair {
    login: &'static str,
    password: &'static str,
    calls: Arc<AtomicUsize>,
}

impl FixedPair {
    fn new(login: &'static str, password: &'static str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            FixedPair {
                login,
                password,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl Probe for FixedPair {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn default_port(&self, _tls: bool) -> u16 {
        9
    }

    fn attempt(&self, target: &Target, pair: &CredentialPair) -> Result<Outcome, ProbeError> {
        assert_eq!(target.port, 9);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if pair.login == self.login && pair.password == self.password {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failure)
        }
    }
}

/// Accepts any password for logins starting with "ok".
struct PrefixProbe;

impl Probe for PrefixProbe {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn default_port(&self, _tls: bool) -> u16 {
        9
    }

    fn attempt(&self, _target: &Target, pair: &CredentialPair) -> Result<Outcome, ProbeError> {
        if pair.login.starts_with("ok") && pair.password.len() % 2 == 0 {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::TransportError("unreachable".into()))
        }
    }
}

fn write_list(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

fn config_for(protocol: &str, credentials: CredentialSpec) -> RunConfig {
    RunConfig {
        target: "127.0.0.1".into(),
        protocol: protocol.into(),
        credentials,
        ..RunConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn finds_exactly_the_accepted_pair() {
    let dir = TempDir::new().unwrap();
    let sink = dir.path().join("found.txt");
    let credentials = CredentialSpec {
        login_file: Some(write_list(&dir, "users.txt", &["admin", "root"])),
        password_file: Some(write_list(&dir, "passwords.txt", &["secret", "wrong"])),
        ..CredentialSpec::default()
    };
    let config = RunConfig {
        output: Some(sink.clone()),
        ..config_for("fake", credentials)
    };

    let (probe, calls) = FixedPair::new("admin", "secret");
    let mut registry = ProbeRegistry::new();
    registry.register("fake", probe);

    let results = engine::run(&config, &registry, future::pending()).await.unwrap();

    assert_eq!(results.found, vec![CredentialPair::new("admin", "secret")]);
    assert_eq!(results.queued, 4);
    assert_eq!(results.attempted, 4);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(results.stop, StopReason::Drained);
    assert_eq!(results.status(), RunStatus::Found(1));
    assert_eq!(fs::read_to_string(&sink).unwrap(), "Login: admin, Password: secret\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn queue_holds_full_cartesian_product_with_duplicates() {
    let dir = TempDir::new().unwrap();
    let credentials = CredentialSpec {
        login_file: Some(write_list(&dir, "users.txt", &["a", "b", "a"])),
        password_file: Some(write_list(&dir, "passwords.txt", &["1", "2", "3", "2"])),
        ..CredentialSpec::default()
    };
    let config = config_for("fake", credentials);

    let (probe, calls) = FixedPair::new("nobody", "nothing");
    let mut registry = ProbeRegistry::new();
    registry.register("fake", probe);

    let results = engine::run(&config, &registry, future::pending()).await.unwrap();
    assert_eq!(results.queued, 12);
    assert_eq!(calls.load(Ordering::SeqCst), 12);
    assert_eq!(results.status(), RunStatus::NoneFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn result_set_does_not_depend_on_concurrency() {
    let logins: Vec<String> = (0..20).map(|i| if i % 3 == 0 { format!("ok{}", i) } else { format!("no{}", i) }).collect();
    let dir = TempDir::new().unwrap();
    let login_refs: Vec<&str> = logins.iter().map(String::as_str).collect();
    let credentials = CredentialSpec {
        login_file: Some(write_list(&dir, "users.txt", &login_refs)),
        generate: Some("1:3:xy".parse().unwrap()),
        seed: Some(5),
        ..CredentialSpec::default()
    };

    let mut registry = ProbeRegistry::new();
    registry.register("prefix", PrefixProbe);

    let mut sets = Vec::new();
    for threads in [1, 3, 16] {
        let config = RunConfig {
            concurrency: threads,
            ..config_for("prefix", credentials.clone())
        };
        let results = engine::run(&config, &registry, future::pending()).await.unwrap();
        assert_eq!(results.queued, 20 * 14);
        assert_eq!(results.attempted, 20 * 14);
        sets.push(results.found.into_iter().collect::<HashSet<_>>());
    }

    // 7 ok-logins x 4 even-length passwords (xx, xy, yx, yy)
    assert_eq!(sets[0].len(), 7 * 4);
    assert_eq!(sets[0], sets[1]);
    assert_eq!(sets[0], sets[2]);
}

#[tokio::test(flavor = "multi_thread")]
async fn first_success_stops_the_run() {
    let credentials = CredentialSpec {
        login: Some("admin".into()),
        generate: Some("1:2:abcdefgh".parse().unwrap()),
        ..CredentialSpec::default()
    };
    let config = RunConfig {
        stop_on_first_success: true,
        concurrency: 1,
        ..config_for("anything", credentials)
    };

    struct Anything(Arc<AtomicUsize>);
    impl Probe for Anything {
        fn name(&self) -> &'static str {
            "anything"
        }
        fn default_port(&self, _tls: bool) -> u16 {
            9
        }
        fn attempt(&self, _target: &Target, _pair: &CredentialPair) -> Result<Outcome, ProbeError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::Success)
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ProbeRegistry::new();
    registry.register("anything", Anything(Arc::clone(&calls)));

    let results = engine::run(&config, &registry, future::pending()).await.unwrap();
    assert_eq!(results.stop, StopReason::FirstSuccess);
    assert_eq!(results.queued, 8 + 64);
    assert_eq!(results.attempted, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(results.found.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_login_file_prevents_any_attempt() {
    let dir = TempDir::new().unwrap();
    let credentials = CredentialSpec {
        login_file: Some(dir.path().join("does-not-exist.txt")),
        password_file: Some(write_list(&dir, "passwords.txt", &["secret"])),
        ..CredentialSpec::default()
    };
    let config = config_for("fake", credentials);

    let (probe, calls) = FixedPair::new("admin", "secret");
    let mut registry = ProbeRegistry::new();
    registry.register("fake", probe);

    let err = engine::run(&config, &registry, future::pending()).await.unwrap_err();
    assert!(matches!(err, ConfigError::ListFile { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_list_is_reported_as_nothing_tried() {
    let dir = TempDir::new().unwrap();
    let credentials = CredentialSpec {
        login_file: Some(write_list(&dir, "users.txt", &["", "   "])),
        password: Some("secret".into()),
        ..CredentialSpec::default()
    };
    let config = config_for("fake", credentials);

    let (probe, calls) = FixedPair::new("admin", "secret");
    let mut registry = ProbeRegistry::new();
    registry.register("fake", probe);

    let results = engine::run(&config, &registry, future::pending()).await.unwrap();
    assert_eq!(results.status(), RunStatus::NothingTried);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn output_file_gets_one_line_per_success() {
    let dir = TempDir::new().unwrap();
    let sink = dir.path().join("found.txt");
    fs::write(&sink, "Login: earlier, Password: run\n").unwrap();

    let credentials = CredentialSpec {
        login_file: Some(write_list(&dir, "users.txt", &["ok1", "ok2", "bad"])),
        password_file: Some(write_list(&dir, "passwords.txt", &["aa", "b"])),
        ..CredentialSpec::default()
    };
    let config = RunConfig {
        output: Some(sink.clone()),
        concurrency: 3,
        ..config_for("prefix", credentials)
    };

    let mut registry = ProbeRegistry::new();
    registry.register("prefix", PrefixProbe);

    let results = engine::run(&config, &registry, future::pending()).await.unwrap();
    assert_eq!(results.found.len(), 2);

    let content = fs::read_to_string(&sink).unwrap();
    let lines: HashSet<&str> = content.lines().collect();
    assert_eq!(content.lines().count(), 3);
    assert!(lines.contains("Login: earlier, Password: run"));
    assert!(lines.contains("Login: ok1, Password: aa"));
    assert!(lines.contains("Login: ok2, Password: aa"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_protocol_is_rejected_up_front() {
    let config = config_for(
        "telnet",
        CredentialSpec {
            login: Some("a".into()),
            password: Some("b".into()),
            ..CredentialSpec::default()
        },
    );
    let registry = ProbeRegistry::builtin(&config);
    let err = engine::run(&config, &registry, future::pending()).await.unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedProtocol { .. }));
}
