use sk_domain::config::{Config, ConfigError, ConfigSeverity, StoreBackend};

/// Validate the config, print any issues and where the session record
/// will be kept.
///
/// Returns `false` when errors are found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let mut issues = config.validate();
    issues.extend(build_issues(config));

    println!("{}", describe_storage(config));

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count,
        issues.len() - error_count,
    );

    error_count == 0
}

/// One line naming the effective backend, the record's location and the
/// session lifetime.
pub fn describe_storage(config: &Config) -> String {
    let session = &config.session;
    let location = match config.store.backend {
        StoreBackend::File => format!(
            "file store at {}",
            config
                .store
                .path
                .join(&session.namespace)
                .join(&session.key)
                .display()
        ),
        StoreBackend::Memory => "memory store (not persisted)".to_string(),
        StoreBackend::Keychain => format!(
            "keychain service {}.{}, account {}",
            config.store.service, session.namespace, session.key
        ),
    };
    format!(
        "session record: {location}; lifetime {:.2} days",
        session.duration_secs as f64 / 86_400.0
    )
}

/// Issues that depend on how this binary was built rather than on the file.
fn build_issues(config: &Config) -> Vec<ConfigError> {
    let mut issues = Vec::new();
    if config.store.backend == StoreBackend::Keychain && !cfg!(feature = "keychain") {
        issues.push(ConfigError {
            severity: ConfigSeverity::Error,
            field: "store.backend".into(),
            message: "keychain backend needs a build with the `keychain` feature".into(),
        });
    }
    issues
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
