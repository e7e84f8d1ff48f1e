use super::{Api, Discovery, DiscoveryMode, Logs, Manager, ManagerBox, Poller, Remote, Runtime};
use std::collections::HashMap;
use std::time::Duration;

/// Creates a new test configuration.
///
/// Discovery is static and empty; callers register addresses with
/// `cfg.manager.discovery` before building the application.
pub fn new_test_config() -> Manager {
    Manager {
        manager: ManagerBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            runtime: Some(Runtime { num_cpus: 2 }),
            api: Some(Api {
                name: Some("imc-manager:8091".to_string()),
                port: Some("8091".to_string()),
            }),
            poller: Some(Poller {
                enabled: false,
                interval: Some(Duration::from_millis(200)),
            }),
            remote: Some(Remote {
                timeout: Some(Duration::from_millis(500)),
                connect_timeout: Some(Duration::from_millis(200)),
            }),
            discovery: Some(Discovery {
                mode: DiscoveryMode::Static,
                static_addrs: HashMap::new(),
                eureka: None,
            }),
            services: None,
            pipeline: None,
            k8s: None,
        },
    }
}
