//! Fixed probes and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use merit_contrib::{FileProbe, PlatformInfo, Probes, ProcessInfo, System};
use merit_contrib::{StandardHandlers, standard_registry};
use merit_core::{Handler, Registry};

pub struct FixedHost;

impl PlatformInfo for FixedHost {
    fn node(&self) -> String {
        "build-01".to_string()
    }

    fn platform(&self) -> String {
        "linux-x86_64-22.04".to_string()
    }

    fn runtime(&self) -> String {
        "merit 0.0.0".to_string()
    }
}

impl ProcessInfo for FixedHost {
    fn pid(&self) -> u32 {
        4242
    }

    fn ppid(&self) -> Option<u32> {
        Some(1)
    }

    fn cmdline(&self) -> Vec<String> {
        vec!["merit".to_string(), "run".to_string()]
    }
}

/// Reports only the listed paths as existing.
pub struct KnownFiles(pub HashSet<PathBuf>);

impl FileProbe for KnownFiles {
    fn exists(&self, path: &Path) -> bool {
        self.0.contains(path)
    }
}

pub fn fixed_probes(files: &[&str]) -> Probes {
    Probes {
        platform: Arc::new(FixedHost),
        process: Arc::new(FixedHost),
        files: Arc::new(KnownFiles(files.iter().map(PathBuf::from).collect())),
    }
}

/// Fixed host and process, real filesystem.
pub fn host_probes() -> Probes {
    Probes {
        platform: Arc::new(FixedHost),
        process: Arc::new(FixedHost),
        files: Arc::new(System),
    }
}

pub fn registry(probes: &Probes) -> (Registry, StandardHandlers) {
    standard_registry(probes).unwrap()
}

/// A `global:default:v1` document with every required root key set.
pub fn default_merit(handlers: &StandardHandlers) -> Handler {
    let mut root = handlers.default.instantiate().unwrap();
    root.set_namespace("test");
    root.set_path("project=alpha/run=20134");
    root.set_name("Run output");
    root.set_description("Run output");
    root
}
