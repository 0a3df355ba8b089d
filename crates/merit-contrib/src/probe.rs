//! Host, process and filesystem probes used to seed and validate the
//! standard variants.
//!
//! The traits are the seam for tests: [`System`] reads the real machine,
//! while tests substitute fixed values.

use std::path::Path;
use std::sync::Arc;

/// Facts about the host.
pub trait PlatformInfo: Send + Sync {
    fn node(&self) -> String;
    /// OS, architecture and OS version, e.g. `linux-x86_64-22.04`.
    fn platform(&self) -> String;
    fn runtime(&self) -> String;
}

/// Facts about the running process.
pub trait ProcessInfo: Send + Sync {
    fn pid(&self) -> u32;
    fn ppid(&self) -> Option<u32>;
    fn cmdline(&self) -> Vec<String>;
}

pub trait FileProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Probes backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

impl PlatformInfo for System {
    fn node(&self) -> String {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn platform(&self) -> String {
        format!(
            "{}-{}-{}",
            std::env::consts::OS,
            std::env::consts::ARCH,
            os_version()
        )
    }

    fn runtime(&self) -> String {
        concat!("merit ", env!("CARGO_PKG_VERSION")).to_string()
    }
}

impl ProcessInfo for System {
    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn ppid(&self) -> Option<u32> {
        #[cfg(unix)]
        {
            Some(std::os::unix::process::parent_id())
        }

        #[cfg(not(unix))]
        {
            None
        }
    }

    fn cmdline(&self) -> Vec<String> {
        std::env::args().collect()
    }
}

impl FileProbe for System {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn os_version() -> String {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("VERSION_ID="))
                    .map(|l| {
                        l.trim_start_matches("VERSION_ID=")
                            .trim_matches('"')
                            .to_string()
                    })
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(not(target_os = "linux"))]
    {
        "unknown".to_string()
    }
}

/// The probe set handed to the standard variants.
#[derive(Clone)]
pub struct Probes {
    pub platform: Arc<dyn PlatformInfo>,
    pub process: Arc<dyn ProcessInfo>,
    pub files: Arc<dyn FileProbe>,
}

impl Probes {
    #[must_use]
    pub fn system() -> Self {
        Self {
            platform: Arc::new(System),
            process: Arc::new(System),
            files: Arc::new(System),
        }
    }
}

impl Default for Probes {
    fn default() -> Self {
        Self::system()
    }
}
