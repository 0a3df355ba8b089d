use std::io::IsTerminal;
use std::sync::OnceLock;

use merit_config::{MIN_WIDTH, OutputConfig};

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: usize,
    pub indent: usize,
}

const FALLBACK: UiPrefs = UiPrefs {
    table_color: false,
    term_width: 80,
    indent: 4,
};

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags, output: &OutputConfig) {
    let _ = UI_PREFS.set(resolve(
        flags,
        output,
        std::io::stdout().is_terminal(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

fn resolve(
    flags: &GlobalFlags,
    output: &OutputConfig,
    is_tty: bool,
    columns: Option<&str>,
) -> UiPrefs {
    let table_color = match flags.color {
        ColorMode::Always => flags.format == OutputFormat::Table,
        ColorMode::Never => false,
        ColorMode::Auto => {
            is_tty
                && flags.format == OutputFormat::Table
                && !flags.quiet
                && std::env::var_os("NO_COLOR").is_none()
        }
    };

    let term_width = columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= MIN_WIDTH)
        .map_or(output.max_width, |width| width.min(output.max_width));

    UiPrefs {
        table_color,
        term_width,
        indent: output.indent,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&FALLBACK)
}
