//! Input settings: how document files are decoded when the extension does
//! not say.

use merit_core::Format;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub format: Format,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_json() {
        assert_eq!(InputConfig::default().format, Format::Json);
    }
}
