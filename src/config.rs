//! Plugin parameter parsing.
//!
//! protoc forwards `--mongoose_opt=<params>` verbatim. Parameters are
//! comma-separated `key=value` pairs; the only key is `target`.

use clap::ValueEnum;

use crate::error::{Error, Result};

/// Output language of the generated schema modules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// ES module syntax, `.schema.ts` files.
    #[default]
    #[value(name = "ts", alias = "typescript")]
    TypeScript,
    /// CommonJS syntax, `.schema.js` files.
    #[value(name = "js", alias = "javascript")]
    JavaScript,
}

impl Target {
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::TypeScript => ".schema.ts",
            Self::JavaScript => ".schema.js",
        }
    }

    pub fn import_statement(self) -> &'static str {
        match self {
            Self::TypeScript => "import { Schema } from 'mongoose';",
            Self::JavaScript => "const { Schema } = require('mongoose');",
        }
    }

    /// The left-hand side binding the schema to its export name.
    pub fn export_binding(self, export_name: &str) -> String {
        match self {
            Self::TypeScript => format!("export const {export_name}"),
            Self::JavaScript => format!("exports.{export_name}"),
        }
    }
}

/// Generation settings for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub target: Target,
}

impl Config {
    /// Parse the request's parameter string. Absent or empty means defaults.
    pub fn from_parameter(parameter: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        let items = parameter
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty());
        for item in items {
            let invalid = || Error::Parameter(item.to_string());
            let (key, value) = item.split_once('=').ok_or_else(invalid)?;
            match key.trim() {
                "target" => {
                    config.target =
                        <Target as ValueEnum>::from_str(value.trim(), false).map_err(|_| invalid())?
                }
                _ => return Err(invalid()),
            }
        }
        Ok(config)
    }
}
