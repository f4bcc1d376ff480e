use std::{fs, path::Path, path::PathBuf};

use oxc_span::SourceType;
use serde::Deserialize;

use crate::Error;

/// Options recognised by the CommonJS rewrite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformOptions {
    /// Namespace imports resolve straight to the require binding, and the
    /// module flag is a plain boolean assignment.
    pub strict: bool,
    /// Module flag is a plain boolean assignment instead of `defineProperty`.
    pub loose: bool,
    /// Append `module.exports = exports['default']` for default-only modules.
    pub add_exports: bool,
}

impl TransformOptions {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }

    /// Whether the module flag uses a plain assignment.
    pub(crate) fn plain_module_flag(&self) -> bool {
        self.strict || self.loose
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub source_type: Option<SourceType>,
    pub filename_for_source_type: Option<PathBuf>,
}

impl RunOptions {
    pub(crate) fn resolve_source_type(&self) -> Result<SourceType, Error> {
        if let Some(st) = self.source_type {
            return Ok(st);
        }
        match self.filename_for_source_type.as_ref() {
            Some(path) => SourceType::from_path(path)
                .map_err(|e| Error::InvalidSourceType { path: path.clone(), message: e.to_string() }),
            None => Ok(SourceType::mjs()),
        }
    }
}
