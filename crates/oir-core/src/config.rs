use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::GeneratorInvocation;

/// Top-level project configuration loaded from `.oir.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OirConfig {
    pub input: String,
    pub output: String,
    /// Workspace name handed to generators.
    pub workspace: String,
    pub organization: String,
    pub conversion: ConvertOptions,
    pub generators: Vec<GeneratorInvocation>,
}

impl Default for OirConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "ir.json".to_string(),
            workspace: "api".to_string(),
            organization: "default".to_string(),
            conversion: ConvertOptions::default(),
            generators: Vec::new(),
        }
    }
}

/// Options that change how a document is converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    #[serde(rename = "content_conflict")]
    pub content_conflict_policy: ContentConflictPolicy,
    /// Longest `$ref` chain followed while flattening `allOf`.
    pub max_reference_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            content_conflict_policy: ContentConflictPolicy::default(),
            max_reference_depth: 64,
        }
    }
}

/// Which representation survives when a request body declares both JSON
/// and multipart content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentConflictPolicy {
    #[default]
    PreferMultipart,
    PreferJson,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oir.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OirConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: OirConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oir configuration: https://github.com/urmzd/openapi-ir
input: openapi.yaml
output: ir.json
workspace: api
organization: default

conversion:
  content_conflict: prefer_multipart  # prefer_multipart | prefer_json
  max_reference_depth: 64

generators: []
  # - name: fernapi/fern-typescript-sdk
  #   version: 0.9.0
  #   output:
  #     mode: download_files
  #     path: ./generated/typescript
  #   config: {}
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::OutputMode;

    #[test]
    fn test_default_config() {
        let config = OirConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.output, "ir.json");
        assert_eq!(
            config.conversion.content_conflict_policy,
            ContentConflictPolicy::PreferMultipart
        );
        assert_eq!(config.conversion.max_reference_depth, 64);
        assert!(config.generators.is_empty());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: spec.yaml
output: out/ir.json
workspace: blog
organization: acme
conversion:
  content_conflict: prefer_json
  max_reference_depth: 8
generators:
  - name: fernapi/fern-typescript-sdk
    version: 0.9.0
    output:
      mode: download_files
      path: ./generated
  - name: fernapi/fern-java-sdk
    version: 0.3.1
    output:
      mode: github
      owner: acme
      repo: blog-java
"#;
        let config: OirConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "spec.yaml");
        assert_eq!(config.workspace, "blog");
        assert_eq!(config.organization, "acme");
        assert_eq!(
            config.conversion.content_conflict_policy,
            ContentConflictPolicy::PreferJson
        );
        assert_eq!(config.conversion.max_reference_depth, 8);
        assert_eq!(config.generators.len(), 2);
        assert!(matches!(
            config.generators[0].output,
            OutputMode::DownloadFiles { .. }
        ));
        assert!(matches!(config.generators[1].output, OutputMode::Github { .. }));
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: OirConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        // Defaults applied
        assert_eq!(config.output, "ir.json");
        assert_eq!(config.conversion, ConvertOptions::default());
    }

    #[test]
    fn test_default_content_parses() {
        let config: OirConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "openapi.yaml");
        assert!(config.generators.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let loaded = load_config(Path::new("/definitely/not/here/.oir.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}
