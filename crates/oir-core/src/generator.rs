//! Configuration handed to an external generator process.
//!
//! Nothing here runs a generator. These types describe an invocation as
//! written in `.oir.yaml` and derive the config file a generator container
//! reads, along with the bind mounts it needs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GeneratorConfigError;

/// Directory inside the generator container that receives output.
pub const CONTAINER_OUTPUT_DIRECTORY: &str = "/oir/output";
/// Path inside the generator container where the IR file is mounted.
pub const CONTAINER_IR_PATH: &str = "/oir/ir.json";
/// Path inside the generator container where the snippet file is written.
pub const CONTAINER_SNIPPET_PATH: &str = "/oir/snippet.json";

const PLACEHOLDER_VERSION: &str = "0.0.1";

/// One generator entry from the project config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorInvocation {
    pub name: String,
    pub version: String,
    pub output: OutputMode,
    /// Generator-specific settings, passed through untouched.
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Where a generator's output goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutputMode {
    DownloadFiles {
        path: String,
    },
    Publish {
        #[serde(default)]
        registry_url: Option<String>,
        package_name: String,
    },
    Github {
        owner: String,
        repo: String,
    },
    /// A mode written by a newer config format.
    #[serde(other)]
    Unsupported,
}

/// Config file consumed by the generator process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorExecConfig {
    pub ir_filepath: String,
    pub output: GeneratorOutputConfig,
    pub custom_config: serde_json::Value,
    pub workspace_name: String,
    pub organization: String,
    pub environment: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOutputConfig {
    pub mode: ExecOutputMode,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_filepath: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExecOutputMode {
    DownloadFiles,
    #[serde(rename_all = "camelCase")]
    Publish {
        version: String,
        registry_url: String,
        package_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Github { repo_url: String, version: String },
}

/// A generator config plus the `host:container` bind mounts it relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorPlan {
    pub config: GeneratorExecConfig,
    pub binds: Vec<String>,
}

/// Derive the config for one generator invocation. A snippet file is only
/// mounted for GitHub output.
pub fn generator_exec_config(
    invocation: &GeneratorInvocation,
    workspace: &str,
    organization: &str,
    snippet: Option<&Path>,
) -> Result<GeneratorPlan, GeneratorConfigError> {
    let mut binds = Vec::new();
    let output = match &invocation.output {
        OutputMode::DownloadFiles { .. } => GeneratorOutputConfig {
            mode: ExecOutputMode::DownloadFiles,
            path: CONTAINER_OUTPUT_DIRECTORY.to_string(),
            snippet_filepath: None,
        },
        OutputMode::Publish {
            registry_url,
            package_name,
        } => GeneratorOutputConfig {
            mode: ExecOutputMode::Publish {
                version: PLACEHOLDER_VERSION.to_string(),
                registry_url: registry_url.clone().unwrap_or_default(),
                package_name: package_name.clone(),
            },
            path: CONTAINER_OUTPUT_DIRECTORY.to_string(),
            snippet_filepath: None,
        },
        OutputMode::Github { owner, repo } => {
            let mut output = GeneratorOutputConfig {
                mode: ExecOutputMode::Github {
                    repo_url: format!("https://github.com/{owner}/{repo}"),
                    version: PLACEHOLDER_VERSION.to_string(),
                },
                path: CONTAINER_OUTPUT_DIRECTORY.to_string(),
                snippet_filepath: None,
            };
            if let Some(snippet) = snippet {
                binds.push(format!("{}:{CONTAINER_SNIPPET_PATH}", snippet.display()));
                output.snippet_filepath = Some(CONTAINER_SNIPPET_PATH.to_string());
            }
            output
        }
        OutputMode::Unsupported => {
            return Err(GeneratorConfigError::UnsupportedOutputMode(
                invocation.name.clone(),
            ));
        }
    };

    Ok(GeneratorPlan {
        config: GeneratorExecConfig {
            ir_filepath: CONTAINER_IR_PATH.to_string(),
            output,
            custom_config: invocation.config.clone(),
            workspace_name: workspace.to_string(),
            organization: organization.to_string(),
            environment: "local".to_string(),
            dry_run: false,
        },
        binds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(output: OutputMode) -> GeneratorInvocation {
        GeneratorInvocation {
            name: "fernapi/fern-typescript-sdk".to_string(),
            version: "0.9.0".to_string(),
            output,
            config: serde_json::json!({"namespaceExport": "Blog"}),
        }
    }

    #[test]
    fn test_download_files() {
        let plan = generator_exec_config(
            &invocation(OutputMode::DownloadFiles {
                path: "./generated".to_string(),
            }),
            "blog",
            "acme",
            Some(Path::new("/tmp/snippet.json")),
        )
        .unwrap();
        assert_eq!(plan.config.output.mode, ExecOutputMode::DownloadFiles);
        assert_eq!(plan.config.output.path, CONTAINER_OUTPUT_DIRECTORY);
        assert_eq!(plan.config.ir_filepath, CONTAINER_IR_PATH);
        assert_eq!(plan.config.workspace_name, "blog");
        assert_eq!(plan.config.custom_config["namespaceExport"], "Blog");
        assert!(plan.binds.is_empty());
    }

    #[test]
    fn test_github_mounts_snippet() {
        let plan = generator_exec_config(
            &invocation(OutputMode::Github {
                owner: "acme".to_string(),
                repo: "blog-node".to_string(),
            }),
            "blog",
            "acme",
            Some(Path::new("/tmp/snippet.json")),
        )
        .unwrap();
        assert_eq!(
            plan.config.output.mode,
            ExecOutputMode::Github {
                repo_url: "https://github.com/acme/blog-node".to_string(),
                version: "0.0.1".to_string(),
            }
        );
        assert_eq!(plan.binds, vec!["/tmp/snippet.json:/oir/snippet.json"]);
        assert_eq!(
            plan.config.output.snippet_filepath.as_deref(),
            Some(CONTAINER_SNIPPET_PATH)
        );
    }

    #[test]
    fn test_github_without_snippet() {
        let plan = generator_exec_config(
            &invocation(OutputMode::Github {
                owner: "acme".to_string(),
                repo: "blog-node".to_string(),
            }),
            "blog",
            "acme",
            None,
        )
        .unwrap();
        assert!(plan.binds.is_empty());
        assert!(plan.config.output.snippet_filepath.is_none());
    }

    #[test]
    fn test_unsupported_mode_fails() {
        let invocation: GeneratorInvocation = serde_yaml_ng::from_str(
            "name: x\nversion: 1.0.0\noutput:\n  mode: maven_central\n",
        )
        .unwrap();
        assert_eq!(invocation.output, OutputMode::Unsupported);
        let err = generator_exec_config(&invocation, "blog", "acme", None).unwrap_err();
        assert!(matches!(err, GeneratorConfigError::UnsupportedOutputMode(name) if name == "x"));
    }
}
