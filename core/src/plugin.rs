use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use serde::Deserialize;
use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_rules::RiskRule;
use tracing::warn;

use crate::error::Error;
use crate::error::Result;

/// Document returned by an RAA plugin: the relative attacker attractiveness
/// per technical asset id plus an optional human-readable introduction.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RaaPluginOutput {
    #[serde(default)]
    pub raa: BTreeMap<String, f64>,
    #[serde(default)]
    pub intro_text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DescribeOutput {
    category: RiskCategory,
    #[serde(default)]
    supported_tags: Vec<String>,
}

/// Invokes the RAA plugin executable with the serialized model on stdin and
/// parses its answer. Every failure mode surfaces as a plugin error; the
/// engine downgrades those to a warning and zero-filled RAA.
pub fn run_raa_plugin(
    bin_folder: &Path,
    plugin: &str,
    model: &ParsedModel,
) -> Result<RaaPluginOutput> {
    let payload = serde_json::to_vec(model).map_err(|err| Error::Plugin {
        name: plugin.to_string(),
        message: format!("unable to serialize model: {err}"),
    })?;
    let stdout = run_plugin(&bin_folder.join(plugin), plugin, &[], Some(&payload))?;
    serde_json::from_slice(&stdout).map_err(|err| Error::Plugin {
        name: plugin.to_string(),
        message: format!("unable to parse plugin output: {err}"),
    })
}

/// A custom risk rule backed by a plugin executable. The category descriptor
/// and supported tags are fetched once at load time via `describe`; risk
/// generation pipes the model through `generate-risks`.
#[derive(Debug)]
pub struct PluginRiskRule {
    executable: PathBuf,
    name: String,
    category: RiskCategory,
    supported_tags: Vec<String>,
}

impl PluginRiskRule {
    pub fn load(bin_folder: &Path, name: &str) -> Result<Self> {
        let executable = bin_folder.join(name);
        let stdout = run_plugin(&executable, name, &["describe"], None)?;
        let describe: DescribeOutput =
            serde_json::from_slice(&stdout).map_err(|err| Error::Plugin {
                name: name.to_string(),
                message: format!("unable to parse describe output: {err}"),
            })?;
        if describe.category.id.trim().is_empty() {
            return Err(Error::Plugin {
                name: name.to_string(),
                message: "describe output carries an empty category id".to_string(),
            });
        }
        Ok(Self {
            executable,
            name: name.to_string(),
            category: describe.category,
            supported_tags: describe.supported_tags,
        })
    }
}

impl RiskRule for PluginRiskRule {
    fn category(&self) -> RiskCategory {
        self.category.clone()
    }

    fn supported_tags(&self) -> Vec<String> {
        self.supported_tags.clone()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let payload = match serde_json::to_vec(model) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(plugin = %self.name, "unable to serialize model for plugin: {err}");
                return Vec::new();
            }
        };
        let stdout = match run_plugin(
            &self.executable,
            &self.name,
            &["generate-risks"],
            Some(&payload),
        ) {
            Ok(stdout) => stdout,
            Err(err) => {
                warn!(plugin = %self.name, "custom risk rule execution failed: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&stdout) {
            Ok(risks) => risks,
            Err(err) => {
                warn!(plugin = %self.name, "unable to parse generated risks: {err}");
                Vec::new()
            }
        }
    }
}

fn run_plugin(
    executable: &Path,
    name: &str,
    args: &[&str],
    input: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut command = Command::new(executable);
    command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    command.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = command.spawn().map_err(|err| Error::Plugin {
        name: name.to_string(),
        message: format!("unable to spawn {}: {err}", executable.display()),
    })?;
    if let Some(payload) = input
        && let Some(mut stdin) = child.stdin.take()
    {
        stdin.write_all(payload).map_err(|err| Error::Plugin {
            name: name.to_string(),
            message: format!("unable to write plugin input: {err}"),
        })?;
    }
    let output = child.wait_with_output().map_err(|err| Error::Plugin {
        name: name.to_string(),
        message: format!("unable to collect plugin output: {err}"),
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Plugin {
            name: name.to_string(),
            message: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_executable_is_a_plugin_error() {
        let model = ParsedModel::default();
        let result = run_raa_plugin(Path::new("/nonexistent"), "no-such-plugin", &model);
        assert!(matches!(result, Err(Error::Plugin { .. })));
    }

    #[test]
    fn raa_output_parses_with_defaults() {
        let output: RaaPluginOutput = serde_json::from_str("{}").expect("parses");
        assert_eq!(output, RaaPluginOutput::default());

        let output: RaaPluginOutput =
            serde_json::from_str(r#"{"raa":{"web-app":55.5},"intro_text":"calculated"}"#)
                .expect("parses");
        assert_eq!(output.raa["web-app"], 55.5);
        assert_eq!(output.intro_text, "calculated");
    }
}
