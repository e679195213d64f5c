use std::path::PathBuf;

/// Run configuration, assembled from defaults plus CLI overrides in one
/// step. The engine never consults ambient state beyond this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The threat model input document.
    pub input_file: PathBuf,
    /// Folder receiving the generated report.
    pub output_folder: PathBuf,
    /// Folder holding the RAA and custom-rule plugin executables.
    pub bin_folder: PathBuf,
    /// Executable name of the RAA plugin, resolved relative to `bin_folder`.
    pub raa_plugin: String,
    /// Executable names of custom risk rule plugins, resolved relative to
    /// `bin_folder`.
    pub risk_rules_plugins: Vec<String>,
    /// Rule ids to skip during evaluation. Unknown ids are reported but not
    /// fatal.
    pub skip_risk_rules: Vec<String>,
    /// When true, tracking entries matching no generated risk only warn.
    pub ignore_orphaned_risk_tracking: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("threat-model.yaml"),
            output_folder: PathBuf::from("output"),
            bin_folder: PathBuf::from("."),
            raa_plugin: "stria-raa".to_string(),
            risk_rules_plugins: Vec::new(),
            skip_risk_rules: Vec::new(),
            ignore_orphaned_risk_tracking: false,
        }
    }
}
