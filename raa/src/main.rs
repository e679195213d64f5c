//! RAA plugin entry point: reads the serialized parsed model on stdin and
//! answers with the per-asset RAA document on stdout. Diagnostics go to
//! stderr only.

use std::collections::BTreeMap;
use std::io::Read;

use anyhow::Context;
use serde::Serialize;
use stria_model::ParsedModel;

#[derive(Serialize)]
struct RaaOutput {
    raa: BTreeMap<String, f64>,
    intro_text: String,
}

fn main() -> anyhow::Result<()> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("unable to read model from stdin")?;
    let mut model: ParsedModel =
        serde_json::from_str(&buffer).context("unable to parse model document")?;
    model.update_derived_indices();

    let intro_text = stria_raa::calculate_raa(&mut model);
    let raa = model
        .technical_assets
        .values()
        .map(|asset| (asset.id.clone(), asset.raa))
        .collect();

    serde_json::to_writer(std::io::stdout().lock(), &RaaOutput { raa, intro_text })
        .context("unable to write RAA document")?;
    Ok(())
}
