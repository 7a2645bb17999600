use loadpack_common::OutputAsset;

#[derive(Debug, Default)]
pub struct BundleOutput {
  pub assets: Vec<OutputAsset>,
  pub warnings: Vec<anyhow::Error>,
}
