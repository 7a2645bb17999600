pub mod normal_module;
pub mod output_asset;
