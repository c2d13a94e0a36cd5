pub mod cli;
pub mod toml_config;

use crate::domain::model::ShiftScope;
use clap::{Args, Parser, Subcommand};
use toml_config::KitConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "smallkit")]
#[command(about = "Toy cipher, seasonal temperature report and fractal tree drawer")]
pub struct CliConfig {
    /// Path to a TOML configuration file (default: ./smallkit.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directory all relative input/output paths are resolved against
    #[arg(long, global = true)]
    pub base_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encrypt raw_text.txt, decrypt it back and verify the round trip
    Cipher(CipherArgs),
    /// Seasonal averages and station extremes from yearly CSV files
    Climate(ClimateArgs),
    /// Draw a recursive fractal tree as SVG
    Tree(TreeArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct CipherArgs {
    /// Key value n (prompted when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub n: Option<i64>,

    /// Key value m (prompted when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub m: Option<i64>,

    #[arg(long, value_enum)]
    pub scope: Option<ShiftScope>,

    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub encrypted_output: Option<String>,

    #[arg(long)]
    pub decrypted_output: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ClimateArgs {
    /// Directory containing <prefix>_<year>.csv files
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(long)]
    pub output_dir: Option<String>,

    /// Output formats: txt, json
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TreeArgs {
    #[arg(long)]
    pub angle_left: Option<f64>,

    #[arg(long)]
    pub angle_right: Option<f64>,

    #[arg(long)]
    pub start_length: Option<f64>,

    #[arg(long)]
    pub depth: Option<u32>,

    #[arg(long)]
    pub reduction_factor: Option<f64>,

    #[arg(long)]
    pub output: Option<String>,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut KitConfig) {
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = Some(base_dir.clone());
        }

        match &self.command {
            Command::Cipher(args) => args.apply_to(config),
            Command::Climate(args) => args.apply_to(config),
            Command::Tree(args) => args.apply_to(config),
        }
    }
}

impl CipherArgs {
    pub fn apply_to(&self, config: &mut KitConfig) {
        let cipher = &mut config.cipher;
        if let Some(scope) = self.scope {
            cipher.scope = scope;
        }
        if let Some(input) = &self.input {
            cipher.input_file = input.clone();
        }
        if let Some(path) = &self.encrypted_output {
            cipher.encrypted_file = path.clone();
        }
        if let Some(path) = &self.decrypted_output {
            cipher.decrypted_file = path.clone();
        }
    }
}

impl ClimateArgs {
    pub fn apply_to(&self, config: &mut KitConfig) {
        let climate = &mut config.climate;
        if let Some(dir) = &self.data_dir {
            climate.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            climate.output_dir = dir.clone();
        }
        if !self.formats.is_empty() {
            climate.output_formats = self.formats.clone();
        }
    }
}

impl TreeArgs {
    pub fn apply_to(&self, config: &mut KitConfig) {
        let tree = &mut config.tree;
        tree.angle_left = self.angle_left.or(tree.angle_left);
        tree.angle_right = self.angle_right.or(tree.angle_right);
        tree.start_length = self.start_length.or(tree.start_length);
        tree.depth = self.depth.or(tree.depth);
        tree.reduction_factor = self.reduction_factor.or(tree.reduction_factor);
        if let Some(output) = &self.output {
            tree.output_file = output.clone();
        }
    }
}
