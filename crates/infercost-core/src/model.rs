use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CalcError, Result};

/// The three supported model classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelClass {
    SevenB,
    ThirteenB,
    Gpt4,
}

impl ModelClass {
    pub const ALL: [ModelClass; 3] =
        [ModelClass::SevenB, ModelClass::ThirteenB, ModelClass::Gpt4];

    /// Table key in models.toml.
    pub fn toml_key(self) -> &'static str {
        match self {
            ModelClass::SevenB => "7b",
            ModelClass::ThirteenB => "13b",
            ModelClass::Gpt4 => "gpt4",
        }
    }

    /// Canonical identifier as accepted on the command line.
    pub fn label(self) -> &'static str {
        match self {
            ModelClass::SevenB => "7B",
            ModelClass::ThirteenB => "13B",
            ModelClass::Gpt4 => "GPT-4",
        }
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelClass {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "7B" => Ok(ModelClass::SevenB),
            "13B" => Ok(ModelClass::ThirteenB),
            "GPT-4" | "GPT4" => Ok(ModelClass::Gpt4),
            _ => Err(CalcError::UnknownModel(s.to_string())),
        }
    }
}

/// Hosted-API token pricing in USD per 1000 tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingProfile {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

/// Model specification from models.toml.
///
/// `base_tok_s` is the decode rate on the GPU_16GB reference tier; the rate on
/// other hardware is this value scaled by the hardware's throughput factor.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelProfile {
    pub name: String,
    pub params: u64,
    pub layers: u32,
    pub heads: u32,
    pub head_dim: u32,
    pub context_length: u64,
    pub bytes_per_param: f64,
    pub base_tok_s: f64,
    pub api_tok_s: f64,
    pub pricing: PricingProfile,
}

impl ModelProfile {
    /// Format a raw parameter count as "7.3B", "13.0B", "1.76T".
    pub fn fmt_params(n: u64) -> String {
        let f = n as f64;
        if f >= 1e12 {
            format!("{:.2}T", f / 1e12)
        } else if f >= 1e9 {
            format!("{:.1}B", f / 1e9)
        } else {
            format!("{:.0}M", f / 1e6)
        }
    }

    /// Weight size in GB at this profile's storage precision.
    pub fn weight_gb(&self) -> f64 {
        self.params as f64 * self.bytes_per_param / 1e9
    }
}

#[derive(Debug, Deserialize)]
struct ModelsFile {
    model: BTreeMap<String, ModelProfile>,
}

/// Parse model profiles from TOML. Keys outside the closed class set are
/// rejected so a typo in the table fails at load, not at lookup.
pub fn parse_models(toml_str: &str) -> Result<Vec<(ModelClass, ModelProfile)>> {
    let mf: ModelsFile =
        toml::from_str(toml_str).map_err(|e| CalcError::Data(format!("bad models.toml: {e}")))?;
    let mut out = Vec::new();
    for (key, profile) in mf.model {
        let class = ModelClass::ALL
            .into_iter()
            .find(|c| c.toml_key() == key)
            .ok_or_else(|| CalcError::Data(format!("models.toml: unknown model key '{key}'")))?;
        out.push((class, profile));
    }
    Ok(out)
}

/// Load the bundled models.toml from the data/ directory.
pub fn load_bundled_models() -> Result<Vec<(ModelClass, ModelProfile)>> {
    parse_models(include_str!("../../../data/models.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_from_str_accepts_aliases() {
        assert_eq!("7B".parse::<ModelClass>().unwrap(), ModelClass::SevenB);
        assert_eq!("7b".parse::<ModelClass>().unwrap(), ModelClass::SevenB);
        assert_eq!("13B".parse::<ModelClass>().unwrap(), ModelClass::ThirteenB);
        assert_eq!("GPT-4".parse::<ModelClass>().unwrap(), ModelClass::Gpt4);
        assert_eq!("gpt4".parse::<ModelClass>().unwrap(), ModelClass::Gpt4);
    }

    #[test]
    fn class_from_str_rejects_unknown() {
        let err = "70B".parse::<ModelClass>().unwrap_err();
        assert!(matches!(err, CalcError::UnknownModel(s) if s == "70B"));
    }

    #[test]
    fn label_round_trips() {
        for class in ModelClass::ALL {
            assert_eq!(class.label().parse::<ModelClass>().unwrap(), class);
        }
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[model.7b]
name = "Test 7B"
params = 7_000_000_000
layers = 32
heads = 32
head_dim = 128
context_length = 8192
bytes_per_param = 2.0
base_tok_s = 35.0
api_tok_s = 50.0

[model.7b.pricing]
input_per_1k = 0.0001
output_per_1k = 0.0002
"#;
        let models = parse_models(toml).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].0, ModelClass::SevenB);
        assert_eq!(models[0].1.params, 7_000_000_000);
        assert!((models[0].1.pricing.output_per_1k - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn parse_rejects_unknown_key() {
        let toml = r#"
[model.70b]
name = "Nope"
params = 70_000_000_000
layers = 80
heads = 64
head_dim = 128
context_length = 8192
bytes_per_param = 2.0
base_tok_s = 5.0
api_tok_s = 50.0

[model.70b.pricing]
input_per_1k = 0.001
output_per_1k = 0.002
"#;
        let err = parse_models(toml).unwrap_err();
        assert!(matches!(err, CalcError::Data(msg) if msg.contains("70b")));
    }

    #[test]
    fn fmt_params_scales() {
        assert_eq!(ModelProfile::fmt_params(7_300_000_000), "7.3B");
        assert_eq!(ModelProfile::fmt_params(13_000_000_000), "13.0B");
        assert_eq!(ModelProfile::fmt_params(1_760_000_000_000), "1.76T");
        assert_eq!(ModelProfile::fmt_params(500_000_000), "500M");
    }
}
