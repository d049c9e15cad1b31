use tracing::debug;

use crate::error::{CalcError, Result};
use crate::hardware::{self, HardwareKind, HardwareProfile};
use crate::model::{self, ModelClass, ModelProfile};

/// The bundled model and hardware tables, loaded once at process start and
/// read-only afterwards. Completeness (one profile per enum variant) is
/// enforced at construction so lookups never fail.
#[derive(Debug)]
pub struct Catalog {
    models: Vec<(ModelClass, ModelProfile)>,
    hardware: Vec<(HardwareKind, HardwareProfile)>,
}

impl Catalog {
    /// Load the tables bundled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_tables(model::load_bundled_models()?, hardware::load_bundled_hardware()?)
    }

    pub fn from_tables(
        models: Vec<(ModelClass, ModelProfile)>,
        hardware: Vec<(HardwareKind, HardwareProfile)>,
    ) -> Result<Self> {
        for class in ModelClass::ALL {
            if !models.iter().any(|(c, _)| *c == class) {
                return Err(CalcError::Data(format!(
                    "models.toml: missing entry for model class {class}"
                )));
            }
        }
        for kind in HardwareKind::ALL {
            if !hardware.iter().any(|(k, _)| *k == kind) {
                return Err(CalcError::Data(format!(
                    "hardware.toml: missing entry for hardware {kind}"
                )));
            }
        }
        debug!(models = models.len(), hardware = hardware.len(), "catalog loaded");
        Ok(Self { models, hardware })
    }

    pub fn model(&self, class: ModelClass) -> &ModelProfile {
        &self
            .models
            .iter()
            .find(|(c, _)| *c == class)
            .expect("all model classes present after validation")
            .1
    }

    pub fn hardware(&self, kind: HardwareKind) -> &HardwareProfile {
        &self
            .hardware
            .iter()
            .find(|(k, _)| *k == kind)
            .expect("all hardware kinds present after validation")
            .1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_load() {
        let catalog = Catalog::bundled().expect("bundled tables should load");
        assert_eq!(catalog.models.len(), 3);
        assert_eq!(catalog.hardware.len(), 7);
    }

    #[test]
    fn all_model_profiles_valid() {
        let catalog = Catalog::bundled().unwrap();
        for class in ModelClass::ALL {
            let m = catalog.model(class);
            assert!(!m.name.is_empty(), "{class}: name is empty");
            assert!(m.params > 0, "{class}: params must be positive");
            assert!(m.layers > 0 && m.heads > 0 && m.head_dim > 0, "{class}: bad architecture");
            assert!(m.context_length > 0, "{class}: context_length must be positive");
            assert!(m.bytes_per_param > 0.0, "{class}: bytes_per_param must be positive");
            assert!(m.base_tok_s > 0.0, "{class}: base_tok_s must be positive");
            assert!(m.api_tok_s > 0.0, "{class}: api_tok_s must be positive");
            assert!(m.pricing.input_per_1k > 0.0, "{class}: input price must be positive");
            assert!(m.pricing.output_per_1k > 0.0, "{class}: output price must be positive");
        }
    }

    #[test]
    fn all_hardware_profiles_valid() {
        let catalog = Catalog::bundled().unwrap();
        for kind in HardwareKind::ALL {
            let hw = catalog.hardware(kind);
            assert!(!hw.name.is_empty(), "{kind}: name is empty");
            assert!(hw.vram_gb >= 0.0, "{kind}: vram_gb must be non-negative");
            assert!(hw.throughput_factor > 0.0, "{kind}: throughput_factor must be positive");
            assert!(hw.tdp_w > 0, "{kind}: tdp_w must be positive");
            assert!(hw.street_usd > 0, "{kind}: street_usd must be positive");
        }
        assert!((catalog.hardware(HardwareKind::Cpu).vram_gb).abs() < 1e-9, "CPU has no VRAM");
    }

    #[test]
    fn throughput_factor_increases_with_rank() {
        let catalog = Catalog::bundled().unwrap();
        for pair in HardwareKind::ALL.windows(2) {
            let lo = catalog.hardware(pair[0]);
            let hi = catalog.hardware(pair[1]);
            assert!(
                hi.throughput_factor > lo.throughput_factor,
                "{} ({}) should be slower than {} ({})",
                pair[0],
                lo.throughput_factor,
                pair[1],
                hi.throughput_factor,
            );
        }
    }

    #[test]
    fn vram_non_decreasing_with_rank() {
        let catalog = Catalog::bundled().unwrap();
        for pair in HardwareKind::ALL.windows(2) {
            assert!(
                catalog.hardware(pair[1]).vram_gb >= catalog.hardware(pair[0]).vram_gb,
                "{} should not have less VRAM than {}",
                pair[1],
                pair[0],
            );
        }
    }

    #[test]
    fn missing_model_class_rejected() {
        let toml = r#"
[model.7b]
name = "Only 7B"
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
        let models = crate::model::parse_models(toml).unwrap();
        let hardware = crate::hardware::load_bundled_hardware().unwrap();
        let err = Catalog::from_tables(models, hardware).unwrap_err();
        assert!(matches!(err, CalcError::Data(msg) if msg.contains("missing entry")));
    }
}
