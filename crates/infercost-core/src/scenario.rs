use crate::hardware::HardwareKind;
use crate::model::ModelClass;
use crate::request::{CalculationRequest, Deployment};

/// A named preset configuration for side-by-side comparison.
pub struct Scenario {
    pub name: &'static str,
    pub model: ModelClass,
    pub tokens: u64,
    pub batch_size: u32,
    pub deployment: Deployment,
}

impl Scenario {
    pub fn request(&self) -> CalculationRequest {
        CalculationRequest {
            model: self.model,
            tokens: self.tokens,
            batch_size: self.batch_size,
            deployment: self.deployment,
        }
    }
}

/// Curated scenarios for the `compare` command: one per typical adoption
/// stage, all at the same token count so the columns line up.
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "Development (7B local)",
        model: ModelClass::SevenB,
        tokens: 1000,
        batch_size: 1,
        deployment: Deployment::Local { hardware: HardwareKind::Gpu16Gb },
    },
    Scenario {
        name: "Production API (13B)",
        model: ModelClass::ThirteenB,
        tokens: 1000,
        batch_size: 1,
        deployment: Deployment::Api,
    },
    Scenario {
        name: "Enterprise (GPT-4 API)",
        model: ModelClass::Gpt4,
        tokens: 1000,
        batch_size: 1,
        deployment: Deployment::Api,
    },
];
