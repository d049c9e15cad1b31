use crate::error::{CalcError, Result};
use crate::hardware::HardwareKind;
use crate::model::ModelClass;

/// Where inference runs. Local deployment carries the hardware it runs on;
/// API deployment has no hardware dependency at all, so an API request cannot
/// even name a hardware tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local { hardware: HardwareKind },
    Api,
}

impl Deployment {
    pub fn mode_label(self) -> &'static str {
        match self {
            Deployment::Local { .. } => "local",
            Deployment::Api => "api",
        }
    }

    pub fn hardware(self) -> Option<HardwareKind> {
        match self {
            Deployment::Local { hardware } => Some(hardware),
            Deployment::Api => None,
        }
    }
}

/// One estimation request. Constructed per call, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationRequest {
    pub model: ModelClass,
    pub tokens: u64,
    pub batch_size: u32,
    pub deployment: Deployment,
}

impl CalculationRequest {
    /// Build a request from raw string inputs (CLI flags, guided prompts).
    /// `hardware` is consulted only when `mode` is "local"; in API mode it is
    /// ignored entirely.
    pub fn from_args(
        model: &str,
        tokens: u64,
        batch_size: u32,
        hardware: Option<&str>,
        mode: &str,
    ) -> Result<Self> {
        let model = model.parse::<ModelClass>()?;
        let deployment = match mode.trim().to_ascii_lowercase().as_str() {
            "api" => Deployment::Api,
            "local" => {
                let hw = hardware
                    .ok_or_else(|| CalcError::UnknownHardware("none specified".to_string()))?;
                Deployment::Local { hardware: hw.parse()? }
            }
            other => return Err(CalcError::InvalidMode(other.to_string())),
        };
        Ok(Self { model, tokens, batch_size, deployment })
    }
}
