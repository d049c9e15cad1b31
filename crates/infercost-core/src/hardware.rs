use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CalcError, Result};

/// Hardware tiers for local deployment, declared in capability order:
/// CPU slowest, GPU_32GB fastest. The declaration order doubles as the
/// VRAM/throughput rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HardwareKind {
    Cpu,
    Gpu4Gb,
    Gpu8Gb,
    Gpu12Gb,
    Gpu16Gb,
    Gpu24Gb,
    Gpu32Gb,
}

impl HardwareKind {
    pub const ALL: [HardwareKind; 7] = [
        HardwareKind::Cpu,
        HardwareKind::Gpu4Gb,
        HardwareKind::Gpu8Gb,
        HardwareKind::Gpu12Gb,
        HardwareKind::Gpu16Gb,
        HardwareKind::Gpu24Gb,
        HardwareKind::Gpu32Gb,
    ];

    /// Table key in hardware.toml.
    pub fn toml_key(self) -> &'static str {
        match self {
            HardwareKind::Cpu => "cpu",
            HardwareKind::Gpu4Gb => "gpu_4gb",
            HardwareKind::Gpu8Gb => "gpu_8gb",
            HardwareKind::Gpu12Gb => "gpu_12gb",
            HardwareKind::Gpu16Gb => "gpu_16gb",
            HardwareKind::Gpu24Gb => "gpu_24gb",
            HardwareKind::Gpu32Gb => "gpu_32gb",
        }
    }

    /// Canonical identifier as accepted on the command line.
    pub fn label(self) -> &'static str {
        match self {
            HardwareKind::Cpu => "CPU",
            HardwareKind::Gpu4Gb => "GPU_4GB",
            HardwareKind::Gpu8Gb => "GPU_8GB",
            HardwareKind::Gpu12Gb => "GPU_12GB",
            HardwareKind::Gpu16Gb => "GPU_16GB",
            HardwareKind::Gpu24Gb => "GPU_24GB",
            HardwareKind::Gpu32Gb => "GPU_32GB",
        }
    }

    pub fn is_cpu(self) -> bool {
        self == HardwareKind::Cpu
    }
}

impl fmt::Display for HardwareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HardwareKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        HardwareKind::ALL
            .into_iter()
            .find(|k| k.label() == upper)
            .ok_or_else(|| CalcError::UnknownHardware(s.to_string()))
    }
}

/// Hardware specification from hardware.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareProfile {
    pub name: String,
    /// 0 for CPU (system RAM, no VRAM constraint).
    pub vram_gb: f64,
    /// Multiplier on each model's base decode rate; 1.0 is the GPU_16GB tier.
    pub throughput_factor: f64,
    pub tdp_w: u32,
    pub street_usd: u32,
}

#[derive(Debug, Deserialize)]
struct HardwareFile {
    hardware: BTreeMap<String, HardwareProfile>,
}

/// Parse hardware profiles from TOML, rejecting keys outside the closed set.
pub fn parse_hardware(toml_str: &str) -> Result<Vec<(HardwareKind, HardwareProfile)>> {
    let hf: HardwareFile =
        toml::from_str(toml_str).map_err(|e| CalcError::Data(format!("bad hardware.toml: {e}")))?;
    let mut out = Vec::new();
    for (key, profile) in hf.hardware {
        let kind = HardwareKind::ALL
            .into_iter()
            .find(|k| k.toml_key() == key)
            .ok_or_else(|| {
                CalcError::Data(format!("hardware.toml: unknown hardware key '{key}'"))
            })?;
        out.push((kind, profile));
    }
    Ok(out)
}

/// Load the bundled hardware.toml from the data/ directory.
pub fn load_bundled_hardware() -> Result<Vec<(HardwareKind, HardwareProfile)>> {
    parse_hardware(include_str!("../../../data/hardware.toml"))
}
