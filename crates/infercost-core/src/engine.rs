use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CalcError, Result};
use crate::hardware::{HardwareKind, HardwareProfile};
use crate::model::ModelProfile;
use crate::recommend::{self, RuleCtx};
use crate::request::{CalculationRequest, Deployment};

// All tuning constants live here so callers and tests can assert against them
// directly instead of reverse-engineering magic numbers from outputs.

/// Head-room multiplier applied on top of weights + KV cache + activations.
pub const SAFETY_MARGIN: f64 = 1.20;
/// FP16 key/value cache entries.
pub const KV_CACHE_BYTES_PER_ELEM: f64 = 2.0;
/// Flat per-token activation estimate, scaled by batch size.
pub const ACTIVATION_BYTES_PER_TOKEN: f64 = 100_000.0;
/// Memory-access overhead added on top of raw compute time.
pub const MEMORY_OVERHEAD_FRAC: f64 = 0.10;
/// Assumed round trip to a hosted endpoint.
pub const API_NETWORK_LATENCY_S: f64 = 2.0;
/// Fixed input/output token split used for API billing.
pub const API_INPUT_SPLIT: f64 = 0.70;
pub const API_OUTPUT_SPLIT: f64 = 0.30;
pub const ELECTRICITY_USD_PER_KWH: f64 = 0.12;
/// Hardware amortization window: 3 years at 8 hours/day.
pub const AMORTIZATION_HOURS: f64 = 3.0 * 365.0 * 8.0;

/// All derived metrics for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub latency_seconds: f64,
    /// None for API deployment, where memory lives on the provider's side.
    pub memory_usage_gb: Option<f64>,
    pub cost_per_request_usd: f64,
    pub hardware_compatible: bool,
    pub recommendations: Vec<String>,
}

/// Working-set size in decimal GB for a local deployment: model weights plus
/// KV cache plus activations, with the safety margin applied.
pub fn memory_usage_gb(model: &ModelProfile, tokens: u64, batch_size: u32) -> f64 {
    let model_gb = model.params as f64 * model.bytes_per_param / 1e9;
    let kv_elems = 2.0
        * model.layers as f64
        * model.heads as f64
        * model.head_dim as f64
        * tokens as f64
        * batch_size as f64;
    let kv_gb = kv_elems * KV_CACHE_BYTES_PER_ELEM / 1e9;
    let act_gb = tokens as f64 * batch_size as f64 * ACTIVATION_BYTES_PER_TOKEN / 1e9;
    (model_gb + kv_gb + act_gb) * SAFETY_MARGIN
}

/// Decode rate for a model/hardware pairing.
pub fn local_tok_s(model: &ModelProfile, hw: &HardwareProfile) -> f64 {
    model.base_tok_s * hw.throughput_factor
}

fn local_latency_s(model: &ModelProfile, hw: &HardwareProfile, tokens: u64) -> f64 {
    let compute = tokens as f64 / local_tok_s(model, hw);
    compute * (1.0 + MEMORY_OVERHEAD_FRAC)
}

fn api_latency_s(model: &ModelProfile, tokens: u64) -> f64 {
    API_NETWORK_LATENCY_S + tokens as f64 / model.api_tok_s
}

/// Combined amortization + electricity rate for a hardware tier, USD/second.
pub fn local_usd_per_s(hw: &HardwareProfile) -> f64 {
    let amortized = hw.street_usd as f64 / (AMORTIZATION_HOURS * 3600.0);
    let electricity = hw.tdp_w as f64 / 1000.0 * ELECTRICITY_USD_PER_KWH / 3600.0;
    amortized + electricity
}

fn api_cost_usd(model: &ModelProfile, tokens: u64) -> f64 {
    let input = tokens as f64 * API_INPUT_SPLIT / 1000.0 * model.pricing.input_per_1k;
    let output = tokens as f64 * API_OUTPUT_SPLIT / 1000.0 * model.pricing.output_per_1k;
    input + output
}

/// CPU runs anything (slowly, from system RAM); GPUs must hold the full
/// per-request working set in VRAM.
fn hardware_fits(kind: HardwareKind, hw: &HardwareProfile, memory_gb: f64) -> bool {
    kind.is_cpu() || hw.vram_gb >= memory_gb
}

/// Compute all metrics for a request. Validation happens before any
/// computation: the outcome is either a complete result or a typed rejection,
/// never a partial result. The function is pure, so identical inputs yield
/// bit-identical results and concurrent callers need no coordination.
pub fn calculate(catalog: &Catalog, req: &CalculationRequest) -> Result<CalculationResult> {
    if req.tokens == 0 {
        return Err(CalcError::InvalidParameter {
            field: "tokens",
            reason: "must be a positive integer".to_string(),
        });
    }
    if req.batch_size == 0 {
        return Err(CalcError::InvalidParameter {
            field: "batch_size",
            reason: "must be at least 1".to_string(),
        });
    }

    let model = catalog.model(req.model);

    let result = match req.deployment {
        Deployment::Local { hardware } => {
            let hw = catalog.hardware(hardware);
            let memory = memory_usage_gb(model, req.tokens, req.batch_size);
            let latency = local_latency_s(model, hw, req.tokens);
            let cost = local_usd_per_s(hw) * latency;
            let compatible = hardware_fits(hardware, hw, memory);
            let recommendations = recommend::recommend(&RuleCtx {
                model,
                hardware: Some((hardware, hw)),
                tokens: req.tokens,
                batch_size: req.batch_size,
                api: false,
                memory_gb: Some(memory),
                compatible,
            });
            CalculationResult {
                latency_seconds: latency,
                memory_usage_gb: Some(memory),
                cost_per_request_usd: cost,
                hardware_compatible: compatible,
                recommendations,
            }
        }
        Deployment::Api => {
            let latency = api_latency_s(model, req.tokens);
            let cost = api_cost_usd(model, req.tokens);
            let recommendations = recommend::recommend(&RuleCtx {
                model,
                hardware: None,
                tokens: req.tokens,
                batch_size: req.batch_size,
                api: true,
                memory_gb: None,
                compatible: true,
            });
            CalculationResult {
                latency_seconds: latency,
                memory_usage_gb: None,
                cost_per_request_usd: cost,
                hardware_compatible: true,
                recommendations,
            }
        }
    };

    debug!(
        model = %req.model,
        tokens = req.tokens,
        batch_size = req.batch_size,
        mode = req.deployment.mode_label(),
        latency_s = result.latency_seconds,
        cost_usd = result.cost_per_request_usd,
        "estimate computed"
    );

    Ok(result)
}
