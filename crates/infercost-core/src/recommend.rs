//! Advisory generation: an ordered list of predicate rules over a computed
//! estimate. Each rule either fires with a message or stays silent, and the
//! output order is the rule order, so results are fully reproducible.

use crate::hardware::{HardwareKind, HardwareProfile};
use crate::model::ModelProfile;

/// Memory-to-VRAM ratio above which a compatible fit is still called tight.
pub const TIGHT_MARGIN_FRAC: f64 = 0.90;
/// Local batch sizes above this raise a memory advisory.
pub const LARGE_BATCH_THRESHOLD: u32 = 4;

/// Everything the rules may look at: the request plus the computed metrics.
pub struct RuleCtx<'a> {
    pub model: &'a ModelProfile,
    /// None in API mode.
    pub hardware: Option<(HardwareKind, &'a HardwareProfile)>,
    pub tokens: u64,
    pub batch_size: u32,
    pub api: bool,
    /// None in API mode.
    pub memory_gb: Option<f64>,
    pub compatible: bool,
}

type Rule = fn(&RuleCtx) -> Option<String>;

const RULES: &[Rule] = &[
    insufficient_vram,
    tight_margin,
    cpu_for_testing_only,
    context_overflow,
    oversized_batch,
    api_no_batching,
    api_cost_scaling,
    api_rate_limits,
];

pub fn recommend(ctx: &RuleCtx) -> Vec<String> {
    RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

fn insufficient_vram(ctx: &RuleCtx) -> Option<String> {
    let (kind, hw) = ctx.hardware?;
    if kind.is_cpu() || ctx.compatible {
        return None;
    }
    let needed = ctx.memory_gb?;
    Some(format!(
        "insufficient VRAM: this configuration needs {:.1} GB but {} has {:.0} GB; \
         use hardware with at least {:.0} GB or switch to API deployment",
        needed,
        hw.name,
        hw.vram_gb,
        needed.ceil(),
    ))
}

fn tight_margin(ctx: &RuleCtx) -> Option<String> {
    let (kind, hw) = ctx.hardware?;
    if kind.is_cpu() || !ctx.compatible {
        return None;
    }
    let memory = ctx.memory_gb?;
    if memory >= hw.vram_gb * TIGHT_MARGIN_FRAC {
        Some(format!(
            "tight memory margin: {:.1} GB of {:.0} GB VRAM in use; \
             consider quantization to shrink the working set",
            memory, hw.vram_gb,
        ))
    } else {
        None
    }
}

fn cpu_for_testing_only(ctx: &RuleCtx) -> Option<String> {
    let (kind, _) = ctx.hardware?;
    kind.is_cpu()
        .then(|| "CPU inference is slow; recommended only for testing and development".to_string())
}

fn context_overflow(ctx: &RuleCtx) -> Option<String> {
    (ctx.tokens > ctx.model.context_length).then(|| {
        format!(
            "{} tokens exceed the {}-token context window of {}; \
             split long sequences into chunks",
            ctx.tokens, ctx.model.context_length, ctx.model.name,
        )
    })
}

fn oversized_batch(ctx: &RuleCtx) -> Option<String> {
    (!ctx.api && ctx.batch_size > LARGE_BATCH_THRESHOLD).then(|| {
        format!(
            "batch size {} raises memory sharply; keep local batches at {} or below",
            ctx.batch_size, LARGE_BATCH_THRESHOLD,
        )
    })
}

fn api_no_batching(ctx: &RuleCtx) -> Option<String> {
    (ctx.api && ctx.batch_size > 1).then(|| {
        "hosted endpoints process requests individually; batching gives no speedup in API mode"
            .to_string()
    })
}

fn api_cost_scaling(ctx: &RuleCtx) -> Option<String> {
    ctx.api.then(|| {
        "API cost scales linearly with token count; trim prompts and cap output length to \
         control spend"
            .to_string()
    })
}

fn api_rate_limits(ctx: &RuleCtx) -> Option<String> {
    ctx.api.then(|| {
        "hosted endpoints enforce rate limits; add retry with backoff for sustained traffic"
            .to_string()
    })
}
