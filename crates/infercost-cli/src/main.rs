use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use infercost_core::{
    engine,
    model::ModelProfile,
    scenario::SCENARIOS,
    CalculationRequest, CalculationResult, Catalog, Deployment, HardwareKind, ModelClass,
};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_warm() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_price() -> Style  { Style::new().color256(109) }         // teal
fn s_bold() -> Style   { Style::new().bold() }
fn s_accent() -> Style { Style::new().color256(109) }         // teal accent
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

fn fmt_usd(v: f64) -> String {
    format!("${v:.6}")
}

fn fmt_latency(s: f64) -> String {
    if s >= 120.0 {
        format!("{:.1} min", s / 60.0)
    } else {
        format!("{s:.2} s")
    }
}

fn fmt_memory(gb: Option<f64>) -> String {
    match gb {
        Some(v) => format!("{v:.2} GB"),
        None => "\u{2500} (hosted)".to_string(),
    }
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "infercost",
    about = "Estimate latency, memory, and cost of LLM inference across local hardware and hosted APIs",
    version,
    after_help = "examples:\n  \
        infercost --model 7B --tokens 1000 --hardware GPU_16GB\n  \
        infercost --model 13B --tokens 500 --deployment api\n  \
        infercost --model GPT-4 --tokens 2000 --deployment api --json\n  \
        infercost compare                        (preset scenarios side by side)\n  \
        infercost interactive                    (guided prompts)\n  \
        infercost                                (model and hardware catalog)"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model class: 7B, 13B, or GPT-4
    #[arg(long)]
    model: Option<String>,

    /// Total token count, input plus output
    #[arg(long)]
    tokens: Option<u64>,

    /// Requests processed together
    #[arg(long, default_value_t = 1)]
    batch_size: u32,

    /// Hardware tier for local deployment: CPU or GPU_4GB through GPU_32GB
    #[arg(long, default_value = "GPU_8GB")]
    hardware: String,

    /// Deployment mode: local or api
    #[arg(long, default_value = "local")]
    deployment: String,

    #[arg(long, short)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the preset deployment scenarios side by side.
    Compare,
    /// Guided prompts for all parameters.
    Interactive,
    /// List the bundled model profiles.
    Models,
    /// List the bundled hardware profiles.
    Hardware,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = Catalog::bundled()?;

    match cli.command {
        Some(Commands::Compare) => cmd_compare(&catalog)?,
        Some(Commands::Interactive) => cmd_interactive(&catalog)?,
        Some(Commands::Models) => cmd_models(&catalog),
        Some(Commands::Hardware) => cmd_hardware(&catalog),
        None => {
            if cli.model.is_some() || cli.tokens.is_some() {
                cmd_calc(&catalog, &cli)?;
            } else {
                cmd_overview(&catalog);
            }
        }
    }
    Ok(())
}

// ── One-shot calculation ─────────────────────────────────────────────

fn cmd_calc(catalog: &Catalog, cli: &Cli) -> anyhow::Result<()> {
    let model = cli
        .model
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--model is required (7B, 13B, or GPT-4)"))?;
    let tokens = cli
        .tokens
        .ok_or_else(|| anyhow::anyhow!("--tokens is required"))?;

    let req = CalculationRequest::from_args(
        model,
        tokens,
        cli.batch_size,
        Some(cli.hardware.as_str()),
        &cli.deployment,
    )?;
    let result = engine::calculate(catalog, &req)?;

    if cli.json {
        let payload = serde_json::json!({
            "request": {
                "model": req.model.label(),
                "tokens": req.tokens,
                "batch_size": req.batch_size,
                "hardware": req.deployment.hardware().map(|h| h.label()),
                "deployment": req.deployment.mode_label(),
            },
            "result": &result,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_result(&req, &result);
    Ok(())
}

fn print_result(req: &CalculationRequest, result: &CalculationResult) {
    let dot = s_tree().apply_to("\u{00b7}");
    let mut header_parts = vec![
        s_bold().apply_to(req.model.label()).to_string(),
        s_label().apply_to(req.deployment.mode_label()).to_string(),
    ];
    if let Some(hw) = req.deployment.hardware() {
        header_parts.push(s_dim().apply_to(hw.label()).to_string());
    }
    header_parts.push(s_dim().apply_to(format!("{} tokens", req.tokens)).to_string());
    if req.batch_size > 1 {
        header_parts.push(s_dim().apply_to(format!("batch {}", req.batch_size)).to_string());
    }

    println!();
    println!("  {}", header_parts.join(&format!("  {dot}  ")));
    println!("{}", sep(64));

    let cost_per_1k = result.cost_per_request_usd / req.tokens as f64 * 1000.0;
    let compat_cell = if req.deployment.hardware().is_none() {
        Cell::new("n/a (hosted)").fg(Color::AnsiValue(248))
    } else if result.hardware_compatible {
        Cell::new("compatible").fg(Color::AnsiValue(114))
    } else {
        Cell::new("insufficient VRAM").fg(Color::AnsiValue(167))
    };

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("  Latency").fg(Color::AnsiValue(243)),
        Cell::new(fmt_latency(result.latency_seconds)).fg(Color::AnsiValue(252)),
    ]);
    table.add_row(vec![
        Cell::new("  Memory").fg(Color::AnsiValue(243)),
        Cell::new(fmt_memory(result.memory_usage_gb)).fg(Color::AnsiValue(252)),
    ]);
    table.add_row(vec![
        Cell::new("  Cost / request").fg(Color::AnsiValue(243)),
        Cell::new(fmt_usd(result.cost_per_request_usd)).fg(Color::AnsiValue(109)),
    ]);
    table.add_row(vec![
        Cell::new("  Cost / 1k tokens").fg(Color::AnsiValue(243)),
        Cell::new(fmt_usd(cost_per_1k)).fg(Color::AnsiValue(109)),
    ]);
    table.add_row(vec![
        Cell::new("  Hardware").fg(Color::AnsiValue(243)),
        compat_cell,
    ]);
    println!("{table}");

    if !result.recommendations.is_empty() {
        println!();
        println!("  {}", s_header().apply_to("recommendations"));
        for (i, rec) in result.recommendations.iter().enumerate() {
            println!("  {} {rec}", s_warm().apply_to(format!("{}.", i + 1)));
        }
    }
    println!();
}

// ── Compare ──────────────────────────────────────────────────────────

fn cmd_compare(catalog: &Catalog) -> anyhow::Result<()> {
    let now = chrono::Local::now().format("%H:%M:%S");
    println!();
    println!(
        "  {}  {}",
        s_header().apply_to("scenario comparison"),
        s_dim().apply_to(format!("{} tokens each, {now}", SCENARIOS[0].tokens))
    );
    println!("{}", sep(86));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Scenario").fg(Color::AnsiValue(243)),
        Cell::new("Model").fg(Color::AnsiValue(243)),
        Cell::new("Mode").fg(Color::AnsiValue(243)),
        Cell::new("Latency").fg(Color::AnsiValue(243)),
        Cell::new("Memory").fg(Color::AnsiValue(243)),
        Cell::new("Cost/req").fg(Color::AnsiValue(243)),
        Cell::new("Cost/1k").fg(Color::AnsiValue(243)),
        Cell::new("Fit").fg(Color::AnsiValue(243)),
    ]);

    for s in SCENARIOS {
        let req = s.request();
        let result = engine::calculate(catalog, &req)?;
        let cost_per_1k = result.cost_per_request_usd / req.tokens as f64 * 1000.0;
        let (fit_str, fit_color) = if req.deployment.hardware().is_none() {
            ("n/a", Color::AnsiValue(248))
        } else if result.hardware_compatible {
            ("ok", Color::AnsiValue(114))
        } else {
            ("no fit", Color::AnsiValue(167))
        };
        table.add_row(vec![
            Cell::new(format!("  {}", s.name)).fg(Color::AnsiValue(252)),
            Cell::new(req.model.label()).fg(Color::AnsiValue(146)),
            Cell::new(req.deployment.mode_label()).fg(Color::AnsiValue(248)),
            Cell::new(fmt_latency(result.latency_seconds)).fg(Color::AnsiValue(248)),
            Cell::new(fmt_memory(result.memory_usage_gb)).fg(Color::AnsiValue(248)),
            Cell::new(fmt_usd(result.cost_per_request_usd)).fg(Color::AnsiValue(109)),
            Cell::new(fmt_usd(cost_per_1k)).fg(Color::AnsiValue(109)),
            Cell::new(fit_str).fg(fit_color),
        ]);
    }
    println!("{table}");

    println!("{}", sep(86));
    println!("{}", s_hint().apply_to("  local runs are cheapest per request but need the hardware up front"));
    println!("{}", s_hint().apply_to("  hosted APIs trade ongoing token spend for zero hardware"));
    println!("{}", s_hint().apply_to("  GPT-4-class quality costs around two orders of magnitude more per request"));
    println!();
    Ok(())
}

// ── Catalog listings ─────────────────────────────────────────────────

fn cmd_models(catalog: &Catalog) {
    println!();
    println!("  {}", s_header().apply_to("model classes"));
    println!("{}", sep(86));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Class").fg(Color::AnsiValue(243)),
        Cell::new("Name").fg(Color::AnsiValue(243)),
        Cell::new("Params").fg(Color::AnsiValue(243)),
        Cell::new("Layers").fg(Color::AnsiValue(243)),
        Cell::new("Context").fg(Color::AnsiValue(243)),
        Cell::new("FP16 weights").fg(Color::AnsiValue(243)),
        Cell::new("API $/1k in").fg(Color::AnsiValue(243)),
        Cell::new("API $/1k out").fg(Color::AnsiValue(243)),
    ]);

    for class in ModelClass::ALL {
        let m = catalog.model(class);
        table.add_row(vec![
            Cell::new(format!("  {}", class.label())).fg(Color::AnsiValue(109)),
            Cell::new(&m.name).fg(Color::AnsiValue(252)),
            Cell::new(ModelProfile::fmt_params(m.params)).fg(Color::AnsiValue(139)),
            Cell::new(m.layers).fg(Color::AnsiValue(248)),
            Cell::new(format!("{}k", m.context_length / 1024)).fg(Color::AnsiValue(248)),
            Cell::new(format!("{:.1} GB", m.weight_gb())).fg(Color::AnsiValue(248)),
            Cell::new(format!("${:.4}", m.pricing.input_per_1k)).fg(Color::AnsiValue(109)),
            Cell::new(format!("${:.4}", m.pricing.output_per_1k)).fg(Color::AnsiValue(109)),
        ]);
    }
    println!("{table}");
    println!();
}

fn cmd_hardware(catalog: &Catalog) {
    println!();
    println!("  {}", s_header().apply_to("hardware tiers"));
    println!("{}", sep(86));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Hardware").fg(Color::AnsiValue(243)),
        Cell::new("VRAM").fg(Color::AnsiValue(243)),
        Cell::new("Speed").fg(Color::AnsiValue(243)),
        Cell::new("TDP").fg(Color::AnsiValue(243)),
        Cell::new("Street").fg(Color::AnsiValue(243)),
        Cell::new("Run cost").fg(Color::AnsiValue(243)),
    ]);

    for kind in HardwareKind::ALL {
        let hw = catalog.hardware(kind);
        let vram = if kind.is_cpu() {
            "system RAM".to_string()
        } else {
            format!("{:.0} GB", hw.vram_gb)
        };
        let run_cost_hr = engine::local_usd_per_s(hw) * 3600.0;
        table.add_row(vec![
            Cell::new(format!("  {}", kind.label())).fg(Color::AnsiValue(109)),
            Cell::new(vram).fg(Color::AnsiValue(252)),
            Cell::new(format!("{:.2}x", hw.throughput_factor)).fg(Color::AnsiValue(248)),
            Cell::new(format!("{} W", hw.tdp_w)).fg(Color::AnsiValue(248)),
            Cell::new(format!("${}", hw.street_usd)).fg(Color::AnsiValue(109)),
            Cell::new(format!("${run_cost_hr:.4}/h")).fg(Color::AnsiValue(109)),
        ]);
    }
    println!("{table}");
    println!();
}

fn cmd_overview(catalog: &Catalog) {
    cmd_models(catalog);
    cmd_hardware(catalog);
    println!("{}", s_hint().apply_to("  try: infercost --model 7B --tokens 1000 --hardware GPU_16GB"));
    println!("{}", s_hint().apply_to("       infercost compare"));
    println!("{}", s_hint().apply_to("       infercost interactive"));
    println!();
}

// ── Interactive shell ────────────────────────────────────────────────

fn prompt(term: &Term, label: &str) -> anyhow::Result<String> {
    term.write_str(&format!("{} ", s_hint().apply_to(format!("{label}:"))))?;
    Ok(term.read_line()?)
}

fn cmd_interactive(catalog: &Catalog) -> anyhow::Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        anyhow::bail!("interactive mode requires a terminal");
    }

    loop {
        println!();
        println!("  {}", s_header().apply_to("infercost \u{2014} interactive"));
        println!("{}", sep(44));
        println!("  {}  quick calculation", s_accent().apply_to("1"));
        println!("  {}  compare scenarios", s_accent().apply_to("2"));
        println!("  {}  recommendations", s_accent().apply_to("3"));
        println!("  {}  help", s_accent().apply_to("4"));
        println!("  {}  quit", s_accent().apply_to("q"));
        println!("{}", sep(44));

        let choice = prompt(&term, "select option")?;
        match choice.trim() {
            "1" => {
                let req = configure(&term, catalog)?;
                match engine::calculate(catalog, &req) {
                    Ok(result) => print_result(&req, &result),
                    Err(e) => println!("{}", s_err().apply_to(format!("error: {e}"))),
                }
            }
            "2" => cmd_compare(catalog)?,
            "3" => {
                let req = configure(&term, catalog)?;
                match engine::calculate(catalog, &req) {
                    Ok(result) => {
                        println!();
                        if result.recommendations.is_empty() {
                            println!("{}", s_dim().apply_to("  no advisories for this configuration"));
                        } else {
                            println!("  {}", s_header().apply_to("recommendations"));
                            for (i, rec) in result.recommendations.iter().enumerate() {
                                println!("  {} {rec}", s_warm().apply_to(format!("{}.", i + 1)));
                            }
                        }
                        println!();
                    }
                    Err(e) => println!("{}", s_err().apply_to(format!("error: {e}"))),
                }
            }
            "4" => print_help_text(),
            "q" | "quit" | "exit" => break,
            "" => continue,
            other => {
                println!("{}", s_err().apply_to(format!("unknown option: {other}")));
            }
        }
    }
    Ok(())
}

/// Guided selection of all five parameters, re-prompting on bad input.
fn configure(term: &Term, catalog: &Catalog) -> anyhow::Result<CalculationRequest> {
    println!();
    println!("  {}", s_label().apply_to("model class"));
    for (i, class) in ModelClass::ALL.iter().enumerate() {
        let m = catalog.model(*class);
        println!(
            "  {}  {:<6} {}",
            s_accent().apply_to(i + 1),
            class.label(),
            s_dim().apply_to(&m.name)
        );
    }
    let model = loop {
        let line = prompt(term, "select model (1-3)")?;
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=ModelClass::ALL.len()).contains(&n) => break ModelClass::ALL[n - 1],
            _ => println!("{}", s_err().apply_to("enter a number between 1 and 3")),
        }
    };

    println!();
    println!("  {}", s_label().apply_to("token count (input + output)"));
    println!("{}", s_hint().apply_to("  short reply ~100-500, long reply ~1000-2000, document analysis 2000+"));
    let tokens = loop {
        let line = prompt(term, "tokens")?;
        match line.trim().parse::<u64>() {
            Ok(n) if n > 0 => break n,
            _ => println!("{}", s_err().apply_to("token count must be a positive integer")),
        }
    };

    let batch_size = loop {
        let line = prompt(term, "batch size [1]")?;
        let t = line.trim();
        if t.is_empty() {
            break 1;
        }
        match t.parse::<u32>() {
            Ok(n) if n >= 1 => break n,
            _ => println!("{}", s_err().apply_to("batch size must be a positive integer")),
        }
    };

    println!();
    println!("  {}", s_label().apply_to("deployment mode"));
    println!("  {}  local  {}", s_accent().apply_to(1), s_dim().apply_to("self-hosted, needs hardware"));
    println!("  {}  api    {}", s_accent().apply_to(2), s_dim().apply_to("hosted endpoint, no hardware"));
    let deployment = loop {
        let line = prompt(term, "select mode (1-2)")?;
        match line.trim() {
            "1" => {
                println!();
                println!("  {}", s_label().apply_to("hardware"));
                for (i, kind) in HardwareKind::ALL.iter().enumerate() {
                    let hw = catalog.hardware(*kind);
                    let vram = if kind.is_cpu() {
                        "system RAM, testing only".to_string()
                    } else {
                        format!("{:.0} GB VRAM", hw.vram_gb)
                    };
                    println!(
                        "  {}  {:<9} {}",
                        s_accent().apply_to(i + 1),
                        kind.label(),
                        s_dim().apply_to(vram)
                    );
                }
                let hardware = loop {
                    let line = prompt(term, "select hardware (1-7)")?;
                    match line.trim().parse::<usize>() {
                        Ok(n) if (1..=HardwareKind::ALL.len()).contains(&n) => {
                            break HardwareKind::ALL[n - 1]
                        }
                        _ => println!("{}", s_err().apply_to("enter a number between 1 and 7")),
                    }
                };
                break Deployment::Local { hardware };
            }
            "2" => break Deployment::Api,
            _ => println!("{}", s_err().apply_to("enter 1 or 2")),
        }
    };

    Ok(CalculationRequest { model, tokens, batch_size, deployment })
}

fn print_help_text() {
    println!();
    println!("  {}", s_header().apply_to("help"));
    println!("{}", sep(64));
    println!("  {}", s_bold().apply_to("what this estimates"));
    println!("  {}", s_dim().apply_to("latency per request, memory needed locally, cost per request,"));
    println!("  {}", s_dim().apply_to("and whether a hardware tier can hold the model plus its working set"));
    println!();
    println!("  {}", s_bold().apply_to("model classes"));
    println!("  {}", s_dim().apply_to("7B and 13B are open-weights classes; GPT-4 is a hosted frontier class"));
    println!();
    println!("  {}", s_bold().apply_to("deployment modes"));
    println!("  {}", s_dim().apply_to("local: self-hosted, bound by VRAM; api: hosted, bound by network and pricing"));
    println!();
    println!("  {}", s_price().apply_to("  all figures are closed-form estimates from published constants,"));
    println!("  {}", s_price().apply_to("  not measurements; treat them as planning numbers"));
    println!();
}
