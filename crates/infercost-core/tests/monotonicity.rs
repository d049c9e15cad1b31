use infercost_core::{engine, CalculationRequest, Catalog, Deployment, HardwareKind, ModelClass};

fn catalog() -> Catalog {
    Catalog::bundled().expect("bundled tables should load")
}

fn local(model: ModelClass, tokens: u64, batch_size: u32, hw: HardwareKind) -> CalculationRequest {
    CalculationRequest {
        model,
        tokens,
        batch_size,
        deployment: Deployment::Local { hardware: hw },
    }
}

#[test]
fn memory_strictly_increases_with_tokens() {
    let c = catalog();
    for model in ModelClass::ALL {
        let mut prev = 0.0;
        for tokens in [1u64, 10, 100, 1000, 5000, 20_000] {
            let result =
                engine::calculate(&c, &local(model, tokens, 1, HardwareKind::Gpu16Gb)).unwrap();
            let memory = result.memory_usage_gb.unwrap();
            assert!(memory > prev, "{model}: {tokens} tokens gave {memory}, prev {prev}");
            prev = memory;
        }
    }
}

#[test]
fn memory_strictly_increases_with_batch_size() {
    let c = catalog();
    for model in ModelClass::ALL {
        let mut prev = 0.0;
        for batch in 1u32..=8 {
            let result =
                engine::calculate(&c, &local(model, 1000, batch, HardwareKind::Gpu16Gb)).unwrap();
            let memory = result.memory_usage_gb.unwrap();
            assert!(memory > prev, "{model}: batch {batch} gave {memory}, prev {prev}");
            prev = memory;
        }
    }
}

#[test]
fn latency_non_increasing_across_hardware_rank() {
    let c = catalog();
    for model in ModelClass::ALL {
        let mut prev = f64::INFINITY;
        for kind in HardwareKind::ALL {
            let result = engine::calculate(&c, &local(model, 1000, 1, kind)).unwrap();
            assert!(
                result.latency_seconds <= prev,
                "{model}: {kind} slower ({:.2}s) than the tier below ({prev:.2}s)",
                result.latency_seconds
            );
            prev = result.latency_seconds;
        }
    }
}

#[test]
fn latency_increases_with_tokens() {
    let c = catalog();
    for model in ModelClass::ALL {
        let mut prev_local = 0.0;
        let mut prev_api = 0.0;
        for tokens in [100u64, 500, 1000, 4000] {
            let local_result =
                engine::calculate(&c, &local(model, tokens, 1, HardwareKind::Gpu24Gb)).unwrap();
            assert!(local_result.latency_seconds > prev_local);
            prev_local = local_result.latency_seconds;

            let api_req = CalculationRequest {
                model,
                tokens,
                batch_size: 1,
                deployment: Deployment::Api,
            };
            let api_result = engine::calculate(&c, &api_req).unwrap();
            assert!(api_result.latency_seconds > prev_api);
            prev_api = api_result.latency_seconds;
        }
    }
}

#[test]
fn compatibility_matches_vram_rule() {
    let c = catalog();
    for model in ModelClass::ALL {
        for kind in HardwareKind::ALL {
            for tokens in [100u64, 2000, 8000] {
                let result = engine::calculate(&c, &local(model, tokens, 1, kind)).unwrap();
                let memory = result.memory_usage_gb.unwrap();
                let expected = kind.is_cpu() || c.hardware(kind).vram_gb >= memory;
                assert_eq!(
                    result.hardware_compatible, expected,
                    "{model} on {kind} at {tokens} tokens ({memory:.1} GB)"
                );
            }
        }
    }
}

#[test]
fn all_valid_requests_have_positive_outputs() {
    let c = catalog();
    for model in ModelClass::ALL {
        for kind in HardwareKind::ALL {
            let result = engine::calculate(&c, &local(model, 750, 2, kind)).unwrap();
            assert!(result.latency_seconds > 0.0);
            assert!(result.cost_per_request_usd > 0.0);
            assert!(result.memory_usage_gb.unwrap() > 0.0);
        }
        let api_req =
            CalculationRequest { model, tokens: 750, batch_size: 1, deployment: Deployment::Api };
        let result = engine::calculate(&c, &api_req).unwrap();
        assert!(result.latency_seconds > 0.0);
        assert!(result.cost_per_request_usd > 0.0);
        assert!(result.hardware_compatible);
    }
}
