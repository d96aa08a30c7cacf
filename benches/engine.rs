use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use archboard::config::LayoutConfig;
use archboard::geometry::Rect;
use archboard::layout::{ViewMode, compute_layout};
use archboard::snap::compute_snap_guides;
use archboard::spec::{
    AgentSpec, ConnectedSystem, DynamicContextEntry, Guardrail, InputChannel, OutputChannel,
    SystemPrompt, Tool,
};

fn synthetic_spec(inputs: usize, tools: usize, systems_per_tool: usize, outputs: usize) -> AgentSpec {
    let mut spec = AgentSpec {
        name: "Bench Agent".to_string(),
        model: "claude-sonnet".to_string(),
        ..AgentSpec::default()
    };
    spec.prompt_requirements.system_prompt = Some(SystemPrompt {
        summary: "bench".to_string(),
        token_estimate: 800,
    });
    for index in 0..4 {
        spec.prompt_requirements.dynamic_context.push(DynamicContextEntry {
            name: format!("ctx {index}"),
            source: "bench".to_string(),
            token_estimate: 500,
        });
    }
    spec.prompt_requirements.guardrails.push(Guardrail {
        rule: "bench".to_string(),
        token_estimate: 100,
    });
    for index in 0..inputs {
        spec.input_channels.push(InputChannel {
            name: format!("in {index}"),
            format: "json".to_string(),
            tokens_per_message: 200,
        });
    }
    for tool_index in 0..tools {
        spec.tool_stack.push(Tool {
            name: format!("tool {tool_index}"),
            kind: "api".to_string(),
            input_tokens: 100,
            output_tokens: 400,
            connected_systems: (0..systems_per_tool)
                .map(|system_index| ConnectedSystem {
                    name: format!("sys {tool_index}-{system_index}"),
                    integration: "REST".to_string(),
                })
                .collect(),
        });
    }
    for index in 0..outputs {
        spec.output_channels.push(OutputChannel {
            name: format!("out {index}"),
            format: "event".to_string(),
            tokens_per_delivery: 300,
        });
    }
    spec
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for (name, inputs, tools, systems, outputs) in [
        ("small", 2, 2, 1, 2),
        ("medium", 5, 6, 3, 4),
        ("large", 12, 20, 5, 10),
    ] {
        let spec = synthetic_spec(inputs, tools, systems, outputs);
        group.bench_with_input(BenchmarkId::from_parameter(name), &spec, |b, spec| {
            b.iter(|| {
                let layout =
                    compute_layout(black_box(spec), ViewMode::TokenEconomics, None, &config);
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_snap(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap");
    let config = LayoutConfig::default();
    for (name, inputs, tools, systems, outputs) in
        [("medium", 5, 6, 3, 4), ("large", 12, 20, 5, 10)]
    {
        let spec = synthetic_spec(inputs, tools, systems, outputs);
        let layout = compute_layout(&spec, ViewMode::Architecture, None, &config);
        let dragging = [layout.nodes[0].rect()];
        let targets: Vec<Rect> = layout.nodes[1..].iter().map(|node| node.rect()).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &targets,
            |b, targets| {
                b.iter(|| {
                    let result = compute_snap_guides(
                        black_box(&dragging),
                        black_box(targets),
                        config.snap_threshold,
                    );
                    black_box(result.dx);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_snap
);
criterion_main!(benches);
