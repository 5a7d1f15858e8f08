//! Benchmark for the per-tick motion step.
//!
//! The step runs once per tick per entity on the authority and up to
//! window-size times per snapshot on a reconciling owner, so replay cost is
//! step cost.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use slipstream_shared::math::Vec3;
use slipstream_shared::protocol::InputCommand;
use slipstream_sim::{motor, GroundPlane, MotionState};

fn bench_single_step(c: &mut Criterion) {
    let resolver = GroundPlane::default();
    let state = MotionState::at_pose(Vec3::ZERO, 30.0);
    let mut command = InputCommand::new(1);
    command.horizontal = 0.7;
    command.vertical = 1.0;
    command.yaw_delta = 2.0;

    c.bench_function("motor_step", |b| {
        b.iter(|| motor::step(black_box(&state), black_box(&command), 0.05, &resolver));
    });
}

fn bench_replay_window(c: &mut Criterion) {
    let resolver = GroundPlane::default();

    c.bench_function("motor_step_x64", |b| {
        b.iter(|| {
            let mut state = MotionState::at_pose(Vec3::ZERO, 0.0);
            for tick in 0..64u32 {
                let mut command = InputCommand::new(tick);
                command.horizontal = if tick % 2 == 0 { 1.0 } else { -1.0 };
                command.vertical = 0.5;
                state = motor::step(&state, &command, 0.05, &resolver);
            }
            black_box(state)
        });
    });
}

criterion_group!(benches, bench_single_step, bench_replay_window);
criterion_main!(benches);
