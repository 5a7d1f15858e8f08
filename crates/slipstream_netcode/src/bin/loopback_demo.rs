//! # Loopback Demo
//!
//! Runs one predicted owner, the authority and one observer in-process,
//! with both message paths routed through simulated average network
//! conditions. Prints the session counters and exits nonzero if the owner
//! failed to converge on the authoritative trajectory.

use slipstream_netcode::{
    command_channel, snapshot_channel, CommandSource, LossyLink, NetcodeError, NetworkConditions,
    Pose, PredictionEngine, Reconciler, RemoteInterpolator, ServerAuthority, TickContext,
};
use slipstream_shared::config::NetcodeConfig;
use slipstream_shared::math::Vec3;
use slipstream_shared::protocol::{EntityId, InputCommand};
use slipstream_sim::{GroundPlane, MotionState};

/// Ticks of active wandering before the settle phase.
const ACTIVE_TICKS: u32 = 500;
/// Trailing neutral ticks that let both sides come to rest.
const SETTLE_TICKS: u32 = 100;
/// Final owner-to-authority distance accepted as converged.
const CONVERGENCE_METERS: f32 = 0.25;

/// Deterministic wandering input: weaves, turns and hops, then goes quiet
/// for the settle phase.
struct Wanderer;

impl CommandSource for Wanderer {
    fn sample(&mut self, tick: u32) -> InputCommand {
        let mut cmd = InputCommand::new(tick);
        if tick >= ACTIVE_TICKS {
            return cmd;
        }
        cmd.vertical = 1.0;
        cmd.horizontal = if (tick / 25) % 2 == 0 { 0.6 } else { -0.6 };
        if tick % 9 == 0 {
            cmd.yaw_delta = 4.0;
        }
        cmd.set_jump(tick % 80 == 0);
        cmd
    }
}

fn run() -> Result<(), NetcodeError> {
    let config = NetcodeConfig::default();
    let resolver = GroundPlane::default();
    let entity = EntityId(1);
    let spawn = MotionState::at_pose(Vec3::ZERO, 0.0);

    let mut owner = PredictionEngine::from_config(entity, spawn, &config);
    let mut reconciler = Reconciler::from_config(&config);
    let mut authority = ServerAuthority::from_config(&config);
    authority.spawn(entity, spawn);
    let mut observer =
        RemoteInterpolator::from_config(Pose::new(spawn.position, spawn.yaw), &config);

    let (cmd_tx, cmd_rx) = command_channel(config.channel_capacity);
    let (srv_cmd_tx, srv_cmd_rx) = command_channel(config.channel_capacity);
    let (snap_tx, snap_rx) = snapshot_channel(config.channel_capacity);

    let mut cmd_link = LossyLink::new(NetworkConditions::AVERAGE, 7);
    let mut snap_link = LossyLink::new(NetworkConditions::AVERAGE, 11);

    let mut source = Wanderer;
    let total_ticks = ACTIVE_TICKS + SETTLE_TICKS;

    for tick in 0..total_ticks {
        let ctx = TickContext::new(tick, config.tick_duration());

        // Owner predicts and transmits
        owner.advance(ctx, &mut source, &cmd_tx, &resolver)?;

        // Command path: owner -> network -> authority
        for message in cmd_rx.drain() {
            cmd_link.send(tick, message);
        }
        for message in cmd_link.deliver(tick) {
            srv_cmd_tx.send(message)?;
        }

        // Authority simulates and broadcasts
        authority.process(&srv_cmd_rx, &snap_tx, &resolver)?;

        // Snapshot path: authority -> network -> owner and observer
        for message in snap_rx.drain() {
            snap_link.send(tick, message);
        }
        for message in snap_link.deliver(tick) {
            if message.entity == entity {
                reconciler.apply(&mut owner, &message.snapshot, ctx, &resolver);
                observer.push_snapshot(&message.snapshot);
            }
        }
        observer.update(config.tick_duration());
    }

    let Some(authoritative) = authority.state_of(entity).copied() else {
        return Err(NetcodeError::UnknownEntity(entity));
    };
    let final_error = owner.state().position.distance(authoritative.position);
    let observer_error = observer
        .displayed()
        .position
        .distance(authoritative.position);

    println!("==================================================");
    println!(" SLIPSTREAM LOOPBACK DEMO");
    println!(" {total_ticks} ticks, average network on both paths");
    println!("==================================================");
    println!(" owner:    {} ticks simulated", owner.stats().ticks_simulated);
    println!(
        " commands: {} sent / {} lost on link",
        owner.stats().commands_sent,
        cmd_link.stats().dropped
    );
    println!(
        " server:   {} processed / {} deduped",
        authority.stats().commands_processed,
        authority.stats().commands_dropped
    );
    println!(
        " reconcile: {} confirmed / {} corrected ({} commands replayed)",
        reconciler.stats().confirmed,
        reconciler.stats().corrections,
        reconciler.stats().replayed_commands
    );
    println!(
        " error:    avg {:.4} m, max {:.4} m, final {:.4} m",
        reconciler.stats().average_position_error(),
        reconciler.stats().max_position_error,
        final_error
    );
    println!(" observer: {observer_error:.4} m behind authority");
    println!("==================================================");

    if final_error > CONVERGENCE_METERS {
        eprintln!("FAILED: owner did not converge ({final_error:.4} m)");
        std::process::exit(1);
    }
    println!("converged");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}
