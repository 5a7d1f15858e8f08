//! # Network Condition Simulation
//!
//! Deterministic latency, jitter, loss and duplication for exercising the
//! protocol without a real network. The reconciliation path only earns its
//! keep under bad conditions, so the integration tests and the loopback
//! demo run their traffic through a [`LossyLink`].
//!
//! Randomness is seeded ChaCha: the same seed and traffic produce the same
//! delivery schedule on every machine.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Network conditions applied to a link.
#[derive(Clone, Copy, Debug)]
pub struct NetworkConditions {
    /// Base one-way latency in ticks.
    pub latency_ticks: u32,
    /// Additional random latency in ticks, `0..=jitter_ticks` per message.
    pub jitter_ticks: u32,
    /// Percentage of messages lost outright (0-100).
    pub loss_percent: u8,
    /// Percentage of messages delivered twice (0-100).
    pub duplicate_percent: u8,
}

impl NetworkConditions {
    /// Perfect conditions: everything arrives the same tick it was sent.
    pub const PERFECT: Self = Self {
        latency_ticks: 0,
        jitter_ticks: 0,
        loss_percent: 0,
        duplicate_percent: 0,
    };

    /// Good conditions (wired, short haul).
    pub const GOOD: Self = Self {
        latency_ticks: 1,
        jitter_ticks: 0,
        loss_percent: 0,
        duplicate_percent: 0,
    };

    /// Average conditions (cable, cross-country).
    pub const AVERAGE: Self = Self {
        latency_ticks: 1,
        jitter_ticks: 1,
        loss_percent: 1,
        duplicate_percent: 1,
    };

    /// Poor conditions (congested wifi, mobile).
    pub const POOR: Self = Self {
        latency_ticks: 2,
        jitter_ticks: 2,
        loss_percent: 5,
        duplicate_percent: 2,
    };
}

/// A message in transit.
#[derive(Clone, Copy, Debug)]
struct InFlight<T> {
    /// Tick at which the message becomes deliverable.
    arrival_tick: u32,
    /// The message.
    message: T,
}

/// Running counters for one link.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkStats {
    /// Messages offered to the link.
    pub sent: u64,
    /// Messages handed to the receiver (duplicates included).
    pub delivered: u64,
    /// Messages lost.
    pub dropped: u64,
    /// Extra copies injected.
    pub duplicated: u64,
}

/// One-directional link with simulated conditions.
///
/// Messages go in stamped with the sender's tick and come out once the
/// receiver's tick reaches their scheduled arrival. Jitter makes arrivals
/// cross each other, so receivers see reordering exactly as they would on
/// a real unreliable transport.
pub struct LossyLink<T> {
    /// Messages in transit.
    in_flight: VecDeque<InFlight<T>>,
    /// Conditions applied to every send.
    conditions: NetworkConditions,
    /// Deterministic randomness.
    rng: ChaCha8Rng,
    /// Counters.
    stats: LinkStats,
}

impl<T: Copy> LossyLink<T> {
    /// Creates a link with the given conditions and seed.
    #[must_use]
    pub fn new(conditions: NetworkConditions, seed: u64) -> Self {
        Self {
            in_flight: VecDeque::with_capacity(64),
            conditions,
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: LinkStats::default(),
        }
    }

    /// Offers a message to the link at the sender's current tick.
    pub fn send(&mut self, tick: u32, message: T) {
        self.stats.sent += 1;

        if self.roll(self.conditions.loss_percent) {
            self.stats.dropped += 1;
            return;
        }

        let arrival = tick + self.latency();
        self.in_flight.push_back(InFlight {
            arrival_tick: arrival,
            message,
        });

        if self.roll(self.conditions.duplicate_percent) {
            let arrival = tick + self.latency();
            self.in_flight.push_back(InFlight {
                arrival_tick: arrival,
                message,
            });
            self.stats.duplicated += 1;
        }
    }

    /// Releases every message whose arrival tick has been reached.
    pub fn deliver(&mut self, tick: u32) -> Vec<T> {
        let mut out = Vec::new();
        self.in_flight.retain(|in_flight| {
            if in_flight.arrival_tick <= tick {
                out.push(in_flight.message);
                false
            } else {
                true
            }
        });
        self.stats.delivered += out.len() as u64;
        out
    }

    /// Messages currently in transit.
    #[must_use]
    pub fn in_transit(&self) -> usize {
        self.in_flight.len()
    }

    /// Counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &LinkStats {
        &self.stats
    }

    fn latency(&mut self) -> u32 {
        let jitter = if self.conditions.jitter_ticks == 0 {
            0
        } else {
            self.rng.gen_range(0..=self.conditions.jitter_ticks)
        };
        self.conditions.latency_ticks + jitter
    }

    fn roll(&mut self, percent: u8) -> bool {
        percent > 0 && self.rng.gen_range(0..100u32) < u32::from(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_link_delivers_immediately_in_order() {
        let mut link: LossyLink<u32> = LossyLink::new(NetworkConditions::PERFECT, 1);

        link.send(5, 50);
        link.send(5, 51);

        assert_eq!(link.deliver(5), vec![50, 51]);
        assert_eq!(link.in_transit(), 0);
    }

    #[test]
    fn test_latency_holds_messages() {
        let mut link: LossyLink<u32> = LossyLink::new(NetworkConditions::GOOD, 1);

        link.send(5, 50);
        assert!(link.deliver(5).is_empty());
        assert_eq!(link.deliver(6), vec![50]);
    }

    #[test]
    fn test_total_loss_drops_everything() {
        let conditions = NetworkConditions {
            loss_percent: 100,
            ..NetworkConditions::PERFECT
        };
        let mut link: LossyLink<u32> = LossyLink::new(conditions, 1);

        for tick in 0..50 {
            link.send(tick, tick);
        }

        assert!(link.deliver(1_000).is_empty());
        assert_eq!(link.stats().dropped, 50);
    }

    #[test]
    fn test_duplication_delivers_extra_copies() {
        let conditions = NetworkConditions {
            duplicate_percent: 100,
            ..NetworkConditions::PERFECT
        };
        let mut link: LossyLink<u32> = LossyLink::new(conditions, 1);

        link.send(0, 7);
        assert_eq!(link.deliver(0), vec![7, 7]);
        assert_eq!(link.stats().duplicated, 1);
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let run = |seed: u64| {
            let mut link: LossyLink<u32> = LossyLink::new(NetworkConditions::POOR, seed);
            let mut received = Vec::new();
            for tick in 0..200 {
                link.send(tick, tick);
                received.extend(link.deliver(tick));
            }
            received.extend(link.deliver(1_000));
            received
        };

        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }
}
