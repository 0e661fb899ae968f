//! FIFO packet buffer and the queue/scheduling contract shared by every
//! loss model.

use crate::clock::Clock;
use bytes::Bytes;
use serde::Serialize;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Upper clamp on scheduling hints, in milliseconds. Models with no
/// internal timer report this as "sleep as long as you like".
pub const WAIT_CAP_MS: u64 = u16::MAX as u64;

/// Per-packet drop/keep decision process of one link direction.
///
/// Packet contents are opaque to every current model; only the arrival
/// time feeds the decision.
pub trait LossModel {
    /// Decides the fate of a packet arriving at `now_ms`, advancing any
    /// internal state first.
    fn drop_packet(&mut self, now_ms: u64, packet: &[u8]) -> bool;

    /// Upper bound on how long the caller may sleep before the model's
    /// state can change on its own.
    fn wait_bound(&mut self, now_ms: u64) -> u64 {
        let _ = now_ms;
        WAIT_CAP_MS
    }
}

/// Strict-FIFO buffer of admitted packets.
#[derive(Debug, Default)]
pub struct PacketQueue {
    packets: VecDeque<Bytes>,
}

impl PacketQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, packet: Bytes) {
        self.packets.push_back(packet);
    }

    /// Writes every queued packet to `sink` in arrival order, then leaves
    /// the queue empty. A packet is removed only once its write succeeded,
    /// so an endpoint fault never loses admitted packets.
    pub fn drain(&mut self, sink: &mut dyn Write) -> io::Result<()> {
        while let Some(packet) = self.packets.front() {
            sink.write_all(packet)?;
            self.packets.pop_front();
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }
}

/// Counters over one queue's lifetime.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LinkStats {
    pub packets_seen: u64,
    pub packets_dropped: u64,
    pub bytes_enqueued: u64,
}

impl LinkStats {
    pub fn observed_drop_rate(&self) -> f64 {
        if self.packets_seen == 0 {
            0.0
        } else {
            self.packets_dropped as f64 / self.packets_seen as f64
        }
    }
}

/// The loss queue contract as seen by the driving event loop.
pub trait LinkQueue {
    /// Stamps the packet with the current time and admits it unless the
    /// active model drops it.
    fn ingest(&mut self, packet: Bytes);

    /// Flushes admitted packets to the write endpoint in FIFO order,
    /// propagating any endpoint fault untouched.
    fn drain(&mut self, sink: &mut dyn Write) -> io::Result<()>;

    /// Milliseconds the caller may safely block before calling back in:
    /// `0` while output is pending, otherwise the model's bound clamped
    /// to [`WAIT_CAP_MS`].
    fn scheduling_hint(&mut self) -> u64;

    fn has_pending_output(&self) -> bool;

    /// Termination is an external decision, never the model's.
    fn is_finished(&self) -> bool {
        false
    }

    fn stats(&self) -> LinkStats;
}

/// A loss model bound to a clock and a packet buffer.
pub struct LossQueue<M, C> {
    model: M,
    clock: C,
    queue: PacketQueue,
    stats: LinkStats,
}

impl<M: LossModel, C: Clock> LossQueue<M, C> {
    pub fn new(model: M, clock: C) -> Self {
        Self {
            model,
            clock,
            queue: PacketQueue::new(),
            stats: LinkStats::default(),
        }
    }
}

impl<M: LossModel, C: Clock> LinkQueue for LossQueue<M, C> {
    fn ingest(&mut self, packet: Bytes) {
        let now = self.clock.now_ms();
        self.stats.packets_seen += 1;
        if self.model.drop_packet(now, &packet) {
            self.stats.packets_dropped += 1;
        } else {
            self.stats.bytes_enqueued += packet.len() as u64;
            self.queue.push(packet);
        }
    }

    fn drain(&mut self, sink: &mut dyn Write) -> io::Result<()> {
        self.queue.drain(sink)
    }

    fn scheduling_hint(&mut self) -> u64 {
        if !self.queue.is_empty() {
            return 0;
        }
        self.model.wait_bound(self.clock.now_ms()).min(WAIT_CAP_MS)
    }

    fn has_pending_output(&self) -> bool {
        !self.queue.is_empty()
    }

    fn stats(&self) -> LinkStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailOnce {
        tripped: bool,
        written: Vec<u8>,
    }

    impl Write for FailOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.tripped {
                self.tripped = true;
                return Err(io::Error::new(io::ErrorKind::WouldBlock, "endpoint busy"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn drain_preserves_fifo_order() {
        let mut queue = PacketQueue::new();
        queue.push(Bytes::from_static(b"first"));
        queue.push(Bytes::from_static(b"second"));
        queue.push(Bytes::from_static(b"third"));

        let mut sink = Vec::new();
        queue.drain(&mut sink).unwrap();

        assert_eq!(sink, b"firstsecondthird");
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_fault_keeps_unwritten_packets() {
        let mut queue = PacketQueue::new();
        queue.push(Bytes::from_static(b"one"));
        queue.push(Bytes::from_static(b"two"));

        let mut sink = FailOnce {
            tripped: false,
            written: Vec::new(),
        };
        assert!(queue.drain(&mut sink).is_err());
        assert_eq!(queue.len(), 2);

        queue.drain(&mut sink).unwrap();
        assert_eq!(sink.written, b"onetwo");
        assert!(queue.is_empty());
    }

    #[test]
    fn observed_drop_rate_handles_empty_history() {
        let stats = LinkStats::default();
        assert_eq!(stats.observed_drop_rate(), 0.0);

        let stats = LinkStats {
            packets_seen: 4,
            packets_dropped: 1,
            bytes_enqueued: 0,
        };
        assert_eq!(stats.observed_drop_rate(), 0.25);
    }
}
