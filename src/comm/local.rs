/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! In-process communicator
//!
//! Each rank runs on its own thread and owns one inbox. Peers hold only the sending
//! half of that inbox, so no matrix data is ever shared: rows are copied into
//! messages and copied back out on the receiving side.

use super::errors::{CommError, Result};
use super::{Communicator, Payload, Tag};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Barrier};
use std::thread;

/// Collective call issued by a rank, in program order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectiveCall {
    /// Broadcast of `len` elements from `root`
    Broadcast { root: usize, len: usize },
    /// Barrier rendezvous
    Barrier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Point(Tag),
    Collective(u64),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Point(tag) => write!(f, "tag {}", tag),
            Channel::Collective(seq) => write!(f, "collective #{}", seq),
        }
    }
}

struct Envelope {
    source: usize,
    channel: Channel,
    payload: Box<dyn Any + Send>,
}

/// Communicator endpoint for one rank of a [`LocalWorld`]
pub struct LocalCommunicator {
    rank: usize,
    size: usize,
    /// Sending halves of every peer inbox; `None` at our own rank
    peers: Vec<Option<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
    /// Arrived messages that did not match the receive in progress
    pending: VecDeque<Envelope>,
    barrier: Arc<Barrier>,
    sequence: u64,
    trace: Vec<CollectiveCall>,
}

impl fmt::Debug for LocalCommunicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCommunicator")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .field("pending", &self.pending.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl LocalCommunicator {
    /// Collective calls this rank has issued so far
    pub fn trace(&self) -> &[CollectiveCall] {
        &self.trace
    }

    fn check_peer(&self, peer: usize) -> Result<()> {
        if peer >= self.size {
            return Err(CommError::InvalidRank {
                rank: self.rank,
                peer,
                size: self.size,
            });
        }
        Ok(())
    }

    fn post(&mut self, dest: usize, channel: Channel, payload: Box<dyn Any + Send>) -> Result<()> {
        let envelope = Envelope {
            source: self.rank,
            channel,
            payload,
        };

        match &self.peers[dest] {
            Some(sender) => sender.send(envelope).map_err(|_| CommError::SendFailed {
                rank: self.rank,
                dest,
                channel: channel.to_string(),
            }),
            None => {
                // Self-sends skip the channel
                self.pending.push_back(envelope);
                Ok(())
            }
        }
    }

    /// Block until a message from `source` on `channel` is available
    fn wait_for(&mut self, source: usize, channel: Channel) -> Result<Envelope> {
        if let Some(pos) = self
            .pending
            .iter()
            .position(|env| env.source == source && env.channel == channel)
        {
            if let Some(envelope) = self.pending.remove(pos) {
                return Ok(envelope);
            }
        }
        if let Channel::Collective(seq) = channel {
            self.check_collective_root(seq, source)?;
        }

        loop {
            let envelope = self.inbox.recv().map_err(|_| CommError::Disconnected {
                rank: self.rank,
                sender: source,
                channel: channel.to_string(),
            })?;

            if envelope.source == source && envelope.channel == channel {
                return Ok(envelope);
            }

            if let Channel::Collective(seq) = channel {
                if envelope.channel == channel {
                    return Err(CommError::CollectiveMismatch {
                        rank: self.rank,
                        sequence: seq,
                        expected_root: source,
                        actual_root: envelope.source,
                    });
                }
            }

            log::trace!(
                "rank {} buffered {} from rank {}",
                self.rank,
                envelope.channel,
                envelope.source
            );
            self.pending.push_back(envelope);
        }
    }

    /// Only one rank can be the root of a given collective
    fn check_collective_root(&self, seq: u64, expected_root: usize) -> Result<()> {
        let channel = Channel::Collective(seq);
        match self.pending.iter().find(|env| env.channel == channel) {
            Some(env) => Err(CommError::CollectiveMismatch {
                rank: self.rank,
                sequence: seq,
                expected_root,
                actual_root: env.source,
            }),
            None => Ok(()),
        }
    }

    fn unpack<T: Payload>(&self, envelope: Envelope) -> Result<Vec<T>> {
        let Envelope {
            source,
            channel,
            payload,
        } = envelope;

        payload
            .downcast::<Vec<T>>()
            .map(|data| *data)
            .map_err(|_| CommError::PayloadType {
                rank: self.rank,
                sender: source,
                channel: channel.to_string(),
            })
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast<T: Payload>(&mut self, buf: &mut [T], root: usize) -> Result<()> {
        self.check_peer(root)?;
        self.trace.push(CollectiveCall::Broadcast {
            root,
            len: buf.len(),
        });
        let channel = Channel::Collective(self.sequence);
        self.sequence += 1;

        if self.rank == root {
            for dest in (0..self.size).filter(|&dest| dest != root) {
                self.post(dest, channel, Box::new(buf.to_vec()))?;
            }
            return Ok(());
        }

        let envelope = self.wait_for(root, channel)?;
        let data = self.unpack::<T>(envelope)?;
        if data.len() != buf.len() {
            return Err(CommError::LengthMismatch {
                rank: self.rank,
                root,
                expected: buf.len(),
                found: data.len(),
            });
        }
        buf.copy_from_slice(&data);
        Ok(())
    }

    fn send<T: Payload>(&mut self, buf: &[T], dest: usize, tag: Tag) -> Result<()> {
        self.check_peer(dest)?;
        self.post(dest, Channel::Point(tag), Box::new(buf.to_vec()))
    }

    fn receive<T: Payload>(&mut self, source: usize, tag: Tag) -> Result<Vec<T>> {
        self.check_peer(source)?;
        let envelope = self.wait_for(source, Channel::Point(tag))?;
        self.unpack(envelope)
    }

    fn barrier(&mut self) -> Result<()> {
        self.trace.push(CollectiveCall::Barrier);
        self.sequence += 1;
        self.barrier.wait();
        Ok(())
    }
}

/// Factory for a fully connected set of in-process ranks
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWorld;

impl LocalWorld {
    /// Create one connected communicator per rank, ordered by rank
    pub fn communicators(size: usize) -> Result<Vec<LocalCommunicator>> {
        if size == 0 {
            return Err(CommError::InvalidSize(size));
        }

        let (senders, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| channel()).unzip();
        let barrier = Arc::new(Barrier::new(size));

        let comms = inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalCommunicator {
                rank,
                size,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(peer, sender)| (peer != rank).then(|| sender.clone()))
                    .collect(),
                inbox,
                pending: VecDeque::new(),
                barrier: Arc::clone(&barrier),
                sequence: 0,
                trace: Vec::new(),
            })
            .collect();

        Ok(comms)
    }

    /// Run `f` once per rank, each on its own thread, and collect results by rank
    ///
    /// Returns once every rank has finished. A rank that panics is reported as
    /// [`CommError::RankPanicked`]. If any thread fails to start, no rank runs `f`
    /// and [`CommError::Spawn`] is returned.
    pub fn run<R, F>(size: usize, f: F) -> Result<Vec<R>>
    where
        F: Fn(&mut LocalCommunicator) -> R + Sync,
        R: Send,
    {
        Self::run_with(size, f, |rank| {
            thread::Builder::new().name(format!("rank-{}", rank))
        })
    }

    /// [`run`](Self::run) with a caller-supplied thread builder per rank
    ///
    /// Each thread waits behind a start gate until every rank has been spawned, so a
    /// failed spawn never leaves earlier ranks blocked on peers that do not exist.
    fn run_with<R, F, B>(size: usize, f: F, builder: B) -> Result<Vec<R>>
    where
        F: Fn(&mut LocalCommunicator) -> R + Sync,
        R: Send,
        B: Fn(usize) -> thread::Builder,
    {
        let comms = Self::communicators(size)?;
        let f = &f;

        thread::scope(|scope| {
            let mut gates = Vec::with_capacity(size);
            let mut handles = Vec::with_capacity(size);

            for rank in 0..size {
                let (gate, start) = channel::<LocalCommunicator>();
                // A closed gate means another rank failed to start
                let handle = builder(rank)
                    .spawn_scoped(scope, move || start.recv().ok().map(|mut comm| f(&mut comm)))
                    .map_err(|err| CommError::Spawn {
                        rank,
                        reason: err.to_string(),
                    })?;
                gates.push(gate);
                handles.push((rank, handle));
            }

            for (rank, (gate, comm)) in gates.into_iter().zip(comms).enumerate() {
                if gate.send(comm).is_err() {
                    log::warn!("rank {} exited before it was started", rank);
                }
            }

            handles
                .into_iter()
                .map(|(rank, handle)| match handle.join() {
                    Ok(Some(result)) => Ok(result),
                    Ok(None) => Err(CommError::Spawn {
                        rank,
                        reason: "start gate closed".to_string(),
                    }),
                    Err(_) => Err(CommError::RankPanicked { rank }),
                })
                .collect()
        })
    }
}
