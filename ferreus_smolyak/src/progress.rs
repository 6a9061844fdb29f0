/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines progress and diagnostic messages, sinks, and helper functions for Smolyak builds and solves.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Progress and diagnostic reporting primitives.

use std::fmt::Debug;
use std::sync::{mpsc, Arc};
use std::thread;

/// Events emitted while building, fitting and evaluating an interpolant.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMsg {
    /// The anisotropic index set has been generated.
    IndexSetBuilt {
        dimensions: usize,
        mu_max: usize,
        num_elements: usize,
    },

    /// The Smolyak grid has been generated.
    GridBuilt { num_points: usize },

    /// The coefficient system has been solved.
    SystemSolved {
        rank: usize,
        num_basis: usize,
        condition_number: f64,
        max_residual: f64,
    },

    /// Query points were found outside the interpolation domain. Evaluation
    /// still proceeds, but values there are extrapolated and may diverge.
    DomainOutOfRange { num_points: usize },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// The listener exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Emits `msg` if a sink is attached.
#[inline]
pub(crate) fn emit(sink: &Option<Arc<dyn ProgressSink>>, msg: ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Sink that records every message, for assertions in tests.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub messages: Mutex<Vec<ProgressMsg>>,
    }

    impl ProgressSink for RecordingSink {
        fn emit(&self, msg: ProgressMsg) {
            self.messages.lock().unwrap().push(msg);
        }
    }

    #[test]
    fn closure_sink_forwards_messages() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();

        let (sink, handle) = closure_sink(8, move |msg| {
            received_clone.lock().unwrap().push(msg);
        });

        sink.emit(ProgressMsg::GridBuilt { num_points: 13 });
        sink.emit(ProgressMsg::Message {
            message: "done".to_string(),
        });

        drop(sink);
        handle.join().unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], ProgressMsg::GridBuilt { num_points: 13 });
    }
}
