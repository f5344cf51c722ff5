//! Error collection across concurrent workers.

use std::sync::{Mutex, PoisonError};

use crossbeam::channel::{self, Receiver, Sender};

use filecensus_core::{IncompleteScan, ScanError};

/// Buffer size of the primary error channel.
pub const DEFAULT_ERROR_BUFFER: usize = 100;

/// Many-producer, single-drain error queue.
///
/// Producers never block: once the bounded channel is full, errors spill
/// into an unbounded overflow list. Nothing reported is ever dropped.
#[derive(Debug)]
pub struct ErrorCollector {
    tx: Sender<ScanError>,
    rx: Receiver<ScanError>,
    overflow: Mutex<Vec<ScanError>>,
}

impl ErrorCollector {
    /// Create a collector with the default buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ERROR_BUFFER)
    }

    /// Create a collector whose channel buffers `capacity` errors.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = channel::bounded(capacity);
        Self {
            tx,
            rx,
            overflow: Mutex::new(Vec::new()),
        }
    }

    /// Report an error without waiting for the consumer.
    pub fn report(&self, err: ScanError) {
        if let Err(full) = self.tx.try_send(err) {
            self.overflow
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(full.into_inner());
        }
    }

    /// Close the queue and drain everything reported.
    ///
    /// Must only be called after every producer has joined.
    pub fn finish(self) -> Option<IncompleteScan> {
        let Self { tx, rx, overflow } = self;
        drop(tx);

        let mut errors: Vec<ScanError> = rx.try_iter().collect();
        errors.extend(overflow.into_inner().unwrap_or_else(PoisonError::into_inner));
        IncompleteScan::from_errors(errors)
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}
