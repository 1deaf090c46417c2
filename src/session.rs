//! Host-side scan session
//!
//! Runs a [`FrameAnalyzer`] on one dedicated worker thread and feeds it with
//! a keep-only-latest policy: at most one frame waits while another is being
//! analysed, and a newer frame evicts (and releases) the waiting one. Frames
//! are refused until camera permission is granted and while analysis is
//! stopped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::thread::JoinHandle;

use flume::{Receiver, Sender, TrySendError};
use tracing::{debug, error, info};

use crate::decoder::SymbolDecoder;
use crate::models::{RawFrame, Symbol};
use crate::pipeline::{FrameAnalyzer, FrameOutcome};
use crate::sink::{DiagnosticSink, ResultSink};

/// Text shown on screen for a decoded symbol
pub fn detection_label(symbol: &Symbol) -> String {
    format!("Barcode detected: {}", symbol.text)
}

/// Camera access state as negotiated by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CameraPermission {
    /// Not asked yet
    Pending = 0,
    /// User allowed camera access
    Granted = 1,
    /// User refused camera access
    Denied = 2,
}

impl CameraPermission {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => CameraPermission::Granted,
            2 => CameraPermission::Denied,
            _ => CameraPermission::Pending,
        }
    }
}

/// Why a submitted frame was released without analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Camera permission not granted
    NoPermission,
    /// Analysis is stopped
    Stopped,
    /// The session has shut down
    Closed,
}

/// What [`ScanSession::submit`] did with a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Waiting for the worker
    Queued,
    /// Waiting for the worker; an older waiting frame was discarded
    ReplacedStale,
    /// Released immediately
    Dropped(DropReason),
}

/// Counter snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames handed to `submit`
    pub submitted: usize,
    /// Frames released without analysis
    pub dropped: usize,
    /// Frames run through the analyzer
    pub analyzed: usize,
    /// Frames that produced a symbol
    pub detected: usize,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicUsize,
    dropped: AtomicUsize,
    analyzed: AtomicUsize,
    detected: AtomicUsize,
}

struct Shared {
    scanning: AtomicBool,
    permission: AtomicU8,
    counters: Counters,
}

impl Shared {
    fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    fn permission(&self) -> CameraPermission {
        CameraPermission::from_u8(self.permission.load(Ordering::Acquire))
    }

    /// Why a frame must not be analysed right now, if it must not
    fn refusal(&self) -> Option<DropReason> {
        if self.permission() != CameraPermission::Granted {
            Some(DropReason::NoPermission)
        } else if !self.is_scanning() {
            Some(DropReason::Stopped)
        } else {
            None
        }
    }

    fn drop_frame(&self, frame: RawFrame) {
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        drop(frame);
    }
}

/// Background frame analysis with keep-only-latest backpressure
pub struct ScanSession {
    tx: Option<Sender<RawFrame>>,
    // Producer-side handle on the slot, used to evict a stale frame
    pending: Receiver<RawFrame>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Start the worker thread; analysis is on, permission is pending
    pub fn spawn<D, S, R>(analyzer: FrameAnalyzer<D, S, R>) -> std::io::Result<Self>
    where
        D: SymbolDecoder + Send + 'static,
        S: DiagnosticSink + Send + 'static,
        R: ResultSink + Send + 'static,
    {
        let (tx, rx) = flume::bounded::<RawFrame>(1);
        let pending = rx.clone();
        let shared = Arc::new(Shared {
            scanning: AtomicBool::new(true),
            permission: AtomicU8::new(CameraPermission::Pending as u8),
            counters: Counters::default(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("frame-scan".into())
            .spawn(move || run_worker(analyzer, rx, worker_shared))?;

        info!("scan session started");
        Ok(Self {
            tx: Some(tx),
            pending,
            shared,
            worker: Some(worker),
        })
    }

    /// Record the outcome of the camera permission request
    pub fn set_permission(&self, permission: CameraPermission) {
        self.shared
            .permission
            .store(permission as u8, Ordering::Release);
        if permission != CameraPermission::Granted {
            self.discard_pending();
        }
        info!(?permission, "camera permission updated");
    }

    /// Shorthand for `set_permission(CameraPermission::Granted)`
    pub fn grant_permission(&self) {
        self.set_permission(CameraPermission::Granted);
    }

    /// Shorthand for `set_permission(CameraPermission::Denied)`
    pub fn deny_permission(&self) {
        self.set_permission(CameraPermission::Denied);
    }

    /// Current permission state
    pub fn permission(&self) -> CameraPermission {
        self.shared.permission()
    }

    /// (Re)start analysis of submitted frames
    pub fn start_analysis(&self) {
        self.shared.scanning.store(true, Ordering::Release);
        debug!("analysis started");
    }

    /// Stop analysing; frames are released on arrival until restarted
    pub fn stop_analysis(&self) {
        self.shared.scanning.store(false, Ordering::Release);
        self.discard_pending();
        debug!("analysis stopped");
    }

    /// Whether frames are currently being analysed
    pub fn is_scanning(&self) -> bool {
        self.shared.is_scanning()
    }

    /// Hand a frame to the worker
    ///
    /// Never blocks. A frame that is not queued is released before this
    /// returns.
    pub fn submit(&self, frame: RawFrame) -> SubmitStatus {
        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);

        if let Some(reason) = self.shared.refusal() {
            self.shared.drop_frame(frame);
            return SubmitStatus::Dropped(reason);
        }
        let Some(tx) = &self.tx else {
            self.shared.drop_frame(frame);
            return SubmitStatus::Dropped(DropReason::Closed);
        };

        let mut replaced = false;
        let mut frame = frame;
        loop {
            match tx.try_send(frame) {
                Ok(()) => {
                    return if replaced {
                        SubmitStatus::ReplacedStale
                    } else {
                        SubmitStatus::Queued
                    };
                }
                Err(TrySendError::Full(back)) => {
                    frame = back;
                    if self.discard_pending() > 0 {
                        replaced = true;
                    }
                }
                Err(TrySendError::Disconnected(back)) => {
                    self.shared.drop_frame(back);
                    return SubmitStatus::Dropped(DropReason::Closed);
                }
            }
        }
    }

    /// Counter snapshot
    pub fn stats(&self) -> SessionStats {
        let c = &self.shared.counters;
        SessionStats {
            submitted: c.submitted.load(Ordering::Relaxed),
            dropped: c.dropped.load(Ordering::Relaxed),
            analyzed: c.analyzed.load(Ordering::Relaxed),
            detected: c.detected.load(Ordering::Relaxed),
        }
    }

    /// Stop accepting frames, let the worker finish the waiting one, and join it
    pub fn shutdown(&mut self) {
        // Closing the only sender ends the worker loop once the slot is empty
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("scan worker panicked");
            }
            info!(stats = ?self.stats(), "scan session stopped");
        }
    }

    fn discard_pending(&self) -> usize {
        let mut discarded = 0;
        while let Ok(stale) = self.pending.try_recv() {
            self.shared.drop_frame(stale);
            discarded += 1;
        }
        discarded
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker<D, S, R>(
    analyzer: FrameAnalyzer<D, S, R>,
    rx: Receiver<RawFrame>,
    shared: Arc<Shared>,
)
where
    D: SymbolDecoder,
    S: DiagnosticSink,
    R: ResultSink,
{
    for frame in rx.iter() {
        // The gate can close between `submit`'s check and the send
        if let Some(reason) = shared.refusal() {
            debug!(?reason, "dropping queued frame");
            shared.drop_frame(frame);
            continue;
        }
        let outcome = analyzer.analyze(frame);
        shared.counters.analyzed.fetch_add(1, Ordering::Relaxed);
        if let FrameOutcome::Detected(_) = outcome {
            shared.counters.detected.fetch_add(1, Ordering::Relaxed);
        }
    }
    debug!("scan worker exiting");
}
