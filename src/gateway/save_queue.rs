// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use super::LayoutGateway;
use crate::model::record::{count_zones, ZoneRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { zones: usize },
    Failed { message: String },
}

#[derive(Debug, Default)]
struct SaveState {
    /// Newest snapshot not yet handed to the gateway. A newer submit replaces it.
    pending: Option<Vec<ZoneRecord>>,
    in_flight: bool,
    shutdown: bool,
}

#[derive(Debug, Default)]
struct SaveInner {
    state: Mutex<SaveState>,
    cv: Condvar,
}

impl SaveInner {
    fn lock(&self) -> MutexGuard<'_, SaveState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, SaveState>) -> MutexGuard<'a, SaveState> {
        self.cv.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single background worker that saves layout snapshots one at a time.
///
/// Submitting never blocks on the gateway. While a save is in flight, further submissions
/// collapse into one pending snapshot, so the last submitted state always reaches the gateway
/// and intermediate ones may be skipped. Dropping the queue saves whatever is still pending.
pub struct SaveQueue {
    inner: Arc<SaveInner>,
    worker: Option<JoinHandle<()>>,
}

impl SaveQueue {
    pub fn spawn(gateway: Arc<dyn LayoutGateway>) -> io::Result<(Self, Receiver<SaveOutcome>)> {
        let inner = Arc::new(SaveInner::default());
        let (outcomes, receiver) = mpsc::channel();

        let worker = std::thread::Builder::new()
            .name("zoneplan-save".to_owned())
            .spawn({
                let inner = inner.clone();
                move || run_worker(&inner, gateway.as_ref(), &outcomes)
            })?;

        Ok((
            Self {
                inner,
                worker: Some(worker),
            },
            receiver,
        ))
    }

    pub fn submit(&self, records: Vec<ZoneRecord>) {
        let mut state = self.inner.lock();
        if state.pending.replace(records).is_some() {
            tracing::debug!("replaced queued save with newer snapshot");
        }
        self.inner.cv.notify_all();
    }

    /// Blocks until nothing is pending or in flight.
    pub fn flush(&self) {
        let mut state = self.inner.lock();
        while state.pending.is_some() || state.in_flight {
            state = self.inner.wait(state);
        }
    }

    pub fn is_busy(&self) -> bool {
        let state = self.inner.lock();
        state.pending.is_some() || state.in_flight
    }
}

impl Drop for SaveQueue {
    fn drop(&mut self) {
        self.inner.lock().shutdown = true;
        self.inner.cv.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("save worker panicked");
            }
        }
    }
}

fn run_worker(inner: &SaveInner, gateway: &dyn LayoutGateway, outcomes: &Sender<SaveOutcome>) {
    loop {
        let records = {
            let mut state = inner.lock();
            loop {
                if let Some(records) = state.pending.take() {
                    state.in_flight = true;
                    break records;
                }
                if state.shutdown {
                    return;
                }
                state = inner.wait(state);
            }
        };

        let outcome = match gateway.save(&records) {
            Ok(()) => {
                let zones = count_zones(&records);
                tracing::info!(gateway = %gateway.describe(), zones, "layout saved");
                SaveOutcome::Saved { zones }
            }
            Err(err) => {
                tracing::warn!(gateway = %gateway.describe(), %err, "layout save failed");
                SaveOutcome::Failed {
                    message: err.to_string(),
                }
            }
        };
        // The editor may already be gone; the save itself still counts.
        let _ = outcomes.send(outcome);

        inner.lock().in_flight = false;
        inner.cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::{Arc, Mutex};

    use super::{SaveOutcome, SaveQueue};
    use crate::fixtures::pharmacy_records;
    use crate::gateway::{GatewayError, LayoutGateway};
    use crate::model::record::ZoneRecord;

    /// Records every save; each save announces itself and then waits for a permit.
    struct GatedGateway {
        saves: Mutex<Vec<Vec<ZoneRecord>>>,
        started: Mutex<Sender<()>>,
        permits: Mutex<Receiver<()>>,
        fail: bool,
    }

    struct Harness {
        gateway: Arc<GatedGateway>,
        started: Receiver<()>,
        permits: Sender<()>,
    }

    fn harness(fail: bool) -> Harness {
        let (started_tx, started) = mpsc::channel();
        let (permits, permits_rx) = mpsc::channel();
        let gateway = Arc::new(GatedGateway {
            saves: Mutex::new(Vec::new()),
            started: Mutex::new(started_tx),
            permits: Mutex::new(permits_rx),
            fail,
        });
        Harness {
            gateway,
            started,
            permits,
        }
    }

    impl LayoutGateway for GatedGateway {
        fn load(&self) -> Result<Vec<ZoneRecord>, GatewayError> {
            Ok(Vec::new())
        }

        fn save(&self, records: &[ZoneRecord]) -> Result<(), GatewayError> {
            self.started.lock().unwrap().send(()).unwrap();
            self.permits.lock().unwrap().recv().unwrap();
            self.saves.lock().unwrap().push(records.to_vec());
            if self.fail {
                return Err(GatewayError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    url: "http://gateway.test/save-zones".to_owned(),
                });
            }
            Ok(())
        }

        fn describe(&self) -> String {
            "gated".to_owned()
        }
    }

    #[test]
    fn queued_saves_collapse_to_the_newest_snapshot() {
        let h = harness(false);
        let (queue, outcomes) = SaveQueue::spawn(h.gateway.clone()).unwrap();
        let full = pharmacy_records();
        let first = Vec::new();
        let middle = full[..1].to_vec();

        queue.submit(first.clone());
        h.started.recv().unwrap();
        assert!(queue.is_busy());

        queue.submit(middle);
        queue.submit(full.clone());
        h.permits.send(()).unwrap();
        h.permits.send(()).unwrap();
        queue.flush();

        assert_eq!(*h.gateway.saves.lock().unwrap(), vec![first, full]);
        assert_eq!(outcomes.recv().unwrap(), SaveOutcome::Saved { zones: 0 });
        assert_eq!(outcomes.recv().unwrap(), SaveOutcome::Saved { zones: 3 });
        assert!(!queue.is_busy());
    }

    #[test]
    fn failed_save_is_reported_and_worker_keeps_going() {
        let h = harness(true);
        let (queue, outcomes) = SaveQueue::spawn(h.gateway.clone()).unwrap();

        h.permits.send(()).unwrap();
        queue.submit(pharmacy_records());
        queue.flush();
        let SaveOutcome::Failed { message } = outcomes.recv().unwrap() else {
            panic!("expected failure");
        };
        assert!(message.contains("500"), "{message}");

        h.permits.send(()).unwrap();
        queue.submit(Vec::new());
        queue.flush();
        assert!(matches!(outcomes.recv().unwrap(), SaveOutcome::Failed { .. }));
        assert_eq!(h.gateway.saves.lock().unwrap().len(), 2);
    }

    #[test]
    fn dropping_the_queue_finishes_pending_saves() {
        let h = harness(false);
        let (queue, outcomes) = SaveQueue::spawn(h.gateway.clone()).unwrap();
        h.permits.send(()).unwrap();
        queue.submit(pharmacy_records());
        drop(queue);

        assert_eq!(h.gateway.saves.lock().unwrap().len(), 1);
        assert_eq!(outcomes.recv().unwrap(), SaveOutcome::Saved { zones: 3 });
    }
}
