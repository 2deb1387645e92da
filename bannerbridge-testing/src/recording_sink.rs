//! A host sink that records everything it is told.
//!
//! Records live in shared `Arc<Mutex<Vec<_>>>` storage so a test can keep a
//! handle after moving the sink into an adapter.

use std::sync::{Arc, Mutex};

use bannerbridge::{AdResult, HostCallbackSink};

/// One callback received from the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRecord {
    /// `on_ad_result`.
    Result(AdResult),
    /// `report_impression`.
    Impression,
    /// `report_click`.
    Click,
}

/// Records every host callback, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<SinkRecord>>>,
}

impl RecordingSink {
    /// Creates a sink with empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every callback received so far.
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Only the terminal results received so far.
    pub fn results(&self) -> Vec<AdResult> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|record| match record {
                SinkRecord::Result(result) => Some(result.clone()),
                SinkRecord::Impression | SinkRecord::Click => None,
            })
            .collect()
    }

    /// Number of terminal results received.
    pub fn result_count(&self) -> usize {
        self.count(|record| matches!(record, SinkRecord::Result(_)))
    }

    /// Number of impressions passed through.
    pub fn impressions(&self) -> usize {
        self.count(|record| matches!(record, SinkRecord::Impression))
    }

    /// Number of clicks passed through.
    pub fn clicks(&self) -> usize {
        self.count(|record| matches!(record, SinkRecord::Click))
    }

    fn count(&self, predicate: impl Fn(&SinkRecord) -> bool) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| predicate(*record))
            .count()
    }

    fn push(&self, record: SinkRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl HostCallbackSink for RecordingSink {
    fn on_ad_result(&self, result: AdResult) {
        self.push(SinkRecord::Result(result));
    }

    fn report_impression(&self) {
        self.push(SinkRecord::Impression);
    }

    fn report_click(&self) {
        self.push(SinkRecord::Click);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bannerbridge::AdFailure;

    #[test]
    fn new_sink_is_empty() {
        let sink = RecordingSink::new();

        assert!(sink.records().is_empty());
        assert_eq!(sink.result_count(), 0);
    }

    #[test]
    fn clones_share_storage() {
        // Given: a sink and a clone handed to someone else
        let sink = RecordingSink::new();
        let moved = sink.clone();

        // When: the clone receives callbacks
        moved.report_impression();
        moved.on_ad_result(AdResult::Failure(AdFailure::invalid_payload("x")));
        moved.report_click();

        // Then: the original sees them in order
        assert_eq!(sink.records().len(), 3);
        assert_eq!(sink.records()[0], SinkRecord::Impression);
        assert_eq!(sink.result_count(), 1);
        assert_eq!(sink.impressions(), 1);
        assert_eq!(sink.clicks(), 1);
    }
}
