/// Callback invoked once per frame with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnMut(f64)>;

/// Frame callbacks run in registration order
#[derive(Default)]
pub struct UpdateList {
    callbacks: Vec<FrameCallback>,
    last_timestamp: Option<f64>,
}

impl UpdateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, callback: impl FnMut(f64) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run every callback for this frame
    ///
    /// Timestamps never go backwards; a stale one is replaced by the last
    /// timestamp seen.
    pub fn run(&mut self, timestamp_ms: f64) {
        let timestamp_ms = match self.last_timestamp {
            Some(last) if !(timestamp_ms >= last) => last,
            _ => timestamp_ms,
        };
        self.last_timestamp = Some(timestamp_ms);

        for callback in &mut self.callbacks {
            callback(timestamp_ms);
        }
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}
