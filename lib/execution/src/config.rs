use triplestream_model::BlankNodeMatchingMode;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Holds the configuration of query execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// The capacity of the bounded channels connecting pipelined stages. At least 1.
    pub channel_capacity: usize,
    /// Whether blank nodes in patterns act as variables or as constants.
    pub blank_node_mode: BlankNodeMatchingMode,
    /// Whether basic graph patterns run with one task per pattern.
    pub pipelined: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            blank_node_mode: BlankNodeMatchingMode::default(),
            pipelined: false,
        }
    }
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the channel capacity. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_blank_node_mode(mut self, blank_node_mode: BlankNodeMatchingMode) -> Self {
        self.blank_node_mode = blank_node_mode;
        self
    }

    #[must_use]
    pub fn with_pipelined(mut self, pipelined: bool) -> Self {
        self.pipelined = pipelined;
        self
    }
}
