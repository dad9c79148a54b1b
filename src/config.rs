//! Timing configuration
//!
//! All delays and timeouts are empirical values taken from the module
//! datasheet and from field experience with buffered serial links. They are
//! collected here so boards with slower UART bridges can stretch them.

/// Driver timing and retry settings
///
/// Use [`Config::default()`] for datasheet values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Delay before and after driving the mode lines. The datasheet asks
    /// for 2 ms; some modules need much longer to react.
    pub mode_settle_ms: u32,
    /// Ready-line timeout after a mode change
    pub mode_change_timeout_ms: u32,
    /// Sleep used instead of polling when no ready line is wired
    pub no_aux_delay_ms: u32,
    /// Quiet period required after the ready line goes high
    pub ready_settle_ms: u32,
    /// Pause between two ready-line samples
    pub ready_poll_interval_ms: u32,
    /// Upper bound on draining stale input
    pub drain_timeout_ms: u32,
    /// Time allowed for a full 6-byte response to arrive
    pub response_timeout_ms: u32,
    /// Total model read attempts before giving up
    pub model_read_attempts: u8,
    /// Pause between two model read attempts
    pub model_retry_delay_ms: u32,
    /// Ready-line timeout after a model read and after payload transfers
    pub transfer_timeout_ms: u32,
    /// Pause between entering program mode and writing a parameter frame
    pub save_lead_ms: u32,
    /// Pause after writing a parameter frame
    pub save_settle_ms: u32,
    /// Pause between entering program mode and sending the reset command
    pub reset_lead_ms: u32,
    /// Ready-line timeout after a parameter write or reset
    pub command_timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode_settle_ms: 50,
            mode_change_timeout_ms: 4_000,
            no_aux_delay_ms: 1_000,
            ready_settle_ms: 20,
            ready_poll_interval_ms: 1,
            drain_timeout_ms: 5_000,
            response_timeout_ms: 1_000,
            model_read_attempts: 5,
            model_retry_delay_ms: 100,
            transfer_timeout_ms: 1_000,
            save_lead_ms: 5,
            save_settle_ms: 50,
            reset_lead_ms: 50,
            command_timeout_ms: 4_000,
        }
    }
}
