pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device can't run the pipeline at all; nothing got created.
    #[error("Device `{device}` is not supported: {reason}")]
    UnsupportedDevice { device: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(
        "Couldn't allocate `{label}`: requested {requested} bytes, but only \
         {available} bytes are available"
    )]
    OutOfMemory {
        label: String,
        requested: usize,
        available: usize,
    },

    /// The device got lost (e.g. removed or reset); every resource allocated
    /// from it is gone and has to be re-created.
    #[error("Device lost")]
    DeviceLost,
}

impl Error {
    pub(crate) fn invalid_config(reason: impl ToString) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }
}
