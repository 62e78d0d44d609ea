use crate::Error;

/// Upper bound for [`ConfigBuilder::queue_capacity`].
pub const MAX_QUEUE_CAPACITY: usize = 4096;

/// Handshake socket configuration
#[derive(Debug, Clone)]
pub struct Config {
    queue_capacity: usize,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder { queue_capacity: 8 }
    }

    /// Number of pending writes to reserve room for up front.
    ///
    /// The queue grows past this as needed. Writes sent before the
    /// handshake completes are never rejected.
    #[inline(always)]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

/// Builder for handshake socket configuration.
pub struct ConfigBuilder {
    queue_capacity: usize,
}

impl ConfigBuilder {
    /// Set the number of pending writes to reserve room for.
    ///
    /// Defaults to 8. Must not exceed [`MAX_QUEUE_CAPACITY`].
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Build the configuration.
    ///
    /// Returns `Error::Config` if a value is out of range.
    pub fn build(self) -> Result<Config, Error> {
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(Error::Config(format!(
                "queue_capacity {} exceeds max {}",
                self.queue_capacity, MAX_QUEUE_CAPACITY
            )));
        }

        Ok(Config {
            queue_capacity: self.queue_capacity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder()
            .build()
            .expect("Default config should always validate")
    }
}
