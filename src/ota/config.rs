#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) block_size: usize,
    pub(crate) max_blocks_per_request: u32,
    pub(crate) status_update_frequency: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            block_size: 256,
            max_blocks_per_request: 31,
            status_update_frequency: 24,
        }
    }

    /// Size of a single file block requested from the server. AWS IoT streams
    /// accept 256 bytes up to 128 KiB.
    pub const fn block_size(self, block_size: usize) -> Self {
        Self { block_size, ..self }
    }

    /// Upper bound on how many blocks a single request asks for. Capped by the
    /// 31 usable bits of the request bitmap.
    pub const fn max_blocks_per_request(self, max_blocks_per_request: u32) -> Self {
        Self {
            max_blocks_per_request,
            ..self
        }
    }

    /// Report progress to the job service every `status_update_frequency`
    /// received blocks.
    pub const fn status_update_frequency(self, status_update_frequency: u32) -> Self {
        Self {
            status_update_frequency,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::new()
            .block_size(1024)
            .max_blocks_per_request(8)
            .status_update_frequency(1);

        assert_eq!(config.block_size, 1024);
        assert_eq!(config.max_blocks_per_request, 8);
        assert_eq!(config.status_update_frequency, 1);
        assert_eq!(Config::default(), Config::new());
    }
}
