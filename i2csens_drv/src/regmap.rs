//! Register map over a bus transport.
//!
//! `Regmap` bounds-checks every access against the configured address space,
//! refuses writes to registers the configuration declares read-only, and
//! otherwise passes the access straight to the transport. Nothing is cached:
//! every read is a fresh bus transaction.

use i2csens_common::hal::bus::{BusTransport, Transfer};
use i2csens_common::hal::config::RegmapConfig;
use i2csens_common::hal::error::RegmapError;
use tracing::trace;

/// Validated register access for one device.
pub struct Regmap<B> {
    bus: B,
    config: &'static RegmapConfig,
}

impl<B: BusTransport> Regmap<B> {
    /// Create a register map over `bus`. Performs no I/O.
    pub fn new(bus: B, config: &'static RegmapConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid register map description: {:?}",
            config.validate()
        );
        Self { bus, config }
    }

    /// Register map description.
    pub fn config(&self) -> &'static RegmapConfig {
        self.config
    }

    /// Read one register.
    ///
    /// # Errors
    /// - `RegmapError::OutOfRange` if `address` is past `max_register`
    /// - `RegmapError::Bus` if the transaction fails
    pub fn read(&mut self, address: u8) -> Result<u8, RegmapError> {
        self.check_range(address)?;
        let value = self.bus.transaction(address, Transfer::Read)?;
        trace!("{}: read  [{:#04x}] = {:#04x}", self.config.name, address, value);
        Ok(value)
    }

    /// Write one register.
    ///
    /// # Errors
    /// - `RegmapError::OutOfRange` if `address` is past `max_register`
    /// - `RegmapError::NotWritable` if the register is read-only
    /// - `RegmapError::Bus` if the transaction fails
    pub fn write(&mut self, address: u8, value: u8) -> Result<(), RegmapError> {
        self.check_range(address)?;
        if !(self.config.writeable_reg)(address) {
            return Err(RegmapError::NotWritable { address });
        }
        self.bus.transaction(address, Transfer::Write(value))?;
        trace!("{}: write [{:#04x}] = {:#04x}", self.config.name, address, value);
        Ok(())
    }

    /// Read-modify-write the bits selected by `mask`.
    ///
    /// Bits outside `mask` keep the value read from the device. The write is
    /// issued even when the value does not change. Returns the value read
    /// before the update.
    ///
    /// # Errors
    /// Same as [`Regmap::read`] and [`Regmap::write`]. A failed read issues
    /// no write.
    pub fn update_bits(&mut self, address: u8, mask: u8, value: u8) -> Result<u8, RegmapError> {
        self.check_range(address)?;
        if !(self.config.writeable_reg)(address) {
            return Err(RegmapError::NotWritable { address });
        }
        let old = self.read(address)?;
        let new = (old & !mask) | (value & mask);
        self.write(address, new)?;
        Ok(old)
    }

    /// Release the transport.
    pub fn into_bus(self) -> B {
        self.bus
    }

    fn check_range(&self, address: u8) -> Result<(), RegmapError> {
        let size = self.config.address_space_size();
        if usize::from(address) >= size {
            return Err(RegmapError::OutOfRange { address, size });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2csens_common::consts::{REG_CTRL, REG_DATA, REG_ID};
    use i2csens_common::hal::bus::BusError;
    use i2csens_common::hal::config::I2CSENS_REGMAP_CONFIG;

    /// Three-register bus that records every transaction.
    #[derive(Default)]
    struct RecordingBus {
        regs: [u8; 3],
        log: Vec<(u8, Transfer)>,
        fail: bool,
    }

    impl BusTransport for RecordingBus {
        fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError> {
            self.log.push((address, transfer));
            if self.fail {
                return Err(BusError::Timeout);
            }
            let reg = &mut self.regs[usize::from(address)];
            if let Transfer::Write(value) = transfer {
                *reg = value;
            }
            Ok(*reg)
        }
    }

    fn map(regs: [u8; 3]) -> Regmap<RecordingBus> {
        Regmap::new(
            RecordingBus {
                regs,
                ..Default::default()
            },
            &I2CSENS_REGMAP_CONFIG,
        )
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid register map description")]
    fn wide_values_are_refused_at_construction() {
        let wide: &'static RegmapConfig = Box::leak(Box::new(RegmapConfig {
            val_bits: 16,
            ..I2CSENS_REGMAP_CONFIG
        }));
        let _ = Regmap::new(RecordingBus::default(), wide);
    }

    #[test]
    fn read_passes_through_every_time() {
        let mut map = map([0x5A, 0x00, 0x64]);
        assert_eq!(map.read(REG_DATA), Ok(0x64));
        assert_eq!(map.read(REG_DATA), Ok(0x64));
        assert_eq!(map.into_bus().log.len(), 2);
    }

    #[test]
    fn out_of_range_never_reaches_bus() {
        let mut map = map([0; 3]);
        for address in [3u8, 4, 0x7F, 0xFF] {
            assert_eq!(
                map.read(address),
                Err(RegmapError::OutOfRange { address, size: 3 })
            );
            assert_eq!(
                map.write(address, 1),
                Err(RegmapError::OutOfRange { address, size: 3 })
            );
        }
        assert!(map.into_bus().log.is_empty());
    }

    #[test]
    fn read_only_registers_reject_writes() {
        let mut map = map([0x5A, 0, 0]);
        assert_eq!(
            map.write(REG_ID, 0),
            Err(RegmapError::NotWritable { address: REG_ID })
        );
        assert_eq!(
            map.write(REG_DATA, 0),
            Err(RegmapError::NotWritable { address: REG_DATA })
        );
        assert!(map.write(REG_CTRL, 0x01).is_ok());
        assert_eq!(map.into_bus().regs, [0x5A, 0x01, 0]);
    }

    #[test]
    fn not_writable_wins_over_bus_failure() {
        let mut map = Regmap::new(
            RecordingBus {
                fail: true,
                ..Default::default()
            },
            &I2CSENS_REGMAP_CONFIG,
        );
        assert_eq!(
            map.write(REG_ID, 0),
            Err(RegmapError::NotWritable { address: REG_ID })
        );
        assert_eq!(
            map.write(REG_CTRL, 0),
            Err(RegmapError::Bus(BusError::Timeout))
        );
    }

    #[test]
    fn update_bits_preserves_other_bits() {
        let mut map = map([0x5A, 0xA4, 0]);
        assert_eq!(map.update_bits(REG_CTRL, 0x01, 0xFF), Ok(0xA4));
        assert_eq!(map.read(REG_CTRL), Ok(0xA5));
        assert_eq!(map.update_bits(REG_CTRL, 0x01, 0x00), Ok(0xA5));
        assert_eq!(map.read(REG_CTRL), Ok(0xA4));
    }

    #[test]
    fn update_bits_always_writes() {
        let mut map = map([0x5A, 0x01, 0]);
        map.update_bits(REG_CTRL, 0x01, 0x01).unwrap();
        let log = map.into_bus().log;
        assert_eq!(
            log,
            vec![(REG_CTRL, Transfer::Read), (REG_CTRL, Transfer::Write(0x01))]
        );
    }
}
