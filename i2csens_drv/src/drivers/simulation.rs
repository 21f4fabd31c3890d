//! Simulated i2csens device.
//!
//! `SimulatedSensor` models the three device registers in software so the
//! driver can be exercised without hardware. Clones share one model, which
//! lets a test keep a handle on the device while the driver owns another.
//!
//! Fault injection:
//! - [`SimulatedSensor::set_offline`] fails every transaction with `Disconnected`
//! - [`SimulatedSensor::fail_after`] lets N transactions through, then fails M with `Timeout`

use i2csens_common::consts::{REG_CTRL, REGISTER_COUNT};
use i2csens_common::hal::bus::{BusError, BusTransport, Transfer};
use i2csens_common::hal::config::SimulationConfig;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

#[derive(Debug)]
struct SimState {
    regs: [u8; REGISTER_COUNT],
    offline: bool,
    pass_before_fail: usize,
    pending_failures: usize,
    transactions: u64,
}

/// Shared handle to a simulated sensor.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedSensor {
    /// Create a sensor with the configured register contents.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                regs: config.registers(),
                offline: false,
                pass_before_fail: 0,
                pending_failures: 0,
                transactions: 0,
            })),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current register contents, bypassing the bus.
    ///
    /// # Panics
    /// Panics if `address` is not a device register.
    pub fn register(&self, address: u8) -> u8 {
        self.state().regs[usize::from(address)]
    }

    /// Overwrite a register as the hardware would (e.g. a new sample).
    ///
    /// # Panics
    /// Panics if `address` is not a device register.
    pub fn set_register(&self, address: u8, value: u8) {
        self.state().regs[usize::from(address)] = value;
    }

    /// Disconnect or reconnect the device.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Let `pass` transactions succeed, then fail the next `count`.
    pub fn fail_after(&self, pass: usize, count: usize) {
        let mut state = self.state();
        state.pass_before_fail = pass;
        state.pending_failures = count;
    }

    /// Fail the next `count` transactions.
    pub fn fail_next(&self, count: usize) {
        self.fail_after(0, count);
    }

    /// Number of transactions attempted so far, failed ones included.
    pub fn transaction_count(&self) -> u64 {
        self.state().transactions
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl BusTransport for SimulatedSensor {
    fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError> {
        let mut state = self.state();
        state.transactions += 1;

        if state.offline {
            return Err(BusError::Disconnected);
        }
        if state.pending_failures > 0 {
            if state.pass_before_fail > 0 {
                state.pass_before_fail -= 1;
            } else {
                state.pending_failures -= 1;
                return Err(BusError::Timeout);
            }
        }

        let Some(reg) = state.regs.get_mut(usize::from(address)) else {
            return Err(BusError::Nack { address });
        };
        match transfer {
            Transfer::Read => {
                trace!("sim: read  [{address:#04x}] -> {:#04x}", *reg);
                Ok(*reg)
            }
            // ID and DATA are hardware-owned; the device ignores writes to them.
            Transfer::Write(value) => {
                if address == REG_CTRL {
                    *reg = value;
                }
                trace!("sim: write [{address:#04x}] <- {value:#04x}");
                Ok(value)
            }
        }
    }
}
