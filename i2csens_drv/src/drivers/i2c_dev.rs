//! Linux `/dev/i2c-N` transport.
//!
//! Binds the adapter file descriptor to one client address with the
//! `I2C_SLAVE` ioctl. A register read is a single `I2C_RDWR` transfer: the
//! register pointer write and the one-byte read are joined by a repeated
//! start, so no other client on the adapter can move the pointer in between.
//! A register write is one plain `write` of `[register, value]`.

use i2csens_common::hal::bus::{BusError, BusTransport, Transfer};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `I2C_SLAVE` request number from `linux/i2c-dev.h`.
const I2C_SLAVE: libc::c_ulong = 0x0703;

nix::ioctl_write_int_bad!(
    /// Select the client address for subsequent transfers on an adapter fd.
    i2c_set_slave_address,
    I2C_SLAVE
);

/// `I2C_RDWR` request number from `linux/i2c-dev.h`.
const I2C_RDWR: libc::c_ulong = 0x0707;

mod rdwr {
    /// `i2c_msg` flag marking a read message.
    pub const I2C_M_RD: u16 = 0x0001;

    /// `struct i2c_msg` from `linux/i2c.h`.
    // Fields are only read by the kernel.
    #[allow(dead_code)]
    #[repr(C)]
    pub struct I2cMsg {
        pub addr: u16,
        pub flags: u16,
        pub len: u16,
        pub buf: *mut u8,
    }

    /// `struct i2c_rdwr_ioctl_data` from `linux/i2c-dev.h`.
    #[allow(dead_code)]
    #[repr(C)]
    pub struct I2cRdwrData {
        pub msgs: *mut I2cMsg,
        pub nmsgs: u32,
    }

    nix::ioctl_readwrite_bad!(
        /// Run a combined transfer of `nmsgs` messages on an adapter fd.
        i2c_rdwr,
        super::I2C_RDWR,
        I2cRdwrData
    );
}

use rdwr::{I2C_M_RD, I2cMsg, I2cRdwrData, i2c_rdwr};

/// Transport over a Linux I2C adapter device node.
#[derive(Debug)]
pub struct I2cDevBus {
    file: File,
    path: PathBuf,
    address: u16,
}

impl I2cDevBus {
    /// Open `path` and address the client at `address`.
    ///
    /// # Errors
    /// Returns `BusError::Io` if the node cannot be opened or the address
    /// cannot be selected.
    pub fn open(path: &Path, address: u16) -> Result<Self, BusError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| BusError::Io(format!("{}: {e}", path.display())))?;

        // SAFETY: the fd is owned by `file` and stays open for the call.
        unsafe { i2c_set_slave_address(file.as_raw_fd(), libc::c_int::from(address)) }
            .map_err(|e| BusError::Io(format!("I2C_SLAVE {address:#04x}: {e}")))?;

        debug!("opened {} at address {address:#04x}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
            address,
        })
    }

    /// Adapter device node.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Client address.
    pub fn address(&self) -> u16 {
        self.address
    }
}

impl I2cDevBus {
    fn read_register(&mut self, register: u8) -> Result<u8, BusError> {
        let mut pointer = [register];
        let mut value = [0u8; 1];
        let mut msgs = [
            I2cMsg {
                addr: self.address,
                flags: 0,
                len: 1,
                buf: pointer.as_mut_ptr(),
            },
            I2cMsg {
                addr: self.address,
                flags: I2C_M_RD,
                len: 1,
                buf: value.as_mut_ptr(),
            },
        ];
        let mut data = I2cRdwrData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: 2,
        };

        // SAFETY: the fd is owned by `self.file`; every message points at a
        // live one-byte buffer and `nmsgs` matches the array.
        unsafe { i2c_rdwr(self.file.as_raw_fd(), &mut data) }
            .map_err(|errno| map_io(register, std::io::Error::from(errno)))?;
        Ok(value[0])
    }
}

fn map_io(register: u8, err: std::io::Error) -> BusError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => BusError::Timeout,
        ErrorKind::NotFound | ErrorKind::BrokenPipe => BusError::Disconnected,
        // The adapter reports a missing acknowledge as ENXIO or EREMOTEIO.
        _ if matches!(err.raw_os_error(), Some(libc::ENXIO | libc::EREMOTEIO)) => {
            BusError::Nack { address: register }
        }
        _ => BusError::Io(err.to_string()),
    }
}

impl BusTransport for I2cDevBus {
    fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError> {
        match transfer {
            Transfer::Read => self.read_register(address),
            Transfer::Write(value) => {
                self.file
                    .write_all(&[address, value])
                    .map_err(|e| map_io(address, e))?;
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_adapter_fails() {
        let err = I2cDevBus::open(Path::new("/nonexistent/i2c-99"), 0x48).unwrap_err();
        assert!(matches!(err, BusError::Io(msg) if msg.contains("i2c-99")));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn rdwr_structs_match_kernel_layout() {
        assert_eq!(std::mem::size_of::<I2cMsg>(), 16);
        assert_eq!(std::mem::size_of::<I2cRdwrData>(), 16);
    }

    #[test]
    fn register_read_is_one_combined_transfer() {
        // /dev/null accepts plain reads and writes but no I2C ioctl, so a
        // read only fails with ENOTTY if it goes through I2C_RDWR.
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open("/dev/null")
            .unwrap();
        let mut bus = I2cDevBus {
            file,
            path: PathBuf::from("/dev/null"),
            address: 0x48,
        };

        let err = bus.transaction(0, Transfer::Read).unwrap_err();
        let enotty = format!("os error {}", libc::ENOTTY);
        assert!(matches!(err, BusError::Io(ref msg) if msg.contains(&enotty)), "{err:?}");

        assert_eq!(bus.transaction(1, Transfer::Write(0x01)), Ok(0x01));
    }

    #[test]
    fn io_errors_map_to_bus_errors() {
        let nack = std::io::Error::from_raw_os_error(libc::ENXIO);
        assert_eq!(map_io(2, nack), BusError::Nack { address: 2 });

        let timeout = std::io::Error::from(ErrorKind::TimedOut);
        assert_eq!(map_io(0, timeout), BusError::Timeout);

        let other = std::io::Error::other("bad");
        assert!(matches!(map_io(0, other), BusError::Io(_)));
    }
}
