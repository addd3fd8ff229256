//! STM32 USART register layout and the hardware access seam used by the bridge.
//!
//! Only the registers the bridge touches are modelled: status (SR), data (DR), baud rate (BRR)
//! and control 1 (CR1). CR2, CR3 and GTPR keep their reset values, which gives 8-N-1 framing.

use crate::config::UsartInstance;
use tock_registers::{
    LocalRegisterCopy,
    fields::FieldValue,
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::ReadWrite,
};

register_bitfields! {u32,
    /// Status register.
    #[allow(missing_docs)]
    pub SR [
        /// Transmit data register empty.
        TXE OFFSET(7) NUMBITS(1) [],
        /// Transmission complete.
        TC OFFSET(6) NUMBITS(1) [],
        /// Read data register not empty.
        RXNE OFFSET(5) NUMBITS(1) [],
        /// Idle line detected.
        IDLE OFFSET(4) NUMBITS(1) [],
        /// Overrun error. Cleared by a read of SR followed by a read of DR.
        ORE OFFSET(3) NUMBITS(1) [],
        /// Noise detected.
        NF OFFSET(2) NUMBITS(1) [],
        /// Framing error.
        FE OFFSET(1) NUMBITS(1) [],
        /// Parity error.
        PE OFFSET(0) NUMBITS(1) []
    ],
    /// Data register.
    #[allow(missing_docs)]
    pub DR [
        DR OFFSET(0) NUMBITS(9) []
    ],
    /// Baud rate register.
    #[allow(missing_docs)]
    pub BRR [
        DIV_MANTISSA OFFSET(4) NUMBITS(12) [],
        DIV_FRACTION OFFSET(0) NUMBITS(4) []
    ],
    /// Control register 1.
    #[allow(missing_docs)]
    pub CR1 [
        OVER8 OFFSET(15) NUMBITS(1) [],
        /// USART enable.
        UE OFFSET(13) NUMBITS(1) [],
        M OFFSET(12) NUMBITS(1) [],
        WAKE OFFSET(11) NUMBITS(1) [],
        PCE OFFSET(10) NUMBITS(1) [],
        PS OFFSET(9) NUMBITS(1) [],
        PEIE OFFSET(8) NUMBITS(1) [],
        /// TXE interrupt enable.
        TXEIE OFFSET(7) NUMBITS(1) [],
        TCIE OFFSET(6) NUMBITS(1) [],
        /// RXNE (and ORE) interrupt enable.
        RXNEIE OFFSET(5) NUMBITS(1) [],
        IDLEIE OFFSET(4) NUMBITS(1) [],
        /// Transmitter enable.
        TE OFFSET(3) NUMBITS(1) [],
        /// Receiver enable.
        RE OFFSET(2) NUMBITS(1) [],
        RWU OFFSET(1) NUMBITS(1) [],
        SBK OFFSET(0) NUMBITS(1) []
    ]
}

register_structs! {
    /// Memory layout of one USART instance.
    pub UsartRegisterBlock {
        (0x00 => sr: ReadWrite<u32, SR::Register>),
        (0x04 => dr: ReadWrite<u32, DR::Register>),
        (0x08 => brr: ReadWrite<u32, BRR::Register>),
        (0x0C => cr1: ReadWrite<u32, CR1::Register>),
        (0x10 => _reserved0),
        (0x1C => @END),
    }
}

/// Register-level access to a USART.
///
/// Every method is exactly one volatile access. Callers rely on that: reading SR and then DR
/// is what clears an overrun, and CR1 is only ever replaced as a whole word so that
/// [`crate::SerialBridge::arm_transmit`] and the interrupt handler cannot interleave a
/// read-modify-write.
pub trait Usart {
    /// Reads SR.
    fn status(&self) -> LocalRegisterCopy<u32, SR::Register>;
    /// Reads DR, returning the received byte.
    fn read_data(&self) -> u8;
    /// Writes one byte to DR, starting its transmission.
    fn write_data(&self, byte: u8);
    /// Reads CR1.
    fn control(&self) -> LocalRegisterCopy<u32, CR1::Register>;
    /// Replaces CR1. Fields not named in `flags` are written as zero.
    fn write_control(&self, flags: FieldValue<u32, CR1::Register>);
    /// Replaces BRR.
    fn write_baud_rate(&self, divisor: FieldValue<u32, BRR::Register>);
}

impl<U: Usart + ?Sized> Usart for &U {
    fn status(&self) -> LocalRegisterCopy<u32, SR::Register> {
        (**self).status()
    }

    fn read_data(&self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&self, byte: u8) {
        (**self).write_data(byte)
    }

    fn control(&self) -> LocalRegisterCopy<u32, CR1::Register> {
        (**self).control()
    }

    fn write_control(&self, flags: FieldValue<u32, CR1::Register>) {
        (**self).write_control(flags)
    }

    fn write_baud_rate(&self, divisor: FieldValue<u32, BRR::Register>) {
        (**self).write_baud_rate(divisor)
    }
}

/// Handle to the memory-mapped registers of the USART selected at build time.
pub struct UsartPeripheral {
    registers: *const UsartRegisterBlock,
}

// SAFETY: The register block is only touched through single volatile accesses, and the
// constructor's contract gives this handle sole ownership of the peripheral.
unsafe impl Send for UsartPeripheral {}
// SAFETY: See above. Concurrent use from thread mode and the interrupt handler is limited to
// whole-word CR1 stores, which the hardware serializes.
unsafe impl Sync for UsartPeripheral {}

impl UsartPeripheral {
    /// Creates a handle for `instance`.
    ///
    /// # Safety
    ///
    /// `instance.base` must be the address of a USART register block on this chip, and no other
    /// code may access that block for as long as the handle is in use.
    #[allow(clippy::as_conversions)]
    pub const unsafe fn new(instance: &UsartInstance) -> Self {
        Self {
            registers: instance.base as *const UsartRegisterBlock,
        }
    }

    fn registers(&self) -> &UsartRegisterBlock {
        // SAFETY: The constructor's caller guarantees the address points at a live register
        // block owned by this handle.
        unsafe { &*self.registers }
    }
}

impl Usart for UsartPeripheral {
    fn status(&self) -> LocalRegisterCopy<u32, SR::Register> {
        self.registers().sr.extract()
    }

    fn read_data(&self) -> u8 {
        // DR is 9 bits wide; with 8-bit framing the top bit is always zero.
        self.registers().dr.read(DR::DR) as u8
    }

    fn write_data(&self, byte: u8) {
        self.registers().dr.write(DR::DR.val(byte.into()));
    }

    fn control(&self) -> LocalRegisterCopy<u32, CR1::Register> {
        self.registers().cr1.extract()
    }

    fn write_control(&self, flags: FieldValue<u32, CR1::Register>) {
        self.registers().cr1.write(flags);
    }

    fn write_baud_rate(&self, divisor: FieldValue<u32, BRR::Register>) {
        self.registers().brr.write(divisor);
    }
}
