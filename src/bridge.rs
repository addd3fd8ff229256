//! Interrupt-driven transmit/receive state machine for one USART.

use crate::config::BridgeConfig;
use crate::divisor::BaudDivisor;
use crate::platform::{DEFAULT_IRQ_PRIORITY, IrqHandler, Platform};
use crate::registers::{CR1, SR, Usart};
use tock_registers::fields::FieldValue;

/// Receives bytes read from the USART.
///
/// Called from the interrupt handler, once per received byte and in arrival order. Must not
/// block.
pub trait RxSink {
    /// Takes one received byte.
    fn accept(&self, byte: u8);
}

/// Supplies bytes for the USART to send.
///
/// Called from the interrupt handler. Must not block.
pub trait TxSource {
    /// Takes the next byte to send, or `None` when there is nothing pending.
    fn next(&self) -> Option<u8>;
}

impl<S: RxSink + ?Sized> RxSink for &S {
    fn accept(&self, byte: u8) {
        (**self).accept(byte)
    }
}

impl<S: TxSource + ?Sized> TxSource for &S {
    fn next(&self) -> Option<u8> {
        (**self).next()
    }
}

/// CR1 while the bridge runs: USART, receiver, transmitter and RX interrupt enabled, TX
/// interrupt disarmed.
fn idle_control() -> FieldValue<u32, CR1::Register> {
    CR1::UE::SET + CR1::RE::SET + CR1::TE::SET + CR1::RXNEIE::SET
}

/// CR1 while a byte is waiting to be sent.
fn armed_control() -> FieldValue<u32, CR1::Register> {
    idle_control() + CR1::TXEIE::SET
}

/// A USART bridged to a byte sink and a byte source.
///
/// The bridge holds no state of its own; the peripheral's registers are the state. It is meant
/// to live in a `static` so the interrupt handler can reach it:
///
/// ```ignore
/// static BRIDGE: SerialBridge<UsartPeripheral, &RxQueue, &TxQueue> = SerialBridge::new(
///     // SAFETY: Nothing else touches the configured USART.
///     unsafe { UsartPeripheral::new(&CONFIG.instance) },
///     &RX_QUEUE,
///     &TX_QUEUE,
/// );
///
/// fn bridge_irq() {
///     BRIDGE.on_interrupt();
/// }
///
/// BRIDGE.initialize(&platform, &CONFIG, bridge_irq);
/// ```
pub struct SerialBridge<U, R, T> {
    usart: U,
    rx: R,
    tx: T,
}

impl<U, R, T> SerialBridge<U, R, T> {
    /// Binds `usart` to a receive sink and a transmit source.
    pub const fn new(usart: U, rx: R, tx: T) -> Self {
        Self { usart, rx, tx }
    }
}

impl<U: Usart, R: RxSink, T: TxSource> SerialBridge<U, R, T> {
    /// Brings up the USART: clock, baud rate, control flags, interrupt and pins, in that order.
    ///
    /// Call once at startup, before any data flows. `handler` must call
    /// [`SerialBridge::on_interrupt`] on this bridge.
    ///
    /// A baud rate the peripheral clock cannot produce is not detected; the USART then runs at
    /// the wrong rate.
    pub fn initialize<P: Platform + ?Sized>(
        &self,
        platform: &P,
        config: &BridgeConfig,
        handler: IrqHandler,
    ) {
        let instance = &config.instance;
        platform.enable_pclock(instance.base);

        let pclk = platform.pclock_frequency(instance.base);
        let divisor = BaudDivisor::new(pclk, config.baud_rate);
        self.usart.write_baud_rate(divisor.brr());
        self.usart.write_control(idle_control());

        platform.enable_irq(handler, instance.irq, DEFAULT_IRQ_PRIORITY);

        let pins = &config.pins;
        platform.gpio_peripheral(pins.rx, pins.function, true);
        platform.gpio_peripheral(pins.tx, pins.function, false);

        info!(
            "serial bridge: {} at {} baud (pclk {} Hz, divisor {}, actual {} baud)",
            instance.name,
            config.baud_rate,
            pclk,
            divisor.get(),
            divisor.actual_baud(pclk)
        );
        debug!("serial bridge: reserved pins {}", pins.reserved);
    }

    /// Services one USART interrupt: at most one received byte, then at most one sent byte.
    ///
    /// Reading SR and then DR, in that order and once each, is the hardware sequence that
    /// clears an overrun. An overrun is otherwise not reported: the byte latched in DR is
    /// forwarded like any other and the lost byte goes unnoticed.
    pub fn on_interrupt(&self) {
        let status = self.usart.status();
        if status.is_set(SR::RXNE) || status.is_set(SR::ORE) {
            self.rx.accept(self.usart.read_data());
        }

        if status.is_set(SR::TXE) && self.usart.control().is_set(CR1::TXEIE) {
            match self.tx.next() {
                Some(byte) => self.usart.write_data(byte),
                None => {
                    self.usart.write_control(idle_control());
                    trace!("serial bridge: tx drained");
                }
            }
        }
    }

    /// Enables the TX-empty interrupt so pending bytes get sent.
    ///
    /// Call whenever the transmit source goes from empty to non-empty. Safe from any context,
    /// including interrupt handlers, and a no-op when already armed: CR1 is replaced in a single
    /// store rather than read, modified and written back.
    pub fn arm_transmit(&self) {
        self.usart.write_control(armed_control());
    }
}
