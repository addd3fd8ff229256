//! Board bring-up primitives the bridge consumes during initialization.
//!
//! Clock gating, clock-tree queries, the interrupt vector table and pin multiplexing belong to
//! the firmware's platform layer. The bridge only calls through [`Platform`].

use crate::config::{AlternateFunction, Gpio};

/// Interrupt handler entry point.
pub type IrqHandler = fn();

/// Default (non-elevated) interrupt priority.
pub const DEFAULT_IRQ_PRIORITY: u8 = 0;

/// Platform services used by [`crate::SerialBridge::initialize`].
pub trait Platform {
    /// Ungates the clock of the peripheral at `base`. Its registers are not usable before this.
    fn enable_pclock(&self, base: usize);

    /// Input clock frequency in Hz of the peripheral at `base`.
    fn pclock_frequency(&self, base: usize) -> u32;

    /// Routes interrupt line `irq` to `handler` at `priority` and unmasks it.
    ///
    /// Platforms with a vector table fixed at link time bind the handler there instead and only
    /// set the priority and unmask the line.
    fn enable_irq(&self, handler: IrqHandler, irq: u16, priority: u8);

    /// Connects `pin` to a peripheral through alternate function `function`, optionally with
    /// the internal pull-up enabled.
    fn gpio_peripheral(&self, pin: Gpio, function: AlternateFunction, pull_up: bool);
}
