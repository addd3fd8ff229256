//! Build-time selection of the USART instance, pins and baud rate.
//!
//! The instance and pin pair come from a cargo feature (`usart6-pa11-pa12` by default). The
//! baud rate comes from the `SERIAL_BRIDGE_BAUD` environment variable at compile time and
//! falls back to [`DEFAULT_BAUD_RATE`].

use core::fmt;

/// Baud rate used when `SERIAL_BRIDGE_BAUD` is not set.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// A GPIO pin, encoded as `port * 16 + index` with port A as 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct Gpio(u8);

impl Gpio {
    /// The pin `index` of `port`, where `port` is an ASCII letter such as `b'A'`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is not in `b'A'..=b'K'` or `index` is 16 or more. In a `const` item this
    /// is a compile error instead.
    pub const fn new(port: u8, index: u8) -> Self {
        assert!(port >= b'A' && port <= b'K', "GPIO port out of range");
        assert!(index < 16, "GPIO index out of range");
        Self((port - b'A') * 16 + index)
    }

    /// Encoded pin number.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Port letter, e.g. `b'A'`.
    pub const fn port(self) -> u8 {
        b'A' + self.0 / 16
    }

    /// Pin index within the port.
    pub const fn index(self) -> u8 {
        self.0 % 16
    }
}

impl fmt::Display for Gpio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", char::from(self.port()), self.index())
    }
}

/// Alternate-function number routing a pin to a peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct AlternateFunction(pub u8);

/// A USART register block and its interrupt line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct UsartInstance {
    /// Peripheral name, for logs.
    pub name: &'static str,
    /// Base address of the register block.
    pub base: usize,
    /// Interrupt line (IRQn) of the peripheral.
    pub irq: u16,
}

/// RX/TX pins wired to a USART instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct PinAssignment {
    /// Receive pin, configured as an input with pull-up.
    pub rx: Gpio,
    /// Transmit pin, configured as an output.
    pub tx: Gpio,
    /// Alternate function connecting both pins to the USART.
    pub function: AlternateFunction,
    /// Comma separated pin names the bridge owns, e.g. `"PA11,PA12"`.
    pub reserved: &'static str,
}

/// Everything [`crate::SerialBridge::initialize`] needs to bring up the peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct BridgeConfig {
    /// Target baud rate in bits per second.
    pub baud_rate: u32,
    /// The peripheral.
    pub instance: UsartInstance,
    /// The pins.
    pub pins: PinAssignment,
}

/// USART1 on STM32F4.
pub const USART1: UsartInstance = UsartInstance {
    name: "USART1",
    base: 0x4001_1000,
    irq: 37,
};

/// USART2 on STM32F4.
pub const USART2: UsartInstance = UsartInstance {
    name: "USART2",
    base: 0x4000_4400,
    irq: 38,
};

/// USART6 on STM32F4.
pub const USART6: UsartInstance = UsartInstance {
    name: "USART6",
    base: 0x4001_1400,
    irq: 71,
};

#[cfg(feature = "usart6-pa11-pa12")]
const SELECTED: (UsartInstance, PinAssignment) = (
    USART6,
    PinAssignment {
        rx: Gpio::new(b'A', 12),
        tx: Gpio::new(b'A', 11),
        function: AlternateFunction(8),
        reserved: "PA11,PA12",
    },
);

#[cfg(all(feature = "usart1-pa10-pa9", not(feature = "usart6-pa11-pa12")))]
const SELECTED: (UsartInstance, PinAssignment) = (
    USART1,
    PinAssignment {
        rx: Gpio::new(b'A', 10),
        tx: Gpio::new(b'A', 9),
        function: AlternateFunction(7),
        reserved: "PA9,PA10",
    },
);

#[cfg(all(
    feature = "usart2-pa3-pa2",
    not(feature = "usart6-pa11-pa12"),
    not(feature = "usart1-pa10-pa9")
))]
const SELECTED: (UsartInstance, PinAssignment) = (
    USART2,
    PinAssignment {
        rx: Gpio::new(b'A', 3),
        tx: Gpio::new(b'A', 2),
        function: AlternateFunction(7),
        reserved: "PA2,PA3",
    },
);

#[cfg(not(any(
    feature = "usart6-pa11-pa12",
    feature = "usart1-pa10-pa9",
    feature = "usart2-pa3-pa2"
)))]
compile_error!(
    "select the bridge port with one of the features `usart6-pa11-pa12`, `usart1-pa10-pa9` \
     or `usart2-pa3-pa2`"
);

/// Baud rate taken from `SERIAL_BRIDGE_BAUD` at compile time.
pub const BAUD_RATE: u32 = parse_baud_rate(option_env!("SERIAL_BRIDGE_BAUD"));

const _: () = assert!(BAUD_RATE > 0, "SERIAL_BRIDGE_BAUD must be positive");

/// Pins owned by the bridge, for the firmware to advertise as reserved.
pub const RESERVE_PINS: &str = SELECTED.1.reserved;

/// The configuration selected at build time.
pub const CONFIG: BridgeConfig = BridgeConfig {
    baud_rate: BAUD_RATE,
    instance: SELECTED.0,
    pins: SELECTED.1,
};

const fn parse_baud_rate(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return DEFAULT_BAUD_RATE;
    };
    let digits = value.as_bytes();
    assert!(!digits.is_empty(), "SERIAL_BRIDGE_BAUD is empty");

    let mut baud: u32 = 0;
    let mut i = 0;
    while i < digits.len() {
        let digit = digits[i];
        assert!(
            digit.is_ascii_digit(),
            "SERIAL_BRIDGE_BAUD must be a decimal integer"
        );
        baud = match baud.checked_mul(10) {
            Some(b) => match b.checked_add((digit - b'0') as u32) {
                Some(b) => b,
                None => panic!("SERIAL_BRIDGE_BAUD does not fit in 32 bits"),
            },
            None => panic!("SERIAL_BRIDGE_BAUD does not fit in 32 bits"),
        };
        i += 1;
    }
    baud
}
