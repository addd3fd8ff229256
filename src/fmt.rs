//! Logging macros.
//!
//! Firmware builds log through `defmt`. Host unit tests link no defmt global logger, so the
//! same call sites print to stdout there instead. Keep format strings to plain `{}`
//! placeholders so both backends accept them.

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(not(test))]
        ::defmt::info!($($arg)*);
        #[cfg(test)]
        ::std::println!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(not(test))]
        ::defmt::debug!($($arg)*);
        #[cfg(test)]
        ::std::println!($($arg)*);
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(not(test))]
        ::defmt::trace!($($arg)*);
        #[cfg(test)]
        ::std::println!($($arg)*);
    }};
}
