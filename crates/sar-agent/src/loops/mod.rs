//! Background loops for continuous processing.

pub mod flush_loop;
