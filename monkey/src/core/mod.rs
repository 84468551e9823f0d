//! Core disruption logic

pub mod disruptor;
pub mod selection;

pub use disruptor::Disruptor;
pub use selection::VictimPicker;
