//! Cycle-accurate model of a write-only SPI peripheral with five byte registers.
//!
//! The design is a synchronous circuit described as a composition of Mealy machines (see [`Fsm`]).
//! Each call to a `step`/`tick` function is one cycle of the internal fast clock.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(variant_size_differences)]
#![deny(warnings)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::private_doc_tests)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]
#![deny(unreachable_pub)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(elided_lifetimes_in_paths)]

pub mod config;
pub mod controller;
pub mod counter;
pub mod decoder;
pub mod edge;
pub mod frame;
mod fsm;
pub mod peripheral;
pub mod pwm;
pub mod registers;
pub mod synchronizer;
pub mod testbench;
pub mod utils;

pub use config::*;
pub use controller::{Commit, Phase, Rejection, TransactionController};
pub use counter::BitCounter;
pub use decoder::{LineInputs, SpiDecoder};
pub use edge::Edges;
pub use frame::{Frame, FrameAssembler, FrameError};
pub use fsm::Fsm;
pub use peripheral::{Peripheral, PinOutputs};
pub use pwm::PwmGenerator;
pub use registers::{RegisterBank, RegisterId, MAX_REGISTER_ADDRESS, REGISTER_COUNT};
pub use synchronizer::{SyncBank, Synchronizer};
pub use testbench::{SpiHost, Waveform};
pub use utils::*;
