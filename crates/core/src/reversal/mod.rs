//! Ineligible ITC reversal lines.

pub mod generator;
mod lines;

#[cfg(test)]
mod generator_props;

pub use generator::{
    AssetCostUpdate, ExternalUpdates, RedirectTarget, Reversal, ReversalEntryGenerator,
};
