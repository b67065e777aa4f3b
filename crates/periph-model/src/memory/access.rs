//! Boundary validation for memory port accesses.
//!
//! Every check here runs before a tick drives any state, so a rejected
//! access never leaves a partially applied tick behind.

use super::{MemoryConfig, PortInput};
use crate::bits::fit_word;
use crate::ModelError;

/// Validates that `address` names a cell of a `depth`-cell array.
///
/// # Errors
///
/// Returns [`ModelError::OutOfRange`] when `address >= depth`. Addresses are
/// never wrapped or aliased.
pub const fn validate_address(address: usize, depth: usize) -> Result<usize, ModelError> {
    if address < depth {
        Ok(address)
    } else {
        Err(ModelError::OutOfRange { address, depth })
    }
}

/// Validates one port's inputs for the coming tick.
///
/// A disabled port is not checked: its address and data are ignored.
///
/// # Errors
///
/// Returns [`ModelError::OutOfRange`] for an out-of-range address and
/// [`ModelError::WidthMismatch`] for write data wider than the configured
/// word width.
pub fn validate_port_input(input: &PortInput, config: &MemoryConfig) -> Result<(), ModelError> {
    if !input.enable {
        return Ok(());
    }
    validate_address(input.address, config.depth)?;
    if input.write_enable {
        fit_word(input.write_data, config.word_width)?;
    }
    Ok(())
}
