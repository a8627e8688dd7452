//! String-concatenation lowering for the Sable compiler.
//!
//! This crate rewrites every string concatenation in a type-checked
//! expression tree ([`sable_ir::LowArena`]) into calls to the runtime's
//! fixed set of join primitives (`str.concat` overloads), folding constants
//! and dropping redundant null guards along the way.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Type Check → **Lower** (concat rewrite, post-order) → Codegen
//! ```
//!
//! # What Happens During Lowering
//!
//! 1. **Normalization** (`concat::normalize`): every operand becomes a
//!    `str`-producing expression (direct `to_str` calls, null-guarded calls,
//!    char literals turned into string literals)
//! 2. **Folding** (`concat::fold`): adjacent constants merge, null and empty
//!    operands disappear
//! 3. **Flattening** (`concat::flatten`): joins produced by earlier rewrites
//!    are unwrapped so their operands can fuse with the new ones
//! 4. **Fusion** (`concat::fuse`): the flat operand list is emitted as a call
//!    to the smallest join overload that fits
//!
//! The rewrite is local: it looks at its two operands and one level of
//! previously synthesized structure, never at siblings or the whole program.
//! Inside expression lambdas the operator must stay a binary node, so only
//! the overload is chosen (`concat::expr_tree`).

mod concat;
pub mod display;
pub mod eval;
mod factory;
mod lower;
mod session;
mod validate;

#[cfg(test)]
mod test_helpers;

pub use concat::{checked_concat_len, select_primitive, OperandBuffer, OperandRecord};
pub use lower::{lower, LowerOutput};
pub use session::{LowerOptions, LowerSession, LowerStats};
pub use validate::validate;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=sable_lower=debug` or `RUST_LOG=sable_lower=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already have installed a global subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
