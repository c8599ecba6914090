//! Contract violation tests across the primitives.
//!
//! Every rejected call must leave the instance exactly as it was: a failed
//! `build_into` does not finalize, a failed stream call does not consume
//! keystream, and a failed derivation does not disturb the MAC state.
