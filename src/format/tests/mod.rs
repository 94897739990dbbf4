//! Codec test suite.
