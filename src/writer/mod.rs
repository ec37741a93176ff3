//! Output stage: everything that touches the output directory lives here.
pub mod csv;
pub mod actions;
