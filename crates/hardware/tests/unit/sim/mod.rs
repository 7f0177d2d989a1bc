//! Simulation layer tests.






/// Early and emergency write-back.
pub mod write_back;
