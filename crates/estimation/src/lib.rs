//! Pure, stateless estimation: geographic coverage and the finish-time
//! balance gate. Safe to call from anywhere without synchronization.

pub mod balance;
pub mod coverage;
