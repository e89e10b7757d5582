//! Board-level test suites.

mod make_move;
mod proptest;
