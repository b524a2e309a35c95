// tests/property/main.rs

mod schedule;
mod transitions;
