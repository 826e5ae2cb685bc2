//! Reference networks for tests, benches and fixture binaries.

pub mod toy_central_carbon;
