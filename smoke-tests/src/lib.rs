//! End-to-end scenarios for both backends.
#[cfg(test)]
mod tests;
