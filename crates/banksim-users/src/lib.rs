mod lookup;
mod directory;

pub use lookup::{LookupError, UserLookup};
pub use directory::{UserDirectory, UserUpdate};

#[cfg(test)]
mod tests;
