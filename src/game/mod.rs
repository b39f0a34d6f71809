pub mod controller;
pub mod oracle;
pub mod round;
pub mod words;

pub use controller::*;
pub use oracle::*;
pub use round::*;
pub use words::*;
