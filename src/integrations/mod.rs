//! External service integrations.

pub mod decoder_client {
    pub use crate::decoder_client::*;
}

pub mod patterns {
    pub use crate::patterns::*;
}
