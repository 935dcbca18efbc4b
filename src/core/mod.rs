// Domain-layer modules and shared errors/models
pub mod defects {
    pub use crate::defects::*;
}

pub mod errors {
    pub use crate::errors::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod policy {
    pub use crate::policy::*;
}

pub mod pricing {
    pub use crate::pricing::*;
}

pub mod resolver {
    pub use crate::resolver::*;
}

pub mod valuation {
    pub use crate::valuation::*;
}
